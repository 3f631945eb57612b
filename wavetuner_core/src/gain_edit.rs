//! In-place rewriting of the generator script's gain argument.
//!
//! The script is expected to carry at least one call of the form
//! `self.<ident>.set_gain(<signed_int>, <0|1>)`. Only the first argument of
//! the selected call is replaced; whitespace and the channel argument are
//! preserved byte-for-byte. The file is rewritten whole, so an interrupted
//! run never leaves a half-edited script.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum GainEditError {
    #[error("gain {gain} outside allowed range [{min}, {max}]")]
    GainOutOfRange { gain: i32, min: i32, max: i32 },
    #[error("target channel {0} out of range (expected 0 or 1)")]
    ChannelOutOfRange(u8),
    #[error("no set_gain call found in {}", .0.display())]
    NoCandidate(PathBuf),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

fn call_pattern() -> &'static Regex {
    static CALL: OnceLock<Regex> = OnceLock::new();
    CALL.get_or_init(|| {
        Regex::new(
            r"self\s*\.\s*([A-Za-z_][A-Za-z0-9_]*)\s*\.\s*set_gain\s*\(\s*([-+]?\d+)\s*,\s*(\d)\s*\)",
        )
        .expect("gain call pattern compiles")
    })
}

/// One `set_gain` call site with the features the selection policy reads.
#[derive(Debug)]
struct Candidate {
    line_idx: usize,
    channel_param: u8,
    /// Underscore-separated token count of the receiver identifier.
    token_count: usize,
    /// Integer value of the identifier's last token, or -1 if non-numeric.
    last_token: i64,
    /// Byte span of the gain argument within the line.
    gain_span: (usize, usize),
}

/// Rewrites a single gain argument in a generator script.
#[derive(Debug, Clone, Copy)]
pub struct GainFileEditor {
    min_gain: i32,
    max_gain: i32,
}

impl Default for GainFileEditor {
    fn default() -> Self {
        Self {
            min_gain: -10,
            max_gain: 60,
        }
    }
}

impl GainFileEditor {
    /// Editor with configured gain bounds (selection logic is unaffected).
    pub fn with_bounds(min_gain: i32, max_gain: i32) -> Self {
        Self { min_gain, max_gain }
    }

    /// Rewrite the gain argument of the call matching `target_channel`.
    pub fn edit_gain(
        &self,
        path: &Path,
        new_gain: i32,
        target_channel: u8,
    ) -> Result<(), GainEditError> {
        if new_gain < self.min_gain || new_gain > self.max_gain {
            warn!(new_gain, "gain value out of allowed range");
            return Err(GainEditError::GainOutOfRange {
                gain: new_gain,
                min: self.min_gain,
                max: self.max_gain,
            });
        }
        if target_channel > 1 {
            return Err(GainEditError::ChannelOutOfRange(target_channel));
        }

        let text = fs::read_to_string(path)?;
        let mut lines: Vec<String> = text.lines().map(str::to_string).collect();

        let candidates = collect_candidates(&lines);
        if candidates.is_empty() {
            warn!(path = %path.display(), "no matching set_gain call");
            return Err(GainEditError::NoCandidate(path.to_path_buf()));
        }
        let chosen = select_candidate(&candidates, target_channel);

        let line = &lines[chosen.line_idx];
        let (start, end) = chosen.gain_span;
        let mut rewritten = String::with_capacity(line.len());
        rewritten.push_str(&line[..start]);
        rewritten.push_str(&new_gain.to_string());
        rewritten.push_str(&line[end..]);
        lines[chosen.line_idx] = rewritten;

        let mut out = String::with_capacity(text.len() + 8);
        for line in &lines {
            out.push_str(line);
            out.push('\n');
        }
        fs::write(path, out)?;
        debug!(path = %path.display(), new_gain, target_channel, "gain updated");
        Ok(())
    }

    /// Channel argument of the first `set_gain` call in the file, or 0.
    pub fn extract_channel(path: &Path) -> u8 {
        static FIRST_CALL: OnceLock<Regex> = OnceLock::new();
        let re = FIRST_CALL.get_or_init(|| {
            Regex::new(r"\.\s*set_gain\s*\(\s*[-+]?\d*\.?\d+\s*,\s*(\d)\s*\)")
                .expect("channel pattern compiles")
        });
        let Ok(text) = fs::read_to_string(path) else {
            return 0;
        };
        re.captures(&text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    }
}

fn collect_candidates(lines: &[String]) -> Vec<Candidate> {
    let re = call_pattern();
    lines
        .iter()
        .enumerate()
        .filter_map(|(line_idx, line)| {
            let caps = re.captures(line)?;
            let ident = caps.get(1)?.as_str();
            let gain = caps.get(2)?;
            let channel_param: u8 = caps.get(3)?.as_str().parse().ok()?;
            let tokens: Vec<&str> = ident.split('_').collect();
            let last_token = tokens
                .last()
                .and_then(|t| t.parse::<i64>().ok())
                .unwrap_or(-1);
            Some(Candidate {
                line_idx,
                channel_param,
                token_count: tokens.len(),
                last_token,
                gain_span: (gain.start(), gain.end()),
            })
        })
        .collect()
}

/// Pick the call site to edit; rules applied in order, first pick wins.
fn select_candidate(candidates: &[Candidate], target_channel: u8) -> &Candidate {
    // 1. Channel arguments disagree: trust the explicit channel.
    let first_channel = candidates[0].channel_param;
    if candidates.iter().any(|c| c.channel_param != first_channel) {
        if let Some(c) = candidates
            .iter()
            .find(|c| c.channel_param == target_channel)
        {
            return c;
        }
    }

    // 2. Receiver identifiers differ in shape: shortest name is the first
    //    channel's radio, longest the second's.
    let first_tokens = candidates[0].token_count;
    if candidates.iter().any(|c| c.token_count != first_tokens) {
        let picked = if target_channel == 0 {
            candidates.iter().min_by_key(|c| c.token_count)
        } else {
            candidates.iter().max_by_key(|c| c.token_count)
        };
        if let Some(c) = picked {
            return c;
        }
    }

    // 3. A numeric identifier suffix naming the channel.
    if let Some(c) = candidates
        .iter()
        .find(|c| c.last_token == i64::from(target_channel))
    {
        return c;
    }

    // 4. Positional fallback.
    candidates
        .get(usize::from(target_channel))
        .unwrap_or(&candidates[0])
}
