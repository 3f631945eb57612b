//! Interactive prompts for tuning parameters not supplied as flags.

use std::io::{self, Write};

fn prompt(label: &str) -> eyre::Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Use the flag value when present, otherwise prompt once and parse.
/// A value that fails to parse is a fatal input error.
pub fn resolve<T, F>(flag: Option<T>, label: &str, parse: F) -> eyre::Result<T>
where
    F: Fn(&str) -> Result<T, String>,
{
    if let Some(value) = flag {
        return Ok(value);
    }
    let raw = prompt(label)?;
    parse(&raw).map_err(|e| eyre::eyre!(e))
}

pub fn parse_channel(s: &str) -> Result<u8, String> {
    match s.trim().to_uppercase().as_str() {
        "L1" => Ok(0),
        "L2" => Ok(1),
        other => Err(format!("invalid channel '{other}' (expected L1 or L2)")),
    }
}

pub fn parse_category(s: &str) -> Result<u8, String> {
    match s.trim().parse::<u8>() {
        Ok(n @ 1..=4) => Ok(n),
        _ => Err(format!(
            "invalid category '{}' (expected 1=L1-only, 2=L2-only, 3=L1_L2, 4=all)",
            s.trim()
        )),
    }
}

pub fn parse_power(s: &str) -> Result<f64, String> {
    s.trim()
        .parse::<f64>()
        .map_err(|_| format!("invalid power value '{}' (expected dBm as a number)", s.trim()))
}
