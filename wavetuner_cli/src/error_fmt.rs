//! Human-readable rendering of typed errors for the console.

use wavetuner_core::{GainEditError, TunerError};

pub fn humanize(err: &eyre::Report) -> String {
    if let Some(te) = err.downcast_ref::<TunerError>() {
        return match te {
            TunerError::NoDevices => {
                "What happened: No amplifier devices were found.\nLikely causes: Amps powered off, USB/serial cables unplugged, or udev names missing the 'amp' tag.\nHow to fix: Check power and cabling, then confirm the devices appear under /dev with an amp-tagged name.".to_string()
            }
            TunerError::Discovery(reason) => format!(
                "What happened: Scanning for amplifier devices failed ({reason}).\nLikely causes: No permission to read the device directory.\nHow to fix: Run with access to /dev, or check the udev rules."
            ),
            TunerError::GainEdit(ge) => humanize_gain_edit(ge),
            TunerError::GainFloor => {
                "What happened: The gain reached 0 and the measured minimum still sits above the target.\nLikely causes: The target minimum is below what this waveform can produce.\nHow to fix: Raise the target minimum or check the amplifier's ALC setpoint.".to_string()
            }
            TunerError::PromptTimeout => {
                "What happened: The generator never printed its readiness prompt.\nLikely causes: The script crashed on startup or cannot reach the radio.\nHow to fix: Run the script by hand and watch its output; raise generator.prompt_timeout_ms if it is just slow.".to_string()
            }
            TunerError::FaultLimit(n) => format!(
                "What happened: The amplifier kept faulting ({n} retries).\nLikely causes: Overdrive, reflected power, or a failing amplifier.\nHow to fix: Inspect the amplifier's FAULTS? output and the RF chain before retrying."
            ),
        };
    }

    if let Some(ge) = err.downcast_ref::<GainEditError>() {
        return humanize_gain_edit(ge);
    }

    let msg = err.to_string();
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!("Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}")
}

fn humanize_gain_edit(err: &GainEditError) -> String {
    match err {
        GainEditError::GainOutOfRange { gain, min, max } => format!(
            "What happened: Gain {gain} is outside the allowed range [{min}, {max}].\nLikely causes: Targets that push the sweep past the configured bounds.\nHow to fix: Adjust the targets, or widen [gain] min/max in the config if the hardware allows it."
        ),
        GainEditError::ChannelOutOfRange(ch) => format!(
            "What happened: Channel {ch} is not a valid set_gain target.\nHow to fix: Use L1 (0) or L2 (1)."
        ),
        GainEditError::NoCandidate(path) => format!(
            "What happened: No set_gain call was found in {}.\nLikely causes: The script does not program a gain, or the call shape is unusual.\nHow to fix: Confirm the script contains 'self.<radio>.set_gain(<int>, <0|1>)'.",
            path.display()
        ),
        GainEditError::Io(e) => format!(
            "What happened: Could not rewrite the generator script ({e}).\nHow to fix: Check the file exists and is writable."
        ),
    }
}
