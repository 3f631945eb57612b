//! Deterministic amplifier-fleet simulator.
//!
//! Each simulated amplifier tracks power state, mode, and level setpoints,
//! and answers the wire vocabulary the way a real unit does: `FWD_PWR?` in
//! VVA mode reports the configured open-loop peak, in ALC mode the
//! regulated setpoint. Tests and demos can also inject raw lines.

use std::collections::HashMap;

use crossbeam_channel::Sender;
use tracing::warn;
use wavetuner_traits::{AmpBus, AmpEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Vva,
    Alc,
}

#[derive(Debug)]
struct SimAmp {
    online: bool,
    mode: Mode,
    vva_level: f64,
    alc_level: f64,
    /// Open-loop forward power reported in VVA mode.
    fwd_pwr: f64,
}

impl Default for SimAmp {
    fn default() -> Self {
        Self {
            online: false,
            mode: Mode::Vva,
            vva_level: 0.0,
            alc_level: 0.0,
            fwd_pwr: 30.0,
        }
    }
}

pub struct SimFleet {
    events: Sender<AmpEvent>,
    devices: Vec<String>,
    amps: HashMap<String, SimAmp>,
}

impl SimFleet {
    /// A single-amplifier fleet.
    pub fn new(events: Sender<AmpEvent>) -> Self {
        Self::with_devices(events, &["/dev/ttyUSB_AMP"])
    }

    pub fn with_devices(events: Sender<AmpEvent>, names: &[&str]) -> Self {
        Self {
            events,
            devices: names.iter().map(|s| (*s).to_string()).collect(),
            amps: HashMap::new(),
        }
    }

    /// Set the open-loop forward power a device reports in VVA mode.
    pub fn set_fwd_pwr(&mut self, device: &str, dbm: f64) {
        if let Some(amp) = self.amps.get_mut(device) {
            amp.fwd_pwr = dbm;
        }
    }

    /// Push a raw line onto the event stream, bypassing the simulator.
    pub fn inject_line(&mut self, device: &str, line: &str) {
        let event = if line.contains("ERROR:") {
            AmpEvent::Fault {
                device: device.to_string(),
                line: line.to_string(),
            }
        } else {
            AmpEvent::Line {
                device: device.to_string(),
                line: line.to_string(),
            }
        };
        let _ = self.events.send(event);
    }

    fn reply(&self, device: &str, line: String) {
        let _ = self.events.send(AmpEvent::Line {
            device: device.to_string(),
            line,
        });
    }
}

impl AmpBus for SimFleet {
    fn discover(&mut self) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        self.amps = self
            .devices
            .iter()
            .map(|d| (d.clone(), SimAmp::default()))
            .collect();
        Ok(self.devices.clone())
    }

    fn send(&mut self, device: &str, command: &str) {
        let Some(amp) = self.amps.get_mut(device) else {
            warn!(device, "unknown simulated device");
            return;
        };
        let line = match command.trim() {
            "MODE?" => {
                let power = if amp.online { "ONLINE" } else { "STANDBY" };
                let mode = match amp.mode {
                    Mode::Vva => "VVA",
                    Mode::Alc => "ALC",
                };
                format!("{power}, {mode}")
            }
            "MODE VVA" => {
                amp.mode = Mode::Vva;
                "OK".to_string()
            }
            "MODE ALC" => {
                amp.mode = Mode::Alc;
                "OK".to_string()
            }
            "STANDBY" => {
                amp.online = false;
                "OK".to_string()
            }
            "ONLINE" => {
                amp.online = true;
                "OK".to_string()
            }
            "FWD_PWR?" => {
                let dbm = match amp.mode {
                    Mode::Vva => amp.fwd_pwr,
                    Mode::Alc => amp.alc_level,
                };
                format!("{dbm:.2} dBm")
            }
            "REV_PWR?" => "0.10 dBm".to_string(),
            "ALC_LEVEL?" => format!("{:.1}", amp.alc_level),
            "VVA_LEVEL?" => format!("{:.1}", amp.vva_level),
            other => {
                if let Some(level) = other.strip_prefix("ALC_LEVEL ") {
                    if let Ok(v) = level.trim().parse::<f64>() {
                        amp.alc_level = v;
                    }
                    "OK".to_string()
                } else if let Some(level) = other.strip_prefix("VVA_LEVEL ") {
                    if let Ok(v) = level.trim().parse::<f64>() {
                        amp.vva_level = v;
                    }
                    "OK".to_string()
                } else {
                    "OK".to_string()
                }
            }
        };
        self.reply(device, line);
    }

    fn disconnect_all(&mut self) {
        self.amps.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    fn fleet_with_events() -> (SimFleet, crossbeam_channel::Receiver<AmpEvent>) {
        let (tx, rx) = unbounded();
        (SimFleet::new(tx), rx)
    }

    fn next_line(rx: &crossbeam_channel::Receiver<AmpEvent>) -> String {
        match rx.try_recv().expect("event pending") {
            AmpEvent::Line { line, .. } => line,
            AmpEvent::Fault { line, .. } => panic!("unexpected fault: {line}"),
        }
    }

    #[test]
    fn reports_mode_transitions() {
        let (mut fleet, rx) = fleet_with_events();
        let devs = fleet.discover().expect("discover");
        let dev = &devs[0];

        fleet.get_mode(dev);
        assert_eq!(next_line(&rx), "STANDBY, VVA");

        fleet.set_mode("ALC", dev);
        let _ = next_line(&rx);
        fleet.set_online(dev);
        let _ = next_line(&rx);
        fleet.get_mode(dev);
        assert_eq!(next_line(&rx), "ONLINE, ALC");
    }

    #[test]
    fn forward_power_follows_mode() {
        let (mut fleet, rx) = fleet_with_events();
        let devs = fleet.discover().expect("discover");
        let dev = devs[0].clone();
        fleet.set_fwd_pwr(&dev, 29.95);

        fleet.get_fwd_pwr(&dev);
        assert_eq!(next_line(&rx), "29.95 dBm");

        fleet.set_mode("ALC", &dev);
        let _ = next_line(&rx);
        fleet.set_alc_lvl(20.0, &dev);
        let _ = next_line(&rx);
        fleet.get_fwd_pwr(&dev);
        assert_eq!(next_line(&rx), "20.00 dBm");
    }

    #[test]
    fn injected_error_lines_go_to_the_fault_stream() {
        let (mut fleet, rx) = fleet_with_events();
        let devs = fleet.discover().expect("discover");
        fleet.inject_line(&devs[0], "ERROR: PA overtemp");
        assert!(matches!(
            rx.try_recv().expect("event"),
            AmpEvent::Fault { .. }
        ));
    }

    #[test]
    fn unknown_device_is_ignored() {
        let (mut fleet, rx) = fleet_with_events();
        let _ = fleet.discover().expect("discover");
        fleet.send("/dev/nope", "MODE?");
        assert!(rx.try_recv().is_err());
    }
}
