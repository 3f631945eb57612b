//! Trait seams between the tuning engine and the outside world.
//!
//! The controller in `wavetuner_core` never touches a serial port or a child
//! process directly; it talks to an [`AmpBus`] (the amplifier fleet) and a
//! [`Waveform`] (the generator subprocess). Hardware backends and test mocks
//! implement these traits.

pub mod clock;
pub mod events;

pub use clock::{Clock, MonotonicClock};
pub use events::{AmpEvent, ExitReason, GenEvent};

/// Command transport for the amplifier fleet.
///
/// Sends are fire-and-forget: an unknown or closed device is logged and
/// skipped, never an error. Responses come back asynchronously as
/// [`AmpEvent`] records on the channel the implementation was built with.
pub trait AmpBus {
    /// Scan for amplifier devices and open a link to each.
    /// Returns the discovered identifiers in insertion order.
    fn discover(&mut self) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>>;

    /// Send one command to one device, newline-framed.
    fn send(&mut self, device: &str, command: &str);

    /// Close and release every link.
    fn disconnect_all(&mut self);

    /// Send `command` to each member of `devices`.
    fn broadcast(&mut self, devices: &[String], command: &str) {
        for device in devices {
            self.send(device, command);
        }
    }

    // Amplifier command vocabulary.

    fn get_mode(&mut self, device: &str) {
        self.send(device, "MODE?");
    }

    /// `mode` is `"VVA"` or `"ALC"`.
    fn set_mode(&mut self, mode: &str, device: &str) {
        self.send(device, &format!("MODE {mode}"));
    }

    fn set_standby(&mut self, device: &str) {
        self.send(device, "STANDBY");
    }

    fn set_online(&mut self, device: &str) {
        self.send(device, "ONLINE");
    }

    fn get_fwd_pwr(&mut self, device: &str) {
        self.send(device, "FWD_PWR?");
    }

    fn get_rev_pwr(&mut self, device: &str) {
        self.send(device, "REV_PWR?");
    }

    fn get_alc_lvl(&mut self, device: &str) {
        self.send(device, "ALC_LEVEL?");
    }

    /// Setpoints go over the wire with one decimal place.
    fn set_alc_lvl(&mut self, level: f64, device: &str) {
        self.send(device, &format!("ALC_LEVEL {level:.1}"));
    }

    fn get_vva_lvl(&mut self, device: &str) {
        self.send(device, "VVA_LEVEL?");
    }

    fn set_vva_lvl(&mut self, level: f64, device: &str) {
        self.send(device, &format!("VVA_LEVEL {level:.1}"));
    }

    fn ack_faults(&mut self, device: &str) {
        self.send(device, "ACK_FAULTS");
    }

    fn get_faults(&mut self, device: &str) {
        self.send(device, "FAULTS?");
    }

    fn get_serial_id(&mut self, device: &str) {
        self.send(device, "SERIAL?");
    }

    fn get_model_id(&mut self, device: &str) {
        self.send(device, "MODEL?");
    }
}

impl<T: AmpBus + ?Sized> AmpBus for Box<T> {
    fn discover(&mut self) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        (**self).discover()
    }
    fn send(&mut self, device: &str, command: &str) {
        (**self).send(device, command);
    }
    fn disconnect_all(&mut self) {
        (**self).disconnect_all();
    }
}

/// Lifecycle of the waveform-generator subprocess.
///
/// `start` is a no-op when a child is already alive; `stop` terminates
/// gracefully and escalates to a kill after 500 ms. Output reaches the
/// controller as [`GenEvent`] records, not through this trait.
pub trait Waveform {
    fn start(&mut self);
    fn stop(&mut self);
    fn is_running(&self) -> bool;
}

impl<T: Waveform + ?Sized> Waveform for Box<T> {
    fn start(&mut self) {
        (**self).start();
    }
    fn stop(&mut self) {
        (**self).stop();
    }
    fn is_running(&self) -> bool {
        (**self).is_running()
    }
}
