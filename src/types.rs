use crate::commands::{OFF, ON};

/// HPMA115S0 particle measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    /// Mass Concentration PM2.5 [μg/m³]
    pub pm2_5: u16,
    /// Mass Concentration PM10 [μg/m³]
    pub pm10: u16,
}

impl Measurement {
    pub(crate) fn from_payload(data: &[u8; 4]) -> Self {
        Self {
            pm2_5: u16::from_be_bytes([data[0], data[1]]),
            pm10: u16::from_be_bytes([data[2], data[3]]),
        }
    }
}

/// Outcome of the most recent read attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    /// The last read produced a valid frame.
    Ok = ON,
    /// Nothing read yet, or the last read failed.
    Error = OFF,
}

impl From<Status> for u8 {
    fn from(status: Status) -> u8 {
        status as u8
    }
}

/// Sensor mode as driven by the commands sent so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatingMode {
    /// No mode command sent since construction.
    Idle,
    /// Particle measurement started; values are polled.
    Measuring,
    /// The sensor pushes measurements on its own.
    AutoSend,
    /// Measurement or auto-send stopped.
    Stopped,
}
