/// Head byte of every frame written to the sensor.
pub const CMD_HEAD: u8 = 0x68;
/// Head byte of every response frame read from the sensor.
pub const RESP_HEAD: u8 = 0x40;

/// Control byte meaning "on". Also the wire value of [`Status::Ok`](crate::types::Status::Ok).
pub const ON: u8 = 0x00;
/// Control byte meaning "off". Also the wire value of [`Status::Error`](crate::types::Status::Error).
pub const OFF: u8 = 0x01;

/// Repeated twice by the sensor to acknowledge a control command.
pub const ACK: u8 = 0xA5;
/// Repeated twice by the sensor to reject a control command.
pub const NACK: u8 = 0x96;

/// Valid range of the customer adjustment coefficient, in percent.
pub const ADJUSTMENT_COEFFICIENT_RANGE: core::ops::RangeInclusive<u8> = 30..=200;

/// HPMA115S0 UART commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Read the latest PM2.5 and PM10 values.
    ReadParticleMeasurement,
    /// Start the fan and particle measurement.
    StartParticleMeasurement,
    /// Stop the fan and particle measurement.
    StopParticleMeasurement,
    /// Write the customer adjustment coefficient [%].
    SetAdjustmentCoefficient(u8),
    /// Read back the customer adjustment coefficient.
    ReadAdjustmentCoefficient,
    /// Stop the sensor from pushing measurements on its own.
    StopAutoSend,
    /// Let the sensor push measurements on its own.
    EnableAutoSend,
}

impl Command {
    /// Command byte on the wire.
    ///
    /// Setting and reading the adjustment coefficient share `0x08` and are told
    /// apart by the presence of the parameter byte.
    pub fn code(&self) -> u8 {
        match self {
            Self::ReadParticleMeasurement => 0x04,
            Self::StartParticleMeasurement => 0x01,
            Self::StopParticleMeasurement => 0x02,
            Self::SetAdjustmentCoefficient(_) => 0x08,
            Self::ReadAdjustmentCoefficient => 0x08,
            Self::StopAutoSend => 0x20,
            Self::EnableAutoSend => 0x40,
        }
    }

    pub(crate) fn params(&self) -> &[u8] {
        match self {
            Self::SetAdjustmentCoefficient(coefficient) => core::slice::from_ref(coefficient),
            _ => &[],
        }
    }

    /// Number of data bytes in the response frame, or `None` if the sensor only
    /// answers with an ack/nack pair.
    pub(crate) fn response_len(&self) -> Option<usize> {
        match self {
            Self::ReadParticleMeasurement => Some(4),
            Self::ReadAdjustmentCoefficient => Some(1),
            _ => None,
        }
    }
}
