#![cfg_attr(not(test), no_std)]
//! embedded-hal driver for the Honeywell HPMA115S0 particulate matter sensor.
//!
//! The sensor talks over a 9600 baud UART. The driver only needs the
//! `embedded-hal-nb` serial traits and a delay; opening and configuring the
//! port is left to the caller.
//!
//! ```no_run
//! # fn demo<S, D>(serial: S, delay: D)
//! # where
//! #     S: embedded_hal_nb::serial::Read<u8> + embedded_hal_nb::serial::Write<u8>,
//! #     D: embedded_hal::delay::DelayNs,
//! # {
//! use hpma115s0_rs::Hpma115s0;
//!
//! let mut sensor = Hpma115s0::new(serial, delay);
//! sensor.init().ok();
//! if let Ok(measurement) = sensor.read_particle_measurement() {
//!     log::info!("PM2.5 {} PM10 {}", measurement.pm2_5, measurement.pm10);
//! }
//! # }
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal_nb::serial::{ErrorType, Read, Write};
use log::{debug, error, warn};

mod checksum;
pub mod commands;
pub mod config;
pub mod error;
pub mod frame;
pub mod types;

pub use commands::Command;
pub use config::Config;
pub use error::Error;
pub use frame::{Frame, FrameReader};
pub use types::{Measurement, OperatingMode, Status};

use commands::{ACK, ADJUSTMENT_COEFFICIENT_RANGE, CMD_HEAD, NACK, RESP_HEAD};

/// HPMA115S0 sensor instance. Use related methods to take measurements.
pub struct Hpma115s0<SERIAL, D> {
    serial: SERIAL,
    delay: D,
    config: Config,
    pm2_5: u16,
    pm10: u16,
    status: Status,
    mode: OperatingMode,
}

impl<SERIAL, D, E> Hpma115s0<SERIAL, D>
where
    SERIAL: ErrorType<Error = E> + Read<u8> + Write<u8>,
    D: DelayNs,
{
    /// Creates a driver with the default [`Config`]. The serial port must
    /// already be open at 9600 8N1.
    pub fn new(serial: SERIAL, delay: D) -> Self {
        Self::with_config(serial, delay, Config::default())
    }

    pub fn with_config(serial: SERIAL, delay: D, config: Config) -> Self {
        Self {
            serial,
            delay,
            config,
            pm2_5: 0,
            pm10: 0,
            status: Status::Error,
            mode: OperatingMode::Idle,
        }
    }

    /// Starts measuring and switches auto-send off, leaving the sensor ready
    /// to be polled with [`read_particle_measurement`](Self::read_particle_measurement).
    pub fn init(&mut self) -> Result<(), Error<E>> {
        self.delay.delay_ms(self.config.settle_delay_ms);
        self.start_particle_measurement().map_err(|e| {
            error!("Failed to start measurement during init");
            e
        })?;
        self.delay.delay_ms(self.config.settle_delay_ms);
        self.disable_auto_send().map_err(|e| {
            error!("Failed to disable auto-send during init");
            e
        })?;
        debug!("HPMA115S0 init sequence complete");
        Ok(())
    }

    /// Sends a read command and waits for the measurement response.
    ///
    /// On failure the cached readings keep their previous values and
    /// [`status`](Self::status) becomes [`Status::Error`].
    pub fn read_particle_measurement(&mut self) -> Result<Measurement, Error<E>> {
        if matches!(self.mode, OperatingMode::Idle | OperatingMode::Stopped) {
            debug!("Polling measurement while {:?}", self.mode);
        }
        let frame = self.request(Command::ReadParticleMeasurement)?;

        let mut data = [0u8; 4];
        data.copy_from_slice(frame.data());
        let measurement = Measurement::from_payload(&data);
        self.pm2_5 = measurement.pm2_5;
        self.pm10 = measurement.pm10;
        debug!(
            "PM2.5: {} μg/m³, PM10: {} μg/m³",
            measurement.pm2_5, measurement.pm10
        );
        Ok(measurement)
    }

    pub fn start_particle_measurement(&mut self) -> Result<(), Error<E>> {
        self.control(Command::StartParticleMeasurement, OperatingMode::Measuring)
    }

    pub fn stop_particle_measurement(&mut self) -> Result<(), Error<E>> {
        self.control(Command::StopParticleMeasurement, OperatingMode::Stopped)
    }

    pub fn enable_auto_send(&mut self) -> Result<(), Error<E>> {
        self.control(Command::EnableAutoSend, OperatingMode::AutoSend)
    }

    pub fn disable_auto_send(&mut self) -> Result<(), Error<E>> {
        self.control(Command::StopAutoSend, OperatingMode::Stopped)
    }

    /// Writes the customer adjustment coefficient, in percent (30..=200).
    pub fn set_adjustment_coefficient(&mut self, coefficient: u8) -> Result<(), Error<E>> {
        if !ADJUSTMENT_COEFFICIENT_RANGE.contains(&coefficient) {
            warn!("Adjustment coefficient {} out of range", coefficient);
            return Err(Error::InvalidArgument);
        }
        self.send_command(Command::SetAdjustmentCoefficient(coefficient))?;
        if self.config.check_ack {
            self.read_ack()?;
        }
        Ok(())
    }

    /// Reads back the customer adjustment coefficient, in percent.
    pub fn read_adjustment_coefficient(&mut self) -> Result<u8, Error<E>> {
        let frame = self.request(Command::ReadAdjustmentCoefficient)?;
        Ok(frame.data()[0])
    }

    /// Latest good PM2.5 reading [μg/m³]. Does not touch the serial port.
    pub fn pm2_5(&self) -> u16 {
        self.pm2_5
    }

    /// Latest good PM10 reading [μg/m³]. Does not touch the serial port.
    pub fn pm10(&self) -> u16 {
        self.pm10
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Destroys the driver and returns the serial port and delay.
    pub fn release(self) -> (SERIAL, D) {
        (self.serial, self.delay)
    }

    /// Frames `command` and writes it to the serial port.
    pub fn send_command(&mut self, command: Command) -> Result<(), Error<E>> {
        let frame = Frame::encode(CMD_HEAD, command.code(), command.params())
            .map_err(|_| Error::InvalidArgument)?;
        debug!("Sending {:?}: {:02X?}", command, frame.as_bytes());
        for &byte in frame.as_bytes() {
            nb::block!(self.serial.write(byte)).map_err(Error::Serial)?;
        }
        nb::block!(self.serial.flush()).map_err(Error::Serial)
    }

    /// Reads until a response to `expected` arrives or `budget` serial polls
    /// are used up, and records the outcome in [`status`](Self::status).
    pub fn read_response(&mut self, expected: Command, budget: u32) -> Result<Frame, Error<E>> {
        let result = self.scan_response(expected, budget);
        self.record(result)
    }

    fn request(&mut self, command: Command) -> Result<Frame, Error<E>> {
        let budget = self.config.read_attempts;
        let result = self
            .send_command(command)
            .and_then(|_| self.scan_response(command, budget));
        self.record(result)
    }

    fn record(&mut self, result: Result<Frame, Error<E>>) -> Result<Frame, Error<E>> {
        self.status = match result {
            Ok(_) => Status::Ok,
            Err(_) => Status::Error,
        };
        result
    }

    fn scan_response(&mut self, expected: Command, budget: u32) -> Result<Frame, Error<E>> {
        let mut reader = FrameReader::new(RESP_HEAD);
        for _ in 0..budget {
            let Some(byte) = self.poll_byte()? else {
                continue;
            };
            let frame = match reader.push(byte) {
                None => continue,
                Some(Err(e)) => {
                    warn!("Rejected response frame: {:?}", e);
                    return Err(e.into());
                }
                Some(Ok(frame)) => frame,
            };
            debug!("Received frame: {:02X?}", frame.as_bytes());

            if frame.command() != expected.code() {
                warn!(
                    "Response for command {:02X}, expected {:02X}",
                    frame.command(),
                    expected.code()
                );
                return Err(Error::CommandMismatch {
                    expected: expected.code(),
                    actual: frame.command(),
                });
            }
            if let Some(len) = expected.response_len() {
                if frame.data().len() != len {
                    warn!(
                        "Response to {:?} carries {} data bytes, expected {}",
                        expected,
                        frame.data().len(),
                        len
                    );
                    return Err(Error::Length(frame.length()));
                }
            }
            return Ok(frame);
        }

        if reader.in_frame() {
            error!("Read budget of {} exhausted mid-frame", budget);
            Err(Error::Truncated)
        } else {
            error!("No response to {:?} after {} polls", expected, budget);
            Err(Error::Timeout)
        }
    }

    fn read_ack(&mut self) -> Result<(), Error<E>> {
        let mut previous = None;
        for _ in 0..self.config.read_attempts {
            let Some(byte) = self.poll_byte()? else {
                continue;
            };
            match (previous, byte) {
                (Some(ACK), ACK) => return Ok(()),
                (Some(NACK), NACK) => {
                    warn!("Command rejected by sensor");
                    return Err(Error::Nack);
                }
                _ => previous = Some(byte),
            }
        }
        error!("No ack after {} polls", self.config.read_attempts);
        Err(Error::Timeout)
    }

    fn control(&mut self, command: Command, mode: OperatingMode) -> Result<(), Error<E>> {
        self.send_command(command)?;
        if self.config.check_ack {
            self.read_ack()?;
        }
        debug!("Mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        Ok(())
    }

    fn poll_byte(&mut self) -> Result<Option<u8>, Error<E>> {
        match self.serial.read() {
            Ok(byte) => Ok(Some(byte)),
            Err(nb::Error::WouldBlock) => {
                self.delay.delay_us(self.config.poll_interval_us);
                Ok(None)
            }
            Err(nb::Error::Other(e)) => Err(Error::Serial(e)),
        }
    }
}
