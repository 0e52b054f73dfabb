/// Driver timing and protocol options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Serial polls allowed while waiting for one response.
    pub read_attempts: u32,
    /// Wait between polls that found no byte [µs].
    pub poll_interval_us: u32,
    /// Wait before each step of [`init`](crate::Hpma115s0::init) [ms].
    pub settle_delay_ms: u32,
    /// Wait for the ack/nack pair after each control command.
    pub check_ack: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            read_attempts: 256,
            poll_interval_us: 1_000,
            settle_delay_ms: 100,
            check_ack: false,
        }
    }
}

impl Config {
    pub fn with_read_attempts(mut self, read_attempts: u32) -> Self {
        self.read_attempts = read_attempts;
        self
    }

    pub fn with_poll_interval_us(mut self, poll_interval_us: u32) -> Self {
        self.poll_interval_us = poll_interval_us;
        self
    }

    pub fn with_settle_delay_ms(mut self, settle_delay_ms: u32) -> Self {
        self.settle_delay_ms = settle_delay_ms;
        self
    }

    pub fn with_check_ack(mut self, check_ack: bool) -> Self {
        self.check_ack = check_ack;
        self
    }
}
