use crate::frame::FrameError;

/// HPMA115S0 errors.
///
/// None of these leave the driver unusable; the cached readings survive and
/// the next call starts from a clean frame scanner.
#[derive(Debug)]
#[cfg_attr(feature = "thiserror", derive(thiserror::Error))]
pub enum Error<E> {
    /// The serial transport reported an error.
    #[cfg_attr(feature = "thiserror", error("serial transport error"))]
    Serial(E),
    /// No response head byte within the read budget.
    #[cfg_attr(feature = "thiserror", error("no response within the read budget"))]
    Timeout,
    /// The read budget ran out in the middle of a frame.
    #[cfg_attr(feature = "thiserror", error("response frame truncated"))]
    Truncated,
    /// A frame started with the wrong head byte.
    #[cfg_attr(feature = "thiserror", error("unexpected head byte {0:#04x}"))]
    Head(u8),
    /// The checksum byte did not match the frame contents.
    #[cfg_attr(
        feature = "thiserror",
        error("checksum mismatch: expected {expected:#04x}, got {actual:#04x}")
    )]
    Checksum { expected: u8, actual: u8 },
    /// A valid frame arrived for a different command.
    #[cfg_attr(
        feature = "thiserror",
        error("response for command {actual:#04x}, expected {expected:#04x}")
    )]
    CommandMismatch { expected: u8, actual: u8 },
    /// The length byte is out of range or does not fit the command.
    #[cfg_attr(feature = "thiserror", error("malformed frame length {0}"))]
    Length(u8),
    /// The sensor rejected the command.
    #[cfg_attr(feature = "thiserror", error("command not acknowledged"))]
    Nack,
    /// A command argument is outside the range the sensor accepts.
    #[cfg_attr(feature = "thiserror", error("invalid argument"))]
    InvalidArgument,
}

impl<E> From<FrameError> for Error<E> {
    fn from(err: FrameError) -> Self {
        match err {
            FrameError::Head(byte) => Error::Head(byte),
            FrameError::Length(len) => Error::Length(len),
            FrameError::Checksum { expected, actual } => Error::Checksum { expected, actual },
            FrameError::Truncated => Error::Truncated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Error;
    use crate::frame::{Frame, FrameError};
    use crate::commands::{CMD_HEAD, RESP_HEAD};

    #[test]
    fn foreign_head_maps_to_head_error() {
        let command = Frame::encode(CMD_HEAD, 0x04, &[]).unwrap();
        let err = Frame::decode(command.as_bytes(), RESP_HEAD).unwrap_err();
        assert_eq!(err, FrameError::Head(0x68));
        assert!(matches!(Error::<()>::from(err), Error::Head(0x68)));
    }

    #[test]
    fn frame_errors_keep_their_kind() {
        assert!(matches!(
            Error::<()>::from(FrameError::Checksum {
                expected: 0x5a,
                actual: 0xc4
            }),
            Error::Checksum {
                expected: 0x5a,
                actual: 0xc4
            }
        ));
        assert!(matches!(
            Error::<()>::from(FrameError::Length(9)),
            Error::Length(9)
        ));
        assert!(matches!(
            Error::<()>::from(FrameError::Truncated),
            Error::Truncated
        ));
    }
}
