//! Frame encoding and validation.
//!
//! Every frame is `head, length, command, data.., checksum` where `length`
//! counts the command and data bytes and the checksum makes the byte sum of
//! the whole frame zero.

use crate::checksum::{checksum, is_valid};

/// Largest frame the sensor sends, checksum included.
pub const MAX_FRAME_LEN: usize = 8;
/// Largest data payload that fits in [`MAX_FRAME_LEN`].
pub const MAX_DATA_LEN: usize = MAX_FRAME_LEN - 4;

const HEAD_IDX: usize = 0;
const LEN_IDX: usize = 1;
const CMD_IDX: usize = 2;
const DATA_START_IDX: usize = 3;

/// Reasons a byte sequence is not a valid frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    Head(u8),
    Length(u8),
    Checksum { expected: u8, actual: u8 },
    Truncated,
}

/// A complete frame with a valid checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    bytes: [u8; MAX_FRAME_LEN],
    len: usize,
}

impl Frame {
    /// Builds a frame and appends its checksum.
    pub fn encode(head: u8, command: u8, data: &[u8]) -> Result<Self, FrameError> {
        if data.len() > MAX_DATA_LEN {
            return Err(FrameError::Length(data.len().min(u8::MAX as usize) as u8));
        }
        let mut bytes = [0u8; MAX_FRAME_LEN];
        bytes[HEAD_IDX] = head;
        bytes[LEN_IDX] = (data.len() + 1) as u8;
        bytes[CMD_IDX] = command;
        let end = DATA_START_IDX + data.len();
        bytes[DATA_START_IDX..end].copy_from_slice(data);
        bytes[end] = checksum(&bytes[..end]);
        Ok(Self {
            bytes,
            len: end + 1,
        })
    }

    /// Validates a complete frame. `bytes` must hold exactly one frame.
    pub fn decode(bytes: &[u8], head: u8) -> Result<Self, FrameError> {
        match bytes.first() {
            None => return Err(FrameError::Truncated),
            Some(&byte) if byte != head => return Err(FrameError::Head(byte)),
            Some(_) => {}
        }
        let length = *bytes.get(LEN_IDX).ok_or(FrameError::Truncated)?;
        if !length_in_range(length) {
            return Err(FrameError::Length(length));
        }
        let total = length as usize + 3;
        if bytes.len() < total {
            return Err(FrameError::Truncated);
        }
        if bytes.len() > total {
            return Err(FrameError::Length(length));
        }
        if !is_valid(bytes) {
            return Err(FrameError::Checksum {
                expected: checksum(&bytes[..total - 1]),
                actual: bytes[total - 1],
            });
        }

        let mut frame = [0u8; MAX_FRAME_LEN];
        frame[..total].copy_from_slice(bytes);
        Ok(Self {
            bytes: frame,
            len: total,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub fn head(&self) -> u8 {
        self.bytes[HEAD_IDX]
    }

    /// Declared length: command byte plus data bytes.
    pub fn length(&self) -> u8 {
        self.bytes[LEN_IDX]
    }

    pub fn command(&self) -> u8 {
        self.bytes[CMD_IDX]
    }

    pub fn data(&self) -> &[u8] {
        &self.bytes[DATA_START_IDX..self.len - 1]
    }

    pub fn checksum(&self) -> u8 {
        self.bytes[self.len - 1]
    }
}

fn length_in_range(length: u8) -> bool {
    length >= 1 && length as usize <= MAX_DATA_LEN + 1
}

/// Incremental scanner that assembles frames one byte at a time.
///
/// Bytes before the head sentinel are dropped. Once a head is seen the reader
/// collects exactly as many bytes as the length field announces.
#[derive(Debug)]
pub struct FrameReader {
    head: u8,
    buf: [u8; MAX_FRAME_LEN],
    filled: usize,
}

impl FrameReader {
    pub fn new(head: u8) -> Self {
        Self {
            head,
            buf: [0u8; MAX_FRAME_LEN],
            filled: 0,
        }
    }

    /// True once a head byte has been seen and the frame is not finished yet.
    pub fn in_frame(&self) -> bool {
        self.filled > 0
    }

    pub fn reset(&mut self) {
        self.filled = 0;
    }

    /// Feeds one byte. Returns `None` until a frame is complete or rejected.
    pub fn push(&mut self, byte: u8) -> Option<Result<Frame, FrameError>> {
        if self.filled == HEAD_IDX {
            if byte == self.head {
                self.buf[HEAD_IDX] = byte;
                self.filled = 1;
            }
            return None;
        }
        if self.filled == LEN_IDX && !length_in_range(byte) {
            self.reset();
            return Some(Err(FrameError::Length(byte)));
        }

        self.buf[self.filled] = byte;
        self.filled += 1;

        let total = self.buf[LEN_IDX] as usize + 3;
        if self.filled < total {
            return None;
        }
        let result = Frame::decode(&self.buf[..total], self.head);
        self.reset();
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{CMD_HEAD, RESP_HEAD};

    const MEASUREMENT: [u8; 8] = [0x40, 0x05, 0x04, 0x00, 0x23, 0x00, 0x3a, 0x5a];

    fn feed(reader: &mut FrameReader, bytes: &[u8]) -> Option<Result<Frame, FrameError>> {
        let mut last = None;
        for &byte in bytes {
            if let Some(result) = reader.push(byte) {
                last = Some(result);
            }
        }
        last
    }

    #[test]
    fn encode_read_measurement_command() {
        let frame = Frame::encode(CMD_HEAD, 0x04, &[]).unwrap();
        assert_eq!(frame.as_bytes(), &[0x68, 0x01, 0x04, 0x93]);
    }

    #[test]
    fn encode_with_parameter() {
        let frame = Frame::encode(CMD_HEAD, 0x08, &[100]).unwrap();
        assert_eq!(frame.as_bytes(), &[0x68, 0x02, 0x08, 0x64, 0x2a]);
        assert_eq!(frame.data(), &[100]);
    }

    #[test]
    fn encode_rejects_oversized_payload() {
        assert_eq!(
            Frame::encode(RESP_HEAD, 0x04, &[0; 5]),
            Err(FrameError::Length(5))
        );
    }

    #[test]
    fn encoded_frames_validate() {
        for data in [&[][..], &[0x01][..], &[0xff, 0xff][..], &[0x00, 0x23, 0x00, 0x3a][..]] {
            for command in [0x01, 0x04, 0x08, 0x40] {
                let frame = Frame::encode(RESP_HEAD, command, data).unwrap();
                assert_eq!(Frame::decode(frame.as_bytes(), RESP_HEAD), Ok(frame));
            }
        }
    }

    #[test]
    fn single_bit_flip_is_rejected() {
        let frame = Frame::encode(RESP_HEAD, 0x04, &[0x00, 0x23, 0x00, 0x3a]).unwrap();
        for idx in 0..frame.as_bytes().len() {
            for bit in 0..8 {
                let mut corrupted = [0u8; MAX_FRAME_LEN];
                corrupted.copy_from_slice(frame.as_bytes());
                corrupted[idx] ^= 1 << bit;
                assert!(
                    Frame::decode(&corrupted, RESP_HEAD).is_err(),
                    "flip of bit {} in byte {} accepted",
                    bit,
                    idx
                );
            }
        }
    }

    #[test]
    fn decode_measurement() {
        let frame = Frame::decode(&MEASUREMENT, RESP_HEAD).unwrap();
        assert_eq!(frame.head(), 0x40);
        assert_eq!(frame.length(), 5);
        assert_eq!(frame.command(), 0x04);
        assert_eq!(frame.data(), &[0x00, 0x23, 0x00, 0x3a]);
        assert_eq!(frame.checksum(), 0x5a);
    }

    #[test]
    fn decode_errors() {
        assert_eq!(Frame::decode(&[], RESP_HEAD), Err(FrameError::Truncated));
        assert_eq!(
            Frame::decode(&MEASUREMENT, CMD_HEAD),
            Err(FrameError::Head(0x40))
        );
        assert_eq!(
            Frame::decode(&MEASUREMENT[..6], RESP_HEAD),
            Err(FrameError::Truncated)
        );
        assert_eq!(
            Frame::decode(&[0x40, 0x00, 0xc0], RESP_HEAD),
            Err(FrameError::Length(0))
        );
        assert_eq!(
            Frame::decode(&[0x40, 0x01, 0x04, 0xbb, 0x00], RESP_HEAD),
            Err(FrameError::Length(1))
        );

        let mut corrupted = MEASUREMENT;
        corrupted[7] = 0xc4;
        assert_eq!(
            Frame::decode(&corrupted, RESP_HEAD),
            Err(FrameError::Checksum {
                expected: 0x5a,
                actual: 0xc4
            })
        );
    }

    #[test]
    fn reader_skips_leading_noise() {
        let mut reader = FrameReader::new(RESP_HEAD);
        assert_eq!(feed(&mut reader, &[0xa5, 0xa5, 0x00, 0x13]), None);
        assert!(!reader.in_frame());

        let frame = feed(&mut reader, &MEASUREMENT).unwrap().unwrap();
        assert_eq!(frame.as_bytes(), &MEASUREMENT);
        assert!(!reader.in_frame());
    }

    #[test]
    fn reader_reports_partial_frame() {
        let mut reader = FrameReader::new(RESP_HEAD);
        assert_eq!(feed(&mut reader, &MEASUREMENT[..5]), None);
        assert!(reader.in_frame());
        reader.reset();
        assert!(!reader.in_frame());
    }

    #[test]
    fn reader_rejects_bad_length_early() {
        let mut reader = FrameReader::new(RESP_HEAD);
        assert_eq!(reader.push(0x40), None);
        assert_eq!(reader.push(0x20), Some(Err(FrameError::Length(0x20))));
        assert!(!reader.in_frame());
    }

    #[test]
    fn reader_rejects_bad_checksum() {
        let mut reader = FrameReader::new(RESP_HEAD);
        let mut corrupted = MEASUREMENT;
        corrupted[4] = 0x24;
        assert!(matches!(
            feed(&mut reader, &corrupted),
            Some(Err(FrameError::Checksum { .. }))
        ));
    }
}
