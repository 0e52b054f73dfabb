/// Two's-complement checksum: the value that makes the wrapping sum of `data`
/// plus the checksum equal zero.
pub(crate) fn checksum(data: &[u8]) -> u8 {
    let mut sum: u8 = 0;
    for byte in data.iter().copied() {
        sum = sum.wrapping_add(byte);
    }
    return sum.wrapping_neg();
}

/// Returns true if `frame`, checksum byte included, sums to zero.
pub(crate) fn is_valid(frame: &[u8]) -> bool {
    frame.iter().fold(0u8, |sum, &b| sum.wrapping_add(b)) == 0
}
