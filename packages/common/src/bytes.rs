//! Byte slice helpers

/// Strip every trailing occurrence of `byte` from `bytes`.
///
/// ```
/// use jwtsmith_common::bytes::trim_trailing;
///
/// assert_eq!(trim_trailing(b"key\n\n", b'\n'), b"key");
/// assert_eq!(trim_trailing(b"\n\n", b'\n'), b"");
/// ```
#[must_use]
pub fn trim_trailing(bytes: &[u8], byte: u8) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|&b| b != byte)
        .map_or(0, |index| index + 1);
    &bytes[..end]
}
