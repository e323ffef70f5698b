//! Trailing padding resolution for padded structured fields.

use byteorder::{BigEndian, ByteOrder};

use crate::error::{AfpError, Result};
use crate::introducer::SfFlags;

/// Number of trailing non-content bytes in `payload`.
///
/// Two encodings share the PADDED flag. A non-zero final byte is itself
/// the padding length (unsigned, 0-255). A zero final byte means the
/// length did not fit in one byte and is instead the big-endian u16 held
/// in the two bytes immediately before it. A content byte that happens to
/// be zero at the end of an unpadded-looking payload still selects the
/// second encoding; that is how the format behaves.
pub fn trailing_padding(payload: &[u8], flags: SfFlags, field_offset: u64) -> Result<usize> {
    if !flags.contains(SfFlags::PADDED) {
        return Ok(0);
    }

    let len = payload.len();
    let Some(&last) = payload.last() else {
        return Err(AfpError::MalformedField {
            offset: field_offset,
            msg: "padded field with empty payload".to_string(),
        });
    };

    let padding = if last == 0 {
        if len < 3 {
            return Err(AfpError::MalformedField {
                offset: field_offset,
                msg: format!("payload of {len} byte(s) too short for a two-byte padding length"),
            });
        }
        BigEndian::read_u16(&payload[len - 3..len - 1]) as usize
    } else {
        last as usize
    };

    if padding > len {
        return Err(AfpError::MalformedField {
            offset: field_offset,
            msg: format!("padding length {padding} exceeds payload length {len}"),
        });
    }

    Ok(padding)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpadded_field_has_no_padding() {
        let payload = [0u8; 10];
        assert_eq!(trailing_padding(&payload, SfFlags::empty(), 0).unwrap(), 0);
    }

    #[test]
    fn single_byte_mode_uses_final_byte() {
        let mut payload = vec![0x40u8; 10];
        payload[9] = 3;
        assert_eq!(trailing_padding(&payload, SfFlags::PADDED, 0).unwrap(), 3);
    }

    #[test]
    fn final_byte_is_unsigned() {
        // 0xFF must read as 255, not -1.
        let payload = vec![0x40u8; 300]
            .into_iter()
            .chain(std::iter::once(0xFF))
            .collect::<Vec<_>>();
        assert_eq!(trailing_padding(&payload, SfFlags::PADDED, 0).unwrap(), 255);
    }

    #[test]
    fn two_byte_mode_selected_by_zero_final_byte() {
        let mut payload = vec![0x40u8; 10];
        payload[7] = 0x00;
        payload[8] = 0x04;
        payload[9] = 0x00;
        assert_eq!(trailing_padding(&payload, SfFlags::PADDED, 0).unwrap(), 4);
    }

    #[test]
    fn empty_padded_payload_is_malformed() {
        assert!(matches!(
            trailing_padding(&[], SfFlags::PADDED, 7),
            Err(AfpError::MalformedField { offset: 7, .. })
        ));
    }

    #[test]
    fn short_payload_in_two_byte_mode_is_malformed() {
        assert!(matches!(
            trailing_padding(&[0x00, 0x00], SfFlags::PADDED, 0),
            Err(AfpError::MalformedField { .. })
        ));
    }

    #[test]
    fn padding_beyond_payload_is_malformed() {
        let mut payload = vec![0x40u8; 4];
        payload[3] = 9;
        assert!(matches!(
            trailing_padding(&payload, SfFlags::PADDED, 0),
            Err(AfpError::MalformedField { .. })
        ));
    }
}
