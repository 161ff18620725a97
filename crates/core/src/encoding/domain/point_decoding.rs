use thiserror::Error;

use super::point_encoding::PointEncoding;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DecodeError {
    #[error("binary payload of {len} bytes is not a whole number of 4-byte floats")]
    TruncatedBinary { len: usize },
    #[error("text payload is not valid UTF-8")]
    NotUtf8,
    #[error("line {line}: '{value}' is not a float")]
    InvalidText { line: usize, value: String },
}

impl PointEncoding {
    /// Reads back a buffer produced by [`PointEncoding::encode`].
    pub fn decode(self, bytes: &[u8]) -> Result<Vec<f32>, DecodeError> {
        match self {
            PointEncoding::Text => decode_text(bytes),
            PointEncoding::Binary => decode_binary(bytes),
        }
    }
}

fn decode_binary(bytes: &[u8]) -> Result<Vec<f32>, DecodeError> {
    if bytes.len() % 4 != 0 {
        return Err(DecodeError::TruncatedBinary { len: bytes.len() });
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

fn decode_text(bytes: &[u8]) -> Result<Vec<f32>, DecodeError> {
    let text = std::str::from_utf8(bytes).map_err(|_| DecodeError::NotUtf8)?;
    text.lines()
        .enumerate()
        .map(|(i, line)| {
            line.trim().parse::<f32>().map_err(|_| DecodeError::InvalidText {
                line: i + 1,
                value: line.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn roundtrip(encoding: PointEncoding, points: &[f32]) -> Vec<f32> {
        let mut out = Vec::new();
        encoding.encode(points, &mut out).unwrap();
        encoding.decode(&out).unwrap()
    }

    #[test]
    fn test_binary_roundtrip_is_bit_exact() {
        let points = [
            0.0,
            -0.0,
            1.0,
            -2.5,
            f32::MIN_POSITIVE,
            f32::MIN_POSITIVE / 8.0, // subnormal
            -1.0e-40,                // subnormal
            f32::MAX,
            f32::MIN,
            0.1,
            std::f32::consts::PI,
        ];
        let decoded = roundtrip(PointEncoding::Binary, &points);
        let original_bits: Vec<u32> = points.iter().map(|v| v.to_bits()).collect();
        let decoded_bits: Vec<u32> = decoded.iter().map(|v| v.to_bits()).collect();
        assert_eq!(decoded_bits, original_bits);
    }

    #[test]
    fn test_text_roundtrip_short_decimals_exact() {
        let points = [1.0, -2.5, 0.0, 0.25, 100.0, -7.125];
        assert_eq!(roundtrip(PointEncoding::Text, &points), points.to_vec());
    }

    #[test]
    fn test_text_roundtrip_preserves_order_and_value() {
        let points: Vec<f32> = (0..64).map(|i| (i as f32 * 0.37).sin() * 4.2).collect();
        let decoded = roundtrip(PointEncoding::Text, &points);
        assert_eq!(decoded.len(), points.len());
        for (a, b) in decoded.iter().zip(&points) {
            assert_relative_eq!(*a, *b);
        }
    }

    #[test]
    fn test_text_roundtrip_keeps_negative_zero_sign() {
        let decoded = roundtrip(PointEncoding::Text, &[-0.0]);
        assert!(decoded[0].is_sign_negative());
    }

    #[rstest]
    #[case::one_byte(1)]
    #[case::three_bytes(3)]
    #[case::five_bytes(5)]
    fn test_binary_rejects_partial_float(#[case] len: usize) {
        let err = PointEncoding::Binary.decode(&vec![0u8; len]).unwrap_err();
        assert_eq!(err, DecodeError::TruncatedBinary { len });
    }

    #[test]
    fn test_text_reports_bad_line_number() {
        let err = PointEncoding::Text.decode(b"1.0\n2.0\nabc\n").unwrap_err();
        assert_eq!(
            err,
            DecodeError::InvalidText {
                line: 3,
                value: "abc".into()
            }
        );
    }

    #[test]
    fn test_text_rejects_blank_line() {
        assert!(PointEncoding::Text.decode(b"1.0\n\n2.0\n").is_err());
    }

    #[test]
    fn test_text_accepts_crlf() {
        let decoded = PointEncoding::Text.decode(b"1.0\r\n-2.5\r\n").unwrap();
        assert_eq!(decoded, vec![1.0, -2.5]);
    }

    #[test]
    fn test_text_rejects_non_utf8() {
        let err = PointEncoding::Text.decode(&[0xFF, 0xFE]).unwrap_err();
        assert_eq!(err, DecodeError::NotUtf8);
    }

    #[rstest]
    #[case::text(PointEncoding::Text)]
    #[case::binary(PointEncoding::Binary)]
    fn test_empty_payload_decodes_to_empty(#[case] encoding: PointEncoding) {
        assert!(encoding.decode(&[]).unwrap().is_empty());
    }
}
