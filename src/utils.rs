use chrono::{Datelike, NaiveDate};

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid hex payload: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    #[error("decoded page is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Decodes the portal's hex-encoded page payload back into an HTML string.
///
/// Odd-length or non-hex input is an error; nothing is dropped or replaced.
pub fn decode_hex_page(payload: &str) -> Result<String, DecodeError> {
    let bytes = hex::decode(payload)?;
    Ok(String::from_utf8(bytes)?)
}

/// Infers a student's year of study from the admission-year digits embedded
/// at positions [2, 4) of the registration number.
///
/// The academic year rolls over in July, not January. Returns `None` when
/// the registration number is too short or the digits are not numeric; no
/// bounds are clamped beyond that, so malformed-but-numeric input can yield
/// values at or below zero.
pub fn infer_student_year(registration_number: &str, today: NaiveDate) -> Option<i32> {
    let admission_year: i32 = registration_number.get(2..4)?.parse().ok()?;

    let current_year = today.year() % 100;
    let academic_year = if today.month() >= 7 {
        current_year + 1
    } else {
        current_year
    };

    let mut student_year = academic_year - admission_year;
    // Admission digits larger than the current digits mean the admission
    // year wrapped across a century boundary.
    if admission_year > current_year {
        student_year -= 1;
    }

    Some(student_year)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_hex_round_trip() {
        let page = "<html><body>RA2202211012345</body></html>";
        let decoded = decode_hex_page(&hex::encode(page)).unwrap();
        assert_eq!(decoded, page);
    }

    #[test]
    fn test_decode_hex_odd_length_is_an_error() {
        let err = decode_hex_page("3c68746d6c3").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidHex(_)));
    }

    #[test]
    fn test_decode_hex_rejects_non_hex_characters() {
        let err = decode_hex_page("3cZZ").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidHex(_)));
    }

    #[test]
    fn test_decode_hex_rejects_invalid_utf8_bytes() {
        // 0xff is never valid UTF-8.
        let err = decode_hex_page("ff").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidUtf8(_)));
    }

    #[test]
    fn test_student_year_after_july_rollover() {
        let today = NaiveDate::from_ymd_opt(2024, 8, 15).unwrap();
        assert_eq!(infer_student_year("RA2202211012345", today), Some(3));
    }

    #[test]
    fn test_student_year_before_july_rollover() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(infer_student_year("RA2202211012345", today), Some(2));
    }

    #[test]
    fn test_student_year_on_rollover_boundary() {
        let today = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        assert_eq!(infer_student_year("RA2202211012345", today), Some(3));
    }

    #[test]
    fn test_century_wraparound_correction_goes_negative() {
        // Admission digits "99" observed in 2005: the correction fires but
        // the result is still nonsense. Documented, not sanctioned.
        let today = NaiveDate::from_ymd_opt(2005, 3, 1).unwrap();
        assert_eq!(infer_student_year("RA9912345", today), Some(-95));
    }

    #[test]
    fn test_short_registration_number_yields_none() {
        let today = NaiveDate::from_ymd_opt(2024, 8, 15).unwrap();
        assert_eq!(infer_student_year("RA2", today), None);
        assert_eq!(infer_student_year("", today), None);
    }

    #[test]
    fn test_non_numeric_year_digits_yield_none() {
        let today = NaiveDate::from_ymd_opt(2024, 8, 15).unwrap();
        assert_eq!(infer_student_year("RAXX211012345", today), None);
    }
}
