use crate::errors::{AppError, AppResult, ErrorCode};

pub const PHONE_DIGITS: usize = 10;
pub const MIN_AGE: i32 = 18;
pub const MAX_AGE: i32 = 100;

/// Keeps the digits of a phone number, dropping spaces, dashes and a `+91` prefix.
pub fn normalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.len() {
        12 if digits.starts_with("91") => digits[2..].to_string(),
        11 if digits.starts_with('0') => digits[1..].to_string(),
        _ => digits,
    }
}

pub fn validate_phone(raw: &str) -> AppResult<String> {
    let phone = normalize_phone(raw);
    if phone.len() != PHONE_DIGITS {
        return Err(AppError::new(
            ErrorCode::InvalidPhone,
            format!("phone number must have {PHONE_DIGITS} digits"),
        ));
    }
    Ok(phone)
}

pub fn validate_age(age: i32) -> AppResult<()> {
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(AppError::new(
            ErrorCode::InvalidAge,
            format!("age must be between {MIN_AGE} and {MAX_AGE}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("9840012345", "9840012345")]
    #[case("+91 98400 12345", "9840012345")]
    #[case("098400-12345", "9840012345")]
    fn phone_numbers_are_normalized(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(validate_phone(raw).unwrap(), expected);
    }

    #[rstest]
    #[case("12345")]
    #[case("98400123456789")]
    #[case("")]
    fn bad_phone_numbers_are_rejected(#[case] raw: &str) {
        assert!(validate_phone(raw).is_err());
    }

    #[test]
    fn age_bounds_are_inclusive() {
        assert!(validate_age(18).is_ok());
        assert!(validate_age(100).is_ok());
        assert!(validate_age(17).is_err());
        assert!(validate_age(101).is_err());
    }
}
