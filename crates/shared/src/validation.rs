//! Field validators used by request DTOs via `#[validate(custom(...))]`.

use validator::ValidationError;

lazy_static::lazy_static! {
    static ref PHONE_REGEX: regex::Regex =
        regex::Regex::new(r"^\+?[0-9][0-9 \-]{5,18}[0-9]$").unwrap();
    static ref ACCOUNT_NUMBER_REGEX: regex::Regex =
        regex::Regex::new(r"^[A-Za-z0-9]{6,34}$").unwrap();
    static ref IBAN_REGEX: regex::Regex =
        regex::Regex::new(r"^[A-Z]{2}[0-9]{2}[A-Z0-9]{11,30}$").unwrap();
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Rejects strings that are empty after trimming.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(error("blank", "Field must not be blank"))
    } else {
        Ok(())
    }
}

/// Validates a phone number: optional leading `+`, digits, spaces and dashes.
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    if PHONE_REGEX.is_match(value.trim()) {
        Ok(())
    } else {
        Err(error("phone_format", "Invalid phone number"))
    }
}

/// Validates a bank account number: 6-34 alphanumerics, spaces ignored.
pub fn validate_account_number(value: &str) -> Result<(), ValidationError> {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    if ACCOUNT_NUMBER_REGEX.is_match(&compact) {
        Ok(())
    } else {
        Err(error(
            "account_number_format",
            "Account number must be 6-34 letters or digits",
        ))
    }
}

/// Validates the shape of an IBAN (country code, check digits, BBAN).
pub fn validate_iban(value: &str) -> Result<(), ValidationError> {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();
    if IBAN_REGEX.is_match(&compact) {
        Ok(())
    } else {
        Err(error("iban_format", "Invalid IBAN"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_blank() {
        assert!(validate_not_blank("Court 1").is_ok());
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("").is_err());
    }

    #[test]
    fn test_phone() {
        assert!(validate_phone("+44 20 7946 0958").is_ok());
        assert!(validate_phone("555-0100").is_ok());
        assert!(validate_phone("call me").is_err());
        assert!(validate_phone("12").is_err());
    }

    #[test]
    fn test_account_number() {
        assert!(validate_account_number("12345678").is_ok());
        assert!(validate_account_number("1234 5678 90").is_ok());
        assert!(validate_account_number("123").is_err());
        assert!(validate_account_number("1234-5678").is_err());
    }

    #[test]
    fn test_iban() {
        assert!(validate_iban("GB82 WEST 1234 5698 7654 32").is_ok());
        assert!(validate_iban("de89370400440532013000").is_ok());
        assert!(validate_iban("NOTANIBAN").is_err());
    }

    #[test]
    fn test_error_message_is_set() {
        let err = validate_phone("nope").unwrap_err();
        assert_eq!(err.code, "phone_format");
        assert_eq!(err.message.unwrap(), "Invalid phone number");
    }
}
