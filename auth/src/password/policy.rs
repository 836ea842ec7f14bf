use thiserror::Error;

/// Symbols accepted by the strength policy.
const SYMBOLS: &str = r##"!@#$%^&*()_+={}[]:;"'<>,.?/~`-"##;

const MIN_LENGTH: usize = 8;

/// Password strength violations, one per rule class.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {MIN_LENGTH} characters long")]
    TooShort,

    #[error("Password must contain at least one uppercase letter")]
    MissingUppercase,

    #[error("Password must contain at least one digit")]
    MissingDigit,

    #[error("Password must contain at least one symbol")]
    MissingSymbol,
}

/// Check a plaintext password against the strength policy: at least 8
/// characters, one uppercase letter, one digit, and one symbol.
///
/// Applied at registration and at reset-token consumption; the existing-
/// password login path never re-checks.
///
/// # Errors
/// The first unmet rule, checked in the order length, uppercase, digit,
/// symbol.
pub fn check_strength(password: &str) -> Result<(), PasswordPolicyError> {
    if password.chars().count() < MIN_LENGTH {
        return Err(PasswordPolicyError::TooShort);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(PasswordPolicyError::MissingUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(PasswordPolicyError::MissingDigit);
    }
    if !password.chars().any(|c| SYMBOLS.contains(c)) {
        return Err(PasswordPolicyError::MissingSymbol);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_conforming_password() {
        assert_eq!(check_strength("Abcdef1!"), Ok(()));
        assert_eq!(check_strength("Sup3r-Secret"), Ok(()));
    }

    #[test]
    fn test_rejects_short_password() {
        assert_eq!(check_strength("Ab1!"), Err(PasswordPolicyError::TooShort));
    }

    #[test]
    fn test_rejects_missing_uppercase() {
        assert_eq!(
            check_strength("abcdef1!"),
            Err(PasswordPolicyError::MissingUppercase)
        );
    }

    #[test]
    fn test_rejects_missing_digit() {
        assert_eq!(
            check_strength("Abcdefg!"),
            Err(PasswordPolicyError::MissingDigit)
        );
    }

    #[test]
    fn test_rejects_missing_symbol() {
        assert_eq!(
            check_strength("Abcdefg1"),
            Err(PasswordPolicyError::MissingSymbol)
        );
    }
}
