use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::user::errors::EmailError;
use crate::user::errors::NameError;
use crate::user::errors::PasswordPolicyError;
use crate::user::errors::UserIdError;

/// User aggregate entity.
///
/// Owned by the user store. The password hash never leaves the domain layer.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email: EmailAddress,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Claim identity for tokens minted for this user.
    pub fn identity(&self) -> auth::Identity {
        auth::Identity {
            id: self.id.to_string(),
            email: self.email.as_str().to_string(),
            first_name: self.first_name.as_str().to_string(),
            last_name: self.last_name.as_str().to_string(),
        }
    }
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// First or last name of a user.
///
/// Trimmed, never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    /// Create a validated name.
    ///
    /// # Arguments
    /// * `field` - Human readable field name used in the error
    /// * `name` - Raw name
    ///
    /// # Errors
    /// * `Empty` - Name is blank after trimming
    pub fn new(field: &'static str, name: String) -> Result<Self, NameError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(NameError::Empty(field));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Get email as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password accepted for a new account.
///
/// At least eight ASCII letters and digits, with one lowercase letter, one
/// uppercase letter and one digit. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct NewPassword(String);

impl NewPassword {
    const MIN_LENGTH: usize = 8;

    /// Validate a new password against its confirmation.
    ///
    /// # Errors
    /// * `Empty` - Password is empty
    /// * `InvalidCharacters` - Contains anything other than ASCII letters and digits
    /// * `TooWeak` - Too short or missing a character class
    /// * `ConfirmationMismatch` - Confirmation differs
    pub fn new(password: String, confirmation: &str) -> Result<Self, PasswordPolicyError> {
        if password.is_empty() {
            return Err(PasswordPolicyError::Empty);
        }

        if !password.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(PasswordPolicyError::InvalidCharacters);
        }

        let strong = password.len() >= Self::MIN_LENGTH
            && password.chars().any(|c| c.is_ascii_lowercase())
            && password.chars().any(|c| c.is_ascii_uppercase())
            && password.chars().any(|c| c.is_ascii_digit());
        if !strong {
            return Err(PasswordPolicyError::TooWeak {
                min: Self::MIN_LENGTH,
            });
        }

        if password != confirmation {
            return Err(PasswordPolicyError::ConfirmationMismatch);
        }

        Ok(Self(password))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for NewPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NewPassword(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_name_trimmed() {
        let name = PersonName::new("First name", "  Ada ".to_string()).unwrap();
        assert_eq!(name.as_str(), "Ada");
    }

    #[test]
    fn test_person_name_blank() {
        assert_eq!(
            PersonName::new("Last name", "   ".to_string()),
            Err(NameError::Empty("Last name"))
        );
    }

    #[test]
    fn test_email_validation() {
        assert!(EmailAddress::new("a@x.com".to_string()).is_ok());
        assert!(EmailAddress::new("not-an-email".to_string()).is_err());
    }

    #[test]
    fn test_new_password_accepts_policy() {
        let password = NewPassword::new("Abcd1234".to_string(), "Abcd1234").unwrap();
        assert_eq!(password.expose(), "Abcd1234");
    }

    #[test]
    fn test_new_password_rejections() {
        assert_eq!(
            NewPassword::new(String::new(), ""),
            Err(PasswordPolicyError::Empty)
        );
        assert_eq!(
            NewPassword::new("Abc123".to_string(), "Abc123"),
            Err(PasswordPolicyError::TooWeak { min: 8 })
        );
        assert_eq!(
            NewPassword::new("abcd1234".to_string(), "abcd1234"),
            Err(PasswordPolicyError::TooWeak { min: 8 })
        );
        assert_eq!(
            NewPassword::new("ABCDefgh".to_string(), "ABCDefgh"),
            Err(PasswordPolicyError::TooWeak { min: 8 })
        );
        assert_eq!(
            NewPassword::new("Abcd 1234".to_string(), "Abcd 1234"),
            Err(PasswordPolicyError::InvalidCharacters)
        );
        assert_eq!(
            NewPassword::new("Abcd1234".to_string(), "Abcd12345"),
            Err(PasswordPolicyError::ConfirmationMismatch)
        );
    }

    #[test]
    fn test_new_password_debug_redacted() {
        let password = NewPassword::new("Abcd1234".to_string(), "Abcd1234").unwrap();
        assert!(!format!("{:?}", password).contains("Abcd1234"));
    }

    #[test]
    fn test_identity_from_user() {
        let user = User {
            id: UserId::new(),
            first_name: PersonName::new("First name", "Ada".to_string()).unwrap(),
            last_name: PersonName::new("Last name", "Lovelace".to_string()).unwrap(),
            email: EmailAddress::new("a@x.com".to_string()).unwrap(),
            password_hash: "$argon2id$test_hash".to_string(),
            created_at: Utc::now(),
        };

        let identity = user.identity();
        assert_eq!(identity.id, user.id.to_string());
        assert_eq!(identity.email, "a@x.com");
        assert_eq!(identity.first_name, "Ada");
        assert_eq!(identity.last_name, "Lovelace");
    }
}
