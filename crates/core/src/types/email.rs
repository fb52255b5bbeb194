//! Sign-in email address.

use core::fmt;

/// Longest address a mail server must accept (RFC 5321).
const MAX_EMAIL_LEN: usize = 254;

/// Why a sign-in address was refused before reaching the backend.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("email is required")]
    Empty,
    #[error("email is longer than {MAX_EMAIL_LEN} characters")]
    TooLong,
    #[error("email must not contain spaces")]
    ContainsWhitespace,
    /// No `@`, more than one, or nothing on one side of it.
    #[error("email must look like name@domain")]
    Malformed,
}

/// An address typed into the sign-in form, trimmed and checked locally.
///
/// The backend owns the real account lookup; this only keeps obviously
/// broken input from costing a round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    /// # Errors
    ///
    /// Returns an [`EmailError`] describing the first check that failed.
    pub fn parse(input: &str) -> Result<Self, EmailError> {
        let email = input.trim();
        if email.is_empty() {
            return Err(EmailError::Empty);
        }
        if email.len() > MAX_EMAIL_LEN {
            return Err(EmailError::TooLong);
        }
        if email.chars().any(char::is_whitespace) {
            return Err(EmailError::ContainsWhitespace);
        }
        let (name, domain) = email.split_once('@').ok_or(EmailError::Malformed)?;
        if name.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(EmailError::Malformed);
        }
        Ok(Self(email.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_form_input_and_trims() {
        let email = Email::parse("  shopper@example.com\n").unwrap();
        assert_eq!(email.as_str(), "shopper@example.com");
        assert_eq!(email.to_string(), "shopper@example.com");
        assert!(Email::parse("first.last+orders@shop.co.in").is_ok());
    }

    #[test]
    fn test_blank_input() {
        assert_eq!(Email::parse(""), Err(EmailError::Empty));
        assert_eq!(Email::parse(" \t "), Err(EmailError::Empty));
    }

    #[test]
    fn test_overlong_input() {
        let long = format!("{}@example.com", "a".repeat(MAX_EMAIL_LEN));
        assert_eq!(Email::parse(&long), Err(EmailError::TooLong));
    }

    #[test]
    fn test_inner_whitespace() {
        assert_eq!(
            Email::parse("shop per@example.com"),
            Err(EmailError::ContainsWhitespace)
        );
    }

    #[test]
    fn test_at_sign_placement() {
        for input in ["shopper", "@example.com", "shopper@", "a@b@example.com"] {
            assert_eq!(Email::parse(input), Err(EmailError::Malformed), "{input}");
        }
    }
}
