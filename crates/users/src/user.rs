use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, DomainResult, UserId};

/// A registered user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    /// Kept for authentication flows; never serialized back out.
    #[serde(skip_serializing)]
    pub password: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Incoming payload for creating or replacing a user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub is_active: Option<bool>,
}

impl NewUser {
    /// Validate the payload.
    ///
    /// Checks run in a fixed order and the first violation wins, so error
    /// messages stay stable for clients.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.is_empty() || self.email.is_empty() || self.password.is_empty() {
            return Err(DomainError::validation("Missing required fields"));
        }
        if self.password.len() < 6 {
            return Err(DomainError::validation(
                "Password must be at least 6 characters long",
            ));
        }
        if !is_valid_email(&self.email) {
            return Err(DomainError::validation("Invalid email format"));
        }
        Ok(())
    }
}

impl User {
    /// Create a fresh account from a validated payload. New accounts are
    /// active unless the payload says otherwise.
    pub fn new(input: NewUser) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            name: input.name,
            email: input.email,
            password: input.password,
            is_active: input.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the mutable fields from a validated payload.
    pub fn update_from(&mut self, input: NewUser) {
        self.name = input.name;
        self.email = input.email;
        self.password = input.password;
        if let Some(is_active) = input.is_active {
            self.is_active = is_active;
        }
        self.updated_at = Utc::now();
    }
}

/// Shape check equivalent to `^[^\s@]+@[^\s@]+\.[^\s@]+$`: one `@`, a dotted
/// domain, no whitespace anywhere.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: &str, email: &str, password: &str) -> NewUser {
        NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            is_active: None,
        }
    }

    #[test]
    fn valid_payload_passes() {
        assert!(payload("Ada", "ada@example.com", "hunter22").validate().is_ok());
    }

    #[test]
    fn missing_fields_are_rejected_first() {
        let err = payload("", "ada@example.com", "hunter22")
            .validate()
            .unwrap_err();
        assert_eq!(err, DomainError::validation("Missing required fields"));

        let err = payload("Ada", "", "hunter22").validate().unwrap_err();
        assert_eq!(err, DomainError::validation("Missing required fields"));
    }

    #[test]
    fn short_password_is_rejected() {
        let err = payload("Ada", "ada@example.com", "12345").validate().unwrap_err();
        assert_eq!(
            err,
            DomainError::validation("Password must be at least 6 characters long")
        );
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for email in [
            "not-an-email",
            "a@b",
            "a@b.",
            "@example.com",
            "ada@",
            "ada @example.com",
            "ada@exa mple.com",
            "ada@@example.com",
        ] {
            let err = payload("Ada", email, "hunter22").validate().unwrap_err();
            assert_eq!(err, DomainError::validation("Invalid email format"), "{email}");
        }
    }

    #[test]
    fn dotted_hosts_are_accepted() {
        assert!(payload("Ada", "ada@mail.example.co.uk", "hunter22")
            .validate()
            .is_ok());
    }

    #[test]
    fn new_accounts_default_to_active() {
        let user = User::new(payload("Ada", "ada@example.com", "hunter22"));
        assert!(user.is_active);
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn update_replaces_fields_and_touches_timestamp() {
        let mut user = User::new(payload("Ada", "ada@example.com", "hunter22"));
        let created_at = user.created_at;

        let mut input = payload("Ada L.", "ada@example.org", "hunter223");
        input.is_active = Some(false);
        user.update_from(input);

        assert_eq!(user.name, "Ada L.");
        assert_eq!(user.email, "ada@example.org");
        assert!(!user.is_active);
        assert_eq!(user.created_at, created_at);
        assert!(user.updated_at >= created_at);
    }
}
