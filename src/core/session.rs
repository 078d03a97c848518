//! Explicit credential handle
//!
//! Every authenticated backend call takes a `&Session`. There is no ambient
//! token storage: whoever holds the session decides which calls it authorizes.

use crate::entities::account::{Admin, LoginGrant};
use std::fmt;

/// Bearer token that never shows up in `Debug` or `Display` output
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Exposes the raw token. Only the HTTP layer should need this.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    /// `Authorization` header value
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BearerToken(***REDACTED***)")
    }
}

impl fmt::Display for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***REDACTED***")
    }
}

/// An authenticated admin session
#[derive(Debug, Clone)]
pub struct Session {
    token: BearerToken,
    admin: Option<Admin>,
}

impl Session {
    /// Session for a token issued earlier (e.g. read from the environment)
    pub fn from_token(token: impl Into<String>) -> Self {
        Self {
            token: BearerToken::new(token),
            admin: None,
        }
    }

    pub fn token(&self) -> &BearerToken {
        &self.token
    }

    /// The admin the token was issued to, when known
    pub fn admin(&self) -> Option<&Admin> {
        self.admin.as_ref()
    }
}

impl From<LoginGrant> for Session {
    fn from(grant: LoginGrant) -> Self {
        Self {
            token: BearerToken::new(grant.token),
            admin: Some(grant.admin),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_is_redacted() {
        let session = Session::from_token("eyJhbGciOi.secret");
        let rendered = format!("{:?}", session);
        assert!(!rendered.contains("secret"));
        assert_eq!(session.token().to_string(), "***REDACTED***");
        assert_eq!(session.token().header_value(), "Bearer eyJhbGciOi.secret");
    }

    #[test]
    fn test_session_from_grant_keeps_admin() {
        let session = Session::from(LoginGrant {
            token: "t".into(),
            admin: Admin {
                id: "a1".into(),
                email: "ops@example.com".into(),
                name: "Ops".into(),
                role: "superadmin".into(),
            },
        });
        assert_eq!(session.admin().map(|a| a.role.as_str()), Some("superadmin"));
        assert_eq!(session.token().expose_secret(), "t");
    }
}
