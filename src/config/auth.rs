//! Authentication configuration
//!
//! Staff devices authenticate with pre-shared tokens. `staff_tokens` is a
//! comma-separated list of `token=sales` or `token=station:<id>` entries.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;
use crate::domain::foundation::StationId;

/// Authentication configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// Token granting the admin scope
    pub admin_token: Option<SecretString>,

    /// Staff token table, see module docs
    #[serde(default)]
    pub staff_tokens: Option<SecretString>,
}

/// One parsed staff token entry.
#[derive(Debug, Clone)]
pub struct StaffToken {
    pub token: SecretString,
    pub station_id: Option<StationId>,
}

impl AuthConfig {
    /// Parses `staff_tokens`.
    pub fn staff_tokens(&self) -> Result<Vec<StaffToken>, ValidationError> {
        let Some(raw) = &self.staff_tokens else {
            return Ok(Vec::new());
        };

        raw.expose_secret()
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(parse_entry)
            .collect()
    }

    /// Validate authentication configuration
    ///
    /// Production deployments must configure an admin token.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        let has_admin = self
            .admin_token
            .as_ref()
            .is_some_and(|t| !t.expose_secret().is_empty());
        if *environment == Environment::Production && !has_admin {
            return Err(ValidationError::AdminTokenRequired);
        }
        self.staff_tokens()?;
        Ok(())
    }
}

fn parse_entry(entry: &str) -> Result<StaffToken, ValidationError> {
    // Report the role part only; the token itself is secret.
    let invalid = |role: &str| ValidationError::InvalidStaffToken(format!("role '{}'", role));

    let (token, role) = entry
        .split_once('=')
        .ok_or_else(|| ValidationError::InvalidStaffToken("expected token=role".to_string()))?;
    let token = token.trim();
    let role = role.trim();
    if token.is_empty() {
        return Err(ValidationError::InvalidStaffToken("empty token".to_string()));
    }

    let station_id = match role.split_once(':') {
        None if role == "sales" => None,
        Some(("station", id)) => Some(id.parse::<StationId>().map_err(|_| invalid(role))?),
        _ => return Err(invalid(role)),
    };

    Ok(StaffToken {
        token: SecretString::new(token.to_string()),
        station_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_staff(raw: &str) -> AuthConfig {
        AuthConfig {
            admin_token: None,
            staff_tokens: Some(SecretString::new(raw.to_string())),
        }
    }

    #[test]
    fn test_parses_staff_tokens() {
        let tokens = with_staff("till-1=sales, grill=station:3").staff_tokens().unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].token.expose_secret(), "till-1");
        assert_eq!(tokens[0].station_id, None);
        assert_eq!(tokens[1].station_id, Some(StationId::new(3)));
    }

    #[test]
    fn test_rejects_unknown_roles() {
        for raw in ["till=chef", "grill=station:x", "=sales", "nope"] {
            assert!(
                matches!(
                    with_staff(raw).staff_tokens(),
                    Err(ValidationError::InvalidStaffToken(_))
                ),
                "{} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_production_requires_admin_token() {
        let config = AuthConfig::default();
        assert!(config.validate(&Environment::Development).is_ok());
        assert_eq!(
            config.validate(&Environment::Production),
            Err(ValidationError::AdminTokenRequired)
        );

        let config = AuthConfig {
            admin_token: Some(SecretString::new("s3cret".to_string())),
            staff_tokens: None,
        };
        assert!(config.validate(&Environment::Production).is_ok());
    }
}
