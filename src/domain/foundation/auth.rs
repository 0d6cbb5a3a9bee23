//! Authorization scope handed to the core by the request layer.
//!
//! Credentials are parsed outside the core. Once a caller is authenticated,
//! all the core sees is an opaque [`AuthScope`]: a role plus, for station
//! staff, the station whose events they may observe.
//!
//! ```ignore
//! // In HTTP middleware, after resolving the token:
//! let scope = AuthScope::station(StationId::new(2));
//! request.extensions_mut().insert(scope);
//! ```

use serde::Serialize;
use thiserror::Error;

use super::StationId;

/// Staff role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Front-of-house staff taking orders; sees every event.
    Sales,
    /// Kitchen/bar staff bound to one station; sees only that station's events.
    Station,
    /// Dashboard operator; sees every event and may edit the catalog.
    Admin,
}

/// Audience scope of one authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthScope {
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station_id: Option<StationId>,
}

impl AuthScope {
    pub fn sales() -> Self {
        Self {
            role: Role::Sales,
            station_id: None,
        }
    }

    pub fn admin() -> Self {
        Self {
            role: Role::Admin,
            station_id: None,
        }
    }

    pub fn station(station_id: StationId) -> Self {
        Self {
            role: Role::Station,
            station_id: Some(station_id),
        }
    }

    /// Sales and admin scopes are not narrowed by station.
    pub fn is_unrestricted(&self) -> bool {
        matches!(self.role, Role::Sales | Role::Admin)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Failures while turning a credential into a scope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Missing credentials")]
    MissingCredentials,

    #[error("Invalid or unknown token")]
    InvalidToken,

    #[error("Insufficient permissions")]
    InsufficientPermissions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sales_and_admin_are_unrestricted() {
        assert!(AuthScope::sales().is_unrestricted());
        assert!(AuthScope::admin().is_unrestricted());
        assert!(!AuthScope::station(StationId::new(1)).is_unrestricted());
    }

    #[test]
    fn station_scope_carries_station() {
        let scope = AuthScope::station(StationId::new(4));
        assert_eq!(scope.role, Role::Station);
        assert_eq!(scope.station_id, Some(StationId::new(4)));
    }

    #[test]
    fn scope_serializes_for_connected_frame() {
        let json = serde_json::to_value(AuthScope::station(StationId::new(4))).unwrap();
        assert_eq!(json, serde_json::json!({"role": "station", "stationId": 4}));
        let json = serde_json::to_value(AuthScope::sales()).unwrap();
        assert_eq!(json, serde_json::json!({"role": "sales"}));
    }
}
