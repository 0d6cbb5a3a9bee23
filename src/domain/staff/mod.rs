//! Staff accounts.
//!
//! A user's audience scope follows from their station assignment: users
//! bound to a station get the station role, everyone else works sales.

use crate::domain::foundation::{AuthScope, StationId, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub station_id: Option<StationId>,
}

impl User {
    pub fn new(id: UserId, username: impl Into<String>, station_id: Option<StationId>) -> Self {
        Self {
            id,
            username: username.into(),
            station_id,
        }
    }

    pub fn scope(&self) -> AuthScope {
        match self.station_id {
            Some(station_id) => AuthScope::station(station_id),
            None => AuthScope::sales(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Role;

    #[test]
    fn station_assignment_decides_role() {
        let cook = User::new(UserId::new(1), "cook", Some(StationId::new(3)));
        assert_eq!(cook.scope(), AuthScope::station(StationId::new(3)));

        let cashier = User::new(UserId::new(2), "cashier", None);
        assert_eq!(cashier.scope().role, Role::Sales);
    }
}
