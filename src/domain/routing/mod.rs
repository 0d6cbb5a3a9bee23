//! Station routing - who is allowed to see an event.
//!
//! # Rules
//!
//! ```text
//! product event  ──▶ stations assigned that product
//! order event    ──▶ union of stations assigned any product on the order
//! every event    ──▶ sales and admin scopes
//! ```
//!
//! A product nobody is assigned yet reaches no station, only sales and admin.

use std::collections::{BTreeSet, HashMap};
use std::sync::{PoisonError, RwLock};

use crate::domain::catalog::Station;
use crate::domain::events::{DomainEvent, EventScope};
use crate::domain::foundation::{AuthScope, ProductId, Role, StationId};

/// Resolved audience of one event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Audience {
    stations: BTreeSet<StationId>,
}

impl Audience {
    pub fn stations(stations: impl IntoIterator<Item = StationId>) -> Self {
        Self {
            stations: stations.into_iter().collect(),
        }
    }

    pub fn station_ids(&self) -> &BTreeSet<StationId> {
        &self.stations
    }

    pub fn includes_station(&self, station_id: StationId) -> bool {
        self.stations.contains(&station_id)
    }

    /// Sales and admin always pass; station staff pass only for their station.
    pub fn admits(&self, scope: &AuthScope) -> bool {
        match scope.role {
            Role::Sales | Role::Admin => true,
            Role::Station => scope
                .station_id
                .map(|id| self.includes_station(id))
                .unwrap_or(false),
        }
    }
}

/// Product → stations lookup built from station assignments.
#[derive(Debug, Clone, Default)]
pub struct AssignmentIndex {
    by_product: HashMap<ProductId, BTreeSet<StationId>>,
}

impl AssignmentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_stations<'a>(stations: impl IntoIterator<Item = &'a Station>) -> Self {
        let mut index = Self::new();
        for station in stations {
            for product_id in station.products() {
                index.assign(station.id(), *product_id);
            }
        }
        index
    }

    pub fn assign(&mut self, station_id: StationId, product_id: ProductId) {
        self.by_product
            .entry(product_id)
            .or_default()
            .insert(station_id);
    }

    pub fn unassign(&mut self, station_id: StationId, product_id: ProductId) {
        if let Some(stations) = self.by_product.get_mut(&product_id) {
            stations.remove(&station_id);
            if stations.is_empty() {
                self.by_product.remove(&product_id);
            }
        }
    }

    pub fn stations_for(&self, product_id: ProductId) -> impl Iterator<Item = StationId> + '_ {
        self.by_product
            .get(&product_id)
            .into_iter()
            .flat_map(|stations| stations.iter().copied())
    }

    /// Audience of an event under the current assignments.
    pub fn audience_for(&self, event: &DomainEvent) -> Audience {
        match event.scope() {
            EventScope::Product(product_id) => Audience::stations(self.stations_for(product_id)),
            EventScope::Order(products) => Audience::stations(
                products.iter().flat_map(|product_id| self.stations_for(*product_id)),
            ),
        }
    }
}

/// Shared, live view of the assignment index.
///
/// Catalog handlers update it as assignments change; the event bus reads
/// it once per publish. Reads never wait on a store round-trip.
#[derive(Debug, Default)]
pub struct StationRouter {
    index: RwLock<AssignmentIndex>,
}

impl StationRouter {
    pub fn new(index: AssignmentIndex) -> Self {
        Self {
            index: RwLock::new(index),
        }
    }

    pub fn audience_for(&self, event: &DomainEvent) -> Audience {
        self.index
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .audience_for(event)
    }

    pub fn assign(&self, station_id: StationId, product_id: ProductId) {
        self.index
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .assign(station_id, product_id);
    }

    pub fn unassign(&self, station_id: StationId, product_id: ProductId) {
        self.index
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .unassign(station_id, product_id);
    }

    /// Swaps in a freshly loaded index.
    pub fn replace(&self, index: AssignmentIndex) {
        *self.index.write().unwrap_or_else(PoisonError::into_inner) = index;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::{OrderCancelledPayload, ProductDiscontinuedPayload};
    use crate::domain::foundation::OrderId;

    fn s(id: i64) -> StationId {
        StationId::new(id)
    }

    fn p(id: i64) -> ProductId {
        ProductId::new(id)
    }

    fn discontinued(product: i64) -> DomainEvent {
        DomainEvent::ProductDiscontinued(ProductDiscontinuedPayload { id: p(product) })
    }

    fn cancelled(products: &[i64]) -> DomainEvent {
        DomainEvent::OrderCancelled(OrderCancelledPayload {
            order_id: OrderId::new(1),
            products: products.iter().map(|id| p(*id)).collect(),
        })
    }

    fn index() -> AssignmentIndex {
        let grill = Station::reconstitute(s(1), "Grill".to_string(), [p(1), p(2)]);
        let bar = Station::reconstitute(s(2), "Bar".to_string(), [p(2), p(3)]);
        AssignmentIndex::from_stations([&grill, &bar])
    }

    #[test]
    fn product_event_reaches_assigned_stations() {
        let audience = index().audience_for(&discontinued(2));
        assert_eq!(audience, Audience::stations([s(1), s(2)]));
    }

    #[test]
    fn unassigned_product_reaches_no_station() {
        let audience = index().audience_for(&discontinued(9));
        assert!(audience.station_ids().is_empty());
        assert!(audience.admits(&AuthScope::sales()));
        assert!(audience.admits(&AuthScope::admin()));
        assert!(!audience.admits(&AuthScope::station(s(1))));
    }

    #[test]
    fn order_event_reaches_union_of_stations() {
        let audience = index().audience_for(&cancelled(&[1, 3]));
        assert_eq!(audience, Audience::stations([s(1), s(2)]));
        let audience = index().audience_for(&cancelled(&[1]));
        assert!(!audience.admits(&AuthScope::station(s(2))));
    }

    #[test]
    fn station_scope_without_station_sees_nothing() {
        let scope = AuthScope {
            role: Role::Station,
            station_id: None,
        };
        assert!(!Audience::stations([s(1)]).admits(&scope));
    }

    #[test]
    fn router_follows_assignment_changes() {
        let router = StationRouter::new(index());
        assert!(!router.audience_for(&discontinued(3)).includes_station(s(1)));

        router.assign(s(1), p(3));
        assert!(router.audience_for(&discontinued(3)).includes_station(s(1)));

        router.unassign(s(2), p(3));
        router.unassign(s(1), p(3));
        assert!(router.audience_for(&discontinued(3)).station_ids().is_empty());
    }

    #[test]
    fn replace_swaps_whole_index() {
        let router = StationRouter::default();
        assert!(router.audience_for(&discontinued(1)).station_ids().is_empty());
        router.replace(index());
        assert!(router.audience_for(&discontinued(1)).includes_station(s(1)));
    }
}
