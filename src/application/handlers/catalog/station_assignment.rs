//! Station assignment handlers.
//!
//! Assignments are written to the store first and mirrored into the
//! in-process [`StationRouter`] afterwards, so the router never routes to a
//! station for an assignment that failed to persist.

use std::sync::Arc;

use crate::domain::catalog::CatalogError;
use crate::domain::foundation::{AuthScope, ProductId, StationId};
use crate::domain::routing::StationRouter;
use crate::ports::CatalogStore;

#[derive(Debug, Clone, Copy)]
pub struct StationAssignmentCommand {
    pub scope: AuthScope,
    pub station_id: StationId,
    pub product_id: ProductId,
}

/// Handler for assigning a product to a station.
pub struct AssignProductHandler {
    catalog: Arc<dyn CatalogStore>,
    router: Arc<StationRouter>,
}

impl AssignProductHandler {
    pub fn new(catalog: Arc<dyn CatalogStore>, router: Arc<StationRouter>) -> Self {
        Self { catalog, router }
    }

    /// Returns false if the product was already assigned.
    pub async fn handle(&self, cmd: StationAssignmentCommand) -> Result<bool, CatalogError> {
        if !cmd.scope.is_admin() {
            return Err(CatalogError::Forbidden);
        }
        let added = self
            .catalog
            .assign_product(cmd.station_id, cmd.product_id)
            .await?;
        self.router.assign(cmd.station_id, cmd.product_id);
        tracing::info!(
            station_id = %cmd.station_id,
            product_id = %cmd.product_id,
            added,
            "product assigned to station"
        );
        Ok(added)
    }
}

/// Handler for removing a product from a station.
pub struct RemoveProductHandler {
    catalog: Arc<dyn CatalogStore>,
    router: Arc<StationRouter>,
}

impl RemoveProductHandler {
    pub fn new(catalog: Arc<dyn CatalogStore>, router: Arc<StationRouter>) -> Self {
        Self { catalog, router }
    }

    /// Returns false if there was no such assignment.
    pub async fn handle(&self, cmd: StationAssignmentCommand) -> Result<bool, CatalogError> {
        if !cmd.scope.is_admin() {
            return Err(CatalogError::Forbidden);
        }
        let removed = self
            .catalog
            .unassign_product(cmd.station_id, cmd.product_id)
            .await?;
        self.router.unassign(cmd.station_id, cmd.product_id);
        tracing::info!(
            station_id = %cmd.station_id,
            product_id = %cmd.product_id,
            removed,
            "product removed from station"
        );
        Ok(removed)
    }
}
