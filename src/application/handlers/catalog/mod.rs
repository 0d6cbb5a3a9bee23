//! Catalog handlers.
//!
//! Every mutation requires the admin scope; reads are open to any
//! authenticated caller. Product changes are published after the store
//! write succeeds.

mod create_product;
mod create_station;
mod discontinue_product;
mod list_catalog;
mod station_assignment;
mod update_product;

pub use create_product::{CreateProductCommand, CreateProductHandler};
pub use create_station::{
    CreateProductTypeCommand, CreateProductTypeHandler, CreateStationCommand, CreateStationHandler,
};
pub use discontinue_product::{DiscontinueProductCommand, DiscontinueProductHandler};
pub use list_catalog::{ListProductsHandler, ListStationsHandler};
pub use station_assignment::{AssignProductHandler, RemoveProductHandler, StationAssignmentCommand};
pub use update_product::{UpdateProductCommand, UpdateProductHandler, UpdateProductResult};
