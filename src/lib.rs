//! POS Live - real-time order and catalog event distribution for a
//! point-of-sale backend.
//!
//! Domain mutations (orders placed, products fulfilled, catalog edits) are
//! published on an in-process bus and fanned out to connected staff
//! devices. Each device only receives the events its role and station may
//! see, over either a WebSocket or a server-sent event stream.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
