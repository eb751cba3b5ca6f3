//! Domain model shared by the lens, bridge and record layers.
//!
//! # Responsibility
//! - Define the graph-side shape (`Resource`, `Graph`, `Term`).
//! - Define the application-side shape (`AttributeMap`, `Value`).
//!
//! # Invariants
//! - Both sides are plain values; no model type performs I/O.
//! - A resource's cached response is the only place an ETag lives.

pub mod attributes;
pub mod resource;
pub mod validation;
