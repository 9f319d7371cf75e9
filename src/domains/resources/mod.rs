//! Resources domain module.
//!
//! Resources are read-only JSON documents addressed by URI. They expose the
//! network selection state: which network is active, which networks exist
//! and, per network, whether it is the active one.
//!
//! ## Architecture
//!
//! - `definitions/` - One file per resource kind, each with its document builder
//! - `registry.rs` - Central resource registration
//! - `service.rs` - Resource service for listing and reading
//!
//! ## Adding a New Resource
//!
//! 1. Create a new file in `definitions/`
//! 2. Implement the `ResourceDefinition` trait and add a `ResourceContent` variant
//! 3. Register it in `registry.rs`

pub mod definitions;
mod error;
mod registry;
mod service;

pub use definitions::ResourceDefinition;
pub use error::ResourceError;
pub use registry::{get_all_resources, resource_uris};
pub use service::{ResourceContent, ResourceEntry, ResourceService};
