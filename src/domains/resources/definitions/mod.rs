//! Resource definitions module.
//!
//! Each resource kind lives in its own file with its URI, metadata and a
//! pure document builder. Documents are stamped with the read time.

pub mod current;
pub mod info;
pub mod list;

use chrono::{SecondsFormat, Utc};

use super::service::ResourceContent;

pub use current::NetworkCurrentResource;
pub use info::network_info_entry;
pub use list::NetworkListResource;

/// Trait for resources with a fixed URI.
pub trait ResourceDefinition {
    /// The unique URI of the resource.
    const URI: &'static str;

    /// The display name of the resource.
    const NAME: &'static str;

    /// A description of the resource.
    const DESCRIPTION: &'static str;

    /// The MIME type of the resource content.
    const MIME_TYPE: &'static str = "application/json";

    /// Which document this resource serves.
    fn content() -> ResourceContent;
}

/// Current UTC time as RFC 3339 with millisecond precision.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
