//! Collaborator traits consumed by the gateway services.
//!
//! The [`ObjectStore`] trait lives here; the `MetadataCatalog` trait is
//! defined in `stashbox-entity` beside the row types it returns.

pub mod object_store;

pub use object_store::{ByteStream, ObjectStore};
