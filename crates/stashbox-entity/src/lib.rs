//! # stashbox-entity
//!
//! Domain entity models for Stashbox. Every struct in this crate
//! represents a metadata catalog row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, and `Deserialize`.
//!
//! The [`catalog::MetadataCatalog`] trait is defined here because its
//! vocabulary is these row types; implementations belong to the excluded
//! relational layer (tests use an in-memory double).

pub mod catalog;
pub mod file;
pub mod folder;

pub use catalog::MetadataCatalog;
pub use file::{CreateFile, File};
pub use folder::{CreateFolder, Folder};
