//! # stashbox-core
//!
//! Core crate for the Stashbox object-storage gateway. Contains the
//! collaborator traits, configuration schemas, typed identifiers, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other Stashbox crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
