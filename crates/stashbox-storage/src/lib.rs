//! # stashbox-storage
//!
//! [`ObjectStore`](stashbox_core::traits::ObjectStore) implementations for
//! Stashbox: an S3-compatible backend (the production target is an R2
//! bucket) and an in-memory store with signed-URL expiry enforcement used
//! by the test suites.

pub mod memory;
pub mod s3;

pub use memory::MemoryObjectStore;
pub use s3::S3ObjectStore;
