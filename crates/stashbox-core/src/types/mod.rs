//! Common domain value types.

pub mod id;
pub mod key;

pub use id::{FileId, FolderId, UserId};
pub use key::StorageKey;
