//! # stashbox-service
//!
//! The hierarchical object-storage gateway: maps logical folder trees onto
//! flat object-storage keys, issues time-bounded signed-URL grants, streams
//! folder contents as zip archives, and performs tree mutation with
//! metadata-first deletion ordering.
//!
//! Services hold their collaborators behind the [`MetadataCatalog`]
//! (stashbox-entity) and [`ObjectStore`] (stashbox-core) traits and carry
//! no shared mutable state between requests.
//!
//! [`MetadataCatalog`]: stashbox_entity::MetadataCatalog
//! [`ObjectStore`]: stashbox_core::traits::ObjectStore

pub mod archive;
pub mod grant;
pub mod keymap;
pub mod testing;
pub mod tree;

mod util;

pub use archive::{Archive, ArchiveService};
pub use grant::{FileGrant, FolderGrants, GrantFailure, GrantService, MAX_GRANT_TTL, SignedUrl};
pub use keymap::KeyMapper;
pub use tree::{CreateFolderRequest, StoreFileRequest, TreeService};
