//! Storage
//!
//! Blob storage for user content and the profile-image workflow built on it.

pub mod blob;
pub mod filesystem;
pub mod memory;
pub mod profile;

pub use blob::{BlobHandle, BlobStore};
pub use filesystem::FileBlobStore;
pub use memory::MemoryBlobStore;
pub use profile::{content_etag, ProfileImage, ProfileImageManager};
