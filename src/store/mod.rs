pub mod core;
pub mod error;
pub mod types;

pub use core::BlogStore;
pub use error::StoreError;
pub use types::{BlogPost, ListFilter, ListResult, PostPayload, PostStatus, StoreStats};
