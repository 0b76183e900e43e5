pub mod core;
pub mod error;
pub mod handlers;

pub use core::{ImageStore, PreviewImage, StoredImage};
pub use error::UploadError;
pub use handlers::{serve_image_handler, upload_image_handler};
