pub mod editor;
pub mod error;
pub mod handlers;
pub mod registry;
pub mod session;

pub use editor::{Editor, EditorForm, EditorMode};
pub use error::AdminError;
pub use handlers::{
    cleanup_handler, create_post_handler, delete_post_handler, edit_post_handler,
    list_posts_handler, logout_handler, session_handler, stats_handler, update_post_handler,
    verify_admin_handler,
};
pub use registry::{AdminRegistry, RegistryManager};
pub use session::require_admin;
