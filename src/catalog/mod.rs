pub mod core;
pub mod handlers;
pub mod types;

pub use handlers::catalog_handler;
pub use types::{CatalogPage, CatalogQuery, FacetCount};

#[cfg(test)]
mod tests;
