use crate::{Config, admin::AdminRegistry};
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum StartupCheckError {
    #[error("Failed to create data directory: {0}")]
    DataDirectoryCreationFailed(std::io::Error),

    #[error("Failed to create uploads directory: {0}")]
    UploadsDirectoryCreationFailed(std::io::Error),

    #[error("Administrator registry is unreadable: {0}")]
    RegistryFileInvalid(String),
}

pub async fn perform_startup_checks(config: &Config) -> Result<(), Vec<StartupCheckError>> {
    let mut errors = Vec::new();

    info!("Performing startup checks...");

    if let Some(parent) = config.blog.data_file.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        info!("Data directory does not exist, creating: {:?}", parent);
        if let Err(e) = tokio::fs::create_dir_all(parent).await {
            error!("Failed to create data directory: {}", e);
            errors.push(StartupCheckError::DataDirectoryCreationFailed(e));
        }
    }

    if !config.uploads.directory.exists() {
        info!(
            "Uploads directory does not exist, creating: {:?}",
            config.uploads.directory
        );
        if let Err(e) = tokio::fs::create_dir_all(&config.uploads.directory).await {
            error!("Failed to create uploads directory: {}", e);
            errors.push(StartupCheckError::UploadsDirectoryCreationFailed(e));
        }
    }

    if config.admin.registry_file.exists() {
        match AdminRegistry::load_from_file(&config.admin.registry_file).await {
            Ok(registry) if registry.emails.is_empty() => {
                warn!(
                    "Administrator registry {:?} is empty; no one can log in",
                    config.admin.registry_file
                );
            }
            Ok(registry) => {
                info!(
                    "Administrator registry holds {} emails",
                    registry.emails.len()
                );
            }
            Err(e) => {
                error!("Administrator registry is unreadable: {}", e);
                errors.push(StartupCheckError::RegistryFileInvalid(e.to_string()));
            }
        }
    } else {
        warn!(
            "No administrator registry at {:?}; add one with the `admin add` command",
            config.admin.registry_file
        );
    }

    if config.app.session_secret == "change-me-in-production" {
        warn!("Session secret is still the default value");
    }

    // Stored image references are relative; without a base URL clients have
    // nothing to prefix them with.
    if config.app.base_url.is_none() {
        warn!("app.base_url is not configured; image URLs cannot be resolved by clients");
    }

    if errors.is_empty() {
        info!("All startup checks passed");
        Ok(())
    } else {
        error!("Startup checks failed with {} errors", errors.len());
        Err(errors)
    }
}
