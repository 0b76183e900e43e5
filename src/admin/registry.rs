use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::RwLock;

/// The administrator registry: the set of emails allowed to hold an admin
/// session. Persisted as TOML and managed from the `admin` CLI subcommand.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminRegistry {
    #[serde(default)]
    pub emails: Vec<String>,
}

impl AdminRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load_from_file(path: &Path) -> Result<Self, std::io::Error> {
        let contents = fs::read_to_string(path).await?;
        let doc = contents
            .parse::<toml_edit::DocumentMut>()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        let registry: AdminRegistry = toml_edit::de::from_document(doc)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(registry)
    }

    pub async fn save_to_file(&self, path: &Path) -> Result<(), std::io::Error> {
        let doc = toml_edit::ser::to_document(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(path, doc.to_string()).await?;
        Ok(())
    }

    pub fn is_registered(&self, email: &str) -> bool {
        let email = email.trim();
        self.emails
            .iter()
            .any(|registered| registered.eq_ignore_ascii_case(email))
    }

    /// Returns false if the email was already present.
    pub fn add(&mut self, email: &str) -> bool {
        if self.is_registered(email) {
            return false;
        }
        self.emails.push(email.trim().to_lowercase());
        true
    }

    /// Returns false if the email was not present.
    pub fn remove(&mut self, email: &str) -> bool {
        let len_before = self.emails.len();
        self.emails
            .retain(|registered| !registered.eq_ignore_ascii_case(email.trim()));
        self.emails.len() < len_before
    }
}

pub type SharedAdminRegistry = Arc<RwLock<AdminRegistry>>;

#[derive(Debug, Clone)]
pub struct RegistryManager {
    registry: SharedAdminRegistry,
    file_path: PathBuf,
}

impl RegistryManager {
    pub async fn new(path: PathBuf) -> Result<Self, std::io::Error> {
        let registry = if path.exists() {
            AdminRegistry::load_from_file(&path).await?
        } else {
            AdminRegistry::new()
        };

        Ok(Self {
            registry: Arc::new(RwLock::new(registry)),
            file_path: path,
        })
    }

    pub fn registry(&self) -> &SharedAdminRegistry {
        &self.registry
    }

    pub async fn is_registered(&self, email: &str) -> bool {
        let registry = self.registry.read().await;
        registry.is_registered(email)
    }

    pub async fn save(&self) -> Result<(), std::io::Error> {
        let registry = self.registry.read().await;
        registry.save_to_file(&self.file_path).await
    }

    pub async fn reload(&self) -> Result<(), std::io::Error> {
        let fresh = AdminRegistry::load_from_file(&self.file_path).await?;
        let mut registry = self.registry.write().await;
        *registry = fresh;
        Ok(())
    }
}
