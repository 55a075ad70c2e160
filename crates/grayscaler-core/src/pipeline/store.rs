//! Persistence of processed images into the output directory.

use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::config::Config;
use crate::error::StorageError;
use crate::types::Role;

/// Generate a collision-resistant output name: `{role}_{32 hex chars}.png`.
pub fn output_filename(role: Role) -> String {
    format!("{}_{:032x}.png", role.as_str(), rand::random::<u128>())
}

/// Writes processed bytes into a flat output directory.
pub struct OutputStore {
    output_dir: PathBuf,
    static_dir: PathBuf,
    static_route: String,
}

impl OutputStore {
    /// Create a store for the given directory layout.
    pub fn new(output_dir: PathBuf, static_dir: PathBuf, static_route: impl Into<String>) -> Self {
        Self {
            output_dir,
            static_dir,
            static_route: static_route.into(),
        }
    }

    /// Create a store from the resolved storage settings of the config.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.output_dir(),
            config.static_dir(),
            config.storage.static_route.clone(),
        )
    }

    /// Write `bytes` to `output_dir/filename` and return the written path.
    ///
    /// The directory is created if missing. Bytes go to a hidden temp file
    /// first and are renamed into place, so a failed write never leaves the
    /// final name behind.
    pub async fn save(&self, bytes: &[u8], filename: &str) -> Result<PathBuf, StorageError> {
        fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|source| StorageError::CreateDir {
                path: self.output_dir.clone(),
                source,
            })?;

        let path = self.output_dir.join(filename);
        let temp_path = self.output_dir.join(format!(".{}.tmp", filename));

        if let Err(source) = write_synced(&temp_path, bytes).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(StorageError::Write { path, source });
        }

        if let Err(source) = fs::rename(&temp_path, &path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(StorageError::Write { path, source });
        }

        tracing::info!(path = %path.display(), size = bytes.len(), "Saved output image");
        Ok(path)
    }

    /// Render a stored path as a server-relative URL.
    ///
    /// Paths under the static root are mapped onto the static route
    /// (`static/output/x.png` → `/static/output/x.png`); anything else is
    /// returned as `/<path>`.
    pub fn public_url(&self, path: &Path) -> String {
        let (prefix, rest) = match path.strip_prefix(&self.static_dir) {
            Ok(rest) => (self.static_route.trim_end_matches('/'), rest),
            Err(_) => ("", path),
        };

        let rest: Vec<String> = rest
            .components()
            .filter_map(|c| match c {
                std::path::Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        format!("{}/{}", prefix, rest.join("/"))
    }
}

async fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    Ok(())
}
