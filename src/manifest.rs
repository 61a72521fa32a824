use crate::error::{Result, SktError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "saaskit.toml";

/// Record of what `skt init` forked and cloned, written into the project root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectManifest {
    pub name: String,
    pub owner: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub repositories: Vec<ManifestRepository>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestRepository {
    pub name: String,
    pub directory: String,
    pub url: String,
}

pub fn manifest_path(project_dir: &Path) -> PathBuf {
    project_dir.join(MANIFEST_FILE)
}

pub fn save(project_dir: &Path, manifest: &ProjectManifest) -> Result<PathBuf> {
    let content = toml::to_string_pretty(manifest)
        .map_err(|e| SktError::Config(format!("serializing manifest: {e}")))?;
    let path = manifest_path(project_dir);
    std::fs::create_dir_all(project_dir)?;
    std::fs::write(&path, content)?;
    Ok(path)
}

pub fn load(project_dir: &Path) -> Result<ProjectManifest> {
    let content = std::fs::read_to_string(manifest_path(project_dir))?;
    toml::from_str(&content).map_err(|e| SktError::Config(format!("parsing manifest: {e}")))
}
