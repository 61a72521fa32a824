use crate::config::CloneBackend;
use crate::error::{Result, SktError};
use crate::git::repo::verify_checkout;
use std::path::Path;
use std::process::{Command, Stdio};

/// Populates `destination` with a working tree of `url`.
pub trait Cloner: Send + Sync {
    fn clone_repo(&self, url: &str, destination: &Path) -> Result<()>;
}

pub fn cloner_for(backend: CloneBackend) -> Box<dyn Cloner> {
    match backend {
        CloneBackend::Git => Box::new(GitCommandCloner::default()),
        CloneBackend::Libgit2 => Box::new(Git2Cloner),
    }
}

/// Shells out to `git clone`, streaming its output through ours.
pub struct GitCommandCloner {
    program: String,
}

impl Default for GitCommandCloner {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
        }
    }
}

impl Cloner for GitCommandCloner {
    fn clone_repo(&self, url: &str, destination: &Path) -> Result<()> {
        tracing::debug!(%url, destination = %destination.display(), "running git clone");
        let status = Command::new(&self.program)
            .arg("clone")
            .arg(url)
            .arg(destination)
            .stdin(Stdio::null())
            .status()
            .map_err(|e| SktError::Clone {
                url: url.to_string(),
                path: destination.to_path_buf(),
                reason: format!("could not run {}: {e}", self.program),
            })?;

        if !status.success() {
            return Err(SktError::Clone {
                url: url.to_string(),
                path: destination.to_path_buf(),
                reason: format!("git exited with {status}"),
            });
        }
        verify_checkout(url, destination)
    }
}

/// In-process clone through libgit2.
pub struct Git2Cloner;

impl Cloner for Git2Cloner {
    fn clone_repo(&self, url: &str, destination: &Path) -> Result<()> {
        tracing::debug!(%url, destination = %destination.display(), "cloning with libgit2");
        git2::build::RepoBuilder::new()
            .clone(url, destination)
            .map_err(|e| SktError::Clone {
                url: url.to_string(),
                path: destination.to_path_buf(),
                reason: e.message().to_string(),
            })?;
        verify_checkout(url, destination)
    }
}
