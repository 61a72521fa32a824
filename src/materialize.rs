use crate::error::Result;
use crate::git::clone::Cloner;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlanEntry {
    pub remote_url: String,
    pub destination: PathBuf,
}

/// Ordered clone list, built only once every fork has been confirmed ready.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MaterializationPlan {
    entries: Vec<PlanEntry>,
}

impl MaterializationPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, remote_url: impl Into<String>, destination: impl Into<PathBuf>) {
        self.entries.push(PlanEntry {
            remote_url: remote_url.into(),
            destination: destination.into(),
        });
    }

    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Clones each entry in order and stops at the first failure. Directories and
/// clones already created stay on disk.
pub fn materialize(plan: &MaterializationPlan, cloner: &dyn Cloner) -> Result<()> {
    if plan.is_empty() {
        tracing::debug!("nothing to clone");
    }
    for (idx, entry) in plan.entries().iter().enumerate() {
        ensure_parent(&entry.destination)?;
        println!(
            "📥 Cloning {} into {}...",
            entry.remote_url,
            entry.destination.display()
        );
        tracing::info!(
            step = idx + 1,
            total = plan.len(),
            url = %entry.remote_url,
            "cloning"
        );
        cloner.clone_repo(&entry.remote_url, &entry.destination)?;
    }
    Ok(())
}

fn ensure_parent(destination: &Path) -> Result<()> {
    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
