#![cfg(test)]

use crate::error::{Result, SktError};
use crate::github::client::HostingService;
use crate::github::types::{ForkRequest, OwnerInfo, RepositoryInfo, RepositoryRef};
use crate::license::{LicenseCheckResult, LicenseGate};
use crate::git::clone::Cloner;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

pub fn make_repo_info(owner: &str, name: &str) -> RepositoryInfo {
    RepositoryInfo {
        name: name.to_string(),
        html_url: format!("https://github.com/{owner}/{name}"),
        owner: OwnerInfo {
            login: owner.to_string(),
        },
    }
}

/// In-memory hosting service. Forks land under `owner_login` unless an
/// organization is requested.
pub struct FakeHosting {
    owner_login: String,
    failing_forks: HashSet<String>,
    renamed_forks: HashMap<String, String>,
    not_ready: Mutex<HashMap<String, u32>>,
    fetched: Mutex<Vec<String>>,
    fork_calls: AtomicU32,
    get_calls: AtomicU32,
}

impl FakeHosting {
    pub fn new(owner_login: &str) -> Self {
        Self {
            owner_login: owner_login.to_string(),
            failing_forks: HashSet::new(),
            renamed_forks: HashMap::new(),
            not_ready: Mutex::new(HashMap::new()),
            fetched: Mutex::new(Vec::new()),
            fork_calls: AtomicU32::new(0),
            get_calls: AtomicU32::new(0),
        }
    }

    pub fn fail_fork(mut self, name: &str) -> Self {
        self.failing_forks.insert(name.to_string());
        self
    }

    /// Forks of `name` come back as `fork_name`, as when the owner already
    /// has a repository called `name`.
    pub fn rename_fork(mut self, name: &str, fork_name: &str) -> Self {
        self.renamed_forks
            .insert(name.to_string(), fork_name.to_string());
        self
    }

    /// The first `failures` fetches of `name` report it as not ready.
    pub fn not_ready_for(self, name: &str, failures: u32) -> Self {
        self.not_ready
            .lock()
            .unwrap()
            .insert(name.to_string(), failures);
        self
    }

    pub fn fork_calls(&self) -> u32 {
        self.fork_calls.load(Ordering::SeqCst)
    }

    pub fn get_calls(&self) -> u32 {
        self.get_calls.load(Ordering::SeqCst)
    }

    /// Full names passed to `get_repository`, in call order.
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl HostingService for FakeHosting {
    async fn create_fork(&self, request: &ForkRequest) -> Result<RepositoryInfo> {
        self.fork_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_forks.contains(&request.source.name) {
            return Err(SktError::AlreadyExists(request.source.name.clone()));
        }
        let owner = request
            .destination_namespace
            .clone()
            .unwrap_or_else(|| self.owner_login.clone());
        let name = self
            .renamed_forks
            .get(&request.source.name)
            .unwrap_or(&request.source.name);
        Ok(make_repo_info(&owner, name))
    }

    async fn get_repository(&self, repo: &RepositoryRef) -> Result<RepositoryInfo> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.fetched.lock().unwrap().push(repo.to_string());
        let mut not_ready = self.not_ready.lock().unwrap();
        if let Some(remaining) = not_ready.get_mut(&repo.name) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(SktError::NotFoundOrNotReady(repo.to_string()));
            }
        }
        Ok(make_repo_info(&repo.owner, &repo.name))
    }
}

pub struct FakeLicense {
    result: LicenseCheckResult,
    calls: AtomicU32,
}

impl FakeLicense {
    pub fn new(result: LicenseCheckResult) -> Self {
        Self {
            result,
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LicenseGate for FakeLicense {
    async fn check(&self, _key: &str) -> LicenseCheckResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

/// Writes a README into each destination instead of cloning. URLs containing
/// `fail_on` fail.
#[derive(Default)]
pub struct FakeCloner {
    fail_on: Option<String>,
    calls: Mutex<Vec<(String, PathBuf)>>,
}

impl FakeCloner {
    pub fn failing_on(fragment: &str) -> Self {
        Self {
            fail_on: Some(fragment.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, PathBuf)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Cloner for FakeCloner {
    fn clone_repo(&self, url: &str, destination: &Path) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), destination.to_path_buf()));
        if self.fail_on.as_deref().is_some_and(|f| url.contains(f)) {
            return Err(SktError::Clone {
                url: url.to_string(),
                path: destination.to_path_buf(),
                reason: "exit status: 128".to_string(),
            });
        }
        std::fs::create_dir_all(destination)?;
        std::fs::write(destination.join("README.md"), url)?;
        Ok(())
    }
}
