use crate::config::{Config, TemplateEntry};
use crate::error::{Result, SktError};
use crate::git::clone::Cloner;
use crate::git::repo::remote_url;
use crate::github::client::HostingService;
use crate::github::forker;
use crate::github::poller::{self, PollPolicy};
use crate::github::types::{ForkRequest, ForkResult, RepositoryRef};
use crate::license::{LicenseCheckResult, LicenseGate};
use crate::manifest::{self, ManifestRepository, ProjectManifest};
use crate::materialize::{self, MaterializationPlan};
use itertools::Itertools;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Flags given to `skt init`. Empty strings stand for absent flags.
#[derive(Clone, Debug, Default)]
pub struct InitOptions {
    pub name: String,
    pub key: String,
    pub org: String,
    pub path: String,
}

impl InitOptions {
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("--name", &self.name),
            ("--key", &self.key),
            ("--path", &self.path),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(flag, _)| flag)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(SktError::Config(format!(
                "missing required flags: {}",
                missing.join(", ")
            )))
        }
    }

    pub fn project_dir(&self, prefix: &str) -> PathBuf {
        Path::new(self.path.trim()).join(format!("{prefix}{}", self.name.trim()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Validate,
    License,
    Fork,
    Poll,
    Materialize,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validate => "validation",
            Stage::License => "license check",
            Stage::Fork => "fork",
            Stage::Poll => "fork readiness",
            Stage::Materialize => "clone",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
#[error("{stage} failed: {source}")]
pub struct InitFailure {
    pub stage: Stage,
    #[source]
    pub source: SktError,
}

fn at(stage: Stage) -> impl FnOnce(SktError) -> InitFailure {
    move |source| InitFailure { stage, source }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadyRepository {
    pub name: String,
    pub directory: String,
    pub url: String,
}

#[derive(Debug)]
pub struct InitReport {
    pub project_dir: PathBuf,
    pub owner: String,
    pub repositories: Vec<ReadyRepository>,
    pub next_steps: Vec<String>,
    pub manifest: Option<PathBuf>,
}

/// Runs license check → fork → poll → clone, stopping at the first failing stage.
pub struct Orchestrator<'a> {
    license: &'a dyn LicenseGate,
    hosting: &'a dyn HostingService,
    cloner: &'a dyn Cloner,
    template_owner: String,
    templates: Vec<TemplateEntry>,
    policy: PollPolicy,
    project_prefix: String,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        license: &'a dyn LicenseGate,
        hosting: &'a dyn HostingService,
        cloner: &'a dyn Cloner,
        config: &Config,
    ) -> Self {
        Self {
            license,
            hosting,
            cloner,
            template_owner: config.template_owner.clone(),
            templates: config.templates.clone(),
            policy: PollPolicy::new(config.poll_max_attempts, config.poll_interval()),
            project_prefix: config.project_prefix.clone(),
        }
    }

    pub async fn run(&self, options: &InitOptions) -> std::result::Result<InitReport, InitFailure> {
        options.validate().map_err(at(Stage::Validate))?;
        if self.templates.is_empty() {
            return Err(at(Stage::Validate)(SktError::Config(
                "no template repositories configured".to_string(),
            )));
        }

        self.check_license(&options.key).await.map_err(at(Stage::License))?;

        let forks = self.fork_all(&options.org).await.map_err(at(Stage::Fork))?;

        let owner = effective_owner(&options.org, &forks);
        tracing::info!(%owner, "forks accepted");
        println!("🔄 Waiting for forks to be ready under {owner}...");

        let ready = self.await_all(&owner, &forks).await.map_err(at(Stage::Poll))?;

        let project_dir = options.project_dir(&self.project_prefix);
        std::fs::create_dir_all(&project_dir)
            .map_err(|e| at(Stage::Materialize)(e.into()))?;

        let mut plan = MaterializationPlan::new();
        for repo in &ready {
            plan.push(remote_url(&repo.url), project_dir.join(&repo.directory));
        }
        materialize::materialize(&plan, self.cloner).map_err(at(Stage::Materialize))?;

        let manifest = self.write_manifest(options, &owner, &project_dir, &ready);
        println!("✅ Project initialized successfully!");

        Ok(InitReport {
            next_steps: next_steps(&project_dir),
            project_dir,
            owner,
            repositories: ready,
            manifest,
        })
    }

    async fn check_license(&self, key: &str) -> Result<()> {
        println!("🔑 Verifying license key...");
        match self.license.check(key).await {
            LicenseCheckResult::Valid => {
                println!("✅ License key verified successfully!");
                Ok(())
            }
            LicenseCheckResult::Invalid => Err(SktError::LicenseInvalid),
            LicenseCheckResult::TransportError(detail) => Err(SktError::Transport(format!(
                "could not verify license key: {detail}"
            ))),
        }
    }

    async fn fork_all(&self, org: &str) -> Result<Vec<ForkResult>> {
        println!(
            "🔄 Forking template repositories ({})...",
            self.templates.iter().map(|t| &t.name).join(", ")
        );
        let mut forks = Vec::with_capacity(self.templates.len());
        for template in &self.templates {
            let request = ForkRequest::new(
                RepositoryRef::new(self.template_owner.clone(), template.name.clone()),
                org,
            );
            let result = forker::fork(self.hosting, &request).await?;
            println!("🎉 Fork of {} accepted", request.source);
            forks.push(result);
        }
        Ok(forks)
    }

    /// Polls every fork to completion, even after one has given up, so the
    /// failure can list the forks that did become ready. Forks are looked up by
    /// the name the service gave them, which differs from the template's name
    /// when the owner already has a repository called that.
    async fn await_all(&self, owner: &str, forks: &[ForkResult]) -> Result<Vec<ReadyRepository>> {
        let mut ready = Vec::new();
        let mut failed = Vec::new();

        for (template, fork) in self.templates.iter().zip(forks) {
            let forked = &fork.forked_repository;
            match poller::await_ready(self.hosting, owner, forked, &self.policy).await {
                Ok(url) => {
                    println!("✅ Fork is ready at: {url}");
                    ready.push(ReadyRepository {
                        name: forked.name.clone(),
                        directory: template.directory.clone(),
                        url,
                    });
                }
                Err(e) => failed.push(e.to_string()),
            }
        }

        if failed.is_empty() {
            Ok(ready)
        } else {
            Err(SktError::ForksNotReady {
                ready: ready
                    .iter()
                    .map(|r| format!("{} at {}", r.name, r.url))
                    .collect(),
                failed,
            })
        }
    }

    fn write_manifest(
        &self,
        options: &InitOptions,
        owner: &str,
        project_dir: &Path,
        ready: &[ReadyRepository],
    ) -> Option<PathBuf> {
        let record = ProjectManifest {
            name: options.name.trim().to_string(),
            owner: owner.to_string(),
            created_at: chrono::Utc::now(),
            repositories: ready
                .iter()
                .map(|r| ManifestRepository {
                    name: r.name.clone(),
                    directory: r.directory.clone(),
                    url: r.url.clone(),
                })
                .collect(),
        };
        match manifest::save(project_dir, &record) {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!(error = %e, "could not write project manifest");
                None
            }
        }
    }
}

fn effective_owner(org: &str, forks: &[ForkResult]) -> String {
    let org = org.trim();
    if !org.is_empty() {
        return org.to_string();
    }
    forks
        .first()
        .map(|f| f.owner_login.clone())
        .unwrap_or_default()
}

pub fn next_steps(project_dir: &Path) -> Vec<String> {
    vec![
        format!("cd {}", project_dir.display()),
        "Follow the setup instructions in README.md".to_string(),
    ]
}
