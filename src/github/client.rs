use crate::error::{Result, SktError};
use crate::github::types::{ForkRequest, OwnerInfo, RepositoryInfo, RepositoryRef};
use async_trait::async_trait;
use octocrab::models::Repository;
use octocrab::Octocrab;

/// The two hosting-service calls the fork flow depends on.
#[async_trait]
pub trait HostingService: Send + Sync {
    /// Asks the service to fork `request.source`. Success means the fork was
    /// accepted, not that it can be fetched yet.
    async fn create_fork(&self, request: &ForkRequest) -> Result<RepositoryInfo>;

    async fn get_repository(&self, repo: &RepositoryRef) -> Result<RepositoryInfo>;
}

#[derive(Clone)]
pub struct GitHubClient {
    octo: Octocrab,
}

impl GitHubClient {
    pub fn new(token: &str, base_uri: Option<&str>) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());
        if let Some(uri) = base_uri {
            builder = builder
                .base_uri(uri)
                .map_err(|e| SktError::Config(format!("invalid github_api_url {uri}: {e}")))?;
        }
        let octo = builder
            .build()
            .map_err(|e| SktError::GitHub(e.to_string()))?;

        Ok(Self { octo })
    }
}

#[async_trait]
impl HostingService for GitHubClient {
    async fn create_fork(&self, request: &ForkRequest) -> Result<RepositoryInfo> {
        let repos = self.octo.repos(&request.source.owner, &request.source.name);
        let mut builder = repos.create_fork();
        if let Some(org) = request.destination_namespace.as_deref() {
            builder = builder.organization(org);
        }
        let repo = builder.send().await.map_err(classify)?;
        repository_info(repo)
    }

    async fn get_repository(&self, repo: &RepositoryRef) -> Result<RepositoryInfo> {
        let found = self
            .octo
            .repos(&repo.owner, &repo.name)
            .get()
            .await
            .map_err(classify)?;
        repository_info(found)
    }
}

fn repository_info(repo: Repository) -> Result<RepositoryInfo> {
    let owner = repo
        .owner
        .map(|o| o.login)
        .ok_or_else(|| SktError::GitHub(format!("repository {} has no owner", repo.name)))?;
    let html_url = repo
        .html_url
        .map(|u| u.to_string())
        .ok_or_else(|| SktError::GitHub(format!("repository {owner}/{} has no html_url", repo.name)))?;

    Ok(RepositoryInfo {
        name: repo.name,
        html_url,
        owner: OwnerInfo { login: owner },
    })
}

fn classify(err: octocrab::Error) -> SktError {
    match err {
        octocrab::Error::GitHub { source, .. } => {
            let status = source.status_code.as_u16();
            let message = source.message.clone();
            match status {
                401 | 403 => SktError::Authentication(message),
                404 => SktError::NotFoundOrNotReady(message),
                422 => SktError::AlreadyExists(message),
                _ => SktError::GitHub(format!("{status}: {message}")),
            }
        }
        other => SktError::Transport(other.to_string()),
    }
}
