use crate::error::{Result, SktError};
use crate::github::client::HostingService;
use crate::github::types::{ForkRequest, ForkResult, RepositoryRef};

/// Requests a fork and returns as soon as the service accepts it. Readiness is
/// left to [`crate::github::poller::await_ready`].
pub async fn fork(service: &dyn HostingService, request: &ForkRequest) -> Result<ForkResult> {
    tracing::info!(
        repository = %request.source,
        namespace = request.destination_namespace.as_deref().unwrap_or("<own account>"),
        "requesting fork"
    );

    let info = service
        .create_fork(request)
        .await
        .map_err(|e| SktError::Fork {
            repository: request.source.to_string(),
            source: Box::new(e),
        })?;

    let result = ForkResult {
        forked_repository: RepositoryRef::new(info.owner.login.clone(), info.name),
        owner_login: info.owner.login,
    };
    tracing::debug!(fork = %result.forked_repository, "fork accepted");
    Ok(result)
}
