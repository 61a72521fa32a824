use crate::error::{Result, SktError};
use crate::github::client::HostingService;
use crate::github::types::RepositoryRef;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl PollPolicy {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            interval,
        }
    }
}

/// Poll-loop bookkeeping, alive for one `await_ready` call.
#[derive(Debug, Default)]
struct FetchAttempt {
    attempt: u32,
    last_error: Option<SktError>,
    waited: Duration,
}

/// Fetches `owner/repo.name` until it resolves or the policy's attempts are
/// spent, sleeping `interval` between attempts. Returns the fork's browsable URL.
pub async fn await_ready(
    service: &dyn HostingService,
    owner: &str,
    repo: &RepositoryRef,
    policy: &PollPolicy,
) -> Result<String> {
    let target = RepositoryRef::new(owner, repo.name.clone());
    let max_attempts = policy.max_attempts.max(1);
    let mut state = FetchAttempt::default();

    loop {
        state.attempt += 1;
        match service.get_repository(&target).await {
            Ok(info) => {
                tracing::info!(
                    repository = %target,
                    attempt = state.attempt,
                    url = %info.html_url,
                    "fork is ready"
                );
                return Ok(info.html_url);
            }
            Err(e) => {
                tracing::debug!(repository = %target, attempt = state.attempt, error = %e, "fork not ready");
                state.last_error = Some(e);
            }
        }

        if state.attempt >= max_attempts {
            break;
        }

        tracing::info!(
            repository = %target,
            attempt = state.attempt,
            retry_in_secs = policy.interval.as_secs(),
            "fork not ready yet, retrying"
        );
        tokio::time::sleep(policy.interval).await;
        state.waited += policy.interval;
    }

    tracing::warn!(
        repository = %target,
        attempts = state.attempt,
        waited_secs = state.waited.as_secs(),
        "giving up on fork"
    );
    Err(SktError::RetryExhausted {
        repository: target.to_string(),
        attempts: state.attempt,
        source: Box::new(
            state
                .last_error
                .unwrap_or_else(|| SktError::NotFoundOrNotReady(target.to_string())),
        ),
    })
}
