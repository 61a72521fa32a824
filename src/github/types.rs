use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RepositoryRef {
    pub owner: String,
    pub name: String,
}

impl RepositoryRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[derive(Clone, Debug)]
pub struct ForkRequest {
    pub source: RepositoryRef,
    /// `None` or empty forks into the authenticated user's account.
    pub destination_namespace: Option<String>,
}

impl ForkRequest {
    pub fn new(source: RepositoryRef, destination_namespace: &str) -> Self {
        let destination_namespace = if destination_namespace.trim().is_empty() {
            None
        } else {
            Some(destination_namespace.trim().to_string())
        };
        Self {
            source,
            destination_namespace,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForkResult {
    pub forked_repository: RepositoryRef,
    pub owner_login: String,
}

/// Repository descriptor as returned by the hosting service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepositoryInfo {
    pub name: String,
    pub html_url: String,
    pub owner: OwnerInfo,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnerInfo {
    pub login: String,
}
