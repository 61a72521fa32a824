use crate::error::{Result, SktError};
use git2::Repository;
use std::path::Path;

pub fn open_repo(path: &Path) -> Result<Repository> {
    Ok(Repository::open(path)?)
}

/// Confirms a finished clone left a checked-out working tree at `path`.
pub fn verify_checkout(url: &str, path: &Path) -> Result<()> {
    let repo = open_repo(path).map_err(|e| SktError::Clone {
        url: url.to_string(),
        path: path.to_path_buf(),
        reason: format!("not a git repository: {e}"),
    })?;
    if repo.is_bare() || repo.workdir().is_none() {
        return Err(SktError::Clone {
            url: url.to_string(),
            path: path.to_path_buf(),
            reason: "clone produced no working tree".to_string(),
        });
    }
    Ok(())
}

/// `https://github.com/o/r` → `https://github.com/o/r.git`.
pub fn remote_url(html_url: &str) -> String {
    let trimmed = html_url.trim_end_matches('/');
    if trimmed.ends_with(".git") {
        trimmed.to_string()
    } else {
        format!("{trimmed}.git")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_url_appends_git_suffix_once() {
        assert_eq!(
            remote_url("https://github.com/me/saas.service"),
            "https://github.com/me/saas.service.git"
        );
        assert_eq!(
            remote_url("https://github.com/me/saas.service/"),
            "https://github.com/me/saas.service.git"
        );
        assert_eq!(
            remote_url("https://github.com/me/saas.service.git"),
            "https://github.com/me/saas.service.git"
        );
    }

    #[test]
    fn open_repo_on_plain_directory_is_a_git_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_repo(dir.path()).err().unwrap();
        assert!(matches!(err, SktError::Git(_)), "got {err:?}");
    }

    #[test]
    fn verify_checkout_rejects_plain_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = verify_checkout("https://example.com/r.git", dir.path()).unwrap_err();
        match err {
            SktError::Clone { url, reason, .. } => {
                assert_eq!(url, "https://example.com/r.git");
                assert!(reason.starts_with("not a git repository"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn verify_checkout_accepts_initialized_repo() {
        let dir = tempfile::tempdir().unwrap();
        Repository::init(dir.path()).unwrap();
        assert!(verify_checkout("https://example.com/r.git", dir.path()).is_ok());
    }
}
