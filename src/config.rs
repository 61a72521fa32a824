use crate::error::{Result, SktError};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// A template repository forked and cloned by `skt init`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateEntry {
    /// Repository name under `template_owner`.
    pub name: String,
    /// Subdirectory of the project directory the fork is cloned into.
    pub directory: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloneBackend {
    Git,
    Libgit2,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, deserialize_with = "string_or_number")]
    pub github_token: Option<String>,
    pub github_api_url: Option<String>,
    pub license_endpoint: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub license_token: Option<String>,
    pub license_timeout_secs: u64,
    pub poll_max_attempts: u32,
    pub poll_interval_secs: u64,
    pub template_owner: String,
    #[serde(default = "default_templates")]
    pub templates: Vec<TemplateEntry>,
    pub project_prefix: String,
    pub clone_backend: CloneBackend,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("github_token", &self.github_token.as_ref().map(|_| "[REDACTED]"))
            .field("github_api_url", &self.github_api_url)
            .field("license_endpoint", &self.license_endpoint)
            .field("license_token", &self.license_token.as_ref().map(|_| "[REDACTED]"))
            .field("license_timeout_secs", &self.license_timeout_secs)
            .field("poll_max_attempts", &self.poll_max_attempts)
            .field("poll_interval_secs", &self.poll_interval_secs)
            .field("template_owner", &self.template_owner)
            .field("templates", &self.templates)
            .field("project_prefix", &self.project_prefix)
            .field("clone_backend", &self.clone_backend)
            .finish()
    }
}

/// Tokens are opaque strings, but a bare `license_token = 123456` in TOML
/// still reads as one.
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Unsigned(u64),
        Signed(i64),
        Float(f64),
    }

    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|scalar| match scalar {
        Scalar::Text(text) => text,
        Scalar::Unsigned(n) => n.to_string(),
        Scalar::Signed(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
    }))
}

fn default_templates() -> Vec<TemplateEntry> {
    vec![
        TemplateEntry {
            name: "saas.service".to_string(),
            directory: "backend".to_string(),
        },
        TemplateEntry {
            name: "starterkit.client".to_string(),
            directory: "frontend".to_string(),
        },
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_token: None,
            github_api_url: None,
            license_endpoint: "https://sheetdb.io/api/v1/ju2p5lmgeed0j/search".to_string(),
            license_token: None,
            license_timeout_secs: 10,
            poll_max_attempts: 3,
            poll_interval_secs: 10,
            template_owner: "saltandpepperstudios".to_string(),
            templates: default_templates(),
            project_prefix: "saasstarter-".to_string(),
            clone_backend: CloneBackend::Git,
        }
    }
}

impl Config {
    /// Layers defaults, the TOML file and `SKT_*` variables. The two tokens are
    /// read from the environment verbatim afterwards, so an all-digit token keeps
    /// its exact text.
    pub fn load() -> Result<Self> {
        let config_file = config_dir().join("saaskit").join("config.toml");

        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        if config_file.exists() {
            figment = figment.merge(Toml::file(&config_file));
        }

        figment = figment.merge(Env::prefixed("SKT_").ignore(&["github_token", "license_token"]));

        let mut config: Config = figment
            .extract()
            .map_err(|e| SktError::Config(e.to_string()))?;

        if let Some(token) = env_token("GITHUB_TOKEN").or_else(|| env_token("SKT_GITHUB_TOKEN")) {
            config.github_token = Some(token);
        }
        if let Some(token) = env_token("SKT_LICENSE_TOKEN") {
            config.license_token = Some(token);
        }

        Ok(config)
    }

    pub fn require_github_token(&self) -> Result<&str> {
        non_empty(self.github_token.as_deref())
            .ok_or_else(|| SktError::CredentialMissing("GITHUB_TOKEN".to_string()))
    }

    pub fn require_license_token(&self) -> Result<&str> {
        non_empty(self.license_token.as_deref())
            .ok_or_else(|| SktError::CredentialMissing("SKT_LICENSE_TOKEN".to_string()))
    }

    pub fn license_timeout(&self) -> Duration {
        Duration::from_secs(self.license_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

fn env_token(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

pub fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".config"))
        })
        .unwrap_or_else(|| PathBuf::from("."))
}
