//! Origins from which cluster credentials can be loaded, in priority order:
//! an explicit path, the `KUBECONFIG` variable, the in-cluster service account,
//! and finally `~/.kube/config`.

use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::Config;
use tracing::debug;

use crate::core::config::app_config::{ClusterSettings, KUBECONFIG_ENV};

pub const SERVICE_ACCOUNT_TOKEN_PATH: &str = "/var/run/secrets/kubernetes.io/serviceaccount/token";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialSourceKind {
    ExplicitPath,
    EnvVar,
    InCluster,
    DefaultPath,
}

impl fmt::Display for CredentialSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CredentialSourceKind::ExplicitPath => "explicit path",
            CredentialSourceKind::EnvVar => "KUBECONFIG env var",
            CredentialSourceKind::InCluster => "in-cluster service account",
            CredentialSourceKind::DefaultPath => "default location",
        };
        f.write_str(label)
    }
}

/// Why a single source could not produce a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceFailure {
    NotProvided,
    FileMissing(PathBuf),
    Parse(String),
    NotInCluster(String),
    Invalid(String),
}

impl fmt::Display for SourceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFailure::NotProvided => f.write_str("not provided"),
            SourceFailure::FileMissing(p) => write!(f, "file missing: {}", p.display()),
            SourceFailure::Parse(e) => write!(f, "parse error: {}", e),
            SourceFailure::NotInCluster(e) => write!(f, "not running in-cluster: {}", e),
            SourceFailure::Invalid(e) => write!(f, "unusable: {}", e),
        }
    }
}

#[async_trait]
pub trait CredentialSource: Send + Sync {
    fn kind(&self) -> CredentialSourceKind;

    async fn load(&self) -> Result<Config, SourceFailure>;
}

/// Build the standard four-source chain from the startup settings.
pub fn standard_sources(settings: &ClusterSettings) -> Vec<Box<dyn CredentialSource>> {
    vec![
        Box::new(ExplicitPathSource::new(settings.explicit_kubeconfig.clone())),
        Box::new(EnvVarSource::new(KUBECONFIG_ENV, settings.kubeconfig_env.clone())),
        Box::new(InClusterSource::new(
            settings.service_host.clone(),
            PathBuf::from(SERVICE_ACCOUNT_TOKEN_PATH),
        )),
        Box::new(DefaultPathSource::new(settings.default_kubeconfig.clone())),
    ]
}

pub struct ExplicitPathSource {
    path: Option<PathBuf>,
}

impl ExplicitPathSource {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

#[async_trait]
impl CredentialSource for ExplicitPathSource {
    fn kind(&self) -> CredentialSourceKind {
        CredentialSourceKind::ExplicitPath
    }

    async fn load(&self) -> Result<Config, SourceFailure> {
        let path = self.path.as_deref().ok_or(SourceFailure::NotProvided)?;
        config_from_files(&[path.to_path_buf()]).await
    }
}

/// Reads a list of kubeconfig paths from an environment variable captured at startup.
pub struct EnvVarSource {
    var_name: &'static str,
    value: Option<String>,
}

impl EnvVarSource {
    pub fn new(var_name: &'static str, value: Option<String>) -> Self {
        Self { var_name, value }
    }
}

#[async_trait]
impl CredentialSource for EnvVarSource {
    fn kind(&self) -> CredentialSourceKind {
        CredentialSourceKind::EnvVar
    }

    async fn load(&self) -> Result<Config, SourceFailure> {
        let value = self.value.as_deref().ok_or(SourceFailure::NotProvided)?;
        let paths: Vec<PathBuf> = std::env::split_paths(value)
            .filter(|p| !p.as_os_str().is_empty())
            .collect();
        if paths.is_empty() {
            return Err(SourceFailure::Invalid(format!("{} lists no paths", self.var_name)));
        }
        config_from_files(&paths).await
    }
}

/// Service-account context, detected by probing rather than configured.
pub struct InClusterSource {
    service_host: Option<String>,
    token_path: PathBuf,
}

impl InClusterSource {
    pub fn new(service_host: Option<String>, token_path: PathBuf) -> Self {
        Self {
            service_host,
            token_path,
        }
    }
}

#[async_trait]
impl CredentialSource for InClusterSource {
    fn kind(&self) -> CredentialSourceKind {
        CredentialSourceKind::InCluster
    }

    async fn load(&self) -> Result<Config, SourceFailure> {
        if self.service_host.is_none() {
            return Err(SourceFailure::NotInCluster(
                "KUBERNETES_SERVICE_HOST is not set".into(),
            ));
        }
        if !self.token_path.exists() {
            return Err(SourceFailure::NotInCluster(format!(
                "service account token missing at {}",
                self.token_path.display()
            )));
        }

        Config::incluster().map_err(|e| SourceFailure::Invalid(e.to_string()))
    }
}

pub struct DefaultPathSource {
    path: Option<PathBuf>,
}

impl DefaultPathSource {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

#[async_trait]
impl CredentialSource for DefaultPathSource {
    fn kind(&self) -> CredentialSourceKind {
        CredentialSourceKind::DefaultPath
    }

    async fn load(&self) -> Result<Config, SourceFailure> {
        let path = self
            .path
            .as_deref()
            .ok_or_else(|| SourceFailure::Invalid("home directory could not be determined".into()))?;
        config_from_files(&[path.to_path_buf()]).await
    }
}

/// Load and merge kubeconfig files. The first file's current-context wins.
/// Missing entries are skipped; the load fails only when none of them exist.
async fn config_from_files(paths: &[PathBuf]) -> Result<Config, SourceFailure> {
    let mut merged: Option<Kubeconfig> = None;
    let mut first_missing: Option<PathBuf> = None;

    for path in paths {
        let cfg = match read_kubeconfig(path) {
            Ok(cfg) => cfg,
            Err(SourceFailure::FileMissing(missing)) => {
                debug!("kubeconfig: skipping missing file {}", missing.display());
                first_missing.get_or_insert(missing);
                continue;
            }
            Err(other) => return Err(other),
        };
        merged = Some(match merged.take() {
            None => cfg,
            Some(base) => merge_kubeconfig(base, cfg),
        });
    }

    let kubeconfig = match (merged, first_missing) {
        (Some(kubeconfig), _) => kubeconfig,
        (None, Some(missing)) => return Err(SourceFailure::FileMissing(missing)),
        (None, None) => return Err(SourceFailure::NotProvided),
    };
    Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
        .await
        .map_err(|e| SourceFailure::Invalid(e.to_string()))
}

fn read_kubeconfig(path: &Path) -> Result<Kubeconfig, SourceFailure> {
    if !path.exists() {
        return Err(SourceFailure::FileMissing(path.to_path_buf()));
    }

    let cfg = Kubeconfig::read_from(path).map_err(|e| SourceFailure::Parse(e.to_string()))?;
    debug!(
        "kubeconfig: loaded {} context(s) from {}",
        cfg.contexts.len(),
        path.display()
    );
    Ok(cfg)
}

fn merge_kubeconfig(mut base: Kubeconfig, extra: Kubeconfig) -> Kubeconfig {
    base.clusters.extend(extra.clusters);
    base.auth_infos.extend(extra.auth_infos);
    base.contexts.extend(extra.contexts);
    if base.current_context.is_none() {
        base.current_context = extra.current_context;
    }
    base
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[tokio::test]
    async fn explicit_path_loads_a_valid_kubeconfig() {
        let file = write_temp(VALID_KUBECONFIG);
        let source = ExplicitPathSource::new(Some(file.path().to_path_buf()));

        let cfg = source.load().await.expect("valid kubeconfig should load");
        assert_eq!(cfg.cluster_url.host(), Some("127.0.0.1"));
        assert_eq!(cfg.cluster_url.port_u16(), Some(6443));
        assert_eq!(cfg.default_namespace, "default");
    }

    #[tokio::test]
    async fn explicit_path_absent_is_not_provided() {
        let source = ExplicitPathSource::new(None);
        assert_eq!(source.load().await.unwrap_err(), SourceFailure::NotProvided);
    }

    #[tokio::test]
    async fn missing_file_is_reported_with_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        let source = DefaultPathSource::new(Some(path.clone()));

        assert_eq!(source.load().await.unwrap_err(), SourceFailure::FileMissing(path));
    }

    #[tokio::test]
    async fn garbage_file_is_a_parse_error() {
        let file = write_temp("clusters: [this is: not: yaml");
        let source = EnvVarSource::new(KUBECONFIG_ENV, Some(file.path().display().to_string()));

        assert!(matches!(source.load().await, Err(SourceFailure::Parse(_))));
    }

    #[tokio::test]
    async fn env_var_merges_multiple_files() {
        let first = write_temp(VALID_KUBECONFIG);
        let second = write_temp(
            r#"
apiVersion: v1
kind: Config
clusters:
- name: other
  cluster:
    server: http://127.0.0.1:7443
contexts:
- name: other
  context:
    cluster: other
    user: other
current-context: other
users:
- name: other
  user:
    token: other-token
"#,
        );
        let joined = std::env::join_paths([first.path(), second.path()]).unwrap();
        let source = EnvVarSource::new(KUBECONFIG_ENV, Some(joined.to_string_lossy().into_owned()));

        let cfg = source.load().await.expect("merged kubeconfig should load");
        assert_eq!(cfg.cluster_url.port_u16(), Some(6443));
    }

    #[tokio::test]
    async fn env_var_skips_missing_entries() {
        let dir = tempfile::tempdir().unwrap();
        let present = write_temp(VALID_KUBECONFIG);
        let joined = std::env::join_paths([dir.path().join("gone"), present.path().to_path_buf()]).unwrap();
        let source = EnvVarSource::new(KUBECONFIG_ENV, Some(joined.to_string_lossy().into_owned()));

        let cfg = source.load().await.expect("the existing file should load");
        assert_eq!(cfg.cluster_url.port_u16(), Some(6443));
    }

    #[tokio::test]
    async fn env_var_fails_when_every_entry_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a");
        let joined = std::env::join_paths([first.clone(), dir.path().join("b")]).unwrap();
        let source = EnvVarSource::new(KUBECONFIG_ENV, Some(joined.to_string_lossy().into_owned()));

        assert_eq!(source.load().await.unwrap_err(), SourceFailure::FileMissing(first));
    }

    #[tokio::test]
    async fn in_cluster_probe_requires_service_host() {
        let source = InClusterSource::new(None, PathBuf::from(SERVICE_ACCOUNT_TOKEN_PATH));
        assert!(matches!(source.load().await, Err(SourceFailure::NotInCluster(_))));
    }

    #[tokio::test]
    async fn in_cluster_probe_requires_token_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = InClusterSource::new(Some("10.0.0.1".into()), dir.path().join("token"));
        assert!(matches!(source.load().await, Err(SourceFailure::NotInCluster(_))));
    }
}
