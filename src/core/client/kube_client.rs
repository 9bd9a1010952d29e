use std::sync::Arc;

use kube::{Client, Config};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::core::client::cluster_api::{ClusterApi, KubeClusterApi};
use crate::core::client::credential_sources::{
    standard_sources, CredentialSource, CredentialSourceKind, SourceFailure,
};
use crate::core::config::app_config::ClusterSettings;
use crate::errors::{ConnectionError, SourceAttempt};

/// The configuration produced by the first usable credential source.
pub struct ResolvedCredential {
    pub source: CredentialSourceKind,
    pub config: Config,
}

struct Connection {
    /// `None` when the client was supplied directly.
    source: Option<CredentialSourceKind>,
    api: Arc<dyn ClusterApi>,
}

/// Resolves cluster credentials from an ordered chain of sources and caches
/// the resulting client for the lifetime of the owner.
pub struct ClusterConnector {
    sources: Vec<Box<dyn CredentialSource>>,
    client: OnceCell<Connection>,
}

impl ClusterConnector {
    pub fn new(sources: Vec<Box<dyn CredentialSource>>) -> Self {
        Self {
            sources,
            client: OnceCell::new(),
        }
    }

    pub fn from_settings(settings: &ClusterSettings) -> Self {
        Self::new(standard_sources(settings))
    }

    /// A connector whose client is already known; the source chain is never consulted.
    pub fn with_client(client: Arc<dyn ClusterApi>) -> Self {
        Self {
            sources: Vec::new(),
            client: OnceCell::new_with(Some(Connection {
                source: None,
                api: client,
            })),
        }
    }

    /// Walk the sources in priority order and stop at the first that loads.
    pub async fn resolve(&self) -> Result<ResolvedCredential, ConnectionError> {
        let mut attempts = Vec::with_capacity(self.sources.len());

        for source in &self.sources {
            match source.load().await {
                Ok(config) => {
                    info!("Kubernetes credentials loaded from {}", source.kind());
                    return Ok(ResolvedCredential {
                        source: source.kind(),
                        config,
                    });
                }
                Err(failure) => {
                    debug!("Credential source {} unusable: {}", source.kind(), failure);
                    attempts.push(SourceAttempt {
                        source: source.kind(),
                        failure,
                    });
                }
            }
        }

        warn!("No Kubernetes credential source was usable");
        Err(ConnectionError { attempts })
    }

    /// The shared cluster client, resolved on first use.
    pub async fn client(&self) -> Result<Arc<dyn ClusterApi>, ConnectionError> {
        self.client
            .get_or_try_init(|| async {
                let resolved = self.resolve().await?;
                let client = Client::try_from(resolved.config).map_err(|e| ConnectionError {
                    attempts: vec![SourceAttempt {
                        source: resolved.source,
                        failure: SourceFailure::Invalid(e.to_string()),
                    }],
                })?;

                debug!("Kubernetes client initialized successfully");
                Ok::<_, ConnectionError>(Connection {
                    source: Some(resolved.source),
                    api: Arc::new(KubeClusterApi::new(client)),
                })
            })
            .await
            .map(|conn| conn.api.clone())
    }

    pub fn is_connected(&self) -> bool {
        self.client.initialized()
    }

    /// The source the cached client was built from, once connected.
    pub fn connected_source(&self) -> Option<CredentialSourceKind> {
        self.client.get().and_then(|conn| conn.source)
    }
}
