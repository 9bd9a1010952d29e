// Kubernetes access
pub mod cluster_api;
pub mod credential_sources;
pub mod kube_client;
pub mod kube_resources;
pub mod mappers;
pub mod listing;
pub mod pods;

#[cfg(test)]
pub mod fake_cluster;

// Reasoning backends
pub mod llm;
