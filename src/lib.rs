//! Tool-dispatch core of a Kubernetes question-answering agent: cluster
//! credential resolution, read-only resource tools with a uniform result
//! envelope, and a configuration-selected reasoning backend.

pub mod api;
pub mod app_state;
pub mod core;
pub mod domain;
pub mod errors;
pub mod routes;
