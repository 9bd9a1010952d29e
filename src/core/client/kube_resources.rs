/// Re-export the Kubernetes resource types the tools read from k8s-openapi

pub use k8s_openapi::api::core::v1::{Container, ContainerStatus, Namespace, Node, Pod, Service};

pub use k8s_openapi::api::apps::v1::Deployment;

pub use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
pub use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
