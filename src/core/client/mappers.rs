/// Maps kube-rs / k8s-openapi types → flat records for the reasoning agent
use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;

use crate::core::client::kube_resources::{
    Container, ContainerStatus, Deployment, IntOrString, Namespace, Node, Pod, Quantity, Service,
};
use crate::domain::tool::dto::resource_records::{
    ConditionSummary, ContainerDetail, ContainerPortDetail, ContainerState, ContainerStatusDetail,
    DeploymentSummary, EnvVarDetail, NamespaceSummary, NodeSummary, PodConditionDetail, PodDetail,
    PodSpecDetail, PodStatusDetail, PodSummary, ResourceAmounts, ServicePort, ServiceSummary,
};

const UNKNOWN: &str = "Unknown";
const NODE_ROLE_PREFIX: &str = "node-role.kubernetes.io/";

fn time_to_string(t: &Time) -> String {
    t.0.to_string()
}

fn quantities_to_strings(map: Option<&BTreeMap<String, Quantity>>) -> BTreeMap<String, String> {
    map.map(|m| m.iter().map(|(k, v)| (k.clone(), v.0.clone())).collect())
        .unwrap_or_default()
}

pub fn map_pod_to_summary(pod: &Pod) -> PodSummary {
    let metadata = &pod.metadata;
    let spec = pod.spec.as_ref();
    let status = pod.status.as_ref();
    let statuses = status
        .and_then(|s| s.container_statuses.as_deref())
        .unwrap_or_default();

    PodSummary {
        name: metadata.name.clone().unwrap_or_default(),
        namespace: metadata.namespace.clone().unwrap_or_default(),
        phase: status
            .and_then(|s| s.phase.clone())
            .unwrap_or_else(|| UNKNOWN.to_string()),
        node: spec.and_then(|s| s.node_name.clone()),
        restart_count: statuses.iter().map(|cs| cs.restart_count).sum(),
        pod_ip: status.and_then(|s| s.pod_ip.clone()),
        containers: spec.map(|s| s.containers.len()).unwrap_or(0),
        ready_containers: statuses.iter().filter(|cs| cs.ready).count(),
    }
}

pub fn map_node_to_summary(node: &Node) -> NodeSummary {
    let status = node.status.as_ref();

    let ready = status
        .and_then(|s| s.conditions.as_ref())
        .and_then(|conds| conds.iter().find(|c| c.type_ == "Ready"))
        .map(|c| c.status == "True")
        .unwrap_or(false);

    let mut roles: Vec<String> = node
        .metadata
        .labels
        .as_ref()
        .map(|labels| {
            labels
                .keys()
                .filter_map(|k| k.strip_prefix(NODE_ROLE_PREFIX))
                .filter(|role| !role.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    if roles.is_empty() {
        roles.push("worker".to_string());
    }

    let amounts = |map: Option<&BTreeMap<String, Quantity>>| {
        let get = |key: &str| {
            map.and_then(|m| m.get(key))
                .map(|q| q.0.clone())
                .unwrap_or_else(|| UNKNOWN.to_string())
        };
        ResourceAmounts {
            cpu: get("cpu"),
            memory: get("memory"),
            pods: get("pods"),
        }
    };

    let (kubelet_version, os, architecture) = status
        .and_then(|s| s.node_info.as_ref())
        .map(|info| {
            (
                info.kubelet_version.clone(),
                info.operating_system.clone(),
                info.architecture.clone(),
            )
        })
        .unwrap_or_else(|| (UNKNOWN.to_string(), UNKNOWN.to_string(), UNKNOWN.to_string()));

    NodeSummary {
        name: node.metadata.name.clone().unwrap_or_default(),
        status: if ready { "Ready" } else { "NotReady" }.to_string(),
        roles,
        capacity: amounts(status.and_then(|s| s.capacity.as_ref())),
        allocatable: amounts(status.and_then(|s| s.allocatable.as_ref())),
        kubelet_version,
        os,
        architecture,
    }
}

pub fn map_namespace_to_summary(ns: &Namespace) -> NamespaceSummary {
    NamespaceSummary {
        name: ns.metadata.name.clone().unwrap_or_default(),
        status: ns
            .status
            .as_ref()
            .and_then(|s| s.phase.clone())
            .unwrap_or_else(|| UNKNOWN.to_string()),
        created: ns.metadata.creation_timestamp.as_ref().map(time_to_string),
    }
}

pub fn map_service_to_summary(svc: &Service) -> ServiceSummary {
    let spec = svc.spec.as_ref();
    let type_ = spec
        .and_then(|s| s.type_.clone())
        .unwrap_or_else(|| "ClusterIP".to_string());

    let ports = spec
        .and_then(|s| s.ports.as_ref())
        .map(|ports| {
            ports
                .iter()
                .map(|p| ServicePort {
                    name: p.name.clone(),
                    protocol: p.protocol.clone(),
                    port: p.port,
                    target_port: p.target_port.as_ref().map(|tp| match tp {
                        IntOrString::Int(i) => i.to_string(),
                        IntOrString::String(s) => s.clone(),
                    }),
                    node_port: p.node_port,
                })
                .collect()
        })
        .unwrap_or_default();

    let load_balancer_ips = if type_ == "LoadBalancer" {
        svc.status
            .as_ref()
            .and_then(|s| s.load_balancer.as_ref())
            .and_then(|lb| lb.ingress.as_ref())
            .map(|ingress| ingress.iter().filter_map(|i| i.ip.clone()).collect())
            .unwrap_or_default()
    } else {
        Vec::new()
    };

    ServiceSummary {
        name: svc.metadata.name.clone().unwrap_or_default(),
        namespace: svc.metadata.namespace.clone().unwrap_or_default(),
        type_,
        cluster_ip: spec.and_then(|s| s.cluster_ip.clone()),
        ports,
        external_ips: spec.and_then(|s| s.external_ips.clone()).unwrap_or_default(),
        load_balancer_ips,
    }
}

pub fn map_deployment_to_summary(dep: &Deployment) -> DeploymentSummary {
    let status = dep.status.as_ref();

    DeploymentSummary {
        name: dep.metadata.name.clone().unwrap_or_default(),
        namespace: dep.metadata.namespace.clone().unwrap_or_default(),
        // Kubernetes defaults an unset replica count to 1
        replicas_desired: dep.spec.as_ref().and_then(|s| s.replicas).unwrap_or(1),
        replicas_available: status.and_then(|s| s.available_replicas).unwrap_or(0),
        ready_replicas: status.and_then(|s| s.ready_replicas).unwrap_or(0),
        updated_replicas: status.and_then(|s| s.updated_replicas).unwrap_or(0),
        conditions: status
            .and_then(|s| s.conditions.as_ref())
            .map(|conds| {
                conds
                    .iter()
                    .map(|c| ConditionSummary {
                        type_: c.type_.clone(),
                        status: c.status.clone(),
                        reason: c.reason.clone(),
                        message: c.message.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default(),
    }
}

fn map_container(c: &Container) -> ContainerDetail {
    let resources = c.resources.as_ref();
    ContainerDetail {
        name: c.name.clone(),
        image: c.image.clone(),
        ports: c
            .ports
            .as_ref()
            .map(|ports| {
                ports
                    .iter()
                    .map(|p| ContainerPortDetail {
                        container_port: p.container_port,
                        protocol: p.protocol.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default(),
        env: c
            .env
            .as_ref()
            .map(|env| {
                env.iter()
                    .filter_map(|e| {
                        e.value.as_ref().map(|v| EnvVarDetail {
                            name: e.name.clone(),
                            value: v.clone(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default(),
        requests: quantities_to_strings(resources.and_then(|r| r.requests.as_ref())),
        limits: quantities_to_strings(resources.and_then(|r| r.limits.as_ref())),
    }
}

fn map_container_status(cs: &ContainerStatus) -> ContainerStatusDetail {
    let state = cs.state.as_ref().and_then(|s| {
        if let Some(running) = &s.running {
            Some(ContainerState::Running {
                started_at: running.started_at.as_ref().map(time_to_string),
            })
        } else if let Some(term) = &s.terminated {
            Some(ContainerState::Terminated {
                exit_code: term.exit_code,
                reason: term.reason.clone(),
                message: term.message.clone(),
            })
        } else {
            s.waiting.as_ref().map(|w| ContainerState::Waiting {
                reason: w.reason.clone(),
                message: w.message.clone(),
            })
        }
    });

    ContainerStatusDetail {
        name: cs.name.clone(),
        ready: cs.ready,
        restart_count: cs.restart_count,
        image: cs.image.clone(),
        image_id: cs.image_id.clone(),
        container_id: cs.container_id.clone(),
        state,
    }
}

pub fn map_pod_to_detail(pod: &Pod) -> PodDetail {
    let metadata = &pod.metadata;
    let spec = pod.spec.as_ref();
    let status = pod.status.as_ref();

    PodDetail {
        name: metadata.name.clone().unwrap_or_default(),
        namespace: metadata.namespace.clone().unwrap_or_default(),
        uid: metadata.uid.clone(),
        created: metadata.creation_timestamp.as_ref().map(time_to_string),
        labels: metadata.labels.clone().unwrap_or_default(),
        annotations: metadata.annotations.clone().unwrap_or_default(),
        status: PodStatusDetail {
            phase: status
                .and_then(|s| s.phase.clone())
                .unwrap_or_else(|| UNKNOWN.to_string()),
            message: status.and_then(|s| s.message.clone()),
            reason: status.and_then(|s| s.reason.clone()),
            pod_ip: status.and_then(|s| s.pod_ip.clone()),
            host_ip: status.and_then(|s| s.host_ip.clone()),
            start_time: status.and_then(|s| s.start_time.as_ref()).map(time_to_string),
        },
        spec: PodSpecDetail {
            node_name: spec.and_then(|s| s.node_name.clone()),
            restart_policy: spec.and_then(|s| s.restart_policy.clone()),
            service_account: spec.and_then(|s| s.service_account_name.clone()),
            containers: spec
                .map(|s| s.containers.iter().map(map_container).collect())
                .unwrap_or_default(),
        },
        container_statuses: status
            .and_then(|s| s.container_statuses.as_ref())
            .map(|list| list.iter().map(map_container_status).collect())
            .unwrap_or_default(),
        conditions: status
            .and_then(|s| s.conditions.as_ref())
            .map(|conds| {
                conds
                    .iter()
                    .map(|c| PodConditionDetail {
                        type_: c.type_.clone(),
                        status: c.status.clone(),
                        reason: c.reason.clone(),
                        message: c.message.clone(),
                        last_transition_time: c.last_transition_time.as_ref().map(time_to_string),
                    })
                    .collect()
            })
            .unwrap_or_default(),
    }
}

/// Names of the containers declared in the pod spec, in declaration order.
pub fn container_names(pod: &Pod) -> Vec<String> {
    pod.spec
        .as_ref()
        .map(|s| s.containers.iter().map(|c| c.name.clone()).collect())
        .unwrap_or_default()
}
