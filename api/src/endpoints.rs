use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::{ContainerPort, ServicePort};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

fn default_domain_path() -> String {
    "/".to_string()
}

/// A port the application listens on, optionally exposed on a public domain.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationEndpoint {
    pub port: i32,
    /// Leave unset to keep the endpoint off the internet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default = "default_domain_path")]
    pub domain_path: String,
}

impl ApplicationEndpoint {
    pub fn new(port: i32) -> Self {
        Self {
            port,
            domain: None,
            domain_path: default_domain_path(),
        }
    }

    pub fn with_domain(mut self, domain: impl ToString) -> Self {
        self.domain = Some(domain.to_string());
        self
    }

    pub fn with_domain_path(mut self, path: impl ToString) -> Self {
        self.domain_path = path.to_string();
        self
    }

    fn port_name(&self) -> String {
        format!("port{}", self.port)
    }

    /// The domain this endpoint is served on, if any. An empty string counts
    /// as unset.
    pub fn host(&self) -> Option<&str> {
        self.domain.as_deref().filter(|domain| !domain.is_empty())
    }

    pub fn container_port(&self) -> ContainerPort {
        ContainerPort {
            name: Some(self.port_name()),
            container_port: self.port,
            ..Default::default()
        }
    }

    /// TCP is the only supported transport.
    pub fn service_port(&self) -> ServicePort {
        ServicePort {
            name: Some(self.port_name()),
            port: self.port,
            target_port: Some(IntOrString::Int(self.port)),
            protocol: Some("TCP".to_string()),
            ..Default::default()
        }
    }
}

pub trait ApplicationEndpointsExt {
    /// One entry per distinct port number, in port order. Endpoints sharing
    /// a port collapse to a single entry; routing per domain happens at the
    /// ingress, not the container.
    fn container_ports(&self) -> Vec<ContainerPort>;

    /// One entry per distinct port number, in port order.
    fn service_ports(&self) -> Vec<ServicePort>;

    /// Endpoints carrying a domain, grouped by it.
    fn by_host(&self) -> BTreeMap<&str, Vec<&ApplicationEndpoint>>;

    fn has_hosts(&self) -> bool {
        !self.by_host().is_empty()
    }
}

impl ApplicationEndpointsExt for [ApplicationEndpoint] {
    fn container_ports(&self) -> Vec<ContainerPort> {
        self.iter()
            .map(|endpoint| (endpoint.port, endpoint.container_port()))
            .collect::<BTreeMap<_, _>>()
            .into_values()
            .collect()
    }

    fn service_ports(&self) -> Vec<ServicePort> {
        self.iter()
            .map(|endpoint| (endpoint.port, endpoint.service_port()))
            .collect::<BTreeMap<_, _>>()
            .into_values()
            .collect()
    }

    fn by_host(&self) -> BTreeMap<&str, Vec<&ApplicationEndpoint>> {
        let mut groups: BTreeMap<&str, Vec<&ApplicationEndpoint>> = BTreeMap::new();
        for endpoint in self {
            if let Some(host) = endpoint.host() {
                groups.entry(host).or_default().push(endpoint);
            }
        }
        groups
    }
}
