use std::fmt;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::Condition;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::endpoints::ApplicationEndpoint;
use crate::validation::replicas_non_negative;

/// Machine size tag selecting the compute and memory quota for an
/// application runtime.
///
/// Deliberately open over arbitrary strings: an unrecognized tag must reach
/// the reconciler and surface through the status conditions, not vanish at
/// the schema layer or fall back to a default tier.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq, Hash)]
pub struct RuntimeSize(String);

impl RuntimeSize {
    pub const BASIC: &'static str = "basic";
    pub const BASIC_2X: &'static str = "basic-2x";
    pub const STANDARD: &'static str = "standard";
    pub const STANDARD_2X: &'static str = "standard-2x";
    pub const PERFORMANCE: &'static str = "performance";

    pub fn new(size: impl ToString) -> Self {
        Self(size.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuntimeSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RuntimeSize {
    fn from(size: &str) -> Self {
        Self(size.to_string())
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRuntime {
    pub size: RuntimeSize,
    /// Container image reference, tag included.
    pub image: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationStatus {
    pub conditions: Option<Vec<Condition>>,
}

#[derive(CustomResource, Clone, Debug, Deserialize, Serialize, JsonSchema, Default)]
#[kube(
    group = "skiff.dev",
    version = "v1alpha1",
    kind = "Application",
    status = "ApplicationStatus",
    shortname = "app",
    namespaced,
    validation = replicas_non_negative(),
)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSpec {
    /// Number of instances to run.
    #[serde(default)]
    pub replicas: i32,
    pub runtime: ApplicationRuntime,
    /// Ports the application listens on. Empty for workers that expose
    /// nothing.
    #[serde(default)]
    pub endpoints: Vec<ApplicationEndpoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch_command: Option<Vec<String>>,
}
