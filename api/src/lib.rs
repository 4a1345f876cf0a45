mod api;
mod client;
mod conditions;
mod crd;
mod endpoints;
mod error;
mod meta;
mod validation;

pub use k8s_openapi;
pub use kube;

pub use api::Api;
pub use client::{Client, ClientBuilder};
pub use conditions::{find_condition, set_condition};
pub use crd::{Application, ApplicationRuntime, ApplicationSpec, ApplicationStatus, RuntimeSize};
pub use endpoints::{ApplicationEndpoint, ApplicationEndpointsExt};
pub use error::{ClientBuildError, Error, Result};
pub use meta::{ResourceNameExt, ResourceOwnerRefExt};

pub mod prelude {
    pub use super::{ApplicationEndpointsExt, ResourceNameExt, ResourceOwnerRefExt};
    pub use kube::{Resource, ResourceExt};
}
