use std::time::Duration;

use skiff::k8s_openapi::api::networking::v1::{
    HTTPIngressPath, HTTPIngressRuleValue, Ingress, IngressBackend, IngressRule,
    IngressServiceBackend, IngressSpec, ServiceBackendPort,
};
use skiff::kube::api::ObjectMeta;
use skiff::{Application, ApplicationEndpoint, prelude::*};

use crate::context::Context;
use crate::labels;

const INGRESS_CLASS: &str = "skiff-ingress";

/// An ingress is desired only when some endpoint asks for a public domain.
pub(crate) fn desired(app: &Application) -> bool {
    app.spec.endpoints.has_hosts()
}

pub(crate) fn build(app: &Application) -> Result<Ingress, skiff::Error> {
    let name = app.name()?;
    let object_labels = labels::merge([
        app.metadata.labels.clone().unwrap_or_default(),
        labels::selector(name),
        [(
            "kubernetes.io/ingress.class".to_string(),
            INGRESS_CLASS.to_string(),
        )]
        .into(),
    ]);
    Ok(Ingress {
        metadata: ObjectMeta {
            name: app.metadata.name.clone(),
            namespace: app.metadata.namespace.clone(),
            labels: Some(object_labels),
            owner_references: Some(vec![app.static_controller_owner_ref()?]),
            ..Default::default()
        },
        spec: Some(IngressSpec {
            rules: Some(rules(name, &app.spec.endpoints)),
            ..Default::default()
        }),
        ..Default::default()
    })
}

/// One rule per distinct domain, one path per endpoint in that domain,
/// every path backed by the sibling service at the endpoint's port.
fn rules(backend: &str, endpoints: &[ApplicationEndpoint]) -> Vec<IngressRule> {
    endpoints
        .by_host()
        .into_iter()
        .map(|(host, group)| IngressRule {
            host: Some(host.to_string()),
            http: Some(HTTPIngressRuleValue {
                paths: group
                    .into_iter()
                    .map(|endpoint| HTTPIngressPath {
                        path: Some(endpoint.domain_path.clone()),
                        path_type: "Prefix".to_string(),
                        backend: IngressBackend {
                            service: Some(IngressServiceBackend {
                                name: backend.to_string(),
                                port: Some(ServiceBackendPort {
                                    number: Some(endpoint.port),
                                    ..Default::default()
                                }),
                            }),
                            ..Default::default()
                        },
                    })
                    .collect(),
            }),
        })
        .collect()
}

pub(crate) async fn sync(
    ctx: &Context,
    app: &Application,
) -> Result<Option<Duration>, skiff::Error> {
    let api = ctx.api_namespaced::<Ingress>(app.require_namespace()?);
    let name = app.name()?;
    match (api.get_opt(name).await?, desired(app)) {
        (None, false) => {}
        (None, true) => {
            api.create(&build(app)?).await?;
        }
        (Some(existing), true) => {
            let mut desired = build(app)?;
            desired.metadata.resource_version = existing.metadata.resource_version.clone();
            desired.metadata.uid = existing.metadata.uid.clone();
            api.replace(&desired).await?;
        }
        (Some(_), false) => {
            api.delete(name).await?;
        }
    }
    Ok(None)
}
