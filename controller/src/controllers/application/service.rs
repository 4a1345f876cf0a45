use std::time::Duration;

use skiff::k8s_openapi::api::core::v1::{Service, ServiceSpec};
use skiff::kube::api::ObjectMeta;
use skiff::{Application, prelude::*};

use crate::context::Context;
use crate::labels;

/// A service is desired as soon as the application exposes any endpoint,
/// domain or not.
pub(crate) fn desired(app: &Application) -> bool {
    !app.spec.endpoints.is_empty()
}

pub(crate) fn build(app: &Application) -> Result<Service, skiff::Error> {
    let name = app.name()?;
    let selector = labels::selector(name);
    let object_labels = labels::merge([
        app.metadata.labels.clone().unwrap_or_default(),
        selector.clone(),
    ]);
    Ok(Service {
        metadata: ObjectMeta {
            name: app.metadata.name.clone(),
            namespace: app.metadata.namespace.clone(),
            labels: Some(object_labels),
            owner_references: Some(vec![app.static_controller_owner_ref()?]),
            ..Default::default()
        },
        spec: Some(ServiceSpec {
            type_: Some("ClusterIP".to_string()),
            selector: Some(selector),
            ports: Some(app.spec.endpoints.service_ports()),
            ..Default::default()
        }),
        ..Default::default()
    })
}

pub(crate) async fn sync(
    ctx: &Context,
    app: &Application,
) -> Result<Option<Duration>, skiff::Error> {
    let api = ctx.api_namespaced::<Service>(app.require_namespace()?);
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
            // The cluster IP is allocated server-side and immutable; a
            // replace that clears it is rejected.
            if let (Some(spec), Some(live)) = (desired.spec.as_mut(), existing.spec.as_ref()) {
                spec.cluster_ip = live.cluster_ip.clone();
                spec.cluster_ips = live.cluster_ips.clone();
            }
            api.replace(&desired).await?;
        }
        (Some(_), false) => {
            api.delete(name).await?;
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::application;
    use skiff::ApplicationEndpoint;
    use skiff::k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

    #[test]
    fn test_not_desired_without_endpoints() {
        assert!(!desired(&application("web", |_| {})));
        assert!(desired(&application("web", |spec| {
            spec.endpoints = vec![ApplicationEndpoint::new(80)];
        })));
    }

    #[test]
    fn test_build_dedups_ports_and_targets_them() {
        let app = application("web", |spec| {
            spec.endpoints = vec![
                ApplicationEndpoint::new(80),
                ApplicationEndpoint::new(8080),
                ApplicationEndpoint::new(8080).with_domain("x"),
            ];
        });
        let service = build(&app).unwrap();
        let spec = service.spec.unwrap();
        let ports = spec.ports.unwrap();
        assert_eq!(ports.len(), 2);
        assert_eq!(ports[1].port, 8080);
        assert_eq!(ports[1].target_port, Some(IntOrString::Int(8080)));
        assert_eq!(
            spec.selector.unwrap()["app.kubernetes.io/instance"],
            "web"
        );
    }

    #[test]
    fn test_build_is_deterministic() {
        let app = application("web", |spec| {
            spec.endpoints = vec![
                ApplicationEndpoint::new(443).with_domain("a.com"),
                ApplicationEndpoint::new(80),
            ];
        });
        assert_eq!(
            serde_json::to_value(build(&app).unwrap()).unwrap(),
            serde_json::to_value(build(&app).unwrap()).unwrap()
        );
    }
}
