use std::time::Duration;

use skiff::k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use skiff::k8s_openapi::api::core::v1::{
    Capabilities, Container, PodSecurityContext, PodSpec, PodTemplateSpec, SeccompProfile,
    SecurityContext,
};
use skiff::k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use skiff::kube::api::ObjectMeta;
use skiff::{Application, prelude::*};

use crate::context::Context;
use crate::labels;
use crate::resources::Resources;

/// Give the apiserver time to observe a freshly created workload before the
/// next pass reports it healthy.
const CREATE_REQUEUE: Duration = Duration::from_secs(60);

pub(crate) fn build(app: &Application) -> Result<Deployment, skiff::Error> {
    let name = app.name()?;
    let selector = labels::selector(name);
    let object_labels = labels::merge([
        app.metadata.labels.clone().unwrap_or_default(),
        selector.clone(),
        [(
            labels::VERSION.to_string(),
            app.spec.runtime.image.clone(),
        )]
        .into(),
    ]);
    let resources = Resources::for_size(&app.spec.runtime.size)?;
    let ports = app.spec.endpoints.container_ports();
    Ok(Deployment {
        metadata: ObjectMeta {
            name: app.metadata.name.clone(),
            namespace: app.metadata.namespace.clone(),
            labels: Some(object_labels.clone()),
            owner_references: Some(vec![app.static_controller_owner_ref()?]),
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            replicas: Some(app.spec.replicas),
            selector: LabelSelector {
                match_labels: Some(selector),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(object_labels),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    security_context: Some(PodSecurityContext {
                        run_as_non_root: Some(true),
                        seccomp_profile: Some(SeccompProfile {
                            type_: "RuntimeDefault".to_string(),
                            ..Default::default()
                        }),
                        ..Default::default()
                    }),
                    containers: vec![Container {
                        name: "app".to_string(),
                        image: Some(app.spec.runtime.image.clone()),
                        image_pull_policy: Some("IfNotPresent".to_string()),
                        command: app.spec.launch_command.clone(),
                        ports: (!ports.is_empty()).then_some(ports),
                        resources: Some(resources.into()),
                        security_context: Some(SecurityContext {
                            run_as_non_root: Some(true),
                            allow_privilege_escalation: Some(false),
                            capabilities: Some(Capabilities {
                                drop: Some(vec!["ALL".to_string()]),
                                ..Default::default()
                            }),
                            ..Default::default()
                        }),
                        ..Default::default()
                    }],
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    })
}

/// A workload is always desired while the parent lives; the only decision
/// here is create versus replace.
pub(crate) async fn sync(
    ctx: &Context,
    app: &Application,
) -> Result<Option<Duration>, skiff::Error> {
    let api = ctx.api_namespaced::<Deployment>(app.require_namespace()?);
    match api.get_opt(app.name()?).await? {
        None => {
            api.create(&build(app)?).await?;
            Ok(Some(CREATE_REQUEUE))
        }
        Some(existing) => {
            // Full rebuild of the mutable fields; only identity is carried
            // over, which keeps the write conditional on the version read
            // above.
            let mut desired = build(app)?;
            desired.metadata.resource_version = existing.metadata.resource_version.clone();
            desired.metadata.uid = existing.metadata.uid.clone();
            api.replace(&desired).await?;
            Ok(None)
        }
    }
}
