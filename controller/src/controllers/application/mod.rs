mod deployment;
mod ingress;
mod service;
mod status;

use std::sync::Arc;
use std::time::Duration;

use futures::prelude::*;
use skiff::k8s_openapi::api::apps::v1::Deployment;
use skiff::k8s_openapi::api::core::v1::Service;
use skiff::k8s_openapi::api::networking::v1::Ingress;
use skiff::kube::runtime::{Controller, controller::Action};
use skiff::{Application, prelude::*};

use crate::backoff::error_policy;
use crate::context::Context;
use crate::error::ControllerResult;
use crate::reconciler::{ReconcileError, Reconciler, ReconcilerExt};

#[derive(Debug, Clone, Copy)]
struct ApplicationReconciler;

fn longest(current: Option<Duration>, requested: Option<Duration>) -> Option<Duration> {
    match (current, requested) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

#[async_trait::async_trait]
impl Reconciler for ApplicationReconciler {
    type Resource = Application;
    type Error = skiff::Error;

    async fn apply(&self, ctx: &Context, app: &Application) -> Result<Action, Self::Error> {
        let namespace = app.require_namespace()?;
        let name = app.name()?;

        // Level-triggered: desired state comes from a fresh read every pass,
        // never from the cached copy the watcher handed us. Gone means
        // deleted; owner references take care of the children.
        let Some(app) = ctx
            .api_namespaced::<Application>(namespace)
            .get_opt(name)
            .await?
        else {
            return Ok(Action::await_change());
        };
        if app.metadata.deletion_timestamp.is_some() {
            return Ok(Action::await_change());
        }

        // Fixed order, first error wins: the status report below must
        // reflect a deterministic failure.
        let outcome = async {
            let mut requeue = None;
            requeue = longest(requeue, deployment::sync(ctx, &app).await?);
            requeue = longest(requeue, service::sync(ctx, &app).await?);
            requeue = longest(requeue, ingress::sync(ctx, &app).await?);
            Ok::<_, skiff::Error>(requeue)
        }
        .await;

        match outcome {
            // A child was just created; hold the success report until the
            // re-check has observed it.
            Ok(Some(delay)) => Ok(Action::requeue(delay)),
            Ok(None) => {
                status::report_reconciled(ctx, &app).await?;
                Ok(Action::await_change())
            }
            Err(err) => {
                // Conflicts are routine write races, not user-visible
                // failures; the pass just re-runs. Everything else lands in
                // the status conditions.
                if !err.is_conflict() {
                    status::report_error(ctx, &app, &err).await?;
                }
                Err(err)
            }
        }
    }
}

pub fn controller(ctx: &Context) -> Controller<Application> {
    let apps = ctx.api_all::<Application>().kube().clone();
    let deployments = ctx.api_all::<Deployment>().kube().clone();
    let services = ctx.api_all::<Service>().kube().clone();
    let ingresses = ctx.api_all::<Ingress>().kube().clone();
    Controller::new(apps, Default::default())
        .owns(deployments, Default::default())
        .owns(services, Default::default())
        .owns(ingresses, Default::default())
}

pub async fn run(
    ctx: Arc<Context>,
    shutdown_signal: impl Future<Output = ()> + Send + Sync + 'static,
) -> Result<
    impl Stream<Item = ControllerResult<Application, ReconcileError<skiff::Error>>>,
    ReconcileError<skiff::Error>,
> {
    Ok(controller(&ctx).graceful_shutdown_on(shutdown_signal).run(
        ApplicationReconciler.reconcile().await?,
        error_policy,
        ctx,
    ))
}
