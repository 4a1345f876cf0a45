use skiff::k8s_openapi::apimachinery::pkg::apis::meta::v1::{Condition, Time};
use skiff::{Application, prelude::*, set_condition};

use crate::context::Context;
use crate::retry::retry_on_conflict;

pub(crate) const CONDITION_AVAILABLE: &str = "Available";
const REASON_RECONCILED: &str = "Reconciled";
const REASON_ERROR: &str = "ReconcileError";

/// One re-fetch-and-retry when the status write races another writer; a
/// second conflict fails the pass.
const CONFLICT_RETRIES: usize = 1;

pub(crate) async fn report_reconciled(
    ctx: &Context,
    app: &Application,
) -> Result<(), skiff::Error> {
    let message = format!(
        "Application {} reconciled with {} replicas",
        app.name()?,
        app.spec.replicas
    );
    report(ctx, app, "True", REASON_RECONCILED, message).await
}

pub(crate) async fn report_error(
    ctx: &Context,
    app: &Application,
    error: &skiff::Error,
) -> Result<(), skiff::Error> {
    let message = format!("Failed to reconcile application {}: {}", app.name()?, error);
    report(ctx, app, "False", REASON_ERROR, message).await
}

async fn report(
    ctx: &Context,
    app: &Application,
    status: &'static str,
    reason: &'static str,
    message: String,
) -> Result<(), skiff::Error> {
    let api = ctx.api_namespaced::<Application>(app.require_namespace()?);
    let name = app.name()?.to_string();
    retry_on_conflict(CONFLICT_RETRIES, || {
        let api = api.clone();
        let name = name.clone();
        let message = message.clone();
        async move {
            // Write on top of the latest copy so concurrent edits to the
            // rest of the object are not clobbered.
            let mut app = api.get(&name).await?;
            let condition = Condition {
                type_: CONDITION_AVAILABLE.to_string(),
                status: status.to_string(),
                reason: reason.to_string(),
                message,
                observed_generation: app.metadata.generation,
                last_transition_time: Time(chrono::Utc::now()),
            };
            let conditions = app
                .status
                .get_or_insert_default()
                .conditions
                .get_or_insert_default();
            set_condition(conditions, condition);
            api.replace_status(&app).await?;
            Ok(())
        }
    })
    .await
}
