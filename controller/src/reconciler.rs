use std::fmt::Debug;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use skiff::kube::Resource;
use skiff::kube::runtime::controller::Action;
use tower::{Service, ServiceBuilder};

use crate::backoff::{BackoffError, DefaultBackoffLayer};
use crate::context::Context;
use crate::service::{Dispatch, reconcile};
use crate::tracing::TraceLayer;

/// One reconcile pass for one resource. Implementations must be
/// level-triggered: everything is re-derived from the resource handed in,
/// nothing carries over between passes.
#[async_trait::async_trait]
pub trait Reconciler {
    type Resource;
    type Error;

    async fn apply(
        &self,
        ctx: &Context,
        resource: &Self::Resource,
    ) -> Result<Action, Self::Error>;
}

pub type ReconcileError<E> = BackoffError<E>;
type ReconcileFuture<E> = BoxFuture<'static, Result<Action, ReconcileError<E>>>;
type ReconcileFn<R, E> = Box<dyn FnMut(Arc<R>, Arc<Context>) -> ReconcileFuture<E> + Send>;

#[allow(clippy::type_complexity)]
pub trait ReconcilerExt: Reconciler {
    fn service(
        self,
    ) -> impl Service<
        (Arc<Self::Resource>, Arc<Context>),
        Response = Action,
        Error = ReconcileError<Self::Error>,
        Future = ReconcileFuture<Self::Error>,
    > + Send
    + Sync
    + 'static
    where
        Self: Sized + Send + Sync + 'static,
        Self::Resource: Resource + Debug + Send + Sync + 'static,
        Self::Error: std::error::Error + Send + 'static,
    {
        ServiceBuilder::new()
            .layer(DefaultBackoffLayer::default())
            .layer(TraceLayer)
            .service(Dispatch::new(self))
    }

    fn reconcile(
        self,
    ) -> BoxFuture<
        'static,
        Result<ReconcileFn<Self::Resource, Self::Error>, ReconcileError<Self::Error>>,
    >
    where
        Self: Sized + Send + Sync + 'static,
        Self::Resource: Resource + Debug + Send + Sync + 'static,
        Self::Error: std::error::Error + Send + 'static,
    {
        reconcile(self.service()).boxed()
    }
}

impl<T> ReconcilerExt for T where T: Reconciler {}
