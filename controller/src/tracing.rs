use std::fmt::Debug;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use skiff::kube::Resource;
use tower::{Layer, Service};
use tracing::Level;

use crate::context::Context;

pub struct TraceService<S> {
    inner: S,
}

impl<S, T> Service<(Arc<T>, Arc<Context>)> for TraceService<S>
where
    S: Service<(Arc<T>, Arc<Context>)> + Send,
    T: Resource + Debug + Send + Sync,
    S::Future: Send + 'static,
    S::Error: Debug,
    S::Response: Debug,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, (resource, ctx): (Arc<T>, Arc<Context>)) -> Self::Future {
        let span = tracing::span!(
            Level::INFO,
            "reconcile",
            name = resource.meta().name.as_deref(),
            namespace = resource.meta().namespace.as_deref(),
        );
        let fut = {
            let _guard = span.enter();
            self.inner.call((resource, ctx))
        };
        async move {
            let _guard = span.enter();
            match fut.await {
                Ok(action) => {
                    tracing::info!("reconciled: {action:?}");
                    Ok(action)
                }
                Err(err) => {
                    tracing::error!("reconcile failed: {err:?}");
                    Err(err)
                }
            }
        }
        .boxed()
    }
}

pub struct TraceLayer;

impl<S> Layer<S> for TraceLayer {
    type Service = TraceService<S>;

    fn layer(&self, inner: S) -> TraceService<S> {
        TraceService { inner }
    }
}
