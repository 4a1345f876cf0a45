use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use skiff::kube::Resource;
use skiff::kube::runtime::controller::Action;
use tower::{Service, ServiceExt};

use crate::context::Context;
use crate::reconciler::Reconciler;

/// Adapter from a [`Reconciler`] to a tower [`Service`], the bottom of the
/// reconcile stack.
pub struct Dispatch<T> {
    reconciler: Arc<T>,
}

impl<T> Dispatch<T> {
    pub fn new(reconciler: T) -> Self {
        Self {
            reconciler: Arc::new(reconciler),
        }
    }
}

impl<T, R> Service<(Arc<R>, Arc<Context>)> for Dispatch<T>
where
    T: Reconciler<Resource = R> + Send + Sync + 'static,
    R: Resource + Send + Sync + 'static,
    T::Error: Send + 'static,
{
    type Response = Action;
    type Error = T::Error;
    type Future = BoxFuture<'static, Result<Action, T::Error>>;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, (resource, ctx): (Arc<R>, Arc<Context>)) -> Self::Future {
        let reconciler = self.reconciler.clone();
        async move { reconciler.apply(&ctx, &resource).await }.boxed()
    }
}

pub async fn reconcile<S, T>(
    mut service: S,
) -> Result<Box<dyn FnMut(Arc<T>, Arc<Context>) -> S::Future + Send>, S::Error>
where
    S: Service<(Arc<T>, Arc<Context>)> + Send + 'static,
{
    service.ready().await?;
    Ok(Box::new(move |resource: Arc<T>, ctx: Arc<Context>| {
        service.call((resource, ctx))
    }))
}
