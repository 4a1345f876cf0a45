use std::fmt::Debug;

use kube::Resource;
use kube::api::{DeleteParams, PostParams};
use serde::{Serialize, de::DeserializeOwned};

use crate::{ResourceNameExt, Result};

/// One typed view on the store, the only seam the reconcilers write
/// through. Every method is a single call; retry policy belongs to the
/// callers.
pub struct Api<T> {
    name: String,
    inner: kube::api::Api<T>,
}

impl<T: Clone> Clone for Api<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            inner: self.inner.clone(),
        }
    }
}

impl<T> Api<T> {
    pub fn new(name: String, inner: kube::api::Api<T>) -> Self {
        Self { name, inner }
    }
}

impl<T> Api<T>
where
    T: Resource + Serialize + DeserializeOwned + Clone + Debug + Send + 'static,
{
    #[inline]
    pub fn kube(&self) -> &kube::Api<T> {
        &self.inner
    }

    fn post_params(&self) -> PostParams {
        PostParams {
            field_manager: Some(self.name.clone()),
            ..Default::default()
        }
    }

    #[tracing::instrument(level = "debug", skip(self), ret, err)]
    pub async fn get(&self, name: &str) -> Result<T> {
        Ok(self.inner.get(name).await?)
    }

    #[tracing::instrument(level = "debug", skip(self), ret, err)]
    pub async fn get_opt(&self, name: &str) -> Result<Option<T>> {
        Ok(self.inner.get_opt(name).await?)
    }

    #[tracing::instrument(level = "debug", skip(self, resource), ret, err)]
    pub async fn create(&self, resource: &T) -> Result<T> {
        Ok(self.inner.create(&self.post_params(), resource).await?)
    }

    /// Replace the live object. The resource version carried on `resource`
    /// makes the write conditional: a stale read fails with a conflict
    /// instead of clobbering a newer version.
    #[tracing::instrument(level = "debug", skip(self, resource), ret, err)]
    pub async fn replace(&self, resource: &T) -> Result<T> {
        Ok(self
            .inner
            .replace(resource.name()?, &self.post_params(), resource)
            .await?)
    }

    #[tracing::instrument(level = "debug", skip(self), ret, err)]
    pub async fn delete(&self, name: &str) -> Result<Option<T>> {
        Ok(self.inner.delete(name, &DeleteParams::default()).await?.left())
    }

    #[tracing::instrument(level = "debug", skip(self, resource), ret, err)]
    pub async fn replace_status(&self, resource: &T) -> Result<T> {
        Ok(self
            .inner
            .replace_status(
                resource.name()?,
                &self.post_params(),
                serde_json::to_vec(resource)?,
            )
            .await?)
    }
}
