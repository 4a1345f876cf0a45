use std::ops::Deref;

use crate::Config;

#[derive(Clone)]
pub struct Context {
    pub client: skiff::Client,
    pub config: Config,
}

impl Deref for Context {
    type Target = skiff::Client;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

impl Context {
    pub fn new(client: skiff::Client, config: Config) -> Self {
        Self { client, config }
    }
}
