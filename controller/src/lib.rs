mod backoff;
mod config;
mod context;
pub mod controllers;
mod error;
mod labels;
mod reconciler;
mod resources;
mod retry;
mod service;
#[cfg(test)]
mod testing;
mod tracing;
mod utils;

pub use config::Config;
pub use context::Context;
pub use error::{ControllerError, ControllerResult};
pub use utils::ControllerStreamExt;
