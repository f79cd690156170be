pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::Cli;
pub use config::TomlConfig;

pub use adapters::storage::LocalStorage;
pub use core::{engine::LabelEngine, pipeline::LabelPipeline};
pub use domain::model::{FontSizes, LabelField, Order};
pub use domain::order::{LabelDefaults, OrderForm};
pub use server::{build_router, AppState};
pub use utils::error::{LabelError, Result};
