pub mod aggregator;
pub mod engine;
pub mod pipeline;
pub mod renderer;

pub use crate::domain::model::{Order, RenderResult, SheetRow};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
