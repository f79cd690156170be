use crate::domain::model::{RenderResult, SheetRow};
use crate::domain::order::LabelDefaults;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Header names of the three required spreadsheet columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub factory: String,
    pub product_info: String,
    pub product_quantity: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            factory: "工厂名".to_string(),
            product_info: "产品信息".to_string(),
            product_quantity: "产品数量".to_string(),
        }
    }
}

pub trait ConfigProvider: Send + Sync {
    fn output_root(&self) -> &str;
    fn allowed_extensions(&self) -> &[String];
    fn columns(&self) -> &ColumnNames;
    fn label_defaults(&self) -> &LabelDefaults;
}

impl<T: ConfigProvider + ?Sized> ConfigProvider for Arc<T> {
    fn output_root(&self) -> &str {
        (**self).output_root()
    }

    fn allowed_extensions(&self) -> &[String] {
        (**self).allowed_extensions()
    }

    fn columns(&self) -> &ColumnNames {
        (**self).columns()
    }

    fn label_defaults(&self) -> &LabelDefaults {
        (**self).label_defaults()
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<SheetRow>>;
    async fn transform(&self, rows: Vec<SheetRow>) -> Result<RenderResult>;
    async fn load(&self, result: RenderResult) -> Result<String>;
}
