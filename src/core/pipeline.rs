use crate::adapters::archive::build_archive;
use crate::adapters::spreadsheet::SpreadsheetReader;
use crate::core::aggregator::LabelAggregator;
use crate::core::renderer::LabelRenderer;
use crate::core::{ConfigProvider, Order, Pipeline, RenderResult, SheetRow, Storage};
use crate::utils::error::Result;

/// The per-request pipeline: one spreadsheet, one order, one archive.
pub struct LabelPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    order: Order,
    spreadsheet_path: String,
}

impl<S: Storage, C: ConfigProvider> LabelPipeline<S, C> {
    /// `spreadsheet_path` is relative to `storage`.
    pub fn new(storage: S, config: C, order: Order, spreadsheet_path: impl Into<String>) -> Self {
        Self {
            storage,
            config,
            order,
            spreadsheet_path: spreadsheet_path.into(),
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for LabelPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<SheetRow>> {
        tracing::debug!("Loading spreadsheet from {}", self.spreadsheet_path);
        let bytes = self.storage.read_file(&self.spreadsheet_path).await?;

        let reader = SpreadsheetReader::new(self.config.columns().clone());
        let rows = tokio::task::spawn_blocking(move || reader.read(bytes)).await??;
        Ok(rows)
    }

    async fn transform(&self, rows: Vec<SheetRow>) -> Result<RenderResult> {
        let mut aggregator = LabelAggregator::new(&self.order);
        aggregator.add_rows(rows);
        tracing::debug!(
            "Grouped {} label(s) into {} factory group(s)",
            aggregator.label_count(),
            aggregator.groups().len()
        );

        let groups = aggregator.into_groups();
        let renderer = LabelRenderer::new(self.order.font_sizes);
        let documents = tokio::task::spawn_blocking(move || renderer.render_all(&groups)).await??;

        Ok(RenderResult {
            order_number: self.order.order_number.clone(),
            documents,
        })
    }

    async fn load(&self, result: RenderResult) -> Result<String> {
        for document in &result.documents {
            let path = format!("{}/{}", result.order_number, document.file_name);
            tracing::debug!("Writing {} ({} bytes)", path, document.bytes.len());
            self.storage.write_file(&path, &document.bytes).await?;
        }

        let archive_path = format!("{}.zip", result.order_number);
        let archive = tokio::task::spawn_blocking(move || {
            build_archive(
                result
                    .documents
                    .iter()
                    .map(|d| (d.file_name.as_str(), d.bytes.as_slice())),
            )
        })
        .await??;

        tracing::debug!("Writing archive {} ({} bytes)", archive_path, archive.len());
        self.storage.write_file(&archive_path, &archive).await?;
        Ok(archive_path)
    }
}
