use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct LabelEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> LabelEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Runs extract, transform and load in order and returns the archive path
    /// relative to the pipeline's storage.
    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("Starting label generation");

        tracing::debug!("Reading spreadsheet...");
        let rows = self.pipeline.extract().await?;
        tracing::info!("Read {} product rows", rows.len());

        tracing::debug!("Grouping and rendering...");
        let rendered = self.pipeline.transform(rows).await?;
        tracing::info!(
            "Rendered {} document(s) with {} label(s)",
            rendered.documents.len(),
            rendered.label_count()
        );

        tracing::debug!("Writing documents and archive...");
        let archive_path = self.pipeline.load(rendered).await?;
        tracing::info!(
            "Archive written to {} in {:?}",
            archive_path,
            started.elapsed()
        );

        Ok(archive_path)
    }
}
