use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct ExportEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ExportEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<String> {
        let start_time = Instant::now();
        tracing::info!("🚀 Starting export process");

        // Extract
        tracing::debug!("📥 Extracting data...");
        let raw_data = self.pipeline.extract().await?;

        // Transform
        tracing::debug!("🔄 Transforming data...");
        let transformed = self.pipeline.transform(raw_data).await?;

        // Load
        tracing::debug!("💾 Loading data...");
        let output_path = self.pipeline.load(transformed).await?;

        tracing::info!(
            "✅ Export finished in {:?}, output saved to: {}",
            start_time.elapsed(),
            output_path
        );
        Ok(output_path)
    }
}
