//! Label generation pipeline
//!
//! codes -> label pages -> merged PDF -> published URL
//!
//! Rendering and merging finish completely before anything is published,
//! so a batch with one bad code never leaves a partial upload behind.

use std::sync::Arc;

use base64::Engine;

use crate::codes::Code;
use crate::error::{AppError, Result};
use crate::label::LabelRenderer;
use crate::pdf::{decode_pdf, merge_documents, MergedDocument};
use crate::storage::{ArtifactName, PublishedArtifact, Publisher, RequestOrigin};

/// Generates, merges and publishes label PDFs
#[derive(Clone)]
pub struct LabelService {
    renderer: LabelRenderer,
    publisher: Arc<dyn Publisher>,
}

impl LabelService {
    pub fn new(renderer: LabelRenderer, publisher: Arc<dyn Publisher>) -> Self {
        Self {
            renderer,
            publisher,
        }
    }

    /// The active publishing backend
    pub fn publisher(&self) -> &dyn Publisher {
        self.publisher.as_ref()
    }

    /// Render every code, merge the pages and publish the result.
    pub async fn generate(
        &self,
        codes: Vec<Code>,
        origin: Option<RequestOrigin>,
    ) -> Result<PublishedArtifact> {
        let count = codes.len();
        tracing::info!(codes = count, "Generating barcode labels");

        let merged = self.render_and_merge(codes).await?;
        debug_assert_eq!(merged.page_count, count);

        let name = ArtifactName::generate();
        let size = merged.bytes.len();
        let url = self
            .publisher
            .publish(&name, merged.bytes, origin.as_ref())
            .await?;

        let artifact = PublishedArtifact {
            name,
            url,
            size,
            pages: merged.page_count,
        };
        tracing::info!(
            key = %artifact.name,
            pages = artifact.pages,
            bytes = artifact.size,
            "Published label PDF"
        );

        Ok(artifact)
    }

    /// Render all labels, then merge them, on the blocking pool.
    pub async fn render_and_merge(&self, codes: Vec<Code>) -> Result<MergedDocument> {
        let renderer = self.renderer.clone();

        tokio::task::spawn_blocking(move || -> Result<MergedDocument> {
            let pages = renderer.render_all(&codes)?;
            let pdfs: Vec<Vec<u8>> = pages.into_iter().map(|page| page.pdf).collect();
            Ok(merge_documents(&pdfs)?)
        })
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?
    }

    /// Decode barcodes from a base64-encoded PDF, one per page at most.
    pub async fn decode(&self, file_base64: &str) -> Result<Vec<String>> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(file_base64.trim())
            .map_err(|e| AppError::InvalidInput(format!("file is not valid base64: {}", e)))?;

        tracing::info!(bytes = bytes.len(), "Decoding barcodes from uploaded PDF");

        tokio::task::spawn_blocking(move || decode_pdf(&bytes))
            .await
            .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))
    }
}
