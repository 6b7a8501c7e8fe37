//! PDF text extraction collaborator.
//!
//! The pipeline only needs per-page text; the [`PdfExtractor`] trait keeps
//! the PDF parser swappable (and mockable in tests). [`LopdfExtractor`] is
//! the bundled implementation, available with the `pdf` feature.

use async_trait::async_trait;

use crate::error::Result;

/// Extracts ordered per-page text from raw PDF bytes.
#[async_trait]
pub trait PdfExtractor: Send + Sync {
    /// Extract the text of every page, in document order.
    ///
    /// A malformed or unreadable PDF fails the whole extraction; text from
    /// earlier pages is not preserved.
    async fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>>;
}

#[cfg(feature = "pdf")]
pub use lopdf_extractor::LopdfExtractor;

#[cfg(feature = "pdf")]
mod lopdf_extractor {
    use tracing::debug;

    use super::*;
    use crate::error::RagError;

    /// A [`PdfExtractor`] backed by [lopdf](https://docs.rs/lopdf).
    ///
    /// Parsing is CPU-bound and runs on the blocking thread pool.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct LopdfExtractor;

    impl LopdfExtractor {
        /// Create a new extractor.
        pub fn new() -> Self {
            Self
        }
    }

    #[async_trait]
    impl PdfExtractor for LopdfExtractor {
        async fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>> {
            let bytes = bytes.to_vec();

            let pages = tokio::task::spawn_blocking(move || {
                let doc = lopdf::Document::load_mem(&bytes)
                    .map_err(|e| RagError::Extraction(format!("failed to parse PDF: {e}")))?;

                let mut pages = Vec::new();
                for page_number in doc.get_pages().keys() {
                    let text = doc.extract_text(&[*page_number]).map_err(|e| {
                        RagError::Extraction(format!(
                            "failed to extract text from page {page_number}: {e}"
                        ))
                    })?;
                    pages.push(text);
                }
                Ok::<_, RagError>(pages)
            })
            .await
            .map_err(|e| RagError::Extraction(format!("extraction task failed: {e}")))??;

            debug!(page_count = pages.len(), "extracted PDF text");
            Ok(pages)
        }
    }
}
