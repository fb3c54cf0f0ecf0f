//! In-process source returning a fixed list for every date.

use async_trait::async_trait;

use crate::documents::TargetDate;
use crate::upstream::{DocumentList, DocumentSource, UpstreamError};

/// Serves the same documents for any date. Useful for local runs and demos.
#[derive(Debug, Clone)]
pub struct StaticSource {
    documents: Vec<String>,
}

impl StaticSource {
    /// Source that always answers with `documents`.
    pub fn new(documents: Vec<String>) -> Self {
        Self { documents }
    }
}

impl Default for StaticSource {
    fn default() -> Self {
        Self::new(vec!["doc1".into(), "doc2".into(), "doc3".into()])
    }
}

#[async_trait]
impl DocumentSource for StaticSource {
    async fn fetch(&self, date: &TargetDate) -> Result<DocumentList, UpstreamError> {
        tracing::trace!(date = %date, count = self.documents.len(), "Serving static documents");
        Ok(DocumentList::new(self.documents.clone()))
    }

    fn name(&self) -> &'static str {
        "static"
    }
}
