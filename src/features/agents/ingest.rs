//! Document intake for agent creation.
//!
//! Uploaded bytes are written to a uniquely named scratch file, handed to the
//! persona deriver once, and the scratch file is deleted whether derivation
//! succeeded or not. Nothing of the document is retained.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use log::{debug, warn};
use tokio::time::timeout;
use uuid::Uuid;

use crate::core::IngestionError;
use crate::providers::PersonaDeriver;

/// Document formats accepted at the ingestion boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    PlainText,
    Csv,
}

impl DocumentKind {
    /// Detect the document kind from the uploaded filename's extension.
    pub fn from_filename(filename: &str) -> Option<DocumentKind> {
        let extension = filename.rsplit('.').next()?.to_lowercase();
        match extension.as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            "txt" | "text" | "md" => Some(DocumentKind::PlainText),
            "csv" => Some(DocumentKind::Csv),
            _ => None,
        }
    }

    /// Canonical extension used for the scratch copy.
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Docx => "docx",
            DocumentKind::PlainText => "txt",
            DocumentKind::Csv => "csv",
        }
    }
}

/// An uploaded document: original filename plus raw bytes.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl UploadedDocument {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        UploadedDocument {
            filename: filename.into(),
            bytes,
        }
    }
}

/// Unique scratch location under the OS temp dir for one ingestion.
fn scratch_path(kind: DocumentKind) -> PathBuf {
    env::temp_dir().join(format!("studio-{}.{}", Uuid::new_v4(), kind.extension()))
}

/// Run the full intake pipeline: validate, scratch-write, derive, clean up.
///
/// Returns the derived persona prompt. On any failure the scratch file is
/// still removed and no state is left behind.
pub async fn derive_from_upload(
    agent_name: &str,
    document: &UploadedDocument,
    deriver: &dyn PersonaDeriver,
    call_timeout: Duration,
) -> Result<String, IngestionError> {
    if agent_name.trim().is_empty() {
        return Err(IngestionError::EmptyAgentName);
    }
    if document.bytes.is_empty() {
        return Err(IngestionError::EmptyDocument);
    }

    let kind = DocumentKind::from_filename(&document.filename)
        .ok_or_else(|| IngestionError::UnsupportedFormat(document.filename.clone()))?;

    let path = scratch_path(kind);
    std::fs::write(&path, &document.bytes)?;
    debug!(
        "Wrote scratch document for '{}' ({} bytes) to {}",
        agent_name,
        document.bytes.len(),
        path.display()
    );

    let result = match timeout(call_timeout, deriver.derive_persona(agent_name, &path)).await {
        Ok(inner) => inner,
        Err(_) => Err(IngestionError::Timeout(call_timeout.as_secs())),
    };

    // The scratch copy never outlives the derivation call
    if let Err(e) = std::fs::remove_file(&path) {
        warn!("Failed to remove scratch file {}: {}", path.display(), e);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::Mutex;

    /// Deriver that records the path it was handed and answers from a script.
    struct StubDeriver {
        reply: Result<String, String>,
        seen_path: Mutex<Option<PathBuf>>,
    }

    impl StubDeriver {
        fn ok(prompt: &str) -> Self {
            StubDeriver {
                reply: Ok(prompt.to_string()),
                seen_path: Mutex::new(None),
            }
        }

        fn failing(message: &str) -> Self {
            StubDeriver {
                reply: Err(message.to_string()),
                seen_path: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl PersonaDeriver for StubDeriver {
        async fn derive_persona(
            &self,
            _agent_name: &str,
            document_path: &Path,
        ) -> Result<String, IngestionError> {
            *self.seen_path.lock().unwrap() = Some(document_path.to_path_buf());
            self.reply
                .clone()
                .map_err(IngestionError::Derivation)
        }
    }

    #[test]
    fn test_kind_detection() {
        assert_eq!(DocumentKind::from_filename("cv.pdf"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_filename("CV.PDF"), Some(DocumentKind::Pdf));
        assert_eq!(
            DocumentKind::from_filename("notes.docx"),
            Some(DocumentKind::Docx)
        );
        assert_eq!(
            DocumentKind::from_filename("bio.txt"),
            Some(DocumentKind::PlainText)
        );
        assert_eq!(DocumentKind::from_filename("data.csv"), Some(DocumentKind::Csv));
        assert_eq!(DocumentKind::from_filename("archive.zip"), None);
        assert_eq!(DocumentKind::from_filename("no_extension"), None);
    }

    #[tokio::test]
    async fn test_unsupported_format_rejected_before_scratch_write() {
        let deriver = StubDeriver::ok("prompt");
        let doc = UploadedDocument::new("image.png", vec![1, 2, 3]);

        let err = derive_from_upload("Alice", &doc, &deriver, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, IngestionError::UnsupportedFormat(_)));
        // Deriver never ran
        assert!(deriver.seen_path.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_inputs_rejected() {
        let deriver = StubDeriver::ok("prompt");

        let doc = UploadedDocument::new("bio.txt", vec![1]);
        let err = derive_from_upload("  ", &doc, &deriver, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, IngestionError::EmptyAgentName));

        let doc = UploadedDocument::new("bio.txt", vec![]);
        let err = derive_from_upload("Alice", &doc, &deriver, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, IngestionError::EmptyDocument));
    }

    #[tokio::test]
    async fn test_scratch_file_removed_after_success() {
        let deriver = StubDeriver::ok("derived prompt");
        let doc = UploadedDocument::new("bio.txt", b"some biography".to_vec());

        let prompt = derive_from_upload("Alice", &doc, &deriver, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(prompt, "derived prompt");

        let seen = take_seen_path(&deriver);
        assert!(!seen.exists(), "scratch file should be deleted");
    }

    #[tokio::test]
    async fn test_scratch_file_removed_after_failure() {
        let deriver = StubDeriver::failing("extraction exploded");
        let doc = UploadedDocument::new("bio.txt", b"some biography".to_vec());

        let err = derive_from_upload("Alice", &doc, &deriver, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, IngestionError::Derivation(_)));

        let seen = take_seen_path(&deriver);
        assert!(!seen.exists(), "scratch file should be deleted on failure too");
    }

    fn take_seen_path(deriver: &StubDeriver) -> PathBuf {
        deriver
            .seen_path
            .lock()
            .unwrap()
            .clone()
            .expect("deriver should have been called")
    }
}
