use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::model::SourcePayload;

use super::{SourceError, WeatherSource};

/// Serves one static JSON document regardless of the city asked for.
///
/// Useful offline and for demos; the city is logged but never used.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl WeatherSource for FileSource {
    async fn fetch(&self, city: &str) -> Result<SourcePayload, SourceError> {
        debug!(city, path = %self.path.display(), "file source ignores the requested city");

        let body = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SourceError::Io { path: self.path.clone(), source })?;

        Ok(SourcePayload::from_json(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::paris_json;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn returns_same_document_for_any_city() {
        let file = write_temp(&paris_json().to_string());
        let source = FileSource::new(file.path());

        let a = source.fetch("Paris").await.unwrap();
        let b = source.fetch("Tokyo").await.unwrap();

        assert!(a.is_success());
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(dir.path().join("nope.json"));

        let err = source.fetch("Paris").await.unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
        assert!(err.to_string().contains("nope.json"));
    }

    #[tokio::test]
    async fn malformed_file_is_parse_error() {
        let file = write_temp("{ truncated");
        let err = FileSource::new(file.path()).fetch("Paris").await.unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }
}
