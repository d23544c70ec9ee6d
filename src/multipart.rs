//! `multipart/form-data` bodies for file uploads.

use std::{io, path::Path};

use crate::{
    errors::{Error, Result, ValidationError},
    FALLBACK_MEDIA_TYPE,
};

/// A single part of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MultipartPart {
    /// Plain form field.
    Text { name: String, value: String },
    /// Binary part with a filename and media type.
    File {
        name: String,
        filename: String,
        content_type: String,
        data: Vec<u8>,
    },
}

#[cfg(test)]
impl MultipartPart {
    fn name(&self) -> &str {
        match self {
            MultipartPart::Text { name, .. } | MultipartPart::File { name, .. } => name,
        }
    }
}

/// Ordered list of parts sent as one `multipart/form-data` body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct MultipartForm {
    parts: Vec<MultipartPart>,
}

impl MultipartForm {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(MultipartPart::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Adds a text field only when `value` is present and non-empty.
    pub(crate) fn text_opt(self, name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value.map(Into::into) {
            Some(value) if !value.is_empty() => self.text(name, value),
            _ => self,
        }
    }

    pub(crate) fn file(
        mut self,
        name: impl Into<String>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        self.parts.push(MultipartPart::File {
            name: name.into(),
            filename: filename.into(),
            content_type: content_type.into(),
            data,
        });
        self
    }

    /// Reads `path` and attaches it as a binary part named `name`.
    ///
    /// Returns [`Error::FileNotFound`] when `path` is missing or is not a
    /// regular file, and [`Error::Io`] when it cannot be read.
    pub(crate) async fn file_from_path(self, name: impl Into<String>, path: &Path) -> Result<Self> {
        match tokio::fs::metadata(path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => {
                return Err(Error::FileNotFound {
                    path: path.to_path_buf(),
                })
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(Error::FileNotFound {
                    path: path.to_path_buf(),
                })
            }
            Err(source) => {
                return Err(Error::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }

        let data = tokio::fs::read(path).await.map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(self.file(name, filename, guess_media_type(path), data))
    }

    #[cfg(test)]
    fn parts(&self) -> &[MultipartPart] {
        &self.parts
    }

    pub(crate) fn into_reqwest(self) -> Result<reqwest::multipart::Form> {
        let mut form = reqwest::multipart::Form::new();
        for part in self.parts {
            form = match part {
                MultipartPart::Text { name, value } => form.text(name, value),
                MultipartPart::File {
                    name,
                    filename,
                    content_type,
                    data,
                } => {
                    let part = reqwest::multipart::Part::bytes(data)
                        .file_name(filename)
                        .mime_str(&content_type)
                        .map_err(|err| {
                            Error::Validation(
                                ValidationError::new(format!("invalid media type: {err}"))
                                    .with_field(name.clone()),
                            )
                        })?;
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}

/// Best-effort media type from a file extension (case-insensitive).
///
/// Unknown or missing extensions map to [`FALLBACK_MEDIA_TYPE`].
pub fn guess_media_type(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return FALLBACK_MEDIA_TYPE;
    };
    match ext.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" | "jpe" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "svg" => "image/svg+xml",
        "ico" => "image/vnd.microsoft.icon",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "avif" => "image/avif",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "json" => "application/json",
        _ => FALLBACK_MEDIA_TYPE,
    }
}
