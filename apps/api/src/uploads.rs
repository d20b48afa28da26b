//! Multipart intake shared by the registration form and back-office media uploads.

use std::collections::HashMap;

use axum::extract::Multipart;
use bytes::Bytes;

use crate::errors::AppError;

/// Multipart field carrying uploaded images; repeated once per file.
pub const IMAGES_FIELD: &str = "images";

/// Request body cap for routes that accept image uploads.
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

/// Reads every part of a multipart body. Parts named `images` are collected
/// as files in upload order, everything else as text fields.
pub async fn read_multipart(
    mut multipart: Multipart,
) -> Result<(HashMap<String, String>, Vec<UploadedFile>), AppError> {
    let mut fields = HashMap::new();
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed form data: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == IMAGES_FIELD {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;
            files.push(UploadedFile {
                file_name,
                content_type,
                data,
            });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::Validation(format!("Could not read field {name}: {e}")))?;
            fields.insert(name, value);
        }
    }

    Ok((fields, files))
}

/// Splits uploads into the cover image (first file) and the remaining files.
/// Empty parts, which browsers send when no file was chosen, are dropped.
pub fn split_uploads(files: Vec<UploadedFile>) -> (Option<UploadedFile>, Vec<UploadedFile>) {
    let mut files = files.into_iter().filter(|f| !f.data.is_empty());
    let cover = files.next();
    (cover, files.collect())
}


#[cfg(test)]
mod tests {
    use super::test_support::file;
    use super::*;

    #[test]
    fn test_first_upload_is_cover() {
        let (cover, rest) = split_uploads(vec![file("front.jpg", 10), file("a.jpg", 5), file("b.jpg", 5)]);
        assert_eq!(cover.unwrap().file_name, "front.jpg");
        assert_eq!(
            rest.iter().map(|f| f.file_name.as_str()).collect::<Vec<_>>(),
            vec!["a.jpg", "b.jpg"]
        );
    }

    #[test]
    fn test_empty_parts_dropped() {
        let (cover, rest) = split_uploads(vec![file("", 0)]);
        assert!(cover.is_none());
        assert!(rest.is_empty());

        let (cover, rest) = split_uploads(vec![file("", 0), file("plot.png", 3)]);
        assert_eq!(cover.unwrap().file_name, "plot.png");
        assert!(rest.is_empty());
    }
}
