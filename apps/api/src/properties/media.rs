use serde::Serialize;

use crate::uploads::{split_uploads, UploadedFile};

#[derive(Debug, Clone, Serialize)]
pub struct MediaUploadResponse {
    pub image_url: Option<String>,
    pub gallery: Vec<String>,
    pub image_count: usize,
}

/// Decides where uploaded files go. The first file becomes the cover only
/// when the property has none yet; everything else is appended to the gallery.
pub fn plan_media(
    has_cover: bool,
    files: Vec<UploadedFile>,
) -> (Option<UploadedFile>, Vec<UploadedFile>) {
    let (first, mut rest) = split_uploads(files);
    match first {
        Some(first) if has_cover => {
            rest.insert(0, first);
            (None, rest)
        }
        first => (first, rest),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uploads::test_support::file;

    fn names(files: &[UploadedFile]) -> Vec<&str> {
        files.iter().map(|f| f.file_name.as_str()).collect()
    }

    #[test]
    fn test_first_file_becomes_cover_when_missing() {
        let (cover, gallery) = plan_media(false, vec![file("front.jpg", 4), file("side.jpg", 4)]);
        assert_eq!(cover.unwrap().file_name, "front.jpg");
        assert_eq!(names(&gallery), vec!["side.jpg"]);
    }

    #[test]
    fn test_existing_cover_sends_everything_to_gallery() {
        let (cover, gallery) = plan_media(true, vec![file("front.jpg", 4), file("side.jpg", 4)]);
        assert!(cover.is_none());
        assert_eq!(names(&gallery), vec!["front.jpg", "side.jpg"]);
    }

    #[test]
    fn test_empty_parts_ignored() {
        let (cover, gallery) = plan_media(false, vec![file("", 0)]);
        assert!(cover.is_none());
        assert!(gallery.is_empty());
    }
}
