use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use tracing::info;

use crate::errors::AppError;

/// Attachment storage on an S3-compatible bucket (MinIO locally, AWS in production).
#[derive(Clone)]
pub struct ObjectStorage {
    client: S3Client,
    bucket: String,
    public_base: String,
}

impl ObjectStorage {
    pub fn new(client: S3Client, bucket: String, public_base: String) -> Self {
        Self {
            client,
            bucket,
            public_base: public_base.trim_end_matches('/').to_string(),
        }
    }

    pub async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), AppError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("upload of {key} failed: {e}")))?;

        info!("Uploaded s3://{}/{}", self.bucket, key);
        Ok(())
    }

    /// Public URL of a stored object.
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base, key.trim_start_matches('/'))
    }
}

/// Object key for an upload belonging to a registration submission.
pub fn registration_object_key(registration_id: i64, file_name: &str) -> String {
    object_key("registrations", registration_id, file_name)
}

/// Object key for a cover or gallery image of a property.
pub fn property_object_key(property_id: i64, file_name: &str) -> String {
    object_key("properties", property_id, file_name)
}

/// `{prefix}/{owner}/{uuid}-{sanitised name}`. The uuid keeps same-named files
/// from colliding.
fn object_key(prefix: &str, owner_id: i64, file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let safe = if safe.is_empty() { "upload".to_string() } else { safe };
    format!("{prefix}/{owner_id}/{}-{safe}", uuid::Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_key_sanitises_file_name() {
        let key = registration_object_key(12, "front view (1).jpg");
        assert!(key.starts_with("registrations/12/"));
        assert!(key.ends_with("-front_view__1_.jpg"));
    }

    #[test]
    fn test_registration_key_for_empty_name() {
        assert!(registration_object_key(3, "").ends_with("-upload"));
    }

    #[test]
    fn test_property_key_prefix() {
        let key = property_object_key(7, "cover.png");
        assert!(key.starts_with("properties/7/"));
        assert!(key.ends_with("-cover.png"));
        assert_ne!(key, property_object_key(7, "cover.png"));
    }
}
