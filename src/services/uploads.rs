use std::path::PathBuf;

use base64::Engine;
use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::config::{CloudinaryConfig, Config};

/// Matches the HTTP body limit; decoded payloads beyond this are refused.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Invalid fileData format")]
    InvalidDataUri,
    #[error("Image payload exceeds the 10MB limit")]
    PayloadTooLarge,
    #[error("Image upload failed")]
    Upstream(#[source] anyhow::Error),
}

/// Persists inline-encoded images: Cloudinary when configured, local disk
/// otherwise. Plain URLs pass through untouched.
pub struct Uploader {
    http: reqwest::Client,
    cloudinary: Option<CloudinaryConfig>,
    uploads_dir: PathBuf,
    public_base_url: String,
}

impl Uploader {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            cloudinary: config.cloudinary.clone(),
            uploads_dir: PathBuf::from(&config.uploads_dir),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Resolve an image input to a public URL. `folder` namespaces Cloudinary
    /// uploads per school (e.g. "islamic_schools/<id>/gallery").
    pub async fn store(&self, folder: &str, input: &str) -> Result<String, UploadError> {
        if !input.starts_with("data:") {
            return Ok(input.to_string());
        }

        let (mime, bytes) = parse_data_uri(input)?;
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(UploadError::PayloadTooLarge);
        }

        if let Some(cc) = &self.cloudinary {
            return self
                .upload_cloudinary(cc, input, folder)
                .await
                .map_err(UploadError::Upstream);
        }

        let filename = unique_filename(&mime);
        tokio::fs::create_dir_all(&self.uploads_dir)
            .await
            .map_err(|e| UploadError::Upstream(e.into()))?;
        tokio::fs::write(self.uploads_dir.join(&filename), &bytes)
            .await
            .map_err(|e| UploadError::Upstream(e.into()))?;

        Ok(format!(
            "{}/data/uploads/{}",
            self.public_base_url, filename
        ))
    }

    /// Signed upload via the Cloudinary REST API; the signature covers the
    /// sorted parameter string plus the API secret.
    async fn upload_cloudinary(
        &self,
        cc: &CloudinaryConfig,
        data_uri: &str,
        folder: &str,
    ) -> anyhow::Result<String> {
        let timestamp = Utc::now().timestamp();
        let to_sign = format!("folder={folder}&timestamp={timestamp}{}", cc.api_secret);
        let signature = hex::encode(Sha256::digest(to_sign.as_bytes()));

        let endpoint = format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            cc.cloud_name
        );
        let response = self
            .http
            .post(&endpoint)
            .form(&[
                ("file", data_uri),
                ("folder", folder),
                ("timestamp", &timestamp.to_string()),
                ("api_key", &cc.api_key),
                ("signature", &signature),
                ("signature_algorithm", "sha256"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: serde_json::Value = response.json().await?;
        body.get("secure_url")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("Cloudinary response missing secure_url"))
    }
}

/// Split a `data:<mime>;base64,<payload>` URI into its mime type and bytes.
pub fn parse_data_uri(input: &str) -> Result<(String, Vec<u8>), UploadError> {
    let rest = input.strip_prefix("data:").ok_or(UploadError::InvalidDataUri)?;
    let (mime, b64) = rest.split_once(";base64,").ok_or(UploadError::InvalidDataUri)?;
    if mime.is_empty() {
        return Err(UploadError::InvalidDataUri);
    }
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(b64)
        .map_err(|_| UploadError::InvalidDataUri)?;
    Ok((mime.to_string(), bytes))
}

/// Millisecond timestamp plus a random suffix keeps concurrent uploads from
/// colliding.
fn unique_filename(mime: &str) -> String {
    let ext = mime.split('/').next_back().unwrap_or("png");
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(|c| (c as char).to_ascii_lowercase())
        .collect();
    format!("{}-{}.{}", Utc::now().timestamp_millis(), suffix, ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_data_uri() {
        let (mime, bytes) = parse_data_uri("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn rejects_malformed_data_uris() {
        assert!(matches!(
            parse_data_uri("https://example.com/x.png"),
            Err(UploadError::InvalidDataUri)
        ));
        assert!(matches!(
            parse_data_uri("data:image/png,rawdata"),
            Err(UploadError::InvalidDataUri)
        ));
        assert!(matches!(
            parse_data_uri("data:image/png;base64,@@not-base64@@"),
            Err(UploadError::InvalidDataUri)
        ));
        assert!(matches!(
            parse_data_uri("data:;base64,aGVsbG8="),
            Err(UploadError::InvalidDataUri)
        ));
    }

    #[test]
    fn filenames_carry_extension_and_do_not_collide() {
        let a = unique_filename("image/jpeg");
        let b = unique_filename("image/jpeg");
        assert!(a.ends_with(".jpeg"));
        assert_ne!(a, b);
    }

    fn test_uploader(dir: &std::path::Path) -> Uploader {
        Uploader {
            http: reqwest::Client::new(),
            cloudinary: None,
            uploads_dir: dir.to_path_buf(),
            public_base_url: "http://localhost:4000".into(),
        }
    }

    #[tokio::test]
    async fn plain_urls_pass_through() {
        let dir = std::env::temp_dir().join("madaris-uploads-test-passthrough");
        let uploader = test_uploader(&dir);
        let url = uploader
            .store("islamic_schools/1/gallery", "https://example.com/pic.jpg")
            .await
            .unwrap();
        assert_eq!(url, "https://example.com/pic.jpg");
    }

    #[tokio::test]
    async fn data_uri_falls_back_to_local_disk() {
        let dir = std::env::temp_dir().join("madaris-uploads-test-local");
        let uploader = test_uploader(&dir);
        let url = uploader
            .store("islamic_schools/1/gallery", "data:image/png;base64,aGVsbG8=")
            .await
            .unwrap();
        assert!(url.starts_with("http://localhost:4000/data/uploads/"));
        let filename = url.rsplit('/').next().unwrap();
        let written = tokio::fs::read(dir.join(filename)).await.unwrap();
        assert_eq!(written, b"hello");
    }

    #[tokio::test]
    async fn oversized_payload_is_refused() {
        let dir = std::env::temp_dir().join("madaris-uploads-test-cap");
        let uploader = test_uploader(&dir);
        let payload =
            base64::engine::general_purpose::STANDARD.encode(vec![0u8; MAX_IMAGE_BYTES + 1]);
        let input = format!("data:image/png;base64,{payload}");
        assert!(matches!(
            uploader.store("islamic_schools/1/gallery", &input).await,
            Err(UploadError::PayloadTooLarge)
        ));
    }
}
