use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::config::CloudinaryConfig;
use crate::utils::validation::FilePayload;

/// An asset the hosting provider accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct HostedAsset {
    pub secure_url: String,
    pub public_id: Option<String>,
    pub resource_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    Uploaded(HostedAsset),
    /// The call failed or the provider reported an error.
    TransportError(String),
    /// The provider answered normally but gave no `secure_url`.
    NoUrl,
}

#[async_trait]
pub trait UploadGateway: Send + Sync {
    async fn upload(&self, file: &FilePayload) -> UploadOutcome;
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    public_id: Option<String>,
    resource_type: Option<String>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

pub struct CloudinaryGateway {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryGateway {
    pub fn new(config: CloudinaryConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1_1/{}/auto/upload", self.config.api_base, self.config.cloud_name)
    }

    /// Parameters that take part in the request signature, in sending order.
    fn signed_params(&self, timestamp: i64) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(folder) = &self.config.upload_folder {
            params.push(("folder", folder.clone()));
        }
        params.push(("timestamp", timestamp.to_string()));
        params
    }

    async fn send(&self, file: &FilePayload) -> Result<UploadResponse, String> {
        let timestamp = Utc::now().timestamp();
        let params = self.signed_params(timestamp);
        let signature = sign(&params, &self.config.api_secret);

        let part = Part::bytes(file.data.clone())
            .file_name(file.name.clone())
            .mime_str(&file.content_type)
            .map_err(|err| err.to_string())?;

        let mut form = Form::new()
            .part("file", part)
            .text("api_key", self.config.api_key.clone())
            .text("signature_algorithm", "sha256")
            .text("signature", signature);
        for (key, value) in params {
            form = form.text(key, value);
        }

        debug!("Uploading {} ({} bytes) to Cloudinary", file.name, file.size);

        let response = self
            .client
            .post(self.endpoint())
            .multipart(form)
            .send()
            .await
            .map_err(|err| err.to_string())?;

        let status = response.status();
        let body = response.text().await.map_err(|err| err.to_string())?;

        match serde_json::from_str::<UploadResponse>(&body) {
            Ok(parsed) if status.is_success() || parsed.error.is_some() => Ok(parsed),
            Ok(_) => Err(format!("HTTP {status}: {body}")),
            Err(_) if !status.is_success() => Err(format!("HTTP {status}: {body}")),
            Err(err) => Err(format!("Invalid response from Cloudinary: {err}")),
        }
    }
}

#[async_trait]
impl UploadGateway for CloudinaryGateway {
    async fn upload(&self, file: &FilePayload) -> UploadOutcome {
        match self.send(file).await {
            Ok(response) => interpret(response),
            Err(cause) => UploadOutcome::TransportError(cause),
        }
    }
}

fn interpret(response: UploadResponse) -> UploadOutcome {
    if let Some(error) = response.error {
        return UploadOutcome::TransportError(error.message);
    }

    match response.secure_url.filter(|url| !url.is_empty()) {
        Some(secure_url) => UploadOutcome::Uploaded(HostedAsset {
            secure_url,
            public_id: response.public_id,
            resource_type: response.resource_type,
        }),
        None => UploadOutcome::NoUrl,
    }
}

/// Hex SHA-256 of the alphabetically sorted `key=value` pairs joined by `&`,
/// followed by the API secret.
fn sign(params: &[(&str, String)], api_secret: &str) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = sorted
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}
