//! Pinata pinning API client.

use async_trait::async_trait;
use rand::RngCore;
use serde_json::json;

use crate::service::{PinResponse, PinningService};
use crate::{IpfsError, Result};

/// Pinata client authenticated with an API key pair.
pub struct PinataClient {
    client: surf::Client,
    api_url: String,
    api_key: String,
    api_secret: String,
}

impl PinataClient {
    pub fn new(api_url: &str, api_key: String, api_secret: String) -> Self {
        Self {
            client: surf::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
            api_secret,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_url)
    }

    async fn send(&self, request: surf::RequestBuilder) -> Result<surf::Response> {
        let mut response = request
            .header("pinata_api_key", self.api_key.as_str())
            .header("pinata_secret_api_key", self.api_secret.as_str())
            .await
            .map_err(|e| IpfsError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let body = response.body_string().await.unwrap_or_default();
            return Err(IpfsError::Status {
                status: u16::from(response.status()),
                body,
            });
        }
        Ok(response)
    }

    async fn pin_response(mut response: surf::Response) -> Result<PinResponse> {
        response
            .body_json()
            .await
            .map_err(|e| IpfsError::Http(format!("malformed pin response: {e}")))
    }
}

/// Encode a `multipart/form-data` body with the file and its pin metadata.
fn multipart_body(boundary: &str, file_name: &str, contents: &[u8], name: &str) -> Vec<u8> {
    let metadata = json!({ "name": name }).to_string();
    let mut body = Vec::with_capacity(contents.len() + metadata.len() + 512);
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(contents);
    body.extend_from_slice(
        format!(
            "\r\n--{boundary}\r\nContent-Disposition: form-data; name=\"pinataMetadata\"\r\n\r\n{metadata}\r\n--{boundary}--\r\n"
        )
        .as_bytes(),
    );
    body
}

fn new_boundary() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("dogie-{}", hex::encode(bytes))
}

#[async_trait]
impl PinningService for PinataClient {
    async fn test_authentication(&self) -> Result<()> {
        let request = self.client.get(self.url("/data/testAuthentication"));
        match self.send(request).await {
            Ok(_) => {
                tracing::info!("pinata authentication ok");
                Ok(())
            }
            Err(IpfsError::Status { status, body }) => {
                Err(IpfsError::Authentication(format!("{status}: {body}")))
            }
            Err(e) => Err(e),
        }
    }

    async fn pin_file(&self, file_name: &str, contents: Vec<u8>, name: &str) -> Result<PinResponse> {
        let boundary = new_boundary();
        let body = multipart_body(&boundary, file_name, &contents, name);
        let request = self
            .client
            .post(self.url("/pinning/pinFileToIPFS"))
            .body(surf::Body::from_bytes(body))
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={boundary}"),
            );
        Self::pin_response(self.send(request).await?).await
    }

    async fn pin_json(&self, document: &serde_json::Value, name: &str) -> Result<PinResponse> {
        let payload = json!({
            "pinataContent": document,
            "pinataMetadata": { "name": name },
        });
        let request = self
            .client
            .post(self.url("/pinning/pinJSONToIPFS"))
            .body(surf::Body::from_string(payload.to_string()))
            .header("Content-Type", "application/json");
        Self::pin_response(self.send(request).await?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multipart_layout() {
        let body = multipart_body("b0", "pug.png", b"\x89PNG", "pug");
        let text = String::from_utf8_lossy(&body);

        assert!(text.starts_with("--b0\r\nContent-Disposition: form-data; name=\"file\"; filename=\"pug.png\""));
        assert!(text.contains("\r\n\r\n\u{fffd}PNG\r\n--b0\r\n"));
        assert!(text.contains("name=\"pinataMetadata\"\r\n\r\n{\"name\":\"pug\"}"));
        assert!(text.ends_with("--b0--\r\n"));
    }

    #[test]
    fn test_boundaries_differ() {
        assert_ne!(new_boundary(), new_boundary());
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = PinataClient::new("https://api.pinata.cloud/", "k".into(), "s".into());
        assert_eq!(
            client.url("/data/testAuthentication"),
            "https://api.pinata.cloud/data/testAuthentication"
        );
    }
}
