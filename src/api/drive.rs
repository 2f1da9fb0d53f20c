//! Google Drive v3 client for one backup folder.

use super::google_auth::ServiceAccountKey;
use super::{RemoteFile, RemoteFolder};
use crate::libs::config::BackupConfig;
use crate::libs::messages::Message;
use crate::msg_bail_anyhow;
use anyhow::Result;
use chrono::Utc;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::json;

pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";

const FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";
const UPLOAD_URL: &str = "https://www.googleapis.com/upload/drive/v3/files?uploadType=multipart";
const BOUNDARY: &str = "sitelog-backup-boundary";

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<RemoteFile>,
}

#[derive(Debug, Deserialize)]
struct CreatedFile {
    id: String,
}

pub struct Drive {
    client: Client,
    token: String,
    folder_id: String,
}

impl Drive {
    /// Authenticates with the configured service account.
    pub async fn connect(config: &BackupConfig) -> Result<Self> {
        let key = ServiceAccountKey::from_file(&config.credentials_path)?;
        let client = Client::new();
        let token = key.access_token(&client, DRIVE_SCOPE, Utc::now().timestamp()).await?;
        Ok(Self {
            client,
            token,
            folder_id: config.folder_id.clone(),
        })
    }
}

impl RemoteFolder for Drive {
    async fn find(&self, name: &str) -> Result<Vec<RemoteFile>> {
        let query = search_query(&self.folder_id, name);
        let response = self
            .client
            .get(FILES_URL)
            .bearer_auth(&self.token)
            .query(&[("q", query.as_str()), ("fields", "files(id, name)"), ("spaces", "drive")])
            .send()
            .await?;
        Ok(ensure_success(response).await?.json::<FileList>().await?.files)
    }

    async fn delete(&self, file_id: &str) -> Result<()> {
        let response = self
            .client
            .delete(format!("{}/{}", FILES_URL, file_id))
            .bearer_auth(&self.token)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn upload(&self, name: &str, content: Vec<u8>) -> Result<String> {
        let metadata = json!({ "name": name, "parents": [self.folder_id] }).to_string();
        let boundary = boundary_for(&content);
        let body = multipart_related_body(&boundary, &metadata, &content);
        let response = self
            .client
            .post(UPLOAD_URL)
            .bearer_auth(&self.token)
            .header(reqwest::header::CONTENT_TYPE, format!("multipart/related; boundary={}", boundary))
            .body(body)
            .send()
            .await?;
        Ok(ensure_success(response).await?.json::<CreatedFile>().await?.id)
    }

    async fn download(&self, file_id: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(format!("{}/{}", FILES_URL, file_id))
            .bearer_auth(&self.token)
            .query(&[("alt", "media")])
            .send()
            .await?;
        Ok(ensure_success(response).await?.bytes().await?.to_vec())
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        msg_bail_anyhow!(Message::BackupRequestFailed {
            status: status.as_u16(),
            body
        });
    }
    Ok(response)
}

/// Drive `q` expression for non-trashed files named `name` in `folder_id`.
pub fn search_query(folder_id: &str, name: &str) -> String {
    format!(
        "name = '{}' and '{}' in parents and trashed = false",
        escape_literal(name),
        escape_literal(folder_id)
    )
}

fn escape_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// A boundary that does not occur anywhere in `content`.
pub fn boundary_for(content: &[u8]) -> String {
    let occurs = |boundary: &str| content.windows(boundary.len()).any(|window| window == boundary.as_bytes());
    let mut boundary = BOUNDARY.to_string();
    let mut attempt = 0u32;
    while occurs(&boundary) {
        attempt += 1;
        boundary = format!("{}-{}", BOUNDARY, attempt);
    }
    boundary
}

/// Body of a `multipart/related` upload: JSON metadata, then the file bytes.
pub fn multipart_related_body(boundary: &str, metadata: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(content.len() + metadata.len() + 256);
    body.extend_from_slice(format!("--{}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n", boundary).as_bytes());
    body.extend_from_slice(metadata.as_bytes());
    body.extend_from_slice(format!("\r\n--{}\r\nContent-Type: application/octet-stream\r\n\r\n", boundary).as_bytes());
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_escapes_quotes() {
        assert_eq!(
            search_query("folder1", "o'brien.db"),
            "name = 'o\\'brien.db' and 'folder1' in parents and trashed = false"
        );
    }

    #[test]
    fn boundary_avoids_content() {
        assert_eq!(boundary_for(b"SQLite format 3"), BOUNDARY);

        let content = format!("\r\n--{}\r\n--{}-1", BOUNDARY, BOUNDARY);
        let boundary = boundary_for(content.as_bytes());
        assert_eq!(boundary, format!("{}-2", BOUNDARY));

        let body = multipart_related_body(&boundary, "{}", content.as_bytes());
        let text = String::from_utf8(body).unwrap();
        assert_eq!(text.matches(&format!("--{}", boundary)).count(), 3);
    }

    #[test]
    fn multipart_body_has_both_parts_and_closing_boundary() {
        let body = multipart_related_body("b", r#"{"name":"x.db"}"#, b"SQLite");
        let text = String::from_utf8(body).unwrap();
        assert!(text.starts_with("--b\r\nContent-Type: application/json"));
        assert!(text.contains("{\"name\":\"x.db\"}\r\n--b\r\nContent-Type: application/octet-stream\r\n\r\nSQLite"));
        assert!(text.ends_with("\r\n--b--\r\n"));
    }
}
