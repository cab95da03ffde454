//! Google Drive v3 backend, scoped to the application-data folder.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tally_core::document::RemoteDocument;

use crate::http::check_response;
use crate::{FileHandle, RemoteError, RemoteStore};

const BOUNDARY: &str = "tally-document-boundary";
const APP_DATA_FOLDER: &str = "appDataFolder";

#[derive(Debug, Clone)]
pub struct DriveSettings {
    /// Scheme and host, without a trailing slash (`https://www.googleapis.com`).
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for DriveSettings {
    fn default() -> Self {
        Self {
            base_url: "https://www.googleapis.com".into(),
            timeout: Duration::from_secs(10),
            user_agent: concat!("tally/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

#[derive(Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<FileEntry>,
}

#[derive(Deserialize)]
struct FileEntry {
    id: String,
}

#[derive(Serialize)]
struct FileMetadata<'a> {
    name: &'a str,
    parents: [&'a str; 1],
}

pub struct DriveClient {
    http: reqwest::Client,
    base_url: String,
}

impl DriveClient {
    /// Build a client with the given settings.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Http`] if the underlying `reqwest::Client`
    /// fails to build.
    pub fn new(settings: &DriveSettings) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(settings.timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn list_url(&self, name: &str) -> String {
        let query = format!("name='{}' and trashed=false", escape_query_literal(name));
        format!(
            "{}/drive/v3/files?spaces={APP_DATA_FOLDER}&q={}&fields={}",
            self.base_url,
            urlencoding::encode(&query),
            urlencoding::encode("files(id,name)"),
        )
    }

    fn media_url(&self, handle: &FileHandle) -> String {
        format!(
            "{}/drive/v3/files/{}?alt=media",
            self.base_url,
            urlencoding::encode(handle.as_str())
        )
    }

    fn create_url(&self) -> String {
        format!("{}/upload/drive/v3/files?uploadType=multipart&fields=id", self.base_url)
    }

    fn replace_url(&self, handle: &FileHandle) -> String {
        format!(
            "{}/upload/drive/v3/files/{}?uploadType=media&fields=id",
            self.base_url,
            urlencoding::encode(handle.as_str())
        )
    }
}

#[async_trait]
impl RemoteStore for DriveClient {
    async fn find_by_name(
        &self,
        credential: &str,
        name: &str,
    ) -> Result<Option<FileHandle>, RemoteError> {
        let resp = self
            .http
            .get(self.list_url(name))
            .bearer_auth(credential)
            .send()
            .await?;
        let body = check_response(resp).await?.text().await?;
        parse_file_list(&body)
    }

    async fn download(
        &self,
        credential: &str,
        handle: &FileHandle,
    ) -> Result<serde_json::Value, RemoteError> {
        let resp = self
            .http
            .get(self.media_url(handle))
            .bearer_auth(credential)
            .send()
            .await?;
        let bytes = check_response(resp).await?.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| RemoteError::Parse(format!("document {handle} is not JSON: {e}")))
    }

    async fn upload(
        &self,
        credential: &str,
        handle: Option<&FileHandle>,
        name: &str,
        document: &RemoteDocument,
    ) -> Result<FileHandle, RemoteError> {
        let content = serde_json::to_vec(document)
            .map_err(|e| RemoteError::Parse(format!("cannot encode document: {e}")))?;

        let request = match handle {
            Some(handle) => self
                .http
                .patch(self.replace_url(handle))
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(content),
            None => {
                let (content_type, body) = multipart_body(name, &content)?;
                self.http
                    .post(self.create_url())
                    .header(reqwest::header::CONTENT_TYPE, content_type)
                    .body(body)
            }
        };

        let resp = request.bearer_auth(credential).send().await?;
        let body = check_response(resp).await?.text().await?;
        let entry: FileEntry = serde_json::from_str(&body)
            .map_err(|e| RemoteError::Parse(format!("upload response: {e}")))?;
        tracing::debug!(file_id = %entry.id, created = handle.is_none(), "remote document written");
        Ok(FileHandle::new(entry.id))
    }
}

/// Quote a value for a Drive `q` string literal.
fn escape_query_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

fn parse_file_list(body: &str) -> Result<Option<FileHandle>, RemoteError> {
    let list: FileList =
        serde_json::from_str(body).map_err(|e| RemoteError::Parse(format!("file list: {e}")))?;
    Ok(list.files.into_iter().next().map(|entry| FileHandle::new(entry.id)))
}

/// Build a `multipart/related` body: JSON metadata, then the document.
fn multipart_body(name: &str, content: &[u8]) -> Result<(String, Vec<u8>), RemoteError> {
    let metadata = serde_json::to_string(&FileMetadata {
        name,
        parents: [APP_DATA_FOLDER],
    })
    .map_err(|e| RemoteError::Parse(format!("cannot encode metadata: {e}")))?;

    let mut body = Vec::with_capacity(content.len() + metadata.len() + 256);
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
    body.extend_from_slice(metadata.as_bytes());
    body.extend_from_slice(format!("\r\n--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Type: application/json\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Ok((format!("multipart/related; boundary={BOUNDARY}"), body))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn client() -> DriveClient {
        DriveClient::new(&DriveSettings {
            base_url: "http://drive.test/".into(),
            ..DriveSettings::default()
        })
        .unwrap()
    }

    const LIST_FIXTURE: &str = r#"{
        "files": [
            {"id": "1AbCdEf", "name": "tally-tasks.json"},
            {"id": "2GhIjKl", "name": "tally-tasks.json"}
        ]
    }"#;

    #[test]
    fn list_url_scopes_to_app_data() {
        let url = client().list_url("tally-tasks.json");
        assert!(url.starts_with("http://drive.test/drive/v3/files?spaces=appDataFolder&q="));
        assert!(url.contains("name%3D%27tally-tasks.json%27%20and%20trashed%3Dfalse"));
        assert!(url.ends_with("&fields=files%28id%2Cname%29"));
    }

    #[test]
    fn quotes_in_names_are_escaped() {
        assert_eq!(escape_query_literal("bob's list"), "bob\\'s list");
    }

    #[test]
    fn upload_urls() {
        let c = client();
        let handle = FileHandle::new("1AbCdEf");
        assert_eq!(c.media_url(&handle), "http://drive.test/drive/v3/files/1AbCdEf?alt=media");
        assert_eq!(
            c.create_url(),
            "http://drive.test/upload/drive/v3/files?uploadType=multipart&fields=id"
        );
        assert_eq!(
            c.replace_url(&handle),
            "http://drive.test/upload/drive/v3/files/1AbCdEf?uploadType=media&fields=id"
        );
    }

    #[test]
    fn first_listed_file_wins() {
        let handle = parse_file_list(LIST_FIXTURE).unwrap();
        assert_eq!(handle, Some(FileHandle::new("1AbCdEf")));
    }

    #[test]
    fn empty_list_means_absent() {
        assert_eq!(parse_file_list(r#"{"files": []}"#).unwrap(), None);
        assert_eq!(parse_file_list("{}").unwrap(), None);
    }

    #[test]
    fn garbage_list_is_parse_error() {
        assert!(matches!(parse_file_list("<html>"), Err(RemoteError::Parse(_))));
    }

    #[test]
    fn multipart_body_layout() {
        let (content_type, body) = multipart_body("tally-tasks.json", br#"{"tasks":[]}"#).unwrap();
        assert_eq!(content_type, "multipart/related; boundary=tally-document-boundary");
        let text = String::from_utf8(body).unwrap();
        let expected = "--tally-document-boundary\r\n\
            Content-Type: application/json; charset=UTF-8\r\n\r\n\
            {\"name\":\"tally-tasks.json\",\"parents\":[\"appDataFolder\"]}\r\n\
            --tally-document-boundary\r\n\
            Content-Type: application/json\r\n\r\n\
            {\"tasks\":[]}\r\n\
            --tally-document-boundary--\r\n";
        assert_eq!(text, expected);
    }
}
