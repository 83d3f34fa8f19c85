//! Firestore REST client
//!
//! HTTP client for the Cloud Firestore REST API (v1). Also works against the
//! Firestore emulator by pointing `base_url` at it.

use std::{collections::HashMap, time::Duration};

use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::models::{
    Document, ErrorResponse, ListDocumentsResponse, RunQueryRequest, RunQueryResponseItem,
    StructuredQuery, Value,
};

/// Firestore client errors
#[derive(Debug, Error)]
pub enum FirestoreError {
    /// The HTTP client could not be built or the server was unreachable
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to Firestore failed before a response arrived
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Firestore answered with a non-success status
    #[error("Firestore returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Failed to parse a Firestore response
    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Firestore connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirestoreConfig {
    /// REST base URL (default: <https://firestore.googleapis.com/v1>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Google Cloud project id
    #[serde(default)]
    pub project_id: String,

    /// Database id (default: `(default)`)
    #[serde(default = "default_database")]
    pub database: String,

    /// Web API key, sent as the `key` query parameter
    #[serde(default)]
    pub api_key: Option<String>,

    /// OAuth access token, sent as a bearer token
    #[serde(default)]
    pub access_token: Option<String>,

    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Documents fetched per list page (default: 300)
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_base_url() -> String {
    "https://firestore.googleapis.com/v1".to_string()
}

fn default_database() -> String {
    "(default)".to_string()
}

const fn default_timeout() -> u64 {
    10
}

const fn default_page_size() -> u32 {
    300
}

impl Default for FirestoreConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            project_id: String::new(),
            database: default_database(),
            api_key: None,
            access_token: None,
            timeout_secs: default_timeout(),
            page_size: default_page_size(),
        }
    }
}

/// Firestore REST client
#[derive(Debug, Clone)]
pub struct FirestoreClient {
    client: Client,
    config: FirestoreConfig,
}

impl FirestoreClient {
    /// Create a new client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: FirestoreConfig) -> Result<Self, FirestoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FirestoreError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Resource path of the database's document root
    fn documents_root(&self) -> String {
        format!(
            "projects/{}/databases/{}/documents",
            self.config.project_id, self.config.database
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url.trim_end_matches('/'))
    }

    /// Attach the configured credentials
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = match &self.config.api_key {
            Some(key) => request.query(&[("key", key.as_str())]),
            None => request,
        };
        match &self.config.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, FirestoreError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    FirestoreError::ConnectionFailed(e.to_string())
                } else {
                    FirestoreError::RequestFailed(e.to_string())
                }
            })?;

        let response = Self::check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| FirestoreError::ParseError(e.to_string()))
    }

    async fn check_status(response: Response) -> Result<Response, FirestoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body).map_or(body, |e| {
            if e.error.status.is_empty() {
                e.error.message
            } else {
                format!("{}: {}", e.error.status, e.error.message)
            }
        });

        Err(FirestoreError::Status {
            status: status.as_u16(),
            message,
        })
    }

    /// Fetch every document of a collection, following page tokens
    #[instrument(skip(self))]
    pub async fn list_documents(&self, collection: &str) -> Result<Vec<Document>, FirestoreError> {
        let url = self.url(&format!("{}/{collection}", self.documents_root()));
        let page_size = self.config.page_size.to_string();
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&url)
                .query(&[("pageSize", page_size.as_str())]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let page: ListDocumentsResponse = self.send(request).await?;
            documents.extend(page.documents);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!(count = documents.len(), "Listed documents");
        Ok(documents)
    }

    /// Run a structured query against the database root
    #[instrument(skip(self, query))]
    pub async fn run_query(&self, query: StructuredQuery) -> Result<Vec<Document>, FirestoreError> {
        let url = self.url(&format!("{}:runQuery", self.documents_root()));
        let body = RunQueryRequest {
            structured_query: query,
        };

        let items: Vec<RunQueryResponseItem> =
            self.send(self.client.post(&url).json(&body)).await?;
        let documents: Vec<Document> = items.into_iter().filter_map(|i| i.document).collect();

        debug!(count = documents.len(), "Query returned documents");
        Ok(documents)
    }

    /// Create or fully replace the document `collection/id`
    #[instrument(skip(self, fields))]
    pub async fn set_document(
        &self,
        collection: &str,
        id: &str,
        fields: HashMap<String, Value>,
    ) -> Result<Document, FirestoreError> {
        let url = self.url(&format!("{}/{collection}/{id}", self.documents_root()));
        let body = Document::with_fields(fields);
        self.send(self.client.patch(&url).json(&body)).await
    }

    /// Create a document with a Firestore-generated id
    #[instrument(skip(self, fields))]
    pub async fn add_document(
        &self,
        collection: &str,
        fields: HashMap<String, Value>,
    ) -> Result<Document, FirestoreError> {
        let url = self.url(&format!("{}/{collection}", self.documents_root()));
        let body = Document::with_fields(fields);
        self.send(self.client.post(&url).json(&body)).await
    }
}
