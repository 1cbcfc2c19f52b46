use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::models::record::RecordPayload;
use crate::models::schema::{CreatedPage, DatabaseSchema};

/// Where and how to reach the API. Cheap to clone; the inner client pools
/// connections.
#[derive(Debug, Clone)]
pub struct NotionEndpoint {
    pub http: Client,
    pub base_url: String,
    pub api_key: String,
    pub notion_version: String,
}

impl NotionEndpoint {
    pub fn new(base_url: &str, api_key: &str, notion_version: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            notion_version: notion_version.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Parent<'a> {
    database_id: &'a str,
}

#[derive(Debug, Serialize)]
struct CreatePageRequest<'a> {
    parent: Parent<'a>,
    properties: &'a RecordPayload,
}

#[derive(Debug, Deserialize)]
struct NotionErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

pub async fn retrieve_database(
    endpoint: &NotionEndpoint,
    database_id: &str,
) -> Result<DatabaseSchema, ClientError> {
    let response = endpoint
        .http
        .get(format!("{}/databases/{}", endpoint.base_url, database_id))
        .bearer_auth(&endpoint.api_key)
        .header("Notion-Version", &endpoint.notion_version)
        .send()
        .await?;
    decode(response).await
}

pub async fn create_page(
    endpoint: &NotionEndpoint,
    database_id: &str,
    properties: &RecordPayload,
) -> Result<CreatedPage, ClientError> {
    let request = CreatePageRequest {
        parent: Parent { database_id },
        properties,
    };
    let response = endpoint
        .http
        .post(format!("{}/pages", endpoint.base_url))
        .bearer_auth(&endpoint.api_key)
        .header("Notion-Version", &endpoint.notion_version)
        .json(&request)
        .send()
        .await?;
    decode(response).await
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        tracing::debug!(%status, body = %text, "Notion request failed");
        let (code, message) = match serde_json::from_str::<NotionErrorBody>(&text) {
            Ok(body) => (body.code, body.message),
            Err(_) => (String::new(), text),
        };
        return Err(ClientError::Api {
            status: status.as_u16(),
            code,
            message,
        });
    }

    Ok(serde_json::from_str(&text)?)
}
