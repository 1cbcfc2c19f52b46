use async_trait::async_trait;

use crate::clients::notion_client::{self, NotionEndpoint};
use crate::error::ClientError;
use crate::models::record::RecordPayload;
use crate::models::schema::{CreatedPage, DatabaseSchema};

/// The two remote operations the rest of the crate depends on.
#[async_trait]
pub trait NotionApi: Send + Sync {
    async fn retrieve_database_schema(
        &self,
        database_id: &str,
    ) -> Result<DatabaseSchema, ClientError>;

    async fn create_record(
        &self,
        database_id: &str,
        payload: &RecordPayload,
    ) -> Result<CreatedPage, ClientError>;
}

pub struct NotionService {
    endpoint: NotionEndpoint,
}

impl NotionService {
    pub fn new(endpoint: NotionEndpoint) -> Self {
        Self { endpoint }
    }
}

#[async_trait]
impl NotionApi for NotionService {
    async fn retrieve_database_schema(
        &self,
        database_id: &str,
    ) -> Result<DatabaseSchema, ClientError> {
        notion_client::retrieve_database(&self.endpoint, database_id).await
    }

    async fn create_record(
        &self,
        database_id: &str,
        payload: &RecordPayload,
    ) -> Result<CreatedPage, ClientError> {
        let page = notion_client::create_page(&self.endpoint, database_id, payload).await?;
        tracing::info!(page_id = %page.id, url = page.url.as_deref().unwrap_or(""), "created page");
        Ok(page)
    }
}
