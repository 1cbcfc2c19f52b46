use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::Result;
use crate::models::field::{FieldTypeTable, FieldValue, OptionRef};
use crate::models::record::{RecordDraft, build_record_payload};
use crate::models::schema::CreatedPage;
use crate::service::notion_service::NotionApi;

/// Creates one record for a given title and date.
#[async_trait]
pub trait RecordSubmitter: Send + Sync {
    async fn submit_one(&self, title: &str, date: NaiveDate) -> Result<()>;
}

/// Field ids of the properties every recurring page fills in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFields {
    pub title_field_id: String,
    pub date_field_id: String,
    pub type_field_id: Option<String>,
}

pub struct PageCreator {
    api: Arc<dyn NotionApi>,
    database_id: String,
    table: FieldTypeTable,
    fields: PageFields,
    types: Vec<OptionRef>,
    extra_fields: Vec<(String, FieldValue)>,
}

impl PageCreator {
    pub fn new(
        api: Arc<dyn NotionApi>,
        database_id: impl Into<String>,
        table: FieldTypeTable,
        fields: PageFields,
    ) -> Self {
        Self {
            api,
            database_id: database_id.into(),
            table,
            fields,
            types: Vec::new(),
            extra_fields: Vec::new(),
        }
    }

    /// Multi-select options attached to every page. Ignored when no type
    /// field is configured.
    pub fn with_types(mut self, types: Vec<OptionRef>) -> Self {
        self.types = types;
        self
    }

    /// Additional values written on every page, e.g. a number field.
    /// Title, date and type values set here are overridden per page.
    pub fn with_extra_fields(mut self, extra_fields: Vec<(String, FieldValue)>) -> Self {
        self.extra_fields = extra_fields;
        self
    }

    pub fn draft(&self, title: &str, date: NaiveDate) -> RecordDraft {
        let mut draft = RecordDraft::new();
        for (field_id, value) in &self.extra_fields {
            draft = draft.with(field_id.clone(), value.clone());
        }
        draft = draft
            .with(self.fields.title_field_id.clone(), title)
            .with(self.fields.date_field_id.clone(), date);
        if let Some(type_field_id) = &self.fields.type_field_id {
            if !self.types.is_empty() {
                draft = draft.with(type_field_id.clone(), self.types.clone());
            }
        }
        draft
    }

    /// Creates a page holding only the fields present in `draft`.
    pub async fn create(&self, draft: &RecordDraft) -> Result<CreatedPage> {
        let payload = build_record_payload(&self.table, draft)?;
        let page = self.api.create_record(&self.database_id, &payload).await?;
        Ok(page)
    }
}

#[async_trait]
impl RecordSubmitter for PageCreator {
    async fn submit_one(&self, title: &str, date: NaiveDate) -> Result<()> {
        let draft = self.draft(title, date);
        self.create(&draft).await?;
        Ok(())
    }
}
