use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// How a Notion property must be encoded when creating a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    MultiSelect,
    Number,
    Date,
    Title,
    Formula,
    /// Any other Notion property type, kept by name.
    Unsupported(String),
}

impl FieldType {
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "multi_select" => FieldType::MultiSelect,
            "number" => FieldType::Number,
            "date" => FieldType::Date,
            "title" => FieldType::Title,
            "formula" => FieldType::Formula,
            other => FieldType::Unsupported(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FieldType::MultiSelect => "multi_select",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Title => "title",
            FieldType::Formula => "formula",
            FieldType::Unsupported(name) => name,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to a multi-select option by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionRef {
    pub id: String,
}

impl OptionRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// A loosely-typed value supplied by the caller for one field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Options(Vec<OptionRef>),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

impl From<Vec<OptionRef>> for FieldValue {
    fn from(value: Vec<OptionRef>) -> Self {
        FieldValue::Options(value)
    }
}

/// Lookup from opaque field id to its type tag. Built once at startup,
/// either from configuration or from the live database schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldTypeTable {
    types: HashMap<String, FieldType>,
}

impl FieldTypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, field_id: impl Into<String>, field_type: FieldType) -> Self {
        self.types.insert(field_id.into(), field_type);
        self
    }

    pub fn from_type_names(type_names: &HashMap<String, String>) -> Self {
        let types = type_names
            .iter()
            .map(|(id, name)| (id.clone(), FieldType::from_type_name(name)))
            .collect();
        Self { types }
    }

    pub fn get(&self, field_id: &str) -> Option<&FieldType> {
        self.types.get(field_id)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Checks that every expected field exists with the expected tag.
    pub fn ensure_fields(&self, expected: &[(&str, FieldType)]) -> Result<()> {
        for (field_id, expected_type) in expected {
            match self.types.get(*field_id) {
                None => return Err(AppError::MissingProperty(field_id.to_string())),
                Some(actual) if actual != expected_type => {
                    return Err(AppError::FieldTypeMismatch {
                        field_id: field_id.to_string(),
                        expected: expected_type.clone(),
                        actual: actual.clone(),
                    });
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}
