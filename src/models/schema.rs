use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The parts of a Notion database object this tool reads.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSchema {
    pub id: String,
    /// Keyed by display name, not by property id.
    #[serde(default)]
    pub properties: HashMap<String, PropertySchema>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PropertySchema {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub multi_select: Option<MultiSelectSchema>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MultiSelectSchema {
    #[serde(default)]
    pub options: Vec<SelectOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub id: String,
    pub name: String,
}

impl fmt::Display for SelectOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedPage {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
}
