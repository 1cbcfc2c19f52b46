use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

use chrono_tz::Tz;

use crate::error::{AppError, Result};
use crate::service::page_service::PageFields;

const DEFAULT_CONFIG_FILE: &str = ".env";
const DEFAULT_TITLE_FIELD_ID: &str = "title";
const DEFAULT_API_BASE_URL: &str = "https://api.notion.com/v1";
const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// Key/value pairs from a dotenv-style file.
#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("cannot read {}: {}", path, e)))?;
        Self::parse(&content)
    }

    /// `CONFIG_FILE` if set, otherwise `./.env` when present.
    pub fn load() -> Result<Self> {
        match env::var("CONFIG_FILE") {
            Ok(path) => Self::from_file(&path),
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(DEFAULT_CONFIG_FILE)
            }
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(AppError::Config(format!(
                    "invalid config line {}: {}",
                    idx + 1,
                    line
                )));
            };
            let key = key.trim();
            let mut value = value.trim().to_string();
            if value.len() >= 2
                && ((value.starts_with('"') && value.ends_with('"'))
                    || (value.starts_with('\'') && value.ends_with('\'')))
            {
                value = value[1..value.len() - 1].to_string();
            }
            values.insert(key.to_string(), value);
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    /// File value first, then the process environment.
    pub fn get_or_env(&self, key: &str) -> Option<String> {
        self.get(key).or_else(|| env::var(key).ok())
    }
}

#[derive(Debug, Clone)]
pub struct NotionSettings {
    pub service_credential: String,
    pub database_id: String,
    pub title_field_id: String,
    pub date_field_id: String,
    pub type_field_id: Option<String>,
    pub api_base_url: String,
    pub notion_version: String,
    pub timezone: Tz,
}

impl NotionSettings {
    pub fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| get(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            non_empty(key).ok_or_else(|| AppError::Config(format!("{} must be set", key)))
        };

        let timezone = match non_empty("NOTION_TIMEZONE") {
            Some(name) => name
                .parse::<Tz>()
                .map_err(|e| AppError::Config(format!("NOTION_TIMEZONE: {}", e)))?,
            None => Tz::UTC,
        };

        Ok(Self {
            service_credential: required("NOTION_KEY")?,
            database_id: required("NOTION_PRODUCTION_DATABASE_ID")?,
            title_field_id: non_empty("NOTION_TITLE_PROPERTY_ID")
                .unwrap_or_else(|| DEFAULT_TITLE_FIELD_ID.to_string()),
            date_field_id: required("NOTION_DATE_PROPERTY_ID")?,
            type_field_id: non_empty("NOTION_TYPE_PROPERTY_ID"),
            api_base_url: non_empty("NOTION_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            notion_version: non_empty("NOTION_VERSION")
                .unwrap_or_else(|| DEFAULT_NOTION_VERSION.to_string()),
            timezone,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::from_lookup(|key| config.get_or_env(key))
    }

    pub fn page_fields(&self) -> PageFields {
        PageFields {
            title_field_id: self.title_field_id.clone(),
            date_field_id: self.date_field_id.clone(),
            type_field_id: self.type_field_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
# Notion integration
export NOTION_KEY="secret_abc"
NOTION_PRODUCTION_DATABASE_ID = 'db-123'
NOTION_DATE_PROPERTY_ID=obD?
NOTION_TYPE_PROPERTY_ID=^QJc
NOTION_TIMEZONE=America/New_York
"#;

    #[test]
    fn parses_dotenv_style_lines() {
        let config = AppConfig::parse(SAMPLE).unwrap();
        assert_eq!(config.get("NOTION_KEY").as_deref(), Some("secret_abc"));
        assert_eq!(
            config.get("NOTION_PRODUCTION_DATABASE_ID").as_deref(),
            Some("db-123")
        );
        assert_eq!(config.get("NOTION_DATE_PROPERTY_ID").as_deref(), Some("obD?"));
        assert_eq!(config.get("MISSING"), None);
    }

    #[test]
    fn rejects_lines_without_assignment() {
        let err = AppConfig::parse("NOTION_KEY secret").unwrap_err();
        assert!(matches!(err, AppError::Config(msg) if msg.contains("line 1")));
    }

    #[test]
    fn settings_fill_defaults() {
        let config = AppConfig::parse(SAMPLE).unwrap();
        let settings = NotionSettings::from_lookup(|key| config.get(key)).unwrap();
        assert_eq!(settings.service_credential, "secret_abc");
        assert_eq!(settings.title_field_id, "title");
        assert_eq!(settings.type_field_id.as_deref(), Some("^QJc"));
        assert_eq!(settings.api_base_url, "https://api.notion.com/v1");
        assert_eq!(settings.notion_version, "2022-06-28");
        assert_eq!(settings.timezone, chrono_tz::America::New_York);
        assert_eq!(settings.page_fields().date_field_id, "obD?");
    }

    #[test]
    fn settings_require_credential_and_database() {
        let config = AppConfig::parse("NOTION_DATE_PROPERTY_ID=obD?").unwrap();
        let err = NotionSettings::from_lookup(|key| config.get(key)).unwrap_err();
        assert!(matches!(err, AppError::Config(msg) if msg.contains("NOTION_KEY")));
    }

    #[test]
    fn settings_reject_unknown_timezone() {
        let config = AppConfig::parse(
            "NOTION_KEY=k\nNOTION_PRODUCTION_DATABASE_ID=d\nNOTION_DATE_PROPERTY_ID=x\nNOTION_TIMEZONE=Mars/Base",
        )
        .unwrap();
        assert!(NotionSettings::from_lookup(|key| config.get(key)).is_err());
    }
}
