use std::collections::HashMap;

use crate::error::{AppError, Result};
use crate::models::date_range::parse_iso_date;
use crate::models::field::{FieldType, FieldTypeTable, FieldValue, OptionRef};
use crate::models::schema::{DatabaseSchema, PropertySchema, SelectOption};
use crate::service::notion_service::NotionApi;

/// Re-keys the schema's name-keyed properties by property id.
pub fn properties_by_id(schema: &DatabaseSchema) -> HashMap<&str, &PropertySchema> {
    schema
        .properties
        .values()
        .map(|property| (property.id.as_str(), property))
        .collect()
}

pub fn field_types_by_id(schema: &DatabaseSchema) -> HashMap<String, String> {
    schema
        .properties
        .values()
        .map(|property| (property.id.clone(), property.kind.clone()))
        .collect()
}

pub fn multi_select_options(schema: &DatabaseSchema, field_id: &str) -> Result<Vec<SelectOption>> {
    let properties = properties_by_id(schema);
    let property = properties
        .get(field_id)
        .ok_or_else(|| AppError::MissingProperty(field_id.to_string()))?;
    match &property.multi_select {
        Some(multi_select) => Ok(multi_select.options.clone()),
        None => Err(AppError::FieldTypeMismatch {
            field_id: field_id.to_string(),
            expected: FieldType::MultiSelect,
            actual: FieldType::from_type_name(&property.kind),
        }),
    }
}

pub fn field_type_table(schema: &DatabaseSchema) -> FieldTypeTable {
    FieldTypeTable::from_type_names(&field_types_by_id(schema))
}

/// Looks options up by name, case-insensitively, keeping the caller's order.
pub fn resolve_options(
    field_id: &str,
    options: &[SelectOption],
    names: &[String],
) -> Result<Vec<OptionRef>> {
    names
        .iter()
        .map(|name| {
            options
                .iter()
                .find(|option| option.name.eq_ignore_ascii_case(name.trim()))
                .map(|option| OptionRef::new(option.id.clone()))
                .ok_or_else(|| AppError::UnknownOption {
                    field_id: field_id.to_string(),
                    name: name.clone(),
                })
        })
        .collect()
}

/// Parses an `ID=VALUE` pair into a value shaped for that field's type.
/// Multi-select values are comma-separated option names.
pub fn parse_field_assignment(schema: &DatabaseSchema, raw: &str) -> Result<(String, FieldValue)> {
    let (field_id, value) = raw
        .split_once('=')
        .ok_or_else(|| AppError::InvalidAssignment(raw.to_string()))?;
    let field_id = field_id.trim();
    if field_id.is_empty() {
        return Err(AppError::InvalidAssignment(raw.to_string()));
    }

    let properties = properties_by_id(schema);
    let property = properties
        .get(field_id)
        .ok_or_else(|| AppError::UnknownField(field_id.to_string()))?;
    let field_type = FieldType::from_type_name(&property.kind);
    let mismatch = || AppError::ValueMismatch {
        field_id: field_id.to_string(),
        expected: field_type.clone(),
    };

    let value = match &field_type {
        FieldType::Title => FieldValue::Text(value.to_string()),
        FieldType::Number => FieldValue::Number(value.trim().parse().map_err(|_| mismatch())?),
        FieldType::Date => FieldValue::Date(parse_iso_date(value).map_err(|_| mismatch())?),
        FieldType::MultiSelect => {
            let names: Vec<String> = value
                .split(',')
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect();
            let options = multi_select_options(schema, field_id)?;
            FieldValue::Options(resolve_options(field_id, &options, &names)?)
        }
        FieldType::Formula | FieldType::Unsupported(_) => {
            return Err(AppError::UnwritableField {
                field_id: field_id.to_string(),
                field_type: field_type.clone(),
            });
        }
    };
    Ok((field_id.to_string(), value))
}

pub async fn fetch_field_type_map(
    api: &dyn NotionApi,
    database_id: &str,
) -> Result<HashMap<String, String>> {
    let schema = api.retrieve_database_schema(database_id).await?;
    Ok(field_types_by_id(&schema))
}

pub async fn fetch_multi_select_options(
    api: &dyn NotionApi,
    database_id: &str,
    field_id: &str,
) -> Result<Vec<SelectOption>> {
    let schema = api.retrieve_database_schema(database_id).await?;
    multi_select_options(&schema, field_id)
}
