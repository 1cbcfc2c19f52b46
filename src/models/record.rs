use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::field::{FieldType, FieldTypeTable, FieldValue, OptionRef};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateValue {
    pub start: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextContent {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RichText {
    Text { text: TextContent },
}

/// A property value in the shape the pages endpoint expects, e.g.
/// `{"date": {"start": "2021-08-16"}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyValue {
    MultiSelect(Vec<OptionRef>),
    Number(f64),
    Date(DateValue),
    Title(Vec<RichText>),
}

/// Raw values keyed by field id, as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordDraft {
    fields: BTreeMap<String, FieldValue>,
}

impl RecordDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field_id: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(field_id.into(), value.into());
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RecordPayload {
    properties: BTreeMap<String, PropertyValue>,
}

impl RecordPayload {
    pub fn get(&self, field_id: &str) -> Option<&PropertyValue> {
        self.properties.get(field_id)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

pub fn build_field_payload(
    table: &FieldTypeTable,
    field_id: &str,
    value: &FieldValue,
) -> Result<PropertyValue> {
    let field_type = table
        .get(field_id)
        .ok_or_else(|| AppError::UnknownField(field_id.to_string()))?;

    let mismatch = || AppError::ValueMismatch {
        field_id: field_id.to_string(),
        expected: field_type.clone(),
    };

    match field_type {
        FieldType::MultiSelect => match value {
            FieldValue::Options(options) => Ok(PropertyValue::MultiSelect(options.clone())),
            _ => Err(mismatch()),
        },
        FieldType::Number => match value {
            // NaN and infinities serialize as null, which clears the field.
            FieldValue::Number(number) if number.is_finite() => {
                Ok(PropertyValue::Number(*number))
            }
            _ => Err(mismatch()),
        },
        FieldType::Date => match value {
            FieldValue::Date(date) => Ok(PropertyValue::Date(DateValue {
                start: date.format("%Y-%m-%d").to_string(),
            })),
            // Passed through verbatim so datetimes with offsets still work.
            FieldValue::Text(iso) => Ok(PropertyValue::Date(DateValue { start: iso.clone() })),
            _ => Err(mismatch()),
        },
        FieldType::Title => match value {
            FieldValue::Text(content) => Ok(PropertyValue::Title(vec![RichText::Text {
                text: TextContent {
                    content: content.clone(),
                },
            }])),
            _ => Err(mismatch()),
        },
        FieldType::Formula | FieldType::Unsupported(_) => Err(AppError::UnwritableField {
            field_id: field_id.to_string(),
            field_type: field_type.clone(),
        }),
    }
}

pub fn build_record_payload(table: &FieldTypeTable, draft: &RecordDraft) -> Result<RecordPayload> {
    let mut properties = BTreeMap::new();
    for (field_id, value) in draft.iter() {
        properties.insert(field_id.clone(), build_field_payload(table, field_id, value)?);
    }
    Ok(RecordPayload { properties })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn table() -> FieldTypeTable {
        FieldTypeTable::new()
            .with_field("title", FieldType::Title)
            .with_field("obD?", FieldType::Date)
            .with_field("^QJc", FieldType::MultiSelect)
            .with_field("`;FF", FieldType::Number)
            .with_field("}tZR", FieldType::Formula)
    }

    #[test]
    fn title_is_wrapped_as_rich_text() {
        let payload = build_field_payload(&table(), "title", &"X".into()).unwrap();
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"title": [{"type": "text", "text": {"content": "X"}}]})
        );
    }

    #[test]
    fn date_is_wrapped_with_start() {
        let date = NaiveDate::from_ymd_opt(2021, 8, 16).unwrap();
        let from_date = build_field_payload(&table(), "obD?", &date.into()).unwrap();
        let from_text = build_field_payload(&table(), "obD?", &"2021-08-16".into()).unwrap();
        assert_eq!(from_date, from_text);
        assert_eq!(
            serde_json::to_value(&from_date).unwrap(),
            json!({"date": {"start": "2021-08-16"}})
        );
    }

    #[test]
    fn multi_select_and_number_pass_through() {
        let options = vec![OptionRef::new("a1"), OptionRef::new("b2")];
        let multi = build_field_payload(&table(), "^QJc", &options.into()).unwrap();
        assert_eq!(
            serde_json::to_value(&multi).unwrap(),
            json!({"multi_select": [{"id": "a1"}, {"id": "b2"}]})
        );

        let number = build_field_payload(&table(), "`;FF", &FieldValue::Number(45.0)).unwrap();
        assert_eq!(serde_json::to_value(&number).unwrap(), json!({"number": 45.0}));
    }

    #[test]
    fn unknown_field_is_an_error() {
        let err = build_field_payload(&table(), "nope", &"X".into()).unwrap_err();
        assert!(matches!(err, AppError::UnknownField(id) if id == "nope"));
    }

    #[test]
    fn formula_field_cannot_be_written() {
        let err = build_field_payload(&table(), "}tZR", &FieldValue::Number(1.0)).unwrap_err();
        assert!(matches!(
            err,
            AppError::UnwritableField { field_type: FieldType::Formula, .. }
        ));
    }

    #[test]
    fn mismatched_value_is_an_error() {
        let err = build_field_payload(&table(), "title", &FieldValue::Number(1.0)).unwrap_err();
        assert!(matches!(
            err,
            AppError::ValueMismatch { expected: FieldType::Title, .. }
        ));
    }

    #[test]
    fn record_payload_covers_every_draft_field() {
        let draft = RecordDraft::new()
            .with("title", "Gym")
            .with("obD?", NaiveDate::from_ymd_opt(2021, 8, 16).unwrap())
            .with("^QJc", vec![OptionRef::new("a1")]);
        let payload = build_record_payload(&table(), &draft).unwrap();
        assert_eq!(payload.len(), 3);
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "title": {"title": [{"type": "text", "text": {"content": "Gym"}}]},
                "obD?": {"date": {"start": "2021-08-16"}},
                "^QJc": {"multi_select": [{"id": "a1"}]}
            })
        );
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        for number in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = build_field_payload(&table(), "`;FF", &FieldValue::Number(number))
                .unwrap_err();
            assert!(matches!(
                err,
                AppError::ValueMismatch { expected: FieldType::Number, .. }
            ));
        }
    }

    #[test]
    fn empty_draft_builds_empty_payload() {
        let draft = RecordDraft::new();
        assert!(draft.is_empty());
        let payload = build_record_payload(&table(), &draft).unwrap();
        assert!(payload.is_empty());
        assert_eq!(serde_json::to_value(&payload).unwrap(), json!({}));
    }

    #[test]
    fn record_payload_fails_on_first_bad_field() {
        let draft = RecordDraft::new().with("title", "Gym").with("unknown", "x");
        assert!(matches!(
            build_record_payload(&table(), &draft),
            Err(AppError::UnknownField(_))
        ));
    }
}
