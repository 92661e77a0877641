use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

text_enum!(FieldKind, "form field kind", {
    Text => "text",
    Textarea => "textarea",
    Email => "email",
    Number => "number",
    Date => "date",
    Dropdown => "dropdown",
    Radio => "radio",
    Checkbox => "checkbox",
    File => "file",
});

impl FieldKind {
    pub fn has_options(&self) -> bool {
        matches!(
            self,
            FieldKind::Dropdown | FieldKind::Radio | FieldKind::Checkbox
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FormField {
    pub field_id: String,
    pub label: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub order: i32,
}

/// A participant's answer, tagged by the shape of value it carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Choice(String),
    Choices(Vec<String>),
    File(String),
}

impl FieldValue {
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(s) | FieldValue::Choice(s) | FieldValue::File(s) => {
                s.trim().is_empty()
            }
            FieldValue::Choices(values) => values.is_empty(),
            FieldValue::Number(_) | FieldValue::Date(_) => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FormResponse {
    pub field_id: String,
    #[schema(value_type = Object)]
    pub value: FieldValue,
}
