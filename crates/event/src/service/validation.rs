use crate::{
    domain::requests::{event::NewMerchandiseItem, registration::SelectionRequest},
    model::{
        event::{Event, EventKind, MerchandiseItem},
        form::{FieldKind, FieldValue, FormField, FormResponse},
        registration::Selection,
    },
};
use chrono::{DateTime, Utc};
use shared::errors::ServiceError;
use std::collections::{BTreeMap, HashMap, HashSet};
use validator::{Validate, ValidateEmail, ValidationErrors};

/// Flattens `validator` output into one message per failing field.
pub fn invalid(errors: ValidationErrors) -> ServiceError {
    let mut problems: Vec<String> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let details: Vec<String> = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            format!("{field}: {}", details.join(", "))
        })
        .collect();

    if problems.is_empty() {
        problems.push(errors.to_string());
    }
    problems.sort();
    ServiceError::Validation(problems)
}

/// The authorable shape of an event, checked on create and on every draft edit.
pub struct EventShape<'a> {
    pub kind: EventKind,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub form_fields: &'a [FormField],
    pub items: &'a [NewMerchandiseItem],
}

pub fn validate_event_shape(shape: &EventShape<'_>) -> Result<(), ServiceError> {
    let mut problems = Vec::new();

    if shape.start_time > shape.end_time {
        problems.push("start_time must not be after end_time".to_string());
    }

    match shape.kind {
        EventKind::Normal if !shape.items.is_empty() => {
            problems.push("merchandise items are only allowed on merchandise events".into());
        }
        EventKind::Merchandise if !shape.form_fields.is_empty() => {
            problems.push("form fields are only allowed on normal events".into());
        }
        _ => {}
    }

    let mut seen = HashSet::new();
    for field in shape.form_fields {
        if field.field_id.trim().is_empty() {
            problems.push(format!("form field '{}' needs an id", field.label));
        } else if !seen.insert(field.field_id.as_str()) {
            problems.push(format!("duplicate form field id '{}'", field.field_id));
        }
        if field.label.trim().is_empty() {
            problems.push(format!("form field '{}' needs a label", field.field_id));
        }
        if field.kind.has_options() && field.options.is_empty() {
            problems.push(format!(
                "{} field '{}' needs at least one option",
                field.kind, field.field_id
            ));
        }
    }

    for item in shape.items {
        if let Err(errors) = item.validate() {
            problems.push(format!("item '{}': {errors}", item.name));
        }
        for axis in &item.variants {
            if axis.name.trim().is_empty() || axis.options.is_empty() {
                problems.push(format!(
                    "item '{}' has a variant axis without a name or options",
                    item.name
                ));
            }
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::Validation(problems))
    }
}

fn value_matches_kind(kind: FieldKind, value: &FieldValue) -> bool {
    matches!(
        (kind, value),
        (
            FieldKind::Text | FieldKind::Textarea | FieldKind::Email,
            FieldValue::Text(_)
        ) | (FieldKind::Number, FieldValue::Number(_))
            | (FieldKind::Date, FieldValue::Date(_))
            | (FieldKind::Dropdown | FieldKind::Radio, FieldValue::Choice(_))
            | (FieldKind::Checkbox, FieldValue::Choices(_))
            | (FieldKind::File, FieldValue::File(_))
    )
}

/// Checks responses against the event's form. Every problem is reported,
/// not just the first.
pub fn validate_form_responses(
    fields: &[FormField],
    responses: &[FormResponse],
) -> Result<(), ServiceError> {
    let by_id: HashMap<&str, &FormField> =
        fields.iter().map(|f| (f.field_id.as_str(), f)).collect();
    let mut answered: HashMap<&str, &FieldValue> = HashMap::new();
    let mut problems = Vec::new();

    for response in responses {
        let Some(field) = by_id.get(response.field_id.as_str()) else {
            problems.push(format!("unknown form field '{}'", response.field_id));
            continue;
        };
        if answered
            .insert(response.field_id.as_str(), &response.value)
            .is_some()
        {
            problems.push(format!("field '{}' answered more than once", field.label));
            continue;
        }
        if !value_matches_kind(field.kind, &response.value) {
            problems.push(format!(
                "field '{}' expects a {} value",
                field.label, field.kind
            ));
            continue;
        }
        if response.value.is_blank() {
            continue;
        }

        match &response.value {
            FieldValue::Text(text) if field.kind == FieldKind::Email => {
                if !text.validate_email() {
                    problems.push(format!("field '{}' must be a valid email", field.label));
                }
            }
            FieldValue::Number(n) if !n.is_finite() => {
                problems.push(format!("field '{}' must be a finite number", field.label));
            }
            FieldValue::Choice(choice) if !field.options.contains(choice) => {
                problems.push(format!(
                    "'{choice}' is not an option of field '{}'",
                    field.label
                ));
            }
            FieldValue::Choices(choices) => {
                for choice in choices.iter().filter(|c| !field.options.contains(c)) {
                    problems.push(format!(
                        "'{choice}' is not an option of field '{}'",
                        field.label
                    ));
                }
            }
            _ => {}
        }
    }

    for field in fields.iter().filter(|f| f.required) {
        let missing = answered
            .get(field.field_id.as_str())
            .is_none_or(|value| value.is_blank());
        if missing {
            problems.push(format!("field '{}' is required", field.label));
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::Validation(problems))
    }
}

fn check_variants(
    item: &MerchandiseItem,
    chosen: &BTreeMap<String, String>,
) -> Result<(), ServiceError> {
    let mut problems = Vec::new();

    for axis in &item.variants {
        match chosen.get(&axis.name) {
            Some(value) if axis.options.contains(value) => {}
            Some(value) => problems.push(format!(
                "'{value}' is not a valid {} for {}",
                axis.name, item.name
            )),
            None => problems.push(format!("choose a {} for {}", axis.name, item.name)),
        }
    }
    for name in chosen.keys() {
        if !item.variants.iter().any(|axis| &axis.name == name) {
            problems.push(format!("{} has no '{name}' option", item.name));
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::Validation(problems))
    }
}

/// Resolves requested selections against the event's catalogue.
///
/// Lines for the same item and variant choice are merged. Per item, in
/// order: existence, variant choice, purchase limit, then stock. Prices are
/// captured here so later catalogue edits never change what was agreed.
pub fn resolve_selections(
    event: &Event,
    requested: &[SelectionRequest],
) -> Result<Vec<Selection>, ServiceError> {
    if requested.is_empty() {
        return Ok(Vec::new());
    }
    if event.kind != EventKind::Merchandise {
        return Err(ServiceError::Validation(vec![
            "selections are only accepted for merchandise events".into(),
        ]));
    }

    let mut merged: Vec<Selection> = Vec::new();
    for line in requested {
        if line.quantity < 1 {
            return Err(ServiceError::Validation(vec![format!(
                "quantity for item {} must be at least 1",
                line.item_id
            )]));
        }
        match merged
            .iter_mut()
            .find(|s| s.item_id == line.item_id && s.variants == line.variants)
        {
            Some(existing) => {
                existing.quantity = existing
                    .quantity
                    .checked_add(line.quantity)
                    .ok_or_else(|| over_limit(event, line.item_id))?;
            }
            None => merged.push(Selection {
                item_id: line.item_id,
                item_name: String::new(),
                quantity: line.quantity,
                variants: line.variants.clone(),
                unit_price: 0,
            }),
        }
    }

    let mut per_item: BTreeMap<i32, i32> = BTreeMap::new();
    for selection in &merged {
        let total = per_item.entry(selection.item_id).or_default();
        *total = total
            .checked_add(selection.quantity)
            .ok_or_else(|| over_limit(event, selection.item_id))?;
    }

    for selection in &mut merged {
        let item = event.item(selection.item_id).ok_or_else(|| {
            ServiceError::NotFound(format!("Merchandise item {}", selection.item_id))
        })?;
        check_variants(item, &selection.variants)?;
        selection.item_name = item.name.clone();
        selection.unit_price = item.price;
    }

    for (&item_id, &quantity) in &per_item {
        let Some(item) = event.item(item_id) else {
            continue;
        };
        if quantity > item.purchase_limit {
            return Err(ServiceError::LimitExceeded {
                item: item.name.clone(),
                limit: item.purchase_limit,
            });
        }
        if quantity > item.stock {
            return Err(ServiceError::InsufficientStock(item.name.clone()));
        }
    }

    Ok(merged)
}

/// Quantities that do not even fit the counter are over any purchase limit.
fn over_limit(event: &Event, item_id: i32) -> ServiceError {
    match event.item(item_id) {
        Some(item) => ServiceError::LimitExceeded {
            item: item.name.clone(),
            limit: item.purchase_limit,
        },
        None => ServiceError::NotFound(format!("Merchandise item {item_id}")),
    }
}

/// Registration fee plus every selection line at its captured price.
pub fn total_amount(registration_fee: i64, selections: &[Selection]) -> Result<i64, ServiceError> {
    selections
        .iter()
        .try_fold(registration_fee, |total, s| {
            s.unit_price
                .checked_mul(i64::from(s.quantity))
                .and_then(|line| total.checked_add(line))
        })
        .ok_or_else(|| ServiceError::Validation(vec!["total amount is out of range".into()]))
}
