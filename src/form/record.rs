use super::Form;
use crate::error::FormError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A submitted value. Always a string, whatever the field's declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormFieldValue {
    pub form_field: String,
    pub value: String,
}

/// A concrete set of values submitted against a form by a user.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub form: String,
    pub created_by: String,
    #[serde(default)]
    pub values: Vec<FormFieldValue>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FormRecord {
    pub fn new(form: impl Into<String>, created_by: impl Into<String>) -> Self {
        Self {
            form: form.into(),
            created_by: created_by.into(),
            ..Default::default()
        }
    }

    /// Sets or replaces the value for a field.
    pub fn set_value(&mut self, field: &str, value: impl Into<String>) {
        let value = value.into();
        match self.values.iter_mut().find(|v| v.form_field == field) {
            Some(existing) => existing.value = value,
            None => self.values.push(FormFieldValue {
                form_field: field.to_string(),
                value,
            }),
        }
    }

    pub fn value(&self, field: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|v| v.form_field == field)
            .map(|v| v.value.as_str())
    }

    /// Checks the record before submission.
    ///
    /// Required fields must have a non-blank value and every value must belong to a
    /// field of the form. Values are not checked against the field type: a `number`
    /// field accepts `"abc"` and an `email` field accepts `"not-an-email"`.
    pub fn validate(&self, form: &Form) -> Result<(), Vec<FormError>> {
        let mut errors = Vec::new();

        if let Some(form_id) = &form.id {
            if !self.form.is_empty() && &self.form != form_id {
                errors.push(FormError::FormMismatch {
                    record_form: self.form.clone(),
                    form: form_id.clone(),
                });
            }
        }

        for field in form.fields.iter().filter(|f| f.required) {
            let filled = self
                .value(&field.name)
                .is_some_and(|v| !v.trim().is_empty());
            if !filled {
                errors.push(FormError::MissingRequired(field.name.clone()));
            }
        }

        for value in &self.values {
            if form.field(&value.form_field).is_none() {
                errors.push(FormError::UnknownField(
                    value.form_field.clone(),
                    form.name.clone(),
                ));
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
