//! Form definitions, the form builder operations and submitted records.

mod field;
mod record;

pub use field::{FieldType, FormField};
pub use record::{FormFieldValue, FormRecord};

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A named, ordered list of fields. Usable standalone or attached to a workflow node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<FormField>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Form {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_field(mut self, field: FormField) -> Self {
        self.fields.push(field);
        self
    }

    /// Appends a `text` field named `field{n}`, where `n` is its 1-based position.
    pub fn add_field(&mut self) -> &mut FormField {
        let name = format!("field{}", self.fields.len() + 1);
        self.fields.push(FormField::new(name, FieldType::Text));
        let last = self.fields.len() - 1;
        &mut self.fields[last]
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    /// Renames the first field called `old_name`, keeping its position, type, value and options.
    ///
    /// Name collisions are not prevented; see [`Form::duplicate_field_names`].
    pub fn rename_field(&mut self, old_name: &str, new_name: &str) -> bool {
        match self.field_mut(old_name) {
            Some(field) => {
                field.name = new_name.to_string();
                true
            }
            None => false,
        }
    }

    pub fn set_field_type(&mut self, name: &str, field_type: FieldType) -> bool {
        match self.field_mut(name) {
            Some(field) => {
                field.field_type = field_type;
                true
            }
            None => false,
        }
    }

    pub fn set_required(&mut self, name: &str, required: bool) -> bool {
        match self.field_mut(name) {
            Some(field) => {
                field.required = required;
                true
            }
            None => false,
        }
    }

    pub fn remove_field(&mut self, name: &str) -> Option<FormField> {
        let index = self.fields.iter().position(|f| f.name == name)?;
        Some(self.fields.remove(index))
    }

    /// Moves a field to a new position, shifting the ones in between.
    pub fn move_field(&mut self, from: usize, to: usize) -> bool {
        if from >= self.fields.len() || to >= self.fields.len() {
            return false;
        }
        let field = self.fields.remove(from);
        self.fields.insert(to, field);
        true
    }

    /// Appends an option to a field's list. Duplicates are allowed.
    pub fn add_select_option(&mut self, name: &str, option: impl Into<String>) -> bool {
        match self.field_mut(name) {
            Some(field) => {
                field
                    .select_options
                    .get_or_insert_with(Vec::new)
                    .push(option.into());
                true
            }
            None => false,
        }
    }

    /// Removes the option at `index`, returning it.
    pub fn remove_select_option(&mut self, name: &str, index: usize) -> Option<String> {
        let options = self.field_mut(name)?.select_options.as_mut()?;
        (index < options.len()).then(|| options.remove(index))
    }

    /// Field names used by more than one field, in order of first appearance.
    pub fn duplicate_field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).duplicates().collect()
    }

    /// A record for this form with every default value filled in.
    pub fn new_record(&self, created_by: impl Into<String>) -> FormRecord {
        let mut record = FormRecord::new(self.id.clone().unwrap_or_default(), created_by);
        for field in &self.fields {
            if let Some(value) = &field.value {
                record.set_value(&field.name, value.clone());
            }
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_field_numbers_by_position() {
        let mut form = Form::new("Intake");
        assert_eq!(form.add_field().name, "field1");
        assert_eq!(form.add_field().name, "field2");
        assert_eq!(form.fields[1].field_type, FieldType::Text);
    }

    #[test]
    fn test_move_field_bounds() {
        let mut form = Form::new("f");
        form.add_field();
        form.add_field();
        form.add_field();
        assert!(form.move_field(0, 2));
        let names: Vec<_> = form.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["field2", "field3", "field1"]);
        assert!(!form.move_field(3, 0));
    }

    #[test]
    fn test_remove_select_option_out_of_range() {
        let mut form = Form::new("f");
        form.add_field();
        assert_eq!(form.remove_select_option("field1", 0), None);
        form.add_select_option("field1", "a");
        assert_eq!(form.remove_select_option("field1", 5), None);
        assert_eq!(form.remove_select_option("field1", 0).as_deref(), Some("a"));
    }
}
