use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

pub type ConditionId = String;

/// Comparison operators a decision condition may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "<")]
    SmallerThan,
    #[serde(rename = ">=")]
    GreaterThanOrEqual,
    #[serde(rename = "<=")]
    SmallerThanOrEqual,
}

impl Operator {
    pub const ALL: [Operator; 6] = [
        Operator::Equal,
        Operator::NotEqual,
        Operator::GreaterThan,
        Operator::SmallerThan,
        Operator::GreaterThanOrEqual,
        Operator::SmallerThanOrEqual,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::GreaterThan => ">",
            Operator::SmallerThan => "<",
            Operator::GreaterThanOrEqual => ">=",
            Operator::SmallerThanOrEqual => "<=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Operator::ALL
            .into_iter()
            .find(|op| op.symbol() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// One `field operator value` triple. The backend evaluates it; this crate never does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub id: ConditionId,
    pub field: String,
    pub operator: Operator,
    pub value: String,
    /// Keys the designer does not interpret, such as a `logic` joiner.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.operator, self.value)
    }
}

/// Ordered conditions of a decision node. Order is display-only.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConditionList {
    items: Vec<Condition>,
    next_seq: u64,
}

impl ConditionList {
    /// Wraps conditions received from the backend, continuing id generation after them.
    pub fn from_conditions(items: Vec<Condition>) -> Self {
        let next_seq = items
            .iter()
            .filter_map(|c| c.id.strip_prefix("cond-"))
            .filter_map(|n| n.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self { items, next_seq }
    }

    /// Appends a condition. Returns `None` and leaves the list untouched when any
    /// part is blank or the operator is not one of the six known symbols.
    pub fn add(&mut self, field: &str, operator: &str, value: &str) -> Option<ConditionId> {
        let (field, value) = (field.trim(), value.trim());
        if field.is_empty() || operator.trim().is_empty() || value.is_empty() {
            log::debug!("Ignoring incomplete condition '{} {} {}'", field, operator, value);
            return None;
        }
        let operator = operator.parse::<Operator>().ok()?;

        let id = self.next_id();
        self.items.push(Condition {
            id: id.clone(),
            field: field.to_string(),
            operator,
            value: value.to_string(),
            extra: Map::new(),
        });
        Some(id)
    }

    /// Edits an existing condition in place. Blank replacements are ignored.
    pub fn update(
        &mut self,
        id: &str,
        field: Option<&str>,
        operator: Option<&str>,
        value: Option<&str>,
    ) -> bool {
        let Some(condition) = self.items.iter_mut().find(|c| c.id == id) else {
            return false;
        };
        if let Some(field) = field.map(str::trim).filter(|f| !f.is_empty()) {
            condition.field = field.to_string();
        }
        if let Some(op) = operator.and_then(|o| o.parse::<Operator>().ok()) {
            condition.operator = op;
        }
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            condition.value = value.to_string();
        }
        true
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|c| c.id != id);
        self.items.len() != before
    }

    pub fn get(&self, id: &str) -> Option<&Condition> {
        self.items.iter().find(|c| c.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Condition> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Condition] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn next_id(&mut self) -> ConditionId {
        loop {
            self.next_seq += 1;
            let candidate = format!("cond-{}", self.next_seq);
            if !self.items.iter().any(|c| c.id == candidate) {
                return candidate;
            }
        }
    }
}

impl<'a> IntoIterator for &'a ConditionList {
    type Item = &'a Condition;
    type IntoIter = std::slice::Iter<'a, Condition>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_parsing() {
        assert_eq!(">=".parse::<Operator>(), Ok(Operator::GreaterThanOrEqual));
        assert_eq!(" != ".parse::<Operator>(), Ok(Operator::NotEqual));
        assert!("=>".parse::<Operator>().is_err());
        assert_eq!(Operator::SmallerThan.to_string(), "<");
    }

    #[test]
    fn test_add_rejects_blank_parts() {
        let mut list = ConditionList::default();
        assert!(list.add("", "==", "x").is_none());
        assert!(list.add("amount", "", "x").is_none());
        assert!(list.add("amount", ">", "  ").is_none());
        assert!(list.add("amount", "~", "10").is_none());
        assert!(list.is_empty());
    }

    #[test]
    fn test_ids_continue_after_loaded_conditions() {
        let mut list = ConditionList::from_conditions(vec![Condition {
            id: "cond-7".to_string(),
            field: "amount".to_string(),
            operator: Operator::GreaterThan,
            value: "100".to_string(),
            extra: Map::new(),
        }]);
        assert_eq!(list.add("status", "==", "open").as_deref(), Some("cond-8"));
    }

    #[test]
    fn test_update_keeps_untouched_parts() {
        let mut list = ConditionList::default();
        let id = list.add("amount", ">", "100").unwrap();
        assert!(list.update(&id, None, Some("<="), Some(" ")));
        let c = list.get(&id).unwrap();
        assert_eq!(c.to_string(), "amount <= 100");
        assert!(!list.update("missing", Some("x"), None, None));
    }
}
