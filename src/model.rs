//! The input document model: everything the form layer hands over for one
//! quotation or invoice.
//!
//! Amounts are kept as raw JSON values because the upstream data is loose
//! about types (`"3"`, `3`, `null`, missing) and about key names; the
//! [`resolve`](crate::resolve) module turns them into safe numbers.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A loosely typed record, such as one line item
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(pub Map<String, Value>);

impl Record {
    pub fn new() -> Record {
        Record::default()
    }

    /// Look a key up, treating JSON `null` as absent
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|value| !value.is_null())
    }

    /// Set a key, consuming and returning `self` so records can be built inline
    pub fn with<V: Into<Value>>(mut self, key: &str, value: V) -> Record {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// The display text of the first present key, or an empty string
    pub fn text(&self, keys: &[&str]) -> String {
        keys.iter()
            .find_map(|key| self.get(key))
            .map(display_value)
            .unwrap_or_default()
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Record(map),
            _ => Record::default(),
        }
    }
}

/// Render a scalar JSON value the way it should appear on the page
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// How the `discount` field is to be read
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    /// `discount` is an absolute amount
    #[default]
    Amount,
    /// `discount` is a percentage of the subtotal
    Percentage,
}

/// Only `"percentage"` (any case) selects percentage mode; anything else,
/// `null` included, reads as an amount.
impl<'de> Deserialize<'de> for DiscountType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value.as_str().map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("percentage") => DiscountType::Percentage,
            _ => DiscountType::Amount,
        })
    }
}

/// Accept any scalar where text is expected: numbers and booleans are
/// printed, `null`, arrays and objects read as absent.
fn loose_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        value @ (Value::Number(_) | Value::Bool(_)) => Some(display_value(&value)),
        _ => None,
    })
}

/// One quotation or invoice as produced by the form layer
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentModel {
    #[serde(alias = "invoiceId", deserialize_with = "loose_text")]
    pub quotation_id: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub date: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub customer_name: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub customer_address: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub customer_email: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub reference: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub attention: Option<String>,
    #[serde(alias = "validity", alias = "dueDate", deserialize_with = "loose_text")]
    pub valid_until: Option<String>,
    /// `None` when the form layer sent no item list at all
    pub items: Option<Vec<Record>>,
    pub subtotal: Value,
    pub discount: Value,
    pub discount_amount: Value,
    pub discount_type: DiscountType,
    pub tax_rate: Value,
    pub tax: Value,
    pub total_amount: Value,
    /// Internal margin figure; carried through but never printed
    pub expected_income: Value,
    #[serde(deserialize_with = "loose_text")]
    pub notes: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub terms: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub eta: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub bank_details: Option<String>,
}

impl DocumentModel {
    /// Parse a document model from JSON text
    pub fn from_json(json: &str) -> Result<DocumentModel, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The document-level amounts as one record, so they resolve through the
    /// same key chains as line items
    pub fn amounts(&self) -> Record {
        let mut record = Record::new();
        for (key, value) in [
            ("subtotal", &self.subtotal),
            ("discount", &self.discount),
            ("discountAmount", &self.discount_amount),
            ("taxRate", &self.tax_rate),
            ("tax", &self.tax),
            ("totalAmount", &self.total_amount),
            ("expectedIncome", &self.expected_income),
        ] {
            if !value.is_null() {
                record.0.insert(key.to_string(), value.clone());
            }
        }
        record
    }
}

/// Borrow a string field as trimmed text, treating blank as absent
pub(crate) fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_camel_case_model() {
        let model = DocumentModel::from_json(
            r#"{
                "invoiceId": "INV-7",
                "customerName": "Acme Pty",
                "items": [{"name": "Widget", "qty": "2", "price": 4.5}],
                "discountType": "percentage",
                "discount": 10,
                "subtotal": "9.00"
            }"#,
        )
        .expect("valid model");

        assert_eq!(model.quotation_id.as_deref(), Some("INV-7"));
        assert_eq!(model.discount_type, DiscountType::Percentage);
        let items = model.items.expect("items present");
        assert_eq!(items[0].text(&["name"]), "Widget");
        assert_eq!(model.subtotal, json!("9.00"));
    }

    #[test]
    fn missing_items_stay_missing() {
        let model = DocumentModel::from_json(r#"{"quotationId": "Q-1"}"#).expect("valid model");
        assert!(model.items.is_none());

        let model = DocumentModel::from_json(r#"{"items": []}"#).expect("valid model");
        assert_eq!(model.items.map(|items| items.len()), Some(0));
    }

    #[test]
    fn tolerates_loose_scalar_types() {
        let model = DocumentModel::from_json(
            r#"{
                "quotationId": 1042,
                "customerName": null,
                "reference": true,
                "discountType": null
            }"#,
        )
        .expect("valid model");

        assert_eq!(model.quotation_id.as_deref(), Some("1042"));
        assert_eq!(model.customer_name, None);
        assert_eq!(model.reference.as_deref(), Some("true"));
        assert_eq!(model.discount_type, DiscountType::Amount);

        for (raw, expected) in [
            ("\"fixed\"", DiscountType::Amount),
            ("\"Percentage\"", DiscountType::Percentage),
            ("\" PERCENTAGE \"", DiscountType::Percentage),
            ("10", DiscountType::Amount),
        ] {
            let json = format!(r#"{{"discountType": {raw}}}"#);
            let model = DocumentModel::from_json(&json).expect("valid model");
            assert_eq!(model.discount_type, expected, "{raw}");
        }
    }

    #[test]
    fn null_counts_as_absent() {
        let record = Record::new().with("name", Value::Null).with("title", "Bolt");
        assert_eq!(record.text(&["name", "title"]), "Bolt");
        assert_eq!(record.text(&["sku"]), "");
    }

    #[test]
    fn amounts_skip_null_fields() {
        let model = DocumentModel {
            tax: json!(1.5),
            ..Default::default()
        };
        let amounts = model.amounts();
        assert!(amounts.get("tax").is_some());
        assert!(amounts.get("subtotal").is_none());
    }
}
