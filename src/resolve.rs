//! Safe numeric resolution of loosely typed fields.
//!
//! Upstream records name the same quantity differently depending on where
//! they came from (`quantity` on quotations, `qtyOrdered` on purchase
//! orders, ...). Each logical field is described by a [FieldChain]: an
//! ordered list of keys, of which the first one present wins. Resolution
//! never fails; anything absent or unparseable becomes `0`.

use crate::model::Record;
use serde_json::Value;

/// An ordered list of alternate keys for one logical numeric field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldChain {
    pub name: &'static str,
    pub keys: &'static [&'static str],
}

pub const QUANTITY: FieldChain = FieldChain::new(
    "quantity",
    &["quantity", "qty", "qtyOrdered", "qtyRequested"],
);
pub const UNIT_PRICE: FieldChain =
    FieldChain::new("unit price", &["price", "unitPrice", "sellingPrice"]);
pub const LINE_TOTAL: FieldChain = FieldChain::new("line total", &["totalPrice", "total"]);

pub const SUBTOTAL: FieldChain = FieldChain::new("subtotal", &["subtotal"]);
pub const DISCOUNT: FieldChain = FieldChain::new("discount", &["discount"]);
pub const DISCOUNT_AMOUNT: FieldChain =
    FieldChain::new("discount amount", &["discountAmount", "discount"]);
pub const TAX: FieldChain = FieldChain::new("tax", &["tax", "taxAmount"]);
pub const TAX_RATE: FieldChain = FieldChain::new("tax rate", &["taxRate"]);
pub const GRAND_TOTAL: FieldChain =
    FieldChain::new("grand total", &["totalAmount", "total", "grandTotal"]);

impl FieldChain {
    pub const fn new(name: &'static str, keys: &'static [&'static str]) -> FieldChain {
        FieldChain { name, keys }
    }

    /// The raw value of the first key present in the record
    pub fn lookup<'r>(&self, record: &'r Record) -> Option<&'r Value> {
        self.keys.iter().find_map(|key| record.get(key))
    }

    /// Whether any key of the chain is present
    pub fn is_present(&self, record: &Record) -> bool {
        self.lookup(record).is_some()
    }

    /// The first present key coerced to a finite number, or `0`
    pub fn resolve(&self, record: &Record) -> f64 {
        self.lookup(record).map(coerce_number).unwrap_or(0.0)
    }
}

/// Coerce a JSON value to a finite number, falling back to `0`
pub fn coerce_number(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => parse_number(s),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    };
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

fn parse_number(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }

    let radix = match text.get(..2).map(str::to_ascii_lowercase).as_deref() {
        Some("0x") => Some(16),
        Some("0o") => Some(8),
        Some("0b") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return u64::from_str_radix(&text[2..], radix)
            .map(|n| n as f64)
            .unwrap_or(0.0);
    }

    text.parse::<f64>().unwrap_or(0.0)
}

/// The resolved quantity, unit price and total of one line item
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct LineAmounts {
    pub quantity: f64,
    pub unit_price: f64,
    pub total: f64,
}

impl LineAmounts {
    /// Resolve a line item. When the record carries no explicit total it is
    /// derived from the already resolved quantity and unit price.
    pub fn resolve(record: &Record) -> LineAmounts {
        let quantity = QUANTITY.resolve(record);
        let unit_price = UNIT_PRICE.resolve(record);
        let total = if LINE_TOTAL.is_present(record) {
            LINE_TOTAL.resolve(record)
        } else {
            quantity * unit_price
        };

        LineAmounts {
            quantity,
            unit_price,
            total,
        }
    }
}
