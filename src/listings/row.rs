// src/listings/row.rs
use crate::listings::json_path::{is_truthy, lookup, PathSegment};
use serde_json::Value;

use PathSegment::{Index, Key};

pub const COLUMN_COUNT: usize = 19;

/// Output header, in column order.
pub const COLUMNS: [&str; COLUMN_COUNT] = [
    "SKU",
    "Channel Item Id",
    "Title",
    "Description",
    "Price",
    "Quantity",
    "Status",
    "State",
    "Condition",
    "Condition Description",
    "Currency",
    "Category",
    "Shipping Profile",
    "Shipping Cost",
    "Main Image",
    "Brand",
    "Model",
    "Finish",
    "Year",
];

const CATEGORY_SEPARATOR: &str = " | ";

/// A single scalar cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    pub fn empty() -> Self {
        CellValue::Text(String::new())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Text(s) if s.is_empty())
    }

    /// Scalar JSON maps onto its own kind; null becomes empty text and
    /// nested containers are kept as compact JSON so nothing is lost.
    fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => CellValue::empty(),
            Value::Bool(b) => CellValue::Bool(*b),
            Value::Number(n) => match n.as_f64() {
                Some(f) => CellValue::Number(f),
                None => CellValue::Text(n.to_string()),
            },
            Value::String(s) => CellValue::Text(s.clone()),
            Value::Array(_) | Value::Object(_) => CellValue::Text(value.to_string()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

/// One listing flattened into the fixed column order of [`COLUMNS`].
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    cells: [CellValue; COLUMN_COUNT],
}

impl Row {
    pub fn cells(&self) -> &[CellValue] {
        &self.cells
    }
}

fn field(listing: &Value, path: &[PathSegment<'_>]) -> CellValue {
    lookup(listing, path)
        .map(CellValue::from_json)
        .unwrap_or_else(CellValue::empty)
}

fn categories(listing: &Value) -> CellValue {
    let names: Vec<String> = lookup(listing, &[Key("categories")])
        .and_then(Value::as_array)
        .map(|cats| {
            cats.iter()
                .map(|cat| match lookup(cat, &[Key("full_name")]) {
                    Some(Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                    None => String::new(),
                })
                .collect()
        })
        .unwrap_or_default();

    CellValue::Text(names.join(CATEGORY_SEPARATOR))
}

/// Flatten one listing. Absent fields degrade to empty cells; this never fails.
pub fn map_listing(listing: &Value) -> Row {
    let status = if is_truthy(lookup(listing, &[Key("offers_enabled")])) {
        "true"
    } else {
        "false"
    };

    Row {
        cells: [
            field(listing, &[Key("sku")]),
            field(listing, &[Key("id")]),
            field(listing, &[Key("title")]),
            field(listing, &[Key("description")]),
            field(listing, &[Key("price"), Key("amount")]),
            field(listing, &[Key("inventory")]),
            CellValue::from(status),
            field(listing, &[Key("state"), Key("description")]),
            field(listing, &[Key("condition"), Key("display_name")]),
            field(listing, &[Key("condition"), Key("description")]),
            field(listing, &[Key("listing_currency")]),
            categories(listing),
            field(listing, &[Key("shipping_profile_id")]),
            field(
                listing,
                &[Key("shipping"), Key("rates"), Index(0), Key("rate"), Key("amount")],
            ),
            field(
                listing,
                &[Key("photos"), Index(0), Key("_links"), Key("full"), Key("href")],
            ),
            field(listing, &[Key("make")]),
            field(listing, &[Key("model")]),
            field(listing, &[Key("finish")]),
            field(listing, &[Key("year")]),
        ],
    }
}
