use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};

use stowage_core::{DomainError, DomainResult, ValueObject, Weight};

/// Record field holding the item weight.
pub const WEIGHT_FIELD: &str = "Weight";
/// Record field holding the priority label.
pub const PRIORITY_FIELD: &str = "Priority";
/// Record field holding the fragility flag.
pub const FRAGILE_FIELD: &str = "Fragile";

pub const LENGTH_FIELD: &str = "Length";
pub const WIDTH_FIELD: &str = "Width";
pub const HEIGHT_FIELD: &str = "Height";

/// Dispatch priority of a product.
///
/// Labels other than the three known ones are kept verbatim in `Unspecified`.
/// They rank alongside `Medium`: an unknown label is treated as "normal" priority,
/// never as the most or least urgent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    High,
    Medium,
    Low,
    Unspecified(String),
}

impl Priority {
    /// Parse a priority label. Surrounding whitespace is ignored; matching is exact.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "High" => Priority::High,
            "Medium" => Priority::Medium,
            "Low" => Priority::Low,
            _ => Priority::Unspecified(raw.to_string()),
        }
    }

    /// Sort rank (lower is placed earlier).
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium | Priority::Unspecified(_) => 1,
            Priority::Low => 2,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
            Priority::Unspecified(raw) => raw,
        }
    }
}

impl ValueObject for Priority {}

impl From<String> for Priority {
    fn from(value: String) -> Self {
        Priority::parse(&value)
    }
}

impl From<Priority> for String {
    fn from(value: Priority) -> Self {
        match value {
            Priority::Unspecified(raw) => raw,
            known => known.label().to_string(),
        }
    }
}

impl core::fmt::Display for Priority {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// A warehouse product record.
///
/// Only `Weight`, `Priority` and `Fragile` carry meaning for storage rules. Every
/// other field of the source record (name, dimensions, destination, dispatch date,
/// ...) is kept in `attributes` and written back unchanged.
///
/// Rule fields read from a record keep their source value as well, so a product
/// serializes back to exactly what it was parsed from. Builder setters replace the
/// source value with the typed one.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    weight: Weight,
    priority: Option<Priority>,
    fragile: Option<bool>,
    attributes: Map<String, JsonValue>,
    source: Map<String, JsonValue>,
}

impl Product {
    pub fn new(weight: Weight) -> Self {
        Self {
            weight,
            priority: None,
            fragile: None,
            attributes: Map::new(),
            source: Map::new(),
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self.source.remove(PRIORITY_FIELD);
        self
    }

    pub fn with_fragile(mut self, fragile: bool) -> Self {
        self.fragile = Some(fragile);
        self.source.remove(FRAGILE_FIELD);
        self
    }

    /// Attach an opaque attribute. Keys naming a rule field are ignored.
    pub fn with_attribute(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        let key = key.into();
        if !is_rule_field(&key) {
            self.attributes.insert(key, value);
        }
        self
    }

    pub fn weight(&self) -> Weight {
        self.weight
    }

    pub fn priority(&self) -> Option<&Priority> {
        self.priority.as_ref()
    }

    /// Priority rank; a missing priority ranks like `Medium`.
    pub fn priority_rank(&self) -> u8 {
        self.priority.as_ref().map_or(1, Priority::rank)
    }

    /// Raw fragility flag as recorded (`None` when the record had none).
    pub fn fragile(&self) -> Option<bool> {
        self.fragile
    }

    pub fn is_fragile(&self) -> bool {
        self.fragile.unwrap_or(false)
    }

    pub fn attributes(&self) -> &Map<String, JsonValue> {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&JsonValue> {
        self.attributes.get(key)
    }

    /// Interpret a loosely-typed record.
    ///
    /// `index` is the record's position in the caller's input and is reported in
    /// `DomainError::InvalidRecord`.
    pub fn from_record(index: usize, record: &JsonValue) -> DomainResult<Self> {
        let fields = record.as_object().ok_or_else(|| {
            DomainError::invalid_record(index, format!("expected an object, got {}", kind(record)))
        })?;

        let weight = parse_weight(index, fields.get(WEIGHT_FIELD))?;
        let priority = parse_priority(fields.get(PRIORITY_FIELD));
        let fragile = parse_fragile(index, fields.get(FRAGILE_FIELD))?;

        let (source, attributes): (Map<String, JsonValue>, Map<String, JsonValue>) = fields
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .partition(|(k, _)| is_rule_field(k));

        Ok(Self {
            weight,
            priority,
            fragile,
            attributes,
            source,
        })
    }

    /// Cubic volume from the `Length`, `Width` and `Height` attributes.
    ///
    /// `None` unless all three are present and numeric (numbers or numeric text).
    pub fn volume(&self) -> Option<f64> {
        let dimension = |key: &str| match self.attributes.get(key)? {
            JsonValue::Number(n) => n.as_f64(),
            JsonValue::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        let volume = dimension(LENGTH_FIELD)? * dimension(WIDTH_FIELD)? * dimension(HEIGHT_FIELD)?;
        volume.is_finite().then_some(volume)
    }
}

impl Serialize for Product {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;

        match self.source.get(WEIGHT_FIELD) {
            Some(raw) => map.serialize_entry(WEIGHT_FIELD, raw)?,
            None => map.serialize_entry(WEIGHT_FIELD, &self.weight)?,
        }
        match (self.source.get(PRIORITY_FIELD), &self.priority) {
            (Some(raw), _) => map.serialize_entry(PRIORITY_FIELD, raw)?,
            (None, Some(priority)) => map.serialize_entry(PRIORITY_FIELD, priority)?,
            (None, None) => {}
        }
        match (self.source.get(FRAGILE_FIELD), self.fragile) {
            (Some(raw), _) => map.serialize_entry(FRAGILE_FIELD, raw)?,
            (None, Some(fragile)) => map.serialize_entry(FRAGILE_FIELD, &fragile)?,
            (None, None) => {}
        }
        for (key, value) in &self.attributes {
            map.serialize_entry(key, value)?;
        }

        map.end()
    }
}

/// Interpret a batch of records, failing on the first invalid one.
pub fn parse_records(records: &[JsonValue]) -> DomainResult<Vec<Product>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| Product::from_record(index, record))
        .collect()
}

fn is_rule_field(key: &str) -> bool {
    matches!(key, WEIGHT_FIELD | PRIORITY_FIELD | FRAGILE_FIELD)
}

fn parse_weight(index: usize, value: Option<&JsonValue>) -> DomainResult<Weight> {
    let raw = match value {
        None | Some(JsonValue::Null) => {
            return Err(DomainError::invalid_record(
                index,
                format!("missing field `{WEIGHT_FIELD}`"),
            ));
        }
        Some(JsonValue::Number(n)) => n.as_f64().ok_or_else(|| {
            DomainError::invalid_record(index, format!("`{WEIGHT_FIELD}` is not representable: {n}"))
        })?,
        // CSV imports frequently deliver numbers as text.
        Some(JsonValue::String(s)) => s.trim().parse::<f64>().map_err(|_| {
            DomainError::invalid_record(index, format!("`{WEIGHT_FIELD}` is not numeric: {s:?}"))
        })?,
        Some(other) => {
            return Err(DomainError::invalid_record(
                index,
                format!("`{WEIGHT_FIELD}` must be numeric, got {}", kind(other)),
            ));
        }
    };

    Weight::new(raw).map_err(|e| match e {
        DomainError::Validation(msg) => DomainError::invalid_record(index, msg),
        other => other,
    })
}

fn parse_priority(value: Option<&JsonValue>) -> Option<Priority> {
    match value {
        None | Some(JsonValue::Null) => None,
        Some(JsonValue::String(s)) => Some(Priority::parse(s)),
        Some(other) => Some(Priority::Unspecified(other.to_string())),
    }
}

fn parse_fragile(index: usize, value: Option<&JsonValue>) -> DomainResult<Option<bool>> {
    match value {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Bool(b)) => Ok(Some(*b)),
        Some(JsonValue::String(s)) => Ok(Some(is_truthy_flag(s))),
        Some(JsonValue::Number(n)) => Ok(Some(is_truthy_flag(&n.to_string()))),
        Some(other) => Err(DomainError::invalid_record(
            index,
            format!("`{FRAGILE_FIELD}` must be a flag, got {}", kind(other)),
        )),
    }
}

/// Spreadsheet-style yes/no flag.
pub fn is_truthy_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "yes" | "y" | "true" | "1"
    )
}

fn kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_priority_ranks_like_medium() {
        assert_eq!(Priority::parse("Urgent").rank(), Priority::Medium.rank());
        assert_eq!(Product::new(Weight::ZERO).priority_rank(), 1);
    }

    #[test]
    fn priority_ranks_are_ordered() {
        assert!(Priority::High.rank() < Priority::Medium.rank());
        assert!(Priority::Medium.rank() < Priority::Low.rank());
    }

    #[test]
    fn priority_parse_trims_but_matches_case_exactly() {
        assert_eq!(Priority::parse(" High "), Priority::High);
        assert_eq!(Priority::parse("high"), Priority::Unspecified("high".to_string()));
    }

    #[test]
    fn unspecified_priority_serializes_verbatim() {
        let p = Priority::parse("Rush");
        assert_eq!(serde_json::to_value(&p).unwrap(), json!("Rush"));
    }

    #[test]
    fn from_record_extracts_rule_fields_and_keeps_the_rest() {
        let record = json!({
            "Product": "Glass Vase",
            "Weight": 12.5,
            "Priority": "High",
            "Fragile": true,
            "Destination": "ZoneA",
        });

        let product = Product::from_record(0, &record).unwrap();
        assert_eq!(product.weight().value(), 12.5);
        assert_eq!(product.priority(), Some(&Priority::High));
        assert!(product.is_fragile());
        assert_eq!(product.attribute("Product"), Some(&json!("Glass Vase")));
        assert_eq!(product.attribute("Destination"), Some(&json!("ZoneA")));
        assert!(product.attribute("Weight").is_none());
    }

    #[test]
    fn from_record_rejects_missing_weight() {
        let err = Product::from_record(4, &json!({ "Product": "Crate" })).unwrap_err();
        match err {
            DomainError::InvalidRecord { index, reason } => {
                assert_eq!(index, 4);
                assert!(reason.contains("Weight"));
            }
            _ => panic!("Expected InvalidRecord error for missing weight"),
        }
    }

    #[test]
    fn from_record_rejects_null_weight() {
        let err = Product::from_record(0, &json!({ "Weight": null })).unwrap_err();
        assert_eq!(err.record_index(), Some(0));
    }

    #[test]
    fn from_record_rejects_negative_weight() {
        let err = Product::from_record(2, &json!({ "Weight": -3 })).unwrap_err();
        assert!(matches!(err, DomainError::InvalidRecord { index: 2, .. }));
    }

    #[test]
    fn from_record_accepts_numeric_text_weight() {
        let product = Product::from_record(0, &json!({ "Weight": " 40.0 " })).unwrap();
        assert_eq!(product.weight().value(), 40.0);
    }

    #[test]
    fn from_record_rejects_non_numeric_text_weight() {
        let err = Product::from_record(1, &json!({ "Weight": "heavy" })).unwrap_err();
        assert!(matches!(err, DomainError::InvalidRecord { index: 1, .. }));
    }

    #[test]
    fn from_record_rejects_non_object() {
        let err = Product::from_record(7, &json!([1, 2])).unwrap_err();
        assert!(matches!(err, DomainError::InvalidRecord { index: 7, .. }));
    }

    #[test]
    fn fragile_defaults_to_false_when_absent() {
        let product = Product::from_record(0, &json!({ "Weight": 1 })).unwrap();
        assert_eq!(product.fragile(), None);
        assert!(!product.is_fragile());
    }

    #[test]
    fn fragile_accepts_spreadsheet_flags() {
        for (raw, expected) in [("Yes", true), ("y", true), ("TRUE", true), ("1", true), ("No", false), ("", false)] {
            let product = Product::from_record(0, &json!({ "Weight": 1, "Fragile": raw })).unwrap();
            assert_eq!(product.is_fragile(), expected, "flag {raw:?}");
        }
        let numeric = Product::from_record(0, &json!({ "Weight": 1, "Fragile": 1 })).unwrap();
        assert!(numeric.is_fragile());
    }

    #[test]
    fn fragile_rejects_structured_values() {
        let err = Product::from_record(3, &json!({ "Weight": 1, "Fragile": {} })).unwrap_err();
        assert!(matches!(err, DomainError::InvalidRecord { index: 3, .. }));
    }

    #[test]
    fn non_string_priority_is_unspecified() {
        let product = Product::from_record(0, &json!({ "Weight": 1, "Priority": 5 })).unwrap();
        assert_eq!(product.priority_rank(), 1);
        assert!(matches!(product.priority(), Some(Priority::Unspecified(_))));
    }

    #[test]
    fn parse_records_reports_first_bad_position() {
        let records = vec![json!({ "Weight": 1 }), json!({ "Weight": 2 }), json!({ "Name": "x" })];
        let err = parse_records(&records).unwrap_err();
        assert_eq!(err.record_index(), Some(2));
    }

    #[test]
    fn serializes_back_to_record_shape() {
        let record = json!({ "Product": "Box", "Weight": 3.0, "Priority": "Low", "Fragile": false });
        let product = Product::from_record(0, &record).unwrap();
        assert_eq!(serde_json::to_value(&product).unwrap(), record);
    }

    #[test]
    fn serialization_keeps_source_spelling_of_rule_fields() {
        let record = json!({
            "Product": "Mirror",
            "Weight": 3,
            "Priority": " High ",
            "Fragile": "Yes",
        });
        let product = Product::from_record(0, &record).unwrap();

        assert_eq!(product.priority(), Some(&Priority::High));
        assert!(product.is_fragile());
        assert_eq!(serde_json::to_value(&product).unwrap(), record);
    }

    #[test]
    fn serialization_keeps_non_string_priority_and_null_fields() {
        let record = json!({ "Weight": "12", "Priority": 5, "Fragile": null });
        let product = Product::from_record(0, &record).unwrap();
        assert_eq!(serde_json::to_value(&product).unwrap(), record);
    }

    #[test]
    fn setters_replace_source_values() {
        let record = json!({ "Weight": 1, "Priority": "Low", "Fragile": "no" });
        let product = Product::from_record(0, &record)
            .unwrap()
            .with_priority(Priority::High)
            .with_fragile(true);

        assert_eq!(
            serde_json::to_value(&product).unwrap(),
            json!({ "Weight": 1, "Priority": "High", "Fragile": true })
        );
    }

    #[test]
    fn typed_products_serialize_canonically() {
        let product = Product::new(Weight::new(3.0).unwrap()).with_priority(Priority::Low);
        assert_eq!(
            serde_json::to_value(&product).unwrap(),
            json!({ "Weight": 3.0, "Priority": "Low" })
        );
    }

    #[test]
    fn volume_multiplies_dimensions() {
        let product = Product::from_record(
            0,
            &json!({ "Weight": 1, "Length": 2.0, "Width": "3", "Height": 4 }),
        )
        .unwrap();
        assert_eq!(product.volume(), Some(24.0));
    }

    #[test]
    fn volume_requires_all_dimensions() {
        let product =
            Product::from_record(0, &json!({ "Weight": 1, "Length": 2.0, "Width": 3.0 })).unwrap();
        assert_eq!(product.volume(), None);
    }

    #[test]
    fn with_attribute_ignores_rule_fields() {
        let product = Product::new(Weight::new(2.0).unwrap())
            .with_attribute("Weight", json!(99))
            .with_attribute("Product", json!("Tile"));
        assert_eq!(product.weight().value(), 2.0);
        assert_eq!(product.attributes().len(), 1);
    }
}
