use serde_json::{Map, Value as JsonValue};

use stowage_core::{DomainError, DomainResult, Weight};

pub const MAX_STORAGE_WEIGHT_KEY: &str = "max_storage_weight";
pub const PRIORITY_FIRST_KEY: &str = "priority_first";
pub const FRAGILE_ON_TOP_KEY: &str = "fragile_on_top";
pub const STORAGE_LENGTH_KEY: &str = "storage_length";
pub const STORAGE_WIDTH_KEY: &str = "storage_width";
pub const STORAGE_HEIGHT_KEY: &str = "storage_height";

/// Storage constraints applied by the rule pass.
///
/// Defaults:
/// - `max_storage_weight`: unbounded
/// - `priority_first`: `false`
/// - `fragile_on_top`: `false`
/// - storage dimensions: unknown (volume utilization is not reported)
///
/// Dimensions never affect admission or ordering.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StorageConstraints {
    max_storage_weight: Option<Weight>,
    priority_first: bool,
    fragile_on_top: bool,
    storage_volume: Option<f64>,
}

impl StorageConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the cumulative weight of admitted products.
    ///
    /// Positive infinity is accepted and means "no cap".
    pub fn with_max_storage_weight(mut self, max: f64) -> DomainResult<Self> {
        self.max_storage_weight = cap_from_f64(max)?;
        Ok(self)
    }

    pub fn with_priority_first(mut self, enabled: bool) -> Self {
        self.priority_first = enabled;
        self
    }

    pub fn with_fragile_on_top(mut self, enabled: bool) -> Self {
        self.fragile_on_top = enabled;
        self
    }

    /// Record the storage area's length, width and height.
    pub fn with_storage_dimensions(mut self, length: f64, width: f64, height: f64) -> DomainResult<Self> {
        for (key, value) in [
            (STORAGE_LENGTH_KEY, length),
            (STORAGE_WIDTH_KEY, width),
            (STORAGE_HEIGHT_KEY, height),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(DomainError::configuration(format!(
                    "{key} must be a finite non-negative number, got {value}"
                )));
            }
        }
        self.storage_volume = Some(length * width * height);
        Ok(self)
    }

    /// Storage area volume, when all three dimensions were given.
    pub fn storage_volume(&self) -> Option<f64> {
        self.storage_volume
    }

    /// `None` means no cap.
    pub fn max_storage_weight(&self) -> Option<Weight> {
        self.max_storage_weight
    }

    pub fn priority_first(&self) -> bool {
        self.priority_first
    }

    pub fn fragile_on_top(&self) -> bool {
        self.fragile_on_top
    }

    /// Whether `candidate` still fits on top of `total` under the cap (inclusive).
    ///
    /// Compared unsaturated: a sum past `f64::MAX` never fits a finite cap.
    pub fn admits(&self, total: Weight, candidate: Weight) -> bool {
        match self.max_storage_weight {
            None => true,
            Some(max) => total.value() + candidate.value() <= max.value(),
        }
    }

    /// Read constraints from a loosely-typed mapping.
    ///
    /// Absent or `null` options take their defaults. Storage dimensions only yield
    /// a volume when all three are given. Other keys are ignored.
    pub fn from_json(value: &JsonValue) -> DomainResult<Self> {
        let options = value.as_object().ok_or_else(|| {
            DomainError::configuration("constraints must be a mapping of option names to values")
        })?;

        let mut constraints = Self::new();

        match options.get(MAX_STORAGE_WEIGHT_KEY) {
            None | Some(JsonValue::Null) => {}
            Some(JsonValue::Number(n)) => {
                let max = n.as_f64().ok_or_else(|| {
                    DomainError::configuration(format!("{MAX_STORAGE_WEIGHT_KEY} is not representable: {n}"))
                })?;
                constraints = constraints.with_max_storage_weight(max)?;
            }
            Some(other) => {
                return Err(DomainError::configuration(format!(
                    "{MAX_STORAGE_WEIGHT_KEY} must be a non-negative number, got {other}"
                )));
            }
        }

        if let Some(enabled) = flag(options.get(PRIORITY_FIRST_KEY), PRIORITY_FIRST_KEY)? {
            constraints = constraints.with_priority_first(enabled);
        }
        if let Some(enabled) = flag(options.get(FRAGILE_ON_TOP_KEY), FRAGILE_ON_TOP_KEY)? {
            constraints = constraints.with_fragile_on_top(enabled);
        }

        let length = dimension(options, STORAGE_LENGTH_KEY)?;
        let width = dimension(options, STORAGE_WIDTH_KEY)?;
        let height = dimension(options, STORAGE_HEIGHT_KEY)?;
        if let (Some(length), Some(width), Some(height)) = (length, width, height) {
            constraints = constraints.with_storage_dimensions(length, width, height)?;
        }

        Ok(constraints)
    }
}

fn cap_from_f64(max: f64) -> DomainResult<Option<Weight>> {
    if max.is_nan() || max < 0.0 {
        return Err(DomainError::configuration(format!(
            "{MAX_STORAGE_WEIGHT_KEY} must be a non-negative number, got {max}"
        )));
    }
    if max == f64::INFINITY {
        return Ok(None);
    }
    Weight::new(max)
        .map(Some)
        .map_err(|e| DomainError::configuration(e.to_string()))
}

fn dimension(options: &Map<String, JsonValue>, key: &str) -> DomainResult<Option<f64>> {
    match options.get(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Number(n)) => match n.as_f64() {
            Some(v) if v.is_finite() && v >= 0.0 => Ok(Some(v)),
            _ => Err(DomainError::configuration(format!(
                "{key} must be a finite non-negative number, got {n}"
            ))),
        },
        Some(other) => Err(DomainError::configuration(format!(
            "{key} must be a non-negative number, got {other}"
        ))),
    }
}

fn flag(value: Option<&JsonValue>, key: &str) -> DomainResult<Option<bool>> {
    match value {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(DomainError::configuration(format!(
            "{key} must be a boolean, got {other}"
        ))),
    }
}
