use entity::stage_option;

use crate::error::{RuleError, check_length};
use crate::pricing::{PricingType, compute_option_prices};

pub const NAME_MAX: usize = 256;
pub const DESCRIPTION_MAX: usize = 10_000;
pub const UNIT_LABEL_MAX: usize = 64;

/// Writable shape of a stage option, as it looks right before it is
/// persisted. Derived prices are deliberately absent.
#[derive(Clone, Debug, PartialEq)]
pub struct OptionDraft {
    pub name: String,
    pub description: Option<String>,
    pub pricing_type: PricingType,
    pub volume_min: Option<f64>,
    pub volume_max: Option<f64>,
    pub nominal_volume: Option<f64>,
    pub price_per_unit: Option<f64>,
    pub unit_id: Option<i32>,
    pub unit_label: Option<String>,
}

impl OptionDraft {
    /// An included-in-price option with nothing but a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            pricing_type: PricingType::IncludedInPrice,
            volume_min: None,
            volume_max: None,
            nominal_volume: None,
            price_per_unit: None,
            unit_id: None,
            unit_label: None,
        }
    }

    pub fn from_model(model: &stage_option::Model) -> Self {
        Self {
            name: model.name.clone(),
            description: model.description.clone(),
            pricing_type: model.pricing_type_id.into(),
            volume_min: model.volume_min,
            volume_max: model.volume_max,
            nominal_volume: model.nominal_volume,
            price_per_unit: model.price_per_unit,
            unit_id: model.unit_id,
            unit_label: model.unit_label.clone(),
        }
    }

    /// Trims text fields; blank optional text becomes `None`.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.description = self.description.filter(|text| !text.trim().is_empty());
        self.unit_label = self
            .unit_label
            .map(|label| label.trim().to_string())
            .filter(|label| !label.is_empty());
        self
    }

    pub fn validate(&self) -> Result<(), RuleError> {
        if self.name.trim().is_empty() {
            return Err(RuleError::Required("name"));
        }
        check_length("name", self.name.trim(), NAME_MAX)?;
        if let Some(description) = &self.description {
            check_length("description", description, DESCRIPTION_MAX)?;
        }
        if let Some(label) = &self.unit_label {
            check_length("unitLabel", label.trim(), UNIT_LABEL_MAX)?;
        }

        match self.pricing_type {
            PricingType::Calculable => {
                let nominal = self.nominal_volume.ok_or(RuleError::MissingNominalVolume)?;
                if self.price_per_unit.is_none() {
                    return Err(RuleError::MissingPricePerUnit);
                }
                if nominal <= 0.0 {
                    return Err(RuleError::NonPositiveNominalVolume);
                }
            }
            PricingType::IncludedInPrice => {}
        }

        for (field, value) in [
            ("volumeMin", self.volume_min),
            ("volumeMax", self.volume_max),
            ("nominalVolume", self.nominal_volume),
            ("pricePerUnit", self.price_per_unit),
        ] {
            if value.is_some_and(|v| !v.is_finite()) {
                return Err(RuleError::OutOfRange(field));
            }
            if value.is_some_and(|v| v < 0.0) {
                return Err(RuleError::Negative(field));
            }
        }

        if let (Some(min), Some(max)) = (self.volume_min, self.volume_max) {
            if min > max {
                return Err(RuleError::InvertedVolumeRange);
            }
        }

        // Finite inputs can still overflow once scaled.
        let prices = compute_option_prices(self);
        for (field, value) in [
            ("calculatedPriceMin", prices.min),
            ("calculatedPriceMax", prices.max),
        ] {
            if value.is_some_and(|v| !v.is_finite()) {
                return Err(RuleError::OutOfRange(field));
            }
        }
        Ok(())
    }
}

/// Partial update of an option. The outer `Option` means "field was sent";
/// for nullable columns the inner `Option` carries an explicit clear.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OptionPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub pricing_type: Option<PricingType>,
    pub volume_min: Option<Option<f64>>,
    pub volume_max: Option<Option<f64>>,
    pub nominal_volume: Option<Option<f64>>,
    pub price_per_unit: Option<Option<f64>>,
    pub unit_id: Option<Option<i32>>,
    pub unit_label: Option<Option<String>>,
}

impl OptionPatch {
    pub fn apply(self, mut draft: OptionDraft) -> OptionDraft {
        if let Some(name) = self.name {
            draft.name = name;
        }
        if let Some(description) = self.description {
            draft.description = description;
        }
        if let Some(pricing_type) = self.pricing_type {
            draft.pricing_type = pricing_type;
        }
        if let Some(value) = self.volume_min {
            draft.volume_min = value;
        }
        if let Some(value) = self.volume_max {
            draft.volume_max = value;
        }
        if let Some(value) = self.nominal_volume {
            draft.nominal_volume = value;
        }
        if let Some(value) = self.price_per_unit {
            draft.price_per_unit = value;
        }
        // Changing one side of the unit pair invalidates the stored mirror of
        // the other, so it is cleared and re-derived by the unit sync.
        match (self.unit_id, self.unit_label) {
            (Some(unit_id), None) => {
                draft.unit_id = unit_id;
                draft.unit_label = None;
            }
            (None, Some(unit_label)) => {
                draft.unit_label = unit_label;
                draft.unit_id = None;
            }
            (Some(unit_id), Some(unit_label)) => {
                draft.unit_id = unit_id;
                draft.unit_label = unit_label;
            }
            (None, None) => {}
        }
        draft
    }
}
