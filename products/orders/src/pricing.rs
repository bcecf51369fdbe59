//! Option pricing rule.
//!
//! `calculated_price = volume / nominal_volume * price_per_unit`, evaluated for
//! both ends of an option's volume range. Only calculable options carry a
//! price; everything else is included in the stage price.

use async_graphql::Enum;
use entity::stage_option;
use serde::{Deserialize, Serialize};

use crate::draft::OptionDraft;

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum PricingType {
    #[graphql(name = "CALCULABLE")]
    Calculable,
    #[graphql(name = "INCLUDED_IN_PRICE")]
    IncludedInPrice,
}

impl PricingType {
    /// Identifier of the matching `pricing_types` row.
    pub fn id(self) -> i32 {
        match self {
            PricingType::Calculable => 1,
            PricingType::IncludedInPrice => 2,
        }
    }
}

impl From<stage_option::PricingType> for PricingType {
    fn from(value: stage_option::PricingType) -> Self {
        match value {
            stage_option::PricingType::Calculable => PricingType::Calculable,
            stage_option::PricingType::IncludedInPrice => PricingType::IncludedInPrice,
        }
    }
}

impl From<PricingType> for stage_option::PricingType {
    fn from(value: PricingType) -> Self {
        match value {
            PricingType::Calculable => stage_option::PricingType::Calculable,
            PricingType::IncludedInPrice => stage_option::PricingType::IncludedInPrice,
        }
    }
}

/// Derived price bounds of a single option.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PriceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

pub fn compute_option_prices(option: &OptionDraft) -> PriceRange {
    match option.pricing_type {
        PricingType::IncludedInPrice => PriceRange::default(),
        PricingType::Calculable => match (option.nominal_volume, option.price_per_unit) {
            (Some(nominal), Some(price)) if nominal > 0.0 => PriceRange {
                min: option.volume_min.map(|volume| volume / nominal * price),
                max: option.volume_max.map(|volume| volume / nominal * price),
            },
            _ => PriceRange::default(),
        },
    }
}

/// Aggregate over the options of one stage.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PriceTotals {
    pub option_count: usize,
    pub calculable_count: usize,
    pub included_count: usize,
    pub total_min: f64,
    pub total_max: f64,
}

impl PriceTotals {
    pub fn add(&mut self, option: &stage_option::Model) {
        self.option_count += 1;
        match PricingType::from(option.pricing_type_id) {
            PricingType::Calculable => self.calculable_count += 1,
            PricingType::IncludedInPrice => self.included_count += 1,
        }
        self.total_min += option.calculated_price_min.unwrap_or(0.0);
        self.total_max += option.calculated_price_max.unwrap_or(0.0);
    }

    pub fn merge(&mut self, other: &PriceTotals) {
        self.option_count += other.option_count;
        self.calculable_count += other.calculable_count;
        self.included_count += other.included_count;
        self.total_min += other.total_min;
        self.total_max += other.total_max;
    }
}

pub fn summarize<'a>(options: impl IntoIterator<Item = &'a stage_option::Model>) -> PriceTotals {
    let mut totals = PriceTotals::default();
    for option in options {
        totals.add(option);
    }
    totals
}
