//! Order desk vertical slice.
//!
//! Projects own orders, orders are split into stages, and stages carry priced
//! options. The two business rules every option write goes through live in
//! [`pricing`] and [`units`]; [`service`] applies them around persistence and
//! [`schema`] exposes everything over GraphQL.

pub mod draft;
pub mod error;
pub mod pricing;
pub mod schema;
pub mod seed;
pub mod service;
pub mod units;

pub use draft::{OptionDraft, OptionPatch};
pub use error::RuleError;
pub use pricing::{PriceRange, PricingType, compute_option_prices};
pub use schema::{MutationRoot, QueryRoot};
pub use units::{UnitDirectory, UnitLookup, UnitRef, sync_unit_fields};
