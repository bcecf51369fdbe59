pub mod order;
pub mod order_stage;
pub mod pricing_type;
pub mod project;
pub mod stage_option;
pub mod unit_of_measure;
