use sea_orm::entity::prelude::*;

/// Priced line item inside an order stage.
///
/// `calculated_price_min` / `calculated_price_max` are derived columns; they
/// are written by the order services only.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "stage_options")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed)]
    pub stage_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub pricing_type_id: PricingType,
    pub volume_min: Option<f64>,
    pub volume_max: Option<f64>,
    pub nominal_volume: Option<f64>,
    pub price_per_unit: Option<f64>,
    #[sea_orm(indexed)]
    pub unit_id: Option<i32>,
    /// Deprecated free-text unit, mirrored from `unit_id` for older readers.
    pub unit_label: Option<String>,
    pub calculated_price_min: Option<f64>,
    pub calculated_price_max: Option<f64>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::order_stage::Entity",
        from = "Column::StageId",
        to = "super::order_stage::Column::Id",
        on_delete = "Cascade"
    )]
    Stage,
    #[sea_orm(
        belongs_to = "super::unit_of_measure::Entity",
        from = "Column::UnitId",
        to = "super::unit_of_measure::Column::Id",
        on_delete = "SetNull"
    )]
    Unit,
    #[sea_orm(
        belongs_to = "super::pricing_type::Entity",
        from = "Column::PricingTypeId",
        to = "super::pricing_type::Column::Id"
    )]
    PricingType,
}

impl Related<super::order_stage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Stage.def()
    }
}

impl Related<super::unit_of_measure::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Unit.def()
    }
}

impl Related<super::pricing_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PricingType.def()
    }
}

/// Mirrors the rows of the `pricing_types` lookup table.
#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Hash)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
pub enum PricingType {
    #[sea_orm(num_value = 1)]
    Calculable,
    #[sea_orm(num_value = 2)]
    IncludedInPrice,
}

impl ActiveModelBehavior for ActiveModel {}
