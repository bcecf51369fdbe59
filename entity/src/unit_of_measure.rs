use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "units_of_measure")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub short_name: String,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::stage_option::Entity")]
    StageOption,
}

impl Related<super::stage_option::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StageOption.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
