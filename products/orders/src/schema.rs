use std::sync::Arc;

use async_graphql::{
    Context, Enum, ErrorExtensions, InputObject, MaybeUndefined, Object, SimpleObject, ID,
};
use chrono::{DateTime, NaiveDate, Utc};
use entity::{order, order_stage, pricing_type, project, stage_option, unit_of_measure};
use platform_api::{ApiError, internal_error, to_graphql};
use sea_orm::DatabaseConnection;
use tracing::{Instrument, info_span};
use uuid::Uuid;

use crate::draft::{OptionDraft, OptionPatch};
use crate::pricing::{PriceTotals, PricingType};
use crate::service::{
    self, NewOrder, NewProject, NewStage, OrderPatch, ProjectPatch, StagePatch, StageTotals,
};

#[derive(Default)]
pub struct QueryRoot;

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl QueryRoot {
    async fn desk(&self) -> DeskQuery {
        DeskQuery
    }
}

#[Object]
impl MutationRoot {
    async fn desk(&self) -> DeskMutation {
        DeskMutation
    }
}

#[derive(Default)]
pub struct DeskQuery;

#[derive(Default)]
pub struct DeskMutation;

#[Object]
impl DeskQuery {
    async fn projects(
        &self,
        ctx: &Context<'_>,
        first: Option<i32>,
        offset: Option<i32>,
        q: Option<String>,
    ) -> async_graphql::Result<Vec<ProjectNode>> {
        let db = database(ctx)?;
        let (limit, skip) = service::page_window(first, offset).map_err(to_graphql)?;
        let span = info_span!(
            "desk.projects.list",
            has_q = q.as_deref().is_some_and(|q| !q.trim().is_empty()),
            first = limit
        );
        let rows = service::list_projects(db.as_ref(), q.as_deref(), limit, skip)
            .instrument(span)
            .await
            .map_err(to_graphql)?;
        Ok(rows.into_iter().map(ProjectNode::from).collect())
    }

    async fn project(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<Option<ProjectNode>> {
        let db = database(ctx)?;
        let project_id = parse_uuid(&id)?;
        let record = service::find_project(db.as_ref(), project_id)
            .await
            .map_err(to_graphql)?;
        Ok(record.map(ProjectNode::from))
    }

    async fn orders(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "projectId")] project_id: Option<ID>,
        status: Option<OrderStatus>,
        first: Option<i32>,
        offset: Option<i32>,
    ) -> async_graphql::Result<Vec<OrderNode>> {
        let db = database(ctx)?;
        let (limit, skip) = service::page_window(first, offset).map_err(to_graphql)?;
        let project_id = project_id.as_ref().map(parse_uuid).transpose()?;
        let span = info_span!(
            "desk.orders.list",
            has_project = project_id.is_some(),
            status = status.map(|s| s.as_str()).unwrap_or(""),
            first = limit
        );
        let rows = service::list_orders(
            db.as_ref(),
            project_id,
            status.map(order::Status::from),
            limit,
            skip,
        )
        .instrument(span)
        .await
        .map_err(to_graphql)?;
        Ok(rows.into_iter().map(OrderNode::from).collect())
    }

    async fn order(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<Option<OrderNode>> {
        let db = database(ctx)?;
        let order_id = parse_uuid(&id)?;
        let record = service::find_order(db.as_ref(), order_id)
            .await
            .map_err(to_graphql)?;
        Ok(record.map(OrderNode::from))
    }

    async fn stages(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "orderId")] order_id: ID,
    ) -> async_graphql::Result<Vec<StageNode>> {
        let db = database(ctx)?;
        let order_id = parse_uuid(&order_id)?;
        let rows = service::list_stages(db.as_ref(), order_id)
            .await
            .map_err(to_graphql)?;
        Ok(rows.into_iter().map(StageNode::from).collect())
    }

    async fn stage(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<Option<StageNode>> {
        let db = database(ctx)?;
        let stage_id = parse_uuid(&id)?;
        let record = service::find_stage(db.as_ref(), stage_id)
            .await
            .map_err(to_graphql)?;
        Ok(record.map(StageNode::from))
    }

    #[graphql(name = "stageOptions")]
    async fn stage_options(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "stageId")] stage_id: ID,
    ) -> async_graphql::Result<Vec<StageOptionNode>> {
        let db = database(ctx)?;
        let stage_id = parse_uuid(&stage_id)?;
        let rows = service::list_options(db.as_ref(), stage_id)
            .await
            .map_err(to_graphql)?;
        Ok(rows.into_iter().map(StageOptionNode::from).collect())
    }

    #[graphql(name = "stageOption")]
    async fn stage_option(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> async_graphql::Result<Option<StageOptionNode>> {
        let db = database(ctx)?;
        let option_id = parse_uuid(&id)?;
        let record = service::find_option(db.as_ref(), option_id)
            .await
            .map_err(to_graphql)?;
        Ok(record.map(StageOptionNode::from))
    }

    async fn units(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<UnitNode>> {
        let db = database(ctx)?;
        let rows = service::list_units(db.as_ref()).await.map_err(to_graphql)?;
        Ok(rows.into_iter().map(UnitNode::from).collect())
    }

    #[graphql(name = "pricingTypes")]
    async fn pricing_types(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<PricingTypeNode>> {
        let db = database(ctx)?;
        let rows = service::list_pricing_types(db.as_ref())
            .await
            .map_err(to_graphql)?;
        Ok(rows.into_iter().map(PricingTypeNode::from).collect())
    }

    #[graphql(name = "stagePriceSummary")]
    async fn stage_price_summary(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "stageId")] stage_id: ID,
    ) -> async_graphql::Result<StagePriceSummary> {
        let db = database(ctx)?;
        let stage_id = parse_uuid(&stage_id)?;
        let span = info_span!("desk.summary.stage", stage_id = %stage_id);
        let totals = service::stage_totals(db.as_ref(), stage_id)
            .instrument(span)
            .await
            .map_err(to_graphql)?;
        Ok(totals.into())
    }

    #[graphql(name = "orderPriceSummary")]
    async fn order_price_summary(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "orderId")] order_id: ID,
    ) -> async_graphql::Result<OrderPriceSummary> {
        let db = database(ctx)?;
        let order_uuid = parse_uuid(&order_id)?;
        let span = info_span!("desk.summary.order", order_id = %order_uuid);
        let (stages, overall) = service::order_totals(db.as_ref(), order_uuid)
            .instrument(span)
            .await
            .map_err(to_graphql)?;
        Ok(OrderPriceSummary::new(order_uuid, stages, overall))
    }

    /// Validates an option and prices it without storing anything.
    #[graphql(name = "optionPricePreview")]
    async fn option_price_preview(&self, input: OptionPriceInput) -> async_graphql::Result<PricePreview> {
        let range = service::preview_prices(input.into()).map_err(to_graphql)?;
        Ok(PricePreview {
            calculated_price_min: range.min,
            calculated_price_max: range.max,
        })
    }
}

#[Object]
impl DeskMutation {
    #[graphql(name = "createProject")]
    async fn create_project(
        &self,
        ctx: &Context<'_>,
        input: NewProjectInput,
    ) -> async_graphql::Result<ProjectNode> {
        let db = database(ctx)?;
        let record = service::create_project(
            db.as_ref(),
            NewProject {
                name: input.name,
                description: input.description,
            },
        )
        .await
        .map_err(to_graphql)?;
        Ok(record.into())
    }

    #[graphql(name = "updateProject")]
    async fn update_project(
        &self,
        ctx: &Context<'_>,
        input: UpdateProjectInput,
    ) -> async_graphql::Result<ProjectNode> {
        let db = database(ctx)?;
        let project_id = parse_uuid(&input.id)?;
        let patch = ProjectPatch {
            name: input.name,
            description: patch_value(input.description),
        };
        let record = service::update_project(db.as_ref(), project_id, patch)
            .await
            .map_err(to_graphql)?;
        Ok(record.into())
    }

    #[graphql(name = "deleteProject")]
    async fn delete_project(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<bool> {
        let db = database(ctx)?;
        let project_id = parse_uuid(&id)?;
        service::delete_project(db.as_ref(), project_id)
            .await
            .map_err(to_graphql)
    }

    #[graphql(name = "createOrder")]
    async fn create_order(
        &self,
        ctx: &Context<'_>,
        input: NewOrderInput,
    ) -> async_graphql::Result<OrderNode> {
        let db = database(ctx)?;
        let project_id = parse_uuid(&input.project_id)?;
        let record = service::create_order(
            db.as_ref(),
            NewOrder {
                project_id,
                title: input.title,
                client_name: input.client_name,
                status: input.status.into(),
                deadline: input.deadline,
            },
        )
        .await
        .map_err(to_graphql)?;
        Ok(record.into())
    }

    #[graphql(name = "updateOrder")]
    async fn update_order(
        &self,
        ctx: &Context<'_>,
        input: UpdateOrderInput,
    ) -> async_graphql::Result<OrderNode> {
        let db = database(ctx)?;
        let order_id = parse_uuid(&input.id)?;
        let patch = OrderPatch {
            title: input.title,
            client_name: patch_value(input.client_name),
            deadline: patch_value(input.deadline),
        };
        let record = service::update_order(db.as_ref(), order_id, patch)
            .await
            .map_err(to_graphql)?;
        Ok(record.into())
    }

    #[graphql(name = "setOrderStatus")]
    async fn set_order_status(
        &self,
        ctx: &Context<'_>,
        id: ID,
        status: OrderStatus,
    ) -> async_graphql::Result<OrderNode> {
        let db = database(ctx)?;
        let order_id = parse_uuid(&id)?;
        let record = service::set_order_status(db.as_ref(), order_id, status.into())
            .await
            .map_err(to_graphql)?;
        Ok(record.into())
    }

    #[graphql(name = "deleteOrder")]
    async fn delete_order(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<bool> {
        let db = database(ctx)?;
        let order_id = parse_uuid(&id)?;
        service::delete_order(db.as_ref(), order_id)
            .await
            .map_err(to_graphql)
    }

    #[graphql(name = "createStage")]
    async fn create_stage(
        &self,
        ctx: &Context<'_>,
        input: NewStageInput,
    ) -> async_graphql::Result<StageNode> {
        let db = database(ctx)?;
        let order_id = parse_uuid(&input.order_id)?;
        let record = service::create_stage(
            db.as_ref(),
            NewStage {
                order_id,
                name: input.name,
                description: input.description,
                position: input.position,
            },
        )
        .await
        .map_err(to_graphql)?;
        Ok(record.into())
    }

    #[graphql(name = "updateStage")]
    async fn update_stage(
        &self,
        ctx: &Context<'_>,
        input: UpdateStageInput,
    ) -> async_graphql::Result<StageNode> {
        let db = database(ctx)?;
        let stage_id = parse_uuid(&input.id)?;
        let patch = StagePatch {
            name: input.name,
            description: patch_value(input.description),
        };
        let record = service::update_stage(db.as_ref(), stage_id, patch)
            .await
            .map_err(to_graphql)?;
        Ok(record.into())
    }

    #[graphql(name = "deleteStage")]
    async fn delete_stage(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<bool> {
        let db = database(ctx)?;
        let stage_id = parse_uuid(&id)?;
        service::delete_stage(db.as_ref(), stage_id)
            .await
            .map_err(to_graphql)
    }

    #[graphql(name = "reorderStages")]
    async fn reorder_stages(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "orderId")] order_id: ID,
        #[graphql(name = "stageIds")] stage_ids: Vec<ID>,
    ) -> async_graphql::Result<Vec<StageNode>> {
        let db = database(ctx)?;
        let order_id = parse_uuid(&order_id)?;
        let stage_ids = stage_ids
            .iter()
            .map(parse_uuid)
            .collect::<async_graphql::Result<Vec<_>>>()?;
        let rows = service::reorder_stages(db.as_ref(), order_id, stage_ids)
            .await
            .map_err(to_graphql)?;
        Ok(rows.into_iter().map(StageNode::from).collect())
    }

    #[graphql(name = "createStageOption")]
    async fn create_stage_option(
        &self,
        ctx: &Context<'_>,
        input: NewStageOptionInput,
    ) -> async_graphql::Result<StageOptionNode> {
        let db = database(ctx)?;
        let stage_id = parse_uuid(&input.stage_id)?;
        let record = service::create_option(db.as_ref(), stage_id, input.into())
            .await
            .map_err(to_graphql)?;
        Ok(record.into())
    }

    #[graphql(name = "updateStageOption")]
    async fn update_stage_option(
        &self,
        ctx: &Context<'_>,
        input: UpdateStageOptionInput,
    ) -> async_graphql::Result<StageOptionNode> {
        let db = database(ctx)?;
        let option_id = parse_uuid(&input.id)?;
        let record = service::update_option(db.as_ref(), option_id, input.into())
            .await
            .map_err(to_graphql)?;
        Ok(record.into())
    }

    #[graphql(name = "deleteStageOption")]
    async fn delete_stage_option(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<bool> {
        let db = database(ctx)?;
        let option_id = parse_uuid(&id)?;
        service::delete_option(db.as_ref(), option_id)
            .await
            .map_err(to_graphql)
    }

    #[graphql(name = "createUnit")]
    async fn create_unit(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "shortName")] short_name: String,
        name: String,
    ) -> async_graphql::Result<UnitNode> {
        let db = database(ctx)?;
        let record = service::create_unit(db.as_ref(), &short_name, &name)
            .await
            .map_err(to_graphql)?;
        Ok(record.into())
    }
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum OrderStatus {
    #[default]
    #[graphql(name = "NEW")]
    New,
    #[graphql(name = "IN_PROGRESS")]
    InProgress,
    #[graphql(name = "DONE")]
    Done,
    #[graphql(name = "CANCELLED")]
    Cancelled,
}

impl OrderStatus {
    fn as_str(self) -> &'static str {
        match self {
            OrderStatus::New => "NEW",
            OrderStatus::InProgress => "IN_PROGRESS",
            OrderStatus::Done => "DONE",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl From<order::Status> for OrderStatus {
    fn from(value: order::Status) -> Self {
        match value {
            order::Status::New => OrderStatus::New,
            order::Status::InProgress => OrderStatus::InProgress,
            order::Status::Done => OrderStatus::Done,
            order::Status::Cancelled => OrderStatus::Cancelled,
        }
    }
}

impl From<OrderStatus> for order::Status {
    fn from(value: OrderStatus) -> Self {
        match value {
            OrderStatus::New => order::Status::New,
            OrderStatus::InProgress => order::Status::InProgress,
            OrderStatus::Done => order::Status::Done,
            OrderStatus::Cancelled => order::Status::Cancelled,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct ProjectNode {
    pub id: ID,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<project::Model> for ProjectNode {
    fn from(model: project::Model) -> Self {
        Self {
            id: ID::from(model.id.to_string()),
            name: model.name,
            description: model.description,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct OrderNode {
    pub id: ID,
    pub project_id: ID,
    pub title: String,
    pub client_name: Option<String>,
    pub status: OrderStatus,
    pub deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<order::Model> for OrderNode {
    fn from(model: order::Model) -> Self {
        Self {
            id: ID::from(model.id.to_string()),
            project_id: ID::from(model.project_id.to_string()),
            title: model.title,
            client_name: model.client_name,
            status: model.status.into(),
            deadline: model.deadline,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct StageNode {
    pub id: ID,
    pub order_id: ID,
    pub name: String,
    pub description: Option<String>,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<order_stage::Model> for StageNode {
    fn from(model: order_stage::Model) -> Self {
        Self {
            id: ID::from(model.id.to_string()),
            order_id: ID::from(model.order_id.to_string()),
            name: model.name,
            description: model.description,
            position: model.position,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct StageOptionNode {
    pub id: ID,
    pub stage_id: ID,
    pub name: String,
    pub description: Option<String>,
    pub pricing_type: PricingType,
    /// Numeric id of the pricing type row, for clients that predate the enum.
    pub pricing_type_id: i32,
    pub volume_min: Option<f64>,
    pub volume_max: Option<f64>,
    pub nominal_volume: Option<f64>,
    pub price_per_unit: Option<f64>,
    pub unit_id: Option<i32>,
    #[graphql(deprecation = "use unitId")]
    pub unit_label: Option<String>,
    pub calculated_price_min: Option<f64>,
    pub calculated_price_max: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<stage_option::Model> for StageOptionNode {
    fn from(model: stage_option::Model) -> Self {
        let pricing_type = PricingType::from(model.pricing_type_id);
        Self {
            id: ID::from(model.id.to_string()),
            stage_id: ID::from(model.stage_id.to_string()),
            name: model.name,
            description: model.description,
            pricing_type,
            pricing_type_id: pricing_type.id(),
            volume_min: model.volume_min,
            volume_max: model.volume_max,
            nominal_volume: model.nominal_volume,
            price_per_unit: model.price_per_unit,
            unit_id: model.unit_id,
            unit_label: model.unit_label,
            calculated_price_min: model.calculated_price_min,
            calculated_price_max: model.calculated_price_max,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct UnitNode {
    pub id: i32,
    pub short_name: String,
    pub name: String,
}

impl From<unit_of_measure::Model> for UnitNode {
    fn from(model: unit_of_measure::Model) -> Self {
        Self {
            id: model.id,
            short_name: model.short_name,
            name: model.name,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct PricingTypeNode {
    pub id: i32,
    pub code: String,
    pub name: String,
}

impl From<pricing_type::Model> for PricingTypeNode {
    fn from(model: pricing_type::Model) -> Self {
        Self {
            id: model.id,
            code: model.code,
            name: model.name,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct StagePriceSummary {
    pub stage_id: ID,
    pub stage_name: String,
    pub option_count: i32,
    pub calculable_count: i32,
    pub included_count: i32,
    pub total_min: f64,
    pub total_max: f64,
}

impl From<StageTotals> for StagePriceSummary {
    fn from(value: StageTotals) -> Self {
        let StageTotals { stage, totals } = value;
        Self {
            stage_id: ID::from(stage.id.to_string()),
            stage_name: stage.name,
            option_count: totals.option_count as i32,
            calculable_count: totals.calculable_count as i32,
            included_count: totals.included_count as i32,
            total_min: totals.total_min,
            total_max: totals.total_max,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct OrderPriceSummary {
    pub order_id: ID,
    pub stages: Vec<StagePriceSummary>,
    pub option_count: i32,
    pub calculable_count: i32,
    pub included_count: i32,
    pub total_min: f64,
    pub total_max: f64,
}

impl OrderPriceSummary {
    fn new(order_id: Uuid, stages: Vec<StageTotals>, overall: PriceTotals) -> Self {
        Self {
            order_id: ID::from(order_id.to_string()),
            stages: stages.into_iter().map(StagePriceSummary::from).collect(),
            option_count: overall.option_count as i32,
            calculable_count: overall.calculable_count as i32,
            included_count: overall.included_count as i32,
            total_min: overall.total_min,
            total_max: overall.total_max,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct PricePreview {
    pub calculated_price_min: Option<f64>,
    pub calculated_price_max: Option<f64>,
}

#[derive(InputObject)]
pub struct NewProjectInput {
    pub name: String,
    pub description: Option<String>,
}

#[derive(InputObject)]
pub struct UpdateProjectInput {
    pub id: ID,
    pub name: Option<String>,
    pub description: MaybeUndefined<String>,
}

#[derive(InputObject)]
pub struct NewOrderInput {
    pub project_id: ID,
    pub title: String,
    pub client_name: Option<String>,
    #[graphql(default)]
    pub status: OrderStatus,
    pub deadline: Option<NaiveDate>,
}

#[derive(InputObject)]
pub struct UpdateOrderInput {
    pub id: ID,
    pub title: Option<String>,
    pub client_name: MaybeUndefined<String>,
    pub deadline: MaybeUndefined<NaiveDate>,
}

#[derive(InputObject)]
pub struct NewStageInput {
    pub order_id: ID,
    pub name: String,
    pub description: Option<String>,
    /// Appended after the last stage when omitted.
    pub position: Option<i32>,
}

#[derive(InputObject)]
pub struct UpdateStageInput {
    pub id: ID,
    pub name: Option<String>,
    pub description: MaybeUndefined<String>,
}

/// Derived prices are not part of any input; they are always recomputed.
#[derive(InputObject)]
pub struct NewStageOptionInput {
    pub stage_id: ID,
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

impl From<NewStageOptionInput> for OptionDraft {
    fn from(input: NewStageOptionInput) -> Self {
        Self {
            name: input.name,
            description: input.description,
            pricing_type: input.pricing_type,
            volume_min: input.volume_min,
            volume_max: input.volume_max,
            nominal_volume: input.nominal_volume,
            price_per_unit: input.price_per_unit,
            unit_id: input.unit_id,
            unit_label: input.unit_label,
        }
    }
}

/// Omitted fields keep their stored value; `null` clears a nullable field.
#[derive(InputObject)]
pub struct UpdateStageOptionInput {
    pub id: ID,
    pub name: Option<String>,
    pub description: MaybeUndefined<String>,
    pub pricing_type: Option<PricingType>,
    pub volume_min: MaybeUndefined<f64>,
    pub volume_max: MaybeUndefined<f64>,
    pub nominal_volume: MaybeUndefined<f64>,
    pub price_per_unit: MaybeUndefined<f64>,
    pub unit_id: MaybeUndefined<i32>,
    pub unit_label: MaybeUndefined<String>,
}

impl From<UpdateStageOptionInput> for OptionPatch {
    fn from(input: UpdateStageOptionInput) -> Self {
        Self {
            name: input.name,
            description: patch_value(input.description),
            pricing_type: input.pricing_type,
            volume_min: patch_value(input.volume_min),
            volume_max: patch_value(input.volume_max),
            nominal_volume: patch_value(input.nominal_volume),
            price_per_unit: patch_value(input.price_per_unit),
            unit_id: patch_value(input.unit_id),
            unit_label: patch_value(input.unit_label),
        }
    }
}

#[derive(InputObject)]
pub struct OptionPriceInput {
    pub pricing_type: PricingType,
    pub volume_min: Option<f64>,
    pub volume_max: Option<f64>,
    pub nominal_volume: Option<f64>,
    pub price_per_unit: Option<f64>,
}

impl From<OptionPriceInput> for OptionDraft {
    fn from(input: OptionPriceInput) -> Self {
        Self {
            pricing_type: input.pricing_type,
            volume_min: input.volume_min,
            volume_max: input.volume_max,
            nominal_volume: input.nominal_volume,
            price_per_unit: input.price_per_unit,
            ..OptionDraft::named("preview")
        }
    }
}

fn patch_value<T>(value: MaybeUndefined<T>) -> Option<Option<T>> {
    match value {
        MaybeUndefined::Undefined => None,
        MaybeUndefined::Null => Some(None),
        MaybeUndefined::Value(value) => Some(Some(value)),
    }
}

fn database(ctx: &Context<'_>) -> async_graphql::Result<Arc<DatabaseConnection>> {
    ctx.data::<Arc<DatabaseConnection>>()
        .cloned()
        .map_err(|_| internal_error(anyhow::anyhow!("missing database connection")))
}

fn parse_uuid(id: &ID) -> async_graphql::Result<Uuid> {
    Uuid::parse_str(id.as_str()).map_err(|_| ApiError::invalid_input("Invalid ID").extend())
}
