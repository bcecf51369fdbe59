//! Persistence-side operations behind the `desk` GraphQL namespace.
//!
//! Every stage option write runs the same pipeline: merge the input with the
//! stored row, validate, sync the unit pair, compute prices, then persist.

use std::collections::HashSet;

use chrono::{NaiveDate, Utc};
use entity::{order, order_stage, pricing_type, project, stage_option, unit_of_measure};
use platform_api::{ApiError, ApiResult};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::draft::{NAME_MAX, DESCRIPTION_MAX, OptionDraft, OptionPatch};
use crate::error::{RuleError, optional_text, required_text};
use crate::pricing::{PriceRange, PriceTotals, compute_option_prices, summarize};
use crate::units::{UnitDirectory, sync_unit_fields};

pub const DEFAULT_PAGE: i32 = 50;
pub const MAX_PAGE: i32 = 200;
const CLIENT_NAME_MAX: usize = 256;
const UNIT_SHORT_NAME_MAX: usize = 32;
const UNIT_NAME_MAX: usize = 128;

/// Translates the `first` / `offset` arguments into a limit and skip.
pub fn page_window(first: Option<i32>, offset: Option<i32>) -> ApiResult<(u64, u64)> {
    let requested = first.unwrap_or(DEFAULT_PAGE);
    if requested > MAX_PAGE {
        return Err(ApiError::LimitExceeded(format!(
            "first cannot exceed {}",
            MAX_PAGE
        )));
    }
    if requested < 1 {
        return Err(ApiError::validation("first must be at least 1"));
    }
    Ok((requested as u64, offset.unwrap_or(0).max(0) as u64))
}

fn now() -> DateTimeWithTimeZone {
    Utc::now().into()
}

// ---------------------------------------------------------------------------
// Projects

#[derive(Clone, Debug)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}

pub async fn list_projects(
    db: &DatabaseConnection,
    q: Option<&str>,
    limit: u64,
    skip: u64,
) -> ApiResult<Vec<project::Model>> {
    let mut query = project::Entity::find();
    if let Some(q) = q.map(str::trim).filter(|q| !q.is_empty()) {
        let pattern = format!("%{}%", escape_like(&q.to_lowercase()));
        let name_expr = Expr::expr(Func::lower(Expr::col(project::Column::Name)));
        let description_expr = Expr::expr(Func::lower(Expr::col(project::Column::Description)));
        query = query.filter(
            Condition::any()
                .add(name_expr.like(LikeExpr::new(pattern.clone()).escape('\\')))
                .add(description_expr.like(LikeExpr::new(pattern).escape('\\'))),
        );
    }
    let rows = query
        .order_by_asc(project::Column::Name)
        .limit(limit)
        .offset(skip)
        .all(db)
        .await?;
    Ok(rows)
}

/// Makes `%`, `_` and `\` in user text match literally.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

pub async fn find_project(db: &DatabaseConnection, id: Uuid) -> ApiResult<Option<project::Model>> {
    Ok(project::Entity::find_by_id(id).one(db).await?)
}

pub async fn create_project(db: &DatabaseConnection, input: NewProject) -> ApiResult<project::Model> {
    let name = required_text("name", &input.name, NAME_MAX)?;
    let description = optional_text("description", input.description, DESCRIPTION_MAX)?;
    let id = Uuid::new_v4();
    let now = now();
    let active = project::ActiveModel {
        id: Set(id),
        name: Set(name),
        description: Set(description),
        created_at: Set(now),
        updated_at: Set(now),
    };
    project::Entity::insert(active).exec_without_returning(db).await?;
    info!(project_id = %id, "project created");
    load_project(db, id).await
}

pub async fn update_project(
    db: &DatabaseConnection,
    id: Uuid,
    patch: ProjectPatch,
) -> ApiResult<project::Model> {
    let existing = load_project(db, id).await?;
    let mut active: project::ActiveModel = existing.into();
    if let Some(name) = patch.name {
        active.name = Set(required_text("name", &name, NAME_MAX)?);
    }
    if let Some(description) = patch.description {
        active.description = Set(optional_text("description", description, DESCRIPTION_MAX)?);
    }
    active.updated_at = Set(now());
    Ok(active.update(db).await?)
}

pub async fn delete_project(db: &DatabaseConnection, id: Uuid) -> ApiResult<bool> {
    let result = project::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::not_found("Project not found"));
    }
    info!(project_id = %id, "project deleted");
    Ok(true)
}

async fn load_project(db: &DatabaseConnection, id: Uuid) -> ApiResult<project::Model> {
    find_project(db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Project not found"))
}

// ---------------------------------------------------------------------------
// Orders

#[derive(Clone, Debug)]
pub struct NewOrder {
    pub project_id: Uuid,
    pub title: String,
    pub client_name: Option<String>,
    pub status: order::Status,
    pub deadline: Option<NaiveDate>,
}

#[derive(Clone, Debug, Default)]
pub struct OrderPatch {
    pub title: Option<String>,
    pub client_name: Option<Option<String>>,
    pub deadline: Option<Option<NaiveDate>>,
}

pub async fn list_orders(
    db: &DatabaseConnection,
    project_id: Option<Uuid>,
    status: Option<order::Status>,
    limit: u64,
    skip: u64,
) -> ApiResult<Vec<order::Model>> {
    let mut query = order::Entity::find();
    if let Some(project_id) = project_id {
        query = query.filter(order::Column::ProjectId.eq(project_id));
    }
    if let Some(status) = status {
        query = query.filter(order::Column::Status.eq(status));
    }
    let rows = query
        .order_by_desc(order::Column::CreatedAt)
        .limit(limit)
        .offset(skip)
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn find_order(db: &DatabaseConnection, id: Uuid) -> ApiResult<Option<order::Model>> {
    Ok(order::Entity::find_by_id(id).one(db).await?)
}

pub async fn create_order(db: &DatabaseConnection, input: NewOrder) -> ApiResult<order::Model> {
    let title = required_text("title", &input.title, NAME_MAX)?;
    let client_name = optional_text("clientName", input.client_name, CLIENT_NAME_MAX)?;
    if find_project(db, input.project_id).await?.is_none() {
        return Err(ApiError::validation("Project not found"));
    }
    let id = Uuid::new_v4();
    let now = now();
    let active = order::ActiveModel {
        id: Set(id),
        project_id: Set(input.project_id),
        title: Set(title),
        client_name: Set(client_name.map(|name| name.trim().to_string())),
        status: Set(input.status),
        deadline: Set(input.deadline),
        created_at: Set(now),
        updated_at: Set(now),
    };
    order::Entity::insert(active).exec_without_returning(db).await?;
    info!(order_id = %id, project_id = %input.project_id, "order created");
    load_order(db, id).await
}

pub async fn update_order(
    db: &DatabaseConnection,
    id: Uuid,
    patch: OrderPatch,
) -> ApiResult<order::Model> {
    let existing = load_order(db, id).await?;
    let mut active: order::ActiveModel = existing.into();
    if let Some(title) = patch.title {
        active.title = Set(required_text("title", &title, NAME_MAX)?);
    }
    if let Some(client_name) = patch.client_name {
        let client_name = optional_text("clientName", client_name, CLIENT_NAME_MAX)?;
        active.client_name = Set(client_name.map(|name| name.trim().to_string()));
    }
    if let Some(deadline) = patch.deadline {
        active.deadline = Set(deadline);
    }
    active.updated_at = Set(now());
    Ok(active.update(db).await?)
}

pub async fn set_order_status(
    db: &DatabaseConnection,
    id: Uuid,
    status: order::Status,
) -> ApiResult<order::Model> {
    let existing = load_order(db, id).await?;
    if existing.status == status {
        return Ok(existing);
    }
    let previous = existing.status;
    let mut active: order::ActiveModel = existing.into();
    active.status = Set(status);
    active.updated_at = Set(now());
    let updated = active.update(db).await?;
    info!(order_id = %id, from = ?previous, to = ?status, "order status changed");
    Ok(updated)
}

pub async fn delete_order(db: &DatabaseConnection, id: Uuid) -> ApiResult<bool> {
    let result = order::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::not_found("Order not found"));
    }
    info!(order_id = %id, "order deleted");
    Ok(true)
}

async fn load_order(db: &DatabaseConnection, id: Uuid) -> ApiResult<order::Model> {
    find_order(db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order not found"))
}

// ---------------------------------------------------------------------------
// Stages

#[derive(Clone, Debug)]
pub struct NewStage {
    pub order_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub position: Option<i32>,
}

#[derive(Clone, Debug, Default)]
pub struct StagePatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}

pub async fn list_stages(
    db: &DatabaseConnection,
    order_id: Uuid,
) -> ApiResult<Vec<order_stage::Model>> {
    let rows = order_stage::Entity::find()
        .filter(order_stage::Column::OrderId.eq(order_id))
        .order_by_asc(order_stage::Column::Position)
        .order_by_asc(order_stage::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn find_stage(
    db: &DatabaseConnection,
    id: Uuid,
) -> ApiResult<Option<order_stage::Model>> {
    Ok(order_stage::Entity::find_by_id(id).one(db).await?)
}

pub async fn create_stage(db: &DatabaseConnection, input: NewStage) -> ApiResult<order_stage::Model> {
    let name = required_text("name", &input.name, NAME_MAX)?;
    let description = optional_text("description", input.description, DESCRIPTION_MAX)?;
    if find_order(db, input.order_id).await?.is_none() {
        return Err(ApiError::validation("Order not found"));
    }
    let position = match input.position {
        Some(position) if position < 0 => {
            return Err(ApiError::validation("position must not be negative"));
        }
        Some(position) => position,
        None => next_stage_position(db, input.order_id).await?,
    };
    let id = Uuid::new_v4();
    let now = now();
    let active = order_stage::ActiveModel {
        id: Set(id),
        order_id: Set(input.order_id),
        name: Set(name),
        description: Set(description),
        position: Set(position),
        created_at: Set(now),
        updated_at: Set(now),
    };
    order_stage::Entity::insert(active).exec_without_returning(db).await?;
    info!(stage_id = %id, order_id = %input.order_id, position, "stage created");
    load_stage(db, id).await
}

pub async fn update_stage(
    db: &DatabaseConnection,
    id: Uuid,
    patch: StagePatch,
) -> ApiResult<order_stage::Model> {
    let existing = load_stage(db, id).await?;
    let mut active: order_stage::ActiveModel = existing.into();
    if let Some(name) = patch.name {
        active.name = Set(required_text("name", &name, NAME_MAX)?);
    }
    if let Some(description) = patch.description {
        active.description = Set(optional_text("description", description, DESCRIPTION_MAX)?);
    }
    active.updated_at = Set(now());
    Ok(active.update(db).await?)
}

/// Options of the stage go with it.
pub async fn delete_stage(db: &DatabaseConnection, id: Uuid) -> ApiResult<bool> {
    let result = order_stage::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::not_found("Stage not found"));
    }
    info!(stage_id = %id, "stage deleted");
    Ok(true)
}

/// Rewrites stage positions so they follow `stage_ids`. The list must name
/// every stage of the order exactly once.
#[instrument(name = "desk.stages.reorder", skip(db, stage_ids), fields(count = stage_ids.len()))]
pub async fn reorder_stages(
    db: &DatabaseConnection,
    order_id: Uuid,
    stage_ids: Vec<Uuid>,
) -> ApiResult<Vec<order_stage::Model>> {
    load_order(db, order_id).await?;
    let txn = db.begin().await?;
    let current: HashSet<Uuid> = order_stage::Entity::find()
        .filter(order_stage::Column::OrderId.eq(order_id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|stage| stage.id)
        .collect();
    let requested: HashSet<Uuid> = stage_ids.iter().copied().collect();
    if requested.len() != stage_ids.len() {
        return Err(ApiError::validation("stageIds must not contain duplicates"));
    }
    if requested != current {
        return Err(ApiError::validation(
            "stageIds must list every stage of the order exactly once",
        ));
    }
    let now = now();
    for (position, stage_id) in stage_ids.iter().enumerate() {
        order_stage::Entity::update_many()
            .col_expr(order_stage::Column::Position, Expr::value(position as i32))
            .col_expr(order_stage::Column::UpdatedAt, Expr::value(now))
            .filter(order_stage::Column::Id.eq(*stage_id))
            .exec(&txn)
            .await?;
    }
    txn.commit().await?;
    list_stages(db, order_id).await
}

async fn next_stage_position(db: &DatabaseConnection, order_id: Uuid) -> ApiResult<i32> {
    let last = order_stage::Entity::find()
        .filter(order_stage::Column::OrderId.eq(order_id))
        .order_by_desc(order_stage::Column::Position)
        .one(db)
        .await?;
    Ok(last.map(|stage| stage.position + 1).unwrap_or(0))
}

async fn load_stage(db: &DatabaseConnection, id: Uuid) -> ApiResult<order_stage::Model> {
    find_stage(db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Stage not found"))
}

// ---------------------------------------------------------------------------
// Stage options

pub async fn list_options(
    db: &DatabaseConnection,
    stage_id: Uuid,
) -> ApiResult<Vec<stage_option::Model>> {
    let rows = stage_option::Entity::find()
        .filter(stage_option::Column::StageId.eq(stage_id))
        .order_by_asc(stage_option::Column::CreatedAt)
        .order_by_asc(stage_option::Column::Name)
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn find_option(
    db: &DatabaseConnection,
    id: Uuid,
) -> ApiResult<Option<stage_option::Model>> {
    Ok(stage_option::Entity::find_by_id(id).one(db).await?)
}

/// Validation, unit sync and pricing for a draft about to be stored.
async fn prepare_option<C: ConnectionTrait>(
    conn: &C,
    draft: OptionDraft,
) -> Result<(OptionDraft, PriceRange), RuleError> {
    let draft = draft.normalized();
    draft.validate()?;
    let draft = sync_unit_fields(&UnitDirectory::new(conn), draft).await;
    let prices = compute_option_prices(&draft);
    Ok((draft, prices))
}

pub async fn create_option(
    db: &DatabaseConnection,
    stage_id: Uuid,
    draft: OptionDraft,
) -> ApiResult<stage_option::Model> {
    if find_stage(db, stage_id).await?.is_none() {
        return Err(ApiError::validation("Stage not found"));
    }
    let (draft, prices) = prepare_option(db, draft).await?;
    let id = Uuid::new_v4();
    let now = now();
    let active = stage_option::ActiveModel {
        id: Set(id),
        stage_id: Set(stage_id),
        name: Set(draft.name),
        description: Set(draft.description),
        pricing_type_id: Set(draft.pricing_type.into()),
        volume_min: Set(draft.volume_min),
        volume_max: Set(draft.volume_max),
        nominal_volume: Set(draft.nominal_volume),
        price_per_unit: Set(draft.price_per_unit),
        unit_id: Set(draft.unit_id),
        unit_label: Set(draft.unit_label),
        calculated_price_min: Set(prices.min),
        calculated_price_max: Set(prices.max),
        created_at: Set(now),
        updated_at: Set(now),
    };
    stage_option::Entity::insert(active).exec_without_returning(db).await?;
    info!(option_id = %id, stage_id = %stage_id, "stage option created");
    load_option(db, id).await
}

pub async fn update_option(
    db: &DatabaseConnection,
    id: Uuid,
    patch: OptionPatch,
) -> ApiResult<stage_option::Model> {
    let existing = load_option(db, id).await?;
    let merged = patch.apply(OptionDraft::from_model(&existing));
    let (draft, prices) = prepare_option(db, merged).await?;
    let mut active: stage_option::ActiveModel = existing.into();
    active.name = Set(draft.name);
    active.description = Set(draft.description);
    active.pricing_type_id = Set(draft.pricing_type.into());
    active.volume_min = Set(draft.volume_min);
    active.volume_max = Set(draft.volume_max);
    active.nominal_volume = Set(draft.nominal_volume);
    active.price_per_unit = Set(draft.price_per_unit);
    active.unit_id = Set(draft.unit_id);
    active.unit_label = Set(draft.unit_label);
    active.calculated_price_min = Set(prices.min);
    active.calculated_price_max = Set(prices.max);
    active.updated_at = Set(now());
    Ok(active.update(db).await?)
}

pub async fn delete_option(db: &DatabaseConnection, id: Uuid) -> ApiResult<bool> {
    let result = stage_option::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::not_found("Stage option not found"));
    }
    info!(option_id = %id, "stage option deleted");
    Ok(true)
}

/// Runs validation and the pricing rule without touching the database.
pub fn preview_prices(draft: OptionDraft) -> ApiResult<PriceRange> {
    let draft = draft.normalized();
    draft.validate()?;
    Ok(compute_option_prices(&draft))
}

/// Recomputes derived prices for every stored option in one transaction.
/// Returns how many rows changed.
#[instrument(name = "desk.prices.recalc", skip(db))]
pub async fn recalculate_all_prices(db: &DatabaseConnection) -> ApiResult<u64> {
    let txn = db.begin().await?;
    let options = stage_option::Entity::find().all(&txn).await?;
    let mut changed = 0u64;
    for option in options {
        let prices = compute_option_prices(&OptionDraft::from_model(&option));
        if prices.min == option.calculated_price_min && prices.max == option.calculated_price_max {
            continue;
        }
        let mut active: stage_option::ActiveModel = option.into();
        active.calculated_price_min = Set(prices.min);
        active.calculated_price_max = Set(prices.max);
        active.update(&txn).await?;
        changed += 1;
    }
    txn.commit().await?;
    info!(changed, "stage option prices recalculated");
    Ok(changed)
}

async fn load_option(db: &DatabaseConnection, id: Uuid) -> ApiResult<stage_option::Model> {
    find_option(db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Stage option not found"))
}

// ---------------------------------------------------------------------------
// Summaries

#[derive(Clone, Debug)]
pub struct StageTotals {
    pub stage: order_stage::Model,
    pub totals: PriceTotals,
}

pub async fn stage_totals(db: &DatabaseConnection, stage_id: Uuid) -> ApiResult<StageTotals> {
    let stage = load_stage(db, stage_id).await?;
    let options = list_options(db, stage_id).await?;
    Ok(StageTotals {
        stage,
        totals: summarize(&options),
    })
}

pub async fn order_totals(
    db: &DatabaseConnection,
    order_id: Uuid,
) -> ApiResult<(Vec<StageTotals>, PriceTotals)> {
    load_order(db, order_id).await?;
    let stages = list_stages(db, order_id).await?;
    let stage_ids: Vec<Uuid> = stages.iter().map(|stage| stage.id).collect();
    let options = if stage_ids.is_empty() {
        Vec::new()
    } else {
        stage_option::Entity::find()
            .filter(stage_option::Column::StageId.is_in(stage_ids))
            .all(db)
            .await?
    };
    let mut overall = PriceTotals::default();
    let per_stage: Vec<StageTotals> = stages
        .into_iter()
        .map(|stage| {
            let totals = summarize(options.iter().filter(|option| option.stage_id == stage.id));
            overall.merge(&totals);
            StageTotals { stage, totals }
        })
        .collect();
    Ok((per_stage, overall))
}

// ---------------------------------------------------------------------------
// Lookups

pub async fn list_units(db: &DatabaseConnection) -> ApiResult<Vec<unit_of_measure::Model>> {
    let rows = unit_of_measure::Entity::find()
        .order_by_asc(unit_of_measure::Column::Id)
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn create_unit(
    db: &DatabaseConnection,
    short_name: &str,
    name: &str,
) -> ApiResult<unit_of_measure::Model> {
    let short_name = required_text("shortName", short_name, UNIT_SHORT_NAME_MAX)?;
    let name = required_text("name", name, UNIT_NAME_MAX)?;
    let taken = unit_of_measure::Entity::find()
        .filter(unit_of_measure::Column::ShortName.eq(short_name.as_str()))
        .one(db)
        .await?;
    if taken.is_some() {
        return Err(ApiError::validation(format!(
            "unit '{}' already exists",
            short_name
        )));
    }
    let active = unit_of_measure::ActiveModel {
        short_name: Set(short_name),
        name: Set(name),
        ..Default::default()
    };
    let unit = active.insert(db).await?;
    info!(unit_id = unit.id, short_name = %unit.short_name, "unit created");
    Ok(unit)
}

pub async fn list_pricing_types(db: &DatabaseConnection) -> ApiResult<Vec<pricing_type::Model>> {
    let rows = pricing_type::Entity::find()
        .order_by_asc(pricing_type::Column::Id)
        .all(db)
        .await?;
    Ok(rows)
}
