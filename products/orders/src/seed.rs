//! Demo data for local development. Goes through the regular services, so the
//! stored rows already carry synced units and computed prices.

use chrono::NaiveDate;
use entity::{order, order_stage, project, stage_option};
use platform_api::ApiResult;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tracing::info;

use crate::draft::OptionDraft;
use crate::pricing::PricingType;
use crate::service::{self, NewOrder, NewProject, NewStage};

const DEMO_PROJECT: &str = "Northwind Localization";

#[derive(Debug, Clone, Default)]
pub struct SeededDesk {
    pub projects: Vec<project::Model>,
    pub orders: Vec<order::Model>,
    pub stages: Vec<order_stage::Model>,
    pub options: Vec<stage_option::Model>,
}

impl SeededDesk {
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn option_named(&self, name: &str) -> Option<&stage_option::Model> {
        self.options.iter().find(|option| option.name == name)
    }
}

struct DemoOption {
    name: &'static str,
    pricing_type: PricingType,
    nominal_volume: Option<f64>,
    price_per_unit: Option<f64>,
    volume: Option<(f64, f64)>,
    unit_label: Option<&'static str>,
}

impl DemoOption {
    fn calculable(name: &'static str, nominal: f64, price: f64, volume: (f64, f64), unit: &'static str) -> Self {
        Self {
            name,
            pricing_type: PricingType::Calculable,
            nominal_volume: Some(nominal),
            price_per_unit: Some(price),
            volume: Some(volume),
            unit_label: Some(unit),
        }
    }

    fn included(name: &'static str) -> Self {
        Self {
            name,
            pricing_type: PricingType::IncludedInPrice,
            nominal_volume: None,
            price_per_unit: None,
            volume: None,
            unit_label: None,
        }
    }

    fn into_draft(self) -> OptionDraft {
        OptionDraft {
            pricing_type: self.pricing_type,
            nominal_volume: self.nominal_volume,
            price_per_unit: self.price_per_unit,
            volume_min: self.volume.map(|(min, _)| min),
            volume_max: self.volume.map(|(_, max)| max),
            unit_label: self.unit_label.map(str::to_string),
            ..OptionDraft::named(self.name)
        }
    }
}

/// Seeds two demo projects. Does nothing when the demo project already exists.
pub async fn seed_desk_demo(db: &DatabaseConnection) -> ApiResult<SeededDesk> {
    let existing = project::Entity::find()
        .filter(project::Column::Name.eq(DEMO_PROJECT))
        .one(db)
        .await?;
    if existing.is_some() {
        info!("demo data already present; skipping seed");
        return Ok(SeededDesk::default());
    }

    let mut seeded = SeededDesk::default();

    let northwind = service::create_project(
        db,
        NewProject {
            name: DEMO_PROJECT.into(),
            description: Some("Catalogue and marketing localization for Northwind Traders".into()),
        },
    )
    .await?;
    let catalogue = service::create_order(
        db,
        NewOrder {
            project_id: northwind.id,
            title: "Product catalogue translation".into(),
            client_name: Some("Northwind Traders".into()),
            status: order::Status::InProgress,
            deadline: NaiveDate::from_ymd_opt(2025, 3, 31),
        },
    )
    .await?;
    seed_stage(
        db,
        &mut seeded,
        catalogue.id,
        "Translation",
        vec![
            DemoOption::calculable("Translation EN-DE", 1000.0, 45.0, (8000.0, 12000.0), "words"),
            DemoOption::included("Terminology glossary"),
        ],
    )
    .await?;
    seed_stage(
        db,
        &mut seeded,
        catalogue.id,
        "Proofreading",
        vec![DemoOption::calculable("Second-pass proofreading", 1.0, 6.5, (120.0, 160.0), "pages")],
    )
    .await?;

    let riverside = service::create_project(
        db,
        NewProject {
            name: "Riverside Press".into(),
            description: None,
        },
    )
    .await?;
    let anniversary = service::create_order(
        db,
        NewOrder {
            project_id: riverside.id,
            title: "Anniversary book layout".into(),
            client_name: Some("Riverside Press".into()),
            status: order::Status::New,
            deadline: None,
        },
    )
    .await?;
    seed_stage(
        db,
        &mut seeded,
        anniversary.id,
        "Layout",
        vec![
            DemoOption::calculable("Page layout", 1.0, 12.0, (200.0, 240.0), "pages"),
            DemoOption::included("Cover design"),
        ],
    )
    .await?;

    seeded.projects = vec![northwind, riverside];
    seeded.orders = vec![catalogue, anniversary];
    info!(
        projects = seeded.projects.len(),
        stages = seeded.stages.len(),
        options = seeded.options.len(),
        "demo data seeded"
    );
    Ok(seeded)
}

async fn seed_stage(
    db: &DatabaseConnection,
    seeded: &mut SeededDesk,
    order_id: uuid::Uuid,
    name: &str,
    options: Vec<DemoOption>,
) -> ApiResult<()> {
    let stage = service::create_stage(
        db,
        NewStage {
            order_id,
            name: name.into(),
            description: None,
            position: None,
        },
    )
    .await?;
    for option in options {
        let created = service::create_option(db, stage.id, option.into_draft()).await?;
        seeded.options.push(created);
    }
    seeded.stages.push(stage);
    Ok(())
}
