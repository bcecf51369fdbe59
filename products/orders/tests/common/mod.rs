#![allow(dead_code)]

use std::sync::Arc;

use async_graphql::{EmptySubscription, Request, Schema, Value as GqlValue, Variables};
use products_orders::{MutationRoot, QueryRoot};
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};
use serde_json::Value;

pub type DeskSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub struct DeskEnv {
    pub db: Arc<DatabaseConnection>,
    pub schema: DeskSchema,
}

impl DeskEnv {
    pub async fn new() -> Self {
        let conn = Database::connect("sqlite::memory:").await.unwrap();
        let db = Arc::new(conn);
        bootstrap_sqlite(db.as_ref()).await;
        let schema = Schema::build(QueryRoot, MutationRoot, EmptySubscription)
            .data(db.clone())
            .finish();
        Self { db, schema }
    }

    /// Runs a request and returns `data`, panicking on GraphQL errors.
    pub async fn run(&self, query: &str, variables: Value) -> Value {
        let response = self
            .schema
            .execute(Request::new(query).variables(Variables::from_json(variables)))
            .await;
        assert!(response.errors.is_empty(), "unexpected errors: {:?}", response.errors);
        response.data.into_json().unwrap()
    }

    /// Runs a request expected to fail and returns the `code` extension of the
    /// first error.
    pub async fn error_code(&self, query: &str, variables: Value) -> String {
        let response = self
            .schema
            .execute(Request::new(query).variables(Variables::from_json(variables)))
            .await;
        let error = response.errors.first().expect("expected an error");
        match error.extensions.as_ref().and_then(|ext| ext.get("code")) {
            Some(GqlValue::String(code)) => code.clone(),
            other => panic!("error without code extension: {other:?}"),
        }
    }

    pub async fn project(&self, name: &str) -> String {
        let data = self
            .run(
                "mutation($input: NewProjectInput!) { desk { createProject(input: $input) { id } } }",
                serde_json::json!({ "input": { "name": name } }),
            )
            .await;
        data["desk"]["createProject"]["id"].as_str().unwrap().to_string()
    }

    pub async fn order(&self, project_id: &str, title: &str) -> String {
        let data = self
            .run(
                "mutation($input: NewOrderInput!) { desk { createOrder(input: $input) { id } } }",
                serde_json::json!({ "input": { "projectId": project_id, "title": title } }),
            )
            .await;
        data["desk"]["createOrder"]["id"].as_str().unwrap().to_string()
    }

    pub async fn stage(&self, order_id: &str, name: &str) -> String {
        let data = self
            .run(
                "mutation($input: NewStageInput!) { desk { createStage(input: $input) { id } } }",
                serde_json::json!({ "input": { "orderId": order_id, "name": name } }),
            )
            .await;
        data["desk"]["createStage"]["id"].as_str().unwrap().to_string()
    }

    /// Project, order and one stage; returns the stage id.
    pub async fn stage_fixture(&self) -> String {
        let project = self.project("Localization").await;
        let order = self.order(&project, "Catalogue").await;
        self.stage(&order, "Translation").await
    }
}

pub const OPTION_FIELDS: &str = "id name pricingType pricingTypeId volumeMin volumeMax nominalVolume pricePerUnit unitId unitLabel calculatedPriceMin calculatedPriceMax";

pub async fn bootstrap_sqlite(db: &DatabaseConnection) {
    db.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        "PRAGMA foreign_keys = ON;",
    ))
    .await
    .unwrap();

    for ddl in [
        r#"
        CREATE TABLE projects (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
        r#"
        CREATE TABLE orders (
            id TEXT PRIMARY KEY,
            project_id TEXT NOT NULL,
            title TEXT NOT NULL,
            client_name TEXT,
            status TEXT NOT NULL DEFAULT 'NEW',
            deadline TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY(project_id) REFERENCES projects(id) ON DELETE CASCADE
        );
        "#,
        r#"
        CREATE TABLE order_stages (
            id TEXT PRIMARY KEY,
            order_id TEXT NOT NULL,
            name TEXT NOT NULL,
            description TEXT,
            position INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY(order_id) REFERENCES orders(id) ON DELETE CASCADE
        );
        "#,
        r#"
        CREATE TABLE pricing_types (
            id INTEGER PRIMARY KEY,
            code TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL
        );
        "#,
        r#"
        CREATE TABLE units_of_measure (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            short_name TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL
        );
        "#,
        r#"
        CREATE TABLE stage_options (
            id TEXT PRIMARY KEY,
            stage_id TEXT NOT NULL,
            name TEXT NOT NULL,
            description TEXT,
            pricing_type_id INTEGER NOT NULL,
            volume_min REAL,
            volume_max REAL,
            nominal_volume REAL,
            price_per_unit REAL,
            unit_id INTEGER,
            unit_label TEXT,
            calculated_price_min REAL,
            calculated_price_max REAL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY(stage_id) REFERENCES order_stages(id) ON DELETE CASCADE,
            FOREIGN KEY(unit_id) REFERENCES units_of_measure(id) ON DELETE SET NULL,
            FOREIGN KEY(pricing_type_id) REFERENCES pricing_types(id)
        );
        "#,
        "INSERT INTO pricing_types (id, code, name) VALUES (1, 'CALCULABLE', 'Calculable'), (2, 'INCLUDED_IN_PRICE', 'Included in price');",
        "INSERT INTO units_of_measure (id, short_name, name) VALUES (1, 'words', 'Words'), (2, 'chars', 'Characters'), (3, 'pcs', 'Pieces'), (4, 'pages', 'Pages');",
    ] {
        db.execute(Statement::from_string(DatabaseBackend::Sqlite, ddl))
            .await
            .unwrap();
    }
}
