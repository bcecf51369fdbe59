use std::sync::Arc;

use async_graphql::{EmptySubscription, MergedObject, Object, Schema, SimpleObject};
use platform_api::ApiResult;
use platform_db::DbPool;
use products_orders::{MutationRoot, QueryRoot as DeskQueryRoot};
use serde::Serialize;
use tracing::instrument;

pub type SchemaType = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(pool: DbPool) -> SchemaType {
    schema_builder().data(Arc::new(pool)).finish()
}

/// Schema without any context data; enough for printing the SDL.
pub fn schema_sdl() -> String {
    schema_builder().finish().sdl()
}

fn schema_builder() -> async_graphql::SchemaBuilder<QueryRoot, MutationRoot, EmptySubscription> {
    Schema::build(QueryRoot::default(), MutationRoot, EmptySubscription)
}

#[derive(MergedObject, Default)]
pub struct QueryRoot(SystemQuery, DeskQueryRoot);

#[derive(Default)]
pub struct SystemQuery;

#[Object]
impl SystemQuery {
    #[instrument(name = "graphql.health", skip_all)]
    async fn health(&self) -> ApiResult<HealthPayload> {
        Ok(HealthPayload { ok: true })
    }

    #[instrument(name = "graphql.version", skip_all)]
    async fn version(&self) -> ApiResult<String> {
        Ok(env!("CARGO_PKG_VERSION").to_string())
    }
}

#[derive(Clone, Debug, SimpleObject, Serialize)]
pub struct HealthPayload {
    pub ok: bool,
}
