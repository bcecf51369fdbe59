mod config;
mod graphql;
mod http;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use migration::{Migrator, MigratorTrait};
use platform_db::{DatabaseSettings, DbPool, connect};
use platform_obs::{ObsConfig, init_tracing};
use products_orders::{seed::seed_desk_demo, service::recalculate_all_prices};
use tracing::{info, warn};

use crate::{
    config::AppConfig,
    http::{AppState, ServeConfig},
};

#[derive(Parser, Debug)]
#[command(name = "orderdesk-server", version, about = "Order desk: projects, orders and priced stage options")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP + GraphQL server.
    Serve(ServeCommand),
    /// Run database migrations.
    #[command(subcommand)]
    Migrate(MigrateCommand),
    /// Insert demo projects, orders and options.
    Seed,
    /// Print the GraphQL schema (SDL).
    #[command(name = "schema:print")]
    SchemaPrint {
        #[arg(long, value_name = "FILE", help = "Write to a file instead of stdout")]
        output: Option<PathBuf>,
    },
    /// Derived price maintenance.
    #[command(subcommand)]
    Prices(PricesCommand),
}

#[derive(Subcommand, Debug)]
enum MigrateCommand {
    /// Apply pending migrations.
    Up,
    /// Rollback the most recent migration.
    Down,
    /// List applied and pending migrations.
    Status,
}

#[derive(Subcommand, Debug)]
enum PricesCommand {
    /// Recompute calculated prices of every stage option.
    Recalc,
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, default_value = "0.0.0.0")]
    host: std::net::IpAddr,
    #[arg(long, default_value_t = 8080)]
    port: u16,
    #[arg(long, help = "Allow starting even when migrations are pending")]
    allow_dirty: bool,
}

impl From<&ServeCommand> for ServeConfig {
    fn from(value: &ServeCommand) -> Self {
        ServeConfig::new(value.host, value.port)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            return Err(err).context("failed to read .env");
        }
    }
    init_tracing(ObsConfig::from_env())?;
    let cli = Cli::parse();
    match cli.command {
        Command::Serve(cmd) => {
            let app_config = Arc::new(AppConfig::load()?);
            run_server(cmd, app_config).await
        }
        Command::Migrate(action) => match action {
            MigrateCommand::Up => migrate_up().await,
            MigrateCommand::Down => migrate_down().await,
            MigrateCommand::Status => migrate_status().await,
        },
        Command::Seed => run_seed().await,
        Command::SchemaPrint { output } => schema_print(output),
        Command::Prices(PricesCommand::Recalc) => recalc_prices().await,
    }
}

async fn run_seed() -> Result<()> {
    let pool = setup_pool().await?;
    let seeded = seed_desk_demo(&pool)
        .await
        .context("failed to seed demo data")?;
    if seeded.is_empty() {
        info!("nothing seeded");
    } else {
        info!(
            projects = seeded.projects.len(),
            options = seeded.options.len(),
            "seed complete"
        );
    }
    Ok(())
}

fn schema_print(path: Option<PathBuf>) -> Result<()> {
    let sdl = graphql::schema_sdl();
    match path {
        Some(target) => {
            std::fs::write(&target, sdl)
                .with_context(|| format!("failed to write {}", target.display()))?;
            info!(path = %target.display(), "schema written");
        }
        None => println!("{sdl}"),
    }
    Ok(())
}

async fn recalc_prices() -> Result<()> {
    let pool = setup_pool().await?;
    let changed = recalculate_all_prices(&pool)
        .await
        .context("price recalculation failed")?;
    info!(changed, "prices recalculated");
    Ok(())
}

async fn setup_pool() -> Result<DbPool> {
    let settings = DatabaseSettings::from_env()?;
    connect(&settings).await.map_err(Into::into)
}

async fn run_server(cmd: ServeCommand, config: Arc<AppConfig>) -> Result<()> {
    let pool = setup_pool().await?;
    if config.auto_migrate {
        Migrator::up(&pool, None)
            .await
            .context("automatic migration failed")?;
        info!("database migrations applied on startup");
    }
    ensure_migrations(&pool, cmd.allow_dirty).await?;
    let schema = graphql::build_schema(pool.clone());
    let state = AppState {
        pool,
        schema,
        config,
    };
    http::serve((&cmd).into(), state).await
}

async fn ensure_migrations(pool: &DbPool, allow_dirty: bool) -> Result<()> {
    let pending = Migrator::get_pending_migrations(pool).await?;
    if pending.is_empty() {
        return Ok(());
    }
    if !allow_dirty {
        anyhow::bail!(
            "pending migrations detected; run `orderdesk-server migrate up` or pass --allow-dirty"
        );
    }
    warn!(pending = pending.len(), "starting with pending migrations");
    Ok(())
}

async fn migrate_up() -> Result<()> {
    let pool = setup_pool().await?;
    Migrator::up(&pool, None).await?;
    info!("database migrations applied");
    Ok(())
}

async fn migrate_down() -> Result<()> {
    let pool = setup_pool().await?;
    Migrator::down(&pool, Some(1)).await?;
    info!("most recent migration rolled back");
    Ok(())
}

async fn migrate_status() -> Result<()> {
    let pool = setup_pool().await?;
    for migration in Migrator::get_applied_migrations(&pool).await? {
        println!("applied  {}", migration.name());
    }
    for migration in Migrator::get_pending_migrations(&pool).await? {
        println!("pending  {}", migration.name());
    }
    Ok(())
}
