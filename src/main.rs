use dotenvy::dotenv;
use ledger_views::{
    config::{database, ledger},
    core::{report, view},
    errors::{Error, Result},
};
use std::path::Path;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_LIMIT: i64 = 10;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, env vars can also be set externally
    dotenv().ok();

    // 3. Connect and make sure the schema exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db).await?;

    // 4. Seed from config.toml when present
    if Path::new("config.toml").exists() {
        let config = ledger::load_default_config()
            .inspect_err(|e| error!("Failed to load config.toml: {}", e))?;
        ledger::seed_ledger(&db, &config).await?;
    } else {
        info!("No config.toml found, skipping seed");
    }

    // 5. Materialize due views and list them
    let today = chrono::Local::now().date_naive();
    let names = view::reconcile_and_list_view_names(&db, today).await?;
    info!(count = names.len(), "Views: {:?}", names);

    // 6. Optionally report on one view: `ledger-views VIEW [LIMIT]`
    let mut args = std::env::args().skip(1);
    if let Some(view_name) = args.next() {
        let limit = match args.next() {
            Some(raw) => raw.parse::<i64>().map_err(|e| Error::InvalidInput {
                message: format!("Invalid limit '{raw}': {e}"),
            })?,
            None => DEFAULT_LIMIT,
        };

        let result = report::query(&db, &view_name, limit).await;
        if let Err(Error::ViewNotFound { name }) = &result {
            warn!("No view named '{}'", name);
        }
        let view_report = result?;

        for (category, total) in &view_report.by_category {
            info!(view = %view_name, %category, %total, "Category total");
        }
        for (bucket, total) in &view_report.by_time {
            info!(view = %view_name, %bucket, %total, "Time bucket total");
        }
        for entry in &view_report.raw {
            info!(
                view = %view_name,
                amount = %entry.amount,
                time = %entry.given_time,
                category = %entry.category_name,
                "{}",
                entry.description
            );
        }
    }

    Ok(())
}
