use anyhow::Context;
use creditbook::{config::Config, db::init_db, BalanceCalculator, LedgerService, SqliteStore};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    let config = Config::from_env().context("Configuration error")?;
    let categories = config
        .category_registry()
        .context("Failed to load categories")?;
    tracing::info!(count = categories.categories().len(), "Categories ready");

    let pool = init_db(&config.database_path)
        .await
        .context("Failed to initialize database")?;

    let ledger = LedgerService::new(
        Arc::new(SqliteStore::new(pool)),
        BalanceCalculator::new(config.override_table()),
        Arc::new(config.week_calendar()),
    );

    let today = chrono::Local::now().date_naive();
    let window = ledger.week_containing(today)?;
    let report = ledger.paper_report(window).await?;

    println!("Paper ledger {} to {}", window.from, window.to);
    for balances in &report {
        println!(
            "{:<10} main {:>12} panel1 {:>12} panel2 {:>12}",
            balances.client_code,
            balances.main.balance.to_fixed(2),
            balances.panel1.balance.to_fixed(2),
            balances.panel2.balance.to_fixed(2),
        );
    }
    tracing::info!(clients = report.len(), "Report complete");

    Ok(())
}
