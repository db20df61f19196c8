use anyhow::Context;
use clap::Parser;
use small_storefront::core::ConfigProvider;
use small_storefront::utils::{logger, validation::Validate};
use small_storefront::{CartManager, CliConfig, FileStore, HttpCatalog, Storefront, TomlConfig};
use std::sync::Arc;

/// What the screen session should do after mounting.
struct Session {
    category: Option<String>,
    toggle: Vec<u64>,
    columns: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting small-storefront");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    match &cli.config {
        Some(path) => {
            let file_config = TomlConfig::from_file(path)
                .with_context(|| format!("failed to load config file {}", path))?;
            let session = Session {
                category: cli
                    .category
                    .clone()
                    .or_else(|| file_config.category().map(str::to_string)),
                toggle: cli.toggle.clone(),
                columns: file_config.columns(),
            };
            run(&file_config, session).await
        }
        None => {
            let session = Session {
                category: cli.category.clone(),
                toggle: cli.toggle.clone(),
                columns: cli.columns,
            };
            run(&cli, session).await
        }
    }
}

async fn run<C: ConfigProvider + Validate>(config: &C, session: Session) -> anyhow::Result<()> {
    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("{}", e.user_friendly_message());
        std::process::exit(1);
    }

    let catalog = HttpCatalog::new(config)?;
    let store = Arc::new(FileStore::new(config.store_path()));
    let cart = CartManager::new(store, config.cart_key());
    let mut screen = Storefront::new(catalog, cart);

    let report = screen.mount().await;
    if report.fetch_failures > 0 {
        eprintln!("Some catalog data could not be loaded; showing what is available.");
    }

    if let Some(category) = session.category.as_deref() {
        if !screen.select_category(Some(category)) {
            eprintln!("Unknown category '{}', showing all products.", category);
        }
    }

    for id in &session.toggle {
        match screen.tap(*id) {
            Some(true) => tracing::info!("Added product {} to cart", id),
            Some(false) => tracing::info!("Removed product {} from cart", id),
            None => eprintln!("No product with id {} in the catalog.", id),
        }
    }

    let status = screen.cart().flush().await?;
    if status.failed_attempts > 0 {
        if let Some(error) = &status.last_error {
            eprintln!("Cart could not be saved: {}", error);
        }
    }

    println!("{}", screen.render(session.columns));
    Ok(())
}
