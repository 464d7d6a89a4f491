use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing::{error, info, warn};

use restock_sentry::checker::StockChecker;
use restock_sentry::config::AppConfig;
use restock_sentry::markup::SizeAvailability;
use restock_sentry::notifier::EmailNotifier;

/// Checks one product page for one size and emails when it is back in stock.
///
/// Configuration comes from the environment (PRODUCT_URL,
/// VERIFIED_SENDER_EMAIL, SENDGRID_API_KEY); flags override individual
/// fields for a single run.
#[derive(Debug, Parser)]
#[command(name = "restock-sentry", version, about)]
struct Cli {
    /// Product page to check (overrides PRODUCT_URL)
    #[arg(long)]
    url: Option<String>,

    /// Size label to look for (overrides DESIRED_SIZE)
    #[arg(long)]
    size: Option<String>,

    /// Write a diagnostic screenshot of the rendered page to this path
    #[arg(long, value_name = "PATH")]
    screenshot: Option<PathBuf>,

    /// Run the stock check but never send the email
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn apply(self, mut config: AppConfig) -> AppConfig {
        if let Some(url) = self.url {
            config.product.url = url;
        }
        if let Some(size) = self.size {
            config.product.size = size;
        }
        if let Some(path) = self.screenshot {
            config.checker.screenshot_path = Some(path);
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("restock_sentry=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    process::exit(run(cli).await);
}

// Exit codes: 0 = check completed, 1 = check failed or indeterminate,
// 2 = bad configuration. A failed email send still exits 0.
async fn run(cli: Cli) -> i32 {
    let dry_run = cli.dry_run;

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            error!("Set PRODUCT_URL, VERIFIED_SENDER_EMAIL and SENDGRID_API_KEY before running.");
            return 2;
        }
    };
    let config = cli.apply(config);

    info!(
        "Checking size '{}' at {}",
        config.product.size, config.product.url
    );

    let checker = StockChecker::new(config.checker.clone());
    let availability = match checker
        .check(&config.product.url, &config.product.size)
        .await
    {
        Ok(availability) => availability,
        Err(e) => {
            error!("Stock check failed: {}", e);
            return 1;
        }
    };

    match availability {
        SizeAvailability::InStock => {
            info!(
                ">>> STOCK ALERT: Size '{}' is IN STOCK! <<<",
                config.product.size
            );

            if dry_run {
                info!("Dry run, skipping the notification email");
                return 0;
            }

            let notifier = EmailNotifier::new(config.email.clone());
            match notifier
                .notify_restock(&config.product.url, &config.product.size)
                .await
            {
                Ok(()) => info!("Notification process complete"),
                // Delivery failure is logged but never fails the run.
                Err(e) => error!("Failed to send notification email: {}", e),
            }
            0
        }
        SizeAvailability::OutOfStock => {
            info!("Size '{}' is still OUT of stock", config.product.size);
            0
        }
        SizeAvailability::Unknown => {
            warn!(
                "Could not find a size selector for '{}'; treating as not available",
                config.product.size
            );
            1
        }
    }
}
