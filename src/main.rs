use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inventory_dashboard_client::{
    config::AppConfig,
    dto::auth::LoginRequest,
    filter::{ALL, InventoryFilter, OrderFilter},
    models::{InventoryItem, Order},
    services::{auth_service, dashboard_service},
    state::AppState,
};

#[derive(Parser, Debug)]
#[command(name = "inventory-dashboard", about = "Inventory and order dashboard client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List inventory items.
    Inventory {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = ALL)]
        category: String,
        #[arg(long, default_value = ALL)]
        status: String,
    },
    /// Ask the server for items under a stock threshold.
    LowStock {
        #[arg(long, default_value_t = 10)]
        threshold: u32,
    },
    /// List orders.
    Orders {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = ALL)]
        status: String,
    },
    /// Dashboard figures.
    Stats,
    /// Log in and print the issued token (use it as API_TOKEN).
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,inventory_dashboard_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    let state = AppState::from_config(&config)?;
    tracing::info!(api_url = %config.api_url, "dashboard client ready");

    match cli.command {
        Command::Inventory {
            search,
            category,
            status,
        } => {
            state.inventory.refresh().await?;
            let filter = InventoryFilter::new(search, &category, &status);
            let rows = state.inventory.view(&filter);
            println!("Inventory Items ({})", rows.len());
            for item in &rows {
                print_item(item);
            }
        }
        Command::LowStock { threshold } => {
            let rows = state.inventory.fetch_low_stock(threshold).await?;
            println!("Low stock (threshold {threshold}): {}", rows.len());
            for item in &rows {
                print_item(item);
            }
        }
        Command::Orders { search, status } => {
            state.orders.refresh().await?;
            let rows = state.orders.view(&OrderFilter::new(search, &status));
            println!("Orders ({})", rows.len());
            for order in &rows {
                print_order(order);
            }
        }
        Command::Stats => {
            let stats = match dashboard_service::fetch_stats(&state.client).await {
                Ok(stats) => stats,
                Err(err) => {
                    tracing::warn!(error = %err, "stats endpoint failed, computing locally");
                    state.inventory.refresh().await?;
                    state.orders.refresh().await?;
                    let inventory = state.inventory.sync().items();
                    let orders = state.orders.sync().items();
                    dashboard_service::summarize(&inventory, &orders, &config.status_policy)
                }
            };
            println!("Total Revenue    {:.2}", stats.total_revenue);
            println!("Total Orders     {}", stats.total_orders);
            println!("Total Items      {}", stats.inventory_items);
            println!("Low Stock Alerts {}", stats.low_stock_alerts);
        }
        Command::Login { email, password } => {
            let resp =
                auth_service::login_user(&state.client, LoginRequest { email, password }).await?;
            println!("{}", resp.token);
        }
    }

    Ok(())
}

fn print_item(item: &InventoryItem) {
    let expiry = item
        .expiry_date
        .map(|date| date.to_string())
        .unwrap_or_else(|| "-".into());
    println!(
        "{:<8} {:<24} {:<12} {:>6} {:<8} {:>10.2} {:<10} {}",
        item.id.as_deref().unwrap_or("-"),
        item.name,
        item.category,
        item.quantity,
        item.unit,
        item.price,
        expiry,
        item.status().label(),
    );
}

fn print_order(order: &Order) {
    let date = order
        .date
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".into());
    println!(
        "{:<8} {:<24} {:>5} {:>10.2} {:<14} {:<10} {}",
        order.id.as_deref().unwrap_or("-"),
        order.customer_name,
        order.items.count(),
        order.total_amount,
        order.payment_method,
        date,
        order.status,
    );
}
