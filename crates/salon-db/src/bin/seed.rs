//! # Seed Data Generator
//!
//! Populates a salon database with the demo catalog for development.
//!
//! ## Usage
//! ```bash
//! cargo run -p salon-db --bin seed
//!
//! # Specify database path
//! cargo run -p salon-db --bin seed -- --db ./data/salon.db
//! ```

use std::env;

use salon_core::demo_catalog;
use salon_db::{Database, DbConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./salon_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Salon Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./salon_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Salon Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.services().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} services", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let catalog = demo_catalog();

    for (i, service) in catalog.services().iter().enumerate() {
        if let Err(e) = db.services().insert(service, i as i64).await {
            eprintln!("Failed to insert service {}: {}", service.id, e);
        }
    }
    for (i, employee) in catalog.employees().iter().enumerate() {
        if let Err(e) = db.employees().insert(employee, i as i64).await {
            eprintln!("Failed to insert employee {}: {}", employee.id, e);
        }
    }

    println!();
    println!(
        "✓ Seeded {} services and {} employees",
        db.services().count().await?,
        db.employees().count().await?
    );
    for group in catalog.services_by_category() {
        println!("  {:<12} {}", group.category, group.items.len());
    }

    db.close().await;
    Ok(())
}
