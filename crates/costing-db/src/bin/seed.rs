//! # Seed Data Generator
//!
//! Populates the database with a starter yarn master list and color
//! legend for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default development database
//! cargo run -p costing-db --bin seed
//!
//! # Specify database path
//! cargo run -p costing-db --bin seed -- --db ./data/costing.db
//! ```
//!
//! ## Generated Data
//! - Plain counts 10s-100s and the common plied counts (2/40s, 2/60s, ...)
//! - Hank weight scales inversely with the count number
//! - A twelve-color legend numbered 1-12
//!
//! Seeding is skipped when the yarn master list is not empty.

use std::env;

use costing_core::yarn::sort_count_labels;
use costing_core::ColorLegendEntry;
use costing_db::{Database, DbConfig};

/// Plain counts with their price per kg in rupees.
const PLAIN_COUNTS: &[(u32, f64)] = &[
    (10, 180.0),
    (16, 195.0),
    (20, 210.0),
    (30, 230.0),
    (40, 250.0),
    (50, 275.0),
    (60, 300.0),
    (80, 360.0),
    (100, 420.0),
];

/// Plied counts as (strands, base count, price per kg).
const PLIED_COUNTS: &[(u32, u32, f64)] = &[
    (2, 40, 310.0),
    (2, 60, 360.0),
    (2, 80, 430.0),
    (2, 100, 500.0),
];

const LEGEND: &[(&str, &str)] = &[
    ("#FFFFFF", "White"),
    ("#000000", "Black"),
    ("#000080", "Navy"),
    ("#FF0000", "Red"),
    ("#800000", "Maroon"),
    ("#008000", "Green"),
    ("#808000", "Olive"),
    ("#FFFF00", "Yellow"),
    ("#FFA500", "Orange"),
    ("#87CEEB", "Sky Blue"),
    ("#808080", "Grey"),
    ("#F5F5DC", "Beige"),
];

/// Hank weight of a count: a 40s yarn weighs 0.4, thicker yarns more.
fn hank_weight(strands: u32, base: u32) -> f64 {
    let weight = 16.0 * strands as f64 / base as f64;
    (weight * 1000.0).round() / 1000.0
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./costing_dev.db");

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
                println!("Fabric Costing Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./costing_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Fabric Costing Seed Data Generator");
    println!("=====================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.yarns().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} yarn counts", existing);
        println!("  Skipping seed to avoid overwriting prices.");
        return Ok(());
    }

    println!();
    println!("Seeding yarn master list...");

    let plain = PLAIN_COUNTS
        .iter()
        .map(|&(count, price)| (format!("{}s", count), hank_weight(1, count), price));
    let plied = PLIED_COUNTS.iter().map(|&(strands, base, price)| {
        (format!("{}/{}s", strands, base), hank_weight(strands, base), price)
    });

    let mut seeded = 0;
    for (label, hank, price) in plain.chain(plied) {
        if let Err(e) = db.yarns().upsert(&label, hank, price, "seed").await {
            eprintln!("Failed to insert {}: {}", label, e);
            continue;
        }
        seeded += 1;
    }
    println!("✓ Seeded {} yarn counts", seeded);

    let labels: Vec<String> = db.yarns().list().await?.into_iter().map(|y| y.label).collect();
    println!("  Dropdown order: {}", sort_count_labels(&labels).join(", "));

    println!();
    println!("Seeding color legend...");
    if db.color_legend().list().await?.is_empty() {
        for (serial, (color, label)) in LEGEND.iter().enumerate() {
            let entry = ColorLegendEntry {
                color: color.to_string(),
                label: label.to_string(),
                serial_number: serial as u32 + 1,
            };
            db.color_legend().insert(&entry).await?;
        }
        println!("✓ Seeded {} legend colors", LEGEND.len());
    } else {
        println!("  Legend already present, skipped");
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
