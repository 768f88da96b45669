//! # Seed Data Generator
//!
//! Populates the database with the demo storefront catalog.
//!
//! ## Usage
//! ```bash
//! # Seed the full catalog
//! cargo run -p tienda-db --bin seed
//!
//! # Limit how many products are inserted
//! cargo run -p tienda-db --bin seed -- --count 10
//!
//! # Specify database path
//! cargo run -p tienda-db --bin seed -- --db ./data/tienda.db
//! ```
//!
//! ## Generated Products
//! Creates the catalog the storefront browses:
//! - electronics (drives, monitors)
//! - jewelery (rings, bracelets)
//! - men's clothing / women's clothing
//!
//! Each product has a title, description, price in cents, stock level,
//! category, and picture URL.

use chrono::Utc;
use std::env;
use tienda_core::Product;
use tienda_db::{Database, DbConfig};
use tracing_subscriber::EnvFilter;

/// One catalog entry, inserted as-is.
struct SeedProduct {
    title: &'static str,
    description: &'static str,
    price_cents: i64,
    stock: i64,
    category: &'static str,
    picture: &'static str,
}

/// The demo catalog.
const CATALOG: &[SeedProduct] = &[
    SeedProduct {
        title: "Fjallraven - Foldsack No. 1 Backpack, Fits 15 Laptops",
        description: "Everyday backpack with a padded sleeve for laptops up to 15 inches.",
        price_cents: 10995,
        stock: 18,
        category: "men's clothing",
        picture: "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
    },
    SeedProduct {
        title: "Mens Casual Premium Slim Fit T-Shirts",
        description: "Slim-fitting style, contrast raglan long sleeve, lightweight fabric.",
        price_cents: 2230,
        stock: 40,
        category: "men's clothing",
        picture: "https://fakestoreapi.com/img/71-3HjGNDUL._AC_SY879._SX._UX._SY._UY_.jpg",
    },
    SeedProduct {
        title: "Mens Cotton Jacket",
        description: "Great outerwear jacket for spring, autumn and winter.",
        price_cents: 5599,
        stock: 22,
        category: "men's clothing",
        picture: "https://fakestoreapi.com/img/71li-ujtlUL._AC_UX679_.jpg",
    },
    SeedProduct {
        title: "Mens Casual Slim Fit",
        description: "Casual henley shirt in a slim fit cut.",
        price_cents: 1599,
        stock: 35,
        category: "men's clothing",
        picture: "https://fakestoreapi.com/img/71YXzeOuslL._AC_UY879_.jpg",
    },
    SeedProduct {
        title: "John Hardy Women's Legends Naga Gold & Silver Dragon Station Chain Bracelet",
        description: "Naga collection bracelet inspired by the mythical water dragon.",
        price_cents: 69500,
        stock: 3,
        category: "jewelery",
        picture: "https://fakestoreapi.com/img/71pWzhdJNwL._AC_UL640_QL65_ML3_.jpg",
    },
    SeedProduct {
        title: "Solid Gold Petite Micropave",
        description: "Satisfaction guaranteed. Designed and sold by Hafeez Center.",
        price_cents: 16800,
        stock: 8,
        category: "jewelery",
        picture: "https://fakestoreapi.com/img/61sbMiUnoGL._AC_UL640_QL65_ML3_.jpg",
    },
    SeedProduct {
        title: "White Gold Plated Princess",
        description: "Classic created wedding engagement solitaire ring.",
        price_cents: 999,
        stock: 15,
        category: "jewelery",
        picture: "https://fakestoreapi.com/img/71YAIFU48IL._AC_UL640_QL65_ML3_.jpg",
    },
    SeedProduct {
        title: "Pierced Owl Rose Gold Plated Stainless Steel Double",
        description: "Rose gold plated double flared tunnel plug earrings.",
        price_cents: 1099,
        stock: 20,
        category: "jewelery",
        picture: "https://fakestoreapi.com/img/51UDEzMJVpL._AC_UL640_QL65_ML3_.jpg",
    },
    SeedProduct {
        title: "WD 2TB Elements Portable External Hard Drive",
        description: "USB 3.0 portable drive for fast data transfers and backups.",
        price_cents: 6400,
        stock: 25,
        category: "electronics",
        picture: "https://fakestoreapi.com/img/61IBBVJvSDL._AC_SY879_.jpg",
    },
    SeedProduct {
        title: "SanDisk SSD PLUS 1TB Internal SSD",
        description: "Easy upgrade for faster boot-up, shutdown and application load.",
        price_cents: 10900,
        stock: 30,
        category: "electronics",
        picture: "https://fakestoreapi.com/img/61U7T1koQqL._AC_SX679_.jpg",
    },
    SeedProduct {
        title: "Silicon Power 256GB SSD 3D NAND A55",
        description: "3D NAND flash with SLC cache for performance boost.",
        price_cents: 9200,
        stock: 28,
        category: "electronics",
        picture: "https://fakestoreapi.com/img/71kWymZ+c+L._AC_SX679_.jpg",
    },
    SeedProduct {
        title: "Acer SB220Q bi 21.5 inches Full HD IPS Monitor",
        description: "Ultra-thin 21.5 inch Full HD widescreen IPS display.",
        price_cents: 59900,
        stock: 12,
        category: "electronics",
        picture: "https://fakestoreapi.com/img/81QpkIctqPL._AC_SX679_.jpg",
    },
    SeedProduct {
        title: "Samsung 49-Inch CHG90 144Hz Curved Gaming Monitor",
        description: "Super ultrawide 32:9 curved gaming monitor with QLED.",
        price_cents: 99999,
        stock: 5,
        category: "electronics",
        picture: "https://fakestoreapi.com/img/81Zt42ioCgL._AC_SX679_.jpg",
    },
    SeedProduct {
        title: "BIYLACLESEN Women's 3-in-1 Snowboard Jacket Winter Coats",
        description: "Detachable liner fleece jacket for winter sports.",
        price_cents: 5699,
        stock: 14,
        category: "women's clothing",
        picture: "https://fakestoreapi.com/img/51Y5NI-I5jL._AC_UX679_.jpg",
    },
    SeedProduct {
        title: "Lock and Love Women's Removable Hooded Faux Leather Moto Biker Jacket",
        description: "Faux leather biker jacket with removable hood.",
        price_cents: 2999,
        stock: 10,
        category: "women's clothing",
        picture: "https://fakestoreapi.com/img/81XH0e8fefL._AC_UY879_.jpg",
    },
    SeedProduct {
        title: "Rain Jacket Women Windbreaker Striped Climbing Raincoats",
        description: "Lightweight hooded windbreaker with striped lining.",
        price_cents: 3995,
        stock: 16,
        category: "women's clothing",
        picture: "https://fakestoreapi.com/img/71HblAHs5xL._AC_UY879_-2.jpg",
    },
    SeedProduct {
        title: "MBJ Women's Solid Short Sleeve Boat Neck V",
        description: "Lightweight fabric with great stretch for comfort.",
        price_cents: 985,
        stock: 50,
        category: "women's clothing",
        picture: "https://fakestoreapi.com/img/71z3kpMAYsL._AC_UY879_.jpg",
    },
    SeedProduct {
        title: "Opna Women's Short Sleeve Moisture",
        description: "Moisture-wicking, value-priced performance tee.",
        price_cents: 795,
        stock: 45,
        category: "women's clothing",
        picture: "https://fakestoreapi.com/img/51eg55uWmdL._AC_UX679_.jpg",
    },
    SeedProduct {
        title: "DANVOUY Womens T Shirt Casual Cotton Short",
        description: "Casual cotton tee with letter print.",
        price_cents: 1299,
        stock: 30,
        category: "women's clothing",
        picture: "https://fakestoreapi.com/img/61pHAEJ4NML._AC_UX679_.jpg",
    },
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = CATALOG.len();
    let mut db_path = String::from("./tienda_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(CATALOG.len());
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Tienda Catalog Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Maximum products to insert (default: full catalog)");
                println!("  -d, --db <PATH>    Database file path (default: ./tienda_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Tienda Catalog Seeder");
    println!("========================");
    println!("Database: {}", db_path);
    println!("Products: {}", count.min(CATALOG.len()));
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing products
    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Insert the catalog
    println!();
    println!("Inserting catalog...");

    let now = Utc::now();
    let mut inserted = 0;
    let start = std::time::Instant::now();

    for entry in CATALOG.iter().take(count) {
        let product = Product {
            id: 0, // assigned by the database
            title: entry.title.to_string(),
            description: Some(entry.description.to_string()),
            price_cents: entry.price_cents,
            stock: entry.stock,
            category: Some(entry.category.to_string()),
            picture_url: Some(entry.picture.to_string()),
            created_at: now,
            updated_at: now,
        };

        if let Err(e) = db.products().insert(&product).await {
            eprintln!("Failed to insert {}: {}", entry.title, e);
            continue;
        }

        inserted += 1;
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Inserted {} products in {:?}", inserted, elapsed);

    // Verify category browsing
    println!();
    println!("Verifying categories...");
    for category in ["electronics", "jewelery", "men's clothing", "women's clothing"] {
        let products = db.products().list_by_category(category, 50).await?;
        println!("  {}: {} products", category, products.len());
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=tienda=trace` - Show trace for tienda crates only
/// - Default: INFO level
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tienda=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
