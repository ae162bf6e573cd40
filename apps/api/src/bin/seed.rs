//! Seeds a database with a demo account.
//!
//! ```text
//! cargo run -p stockroom-api --bin seed
//! ```
//!
//! Creates `demo@stockroom.local` (password `demo1234`), a handful of
//! products and stock lots expiring over the next few weeks, so
//! `/stocks/expiring/` has something to show. Does nothing if the demo
//! account already exists.

use anyhow::Context;
use chrono::{Days, Utc};
use tracing::info;

use stockroom_api::auth::hash_password;
use stockroom_api::{init_tracing, ApiConfig};
use stockroom_core::{Money, NewProduct, NewStock};
use stockroom_db::Database;

const DEMO_EMAIL: &str = "demo@stockroom.local";
const DEMO_PASSWORD: &str = "demo1234";

/// (name, category, price, [(quantity, days until expiry)])
const CATALOG: &[(&str, &str, f64, &[(i64, u64)])] = &[
    ("Whole Milk 1L", "Dairy", 1.19, &[(12, 2), (24, 9)]),
    ("Greek Yogurt 500g", "Dairy", 2.49, &[(8, 5)]),
    ("Sourdough Loaf", "Bakery", 3.75, &[(6, 1), (6, 3)]),
    ("Free-range Eggs x12", "Eggs", 4.20, &[(30, 21)]),
    ("Orange Juice 1L", "Drinks", 2.99, &[(18, 14), (10, 40)]),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load().context("Invalid configuration")?;
    let db = Database::new(config.db_config())
        .await
        .context("Failed to open database")?;

    if db.users().exists_by_email(DEMO_EMAIL).await? {
        info!(email = DEMO_EMAIL, "Demo account already exists, nothing to do");
        return Ok(());
    }

    let password_hash = hash_password(DEMO_PASSWORD).context("Failed to hash demo password")?;
    let user_id = db.users().create("demo", DEMO_EMAIL, &password_hash).await?;

    let today = Utc::now().date_naive();
    let mut lots = 0;

    for (name, category, price, stock) in CATALOG {
        let price = Money::from_decimal(*price).context("Invalid demo price")?;
        let product_id = db
            .products()
            .create(&NewProduct {
                product_name: name.to_string(),
                category: category.to_string(),
                price_cents: price.cents(),
                user_id,
            })
            .await?;

        for (quantity, days) in stock.iter() {
            let expiry_date = today
                .checked_add_days(Days::new(*days))
                .context("Expiry date out of range")?;
            db.stocks()
                .create(&NewStock {
                    product_id,
                    stock_quantity: *quantity,
                    expiry_date,
                    user_id,
                })
                .await?;
            lots += 1;
        }
    }

    info!(
        user_id,
        products = CATALOG.len(),
        lots,
        email = DEMO_EMAIL,
        "Demo data seeded"
    );

    db.close().await;
    Ok(())
}
