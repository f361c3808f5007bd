use bankline_core::{LedgerStore, PgStore, SecurityConfig};
use bankline_primitives::models::app_config::AppConfig;
use bankline_primitives::models::entities::{AppRole, NewAccount};
use bankline_primitives::utility::generate_account_number;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use dotenvy::dotenv;
use eyre::{eyre, Report};
use secrecy::ExposeSecret;
use tracing::info;
use uuid::Uuid;

struct Seed {
    email: &'static str,
    name: &'static str,
    checking: i64,
    savings: i64,
    admin: bool,
}

const SEEDS: [Seed; 3] = [
    Seed {
        email: "admin@bankline.test",
        name: "Admin User",
        checking: 0,
        savings: 0,
        admin: true,
    },
    Seed {
        email: "alice@bankline.test",
        name: "Alice Demo",
        checking: 500_000, // $5,000.00
        savings: 1_250_000,
        admin: false,
    },
    Seed {
        email: "bob@bankline.test",
        name: "Bob Demo",
        checking: 20_000,
        savings: 0,
        admin: false,
    },
];

fn main() -> Result<(), Report> {
    dotenv().ok();
    tracing_subscriber::fmt().with_target(false).init();

    let config = AppConfig::from_env()?;
    let url = config
        .database_url
        .as_ref()
        .ok_or_else(|| eyre!("DATABASE_URL must be set"))?;

    info!("Seeding database...");

    let pool = Pool::builder()
        .max_size(2)
        .build(ConnectionManager::<PgConnection>::new(url.expose_secret()))?;
    let store = PgStore::new(pool);
    store
        .run_migrations()
        .map_err(|e| eyre!("migrations failed: {}", e))?;

    clean_db(&store)?;

    let store: &dyn LedgerStore = &store;
    for seed in &SEEDS {
        let user_id = Uuid::new_v4();

        store
            .run(|tx| {
                tx.insert_account(NewAccount {
                    user_id,
                    email: seed.email.to_string(),
                    full_name: seed.name.to_string(),
                    account_number: generate_account_number(),
                    checking_balance: seed.checking,
                    savings_balance: seed.savings,
                })?;
                tx.grant_role(user_id, AppRole::User)?;
                if seed.admin {
                    tx.grant_role(user_id, AppRole::Admin)?;
                }
                Ok(())
            })
            .map_err(|e| eyre!("failed to seed {}: {}", seed.email, e))?;

        let token = SecurityConfig::create_token(&config, user_id, Some(seed.email))
            .map_err(|e| eyre!("failed to mint token: {}", e))?;

        println!("{} ({})", seed.email, user_id);
        println!("  Bearer {}", token);
    }

    info!("Database seeded successfully");
    Ok(())
}

fn clean_db(store: &PgStore) -> Result<(), Report> {
    info!("Cleaning database...");
    let mut conn = store.pool().get()?;
    diesel::sql_query(
        "TRUNCATE notifications, ledger_entries, loans, beneficiaries, user_roles, audit_logs, accounts CASCADE",
    )
    .execute(&mut conn)?;
    Ok(())
}
