//! Store connectivity: connect, read `test_connection`, insert one row.
//! A reachable store passes even when the scratch table is missing.

use chrono::Utc;
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use tracing::warn;

use crate::config::{ProbeConfig, StoreTarget};
use crate::store::RestInsightStore;

const PROBE_TABLE: &str = "test_connection";

pub async fn probe_store(config: &ProbeConfig) -> bool {
    println!("\nTesting store connection...");
    match config.store_target() {
        Some(StoreTarget::Postgres { database_url }) => probe_postgres(&database_url).await,
        Some(StoreTarget::Rest {
            base_url,
            service_key,
        }) => probe_rest(base_url, service_key).await,
        None => super::missing_config("store"),
    }
}

async fn probe_postgres(database_url: &str) -> bool {
    let pool = match PgPoolOptions::new()
        .max_connections(1)
        .connect(database_url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            println!("✗ Error connecting to Postgres: {e}");
            return false;
        }
    };
    println!("✓ Successfully connected to Postgres");

    let table_check = async {
        sqlx::query("SELECT id FROM test_connection LIMIT 1")
            .fetch_optional(&pool)
            .await?;
        sqlx::query("INSERT INTO test_connection (name, created_at) VALUES ($1, $2)")
            .bind("test")
            .bind(Utc::now())
            .execute(&pool)
            .await?;
        Ok::<_, sqlx::Error>(())
    };

    report_table_check(table_check.await.map_err(|e| e.to_string()))
}

async fn probe_rest(base_url: String, service_key: String) -> bool {
    let store = match RestInsightStore::new(base_url, service_key) {
        Ok(store) => store,
        Err(e) => {
            println!("✗ Error building REST client: {e}");
            return false;
        }
    };

    // Any HTTP answer proves reachability; a transport error does not.
    let table_check = match store.select_one(PROBE_TABLE).await {
        Err(crate::store::StoreError::Http(e)) => {
            println!("✗ Error connecting to store API: {e}");
            return false;
        }
        Err(e) => Err(e.to_string()),
        Ok(()) => store
            .insert_json(
                PROBE_TABLE,
                &json!({"name": "test", "created_at": Utc::now().to_rfc3339()}),
            )
            .await
            .map_err(|e| e.to_string()),
    };
    println!("✓ Successfully connected to store API");

    report_table_check(table_check)
}

fn report_table_check(result: Result<(), String>) -> bool {
    match result {
        Ok(()) => {
            println!("✓ Test query executed successfully");
            println!("✓ Test data insertion successful");
        }
        Err(note) => {
            warn!("Store reachable but {PROBE_TABLE} check failed: {note}");
            println!("✓ Connected (table operations need setup)");
            println!("Note: {note}");
        }
    }
    true
}
