//! Per-test PostgreSQL databases inside one shared container.
//!
//! The container starts on first use and lives for the whole test binary.
//! Every [`TestDb`] gets its own freshly migrated database, so service tests
//! commit normally and never see each other's rows. Databases are dropped by a
//! background task once their `TestDb` goes away.

use once_cell::sync::Lazy;
use sqlx::{Connection, PgConnection, PgPool};
use testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres as PostgresImage;
use tokio::sync::{OnceCell, mpsc};
use uuid::Uuid;

const SUPERUSER: &str = "elysian_test";
const PASSWORD: &str = "elysian_test_password";
const PG_PORT: u16 = 5432;

static CONTAINER: Lazy<OnceCell<ContainerAsync<PostgresImage>>> = Lazy::new(OnceCell::new);

static DROP_QUEUE: Lazy<OnceCell<mpsc::UnboundedSender<String>>> = Lazy::new(OnceCell::new);

fn host() -> String {
    std::env::var("TESTCONTAINERS_HOST_OVERRIDE").unwrap_or_else(|_| "localhost".to_string())
}

fn url(port: u16, database: &str) -> String {
    format!("postgresql://{SUPERUSER}:{PASSWORD}@{}:{port}/{database}", host())
}

/// Generated names only ever contain `[a-z0-9_]`, so they are safe to quote.
fn unique_name() -> String {
    format!("elysian_test_{}", Uuid::new_v4().simple())
}

async fn container() -> &'static ContainerAsync<PostgresImage> {
    CONTAINER
        .get_or_init(|| async {
            PostgresImage::default()
                .with_user(SUPERUSER)
                .with_password(PASSWORD)
                .with_db_name(SUPERUSER)
                .with_env_var("POSTGRES_INITDB_ARGS", "--auth-host=trust")
                .start()
                .await
                .expect("start postgres container")
        })
        .await
}

async fn admin_connection() -> Result<PgConnection, sqlx::Error> {
    let port = container()
        .await
        .get_host_port_ipv4(PG_PORT)
        .await
        .map_err(|error| sqlx::Error::Configuration(error.into()))?;

    PgConnection::connect(&url(port, "postgres")).await
}

async fn drop_queue() -> &'static mpsc::UnboundedSender<String> {
    DROP_QUEUE
        .get_or_init(|| async {
            let (sender, mut receiver) = mpsc::unbounded_channel::<String>();

            tokio::spawn(async move {
                while let Some(name) = receiver.recv().await {
                    if let Err(error) = drop_database(&name).await {
                        eprintln!("failed to drop test database {name}: {error}");
                    }
                }
            });

            sender
        })
        .await
}

async fn drop_database(name: &str) -> Result<(), sqlx::Error> {
    let mut conn = admin_connection().await?;

    sqlx::query(&format!("DROP DATABASE IF EXISTS \"{name}\" WITH (FORCE)"))
        .execute(&mut conn)
        .await?;

    conn.close().await
}

/// An isolated, migrated database.
#[derive(Debug)]
pub struct TestDb {
    pool: PgPool,
    name: String,
}

impl TestDb {
    pub async fn new() -> Self {
        drop_queue().await;

        let name = unique_name();

        let mut admin = admin_connection().await.expect("connect as superuser");

        sqlx::query(&format!("CREATE DATABASE \"{name}\""))
            .execute(&mut admin)
            .await
            .expect("create test database");

        admin.close().await.expect("close admin connection");

        let port = container()
            .await
            .get_host_port_ipv4(PG_PORT)
            .await
            .expect("container port");

        let pool = PgPool::connect(&url(port, &name))
            .await
            .expect("connect to test database");

        sqlx::migrate!("../../migrations")
            .run(&pool)
            .await
            .expect("migrate test database");

        Self { pool, name }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        if let Some(queue) = DROP_QUEUE.get() {
            _ = queue.send(self.name.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_names_are_plain_identifiers() {
        let name = unique_name();

        assert!(name.len() <= 63, "postgres truncates identifiers past 63 bytes");
        assert!(
            name.chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'),
            "unexpected character in {name}"
        );
        assert_ne!(name, unique_name());
    }

    #[tokio::test]
    async fn migrations_create_the_schema() {
        let db = TestDb::new().await;

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT table_name::text FROM information_schema.tables
             WHERE table_schema = 'public' ORDER BY table_name",
        )
        .fetch_all(db.pool())
        .await
        .expect("list tables");

        for table in ["carts", "cart_items", "categories", "orders", "payments", "sessions", "users"] {
            assert!(
                tables.iter().any(|name| name == table),
                "missing table {table} in {tables:?}"
            );
        }
    }

    #[tokio::test]
    async fn databases_are_isolated() {
        let first = TestDb::new().await;
        let second = TestDb::new().await;

        sqlx::query("CREATE TABLE scratch (id INTEGER)")
            .execute(first.pool())
            .await
            .expect("create table in first database");

        let seen = sqlx::query("SELECT 1 FROM scratch")
            .fetch_optional(second.pool())
            .await;

        assert!(seen.is_err(), "second database should not see the table");
    }
}
