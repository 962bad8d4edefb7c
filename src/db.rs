use crate::config::{DatabaseConfig, SchemaMode};
use crate::i18n::MessageKey;
use crate::quote::QuoteRequest;
use crate::submission_log::SubmissionStatus;
use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlPool, MySqlPoolOptions};
use sqlx::{Connection, Executor, Statement};
use thiserror::Error;
use tracing::{debug, info};

const CREATE_QUOTE_REQUESTS_TABLE: &str = "CREATE TABLE IF NOT EXISTS quote_requests (
    id INT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
    name VARCHAR(120) NOT NULL,
    phone VARCHAR(32) NOT NULL,
    area VARCHAR(120) NOT NULL,
    service VARCHAR(64) NOT NULL,
    message TEXT NOT NULL,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
) CHARACTER SET utf8mb4 COLLATE utf8mb4_unicode_ci";

const INSERT_QUOTE_REQUEST: &str =
    "INSERT INTO quote_requests (name, phone, area, service, message) VALUES (?, ?, ?, ?, ?)";

/// Why a quote request could not be stored.
///
/// The sqlx error is kept for server-side logging only.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to create database: {0}")]
    Setup(#[source] sqlx::Error),

    #[error("Database unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    #[error("Failed to create quote_requests table: {0}")]
    Schema(#[source] sqlx::Error),

    #[error("Failed to prepare insert: {0}")]
    Prepare(#[source] sqlx::Error),

    #[error("Failed to insert quote request: {0}")]
    Save(#[source] sqlx::Error),
}

impl StorageError {
    /// Message shown to the client.
    pub fn message_key(&self) -> MessageKey {
        match self {
            StorageError::Setup(_) => MessageKey::SetupFailed,
            StorageError::Unavailable(_) => MessageKey::GenericError,
            StorageError::Schema(_) => MessageKey::SchemaFailed,
            StorageError::Prepare(_) => MessageKey::PrepareFailed,
            StorageError::Save(_) => MessageKey::SaveFailed,
        }
    }

    /// Status written to the submission log.
    pub fn log_status(&self) -> SubmissionStatus {
        match self {
            StorageError::Setup(_) => SubmissionStatus::SetupFailed,
            StorageError::Unavailable(_) => SubmissionStatus::DbUnavailable,
            StorageError::Schema(_) => SubmissionStatus::SchemaFailed,
            StorageError::Prepare(_) => SubmissionStatus::PrepareFailed,
            StorageError::Save(_) => SubmissionStatus::SaveFailed,
        }
    }
}

/// Persistence seam for accepted quote requests.
#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// Idempotently create the database and the `quote_requests` table.
    async fn ensure_schema(&self) -> Result<(), StorageError>;

    /// Insert one quote request and return its id.
    async fn save(&self, quote: &QuoteRequest) -> Result<u64, StorageError>;
}

/// MySQL-backed quote storage.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
    server_options: MySqlConnectOptions,
    database: String,
    charset: String,
    schema_mode: SchemaMode,
}

impl MySqlStore {
    /// Build the store without touching the network.
    ///
    /// Pool connections are opened on first use, so the server can start
    /// before the database exists.
    pub fn new(config: &DatabaseConfig, schema_mode: SchemaMode) -> Self {
        let server_options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .charset(&config.charset);

        let pool = MySqlPoolOptions::new()
            .max_connections(10)
            .connect_lazy_with(server_options.clone().database(&config.name));

        Self {
            pool,
            server_options,
            database: config.name.clone(),
            charset: config.charset.clone(),
            schema_mode,
        }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// `CREATE DATABASE IF NOT EXISTS` on a server-level connection.
    pub async fn ensure_database(&self) -> Result<(), StorageError> {
        let mut conn = MySqlConnection::connect_with(&self.server_options)
            .await
            .map_err(StorageError::Setup)?;

        let sql = create_database_sql(&self.database, &self.charset);
        let result = sqlx::query(&sql).execute(&mut conn).await;
        // Close even when the statement failed; the error that matters is the CREATE
        let _ = conn.close().await;
        result.map_err(StorageError::Setup)?;

        debug!("Database `{}` is present", self.database);
        Ok(())
    }

    /// `CREATE TABLE IF NOT EXISTS quote_requests` on the given connection.
    pub async fn ensure_table(conn: &mut MySqlConnection) -> Result<(), StorageError> {
        sqlx::query(CREATE_QUOTE_REQUESTS_TABLE)
            .execute(conn)
            .await
            .map_err(StorageError::Schema)?;
        Ok(())
    }
}

#[async_trait]
impl QuoteStore for MySqlStore {
    async fn ensure_schema(&self) -> Result<(), StorageError> {
        self.ensure_database().await?;

        let mut conn = self.pool.acquire().await.map_err(StorageError::Unavailable)?;
        Self::ensure_table(&mut conn).await?;

        info!("✓ quote_requests schema ready in `{}`", self.database);
        Ok(())
    }

    async fn save(&self, quote: &QuoteRequest) -> Result<u64, StorageError> {
        if self.schema_mode == SchemaMode::PerRequest {
            self.ensure_database().await?;
        }

        // Returned to the pool when dropped, on every path out of this function
        let mut conn = self.pool.acquire().await.map_err(StorageError::Unavailable)?;

        if self.schema_mode == SchemaMode::PerRequest {
            Self::ensure_table(&mut conn).await?;
        }

        let statement = (&mut *conn)
            .prepare(INSERT_QUOTE_REQUEST)
            .await
            .map_err(StorageError::Prepare)?;

        let result = statement
            .query()
            .bind(&quote.name)
            .bind(&quote.phone)
            .bind(&quote.area)
            .bind(quote.service.code())
            .bind(&quote.message)
            .execute(&mut *conn)
            .await
            .map_err(StorageError::Save)?;

        Ok(result.last_insert_id())
    }
}

/// Backtick-quote a MySQL identifier.
fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

fn create_database_sql(database: &str, charset: &str) -> String {
    format!(
        "CREATE DATABASE IF NOT EXISTS {} CHARACTER SET {}",
        quote_identifier(database),
        charset
    )
}
