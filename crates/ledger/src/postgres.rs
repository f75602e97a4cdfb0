use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    NewTransaction, Result, SequenceId, StockTransaction, TransactionId, TransactionKind,
    store::{LedgerStore, TransactionStream},
};

/// Advisory lock key serializing sequence assignment across connections.
const APPEND_LOCK_KEY: i64 = 0x5f6c_6564_6765_7231; // "_ledger1"

/// PostgreSQL-backed ledger store.
#[derive(Clone)]
pub struct PostgresLedgerStore {
    pool: PgPool,
}

impl PostgresLedgerStore {
    /// Creates a new PostgreSQL ledger store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_transaction(row: PgRow) -> Result<StockTransaction> {
        let kind_str: String = row.try_get("kind")?;
        let kind = TransactionKind::parse(&kind_str).ok_or_else(|| {
            sqlx::Error::Decode(format!("unknown transaction kind {kind_str:?}").into())
        })?;

        Ok(StockTransaction {
            id: TransactionId::from_uuid(row.try_get::<Uuid, _>("id")?),
            sequence_id: SequenceId::new(row.try_get("sequence_id")?),
            kind,
            product_sku: row.try_get::<String, _>("product_sku")?.into(),
            warehouse_code: row.try_get::<String, _>("warehouse_code")?.into(),
            quantity: row.try_get("quantity")?,
            reference: row.try_get("reference")?,
            recorded_at: row.try_get("recorded_at")?,
        })
    }
}

#[async_trait]
impl LedgerStore for PostgresLedgerStore {
    #[tracing::instrument(skip(self, txn), fields(cell = %txn.cell_key()))]
    async fn append(&self, txn: NewTransaction) -> Result<StockTransaction> {
        let mut tx = self.pool.begin().await?;

        // Serialize sequence assignment globally. The advisory lock is
        // transaction-scoped and released on commit or rollback, so a
        // failed insert consumes no sequence number.
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(APPEND_LOCK_KEY)
            .execute(&mut *tx)
            .await?;

        let current: Option<i64> =
            sqlx::query_scalar("SELECT MAX(sequence_id) FROM stock_transactions")
                .fetch_one(&mut *tx)
                .await?;
        let sequence_id = SequenceId::new(current.unwrap_or(0) + 1);

        let stored = txn.into_stored(sequence_id);
        sqlx::query(
            r#"
            INSERT INTO stock_transactions
                (sequence_id, id, kind, product_sku, warehouse_code, quantity, reference, recorded_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(stored.sequence_id.as_i64())
        .bind(stored.id.as_uuid())
        .bind(stored.kind.as_str())
        .bind(stored.product_sku.as_str())
        .bind(stored.warehouse_code.as_str())
        .bind(stored.quantity)
        .bind(&stored.reference)
        .bind(stored.recorded_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        metrics::counter!("ledger_transactions_appended").increment(1);
        Ok(stored)
    }

    async fn list_since(&self, cursor: SequenceId) -> Result<TransactionStream> {
        use futures_util::stream;

        let rows = sqlx::query(
            r#"
            SELECT sequence_id, id, kind, product_sku, warehouse_code, quantity, reference, recorded_at
            FROM stock_transactions
            WHERE sequence_id > $1
            ORDER BY sequence_id ASC
            "#,
        )
        .bind(cursor.as_i64())
        .fetch_all(&self.pool)
        .await?;

        let transactions: Vec<Result<StockTransaction>> =
            rows.into_iter().map(Self::row_to_transaction).collect();

        Ok(Box::pin(stream::iter(transactions)))
    }

    async fn head(&self) -> Result<SequenceId> {
        let current: Option<i64> =
            sqlx::query_scalar("SELECT MAX(sequence_id) FROM stock_transactions")
                .fetch_one(&self.pool)
                .await?;
        Ok(SequenceId::new(current.unwrap_or(0)))
    }
}
