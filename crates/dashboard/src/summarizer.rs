use serde::Serialize;

use crate::{EntityCounters, ThresholdPolicy};
use aggregator::StockAggregator;
use common::{Sku, WarehouseCode};

/// Entity totals shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardTotals {
    pub products: usize,
    pub customers: usize,
    pub suppliers: usize,
    pub open_sales_orders: usize,
    pub invoices: usize,
    pub payments: usize,
    /// Distinct stock cells with nonzero on-hand or reserved.
    pub stock_items: usize,
}

/// One low-stock row: a cell whose on-hand fell below its threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LowStockEntry {
    pub product_sku: Sku,
    pub warehouse_code: WarehouseCode,
    pub on_hand: i64,
}

/// Read-only views over the aggregator and master-data counts.
pub struct DashboardSummarizer<C: EntityCounters> {
    aggregator: StockAggregator,
    counters: C,
    policy: ThresholdPolicy,
}

impl<C: EntityCounters> DashboardSummarizer<C> {
    /// Creates a summarizer with the default threshold policy.
    pub fn new(aggregator: StockAggregator, counters: C) -> Self {
        Self::with_policy(aggregator, counters, ThresholdPolicy::default())
    }

    /// Creates a summarizer with an explicit threshold policy.
    pub fn with_policy(
        aggregator: StockAggregator,
        counters: C,
        policy: ThresholdPolicy,
    ) -> Self {
        Self {
            aggregator,
            counters,
            policy,
        }
    }

    /// Returns the configured threshold policy.
    pub fn policy(&self) -> &ThresholdPolicy {
        &self.policy
    }

    /// Current entity totals.
    #[tracing::instrument(skip(self))]
    pub async fn totals(&self) -> DashboardTotals {
        let counts = self.counters.counts().await;
        DashboardTotals {
            products: counts.products,
            customers: counts.customers,
            suppliers: counts.suppliers,
            open_sales_orders: counts.open_sales_orders,
            invoices: counts.invoices,
            payments: counts.payments,
            stock_items: self.aggregator.nonzero_count().await,
        }
    }

    /// Cells with `on_hand` strictly below the given threshold, ordered by
    /// ascending `on_hand` then `product_sku` (warehouse code as final
    /// tiebreak for determinism).
    ///
    /// Zero cells count: a product that sold out is the most urgent row.
    pub async fn low_stock(&self, threshold: i64) -> Vec<LowStockEntry> {
        self.collect_low_stock(|_| threshold).await
    }

    /// Like [`low_stock`](Self::low_stock), but each cell is judged
    /// against its SKU's configured threshold (override or global default).
    pub async fn low_stock_configured(&self) -> Vec<LowStockEntry> {
        self.collect_low_stock(|sku| self.policy.threshold_for(sku))
            .await
    }

    async fn collect_low_stock(&self, threshold_for: impl Fn(&Sku) -> i64) -> Vec<LowStockEntry> {
        let mut entries: Vec<LowStockEntry> = self
            .aggregator
            .list_all()
            .await
            .into_iter()
            .filter(|cell| cell.on_hand < threshold_for(&cell.product_sku))
            .map(|cell| LowStockEntry {
                product_sku: cell.product_sku,
                warehouse_code: cell.warehouse_code,
                on_hand: cell.on_hand,
            })
            .collect();

        entries.sort_by(|a, b| {
            a.on_hand
                .cmp(&b.on_hand)
                .then_with(|| a.product_sku.cmp(&b.product_sku))
                .then_with(|| a.warehouse_code.cmp(&b.warehouse_code))
        });
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use common::SequenceId;
    use ledger::{NewTransaction, TransactionKind};

    struct FixedCounts(crate::EntityCounts);

    #[async_trait]
    impl EntityCounters for FixedCounts {
        async fn counts(&self) -> crate::EntityCounts {
            self.0
        }
    }

    async fn seed_cell(agg: &StockAggregator, seq: i64, sku: &str, wh: &str, qty: i64) {
        let txn = NewTransaction::new(TransactionKind::Adjustment, sku, wh, qty)
            .into_stored(SequenceId::new(seq));
        agg.apply(&txn).await.unwrap();
    }

    fn summarizer(agg: StockAggregator) -> DashboardSummarizer<FixedCounts> {
        DashboardSummarizer::new(agg, FixedCounts(crate::EntityCounts::default()))
    }

    #[tokio::test]
    async fn low_stock_orders_by_on_hand_then_sku() {
        let agg = StockAggregator::new();
        // (SKU1,WH1)=3, (SKU2,WH1)=10, (SKU3,WH2)=0 (stock drained to zero)
        seed_cell(&agg, 1, "SKU1", "WH1", 3).await;
        seed_cell(&agg, 2, "SKU2", "WH1", 10).await;
        seed_cell(&agg, 3, "SKU3", "WH2", 4).await;
        seed_cell(&agg, 4, "SKU3", "WH2", -4).await;

        let rows = summarizer(agg).low_stock(5).await;
        assert_eq!(
            rows,
            vec![
                LowStockEntry {
                    product_sku: "SKU3".into(),
                    warehouse_code: "WH2".into(),
                    on_hand: 0,
                },
                LowStockEntry {
                    product_sku: "SKU1".into(),
                    warehouse_code: "WH1".into(),
                    on_hand: 3,
                },
            ]
        );
    }

    #[tokio::test]
    async fn low_stock_threshold_is_strict() {
        let agg = StockAggregator::new();
        seed_cell(&agg, 1, "SKU1", "WH1", 5).await;

        // on_hand == threshold is not low.
        assert!(summarizer(agg).low_stock(5).await.is_empty());
    }

    #[tokio::test]
    async fn low_stock_ties_break_on_sku() {
        let agg = StockAggregator::new();
        seed_cell(&agg, 1, "SKU-B", "WH1", 2).await;
        seed_cell(&agg, 2, "SKU-A", "WH1", 2).await;

        let rows = summarizer(agg).low_stock(5).await;
        assert_eq!(rows[0].product_sku, "SKU-A".into());
        assert_eq!(rows[1].product_sku, "SKU-B".into());
    }

    #[tokio::test]
    async fn configured_low_stock_honors_overrides() {
        let agg = StockAggregator::new();
        seed_cell(&agg, 1, "SKU-BULK", "WH1", 50).await;
        seed_cell(&agg, 2, "SKU-1", "WH1", 8).await;

        let summarizer = DashboardSummarizer::with_policy(
            agg,
            FixedCounts(crate::EntityCounts::default()),
            // Default 10 flags SKU-1 at 8; the bulk item is low under 100.
            ThresholdPolicy::default().with_override("SKU-BULK", 100),
        );

        let rows = summarizer.low_stock_configured().await;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].product_sku, "SKU-1".into());
        assert_eq!(rows[1].product_sku, "SKU-BULK".into());
    }

    #[tokio::test]
    async fn totals_combine_counters_and_stock_items() {
        let agg = StockAggregator::new();
        seed_cell(&agg, 1, "SKU1", "WH1", 3).await;
        seed_cell(&agg, 2, "SKU2", "WH1", 10).await;
        // Drained cell does not count as a stock item.
        seed_cell(&agg, 3, "SKU3", "WH2", 4).await;
        seed_cell(&agg, 4, "SKU3", "WH2", -4).await;

        let summarizer = DashboardSummarizer::new(
            agg,
            FixedCounts(crate::EntityCounts {
                products: 3,
                customers: 2,
                suppliers: 1,
                open_sales_orders: 4,
                invoices: 5,
                payments: 6,
            }),
        );

        let totals = summarizer.totals().await;
        assert_eq!(totals.products, 3);
        assert_eq!(totals.customers, 2);
        assert_eq!(totals.suppliers, 1);
        assert_eq!(totals.open_sales_orders, 4);
        assert_eq!(totals.invoices, 5);
        assert_eq!(totals.payments, 6);
        assert_eq!(totals.stock_items, 2);
    }

    #[tokio::test]
    async fn totals_serialize_with_entity_names() {
        let totals = DashboardTotals {
            products: 1,
            stock_items: 2,
            ..Default::default()
        };
        let value = serde_json::to_value(totals).unwrap();
        assert_eq!(value["products"], 1);
        assert_eq!(value["stock_items"], 2);
        assert_eq!(value["open_sales_orders"], 0);
    }
}
