//! Reporting service for the dashboard endpoints
//!
//! Reads tenant-scoped grouped fact rows from Postgres and feeds them to the
//! pure aggregation engine in the shared crate. Grouped sums and time
//! bucketing happen in SQL; joins, the weighted-average-cost policy, rounding,
//! and ordering happen in the engine, which tests exercise with in-memory
//! facts. Every operation here is a read-only projection with no side effects.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::error::{AppError, AppResult};
use shared::aggregation::{
    self, BusinessSummary, LowStockRow, OverallSummary, ProductProfitRow, ProductRef,
    ReceiptTotals, SaleTotals, StockLevel, VendorProductRow, VendorReceiptTotals,
};

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    db: PgPool,
}

/// Sales rollup across all of a tenant's invoices
#[derive(Debug, Serialize, FromRow)]
pub struct SalesSummary {
    pub total_invoices: i64,
    pub total_customers: i64,
    pub total_items_sold: i64,
    pub total_sales_amount: Decimal,
}

/// Monthly sales bucket
#[derive(Debug, Serialize, FromRow)]
pub struct MonthlySalesRow {
    pub month: NaiveDate,
    pub monthly_sales: Decimal,
    pub monthly_quantity: i64,
}

#[derive(Debug, FromRow)]
struct ReceiptTotalsRow {
    product_id: i32,
    received_qty: i64,
    received_cost: Decimal,
}

#[derive(Debug, FromRow)]
struct SaleTotalsRow {
    product_id: i32,
    sold_qty: i64,
    sales_amount: Decimal,
}

#[derive(Debug, FromRow)]
struct VendorReceiptTotalsRow {
    product_id: i32,
    product_name: String,
    received_qty: i64,
    received_cost: Decimal,
}

#[derive(Debug, FromRow)]
struct ProductRow {
    product_id: i32,
    product_name: String,
}

impl ReportingService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Matched-cost summary across all of the user's facts
    pub async fn overall_summary(&self, user_id: i32) -> AppResult<OverallSummary> {
        let receipts = self.receipt_totals(user_id).await?;
        let sales = self.sale_totals(user_id).await?;
        Ok(aggregation::overall_summary(&receipts, &sales))
    }

    /// Per-product profit estimates for goods received from one vendor
    pub async fn vendor_breakdown(
        &self,
        user_id: i32,
        vendor_id: i32,
    ) -> AppResult<Vec<VendorProductRow>> {
        let receipts = self.vendor_receipt_totals(user_id, vendor_id).await?;
        let sales = self.vendor_sale_totals(user_id, vendor_id).await?;
        Ok(aggregation::vendor_product_breakdown(&receipts, &sales))
    }

    /// Cash-basis profit per catalog product
    pub async fn profit_by_product(&self, user_id: i32) -> AppResult<Vec<ProductProfitRow>> {
        let catalog = self.catalog().await?;
        let receipts = self.receipt_totals(user_id).await?;
        let sales = self.sale_totals(user_id).await?;
        Ok(aggregation::profit_by_product(&catalog, &receipts, &sales))
    }

    /// Tenant-wide cash totals
    pub async fn business_summary(&self, user_id: i32) -> AppResult<BusinessSummary> {
        let receipts = self.receipt_totals(user_id).await?;
        let sales = self.sale_totals(user_id).await?;
        Ok(aggregation::business_summary(&receipts, &sales))
    }

    /// Current stock per catalog product
    pub async fn stock_levels(&self, user_id: i32) -> AppResult<Vec<StockLevel>> {
        let catalog = self.catalog().await?;
        let receipts = self.receipt_totals(user_id).await?;
        let sales = self.sale_totals(user_id).await?;
        Ok(aggregation::stock_levels(&catalog, &receipts, &sales))
    }

    /// Products below the stock threshold, most depleted first
    pub async fn low_stock(&self, user_id: i32, threshold: i64) -> AppResult<Vec<LowStockRow>> {
        let catalog = self.catalog().await?;
        let receipts = self.receipt_totals(user_id).await?;
        let sales = self.sale_totals(user_id).await?;
        Ok(aggregation::low_stock(&catalog, &receipts, &sales, threshold))
    }

    /// Sales rollup: invoice and customer counts plus total units and amount
    pub async fn sales_summary(&self, user_id: i32) -> AppResult<SalesSummary> {
        let summary = sqlx::query_as::<_, SalesSummary>(
            r#"
            SELECT
                COUNT(DISTINCT i.invoice_id) AS total_invoices,
                COUNT(DISTINCT i.address_id) AS total_customers,
                COALESCE(SUM(s.sale_quantity), 0) AS total_items_sold,
                COALESCE(SUM(s.sale_amount), 0)::numeric(18,2) AS total_sales_amount
            FROM sale s
            JOIN invoice i ON s.invoice_id = i.invoice_id
            WHERE s.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(summary)
    }

    /// Monthly sales totals, oldest bucket first
    pub async fn monthly_sales(&self, user_id: i32) -> AppResult<Vec<MonthlySalesRow>> {
        let rows = sqlx::query_as::<_, MonthlySalesRow>(
            r#"
            SELECT
                DATE_TRUNC('month', sale_date)::date AS month,
                SUM(sale_amount)::numeric(18,2) AS monthly_sales,
                SUM(sale_quantity) AS monthly_quantity
            FROM sale
            WHERE user_id = $1
            GROUP BY month
            ORDER BY month ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Export report rows as CSV
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let csv_data = String::from_utf8(
            wtr.into_inner()
                .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?,
        )
        .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }

    /// Per-product GRN sums for the user
    async fn receipt_totals(&self, user_id: i32) -> AppResult<Vec<ReceiptTotals>> {
        let rows = sqlx::query_as::<_, ReceiptTotalsRow>(
            r#"
            SELECT product_id,
                   COALESCE(SUM(grn_quantity), 0) AS received_qty,
                   COALESCE(SUM(grn_amount), 0) AS received_cost
            FROM grn
            WHERE user_id = $1
            GROUP BY product_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| ReceiptTotals {
                product_id: r.product_id,
                received_qty: r.received_qty,
                received_cost: r.received_cost,
            })
            .collect())
    }

    /// Per-product sale sums for the user
    async fn sale_totals(&self, user_id: i32) -> AppResult<Vec<SaleTotals>> {
        let rows = sqlx::query_as::<_, SaleTotalsRow>(
            r#"
            SELECT product_id,
                   COALESCE(SUM(sale_quantity), 0) AS sold_qty,
                   COALESCE(SUM(sale_amount), 0) AS sales_amount
            FROM sale
            WHERE user_id = $1
            GROUP BY product_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| SaleTotals {
                product_id: r.product_id,
                sold_qty: r.sold_qty,
                sales_amount: r.sales_amount,
            })
            .collect())
    }

    /// Per-product GRN sums restricted to one vendor address
    async fn vendor_receipt_totals(
        &self,
        user_id: i32,
        vendor_id: i32,
    ) -> AppResult<Vec<VendorReceiptTotals>> {
        let rows = sqlx::query_as::<_, VendorReceiptTotalsRow>(
            r#"
            SELECT g.product_id, p.product_name,
                   COALESCE(SUM(g.grn_quantity), 0) AS received_qty,
                   COALESCE(SUM(g.grn_amount), 0) AS received_cost
            FROM grn g
            JOIN product p ON p.product_id = g.product_id
            WHERE g.address_id = $1 AND g.user_id = $2
            GROUP BY g.product_id, p.product_name
            "#,
        )
        .bind(vendor_id)
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| VendorReceiptTotals {
                product_id: r.product_id,
                product_name: r.product_name,
                received_qty: r.received_qty,
                received_cost: r.received_cost,
            })
            .collect())
    }

    /// Per-product sale sums linked to one vendor, either directly on the
    /// sale line or through the receipt the goods came in on
    async fn vendor_sale_totals(
        &self,
        user_id: i32,
        vendor_id: i32,
    ) -> AppResult<Vec<SaleTotals>> {
        let rows = sqlx::query_as::<_, SaleTotalsRow>(
            r#"
            SELECT product_id,
                   COALESCE(SUM(sale_quantity), 0) AS sold_qty,
                   COALESCE(SUM(sale_amount), 0) AS sales_amount
            FROM sale
            WHERE user_id = $2
              AND (vendor_address_id = $1
                   OR grn_id IN (SELECT grn_id FROM grn WHERE address_id = $1 AND user_id = $2))
            GROUP BY product_id
            "#,
        )
        .bind(vendor_id)
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| SaleTotals {
                product_id: r.product_id,
                sold_qty: r.sold_qty,
                sales_amount: r.sales_amount,
            })
            .collect())
    }

    /// Product catalog listing
    async fn catalog(&self) -> AppResult<Vec<ProductRef>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT product_id, product_name FROM product ORDER BY product_id ASC",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| ProductRef {
                product_id: r.product_id,
                product_name: r.product_name,
            })
            .collect())
    }
}
