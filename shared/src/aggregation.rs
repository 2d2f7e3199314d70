//! Inventory aggregation engine
//!
//! Pure projections over a tenant's goods-received and sale facts under a
//! weighted-average-cost policy. Callers supply grouped fact rows (the backend
//! reads them from Postgres, tests build them in memory); every function here
//! is a side-effect-free total function and repeated calls over the same input
//! return identical output.
//!
//! Amount fields on the fact types are row totals, never unit prices. The
//! average unit cost of a product is `received_cost / received_qty` and is
//! only defined while `received_qty > 0`; a product that was never received
//! contributes zero to any estimated purchase cost.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-product sums over goods-received rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptTotals {
    pub product_id: i32,
    pub received_qty: i64,
    pub received_cost: Decimal,
}

/// Per-product sums over sale rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleTotals {
    pub product_id: i32,
    pub sold_qty: i64,
    pub sales_amount: Decimal,
}

/// Per-product receipt sums carrying the product name, used where the result
/// set is restricted to received products (the vendor breakdown)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorReceiptTotals {
    pub product_id: i32,
    pub product_name: String,
    pub received_qty: i64,
    pub received_cost: Decimal,
}

/// Catalog dimension row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRef {
    pub product_id: i32,
    pub product_name: String,
}

/// Matched-cost summary across all products
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallSummary {
    pub total_sales: Decimal,
    pub estimated_purchase_cost: Decimal,
    pub profit: Decimal,
}

/// Per-product profit estimate for one vendor's goods
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorProductRow {
    pub product_id: i32,
    pub product_name: String,
    pub received_qty: i64,
    pub received_cost: Decimal,
    pub sold_qty: i64,
    pub sales_amount: Decimal,
    pub profit_est: Decimal,
}

/// Cash-basis per-product view, unconditional sums with no cost matching
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductProfitRow {
    pub product_id: i32,
    pub product_name: String,
    pub total_purchase_amount: Decimal,
    pub total_sales_amount: Decimal,
    pub gross_profit: Decimal,
}

/// Cash-basis totals across the whole tenant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusinessSummary {
    pub total_purchase: Decimal,
    pub total_sales: Decimal,
    pub total_profit: Decimal,
}

/// Stock level for one catalog product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockLevel {
    pub product_id: i32,
    pub product_name: String,
    pub total_received: i64,
    pub total_sold: i64,
    pub current_stock: i64,
}

/// Low-stock alert row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LowStockRow {
    pub product_id: i32,
    pub product_name: String,
    pub current_stock: i64,
}

/// Default threshold for low-stock alerts
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

/// Round a monetary value to fixed-point currency precision, half away from
/// zero (the behavior of a `numeric(18,2)` cast)
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[derive(Debug, Default, Clone)]
struct CombinedTotals {
    received_qty: i64,
    received_cost: Decimal,
    sold_qty: i64,
    sales_amount: Decimal,
}

/// Full outer join of receipt and sale sums keyed by product. Duplicate rows
/// for the same product are merged, so callers may pass ungrouped input.
fn combine_facts(receipts: &[ReceiptTotals], sales: &[SaleTotals]) -> BTreeMap<i32, CombinedTotals> {
    let mut combined: BTreeMap<i32, CombinedTotals> = BTreeMap::new();
    for r in receipts {
        let entry = combined.entry(r.product_id).or_default();
        entry.received_qty += r.received_qty;
        entry.received_cost += r.received_cost;
    }
    for s in sales {
        let entry = combined.entry(s.product_id).or_default();
        entry.sold_qty += s.sold_qty;
        entry.sales_amount += s.sales_amount;
    }
    combined
}

/// Matched-cost summary: total sales, estimated purchase cost of the units
/// actually sold, and the profit between them.
///
/// The cost of sold units is `sold_qty * received_cost / received_qty` per
/// product; products never received contribute zero cost regardless of units
/// sold, since no average cost can be derived for them. Profit is taken over
/// the rounded totals so `profit == total_sales - estimated_purchase_cost`
/// holds exactly at two decimal places.
pub fn overall_summary(receipts: &[ReceiptTotals], sales: &[SaleTotals]) -> OverallSummary {
    let mut total_sales = Decimal::ZERO;
    let mut estimated_cost = Decimal::ZERO;

    for totals in combine_facts(receipts, sales).values() {
        total_sales += totals.sales_amount;
        if totals.received_qty > 0 {
            estimated_cost += Decimal::from(totals.sold_qty) * totals.received_cost
                / Decimal::from(totals.received_qty);
        }
    }

    let total_sales = round_currency(total_sales);
    let estimated_purchase_cost = round_currency(estimated_cost);
    OverallSummary {
        total_sales,
        estimated_purchase_cost,
        profit: total_sales - estimated_purchase_cost,
    }
}

/// Per-product profit estimate for goods received from a single vendor.
///
/// `receipts` must already be filtered to the vendor, `sales` to rows linked
/// to the vendor either directly or through their originating receipt; the
/// result is restricted to received products (sales left-joined, so a product
/// with receipts and no sales appears with zero sale figures).
///
/// Profit is `sales_amount - sold_qty * avg_unit_cost` when an average unit
/// cost exists, else the full `sales_amount`: sales_amount is already a row
/// total, so it is never multiplied by quantity again.
pub fn vendor_product_breakdown(
    receipts: &[VendorReceiptTotals],
    sales: &[SaleTotals],
) -> Vec<VendorProductRow> {
    let mut sales_by_product: BTreeMap<i32, (i64, Decimal)> = BTreeMap::new();
    for s in sales {
        let entry = sales_by_product.entry(s.product_id).or_default();
        entry.0 += s.sold_qty;
        entry.1 += s.sales_amount;
    }

    let mut merged: BTreeMap<i32, VendorReceiptTotals> = BTreeMap::new();
    for r in receipts {
        merged
            .entry(r.product_id)
            .and_modify(|e| {
                e.received_qty += r.received_qty;
                e.received_cost += r.received_cost;
            })
            .or_insert_with(|| r.clone());
    }

    let mut rows: Vec<VendorProductRow> = merged
        .into_values()
        .map(|r| {
            let (sold_qty, sales_amount) = sales_by_product
                .get(&r.product_id)
                .copied()
                .unwrap_or((0, Decimal::ZERO));
            let profit_est = if r.received_qty > 0 {
                sales_amount
                    - Decimal::from(sold_qty) * r.received_cost / Decimal::from(r.received_qty)
            } else {
                sales_amount
            };
            VendorProductRow {
                product_id: r.product_id,
                product_name: r.product_name,
                received_qty: r.received_qty,
                received_cost: round_currency(r.received_cost),
                sold_qty,
                sales_amount: round_currency(sales_amount),
                profit_est: round_currency(profit_est),
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.profit_est
            .cmp(&a.profit_est)
            .then(a.product_id.cmp(&b.product_id))
    });
    rows
}

/// Cash-basis per-product view: unconditional purchase and sale sums with no
/// unit-cost matching. Every catalog product is listed, including those with
/// no facts at all.
pub fn profit_by_product(
    catalog: &[ProductRef],
    receipts: &[ReceiptTotals],
    sales: &[SaleTotals],
) -> Vec<ProductProfitRow> {
    let combined = combine_facts(receipts, sales);

    let mut rows: Vec<ProductProfitRow> = catalog
        .iter()
        .map(|p| {
            let totals = combined.get(&p.product_id).cloned().unwrap_or_default();
            let total_purchase_amount = round_currency(totals.received_cost);
            let total_sales_amount = round_currency(totals.sales_amount);
            ProductProfitRow {
                product_id: p.product_id,
                product_name: p.product_name.clone(),
                total_purchase_amount,
                total_sales_amount,
                gross_profit: total_sales_amount - total_purchase_amount,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.gross_profit
            .cmp(&a.gross_profit)
            .then(a.product_id.cmp(&b.product_id))
    });
    rows
}

/// Tenant-wide cash totals, independent of product-level cost attribution
pub fn business_summary(receipts: &[ReceiptTotals], sales: &[SaleTotals]) -> BusinessSummary {
    let total_purchase: Decimal = receipts.iter().map(|r| r.received_cost).sum();
    let total_sales: Decimal = sales.iter().map(|s| s.sales_amount).sum();

    let total_purchase = round_currency(total_purchase);
    let total_sales = round_currency(total_sales);
    BusinessSummary {
        total_purchase,
        total_sales,
        total_profit: total_sales - total_purchase,
    }
}

/// Current stock per catalog product: received minus sold units. Stock can go
/// negative; an oversold product is a valid, reportable state. Ordered by
/// product name, ties by product id.
pub fn stock_levels(
    catalog: &[ProductRef],
    receipts: &[ReceiptTotals],
    sales: &[SaleTotals],
) -> Vec<StockLevel> {
    let combined = combine_facts(receipts, sales);

    let mut rows: Vec<StockLevel> = catalog
        .iter()
        .map(|p| {
            let totals = combined.get(&p.product_id).cloned().unwrap_or_default();
            StockLevel {
                product_id: p.product_id,
                product_name: p.product_name.clone(),
                total_received: totals.received_qty,
                total_sold: totals.sold_qty,
                current_stock: totals.received_qty - totals.sold_qty,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        a.product_name
            .cmp(&b.product_name)
            .then(a.product_id.cmp(&b.product_id))
    });
    rows
}

/// Products whose current stock is strictly below the threshold, most
/// depleted first
pub fn low_stock(
    catalog: &[ProductRef],
    receipts: &[ReceiptTotals],
    sales: &[SaleTotals],
    threshold: i64,
) -> Vec<LowStockRow> {
    let mut rows: Vec<LowStockRow> = stock_levels(catalog, receipts, sales)
        .into_iter()
        .filter(|s| s.current_stock < threshold)
        .map(|s| LowStockRow {
            product_id: s.product_id,
            product_name: s.product_name,
            current_stock: s.current_stock,
        })
        .collect();

    rows.sort_by(|a, b| {
        a.current_stock
            .cmp(&b.current_stock)
            .then(a.product_id.cmp(&b.product_id))
    });
    rows
}
