//! Aggregation engine tests
//!
//! Covers the dashboard computation rules:
//! - empty fact sets produce all-zero summaries
//! - products never received contribute zero estimated cost
//! - profit identities hold exactly at two decimal places
//! - report orderings are total, so repeated calls are identical

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::aggregation::{
    business_summary, low_stock, overall_summary, profit_by_product, round_currency, stock_levels,
    vendor_product_breakdown, ProductRef, ReceiptTotals, SaleTotals, VendorReceiptTotals,
    DEFAULT_LOW_STOCK_THRESHOLD,
};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn receipt(product_id: i32, qty: i64, cost: &str) -> ReceiptTotals {
    ReceiptTotals {
        product_id,
        received_qty: qty,
        received_cost: dec(cost),
    }
}

fn sale(product_id: i32, qty: i64, amount: &str) -> SaleTotals {
    SaleTotals {
        product_id,
        sold_qty: qty,
        sales_amount: dec(amount),
    }
}

fn vendor_receipt(product_id: i32, name: &str, qty: i64, cost: &str) -> VendorReceiptTotals {
    VendorReceiptTotals {
        product_id,
        product_name: name.to_string(),
        received_qty: qty,
        received_cost: dec(cost),
    }
}

fn catalog(names: &[(i32, &str)]) -> Vec<ProductRef> {
    names
        .iter()
        .map(|(id, name)| ProductRef {
            product_id: *id,
            product_name: name.to_string(),
        })
        .collect()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[test]
fn empty_tenant_summary_is_all_zeros() {
    let summary = overall_summary(&[], &[]);
    assert_eq!(summary.total_sales, Decimal::ZERO);
    assert_eq!(summary.estimated_purchase_cost, Decimal::ZERO);
    assert_eq!(summary.profit, Decimal::ZERO);

    let business = business_summary(&[], &[]);
    assert_eq!(business.total_purchase, Decimal::ZERO);
    assert_eq!(business.total_sales, Decimal::ZERO);
    assert_eq!(business.total_profit, Decimal::ZERO);

    assert!(vendor_product_breakdown(&[], &[]).is_empty());
    assert!(profit_by_product(&[], &[], &[]).is_empty());
    assert!(stock_levels(&[], &[], &[]).is_empty());
}

#[test]
fn worked_example_from_first_principles() {
    // One receipt of 10 units for 1000 total, one sale of 4 units for 600:
    // avg unit cost 100, estimated cost 400, profit 200.
    let receipts = vec![receipt(1, 10, "1000")];
    let sales = vec![sale(1, 4, "600")];

    let summary = overall_summary(&receipts, &sales);
    assert_eq!(summary.total_sales, dec("600.00"));
    assert_eq!(summary.estimated_purchase_cost, dec("400.00"));
    assert_eq!(summary.profit, dec("200.00"));
}

#[test]
fn unreceived_products_never_cost_anything() {
    // Sales with no matching receipts: the full amount is profit
    let sales = vec![sale(1, 100, "1234.56"), sale(2, 7, "10")];
    let summary = overall_summary(&[], &sales);

    assert_eq!(summary.estimated_purchase_cost, Decimal::ZERO);
    assert_eq!(summary.total_sales, dec("1244.56"));
    assert_eq!(summary.profit, dec("1244.56"));
}

#[test]
fn receipts_without_sales_cost_nothing_yet() {
    let receipts = vec![receipt(1, 10, "1000")];
    let summary = overall_summary(&receipts, &[]);

    assert_eq!(summary.total_sales, Decimal::ZERO);
    assert_eq!(summary.estimated_purchase_cost, Decimal::ZERO);
    assert_eq!(summary.profit, Decimal::ZERO);
}

#[test]
fn fractional_unit_costs_round_half_away_from_zero() {
    // 3 units for 10.00 -> avg 3.333..., 2 sold -> cost 6.666... -> 6.67
    let receipts = vec![receipt(1, 3, "10.00")];
    let sales = vec![sale(1, 2, "20.00")];

    let summary = overall_summary(&receipts, &sales);
    assert_eq!(summary.estimated_purchase_cost, dec("6.67"));
    assert_eq!(summary.profit, dec("13.33"));
}

#[test]
fn vendor_breakdown_orders_by_profit_then_product_id() {
    let receipts = vec![
        vendor_receipt(3, "Rice", 10, "500"),
        vendor_receipt(1, "Salt", 10, "100"),
        vendor_receipt(2, "Oil", 20, "200"),
    ];
    let sales = vec![
        sale(3, 5, "400"), // profit 400 - 5*50 = 150
        sale(1, 5, "200"), // profit 200 - 5*10 = 150
        sale(2, 2, "30"),  // profit 30 - 2*10 = 10
    ];

    let rows = vendor_product_breakdown(&receipts, &sales);
    let ids: Vec<i32> = rows.iter().map(|r| r.product_id).collect();
    assert_eq!(ids, vec![1, 3, 2]);
    assert!(rows[0].profit_est >= rows[1].profit_est);
    assert!(rows[1].profit_est >= rows[2].profit_est);
}

#[test]
fn vendor_breakdown_keeps_unsold_received_products() {
    let receipts = vec![vendor_receipt(1, "Rice", 10, "500")];

    let rows = vendor_product_breakdown(&receipts, &[]);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].sold_qty, 0);
    assert_eq!(rows[0].sales_amount, dec("0.00"));
    assert_eq!(rows[0].profit_est, dec("0.00"));
}

#[test]
fn vendor_breakdown_with_zero_quantity_receipt_treats_sales_as_profit() {
    // A receipt row can carry zero units (pure cost adjustment); without
    // units no average cost exists and the sale amount stands as profit.
    let receipts = vec![vendor_receipt(1, "Rice", 0, "100")];
    let sales = vec![sale(1, 3, "90")];

    let rows = vendor_product_breakdown(&receipts, &sales);
    assert_eq!(rows[0].profit_est, dec("90.00"));
}

#[test]
fn cash_basis_profit_ignores_unit_matching() {
    let products = catalog(&[(1, "Rice"), (2, "Oil")]);
    let receipts = vec![receipt(1, 10, "1000")];
    let sales = vec![sale(1, 1, "150")];

    let rows = profit_by_product(&products, &receipts, &sales);
    // Oil has no facts but is still listed; Rice shows the raw cash delta
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].product_id, 2);
    assert_eq!(rows[0].gross_profit, Decimal::ZERO);
    assert_eq!(rows[1].product_id, 1);
    assert_eq!(rows[1].gross_profit, dec("-850.00"));
}

#[test]
fn stock_arithmetic_has_no_clamping() {
    let products = catalog(&[(1, "Rice"), (2, "Oil")]);
    let receipts = vec![receipt(1, 100, "100"), receipt(2, 10, "10")];
    let sales = vec![sale(1, 30, "60"), sale(2, 15, "30")];

    let rows = stock_levels(&products, &receipts, &sales);
    let by_id: Vec<(i32, i64)> = rows.iter().map(|r| (r.product_id, r.current_stock)).collect();
    assert!(by_id.contains(&(1, 70)));
    assert!(by_id.contains(&(2, -5)));
}

#[test]
fn low_stock_threshold_is_strict() {
    let products = catalog(&[(1, "Rice"), (2, "Oil")]);
    let receipts = vec![receipt(1, 5, "5"), receipt(2, 4, "4")];

    // Rice sits exactly at the threshold and must not be flagged
    let rows = low_stock(&products, &receipts, &[], DEFAULT_LOW_STOCK_THRESHOLD);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].product_id, 2);
    assert_eq!(rows[0].current_stock, 4);
}

#[test]
fn low_stock_orders_most_depleted_first() {
    let products = catalog(&[(1, "Rice"), (2, "Oil"), (3, "Salt")]);
    let receipts = vec![receipt(1, 2, "2")];
    let sales = vec![sale(3, 10, "10")];

    let rows = low_stock(&products, &receipts, &sales, 5);
    let ids: Vec<i32> = rows.iter().map(|r| r.product_id).collect();
    // Salt -10, Oil 0, Rice 2
    assert_eq!(ids, vec![3, 2, 1]);
}

#[test]
fn rounding_matches_fixed_point_currency_semantics() {
    assert_eq!(round_currency(dec("2.675")), dec("2.68"));
    assert_eq!(round_currency(dec("-2.675")), dec("-2.68"));
    assert_eq!(round_currency(dec("2.674")), dec("2.67"));
    assert_eq!(round_currency(dec("2")), dec("2"));
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// profit == total_sales - estimated_purchase_cost, exactly
    #[test]
    fn prop_overall_profit_identity(
        receipts in receipts_strategy(),
        sales in sales_strategy()
    ) {
        let summary = overall_summary(&receipts, &sales);
        prop_assert_eq!(
            summary.profit,
            summary.total_sales - summary.estimated_purchase_cost
        );
        // Two decimal places at most
        prop_assert!(summary.total_sales.scale() <= 2);
        prop_assert!(summary.estimated_purchase_cost.scale() <= 2);
    }

    /// Products with no receipts contribute nothing to estimated cost
    #[test]
    fn prop_cost_zero_without_receipts(sales in sales_strategy()) {
        let summary = overall_summary(&[], &sales);
        prop_assert_eq!(summary.estimated_purchase_cost, Decimal::ZERO);
        prop_assert_eq!(summary.profit, summary.total_sales);
    }

    /// Estimated cost never exceeds the cost of the received stock when no
    /// product is oversold
    #[test]
    fn prop_cost_bounded_by_received_cost(
        rows in prop::collection::vec(
            (1i32..20, 1i64..1000, money_strategy()),
            1..10
        )
    ) {
        // Sell at most what was received, product by product
        let receipts: Vec<ReceiptTotals> = rows
            .iter()
            .map(|(id, qty, cost)| ReceiptTotals {
                product_id: *id,
                received_qty: *qty,
                received_cost: *cost,
            })
            .collect();
        let sales: Vec<SaleTotals> = rows
            .iter()
            .map(|(id, qty, cost)| SaleTotals {
                product_id: *id,
                sold_qty: qty / 2,
                sales_amount: *cost,
            })
            .collect();

        let summary = overall_summary(&receipts, &sales);
        let total_received: Decimal = receipts
            .iter()
            .map(|r| r.received_cost)
            .sum();
        prop_assert!(summary.estimated_purchase_cost <= round_currency(total_received));
    }

    /// Vendor breakdown is sorted by profit desc, ties by product id asc
    #[test]
    fn prop_vendor_breakdown_sorted(
        receipts in vendor_receipts_strategy(),
        sales in sales_strategy()
    ) {
        let rows = vendor_product_breakdown(&receipts, &sales);
        for pair in rows.windows(2) {
            prop_assert!(
                pair[0].profit_est > pair[1].profit_est
                    || (pair[0].profit_est == pair[1].profit_est
                        && pair[0].product_id < pair[1].product_id)
            );
        }
    }

    /// Vendor breakdown only lists received products
    #[test]
    fn prop_vendor_breakdown_restricted_to_receipts(
        receipts in vendor_receipts_strategy(),
        sales in sales_strategy()
    ) {
        let received: Vec<i32> = receipts.iter().map(|r| r.product_id).collect();
        let rows = vendor_product_breakdown(&receipts, &sales);
        for row in &rows {
            prop_assert!(received.contains(&row.product_id));
        }
    }

    /// Stock is exactly received minus sold for every product
    #[test]
    fn prop_stock_is_received_minus_sold(
        receipts in receipts_strategy(),
        sales in sales_strategy()
    ) {
        let ids: Vec<i32> = (1..20).collect();
        let products: Vec<ProductRef> = ids
            .iter()
            .map(|id| ProductRef {
                product_id: *id,
                product_name: format!("Product {}", id),
            })
            .collect();

        let rows = stock_levels(&products, &receipts, &sales);
        prop_assert_eq!(rows.len(), products.len());
        for row in &rows {
            let received: i64 = receipts
                .iter()
                .filter(|r| r.product_id == row.product_id)
                .map(|r| r.received_qty)
                .sum();
            let sold: i64 = sales
                .iter()
                .filter(|s| s.product_id == row.product_id)
                .map(|s| s.sold_qty)
                .sum();
            prop_assert_eq!(row.current_stock, received - sold);
        }
    }

    /// Low stock only reports products strictly below the threshold
    #[test]
    fn prop_low_stock_strictly_below_threshold(
        receipts in receipts_strategy(),
        sales in sales_strategy(),
        threshold in 0i64..100
    ) {
        let products: Vec<ProductRef> = (1..20)
            .map(|id| ProductRef {
                product_id: id,
                product_name: format!("Product {}", id),
            })
            .collect();

        let rows = low_stock(&products, &receipts, &sales, threshold);
        for row in &rows {
            prop_assert!(row.current_stock < threshold);
        }
    }

    /// Repeated calls over the same facts return identical results
    #[test]
    fn prop_idempotent_over_unchanged_facts(
        receipts in receipts_strategy(),
        sales in sales_strategy()
    ) {
        prop_assert_eq!(
            overall_summary(&receipts, &sales),
            overall_summary(&receipts, &sales)
        );
        prop_assert_eq!(
            business_summary(&receipts, &sales),
            business_summary(&receipts, &sales)
        );

        let products: Vec<ProductRef> = (1..20)
            .map(|id| ProductRef {
                product_id: id,
                product_name: format!("Product {}", id),
            })
            .collect();
        prop_assert_eq!(
            profit_by_product(&products, &receipts, &sales),
            profit_by_product(&products, &receipts, &sales)
        );
    }

    /// The cash-basis business summary balances exactly
    #[test]
    fn prop_business_summary_identity(
        receipts in receipts_strategy(),
        sales in sales_strategy()
    ) {
        let summary = business_summary(&receipts, &sales);
        prop_assert_eq!(
            summary.total_profit,
            summary.total_sales - summary.total_purchase
        );
    }
}

/// Strategy for monetary row totals (0.00 to 10000.00)
fn money_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..=1_000_000).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for per-product receipt sums
fn receipts_strategy() -> impl Strategy<Value = Vec<ReceiptTotals>> {
    prop::collection::vec(
        (1i32..20, 0i64..1000, money_strategy()).prop_map(|(id, qty, cost)| ReceiptTotals {
            product_id: id,
            received_qty: qty,
            received_cost: cost,
        }),
        0..10,
    )
}

/// Strategy for per-product sale sums
fn sales_strategy() -> impl Strategy<Value = Vec<SaleTotals>> {
    prop::collection::vec(
        (1i32..20, 0i64..1000, money_strategy()).prop_map(|(id, qty, amount)| SaleTotals {
            product_id: id,
            sold_qty: qty,
            sales_amount: amount,
        }),
        0..10,
    )
}

/// Strategy for vendor-scoped receipt sums
fn vendor_receipts_strategy() -> impl Strategy<Value = Vec<VendorReceiptTotals>> {
    prop::collection::vec(
        (1i32..20, 0i64..1000, money_strategy()).prop_map(|(id, qty, cost)| VendorReceiptTotals {
            product_id: id,
            product_name: format!("Product {}", id),
            received_qty: qty,
            received_cost: cost,
        }),
        0..10,
    )
}
