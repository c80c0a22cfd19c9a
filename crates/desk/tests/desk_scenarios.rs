use billdesk_billing::StockPolicy;
use billdesk_catalog::{Catalog, Product, ProductId};
use billdesk_core::{AggregateId, DomainError, Entity, Money};
use billdesk_customers::CustomerDirectory;
use billdesk_desk::{BillingDesk, DeskConfig};

fn pid(raw: &str) -> ProductId {
    ProductId::new(raw).unwrap()
}

/// Product '1' at 100.00 with 50 in stock, plus a second product; customers Alice and Bob.
fn shop(policy: StockPolicy) -> BillingDesk {
    let catalog = Catalog::seeded(
        AggregateId::new(),
        [
            Product::new(pid("1"), "Laptop", Money::from_major(100).unwrap(), 50, "Electronics")
                .unwrap(),
            Product::new(pid("2"), "Mouse", Money::from_minor(2_550), 10, "Accessories").unwrap(),
        ],
    )
    .unwrap();
    let customers = CustomerDirectory::new(["Alice", "Bob"]).unwrap();
    BillingDesk::new(catalog, customers, policy)
}

fn stock_of(desk: &BillingDesk, id: &str) -> i64 {
    desk.catalog().get(&pid(id)).unwrap().stock()
}

#[test]
fn add_then_commit_deducts_stock_and_records_bill() {
    let mut desk = shop(StockPolicy::Reserve);

    desk.add_item(&pid("1"), 10).unwrap();
    let bill_id = desk.commit_for("Alice").unwrap();

    assert_eq!(stock_of(&desk, "1"), 40);

    let latest = desk.bills().latest().unwrap();
    assert_eq!(latest.id(), bill_id);
    assert_eq!(latest.total(), Money::from_major(1_000).unwrap());
    assert_eq!(latest.customer().as_str(), "Alice");

    assert!(desk.draft().is_empty());
    assert_eq!(desk.total(), Money::ZERO);
}

#[test]
fn adding_more_than_stock_is_rejected() {
    let mut desk = shop(StockPolicy::Reserve);

    let err = desk.add_item(&pid("1"), 60).unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
    assert!(desk.pending_lines().is_empty());
}

#[test]
fn commit_with_nothing_to_bill_changes_nothing() {
    let mut desk = shop(StockPolicy::Reserve);
    let before = desk.snapshot();

    assert!(matches!(desk.commit_for("Alice"), Err(DomainError::Validation(_))));
    assert_eq!(desk.snapshot(), before);
}

#[test]
fn commit_without_customer_changes_nothing() {
    let mut desk = shop(StockPolicy::Reserve);
    desk.add_item(&pid("2"), 3).unwrap();
    let before = desk.snapshot();

    assert!(matches!(desk.commit_for(""), Err(DomainError::Validation(_))));
    assert!(matches!(desk.commit(), Err(DomainError::Validation(_))));
    assert!(matches!(desk.commit_for("Mallory"), Err(DomainError::NotFound(_))));
    assert_eq!(desk.snapshot(), before);
}

#[test]
fn repeated_lines_are_deducted_together() {
    let mut desk = shop(StockPolicy::Reserve);
    desk.add_item(&pid("1"), 10).unwrap();
    desk.add_item(&pid("2"), 1).unwrap();
    desk.add_item(&pid("1"), 5).unwrap();

    desk.commit_for("Bob").unwrap();

    assert_eq!(stock_of(&desk, "1"), 35);
    assert_eq!(stock_of(&desk, "2"), 9);
    let bill = desk.bills().latest().unwrap();
    assert_eq!(bill.items().len(), 3);
    assert_eq!(bill.total(), Money::from_minor(150_000 + 2_550));
}

#[test]
fn reserve_policy_stops_at_cumulative_stock() {
    let mut desk = shop(StockPolicy::Reserve);
    desk.add_item(&pid("1"), 30).unwrap();

    assert!(desk.add_item(&pid("1"), 30).is_err());
    desk.add_item(&pid("1"), 20).unwrap();
    assert_eq!(desk.draft().pending_quantity(&pid("1")), 50);
}

#[test]
fn recheck_policy_overcommit_is_refused_at_commit() {
    let mut desk = shop(StockPolicy::Recheck);
    desk.add_item(&pid("1"), 30).unwrap();
    desk.add_item(&pid("1"), 30).unwrap();
    let before = desk.snapshot();

    let err = desk.commit_for("Alice").unwrap_err();
    assert!(matches!(err, DomainError::InvariantViolation(_)));
    assert_eq!(desk.snapshot(), before);
    assert_eq!(stock_of(&desk, "1"), 50);
}

#[test]
fn huge_quantity_after_pending_line_is_rejected() {
    let mut desk = shop(StockPolicy::Reserve);
    desk.edit_product(&pid("1"), Money::from_minor(1), 50).unwrap();
    desk.add_item(&pid("1"), 10).unwrap();
    let before = desk.snapshot();

    let err = desk.add_item(&pid("1"), i64::MAX).unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
    assert_eq!(desk.snapshot(), before);
    assert_eq!(desk.draft().pending_quantity(&pid("1")), 10);
}

#[test]
fn recheck_commit_past_i64_range_is_refused() {
    let mut desk = shop(StockPolicy::Recheck);
    desk.edit_product(&pid("1"), Money::from_minor(1), i64::MAX).unwrap();
    desk.add_item(&pid("1"), i64::MAX).unwrap();
    desk.add_item(&pid("1"), i64::MAX).unwrap();
    let before = desk.snapshot();

    let err = desk.commit_for("Alice").unwrap_err();
    assert!(matches!(err, DomainError::InvariantViolation(_)));
    assert_eq!(desk.snapshot(), before);
    assert_eq!(stock_of(&desk, "1"), i64::MAX);
    assert!(desk.bills().is_empty());
}

#[test]
fn price_snapshot_survives_later_edit() {
    let mut desk = shop(StockPolicy::Reserve);
    desk.add_item(&pid("1"), 2).unwrap();
    desk.edit_product(&pid("1"), Money::from_major(150).unwrap(), 50).unwrap();
    desk.add_item(&pid("1"), 1).unwrap();

    assert_eq!(desk.total(), Money::from_major(350).unwrap());
}

#[test]
fn edit_leaves_other_products_alone() {
    let mut desk = shop(StockPolicy::Reserve);
    let mouse_before = desk.catalog().get(&pid("2")).unwrap().clone();

    desk.edit_product_raw(&pid("1"), "120.50", "7").unwrap();

    let laptop = desk.catalog().get(&pid("1")).unwrap();
    assert_eq!(laptop.price(), Money::from_minor(12_050));
    assert_eq!(laptop.stock(), 7);
    assert_eq!(laptop.name(), "Laptop");
    assert_eq!(desk.catalog().get(&pid("2")).unwrap(), &mouse_before);
}

#[test]
fn non_numeric_edit_is_ignored() {
    let mut desk = shop(StockPolicy::Reserve);
    let before = desk.snapshot();

    assert!(desk.edit_product_raw(&pid("1"), "cheap", "7").is_err());
    assert!(desk.edit_product_raw(&pid("1"), "10", "lots").is_err());
    assert!(desk.edit_product_raw(&pid("1"), "0", "7").is_err());
    assert!(desk.edit_product_raw(&pid("1"), "10", "-1").is_err());
    assert_eq!(desk.snapshot(), before);
}

#[test]
fn delete_removes_product_and_unknown_id_is_not_found() {
    let mut desk = shop(StockPolicy::Reserve);
    desk.delete_product(&pid("2")).unwrap();
    assert!(desk.catalog().get(&pid("2")).is_none());

    assert!(matches!(desk.delete_product(&pid("2")), Err(DomainError::NotFound(_))));
    assert_eq!(desk.products().len(), 1);
}

#[test]
fn remove_item_and_out_of_range_index() {
    let mut desk = shop(StockPolicy::Reserve);
    desk.add_item(&pid("1"), 1).unwrap();
    desk.add_item(&pid("2"), 2).unwrap();

    desk.remove_item(0).unwrap();
    assert_eq!(desk.pending_lines()[0].product_id, pid("2"));
    assert!(matches!(desk.remove_item(3), Err(DomainError::NotFound(_))));
    assert_eq!(desk.total(), Money::from_minor(5_100));
}

#[test]
fn history_is_newest_first() {
    let mut desk = shop(StockPolicy::Reserve);
    desk.add_item(&pid("2"), 1).unwrap();
    let first = desk.commit_for("Alice").unwrap();
    desk.add_item(&pid("2"), 1).unwrap();
    let second = desk.commit_for("Bob").unwrap();

    let summaries = desk.bill_summaries();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].id, second);
    assert_eq!(summaries[0].customer.as_str(), "Bob");
    assert_eq!(summaries[1].id, first);
    assert_ne!(first, second);
    assert_eq!(desk.draft().committed_count(), 2);
}

#[test]
fn snapshot_serializes_for_renderer() {
    let mut desk = BillingDesk::from_config(&DeskConfig::default()).unwrap();
    desk.select_customer("Shivam").unwrap();
    desk.add_item(&pid("3"), 2).unwrap();

    let json: serde_json::Value = serde_json::from_str(&desk.snapshot().to_json().unwrap()).unwrap();

    assert_eq!(json["stock_policy"], "reserve");
    assert_eq!(json["products"].as_array().unwrap().len(), 3);
    assert_eq!(json["products"][0]["name"], "Laptop");
    assert_eq!(json["products"][0]["price"], 8_299_999);
    assert_eq!(json["selected_customer"], "Shivam");
    assert_eq!(json["pending"][0]["product_name"], "Headphones");
    assert_eq!(json["pending_total"], 1_659_998);
    assert!(json["bills"].as_array().unwrap().is_empty());
}

mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 200,
            ..ProptestConfig::default()
        })]

        /// Property: after a commit, stock drops by exactly the committed quantity
        /// per product and the bill total equals the sum of its lines.
        #[test]
        fn commit_deducts_exactly_what_was_billed(
            adds in proptest::collection::vec((prop_oneof![Just("1"), Just("2")], 1i64..15), 1..10),
        ) {
            let mut desk = shop(StockPolicy::Reserve);
            for (id, qty) in &adds {
                let _ = desk.add_item(&pid(id), *qty);
            }
            prop_assume!(!desk.draft().is_empty());

            let before: Vec<(ProductId, i64)> = desk
                .products()
                .iter()
                .map(|p| (p.id().clone(), p.stock()))
                .collect();
            let pending: Vec<(ProductId, i64)> = desk
                .draft()
                .items()
                .iter()
                .map(|i| (i.product_id.clone(), i.quantity))
                .collect();

            desk.commit_for("Alice").unwrap();

            for (id, old_stock) in before {
                let billed: i64 = pending.iter().filter(|(p, _)| p == &id).map(|(_, q)| q).sum();
                prop_assert_eq!(desk.catalog().get(&id).unwrap().stock(), old_stock - billed);
                prop_assert!(desk.catalog().get(&id).unwrap().stock() >= 0);
            }

            let bill = desk.bills().latest().unwrap();
            let sum = Money::checked_sum(bill.items().iter().map(|i| i.total())).unwrap();
            prop_assert_eq!(bill.total(), sum);
        }
    }
}
