//! Integration tests for the cart line-set operations.
//!
//! These verify the aggregate's core invariants: one line per
//! `(product, variant)` pair, and a total that always equals
//! Σ(price × quantity) recomputed from scratch.

use rust_decimal::Decimal;

use juniper_api::models::cart::{CartLine, merge_line, remove_line, set_quantity, total};
use juniper_core::{ProductId, VariantId};

fn p(id: i32) -> ProductId {
    ProductId::new(id)
}

fn v(id: i32) -> VariantId {
    VariantId::new(id)
}

// =============================================================================
// Uniqueness and accumulation
// =============================================================================

#[test]
fn test_repeated_adds_accumulate_into_one_line() {
    let mut items: Vec<CartLine> = Vec::new();
    let quantities = [2_u32, 3, 1, 10, 4];

    for quantity in quantities {
        merge_line(&mut items, p(1), v(1), quantity, Decimal::from(10));
    }

    assert_eq!(items.len(), 1, "exactly one line per (product, variant)");
    let line = items.first().expect("one line");
    assert_eq!(line.quantity, quantities.iter().sum::<u32>());
}

#[test]
fn test_same_product_different_variant_gets_its_own_line() {
    let mut items = Vec::new();
    merge_line(&mut items, p(1), v(1), 1, Decimal::from(10));
    merge_line(&mut items, p(1), v(2), 1, Decimal::from(12));
    merge_line(&mut items, p(2), v(1), 1, Decimal::from(7));

    assert_eq!(items.len(), 3);
}

#[test]
fn test_first_captured_price_wins() {
    let mut items = Vec::new();
    merge_line(&mut items, p(1), v(1), 1, Decimal::new(999, 2));
    // The client resubmits with a different price; the line keeps the one
    // captured at first add.
    merge_line(&mut items, p(1), v(1), 1, Decimal::new(1299, 2));

    assert_eq!(items.first().expect("one line").price, Decimal::new(999, 2));
}

// =============================================================================
// Total recomputation
// =============================================================================

#[test]
fn test_total_tracks_every_mutation() {
    let mut items = Vec::new();

    merge_line(&mut items, p(1), v(1), 2, Decimal::from(10));
    assert_eq!(total(&items), Decimal::from(20));

    merge_line(&mut items, p(1), v(1), 3, Decimal::from(10));
    assert_eq!(total(&items), Decimal::from(50));

    assert!(set_quantity(&mut items, p(1), v(1), 1));
    assert_eq!(total(&items), Decimal::from(10));

    remove_line(&mut items, p(1), v(1));
    assert!(items.is_empty());
    assert_eq!(total(&items), Decimal::ZERO);
}

#[test]
fn test_total_has_no_accumulated_drift() {
    // 100 lines of 0.1 each; a float sum would drift, a Decimal sum must not.
    let mut items = Vec::new();
    for i in 0..100 {
        merge_line(&mut items, p(i), v(1), 1, Decimal::new(1, 1));
    }

    assert_eq!(total(&items), Decimal::from(10));
}

#[test]
fn test_total_matches_sum_after_mixed_operations() {
    let mut items = Vec::new();

    merge_line(&mut items, p(1), v(1), 3, Decimal::new(1999, 2));
    merge_line(&mut items, p(2), v(5), 1, Decimal::new(450, 2));
    merge_line(&mut items, p(1), v(2), 2, Decimal::new(799, 2));
    assert!(set_quantity(&mut items, p(2), v(5), 4));
    remove_line(&mut items, p(1), v(2));
    merge_line(&mut items, p(1), v(1), 1, Decimal::new(1999, 2));

    let expected: Decimal = items
        .iter()
        .map(|line| line.price * Decimal::from(line.quantity))
        .sum();
    assert_eq!(total(&items), expected);

    // 4 * 19.99 + 4 * 4.50 = 97.96
    assert_eq!(total(&items), Decimal::new(9796, 2));
}

// =============================================================================
// Removal and set-quantity edges
// =============================================================================

#[test]
fn test_remove_absent_line_changes_nothing() {
    let mut items = Vec::new();
    merge_line(&mut items, p(1), v(1), 2, Decimal::from(10));
    let before = items.clone();

    remove_line(&mut items, p(1), v(99));
    remove_line(&mut items, p(99), v(1));

    assert_eq!(items, before);
}

#[test]
fn test_set_quantity_is_not_additive() {
    let mut items = Vec::new();
    merge_line(&mut items, p(1), v(1), 5, Decimal::from(10));

    assert!(set_quantity(&mut items, p(1), v(1), 5));
    assert_eq!(items.first().expect("one line").quantity, 5);
    assert_eq!(total(&items), Decimal::from(50));
}

#[test]
fn test_set_quantity_reports_missing_line() {
    let mut items = Vec::new();
    merge_line(&mut items, p(1), v(1), 5, Decimal::from(10));

    assert!(!set_quantity(&mut items, p(1), v(2), 3));
    // Nothing changed
    assert_eq!(items.first().expect("one line").quantity, 5);
}

// =============================================================================
// Serialization of the stored document
// =============================================================================

#[test]
fn test_line_document_roundtrip() {
    let items = vec![
        CartLine {
            product: p(1),
            variant: v(2),
            quantity: 3,
            price: Decimal::new(1999, 2),
        },
        CartLine {
            product: p(4),
            variant: v(9),
            quantity: 1,
            price: Decimal::from(5),
        },
    ];

    let json = serde_json::to_string(&items).expect("serialize");
    let back: Vec<CartLine> = serde_json::from_str(&json).expect("deserialize");

    assert_eq!(back, items);
    assert_eq!(total(&back), total(&items));
}
