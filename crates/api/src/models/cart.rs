//! Cart models and line-set operations.
//!
//! The cart is a per-user document: an ordered list of lines keyed by
//! `(product, variant)` plus a derived total. The line-set operations here
//! are pure; persistence is a single-row write in the repository.
//!
//! The total is always recomputed from scratch after a mutation, never
//! patched incrementally.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use juniper_core::{CartId, ProductId, UserId, VariantId};

use super::catalog::{Product, ProductVariant};

/// One cart line: quantity of a variant at the price captured when it was
/// first added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: ProductId,
    pub variant: VariantId,
    pub quantity: u32,
    pub price: Decimal,
}

/// A user's cart as stored.
#[derive(Debug, Clone, Serialize)]
pub struct Cart {
    pub id: CartId,
    pub user_id: UserId,
    pub items: Vec<CartLine>,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A cart line with its catalog references resolved.
///
/// `product`/`variant` are `None` when the referenced catalog entry no
/// longer exists; the captured line data is still returned.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineExpanded {
    pub product: Option<Product>,
    pub variant: Option<ProductVariant>,
    pub quantity: u32,
    pub price: Decimal,
}

/// A cart with every line expanded against the catalog.
#[derive(Debug, Clone, Serialize)]
pub struct CartExpanded {
    pub id: CartId,
    pub user_id: UserId,
    pub items: Vec<CartLineExpanded>,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Line-set operations
// =============================================================================

/// Add a line, merging into an existing `(product, variant)` line if present.
///
/// A repeated add accumulates quantity on the existing line; the price
/// captured by the first add is left untouched.
pub fn merge_line(
    items: &mut Vec<CartLine>,
    product: ProductId,
    variant: VariantId,
    quantity: u32,
    price: Decimal,
) {
    match items
        .iter_mut()
        .find(|line| line.product == product && line.variant == variant)
    {
        Some(line) => line.quantity += quantity,
        None => items.push(CartLine {
            product,
            variant,
            quantity,
            price,
        }),
    }
}

/// Overwrite the quantity of the matching line.
///
/// Returns `false` when no line matches `(product, variant)`.
pub fn set_quantity(
    items: &mut [CartLine],
    product: ProductId,
    variant: VariantId,
    quantity: u32,
) -> bool {
    match items
        .iter_mut()
        .find(|line| line.product == product && line.variant == variant)
    {
        Some(line) => {
            line.quantity = quantity;
            true
        }
        None => false,
    }
}

/// Remove the matching line. Removing an absent line is a no-op.
pub fn remove_line(items: &mut Vec<CartLine>, product: ProductId, variant: VariantId) {
    items.retain(|line| line.product != product || line.variant != variant);
}

/// Total of the line set: Σ(price × quantity), computed fresh.
#[must_use]
pub fn total(items: &[CartLine]) -> Decimal {
    items
        .iter()
        .map(|line| line.price * Decimal::from(line.quantity))
        .sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(product: i32, variant: i32, quantity: u32, price: Decimal) -> CartLine {
        CartLine {
            product: ProductId::new(product),
            variant: VariantId::new(variant),
            quantity,
            price,
        }
    }

    #[test]
    fn test_merge_appends_new_line() {
        let mut items = Vec::new();
        merge_line(
            &mut items,
            ProductId::new(1),
            VariantId::new(1),
            2,
            Decimal::from(10),
        );
        assert_eq!(items, vec![line(1, 1, 2, Decimal::from(10))]);
    }

    #[test]
    fn test_merge_accumulates_quantity_keeps_price() {
        let mut items = vec![line(1, 1, 2, Decimal::from(10))];
        // Repeated add with a different submitted price: quantity accumulates,
        // the captured price stays.
        merge_line(
            &mut items,
            ProductId::new(1),
            VariantId::new(1),
            3,
            Decimal::from(12),
        );
        assert_eq!(items, vec![line(1, 1, 5, Decimal::from(10))]);
    }

    #[test]
    fn test_merge_distinguishes_variants() {
        let mut items = vec![line(1, 1, 1, Decimal::from(10))];
        merge_line(
            &mut items,
            ProductId::new(1),
            VariantId::new(2),
            1,
            Decimal::from(9),
        );
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_set_quantity_overwrites() {
        let mut items = vec![line(1, 1, 5, Decimal::from(10))];
        assert!(set_quantity(
            &mut items,
            ProductId::new(1),
            VariantId::new(1),
            1
        ));
        assert_eq!(items.first().unwrap().quantity, 1);
    }

    #[test]
    fn test_set_quantity_missing_line() {
        let mut items = vec![line(1, 1, 5, Decimal::from(10))];
        assert!(!set_quantity(
            &mut items,
            ProductId::new(1),
            VariantId::new(2),
            1
        ));
    }

    #[test]
    fn test_remove_line_absent_is_noop() {
        let mut items = vec![line(1, 1, 2, Decimal::from(10))];
        remove_line(&mut items, ProductId::new(9), VariantId::new(9));
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_total_exact_sum() {
        // 3 * 19.99 + 2 * 0.05 = 60.07, exactly
        let items = vec![
            line(1, 1, 3, Decimal::new(1999, 2)),
            line(2, 1, 2, Decimal::new(5, 2)),
        ];
        assert_eq!(total(&items), Decimal::new(6007, 2));
    }

    #[test]
    fn test_total_empty_is_zero() {
        assert_eq!(total(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_add_set_remove_scenario() {
        // Add(P1, V1, qty 2 @ 10) -> one line, total 20
        let mut items = Vec::new();
        merge_line(
            &mut items,
            ProductId::new(1),
            VariantId::new(1),
            2,
            Decimal::from(10),
        );
        assert_eq!(items.len(), 1);
        assert_eq!(total(&items), Decimal::from(20));

        // Add(P1, V1, qty 3 @ 10) -> one line qty 5, total 50
        merge_line(
            &mut items,
            ProductId::new(1),
            VariantId::new(1),
            3,
            Decimal::from(10),
        );
        assert_eq!(items.len(), 1);
        assert_eq!(items.first().unwrap().quantity, 5);
        assert_eq!(total(&items), Decimal::from(50));

        // SetQuantity(P1, V1, 1) -> total 10
        assert!(set_quantity(
            &mut items,
            ProductId::new(1),
            VariantId::new(1),
            1
        ));
        assert_eq!(total(&items), Decimal::from(10));

        // Remove(P1, V1) -> empty, total 0
        remove_line(&mut items, ProductId::new(1), VariantId::new(1));
        assert!(items.is_empty());
        assert_eq!(total(&items), Decimal::ZERO);
    }
}
