use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::session::{Cart, CartEntry};

#[derive(Debug, Serialize, ToSchema)]
pub struct CartLine {
    /// Key accepted by `POST /cart/remove/{cart_item_key}`.
    pub key: String,
    #[serde(flatten)]
    pub entry: CartEntry,
    #[schema(value_type = String)]
    pub subtotal: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub items: Vec<CartLine>,
    #[schema(value_type = String)]
    pub total_amount: Decimal,
    pub item_count: i32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let items: Vec<CartLine> = cart
            .entries()
            .map(|(key, entry)| CartLine {
                key: key.clone(),
                entry: entry.clone(),
                subtotal: entry.subtotal(),
            })
            .collect();
        let total_amount = items.iter().map(|line| line.subtotal).sum();
        let item_count = items.iter().map(|line| line.entry.quantity).sum();
        CartView {
            items,
            total_amount,
            item_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemRef;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    #[test]
    fn view_computes_subtotals_and_total() {
        let mut cart = Cart::default();
        let phone = CartEntry::new(ItemRef::Phone(Uuid::new_v4()), "Pixel 9", dec!(599.99));
        let key = phone.key();
        cart.add(phone);
        cart.increment(&key);
        cart.add(CartEntry::new(
            ItemRef::Accessory(Uuid::new_v4()),
            "Charger",
            dec!(19.99),
        ));

        let view = CartView::from(&cart);

        assert_eq!(view.items.len(), 2);
        assert_eq!(view.total_amount, dec!(1219.97));
        assert_eq!(view.item_count, 3);
        let line = view.items.iter().find(|l| l.key == key).unwrap();
        assert_eq!(line.subtotal, dec!(1199.98));
    }

    #[test]
    fn empty_cart_has_zero_total() {
        let view = CartView::from(&Cart::default());
        assert!(view.items.is_empty());
        assert_eq!(view.total_amount, Decimal::ZERO);
        assert_eq!(view.item_count, 0);
    }

    #[test]
    fn line_serializes_price_as_exact_string() {
        let mut cart = Cart::default();
        cart.add(CartEntry::new(
            ItemRef::Accessory(Uuid::nil()),
            "Case",
            dec!(19.99),
        ));
        let value = serde_json::to_value(CartView::from(&cart)).unwrap();
        let line = &value["items"][0];
        assert_eq!(line["item_type"], "accessory");
        assert_eq!(line["price"], "19.99");
        assert_eq!(line["quantity"], 1);
        assert_eq!(value["total_amount"], "19.99");
    }
}
