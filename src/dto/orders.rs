use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    dto::cart::CartView,
    error::{AppResult, Validator},
    models::{Order, OrderItem},
};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    /// Missing is reported by `validate`, after the empty-cart check.
    #[serde(default)]
    pub shipping_address: String,
    /// Flat amount subtracted from the total; zero when absent.
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "10.00")]
    pub discount: Option<Decimal>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CheckoutRequest {
    pub fn validate(&self) -> AppResult<()> {
        let mut v = Validator::new();
        v.required(&self.shipping_address, "shipping_address");
        if let Some(discount) = self.discount {
            v.check(
                !discount.is_sign_negative(),
                "discount",
                "Ensure this value is greater than or equal to 0.",
            );
            v.check(
                discount.round_dp(2) == discount,
                "discount",
                "Ensure that there are no more than 2 decimal places.",
            );
        }
        v.finish()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutPreview {
    pub cart: CartView,
    /// Address on the customer's profile, offered as the default shipping address.
    pub shipping_address: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct OrderList {
    #[schema(value_type = Vec<Order>)]
    pub items: Vec<Order>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn missing_address_parses_and_fails_validation() {
        let request: CheckoutRequest = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(request.shipping_address, "");

        match request.validate() {
            Err(AppError::Validation(fields)) => {
                assert!(fields.iter().any(|f| f.field == "shipping_address"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
