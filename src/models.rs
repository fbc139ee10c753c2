use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum PhoneCondition {
    #[default]
    #[sea_orm(string_value = "new")]
    New,
    #[sea_orm(string_value = "refurbished")]
    Refurbished,
    #[sea_orm(string_value = "used")]
    Used,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "processing")]
    Processing,
    #[sea_orm(string_value = "shipped")]
    Shipped,
    #[sea_orm(string_value = "delivered")]
    Delivered,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "failed")]
    Failed,
    #[sea_orm(string_value = "refunded")]
    Refunded,
}

/// Kind of catalog entity a cart entry, order item or review points at.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    #[sea_orm(string_value = "phone")]
    Phone,
    #[sea_orm(string_value = "accessory")]
    Accessory,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Phone => "phone",
            ItemType::Accessory => "accessory",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "phone" => Ok(ItemType::Phone),
            "accessory" => Ok(ItemType::Accessory),
            other => Err(format!("unknown item type '{other}'")),
        }
    }
}

/// Reference to exactly one catalog entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(tag = "item_type", content = "item_id", rename_all = "snake_case")]
pub enum ItemRef {
    Phone(Uuid),
    Accessory(Uuid),
}

impl ItemRef {
    pub fn new(item_type: ItemType, id: Uuid) -> Self {
        match item_type {
            ItemType::Phone => ItemRef::Phone(id),
            ItemType::Accessory => ItemRef::Accessory(id),
        }
    }

    pub fn item_type(&self) -> ItemType {
        match self {
            ItemRef::Phone(_) => ItemType::Phone,
            ItemRef::Accessory(_) => ItemType::Accessory,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            ItemRef::Phone(id) | ItemRef::Accessory(id) => *id,
        }
    }

    /// Key of the cart entry holding this item, e.g. `phone_<uuid>`.
    pub fn cart_key(&self) -> String {
        format!("{}_{}", self.item_type(), self.id())
    }

    pub fn phone_id(&self) -> Option<Uuid> {
        match self {
            ItemRef::Phone(id) => Some(*id),
            ItemRef::Accessory(_) => None,
        }
    }

    pub fn accessory_id(&self) -> Option<Uuid> {
        match self {
            ItemRef::Accessory(id) => Some(*id),
            ItemRef::Phone(_) => None,
        }
    }

    /// Rebuild a reference from the nullable storage columns. Returns `None`
    /// unless exactly one of them is set.
    pub fn from_columns(phone_id: Option<Uuid>, accessory_id: Option<Uuid>) -> Option<Self> {
        match (phone_id, accessory_id) {
            (Some(id), None) => Some(ItemRef::Phone(id)),
            (None, Some(id)) => Some(ItemRef::Accessory(id)),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Phone {
    pub id: Uuid,
    pub name: String,
    pub brand: String,
    pub model: String,
    pub description: String,
    #[schema(value_type = String, example = "599.99")]
    pub price: Decimal,
    pub stock: i32,
    pub processor: String,
    pub ram: String,
    pub storage: String,
    pub display_size: String,
    pub camera_mp: String,
    pub battery_mah: Option<i32>,
    pub os: String,
    pub condition: PhoneCondition,
    pub color: String,
    pub image_url: String,
    pub rating: f64,
    pub category_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Accessory {
    pub id: Uuid,
    pub name: String,
    pub brand: String,
    pub description: String,
    #[schema(value_type = String, example = "19.99")]
    pub price: Decimal,
    pub stock: i32,
    pub accessory_type: String,
    pub color: String,
    pub material: String,
    pub image_url: String,
    pub rating: f64,
    pub category_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CustomerProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub phone_number: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub date_of_birth: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub customer_id: Uuid,
    #[schema(value_type = String)]
    pub total_amount: Decimal,
    #[schema(value_type = String)]
    pub discount: Decimal,
    #[schema(value_type = String)]
    pub final_amount: Decimal,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub shipping_address: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub item_type: ItemType,
    /// `None` once the referenced phone or accessory has been deleted.
    pub item_id: Option<Uuid>,
    pub quantity: i32,
    #[schema(value_type = String)]
    pub unit_price: Decimal,
    #[schema(value_type = String)]
    pub total_price: Decimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Review {
    pub id: Uuid,
    #[serde(flatten)]
    pub target: ItemRef,
    pub customer_id: Uuid,
    pub rating: i32,
    pub title: String,
    pub review_text: String,
    pub is_verified_purchase: bool,
    pub helpful_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cart_key_combines_type_and_id() {
        let id = Uuid::new_v4();
        assert_eq!(ItemRef::Phone(id).cart_key(), format!("phone_{id}"));
        assert_eq!(ItemRef::Accessory(id).cart_key(), format!("accessory_{id}"));
    }

    #[test]
    fn from_columns_requires_exactly_one_reference() {
        let id = Uuid::new_v4();
        assert_eq!(ItemRef::from_columns(Some(id), None), Some(ItemRef::Phone(id)));
        assert_eq!(
            ItemRef::from_columns(None, Some(id)),
            Some(ItemRef::Accessory(id))
        );
        assert_eq!(ItemRef::from_columns(None, None), None);
        assert_eq!(ItemRef::from_columns(Some(id), Some(id)), None);
    }

    #[test]
    fn item_type_parses_path_segments() {
        assert_eq!("phone".parse::<ItemType>(), Ok(ItemType::Phone));
        assert_eq!("accessory".parse::<ItemType>(), Ok(ItemType::Accessory));
        assert!("case".parse::<ItemType>().is_err());
    }

    #[test]
    fn item_ref_serializes_as_type_and_id() {
        let id = Uuid::nil();
        let value = serde_json::to_value(ItemRef::Accessory(id)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "item_type": "accessory", "item_id": id })
        );
    }
}
