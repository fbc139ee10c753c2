use sea_orm::entity::prelude::*;

use crate::models::PhoneCondition;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "phones")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub brand: String,
    pub model: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
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
    #[sea_orm(column_type = "Double")]
    pub rating: f64,
    pub category_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_delete = "SetNull"
    )]
    Categories,
    #[sea_orm(has_many = "super::reviews::Entity")]
    Reviews,
    #[sea_orm(has_many = "super::order_items::Entity")]
    OrderItems,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl Related<super::reviews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl Related<super::order_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

// Accessories that list this phone as compatible.
impl Related<super::accessories::Entity> for Entity {
    fn to() -> RelationDef {
        super::accessory_compatible_phones::Relation::Accessories.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::accessory_compatible_phones::Relation::Phones.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
