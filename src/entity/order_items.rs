use sea_orm::entity::prelude::*;

use crate::models::ItemType;

/// Storage keeps one nullable column per catalog table so each can carry its
/// own foreign key; `models::ItemRef` is the typed view of the pair.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "order_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub order_id: Uuid,
    pub item_type: ItemType,
    pub phone_id: Option<Uuid>,
    pub accessory_id: Option<Uuid>,
    pub quantity: i32,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub unit_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub total_price: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::orders::Entity",
        from = "Column::OrderId",
        to = "super::orders::Column::Id",
        on_delete = "Cascade"
    )]
    Orders,
    #[sea_orm(
        belongs_to = "super::phones::Entity",
        from = "Column::PhoneId",
        to = "super::phones::Column::Id",
        on_delete = "SetNull"
    )]
    Phones,
    #[sea_orm(
        belongs_to = "super::accessories::Entity",
        from = "Column::AccessoryId",
        to = "super::accessories::Column::Id",
        on_delete = "SetNull"
    )]
    Accessories,
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl Related<super::phones::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Phones.def()
    }
}

impl Related<super::accessories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accessories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
