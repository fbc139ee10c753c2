use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accessory_compatible_phones")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub accessory_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub phone_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accessories::Entity",
        from = "Column::AccessoryId",
        to = "super::accessories::Column::Id",
        on_delete = "Cascade"
    )]
    Accessories,
    #[sea_orm(
        belongs_to = "super::phones::Entity",
        from = "Column::PhoneId",
        to = "super::phones::Column::Id",
        on_delete = "Cascade"
    )]
    Phones,
}

impl ActiveModelBehavior for ActiveModel {}
