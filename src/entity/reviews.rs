use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "reviews")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub phone_id: Option<Uuid>,
    pub accessory_id: Option<Uuid>,
    pub customer_id: Uuid,
    pub rating: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub review_text: String,
    pub is_verified_purchase: bool,
    pub helpful_count: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::phones::Entity",
        from = "Column::PhoneId",
        to = "super::phones::Column::Id",
        on_delete = "Cascade"
    )]
    Phones,
    #[sea_orm(
        belongs_to = "super::accessories::Entity",
        from = "Column::AccessoryId",
        to = "super::accessories::Column::Id",
        on_delete = "Cascade"
    )]
    Accessories,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CustomerId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Users,
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

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
