pub mod accessories;
pub mod accessory_compatible_phones;
pub mod categories;
pub mod customer_profiles;
pub mod order_items;
pub mod orders;
pub mod phones;
pub mod reviews;
pub mod users;

pub use accessories::Entity as Accessories;
pub use accessory_compatible_phones::Entity as AccessoryCompatiblePhones;
pub use categories::Entity as Categories;
pub use customer_profiles::Entity as CustomerProfiles;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use phones::Entity as Phones;
pub use reviews::Entity as Reviews;
pub use users::Entity as Users;
