use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppResult, Validator},
    models::{Accessory, Category, Phone, PhoneCondition, Review},
};

fn check_price(v: &mut Validator, price: Option<Decimal>) {
    if let Some(price) = price {
        v.check(
            !price.is_sign_negative(),
            "price",
            "Ensure this value is greater than or equal to 0.",
        );
        v.check(
            price.round_dp(2) == price && price < Decimal::from(100_000_000),
            "price",
            "Ensure that there are no more than 10 digits in total and 2 decimal places.",
        );
    }
}

fn check_stock(v: &mut Validator, stock: Option<i32>) {
    if let Some(stock) = stock {
        v.check(stock >= 0, "stock", "Ensure this value is greater than or equal to 0.");
    }
}

fn check_rating(v: &mut Validator, rating: Option<f64>) {
    if let Some(rating) = rating {
        v.check(
            (0.0..=5.0).contains(&rating),
            "rating",
            "Ensure this value is between 0 and 5.",
        );
    }
}

fn check_text(v: &mut Validator, value: Option<&str>, max: usize, field: &str, required: bool) {
    if let Some(value) = value {
        if required {
            v.required(value, field);
        }
        v.max_len(value, max, field);
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl CreateCategoryRequest {
    pub fn validate(&self) -> AppResult<()> {
        let mut v = Validator::new();
        check_text(&mut v, Some(&self.name), 100, "name", true);
        v.finish()
    }
}

impl UpdateCategoryRequest {
    pub fn validate(&self) -> AppResult<()> {
        let mut v = Validator::new();
        check_text(&mut v, self.name.as_deref(), 100, "name", true);
        v.finish()
    }
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct CategoryList {
    #[schema(value_type = Vec<Category>)]
    pub items: Vec<Category>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePhoneRequest {
    pub name: String,
    pub brand: String,
    pub model: String,
    #[serde(default)]
    pub description: String,
    #[schema(value_type = String, example = "599.99")]
    pub price: Decimal,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub processor: String,
    #[serde(default)]
    pub ram: String,
    #[serde(default)]
    pub storage: String,
    #[serde(default)]
    pub display_size: String,
    #[serde(default)]
    pub camera_mp: String,
    pub battery_mah: Option<i32>,
    #[serde(default)]
    pub os: String,
    #[serde(default)]
    pub condition: PhoneCondition,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub image_url: String,
    pub rating: Option<f64>,
    pub category_id: Option<Uuid>,
}

impl CreatePhoneRequest {
    pub fn validate(&self) -> AppResult<()> {
        let mut v = Validator::new();
        check_text(&mut v, Some(&self.name), 200, "name", true);
        check_text(&mut v, Some(&self.brand), 100, "brand", true);
        check_text(&mut v, Some(&self.model), 100, "model", true);
        check_text(&mut v, Some(&self.processor), 100, "processor", false);
        check_text(&mut v, Some(&self.ram), 50, "ram", false);
        check_text(&mut v, Some(&self.storage), 50, "storage", false);
        check_text(&mut v, Some(&self.display_size), 50, "display_size", false);
        check_text(&mut v, Some(&self.camera_mp), 100, "camera_mp", false);
        check_text(&mut v, Some(&self.os), 100, "os", false);
        check_text(&mut v, Some(&self.color), 50, "color", false);
        check_text(&mut v, Some(&self.image_url), 200, "image_url", false);
        check_price(&mut v, Some(self.price));
        check_stock(&mut v, Some(self.stock));
        check_rating(&mut v, self.rating);
        if let Some(battery) = self.battery_mah {
            v.check(battery >= 0, "battery_mah", "Ensure this value is greater than or equal to 0.");
        }
        v.finish()
    }
}

/// Partial update: absent fields keep their stored value.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdatePhoneRequest {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub processor: Option<String>,
    pub ram: Option<String>,
    pub storage: Option<String>,
    pub display_size: Option<String>,
    pub camera_mp: Option<String>,
    pub battery_mah: Option<i32>,
    pub os: Option<String>,
    pub condition: Option<PhoneCondition>,
    pub color: Option<String>,
    pub image_url: Option<String>,
    pub rating: Option<f64>,
    pub category_id: Option<Uuid>,
}

impl UpdatePhoneRequest {
    pub fn validate(&self) -> AppResult<()> {
        let mut v = Validator::new();
        check_text(&mut v, self.name.as_deref(), 200, "name", true);
        check_text(&mut v, self.brand.as_deref(), 100, "brand", true);
        check_text(&mut v, self.model.as_deref(), 100, "model", true);
        check_text(&mut v, self.processor.as_deref(), 100, "processor", false);
        check_text(&mut v, self.ram.as_deref(), 50, "ram", false);
        check_text(&mut v, self.storage.as_deref(), 50, "storage", false);
        check_text(&mut v, self.display_size.as_deref(), 50, "display_size", false);
        check_text(&mut v, self.camera_mp.as_deref(), 100, "camera_mp", false);
        check_text(&mut v, self.os.as_deref(), 100, "os", false);
        check_text(&mut v, self.color.as_deref(), 50, "color", false);
        check_text(&mut v, self.image_url.as_deref(), 200, "image_url", false);
        check_price(&mut v, self.price);
        check_stock(&mut v, self.stock);
        check_rating(&mut v, self.rating);
        v.finish()
    }
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct PhoneList {
    #[schema(value_type = Vec<Phone>)]
    pub items: Vec<Phone>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PhoneDetail {
    pub phone: Phone,
    pub reviews: Vec<Review>,
    pub compatible_accessories: Vec<Accessory>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAccessoryRequest {
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub description: String,
    #[schema(value_type = String, example = "19.99")]
    pub price: Decimal,
    #[serde(default)]
    pub stock: i32,
    pub accessory_type: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub material: String,
    #[serde(default)]
    pub image_url: String,
    pub rating: Option<f64>,
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub compatible_phone_ids: Vec<Uuid>,
}

impl CreateAccessoryRequest {
    pub fn validate(&self) -> AppResult<()> {
        let mut v = Validator::new();
        check_text(&mut v, Some(&self.name), 200, "name", true);
        check_text(&mut v, Some(&self.brand), 100, "brand", false);
        check_text(&mut v, Some(&self.accessory_type), 100, "accessory_type", true);
        check_text(&mut v, Some(&self.color), 50, "color", false);
        check_text(&mut v, Some(&self.material), 100, "material", false);
        check_text(&mut v, Some(&self.image_url), 200, "image_url", false);
        check_price(&mut v, Some(self.price));
        check_stock(&mut v, Some(self.stock));
        check_rating(&mut v, self.rating);
        v.finish()
    }
}

/// Partial update; a supplied `compatible_phone_ids` replaces the whole set.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateAccessoryRequest {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub accessory_type: Option<String>,
    pub color: Option<String>,
    pub material: Option<String>,
    pub image_url: Option<String>,
    pub rating: Option<f64>,
    pub category_id: Option<Uuid>,
    pub compatible_phone_ids: Option<Vec<Uuid>>,
}

impl UpdateAccessoryRequest {
    pub fn validate(&self) -> AppResult<()> {
        let mut v = Validator::new();
        check_text(&mut v, self.name.as_deref(), 200, "name", true);
        check_text(&mut v, self.brand.as_deref(), 100, "brand", false);
        check_text(&mut v, self.accessory_type.as_deref(), 100, "accessory_type", true);
        check_text(&mut v, self.color.as_deref(), 50, "color", false);
        check_text(&mut v, self.material.as_deref(), 100, "material", false);
        check_text(&mut v, self.image_url.as_deref(), 200, "image_url", false);
        check_price(&mut v, self.price);
        check_stock(&mut v, self.stock);
        check_rating(&mut v, self.rating);
        v.finish()
    }
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct AccessoryList {
    #[schema(value_type = Vec<Accessory>)]
    pub items: Vec<Accessory>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AccessoryDetail {
    pub accessory: Accessory,
    pub reviews: Vec<Review>,
    pub compatible_phones: Vec<Phone>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use rust_decimal_macros::dec;

    fn phone_request() -> CreatePhoneRequest {
        serde_json::from_value(serde_json::json!({
            "name": "Galaxy S24",
            "brand": "Samsung",
            "model": "SM-S921",
            "price": "799.99",
            "stock": 4
        }))
        .unwrap()
    }

    fn failed_fields(result: AppResult<()>) -> Vec<String> {
        match result {
            Err(AppError::Validation(fields)) => fields.into_iter().map(|f| f.field).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn minimal_phone_is_valid_with_defaults() {
        let request = phone_request();
        assert!(request.validate().is_ok());
        assert_eq!(request.condition, PhoneCondition::New);
        assert_eq!(request.price, dec!(799.99));
    }

    #[test]
    fn negative_price_and_stock_are_rejected() {
        let mut request = phone_request();
        request.price = dec!(-1);
        request.stock = -3;
        assert_eq!(failed_fields(request.validate()), vec!["price", "stock"]);
    }

    #[test]
    fn price_with_three_decimals_is_rejected() {
        let mut request = phone_request();
        request.price = dec!(1.999);
        assert_eq!(failed_fields(request.validate()), vec!["price"]);
    }

    #[test]
    fn rating_outside_zero_to_five_is_rejected() {
        let update = UpdatePhoneRequest {
            rating: Some(5.5),
            ..Default::default()
        };
        assert_eq!(failed_fields(update.validate()), vec!["rating"]);
    }

    #[test]
    fn blank_required_text_is_rejected_on_update() {
        let update = UpdateAccessoryRequest {
            name: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(failed_fields(update.validate()), vec!["name"]);
    }

    #[test]
    fn accessory_requires_type() {
        let request: CreateAccessoryRequest = serde_json::from_value(serde_json::json!({
            "name": "Clear case",
            "price": "19.99",
            "accessory_type": ""
        }))
        .unwrap();
        assert_eq!(failed_fields(request.validate()), vec!["accessory_type"]);
    }

    #[test]
    fn category_name_must_fit_column() {
        let request = CreateCategoryRequest {
            name: "x".repeat(101),
            description: None,
        };
        assert_eq!(failed_fields(request.validate()), vec!["name"]);
    }
}
