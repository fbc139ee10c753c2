use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::{AppResult, Validator};

/// Profile form. Every submission replaces all fields; omitted ones are blanked.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateProfileRequest {
    pub phone_number: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub date_of_birth: Option<NaiveDate>,
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> AppResult<()> {
        Validator::new()
            .max_len(&self.phone_number, 20, "phone_number")
            .max_len(&self.city, 100, "city")
            .max_len(&self.state, 100, "state")
            .max_len(&self.zip_code, 20, "zip_code")
            .max_len(&self.country, 100, "country")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default_to_blank() {
        let request: UpdateProfileRequest =
            serde_json::from_value(serde_json::json!({ "city": "Lagos" })).unwrap();
        assert_eq!(request.city, "Lagos");
        assert_eq!(request.address, "");
        assert!(request.date_of_birth.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn overlong_fields_are_rejected() {
        let request = UpdateProfileRequest {
            phone_number: "1".repeat(21),
            zip_code: "9".repeat(21),
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }
}
