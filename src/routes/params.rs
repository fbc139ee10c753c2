use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{error::AppError, models::ItemType};

/// Query-string values arrive as text and HTML forms submit untouched inputs
/// as empty strings; treat those as absent.
pub fn empty_as_none<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = Option::<String>::deserialize(de)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse::<T>().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Normalise a requested page against a fixed page size into `(page, per_page, offset)`.
pub fn paginate(page: Option<i64>, per_page: i64) -> (i64, i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let offset = page.saturating_sub(1).saturating_mul(per_page);
    (page, per_page, offset)
}

/// `{item_type}` path segment of cart and review routes.
pub fn parse_item_type(raw: &str) -> Result<ItemType, AppError> {
    raw.parse::<ItemType>().map_err(AppError::BadRequest)
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PhoneQuery {
    /// Case-insensitive match on name, brand or description.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub category: Option<Uuid>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub min_price: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub max_price: Option<Decimal>,
    /// One of `new`, `refurbished`, `used`.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub condition: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page: Option<i64>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AccessoryQuery {
    /// Case-insensitive match on name, accessory type or description.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub category: Option<Uuid>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub min_price: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub max_price: Option<Decimal>,
    /// Exact accessory type, e.g. `Case`.
    #[serde(default, rename = "type", deserialize_with = "empty_as_none")]
    pub accessory_type: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page: Option<i64>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderListQuery {
    /// Filter by order status.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn parse<T: serde::de::DeserializeOwned>(query: &str) -> T {
        let uri: axum::http::Uri = format!("/phones?{query}").parse().unwrap();
        axum::extract::Query::<T>::try_from_uri(&uri).unwrap().0
    }

    #[test]
    fn blank_form_fields_are_ignored() {
        let query: PhoneQuery =
            parse("search=&category=&min_price=&max_price=&condition=&page=");
        assert!(query.search.is_none());
        assert!(query.category.is_none());
        assert!(query.min_price.is_none());
        assert!(query.max_price.is_none());
        assert!(query.condition.is_none());
        assert!(query.page.is_none());
    }

    #[test]
    fn prices_parse_as_exact_decimals() {
        let query: PhoneQuery = parse("min_price=100&max_price=500.50&condition=used&page=2");
        assert_eq!(query.min_price, Some(dec!(100)));
        assert_eq!(query.max_price, Some(dec!(500.50)));
        assert_eq!(query.condition.as_deref(), Some("used"));
        assert_eq!(query.page, Some(2));
    }

    #[test]
    fn accessory_type_reads_from_type_param() {
        let query: AccessoryQuery = parse("type=Case&search=clear");
        assert_eq!(query.accessory_type.as_deref(), Some("Case"));
        assert_eq!(query.search.as_deref(), Some("clear"));
    }

    #[test]
    fn unknown_item_type_is_a_bad_request() {
        assert_eq!(parse_item_type("phone").unwrap(), ItemType::Phone);
        assert!(matches!(
            parse_item_type("tablet"),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn paginate_clamps_to_first_page() {
        assert_eq!(paginate(None, 12), (1, 12, 0));
        assert_eq!(paginate(Some(0), 12), (1, 12, 0));
        assert_eq!(paginate(Some(3), 10), (3, 10, 20));
    }

    #[test]
    fn huge_page_saturates_instead_of_overflowing() {
        let query: PhoneQuery = parse("page=9223372036854775807");
        let (page, per_page, offset) = paginate(query.page, 12);
        assert_eq!(page, i64::MAX);
        assert_eq!(per_page, 12);
        assert_eq!(offset, i64::MAX);
    }
}
