use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        cart::{CartLine, CartView},
        catalog::{
            AccessoryDetail, AccessoryList, CategoryList, CreateAccessoryRequest,
            CreateCategoryRequest, CreatePhoneRequest, PhoneDetail, PhoneList,
            UpdateAccessoryRequest, UpdateCategoryRequest, UpdatePhoneRequest,
        },
        orders::{CheckoutPreview, CheckoutRequest, OrderList, OrderWithItems},
        profile::UpdateProfileRequest,
        reviews::CreateReviewRequest,
    },
    error::FieldError,
    models::{
        Accessory, Category, CustomerProfile, ItemRef, ItemType, Order, OrderItem, OrderStatus,
        PaymentStatus, Phone, PhoneCondition, Review, User,
    },
    response::{ApiResponse, Meta},
    routes::{
        accessories, auth, cart, categories, checkout, health, orders, params, phones, profile,
        reviews,
    },
    session::CartEntry,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::logout,
        phones::list_phones,
        phones::get_phone,
        phones::create_phone,
        phones::update_phone,
        phones::delete_phone,
        accessories::list_accessories,
        accessories::get_accessory,
        accessories::create_accessory,
        accessories::update_accessory,
        accessories::delete_accessory,
        categories::list_categories,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        cart::view_cart,
        cart::add_to_cart,
        cart::remove_from_cart,
        checkout::checkout_preview,
        checkout::checkout,
        orders::list_orders,
        orders::get_order,
        reviews::add_review,
        profile::get_profile,
        profile::update_profile
    ),
    components(
        schemas(
            User,
            Category,
            Phone,
            PhoneCondition,
            Accessory,
            CustomerProfile,
            Order,
            OrderStatus,
            PaymentStatus,
            OrderItem,
            ItemType,
            ItemRef,
            Review,
            CartEntry,
            CartLine,
            CartView,
            CheckoutRequest,
            CheckoutPreview,
            OrderList,
            OrderWithItems,
            CategoryList,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            PhoneList,
            PhoneDetail,
            CreatePhoneRequest,
            UpdatePhoneRequest,
            AccessoryList,
            AccessoryDetail,
            CreateAccessoryRequest,
            UpdateAccessoryRequest,
            CreateReviewRequest,
            UpdateProfileRequest,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            FieldError,
            params::PhoneQuery,
            params::AccessoryQuery,
            params::OrderListQuery,
            Meta,
            ApiResponse<Phone>,
            ApiResponse<PhoneList>,
            ApiResponse<Accessory>,
            ApiResponse<AccessoryList>,
            ApiResponse<CartView>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>,
            ApiResponse<Review>,
            ApiResponse<CustomerProfile>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration and sessions"),
        (name = "Phones", description = "Phone catalog"),
        (name = "Accessories", description = "Accessory catalog"),
        (name = "Categories", description = "Catalog categories"),
        (name = "Cart", description = "Session cart"),
        (name = "Orders", description = "Checkout and order history"),
        (name = "Reviews", description = "Product reviews"),
        (name = "Profile", description = "Customer profile"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/api/phones",
            "/api/phones/{id}",
            "/api/accessories/{id}",
            "/api/cart/add/{item_type}/{item_id}",
            "/api/cart/remove/{cart_item_key}",
            "/api/checkout",
            "/api/orders/{id}",
            "/api/reviews/add/{item_type}/{item_id}",
            "/api/profile",
            "/api/auth/logout",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {expected}"
            );
        }
    }
}
