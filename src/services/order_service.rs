use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    audit::{self, AuditEvent},
    config::ORDER_PAGE_SIZE,
    dto::{
        cart::CartView,
        orders::{CheckoutPreview, CheckoutRequest, OrderList, OrderWithItems},
    },
    entity::{
        customer_profiles::{Column as ProfileCol, Entity as CustomerProfiles},
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
            Model as OrderItemModel,
        },
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, OrderItem, OrderStatus, PaymentStatus},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, paginate},
    session::Cart,
    state::AppState,
};

/// Money figures of an order about to be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    pub total_amount: Decimal,
    pub discount: Decimal,
    pub final_amount: Decimal,
}

#[derive(Debug)]
pub enum CheckoutOutcome {
    /// Nothing to order; the caller is sent back to the cart.
    EmptyCart,
    Placed(OrderWithItems),
}

/// Sum the cart and apply a flat discount. The discount may not exceed the total.
pub fn price_cart(cart: &Cart, discount: Option<Decimal>) -> AppResult<OrderTotals> {
    let total_amount = cart.total();
    let discount = discount.unwrap_or(Decimal::ZERO);

    if discount.is_sign_negative() {
        return Err(AppError::field(
            "discount",
            "Ensure this value is greater than or equal to 0.",
        ));
    }
    if discount > total_amount {
        return Err(AppError::field(
            "discount",
            format!("Ensure this value is less than or equal to {total_amount}."),
        ));
    }

    Ok(OrderTotals {
        total_amount,
        discount,
        final_amount: total_amount - discount,
    })
}

/// `ORD-{yyyymmdd}-{12 hex}`; uniqueness rests on the random part and the
/// unique index on `orders.order_number`.
pub fn build_order_number() -> String {
    let date = Utc::now().format("%Y%m%d");
    let token = Uuid::new_v4().simple().to_string();
    format!("ORD-{}-{}", date, &token[..12].to_uppercase())
}

pub async fn checkout_preview(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<CheckoutPreview>> {
    let cart = state.sessions.cart(&user.session_id).await;

    let shipping_address = CustomerProfiles::find()
        .filter(ProfileCol::UserId.eq(user.user_id))
        .one(&state.orm)
        .await?
        .map(|profile| profile.address)
        .filter(|address| !address.trim().is_empty());

    Ok(ApiResponse::success(
        "Checkout",
        CheckoutPreview {
            cart: CartView::from(&cart),
            shipping_address,
        },
        None,
    ))
}

/// Turn the session cart into an order. The order and its items are written in
/// one transaction; after it commits exactly the ordered quantities leave the
/// cart, so lines added meanwhile survive.
pub async fn checkout(
    state: &AppState,
    user: &AuthUser,
    payload: CheckoutRequest,
) -> AppResult<CheckoutOutcome> {
    let cart = state.sessions.cart(&user.session_id).await;
    if cart.is_empty() {
        return Ok(CheckoutOutcome::EmptyCart);
    }

    payload.validate()?;
    let totals = price_cart(&cart, payload.discount)?;

    let txn = state.orm.begin().await?;

    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        order_number: Set(build_order_number()),
        customer_id: Set(user.user_id),
        total_amount: Set(totals.total_amount),
        discount: Set(totals.discount),
        final_amount: Set(totals.final_amount),
        status: Set(OrderStatus::Pending),
        payment_status: Set(PaymentStatus::Pending),
        shipping_address: Set(payload.shipping_address.trim().to_string()),
        notes: Set(payload.notes.unwrap_or_default()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut items: Vec<OrderItem> = Vec::with_capacity(cart.len());
    for (_, entry) in cart.entries() {
        let item = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            item_type: Set(entry.item.item_type()),
            phone_id: Set(entry.item.phone_id()),
            accessory_id: Set(entry.item.accessory_id()),
            quantity: Set(entry.quantity),
            unit_price: Set(entry.price),
            total_price: Set(entry.subtotal()),
        }
        .insert(&txn)
        .await?;

        items.push(order_item_from_entity(item));
    }

    txn.commit().await?;
    state
        .sessions
        .update_cart(&user.session_id, |current| current.settle(&cart))
        .await;
    tracing::info!(
        order_id = %order.id,
        order_number = %order.order_number,
        items = items.len(),
        "order placed"
    );

    audit::record(
        &state.pool,
        AuditEvent::new(
            user.user_id,
            "checkout",
            "orders",
            serde_json::json!({
                "order_id": order.id,
                "order_number": order.order_number,
                "final_amount": order.final_amount,
            }),
        ),
    )
    .await;

    Ok(CheckoutOutcome::Placed(OrderWithItems {
        order: order_from_entity(order),
        items,
    }))
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = paginate(query.page, ORDER_PAGE_SIZE);
    let mut condition = Condition::all().add(OrderCol::CustomerId.eq(user.user_id));
    if let Some(status) = query.status.as_ref() {
        condition = condition.add(OrderCol::Status.eq(status.clone()));
    }

    let finder = Orders::find()
        .filter(condition)
        .order_by_desc(OrderCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Ok",
        OrderList { items: orders },
        Some(meta),
    ))
}

/// Another customer's order is reported as not found.
pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::CustomerId.eq(user.user_id))
                .add(OrderCol::Id.eq(id)),
        )
        .one(&state.orm)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_item_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        OrderWithItems {
            order: order_from_entity(order),
            items,
        },
        Some(Meta::empty()),
    ))
}

fn order_from_entity(model: OrderModel) -> Order {
    Order {
        id: model.id,
        order_number: model.order_number,
        customer_id: model.customer_id,
        total_amount: model.total_amount,
        discount: model.discount,
        final_amount: model.final_amount,
        status: model.status,
        payment_status: model.payment_status,
        shipping_address: model.shipping_address,
        notes: model.notes,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn order_item_from_entity(model: OrderItemModel) -> OrderItem {
    OrderItem {
        id: model.id,
        order_id: model.order_id,
        item_type: model.item_type,
        item_id: model.phone_id.or(model.accessory_id),
        quantity: model.quantity,
        unit_price: model.unit_price,
        total_price: model.total_price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::ItemRef, session::CartEntry};
    use rust_decimal_macros::dec;

    fn sample_cart() -> Cart {
        let mut cart = Cart::default();
        let phone = CartEntry::new(ItemRef::Phone(Uuid::new_v4()), "Pixel 9", dec!(599.99));
        let key = phone.key();
        cart.add(phone);
        cart.increment(&key);
        cart.add(CartEntry::new(
            ItemRef::Accessory(Uuid::new_v4()),
            "USB-C charger",
            dec!(19.99),
        ));
        cart
    }

    #[test]
    fn totals_apply_flat_discount() {
        let totals = price_cart(&sample_cart(), Some(dec!(10.00))).unwrap();
        assert_eq!(totals.total_amount, dec!(1219.97));
        assert_eq!(totals.discount, dec!(10.00));
        assert_eq!(totals.final_amount, dec!(1209.97));
    }

    #[test]
    fn line_totals_snapshot_price_times_quantity() {
        let cart = sample_cart();
        let mut subtotals: Vec<Decimal> = cart.entries().map(|(_, e)| e.subtotal()).collect();
        subtotals.sort();
        assert_eq!(subtotals, vec![dec!(19.99), dec!(1199.98)]);
    }

    #[test]
    fn missing_discount_means_zero() {
        let totals = price_cart(&sample_cart(), None).unwrap();
        assert_eq!(totals.discount, Decimal::ZERO);
        assert_eq!(totals.final_amount, totals.total_amount);
    }

    #[test]
    fn discount_beyond_total_is_rejected() {
        assert!(matches!(
            price_cart(&sample_cart(), Some(dec!(1219.98))),
            Err(AppError::Validation(_))
        ));
        assert!(price_cart(&sample_cart(), Some(dec!(1219.97))).is_ok());
        assert!(price_cart(&sample_cart(), Some(dec!(-1))).is_err());
    }

    #[test]
    fn order_numbers_are_dated_and_distinct() {
        let first = build_order_number();
        let second = build_order_number();

        assert!(first.starts_with("ORD-"), "{first}");
        assert!(first[4..12].chars().all(|c| c.is_ascii_digit()), "{first}");
        assert_eq!(&first[12..13], "-");
        assert_eq!(first.len(), "ORD-".len() + 8 + 1 + 12);
        assert_ne!(first, second);
    }
}
