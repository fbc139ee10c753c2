//! Server-side session storage for shopping carts.
//!
//! Every authenticated session owns one [`Cart`]. Sessions are opened at login
//! with the token expiry, ended at logout, and swept by a background task once
//! they expire. Reading an unknown or expired session yields an empty cart.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use utoipa::ToSchema;

use crate::models::ItemRef;

/// One cart line: item reference plus the name and price captured when it was added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CartEntry {
    #[serde(flatten)]
    pub item: ItemRef,
    pub name: String,
    #[schema(value_type = String, example = "599.99")]
    pub price: Decimal,
    pub quantity: i32,
}

impl CartEntry {
    pub fn new(item: ItemRef, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            item,
            name: name.into(),
            price,
            quantity: 1,
        }
    }

    pub fn key(&self) -> String {
        self.item.cart_key()
    }

    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    entries: BTreeMap<String, CartEntry>,
}

impl Cart {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&CartEntry> {
        self.entries.get(key)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &CartEntry)> {
        self.entries.iter()
    }

    /// Bump the quantity of an existing entry. Returns false when the key is absent.
    pub fn increment(&mut self, key: &str) -> bool {
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.quantity += 1;
                true
            }
            None => false,
        }
    }

    /// Insert a fresh entry, or bump the existing one if another request added
    /// the same item in the meantime. The stored price snapshot is kept.
    pub fn add(&mut self, entry: CartEntry) {
        let key = entry.key();
        if !self.increment(&key) {
            self.entries.insert(key, entry);
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<CartEntry> {
        self.entries.remove(key)
    }

    /// Take an ordered snapshot out of the cart. Each line loses the quantity
    /// that was ordered; units added after the snapshot stay behind.
    pub fn settle(&mut self, ordered: &Cart) {
        for (key, placed) in ordered.entries() {
            let spent = match self.entries.get_mut(key) {
                Some(entry) => {
                    entry.quantity -= placed.quantity;
                    entry.quantity <= 0
                }
                None => false,
            };
            if spent {
                self.entries.remove(key);
            }
        }
    }

    pub fn total(&self) -> Decimal {
        self.entries.values().map(CartEntry::subtotal).sum()
    }
}

#[derive(Debug, Clone)]
struct SessionData {
    cart: Cart,
    expires_at: DateTime<Utc>,
}

impl SessionData {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Shared handle to every live session. Cloning is cheap.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, SessionData>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session with an empty cart. Reopening an id resets its expiry
    /// and keeps its cart.
    pub async fn open(&self, session_id: &str, expires_at: DateTime<Utc>) {
        let mut sessions = self.inner.write().await;
        sessions
            .entry(session_id.to_string())
            .and_modify(|data| data.expires_at = expires_at)
            .or_insert_with(|| SessionData {
                cart: Cart::default(),
                expires_at,
            });
    }

    /// Drop the session and its cart.
    pub async fn end(&self, session_id: &str) -> bool {
        self.inner.write().await.remove(session_id).is_some()
    }

    pub async fn is_open(&self, session_id: &str) -> bool {
        let now = Utc::now();
        self.inner
            .read()
            .await
            .get(session_id)
            .is_some_and(|data| data.is_live(now))
    }

    /// Copy of the session's cart; empty when the session is unknown or expired.
    pub async fn cart(&self, session_id: &str) -> Cart {
        let now = Utc::now();
        self.inner
            .read()
            .await
            .get(session_id)
            .filter(|data| data.is_live(now))
            .map(|data| data.cart.clone())
            .unwrap_or_default()
    }

    /// Mutate the cart of a live session under the write lock. Returns `None`
    /// when the session is unknown or expired; such a session is never revived.
    pub async fn update_cart<R>(
        &self,
        session_id: &str,
        f: impl FnOnce(&mut Cart) -> R,
    ) -> Option<R> {
        let now = Utc::now();
        let mut sessions = self.inner.write().await;
        sessions
            .get_mut(session_id)
            .filter(|data| data.is_live(now))
            .map(|data| f(&mut data.cart))
    }

    /// Remove every expired session, returning how many were dropped.
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.inner.write().await;
        let before = sessions.len();
        sessions.retain(|_, data| data.is_live(now));
        before - sessions.len()
    }
}
