//! Shopper-side state: who is signed in, the promotion expiry and the cart.
//!
//! The signed-in user and the promotion expiry persist in client storage
//! under fixed keys; the cart lives only as long as the session.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::domain::aggregates::{Cart, SessionUser};
use crate::pricing::{compute_breakdown, PaymentMethod, PriceBreakdown, PricingError, PricingPolicy};
use crate::promo::PromotionalWindow;
use crate::storage::kv::{read_json, write_json};
use crate::storage::{KeyValueStore, StoreError};

const KEY_CURRENT_USER: &str = "current_user";
const KEY_PROMO_WINDOW: &str = "promo_window";

/// Typed access to the values kept in client storage.
#[derive(Clone)]
pub struct ClientState {
    kv: Arc<dyn KeyValueStore>,
}

impl ClientState {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self { Self { kv } }

    pub fn current_user(&self) -> Option<SessionUser> { self.read(KEY_CURRENT_USER) }

    pub fn set_current_user(&self, user: &SessionUser) -> Result<(), StoreError> {
        write_json(self.kv.as_ref(), KEY_CURRENT_USER, user)
    }

    pub fn clear_current_user(&self) -> Result<(), StoreError> { self.kv.remove(KEY_CURRENT_USER) }

    pub fn promo_window(&self) -> Option<PromotionalWindow> { self.read(KEY_PROMO_WINDOW) }

    pub fn set_promo_window(&self, window: &PromotionalWindow) -> Result<(), StoreError> {
        write_json(self.kv.as_ref(), KEY_PROMO_WINDOW, window)
    }

    /// Unreadable entries count as absent.
    fn read<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        read_json(self.kv.as_ref(), key)
            .map_err(|e| warn!(key, error = %e, "ignoring unreadable client storage entry"))
            .ok()
            .flatten()
    }
}

/// One shopper's session.
pub struct ShopperSession {
    state: ClientState,
    cart: Cart,
}

impl ShopperSession {
    pub fn new(state: ClientState) -> Self { Self { state, cart: Cart::new() } }

    pub fn state(&self) -> &ClientState { &self.state }
    pub fn cart(&self) -> &Cart { &self.cart }
    pub fn cart_mut(&mut self) -> &mut Cart { &mut self.cart }

    pub fn is_authenticated(&self) -> bool { self.state.current_user().is_some() }

    pub fn promotion_active(&self, now: DateTime<Utc>) -> bool {
        self.state.promo_window().is_some_and(|w| w.applies(now, self.is_authenticated()))
    }

    /// Prices the current cart with the shopper's promotion state.
    pub fn quote(&self, payment: Option<&PaymentMethod>, policy: &PricingPolicy, now: DateTime<Utc>) -> Result<PriceBreakdown, PricingError> {
        compute_breakdown(self.cart.items(), payment, self.promotion_active(now), policy)
    }

    /// Signs out and empties the cart; the promotion expiry is kept.
    pub fn sign_out(&mut self) -> Result<(), StoreError> {
        self.cart.clear();
        self.state.clear_current_user()
    }
}
