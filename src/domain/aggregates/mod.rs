//! Aggregates module
pub mod product;
pub mod order;
pub mod cart;
pub mod catalog;
pub mod user;

pub use product::Product;
pub use order::{Order, OrderError, OrderStatus, CustomerDetails, DeliveryMethod, ExtraField, NewOrder, Transition};
pub use cart::{Cart, CartError, CartItem};
pub use catalog::{visible_banners, Banner, Brand, Category, Service};
pub use user::{SessionUser, User};
