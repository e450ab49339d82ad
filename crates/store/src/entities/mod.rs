//! Durable entity records.
//!
//! All records are owning-side: children carry a foreign key to their owner
//! (`client_id`, `product_id`, `order_id`) and there are no back-pointers.
//! Deletion is logical (an `active` flag) for everything except orders and
//! sales, which support restricted hard deletion.

mod catalog;
mod client;
mod order;
mod sale;
mod user;

pub use catalog::{Product, RawMaterial};
pub use client::{Client, IdentityDocument, PhoneNumber, SocialAccount};
pub use order::{Order, OrderLine, OrderStatus};
pub use sale::Sale;
pub use user::{Role, User};
