//! Shared types for the mantis backend.
//!
//! Typed entity identifiers and the `Money` value type used across the
//! store, domain, auth and API layers.

mod money;
mod types;

pub use money::Money;
pub use types::{
    ClientId, DocumentId, OrderId, OrderLineId, PhoneId, ProductId, RawMaterialId, SaleId,
    SocialAccountId, UserId,
};
