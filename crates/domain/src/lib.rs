//! Domain services for the mantis backend.
//!
//! Each service wraps the store with the business rules for one entity
//! family: field validation, uniqueness checks, logical deletion, and for
//! orders the lifecycle state machine coupled with stock decrement on
//! completion.

pub mod catalog;
pub mod clients;
pub mod contacts;
mod error;
pub mod orders;
pub mod sales;
pub mod validate;

pub use catalog::{NewProduct, NewRawMaterial, ProductService, RawMaterialService};
pub use clients::{ClientService, ClientUpdate, NewClient};
pub use contacts::{
    DocumentService, NewDocument, NewPhone, NewSocialAccount, PhoneService, SocialAccountService,
};
pub use error::DomainError;
pub use orders::{NewOrderLine, OrderService};
pub use sales::{SaleService, SaleStats};
