//! Entity records and the repository layer for the mantis backend.
//!
//! This crate defines:
//! - the durable records (clients, contacts, catalog, orders, sales, users),
//! - per-entity store traits describing the query contract, and
//! - [`MemoryStore`], an in-memory implementation backed by a single
//!   `RwLock`, which makes multi-record operations (batch stock decrements,
//!   unique indexes) atomic.

pub mod entities;
mod error;
mod memory;
mod store;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use store::{CatalogStore, ClientStore, ContactStore, OrderStore, SaleStore, Store, UserStore};
