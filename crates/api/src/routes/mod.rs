pub mod auth;
pub mod clients;
pub mod contacts;
pub mod ops;
pub mod orders;
pub mod products;
pub mod raw_materials;
pub mod sales;
pub mod users;
