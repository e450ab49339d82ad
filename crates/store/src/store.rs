//! Store traits describing the repository contract.
//!
//! One trait per entity family; [`Store`] bundles them for consumers that
//! need the whole surface (the API state). Implementations must behave as
//! documented here — in particular the stock primitives are conditional
//! updates that never let stock go negative, and
//! [`CatalogStore::decrement_product_stock_batch`] is all-or-nothing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{
    ClientId, DocumentId, Money, OrderId, PhoneId, ProductId, RawMaterialId, SaleId,
    SocialAccountId, UserId,
};

use crate::Result;
use crate::entities::{
    Client, IdentityDocument, Order, OrderStatus, PhoneNumber, Product, RawMaterial, Sale,
    SocialAccount, User,
};

/// Client records.
#[async_trait]
pub trait ClientStore: Send + Sync {
    async fn insert_client(&self, client: Client) -> Result<Client>;
    async fn get_client(&self, id: ClientId) -> Result<Client>;
    /// Full replace by id; fails with `NotFound` if the id is absent.
    async fn update_client(&self, client: Client) -> Result<Client>;
    async fn list_clients(&self, only_active: bool) -> Result<Vec<Client>>;
    /// Case-insensitive substring match on name or surname.
    async fn search_clients(&self, needle: &str) -> Result<Vec<Client>>;
    async fn find_client_by_email(&self, email: &str) -> Result<Option<Client>>;
    /// True if any client other than `exclude` already holds `email`.
    async fn client_email_exists(&self, email: &str, exclude: Option<ClientId>) -> Result<bool>;
}

/// Client-owned contact records: phones, social accounts, documents.
#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn insert_phone(&self, phone: PhoneNumber) -> Result<PhoneNumber>;
    async fn get_phone(&self, id: PhoneId) -> Result<PhoneNumber>;
    async fn update_phone(&self, phone: PhoneNumber) -> Result<PhoneNumber>;
    async fn list_phones(&self, only_active: bool) -> Result<Vec<PhoneNumber>>;
    async fn phones_for_client(&self, client_id: ClientId) -> Result<Vec<PhoneNumber>>;
    /// Substring match on the stored number.
    async fn search_phones(&self, needle: &str) -> Result<Vec<PhoneNumber>>;

    async fn insert_social(&self, social: SocialAccount) -> Result<SocialAccount>;
    async fn get_social(&self, id: SocialAccountId) -> Result<SocialAccount>;
    async fn update_social(&self, social: SocialAccount) -> Result<SocialAccount>;
    async fn list_socials(&self, only_active: bool) -> Result<Vec<SocialAccount>>;
    async fn socials_for_client(&self, client_id: ClientId) -> Result<Vec<SocialAccount>>;
    async fn socials_by_network(&self, network: &str) -> Result<Vec<SocialAccount>>;

    async fn insert_document(&self, document: IdentityDocument) -> Result<IdentityDocument>;
    async fn get_document(&self, id: DocumentId) -> Result<IdentityDocument>;
    async fn update_document(&self, document: IdentityDocument) -> Result<IdentityDocument>;
    async fn list_documents(&self, only_active: bool) -> Result<Vec<IdentityDocument>>;
    async fn documents_for_client(&self, client_id: ClientId) -> Result<Vec<IdentityDocument>>;
    async fn find_document_by_number(&self, number: &str) -> Result<Option<IdentityDocument>>;
    /// True if any document other than `exclude` already holds `number`.
    async fn document_number_exists(&self, number: &str, exclude: Option<DocumentId>)
    -> Result<bool>;
}

/// Products and raw materials, including the atomic stock primitives.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn insert_product(&self, product: Product) -> Result<Product>;
    async fn get_product(&self, id: ProductId) -> Result<Product>;
    async fn update_product(&self, product: Product) -> Result<Product>;
    async fn list_products(&self, only_active: bool) -> Result<Vec<Product>>;
    async fn search_products(&self, needle: &str) -> Result<Vec<Product>>;
    async fn products_by_price_range(&self, min: Money, max: Money) -> Result<Vec<Product>>;
    /// Products with stock strictly below `threshold`.
    async fn products_low_stock(&self, threshold: u32) -> Result<Vec<Product>>;
    async fn products_out_of_stock(&self) -> Result<Vec<Product>>;
    async fn products_by_material(&self, material_id: RawMaterialId) -> Result<Vec<Product>>;

    /// Overwrites the stock level.
    async fn set_product_stock(&self, id: ProductId, value: u32) -> Result<Product>;
    async fn increment_product_stock(&self, id: ProductId, qty: u32) -> Result<Product>;
    /// Conditional decrement: fails with `InsufficientStock` and leaves the
    /// record untouched when the current stock is below `qty`.
    async fn decrement_product_stock(&self, id: ProductId, qty: u32) -> Result<Product>;
    /// Decrements every `(product, qty)` pair under one guard. Either all
    /// lines are applied or none are; no stock ever goes negative.
    async fn decrement_product_stock_batch(&self, lines: &[(ProductId, u32)]) -> Result<()>;

    async fn insert_material(&self, material: RawMaterial) -> Result<RawMaterial>;
    async fn get_material(&self, id: RawMaterialId) -> Result<RawMaterial>;
    async fn update_material(&self, material: RawMaterial) -> Result<RawMaterial>;
    async fn list_materials(&self, only_active: bool) -> Result<Vec<RawMaterial>>;
    async fn search_materials(&self, needle: &str) -> Result<Vec<RawMaterial>>;
    async fn materials_by_price_range(&self, min: Money, max: Money) -> Result<Vec<RawMaterial>>;
    async fn materials_low_stock(&self, threshold: u32) -> Result<Vec<RawMaterial>>;
    async fn materials_out_of_stock(&self) -> Result<Vec<RawMaterial>>;

    async fn set_material_stock(&self, id: RawMaterialId, value: u32) -> Result<RawMaterial>;
    async fn increment_material_stock(&self, id: RawMaterialId, qty: u32) -> Result<RawMaterial>;
    async fn decrement_material_stock(&self, id: RawMaterialId, qty: u32) -> Result<RawMaterial>;
}

/// Order records.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn insert_order(&self, order: Order) -> Result<Order>;
    async fn get_order(&self, id: OrderId) -> Result<Order>;
    async fn update_order(&self, order: Order) -> Result<Order>;
    /// Hard delete; the domain layer restricts this to Pending orders.
    async fn delete_order(&self, id: OrderId) -> Result<()>;
    async fn list_orders(&self) -> Result<Vec<Order>>;
    async fn orders_by_status(&self, status: OrderStatus) -> Result<Vec<Order>>;
    async fn orders_for_client(&self, client_id: ClientId) -> Result<Vec<Order>>;
    /// Orders in a non-terminal status (Pending or InProcess).
    async fn open_orders(&self) -> Result<Vec<Order>>;
    async fn orders_created_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Order>>;
}

/// Sale records, with the one-sale-per-order unique index.
#[async_trait]
pub trait SaleStore: Send + Sync {
    /// Fails with `Duplicate` if a sale already exists for the same order.
    async fn insert_sale(&self, sale: Sale) -> Result<Sale>;
    async fn get_sale(&self, id: SaleId) -> Result<Sale>;
    async fn update_sale(&self, sale: Sale) -> Result<Sale>;
    async fn delete_sale(&self, id: SaleId) -> Result<()>;
    async fn list_sales(&self) -> Result<Vec<Sale>>;
    async fn sale_for_order(&self, order_id: OrderId) -> Result<Option<Sale>>;
    /// Sales whose order belongs to the given client.
    async fn sales_for_client(&self, client_id: ClientId) -> Result<Vec<Sale>>;
    async fn sales_created_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Sale>>;
    async fn sales_delivered_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Sale>>;
    async fn sales_by_price_range(&self, min: Money, max: Money) -> Result<Vec<Sale>>;
}

/// User accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `Duplicate` if the username is taken.
    async fn insert_user(&self, user: User) -> Result<User>;
    async fn get_user(&self, id: UserId) -> Result<User>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn update_user(&self, user: User) -> Result<User>;
    async fn list_users(&self) -> Result<Vec<User>>;
}

/// The full repository surface.
pub trait Store:
    ClientStore + ContactStore + CatalogStore + OrderStore + SaleStore + UserStore
{
}

impl<T> Store for T where
    T: ClientStore + ContactStore + CatalogStore + OrderStore + SaleStore + UserStore
{
}
