use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{
    ClientId, DocumentId, Money, OrderId, PhoneId, ProductId, RawMaterialId, SaleId,
    SocialAccountId, UserId,
};
use tokio::sync::RwLock;

use crate::entities::{
    Client, IdentityDocument, Order, OrderStatus, PhoneNumber, Product, RawMaterial, Sale,
    SocialAccount, User,
};
use crate::store::{CatalogStore, ClientStore, ContactStore, OrderStore, SaleStore, UserStore};
use crate::{Result, StoreError};

#[derive(Default)]
struct Inner {
    clients: HashMap<ClientId, Client>,
    phones: HashMap<PhoneId, PhoneNumber>,
    socials: HashMap<SocialAccountId, SocialAccount>,
    documents: HashMap<DocumentId, IdentityDocument>,
    products: HashMap<ProductId, Product>,
    materials: HashMap<RawMaterialId, RawMaterial>,
    orders: HashMap<OrderId, Order>,
    sales: HashMap<SaleId, Sale>,
    /// Unique index: at most one sale per order.
    sales_by_order: HashMap<OrderId, SaleId>,
    users: HashMap<UserId, User>,
}

/// In-memory store implementation.
///
/// All tables live behind a single `RwLock`, so every store call is atomic
/// with respect to every other — including the multi-record batch stock
/// decrement used by order completion.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(entity: &'static str, id: impl Into<uuid::Uuid>) -> StoreError {
    StoreError::NotFound {
        entity,
        id: id.into(),
    }
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl Inner {
    fn decrement_stock_of(&mut self, id: ProductId, qty: u32) -> Result<Product> {
        let product = self
            .products
            .get_mut(&id)
            .ok_or_else(|| not_found("product", id))?;
        if product.stock < qty {
            return Err(StoreError::InsufficientStock {
                product: product.name.clone(),
                available: product.stock,
                requested: qty,
            });
        }
        product.stock -= qty;
        Ok(product.clone())
    }
}

#[async_trait]
impl ClientStore for MemoryStore {
    async fn insert_client(&self, client: Client) -> Result<Client> {
        let mut inner = self.inner.write().await;
        inner.clients.insert(client.id, client.clone());
        Ok(client)
    }

    async fn get_client(&self, id: ClientId) -> Result<Client> {
        let inner = self.inner.read().await;
        inner
            .clients
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("client", id))
    }

    async fn update_client(&self, client: Client) -> Result<Client> {
        let mut inner = self.inner.write().await;
        if !inner.clients.contains_key(&client.id) {
            return Err(not_found("client", client.id));
        }
        inner.clients.insert(client.id, client.clone());
        Ok(client)
    }

    async fn list_clients(&self, only_active: bool) -> Result<Vec<Client>> {
        let inner = self.inner.read().await;
        Ok(inner
            .clients
            .values()
            .filter(|c| !only_active || c.active)
            .cloned()
            .collect())
    }

    async fn search_clients(&self, needle: &str) -> Result<Vec<Client>> {
        let inner = self.inner.read().await;
        Ok(inner
            .clients
            .values()
            .filter(|c| contains(&c.name, needle) || contains(&c.surname, needle))
            .cloned()
            .collect())
    }

    async fn find_client_by_email(&self, email: &str) -> Result<Option<Client>> {
        let inner = self.inner.read().await;
        Ok(inner
            .clients
            .values()
            .find(|c| c.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn client_email_exists(&self, email: &str, exclude: Option<ClientId>) -> Result<bool> {
        let inner = self.inner.read().await;
        Ok(inner
            .clients
            .values()
            .any(|c| c.email.eq_ignore_ascii_case(email) && Some(c.id) != exclude))
    }
}

#[async_trait]
impl ContactStore for MemoryStore {
    async fn insert_phone(&self, phone: PhoneNumber) -> Result<PhoneNumber> {
        let mut inner = self.inner.write().await;
        inner.phones.insert(phone.id, phone.clone());
        Ok(phone)
    }

    async fn get_phone(&self, id: PhoneId) -> Result<PhoneNumber> {
        let inner = self.inner.read().await;
        inner
            .phones
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("phone", id))
    }

    async fn update_phone(&self, phone: PhoneNumber) -> Result<PhoneNumber> {
        let mut inner = self.inner.write().await;
        if !inner.phones.contains_key(&phone.id) {
            return Err(not_found("phone", phone.id));
        }
        inner.phones.insert(phone.id, phone.clone());
        Ok(phone)
    }

    async fn list_phones(&self, only_active: bool) -> Result<Vec<PhoneNumber>> {
        let inner = self.inner.read().await;
        Ok(inner
            .phones
            .values()
            .filter(|p| !only_active || p.active)
            .cloned()
            .collect())
    }

    async fn phones_for_client(&self, client_id: ClientId) -> Result<Vec<PhoneNumber>> {
        let inner = self.inner.read().await;
        Ok(inner
            .phones
            .values()
            .filter(|p| p.client_id == client_id)
            .cloned()
            .collect())
    }

    async fn search_phones(&self, needle: &str) -> Result<Vec<PhoneNumber>> {
        let inner = self.inner.read().await;
        Ok(inner
            .phones
            .values()
            .filter(|p| p.number.contains(needle))
            .cloned()
            .collect())
    }

    async fn insert_social(&self, social: SocialAccount) -> Result<SocialAccount> {
        let mut inner = self.inner.write().await;
        inner.socials.insert(social.id, social.clone());
        Ok(social)
    }

    async fn get_social(&self, id: SocialAccountId) -> Result<SocialAccount> {
        let inner = self.inner.read().await;
        inner
            .socials
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("social account", id))
    }

    async fn update_social(&self, social: SocialAccount) -> Result<SocialAccount> {
        let mut inner = self.inner.write().await;
        if !inner.socials.contains_key(&social.id) {
            return Err(not_found("social account", social.id));
        }
        inner.socials.insert(social.id, social.clone());
        Ok(social)
    }

    async fn list_socials(&self, only_active: bool) -> Result<Vec<SocialAccount>> {
        let inner = self.inner.read().await;
        Ok(inner
            .socials
            .values()
            .filter(|s| !only_active || s.active)
            .cloned()
            .collect())
    }

    async fn socials_for_client(&self, client_id: ClientId) -> Result<Vec<SocialAccount>> {
        let inner = self.inner.read().await;
        Ok(inner
            .socials
            .values()
            .filter(|s| s.client_id == client_id)
            .cloned()
            .collect())
    }

    async fn socials_by_network(&self, network: &str) -> Result<Vec<SocialAccount>> {
        let inner = self.inner.read().await;
        Ok(inner
            .socials
            .values()
            .filter(|s| s.network.eq_ignore_ascii_case(network))
            .cloned()
            .collect())
    }

    async fn insert_document(&self, document: IdentityDocument) -> Result<IdentityDocument> {
        let mut inner = self.inner.write().await;
        inner.documents.insert(document.id, document.clone());
        Ok(document)
    }

    async fn get_document(&self, id: DocumentId) -> Result<IdentityDocument> {
        let inner = self.inner.read().await;
        inner
            .documents
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("document", id))
    }

    async fn update_document(&self, document: IdentityDocument) -> Result<IdentityDocument> {
        let mut inner = self.inner.write().await;
        if !inner.documents.contains_key(&document.id) {
            return Err(not_found("document", document.id));
        }
        inner.documents.insert(document.id, document.clone());
        Ok(document)
    }

    async fn list_documents(&self, only_active: bool) -> Result<Vec<IdentityDocument>> {
        let inner = self.inner.read().await;
        Ok(inner
            .documents
            .values()
            .filter(|d| !only_active || d.active)
            .cloned()
            .collect())
    }

    async fn documents_for_client(&self, client_id: ClientId) -> Result<Vec<IdentityDocument>> {
        let inner = self.inner.read().await;
        Ok(inner
            .documents
            .values()
            .filter(|d| d.client_id == client_id)
            .cloned()
            .collect())
    }

    async fn find_document_by_number(&self, number: &str) -> Result<Option<IdentityDocument>> {
        let inner = self.inner.read().await;
        Ok(inner
            .documents
            .values()
            .find(|d| d.number == number)
            .cloned())
    }

    async fn document_number_exists(
        &self,
        number: &str,
        exclude: Option<DocumentId>,
    ) -> Result<bool> {
        let inner = self.inner.read().await;
        Ok(inner
            .documents
            .values()
            .any(|d| d.number == number && Some(d.id) != exclude))
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn insert_product(&self, product: Product) -> Result<Product> {
        let mut inner = self.inner.write().await;
        inner.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn get_product(&self, id: ProductId) -> Result<Product> {
        let inner = self.inner.read().await;
        inner
            .products
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("product", id))
    }

    async fn update_product(&self, product: Product) -> Result<Product> {
        let mut inner = self.inner.write().await;
        if !inner.products.contains_key(&product.id) {
            return Err(not_found("product", product.id));
        }
        inner.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn list_products(&self, only_active: bool) -> Result<Vec<Product>> {
        let inner = self.inner.read().await;
        Ok(inner
            .products
            .values()
            .filter(|p| !only_active || p.active)
            .cloned()
            .collect())
    }

    async fn search_products(&self, needle: &str) -> Result<Vec<Product>> {
        let inner = self.inner.read().await;
        Ok(inner
            .products
            .values()
            .filter(|p| contains(&p.name, needle))
            .cloned()
            .collect())
    }

    async fn products_by_price_range(&self, min: Money, max: Money) -> Result<Vec<Product>> {
        let inner = self.inner.read().await;
        Ok(inner
            .products
            .values()
            .filter(|p| p.price >= min && p.price <= max)
            .cloned()
            .collect())
    }

    async fn products_low_stock(&self, threshold: u32) -> Result<Vec<Product>> {
        let inner = self.inner.read().await;
        Ok(inner
            .products
            .values()
            .filter(|p| p.stock < threshold)
            .cloned()
            .collect())
    }

    async fn products_out_of_stock(&self) -> Result<Vec<Product>> {
        let inner = self.inner.read().await;
        Ok(inner
            .products
            .values()
            .filter(|p| p.stock == 0)
            .cloned()
            .collect())
    }

    async fn products_by_material(&self, material_id: RawMaterialId) -> Result<Vec<Product>> {
        let inner = self.inner.read().await;
        Ok(inner
            .products
            .values()
            .filter(|p| p.material_ids.contains(&material_id))
            .cloned()
            .collect())
    }

    async fn set_product_stock(&self, id: ProductId, value: u32) -> Result<Product> {
        let mut inner = self.inner.write().await;
        let product = inner
            .products
            .get_mut(&id)
            .ok_or_else(|| not_found("product", id))?;
        product.stock = value;
        Ok(product.clone())
    }

    async fn increment_product_stock(&self, id: ProductId, qty: u32) -> Result<Product> {
        let mut inner = self.inner.write().await;
        let product = inner
            .products
            .get_mut(&id)
            .ok_or_else(|| not_found("product", id))?;
        product.stock = product.stock.saturating_add(qty);
        Ok(product.clone())
    }

    async fn decrement_product_stock(&self, id: ProductId, qty: u32) -> Result<Product> {
        let mut inner = self.inner.write().await;
        inner.decrement_stock_of(id, qty)
    }

    async fn decrement_product_stock_batch(&self, lines: &[(ProductId, u32)]) -> Result<()> {
        let mut inner = self.inner.write().await;

        // Verify every line before touching anything.
        for (id, qty) in lines {
            let product = inner
                .products
                .get(id)
                .ok_or_else(|| not_found("product", *id))?;
            if product.stock < *qty {
                return Err(StoreError::InsufficientStock {
                    product: product.name.clone(),
                    available: product.stock,
                    requested: *qty,
                });
            }
        }

        for (id, qty) in lines {
            inner.decrement_stock_of(*id, *qty)?;
        }
        Ok(())
    }

    async fn insert_material(&self, material: RawMaterial) -> Result<RawMaterial> {
        let mut inner = self.inner.write().await;
        inner.materials.insert(material.id, material.clone());
        Ok(material)
    }

    async fn get_material(&self, id: RawMaterialId) -> Result<RawMaterial> {
        let inner = self.inner.read().await;
        inner
            .materials
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("raw material", id))
    }

    async fn update_material(&self, material: RawMaterial) -> Result<RawMaterial> {
        let mut inner = self.inner.write().await;
        if !inner.materials.contains_key(&material.id) {
            return Err(not_found("raw material", material.id));
        }
        inner.materials.insert(material.id, material.clone());
        Ok(material)
    }

    async fn list_materials(&self, only_active: bool) -> Result<Vec<RawMaterial>> {
        let inner = self.inner.read().await;
        Ok(inner
            .materials
            .values()
            .filter(|m| !only_active || m.active)
            .cloned()
            .collect())
    }

    async fn search_materials(&self, needle: &str) -> Result<Vec<RawMaterial>> {
        let inner = self.inner.read().await;
        Ok(inner
            .materials
            .values()
            .filter(|m| contains(&m.name, needle))
            .cloned()
            .collect())
    }

    async fn materials_by_price_range(&self, min: Money, max: Money) -> Result<Vec<RawMaterial>> {
        let inner = self.inner.read().await;
        Ok(inner
            .materials
            .values()
            .filter(|m| m.price >= min && m.price <= max)
            .cloned()
            .collect())
    }

    async fn materials_low_stock(&self, threshold: u32) -> Result<Vec<RawMaterial>> {
        let inner = self.inner.read().await;
        Ok(inner
            .materials
            .values()
            .filter(|m| m.stock < threshold)
            .cloned()
            .collect())
    }

    async fn materials_out_of_stock(&self) -> Result<Vec<RawMaterial>> {
        let inner = self.inner.read().await;
        Ok(inner
            .materials
            .values()
            .filter(|m| m.stock == 0)
            .cloned()
            .collect())
    }

    async fn set_material_stock(&self, id: RawMaterialId, value: u32) -> Result<RawMaterial> {
        let mut inner = self.inner.write().await;
        let material = inner
            .materials
            .get_mut(&id)
            .ok_or_else(|| not_found("raw material", id))?;
        material.stock = value;
        Ok(material.clone())
    }

    async fn increment_material_stock(&self, id: RawMaterialId, qty: u32) -> Result<RawMaterial> {
        let mut inner = self.inner.write().await;
        let material = inner
            .materials
            .get_mut(&id)
            .ok_or_else(|| not_found("raw material", id))?;
        material.stock = material.stock.saturating_add(qty);
        Ok(material.clone())
    }

    async fn decrement_material_stock(&self, id: RawMaterialId, qty: u32) -> Result<RawMaterial> {
        let mut inner = self.inner.write().await;
        let material = inner
            .materials
            .get_mut(&id)
            .ok_or_else(|| not_found("raw material", id))?;
        if material.stock < qty {
            return Err(StoreError::InsufficientStock {
                product: material.name.clone(),
                available: material.stock,
                requested: qty,
            });
        }
        material.stock -= qty;
        Ok(material.clone())
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn insert_order(&self, order: Order) -> Result<Order> {
        let mut inner = self.inner.write().await;
        inner.orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn get_order(&self, id: OrderId) -> Result<Order> {
        let inner = self.inner.read().await;
        inner
            .orders
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("order", id))
    }

    async fn update_order(&self, order: Order) -> Result<Order> {
        let mut inner = self.inner.write().await;
        if !inner.orders.contains_key(&order.id) {
            return Err(not_found("order", order.id));
        }
        inner.orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn delete_order(&self, id: OrderId) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner
            .orders
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found("order", id))
    }

    async fn list_orders(&self) -> Result<Vec<Order>> {
        let inner = self.inner.read().await;
        Ok(inner.orders.values().cloned().collect())
    }

    async fn orders_by_status(&self, status: OrderStatus) -> Result<Vec<Order>> {
        let inner = self.inner.read().await;
        Ok(inner
            .orders
            .values()
            .filter(|o| o.status == status)
            .cloned()
            .collect())
    }

    async fn orders_for_client(&self, client_id: ClientId) -> Result<Vec<Order>> {
        let inner = self.inner.read().await;
        Ok(inner
            .orders
            .values()
            .filter(|o| o.client_id == client_id)
            .cloned()
            .collect())
    }

    async fn open_orders(&self) -> Result<Vec<Order>> {
        let inner = self.inner.read().await;
        Ok(inner
            .orders
            .values()
            .filter(|o| o.status.is_open())
            .cloned()
            .collect())
    }

    async fn orders_created_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Order>> {
        let inner = self.inner.read().await;
        Ok(inner
            .orders
            .values()
            .filter(|o| o.created_at >= from && o.created_at <= to)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SaleStore for MemoryStore {
    async fn insert_sale(&self, sale: Sale) -> Result<Sale> {
        let mut inner = self.inner.write().await;
        if inner.sales_by_order.contains_key(&sale.order_id) {
            return Err(StoreError::Duplicate {
                entity: "sale",
                field: "order_id",
                value: sale.order_id.to_string(),
            });
        }
        inner.sales_by_order.insert(sale.order_id, sale.id);
        inner.sales.insert(sale.id, sale.clone());
        Ok(sale)
    }

    async fn get_sale(&self, id: SaleId) -> Result<Sale> {
        let inner = self.inner.read().await;
        inner
            .sales
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("sale", id))
    }

    async fn update_sale(&self, sale: Sale) -> Result<Sale> {
        let mut inner = self.inner.write().await;
        let existing = inner
            .sales
            .get(&sale.id)
            .ok_or_else(|| not_found("sale", sale.id))?;

        if existing.order_id != sale.order_id {
            if inner.sales_by_order.contains_key(&sale.order_id) {
                return Err(StoreError::Duplicate {
                    entity: "sale",
                    field: "order_id",
                    value: sale.order_id.to_string(),
                });
            }
            let old_order = existing.order_id;
            inner.sales_by_order.remove(&old_order);
            inner.sales_by_order.insert(sale.order_id, sale.id);
        }

        inner.sales.insert(sale.id, sale.clone());
        Ok(sale)
    }

    async fn delete_sale(&self, id: SaleId) -> Result<()> {
        let mut inner = self.inner.write().await;
        let sale = inner.sales.remove(&id).ok_or_else(|| not_found("sale", id))?;
        inner.sales_by_order.remove(&sale.order_id);
        Ok(())
    }

    async fn list_sales(&self) -> Result<Vec<Sale>> {
        let inner = self.inner.read().await;
        Ok(inner.sales.values().cloned().collect())
    }

    async fn sale_for_order(&self, order_id: OrderId) -> Result<Option<Sale>> {
        let inner = self.inner.read().await;
        Ok(inner
            .sales_by_order
            .get(&order_id)
            .and_then(|sale_id| inner.sales.get(sale_id))
            .cloned())
    }

    async fn sales_for_client(&self, client_id: ClientId) -> Result<Vec<Sale>> {
        let inner = self.inner.read().await;
        Ok(inner
            .sales
            .values()
            .filter(|s| {
                inner
                    .orders
                    .get(&s.order_id)
                    .is_some_and(|o| o.client_id == client_id)
            })
            .cloned()
            .collect())
    }

    async fn sales_created_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Sale>> {
        let inner = self.inner.read().await;
        Ok(inner
            .sales
            .values()
            .filter(|s| s.created_at >= from && s.created_at <= to)
            .cloned()
            .collect())
    }

    async fn sales_delivered_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Sale>> {
        let inner = self.inner.read().await;
        Ok(inner
            .sales
            .values()
            .filter(|s| s.delivered_at.is_some_and(|d| d >= from && d <= to))
            .cloned()
            .collect())
    }

    async fn sales_by_price_range(&self, min: Money, max: Money) -> Result<Vec<Sale>> {
        let inner = self.inner.read().await;
        Ok(inner
            .sales
            .values()
            .filter(|s| s.price >= min && s.price <= max)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: User) -> Result<User> {
        let mut inner = self.inner.write().await;
        if inner
            .users
            .values()
            .any(|u| u.username.eq_ignore_ascii_case(&user.username))
        {
            return Err(StoreError::Duplicate {
                entity: "user",
                field: "username",
                value: user.username.clone(),
            });
        }
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: UserId) -> Result<User> {
        let inner = self.inner.read().await;
        inner
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("user", id))
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .values()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    async fn update_user(&self, user: User) -> Result<User> {
        let mut inner = self.inner.write().await;
        if !inner.users.contains_key(&user.id) {
            return Err(not_found("user", user.id));
        }
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Role;

    #[tokio::test]
    async fn insert_and_get_client() {
        let store = MemoryStore::new();
        let client = Client::new("Ana", "Pérez", "ana@example.com", "", None);
        let id = client.id;

        store.insert_client(client).await.unwrap();
        let fetched = store.get_client(id).await.unwrap();
        assert_eq!(fetched.email, "ana@example.com");

        let missing = store.get_client(ClientId::new()).await;
        assert!(matches!(missing, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn email_exists_honors_exclusion() {
        let store = MemoryStore::new();
        let client = Client::new("Ana", "Pérez", "a@x.com", "", None);
        let id = client.id;
        store.insert_client(client).await.unwrap();

        assert!(store.client_email_exists("a@x.com", None).await.unwrap());
        assert!(store.client_email_exists("A@X.COM", None).await.unwrap());
        assert!(!store.client_email_exists("a@x.com", Some(id)).await.unwrap());
        assert!(!store.client_email_exists("b@x.com", None).await.unwrap());
    }

    #[tokio::test]
    async fn search_clients_is_case_insensitive() {
        let store = MemoryStore::new();
        store
            .insert_client(Client::new("Ana", "Pérez", "a@x.com", "", None))
            .await
            .unwrap();
        store
            .insert_client(Client::new("Bruno", "Gómez", "b@x.com", "", None))
            .await
            .unwrap();

        let hits = store.search_clients("ana").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Ana");

        let by_surname = store.search_clients("gómez").await.unwrap();
        assert_eq!(by_surname.len(), 1);
    }

    #[tokio::test]
    async fn decrement_stock_is_conditional() {
        let store = MemoryStore::new();
        let product = Product::new("Chair", Money::from_cents(500), "", 5, vec![]);
        let id = product.id;
        store.insert_product(product).await.unwrap();

        let err = store.decrement_product_stock(id, 6).await;
        assert!(matches!(err, Err(StoreError::InsufficientStock { available: 5, requested: 6, .. })));
        // Failed decrement leaves stock unchanged.
        assert_eq!(store.get_product(id).await.unwrap().stock, 5);

        let updated = store.decrement_product_stock(id, 5).await.unwrap();
        assert_eq!(updated.stock, 0);
    }

    #[tokio::test]
    async fn batch_decrement_is_all_or_nothing() {
        let store = MemoryStore::new();
        let a = Product::new("A", Money::from_cents(100), "", 10, vec![]);
        let b = Product::new("B", Money::from_cents(100), "", 1, vec![]);
        let (a_id, b_id) = (a.id, b.id);
        store.insert_product(a).await.unwrap();
        store.insert_product(b).await.unwrap();

        let err = store
            .decrement_product_stock_batch(&[(a_id, 4), (b_id, 2)])
            .await;
        assert!(matches!(err, Err(StoreError::InsufficientStock { .. })));
        assert_eq!(store.get_product(a_id).await.unwrap().stock, 10);
        assert_eq!(store.get_product(b_id).await.unwrap().stock, 1);

        store
            .decrement_product_stock_batch(&[(a_id, 4), (b_id, 1)])
            .await
            .unwrap();
        assert_eq!(store.get_product(a_id).await.unwrap().stock, 6);
        assert_eq!(store.get_product(b_id).await.unwrap().stock, 0);
    }

    #[tokio::test]
    async fn stock_increment_then_decrement_roundtrips() {
        let store = MemoryStore::new();
        let material = RawMaterial::new("Pine", "", Money::from_cents(100), 8, "units");
        let id = material.id;
        store.insert_material(material).await.unwrap();

        store.increment_material_stock(id, 5).await.unwrap();
        let after = store.decrement_material_stock(id, 5).await.unwrap();
        assert_eq!(after.stock, 8);
    }

    #[tokio::test]
    async fn stock_increment_saturates_at_u32_max() {
        let store = MemoryStore::new();
        let product = Product::new("A", Money::from_cents(100), "", u32::MAX - 1, vec![]);
        let id = product.id;
        store.insert_product(product).await.unwrap();

        let after = store.increment_product_stock(id, 5).await.unwrap();
        assert_eq!(after.stock, u32::MAX);
    }

    #[tokio::test]
    async fn low_stock_and_out_of_stock_queries() {
        let store = MemoryStore::new();
        store
            .insert_product(Product::new("A", Money::from_cents(100), "", 0, vec![]))
            .await
            .unwrap();
        store
            .insert_product(Product::new("B", Money::from_cents(100), "", 3, vec![]))
            .await
            .unwrap();
        store
            .insert_product(Product::new("C", Money::from_cents(100), "", 20, vec![]))
            .await
            .unwrap();

        assert_eq!(store.products_low_stock(5).await.unwrap().len(), 2);
        assert_eq!(store.products_out_of_stock().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn sale_per_order_index_rejects_duplicates() {
        let store = MemoryStore::new();
        let order_id = OrderId::new();

        store
            .insert_sale(Sale::new(order_id, Money::from_cents(100), None))
            .await
            .unwrap();
        let dup = store
            .insert_sale(Sale::new(order_id, Money::from_cents(200), None))
            .await;
        assert!(matches!(dup, Err(StoreError::Duplicate { field: "order_id", .. })));

        // Deleting the sale frees the order for a new one.
        let sale = store.sale_for_order(order_id).await.unwrap().unwrap();
        store.delete_sale(sale.id).await.unwrap();
        store
            .insert_sale(Sale::new(order_id, Money::from_cents(300), None))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn sales_for_client_joins_through_orders() {
        let store = MemoryStore::new();
        let client_id = ClientId::new();
        let other_client = ClientId::new();

        let order_a = Order::new(client_id, vec![], OrderStatus::Completed);
        let order_b = Order::new(other_client, vec![], OrderStatus::Completed);
        let (a_id, b_id) = (order_a.id, order_b.id);
        store.insert_order(order_a).await.unwrap();
        store.insert_order(order_b).await.unwrap();

        store
            .insert_sale(Sale::new(a_id, Money::from_cents(100), None))
            .await
            .unwrap();
        store
            .insert_sale(Sale::new(b_id, Money::from_cents(200), None))
            .await
            .unwrap();

        let sales = store.sales_for_client(client_id).await.unwrap();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].order_id, a_id);
    }

    #[tokio::test]
    async fn username_uniqueness_is_case_insensitive() {
        let store = MemoryStore::new();
        store
            .insert_user(User::new("admin", "hash".into(), vec![Role::Admin]))
            .await
            .unwrap();

        let dup = store
            .insert_user(User::new("Admin", "hash".into(), vec![Role::Employee]))
            .await;
        assert!(matches!(dup, Err(StoreError::Duplicate { field: "username", .. })));

        let found = store.find_user_by_username("ADMIN").await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn order_status_and_open_queries() {
        let store = MemoryStore::new();
        let client_id = ClientId::new();
        store
            .insert_order(Order::new(client_id, vec![], OrderStatus::Pending))
            .await
            .unwrap();
        store
            .insert_order(Order::new(client_id, vec![], OrderStatus::InProcess))
            .await
            .unwrap();
        store
            .insert_order(Order::new(client_id, vec![], OrderStatus::Completed))
            .await
            .unwrap();

        assert_eq!(store.open_orders().await.unwrap().len(), 2);
        assert_eq!(
            store
                .orders_by_status(OrderStatus::Completed)
                .await
                .unwrap()
                .len(),
            1
        );
        assert_eq!(store.orders_for_client(client_id).await.unwrap().len(), 3);
    }
}
