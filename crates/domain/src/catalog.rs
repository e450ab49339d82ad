//! Product and raw-material services, including stock adjustment rules.

use store::CatalogStore;
use store::entities::{Product, RawMaterial};
use common::{Money, ProductId, RawMaterialId};

use crate::{DomainError, validate};

/// Input for creating or replacing a product. Stock arrives signed from the
/// wire and is narrowed during validation.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: Money,
    pub description: String,
    pub stock: i64,
    pub material_ids: Vec<RawMaterialId>,
}

#[derive(Debug, Clone)]
pub struct NewRawMaterial {
    pub name: String,
    pub description: String,
    pub price: Money,
    pub stock: i64,
    pub unit: String,
}

/// Service for managing products.
#[derive(Clone)]
pub struct ProductService<S> {
    store: S,
}

impl<S: CatalogStore> ProductService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    async fn check_materials(&self, ids: &[RawMaterialId]) -> Result<(), DomainError> {
        for id in ids {
            self.store.get_material(*id).await?;
        }
        Ok(())
    }

    #[tracing::instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: NewProduct) -> Result<Product, DomainError> {
        validate::non_blank("name", &input.name)?;
        validate::positive_price("price", input.price)?;
        let stock = validate::quantity("stock", input.stock)?;
        self.check_materials(&input.material_ids).await?;

        Ok(self
            .store
            .insert_product(Product::new(
                input.name,
                input.price,
                input.description,
                stock,
                input.material_ids,
            ))
            .await?)
    }

    #[tracing::instrument(skip(self, input))]
    pub async fn update(&self, id: ProductId, input: NewProduct) -> Result<Product, DomainError> {
        let existing = self.store.get_product(id).await?;
        validate::non_blank("name", &input.name)?;
        validate::positive_price("price", input.price)?;
        let stock = validate::quantity("stock", input.stock)?;
        self.check_materials(&input.material_ids).await?;

        Ok(self
            .store
            .update_product(Product {
                name: input.name,
                price: input.price,
                description: input.description,
                stock,
                material_ids: input.material_ids,
                ..existing
            })
            .await?)
    }

    pub async fn get(&self, id: ProductId) -> Result<Product, DomainError> {
        Ok(self.store.get_product(id).await?)
    }

    pub async fn list(&self, only_active: bool) -> Result<Vec<Product>, DomainError> {
        Ok(self.store.list_products(only_active).await?)
    }

    pub async fn search(&self, needle: &str) -> Result<Vec<Product>, DomainError> {
        Ok(self.store.search_products(needle).await?)
    }

    pub async fn by_price_range(&self, min: Money, max: Money) -> Result<Vec<Product>, DomainError> {
        if min > max {
            return Err(DomainError::InvalidArgument(
                "min price must not exceed max price".into(),
            ));
        }
        Ok(self.store.products_by_price_range(min, max).await?)
    }

    pub async fn low_stock(&self, threshold: i64) -> Result<Vec<Product>, DomainError> {
        let threshold = validate::quantity("threshold", threshold)?;
        Ok(self.store.products_low_stock(threshold).await?)
    }

    pub async fn out_of_stock(&self) -> Result<Vec<Product>, DomainError> {
        Ok(self.store.products_out_of_stock().await?)
    }

    pub async fn by_material(
        &self,
        material_id: RawMaterialId,
    ) -> Result<Vec<Product>, DomainError> {
        self.store.get_material(material_id).await?;
        Ok(self.store.products_by_material(material_id).await?)
    }

    /// Overwrites the stock level.
    #[tracing::instrument(skip(self))]
    pub async fn set_stock(&self, id: ProductId, value: i64) -> Result<Product, DomainError> {
        let value = validate::quantity("stock", value)?;
        Ok(self.store.set_product_stock(id, value).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn increment_stock(&self, id: ProductId, qty: i64) -> Result<Product, DomainError> {
        let qty = validate::quantity("quantity", qty)?;
        Ok(self.store.increment_product_stock(id, qty).await?)
    }

    /// Conditional decrement: the product is untouched when stock is below
    /// the requested quantity.
    #[tracing::instrument(skip(self))]
    pub async fn decrement_stock(&self, id: ProductId, qty: i64) -> Result<Product, DomainError> {
        let qty = validate::quantity("quantity", qty)?;
        Ok(self.store.decrement_product_stock(id, qty).await?)
    }

    pub async fn deactivate(&self, id: ProductId) -> Result<Product, DomainError> {
        let mut product = self.store.get_product(id).await?;
        product.active = false;
        Ok(self.store.update_product(product).await?)
    }
}

/// Service for managing raw materials.
#[derive(Clone)]
pub struct RawMaterialService<S> {
    store: S,
}

impl<S: CatalogStore> RawMaterialService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[tracing::instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: NewRawMaterial) -> Result<RawMaterial, DomainError> {
        validate::non_blank("name", &input.name)?;
        validate::positive_price("price", input.price)?;
        let stock = validate::quantity("stock", input.stock)?;

        Ok(self
            .store
            .insert_material(RawMaterial::new(
                input.name,
                input.description,
                input.price,
                stock,
                input.unit,
            ))
            .await?)
    }

    #[tracing::instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: RawMaterialId,
        input: NewRawMaterial,
    ) -> Result<RawMaterial, DomainError> {
        let existing = self.store.get_material(id).await?;
        validate::non_blank("name", &input.name)?;
        validate::positive_price("price", input.price)?;
        let stock = validate::quantity("stock", input.stock)?;

        Ok(self
            .store
            .update_material(RawMaterial {
                name: input.name,
                description: input.description,
                price: input.price,
                stock,
                unit: input.unit,
                ..existing
            })
            .await?)
    }

    pub async fn get(&self, id: RawMaterialId) -> Result<RawMaterial, DomainError> {
        Ok(self.store.get_material(id).await?)
    }

    pub async fn list(&self, only_active: bool) -> Result<Vec<RawMaterial>, DomainError> {
        Ok(self.store.list_materials(only_active).await?)
    }

    pub async fn search(&self, needle: &str) -> Result<Vec<RawMaterial>, DomainError> {
        Ok(self.store.search_materials(needle).await?)
    }

    pub async fn by_price_range(
        &self,
        min: Money,
        max: Money,
    ) -> Result<Vec<RawMaterial>, DomainError> {
        if min > max {
            return Err(DomainError::InvalidArgument(
                "min price must not exceed max price".into(),
            ));
        }
        Ok(self.store.materials_by_price_range(min, max).await?)
    }

    pub async fn low_stock(&self, threshold: i64) -> Result<Vec<RawMaterial>, DomainError> {
        let threshold = validate::quantity("threshold", threshold)?;
        Ok(self.store.materials_low_stock(threshold).await?)
    }

    pub async fn out_of_stock(&self) -> Result<Vec<RawMaterial>, DomainError> {
        Ok(self.store.materials_out_of_stock().await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn set_stock(&self, id: RawMaterialId, value: i64) -> Result<RawMaterial, DomainError> {
        let value = validate::quantity("stock", value)?;
        Ok(self.store.set_material_stock(id, value).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn increment_stock(
        &self,
        id: RawMaterialId,
        qty: i64,
    ) -> Result<RawMaterial, DomainError> {
        let qty = validate::quantity("quantity", qty)?;
        Ok(self.store.increment_material_stock(id, qty).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn decrement_stock(
        &self,
        id: RawMaterialId,
        qty: i64,
    ) -> Result<RawMaterial, DomainError> {
        let qty = validate::quantity("quantity", qty)?;
        Ok(self.store.decrement_material_stock(id, qty).await?)
    }

    pub async fn deactivate(&self, id: RawMaterialId) -> Result<RawMaterial, DomainError> {
        let mut material = self.store.get_material(id).await?;
        material.active = false;
        Ok(self.store.update_material(material).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::MemoryStore;

    fn new_product(name: &str, stock: i64) -> NewProduct {
        NewProduct {
            name: name.into(),
            price: Money::from_cents(2_500),
            description: "".into(),
            stock,
            material_ids: vec![],
        }
    }

    #[tokio::test]
    async fn create_rejects_nonpositive_price_and_negative_stock() {
        let service = ProductService::new(MemoryStore::new());

        let mut input = new_product("Chair", 10);
        input.price = Money::zero();
        assert_eq!(
            service.create(input).await.unwrap_err().kind(),
            "invalid_argument"
        );

        assert_eq!(
            service
                .create(new_product("Chair", -1))
                .await
                .unwrap_err()
                .kind(),
            "invalid_argument"
        );
    }

    #[tokio::test]
    async fn create_rejects_unknown_material() {
        let service = ProductService::new(MemoryStore::new());
        let mut input = new_product("Chair", 10);
        input.material_ids.push(RawMaterialId::new());
        assert_eq!(service.create(input).await.unwrap_err().kind(), "not_found");
    }

    #[tokio::test]
    async fn stock_adjustments() {
        let service = ProductService::new(MemoryStore::new());
        let product = service.create(new_product("Chair", 10)).await.unwrap();

        let product = service.increment_stock(product.id, 5).await.unwrap();
        assert_eq!(product.stock, 15);

        let product = service.decrement_stock(product.id, 12).await.unwrap();
        assert_eq!(product.stock, 3);

        // Decrement below zero fails and leaves the level unchanged.
        let err = service.decrement_stock(product.id, 4).await.unwrap_err();
        assert_eq!(err.kind(), "insufficient_stock");
        assert_eq!(service.get(product.id).await.unwrap().stock, 3);

        // Negative deltas are arguments errors, not silent wraps.
        let err = service.increment_stock(product.id, -1).await.unwrap_err();
        assert_eq!(err.kind(), "invalid_argument");

        let product = service.set_stock(product.id, 0).await.unwrap();
        assert_eq!(product.stock, 0);
    }

    #[tokio::test]
    async fn price_range_requires_ordered_bounds() {
        let service = ProductService::new(MemoryStore::new());
        let err = service
            .by_price_range(Money::from_cents(100), Money::from_cents(50))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "invalid_argument");
    }

    #[tokio::test]
    async fn material_lifecycle() {
        let service = RawMaterialService::new(MemoryStore::new());
        let material = service
            .create(NewRawMaterial {
                name: "Pine board".into(),
                description: "".into(),
                price: Money::from_cents(120),
                stock: 40,
                unit: "units".into(),
            })
            .await
            .unwrap();

        let material = service.decrement_stock(material.id, 40).await.unwrap();
        assert_eq!(material.stock, 0);
        assert!(
            service
                .out_of_stock()
                .await
                .unwrap()
                .iter()
                .any(|m| m.id == material.id)
        );

        let material = service.deactivate(material.id).await.unwrap();
        assert!(!material.active);
        assert!(service.list(true).await.unwrap().is_empty());
    }
}
