use common::{Money, ProductId, RawMaterialId};
use serde::{Deserialize, Serialize};

/// A finished product offered for sale.
///
/// Stock is an unsigned count, so a negative level is unrepresentable at
/// rest; all mutation goes through the store's stock primitives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    pub description: String,
    pub active: bool,
    pub stock: u32,
    /// Bill of materials, informational only — completing an order does not
    /// consume raw materials.
    pub material_ids: Vec<RawMaterialId>,
}

impl Product {
    pub fn new(
        name: impl Into<String>,
        price: Money,
        description: impl Into<String>,
        stock: u32,
        material_ids: Vec<RawMaterialId>,
    ) -> Self {
        Self {
            id: ProductId::new(),
            name: name.into(),
            price,
            description: description.into(),
            active: true,
            stock,
            material_ids,
        }
    }
}

/// A raw material used to build products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMaterial {
    pub id: RawMaterialId,
    pub name: String,
    pub description: String,
    pub price: Money,
    pub stock: u32,
    pub active: bool,
    /// Unit-of-measure tag: "kg", "litres", "units", etc.
    pub unit: String,
}

impl RawMaterial {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: Money,
        stock: u32,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            id: RawMaterialId::new(),
            name: name.into(),
            description: description.into(),
            price,
            stock,
            active: true,
            unit: unit.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_product_is_active() {
        let product = Product::new("Chair", Money::from_cents(500), "wooden chair", 10, vec![]);
        assert!(product.active);
        assert_eq!(product.stock, 10);
    }

    #[test]
    fn new_material_keeps_unit_tag() {
        let material = RawMaterial::new("Pine board", "", Money::from_cents(120), 40, "units");
        assert!(material.active);
        assert_eq!(material.unit, "units");
    }
}
