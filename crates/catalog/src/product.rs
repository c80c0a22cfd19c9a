use serde::{Deserialize, Serialize};

use billdesk_core::{DomainError, DomainResult, Entity, Money};

/// Product identifier as shown in the catalog (e.g. `"1"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductId(String);

impl ProductId {
    pub fn new(raw: impl AsRef<str>) -> DomainResult<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid_id("ProductId: cannot be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl core::str::FromStr for ProductId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ProductId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProductId> for String {
    fn from(value: ProductId) -> Self {
        value.0
    }
}

/// A sellable product. Owned by the [`Catalog`](crate::Catalog).
///
/// Only built through [`Product::new`], so it is serialize-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    id: ProductId,
    name: String,
    price: Money,
    stock: i64,
    category: String,
}

impl Product {
    /// Build a validated product (non-empty name, positive price, non-negative stock).
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        price: Money,
        stock: i64,
        category: impl Into<String>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        ensure_price(price)?;
        ensure_stock(stock)?;

        Ok(Self {
            id,
            name,
            price,
            stock,
            category: category.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn stock(&self) -> i64 {
        self.stock
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub(crate) fn set_price_and_stock(&mut self, price: Money, stock: i64) {
        self.price = price;
        self.stock = stock;
    }

    pub(crate) fn set_stock(&mut self, stock: i64) {
        self.stock = stock;
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

pub(crate) fn ensure_price(price: Money) -> DomainResult<()> {
    if price.is_zero() {
        return Err(DomainError::validation("price must be positive"));
    }
    Ok(())
}

pub(crate) fn ensure_stock(stock: i64) -> DomainResult<()> {
    if stock < 0 {
        return Err(DomainError::validation("stock cannot be negative"));
    }
    Ok(())
}
