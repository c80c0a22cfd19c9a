//! Static seed data loaded once when a desk starts.

use billdesk_catalog::{Catalog, Product, ProductId};
use billdesk_core::{AggregateId, DomainError, DomainResult, Money};
use billdesk_customers::CustomerDirectory;

/// Which data set a fresh desk starts with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SeedProfile {
    /// The demo shop: three products and three customers.
    #[default]
    Demo,
    /// No products and no customers.
    Empty,
}

impl core::str::FromStr for SeedProfile {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "demo" => Ok(SeedProfile::Demo),
            "empty" => Ok(SeedProfile::Empty),
            other => Err(DomainError::validation(format!(
                "unknown seed profile {other:?} (expected \"demo\" or \"empty\")"
            ))),
        }
    }
}

/// (id, name, price, stock, category)
const DEMO_PRODUCTS: [(&str, &str, &str, i64, &str); 3] = [
    ("1", "Laptop", "82999.99", 50, "Electronics"),
    ("2", "Smartphone", "49999.99", 100, "Electronics"),
    ("3", "Headphones", "8299.99", 200, "Accessories"),
];

const DEMO_CUSTOMERS: [&str; 3] = ["Saakshi", "Shivam", "Shreya"];

impl SeedProfile {
    pub fn products(self) -> DomainResult<Vec<Product>> {
        match self {
            SeedProfile::Demo => DEMO_PRODUCTS
                .iter()
                .map(|(id, name, price, stock, category)| {
                    let price: Money = price.parse()?;
                    Product::new(ProductId::new(id)?, *name, price, *stock, *category)
                })
                .collect(),
            SeedProfile::Empty => Ok(Vec::new()),
        }
    }

    pub fn catalog(self) -> DomainResult<Catalog> {
        Catalog::seeded(AggregateId::new(), self.products()?)
    }

    pub fn customers(self) -> DomainResult<CustomerDirectory> {
        match self {
            SeedProfile::Demo => CustomerDirectory::new(DEMO_CUSTOMERS),
            SeedProfile::Empty => Ok(CustomerDirectory::default()),
        }
    }
}
