use serde::{Deserialize, Serialize};

use billdesk_core::{DomainError, DomainResult};

/// A customer's display name: trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CustomerName(String);

impl CustomerName {
    pub fn new(raw: impl AsRef<str>) -> DomainResult<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("customer name cannot be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for CustomerName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CustomerName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CustomerName> for String {
    fn from(value: CustomerName) -> Self {
        value.0
    }
}

/// The customers a bill can be issued to, in selector order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CustomerDirectory {
    names: Vec<CustomerName>,
}

impl CustomerDirectory {
    /// Build a directory from seed names. Duplicates are dropped, keeping the
    /// first occurrence.
    pub fn new<I, S>(names: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut directory = Self::default();
        for raw in names {
            let name = CustomerName::new(raw)?;
            if !directory.names.contains(&name) {
                directory.names.push(name);
            }
        }
        Ok(directory)
    }

    pub fn names(&self) -> &[CustomerName] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, raw: &str) -> bool {
        let raw = raw.trim();
        self.names.iter().any(|n| n.as_str() == raw)
    }

    /// Resolve a raw selector value into a known customer.
    ///
    /// An empty value is the "Select Customer" placeholder and is a validation
    /// failure; a non-empty value outside the directory is not found.
    pub fn resolve(&self, raw: &str) -> DomainResult<CustomerName> {
        let name = CustomerName::new(raw)?;
        if self.names.contains(&name) {
            Ok(name)
        } else {
            Err(DomainError::not_found(format!("customer {name}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> CustomerDirectory {
        CustomerDirectory::new(["Saakshi", "Shivam", "Shreya"]).unwrap()
    }

    #[test]
    fn name_is_trimmed() {
        let name = CustomerName::new("  Shivam ").unwrap();
        assert_eq!(name.as_str(), "Shivam");
    }

    #[test]
    fn empty_name_is_rejected() {
        for raw in ["", "   ", "\t"] {
            match CustomerName::new(raw) {
                Err(DomainError::Validation(_)) => {}
                other => panic!("Expected Validation error for {raw:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn resolve_known_customer() {
        let name = directory().resolve("Shreya").unwrap();
        assert_eq!(name.as_str(), "Shreya");
    }

    #[test]
    fn resolve_placeholder_is_validation_error() {
        let err = directory().resolve("").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn resolve_unknown_customer_is_not_found() {
        let err = directory().resolve("Mallory").unwrap_err();
        assert!(matches!(err, DomainError::NotFound(msg) if msg.contains("Mallory")));
    }

    #[test]
    fn duplicates_are_dropped_in_order() {
        let dir = CustomerDirectory::new(["Shivam", "Saakshi", " Shivam"]).unwrap();
        let names: Vec<&str> = dir.names().iter().map(CustomerName::as_str).collect();
        assert_eq!(names, vec!["Shivam", "Saakshi"]);
        assert!(dir.contains("Saakshi"));
        assert!(!dir.contains("Shreya"));
    }

    #[test]
    fn deserializing_validates() {
        let ok: CustomerName = serde_json::from_str("\"Alice\"").unwrap();
        assert_eq!(ok.as_str(), "Alice");
        assert!(serde_json::from_str::<CustomerName>("\"  \"").is_err());
    }
}
