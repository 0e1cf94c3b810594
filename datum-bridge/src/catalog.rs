//! In-memory type catalog
//!
//! Stands in for the host's catalog service wherever the bridge runs
//! outside the host: tests, benches and tools that replay captured datums.

use datum_bridge_core::{oid, TypeCatalog, TypeOid};
use hashbrown::HashMap;

/// What the catalog records about one type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum TypeEntry {
    Scalar,
    Array { element: TypeOid },
    Row,
}

/// Catalog backed by a hash map of registered types
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    entries: HashMap<TypeOid, TypeEntry>,
}

impl StaticCatalog {
    /// Create a catalog with no registered types
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog preloaded with the host's builtin types
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for scalar in [
            oid::BOOL,
            oid::INT2,
            oid::INT4,
            oid::INT8,
            oid::FLOAT4,
            oid::FLOAT8,
            oid::TEXT,
        ] {
            catalog.register_scalar(scalar);
        }
        catalog.register_array(oid::INT4_ARRAY, oid::INT4);
        catalog.register_array(oid::TEXT_ARRAY, oid::TEXT);
        catalog.register_array(oid::FLOAT4_ARRAY, oid::FLOAT4);
        catalog.register_array(oid::FLOAT8_ARRAY, oid::FLOAT8);
        catalog.register_row(oid::RECORD);
        catalog
    }

    /// Register a plain scalar type
    pub fn register_scalar(&mut self, type_id: TypeOid) -> &mut Self {
        self.entries.insert(type_id, TypeEntry::Scalar);
        self
    }

    /// Register an array type and its element type
    pub fn register_array(&mut self, type_id: TypeOid, element: TypeOid) -> &mut Self {
        self.entries.insert(type_id, TypeEntry::Array { element });
        self
    }

    /// Register a composite row type
    pub fn register_row(&mut self, type_id: TypeOid) -> &mut Self {
        self.entries.insert(type_id, TypeEntry::Row);
        self
    }

    /// Look up a registered type
    pub fn entry(&self, type_id: TypeOid) -> Option<TypeEntry> {
        self.entries.get(&type_id).copied()
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load a catalog description
    ///
    /// The JSON form is `{"types": [{"oid": 1022, "kind": "array",
    /// "element": 701}, ...]}`. Entries are added on top of an empty catalog.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let description: CatalogDescription = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        for described in description.types {
            catalog.entries.insert(described.oid, described.entry);
        }
        Ok(catalog)
    }
}

impl TypeCatalog for StaticCatalog {
    fn is_row_type(&self, type_id: TypeOid) -> bool {
        matches!(self.entry(type_id), Some(TypeEntry::Row))
    }

    fn element_type_of(&self, type_id: TypeOid) -> Option<TypeOid> {
        match self.entry(type_id) {
            Some(TypeEntry::Array { element }) => Some(element),
            _ => None,
        }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct CatalogDescription {
    types: Vec<DescribedType>,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct DescribedType {
    oid: TypeOid,
    #[serde(flatten)]
    entry: TypeEntry,
}

#[cfg(test)]
mod tests {
    use super::*;
    use datum_bridge_core::{classify, TypeKind};

    #[test]
    fn test_builtin_classification() {
        let catalog = StaticCatalog::builtin();
        assert_eq!(classify(&catalog, oid::RECORD), TypeKind::Row);
        assert_eq!(
            classify(&catalog, oid::FLOAT8_ARRAY),
            TypeKind::Array(oid::FLOAT8)
        );
        assert_eq!(classify(&catalog, oid::BOOL), TypeKind::Scalar(oid::BOOL));
        assert!(catalog.is_array_type(oid::TEXT_ARRAY));
        assert!(!catalog.is_row_type(oid::FLOAT8_ARRAY));
    }

    #[test]
    fn test_unknown_types_are_scalars() {
        let catalog = StaticCatalog::new();
        assert!(catalog.is_empty());
        assert_eq!(
            classify(&catalog, oid::FLOAT8_ARRAY),
            TypeKind::Scalar(oid::FLOAT8_ARRAY)
        );
    }

    #[test]
    fn test_registration_overrides() {
        let mut catalog = StaticCatalog::builtin();
        let before = catalog.len();
        catalog
            .register_row(TypeOid(90_001))
            .register_array(TypeOid(90_002), oid::FLOAT8);
        assert_eq!(catalog.len(), before + 2);
        assert_eq!(catalog.entry(TypeOid(90_001)), Some(TypeEntry::Row));

        // Re-registering replaces the entry
        catalog.register_scalar(TypeOid(90_001));
        assert_eq!(catalog.entry(TypeOid(90_001)), Some(TypeEntry::Scalar));
        assert_eq!(catalog.len(), before + 2);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json() {
        let catalog = StaticCatalog::from_json(
            r#"{"types": [
                {"oid": 701, "kind": "scalar"},
                {"oid": 1022, "kind": "array", "element": 701},
                {"oid": 16385, "kind": "row"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.element_type_of(oid::FLOAT8_ARRAY), Some(oid::FLOAT8));
        assert!(catalog.is_row_type(TypeOid(16385)));

        assert!(StaticCatalog::from_json(r#"{"types": [{"oid": 1, "kind": "blob"}]}"#).is_err());
    }
}
