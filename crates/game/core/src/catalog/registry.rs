use std::collections::HashMap;

use super::{CatalogError, EnchantCategory, PropertyDefinition, PropertyId, PropertyOracle};

/// In-memory property registry.
///
/// Definitions keep their insertion order for listing; lookups go through a
/// hash index. The registry is immutable once built and can be shared by any
/// number of records.
#[derive(Clone, Debug, Default)]
pub struct PropertyCatalog {
    definitions: Vec<PropertyDefinition>,
    index: HashMap<PropertyId, usize>,
}

impl PropertyCatalog {
    /// Builds a catalog, rejecting duplicate ids and unusable definitions.
    pub fn new(
        definitions: impl IntoIterator<Item = PropertyDefinition>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();
        for definition in definitions {
            catalog.validate(&definition)?;
            catalog
                .index
                .insert(definition.id.clone(), catalog.definitions.len());
            catalog.definitions.push(definition);
        }
        Ok(catalog)
    }

    fn validate(&self, definition: &PropertyDefinition) -> Result<(), CatalogError> {
        let id = &definition.id;
        if self.index.contains_key(id) {
            return Err(CatalogError::DuplicateProperty(id.clone()));
        }
        if definition.potential_cost == 0 {
            return Err(CatalogError::ZeroPotentialCost(id.clone()));
        }
        if definition.increment_below == 0 || definition.increment_above == 0 {
            return Err(CatalogError::ZeroIncrement(id.clone()));
        }
        if definition.material_cost.raw() < 0 {
            return Err(CatalogError::NegativeMaterialCost(id.clone()));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Definitions in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &PropertyDefinition> {
        self.definitions.iter()
    }

    /// Definitions belonging to one enchant category, in catalog order.
    pub fn by_category(
        &self,
        category: EnchantCategory,
    ) -> impl Iterator<Item = &PropertyDefinition> {
        self.definitions
            .iter()
            .filter(move |definition| definition.category == category)
    }
}

impl PropertyOracle for PropertyCatalog {
    fn definition(&self, id: &PropertyId) -> Option<&PropertyDefinition> {
        self.index.get(id).map(|&position| &self.definitions[position])
    }

    fn definitions(&self) -> &[PropertyDefinition] {
        &self.definitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MaterialType;
    use crate::fixed::Hundredths;

    fn def(id: &str, category: EnchantCategory) -> PropertyDefinition {
        PropertyDefinition::new(
            id,
            id.to_uppercase(),
            category,
            10,
            MaterialType::Beast,
            Hundredths::from_int(25),
        )
    }

    #[test]
    fn lookup_by_id() {
        let catalog = PropertyCatalog::new([
            def("str", EnchantCategory::Stats),
            def("atk", EnchantCategory::Attack),
        ])
        .expect("valid catalog");

        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.definition(&PropertyId::from("atk")).map(|d| d.category),
            Some(EnchantCategory::Attack)
        );
        assert!(!catalog.contains(&PropertyId::from("dex")));
    }

    #[test]
    fn rejects_duplicates() {
        let result = PropertyCatalog::new([
            def("str", EnchantCategory::Stats),
            def("str", EnchantCategory::Stats),
        ]);
        assert_eq!(
            result.err(),
            Some(CatalogError::DuplicateProperty(PropertyId::from("str")))
        );
    }

    #[test]
    fn rejects_zero_potential_cost() {
        let mut broken = def("str", EnchantCategory::Stats);
        broken.potential_cost = 0;
        assert!(matches!(
            PropertyCatalog::new([broken]),
            Err(CatalogError::ZeroPotentialCost(_))
        ));
    }

    #[test]
    fn filters_by_category() {
        let catalog = PropertyCatalog::new([
            def("str", EnchantCategory::Stats),
            def("atk", EnchantCategory::Attack),
            def("dex", EnchantCategory::Stats),
        ])
        .expect("valid catalog");

        let stats: Vec<_> = catalog
            .by_category(EnchantCategory::Stats)
            .map(|d| d.id.as_str())
            .collect();
        assert_eq!(stats, ["str", "dex"]);
    }
}
