//! Section catalogue: the ordered set of sections an engine plays with.
//!
//! Catalogue order is significant: it fixes section indices in the action
//! space and the cell order in observations.
//!
//! ## Example
//!
//! ```
//! use roll_and_rake::sections::SectionCatalog;
//!
//! let catalog = SectionCatalog::bundled().unwrap();
//! assert_eq!(catalog.len(), 9);
//! assert_eq!(catalog.index_of("Elliott"), Some(1));
//! assert_eq!(catalog.max_slot_count(), 6);
//! ```

use std::path::Path;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::definition::SectionDefinition;
use super::metadata::{MetadataError, SectionDocument, SectionEntry};
use super::state::SectionState;

/// Bundled nine-section document.
const BUNDLED_SECTIONS: &str = include_str!("../../data/sections.json");

/// Ordered, name-indexed section definitions.
#[derive(Clone, Debug, Default)]
pub struct SectionCatalog {
    definitions: Vec<Arc<SectionDefinition>>,
    by_name: FxHashMap<String, usize>,
}

impl SectionCatalog {
    /// Create an empty catalogue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The bundled catalogue: Harvick, Elliott, Busch, Newman, Johnson,
    /// Suarez, Earnhardt, Patrick, Hamlin.
    pub fn bundled() -> Result<Self, MetadataError> {
        Self::from_json_str(BUNDLED_SECTIONS)
    }

    /// Parse and validate a metadata document.
    pub fn from_json_str(json: &str) -> Result<Self, MetadataError> {
        Self::from_document(SectionDocument::from_json_str(json)?)
    }

    /// Load a metadata document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MetadataError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Validate every entry of a document.
    pub fn from_document(document: SectionDocument) -> Result<Self, MetadataError> {
        if document.sections.is_empty() {
            return Err(MetadataError::Empty);
        }
        let mut catalog = Self::new();
        for entry in document.sections {
            catalog.register(entry.into_definition()?)?;
        }
        Ok(catalog)
    }

    /// Append a definition. Returns its index.
    pub fn register(&mut self, definition: SectionDefinition) -> Result<usize, MetadataError> {
        definition.validate()?;
        if self.by_name.contains_key(&definition.name) {
            return Err(MetadataError::DuplicateName(definition.name));
        }
        let index = self.definitions.len();
        self.by_name.insert(definition.name.clone(), index);
        self.definitions.push(Arc::new(definition));
        Ok(index)
    }

    /// A catalogue holding only the named sections, in the given order.
    pub fn subset<S: AsRef<str>>(&self, names: &[S]) -> Result<Self, MetadataError> {
        let mut subset = Self::new();
        for name in names {
            let name = name.as_ref();
            let index = self
                .index_of(name)
                .ok_or_else(|| MetadataError::UnknownSection(name.to_string()))?;
            if subset.by_name.contains_key(name) {
                return Err(MetadataError::DuplicateName(name.to_string()));
            }
            subset.by_name.insert(name.to_string(), subset.definitions.len());
            subset.definitions.push(Arc::clone(&self.definitions[index]));
        }
        Ok(subset)
    }

    /// Document form of this catalogue.
    #[must_use]
    pub fn to_document(&self) -> SectionDocument {
        SectionDocument {
            sections: self
                .definitions
                .iter()
                .map(|def| SectionEntry::from_definition(def))
                .collect(),
        }
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SectionDefinition> {
        self.definitions.get(index).map(Arc::as_ref)
    }

    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&SectionDefinition> {
        self.index_of(name).and_then(|index| self.get(index))
    }

    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Iterate in catalogue order.
    pub fn iter(&self) -> impl Iterator<Item = &SectionDefinition> {
        self.definitions.iter().map(Arc::as_ref)
    }

    /// Widest Slot section (0 when there is none).
    #[must_use]
    pub fn max_slot_count(&self) -> usize {
        self.iter().map(SectionDefinition::slot_count).max().unwrap_or(0)
    }

    /// Cells across all sections.
    #[must_use]
    pub fn total_cells(&self) -> usize {
        self.iter().map(SectionDefinition::cell_count).sum()
    }

    /// Fresh, empty section states sharing these definitions.
    #[must_use]
    pub fn instantiate(&self) -> Vec<SectionState> {
        self.definitions
            .iter()
            .map(|def| SectionState::new(Arc::clone(def)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Color;
    use crate::sections::{DiceCondition, ScoringType};

    #[test]
    fn test_bundled_order_and_sizes() {
        let catalog = SectionCatalog::bundled().unwrap();
        let names: Vec<_> = catalog.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Harvick", "Elliott", "Busch", "Newman", "Johnson", "Suarez", "Earnhardt",
                "Patrick", "Hamlin"
            ]
        );
        let cells: Vec<_> = catalog.iter().map(SectionDefinition::cell_count).collect();
        assert_eq!(cells, vec![12, 9, 12, 6, 18, 14, 10, 18, 15]);
        assert_eq!(catalog.total_cells(), 114);
    }

    #[test]
    fn test_bundled_max_scores() {
        let catalog = SectionCatalog::bundled().unwrap();
        let max = |name: &str| catalog.by_name(name).unwrap().max_score();
        assert_eq!(max("Harvick"), 26);
        assert_eq!(max("Elliott"), 18);
        assert_eq!(max("Busch"), 16);
        assert_eq!(max("Newman"), 25);
        assert_eq!(max("Johnson"), 25);
        assert_eq!(max("Suarez"), 26);
        assert_eq!(max("Earnhardt"), 30);
        assert_eq!(max("Patrick"), 28);
        assert_eq!(max("Hamlin"), 30);
        assert_eq!(
            catalog.by_name("Elliott").unwrap().scoring,
            ScoringType::HighestRowSum
        );
    }

    #[test]
    fn test_duplicate_name() {
        let mut catalog = SectionCatalog::new();
        let def = SectionDefinition::grid("Twice", vec![2], 2)
            .with_requirement(&[Color::Brown], DiceCondition::NoCondition);
        assert_eq!(catalog.register(def.clone()).unwrap(), 0);
        assert!(matches!(
            catalog.register(def),
            Err(MetadataError::DuplicateName(name)) if name == "Twice"
        ));
    }

    #[test]
    fn test_subset() {
        let catalog = SectionCatalog::bundled().unwrap();
        let subset = catalog.subset(&["Newman", "Busch"]).unwrap();
        assert_eq!(subset.len(), 2);
        assert_eq!(subset.index_of("Newman"), Some(0));
        assert_eq!(subset.get(1).unwrap().name, "Busch");

        assert!(matches!(
            catalog.subset(&["Nobody"]),
            Err(MetadataError::UnknownSection(_))
        ));
        assert!(matches!(
            catalog.subset(&["Busch", "Busch"]),
            Err(MetadataError::DuplicateName(_))
        ));
    }

    #[test]
    fn test_empty_document() {
        assert!(matches!(
            SectionCatalog::from_json_str(r#"{ "sections": [] }"#),
            Err(MetadataError::Empty)
        ));
    }

    #[test]
    fn test_document_roundtrip() {
        let catalog = SectionCatalog::bundled().unwrap();
        let json = catalog.to_document().to_json_string().unwrap();
        let reparsed = SectionCatalog::from_json_str(&json).unwrap();
        for (a, b) in catalog.iter().zip(reparsed.iter()) {
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sections.json");
        std::fs::write(&path, BUNDLED_SECTIONS).unwrap();
        let catalog = SectionCatalog::load(&path).unwrap();
        assert_eq!(catalog.len(), 9);

        assert!(matches!(
            SectionCatalog::load(dir.path().join("missing.json")),
            Err(MetadataError::Io(_))
        ));
    }

    #[test]
    fn test_instantiate_shares_definitions() {
        let catalog = SectionCatalog::bundled().unwrap();
        let sections = catalog.instantiate();
        assert_eq!(sections.len(), 9);
        assert_eq!(sections[3].name(), "Newman");
        assert!(sections.iter().all(|s| s.score() == 0));
    }
}
