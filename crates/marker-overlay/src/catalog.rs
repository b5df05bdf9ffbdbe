//! Marker-id to shape registry.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Shape classes the compositor can dispatch to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    Pyramid,
    Cube,
    Cylinder,
}

/// Mapping from marker ids to the shape rendered on top of them.
///
/// The catalog is fixed for the lifetime of a compositor and injected at
/// construction, so hosts and tests can run alternate layouts. Ids missing
/// from the catalog are not an error: such markers are counted and logged
/// but draw nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerCatalog {
    shapes: HashMap<u32, ShapeKind>,
}

impl MarkerCatalog {
    /// Empty catalog; every marker id is unmapped.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (u32, ShapeKind)>) -> Self {
        Self {
            shapes: pairs.into_iter().collect(),
        }
    }

    /// The layout this project has always shipped with.
    ///
    /// Ids 227 and 244 belong to the same printed marker set but are
    /// deliberately left unmapped, so they detect (and count) without
    /// drawing anything.
    pub fn default_layout() -> Self {
        Self::from_pairs([
            (85, ShapeKind::Pyramid),
            (90, ShapeKind::Pyramid),
            (144, ShapeKind::Cube),
            (161, ShapeKind::Cube),
            (166, ShapeKind::Cylinder),
            (214, ShapeKind::Cylinder),
        ])
    }

    pub fn insert(&mut self, id: u32, kind: ShapeKind) {
        self.shapes.insert(id, kind);
    }

    #[inline]
    pub fn shape_for(&self, id: u32) -> Option<ShapeKind> {
        self.shapes.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_partitions_shape_classes() {
        let catalog = MarkerCatalog::default_layout();
        assert_eq!(catalog.shape_for(85), Some(ShapeKind::Pyramid));
        assert_eq!(catalog.shape_for(90), Some(ShapeKind::Pyramid));
        assert_eq!(catalog.shape_for(144), Some(ShapeKind::Cube));
        assert_eq!(catalog.shape_for(161), Some(ShapeKind::Cube));
        assert_eq!(catalog.shape_for(166), Some(ShapeKind::Cylinder));
        assert_eq!(catalog.shape_for(214), Some(ShapeKind::Cylinder));
        assert_eq!(catalog.len(), 6);
    }

    #[test]
    fn known_but_unmapped_ids_stay_unmapped() {
        let catalog = MarkerCatalog::default_layout();
        assert_eq!(catalog.shape_for(227), None);
        assert_eq!(catalog.shape_for(244), None);
        assert_eq!(catalog.shape_for(999), None);
    }

    #[test]
    fn json_round_trip() {
        let catalog = MarkerCatalog::from_pairs([(7, ShapeKind::Cube)]);
        let json = serde_json::to_string(&catalog).expect("serialize");
        let back: MarkerCatalog = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, catalog);
    }
}
