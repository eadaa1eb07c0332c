//! Entity store: the immutable entity list of the current drawing.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{Bounds, CoreError, CoreResult, Entity};

/// The document the drawing parser returns: `{entidades, layers}` or `{error}`.
#[derive(Debug, Clone, Default, Deserialize)]
struct DrawingDocument {
    #[serde(default)]
    entidades: Vec<Entity>,
    #[serde(default)]
    layers: Vec<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Every entity of one drawing plus the set of known layer names.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EntityStore {
    /// Entities in drawing order.
    #[serde(rename = "entidades")]
    entities: Vec<Entity>,
    /// Distinct layer names.
    layers: BTreeSet<String>,
}

impl EntityStore {
    /// Build a store, deriving the layer set from the entities.
    #[must_use]
    pub fn new(entities: Vec<Entity>) -> Self {
        Self::with_layers(entities, std::iter::empty())
    }

    /// Build a store from entities and a declared layer list.
    ///
    /// The declared names are the layer set when any are given; otherwise
    /// the set is derived from the layers the entities reference.
    pub fn with_layers(entities: Vec<Entity>, layers: impl IntoIterator<Item = String>) -> Self {
        let mut layers: BTreeSet<String> = layers.into_iter().collect();
        if layers.is_empty() {
            layers = entities.iter().map(|e| e.layer.clone()).collect();
        }
        Self { entities, layers }
    }

    /// Parse a parser document.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Serialization`] for malformed JSON and
    /// [`CoreError::Drawing`] when the document carries an `error` member.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let doc: DrawingDocument = serde_json::from_str(json)?;
        if let Some(message) = doc.error {
            return Err(CoreError::Drawing(message));
        }
        let store = Self::with_layers(doc.entidades, doc.layers);
        tracing::info!(
            "Loaded {} entities across {} layers",
            store.entities.len(),
            store.layers.len()
        );
        Ok(store)
    }

    /// All entities in drawing order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// The known layer names.
    #[must_use]
    pub fn layers(&self) -> &BTreeSet<String> {
        &self.layers
    }

    /// Number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the drawing has no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities whose layer is in `visible`, in drawing order.
    pub fn visible<'a>(
        &'a self,
        visible: &'a BTreeSet<String>,
    ) -> impl Iterator<Item = &'a Entity> + 'a {
        self.entities.iter().filter(|e| visible.contains(&e.layer))
    }

    /// Number of entities on `layer`.
    #[must_use]
    pub fn count_on(&self, layer: &str) -> usize {
        self.entities.iter().filter(|e| e.layer == layer).count()
    }

    /// Extent of every contributing entity, or `None` if nothing contributes.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.entities.iter().flat_map(Entity::extent_points))
    }

    /// Serialize the entities on visible layers as a JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn visible_json(&self, visible: &BTreeSet<String>) -> CoreResult<String> {
        let list: Vec<&Entity> = self.visible(visible).collect();
        serde_json::to_string(&list).map_err(CoreError::Serialization)
    }
}
