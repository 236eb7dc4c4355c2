use std::ops::{Index, IndexMut};

use crate::layer::Layer;

/// Collection of layers with some meta-information.
///
/// When a map is rendered, all visible layers are drawn in the order they are
/// stored in the collection. Any layer can be temporarily hidden with the
/// [`LayerCollection::hide`] method. Hidden layers are skipped by
/// [`LayerCollection::iter_visible`] but retain their place in the
/// collection.
///
/// Since a map should be able to render anything implementing the [`Layer`]
/// trait, this collection stores layers as trait objects. Use downcasting
/// through the `Any` trait to obtain a concrete layer type.
#[derive(Default)]
pub struct LayerCollection(Vec<LayerEntry>);

struct LayerEntry {
    layer: Box<dyn Layer>,
    is_hidden: bool,
}

impl LayerCollection {
    /// Adds a layer to the end of the collection.
    pub fn push(&mut self, layer: impl Layer + 'static) {
        self.0.push(LayerEntry {
            layer: Box::new(layer),
            is_hidden: false,
        });
    }

    /// Removes the layer at position `index` and returns it, shifting all
    /// layers after it to the left.
    ///
    /// # Panics
    ///
    /// Panics if `index` is equal to or greater than the collection length.
    pub fn remove(&mut self, index: usize) -> Box<dyn Layer> {
        self.0.remove(index).layer
    }

    /// Removes all layers from the collection.
    pub fn clear(&mut self) {
        self.0.clear()
    }

    /// Number of layers in the collection, including hidden ones.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the collection contains no layers.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Hides the layer at position `index` from rendering.
    ///
    /// # Panics
    ///
    /// Panics if `index` is equal to or greater than the collection length.
    pub fn hide(&mut self, index: usize) {
        self.0[index].is_hidden = true;
    }

    /// Makes the layer at position `index` visible again.
    ///
    /// # Panics
    ///
    /// Panics if `index` is equal to or greater than the collection length.
    pub fn show(&mut self, index: usize) {
        self.0[index].is_hidden = false;
    }

    /// Returns true if the layer at position `index` is hidden.
    ///
    /// # Panics
    ///
    /// Panics if `index` is equal to or greater than the collection length.
    pub fn is_hidden(&self, index: usize) -> bool {
        self.0[index].is_hidden
    }

    /// Returns a reference to the layer at position `index`, or `None` if the
    /// index is out of bounds.
    pub fn get(&self, index: usize) -> Option<&dyn Layer> {
        self.0.get(index).map(|entry| &*entry.layer)
    }

    /// Returns a mutable reference to the layer at position `index`, or
    /// `None` if the index is out of bounds.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut (dyn Layer + 'static)> {
        self.0.get_mut(index).map(|entry| &mut *entry.layer)
    }

    /// Iterates over all layers in the collection, including hidden ones.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Layer> {
        self.0.iter().map(|entry| &*entry.layer)
    }

    /// Iterates over the layers that are not hidden.
    pub fn iter_visible(&self) -> impl Iterator<Item = &dyn Layer> {
        self.0
            .iter()
            .filter(|entry| !entry.is_hidden)
            .map(|entry| &*entry.layer)
    }
}

impl<T: Layer + 'static> From<Vec<T>> for LayerCollection {
    fn from(layers: Vec<T>) -> Self {
        Self(
            layers
                .into_iter()
                .map(|layer| LayerEntry {
                    layer: Box::new(layer),
                    is_hidden: false,
                })
                .collect(),
        )
    }
}

impl From<Vec<Box<dyn Layer>>> for LayerCollection {
    fn from(layers: Vec<Box<dyn Layer>>) -> Self {
        Self(
            layers
                .into_iter()
                .map(|layer| LayerEntry {
                    layer,
                    is_hidden: false,
                })
                .collect(),
        )
    }
}

impl Index<usize> for LayerCollection {
    type Output = dyn Layer;

    fn index(&self, index: usize) -> &Self::Output {
        &*self.0[index].layer
    }
}

impl IndexMut<usize> for LayerCollection {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut *self.0[index].layer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::TestLayer;

    #[test]
    fn hidden_layers_are_skipped_by_iter_visible() {
        let mut collection = LayerCollection::from(vec![
            TestLayer("Layer A"),
            TestLayer("Layer B"),
            TestLayer("Layer C"),
        ]);

        collection.hide(1);
        assert!(collection.is_hidden(1));
        assert_eq!(collection.len(), 3);
        assert_eq!(collection.iter_visible().count(), 2);

        collection.show(1);
        assert_eq!(collection.iter_visible().count(), 3);
    }

    #[test]
    fn layers_can_be_downcast() {
        let mut collection = LayerCollection::default();
        collection.push(TestLayer("Layer A"));

        assert_eq!(
            collection[0].as_any().downcast_ref(),
            Some(&TestLayer("Layer A"))
        );
    }

    #[test]
    fn remove_keeps_order() {
        let mut collection = LayerCollection::from(vec![
            TestLayer("Layer A"),
            TestLayer("Layer B"),
            TestLayer("Layer C"),
        ]);

        let removed = collection.remove(0);
        assert_eq!(removed.as_any().downcast_ref(), Some(&TestLayer("Layer A")));
        assert_eq!(
            collection[0].as_any().downcast_ref(),
            Some(&TestLayer("Layer B"))
        );
        assert_eq!(collection.len(), 2);
    }
}
