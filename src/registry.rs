// 🔢 Label Registry - Stable node indices, first-seen order
//
// One registry per graph build. A label requested twice gets the same index,
// which is how "Gross Profit" ends up as a single node even though it is both
// a target and a source.

use std::collections::HashMap;

use crate::graph::Node;

#[derive(Debug, Default)]
pub struct LabelRegistry {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
}

impl LabelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `label`, appending a new node on first sight
    pub fn index_of(&mut self, label: &str) -> usize {
        if let Some(&idx) = self.index.get(label) {
            return idx;
        }

        let idx = self.nodes.len();
        self.nodes.push(Node {
            index: idx,
            label: label.to_string(),
        });
        self.index.insert(label.to_string(), idx);
        idx
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Consume the registry, yielding nodes in index order
    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_label_same_index() {
        let mut registry = LabelRegistry::new();
        let first = registry.index_of("Gross Profit");
        let again = registry.index_of("Gross Profit");

        assert_eq!(first, again);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_first_seen_order() {
        let mut registry = LabelRegistry::new();
        let labels = ["Total Revenue", "iPhone", "Services", "Gross Profit"];

        let indices: Vec<usize> = labels.iter().map(|l| registry.index_of(l)).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);

        // Re-requesting does not reorder
        assert_eq!(registry.index_of("iPhone"), 1);

        let nodes = registry.into_nodes();
        let names: Vec<&str> = nodes.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(names, labels.to_vec());
        assert!(nodes.iter().enumerate().all(|(i, n)| n.index == i));
    }

    #[test]
    fn test_new_registry_is_empty() {
        let mut registry = LabelRegistry::new();
        assert!(registry.is_empty());
        assert!(LabelRegistry::new().into_nodes().is_empty());

        registry.index_of("Net Income");
        assert!(!registry.is_empty());
        assert_eq!(registry.into_nodes()[0].label, "Net Income");
    }

    #[test]
    fn test_labels_are_case_sensitive() {
        let mut registry = LabelRegistry::new();
        assert_ne!(registry.index_of("tax"), registry.index_of("Tax"));
    }
}
