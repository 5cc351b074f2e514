//! Graph nodes

use super::property::{PropertyMap, PropertyValue};
use super::types::{Label, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A labelled node. Stations carry their membership lists as array
/// properties, grown with [`Node::append_to_list`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub labels: HashSet<Label>,
    pub properties: PropertyMap,
}

impl Node {
    /// Create a new node with a single label
    pub fn new(id: NodeId, label: impl Into<Label>) -> Self {
        let mut labels = HashSet::new();
        labels.insert(label.into());

        Node {
            id,
            labels,
            properties: PropertyMap::new(),
        }
    }

    /// Create a new node with labels and properties
    pub fn new_with_properties(id: NodeId, labels: Vec<Label>, properties: PropertyMap) -> Self {
        Node {
            id,
            labels: labels.into_iter().collect(),
            properties,
        }
    }

    /// Check if node has a specific label
    pub fn has_label(&self, label: &Label) -> bool {
        self.labels.contains(label)
    }

    /// Set a property value
    pub fn set_property(
        &mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Option<PropertyValue> {
        self.properties.insert(key.into(), value.into())
    }

    /// Get a property value
    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Append `value` to the array property `key`.
    ///
    /// A missing or non-array property is replaced by a one-element array.
    /// With `dedupe` set, a value already present is left alone. Returns
    /// whether the list changed.
    pub fn append_to_list(
        &mut self,
        key: &str,
        value: impl Into<PropertyValue>,
        dedupe: bool,
    ) -> bool {
        let value = value.into();
        match self.properties.get_mut(key) {
            Some(PropertyValue::Array(items)) => {
                if dedupe && items.contains(&value) {
                    return false;
                }
                items.push(value);
            }
            _ => {
                self.properties
                    .insert(key.to_string(), PropertyValue::Array(vec![value]));
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_node_single_label() {
        let node = Node::new(NodeId::new(1), "Station");
        assert_eq!(node.id, NodeId::new(1));
        assert_eq!(node.labels.len(), 1);
        assert!(node.has_label(&Label::new("Station")));
    }

    #[test]
    fn test_node_properties() {
        let mut node = Node::new(NodeId::new(4), "Station");

        node.set_property("station_name", "Holborn");
        node.set_property("year_opened", 1906i64);
        node.set_property("end_of_line", false);

        assert_eq!(
            node.get_property("station_name").unwrap().as_string(),
            Some("Holborn")
        );
        assert_eq!(node.get_property("year_opened").unwrap().as_integer(), Some(1906));
        assert_eq!(node.get_property("end_of_line").unwrap().as_boolean(), Some(false));
        assert_eq!(node.properties.len(), 3);
        assert!(node.get_property("location").is_none());
    }

    #[test]
    fn test_append_to_list() {
        let mut node = Node::new(NodeId::new(5), "Station");

        // Missing property starts a new list
        assert!(node.append_to_list("tube_lines", "Piccadilly", true));
        assert!(node.append_to_list("tube_lines", "Central", true));

        // Dedupe leaves existing members untouched
        assert!(!node.append_to_list("tube_lines", "Piccadilly", true));
        assert_eq!(
            node.get_property("tube_lines").unwrap().as_string_list(),
            Some(vec!["Piccadilly".to_string(), "Central".to_string()])
        );

        // Without dedupe the value is appended again
        assert!(node.append_to_list("tube_lines", "Piccadilly", false));
        assert_eq!(node.get_property("tube_lines").unwrap().as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_append_replaces_scalar() {
        let mut node = Node::new(NodeId::new(6), "Station");
        node.set_property("tube_lines", "Piccadilly");

        assert!(node.append_to_list("tube_lines", "Central", true));
        assert_eq!(
            node.get_property("tube_lines").unwrap().as_string_list(),
            Some(vec!["Central".to_string()])
        );
    }
}
