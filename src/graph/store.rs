//! In-memory graph storage implementation

use super::edge::Edge;
use super::node::Node;
use super::property::{PropertyMap, PropertyValue};
use super::types::{EdgeId, EdgeType, Label, NodeId};
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

/// Errors that can occur during graph operations
#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    #[error("Node {0} not found")]
    NodeNotFound(NodeId),

    #[error("Edge {0} not found")]
    EdgeNotFound(EdgeId),

    #[error("Node {0} already exists")]
    NodeAlreadyExists(NodeId),

    #[error("Edge {0} already exists")]
    EdgeAlreadyExists(EdgeId),

    #[error("Invalid edge: source node {0} does not exist")]
    InvalidEdgeSource(NodeId),

    #[error("Invalid edge: target node {0} does not exist")]
    InvalidEdgeTarget(NodeId),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// In-memory graph storage
///
/// Arena layout indexed by raw id:
/// - nodes: NodeId -> Node
/// - edges: EdgeId -> Edge
/// - outgoing / incoming: NodeId -> Vec<EdgeId> (adjacency lists)
/// - label_index: Label -> ordered NodeIds, so lookups return the lowest id first
/// - edge_type_index: EdgeType -> ordered EdgeIds
#[derive(Debug)]
pub struct GraphStore {
    /// Node storage (slot 0 is never used)
    nodes: Vec<Option<Node>>,

    /// Edge storage (slot 0 is never used)
    edges: Vec<Option<Edge>>,

    /// Outgoing edges for each node (adjacency list)
    outgoing: Vec<Vec<EdgeId>>,

    /// Incoming edges for each node (adjacency list)
    incoming: Vec<Vec<EdgeId>>,

    /// Label index for fast lookups
    label_index: HashMap<Label, BTreeSet<NodeId>>,

    /// Edge type index for fast lookups
    edge_type_index: HashMap<EdgeType, BTreeSet<EdgeId>>,

    /// Next node ID
    next_node_id: u64,

    /// Next edge ID
    next_edge_id: u64,
}

impl GraphStore {
    /// Create a new empty graph store
    pub fn new() -> Self {
        GraphStore {
            nodes: Vec::with_capacity(1024),
            edges: Vec::with_capacity(4096),
            outgoing: Vec::with_capacity(1024),
            incoming: Vec::with_capacity(1024),
            label_index: HashMap::new(),
            edge_type_index: HashMap::new(),
            next_node_id: 1,
            next_edge_id: 1,
        }
    }

    fn ensure_node_slot(&mut self, idx: usize) {
        if idx >= self.nodes.len() {
            self.nodes.resize(idx + 1, None);
            self.outgoing.resize(idx + 1, Vec::new());
            self.incoming.resize(idx + 1, Vec::new());
        }
    }

    fn ensure_edge_slot(&mut self, idx: usize) {
        if idx >= self.edges.len() {
            self.edges.resize(idx + 1, None);
        }
    }

    fn index_node(&mut self, node: &Node) {
        for label in &node.labels {
            self.label_index
                .entry(label.clone())
                .or_default()
                .insert(node.id);
        }
    }

    /// Create a node with auto-generated ID and single label
    pub fn create_node(&mut self, label: impl Into<Label>) -> NodeId {
        self.create_node_with_properties(vec![label.into()], PropertyMap::new())
    }

    /// Create a node with multiple labels and properties
    pub fn create_node_with_properties(
        &mut self,
        labels: Vec<Label>,
        properties: PropertyMap,
    ) -> NodeId {
        let node_id = NodeId::new(self.next_node_id);
        self.next_node_id += 1;
        let idx = node_id.index();

        let node = Node::new_with_properties(node_id, labels, properties);
        self.index_node(&node);

        self.ensure_node_slot(idx);
        self.nodes[idx] = Some(node);
        node_id
    }

    /// Get a node by ID
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    /// Get a mutable node by ID.
    ///
    /// Labels must not be changed through this reference; the label index
    /// would go stale.
    pub fn get_node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Check if a node exists
    pub fn has_node(&self, id: NodeId) -> bool {
        self.get_node(id).is_some()
    }

    /// Overwrite every property of an existing node
    pub fn replace_node_properties(
        &mut self,
        id: NodeId,
        properties: PropertyMap,
    ) -> GraphResult<()> {
        let node = self.get_node_mut(id).ok_or(GraphError::NodeNotFound(id))?;
        node.properties = properties;
        Ok(())
    }

    /// First node (lowest id) with `label` whose property `key` equals `value`
    pub fn find_node_by_property(
        &self,
        label: &Label,
        key: &str,
        value: &PropertyValue,
    ) -> Option<&Node> {
        self.get_nodes_by_label(label)
            .into_iter()
            .find(|node| node.get_property(key) == Some(value))
    }

    /// First node (lowest id) with `label` whose array property `key`
    /// contains `member`
    pub fn find_node_with_member(
        &self,
        label: &Label,
        key: &str,
        member: &PropertyValue,
    ) -> Option<&Node> {
        self.get_nodes_by_label(label)
            .into_iter()
            .find(|node| node.get_property(key).is_some_and(|v| v.contains(member)))
    }

    /// Create an edge between two nodes
    pub fn create_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        edge_type: impl Into<EdgeType>,
    ) -> GraphResult<EdgeId> {
        self.create_edge_with_properties(source, target, edge_type, PropertyMap::new())
    }

    /// Create an edge with properties
    pub fn create_edge_with_properties(
        &mut self,
        source: NodeId,
        target: NodeId,
        edge_type: impl Into<EdgeType>,
        properties: PropertyMap,
    ) -> GraphResult<EdgeId> {
        // Validate nodes exist
        if !self.has_node(source) {
            return Err(GraphError::InvalidEdgeSource(source));
        }
        if !self.has_node(target) {
            return Err(GraphError::InvalidEdgeTarget(target));
        }

        let edge_id = EdgeId::new(self.next_edge_id);
        self.next_edge_id += 1;

        let edge = Edge::new_with_properties(edge_id, source, target, edge_type, properties);
        self.attach_edge(edge);
        Ok(edge_id)
    }

    fn attach_edge(&mut self, edge: Edge) {
        let idx = edge.id.index();

        // Update adjacency lists
        self.outgoing[edge.source.index()].push(edge.id);
        self.incoming[edge.target.index()].push(edge.id);

        // Update edge type index
        self.edge_type_index
            .entry(edge.edge_type.clone())
            .or_default()
            .insert(edge.id);

        self.ensure_edge_slot(idx);
        self.edges[idx] = Some(edge);
    }

    /// Get an edge by ID
    pub fn get_edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index()).and_then(Option::as_ref)
    }

    /// Check if an edge exists
    pub fn has_edge(&self, id: EdgeId) -> bool {
        self.get_edge(id).is_some()
    }

    /// Whether a `edge_type` edge runs from `source` to `target`
    pub fn edge_exists(&self, source: NodeId, target: NodeId, edge_type: &EdgeType) -> bool {
        self.get_outgoing_edges(source)
            .into_iter()
            .any(|edge| edge.links(source, target, edge_type))
    }

    /// Get all outgoing edges from a node
    pub fn get_outgoing_edges(&self, node_id: NodeId) -> Vec<&Edge> {
        self.outgoing
            .get(node_id.index())
            .map(|ids| ids.iter().filter_map(|id| self.get_edge(*id)).collect())
            .unwrap_or_default()
    }

    /// Get all incoming edges to a node
    pub fn get_incoming_edges(&self, node_id: NodeId) -> Vec<&Edge> {
        self.incoming
            .get(node_id.index())
            .map(|ids| ids.iter().filter_map(|id| self.get_edge(*id)).collect())
            .unwrap_or_default()
    }

    /// Get all nodes with a specific label, ordered by id
    pub fn get_nodes_by_label(&self, label: &Label) -> Vec<&Node> {
        self.label_index
            .get(label)
            .map(|ids| ids.iter().filter_map(|id| self.get_node(*id)).collect())
            .unwrap_or_default()
    }

    /// Get all edges of a specific type, ordered by id
    pub fn get_edges_by_type(&self, edge_type: &EdgeType) -> Vec<&Edge> {
        self.edge_type_index
            .get(edge_type)
            .map(|ids| ids.iter().filter_map(|id| self.get_edge(*id)).collect())
            .unwrap_or_default()
    }

    /// Get total number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    /// Get total number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.iter().flatten().count()
    }

    /// Get all nodes, ordered by id
    pub fn all_nodes(&self) -> Vec<&Node> {
        self.nodes.iter().flatten().collect()
    }

    /// Get all edges, ordered by id
    pub fn all_edges(&self) -> Vec<&Edge> {
        self.edges.iter().flatten().collect()
    }

    /// Remove every node and relationship and reset id allocation
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.outgoing.clear();
        self.incoming.clear();
        self.label_index.clear();
        self.edge_type_index.clear();
        self.next_node_id = 1;
        self.next_edge_id = 1;
    }

    /// Insert a node restored from a snapshot, keeping its id
    pub fn insert_recovered_node(&mut self, node: Node) -> GraphResult<()> {
        if self.has_node(node.id) {
            return Err(GraphError::NodeAlreadyExists(node.id));
        }
        let idx = node.id.index();
        self.ensure_node_slot(idx);
        self.index_node(&node);

        if node.id.as_u64() >= self.next_node_id {
            self.next_node_id = node.id.as_u64() + 1;
        }
        self.nodes[idx] = Some(node);
        Ok(())
    }

    /// Insert an edge restored from a snapshot, keeping its id.
    /// Both endpoints must already be restored.
    pub fn insert_recovered_edge(&mut self, edge: Edge) -> GraphResult<()> {
        if self.has_edge(edge.id) {
            return Err(GraphError::EdgeAlreadyExists(edge.id));
        }
        if !self.has_node(edge.source) {
            return Err(GraphError::InvalidEdgeSource(edge.source));
        }
        if !self.has_node(edge.target) {
            return Err(GraphError::InvalidEdgeTarget(edge.target));
        }

        if edge.id.as_u64() >= self.next_edge_id {
            self.next_edge_id = edge.id.as_u64() + 1;
        }
        self.attach_edge(edge);
        Ok(())
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}
