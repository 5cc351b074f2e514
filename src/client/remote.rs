//! Network client for a running graph server
//!
//! Connects via HTTP to the server's `/api/query` and `/api/status`
//! endpoints, sending rendered Cypher text.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::graph::{EdgeId, EdgeType, Label, Node, NodeId, PropertyMap, PropertyValue};

use super::cypher;
use super::error::{ClientError, ClientResult};
use super::models::{QueryResult, ServerStatus, StorageStats};
use super::GraphClient;

/// Network client that connects to a running graph server.
pub struct RemoteClient {
    http_base_url: String,
    http_client: Client,
}

impl RemoteClient {
    /// Create a new RemoteClient connecting to the given HTTP base URL.
    pub fn new(http_base_url: &str) -> Self {
        Self {
            http_base_url: http_base_url.trim_end_matches('/').to_string(),
            http_client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.http_base_url
    }

    /// Execute a POST request to /api/query
    async fn post_query(&self, cypher: &str) -> ClientResult<QueryResult> {
        debug!("cypher: {}", cypher);
        let url = format!("{}/api/query", self.http_base_url);
        let body = serde_json::json!({ "query": cypher });

        let response = self.http_client.post(&url).json(&body).send().await?;

        if response.status().is_success() {
            let result: QueryResult = response.json().await?;
            Ok(result)
        } else {
            let error_body: serde_json::Value = response
                .json()
                .await
                .unwrap_or_else(|_| serde_json::json!({"error": "Unknown error"}));
            let msg = error_body
                .get("error")
                .and_then(|v| v.as_str())
                .unwrap_or("Unknown error")
                .to_string();
            Err(ClientError::QueryError(msg))
        }
    }

    async fn first_node(&self, cypher: &str) -> ClientResult<Option<Node>> {
        let result = self.post_query(cypher).await?;
        result
            .nodes
            .into_iter()
            .next()
            .map(|n| n.into_node())
            .transpose()
    }

    /// Full server status, including health and version
    pub async fn server_status(&self) -> ClientResult<ServerStatus> {
        let url = format!("{}/api/status", self.http_base_url);
        let response = self.http_client.get(&url).send().await?;

        if response.status().is_success() {
            let status: ServerStatus = response.json().await?;
            Ok(status)
        } else {
            Err(ClientError::ConnectionError(format!(
                "Status endpoint returned {}",
                response.status()
            )))
        }
    }
}

#[async_trait]
impl GraphClient for RemoteClient {
    async fn find_node(
        &self,
        label: &Label,
        key: &str,
        value: &PropertyValue,
    ) -> ClientResult<Option<Node>> {
        self.first_node(&cypher::find_node(label, key, value)).await
    }

    async fn find_node_with_member(
        &self,
        label: &Label,
        key: &str,
        member: &PropertyValue,
    ) -> ClientResult<Option<Node>> {
        self.first_node(&cypher::find_node_with_member(label, key, member))
            .await
    }

    async fn create_node(&self, label: &Label, properties: PropertyMap) -> ClientResult<NodeId> {
        let created = self
            .first_node(&cypher::create_node(label, &properties))
            .await?;
        created.map(|n| n.id).ok_or_else(|| {
            ClientError::UnexpectedResponse("CREATE returned no node".to_string())
        })
    }

    async fn save_node(&self, node: &Node) -> ClientResult<()> {
        if node.properties.is_empty() {
            return Ok(());
        }
        let updated = self
            .first_node(&cypher::set_node_properties(node.id, &node.properties))
            .await?;
        match updated {
            Some(_) => Ok(()),
            None => Err(ClientError::UnexpectedResponse(format!(
                "node {} vanished during update",
                node.id
            ))),
        }
    }

    async fn edge_exists(
        &self,
        source: NodeId,
        target: NodeId,
        edge_type: &EdgeType,
    ) -> ClientResult<bool> {
        let result = self
            .post_query(&cypher::edge_exists(source, target, edge_type))
            .await?;
        Ok(!result.is_empty() || !result.edges.is_empty())
    }

    async fn create_edge(
        &self,
        source: NodeId,
        target: NodeId,
        edge_type: &EdgeType,
        properties: PropertyMap,
    ) -> ClientResult<EdgeId> {
        let result = self
            .post_query(&cypher::create_edge(source, target, edge_type, &properties))
            .await?;
        match result.edges.first() {
            Some(edge) => edge.edge_id(),
            None => Err(ClientError::UnexpectedResponse(format!(
                "CREATE returned no relationship for {} -> {}",
                source, target
            ))),
        }
    }

    async fn delete_all(&self) -> ClientResult<()> {
        self.post_query(&cypher::delete_all()).await?;
        Ok(())
    }

    async fn status(&self) -> ClientResult<StorageStats> {
        let status = self.server_status().await?;
        if status.status == "healthy" {
            Ok(status.storage)
        } else {
            Err(ClientError::ConnectionError(format!(
                "Server unhealthy: {}",
                status.status
            )))
        }
    }

    fn describe(&self) -> String {
        format!("remote graph at {}", self.http_base_url)
    }
}
