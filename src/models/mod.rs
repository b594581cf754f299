//! Wire types for the controller REST API.

use serde::Deserialize;

/// One monitored application from the application catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct Application {
    pub id: u64,
    pub name: String,
}

/// One child of a metric-tree node. The controller reports the node kind
/// in a `type` field: `folder` for traversable nodes, `leaf` for metrics.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MetricEntity {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl MetricEntity {
    pub fn folder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: "folder".to_string(),
        }
    }
}
