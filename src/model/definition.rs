use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Arbitrary key-value data flowing between nodes.
///
/// Node outputs may hold nested objects or sequences; merged inputs are always
/// flattened to dotted/indexed keys before a node sees them.
pub type Context = AHashMap<String, serde_json::Value>;

/// Discriminator selecting which handler interprets a node's content.
///
/// Wire names follow the original editor format (`inputNode`, `switchNode`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    #[serde(rename = "inputNode")]
    Input,
    #[serde(rename = "outputNode")]
    Output,
    #[serde(rename = "switchNode")]
    Switch,
    #[serde(rename = "decisionTableNode")]
    DecisionTable,
    #[serde(rename = "expressionNode")]
    Expression,
    #[serde(rename = "functionNode")]
    Function,
}

/// A single node of the graph definition. `content` is opaque at this level
/// and parsed per kind at visit time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDefinition {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub content: serde_json::Value,
}

/// A directed connection between two nodes. `source_handle`, when present,
/// names the switch statement that must hold for the edge to stay active.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDefinition {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
}

/// The complete definition of a decision graph, ready to be built and run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphDefinition {
    pub nodes: Vec<NodeDefinition>,
    pub edges: Vec<EdgeDefinition>,
}

/// One evaluation request: the graph plus the external input context that
/// `input`-kind nodes inject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub content: GraphDefinition,
    #[serde(default)]
    pub context: Context,
}
