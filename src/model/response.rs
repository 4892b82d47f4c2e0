use super::Context;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// The final result of a successful evaluation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphResponse {
    /// Total elapsed time, rendered as `"<N>.NNms"`.
    pub performance: String,
    /// The flat key-value mapping produced by the reached output node.
    pub result: Context,
    /// Per-node trace entries, keyed by node id.
    pub trace: AHashMap<String, NodeTrace>,
}

/// The recorded input/output/diagnostic data for one visited node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeTrace {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Context>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Context>,
    #[serde(
        rename = "traceData",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub trace_data: Option<serde_json::Value>,
    /// Elapsed time since evaluation start when this node was handled.
    pub performance: String,
}
