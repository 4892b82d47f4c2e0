use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Content payload of a switch node: an ordered list of branch statements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchContent {
    #[serde(default)]
    pub statements: Vec<SwitchStatement>,
}

/// One branch of a switch node. The id is what edge `source_handle`s match against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchStatement {
    pub id: String,
    pub condition: String,
}

/// Content payload of a decision table node.
///
/// Each rule row maps column ids to cell strings and carries its own row id
/// under the `_id` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTableContent {
    #[serde(default)]
    pub rules: Vec<AHashMap<String, String>>,
    #[serde(default)]
    pub inputs: Vec<TableColumn>,
    #[serde(default)]
    pub outputs: Vec<TableColumn>,
}

/// A declared input or output column of a decision table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableColumn {
    pub id: String,
    pub name: String,
    pub field: String,
}

/// Content payload of an expression node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpressionContent {
    #[serde(default)]
    pub expressions: Vec<ExpressionEntry>,
}

/// One computed output of an expression node: `key` receives the result of `value`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpressionEntry {
    pub id: String,
    pub key: String,
    pub value: String,
}
