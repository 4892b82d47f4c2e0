use crate::model::Context;

/// Combines parent outputs in enumeration order and flattens the result.
///
/// Later parents overwrite earlier ones on key collision (last write wins);
/// the caller supplies parents in edge-insertion order, so the merge is
/// deterministic for a given definition.
pub fn merge_and_flatten<'a>(parents: impl IntoIterator<Item = &'a Context>) -> Context {
    let mut merged = Context::default();
    for parent in parents {
        for (key, value) in parent {
            merged.insert(key.clone(), value.clone());
        }
    }
    flatten(&merged)
}

/// Expands nested objects and sequences into a single-level mapping.
///
/// Object keys are joined with `.`, sequence elements with their zero-based
/// index; scalars keep their own key. Flattening an already-flat mapping
/// returns it unchanged, so the operation is idempotent.
pub fn flatten(data: &Context) -> Context {
    let mut flat = Context::default();
    for (key, value) in data {
        flatten_into(key, value, &mut flat);
    }
    flat
}

fn flatten_into(key: &str, value: &serde_json::Value, flat: &mut Context) {
    match value {
        serde_json::Value::Object(children) => {
            for (child_key, child) in children {
                flatten_into(&format!("{key}.{child_key}"), child, flat);
            }
        }
        serde_json::Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten_into(&format!("{key}.{index}"), item, flat);
            }
        }
        scalar => {
            flat.insert(key.to_string(), scalar.clone());
        }
    }
}
