//! PC-005: Reference extraction from configuration expressions.
//!
//! Terraform annotates each attribute expression that depends on other objects
//! with a `references` list. Expressions nest through blocks (arrays) and
//! objects, so the walk records each list under its dotted attribute path,
//! e.g. `ebs_block_device.0.kms_key_id`.

use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Attribute path → symbolic references, in encounter order.
pub type RawReferences = IndexMap<String, Vec<String>>;

/// Shape of one node in an expression tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExprNode<'a> {
    /// Node carrying an explicit `references` list.
    References(&'a [Value]),
    Sequence(&'a [Value]),
    Mapping(&'a Map<String, Value>),
    Scalar,
}

impl<'a> ExprNode<'a> {
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::Object(map) => match map.get("references") {
                Some(Value::Array(refs)) => Self::References(refs),
                _ => Self::Mapping(map),
            },
            Value::Array(items) => Self::Sequence(items),
            _ => Self::Scalar,
        }
    }
}

/// Collect references from a resource's `expressions` object.
pub fn extract_references(expressions: &Map<String, Value>) -> RawReferences {
    let mut out = RawReferences::new();
    for (key, node) in expressions {
        collect(key, node, &mut out);
    }
    out
}

/// Walk one node, appending references found at or below `path`.
pub fn collect(path: &str, node: &Value, out: &mut RawReferences) {
    match ExprNode::classify(node) {
        ExprNode::References(refs) => {
            let found: Vec<String> = refs
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect();
            if !found.is_empty() {
                out.entry(path.to_string()).or_default().extend(found);
            }
        }
        ExprNode::Sequence(items) => {
            for (i, item) in items.iter().enumerate() {
                collect(&join(path, &i.to_string()), item, out);
            }
        }
        ExprNode::Mapping(map) => {
            for (key, child) in map {
                collect(&join(path, key), child, out);
            }
        }
        ExprNode::Scalar => {}
    }
}

fn join(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        child.to_string()
    } else {
        format!("{parent}.{child}")
    }
}
