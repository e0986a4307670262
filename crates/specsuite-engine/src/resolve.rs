//! `$ref` resolution against a parsed OpenAPI document
//!
//! Resolution is depth-first with a per-call stack of active pointers. A
//! pointer already on the stack is a cycle: it is replaced by a bounded
//! placeholder (an empty object, or an empty array for array-shaped targets)
//! so cyclic schemas get shallow examples instead of infinite recursion.
//!
//! Expanded pointers are cached for the lifetime of the resolver, so each
//! distinct pointer is walked once per run. A pointer first expanded inside a
//! cycle keeps the placeholder it was built with.

use std::collections::HashMap;

use percent_encoding::percent_decode_str;
use serde_json::Value;
use tracing::debug;

use crate::error::ResolveError;
use crate::node::{SchemaKind, SchemaNode};

/// Upper bound on `$ref` hops when following non-schema objects.
const MAX_REF_HOPS: usize = 32;

pub struct Resolver<'doc> {
    doc: &'doc Value,
    cache: HashMap<String, SchemaNode>,
    stack: Vec<String>,
}

impl<'doc> Resolver<'doc> {
    #[must_use]
    pub fn new(doc: &'doc Value) -> Self {
        Self {
            doc,
            cache: HashMap::new(),
            stack: Vec::new(),
        }
    }

    /// Resolve a pointer such as `#/components/schemas/User` into a fully
    /// expanded node.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] if this or any nested pointer is dangling or external.
    pub fn resolve_pointer(&mut self, pointer: &str) -> Result<SchemaNode, ResolveError> {
        if let Some(hit) = self.cache.get(pointer) {
            return Ok(hit.clone());
        }

        let raw = self.lookup(pointer)?;

        if self.stack.iter().any(|p| p == pointer) {
            debug!(pointer, "cycle detected, substituting placeholder");
            return Ok(placeholder(raw, pointer));
        }

        self.stack.push(pointer.to_string());
        let expanded = self.expand(SchemaNode::from_json(raw));
        self.stack.pop();

        let mut node = expanded?;
        node.pointer = Some(pointer.to_string());
        self.cache.insert(pointer.to_string(), node.clone());
        Ok(node)
    }

    /// Parse and expand an inline schema.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] if any nested pointer cannot be resolved.
    pub fn resolve_schema(&mut self, raw: &Value) -> Result<SchemaNode, ResolveError> {
        self.expand(SchemaNode::from_json(raw))
    }

    /// Replace every `Reference` leaf reachable from `node`.
    fn expand(&mut self, node: SchemaNode) -> Result<SchemaNode, ResolveError> {
        let SchemaNode {
            kind,
            pointer,
            nullable,
            declared_example,
        } = node;

        let kind = match kind {
            SchemaKind::Reference(target) => {
                let mut resolved = self.resolve_pointer(&target)?;
                resolved.nullable |= nullable;
                return Ok(resolved);
            }
            SchemaKind::Array {
                items,
                min_items,
                max_items,
            } => SchemaKind::Array {
                items: Box::new(self.expand(*items)?),
                min_items,
                max_items,
            },
            SchemaKind::Object {
                properties,
                required,
                additional,
            } => {
                let mut expanded = indexmap::IndexMap::with_capacity(properties.len());
                for (name, prop) in properties {
                    expanded.insert(name, self.expand(prop)?);
                }
                let additional = match additional {
                    Some(a) => Some(Box::new(self.expand(*a)?)),
                    None => None,
                };
                SchemaKind::Object {
                    properties: expanded,
                    required,
                    additional,
                }
            }
            SchemaKind::Composite { kind, members } => SchemaKind::Composite {
                kind,
                members: members
                    .into_iter()
                    .map(|m| self.expand(m))
                    .collect::<Result<_, _>>()?,
            },
            other @ (SchemaKind::Primitive { .. } | SchemaKind::Enum(_) | SchemaKind::Any) => other,
        };

        Ok(SchemaNode {
            kind,
            pointer,
            nullable,
            declared_example,
        })
    }

    /// Look up the raw value a local pointer designates.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::External`] for non-local pointers and
    /// [`ResolveError::Dangling`] when the target does not exist.
    pub fn lookup(&self, pointer: &str) -> Result<&'doc Value, ResolveError> {
        let Some(fragment) = pointer.strip_prefix('#') else {
            return Err(ResolveError::External(pointer.to_string()));
        };
        if fragment.is_empty() {
            return Ok(self.doc);
        }
        let Some(path) = fragment.strip_prefix('/') else {
            return Err(ResolveError::Dangling(pointer.to_string()));
        };

        let mut current = self.doc;
        for segment in path.split('/') {
            let key = decode_pointer_segment(segment);
            let next = match current {
                Value::Object(map) => map.get(&key),
                Value::Array(arr) => key.parse::<usize>().ok().and_then(|i| arr.get(i)),
                _ => None,
            };
            current = next.ok_or_else(|| ResolveError::Dangling(pointer.to_string()))?;
        }
        Ok(current)
    }

    /// Follow `$ref` chains on parameter, request-body, response and
    /// path-item objects.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] on dangling/external pointers or a reference loop.
    pub fn deref_object(&self, raw: &'doc Value) -> Result<&'doc Value, ResolveError> {
        let mut current = raw;
        for _ in 0..MAX_REF_HOPS {
            match current.get("$ref").and_then(Value::as_str) {
                Some(pointer) => current = self.lookup(pointer)?,
                None => return Ok(current),
            }
        }
        let last = current
            .get("$ref")
            .and_then(Value::as_str)
            .unwrap_or_default();
        Err(ResolveError::Loop(last.to_string()))
    }

    /// Number of distinct pointers expanded so far.
    #[must_use]
    pub fn cached_pointers(&self) -> usize {
        self.cache.len()
    }
}

/// Shallow stand-in for a pointer that is already being expanded.
fn placeholder(raw: &Value, pointer: &str) -> SchemaNode {
    let array_shaped = raw.get("type").and_then(Value::as_str) == Some("array")
        || raw.get("items").is_some();
    let mut node = if array_shaped {
        SchemaNode::new(SchemaKind::Array {
            items: Box::new(SchemaNode::empty_object()),
            min_items: None,
            max_items: Some(0),
        })
    } else {
        SchemaNode::empty_object()
    };
    node.pointer = Some(pointer.to_string());
    node
}

/// Decodes a JSON Pointer segment (handles `~1`, `~0` and percent-escapes).
fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded).decode_utf8_lossy().into_owned()
}
