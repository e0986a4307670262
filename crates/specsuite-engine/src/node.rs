//! Normalized schema model
//!
//! Raw JSON Schema (OpenAPI 3.x / Swagger 2.0 subset) is parsed into
//! [`SchemaNode`] trees. Parsing is purely syntactic: `$ref` pointers become
//! [`SchemaKind::Reference`] leaves which the resolver later replaces.

use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

/// A normalized schema unit.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    pub kind: SchemaKind,
    /// `$ref` pointer this node was resolved from, if any
    pub pointer: Option<String>,
    /// `nullable: true` or a `"null"` entry in a type array
    pub nullable: bool,
    /// Declared `example` or `default`
    pub declared_example: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    Primitive {
        ty: PrimitiveType,
        format: Option<String>,
        bounds: Bounds,
    },
    Enum(Vec<Value>),
    Array {
        items: Box<SchemaNode>,
        min_items: Option<usize>,
        max_items: Option<usize>,
    },
    Object {
        properties: IndexMap<String, SchemaNode>,
        required: IndexSet<String>,
        additional: Option<Box<SchemaNode>>,
    },
    Composite {
        kind: CompositeKind,
        members: Vec<SchemaNode>,
    },
    /// Unresolved `$ref`; never reachable after resolution
    Reference(String),
    /// No usable type information (`{}`, boolean schemas, unknown types)
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    String,
    Integer,
    Number,
    Boolean,
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeKind {
    OneOf,
    AnyOf,
    AllOf,
}

/// Numeric and length constraints honored by the synthesizer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub minimum: Option<f64>,
    pub exclusive_minimum: bool,
    pub maximum: Option<f64>,
    pub exclusive_maximum: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
}

impl SchemaNode {
    #[must_use]
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            pointer: None,
            nullable: false,
            declared_example: None,
        }
    }

    #[must_use]
    pub fn any() -> Self {
        Self::new(SchemaKind::Any)
    }

    #[must_use]
    pub fn primitive(ty: PrimitiveType, format: Option<&str>) -> Self {
        Self::new(SchemaKind::Primitive {
            ty,
            format: format.map(String::from),
            bounds: Bounds::default(),
        })
    }

    #[must_use]
    pub fn empty_object() -> Self {
        Self::new(SchemaKind::Object {
            properties: IndexMap::new(),
            required: IndexSet::new(),
            additional: None,
        })
    }

    /// Parse a raw JSON Schema value.
    #[must_use]
    pub fn from_json(raw: &Value) -> Self {
        let Some(obj) = raw.as_object() else {
            return Self::any();
        };

        if let Some(pointer) = obj.get("$ref").and_then(Value::as_str) {
            return Self::new(SchemaKind::Reference(pointer.to_string()));
        }

        let type_names = type_names(raw);
        let nullable = obj.get("nullable").and_then(Value::as_bool) == Some(true)
            || type_names.iter().any(|t| *t == "null");
        let declared_example = obj
            .get("example")
            .or_else(|| obj.get("default"))
            .or_else(|| {
                obj.get("examples")
                    .and_then(Value::as_array)
                    .and_then(|a| a.first())
            })
            .cloned();

        let kind = parse_kind(raw, &type_names);

        Self {
            kind,
            pointer: None,
            nullable,
            declared_example,
        }
    }

    /// Provenance label: the pointer, or a short kind description.
    #[must_use]
    pub fn origin(&self) -> String {
        if let Some(p) = &self.pointer {
            return p.clone();
        }
        match &self.kind {
            SchemaKind::Primitive { ty, format, .. } => match format {
                Some(f) => format!("{}({f})", ty.name()),
                None => ty.name().to_string(),
            },
            SchemaKind::Enum(_) => "enum".into(),
            SchemaKind::Array { .. } => "array".into(),
            SchemaKind::Object { .. } => "object".into(),
            SchemaKind::Composite { kind, .. } => kind.keyword().into(),
            SchemaKind::Reference(p) => p.clone(),
            SchemaKind::Any => "any".into(),
        }
    }

    #[must_use]
    pub fn is_null_type(&self) -> bool {
        matches!(
            self.kind,
            SchemaKind::Primitive {
                ty: PrimitiveType::Null,
                ..
            }
        )
    }

    #[must_use]
    pub fn is_any(&self) -> bool {
        matches!(self.kind, SchemaKind::Any)
    }

    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self.kind, SchemaKind::Array { .. })
    }

    /// True if any `Reference` leaf is reachable from this node.
    #[must_use]
    pub fn contains_reference(&self) -> bool {
        match &self.kind {
            SchemaKind::Reference(_) => true,
            SchemaKind::Array { items, .. } => items.contains_reference(),
            SchemaKind::Object {
                properties,
                additional,
                ..
            } => {
                properties.values().any(SchemaNode::contains_reference)
                    || additional.as_ref().is_some_and(|a| a.contains_reference())
            }
            SchemaKind::Composite { members, .. } => {
                members.iter().any(SchemaNode::contains_reference)
            }
            SchemaKind::Primitive { .. } | SchemaKind::Enum(_) | SchemaKind::Any => false,
        }
    }
}

impl PrimitiveType {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
        }
    }
}

impl CompositeKind {
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::OneOf => "oneOf",
            Self::AnyOf => "anyOf",
            Self::AllOf => "allOf",
        }
    }
}

/// `type` as a list: a string, or an array of strings (OAS 3.1).
fn type_names(raw: &Value) -> Vec<&str> {
    match raw.get("type") {
        Some(Value::String(s)) => vec![s.as_str()],
        Some(Value::Array(arr)) => arr.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

fn parse_kind(raw: &Value, type_names: &[&str]) -> SchemaKind {
    if let Some(values) = raw.get("enum").and_then(Value::as_array) {
        if !values.is_empty() {
            return SchemaKind::Enum(values.clone());
        }
    }
    if let Some(c) = raw.get("const") {
        return SchemaKind::Enum(vec![c.clone()]);
    }

    if let Some(members) = raw.get("allOf").and_then(Value::as_array) {
        let mut members: Vec<SchemaNode> = members.iter().map(SchemaNode::from_json).collect();
        // Sibling properties next to allOf act as one more member
        if has_object_keywords(raw) {
            let mut sibling = raw.clone();
            if let Some(obj) = sibling.as_object_mut() {
                obj.remove("allOf");
            }
            members.push(SchemaNode::from_json(&sibling));
        }
        return SchemaKind::Composite {
            kind: CompositeKind::AllOf,
            members,
        };
    }

    for (keyword, kind) in [("oneOf", CompositeKind::OneOf), ("anyOf", CompositeKind::AnyOf)] {
        if let Some(members) = raw.get(keyword).and_then(Value::as_array) {
            return SchemaKind::Composite {
                kind,
                members: members.iter().map(SchemaNode::from_json).collect(),
            };
        }
    }

    let primary = type_names
        .iter()
        .copied()
        .find(|t| *t != "null")
        .or_else(|| type_names.first().copied());

    match primary {
        Some("string") => primitive_kind(raw, PrimitiveType::String),
        Some("integer") => primitive_kind(raw, PrimitiveType::Integer),
        Some("number") => primitive_kind(raw, PrimitiveType::Number),
        Some("boolean") => primitive_kind(raw, PrimitiveType::Boolean),
        Some("null") => primitive_kind(raw, PrimitiveType::Null),
        // Swagger 2.0 formData upload
        Some("file") => SchemaKind::Primitive {
            ty: PrimitiveType::String,
            format: Some("binary".into()),
            bounds: Bounds::default(),
        },
        Some("array") => array_kind(raw),
        Some("object") => object_kind(raw),
        Some(_) => SchemaKind::Any,
        None => {
            if has_object_keywords(raw) {
                object_kind(raw)
            } else if raw.get("items").is_some() {
                array_kind(raw)
            } else {
                SchemaKind::Any
            }
        }
    }
}

fn has_object_keywords(raw: &Value) -> bool {
    raw.get("properties").is_some()
        || raw.get("additionalProperties").is_some_and(Value::is_object)
        || raw.get("required").is_some_and(Value::is_array)
}

fn primitive_kind(raw: &Value, ty: PrimitiveType) -> SchemaKind {
    SchemaKind::Primitive {
        ty,
        format: raw
            .get("format")
            .and_then(Value::as_str)
            .map(String::from),
        bounds: parse_bounds(raw),
    }
}

fn parse_bounds(raw: &Value) -> Bounds {
    let mut bounds = Bounds {
        minimum: raw.get("minimum").and_then(Value::as_f64),
        maximum: raw.get("maximum").and_then(Value::as_f64),
        min_length: as_usize(raw.get("minLength")),
        max_length: as_usize(raw.get("maxLength")),
        ..Bounds::default()
    };

    // OAS 3.0: boolean flag; OAS 3.1: the bound itself
    match raw.get("exclusiveMinimum") {
        Some(Value::Bool(b)) => bounds.exclusive_minimum = *b,
        Some(v) => {
            if let Some(n) = v.as_f64() {
                bounds.minimum = Some(n);
                bounds.exclusive_minimum = true;
            }
        }
        None => {}
    }
    match raw.get("exclusiveMaximum") {
        Some(Value::Bool(b)) => bounds.exclusive_maximum = *b,
        Some(v) => {
            if let Some(n) = v.as_f64() {
                bounds.maximum = Some(n);
                bounds.exclusive_maximum = true;
            }
        }
        None => {}
    }

    bounds
}

fn as_usize(v: Option<&Value>) -> Option<usize> {
    v.and_then(Value::as_u64)
        .map(|n| usize::try_from(n).unwrap_or(usize::MAX))
}

fn array_kind(raw: &Value) -> SchemaKind {
    let items = raw
        .get("items")
        .map_or_else(SchemaNode::any, SchemaNode::from_json);
    SchemaKind::Array {
        items: Box::new(items),
        min_items: as_usize(raw.get("minItems")),
        max_items: as_usize(raw.get("maxItems")),
    }
}

fn object_kind(raw: &Value) -> SchemaKind {
    let properties: IndexMap<String, SchemaNode> = raw
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| {
            props
                .iter()
                .map(|(name, schema)| (name.clone(), SchemaNode::from_json(schema)))
                .collect()
        })
        .unwrap_or_default();

    let required: IndexSet<String> = raw
        .get("required")
        .and_then(Value::as_array)
        .map(|names| {
            names
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    let additional = raw
        .get("additionalProperties")
        .filter(|v| v.is_object())
        .map(|v| Box::new(SchemaNode::from_json(v)));

    SchemaKind::Object {
        properties,
        required,
        additional,
    }
}
