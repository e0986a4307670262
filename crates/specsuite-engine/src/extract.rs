//! OpenAPI document walking: flatten paths × methods into [`Operation`]s
//!
//! Handles OpenAPI 3.x (`requestBody`, `servers`) and Swagger 2.0
//! (`in: body`, `in: formData`, `consumes`, `basePath`). Declaration order of
//! paths and methods is preserved.

use std::collections::HashSet;

use heck::ToSnakeCase;
use indexmap::IndexMap;
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use crate::error::{ExtractError, GenerateError};
use crate::node::SchemaNode;
use crate::resolve::Resolver;

/// Path-item keys that hold operations.
const METHODS: &[&str] = &[
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

const DEFAULT_CONTENT_TYPE: &str = "application/json";

static NULL: Value = Value::Null;

/// Swagger 2.0 parameter keys that describe the value itself.
const SWAGGER_SCHEMA_KEYS: &[&str] = &[
    "type",
    "format",
    "items",
    "enum",
    "default",
    "minimum",
    "maximum",
    "exclusiveMinimum",
    "exclusiveMaximum",
    "minLength",
    "maxLength",
    "minItems",
    "maxItems",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl ParamLocation {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "path" => Some(Self::Path),
            "query" => Some(Self::Query),
            "header" => Some(Self::Header),
            "cookie" => Some(Self::Cookie),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub name: String,
    pub location: ParamLocation,
    pub required: bool,
    pub schema: SchemaNode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestBodySpec {
    pub required: bool,
    pub content_type: String,
    pub schema: SchemaNode,
}

/// One (method, path) pair with everything resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    /// Upper-case HTTP method
    pub method: String,
    pub path: String,
    pub operation_id: String,
    pub tag: String,
    pub parameters: Vec<ParameterSpec>,
    pub request_body: Option<RequestBodySpec>,
    /// Status code (or `default`) → description, in declaration order
    pub responses: IndexMap<String, String>,
}

impl Operation {
    pub fn parameters_in(&self, location: ParamLocation) -> impl Iterator<Item = &ParameterSpec> {
        self.parameters.iter().filter(move |p| p.location == location)
    }

    /// Required query, header or cookie parameter present.
    #[must_use]
    pub fn has_required_input(&self) -> bool {
        self.parameters
            .iter()
            .any(|p| p.required && p.location != ParamLocation::Path)
    }

    /// First declared 2xx status.
    #[must_use]
    pub fn first_success_status(&self) -> Option<u16> {
        self.responses
            .keys()
            .filter_map(|k| k.parse::<u16>().ok())
            .find(|s| (200..300).contains(s))
    }
}

/// An operation that could not be extracted; reported, never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedOperation {
    pub operation_id: String,
    pub method: String,
    pub path: String,
    pub reason: String,
}

/// Everything the plan builder needs from a document.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub title: Option<String>,
    pub base_path: Option<String>,
    pub operations: Vec<Operation>,
    pub malformed: Vec<MalformedOperation>,
}

/// Walk `doc.paths` and extract every operation.
///
/// # Errors
///
/// Resolution failures are fatal and returned as [`GenerateError::Resolve`].
/// A `paths` member that is not an object is [`GenerateError::InvalidDocument`].
pub fn extract_operations<'doc>(
    doc: &'doc Value,
    resolver: &mut Resolver<'doc>,
) -> Result<Extraction, GenerateError> {
    let mut extraction = Extraction {
        title: doc
            .pointer("/info/title")
            .and_then(Value::as_str)
            .map(String::from),
        base_path: base_path(doc),
        ..Extraction::default()
    };

    let paths = match doc.get("paths") {
        None => return Ok(extraction),
        Some(Value::Object(paths)) => paths,
        Some(_) => {
            return Err(GenerateError::InvalidDocument(
                "`paths` is not an object".into(),
            ));
        }
    };

    let root_consumes: Vec<&str> = doc
        .get("consumes")
        .and_then(Value::as_array)
        .map(|list| list.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    let mut ids = IdRegistry::default();

    for (path, raw_item) in paths {
        let item = resolver.deref_object(raw_item)?;
        let Some(item_obj) = item.as_object() else {
            let record = MalformedOperation {
                operation_id: ids.claim(&slug("any", path)),
                method: "ANY".into(),
                path: path.clone(),
                reason: "path item is not an object".into(),
            };
            warn!(path = %path, "skipping malformed path item");
            extraction.malformed.push(record);
            continue;
        };

        for (key, raw_op) in item_obj {
            let Some(method) = METHODS.iter().copied().find(|m| *m == key.as_str()) else {
                continue;
            };
            let operation_id = ids.claim(
                raw_op
                    .get("operationId")
                    .and_then(Value::as_str)
                    .map_or_else(|| slug(method, path), String::from)
                    .as_str(),
            );
            let source = OperationSource {
                path,
                method,
                item,
                op: raw_op,
                root_consumes: &root_consumes,
            };

            match source.extract(operation_id.clone(), resolver) {
                Ok(op) => {
                    debug!(
                        operation_id = %op.operation_id,
                        method = %op.method,
                        path = %op.path,
                        parameters = op.parameters.len(),
                        body = op.request_body.is_some(),
                        "extracted operation"
                    );
                    extraction.operations.push(op);
                }
                Err(ExtractError::Resolve(e)) => return Err(e.into()),
                Err(e) => {
                    warn!(operation_id = %operation_id, error = %e, "skipping malformed operation");
                    extraction.malformed.push(MalformedOperation {
                        operation_id,
                        method: method.to_uppercase(),
                        path: path.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    Ok(extraction)
}

/// Raw pieces of one operation while it is being extracted.
struct OperationSource<'s, 'doc> {
    path: &'doc str,
    method: &'static str,
    item: &'doc Value,
    op: &'doc Value,
    root_consumes: &'s [&'doc str],
}

/// Parameter list entry before schema resolution.
enum RawParam<'doc> {
    Plain {
        name: String,
        location: ParamLocation,
        raw: &'doc Value,
    },
    Body(&'doc Value),
    Form {
        name: String,
        raw: &'doc Value,
    },
}

impl<'doc> OperationSource<'_, 'doc> {
    fn extract(
        &self,
        operation_id: String,
        resolver: &mut Resolver<'doc>,
    ) -> Result<Operation, ExtractError> {
        if !self.op.is_object() {
            return Err(ExtractError::Malformed("operation is not an object".into()));
        }

        let raw_params = self.collect_parameters(resolver)?;

        let mut parameters = Vec::new();
        let mut body_param = None;
        let mut form_fields = Vec::new();
        for param in raw_params {
            match param {
                RawParam::Plain {
                    name,
                    location,
                    raw,
                } => {
                    let required = location == ParamLocation::Path
                        || raw.get("required").and_then(Value::as_bool) == Some(true);
                    let schema = resolver.resolve_schema(&parameter_schema(raw))?;
                    parameters.push(ParameterSpec {
                        name,
                        location,
                        required,
                        schema,
                    });
                }
                RawParam::Body(raw) => {
                    if body_param.replace(raw).is_some() {
                        return Err(ExtractError::Malformed(
                            "more than one `in: body` parameter".into(),
                        ));
                    }
                }
                RawParam::Form { name, raw } => form_fields.push((name, raw)),
            }
        }

        // Placeholders without a declared parameter still need a value
        for name in template_params(self.path) {
            let declared = parameters
                .iter()
                .any(|p| p.location == ParamLocation::Path && p.name == name);
            if !declared {
                debug!(path = %self.path, param = %name, "undeclared path parameter, assuming string");
                parameters.push(ParameterSpec {
                    name: name.to_string(),
                    location: ParamLocation::Path,
                    required: true,
                    schema: SchemaNode::from_json(&json!({"type": "string"})),
                });
            }
        }

        let request_body = match (self.op.get("requestBody"), body_param, form_fields.is_empty()) {
            (Some(raw), None, true) => Some(self.openapi_body(raw, resolver)?),
            (None, Some(raw), true) => Some(self.swagger_body(raw, resolver)?),
            (None, None, false) => Some(self.form_body(&form_fields, resolver)?),
            (None, None, true) => None,
            _ => {
                return Err(ExtractError::Malformed(
                    "conflicting request body declarations".into(),
                ));
            }
        };

        Ok(Operation {
            method: self.method.to_uppercase(),
            path: self.path.to_string(),
            operation_id,
            tag: self.tag(),
            parameters,
            request_body,
            responses: self.responses(resolver)?,
        })
    }

    /// Path-level then operation-level parameters; the latter override by
    /// name and location.
    fn collect_parameters(
        &self,
        resolver: &Resolver<'doc>,
    ) -> Result<Vec<RawParam<'doc>>, ExtractError> {
        let mut merged: Vec<(String, String, &'doc Value)> = Vec::new();
        for source in [self.item.get("parameters"), self.op.get("parameters")]
            .into_iter()
            .flatten()
        {
            let Some(list) = source.as_array() else {
                return Err(ExtractError::Malformed("`parameters` is not an array".into()));
            };
            for raw in list {
                let param = resolver.deref_object(raw)?;
                let name = param
                    .get("name")
                    .and_then(Value::as_str)
                    .ok_or_else(|| ExtractError::Malformed("parameter without a name".into()))?;
                let location = param
                    .get("in")
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        ExtractError::Malformed(format!("parameter `{name}` has no location"))
                    })?;
                match merged
                    .iter_mut()
                    .find(|(n, l, _)| n == name && l == location)
                {
                    Some(slot) => slot.2 = param,
                    None => merged.push((name.to_string(), location.to_string(), param)),
                }
            }
        }

        merged
            .into_iter()
            .map(|(name, location, raw)| match location.as_str() {
                "body" => Ok(RawParam::Body(raw)),
                "formData" => Ok(RawParam::Form { name, raw }),
                other => ParamLocation::parse(other)
                    .map(|location| RawParam::Plain {
                        name: name.clone(),
                        location,
                        raw,
                    })
                    .ok_or_else(|| {
                        ExtractError::Malformed(format!(
                            "parameter `{name}` has unknown location `{other}`"
                        ))
                    }),
            })
            .collect()
    }

    /// OpenAPI 3.x `requestBody`: first declared content type.
    fn openapi_body(
        &self,
        raw: &'doc Value,
        resolver: &mut Resolver<'doc>,
    ) -> Result<RequestBodySpec, ExtractError> {
        let body = resolver.deref_object(raw)?;
        let content = body
            .get("content")
            .and_then(Value::as_object)
            .ok_or_else(|| {
                ExtractError::UnresolvableContent("requestBody declares no content".into())
            })?;

        let (content_type, media) = match content.iter().next() {
            Some((ct, media)) => (ct.clone(), media),
            None => (DEFAULT_CONTENT_TYPE.to_string(), &NULL),
        };
        if !media.is_object() && !media.is_null() {
            return Err(ExtractError::UnresolvableContent(format!(
                "media type `{content_type}` is not an object"
            )));
        }

        let schema = match media.get("schema") {
            Some(raw_schema) => resolver.resolve_schema(raw_schema)?,
            None => SchemaNode::empty_object(),
        };

        Ok(RequestBodySpec {
            required: body.get("required").and_then(Value::as_bool) == Some(true),
            content_type,
            schema,
        })
    }

    /// Swagger 2.0 `in: body` parameter.
    fn swagger_body(
        &self,
        raw: &'doc Value,
        resolver: &mut Resolver<'doc>,
    ) -> Result<RequestBodySpec, ExtractError> {
        let schema = match raw.get("schema") {
            Some(raw_schema) => resolver.resolve_schema(raw_schema)?,
            None => SchemaNode::empty_object(),
        };
        Ok(RequestBodySpec {
            required: raw.get("required").and_then(Value::as_bool) == Some(true),
            content_type: self
                .consumes()
                .first()
                .copied()
                .unwrap_or(DEFAULT_CONTENT_TYPE)
                .to_string(),
            schema,
        })
    }

    /// Swagger 2.0 `in: formData` parameters folded into one object body.
    fn form_body(
        &self,
        fields: &[(String, &'doc Value)],
        resolver: &mut Resolver<'doc>,
    ) -> Result<RequestBodySpec, ExtractError> {
        let mut properties = Map::new();
        let mut required = Vec::new();
        let mut has_file = false;
        for (name, raw) in fields {
            has_file |= raw.get("type").and_then(Value::as_str) == Some("file");
            if raw.get("required").and_then(Value::as_bool) == Some(true) {
                required.push(Value::String(name.clone()));
            }
            properties.insert(name.clone(), parameter_schema(raw));
        }

        let content_type = if has_file {
            "multipart/form-data"
        } else {
            self.consumes()
                .into_iter()
                .find(|ct| *ct == "application/x-www-form-urlencoded" || *ct == "multipart/form-data")
                .unwrap_or("application/x-www-form-urlencoded")
        };

        let is_required = !required.is_empty();
        let schema = resolver.resolve_schema(&json!({
            "type": "object",
            "properties": properties,
            "required": required,
        }))?;

        Ok(RequestBodySpec {
            required: is_required,
            content_type: content_type.to_string(),
            schema,
        })
    }

    /// Operation `consumes`, falling back to the document's.
    fn consumes(&self) -> Vec<&'doc str> {
        let own: Vec<&'doc str> = self
            .op
            .get("consumes")
            .and_then(Value::as_array)
            .map(|list| list.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();
        if own.is_empty() {
            self.root_consumes.to_vec()
        } else {
            own
        }
    }

    fn responses(&self, resolver: &Resolver<'doc>) -> Result<IndexMap<String, String>, ExtractError> {
        let Some(raw) = self.op.get("responses") else {
            return Ok(IndexMap::new());
        };
        let Some(responses) = raw.as_object() else {
            return Err(ExtractError::Malformed("`responses` is not an object".into()));
        };

        let mut out = IndexMap::new();
        for (status, raw_response) in responses {
            let response = resolver.deref_object(raw_response)?;
            let description = response
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or_default();
            out.insert(status.clone(), description.to_string());
        }
        Ok(out)
    }

    /// First tag, else first literal path segment, else `default`.
    fn tag(&self) -> String {
        if let Some(tag) = self
            .op
            .get("tags")
            .and_then(Value::as_array)
            .and_then(|tags| tags.first())
            .and_then(Value::as_str)
        {
            return tag.to_string();
        }
        self.path
            .split('/')
            .find(|s| !s.is_empty() && !s.starts_with('{'))
            .map_or_else(|| "default".to_string(), String::from)
    }
}

/// Schema of a non-body parameter: OAS 3 `schema`, or the Swagger 2.0
/// inline keywords, or a plain string.
fn parameter_schema(raw: &Value) -> Value {
    if let Some(schema) = raw.get("schema") {
        return schema.clone();
    }
    if let Some(content) = raw.get("content").and_then(Value::as_object) {
        if let Some(schema) = content.values().next().and_then(|m| m.get("schema")) {
            return schema.clone();
        }
    }

    let mut schema = Map::new();
    for key in SWAGGER_SCHEMA_KEYS {
        if let Some(v) = raw.get(*key) {
            schema.insert((*key).to_string(), v.clone());
        }
    }
    if !schema.contains_key("type") && !schema.contains_key("enum") {
        schema.insert("type".into(), json!("string"));
    }
    Value::Object(schema)
}

/// `{name}` placeholders of a path template, in order.
pub(crate) fn template_params(path: &str) -> impl Iterator<Item = &str> {
    path.split('{')
        .skip(1)
        .filter_map(|rest| rest.split_once('}').map(|(name, _)| name))
}

fn base_path(doc: &Value) -> Option<String> {
    doc.pointer("/servers/0/url")
        .or_else(|| doc.get("basePath"))
        .and_then(Value::as_str)
        .map(String::from)
}

/// `get /users/{id}` → `get_users_id`
fn slug(method: &str, path: &str) -> String {
    format!("{method} {path}").to_snake_case()
}

/// Hands out unique operation ids, suffixing repeats with `_2`, `_3`, ...
#[derive(Default)]
struct IdRegistry {
    seen: HashSet<String>,
}

impl IdRegistry {
    fn claim(&mut self, id: &str) -> String {
        let mut candidate = id.to_string();
        let mut n = 2;
        while !self.seen.insert(candidate.clone()) {
            candidate = format!("{id}_{n}");
            n += 1;
        }
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResolveError;
    use crate::node::{PrimitiveType, SchemaKind};

    fn extract(doc: &Value) -> Result<Extraction, GenerateError> {
        let mut resolver = Resolver::new(doc);
        extract_operations(doc, &mut resolver)
    }

    #[test]
    fn preserves_declaration_order() {
        let doc = json!({
            "paths": {
                "/zebra": {"post": {}, "get": {}},
                "/apple": {"delete": {}}
            }
        });
        let ops = extract(&doc).unwrap().operations;
        let labels: Vec<String> = ops.iter().map(|o| format!("{} {}", o.method, o.path)).collect();
        assert_eq!(labels, vec!["POST /zebra", "GET /zebra", "DELETE /apple"]);
    }

    #[test]
    fn synthesizes_operation_id_from_method_and_path() {
        let doc = json!({"paths": {"/users/{id}": {"get": {}}}});
        let ops = extract(&doc).unwrap().operations;
        assert_eq!(ops[0].operation_id, "get_users_id");
    }

    #[test]
    fn duplicate_operation_ids_get_suffix() {
        let doc = json!({"paths": {
            "/a": {"get": {"operationId": "list"}},
            "/b": {"get": {"operationId": "list"}},
            "/c": {"get": {"operationId": "list"}}
        }});
        let ids: Vec<String> = extract(&doc)
            .unwrap()
            .operations
            .into_iter()
            .map(|o| o.operation_id)
            .collect();
        assert_eq!(ids, vec!["list", "list_2", "list_3"]);
    }

    #[test]
    fn tag_falls_back_to_path_segment() {
        let doc = json!({"paths": {
            "/pets/{id}": {"get": {"tags": ["animals", "other"]}, "delete": {}},
            "/{tenant}": {"get": {}}
        }});
        let tags: Vec<String> = extract(&doc)
            .unwrap()
            .operations
            .into_iter()
            .map(|o| o.tag)
            .collect();
        assert_eq!(tags, vec!["animals", "pets", "default"]);
    }

    #[test]
    fn operation_parameters_override_path_level() {
        let doc = json!({"paths": {"/items": {
            "parameters": [
                {"name": "limit", "in": "query", "schema": {"type": "string"}},
                {"name": "X-Trace", "in": "header", "schema": {"type": "string"}}
            ],
            "get": {"parameters": [
                {"name": "limit", "in": "query", "required": true, "schema": {"type": "integer"}}
            ]}
        }}});
        let op = &extract(&doc).unwrap().operations[0];
        assert_eq!(op.parameters.len(), 2);
        assert_eq!(op.parameters[0].name, "limit");
        assert!(op.parameters[0].required);
        assert!(matches!(
            op.parameters[0].schema.kind,
            SchemaKind::Primitive {
                ty: PrimitiveType::Integer,
                ..
            }
        ));
        assert!(op.has_required_input());
    }

    #[test]
    fn parameter_refs_are_followed() {
        let doc = json!({
            "paths": {"/items/{id}": {"get": {"parameters": [
                {"$ref": "#/components/parameters/ItemId"}
            ]}}},
            "components": {"parameters": {"ItemId": {
                "name": "id", "in": "path", "required": true, "schema": {"type": "integer"}
            }}}
        });
        let op = &extract(&doc).unwrap().operations[0];
        assert_eq!(op.parameters[0].location, ParamLocation::Path);
        assert_eq!(op.parameters[0].name, "id");
    }

    #[test]
    fn undeclared_path_placeholder_becomes_string_param() {
        let doc = json!({"paths": {"/files/{name}": {"get": {}}}});
        let op = &extract(&doc).unwrap().operations[0];
        assert_eq!(op.parameters.len(), 1);
        assert_eq!(op.parameters[0].location, ParamLocation::Path);
        assert!(op.parameters[0].required);
    }

    #[test]
    fn request_body_uses_first_content_type() {
        let doc = json!({"paths": {"/upload": {"post": {"requestBody": {
            "required": true,
            "content": {
                "application/xml": {"schema": {"type": "object"}},
                "application/json": {"schema": {"type": "object"}}
            }
        }}}}});
        let op = &extract(&doc).unwrap().operations[0];
        let body = op.request_body.as_ref().unwrap();
        assert_eq!(body.content_type, "application/xml");
        assert!(body.required);
    }

    #[test]
    fn request_body_without_content_is_malformed() {
        let doc = json!({"paths": {
            "/bad": {"post": {"requestBody": {"description": "nothing"}}},
            "/good": {"get": {}}
        }});
        let extraction = extract(&doc).unwrap();
        assert_eq!(extraction.operations.len(), 1);
        assert_eq!(extraction.malformed.len(), 1);
        assert_eq!(extraction.malformed[0].operation_id, "post_bad");
        assert!(extraction.malformed[0].reason.contains("no content"));
    }

    #[test]
    fn unknown_parameter_location_is_malformed() {
        let doc = json!({"paths": {"/x": {"get": {"parameters": [
            {"name": "q", "in": "body-ish"}
        ]}}}});
        let extraction = extract(&doc).unwrap();
        assert!(extraction.operations.is_empty());
        assert_eq!(extraction.malformed[0].method, "GET");
    }

    #[test]
    fn non_object_path_item_is_malformed() {
        let doc = json!({"paths": {"/broken": "oops", "/fine": {"get": {}}}});
        let extraction = extract(&doc).unwrap();
        assert_eq!(extraction.operations.len(), 1);
        assert_eq!(extraction.malformed[0].method, "ANY");
        assert_eq!(extraction.malformed[0].path, "/broken");
    }

    #[test]
    fn dangling_schema_ref_is_fatal() {
        let doc = json!({"paths": {"/x": {"post": {"requestBody": {"content": {
            "application/json": {"schema": {"$ref": "#/components/schemas/Missing"}}
        }}}}}});
        let err = extract(&doc).unwrap_err();
        assert_eq!(
            err,
            GenerateError::Resolve(ResolveError::Dangling("#/components/schemas/Missing".into()))
        );
    }

    #[test]
    fn swagger_body_and_consumes() {
        let doc = json!({
            "swagger": "2.0",
            "basePath": "/v1",
            "consumes": ["application/json"],
            "paths": {"/pets": {"post": {
                "consumes": ["application/vnd.pet+json"],
                "parameters": [{
                    "name": "pet", "in": "body", "required": true,
                    "schema": {"$ref": "#/definitions/Pet"}
                }]
            }}},
            "definitions": {"Pet": {"type": "object", "properties": {"name": {"type": "string"}}}}
        });
        let extraction = extract(&doc).unwrap();
        assert_eq!(extraction.base_path.as_deref(), Some("/v1"));
        let body = extraction.operations[0].request_body.as_ref().unwrap();
        assert_eq!(body.content_type, "application/vnd.pet+json");
        assert_eq!(body.schema.pointer.as_deref(), Some("#/definitions/Pet"));
        assert!(extraction.operations[0].parameters.is_empty());
    }

    #[test]
    fn swagger_form_data_with_file_is_multipart() {
        let doc = json!({"swagger": "2.0", "paths": {"/avatar": {"post": {"parameters": [
            {"name": "file", "in": "formData", "type": "file", "required": true},
            {"name": "caption", "in": "formData", "type": "string"}
        ]}}}});
        let op = &extract(&doc).unwrap().operations[0];
        let body = op.request_body.as_ref().unwrap();
        assert_eq!(body.content_type, "multipart/form-data");
        assert!(body.required);
        let SchemaKind::Object { properties, .. } = &body.schema.kind else {
            panic!("expected object body");
        };
        assert_eq!(properties.len(), 2);
    }

    #[test]
    fn swagger_inline_parameter_schema() {
        let doc = json!({"swagger": "2.0", "paths": {"/items": {"get": {"parameters": [
            {"name": "page", "in": "query", "type": "integer", "minimum": 1}
        ]}}}});
        let op = &extract(&doc).unwrap().operations[0];
        let SchemaKind::Primitive { ty, bounds, .. } = &op.parameters[0].schema.kind else {
            panic!("expected primitive");
        };
        assert_eq!(*ty, PrimitiveType::Integer);
        assert_eq!(bounds.minimum, Some(1.0));
    }

    #[test]
    fn responses_keep_order_and_first_success() {
        let doc = json!({"paths": {"/x": {"post": {"responses": {
            "400": {"description": "bad"},
            "201": {"description": "created"},
            "default": {"$ref": "#/components/responses/Error"}
        }}}},
            "components": {"responses": {"Error": {"description": "error"}}}
        });
        let op = &extract(&doc).unwrap().operations[0];
        let keys: Vec<&str> = op.responses.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["400", "201", "default"]);
        assert_eq!(op.responses["default"], "error");
        assert_eq!(op.first_success_status(), Some(201));
    }

    #[test]
    fn title_and_server_url_recorded() {
        let doc = json!({
            "info": {"title": "Pet Store"},
            "servers": [{"url": "https://api.example.com/v2"}],
            "paths": {}
        });
        let extraction = extract(&doc).unwrap();
        assert_eq!(extraction.title.as_deref(), Some("Pet Store"));
        assert_eq!(extraction.base_path.as_deref(), Some("https://api.example.com/v2"));
    }

    #[test]
    fn non_object_paths_is_invalid_document() {
        let doc = json!({"paths": []});
        assert!(matches!(
            extract(&doc).unwrap_err(),
            GenerateError::InvalidDocument(_)
        ));
    }

    #[test]
    fn template_params_in_order() {
        let names: Vec<&str> = template_params("/orgs/{org}/repos/{repo}/pulls").collect();
        assert_eq!(names, vec!["org", "repo"]);
    }
}
