//! End-to-end plan generation over small documents

use proptest::prelude::*;
use serde_json::{Map, Value, json};

use specsuite_core::{CaseKind, ExpectedStatus, GenerationOptions, TestPlan};
use specsuite_engine::{GenerateError, ResolveError, generate};

fn run(doc: &Value) -> TestPlan {
    generate(doc, &GenerationOptions::default()).unwrap()
}

fn conflicting_all_of() -> Value {
    json!({
        "allOf": [
            {"type": "object", "properties": {"a": {"type": "string"}}},
            {"type": "object", "properties": {"a": {"type": "integer"}}}
        ]
    })
}

#[test]
fn get_with_path_param() {
    let plan = run(&json!({
        "openapi": "3.0.3",
        "paths": {"/users/{id}": {"get": {
            "operationId": "getUser",
            "parameters": [{"name": "id", "in": "path", "required": true, "schema": {"type": "integer"}}],
            "responses": {"200": {"description": "ok"}}
        }}}
    }));

    assert_eq!(plan.case_count(), 1);
    let case = plan.cases().next().unwrap();
    assert_eq!(case.kind, CaseKind::Valid);
    assert_eq!(case.path, "/users/1");
    assert_eq!(case.expected, ExpectedStatus::Exact(200));
    assert_eq!(plan.coverage.coverage_percentage, 100);
}

#[test]
fn post_with_required_body() {
    let plan = run(&json!({
        "openapi": "3.0.3",
        "paths": {"/users": {"post": {
            "operationId": "createUser",
            "requestBody": {"required": true, "content": {"application/json": {"schema": {
                "type": "object",
                "required": ["name", "email"],
                "properties": {
                    "name": {"type": "string"},
                    "email": {"type": "string", "format": "email"}
                }
            }}}},
            "responses": {"201": {"description": "created"}}
        }}}
    }));

    let cases = plan.cases_for("createUser");
    assert_eq!(cases.len(), 2);

    let valid = cases[0];
    assert_eq!(valid.kind, CaseKind::Valid);
    assert_eq!(valid.expected, ExpectedStatus::Exact(200));
    let body = &valid.body.as_ref().unwrap().value;
    assert!(body["name"].as_str().is_some_and(|s| !s.is_empty()));
    assert!(body["email"].as_str().is_some_and(|s| s.contains('@')));
    assert_eq!(valid.content_type.as_deref(), Some("application/json"));

    let invalid = cases[1];
    assert_eq!(invalid.kind, CaseKind::InvalidEmpty);
    assert_eq!(invalid.body.as_ref().unwrap().value, json!({}));
    assert_eq!(
        invalid.expected,
        ExpectedStatus::OneOf(vec![400, 401, 422, 500])
    );
}

#[test]
fn conflicting_all_of_is_skipped_and_reported() {
    let plan = run(&json!({
        "openapi": "3.0.3",
        "paths": {"/things": {"post": {
            "operationId": "createThing",
            "requestBody": {"content": {"application/json": {
                "schema": {"$ref": "#/components/schemas/Thing"}
            }}}
        }}},
        "components": {"schemas": {"Thing": conflicting_all_of()}}
    }));

    assert_eq!(plan.case_count(), 0);
    assert!(!plan.has_coverage());
    assert_eq!(plan.coverage.operations_total, 1);
    assert_eq!(plan.coverage.skipped.len(), 1);
    let skipped = &plan.coverage.skipped[0];
    assert_eq!(skipped.operation_id, "createThing");
    assert!(skipped.reason.contains("conflicting allOf"));
}

#[test]
fn ten_operations_two_failures() {
    let mut paths = Map::new();
    for i in 0..10 {
        let schema = if i == 3 || i == 7 {
            conflicting_all_of()
        } else {
            json!({"type": "object", "properties": {"n": {"type": "integer"}}})
        };
        paths.insert(
            format!("/r{i}"),
            json!({"post": {
                "operationId": format!("op{i}"),
                "requestBody": {"content": {"application/json": {"schema": schema}}}
            }}),
        );
    }
    let plan = run(&json!({"openapi": "3.0.3", "paths": paths}));

    assert_eq!(plan.coverage.operations_total, 10);
    assert_eq!(plan.coverage.operations_covered, 8);
    assert_eq!(plan.coverage.coverage_percentage, 80);
    assert_eq!(plan.coverage.total_tests, 16);
    let ids: Vec<&str> = plan
        .coverage
        .skipped
        .iter()
        .map(|s| s.operation_id.as_str())
        .collect();
    assert_eq!(ids, vec!["op3", "op7"]);
}

#[test]
fn self_referencing_schema_terminates() {
    let plan = run(&json!({
        "openapi": "3.0.3",
        "paths": {"/nodes": {"post": {
            "requestBody": {"content": {"application/json": {
                "schema": {"$ref": "#/components/schemas/Node"}
            }}}
        }}},
        "components": {"schemas": {"Node": {
            "type": "object",
            "required": ["children"],
            "properties": {
                "name": {"type": "string"},
                "children": {"type": "array", "items": {"$ref": "#/components/schemas/Node"}}
            }
        }}}
    }));

    let valid = plan.cases().next().unwrap();
    let body = valid.body.as_ref().unwrap();
    assert_eq!(body.origin, "#/components/schemas/Node");
    assert_eq!(body.value["children"], json!([{}]));
}

#[test]
fn extreme_bounds_still_produce_cases() {
    let plan = run(&json!({
        "openapi": "3.0.3",
        "paths": {"/blobs": {"post": {
            "operationId": "createBlob",
            "parameters": [{"name": "offset", "in": "query", "schema": {
                "type": "integer", "minimum": 9_223_372_036_854_775_807_i64, "exclusiveMinimum": true
            }}],
            "requestBody": {"required": true, "content": {"application/json": {"schema": {
                "type": "object",
                "required": ["data", "contact"],
                "properties": {
                    "data": {"type": "string", "minLength": u64::MAX},
                    "contact": {"type": "string", "format": "email", "maxLength": 5}
                }
            }}}}
        }}}
    }));

    assert_eq!(plan.coverage.coverage_percentage, 100);
    let valid = plan.cases_for("createBlob")[0];
    assert_eq!(valid.query[0].value.value, json!(i64::MAX));
    let body = &valid.body.as_ref().unwrap().value;
    assert_eq!(body["data"].as_str().unwrap().len(), 10_000);
    assert_eq!(body["contact"].as_str().unwrap().len(), 5);
}

#[test]
fn dangling_reference_aborts() {
    let err = generate(
        &json!({"paths": {"/x": {"get": {"parameters": [
            {"name": "id", "in": "query", "schema": {"$ref": "#/components/schemas/Nope"}}
        ]}}}}),
        &GenerationOptions::default(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        GenerateError::Resolve(ResolveError::Dangling("#/components/schemas/Nope".into()))
    );
}

#[test]
fn non_object_root_aborts() {
    let err = generate(&json!(["not", "a", "spec"]), &GenerationOptions::default()).unwrap_err();
    assert!(matches!(err, GenerateError::InvalidDocument(_)));
}

#[test]
fn empty_document_has_zero_percent() {
    let plan = run(&json!({"openapi": "3.0.3", "paths": {}}));
    assert_eq!(plan.coverage.operations_total, 0);
    assert_eq!(plan.coverage.coverage_percentage, 0);
    assert!(plan.groups.is_empty());
}

#[test]
fn swagger_two_document() {
    let plan = run(&json!({
        "swagger": "2.0",
        "info": {"title": "Petstore", "version": "1"},
        "basePath": "/api",
        "paths": {"/pets/{petId}": {"put": {
            "tags": ["pets"],
            "parameters": [
                {"name": "petId", "in": "path", "required": true, "type": "string", "format": "uuid"},
                {"name": "body", "in": "body", "required": true, "schema": {"$ref": "#/definitions/Pet"}}
            ]
        }}},
        "definitions": {"Pet": {
            "type": "object",
            "required": ["name"],
            "properties": {"name": {"type": "string"}, "born": {"type": "string", "format": "date-time"}}
        }}
    }));

    assert_eq!(plan.title.as_deref(), Some("Petstore"));
    assert_eq!(plan.base_path.as_deref(), Some("/api"));
    assert_eq!(plan.groups[0].tag, "pets");
    let valid = plan.cases().next().unwrap();
    assert_eq!(valid.path, "/pets/00000000-0000-4000-8000-000000000001");
    assert_eq!(
        valid.body.as_ref().unwrap().value,
        json!({"name": "Alice Smith", "born": "2024-01-15T12:00:00Z"})
    );
}

fn arb_document() -> impl Strategy<Value = Value> {
    let schema = prop_oneof![
        Just(json!({"type": "string"})),
        Just(json!({"type": "string", "format": "date-time"})),
        Just(json!({"type": "integer"})),
        Just(json!({"type": "array", "items": {"type": "string"}, "minItems": 2})),
        Just(json!({"oneOf": [{"type": "string"}, {"type": "boolean"}]})),
        Just(json!({"type": "object", "required": ["x"], "properties": {"x": {"type": "string"}}})),
    ];
    prop::collection::vec((schema, any::<bool>()), 0..12).prop_map(|ops| {
        let mut paths = Map::new();
        for (i, (schema, with_body)) in ops.into_iter().enumerate() {
            let op = if with_body {
                json!({"post": {"requestBody": {"content": {"application/json": {"schema": schema}}}}})
            } else {
                json!({"get": {"parameters": [{"name": "q", "in": "query", "schema": schema}]}})
            };
            paths.insert(format!("/r{i}"), op);
        }
        json!({"openapi": "3.0.3", "paths": paths})
    })
}

proptest! {
    #[test]
    fn generation_is_deterministic(doc in arb_document()) {
        let options = GenerationOptions::default();
        let a = serde_json::to_string(&generate(&doc, &options).unwrap()).unwrap();
        let b = serde_json::to_string(&generate(&doc, &options).unwrap()).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn every_operation_is_covered(doc in arb_document()) {
        let plan = generate(&doc, &GenerationOptions::default()).unwrap();
        prop_assert_eq!(plan.coverage.operations_covered, plan.coverage.operations_total);
        prop_assert!(plan.coverage.skipped.is_empty());
    }
}
