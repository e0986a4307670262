//! Operation → test cases, and the whole plan
//!
//! Each operation yields one `valid` case (or one per body variant under
//! [`VariantPolicy::AllVariants`]) and, when it has input to take away, one
//! `invalid_empty` case. Synthesis failures skip the operation.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde_json::Value;
use tracing::{debug, warn};

use specsuite_core::{
    CaseKind, ExampleValue, ExpectedStatus, GenerationOptions, ParamValue, SkippedOperation,
    SuccessStatus, TestCase, TestPlan, VariantPolicy, group_by_tag, summarize,
};

use crate::error::SynthError;
use crate::extract::{Extraction, Operation, ParamLocation, template_params};
use crate::synth::{SynthContext, synthesize, variants};

/// Characters escaped in a substituted path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Build the test cases for one operation.
///
/// # Errors
///
/// Returns the first [`SynthError`] raised while synthesizing any parameter
/// or body example.
pub fn build_cases(op: &Operation, ctx: &mut SynthContext) -> Result<Vec<TestCase>, SynthError> {
    let options = ctx.options();

    let path_params = synth_params(op, ParamLocation::Path, ctx)?;
    let query = synth_params(op, ParamLocation::Query, ctx)?;
    let headers = synth_params(op, ParamLocation::Header, ctx)?;
    let cookies = synth_params(op, ParamLocation::Cookie, ctx)?;
    let path = substitute_path(&op.path, &path_params);

    let bodies: Vec<(Option<usize>, Option<ExampleValue>)> = match &op.request_body {
        None => vec![(None, None)],
        Some(body) => {
            let members = variants(&body.schema);
            if options.variant_policy == VariantPolicy::AllVariants && members.len() > 1 {
                members
                    .into_iter()
                    .enumerate()
                    .map(|(i, member)| synthesize(member, ctx).map(|v| (Some(i), Some(v))))
                    .collect::<Result<_, SynthError>>()?
            } else {
                vec![(None, Some(synthesize(&body.schema, ctx)?))]
            }
        }
    };

    let base = TestCase {
        operation_id: op.operation_id.clone(),
        method: op.method.clone(),
        path_template: op.path.clone(),
        name: String::new(),
        kind: CaseKind::Valid,
        variant: None,
        path,
        path_params,
        query: Vec::new(),
        headers: Vec::new(),
        cookies: Vec::new(),
        body: None,
        content_type: None,
        expected: success_status(op, options),
    };
    let content_type = op.request_body.as_ref().map(|b| b.content_type.clone());

    let mut cases: Vec<TestCase> = bodies
        .into_iter()
        .map(|(variant, body)| TestCase {
            name: match variant {
                Some(i) => format!("{} {} succeeds with variant {i}", op.method, op.path),
                None => format!("{} {} succeeds", op.method, op.path),
            },
            variant,
            query: query.clone(),
            headers: headers.clone(),
            cookies: cookies.clone(),
            content_type: body.as_ref().and(content_type.clone()),
            body,
            ..base.clone()
        })
        .collect();

    if op.request_body.is_some() || op.has_required_input() {
        let empty = op.request_body.as_ref().map(|b| {
            let value = if b.schema.is_array() {
                Value::Array(Vec::new())
            } else {
                Value::Object(serde_json::Map::new())
            };
            ExampleValue::new(value, "empty")
        });
        cases.push(TestCase {
            name: format!("{} {} rejects empty payload", op.method, op.path),
            kind: CaseKind::InvalidEmpty,
            body: empty,
            content_type,
            expected: ExpectedStatus::OneOf(options.rejection_statuses.clone()),
            ..base
        });
    }

    debug!(operation_id = %op.operation_id, cases = cases.len(), "built cases");
    Ok(cases)
}

/// Build the full plan: cases grouped by tag plus the coverage report.
#[must_use]
pub fn build_plan(extraction: &Extraction, options: &GenerationOptions) -> TestPlan {
    let mut ctx = SynthContext::new(options);
    let mut rows = Vec::new();
    let mut skipped: Vec<SkippedOperation> = extraction
        .malformed
        .iter()
        .map(|m| SkippedOperation {
            operation_id: m.operation_id.clone(),
            method: m.method.clone(),
            path: m.path.clone(),
            reason: m.reason.clone(),
        })
        .collect();

    for op in &extraction.operations {
        match build_cases(op, &mut ctx) {
            Ok(cases) => rows.extend(cases.into_iter().map(|c| (op.tag.clone(), c))),
            Err(e) => {
                warn!(operation_id = %op.operation_id, error = %e, "skipping operation");
                skipped.push(SkippedOperation {
                    operation_id: op.operation_id.clone(),
                    method: op.method.clone(),
                    path: op.path.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    let groups = group_by_tag(rows);
    let operations_total = extraction.operations.len() + extraction.malformed.len();
    let coverage = summarize(&groups, operations_total, skipped);

    TestPlan {
        title: extraction.title.clone(),
        base_path: extraction.base_path.clone(),
        groups,
        coverage,
    }
}

fn synth_params(
    op: &Operation,
    location: ParamLocation,
    ctx: &mut SynthContext,
) -> Result<Vec<ParamValue>, SynthError> {
    op.parameters_in(location)
        .map(|p| {
            ctx.with_segment(&p.name, |ctx| synthesize(&p.schema, ctx))
                .map(|value| ParamValue {
                    name: p.name.clone(),
                    value,
                })
        })
        .collect()
}

fn substitute_path(template: &str, params: &[ParamValue]) -> String {
    let mut path = template.to_string();
    for name in template_params(template) {
        if let Some(param) = params.iter().find(|p| p.name == name) {
            let encoded = utf8_percent_encode(&param.value.rendered(), PATH_SEGMENT).to_string();
            path = path.replace(&format!("{{{name}}}"), &encoded);
        }
    }
    path
}

fn success_status(op: &Operation, options: &GenerationOptions) -> ExpectedStatus {
    match options.success_status {
        SuccessStatus::Always200 => ExpectedStatus::Exact(200),
        SuccessStatus::FirstDeclared => {
            ExpectedStatus::Exact(op.first_success_status().unwrap_or(200))
        }
    }
}
