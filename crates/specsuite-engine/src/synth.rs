//! Resolved `SchemaNode` → representative `serde_json::Value`
//!
//! Deterministic given the [`SynthContext`] state: strings and timestamps
//! rotate through per-run counters held in the context, never in globals.
//!
//! Dispatch by node kind:
//! - primitives: fixed `(type, format)` lookup table, bounds respected
//! - enum: first declared value
//! - array: `max(minItems, 1)` items, capped by `maxItems` and the configured cap
//! - object: all required properties; optional ones while under the depth budget
//! - oneOf/anyOf: one member chosen by the [`VariantPolicy`]
//! - allOf: members merged structurally, later members win on collisions

use chrono::{DateTime, SecondsFormat};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde_json::{Map, Number, Value};

use specsuite_core::{ExampleValue, GenerationOptions, StringRotation, VariantPolicy};

use crate::error::SynthError;
use crate::node::{Bounds, CompositeKind, PrimitiveType, SchemaKind, SchemaNode};

/// Human-readable placeholder strings, rotated per call or per property path.
const PLACEHOLDERS: &[&str] = &[
    "Alice Smith",
    "Bob Jones",
    "Carol White",
    "Dave Brown",
    "Eve Davis",
];

/// 2024-01-15T12:00:00Z
const BASE_TIMESTAMP: i64 = 1_705_320_000;
const BASE_DATE_TIME: &str = "2024-01-15T12:00:00Z";

/// Upper bound on padded string length, whatever `minLength` asks for.
const MAX_STRING_LEN: usize = 10_000;

/// Mutable per-run state threaded through every synthesis call.
pub struct SynthContext<'o> {
    options: &'o GenerationOptions,
    string_counter: usize,
    timestamp_counter: i64,
    uuid_counter: u64,
    rng: SmallRng,
    /// Property path from the synthesis root, e.g. `["address", "city"]`
    path: Vec<String>,
    depth: usize,
}

impl<'o> SynthContext<'o> {
    #[must_use]
    pub fn new(options: &'o GenerationOptions) -> Self {
        Self {
            options,
            string_counter: 0,
            timestamp_counter: 0,
            uuid_counter: 0,
            rng: SmallRng::seed_from_u64(options.seed),
            path: Vec::new(),
            depth: 0,
        }
    }

    #[must_use]
    pub fn options(&self) -> &'o GenerationOptions {
        self.options
    }

    /// Run `f` with `segment` appended to the property path.
    pub(crate) fn with_segment<T>(
        &mut self,
        segment: &str,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        self.path.push(segment.to_string());
        let out = f(self);
        self.path.pop();
        out
    }

    fn path_string(&self) -> String {
        let mut s = String::from("$");
        for segment in &self.path {
            s.push('.');
            s.push_str(segment);
        }
        s
    }

    fn rotation_index(&mut self) -> usize {
        match self.options.string_rotation {
            StringRotation::CallOrder => {
                let idx = self.string_counter;
                self.string_counter += 1;
                idx % PLACEHOLDERS.len()
            }
            StringRotation::SchemaPath => {
                let hash = fnv1a(&self.path_string());
                usize::try_from(hash % PLACEHOLDERS.len() as u64).unwrap_or(0)
            }
        }
    }

    fn next_timestamp(&mut self) -> String {
        let offset = self.timestamp_counter;
        self.timestamp_counter += 1;
        DateTime::from_timestamp(BASE_TIMESTAMP + offset, 0).map_or_else(
            || BASE_DATE_TIME.to_string(),
            |dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true),
        )
    }

    fn next_uuid(&mut self) -> String {
        self.uuid_counter += 1;
        format!("00000000-0000-4000-8000-{:012x}", self.uuid_counter)
    }
}

/// Synthesize one example for a resolved node.
///
/// # Errors
///
/// Returns [`SynthError::Composition`] when `allOf` members disagree on a
/// leaf type at the same path.
pub fn synthesize(node: &SchemaNode, ctx: &mut SynthContext) -> Result<ExampleValue, SynthError> {
    let value = synth_value(node, ctx)?;
    Ok(ExampleValue::new(value, node.origin()))
}

/// Top-level union members of `node`, or `node` itself when it is not a
/// `oneOf`/`anyOf`. Null-typed members are dropped unless nothing else is left.
#[must_use]
pub fn variants(node: &SchemaNode) -> Vec<&SchemaNode> {
    match &node.kind {
        SchemaKind::Composite {
            kind: CompositeKind::OneOf | CompositeKind::AnyOf,
            members,
        } if !members.is_empty() => non_null_members(members),
        _ => vec![node],
    }
}

fn non_null_members(members: &[SchemaNode]) -> Vec<&SchemaNode> {
    let candidates: Vec<&SchemaNode> = members.iter().filter(|m| !m.is_null_type()).collect();
    if candidates.is_empty() {
        members.iter().collect()
    } else {
        candidates
    }
}

fn synth_value(node: &SchemaNode, ctx: &mut SynthContext) -> Result<Value, SynthError> {
    if ctx.options.use_declared_examples {
        if let Some(example) = &node.declared_example {
            return Ok(example.clone());
        }
    }

    match &node.kind {
        SchemaKind::Primitive { ty, format, bounds } => {
            Ok(synth_primitive(*ty, format.as_deref(), bounds, ctx))
        }
        SchemaKind::Enum(values) => Ok(values.first().cloned().unwrap_or(Value::Null)),
        SchemaKind::Array {
            items,
            min_items,
            max_items,
        } => synth_array(items, *min_items, *max_items, ctx),
        SchemaKind::Object {
            properties,
            required,
            additional,
        } => {
            ctx.depth += 1;
            let result = synth_object(properties, required, additional.as_deref(), ctx);
            ctx.depth -= 1;
            result
        }
        SchemaKind::Composite {
            kind: CompositeKind::AllOf,
            members,
        } => synth_all_of(members, ctx),
        SchemaKind::Composite { members, .. } => match choose_variant(members, ctx) {
            Some(member) => synth_value(member, ctx),
            None => Ok(Value::Null),
        },
        SchemaKind::Reference(pointer) => Err(SynthError::Unresolved(pointer.clone())),
        SchemaKind::Any => Ok(placeholder_string(ctx)),
    }
}

fn choose_variant<'n>(members: &'n [SchemaNode], ctx: &mut SynthContext) -> Option<&'n SchemaNode> {
    let candidates = non_null_members(members);
    if candidates.is_empty() {
        return None;
    }
    let idx = match ctx.options.variant_policy {
        VariantPolicy::First | VariantPolicy::AllVariants => 0,
        VariantPolicy::Seeded => ctx.rng.gen_range(0..candidates.len()),
    };
    Some(candidates[idx])
}

fn synth_primitive(
    ty: PrimitiveType,
    format: Option<&str>,
    bounds: &Bounds,
    ctx: &mut SynthContext,
) -> Value {
    match ty {
        PrimitiveType::String => synth_string(format, bounds, ctx),
        PrimitiveType::Integer => Value::Number(synth_integer(bounds).into()),
        PrimitiveType::Number => Number::from_f64(synth_number(bounds)).map_or(Value::Null, Value::Number),
        PrimitiveType::Boolean => Value::Bool(false),
        PrimitiveType::Null => Value::Null,
    }
}

fn synth_string(format: Option<&str>, bounds: &Bounds, ctx: &mut SynthContext) -> Value {
    let s = match format {
        Some("email") => {
            let name = PLACEHOLDERS[ctx.rotation_index()];
            format!("{}@example.com", name.to_lowercase().replace(' ', "."))
        }
        Some("date-time") => ctx.next_timestamp(),
        Some("date") => "2024-01-15".to_string(),
        Some("time") => "12:00:00".to_string(),
        Some("uuid") => ctx.next_uuid(),
        Some("uri" | "url" | "uri-reference" | "iri") => "https://example.com/resource".to_string(),
        Some("hostname") => "example.com".to_string(),
        Some("ipv4") => "192.0.2.1".to_string(),
        Some("ipv6") => "2001:db8::1".to_string(),
        Some("byte") => "ZXhhbXBsZQ==".to_string(),
        Some("binary") => "example".to_string(),
        Some("password") => "P@ssw0rd123".to_string(),
        _ => PLACEHOLDERS[ctx.rotation_index()].to_string(),
    };
    Value::String(fit_length(&s, bounds))
}

fn placeholder_string(ctx: &mut SynthContext) -> Value {
    Value::String(PLACEHOLDERS[ctx.rotation_index()].to_string())
}

/// Pad or truncate to satisfy `minLength`/`maxLength`.
///
/// Padding stops at [`MAX_STRING_LEN`].
fn fit_length(base: &str, bounds: &Bounds) -> String {
    let mut s: String = base.to_string();
    let len = s.chars().count();
    if let Some(min) = bounds.min_length.map(|m| m.min(MAX_STRING_LEN)) {
        if len < min {
            s.push_str(&"x".repeat(min - len));
        }
    }
    if let Some(max) = bounds.max_length {
        if s.chars().count() > max {
            s = s.chars().take(max).collect();
        }
    }
    s
}

/// `as` saturates out-of-range floats (and maps NaN to 0).
#[allow(clippy::cast_possible_truncation)]
fn saturating_i64(x: f64) -> i64 {
    x as i64
}

fn synth_integer(bounds: &Bounds) -> i64 {
    let mut v: i64 = 1;
    if let Some(min) = bounds.minimum {
        let lo = if bounds.exclusive_minimum {
            saturating_i64(min.floor()).saturating_add(1)
        } else {
            saturating_i64(min.ceil())
        };
        v = v.max(lo);
    }
    if let Some(max) = bounds.maximum {
        let hi = if bounds.exclusive_maximum {
            saturating_i64(max.ceil()).saturating_sub(1)
        } else {
            saturating_i64(max.floor())
        };
        v = v.min(hi);
    }
    v
}

fn synth_number(bounds: &Bounds) -> f64 {
    let v = 1.5;
    let above_min = |x: f64| match bounds.minimum {
        Some(min) if bounds.exclusive_minimum => x > min,
        Some(min) => x >= min,
        None => true,
    };
    let below_max = |x: f64| match bounds.maximum {
        Some(max) if bounds.exclusive_maximum => x < max,
        Some(max) => x <= max,
        None => true,
    };
    if above_min(v) && below_max(v) {
        return v;
    }
    match (bounds.minimum, bounds.maximum) {
        (Some(min), Some(max)) => (min + max) / 2.0,
        (Some(min), None) => min + 1.0,
        (None, Some(max)) => max - 1.0,
        (None, None) => v,
    }
}

fn synth_array(
    items: &SchemaNode,
    min_items: Option<usize>,
    max_items: Option<usize>,
    ctx: &mut SynthContext,
) -> Result<Value, SynthError> {
    let mut count = min_items.unwrap_or(0).max(1);
    if let Some(max) = max_items {
        count = count.min(max);
    }
    count = count.min(ctx.options.max_array_items);

    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        out.push(ctx.with_segment(&i.to_string(), |ctx| synth_value(items, ctx))?);
    }
    Ok(Value::Array(out))
}

fn synth_object(
    properties: &indexmap::IndexMap<String, SchemaNode>,
    required: &indexmap::IndexSet<String>,
    additional: Option<&SchemaNode>,
    ctx: &mut SynthContext,
) -> Result<Value, SynthError> {
    // depth was already incremented for this object
    let include_optional = ctx.depth <= ctx.options.max_object_depth;
    let mut obj = Map::new();

    for (name, prop) in properties {
        if required.contains(name) || include_optional {
            let v = ctx.with_segment(name, |ctx| synth_value(prop, ctx))?;
            obj.insert(name.clone(), v);
        }
    }

    // Required names without a declared property
    for name in required {
        if !obj.contains_key(name) {
            let v = ctx.with_segment(name, |ctx| match additional {
                Some(schema) => synth_value(schema, ctx),
                None => Ok(placeholder_string(ctx)),
            })?;
            obj.insert(name.clone(), v);
        }
    }

    if properties.is_empty() && include_optional {
        if let Some(schema) = additional {
            let v = ctx.with_segment("key", |ctx| synth_value(schema, ctx))?;
            obj.insert("key".to_string(), v);
        }
    }

    debug_assert!(
        required.iter().all(|r| obj.contains_key(r)),
        "synthesized object is missing required keys"
    );
    Ok(Value::Object(obj))
}

fn synth_all_of(members: &[SchemaNode], ctx: &mut SynthContext) -> Result<Value, SynthError> {
    let mut merged: Option<Value> = None;
    for member in members.iter().filter(|m| !m.is_any()) {
        let v = synth_value(member, ctx)?;
        merged = Some(match merged {
            None => v,
            Some(acc) => merge(acc, v, &ctx.path_string())?,
        });
    }
    Ok(merged.unwrap_or_else(|| Value::Object(Map::new())))
}

/// Structural merge: objects merge key-wise, same-typed leaves take the
/// right-hand value, differently typed leaves are a composition error.
fn merge(left: Value, right: Value, path: &str) -> Result<Value, SynthError> {
    match (left, right) {
        (Value::Object(mut acc), Value::Object(incoming)) => {
            for (key, value) in incoming {
                let merged = match acc.remove(&key) {
                    Some(existing) => merge(existing, value, &format!("{path}.{key}"))?,
                    None => value,
                };
                acc.insert(key, merged);
            }
            Ok(Value::Object(acc))
        }
        (l, r) if json_type(&l) == json_type(&r) => Ok(r),
        (l, r) => Err(SynthError::Composition {
            path: path.to_string(),
            left: json_type(&l),
            right: json_type(&r),
        }),
    }
}

fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// 64-bit FNV-1a; stable across runs and platforms.
///
/// `std::hash::DefaultHasher` output may change between Rust releases, which
/// would reshuffle placeholders in plans that are meant to diff cleanly.
fn fnv1a(s: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in s.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    hash
}
