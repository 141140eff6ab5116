use crate::value::{Value, ValueKind};
use indexmap::IndexMap;
use regex::Regex;
use std::rc::Rc;

#[derive(Debug, Clone, thiserror::Error)]
pub enum SchemaError {
    #[error("schema must be a JSON object or boolean, got {0}")]
    InvalidRoot(String),
    #[error("keyword '{keyword}' must be {expected}")]
    InvalidKeyword { keyword: String, expected: String },
    #[error("invalid regular expression in '{keyword}': {source}")]
    InvalidPattern { keyword: String, source: String },
}

/// What `additionalProperties`/`additionalItems` may be set to.
#[derive(Debug, Clone, Default)]
pub enum Extra {
    #[default]
    Allow,
    Deny,
    Schema(Rc<Schema>),
}

#[derive(Debug, Clone)]
pub enum Items {
    /// A single schema applied uniformly to every element.
    Uniform(Rc<Schema>),
    /// A tuple schema: `items[i]` applies to element `i`.
    Tuple(Vec<Rc<Schema>>),
}

/// A draft-07 subset schema (§3, §4.3, §6). Immutable once built; `Rc`
/// throughout so resolved sub-schemas and `$ref` targets are cheap to share.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub ref_: Option<String>,

    pub types: Option<Vec<ValueKind>>,
    pub const_value: Option<Value>,
    pub enum_values: Option<Vec<Value>>,

    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Regex>,
    pub format: Option<String>,

    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_minimum: Option<f64>,
    pub exclusive_maximum: Option<f64>,
    pub multiple_of: Option<f64>,

    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
    pub unique_items: bool,
    pub items: Option<Items>,
    pub additional_items: Extra,
    pub contains: Option<Rc<Schema>>,

    pub min_properties: Option<usize>,
    pub max_properties: Option<usize>,
    pub required: Vec<String>,
    pub properties: IndexMap<String, Rc<Schema>>,
    pub pattern_properties: Vec<(Regex, Rc<Schema>)>,
    pub additional_properties: Extra,
    pub property_names: Option<Rc<Schema>>,

    pub all_of: Vec<Rc<Schema>>,
    pub any_of: Vec<Rc<Schema>>,
    pub one_of: Vec<Rc<Schema>>,
    pub not: Option<Rc<Schema>>,
    pub if_schema: Option<Rc<Schema>>,
    pub then_schema: Option<Rc<Schema>>,
    pub else_schema: Option<Rc<Schema>>,
}

impl Schema {
    /// The permissive schema: every value satisfies it. Used for `true`,
    /// an absent schema, and as the target of `$ref`s that fail to resolve
    /// (so streaming can continue rather than abort mid-document).
    pub fn any() -> Rc<Schema> {
        Rc::new(Schema::default())
    }

    /// `false`: no value satisfies it.
    pub fn never() -> Rc<Schema> {
        Rc::new(Schema {
            not: Some(Schema::any()),
            ..Default::default()
        })
    }

    /// Compiles a schema document (itself a [`Value`], typically produced by
    /// parsing the schema author's JSON text with this crate's own parser)
    /// into a [`Schema`]. `$defs`/`definitions` entries are *not* compiled
    /// here — see [`crate::validator::Validator::new`], which merges them
    /// into its lookup table and compiles them lazily on first `$ref` use.
    pub fn compile(value: &Value) -> Result<Schema, SchemaError> {
        match value {
            Value::Bool(true) => Ok(Schema::default()),
            Value::Bool(false) => Ok(Schema {
                not: Some(Schema::any()),
                ..Default::default()
            }),
            Value::Object(obj) => Self::compile_object(obj),
            other => Err(SchemaError::InvalidRoot(other.kind().to_string())),
        }
    }

    fn compile_object(obj: &IndexMap<String, Value>) -> Result<Schema, SchemaError> {
        let mut schema = Schema::default();

        if let Some(Value::String(r)) = obj.get("$ref") {
            schema.ref_ = Some(r.clone());
        }

        schema.types = compile_types(obj.get("type"))?;

        if let Some(v) = obj.get("const") {
            schema.const_value = Some(v.clone());
        }
        if let Some(Value::Array(values)) = obj.get("enum") {
            schema.enum_values = Some(values.clone());
        }

        schema.min_length = as_usize(obj.get("minLength"), "minLength")?;
        schema.max_length = as_usize(obj.get("maxLength"), "maxLength")?;
        schema.pattern = compile_pattern(obj.get("pattern"), "pattern")?;
        if let Some(Value::String(f)) = obj.get("format") {
            schema.format = Some(f.clone());
        }

        schema.minimum = as_f64(obj.get("minimum"));
        schema.maximum = as_f64(obj.get("maximum"));
        schema.exclusive_minimum = as_f64(obj.get("exclusiveMinimum"));
        schema.exclusive_maximum = as_f64(obj.get("exclusiveMaximum"));
        schema.multiple_of = as_f64(obj.get("multipleOf"));

        schema.min_items = as_usize(obj.get("minItems"), "minItems")?;
        schema.max_items = as_usize(obj.get("maxItems"), "maxItems")?;
        schema.unique_items = matches!(obj.get("uniqueItems"), Some(Value::Bool(true)));
        schema.items = compile_items(obj.get("items"))?;
        schema.additional_items = compile_extra(obj.get("additionalItems"))?;
        if let Some(v) = obj.get("contains") {
            schema.contains = Some(Rc::new(Schema::compile(v)?));
        }

        schema.min_properties = as_usize(obj.get("minProperties"), "minProperties")?;
        schema.max_properties = as_usize(obj.get("maxProperties"), "maxProperties")?;
        if let Some(Value::Array(names)) = obj.get("required") {
            schema.required = names
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect();
        }
        if let Some(Value::Object(props)) = obj.get("properties") {
            for (name, sub) in props {
                schema.properties.insert(name.clone(), Rc::new(Schema::compile(sub)?));
            }
        }
        if let Some(Value::Object(pattern_props)) = obj.get("patternProperties") {
            for (pattern, sub) in pattern_props {
                let re = Regex::new(pattern).map_err(|e| SchemaError::InvalidPattern {
                    keyword: "patternProperties".to_string(),
                    source: e.to_string(),
                })?;
                schema.pattern_properties.push((re, Rc::new(Schema::compile(sub)?)));
            }
        }
        schema.additional_properties = compile_extra(obj.get("additionalProperties"))?;
        if let Some(v) = obj.get("propertyNames") {
            schema.property_names = Some(Rc::new(Schema::compile(v)?));
        }

        schema.all_of = compile_schema_list(obj.get("allOf"))?;
        schema.any_of = compile_schema_list(obj.get("anyOf"))?;
        schema.one_of = compile_schema_list(obj.get("oneOf"))?;
        if let Some(v) = obj.get("not") {
            schema.not = Some(Rc::new(Schema::compile(v)?));
        }
        if let Some(v) = obj.get("if") {
            schema.if_schema = Some(Rc::new(Schema::compile(v)?));
        }
        if let Some(v) = obj.get("then") {
            schema.then_schema = Some(Rc::new(Schema::compile(v)?));
        }
        if let Some(v) = obj.get("else") {
            schema.else_schema = Some(Rc::new(Schema::compile(v)?));
        }

        Ok(schema)
    }

    /// Structural fallback used by `canBeType` when no `type` keyword is
    /// present (§4.3): `properties`/`required` imply object-only,
    /// `items` implies array-only.
    pub fn structural_kind_hint(&self) -> Option<ValueKind> {
        if !self.properties.is_empty() || !self.required.is_empty() {
            Some(ValueKind::Object)
        } else if self.items.is_some() {
            Some(ValueKind::Array)
        } else {
            None
        }
    }
}

fn compile_types(value: Option<&Value>) -> Result<Option<Vec<ValueKind>>, SchemaError> {
    match value {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(vec![parse_value_kind(s)?])),
        Some(Value::Array(items)) => {
            let mut kinds = Vec::with_capacity(items.len());
            for item in items {
                if let Value::String(s) = item {
                    kinds.push(parse_value_kind(s)?);
                } else {
                    return Err(SchemaError::InvalidKeyword {
                        keyword: "type".to_string(),
                        expected: "an array of strings".to_string(),
                    });
                }
            }
            Ok(Some(kinds))
        }
        Some(_) => Err(SchemaError::InvalidKeyword {
            keyword: "type".to_string(),
            expected: "a string or array of strings".to_string(),
        }),
    }
}

fn parse_value_kind(s: &str) -> Result<ValueKind, SchemaError> {
    Ok(match s {
        "null" => ValueKind::Null,
        "boolean" => ValueKind::Boolean,
        "number" => ValueKind::Number,
        "integer" => ValueKind::Integer,
        "string" => ValueKind::String,
        "array" => ValueKind::Array,
        "object" => ValueKind::Object,
        other => {
            return Err(SchemaError::InvalidKeyword {
                keyword: "type".to_string(),
                expected: format!("a known JSON-Schema type name, got '{other}'"),
            })
        }
    })
}

fn as_usize(value: Option<&Value>, keyword: &str) -> Result<Option<usize>, SchemaError> {
    match value {
        None => Ok(None),
        Some(Value::Number(n)) if *n >= 0.0 => Ok(Some(*n as usize)),
        Some(_) => Err(SchemaError::InvalidKeyword {
            keyword: keyword.to_string(),
            expected: "a non-negative number".to_string(),
        }),
    }
}

fn as_f64(value: Option<&Value>) -> Option<f64> {
    match value {
        Some(Value::Number(n)) => Some(*n),
        _ => None,
    }
}

fn compile_pattern(value: Option<&Value>, keyword: &str) -> Result<Option<Regex>, SchemaError> {
    match value {
        None => Ok(None),
        Some(Value::String(s)) => Regex::new(s)
            .map(Some)
            .map_err(|e| SchemaError::InvalidPattern {
                keyword: keyword.to_string(),
                source: e.to_string(),
            }),
        Some(_) => Err(SchemaError::InvalidKeyword {
            keyword: keyword.to_string(),
            expected: "a string".to_string(),
        }),
    }
}

fn compile_items(value: Option<&Value>) -> Result<Option<Items>, SchemaError> {
    match value {
        None => Ok(None),
        Some(Value::Array(schemas)) => {
            let mut compiled = Vec::with_capacity(schemas.len());
            for s in schemas {
                compiled.push(Rc::new(Schema::compile(s)?));
            }
            Ok(Some(Items::Tuple(compiled)))
        }
        Some(v) => Ok(Some(Items::Uniform(Rc::new(Schema::compile(v)?)))),
    }
}

fn compile_extra(value: Option<&Value>) -> Result<Extra, SchemaError> {
    match value {
        None | Some(Value::Bool(true)) => Ok(Extra::Allow),
        Some(Value::Bool(false)) => Ok(Extra::Deny),
        Some(v) => Ok(Extra::Schema(Rc::new(Schema::compile(v)?))),
    }
}

fn compile_schema_list(value: Option<&Value>) -> Result<Vec<Rc<Schema>>, SchemaError> {
    match value {
        None => Ok(Vec::new()),
        Some(Value::Array(schemas)) => {
            let mut compiled = Vec::with_capacity(schemas.len());
            for s in schemas {
                compiled.push(Rc::new(Schema::compile(s)?));
            }
            Ok(compiled)
        }
        Some(_) => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema_from(json: &str) -> Schema {
        let value = crate::testutil::parse_json(json);
        Schema::compile(&value).unwrap()
    }

    #[test]
    fn compiles_type_and_properties() {
        let s = schema_from(r#"{"type":"object","properties":{"age":{"type":"number"}}}"#);
        assert_eq!(s.types, Some(vec![ValueKind::Object]));
        assert!(s.properties.contains_key("age"));
    }

    #[test]
    fn bool_schemas() {
        assert!(Schema::compile(&Value::Bool(true)).unwrap().types.is_none());
        assert!(Schema::compile(&Value::Bool(false)).unwrap().not.is_some());
    }
}
