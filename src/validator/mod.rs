pub mod error;
pub mod schema;

mod formats;

pub use error::{ValidationError, ValidationKeyword};
pub use schema::{Extra, Items, Schema, SchemaError};

use crate::path::Path;
use crate::value::{Value, ValueKind};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Options controlling how `validate` behaves, independent of the schema
/// itself (§4.3 "Options").
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatorOptions {
    /// A type mismatch short-circuits the remaining checks for that value.
    pub early_reject: bool,
}

/// A compiled draft-07 subset schema plus its merged `$defs`/`definitions`
/// table (§4.3). Read-only and cheaply `Clone`-able (an `Rc` handle to the
/// root plus a shared definitions map) so it can be handed to multiple
/// parsers, matching §5's "the schema is read-only and may be shared across
/// parsers".
#[derive(Clone)]
pub struct Validator {
    root: Rc<Schema>,
    definitions: Rc<HashMap<String, Value>>,
    ref_cache: Rc<RefCell<HashMap<String, Rc<Schema>>>>,
    options: ValidatorOptions,
}

impl Validator {
    /// Compiles `schema_value` and merges `$defs`/`definitions` into a
    /// single lookup table, per §3 "Named definitions drawn from both
    /// `$defs` and `definitions` are merged into a single lookup table at
    /// construction time."
    pub fn new(schema_value: &Value, options: ValidatorOptions) -> Result<Validator, SchemaError> {
        let mut definitions = HashMap::new();
        if let Value::Object(obj) = schema_value {
            for key in ["$defs", "definitions"] {
                if let Some(Value::Object(defs)) = obj.get(key) {
                    for (name, def) in defs {
                        definitions.insert(name.clone(), def.clone());
                    }
                }
            }
        }
        let root = Schema::compile(schema_value)?;
        Ok(Validator {
            root: Rc::new(root),
            definitions: Rc::new(definitions),
            ref_cache: Rc::new(RefCell::new(HashMap::new())),
            options,
        })
    }

    /// The permissive validator: accepts any value, rejects nothing. Used
    /// when a parser is constructed without a schema.
    pub fn accept_all() -> Validator {
        Validator {
            root: Schema::any(),
            definitions: Rc::new(HashMap::new()),
            ref_cache: Rc::new(RefCell::new(HashMap::new())),
            options: ValidatorOptions::default(),
        }
    }

    pub fn root(&self) -> &Rc<Schema> {
        &self.root
    }

    fn resolve_ref(&self, pointer: &str) -> Rc<Schema> {
        let name = pointer
            .strip_prefix("#/$defs/")
            .or_else(|| pointer.strip_prefix("#/definitions/"));
        let Some(name) = name else {
            return Schema::any();
        };
        if let Some(cached) = self.ref_cache.borrow().get(name) {
            return cached.clone();
        }
        let compiled = match self.definitions.get(name) {
            Some(raw) => Schema::compile(raw).map(Rc::new).unwrap_or_else(|_| Schema::any()),
            None => Schema::any(),
        };
        self.ref_cache
            .borrow_mut()
            .insert(name.to_string(), compiled.clone());
        compiled
    }

    /// Follows a schema's `$ref`, if any, one hop (the target itself may
    /// carry its own `$ref`, resolved recursively by further calls).
    fn resolve(&self, schema: &Rc<Schema>) -> Rc<Schema> {
        match &schema.ref_ {
            Some(pointer) => {
                let target = self.resolve_ref(pointer);
                if target.ref_.is_some() {
                    self.resolve(&target)
                } else {
                    target
                }
            }
            None => schema.clone(),
        }
    }

    /// Descends `properties`/`items`/`additionalProperties` along `path`
    /// from the root schema, resolving `$ref` at each hop (§4.3
    /// `schemaAt`).
    pub fn schema_at(&self, path: &Path) -> Option<Rc<Schema>> {
        let mut current = self.resolve(&self.root);
        for segment in path.segments() {
            current = match segment {
                crate::path::PathSegment::Key(key) => {
                    if let Some(sub) = current.properties.get(key) {
                        self.resolve(sub)
                    } else if let Some((_, sub)) =
                        current.pattern_properties.iter().find(|(re, _)| re.is_match(key))
                    {
                        self.resolve(sub)
                    } else {
                        match &current.additional_properties {
                            Extra::Schema(sub) => self.resolve(sub),
                            Extra::Allow => Schema::any(),
                            Extra::Deny => return None,
                        }
                    }
                }
                crate::path::PathSegment::Index(index) => match &current.items {
                    Some(Items::Tuple(schemas)) => match schemas.get(*index) {
                        Some(sub) => self.resolve(sub),
                        None => match &current.additional_items {
                            Extra::Schema(sub) => self.resolve(sub),
                            Extra::Allow => Schema::any(),
                            Extra::Deny => return None,
                        },
                    },
                    Some(Items::Uniform(sub)) => self.resolve(sub),
                    None => Schema::any(),
                },
            };
        }
        Some(current)
    }

    pub fn required(&self, path: &Path) -> Vec<String> {
        self.schema_at(path)
            .map(|s| s.required.clone())
            .unwrap_or_default()
    }

    pub fn is_required(&self, name: &str, parent_path: &Path) -> bool {
        self.required(parent_path).iter().any(|r| r == name)
    }

    /// §4.3 `canBeType`: used by the parser for early rejection the moment
    /// a container token is pushed, before its contents are known.
    pub fn can_be_type(&self, kind: ValueKind, path: &Path) -> bool {
        let Some(schema) = self.schema_at(path) else {
            return true;
        };
        let schema = self.resolve(&schema);
        match &schema.types {
            Some(types) => {
                types.contains(&kind)
                    || (kind == ValueKind::Number && types.contains(&ValueKind::Integer))
            }
            None => match schema.structural_kind_hint() {
                Some(hint) => hint == kind,
                None => true,
            },
        }
    }

    /// §4.3 "Validation algorithm (per value)".
    pub fn validate(&self, value: &Value, path: &Path) -> Vec<ValidationError> {
        match self.schema_at(path) {
            Some(schema) => self.validate_against(value, &schema, path),
            None => Vec::new(),
        }
    }

    /// Validates against an already-resolved schema, skipping the
    /// `schemaAt` walk from the root. Used by the parser, which caches a
    /// frame's governing schema at push time (§3 "stack frame").
    pub(crate) fn validate_against(&self, value: &Value, schema: &Rc<Schema>, path: &Path) -> Vec<ValidationError> {
        let schema = self.resolve(schema);
        let mut errors = Vec::new();

        if !self.check_type(value, &schema, path, &mut errors) && self.options.early_reject {
            return errors;
        }

        if let Some(expected) = &schema.const_value {
            if value != expected {
                errors.push(ValidationError::new(
                    path,
                    ValidationKeyword::Const,
                    "value does not match const",
                    &schema,
                    Some(value),
                ));
            }
        }

        if let Some(candidates) = &schema.enum_values {
            if !candidates.iter().any(|c| c == value) {
                errors.push(ValidationError::new(
                    path,
                    ValidationKeyword::Enum,
                    "value is not one of the enum candidates",
                    &schema,
                    Some(value),
                ));
            }
        }

        match value {
            Value::String(s) => self.check_string(s, &schema, path, &mut errors),
            Value::Number(n) => self.check_number(*n, &schema, path, &mut errors),
            Value::Array(items) => self.check_array(items, &schema, path, &mut errors),
            Value::Object(obj) => self.check_object(obj, &schema, path, &mut errors),
            Value::Bool(_) | Value::Null => {}
        }

        self.check_combinators(value, &schema, path, &mut errors);

        errors
    }

    fn check_type(
        &self,
        value: &Value,
        schema: &Rc<Schema>,
        path: &Path,
        errors: &mut Vec<ValidationError>,
    ) -> bool {
        let Some(types) = &schema.types else { return true };
        let kind = value.kind();
        let ok = types.contains(&kind) || (kind == ValueKind::Integer && types.contains(&ValueKind::Number));
        if !ok {
            let expected = types
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" | ");
            errors.push(ValidationError::new(
                path,
                ValidationKeyword::Type,
                format!("expected {expected}, got {kind}"),
                schema,
                Some(value),
            ));
        }
        ok
    }

    fn check_string(&self, s: &str, schema: &Rc<Schema>, path: &Path, errors: &mut Vec<ValidationError>) {
        let len = s.chars().count();
        if let Some(min) = schema.min_length {
            if len < min {
                errors.push(ValidationError::new(
                    path,
                    ValidationKeyword::MinLength,
                    format!("length {len} is less than minLength {min}"),
                    schema,
                    Some(&Value::String(s.to_string())),
                ));
            }
        }
        if let Some(max) = schema.max_length {
            if len > max {
                errors.push(ValidationError::new(
                    path,
                    ValidationKeyword::MaxLength,
                    format!("length {len} is greater than maxLength {max}"),
                    schema,
                    Some(&Value::String(s.to_string())),
                ));
            }
        }
        if let Some(re) = &schema.pattern {
            if !re.is_match(s) {
                errors.push(ValidationError::new(
                    path,
                    ValidationKeyword::Pattern,
                    format!("'{s}' does not match pattern {}", re.as_str()),
                    schema,
                    Some(&Value::String(s.to_string())),
                ));
            }
        }
        if let Some(format) = &schema.format {
            if !formats::check_format(format, s) {
                errors.push(ValidationError::new(
                    path,
                    ValidationKeyword::Format,
                    format!("'{s}' does not match format {format}"),
                    schema,
                    Some(&Value::String(s.to_string())),
                ));
            }
        }
    }

    fn check_number(&self, n: f64, schema: &Rc<Schema>, path: &Path, errors: &mut Vec<ValidationError>) {
        let value = Value::Number(n);
        if let Some(min) = schema.minimum {
            if n < min {
                errors.push(ValidationError::new(path, ValidationKeyword::Minimum, format!("{n} is less than minimum {min}"), schema, Some(&value)));
            }
        }
        if let Some(max) = schema.maximum {
            if n > max {
                errors.push(ValidationError::new(path, ValidationKeyword::Maximum, format!("{n} is greater than maximum {max}"), schema, Some(&value)));
            }
        }
        if let Some(min) = schema.exclusive_minimum {
            if n <= min {
                errors.push(ValidationError::new(path, ValidationKeyword::ExclusiveMinimum, format!("{n} is not greater than exclusiveMinimum {min}"), schema, Some(&value)));
            }
        }
        if let Some(max) = schema.exclusive_maximum {
            if n >= max {
                errors.push(ValidationError::new(path, ValidationKeyword::ExclusiveMaximum, format!("{n} is not less than exclusiveMaximum {max}"), schema, Some(&value)));
            }
        }
        // Ordinary remainder, inheriting floating-point imprecision — §9.
        if let Some(m) = schema.multiple_of {
            if m != 0.0 && n % m != 0.0 {
                errors.push(ValidationError::new(path, ValidationKeyword::MultipleOf, format!("{n} is not a multiple of {m}"), schema, Some(&value)));
            }
        }
    }

    fn check_array(&self, items: &[Value], schema: &Rc<Schema>, path: &Path, errors: &mut Vec<ValidationError>) {
        if let Some(min) = schema.min_items {
            if items.len() < min {
                errors.push(ValidationError::new(path, ValidationKeyword::MinItems, format!("{} items is less than minItems {min}", items.len()), schema, None));
            }
        }
        if let Some(max) = schema.max_items {
            if items.len() > max {
                errors.push(ValidationError::new(path, ValidationKeyword::MaxItems, format!("{} items is greater than maxItems {max}", items.len()), schema, None));
            }
        }
        if schema.unique_items {
            let mut seen = std::collections::HashSet::new();
            let mut has_dup = false;
            for item in items {
                if !seen.insert(item.to_canonical_string()) {
                    has_dup = true;
                    break;
                }
            }
            if has_dup {
                errors.push(ValidationError::new(path, ValidationKeyword::UniqueItems, "array contains duplicate items", schema, None));
            }
        }

        match &schema.items {
            Some(Items::Uniform(sub)) => {
                for (i, item) in items.iter().enumerate() {
                    errors.extend(self.validate_against(item, sub, &path.push_index(i)));
                }
            }
            Some(Items::Tuple(schemas)) => {
                for (i, item) in items.iter().enumerate() {
                    let item_path = path.push_index(i);
                    match schemas.get(i) {
                        Some(sub) => errors.extend(self.validate_against(item, sub, &item_path)),
                        None => match &schema.additional_items {
                            Extra::Deny => errors.push(ValidationError::new(
                                &item_path,
                                ValidationKeyword::AdditionalItems,
                                "no tuple slot or additionalItems schema allows this element",
                                schema,
                                Some(item),
                            )),
                            Extra::Schema(sub) => errors.extend(self.validate_against(item, sub, &item_path)),
                            Extra::Allow => {}
                        },
                    }
                }
            }
            None => {}
        }

        if let Some(contains) = &schema.contains {
            let any_match = items
                .iter()
                .enumerate()
                .any(|(i, item)| self.validate_against(item, contains, &path.push_index(i)).is_empty());
            if !any_match {
                errors.push(ValidationError::new(path, ValidationKeyword::Contains, "no element satisfies contains", schema, None));
            }
        }
    }

    fn check_object(
        &self,
        obj: &indexmap::IndexMap<String, Value>,
        schema: &Rc<Schema>,
        path: &Path,
        errors: &mut Vec<ValidationError>,
    ) {
        if let Some(min) = schema.min_properties {
            if obj.len() < min {
                errors.push(ValidationError::new(path, ValidationKeyword::MinProperties, format!("{} properties is less than minProperties {min}", obj.len()), schema, None));
            }
        }
        if let Some(max) = schema.max_properties {
            if obj.len() > max {
                errors.push(ValidationError::new(path, ValidationKeyword::MaxProperties, format!("{} properties is greater than maxProperties {max}", obj.len()), schema, None));
            }
        }
        for name in &schema.required {
            if !obj.contains_key(name) {
                errors.push(ValidationError::new(path, ValidationKeyword::Required, format!("missing required property '{name}'"), schema, None));
            }
        }

        for (key, value) in obj {
            let key_path = path.push_key(key.clone());
            let mut matched_explicit = false;
            if let Some(sub) = schema.properties.get(key) {
                matched_explicit = true;
                errors.extend(self.validate_against(value, sub, &key_path));
            }
            let mut matched_pattern = false;
            for (re, sub) in &schema.pattern_properties {
                if re.is_match(key) {
                    matched_pattern = true;
                    errors.extend(self.validate_against(value, sub, &key_path));
                }
            }
            if !matched_explicit && !matched_pattern {
                match &schema.additional_properties {
                    Extra::Deny => errors.push(ValidationError::new(&key_path, ValidationKeyword::AdditionalProperties, format!("'{key}' is not allowed by additionalProperties"), schema, Some(value))),
                    Extra::Schema(sub) => errors.extend(self.validate_against(value, sub, &key_path)),
                    Extra::Allow => {}
                }
            }

            if let Some(names_schema) = &schema.property_names {
                errors.extend(self.validate_against(&Value::String(key.clone()), names_schema, &key_path));
            }
        }
    }

    fn check_combinators(&self, value: &Value, schema: &Rc<Schema>, path: &Path, errors: &mut Vec<ValidationError>) {
        for sub in &schema.all_of {
            errors.extend(self.validate_against(value, sub, path));
        }

        if !schema.any_of.is_empty() {
            let passes = schema.any_of.iter().any(|sub| self.validate_against(value, sub, path).is_empty());
            if !passes {
                errors.push(ValidationError::new(path, ValidationKeyword::AnyOf, "value matches none of anyOf", schema, Some(value)));
            }
        }

        if !schema.one_of.is_empty() {
            let matches = schema.one_of.iter().filter(|sub| self.validate_against(value, sub, path).is_empty()).count();
            if matches != 1 {
                errors.push(ValidationError::new(path, ValidationKeyword::OneOf, format!("value matches {matches} of oneOf, expected exactly 1"), schema, Some(value)));
            }
        }

        if let Some(sub) = &schema.not {
            if self.validate_against(value, sub, path).is_empty() {
                errors.push(ValidationError::new(path, ValidationKeyword::Not, "value must not match the not schema", schema, Some(value)));
            }
        }

        if let Some(if_schema) = &schema.if_schema {
            let if_passes = self.validate_against(value, if_schema, path).is_empty();
            if if_passes {
                if let Some(then_schema) = &schema.then_schema {
                    errors.extend(self.validate_against(value, then_schema, path));
                }
            } else if let Some(else_schema) = &schema.else_schema {
                errors.extend(self.validate_against(value, else_schema, path));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::parse_json;

    fn validator_for(schema_json: &str) -> Validator {
        let schema_value = parse_json(schema_json);
        Validator::new(&schema_value, ValidatorOptions::default()).unwrap()
    }

    #[test]
    fn type_mismatch_reported_at_path() {
        let v = validator_for(r#"{"type":"object","properties":{"age":{"type":"number"}}}"#);
        let value = parse_json(r#"{"age":"thirty"}"#);
        let errors = v.validate(&value, &Path::root());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].keyword, ValidationKeyword::Type);
        assert_eq!(errors[0].path, vec!["age"]);
    }

    #[test]
    fn required_reports_missing_field() {
        let v = validator_for(r#"{"type":"object","required":["name","age"]}"#);
        let value = parse_json(r#"{"name":"John"}"#);
        let errors = v.validate(&value, &Path::root());
        assert!(errors.iter().any(|e| e.keyword == ValidationKeyword::Required && e.message.contains("age")));
    }

    #[test]
    fn tuple_additional_items_false() {
        let v = validator_for(r#"{"type":"array","items":[{"type":"string"},{"type":"number"}],"additionalItems":false}"#);
        let value = parse_json(r#"["hi", 42, "extra"]"#);
        let errors = v.validate(&value, &Path::root());
        assert!(errors.iter().any(|e| e.keyword == ValidationKeyword::AdditionalItems && e.path == vec!["2"]));
    }

    #[test]
    fn can_be_type_rejects_mismatched_container() {
        let v = validator_for(r#"{"type":"object"}"#);
        assert!(!v.can_be_type(ValueKind::Array, &Path::root()));
        assert!(v.can_be_type(ValueKind::Object, &Path::root()));
    }

    #[test]
    fn integer_subsumed_by_number_type() {
        let v = validator_for(r#"{"type":"number"}"#);
        assert!(v.can_be_type(ValueKind::Integer, &Path::root()));
    }

    #[test]
    fn ref_resolution_via_defs() {
        let v = validator_for(
            r#"{"$defs":{"Pos":{"type":"number","minimum":0}},"type":"object","properties":{"x":{"$ref":"#/$defs/Pos"}}}"#,
        );
        let bad = parse_json(r#"{"x":-1}"#);
        let errors = v.validate(&bad, &Path::root());
        assert!(errors.iter().any(|e| e.keyword == ValidationKeyword::Minimum));
    }

    #[test]
    fn one_of_requires_exactly_one_match() {
        let v = validator_for(r#"{"oneOf":[{"type":"string"},{"type":"number"}]}"#);
        let errors = v.validate(&parse_json("1"), &Path::root());
        assert!(errors.is_empty());
    }
}
