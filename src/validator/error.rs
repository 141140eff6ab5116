use crate::validator::schema::Schema;
use crate::value::Value;
use std::fmt;
use std::rc::Rc;

/// The keyword names enumerated in §6.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKeyword {
    Type,
    Const,
    Enum,
    MinLength,
    MaxLength,
    Pattern,
    Format,
    Minimum,
    Maximum,
    ExclusiveMinimum,
    ExclusiveMaximum,
    MultipleOf,
    MinItems,
    MaxItems,
    UniqueItems,
    Contains,
    AdditionalItems,
    MinProperties,
    MaxProperties,
    Required,
    AdditionalProperties,
    PropertyNames,
    AnyOf,
    OneOf,
    Not,
    Syntax,
}

impl fmt::Display for ValidationKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValidationKeyword::Type => "type",
            ValidationKeyword::Const => "const",
            ValidationKeyword::Enum => "enum",
            ValidationKeyword::MinLength => "minLength",
            ValidationKeyword::MaxLength => "maxLength",
            ValidationKeyword::Pattern => "pattern",
            ValidationKeyword::Format => "format",
            ValidationKeyword::Minimum => "minimum",
            ValidationKeyword::Maximum => "maximum",
            ValidationKeyword::ExclusiveMinimum => "exclusiveMinimum",
            ValidationKeyword::ExclusiveMaximum => "exclusiveMaximum",
            ValidationKeyword::MultipleOf => "multipleOf",
            ValidationKeyword::MinItems => "minItems",
            ValidationKeyword::MaxItems => "maxItems",
            ValidationKeyword::UniqueItems => "uniqueItems",
            ValidationKeyword::Contains => "contains",
            ValidationKeyword::AdditionalItems => "additionalItems",
            ValidationKeyword::MinProperties => "minProperties",
            ValidationKeyword::MaxProperties => "maxProperties",
            ValidationKeyword::Required => "required",
            ValidationKeyword::AdditionalProperties => "additionalProperties",
            ValidationKeyword::PropertyNames => "propertyNames",
            ValidationKeyword::AnyOf => "anyOf",
            ValidationKeyword::OneOf => "oneOf",
            ValidationKeyword::Not => "not",
            ValidationKeyword::Syntax => "syntax",
        };
        write!(f, "{s}")
    }
}

/// {path, message, keyword, schema, value?} from §6.
///
/// Not `PartialEq`: `Schema` carries compiled `Regex`es, which aren't
/// comparable. Tests assert on `.keyword()`/`.path()`/`.message()` instead
/// of whole-struct equality, same as this lineage's own `Error` type being
/// compared by field rather than derived equality in its diagnostics tests.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub path: Vec<String>,
    pub message: String,
    pub keyword: ValidationKeyword,
    pub schema: Rc<Schema>,
    pub value: Option<Value>,
}

impl ValidationError {
    pub(crate) fn new(
        path: &crate::path::Path,
        keyword: ValidationKeyword,
        message: impl Into<String>,
        schema: &Rc<Schema>,
        value: Option<&Value>,
    ) -> Self {
        ValidationError {
            path: path.to_strings(),
            message: message.into(),
            keyword,
            schema: schema.clone(),
            value: value.cloned(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at /{}: {}", self.keyword, self.path.join("/"), self.message)
    }
}
