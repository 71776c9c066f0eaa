//! Static parameter schemas.
//!
//! A tool declares its parameters once, at registration time, as a list of
//! [`Param`]s. Derivation turns each declaration into a [`ParamSchema`]:
//!
//! - an explicit type maps to `integer`, `number`, `boolean`, `array` or `object`
//! - an untyped parameter is a `string`
//! - a parameter with a default value is optional, every other one is required
//!
//! Nothing is inspected per call; `tools/list` and argument binding both read
//! the derived [`InputSchema`].

use serde::Serialize;
use serde_json::{Map, Value, json};

/// JSON Schema primitive type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

impl ParamType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

/// A parameter as declared by a tool author.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    name: String,
    declared_type: Option<ParamType>,
    default: Option<Value>,
    description: Option<String>,
}

impl Param {
    /// An untyped, required parameter.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: None,
            default: None,
            description: None,
        }
    }

    /// Declare the parameter's type.
    pub fn typed(mut self, ty: ParamType) -> Self {
        self.declared_type = Some(ty);
        self
    }

    /// Give the parameter a default value, which makes it optional.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Optional parameter defaulting to `null`.
    pub fn optional(self) -> Self {
        self.with_default(Value::Null)
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A derived parameter schema entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSchema {
    pub name: String,
    pub ty: ParamType,
    pub required: bool,
    pub description: String,
    pub default: Option<Value>,
}

impl From<Param> for ParamSchema {
    fn from(param: Param) -> Self {
        let description = param
            .description
            .unwrap_or_else(|| format!("Parameter {}", param.name));
        Self {
            ty: param.declared_type.unwrap_or(ParamType::String),
            required: param.default.is_none(),
            description,
            default: param.default,
            name: param.name,
        }
    }
}

/// Ordered parameter schemas for one tool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSchema {
    params: Vec<ParamSchema>,
}

impl InputSchema {
    /// Derive schemas from declarations, keeping declaration order.
    pub fn derive(params: impl IntoIterator<Item = Param>) -> Self {
        Self {
            params: params.into_iter().map(ParamSchema::from).collect(),
        }
    }

    pub fn params(&self) -> &[ParamSchema] {
        &self.params
    }

    pub fn get(&self, name: &str) -> Option<&ParamSchema> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Names of the parameters declared without a default.
    pub fn required(&self) -> Vec<&str> {
        self.params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect()
    }

    /// Render as a JSON Schema object.
    pub fn to_json(&self) -> Value {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|p| {
                (
                    p.name.clone(),
                    json!({ "type": p.ty.as_str(), "description": p.description }),
                )
            })
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": self.required(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untyped_param_defaults_to_string() {
        let schema = ParamSchema::from(Param::new("query"));
        assert_eq!(schema.ty, ParamType::String);
        assert!(schema.required);
        assert_eq!(schema.description, "Parameter query");
    }

    #[test]
    fn test_default_value_makes_param_optional() {
        let schema = ParamSchema::from(
            Param::new("limit")
                .typed(ParamType::Integer)
                .with_default(json!(10)),
        );
        assert!(!schema.required);
        assert_eq!(schema.default, Some(json!(10)));
    }

    #[test]
    fn test_required_list_matches_params_without_default() {
        let schema = InputSchema::derive([
            Param::new("a").typed(ParamType::Number),
            Param::new("b").optional(),
            Param::new("c").typed(ParamType::Boolean),
        ]);
        assert_eq!(schema.required(), vec!["a", "c"]);
    }

    #[test]
    fn test_to_json_shape() {
        let schema = InputSchema::derive([
            Param::new("tags")
                .typed(ParamType::Array)
                .optional()
                .describe("Game tags"),
            Param::new("name"),
        ]);
        let value = schema.to_json();
        assert_eq!(value["type"], "object");
        assert_eq!(value["properties"]["tags"]["type"], "array");
        assert_eq!(value["properties"]["tags"]["description"], "Game tags");
        assert_eq!(value["properties"]["name"]["type"], "string");
        assert_eq!(value["required"], json!(["name"]));
    }

    #[test]
    fn test_properties_keep_declaration_order() {
        let schema = InputSchema::derive([
            Param::new("zeta"),
            Param::new("alpha").optional(),
            Param::new("mid").typed(ParamType::Integer),
        ]);
        let value = schema.to_json();
        let keys: Vec<&str> = value["properties"]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_empty_schema() {
        let value = InputSchema::default().to_json();
        assert_eq!(value["properties"], json!({}));
        assert_eq!(value["required"], json!([]));
    }
}
