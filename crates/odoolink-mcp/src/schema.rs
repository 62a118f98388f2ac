// ABOUTME: Declarative tool input schemas and validation of untyped call arguments
// ABOUTME: Rejects unknown, missing, or mistyped fields by name and applies optional defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use std::fmt;

use odoolink::BridgeError;
use serde_json::{json, Map, Value};

/// JSON type accepted for a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    /// Whole number (integral floats such as `7.0` are accepted)
    Integer,
    /// Any number
    Number,
    /// String
    String,
    /// Boolean
    Boolean,
}

impl ParamType {
    /// JSON Schema type name
    pub const fn json_name(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String => "string",
            Self::Boolean => "boolean",
        }
    }

    /// Coerce `value` into canonical form, or `None` when the type does not match
    fn coerce(self, value: &Value) -> Option<Value> {
        match self {
            Self::Integer => value.as_i64().map(Value::from).or_else(|| {
                value
                    .as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
                    .map(|f| Value::from(f as i64))
            }),
            Self::Number => value.is_number().then(|| value.clone()),
            Self::String => value.is_string().then(|| value.clone()),
            Self::Boolean => value.is_boolean().then(|| value.clone()),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.json_name())
    }
}

/// JSON type name of an incoming value, for error messages
const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// One named parameter of a tool
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    /// Argument name
    pub name: &'static str,
    /// Accepted JSON type
    pub param_type: ParamType,
    /// Human-readable description shown to clients
    pub description: &'static str,
    /// Whether the caller must supply it
    pub required: bool,
    /// Value applied when an optional argument is omitted
    pub default: Option<Value>,
}

impl ParamSpec {
    /// A parameter the caller must supply
    pub const fn required(
        name: &'static str,
        param_type: ParamType,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            param_type,
            description,
            required: true,
            default: None,
        }
    }

    /// A parameter the caller may omit
    pub const fn optional(
        name: &'static str,
        param_type: ParamType,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            param_type,
            description,
            required: false,
            default: None,
        }
    }

    /// Value to use when the argument is omitted
    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// Ordered parameter list of one tool
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSchema {
    params: Vec<ParamSpec>,
}

impl InputSchema {
    /// Schema with the given parameters, in declaration order
    pub const fn new(params: Vec<ParamSpec>) -> Self {
        Self { params }
    }

    /// Schema of a tool that takes no arguments
    pub const fn empty() -> Self {
        Self { params: Vec::new() }
    }

    /// Declared parameters
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Render as a JSON Schema object for `tools/list`
    pub fn to_json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|spec| {
                let mut property = json!({
                    "type": spec.param_type.json_name(),
                    "description": spec.description,
                });
                if let (Some(default), Value::Object(map)) = (&spec.default, &mut property) {
                    map.insert("default".to_owned(), default.clone());
                }
                (spec.name.to_owned(), property)
            })
            .collect();
        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|spec| spec.required)
            .map(|spec| spec.name)
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false,
        })
    }

    /// Check `arguments` against the schema of `tool`
    ///
    /// `null` for an optional argument counts as omitted. On success every
    /// defaulted argument is filled in.
    pub fn validate(&self, tool: &str, arguments: Value) -> Result<ToolArgs, BridgeError> {
        let supplied = match arguments {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(BridgeError::invalid_argument(format!(
                    "Arguments for tool '{tool}' must be an object, got {}",
                    value_kind(&other)
                )))
            }
        };

        if let Some(unknown) = supplied
            .keys()
            .find(|key| !self.params.iter().any(|spec| spec.name == key.as_str()))
        {
            return Err(BridgeError::invalid_argument(format!(
                "Unknown argument '{unknown}' for tool '{tool}'"
            )));
        }

        let mut values = Map::new();
        for spec in &self.params {
            match supplied.get(spec.name).filter(|v| !v.is_null()) {
                Some(value) => {
                    let coerced = spec.param_type.coerce(value).ok_or_else(|| {
                        BridgeError::invalid_argument(format!(
                            "Argument '{}' for tool '{tool}' must be {}, got {}",
                            spec.name,
                            spec.param_type,
                            value_kind(value)
                        ))
                    })?;
                    values.insert(spec.name.to_owned(), coerced);
                }
                None if spec.required => {
                    return Err(BridgeError::invalid_argument(format!(
                        "Missing required argument '{}' for tool '{tool}'",
                        spec.name
                    )));
                }
                None => {
                    if let Some(default) = &spec.default {
                        values.insert(spec.name.to_owned(), default.clone());
                    }
                }
            }
        }

        Ok(ToolArgs { values })
    }
}

/// Arguments that passed schema validation
///
/// Getters for required arguments report `Internal` when a handler asks for
/// a name its schema does not declare as required.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolArgs {
    values: Map<String, Value>,
}

impl ToolArgs {
    /// Raw validated value
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Optional integer argument
    pub fn opt_int(&self, name: &str) -> Option<i64> {
        self.values.get(name).and_then(Value::as_i64)
    }

    /// Optional string argument
    pub fn opt_str(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(Value::as_str)
    }

    /// Required integer argument
    pub fn int(&self, name: &str) -> Result<i64, BridgeError> {
        self.opt_int(name).ok_or_else(|| undeclared(name))
    }

    /// Required string argument
    pub fn str(&self, name: &str) -> Result<&str, BridgeError> {
        self.opt_str(name).ok_or_else(|| undeclared(name))
    }
}

fn undeclared(name: &str) -> BridgeError {
    BridgeError::internal(format!("Handler read undeclared argument '{name}'"))
}
