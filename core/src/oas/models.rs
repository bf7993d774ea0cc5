#![deny(missing_docs)]

//! # OpenAPI Models
//!
//! Swagger 2.0 structures emitted by the generator. Field order follows the
//! order in which the builders fill them, and `serde_json` is built with
//! `preserve_order`, so identical input serializes identically.

use crate::schema_generator::JsonSchemaDocument;
use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// `paths`: path template -> lower-case method -> operation.
pub type PathsMap = IndexMap<String, IndexMap<String, Operation>>;

/// `definitions`: `<entity>` / `<entity>.<bundle>` -> schema.
pub type DefinitionsMap = IndexMap<String, JsonSchemaDocument>;

/// `securityDefinitions`: scheme id -> scheme.
pub type SecurityDefinitionsMap = IndexMap<String, SecurityScheme>;

/// Where a parameter is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    /// Path placeholder.
    Path,
    /// Query string.
    Query,
    /// Request body.
    Body,
}

/// A `$ref` to a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaRef {
    /// JSON pointer, e.g. `#/definitions/node.page`.
    #[serde(rename = "$ref")]
    pub reference: String,
}

impl SchemaRef {
    /// Reference into the document's `definitions`.
    pub fn definition(key: &str) -> Self {
        Self {
            reference: format!("#/definitions/{}", key),
        }
    }

    /// The `definitions` key this reference points at, if it is local.
    pub fn definition_key(&self) -> Option<&str> {
        self.reference.strip_prefix("#/definitions/")
    }
}

/// An operation parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Location.
    #[serde(rename = "in")]
    pub location: ParamLocation,
    /// Human description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the parameter must be supplied.
    pub required: bool,
    /// Primitive type; absent for body parameters.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
    /// Allowed values.
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub allowed: Vec<String>,
    /// Default value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Body schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaRef>,
}

impl Parameter {
    /// A required string path parameter.
    pub fn path(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: ParamLocation::Path,
            description: None,
            required: true,
            param_type: Some("string".to_string()),
            allowed: Vec::new(),
            default: None,
            schema: None,
        }
    }

    /// A required body parameter referencing a definition.
    pub fn body(name: impl Into<String>, schema: SchemaRef) -> Self {
        Self {
            name: name.into(),
            location: ParamLocation::Body,
            description: None,
            required: true,
            param_type: None,
            allowed: Vec::new(),
            default: None,
            schema: Some(schema),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A security requirement naming one scheme, serialized as `{"<id>": []}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityRequirement(pub String);

impl SecurityRequirement {
    /// The referenced scheme id.
    pub fn scheme(&self) -> &str {
        &self.0
    }
}

impl Serialize for SecurityRequirement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.0, &[] as &[String])?;
        map.end()
    }
}

/// A Swagger 2.0 security scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum SecurityScheme {
    /// Key carried in a header or query parameter.
    #[serde(rename = "apiKey")]
    ApiKey {
        /// Header / parameter name.
        name: String,
        /// `header` or `query`.
        #[serde(rename = "in")]
        location: String,
    },
    /// HTTP Basic authentication.
    #[serde(rename = "basic")]
    Basic,
}

/// One method on one path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Short summary.
    pub summary: String,
    /// Parameters: format parameter first, then entity / path parameters.
    pub parameters: Vec<Parameter>,
    /// Accepted request media types.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub consumes: Vec<String>,
    /// Produced response media types.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub produces: Vec<String>,
    /// Resource plugin id.
    pub operation_id: String,
    /// Transfer protocols.
    pub schemes: Vec<String>,
    /// Applicable security schemes.
    pub security: Vec<SecurityRequirement>,
}

/// The `info` block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Info {
    /// API title.
    pub title: String,
    /// API description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// API version.
    pub version: String,
}

/// The root Swagger 2.0 document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenApiDocument {
    /// Always `2.0`.
    pub swagger: String,
    /// Document metadata.
    pub info: Info,
    /// Serving host (`host[:port]`).
    pub host: String,
    /// Serving base path.
    pub base_path: String,
    /// Operations by path and method.
    pub paths: PathsMap,
    /// Schemas by entity type / bundle.
    pub definitions: DefinitionsMap,
    /// Supported security schemes.
    pub security_definitions: SecurityDefinitionsMap,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_security_requirement_shape() {
        let value = serde_json::to_value(SecurityRequirement("basic_auth".into())).unwrap();
        assert_eq!(value, json!({"basic_auth": []}));
    }

    #[test]
    fn test_security_scheme_shapes() {
        let basic = serde_json::to_value(SecurityScheme::Basic).unwrap();
        assert_eq!(basic, json!({"type": "basic"}));
        let key = serde_json::to_value(SecurityScheme::ApiKey {
            name: "X-CSRF-Token".into(),
            location: "header".into(),
        })
        .unwrap();
        assert_eq!(
            key,
            json!({"type": "apiKey", "name": "X-CSRF-Token", "in": "header"})
        );
    }

    #[test]
    fn test_body_parameter_shape() {
        let p = Parameter::body("body", SchemaRef::definition("node.page"));
        assert_eq!(
            serde_json::to_value(&p).unwrap(),
            json!({
                "name": "body",
                "in": "body",
                "required": true,
                "schema": {"$ref": "#/definitions/node.page"},
            })
        );
        assert_eq!(p.schema.unwrap().definition_key(), Some("node.page"));
    }
}
