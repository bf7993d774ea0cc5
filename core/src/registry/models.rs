#![deny(missing_docs)]

//! # Registry Models
//!
//! Snapshots of the host's content model (entity types, bundles, fields) and
//! routing metadata (resources, routes). Built fresh per generation request and
//! never mutated afterwards.

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::error::AppError;

/// Route requirement marking a route that demands the `X-CSRF-Token` header.
pub const CSRF_REQUIREMENT: &str = "_csrf_request_header_token";

/// HTTP methods a resource can enable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
    /// `HEAD`
    Head,
    /// `OPTIONS`
    Options,
}

impl HttpMethod {
    /// Upper-case wire name, e.g. `GET`.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }

    /// Lower-case key used inside an OpenAPI path item.
    pub fn swagger_key(&self) -> String {
        self.as_str().to_ascii_lowercase()
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            "HEAD" => Ok(HttpMethod::Head),
            "OPTIONS" => Ok(HttpMethod::Options),
            other => Err(AppError::General(format!("Unknown HTTP method '{}'", other))),
        }
    }
}

/// Coarse classification of an entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetaKind {
    /// Fieldable content entities (nodes, users, ...).
    #[default]
    Content,
    /// Configuration entities (bundles themselves, views, ...).
    Config,
    /// Anything else.
    Other,
}

/// An entity type as declared by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityTypeDescriptor {
    /// Machine name, e.g. `node`.
    pub id: String,
    /// Human label, e.g. `Content`.
    pub label: String,
    /// Meta-kind of the entity type.
    #[serde(default)]
    pub kind: MetaKind,
    /// Entity type whose instances are the bundles of this type (e.g. `node_type`).
    /// `None` means the type has no bundles.
    #[serde(default)]
    pub bundle_entity_type: Option<String>,
    /// Declared entity keys: `id`, `bundle`, `label`, `uuid`, ...
    #[serde(default)]
    pub keys: IndexMap<String, String>,
}

impl EntityTypeDescriptor {
    /// Whether instances of this type are split into bundles.
    pub fn supports_bundles(&self) -> bool {
        self.bundle_entity_type.is_some()
    }

    /// Looks up a declared entity key.
    pub fn key(&self, name: &str) -> Option<&str> {
        self.keys.get(name).map(String::as_str).filter(|k| !k.is_empty())
    }

    /// The field that identifies which bundle an instance belongs to.
    pub fn bundle_key(&self) -> Option<&str> {
        self.key("bundle")
    }

    /// The id field name; hosts that declare no id key fall back to `id`.
    pub fn id_key(&self) -> &str {
        self.key("id").unwrap_or("id")
    }
}

/// A bundle of an entity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleDescriptor {
    /// Machine name, e.g. `article`.
    pub id: String,
    /// Human label, e.g. `Article`.
    pub label: String,
}

/// Number of values a field may hold.
///
/// `1` is single-valued, `-1` is unbounded, any other positive `n` is a bounded list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cardinality(i64);

impl Cardinality {
    /// Single-valued.
    pub const SINGLE: Cardinality = Cardinality(1);
    /// Any number of values.
    pub const UNLIMITED: Cardinality = Cardinality(-1);

    /// Wraps a raw storage cardinality.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// The raw integer.
    pub fn get(&self) -> i64 {
        self.0
    }

    /// True when the field holds more than one value.
    pub fn is_multiple(&self) -> bool {
        self.0 != 1
    }

    /// Upper bound on the number of values, if any. Unbounded yields `None`.
    pub fn max_items(&self) -> Option<u64> {
        match self.0 {
            n if n > 1 => Some(n as u64),
            _ => None,
        }
    }
}

impl Default for Cardinality {
    fn default() -> Self {
        Cardinality::SINGLE
    }
}

/// A field definition exactly as the host reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Human label.
    #[serde(default)]
    pub label: Option<String>,
    /// Optional help text.
    #[serde(default)]
    pub description: Option<String>,
    /// Field type id, e.g. `string`, `entity_reference`, `created`.
    #[serde(rename = "type")]
    pub field_type: String,
    /// Typed-data type of the field item list.
    #[serde(default = "default_data_type")]
    pub data_type: String,
    /// Whether a value must be supplied.
    #[serde(default)]
    pub required: bool,
    /// Whether the value is computed / immutable.
    #[serde(default)]
    pub read_only: bool,
    /// Storage cardinality.
    #[serde(default)]
    pub cardinality: Cardinality,
    /// Type-specific settings, copied verbatim downstream.
    #[serde(default)]
    pub settings: Map<String, Value>,
}

fn default_data_type() -> String {
    "list".to_string()
}

/// Per-method configuration of a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodConfig {
    /// The enabled method.
    pub method: HttpMethod,
    /// Supported serialization formats, e.g. `json`, `hal_json`.
    #[serde(default)]
    pub formats: Vec<String>,
    /// Authentication provider ids, e.g. `basic_auth`, `cookie`.
    #[serde(default)]
    pub auth: Vec<String>,
}

/// A registered REST resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    /// Resource plugin id, e.g. `entity:node` or `dblog`.
    pub id: String,
    /// Plugin label.
    pub label: String,
    /// Entity type the resource is bound to, if any.
    #[serde(default)]
    pub entity_type: Option<String>,
    /// Enabled methods, in declaration order.
    #[serde(default)]
    pub methods: Vec<MethodConfig>,
}

impl ResourceDescriptor {
    /// Whether this resource serves a content entity type.
    pub fn is_entity(&self) -> bool {
        self.entity_type.is_some()
    }

    /// Configuration of one enabled method.
    pub fn method(&self, method: HttpMethod) -> Option<&MethodConfig> {
        self.methods.iter().find(|m| m.method == method)
    }

    /// Enabled methods in declaration order.
    pub fn enabled_methods(&self) -> impl Iterator<Item = HttpMethod> + '_ {
        self.methods.iter().map(|m| m.method)
    }

    /// Supported formats of a method; empty for disabled methods.
    pub fn formats(&self, method: HttpMethod) -> &[String] {
        self.method(method).map(|m| m.formats.as_slice()).unwrap_or(&[])
    }

    /// Authentication providers of a method; empty for disabled methods.
    pub fn auth_providers(&self, method: HttpMethod) -> &[String] {
        self.method(method).map(|m| m.auth.as_slice()).unwrap_or(&[])
    }
}

/// A concrete route in the host's routing table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDescriptor {
    /// Route name, e.g. `rest.entity.node.GET.json`.
    pub name: String,
    /// Resource the route belongs to.
    #[serde(default)]
    pub resource: Option<String>,
    /// Path template, e.g. `/node/{node}`.
    pub path: String,
    /// Methods the route accepts.
    #[serde(default)]
    pub methods: Vec<HttpMethod>,
    /// Explicitly declared path variables. Empty means "derive from `path`".
    #[serde(default)]
    pub variables: Vec<String>,
    /// Access requirements, e.g. `_csrf_request_header_token`.
    #[serde(default)]
    pub requirements: IndexMap<String, String>,
}

impl RouteDescriptor {
    /// Path variables in template order.
    pub fn path_variables(&self) -> Vec<String> {
        if !self.variables.is_empty() {
            return self.variables.clone();
        }
        static PLACEHOLDER_RE: OnceLock<Regex> = OnceLock::new();
        let re = PLACEHOLDER_RE
            .get_or_init(|| Regex::new(r"\{([^{}/]+)\}").expect("Invalid regex"));
        re.captures_iter(&self.path)
            .map(|c| c[1].to_string())
            .collect()
    }

    /// Whether the route accepts the method.
    pub fn allows(&self, method: HttpMethod) -> bool {
        self.methods.contains(&method)
    }

    /// Whether the route demands the CSRF request header.
    pub fn requires_csrf_header(&self) -> bool {
        self.requirements.contains_key(CSRF_REQUIREMENT)
    }
}
