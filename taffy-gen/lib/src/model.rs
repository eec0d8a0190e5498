//! Normalized endpoint model.
//!
//! - [`Endpoint`] - one routable component (one source file)
//! - [`Operation`] - one public function on the component
//! - [`Argument`] - one declared function argument
//! - [`ArgumentType`] - the fixed set of argument types with their TypeScript mapping
//! - [`HttpVerb`] - the verbs the transport can dispatch

use serde::Serialize;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Argument types understood by the generator.
///
/// Parsing is case-insensitive; anything else is a lookup failure.
///
/// ## Examples
///
/// ```
/// use std::str::FromStr;
/// use taffy_gen_lib::model::ArgumentType;
///
/// assert_eq!(ArgumentType::from_str("Numeric").unwrap(), ArgumentType::Numeric);
/// assert_eq!(ArgumentType::Struct.typescript(), "Object");
/// assert!(ArgumentType::from_str("query").is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ArgumentType {
    Array,
    Date,
    String,
    Numeric,
    Boolean,
    Struct,
}

impl ArgumentType {
    /// The TypeScript type used for this argument in generated declarations.
    pub fn typescript(self) -> &'static str {
        match self {
            Self::Array => "any[]",
            Self::Date => "string",
            Self::String => "string",
            Self::Numeric => "number",
            Self::Boolean => "boolean",
            Self::Struct => "Object",
        }
    }
}

/// HTTP verbs supported by the transport and the generated proxy.
///
/// Every verb maps to the transport method of the same name; the proxy
/// method is `do` followed by the capitalised verb.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum HttpVerb {
    Get,
    Delete,
    Post,
    Put,
    Patch,
}

impl HttpVerb {
    /// Name of the transport method this verb dispatches to.
    pub fn transport_method(self) -> &'static str {
        self.into()
    }

    /// Name of the generated proxy method (`doGet`, `doPost`, ...).
    pub fn proxy_method(self) -> String {
        crate::naming::method_name(self.transport_method())
    }

    /// Whether the data object travels as a request body rather than as a
    /// query string.
    pub fn sends_body(self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }
}

/// A declared argument of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Argument {
    pub name: String,
    pub ty: ArgumentType,
    /// `None` when the markup does not say.
    pub required: Option<bool>,
}

impl Argument {
    /// Whether callers must supply this argument.
    ///
    /// An argument without a `required` attribute is optional, matching
    /// the CFML default for `cfargument`.
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }
}

/// A public function on a component.
///
/// Arguments are split once at extraction time: `path_arguments` are the
/// ones satisfied by the endpoint's URI template, `data_arguments` are the
/// ones that end up in the generated call signature. Both keep
/// declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Operation {
    /// Lower-cased function name, e.g. `get`.
    pub verb: String,
    pub path_arguments: Vec<Argument>,
    pub data_arguments: Vec<Argument>,
}

impl Operation {
    /// The transport verb for this operation, if it has one.
    pub fn http_verb(&self) -> Option<HttpVerb> {
        self.verb.parse().ok()
    }

    /// Generated method name (`doGet` for `get`).
    pub fn method_name(&self) -> String {
        crate::naming::method_name(&self.verb)
    }
}

/// A routable component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    /// Identifier derived from the source file name.
    pub name: String,
    /// URI template exactly as declared.
    pub uri_template: String,
    /// Placeholder names in order of appearance, duplicates included.
    pub path_parameters: Vec<String>,
    pub operations: Vec<Operation>,
}

impl Endpoint {
    /// Whether `name` refers to one of this endpoint's path parameters.
    ///
    /// Comparison ignores ASCII case, as CFML argument names do.
    pub fn is_path_parameter(&self, name: &str) -> bool {
        self.path_parameters
            .iter()
            .any(|param| param.eq_ignore_ascii_case(name))
    }
}
