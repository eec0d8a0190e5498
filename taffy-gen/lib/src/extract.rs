//! Endpoint extraction from a parsed component tree.
//!
//! Walks the generic [`Document`] and produces an [`Endpoint`]:
//!
//! 1. read the URI template (`taffy_uri` or `taffy:uri`) verbatim
//! 2. scan it for path parameters
//! 3. collect public `cffunction` elements and their `cfargument`s
//! 4. split each operation's arguments into path-bound and data arguments
//!
//! A component without a URI template is not routable and yields `None`.

use std::str::FromStr;

use tracing::warn;

use crate::error::ExtractError;
use crate::model::{Argument, ArgumentType, Endpoint, Operation};
use crate::template::extract_path_params;
use crate::tree::{Document, Element};

/// Attribute names carrying the URI template, in lookup order.
const URI_ATTRIBUTES: &[&str] = &["taffy_uri", "taffy:uri"];

/// Extracts the endpoint declared by `document`.
///
/// ## Returns
///
/// - `Ok(Some(endpoint))` for a routable component
/// - `Ok(None)` when the component declares no URI template
///
/// ## Errors
///
/// - [`ExtractError::MissingComponent`] when there is no `cfcomponent`
/// - [`ExtractError::MissingAttribute`] for an argument without `type`
/// - [`ExtractError::UnknownArgumentType`] for a type outside the lookup table
///
/// ## Examples
///
/// ```
/// use taffy_gen_lib::extract::extract_endpoint;
/// use taffy_gen_lib::tree::parse_markup;
///
/// let doc = parse_markup(r#"<cfcomponent taffy_uri="/users/{userId}">
/// <cffunction name="get" access="public">
/// <cfargument name="userId" type="numeric" />
/// <cfargument name="fields" type="string" />
/// </cffunction>
/// </cfcomponent>"#).unwrap();
///
/// let endpoint = extract_endpoint(&doc, "users").unwrap().unwrap();
/// assert_eq!(endpoint.path_parameters, vec!["userId"]);
/// assert_eq!(endpoint.operations[0].data_arguments[0].name, "fields");
/// ```
pub fn extract_endpoint(document: &Document, name: &str) -> Result<Option<Endpoint>, ExtractError> {
    let component = document
        .find("cfcomponent")
        .ok_or(ExtractError::MissingComponent)?;

    let Some(uri_template) = find_uri_template(component) else {
        return Ok(None);
    };

    let path_parameters = extract_path_params(uri_template);
    let mut endpoint = Endpoint {
        name: name.to_string(),
        uri_template: uri_template.to_string(),
        path_parameters,
        operations: Vec::new(),
    };

    for function in component
        .children_named("cffunction")
        .filter(|function| is_public(function))
    {
        let Some(verb) = function.attribute("name").map(str::trim).filter(|v| !v.is_empty())
        else {
            warn!(endpoint = name, "skipping public <cffunction> without a name");
            continue;
        };

        let operation = extract_operation(function, &verb.to_lowercase(), &endpoint)?;
        if operation.http_verb().is_none() {
            warn!(
                endpoint = name,
                verb = %operation.verb,
                "public function is not an HTTP verb and has no proxy method"
            );
        }
        endpoint.operations.push(operation);
    }

    Ok(Some(endpoint))
}

/// The URI template, if the component declares a non-empty one.
fn find_uri_template(component: &Element) -> Option<&str> {
    URI_ATTRIBUTES
        .iter()
        .filter_map(|key| component.attribute(key))
        .map(str::trim)
        .find(|uri| !uri.is_empty())
}

/// Only functions explicitly declared `access="public"` are exposed.
fn is_public(function: &Element) -> bool {
    function
        .attribute("access")
        .is_some_and(|access| access.trim().eq_ignore_ascii_case("public"))
}

fn extract_operation(
    function: &Element,
    verb: &str,
    endpoint: &Endpoint,
) -> Result<Operation, ExtractError> {
    let mut path_arguments = Vec::new();
    let mut data_arguments = Vec::new();

    for element in function.children_named("cfargument") {
        let Some(argument) = extract_argument(element, verb)? else {
            warn!(
                endpoint = %endpoint.name,
                verb,
                "skipping <cfargument> without a name"
            );
            continue;
        };

        if endpoint.is_path_parameter(&argument.name) {
            path_arguments.push(argument);
        } else {
            data_arguments.push(argument);
        }
    }

    Ok(Operation {
        verb: verb.to_string(),
        path_arguments,
        data_arguments,
    })
}

fn extract_argument(element: &Element, verb: &str) -> Result<Option<Argument>, ExtractError> {
    let Some(name) = element
        .attribute("name")
        .map(str::trim)
        .filter(|name| !name.is_empty())
    else {
        return Ok(None);
    };

    let type_name = element
        .attribute("type")
        .map(str::trim)
        .ok_or_else(|| ExtractError::MissingAttribute {
            element: "cfargument",
            owner: name.to_string(),
            attribute: "type",
        })?;

    let ty = ArgumentType::from_str(type_name).map_err(|_| ExtractError::UnknownArgumentType {
        operation: verb.to_string(),
        argument: name.to_string(),
        type_name: type_name.to_string(),
    })?;

    Ok(Some(Argument {
        name: name.to_string(),
        ty,
        required: element.attribute("required").and_then(parse_flag),
    }))
}

/// CFML boolean attribute values; anything unrecognised counts as undeclared.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" => Some(true),
        "false" | "no" => Some(false),
        _ => None,
    }
}
