//! Interface declarations for the generated client.
//!
//! Each routable endpoint becomes a callable interface: calling it with the
//! path parameters returns an object with one `do<Verb>` method per
//! operation plus the interpolated `url`.

use std::collections::HashSet;

use strum::IntoEnumIterator;
use tracing::debug;

use crate::codegen::EmitOptions;
use crate::model::{Argument, Endpoint, HttpVerb, Operation};
use crate::naming::{property_name, sanitize_identifier};

/// Renders the interface declaration for one endpoint.
///
/// Path parameters become call parameters typed `string | number`.
/// Arguments bound to path parameters never appear in a method's data
/// object. Operations whose verb the transport cannot dispatch are left out.
///
/// ## Examples
///
/// ```
/// use taffy_gen_lib::codegen::{EmitOptions, render_declaration};
/// use taffy_gen_lib::model::Endpoint;
///
/// let endpoint = Endpoint {
///     name: "stats".to_string(),
///     uri_template: "/admin/sd/stats".to_string(),
///     path_parameters: vec![],
///     operations: vec![],
/// };
///
/// let ts = render_declaration(&endpoint, EmitOptions::default());
/// assert!(ts.contains("export interface stats<TResult> {"));
/// assert!(ts.contains("(): {"));
/// assert!(ts.contains("url: string;"));
/// ```
pub fn render_declaration(endpoint: &Endpoint, options: EmitOptions) -> String {
    let mut out = String::new();

    out.push_str(&format!("export interface {}<TResult> {{\n", endpoint.name));
    out.push_str(&format!(
        "    ({}): {{\n",
        call_parameters(&endpoint.path_parameters)
    ));

    let mut seen = HashSet::new();
    for operation in &endpoint.operations {
        if operation.http_verb().is_none() {
            debug!(
                endpoint = %endpoint.name,
                verb = %operation.verb,
                "leaving non-HTTP operation out of the declaration"
            );
            continue;
        }

        let method = operation.method_name();
        if !seen.insert(method.clone()) {
            continue;
        }

        out.push_str(&format!(
            "        {}: (data?: {}, options?: any) => TResult;\n",
            method,
            data_type(operation, options)
        ));
    }

    out.push_str("        url: string;\n");
    out.push_str("    };\n");
    out.push_str("}\n");
    out
}

/// Call parameter list for the path parameters.
///
/// Repeated names get the next unused ordinal appended (`id`, `id2`) so
/// that the parameter list stays valid while keeping one parameter per
/// placeholder. An ordinal never reuses a name another placeholder has.
fn call_parameters(path_parameters: &[String]) -> String {
    let bases: Vec<String> = path_parameters
        .iter()
        .map(|param| sanitize_identifier(param))
        .collect();
    let mut taken: HashSet<String> = bases.iter().cloned().collect();
    let mut emitted: HashSet<String> = HashSet::new();

    bases
        .into_iter()
        .map(|base| {
            let name = if emitted.insert(base.clone()) {
                base
            } else {
                let mut ordinal = 2;
                while taken.contains(&format!("{base}{ordinal}")) {
                    ordinal += 1;
                }
                let name = format!("{base}{ordinal}");
                taken.insert(name.clone());
                emitted.insert(name.clone());
                name
            };
            format!("{name}: string | number")
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Object type literal for an operation's data arguments; `{}` when empty.
fn data_type(operation: &Operation, options: EmitOptions) -> String {
    if operation.data_arguments.is_empty() {
        return "{}".to_string();
    }

    let force_optional =
        options.patch_fields_optional && operation.http_verb() == Some(HttpVerb::Patch);

    let fields: Vec<String> = operation
        .data_arguments
        .iter()
        .map(|argument| data_field(argument, force_optional))
        .collect();

    format!("{{ {} }}", fields.join("; "))
}

fn data_field(argument: &Argument, force_optional: bool) -> String {
    let optional = force_optional || !argument.is_required();
    format!(
        "{}{}: {}",
        property_name(&argument.name),
        if optional { "?" } else { "" },
        argument.ty.typescript()
    )
}

/// Declaration of the transport the generated client calls into.
///
/// One method per [`HttpVerb`]; body-carrying verbs take a `data` argument.
pub fn render_transport_declaration() -> String {
    let mut out = String::from("export interface TaffyHttpClientProvider<TResult> {\n");
    for verb in HttpVerb::iter() {
        let data = if verb.sends_body() { "data: any, " } else { "" };
        out.push_str(&format!(
            "    {}(url: string, {}options?: any): TResult;\n",
            verb.transport_method(),
            data
        ));
    }
    out.push_str("}\n");
    out
}

/// Shapes returned by the runtime `create` factory.
///
/// Endpoints left out of the declarations are typed with
/// `TaffyResourceFactory` in the client class.
pub fn render_resource_types() -> String {
    let mut out = String::from("export interface TaffyResource<TResult> {\n");
    for verb in HttpVerb::iter() {
        out.push_str(&format!(
            "    {}(data?: any, options?: any): TResult;\n",
            verb.proxy_method()
        ));
    }
    out.push_str("    url: string;\n");
    out.push_str("}\n\n");
    out.push_str(
        "export type TaffyResourceFactory<TResult> = \
         (...args: Array<string | number>) => TaffyResource<TResult>;\n",
    );
    out
}
