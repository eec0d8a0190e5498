//! Service class members for the generated client.
//!
//! Each routable endpoint contributes a field declaration and a single
//! registration line in the constructor, binding the endpoint name to a
//! `create(transport, urlTemplate)` factory over its cleaned URI template.

use crate::codegen::string_literal;
use crate::model::Endpoint;
use crate::template::clean_template;

/// Renders the constructor line registering `endpoint` on the service.
///
/// ## Examples
///
/// ```
/// use taffy_gen_lib::codegen::render_registration;
/// use taffy_gen_lib::model::Endpoint;
///
/// let endpoint = Endpoint {
///     name: "comments".to_string(),
///     uri_template: "/app/{companyId}//sd/tickets/{ticketId}/comments".to_string(),
///     path_parameters: vec!["companyId".to_string(), "ticketId".to_string()],
///     operations: vec![],
/// };
///
/// assert_eq!(
///     render_registration(&endpoint),
///     r#"this.comments = create<TResult>(transport, "/app/{companyId}/sd/tickets/{ticketId}/comments");"#
/// );
/// ```
pub fn render_registration(endpoint: &Endpoint) -> String {
    format!(
        "this.{} = create<TResult>(transport, {});",
        endpoint.name,
        string_literal(&clean_template(&endpoint.uri_template))
    )
}

/// Renders the field declaration for `endpoint`.
///
/// `typed` endpoints use their own interface from the declarations file;
/// the others fall back to the generic resource factory type.
pub fn render_field(endpoint: &Endpoint, typed: bool) -> String {
    if typed {
        format!(
            "readonly {name}: Interfaces.{name}<TResult>;",
            name = endpoint.name
        )
    } else {
        format!(
            "readonly {}: Interfaces.TaffyResourceFactory<TResult>;",
            endpoint.name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(name: &str, uri: &str) -> Endpoint {
        Endpoint {
            name: name.to_string(),
            uri_template: uri.to_string(),
            path_parameters: crate::template::extract_path_params(uri),
            operations: vec![],
        }
    }

    #[test]
    fn registration_uses_constraint_free_template() {
        assert_eq!(
            render_registration(&endpoint("item", "/items/{id:[0-9]+}")),
            r#"this.item = create<TResult>(transport, "/items/{id}");"#
        );
    }

    #[test]
    fn registration_is_a_single_line() {
        let line = render_registration(&endpoint("stats", "/admin/sd/stats\n"));
        assert_eq!(line.lines().count(), 1);
        assert!(line.ends_with(r#""/admin/sd/stats");"#));
    }

    #[test]
    fn typed_field_references_its_interface() {
        assert_eq!(
            render_field(&endpoint("stats", "/admin/sd/stats"), true),
            "readonly stats: Interfaces.stats<TResult>;"
        );
    }

    #[test]
    fn excluded_field_uses_generic_factory() {
        assert_eq!(
            render_field(&endpoint("internal", "/internal"), false),
            "readonly internal: Interfaces.TaffyResourceFactory<TResult>;"
        );
    }
}
