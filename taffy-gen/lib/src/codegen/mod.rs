//! TypeScript code generation.
//!
//! Every generator here is a pure function from the endpoint model to
//! source text; nothing in this module touches the filesystem.
//!
//! ## Submodules
//!
//! - [`declarations`] - per-endpoint interface declarations and the shared
//!   transport/resource declarations
//! - [`client`] - per-endpoint registration line and field declaration of
//!   the generated service class
//! - [`runtime`] - the `create` factory with URL interpolation and query
//!   encoding, emitted once per client file
//!
//! ## Generated Code Structure
//!
//! For a component `tickets.cfc` routed at `/app/{companyId}/sd/tickets`:
//!
//! ```text
//! // interfaces file
//! export interface tickets<TResult> {
//!     (companyId: string | number): {
//!         doGet: (data?: { status?: string }, options?: any) => TResult;
//!         url: string;
//!     };
//! }
//!
//! // client file
//! this.tickets = create<TResult>(transport, "/app/{companyId}/sd/tickets");
//! ```

pub mod client;
pub mod declarations;
pub mod runtime;

pub use client::{render_field, render_registration};
pub use declarations::{render_declaration, render_resource_types, render_transport_declaration};
pub use runtime::render_runtime;

/// Knobs for the declaration generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmitOptions {
    /// Mark every data field of a `patch` operation optional, whatever the
    /// argument declares.
    pub patch_fields_optional: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            patch_fields_optional: true,
        }
    }
}

/// A JavaScript string literal for `s`.
pub(crate) fn string_literal(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}
