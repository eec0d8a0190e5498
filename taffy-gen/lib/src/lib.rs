//! Taffy TypeScript client generator library.
//!
//! This crate reads a directory of Taffy REST resources written as
//! ColdFusion components and generates a TypeScript client for them:
//!
//! - An interfaces file with one callable interface per endpoint, typed
//!   from the declared `cfargument`s
//! - A client file with a service class exposing one factory per endpoint,
//!   plus the small runtime that fills URI templates and dispatches verbs
//!   to an injected transport
//!
//! ## Modules
//!
//! - [`prefilter`] - Line filter keeping only component/function/argument declarations
//! - [`tree`] - Tolerant markup parser producing a generic element tree
//! - [`extract`] - Endpoint model extraction from the element tree
//! - [`model`] - Endpoint, operation, and argument types
//! - [`template`] - URI template scanning, cleaning, and interpolation
//! - [`naming`] - TypeScript identifier derivation
//! - [`codegen`] - TypeScript text generation
//! - [`runtime`] - Rust counterpart of the generated proxy
//! - [`pipeline`] - Per-file generation and directory fan-out
//! - [`output`] - Artifact assembly and atomic file writing
//! - [`config`] - Generator configuration
//! - [`error`] - Error types for the generator
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::path::Path;
//! use taffy_gen_lib::config::GeneratorConfig;
//! use taffy_gen_lib::output::generate_and_write;
//!
//! # async fn example() -> Result<(), taffy_gen_lib::error::GeneratorError> {
//! let config = GeneratorConfig::default().with_service_name(Some("HelpdeskApi".to_string()));
//!
//! let output = generate_and_write(
//!     &config,
//!     Path::new("api/resources"),
//!     Path::new("web/src/generated"),
//!     false,
//! )
//! .await?;
//!
//! println!("{} endpoints", output.report.endpoints.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Generated Code Structure
//!
//! For `comments.cfc` routed at `/app/{companyId}/sd/tickets/{ticketId}/comments`:
//!
//! ```text
//! // taffy-typescript-client-interfaces.ts
//! export interface comments<TResult> {
//!     (companyId: string | number, ticketId: string | number): {
//!         doGet: (data?: { page?: number }, options?: any) => TResult;
//!         doPost: (data?: { body: string }, options?: any) => TResult;
//!         url: string;
//!     };
//! }
//!
//! // taffy-typescript-client.ts
//! export class HelpdeskApi<TResult> {
//!     readonly comments: Interfaces.comments<TResult>;
//!
//!     constructor(protected readonly transport: Interfaces.TaffyHttpClientProvider<TResult>) {
//!         this.comments = create<TResult>(transport, "/app/{companyId}/sd/tickets/{ticketId}/comments");
//!     }
//! }
//! ```

pub mod codegen;
pub mod config;
pub mod error;
pub mod extract;
pub mod model;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod prefilter;
pub mod runtime;
pub mod template;
pub mod tree;

pub use config::GeneratorConfig;
pub use error::GeneratorError;
pub use output::generate_and_write;
