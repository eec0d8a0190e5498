//! Rust counterpart of the generated TypeScript proxy.
//!
//! The generated client never talks HTTP itself; it calls an injected
//! transport. This module offers the same call-time behaviour to Rust code:
//! a [`ResourceFactory`] holds a transport and a cleaned URI template,
//! [`ResourceFactory::bind`] fills the template positionally, and the
//! returned [`Resource`] dispatches each verb to the same-named transport
//! method.
//!
//! ## Examples
//!
//! ```
//! use serde_json::{Value, json};
//! use taffy_gen_lib::runtime::{ResourceFactory, Transport};
//!
//! struct Echo;
//!
//! impl Transport for Echo {
//!     type Output = String;
//!     fn get(&self, url: &str, _: Option<&Value>) -> String { format!("GET {url}") }
//!     fn delete(&self, url: &str, _: Option<&Value>) -> String { format!("DELETE {url}") }
//!     fn post(&self, url: &str, _: Option<&Value>, _: Option<&Value>) -> String { format!("POST {url}") }
//!     fn put(&self, url: &str, _: Option<&Value>, _: Option<&Value>) -> String { format!("PUT {url}") }
//!     fn patch(&self, url: &str, _: Option<&Value>, _: Option<&Value>) -> String { format!("PATCH {url}") }
//! }
//!
//! let users = ResourceFactory::new(Echo, "/app/{companyId}/em/users/{userId}");
//! let user = users.bind(&["42", "7"]);
//! assert_eq!(user.url(), "/app/42/em/users/7");
//! assert_eq!(user.do_get(Some(&json!({"full": true})), None), "GET /app/42/em/users/7?full=true");
//! assert_eq!(user.do_put(Some(&json!({"name": "x"})), None), "PUT /app/42/em/users/7");
//! ```

use std::sync::Arc;

use serde_json::Value;

use crate::model::{Endpoint, HttpVerb};
use crate::template::{clean_template, encode_query, interpolate};

/// The HTTP capability the generated client is handed.
///
/// Query-style methods receive the URL with the encoded data already
/// appended; body-style methods receive the data object unchanged.
pub trait Transport {
    type Output;

    fn get(&self, url: &str, options: Option<&Value>) -> Self::Output;
    fn delete(&self, url: &str, options: Option<&Value>) -> Self::Output;
    fn post(&self, url: &str, data: Option<&Value>, options: Option<&Value>) -> Self::Output;
    fn put(&self, url: &str, data: Option<&Value>, options: Option<&Value>) -> Self::Output;
    fn patch(&self, url: &str, data: Option<&Value>, options: Option<&Value>) -> Self::Output;
}

impl<T: Transport + ?Sized> Transport for &T {
    type Output = T::Output;

    fn get(&self, url: &str, options: Option<&Value>) -> Self::Output {
        (**self).get(url, options)
    }
    fn delete(&self, url: &str, options: Option<&Value>) -> Self::Output {
        (**self).delete(url, options)
    }
    fn post(&self, url: &str, data: Option<&Value>, options: Option<&Value>) -> Self::Output {
        (**self).post(url, data, options)
    }
    fn put(&self, url: &str, data: Option<&Value>, options: Option<&Value>) -> Self::Output {
        (**self).put(url, data, options)
    }
    fn patch(&self, url: &str, data: Option<&Value>, options: Option<&Value>) -> Self::Output {
        (**self).patch(url, data, options)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    type Output = T::Output;

    fn get(&self, url: &str, options: Option<&Value>) -> Self::Output {
        (**self).get(url, options)
    }
    fn delete(&self, url: &str, options: Option<&Value>) -> Self::Output {
        (**self).delete(url, options)
    }
    fn post(&self, url: &str, data: Option<&Value>, options: Option<&Value>) -> Self::Output {
        (**self).post(url, data, options)
    }
    fn put(&self, url: &str, data: Option<&Value>, options: Option<&Value>) -> Self::Output {
        (**self).put(url, data, options)
    }
    fn patch(&self, url: &str, data: Option<&Value>, options: Option<&Value>) -> Self::Output {
        (**self).patch(url, data, options)
    }
}

/// A transport bound to one endpoint's URI template.
#[derive(Debug, Clone)]
pub struct ResourceFactory<T> {
    transport: T,
    template: String,
}

impl<T: Transport> ResourceFactory<T> {
    /// Binds `transport` to `template`, cleaning the template first.
    pub fn new(transport: T, template: &str) -> Self {
        Self {
            transport,
            template: clean_template(template),
        }
    }

    /// Binds `transport` to the endpoint's URI template.
    pub fn for_endpoint(transport: T, endpoint: &Endpoint) -> Self {
        Self::new(transport, &endpoint.uri_template)
    }

    /// The cleaned template.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Fills the template with positional path arguments.
    ///
    /// Missing arguments leave their placeholders in the URL.
    pub fn bind<S: AsRef<str>>(&self, args: &[S]) -> Resource<'_, T> {
        Resource {
            transport: &self.transport,
            url: interpolate(&self.template, args),
        }
    }
}

/// A resource URL ready to be called.
#[derive(Debug)]
pub struct Resource<'a, T> {
    transport: &'a T,
    url: String,
}

impl<T: Transport> Resource<'_, T> {
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Sends `verb` to the transport method of the same name.
    pub fn dispatch(&self, verb: HttpVerb, data: Option<&Value>, options: Option<&Value>) -> T::Output {
        match verb {
            HttpVerb::Get => self.transport.get(&self.query_url(data), options),
            HttpVerb::Delete => self.transport.delete(&self.query_url(data), options),
            HttpVerb::Post => self.transport.post(&self.url, data, options),
            HttpVerb::Put => self.transport.put(&self.url, data, options),
            HttpVerb::Patch => self.transport.patch(&self.url, data, options),
        }
    }

    pub fn do_get(&self, data: Option<&Value>, options: Option<&Value>) -> T::Output {
        self.dispatch(HttpVerb::Get, data, options)
    }

    pub fn do_delete(&self, data: Option<&Value>, options: Option<&Value>) -> T::Output {
        self.dispatch(HttpVerb::Delete, data, options)
    }

    pub fn do_post(&self, data: Option<&Value>, options: Option<&Value>) -> T::Output {
        self.dispatch(HttpVerb::Post, data, options)
    }

    pub fn do_put(&self, data: Option<&Value>, options: Option<&Value>) -> T::Output {
        self.dispatch(HttpVerb::Put, data, options)
    }

    pub fn do_patch(&self, data: Option<&Value>, options: Option<&Value>) -> T::Output {
        self.dispatch(HttpVerb::Patch, data, options)
    }

    fn query_url(&self, data: Option<&Value>) -> String {
        match data {
            Some(data) => format!("{}{}", self.url, encode_query(data)),
            None => self.url.clone(),
        }
    }
}
