//! Shared TypeScript runtime for the generated client.
//!
//! Emitted once at the bottom of the client file. `create` binds a
//! transport and a URL template; calling the result with the path
//! parameters fills the template positionally and returns the proxy object.
//! Query-style verbs append the encoded data object to the URL, body-style
//! verbs pass it through to the transport.
//!
//! The behaviour mirrors [`crate::template::interpolate`] and
//! [`crate::template::encode_query`].

use strum::IntoEnumIterator;

use crate::model::HttpVerb;

const CREATE_HEAD: &str = "\
function create<TResult>(
    transport: Interfaces.TaffyHttpClientProvider<TResult>,
    url: string
): Interfaces.TaffyResourceFactory<TResult> {
    return (...args: Array<string | number>): Interfaces.TaffyResource<TResult> => {
        const formattedUrl = formatUrl(url, args);
        return {
";

const CREATE_TAIL: &str = "            url: formattedUrl,
        };
    };
}
";

const HELPERS: &str = r"
function formatUrl(template: string, args: Array<string | number>): string {
    const pending = args.slice();
    return template.replace(/\{(\w+)\}/g, (placeholder: string): string =>
        pending.length > 0 ? String(pending.shift()) : placeholder
    );
}

function encodeQueryData(data?: { [key: string]: unknown }): string {
    const pairs: string[] = [];
    if (data) {
        for (const key of Object.keys(data)) {
            pairs.push(encodeURIComponent(key) + '=' + encodeURIComponent(String(data[key])));
        }
    }
    return pairs.length > 0 ? '?' + pairs.join('&') : '';
}
";

/// Renders the runtime module.
pub fn render_runtime() -> String {
    let mut out = String::from(CREATE_HEAD);
    for verb in HttpVerb::iter() {
        out.push_str(&proxy_method(verb));
    }
    out.push_str(CREATE_TAIL);
    out.push_str(HELPERS);
    out
}

/// One proxy method: `doX` forwards to the transport's `x`.
fn proxy_method(verb: HttpVerb) -> String {
    let call = if verb.sends_body() {
        format!(
            "transport.{}(formattedUrl, data, options)",
            verb.transport_method()
        )
    } else {
        format!(
            "transport.{}(formattedUrl + encodeQueryData(data), options)",
            verb.transport_method()
        )
    };

    format!(
        "            {}: (data?: any, options?: any): TResult => {},\n",
        verb.proxy_method(),
        call
    )
}
