//! Identifier derivation for generated TypeScript.

use std::path::Path;

/// Words that cannot name an interface (reserved words and built-in type names).
const RESERVED: &[&str] = &[
    "any", "boolean", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for",
    "function", "if", "implements", "import", "in", "instanceof", "interface", "let", "never",
    "new", "null", "number", "object", "package", "private", "protected", "public", "return",
    "static", "string", "super", "switch", "symbol", "this", "throw", "true", "try", "typeof",
    "undefined", "unknown", "var", "void", "while", "with", "yield",
];

/// Names the generated files already declare: the client's constructor
/// and its transport parameter property, plus the shared interface names.
const GENERATED: &[&str] = &[
    "constructor",
    "transport",
    "TaffyHttpClientProvider",
    "TaffyResource",
    "TaffyResourceFactory",
];

/// Upper-cases the first character.
///
/// ## Examples
///
/// ```
/// use taffy_gen_lib::naming::capitalize;
///
/// assert_eq!(capitalize("get"), "Get");
/// assert_eq!(capitalize(""), "");
/// ```
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Proxy method name for a verb: `do` + capitalised lower-case verb.
///
/// ## Examples
///
/// ```
/// use taffy_gen_lib::naming::method_name;
///
/// assert_eq!(method_name("get"), "doGet");
/// assert_eq!(method_name("PATCH"), "doPatch");
/// ```
pub fn method_name(verb: &str) -> String {
    format!("do{}", capitalize(&verb.to_lowercase()))
}

/// Whether `s` can be used as a TypeScript identifier.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    (first.is_ascii_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        && !RESERVED.contains(&s)
}

/// A property key for an object type: bare when it is identifier-shaped,
/// single-quoted otherwise. Reserved words are fine as property keys.
///
/// ## Examples
///
/// ```
/// use taffy_gen_lib::naming::property_name;
///
/// assert_eq!(property_name("delete"), "delete");
/// assert_eq!(property_name("first-name"), "'first-name'");
/// ```
pub fn property_name(name: &str) -> String {
    let bare = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');

    if bare {
        name.to_string()
    } else {
        format!("'{}'", name.replace('\\', "\\\\").replace('\'', "\\'"))
    }
}

/// Turns arbitrary text into a usable TypeScript identifier.
///
/// Invalid characters become `_`, a leading digit gets a `_` prefix and a
/// reserved word gets a `_` suffix.
///
/// ## Examples
///
/// ```
/// use taffy_gen_lib::naming::sanitize_identifier;
///
/// assert_eq!(sanitize_identifier("ticket-comments"), "ticket_comments");
/// assert_eq!(sanitize_identifier("2fa"), "_2fa");
/// assert_eq!(sanitize_identifier("delete"), "delete_");
/// assert_eq!(sanitize_identifier("users"), "users");
/// ```
pub fn sanitize_identifier(s: &str) -> String {
    let mut out: String = s
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    if RESERVED.contains(&out.as_str()) {
        out.push('_');
    }
    out
}

/// Endpoint name for a source file: its sanitised file stem.
///
/// A stem that would clash with a name the generated files already declare
/// gets a `_` suffix.
///
/// ## Examples
///
/// ```
/// use std::path::Path;
/// use taffy_gen_lib::naming::endpoint_name;
///
/// assert_eq!(endpoint_name(Path::new("resources/userPresences.cfc")), "userPresences");
/// assert_eq!(endpoint_name(Path::new("admin.sd-stats.cfc")), "admin_sd_stats");
/// assert_eq!(endpoint_name(Path::new("transport.cfc")), "transport_");
/// ```
pub fn endpoint_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();
    let mut name = sanitize_identifier(&stem);
    if GENERATED.contains(&name.as_str()) {
        name.push('_');
    }
    name
}
