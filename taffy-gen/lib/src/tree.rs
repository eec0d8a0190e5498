//! Generic element tree for filtered component markup.
//!
//! The structural parser does not know anything about endpoints. It turns
//! the pre-filtered markup into [`Element`] nodes (name, attribute map,
//! ordered children) which the extractor then walks.
//!
//! Element and attribute names are lower-cased, since CFML tags are
//! case-insensitive. Attribute values keep their original case.

use std::collections::BTreeMap;

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};

use crate::error::ParseError;

/// Elements that never have children.
///
/// CFML accepts `<cfargument ...>` without a closing slash, so an opening
/// tag for one of these is treated as self-closing and a stray closing tag
/// is ignored.
const VOID_ELEMENTS: &[&str] = &["cfargument"];

/// A markup element with its attributes and child elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Lower-cased tag name (e.g. `cffunction`).
    pub name: String,
    /// Attributes keyed by lower-cased name.
    pub attributes: BTreeMap<String, String>,
    /// Child elements in document order.
    pub children: Vec<Element>,
}

impl Element {
    /// Creates an element with no attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds an attribute, builder style.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Adds a child element, builder style.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Looks up an attribute by its (lower-case) name.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Direct children with the given tag name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }
}

/// All top-level elements of a parsed markup fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub roots: Vec<Element>,
}

impl Document {
    /// Finds the first element with the given name, depth first.
    pub fn find(&self, name: &str) -> Option<&Element> {
        fn walk<'a>(elements: &'a [Element], name: &str) -> Option<&'a Element> {
            elements.iter().find_map(|element| {
                if element.name == name {
                    Some(element)
                } else {
                    walk(&element.children, name)
                }
            })
        }

        walk(&self.roots, name)
    }
}

/// Parses filtered markup into a [`Document`].
///
/// Text, comments and processing instructions are ignored. Tag nesting is
/// checked here rather than by the XML reader so that void elements can be
/// tolerated.
///
/// ## Errors
///
/// Returns a [`ParseError`] for malformed tags or attributes, for closing
/// tags that do not match the innermost open element, and for elements left
/// open at the end of the input.
///
/// ## Examples
///
/// ```
/// use taffy_gen_lib::tree::parse_markup;
///
/// let doc = parse_markup(r#"<cfcomponent taffy_uri="/a/{id}">
/// <cffunction name="get" access="public">
/// <cfargument name="id" type="numeric">
/// </cffunction>
/// </cfcomponent>"#).unwrap();
///
/// let component = doc.find("cfcomponent").unwrap();
/// assert_eq!(component.attribute("taffy_uri"), Some("/a/{id}"));
/// let function = component.children_named("cffunction").next().unwrap();
/// assert_eq!(function.children.len(), 1);
/// ```
pub fn parse_markup(markup: &str) -> Result<Document, ParseError> {
    let mut reader = Reader::from_str(markup);
    {
        let config = reader.config_mut();
        config.trim_text(true);
        config.check_end_names = false;
        config.allow_unmatched_ends = true;
    }

    let mut open: Vec<Element> = Vec::new();
    let mut roots: Vec<Element> = Vec::new();

    loop {
        let event = reader.read_event().map_err(|source| ParseError::Xml {
            position: reader.error_position() as usize,
            source,
        })?;

        match event {
            Event::Start(start) => {
                let element = element_from(&start, &reader)?;
                if is_void(&element.name) {
                    attach(&mut open, &mut roots, element);
                } else {
                    open.push(element);
                }
            }
            Event::Empty(start) => {
                let element = element_from(&start, &reader)?;
                attach(&mut open, &mut roots, element);
            }
            Event::End(end) => {
                let name = lower_name(end.name().as_ref());
                if is_void(&name) {
                    continue;
                }
                match open.pop() {
                    Some(element) if element.name == name => {
                        attach(&mut open, &mut roots, element);
                    }
                    Some(element) => {
                        return Err(ParseError::MismatchedTag {
                            expected: element.name,
                            found: name,
                        });
                    }
                    None => return Err(ParseError::UnexpectedClose(name)),
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(element) = open.pop() {
        return Err(ParseError::Unclosed(element.name));
    }

    Ok(Document { roots })
}

fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

fn lower_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).to_ascii_lowercase()
}

/// Places a finished element under the innermost open element, or at the
/// top level when nothing is open.
fn attach(open: &mut [Element], roots: &mut Vec<Element>, element: Element) {
    match open.last_mut() {
        Some(parent) => parent.children.push(element),
        None => roots.push(element),
    }
}

fn element_from(start: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Result<Element, ParseError> {
    let mut element = Element::new(lower_name(start.name().as_ref()));

    // HTML-style attributes: unquoted and value-less attributes are accepted.
    let mut attributes = start.html_attributes();
    attributes.with_checks(false);

    for attribute in attributes {
        let attribute = attribute.map_err(|source| ParseError::Attribute {
            position: reader.buffer_position() as usize,
            source,
        })?;
        let key = lower_name(attribute.key.as_ref());
        let raw = String::from_utf8_lossy(&attribute.value).into_owned();
        let value = match unescape(&raw) {
            Ok(value) => value.into_owned(),
            // Stray `&` in a hint or description; keep the text as written.
            Err(_) => raw,
        };
        element.attributes.insert(key, value);
    }

    Ok(element)
}
