//! Line-level pre-filter for component markup.
//!
//! Component files mix tag declarations with arbitrary CFML bodies that an
//! XML reader cannot cope with. The filter keeps only lines mentioning
//! `cfcomponent`, `cffunction` or `cfargument` (ignoring case) and removes
//! inline `<!--- ... --->` comments from them.
//!
//! ## Known limitations
//!
//! - A declaration split over several lines loses every line that does not
//!   itself contain one of the keywords.
//! - Comments are only stripped when they open and close on the same line;
//!   a keyword inside a multi-line comment keeps that line.

use std::sync::LazyLock;

use regex::Regex;

static DECLARATION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)cfcomponent|cffunction|cfargument").expect("Invalid declaration regex")
});

/// Single-line CFML comment (`<!--- ... --->`), matched lazily so that
/// two comments on one line do not swallow the tag between them.
static INLINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<!---.*?--->").expect("Invalid comment regex"));

/// Reduces raw file text to its component/operation/argument lines.
///
/// ## Examples
///
/// ```
/// use taffy_gen_lib::prefilter::filter_declarations;
///
/// let source = r#"<cfcomponent taffy_uri="/stats">
///     <cfset x = 1 />
///     <cffunction name="get" access="public"> <!--- list stats --->
///     </cffunction>
/// </cfcomponent>"#;
///
/// let filtered = filter_declarations(source);
/// assert!(!filtered.contains("cfset"));
/// assert!(!filtered.contains("list stats"));
/// assert_eq!(filtered.lines().count(), 4);
/// ```
pub fn filter_declarations(source: &str) -> String {
    source
        .lines()
        .filter(|line| DECLARATION_LINE.is_match(line))
        .map(|line| INLINE_COMMENT.replace_all(line, ""))
        .collect::<Vec<_>>()
        .join("\n")
}
