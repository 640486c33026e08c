#![forbid(unsafe_code)]

//! Interactive-element matching.
//!
//! A small subset of CSS selectors, enough to describe "things
//! the pointer can act on":
//!
//! ```text
//! selector   := (tag | '*')? component*
//! component  := '.' ident
//!             | '[' ident ']'
//!             | '[' ident '=' (ident | "quoted" | 'quoted') ']'
//! list       := selector (',' selector)*
//! ```
//!
//! Combinators (descendant, child, sibling) and pseudo-classes are rejected
//! at parse time. Ancestor matching is provided instead by
//! [`SelectorList::closest`], which mirrors DOM `Element.closest()`: hovering
//! a `<span>` inside an `<a>` still counts as hovering the link.
//!
//! Tag and attribute names compare ASCII case-insensitively; class names and
//! attribute values compare exactly.

use std::fmt;
use std::iter::Peekable;
use std::str::{CharIndices, FromStr};

use crate::error::SelectorError;

/// Selectors treated as interactive when no explicit list is configured.
pub const DEFAULT_INTERACTIVE_SELECTORS: &[&str] = &[
    "a",
    "button",
    "[role=\"button\"]",
    "[role=\"link\"]",
    "[tabindex]",
    "input[type=\"submit\"]",
    "input[type=\"button\"]",
    "label[for]",
    "select",
    "textarea",
];

// ---------------------------------------------------------------------------
// Element descriptors
// ---------------------------------------------------------------------------

/// Host-supplied description of the element under the pointer.
///
/// Carries just enough of the element (and its ancestor chain) for selector
/// matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementDescriptor {
    tag: String,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
    parent: Option<Box<ElementDescriptor>>,
}

impl ElementDescriptor {
    /// Describe an element by tag name.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            classes: Vec::new(),
            attributes: Vec::new(),
            parent: None,
        }
    }

    /// Add a class (builder pattern).
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Add an attribute (builder pattern). Later values shadow earlier ones.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into().to_ascii_lowercase();
        self.attributes.retain(|(n, _)| *n != name);
        self.attributes.push((name, value.into()));
        self
    }

    /// Nest this element inside `parent` (builder pattern).
    #[must_use]
    pub fn with_parent(mut self, parent: ElementDescriptor) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    /// Lowercase tag name.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Whether the element carries `class`.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Attribute value by (case-insensitive) name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Direct parent, if known.
    #[must_use]
    pub fn parent(&self) -> Option<&ElementDescriptor> {
        self.parent.as_deref()
    }

    /// This element followed by each ancestor, innermost first.
    pub fn ancestors(&self) -> impl Iterator<Item = &ElementDescriptor> {
        std::iter::successors(Some(self), |el| el.parent())
    }
}

// ---------------------------------------------------------------------------
// Selector
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttributeFilter {
    name: String,
    value: Option<String>,
}

/// A single compound selector.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selector {
    tag: Option<String>,
    classes: Vec<String>,
    attributes: Vec<AttributeFilter>,
}

impl Selector {
    /// Matches every element (`*`).
    #[must_use]
    pub fn universal() -> Self {
        Self::default()
    }

    /// Matches elements with the given tag.
    #[must_use]
    pub fn tag(name: &str) -> Self {
        Self {
            tag: Some(name.to_ascii_lowercase()),
            ..Self::default()
        }
    }

    /// Require a class (builder pattern).
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Require an attribute to be present (builder pattern).
    #[must_use]
    pub fn with_attribute(mut self, name: &str) -> Self {
        self.attributes.push(AttributeFilter {
            name: name.to_ascii_lowercase(),
            value: None,
        });
        self
    }

    /// Require an attribute with an exact value (builder pattern).
    #[must_use]
    pub fn with_attribute_value(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attributes.push(AttributeFilter {
            name: name.to_ascii_lowercase(),
            value: Some(value.into()),
        });
        self
    }

    /// Parse one compound selector.
    ///
    /// Error offsets are byte offsets into `source`.
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let trimmed = source.trim();
        if trimmed.is_empty() {
            return Err(SelectorError::Empty);
        }
        let lead = source.len() - source.trim_start().len();
        Self::parse_compound(trimmed).map_err(|e| e.shifted(lead))
    }

    fn parse_compound(trimmed: &str) -> Result<Self, SelectorError> {
        let mut chars = trimmed.char_indices().peekable();
        let mut selector = Self::default();

        match chars.peek() {
            Some(&(_, '*')) => {
                chars.next();
            }
            Some(&(_, c)) if is_ident_char(c) => {
                selector.tag = Some(read_ident(&mut chars).to_ascii_lowercase());
            }
            _ => {}
        }

        while let Some((offset, c)) = chars.next() {
            match c {
                '.' => {
                    let class = read_ident(&mut chars);
                    if class.is_empty() {
                        return Err(SelectorError::EmptyName { offset: offset + 1 });
                    }
                    selector.classes.push(class);
                }
                '[' => selector
                    .attributes
                    .push(parse_attribute(&mut chars, offset)?),
                c if c.is_whitespace() || matches!(c, '>' | '+' | '~') => {
                    return Err(SelectorError::UnsupportedCombinator { offset });
                }
                ch => return Err(SelectorError::UnexpectedChar { ch, offset }),
            }
        }

        Ok(selector)
    }

    /// Whether `element` itself satisfies this selector.
    #[must_use]
    pub fn matches(&self, element: &ElementDescriptor) -> bool {
        if let Some(tag) = &self.tag
            && *tag != element.tag
        {
            return false;
        }
        self.classes.iter().all(|c| element.has_class(c))
            && self.attributes.iter().all(|f| match element.attribute(&f.name) {
                None => false,
                Some(actual) => f.value.as_deref().is_none_or(|want| want == actual),
            })
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.tag {
            Some(tag) => f.write_str(tag)?,
            None if self.classes.is_empty() && self.attributes.is_empty() => f.write_str("*")?,
            None => {}
        }
        for class in &self.classes {
            write!(f, ".{class}")?;
        }
        for attr in &self.attributes {
            match &attr.value {
                Some(value) if value.contains('"') => write!(f, "[{}='{}']", attr.name, value)?,
                Some(value) => write!(f, "[{}=\"{}\"]", attr.name, value)?,
                None => write!(f, "[{}]", attr.name)?,
            }
        }
        Ok(())
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn read_ident(chars: &mut Peekable<CharIndices<'_>>) -> String {
    let mut ident = String::new();
    while let Some(&(_, c)) = chars.peek() {
        if !is_ident_char(c) {
            break;
        }
        ident.push(c);
        chars.next();
    }
    ident
}

fn skip_whitespace(chars: &mut Peekable<CharIndices<'_>>) {
    while chars.next_if(|&(_, c)| c.is_whitespace()).is_some() {}
}

/// Parse the remainder of `[name]` / `[name=value]`; `open` is the offset of `[`.
fn parse_attribute(
    chars: &mut Peekable<CharIndices<'_>>,
    open: usize,
) -> Result<AttributeFilter, SelectorError> {
    let unterminated = SelectorError::UnterminatedAttribute { offset: open };

    skip_whitespace(chars);
    let name = read_ident(chars);
    if name.is_empty() {
        return Err(SelectorError::EmptyName { offset: open + 1 });
    }
    skip_whitespace(chars);

    let value = match chars.next() {
        Some((_, ']')) => {
            return Ok(AttributeFilter {
                name: name.to_ascii_lowercase(),
                value: None,
            });
        }
        Some((_, '=')) => {
            skip_whitespace(chars);
            match chars.peek().copied() {
                Some((_, quote @ ('"' | '\''))) => {
                    chars.next();
                    let mut value = String::new();
                    loop {
                        match chars.next() {
                            Some((_, c)) if c == quote => break,
                            Some((_, c)) => value.push(c),
                            None => return Err(unterminated),
                        }
                    }
                    value
                }
                Some((offset, c)) if !is_ident_char(c) => {
                    return Err(SelectorError::UnexpectedChar { ch: c, offset });
                }
                Some(_) => read_ident(chars),
                None => return Err(unterminated),
            }
        }
        Some((offset, ch)) => return Err(SelectorError::UnexpectedChar { ch, offset }),
        None => return Err(unterminated),
    };

    skip_whitespace(chars);
    match chars.next() {
        Some((_, ']')) => Ok(AttributeFilter {
            name: name.to_ascii_lowercase(),
            value: Some(value),
        }),
        Some((offset, ch)) => Err(SelectorError::UnexpectedChar { ch, offset }),
        None => Err(unterminated),
    }
}

// ---------------------------------------------------------------------------
// Selector lists
// ---------------------------------------------------------------------------

/// An ordered set of selectors; an element matches if any selector does.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectorList {
    selectors: Vec<Selector>,
}

impl SelectorList {
    /// A list that matches nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in interactive set: links, buttons, explicit roles, tab stops
    /// and form controls. Equivalent to parsing [`DEFAULT_INTERACTIVE_SELECTORS`].
    #[must_use]
    pub fn interactive_defaults() -> Self {
        Self {
            selectors: vec![
                Selector::tag("a"),
                Selector::tag("button"),
                Selector::universal().with_attribute_value("role", "button"),
                Selector::universal().with_attribute_value("role", "link"),
                Selector::universal().with_attribute("tabindex"),
                Selector::tag("input").with_attribute_value("type", "submit"),
                Selector::tag("input").with_attribute_value("type", "button"),
                Selector::tag("label").with_attribute("for"),
                Selector::tag("select"),
                Selector::tag("textarea"),
            ],
        }
    }

    /// Parse a comma-separated list.
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let mut list = Self::empty();
        list.extend_parsed(source)?;
        Ok(list)
    }

    /// Parse a comma-separated list and append it.
    ///
    /// On error the list is left unchanged. Error offsets are byte offsets
    /// into `source`.
    pub fn extend_parsed(&mut self, source: &str) -> Result<(), SelectorError> {
        let parsed = split_top_level(source)
            .map(|(start, part)| Selector::parse(part).map_err(|e| e.shifted(start)))
            .collect::<Result<Vec<_>, _>>()?;
        self.selectors.extend(parsed);
        Ok(())
    }

    /// Append a selector.
    pub fn push(&mut self, selector: Selector) {
        self.selectors.push(selector);
    }

    /// Number of selectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    /// Iterate the selectors in order.
    pub fn iter(&self) -> impl Iterator<Item = &Selector> {
        self.selectors.iter()
    }

    /// Whether `element` itself matches any selector.
    #[must_use]
    pub fn matches(&self, element: &ElementDescriptor) -> bool {
        self.selectors.iter().any(|s| s.matches(element))
    }

    /// Innermost element in `element`'s ancestor chain (itself included)
    /// that matches any selector.
    #[must_use]
    pub fn closest<'a>(&self, element: &'a ElementDescriptor) -> Option<&'a ElementDescriptor> {
        element.ancestors().find(|el| self.matches(el))
    }
}

/// Split on commas that are not inside a quoted attribute value, yielding
/// each part with its starting byte offset.
fn split_top_level(source: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut quote = None;
    let mut start = 0;
    let mut parts = Vec::new();
    for (i, c) in source.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (None, '"' | '\'') => quote = Some(c),
            (None, ',') => {
                parts.push((start, &source[start..i]));
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push((start, &source[start..]));
    parts.into_iter()
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, selector) in self.selectors.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{selector}")?;
        }
        Ok(())
    }
}
