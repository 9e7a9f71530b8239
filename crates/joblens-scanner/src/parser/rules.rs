//! Declarative extraction rules.
//!
//! A field is described by an ordered slice of [`Rule`]s. Each rule pairs a
//! [`Locator`] with an [`Extract`] transform; rules are tried in order and the
//! first one that yields a non-empty value wins. Adding a fallback for a new
//! markup variant means appending a rule, not editing control flow.

use super::{element_lines, element_text, strip_query};
use scraper::ElementRef;

/// How a locator matches an element's `class` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassMatch {
    /// No class requirement
    Any,
    /// One class token equals the value exactly
    Token(&'static str),
    /// One class token contains the value
    Contains(&'static str),
}

/// Structural description of an element to look for under a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locator {
    tag: Option<&'static str>,
    class: ClassMatch,
    id: Option<&'static str>,
    attr: Option<&'static str>,
    href_contains: Option<&'static str>,
}

impl Locator {
    /// Any element.
    pub const fn any() -> Self {
        Self {
            tag: None,
            class: ClassMatch::Any,
            id: None,
            attr: None,
            href_contains: None,
        }
    }

    /// Elements with the given tag name.
    pub const fn tag(name: &'static str) -> Self {
        Self {
            tag: Some(name),
            ..Self::any()
        }
    }

    pub const fn class_token(self, token: &'static str) -> Self {
        Self {
            class: ClassMatch::Token(token),
            ..self
        }
    }

    pub const fn class_contains(self, fragment: &'static str) -> Self {
        Self {
            class: ClassMatch::Contains(fragment),
            ..self
        }
    }

    pub const fn with_id(self, id: &'static str) -> Self {
        Self {
            id: Some(id),
            ..self
        }
    }

    /// Require the attribute to be present, whatever its value.
    pub const fn with_attr(self, name: &'static str) -> Self {
        Self {
            attr: Some(name),
            ..self
        }
    }

    pub const fn href_contains(self, fragment: &'static str) -> Self {
        Self {
            href_contains: Some(fragment),
            ..self
        }
    }

    pub fn matches(&self, element: &ElementRef<'_>) -> bool {
        let el = element.value();

        if self.tag.is_some_and(|tag| !el.name().eq_ignore_ascii_case(tag)) {
            return false;
        }
        if self.id.is_some_and(|id| el.id() != Some(id)) {
            return false;
        }
        if self.attr.is_some_and(|name| el.attr(name).is_none()) {
            return false;
        }
        if let Some(fragment) = self.href_contains {
            if !el.attr("href").is_some_and(|href| href.contains(fragment)) {
                return false;
            }
        }

        match self.class {
            ClassMatch::Any => true,
            ClassMatch::Token(token) => el.classes().any(|c| c == token),
            ClassMatch::Contains(fragment) => el.classes().any(|c| c.contains(fragment)),
        }
    }

    /// First matching descendant of `scope`, in document order.
    ///
    /// The scope element itself is never a candidate.
    pub fn first_in<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.all_in(scope).next()
    }

    /// Every matching descendant of `scope`, in document order.
    pub fn all_in<'a>(&self, scope: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
        let locator = *self;
        scope
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .filter(move |el| locator.matches(el))
    }
}

/// Transform applied to a located element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extract {
    /// Whitespace-normalized text content
    Text,
    /// Text content with one line per text fragment
    Lines,
    /// Raw attribute value
    Attr(&'static str),
    /// `href` with the query string removed
    Href,
}

impl Extract {
    /// Apply the transform; empty results count as "no value".
    pub fn apply(self, element: ElementRef<'_>) -> Option<String> {
        let value = match self {
            Self::Text => element_text(element),
            Self::Lines => element_lines(element),
            Self::Attr(name) => element.value().attr(name)?.trim().to_string(),
            Self::Href => strip_query(element.value().attr("href")?),
        };
        (!value.is_empty()).then_some(value)
    }
}

/// One (locator, transform) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub locator: Locator,
    pub extract: Extract,
}

impl Rule {
    pub const fn new(locator: Locator, extract: Extract) -> Self {
        Self { locator, extract }
    }
}

/// Try `rules` in order under `scope`; the first value produced wins.
pub fn first_value(rules: &[Rule], scope: ElementRef<'_>) -> Option<String> {
    rules.iter().find_map(|rule| {
        rule.locator
            .first_in(scope)
            .and_then(|el| rule.extract.apply(el))
    })
}

/// First element found by any locator, trying locators in order.
pub fn locate_first<'a>(locators: &[Locator], scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
    locators.iter().find_map(|locator| locator.first_in(scope))
}
