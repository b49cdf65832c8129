use std::fmt;
use std::slice;

use regex::Regex;

use crate::error::ParseError;

/// One grammar element of a pattern.
#[derive(Debug, Clone)]
pub enum Section {
    /// A literal `/`.
    Slash,
    /// A literal non-slash run, stored ASCII-lowercased.
    Path {
        /// The literal bytes.
        value: String,
    },
    /// `{key}` — captures one demarcator-bounded run of the path.
    Required {
        /// The capture key.
        key: String,
    },
    /// `{key?}` — a `Required` slot the pattern also matches without.
    /// Never stored in a tree; expansion rewrites it.
    Optional {
        /// The capture key.
        key: String,
    },
    /// `{key*}` — captures the entire remaining path. Only legal as
    /// the last section.
    Wildcard {
        /// The capture key.
        key: String,
    },
    /// `{key|regexp}` — a `Required` slot constrained to the regexp.
    Regexp {
        /// The capture key.
        key: String,
        /// The regexp as written in the pattern.
        source: String,
        /// The compiled program, anchored at the start.
        pattern: Regex,
    },
}

/// The content of one virtual position: a literal character, or the
/// sentinel of a slot. Slots compare equal per kind, never by key, so
/// `{name}` and `{title}` collide while `{name}` and `{name*}` stay
/// distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Atom {
    Char(char),
    Slot(SlotKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SlotKind {
    Required,
    Optional,
    Wildcard,
    Regexp,
}

impl Section {
    // width of this section in the virtual coordinate space
    pub(crate) fn len(&self) -> usize {
        match self {
            Section::Path { value } => value.chars().count(),
            _ => 1,
        }
    }

    pub(crate) fn is_slot(&self) -> bool {
        matches!(
            self,
            Section::Required { .. }
                | Section::Optional { .. }
                | Section::Wildcard { .. }
                | Section::Regexp { .. }
        )
    }

    fn sentinel(&self) -> Option<SlotKind> {
        match self {
            Section::Required { .. } => Some(SlotKind::Required),
            Section::Optional { .. } => Some(SlotKind::Optional),
            Section::Wildcard { .. } => Some(SlotKind::Wildcard),
            Section::Regexp { .. } => Some(SlotKind::Regexp),
            _ => None,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Slash => f.write_str("/"),
            Section::Path { value } => f.write_str(value),
            Section::Required { key } => write!(f, "{{{}}}", key),
            Section::Optional { key } => write!(f, "{{{}?}}", key),
            Section::Wildcard { key } => write!(f, "{{{}*}}", key),
            Section::Regexp { key, source, .. } => write!(f, "{{{}|{}}}", key, source),
        }
    }
}

/// The ordered sections of a pattern, addressable as a flat sequence
/// of virtual positions: a slash or path codepoint stands for itself
/// and every slot occupies a single position holding its kind's
/// sentinel.
#[derive(Debug, Clone, Default)]
pub(crate) struct Sections(pub(crate) Vec<Section>);

impl Sections {
    pub(crate) fn len(&self) -> usize {
        self.0.iter().map(Section::len).sum()
    }

    pub(crate) fn iter(&self) -> slice::Iter<'_, Section> {
        self.0.iter()
    }

    /// The atom at virtual position `i`, or `None` past the end.
    pub(crate) fn at(&self, mut i: usize) -> Option<Atom> {
        for section in &self.0 {
            match section {
                Section::Slash => {
                    if i == 0 {
                        return Some(Atom::Char('/'));
                    }
                    i -= 1;
                }
                Section::Path { value } => {
                    for c in value.chars() {
                        if i == 0 {
                            return Some(Atom::Char(c));
                        }
                        i -= 1;
                    }
                }
                section => {
                    if i == 0 {
                        return section.sentinel().map(Atom::Slot);
                    }
                    i -= 1;
                }
            }
        }
        None
    }

    /// Splits at virtual coordinate `at`, cutting a `Path` section in
    /// two when the coordinate falls inside it.
    pub(crate) fn split(&self, at: usize) -> (Sections, Sections) {
        let mut remaining = at;
        for (i, section) in self.0.iter().enumerate() {
            if remaining == 0 {
                return (
                    Sections(self.0[..i].to_vec()),
                    Sections(self.0[i..].to_vec()),
                );
            }
            let len = section.len();
            if remaining < len {
                if let Section::Path { value } = section {
                    let byte = value
                        .char_indices()
                        .nth(remaining)
                        .map(|(b, _)| b)
                        .unwrap_or(value.len());
                    let mut left = self.0[..i].to_vec();
                    left.push(Section::Path {
                        value: value[..byte].to_string(),
                    });
                    let mut right = vec![Section::Path {
                        value: value[byte..].to_string(),
                    }];
                    right.extend_from_slice(&self.0[i + 1..]);
                    return (Sections(left), Sections(right));
                }
            }
            remaining -= len;
        }
        (Sections(self.0.clone()), Sections(Vec::new()))
    }
}

impl fmt::Display for Sections {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.0 {
            section.fmt(f)?;
        }
        Ok(())
    }
}

/// A parsed route pattern.
#[derive(Debug, Clone, Default)]
pub struct Pattern {
    pub(crate) sections: Sections,
}

impl Pattern {
    /// Parses a pattern string.
    ///
    /// ```
    /// # fn main() -> Result<(), slotmux::ParseError> {
    /// let pattern = slotmux::Pattern::parse("/users/{id}.{format?}")?;
    /// assert_eq!(pattern.to_string(), "/users/{id}.{format?}");
    /// # Ok(())
    /// # }
    /// ```
    pub fn parse(input: &str) -> Result<Pattern, ParseError> {
        crate::parser::parse(input)
    }

    pub(crate) fn new(sections: Vec<Section>) -> Pattern {
        Pattern {
            sections: Sections(sections),
        }
    }

    /// The sections of the pattern, in order.
    pub fn sections(&self) -> &[Section] {
        &self.sections.0
    }

    /// Rewrites a pattern with optional or wildcard markers into the
    /// concrete patterns it denotes: one pattern for the prefix before
    /// each marker (trailing slashes trimmed), then the accumulated
    /// pattern with every optional promoted to a required slot. A
    /// pattern with `n` markers expands to `n + 1` concretes.
    pub fn expand(&self) -> Vec<Pattern> {
        let mut sections = self.sections.0.clone();
        let mut patterns = Vec::new();
        for i in 0..sections.len() {
            match &sections[i] {
                Section::Optional { key } => {
                    let key = key.clone();
                    patterns.push(Pattern {
                        sections: trim_right_slash(sections[..i].to_vec()),
                    });
                    sections[i] = Section::Required { key };
                }
                Section::Wildcard { .. } => {
                    patterns.push(Pattern {
                        sections: trim_right_slash(sections[..i].to_vec()),
                    });
                }
                _ => {}
            }
        }
        patterns.push(Pattern {
            sections: Sections(sections),
        });
        patterns
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.sections.fmt(f)
    }
}

// two patterns are equal when they render identically; the compiled
// regexp program is derived from the rendered source
impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for Pattern {}

// drops trailing slash sections; a prefix that is nothing but slashes
// is left alone
fn trim_right_slash(mut sections: Vec<Section>) -> Sections {
    if let Some(i) = sections.iter().rposition(|s| !matches!(s, Section::Slash)) {
        sections.truncate(i + 1);
    }
    Sections(sections)
}
