use std::fmt;
use std::mem;

use crate::error::{InsertError, MatchError};
use crate::params::Params;
use crate::parser;
use crate::pattern::{Atom, Pattern, Section, Sections};

/// A compressed-prefix tree of route patterns.
///
/// Edges carry variable-length section sequences; matching walks the
/// tree, consuming the path section by section and capturing slot
/// values along the way.
///
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut tree = slotmux::Tree::new();
/// tree.insert("/home", "Welcome!")?;
/// tree.insert("/users/{id}", "A User")?;
///
/// let matched = tree.at("/users/1")?;
/// assert_eq!(matched.params.get("id"), Some("1"));
/// assert_eq!(*matched.handler, "A User");
/// # Ok(())
/// # }
/// ```
pub struct Tree<T> {
    root: Option<Node<T>>,
}

struct Node<T> {
    sections: Sections,
    value: Option<Value<T>>,
    children: Vec<Node<T>>,
}

struct Value<T> {
    pattern: Pattern,
    handler: T,
}

/// A successful lookup.
pub struct Match<'n, 'p, T> {
    /// The concrete pattern the path matched.
    pub pattern: &'n Pattern,
    /// The handler registered for the pattern.
    pub handler: &'n T,
    /// The captured slots, in the order the path consumed them.
    pub params: Params<'n, 'p>,
}

impl<'n, 'p, T> Match<'n, 'p, T> {
    /// The matched path in its normalised form: the pattern with every
    /// slot replaced by its captured value.
    pub fn path(&self) -> String {
        let mut params = self.params.iter();
        let mut out = String::new();
        for section in self.pattern.sections.iter() {
            match section {
                Section::Slash => out.push('/'),
                Section::Path { value } => out.push_str(value),
                _ => {
                    if let Some((_, value)) = params.next() {
                        out.push_str(value);
                    }
                }
            }
        }
        out
    }
}

impl<T> fmt::Debug for Match<'_, '_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Match")
            .field("pattern", &self.pattern.to_string())
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Tree { root: None }
    }
}

impl<T> Tree<T> {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Tree::default()
    }

    /// Parses `route`, expands optional and wildcard markers, and
    /// inserts every concrete pattern. A collision on an implicit
    /// prefix expansion leaves the existing terminal in place; a
    /// collision on the pattern itself is an error.
    pub fn insert(&mut self, route: &str, handler: T) -> Result<(), InsertError>
    where
        T: Clone,
    {
        let pattern = parser::parse(trim_trailing_slash(route))?;
        let expanded = pattern.expand();
        let last = expanded.len() - 1;
        for (i, concrete) in expanded.into_iter().enumerate() {
            match self.insert_pattern(concrete, handler.clone()) {
                Err(InsertError::Duplicate { .. }) if i < last => {}
                Err(err) => return Err(err),
                Ok(()) => {}
            }
        }
        Ok(())
    }

    // inserts a single concrete pattern
    fn insert_pattern(&mut self, pattern: Pattern, handler: T) -> Result<(), InsertError> {
        let sections = pattern.sections.clone();
        match &mut self.root {
            None => {
                self.root = Some(Node {
                    sections,
                    value: Some(Value { pattern, handler }),
                    children: Vec::new(),
                });
                Ok(())
            }
            Some(root) => root.insert(pattern, sections, handler),
        }
    }

    /// Looks up the handler for a path, capturing slot values.
    /// Trailing slashes are trimmed and literal sections compare
    /// ASCII-case-insensitively; captured values keep their original
    /// case.
    pub fn at<'n, 'p>(&'n self, path: &'p str) -> Result<Match<'n, 'p, T>, MatchError> {
        let trimmed = trim_trailing_slash(path);
        let root = match &self.root {
            Some(root) if trimmed.starts_with('/') => root,
            // a tree without any routes shouldn't panic
            _ => {
                return Err(MatchError::NoMatch {
                    path: trimmed.to_string(),
                })
            }
        };
        let mut params = Params::new();
        match root.find(trimmed, &mut params) {
            Some(value) => Ok(Match {
                pattern: &value.pattern,
                handler: &value.handler,
                params,
            }),
            None => Err(MatchError::NoMatch {
                path: trimmed.to_string(),
            }),
        }
    }

    /// Looks a handler up by its registered concrete pattern rather
    /// than by request path.
    pub fn find(&self, pattern: &str) -> Result<(&Pattern, &T), MatchError> {
        let normalised = parser::parse(trim_trailing_slash(pattern))
            .map_err(|_| MatchError::NoMatch {
                path: pattern.to_string(),
            })?
            .to_string();
        let mut found = None;
        self.for_each(&mut |registered, handler| {
            if found.is_none() && registered.to_string() == normalised {
                found = Some((registered, handler));
            }
        });
        found.ok_or_else(|| MatchError::NoMatch {
            path: pattern.to_string(),
        })
    }

    /// Visits every terminal's (pattern, handler) in pre-order.
    pub fn for_each<'n, F>(&'n self, f: &mut F)
    where
        F: FnMut(&'n Pattern, &'n T),
    {
        if let Some(root) = &self.root {
            root.for_each(f);
        }
    }
}

impl<T> Node<T> {
    fn insert(&mut self, pattern: Pattern, sections: Sections, handler: T) -> Result<(), InsertError> {
        let lcp = longest_common_prefix(&self.sections, &sections);
        if lcp < self.sections.len() {
            // split this node: the tail of its edge moves into a child
            // that keeps the old terminal and subtree
            let (prefix, suffix) = self.sections.split(lcp);
            let child = Node {
                sections: suffix,
                value: self.value.take(),
                children: mem::take(&mut self.children),
            };
            self.sections = prefix;
            self.children = vec![child];
            if lcp < sections.len() {
                let (_, rest) = sections.split(lcp);
                self.children.push(Node {
                    sections: rest,
                    value: Some(Value { pattern, handler }),
                    children: Vec::new(),
                });
            } else {
                self.value = Some(Value { pattern, handler });
            }
            return Ok(());
        }
        if lcp == sections.len() {
            return Err(InsertError::Duplicate {
                route: pattern.to_string(),
            });
        }
        let (_, rest) = sections.split(lcp);
        for child in &mut self.children {
            if child.sections.at(0) == rest.at(0) {
                return child.insert(pattern, rest, handler);
            }
        }
        self.children.push(Node {
            sections: rest,
            value: Some(Value { pattern, handler }),
            children: Vec::new(),
        });
        Ok(())
    }

    fn find<'n, 'p>(&'n self, full: &'p str, params: &mut Params<'n, 'p>) -> Option<&'n Value<T>> {
        let checkpoint = params.len();
        let mut path = full;
        for (i, section) in self.sections.iter().enumerate() {
            let consumed = match section {
                Section::Slash => {
                    if !path.starts_with('/') {
                        params.truncate(checkpoint);
                        return None;
                    }
                    1
                }
                Section::Path { value } => {
                    let len = value.len();
                    if path.len() < len
                        || !path.as_bytes()[..len].eq_ignore_ascii_case(value.as_bytes())
                    {
                        params.truncate(checkpoint);
                        return None;
                    }
                    len
                }
                Section::Required { key } | Section::Optional { key } => {
                    let end = self.demarcate(i, path);
                    if end == 0 {
                        params.truncate(checkpoint);
                        return None;
                    }
                    params.push(key, &path[..end]);
                    end
                }
                Section::Wildcard { key } => {
                    params.push(key, path);
                    path.len()
                }
                Section::Regexp { key, pattern, .. } => {
                    let end = self.demarcate(i, path);
                    match pattern.find(&path[..end]) {
                        Some(found) => {
                            params.push(key, found.as_str());
                            found.end()
                        }
                        None => {
                            params.truncate(checkpoint);
                            return None;
                        }
                    }
                }
            };
            path = &path[consumed..];
        }
        if path.is_empty() {
            match &self.value {
                Some(value) => return Some(value),
                None => {
                    params.truncate(checkpoint);
                    return None;
                }
            }
        }
        // literal edges shadow slot edges; insertion order within each
        let literals = self.children.iter().filter(|c| !c.starts_with_slot());
        let slots = self.children.iter().filter(|c| c.starts_with_slot());
        for child in literals.chain(slots) {
            if let Some(value) = child.find(path, params) {
                return Some(value);
            }
        }
        params.truncate(checkpoint);
        None
    }

    // The demarcator for a slot at section `index` is the next
    // character the edge expects after it or, when the slot ends the
    // edge, the head of any child edge. A non-wildcard slot never
    // consumes a '/'. Returns the byte length of the admissible run.
    fn demarcate(&self, index: usize, path: &str) -> usize {
        let mut stops = Vec::new();
        match self.sections.0[index + 1..].iter().find(|s| !s.is_slot()) {
            Some(Section::Path { value }) => stops.extend(value.chars().next()),
            Some(_) => {}
            None => {
                for child in &self.children {
                    if let Some(Atom::Char(c)) = child.sections.at(0) {
                        stops.push(c);
                    }
                }
            }
        }
        path.find(|c: char| c == '/' || stops.contains(&c))
            .unwrap_or(path.len())
    }

    fn starts_with_slot(&self) -> bool {
        matches!(self.sections.at(0), Some(Atom::Slot(_)))
    }

    fn for_each<'n, F>(&'n self, f: &mut F)
    where
        F: FnMut(&'n Pattern, &'n T),
    {
        if let Some(value) = &self.value {
            f(&value.pattern, &value.handler);
        }
        for child in &self.children {
            child.for_each(f);
        }
    }
}

fn longest_common_prefix(a: &Sections, b: &Sections) -> usize {
    let max = a.len().min(b.len());
    let mut i = 0;
    while i < max && a.at(i) == b.at(i) {
        i += 1;
    }
    i
}

// "/" is left alone; anything else loses every trailing slash
pub(crate) fn trim_trailing_slash(input: &str) -> &str {
    if input == "/" {
        return input;
    }
    input.trim_end_matches('/')
}

impl<T> fmt::Display for Tree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.root {
            Some(root) => root.write(f, ""),
            None => Ok(()),
        }
    }
}

impl<T> Node<T> {
    fn write(&self, f: &mut fmt::Formatter<'_>, indent: &str) -> fmt::Result {
        let edge = self.sections.to_string();
        write!(f, "{}{}", indent, edge)?;
        if let Some(value) = &self.value {
            write!(f, " [routable={}]", value.pattern)?;
        }
        writeln!(f)?;
        let indent = format!("{}{}", indent, "•".repeat(edge.chars().count()));
        for child in &self.children {
            child.write(f, &indent)?;
        }
        Ok(())
    }
}
