//! Positional path expressions.
//!
//! A scan-only walk over the token stream that answers "which element
//! contains this byte position?" as a `/`-separated path, optionally
//! decorated with namespace prefixes, sibling indexes and identity
//! attribute predicates.

use rustc_hash::FxHashMap;

use crate::tokenizer::{strip_quotes, Tokenizer};
use crate::tokens::TokenKind;

/// Rendering flags for [`current_path`], combinable with `|`.
///
/// ```
/// use xml_indent::path::PathMode;
///
/// let mode = PathMode::INDEX | PathMode::ATTRIBUTES;
/// assert!(mode.contains(PathMode::INDEX));
/// assert!(!mode.contains(PathMode::NAMESPACE));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PathMode(u8);

impl PathMode {
    /// Element names only, namespace prefixes stripped.
    pub const BASIC: Self = Self(0);
    /// Keep `ns:` prefixes in step names.
    pub const NAMESPACE: Self = Self(1 << 0);
    /// Append `[n]`, the 1-based index among same-name siblings.
    pub const INDEX: Self = Self(1 << 1);
    /// Append `[@key='val']` predicates for configured identity attributes.
    pub const ATTRIBUTES: Self = Self(1 << 2);

    /// Tests whether every flag of `other` is set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for PathMode {
    type Output = Self;

    fn bitor(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// One open element on the scan stack.
struct Frame<'s> {
    /// Element name as written, prefix included.
    name: &'s [u8],
    /// 1-based position among preceding same-name siblings.
    index: usize,
    /// Captured identity attributes, in source order.
    attrs: Vec<(&'s [u8], &'s [u8])>,
    /// Same-name child counts, for numbering this element's children.
    child_counts: FxHashMap<&'s [u8], usize>,
}

/// Renders the path of the element containing `position`.
///
/// The scan walks tokens until the target position is passed; the open
/// elements at that point form the path. An empty document or a position
/// before the first element yields `"/"`.
///
/// `identity` lists attribute names whose values are embedded as
/// `[@key='val']` predicates when [`PathMode::ATTRIBUTES`] is set.
pub fn current_path(
    source: &[u8],
    position: usize,
    mode: PathMode,
    identity: &[String],
) -> String {
    let mut tokenizer = Tokenizer::from_bytes(source);
    let mut stack: Vec<Frame> = Vec::new();
    let mut root_counts: FxHashMap<&[u8], usize> = FxHashMap::default();
    let mut last_attr_name: &[u8] = b"";

    loop {
        let token = tokenizer.parse_next();
        if token.kind() == TokenKind::EndOfFile || token.offset() > position {
            break;
        }
        match token.kind() {
            TokenKind::TagOpening => {
                let name = &token.slice(source)[1..];
                let counts = match stack.last_mut() {
                    Some(frame) => &mut frame.child_counts,
                    None => &mut root_counts,
                };
                let index = counts.entry(name).or_insert(0);
                *index += 1;
                let index = *index;
                stack.push(Frame {
                    name,
                    index,
                    attrs: Vec::new(),
                    child_counts: FxHashMap::default(),
                });
            }
            TokenKind::AttrName => {
                last_attr_name = token.slice(source);
            }
            TokenKind::AttrValue => {
                if identity.iter().any(|id| id.as_bytes() == last_attr_name) {
                    if let Some(frame) = stack.last_mut() {
                        frame
                            .attrs
                            .push((last_attr_name, strip_quotes(token.slice(source))));
                    }
                }
            }
            // An element no longer contains the target once the token that
            // retires it ends at or before the target.
            TokenKind::TagSelfClosingEnd | TokenKind::TagClosingEnd
                if token.end() <= position =>
            {
                stack.pop();
            }
            _ => {}
        }
    }

    render(&stack, mode)
}

fn render(stack: &[Frame], mode: PathMode) -> String {
    if stack.is_empty() {
        return "/".to_string();
    }
    let mut out = String::new();
    for frame in stack {
        out.push('/');
        out.push_str(&String::from_utf8_lossy(step_name(frame.name, mode)));
        if mode.contains(PathMode::INDEX) {
            out.push_str(&format!("[{}]", frame.index));
        }
        if mode.contains(PathMode::ATTRIBUTES) {
            for (key, value) in &frame.attrs {
                out.push_str(&format!(
                    "[@{}='{}']",
                    String::from_utf8_lossy(key),
                    String::from_utf8_lossy(value)
                ));
            }
        }
    }
    out
}

/// Strips the `ns:` prefix unless namespaces are requested.
fn step_name(name: &[u8], mode: PathMode) -> &[u8] {
    if mode.contains(PathMode::NAMESPACE) {
        return name;
    }
    match name.iter().position(|&b| b == b':') {
        Some(colon) => &name[colon + 1..],
        None => name,
    }
}
