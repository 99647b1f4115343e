//! A module to handle the indentation [`Formatter`].
//!
//! The formatter consumes the token stream of a [`Tokenizer`] and writes
//! indented output to a [`Write`](std::io::Write) sink. It owns the indent
//! counters,
//! an `xml:space="preserve"` stack built from the tokens it observes, and
//! the small amount of per-token context needed to decide when a line break
//! is emitted and when it is suppressed.
//!
//! Two disciplines are supported: full pretty-printing, which reshapes all
//! whitespace between tags, and indent-only mode, which keeps the author's
//! line structure and rewrites nothing but the leading whitespace of each
//! line.

mod builder;

use std::io::Write;

use delegate::delegate;

use crate::errors::Result;
use crate::path::{self, PathMode};
use crate::tokenizer::{strip_quotes, PreserveStack, Tokenizer};
use crate::tokens::{Token, TokenKind, TokenSet};

pub use self::builder::FormatterBuilder;

/// Formatting configuration.
///
/// The field set mirrors what [`FormatterBuilder`] exposes; construct it
/// through the builder unless every field is spelled out.
#[derive(Debug, Clone)]
pub struct FormatParams {
    /// String written once per indent level.
    pub indent_chars: String,
    /// String written as a line break.
    pub eol_chars: String,
    /// Cap on the indent multiplier; zero means unlimited.
    pub max_indent_level: usize,
    /// Keep output well formed (no breaks inside mixed content, collapse
    /// only matching element pairs).
    pub ensure_conformity: bool,
    /// Rewrite `<a></a>` with an exactly empty body as `<a/>`.
    pub auto_close_tags: bool,
    /// One attribute per line, a level deeper than the element. Ignored in
    /// indent-only mode.
    pub indent_attributes: bool,
    /// Keep existing line breaks; only rewrite leading whitespace.
    pub indent_only: bool,
    /// Pass `xml:space="preserve"` scopes through verbatim.
    pub apply_space_preserve: bool,
    /// Attribute names rendered as predicates by the path builder.
    pub identity_attributes: Vec<String>,
}

impl Default for FormatParams {
    fn default() -> Self {
        Self {
            indent_chars: "\t".to_string(),
            eol_chars: "\n".to_string(),
            max_indent_level: 0,
            ensure_conformity: true,
            auto_close_tags: false,
            indent_attributes: false,
            indent_only: false,
            apply_space_preserve: true,
            identity_attributes: Vec::new(),
        }
    }
}

const CLOSING_END: TokenSet = TokenSet::new(&[TokenKind::TagClosingEnd]);

/// Translates a token stream into indented output.
///
/// A formatter binds to one source buffer and one sink. After a completed
/// run, [`reset`](Self::reset) reinitializes the cursor, both counters, the
/// preserve stack and the look-ahead queue so the same buffer can be
/// formatted again; [`into_inner`](Self::into_inner) releases the sink.
///
/// # Examples
///
/// ```
/// use xml_indent::Formatter;
///
/// let mut formatter = Formatter::new(b"<a><b/></a>", Vec::new());
/// formatter.pretty_print().unwrap();
/// assert_eq!(formatter.into_inner(), b"<a>\n\t<b/>\n</a>\n");
/// ```
pub struct Formatter<'s, W> {
    tokenizer: Tokenizer<'s>,
    out: W,
    params: FormatParams,
    /// Unbounded logical depth; the written indent is this value clamped to
    /// `max_indent_level`.
    level_counter: usize,
    /// Kind of the last token that produced output.
    last: TokenKind,
    /// Output is empty or currently ends with a line break.
    at_line_start: bool,
    wrote_any: bool,
    preserve: PreserveStack,
    pending_preserve: bool,
    space_attr_armed: bool,
    /// `(offset, len)` of the `TagOpening` token of each open element.
    open_names: Vec<(usize, usize)>,
    /// Whether each open element has had a child tag or block so far.
    had_children: Vec<bool>,
    /// Attributes seen in the opening tag currently being written.
    attr_count: usize,
}

impl Formatter<'static, ()> {
    /// Creates a new builder for configuring a formatter.
    pub fn builder() -> FormatterBuilder {
        FormatterBuilder::new()
    }
}

impl<'s, W: Write> Formatter<'s, W> {
    /// Creates a formatter with default parameters.
    pub fn new(source: &'s [u8], out: W) -> Self {
        Self::with_params(source, FormatParams::default(), out)
    }

    /// Creates a formatter bound to `source` and `out` with the given
    /// parameters.
    pub fn with_params(source: &'s [u8], params: FormatParams, out: W) -> Self {
        Self {
            tokenizer: Tokenizer::from_bytes(source),
            out,
            params,
            level_counter: 0,
            last: TokenKind::Undefined,
            at_line_start: true,
            wrote_any: false,
            preserve: PreserveStack::new(),
            pending_preserve: false,
            space_attr_armed: false,
            open_names: Vec::new(),
            had_children: Vec::new(),
            attr_count: 0,
        }
    }

    delegate! {
        to self.tokenizer {
            /// The source buffer being formatted.
            pub fn source(&self) -> &'s [u8];
            /// Current byte position of the underlying tokenizer.
            pub fn buffer_position(&self) -> usize;
        }
    }

    /// The active configuration.
    pub fn params(&self) -> &FormatParams {
        &self.params
    }

    /// The preserve stack as observed at the formatter's position in the
    /// token stream. Its depth equals the current open-element depth.
    pub fn preserve_stack(&self) -> &PreserveStack {
        &self.preserve
    }

    /// Gets a reference to the output sink.
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Gets a mutable reference to the output sink.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.out
    }

    /// Consumes the formatter, returning the output sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Reinitializes the tokenizer cursor, both counters, the preserve
    /// stack and the look-ahead queue. The sink is left untouched.
    pub fn reset(&mut self) {
        self.tokenizer.reset();
        self.level_counter = 0;
        self.last = TokenKind::Undefined;
        self.at_line_start = true;
        self.wrote_any = false;
        self.preserve.clear();
        self.pending_preserve = false;
        self.space_attr_armed = false;
        self.open_names.clear();
        self.had_children.clear();
        self.attr_count = 0;
    }

    /// Renders a path expression for the element containing the given byte
    /// position, using this formatter's source and identity attributes.
    pub fn current_path(&self, position: usize, mode: PathMode) -> String {
        path::current_path(
            self.tokenizer.source(),
            position,
            mode,
            &self.params.identity_attributes,
        )
    }

    /// Drives the tokenizer to completion, writing indented output to the
    /// sink. Malformed input never fails; only sink errors propagate.
    pub fn pretty_print(&mut self) -> Result<()> {
        loop {
            let token = self.tokenizer.parse_next();
            if token.kind() == TokenKind::EndOfFile {
                break;
            }
            if self.in_preserve() {
                self.print_preserved(token)?;
            } else if self.params.indent_only {
                self.print_indent_only(token)?;
            } else {
                self.print_pretty(token)?;
            }
        }
        if self.wrote_any && !self.at_line_start {
            self.write_eol()?;
        }
        Ok(())
    }

    /// Emits every structural and text token adjacently, stripping
    /// whitespace and line breaks outside preserve scopes.
    pub fn linearize(&mut self) -> Result<()> {
        loop {
            let token = self.tokenizer.parse_next();
            let kind = token.kind();
            if kind == TokenKind::EndOfFile {
                return Ok(());
            }
            let in_preserve = self.in_preserve();
            match kind {
                TokenKind::Whitespace | TokenKind::LineBreak if !in_preserve => continue,
                TokenKind::TagOpening => self.note_open(&token),
                TokenKind::AttrName => {
                    if !in_preserve {
                        self.emit_raw(b" ")?;
                    }
                    self.note_attr(&token);
                }
                TokenKind::AttrValue => self.note_attr(&token),
                TokenKind::TagOpeningEnd => self.note_opening_end(),
                TokenKind::TagSelfClosingEnd => self.note_self_close(),
                TokenKind::TagClosing => {
                    self.note_close();
                }
                TokenKind::TagClosingEnd => self.note_closing_end(),
                _ => {}
            }
            self.emit_token(&token)?;
            self.last = kind;
        }
    }

    /// Whether formatting is currently suspended by a preserve scope.
    fn in_preserve(&self) -> bool {
        self.params.apply_space_preserve && self.preserve.top()
    }

    /// The number of `indent_chars` repetitions for the current depth.
    fn indent_width(&self) -> usize {
        if self.params.max_indent_level > 0 {
            self.level_counter.min(self.params.max_indent_level)
        } else {
            self.level_counter
        }
    }

    fn emit_raw(&mut self, bytes: &[u8]) -> Result<()> {
        self.out.write_all(bytes)?;
        if let Some(&last) = bytes.last() {
            self.at_line_start = last == b'\n' || last == b'\r';
            self.wrote_any = true;
        }
        Ok(())
    }

    fn emit_token(&mut self, token: &Token) -> Result<()> {
        let bytes = token.slice(self.tokenizer.source());
        self.emit_raw(bytes)
    }

    fn write_eol(&mut self) -> Result<()> {
        self.out.write_all(self.params.eol_chars.as_bytes())?;
        self.at_line_start = true;
        Ok(())
    }

    fn write_indent(&mut self) -> Result<()> {
        for _ in 0..self.indent_width() {
            self.out.write_all(self.params.indent_chars.as_bytes())?;
        }
        Ok(())
    }

    /// Breaks the line before a block-level token, unless the output is
    /// still empty or mixed content keeps it glued to preceding text.
    fn block_break(&mut self) -> Result<()> {
        if !self.wrote_any {
            return Ok(());
        }
        if self.params.ensure_conformity && self.last == TokenKind::Text {
            return Ok(());
        }
        if !self.at_line_start {
            self.write_eol()?;
        }
        self.write_indent()
    }

    /// Marks the innermost open element as having block content.
    fn mark_parent(&mut self) {
        if let Some(had) = self.had_children.last_mut() {
            *had = true;
        }
    }

    fn note_open(&mut self, token: &Token) {
        self.mark_parent();
        self.had_children.push(false);
        self.open_names.push((token.offset(), token.len()));
        self.level_counter += 1;
        self.attr_count = 0;
        self.pending_preserve = false;
        self.space_attr_armed = false;
    }

    fn note_attr(&mut self, token: &Token) {
        match token.kind() {
            TokenKind::AttrName => {
                let is_space = token.slice(self.tokenizer.source()) == b"xml:space";
                self.space_attr_armed = is_space;
                self.attr_count += 1;
            }
            TokenKind::AttrValue => {
                let value = strip_quotes(token.slice(self.tokenizer.source()));
                if self.space_attr_armed && value == b"preserve" {
                    self.pending_preserve = true;
                }
                self.space_attr_armed = false;
            }
            _ => {}
        }
    }

    fn note_opening_end(&mut self) {
        self.preserve
            .push(self.pending_preserve || self.preserve.top());
        self.pending_preserve = false;
        self.attr_count = 0;
    }

    fn note_self_close(&mut self) {
        self.had_children.pop();
        self.open_names.pop();
        self.level_counter = self.level_counter.saturating_sub(1);
        self.pending_preserve = false;
        self.attr_count = 0;
    }

    /// Closing-tag bookkeeping; returns whether the element had block
    /// content (which decides the break before `</name`).
    fn note_close(&mut self) -> bool {
        self.level_counter = self.level_counter.saturating_sub(1);
        self.open_names.pop();
        self.had_children.pop().unwrap_or(false)
    }

    fn note_closing_end(&mut self) {
        self.preserve.pop();
    }

    /// Rewrites `<a></a>` into `<a/>` when the structural look-ahead shows
    /// a matching closing tag with nothing at all in between. Returns
    /// whether the rewrite was applied (the `>` token is then consumed
    /// along with the closing pair).
    fn try_auto_close(&mut self, token: &Token) -> Result<bool> {
        let next = self.tokenizer.next_structure_token();
        if next.kind() != TokenKind::TagClosing || next.offset() != token.end() {
            return Ok(false);
        }
        let source = self.tokenizer.source();
        let closing = &source[next.offset() + 2..next.end()];
        let matches = self
            .open_names
            .last()
            .map_or(false, |&(off, len)| &source[off + 1..off + len] == closing);
        if self.params.ensure_conformity && !matches {
            return Ok(false);
        }
        self.tokenizer.parse_until(CLOSING_END);
        self.emit_raw(b"/>")?;
        self.had_children.pop();
        self.open_names.pop();
        self.level_counter = self.level_counter.saturating_sub(1);
        self.pending_preserve = false;
        self.attr_count = 0;
        self.last = TokenKind::TagSelfClosingEnd;
        Ok(true)
    }

    /// Handles one token in full pretty-print mode.
    fn print_pretty(&mut self, token: Token) -> Result<()> {
        let kind = token.kind();
        match kind {
            TokenKind::TagOpening => {
                self.block_break()?;
                self.emit_token(&token)?;
                self.note_open(&token);
            }
            TokenKind::AttrName => {
                if self.params.indent_attributes && self.attr_count > 0 {
                    self.write_eol()?;
                    self.write_indent()?;
                } else {
                    self.emit_raw(b" ")?;
                }
                self.note_attr(&token);
                self.emit_token(&token)?;
            }
            TokenKind::Equal => self.emit_token(&token)?,
            TokenKind::AttrValue => {
                self.note_attr(&token);
                self.emit_token(&token)?;
            }
            TokenKind::TagOpeningEnd => {
                if self.params.auto_close_tags && self.try_auto_close(&token)? {
                    return Ok(());
                }
                self.emit_token(&token)?;
                self.note_opening_end();
            }
            TokenKind::TagSelfClosingEnd => {
                self.emit_token(&token)?;
                self.note_self_close();
            }
            TokenKind::TagClosing => {
                let had_children = self.note_close();
                let mixed = self.params.ensure_conformity && self.last == TokenKind::Text;
                if had_children && !mixed && self.wrote_any {
                    if !self.at_line_start {
                        self.write_eol()?;
                    }
                    self.write_indent()?;
                }
                self.emit_token(&token)?;
            }
            TokenKind::TagClosingEnd => {
                self.emit_token(&token)?;
                self.note_closing_end();
            }
            TokenKind::Comment
            | TokenKind::CDATA
            | TokenKind::Instruction
            | TokenKind::DeclarationSelfClosing => {
                self.mark_parent();
                self.block_break()?;
                self.emit_token(&token)?;
            }
            TokenKind::DeclarationBeg => {
                self.mark_parent();
                self.block_break()?;
                self.emit_token(&token)?;
                self.level_counter += 1;
            }
            TokenKind::DeclarationEnd => {
                self.level_counter = self.level_counter.saturating_sub(1);
                if self.wrote_any {
                    if !self.at_line_start {
                        self.write_eol()?;
                    }
                    self.write_indent()?;
                }
                self.emit_token(&token)?;
            }
            TokenKind::Text => self.emit_token(&token)?,
            // Pretty mode regenerates all inter-token whitespace itself.
            TokenKind::Whitespace | TokenKind::LineBreak => return Ok(()),
            TokenKind::EndOfFile | TokenKind::Undefined => return Ok(()),
        }
        self.last = kind;
        Ok(())
    }

    /// Handles one token in indent-only mode: line breaks pass through
    /// verbatim, leading whitespace of each line is replaced by the
    /// computed indentation, everything else is written as it came.
    fn print_indent_only(&mut self, token: Token) -> Result<()> {
        let kind = token.kind();
        match kind {
            TokenKind::LineBreak => return self.emit_token(&token),
            TokenKind::Whitespace => {
                if self.at_line_start {
                    // Replaced by the indentation of the next token.
                    return Ok(());
                }
                return self.emit_token(&token);
            }
            _ => {}
        }

        // The level must drop before this line is indented.
        match kind {
            TokenKind::TagClosing => {
                self.note_close();
            }
            TokenKind::DeclarationEnd => {
                self.level_counter = self.level_counter.saturating_sub(1);
            }
            _ => {}
        }
        if self.at_line_start {
            self.write_indent()?;
            self.at_line_start = false;
        }
        if kind == TokenKind::TagOpeningEnd
            && self.params.auto_close_tags
            && self.try_auto_close(&token)?
        {
            return Ok(());
        }
        self.emit_token(&token)?;
        match kind {
            TokenKind::TagOpening => self.note_open(&token),
            TokenKind::AttrName | TokenKind::AttrValue => self.note_attr(&token),
            TokenKind::TagOpeningEnd => self.note_opening_end(),
            TokenKind::TagSelfClosingEnd => self.note_self_close(),
            TokenKind::TagClosingEnd => self.note_closing_end(),
            TokenKind::DeclarationBeg => self.level_counter += 1,
            TokenKind::Comment
            | TokenKind::CDATA
            | TokenKind::Instruction
            | TokenKind::DeclarationSelfClosing => self.mark_parent(),
            _ => {}
        }
        self.last = kind;
        Ok(())
    }

    /// Handles one token inside a preserve scope: bookkeeping still runs,
    /// emission is verbatim and no breaks or indentation are produced.
    fn print_preserved(&mut self, token: Token) -> Result<()> {
        let kind = token.kind();
        match kind {
            TokenKind::TagOpening => self.note_open(&token),
            TokenKind::AttrName | TokenKind::AttrValue => self.note_attr(&token),
            TokenKind::TagOpeningEnd => self.note_opening_end(),
            TokenKind::TagSelfClosingEnd => self.note_self_close(),
            TokenKind::TagClosing => {
                self.note_close();
            }
            TokenKind::TagClosingEnd => self.note_closing_end(),
            TokenKind::DeclarationBeg => self.level_counter += 1,
            TokenKind::DeclarationEnd => {
                self.level_counter = self.level_counter.saturating_sub(1);
            }
            _ => {}
        }
        self.emit_token(&token)?;
        self.last = kind;
        Ok(())
    }
}
