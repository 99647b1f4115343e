//! A module to handle the streaming XML [`Tokenizer`].
//!
//! The tokenizer is a lexical classifier, not a validating parser: its
//! contract is that every byte of the source is accounted for by exactly one
//! token and that structural boundaries are identified correctly even in the
//! presence of quoted attribute values and nested declaration brackets.
//! Malformed input never produces an error; unterminated constructs simply
//! extend to the end of the buffer.

pub(crate) mod cursor;

use std::collections::VecDeque;

use delegate::delegate;

use crate::tokens::{ParseContext, Token, TokenKind, TokenSet};

use self::cursor::{is_name_start, is_whitespace, Cursor};

/// Bytes that terminate an attribute name.
#[inline]
fn ends_attr_name(b: u8) -> bool {
    is_whitespace(b) || matches!(b, b'=' | b'>' | b'/' | b'"' | b'\'')
}

/// An ordered stack of booleans tracking `xml:space="preserve"` scoping,
/// one entry per open element.
///
/// The top of the stack answers "is the current scope preserving
/// whitespace?". An empty stack means no scope is open and nothing is
/// preserved. This is an explicit data structure rather than tokenizer
/// internals so that consumers such as the path builder can inspect it.
#[derive(Debug, Clone, Default)]
pub struct PreserveStack {
    flags: Vec<bool>,
}

impl PreserveStack {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes the preserve flag of a newly completed opening tag.
    pub fn push(&mut self, preserve: bool) {
        self.flags.push(preserve);
    }

    /// Pops the flag of a closed element. Popping an empty stack is a
    /// no-op, matching the tolerance for mismatched closing tags.
    pub fn pop(&mut self) -> Option<bool> {
        self.flags.pop()
    }

    /// Whether the current scope preserves whitespace.
    pub fn top(&self) -> bool {
        self.flags.last().copied().unwrap_or(false)
    }

    /// Current open-element depth.
    pub fn depth(&self) -> usize {
        self.flags.len()
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.flags.clear();
    }
}

/// A streaming tokenizer over an immutable byte buffer.
///
/// Tokens are produced one at a time by [`parse_next`](Self::parse_next);
/// [`next_structure_token`](Self::next_structure_token) looks ahead past
/// textual noise without losing the skipped tokens.
///
/// # Examples
///
/// ```
/// use xml_indent::tokens::TokenKind;
/// use xml_indent::Tokenizer;
///
/// let xml = b"<greeting lang=\"en\">hi</greeting>";
/// let mut tokenizer = Tokenizer::from_bytes(xml);
///
/// let first = tokenizer.parse_next();
/// assert_eq!(first.kind(), TokenKind::TagOpening);
/// assert_eq!(first.slice(xml), b"<greeting");
/// ```
#[derive(Clone)]
pub struct Tokenizer<'s> {
    cursor: Cursor<'s>,
    ctx: ParseContext,
    /// Tokens produced by a look-ahead, drained before the cursor moves on.
    pending: VecDeque<Token>,
    preserve: PreserveStack,
    /// `xml:space="preserve"` was seen in the opening tag being parsed.
    pending_preserve: bool,
    /// The last attribute name was `xml:space`.
    space_attr_armed: bool,
    /// An `=` was consumed and its value has not been, so a bare word is an
    /// unquoted attribute value rather than the next attribute name.
    after_equal: bool,
}

impl<'s> Tokenizer<'s> {
    /// Creates a tokenizer over a byte buffer.
    pub fn from_bytes(source: &'s [u8]) -> Self {
        Self {
            cursor: Cursor::new(source),
            ctx: ParseContext::default(),
            pending: VecDeque::new(),
            preserve: PreserveStack::new(),
            pending_preserve: false,
            space_attr_armed: false,
            after_equal: false,
        }
    }

    /// Creates a tokenizer over a string slice.
    pub fn from_str(source: &'s str) -> Self {
        Self::from_bytes(source.as_bytes())
    }

    delegate! {
        to self.cursor {
            /// The source buffer this tokenizer reads from.
            pub fn source(&self) -> &'s [u8];
            /// Current byte position of the cursor. Tokens buffered by a
            /// look-ahead have already moved it.
            #[call(pos)]
            pub fn buffer_position(&self) -> usize;
        }
    }

    /// Snapshot of the current parsing context.
    pub fn context(&self) -> ParseContext {
        self.ctx
    }

    /// The `xml:space` scope stack as observed at the tokenizer's position.
    pub fn preserve_stack(&self) -> &PreserveStack {
        &self.preserve
    }

    /// Whether the scope at the tokenizer's position preserves whitespace.
    pub fn is_space_preserve(&self) -> bool {
        self.preserve.top()
    }

    /// Like [`is_space_preserve`](Self::is_space_preserve), but takes the
    /// parsing context into account: mid-opening-tag, the element being
    /// opened has not pushed its scope yet, so a `xml:space="preserve"`
    /// already seen on it counts.
    pub fn is_space_preserve_in_context(&self) -> bool {
        if self.ctx.in_opening_tag {
            self.pending_preserve || self.preserve.top()
        } else {
            self.preserve.top()
        }
    }

    /// Reinitializes the cursor, the parsing context, the look-ahead queue
    /// and the preserve stack, so the same buffer can be tokenized again.
    pub fn reset(&mut self) {
        self.cursor.reset();
        self.ctx = ParseContext::default();
        self.pending.clear();
        self.preserve.clear();
        self.pending_preserve = false;
        self.space_attr_armed = false;
        self.after_equal = false;
    }

    /// Produces the next token, advancing the tokenizer.
    ///
    /// Tokens buffered by [`next_structure_token`](Self::next_structure_token)
    /// are drained first. Once the buffer is exhausted,
    /// [`TokenKind::EndOfFile`] is returned on every call.
    pub fn parse_next(&mut self) -> Token {
        if let Some(token) = self.pending.pop_front() {
            return token;
        }
        self.parse_token()
    }

    /// Parses forward until a token whose kind is in `mask` is produced and
    /// returns it. Returns the [`TokenKind::EndOfFile`] token if no such
    /// kind occurs in the rest of the input.
    pub fn parse_until(&mut self, mask: TokenSet) -> Token {
        loop {
            let token = self.parse_next();
            if mask.contains(token.kind()) || token.kind() == TokenKind::EndOfFile {
                return token;
            }
        }
    }

    /// Returns the next structural token, skipping `Text`, `Whitespace` and
    /// `LineBreak` without losing them.
    ///
    /// Skipped tokens and the returned one are queued, so subsequent
    /// [`parse_next`](Self::parse_next) calls replay them in order. Repeated
    /// calls without an intervening `parse_next` return the same token. The
    /// cursor is never rewound; rewinding would re-apply the context
    /// mutations of the skipped tokens.
    pub fn next_structure_token(&mut self) -> Token {
        if let Some(token) = self
            .pending
            .iter()
            .copied()
            .find(|t| t.kind().is_structural())
        {
            return token;
        }
        loop {
            let token = self.parse_token();
            self.pending.push_back(token);
            if token.kind().is_structural() {
                return token;
            }
        }
    }

    fn make(&self, kind: TokenKind, start: usize) -> Token {
        Token::new(kind, start, self.cursor.pos() - start, self.ctx)
    }

    /// Classifies and consumes the next lexeme at the cursor.
    fn parse_token(&mut self) -> Token {
        if self.cursor.is_eof() {
            return self.make(TokenKind::EndOfFile, self.cursor.pos());
        }
        if self.ctx.in_opening_tag || self.ctx.in_closing_tag {
            return self.parse_in_tag();
        }

        let start = self.cursor.pos();
        let byte = match self.cursor.peek() {
            Some(byte) => byte,
            None => return self.make(TokenKind::EndOfFile, start),
        };
        match byte {
            b'<' => self.parse_markup(),
            b'\r' | b'\n' => {
                self.cursor.skip_while(|b| b == b'\r' || b == b'\n');
                self.make(TokenKind::LineBreak, start)
            }
            b' ' | b'\t' => {
                self.cursor.skip_while(|b| b == b' ' || b == b'\t');
                self.make(TokenKind::Whitespace, start)
            }
            b']' if self.ctx.declaration_depth > 0 && self.cursor.peek_at(1) == Some(b'>') => {
                self.cursor.advance(2);
                self.ctx.declaration_depth -= 1;
                self.make(TokenKind::DeclarationEnd, start)
            }
            _ => self.parse_text(),
        }
    }

    /// Parses a token starting at a `<`.
    fn parse_markup(&mut self) -> Token {
        let start = self.cursor.pos();
        match self.cursor.peek_at(1) {
            Some(b'?') => self.parse_delimited(start, 2, b"?>", TokenKind::Instruction),
            Some(b'!') => {
                if self.cursor.starts_with(b"<!--") {
                    self.parse_delimited(start, 4, b"-->", TokenKind::Comment)
                } else if self.cursor.starts_with(b"<![CDATA[") {
                    self.parse_delimited(start, 9, b"]]>", TokenKind::CDATA)
                } else {
                    self.parse_declaration(start)
                }
            }
            Some(b'/') => {
                self.cursor.advance(2);
                self.cursor.read_name();
                self.ctx.in_closing_tag = true;
                self.make(TokenKind::TagClosing, start)
            }
            Some(b) if is_name_start(b) => {
                self.cursor.advance(1);
                self.cursor.read_name();
                self.ctx.in_opening_tag = true;
                self.pending_preserve = false;
                self.space_attr_armed = false;
                self.after_equal = false;
                self.make(TokenKind::TagOpening, start)
            }
            // A stray `<` that opens nothing: pass it through as text.
            _ => {
                self.cursor.advance(1);
                self.make(TokenKind::Text, start)
            }
        }
    }

    /// Consumes a construct running from `skip` bytes past the cursor to
    /// `terminator` inclusive. Unterminated constructs span to the end of
    /// the buffer.
    fn parse_delimited(
        &mut self,
        start: usize,
        skip: usize,
        terminator: &[u8],
        kind: TokenKind,
    ) -> Token {
        self.cursor.advance(skip);
        match self.cursor.find_subslice(terminator) {
            Some(i) => self.cursor.advance(i + terminator.len()),
            None => self.cursor.advance_to_end(),
        }
        self.make(kind, start)
    }

    /// Parses a `<!…` declaration opening.
    ///
    /// A `[` before the closing `>` starts an internal subset: the token is
    /// a [`TokenKind::DeclarationBeg`] spanning through the bracket and the
    /// declaration depth rises, so an inner `>` cannot terminate the outer
    /// construct. Otherwise the whole declaration is one
    /// [`TokenKind::DeclarationSelfClosing`] token. Quoted strings are
    /// skipped while searching, so `<!ENTITY e "a>b">` stays intact.
    fn parse_declaration(&mut self, start: usize) -> Token {
        self.cursor.advance(2);
        match self.cursor.find_first_of_skip_quoted(b"[>") {
            Some((i, b'[')) => {
                self.cursor.advance(i + 1);
                self.ctx.declaration_depth += 1;
                self.make(TokenKind::DeclarationBeg, start)
            }
            Some((i, _)) => {
                self.cursor.advance(i + 1);
                self.make(TokenKind::DeclarationSelfClosing, start)
            }
            None => {
                self.cursor.advance_to_end();
                self.make(TokenKind::DeclarationSelfClosing, start)
            }
        }
    }

    /// Parses character data up to the next markup or line break. Trailing
    /// blanks are left for the following `Whitespace` token so they stay
    /// adjacent to the structural boundary.
    fn parse_text(&mut self) -> Token {
        let start = self.cursor.pos();
        let len = match self.cursor.find_first_of(b"<\r\n") {
            Some((i, _)) => i,
            None => self.cursor.rest().len(),
        };
        let run = &self.cursor.rest()[..len];
        let kept = run
            .iter()
            .rposition(|&b| b != b' ' && b != b'\t')
            .map_or(0, |p| p + 1);
        // Text never starts with a blank here; the dispatcher routes those
        // to the whitespace arm.
        debug_assert!(kept > 0);
        self.cursor.advance(kept.max(1));
        self.make(TokenKind::Text, start)
    }

    /// Parses the next token inside an opening or closing tag.
    fn parse_in_tag(&mut self) -> Token {
        let start = self.cursor.pos();
        let byte = match self.cursor.peek() {
            Some(byte) => byte,
            None => return self.make(TokenKind::EndOfFile, start),
        };
        match byte {
            b' ' | b'\t' => {
                self.cursor.skip_while(|b| b == b' ' || b == b'\t');
                self.make(TokenKind::Whitespace, start)
            }
            b'\r' | b'\n' => {
                self.cursor.skip_while(|b| b == b'\r' || b == b'\n');
                self.make(TokenKind::LineBreak, start)
            }
            b'>' => {
                self.cursor.advance(1);
                if self.ctx.in_closing_tag {
                    self.ctx.in_closing_tag = false;
                    let token = self.make(TokenKind::TagClosingEnd, start);
                    self.preserve.pop();
                    token
                } else {
                    self.ctx.in_opening_tag = false;
                    let token = self.make(TokenKind::TagOpeningEnd, start);
                    self.preserve
                        .push(self.pending_preserve || self.preserve.top());
                    self.pending_preserve = false;
                    token
                }
            }
            b'/' if self.cursor.peek_at(1) == Some(b'>') => {
                self.cursor.advance(2);
                self.ctx.in_opening_tag = false;
                self.ctx.in_closing_tag = false;
                // A self-closing element opens no scope; a preserve seen in
                // its tag has no effect.
                self.pending_preserve = false;
                self.make(TokenKind::TagSelfClosingEnd, start)
            }
            b'=' => {
                self.cursor.advance(1);
                self.after_equal = true;
                self.make(TokenKind::Equal, start)
            }
            b'"' | b'\'' => {
                let value = self.cursor.read_quoted();
                self.note_attr_value(value);
                self.make(TokenKind::AttrValue, start)
            }
            _ => {
                let word = self.cursor.take_while(|b| !ends_attr_name(b));
                if word.is_empty() {
                    // A lone `/` or other stray byte: pass it through.
                    self.cursor.advance(1);
                    return self.make(TokenKind::Text, start);
                }
                if self.after_equal {
                    self.note_attr_value(word);
                    self.make(TokenKind::AttrValue, start)
                } else {
                    self.space_attr_armed = word == b"xml:space";
                    self.make(TokenKind::AttrName, start)
                }
            }
        }
    }

    fn note_attr_value(&mut self, value: &[u8]) {
        self.after_equal = false;
        if self.space_attr_armed && strip_quotes(value) == b"preserve" {
            self.pending_preserve = true;
        }
        self.space_attr_armed = false;
    }
}

/// Strips one layer of matching surrounding quotes, if present.
pub(crate) fn strip_quotes(value: &[u8]) -> &[u8] {
    match value {
        [b'"', inner @ .., b'"'] | [b'\'', inner @ .., b'\''] => inner,
        _ => value,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utils::Bytes;
    use pretty_assertions::assert_eq;

    /// Collects every token of `source` until `EndOfFile`.
    fn tokenize(source: &[u8]) -> Vec<Token> {
        let mut tokenizer = Tokenizer::from_bytes(source);
        let mut tokens = Vec::new();
        loop {
            let token = tokenizer.parse_next();
            if token.kind() == TokenKind::EndOfFile {
                return tokens;
            }
            tokens.push(token);
        }
    }

    /// The concatenation of every token's byte range must reproduce the
    /// input exactly: the tokenizer accounts for every byte.
    fn assert_accounted(source: &[u8]) {
        let tokens = tokenize(source);
        let mut rebuilt = Vec::new();
        let mut last_end = 0;
        for token in &tokens {
            assert_eq!(
                token.offset(),
                last_end,
                "gap or overlap before {:?} in {:?}",
                token,
                Bytes(source)
            );
            rebuilt.extend_from_slice(token.slice(source));
            last_end = token.end();
        }
        assert_eq!(Bytes(&rebuilt), Bytes(source));
    }

    #[test]
    fn accounts_for_every_byte() {
        for source in [
            &b"<a><b/></a>"[..],
            b"<a  attr = \"v\" >text</a>",
            b"<?xml version=\"1.0\"?>\n<r><c a='1'/></r>",
            b"<a><!-- note --><![CDATA[x < y]]></a>",
            b"<!DOCTYPE greeting [ <!ELEMENT greeting (#PCDATA)> ]>\r\n<greeting/>",
            b"text only, no markup",
            b"<a>broken",
            b"<!-- unterminated",
            b"<a attr='unterminated",
            b"< not a tag>",
            b"<a>\r\n\t<b>mixed <i>text</i> here</b>\n</a>\n",
        ] {
            assert_accounted(source);
        }
    }

    #[test]
    fn kinds_of_a_simple_element() {
        let source = b"<a href='x'>t</a>";
        let kinds: Vec<_> = tokenize(source).iter().map(|t| t.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::TagOpening,
                TokenKind::Whitespace,
                TokenKind::AttrName,
                TokenKind::Equal,
                TokenKind::AttrValue,
                TokenKind::TagOpeningEnd,
                TokenKind::Text,
                TokenKind::TagClosing,
                TokenKind::TagClosingEnd,
            ]
        );
    }

    #[test]
    fn attr_value_keeps_quotes() {
        let source = br#"<a b="1" c='2'>"#;
        let values: Vec<_> = tokenize(source)
            .into_iter()
            .filter(|t| t.kind() == TokenKind::AttrValue)
            .map(|t| t.slice(source).to_vec())
            .collect();
        assert_eq!(values, vec![b"\"1\"".to_vec(), b"'2'".to_vec()]);
    }

    #[test]
    fn unquoted_attr_value() {
        let source = b"<a b=1>";
        let tokens = tokenize(source);
        assert_eq!(tokens[4].kind(), TokenKind::AttrValue);
        assert_eq!(Bytes(tokens[4].slice(source)), Bytes(b"1"));
    }

    #[test]
    fn instruction_spans_delimiters() {
        let source = b"<?xml version=\"1.0\"?><r/>";
        let tokens = tokenize(source);
        assert_eq!(tokens[0].kind(), TokenKind::Instruction);
        assert_eq!(Bytes(tokens[0].slice(source)), Bytes(b"<?xml version=\"1.0\"?>"));
    }

    #[test]
    fn comment_spans_lines() {
        let source = b"<!-- line one\nline two -->";
        let tokens = tokenize(source);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind(), TokenKind::Comment);
        assert_eq!(tokens[0].len(), source.len());
    }

    #[test]
    fn unterminated_comment_runs_to_eof() {
        let source = b"<!-- open";
        let tokens = tokenize(source);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind(), TokenKind::Comment);
        assert_eq!(tokens[0].len(), source.len());

        let mut tokenizer = Tokenizer::from_bytes(source);
        tokenizer.parse_next();
        assert_eq!(tokenizer.parse_next().kind(), TokenKind::EndOfFile);
        assert_eq!(tokenizer.parse_next().kind(), TokenKind::EndOfFile);
    }

    #[test]
    fn cdata_token() {
        let source = b"<a><![CDATA[if (a < b) x;]]></a>";
        let tokens = tokenize(source);
        assert_eq!(tokens[2].kind(), TokenKind::CDATA);
        assert_eq!(
            Bytes(tokens[2].slice(source)),
            Bytes(b"<![CDATA[if (a < b) x;]]>")
        );
    }

    #[test]
    fn doctype_with_internal_subset() {
        let source = b"<!DOCTYPE greeting [ <!ELEMENT greeting (#PCDATA)> ]>";
        let tokens = tokenize(source);
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::DeclarationBeg,
                TokenKind::Whitespace,
                TokenKind::DeclarationSelfClosing,
                TokenKind::Whitespace,
                TokenKind::DeclarationEnd,
            ]
        );
        assert_eq!(Bytes(tokens[0].slice(source)), Bytes(b"<!DOCTYPE greeting ["));
        assert_eq!(
            Bytes(tokens[2].slice(source)),
            Bytes(b"<!ELEMENT greeting (#PCDATA)>")
        );
        assert_eq!(Bytes(tokens[4].slice(source)), Bytes(b"]>"));
        // The subset tokens carry the declaration depth they sit in.
        assert_eq!(tokens[0].context().declaration_depth, 1);
        assert_eq!(tokens[2].context().declaration_depth, 1);
        assert_eq!(tokens[4].context().declaration_depth, 0);
    }

    #[test]
    fn doctype_without_subset_is_one_token() {
        let source = b"<!DOCTYPE html>";
        let tokens = tokenize(source);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind(), TokenKind::DeclarationSelfClosing);
    }

    #[test]
    fn quoted_gt_does_not_close_declaration() {
        let source = br#"<!ENTITY e "a>b"><x/>"#;
        let tokens = tokenize(source);
        assert_eq!(tokens[0].kind(), TokenKind::DeclarationSelfClosing);
        assert_eq!(Bytes(tokens[0].slice(source)), Bytes(br#"<!ENTITY e "a>b">"#));
    }

    #[test]
    fn parse_until_matches_mask() {
        let mut tokenizer = Tokenizer::from_str("<a>text<b/></a>");
        let mask = TokenSet::new(&[TokenKind::TagSelfClosingEnd]);
        let token = tokenizer.parse_until(mask);
        assert_eq!(token.kind(), TokenKind::TagSelfClosingEnd);

        // Never matched: runs to EndOfFile.
        let token = tokenizer.parse_until(TokenSet::new(&[TokenKind::CDATA]));
        assert_eq!(token.kind(), TokenKind::EndOfFile);
    }

    #[test]
    fn next_structure_token_is_idempotent() {
        let source = b"<a>  \n  <b/></a>";
        let mut tokenizer = Tokenizer::from_bytes(source);
        // Consume `<a` and `>`.
        tokenizer.parse_next();
        tokenizer.parse_next();

        let ahead = tokenizer.next_structure_token();
        assert_eq!(ahead.kind(), TokenKind::TagOpening);
        assert_eq!(Bytes(ahead.slice(source)), Bytes(b"<b"));
        assert_eq!(tokenizer.next_structure_token(), ahead);

        // The skipped noise replays before the structural token.
        assert_eq!(tokenizer.parse_next().kind(), TokenKind::Whitespace);
        assert_eq!(tokenizer.parse_next().kind(), TokenKind::LineBreak);
        assert_eq!(tokenizer.parse_next().kind(), TokenKind::Whitespace);
        assert_eq!(tokenizer.parse_next(), ahead);
    }

    #[test]
    fn preserve_stack_follows_xml_space() {
        let mut tokenizer =
            Tokenizer::from_str(r#"<a xml:space="preserve"><b> x </b></a><c/>"#);
        assert!(!tokenizer.is_space_preserve());

        // Open `<a …>`: scope becomes preserving.
        tokenizer.parse_until(TokenSet::new(&[TokenKind::TagOpeningEnd]));
        assert!(tokenizer.is_space_preserve());
        assert_eq!(tokenizer.preserve_stack().depth(), 1);

        // `<b>` inherits.
        tokenizer.parse_until(TokenSet::new(&[TokenKind::TagOpeningEnd]));
        assert!(tokenizer.is_space_preserve());
        assert_eq!(tokenizer.preserve_stack().depth(), 2);

        // `</b>` pops back into the preserving scope.
        tokenizer.parse_until(TokenSet::new(&[TokenKind::TagClosingEnd]));
        assert!(tokenizer.is_space_preserve());

        // `</a>` leaves it.
        tokenizer.parse_until(TokenSet::new(&[TokenKind::TagClosingEnd]));
        assert!(!tokenizer.is_space_preserve());
        assert_eq!(tokenizer.preserve_stack().depth(), 0);
    }

    #[test]
    fn self_closing_preserve_has_no_effect() {
        let mut tokenizer = Tokenizer::from_str(r#"<a xml:space="preserve"/><b>"#);
        tokenizer.parse_until(TokenSet::new(&[TokenKind::TagSelfClosingEnd]));
        assert!(!tokenizer.is_space_preserve());
        assert_eq!(tokenizer.preserve_stack().depth(), 0);
    }

    #[test]
    fn mid_tag_preserve_query_honors_context() {
        let mut tokenizer = Tokenizer::from_str(r#"<a xml:space="preserve">"#);
        tokenizer.parse_until(TokenSet::new(&[TokenKind::AttrValue]));
        // Still mid-opening-tag: the plain query sees the parent scope, the
        // context-aware one sees the armed flag.
        assert!(!tokenizer.is_space_preserve());
        assert!(tokenizer.is_space_preserve_in_context());
    }

    #[test]
    fn context_snapshot_in_tokens() {
        let source = b"<a b='1'>x</a>";
        let tokens = tokenize(source);
        // Whitespace inside the opening tag is marked as such.
        assert!(tokens[1].context().in_opening_tag);
        // Text between tags is not.
        let text = tokens.iter().find(|t| t.kind() == TokenKind::Text).unwrap();
        assert!(!text.context().in_opening_tag);
        assert!(!text.context().in_closing_tag);
    }

    #[test]
    fn reset_restarts_from_the_top() {
        let source = b"<a/>";
        let mut tokenizer = Tokenizer::from_bytes(source);
        tokenizer.next_structure_token();
        tokenizer.parse_next();
        tokenizer.reset();
        let first = tokenizer.parse_next();
        assert_eq!(first.kind(), TokenKind::TagOpening);
        assert_eq!(first.offset(), 0);
    }

    #[test]
    fn closing_tag_with_trailing_space() {
        let source = b"<a></a >";
        let kinds: Vec<_> = tokenize(source).iter().map(|t| t.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::TagOpening,
                TokenKind::TagOpeningEnd,
                TokenKind::TagClosing,
                TokenKind::Whitespace,
                TokenKind::TagClosingEnd,
            ]
        );
    }
}
