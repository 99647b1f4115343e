use crate::formatter::{FormatParams, Formatter};

/// Builder for configuring a new [`Formatter`].
///
/// Every option has a chained setter; [`into_formatter`] binds the finished
/// configuration to a source buffer and an output sink.
///
/// ```
/// use xml_indent::FormatterBuilder;
///
/// let mut formatter = FormatterBuilder::new()
///     .indent_chars("  ")
///     .auto_close_tags(true)
///     .into_formatter(b"<a></a>", Vec::new());
/// formatter.pretty_print().unwrap();
/// assert_eq!(formatter.into_inner(), b"<a/>\n");
/// ```
///
/// [`into_formatter`]: Self::into_formatter
#[derive(Debug, Clone, Default)]
pub struct FormatterBuilder {
    params: FormatParams,
}

impl FormatterBuilder {
    /// Creates a builder with the default configuration: one tab per
    /// level, `\n` line breaks, unlimited depth, pretty mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder starting from an existing parameter set.
    pub fn from_params(params: FormatParams) -> Self {
        Self { params }
    }

    /// Changes the string written once per indent level.
    ///
    /// (one tab by default)
    pub fn indent_chars(mut self, val: impl Into<String>) -> Self {
        self.params.indent_chars = val.into();
        self
    }

    /// Changes the string written as a line break.
    ///
    /// (`"\n"` by default)
    pub fn eol_chars(mut self, val: impl Into<String>) -> Self {
        self.params.eol_chars = val.into();
        self
    }

    /// Caps the number of `indent_chars` repetitions per line. Deeper
    /// nesting still counts logically, so rising back out of a deep branch
    /// returns to the correct indentation. Zero means unlimited.
    ///
    /// (`0` by default)
    pub fn max_indent_level(mut self, val: usize) -> Self {
        self.params.max_indent_level = val;
        self
    }

    /// Changes whether the formatter keeps its output well formed, e.g.
    /// never breaks a line inside mixed content and only collapses an
    /// element pair whose names actually match.
    ///
    /// (`true` by default)
    pub fn ensure_conformity(mut self, val: bool) -> Self {
        self.params.ensure_conformity = val;
        self
    }

    /// Changes whether `<a></a>` pairs with nothing at all between them are
    /// rewritten as `<a/>`. A whitespace-only body keeps the pair expanded.
    ///
    /// (`false` by default)
    pub fn auto_close_tags(mut self, val: bool) -> Self {
        self.params.auto_close_tags = val;
        self
    }

    /// Changes whether each attribute after the first is placed on its own
    /// line, one level deeper than its element. Ignored in indent-only
    /// mode, which never inserts line breaks.
    ///
    /// (`false` by default)
    pub fn indent_attributes(mut self, val: bool) -> Self {
        self.params.indent_attributes = val;
        self
    }

    /// Switches between full pretty-printing and indent-only mode. In
    /// indent-only mode existing line breaks are kept as they are and only
    /// the run of leading whitespace of each line is rewritten to match the
    /// element nesting.
    ///
    /// (`false` by default)
    pub fn indent_only(mut self, val: bool) -> Self {
        self.params.indent_only = val;
        self
    }

    /// Changes whether `xml:space="preserve"` scopes suspend formatting
    /// entirely, passing every byte of the scope through verbatim.
    ///
    /// (`true` by default)
    pub fn apply_space_preserve(mut self, val: bool) -> Self {
        self.params.apply_space_preserve = val;
        self
    }

    /// Registers an attribute name as an identity attribute: the path
    /// builder embeds it as a `[@name='value']` predicate in rendered
    /// paths.
    pub fn identity_attribute(mut self, name: impl Into<String>) -> Self {
        self.params.identity_attributes.push(name.into());
        self
    }

    /// The parameter set built so far.
    pub fn params(&self) -> &FormatParams {
        &self.params
    }

    /// Builds a [`Formatter`] bound to the given source buffer and output
    /// sink.
    pub fn into_formatter<'s, W: std::io::Write>(
        self,
        source: &'s [u8],
        out: W,
    ) -> Formatter<'s, W> {
        Formatter::with_params(source, self.params, out)
    }
}
