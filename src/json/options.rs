//! Formatting options for `JSON.GET`.

/// Pretty-print directives for the serialized document the server returns.
///
/// These only change whitespace and escaping in the reply text, never the
/// stored value. Flags are always emitted in the order
/// `INDENT`, `NEWLINE`, `SPACE`, `NOESCAPE`.
///
/// # Example
///
/// ```
/// use flashjson::GetOptions;
///
/// let options = GetOptions::builder().indent("  ").newline("\n").build();
/// assert_eq!(options.to_args(), ["INDENT", "  ", "NEWLINE", "\n"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetOptions {
    indent: Option<String>,
    newline: Option<String>,
    space: Option<String>,
    no_escape: bool,
}

impl GetOptions {
    pub fn builder() -> GetOptionsBuilder {
        GetOptionsBuilder::default()
    }

    pub fn indent(&self) -> Option<&str> {
        self.indent.as_deref()
    }

    pub fn newline(&self) -> Option<&str> {
        self.newline.as_deref()
    }

    pub fn space(&self) -> Option<&str> {
        self.space.as_deref()
    }

    pub fn no_escape(&self) -> bool {
        self.no_escape
    }

    /// True when no directive is set and the command carries no flags.
    pub fn is_empty(&self) -> bool {
        self.indent.is_none() && self.newline.is_none() && self.space.is_none() && !self.no_escape
    }

    /// Protocol tokens in canonical order.
    pub fn to_args(&self) -> Vec<&str> {
        let mut args = Vec::with_capacity(7);
        let pairs = [
            ("INDENT", &self.indent),
            ("NEWLINE", &self.newline),
            ("SPACE", &self.space),
        ];
        for (flag, value) in pairs {
            if let Some(value) = value {
                args.push(flag);
                args.push(value.as_str());
            }
        }
        if self.no_escape {
            args.push("NOESCAPE");
        }
        args
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetOptionsBuilder {
    options: GetOptions,
}

impl GetOptionsBuilder {
    /// String used for each level of nesting.
    pub fn indent(mut self, indent: impl Into<String>) -> Self {
        self.options.indent = Some(indent.into());
        self
    }

    /// String printed at the end of each line.
    pub fn newline(mut self, newline: impl Into<String>) -> Self {
        self.options.newline = Some(newline.into());
        self
    }

    /// String placed between a key and its value.
    pub fn space(mut self, space: impl Into<String>) -> Self {
        self.options.space = Some(space.into());
        self
    }

    pub fn no_escape(mut self, no_escape: bool) -> Self {
        self.options.no_escape = no_escape;
        self
    }

    pub fn build(self) -> GetOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        let options = GetOptions::default();
        assert!(options.is_empty());
        assert!(options.to_args().is_empty());
    }

    #[test]
    fn test_canonical_order_regardless_of_builder_order() {
        let options = GetOptions::builder()
            .no_escape(true)
            .space("_")
            .newline("#")
            .indent("___")
            .build();
        assert_eq!(
            options.to_args(),
            ["INDENT", "___", "NEWLINE", "#", "SPACE", "_", "NOESCAPE"]
        );
    }

    #[test]
    fn test_no_escape_is_bare_flag() {
        let options = GetOptions::builder().no_escape(true).build();
        assert_eq!(options.to_args(), ["NOESCAPE"]);
        assert!(!options.is_empty());
    }

    #[test]
    fn test_repeated_builds_are_identical() {
        let options = GetOptions::builder().indent("\t").space(" ").build();
        assert_eq!(options.to_args(), options.to_args());
        assert_eq!(options.clone().to_args(), ["INDENT", "\t", "SPACE", " "]);
    }

    #[test]
    fn test_empty_string_is_still_emitted() {
        let options = GetOptions::builder().newline("").build();
        assert_eq!(options.to_args(), ["NEWLINE", ""]);
        assert_eq!(options.newline(), Some(""));
        assert_eq!(options.indent(), None);
    }

    #[test]
    fn test_later_setting_wins() {
        let options = GetOptions::builder().indent("a").indent("b").build();
        assert_eq!(options.indent(), Some("b"));
    }
}
