//! Quote tracking shared by the splitter, the tokenizer and the resolver.

/// Lexical region the scanner is currently inside.
///
/// Backticks may open inside double quotes (and close back into them), but
/// nothing nests inside single quotes or inside a backtick region: the next
/// matching delimiter always closes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Quote {
    #[default]
    None,
    Single,
    Double,
    Backtick,
    BacktickInDouble,
}

impl Quote {
    /// State after consuming `c`.
    pub fn step(self, c: char) -> Quote {
        match (self, c) {
            (Quote::None, '\'') => Quote::Single,
            (Quote::None, '"') => Quote::Double,
            (Quote::None, '`') => Quote::Backtick,
            (Quote::Single, '\'') => Quote::None,
            (Quote::Double, '"') => Quote::None,
            (Quote::Double, '`') => Quote::BacktickInDouble,
            (Quote::Backtick, '`') => Quote::None,
            (Quote::BacktickInDouble, '`') => Quote::Double,
            (state, _) => state,
        }
    }

    /// Outside every quote and backtick region.
    pub fn is_plain(self) -> bool {
        self == Quote::None
    }

    /// Name of the construct left open, for syntax errors.
    pub fn describe(self) -> &'static str {
        match self {
            Quote::None => "nothing",
            Quote::Single => "single quote",
            Quote::Double => "double quote",
            Quote::Backtick | Quote::BacktickInDouble => "backtick",
        }
    }
}
