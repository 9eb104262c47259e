use seq_alphabet::EncodingError;

/// Why a pattern falls outside the supported dialect.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternIssue {
    #[error("empty character class at position {position}")]
    EmptyClass { position: usize },

    #[error("character class opened at position {position} is never closed")]
    UnterminatedClass { position: usize },

    #[error("character class opened at position {position} contains another class")]
    NestedClass { position: usize },

    #[error("unmatched ']' at position {position}")]
    UnmatchedBracket { position: usize },

    #[error("wildcard '.' inside the character class at position {position}")]
    WildcardInClass { position: usize },

    #[error("unexpected repetition brace at position {position}")]
    UnexpectedBrace { position: usize },

    #[error("only one bounded repetition run is supported, found {count}")]
    MultipleRepetitions { count: usize },

    #[error(
        "malformed repetition bounds {{{bounds}}}; expected {{m,n}} or {{,n}} with \
         non-negative integers"
    )]
    MalformedBounds { bounds: String },

    #[error("repetition upper bound {max} is smaller than the lower bound {min}")]
    InvertedBounds { min: usize, max: usize },

    #[error("only the wildcard '.' can be repeated, found {unit:?}")]
    NonWildcardRepetition { unit: String },

    #[error("the pattern expands to an empty window")]
    EmptyPattern,

    #[error("a gap of up to {max_gap} symbols makes the window wider than usize::MAX")]
    WindowTooWide { max_gap: usize },

    #[error("the pattern expands to {count} concrete readings, more than the limit of {limit}")]
    TooManyExpansions { count: u128, limit: usize },
}

/// Errors produced while compiling or evaluating sequence patterns.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    /// Raised at compile time only. A compiled pattern never fails on syntax.
    #[error("unsupported pattern {pattern:?}: {issue}")]
    UnsupportedPattern { pattern: String, issue: PatternIssue },

    /// A window was handed to a matcher of a different width.
    #[error("window of width {actual} given to a matcher of width {expected}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// A literal symbol, class member or wildcard placeholder is not in the alphabet.
    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

impl MatchError {
    pub(crate) fn unsupported(pattern: &[u8], issue: PatternIssue) -> Self {
        MatchError::UnsupportedPattern {
            pattern: String::from_utf8_lossy(pattern).into_owned(),
            issue,
        }
    }
}
