use crate::compile::{compile_fixed_len, compile_flexible_len, expansion_count};
use crate::errors::{MatchError, PatternIssue};
use crate::evaluate::{mask_row, mask_rows};
use crate::matchers::SubMatcher;
use crate::params::MatcherParams;
use crate::window::{RollingMode, WindowFunction, WindowSize};
use itertools::Itertools;
use log::{debug, warn};
use ragged::{RaggedRows, RaggedVec};
use seq_alphabet::Alphabet;

/// A compiled pattern: the union of its fixed-width sub-matchers, possibly of
/// several widths. Immutable once built and cheap to share across threads.
///
/// ```
/// use seq_alphabet::{Alphabet, DNA};
/// use seq_matcher::RegexMatcher;
///
/// let m = RegexMatcher::new("A.{1,2}T", &DNA).unwrap();
/// let mask = m.match_sequence(&DNA.encode(b"ACGT").unwrap());
/// assert_eq!(mask, vec![true, false, false, false]);
/// ```
#[derive(Debug, Clone)]
pub struct RegexMatcher {
    pattern: String,
    sub_matchers: Vec<SubMatcher>,
    params: MatcherParams,
}

impl RegexMatcher {
    pub fn new<A: Alphabet + ?Sized>(pattern: &str, alphabet: &A) -> Result<Self, MatchError> {
        Self::with_params(pattern, alphabet, &MatcherParams::default())
    }

    /// Compile `pattern`, refusing patterns that expand to more than
    /// `params.max_sub_matchers` concrete readings.
    pub fn with_params<A: Alphabet + ?Sized>(
        pattern: &str,
        alphabet: &A,
        params: &MatcherParams,
    ) -> Result<Self, MatchError> {
        let count = expansion_count(pattern)?;
        if count > params.max_sub_matchers as u128 {
            return Err(MatchError::unsupported(
                pattern.as_bytes(),
                PatternIssue::TooManyExpansions {
                    count,
                    limit: params.max_sub_matchers,
                },
            ));
        }
        let sub_matchers = compile_flexible_len(pattern, alphabet)?;
        debug!(
            "compiled {pattern:?} ({} alphabet) into {} sub-matchers of widths {}",
            alphabet.name(),
            sub_matchers.len(),
            sub_matchers.iter().map(SubMatcher::width).unique().join(",")
        );
        Ok(RegexMatcher {
            pattern: pattern.to_string(),
            sub_matchers,
            params: params.clone(),
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn sub_matchers(&self) -> &[SubMatcher] {
        &self.sub_matchers
    }

    pub fn params(&self) -> &MatcherParams {
        &self.params
    }

    /// Match mask of a single encoded sequence.
    pub fn match_sequence(&self, seq: &[u8]) -> Vec<bool> {
        mask_row(&self.sub_matchers, seq)
    }

    /// Match masks of every row, with the same row lengths as `rows`.
    pub fn match_rows<R>(&self, rows: &R) -> RaggedVec<bool>
    where
        R: RaggedRows<Elem = u8> + Sync + ?Sized,
    {
        mask_rows(&self.sub_matchers, rows, &self.params)
    }

    /// Encode text rows with `alphabet`, then match them.
    pub fn match_text_rows<A, I>(&self, texts: I, alphabet: &A) -> Result<RaggedVec<bool>, MatchError>
    where
        A: Alphabet + ?Sized,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut encoded = RaggedVec::new();
        for text in texts {
            encoded.push_row(alphabet.encode(text.as_ref().as_bytes())?);
        }
        Ok(self.match_rows(&encoded))
    }
}

impl WindowFunction for RegexMatcher {
    fn window_size(&self) -> WindowSize {
        WindowSize::PerMatcher(self.sub_matchers.iter().map(SubMatcher::width).collect())
    }

    /// True if any sub-matcher with the window's width accepts it.
    fn call(&self, window: &[u8]) -> Result<bool, MatchError> {
        let mut same_width = self
            .sub_matchers
            .iter()
            .filter(|m| m.width() == window.len())
            .peekable();
        if same_width.peek().is_none() {
            return Err(MatchError::ShapeMismatch {
                expected: self.sub_matchers.first().map_or(0, SubMatcher::width),
                actual: window.len(),
            });
        }
        Ok(same_width.any(|m| m.matches(window)))
    }

    fn rolling_window<R>(&self, rows: &R, mode: RollingMode) -> Result<RaggedVec<bool>, MatchError>
    where
        R: RaggedRows<Elem = u8> + Sync + ?Sized,
        Self: Sized + Sync,
    {
        if mode == RollingMode::Valid {
            warn!(
                "rolling mode 'valid' requested for pattern {:?}, which only supports 'same'; \
                 switching to 'same'",
                self.pattern
            );
        }
        Ok(self.match_rows(rows))
    }
}

/// A pattern without a repetition run: every sub-matcher has the same width,
/// so it behaves as a single fixed-width window function.
#[derive(Debug, Clone)]
pub struct FixedLenRegexMatcher {
    width: usize,
    sub_matchers: Vec<SubMatcher>,
}

impl FixedLenRegexMatcher {
    pub fn new<A: Alphabet + ?Sized>(pattern: &str, alphabet: &A) -> Result<Self, MatchError> {
        let sub_matchers = compile_fixed_len(pattern, alphabet)?;
        let width = sub_matchers.first().map_or(0, SubMatcher::width);
        Ok(FixedLenRegexMatcher {
            width,
            sub_matchers,
        })
    }

    pub fn sub_matchers(&self) -> &[SubMatcher] {
        &self.sub_matchers
    }
}

impl WindowFunction for FixedLenRegexMatcher {
    fn window_size(&self) -> WindowSize {
        WindowSize::Fixed(self.width)
    }

    fn call(&self, window: &[u8]) -> Result<bool, MatchError> {
        if window.len() != self.width {
            return Err(MatchError::ShapeMismatch {
                expected: self.width,
                actual: window.len(),
            });
        }
        Ok(self.sub_matchers.iter().any(|m| m.matches(window)))
    }
}
