//! Fixed-width matchers: the units a compiled pattern is made of.

use crate::errors::{MatchError, PatternIssue};
use crate::window::{WindowFunction, WindowSize};
use seq_alphabet::Alphabet;

fn check_width(expected: usize, window: &[u8]) -> Result<(), MatchError> {
    if window.len() == expected {
        Ok(())
    } else {
        Err(MatchError::ShapeMismatch {
            expected,
            actual: window.len(),
        })
    }
}

/// Matches one literal encoded pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactMatcher {
    pattern: Vec<u8>,
}

impl ExactMatcher {
    /// Encode `literal` with `alphabet` and match it exactly.
    pub fn new<A: Alphabet + ?Sized>(literal: &str, alphabet: &A) -> Result<Self, MatchError> {
        if literal.is_empty() {
            return Err(MatchError::unsupported(b"", PatternIssue::EmptyPattern));
        }
        Ok(Self::from_codes(alphabet.encode(literal.as_bytes())?))
    }

    /// Match an already encoded pattern.
    pub fn from_codes(pattern: Vec<u8>) -> Self {
        ExactMatcher { pattern }
    }

    pub fn pattern(&self) -> &[u8] {
        &self.pattern
    }

    pub fn width(&self) -> usize {
        self.pattern.len()
    }

    /// Caller guarantees `window.len() == self.width()`.
    #[inline]
    pub(crate) fn matches(&self, window: &[u8]) -> bool {
        window == self.pattern.as_slice()
    }
}

impl WindowFunction for ExactMatcher {
    fn window_size(&self) -> WindowSize {
        WindowSize::Fixed(self.width())
    }

    fn call(&self, window: &[u8]) -> Result<bool, MatchError> {
        check_width(self.width(), window)?;
        Ok(self.matches(window))
    }
}

/// Matches a fixed-width pattern where masked positions accept any symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedMatcher {
    pattern: Vec<u8>,
    mask: Vec<bool>,
}

impl MaskedMatcher {
    /// `mask[p] == true` makes position `p` a wildcard. Both must have the same width.
    pub fn new(pattern: Vec<u8>, mask: Vec<bool>) -> Result<Self, MatchError> {
        if pattern.len() != mask.len() {
            return Err(MatchError::ShapeMismatch {
                expected: pattern.len(),
                actual: mask.len(),
            });
        }
        Ok(MaskedMatcher { pattern, mask })
    }

    pub fn pattern(&self) -> &[u8] {
        &self.pattern
    }

    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    pub fn width(&self) -> usize {
        self.pattern.len()
    }

    /// Caller guarantees `window.len() == self.width()`.
    #[inline]
    pub(crate) fn matches(&self, window: &[u8]) -> bool {
        window
            .iter()
            .zip(&self.pattern)
            .zip(&self.mask)
            .all(|((w, p), &wildcard)| wildcard || w == p)
    }
}

impl WindowFunction for MaskedMatcher {
    fn window_size(&self) -> WindowSize {
        WindowSize::Fixed(self.width())
    }

    fn call(&self, window: &[u8]) -> Result<bool, MatchError> {
        check_width(self.width(), window)?;
        Ok(self.matches(window))
    }
}

/// One concrete, fixed-width reading of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubMatcher {
    Exact(ExactMatcher),
    Masked(MaskedMatcher),
}

impl SubMatcher {
    pub fn width(&self) -> usize {
        match self {
            SubMatcher::Exact(m) => m.width(),
            SubMatcher::Masked(m) => m.width(),
        }
    }

    /// True if position `p` accepts any symbol. False for positions past the width.
    pub fn is_wildcard(&self, p: usize) -> bool {
        match self {
            SubMatcher::Exact(_) => false,
            SubMatcher::Masked(m) => m.mask.get(p).copied().unwrap_or(false),
        }
    }

    /// The encoded pattern. Wildcard positions hold an arbitrary placeholder code.
    pub fn pattern(&self) -> &[u8] {
        match self {
            SubMatcher::Exact(m) => m.pattern(),
            SubMatcher::Masked(m) => m.pattern(),
        }
    }

    #[inline]
    pub(crate) fn matches(&self, window: &[u8]) -> bool {
        match self {
            SubMatcher::Exact(m) => m.matches(window),
            SubMatcher::Masked(m) => m.matches(window),
        }
    }
}

impl From<ExactMatcher> for SubMatcher {
    fn from(m: ExactMatcher) -> Self {
        SubMatcher::Exact(m)
    }
}

impl From<MaskedMatcher> for SubMatcher {
    fn from(m: MaskedMatcher) -> Self {
        SubMatcher::Masked(m)
    }
}

impl WindowFunction for SubMatcher {
    fn window_size(&self) -> WindowSize {
        WindowSize::Fixed(self.width())
    }

    fn call(&self, window: &[u8]) -> Result<bool, MatchError> {
        check_width(self.width(), window)?;
        Ok(self.matches(window))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::RollingMode;
    use proptest::collection::vec;
    use proptest::{prop_assert_eq, proptest};
    use seq_alphabet::DNA;

    #[test]
    fn test_exact_matcher() {
        let m = ExactMatcher::new("AC", &DNA).unwrap();
        assert_eq!(m.pattern(), &[0, 1]);
        assert_eq!(m.window_size(), WindowSize::Fixed(2));
        assert!(m.call(&[0, 1]).unwrap());
        assert!(!m.call(&[1, 1]).unwrap());
        assert_eq!(
            m.call(&[0, 1, 2]),
            Err(MatchError::ShapeMismatch {
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn test_exact_matcher_errors() {
        assert!(matches!(
            ExactMatcher::new("ANC", &DNA),
            Err(MatchError::Encoding(_))
        ));
        assert!(matches!(
            ExactMatcher::new("", &DNA),
            Err(MatchError::UnsupportedPattern {
                issue: PatternIssue::EmptyPattern,
                ..
            })
        ));
    }

    #[test]
    fn test_exact_matcher_rolling() {
        let m = ExactMatcher::new("AC", &DNA).unwrap();
        let seq = DNA.encode(b"GACGT").unwrap();
        let rows = vec![seq];
        let mask = m.rolling_window(&rows, RollingMode::Same).unwrap();
        assert_eq!(mask.to_rows(), vec![vec![false, true, false, false, false]]);
        let mask = m.rolling_window(&rows, RollingMode::Valid).unwrap();
        assert_eq!(mask.to_rows(), vec![vec![false, true, false, false]]);
    }

    #[test]
    fn test_masked_matcher() {
        let m = MaskedMatcher::new(vec![0, 0, 3], vec![false, true, false]).unwrap();
        assert!(m.call(&[0, 2, 3]).unwrap());
        assert!(m.call(&[0, 0, 3]).unwrap());
        assert!(!m.call(&[1, 2, 3]).unwrap());
        assert!(m.call(&[0, 2]).is_err());
        assert_eq!(
            MaskedMatcher::new(vec![0, 1], vec![false]),
            Err(MatchError::ShapeMismatch {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_sub_matcher() {
        let exact: SubMatcher = ExactMatcher::from_codes(vec![2, 2]).into();
        let masked: SubMatcher = MaskedMatcher::new(vec![2, 0], vec![false, true])
            .unwrap()
            .into();
        assert!(!exact.is_wildcard(1));
        assert!(masked.is_wildcard(1));
        assert!(!masked.is_wildcard(2));
        assert!(!exact.is_wildcard(2));
        assert!(exact.call(&[2, 2]).unwrap());
        assert!(!exact.call(&[2, 3]).unwrap());
        assert!(masked.call(&[2, 3]).unwrap());
        assert_eq!(masked.pattern(), &[2, 0]);
    }

    proptest! {
        #[test]
        fn prop_test_unmasked_equals_exact(
            pattern in vec(0u8..4, 1..6),
            window in vec(0u8..4, 1..6),
        ) {
            let exact = ExactMatcher::from_codes(pattern.clone());
            let masked = MaskedMatcher::new(pattern.clone(), vec![false; pattern.len()]).unwrap();
            prop_assert_eq!(exact.call(&window).ok(), masked.call(&window).ok());
        }

        #[test]
        fn prop_test_full_mask_accepts_everything(window in vec(0u8..4, 1..8)) {
            let masked = MaskedMatcher::new(vec![0; window.len()], vec![true; window.len()]).unwrap();
            prop_assert_eq!(masked.call(&window), Ok(true));
        }
    }
}
