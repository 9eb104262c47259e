//! The contract shared by everything that can be slid along a sequence.

use crate::errors::MatchError;
use crate::evaluate;
use crate::params::MatcherParams;
use itertools::Itertools;
use ragged::{RaggedRows, RaggedVec};

/// Declared window width of a window function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowSize {
    /// Every window has this width.
    Fixed(usize),
    /// One width per internal sub-matcher, in sub-matcher order.
    PerMatcher(Vec<usize>),
}

impl WindowSize {
    /// The single width, if there is exactly one.
    pub fn as_fixed(&self) -> Option<usize> {
        match self {
            WindowSize::Fixed(w) => Some(*w),
            WindowSize::PerMatcher(ws) => {
                let first = *ws.first()?;
                ws.iter().all(|&w| w == first).then_some(first)
            }
        }
    }

    /// Distinct widths in ascending order.
    pub fn distinct(&self) -> Vec<usize> {
        match self {
            WindowSize::Fixed(w) => vec![*w],
            WindowSize::PerMatcher(ws) => ws.iter().copied().sorted().dedup().collect(),
        }
    }
}

/// How `rolling_window` lays out its output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RollingMode {
    /// One value per input position; positions where no window fits are false.
    #[default]
    Same,
    /// Only the positions where a full window fits, `L - W + 1` per row.
    Valid,
}

/// A pure function of one fixed-width window of symbol codes.
pub trait WindowFunction {
    /// The width(s) of the windows this function accepts.
    fn window_size(&self) -> WindowSize;

    /// Evaluate a single window.
    fn call(&self, window: &[u8]) -> Result<bool, MatchError>;

    /// Evaluate a batch of windows, one outcome per window.
    fn call_batch<'a, I>(&self, windows: I) -> Result<Vec<bool>, MatchError>
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        windows.into_iter().map(|w| self.call(w)).collect()
    }

    /// Slide the function along every row of `rows`, marking the start of every
    /// matching window.
    fn rolling_window<R>(&self, rows: &R, mode: RollingMode) -> Result<RaggedVec<bool>, MatchError>
    where
        R: RaggedRows<Elem = u8> + Sync + ?Sized,
        Self: Sized + Sync,
    {
        evaluate::roll(self, rows, mode, &MatcherParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Matches windows whose codes sum to an even number.
    struct EvenSum(usize);

    impl WindowFunction for EvenSum {
        fn window_size(&self) -> WindowSize {
            WindowSize::Fixed(self.0)
        }
        fn call(&self, window: &[u8]) -> Result<bool, MatchError> {
            if window.len() != self.0 {
                return Err(MatchError::ShapeMismatch {
                    expected: self.0,
                    actual: window.len(),
                });
            }
            Ok(window.iter().map(|&c| c as usize).sum::<usize>() % 2 == 0)
        }
    }

    #[test]
    fn test_window_size() {
        assert_eq!(WindowSize::Fixed(3).as_fixed(), Some(3));
        assert_eq!(WindowSize::PerMatcher(vec![3, 3]).as_fixed(), Some(3));
        assert_eq!(WindowSize::PerMatcher(vec![3, 4]).as_fixed(), None);
        assert_eq!(WindowSize::PerMatcher(vec![]).as_fixed(), None);
        assert_eq!(WindowSize::PerMatcher(vec![4, 3, 4]).distinct(), vec![3, 4]);
    }

    #[test]
    fn test_call_batch() {
        let f = EvenSum(2);
        let row = [1u8, 1, 2, 3];
        assert_eq!(f.call_batch(row.windows(2)).unwrap(), vec![true, false, false]);
        assert_eq!(
            f.call_batch([row.as_slice()]),
            Err(MatchError::ShapeMismatch {
                expected: 2,
                actual: 4
            })
        );
    }

    #[test]
    fn test_default_rolling_window() {
        let f = EvenSum(2);
        let rows = vec![vec![1u8, 1, 2, 3], vec![2], vec![]];
        let same = f.rolling_window(&rows, RollingMode::Same).unwrap();
        assert_eq!(
            same.to_rows(),
            vec![vec![true, false, false, false], vec![false], vec![]]
        );
        let valid = f.rolling_window(&rows, RollingMode::Valid).unwrap();
        assert_eq!(valid.to_rows(), vec![vec![true, false, false], vec![], vec![]]);
    }
}
