//! Bounds-checked sliding of matchers along ragged rows.
//!
//! Windows are taken with `slice::windows`, so a window of width `W` is only
//! ever formed at start positions `0..=L - W` of a row of length `L`; nothing
//! is read across a row boundary.

use crate::errors::MatchError;
use crate::matchers::SubMatcher;
use crate::params::MatcherParams;
use crate::window::{RollingMode, WindowFunction};
use log::warn;
use ragged::{RaggedRows, RaggedVec};
use rayon::prelude::*;

/// Set `mask[start]` for every window of `row` with width `width` that `f` accepts.
fn or_windows<F>(width: usize, row: &[u8], mask: &mut [bool], f: F)
where
    F: Fn(&[u8]) -> bool,
{
    if width == 0 || width > row.len() {
        return;
    }
    for (start, window) in row.windows(width).enumerate() {
        if !mask[start] && f(window) {
            mask[start] = true;
        }
    }
}

/// Union of all sub-matchers over one row. The mask has the row's length.
pub(crate) fn mask_row(sub_matchers: &[SubMatcher], row: &[u8]) -> Vec<bool> {
    let mut mask = vec![false; row.len()];
    for m in sub_matchers {
        or_windows(m.width(), row, &mut mask, |w| m.matches(w));
    }
    mask
}

/// Apply `f` to every row, in parallel when `params` allow it. Output order
/// follows row order regardless of scheduling.
fn collect_rows<R, T, F>(rows: &R, params: &MatcherParams, f: F) -> Vec<T>
where
    R: RaggedRows<Elem = u8> + Sync + ?Sized,
    T: Send,
    F: Fn(&[u8]) -> T + Sync,
{
    let n = rows.num_rows();
    if params.use_parallel(n) {
        (0..n).into_par_iter().map(|i| f(rows.row(i))).collect()
    } else {
        (0..n).map(|i| f(rows.row(i))).collect()
    }
}

fn pack(masks: Vec<Vec<bool>>) -> RaggedVec<bool> {
    let mut out = RaggedVec::new();
    for mask in masks {
        out.push_row(mask);
    }
    out
}

/// Match masks for every row, packed with the same row lengths as `rows`.
pub(crate) fn mask_rows<R>(
    sub_matchers: &[SubMatcher],
    rows: &R,
    params: &MatcherParams,
) -> RaggedVec<bool>
where
    R: RaggedRows<Elem = u8> + Sync + ?Sized,
{
    pack(collect_rows(rows, params, |row| mask_row(sub_matchers, row)))
}

/// Generic rolling evaluation for any window function, batch-evaluating the
/// windows of each distinct declared width.
pub(crate) fn roll<F, R>(
    f: &F,
    rows: &R,
    mode: RollingMode,
    params: &MatcherParams,
) -> Result<RaggedVec<bool>, MatchError>
where
    F: WindowFunction + Sync + ?Sized,
    R: RaggedRows<Elem = u8> + Sync + ?Sized,
{
    let size = f.window_size();
    let widths = size.distinct();
    let valid_width = match (mode, size.as_fixed()) {
        (RollingMode::Valid, Some(w)) => Some(w),
        (RollingMode::Valid, None) => {
            warn!(
                "rolling mode 'valid' requested for windows of widths {widths:?}; using 'same' instead"
            );
            None
        }
        (RollingMode::Same, _) => None,
    };

    let masks = collect_rows(rows, params, |row| -> Result<Vec<bool>, MatchError> {
        let mut mask = vec![false; row.len()];
        for &w in &widths {
            if w == 0 || w > row.len() {
                continue;
            }
            for (start, hit) in f.call_batch(row.windows(w))?.into_iter().enumerate() {
                mask[start] |= hit;
            }
        }
        if let Some(w) = valid_width {
            mask.truncate((row.len() + 1).saturating_sub(w));
        }
        Ok(mask)
    });
    Ok(pack(masks.into_iter().collect::<Result<_, _>>()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matchers::{ExactMatcher, MaskedMatcher};
    use crate::params::DEFAULT_PARAMS;
    use proptest::collection::vec;
    use proptest::{prop_assert, prop_assert_eq, proptest};

    fn exact(codes: &[u8]) -> SubMatcher {
        ExactMatcher::from_codes(codes.to_vec()).into()
    }

    #[test]
    fn test_mask_row() {
        // "AC" over "GACGT"
        assert_eq!(
            mask_row(&[exact(&[0, 1])], &[2, 0, 1, 2, 3]),
            vec![false, true, false, false, false]
        );
        // longer than the row
        assert_eq!(mask_row(&[exact(&[0, 1, 2])], &[0, 1]), vec![false, false]);
        assert_eq!(mask_row(&[exact(&[0])], &[]), Vec::<bool>::new());
    }

    #[test]
    fn test_mask_row_union_of_widths() {
        let gap1 = MaskedMatcher::new(vec![0, 0, 3], vec![false, true, false]).unwrap();
        let gap2 = MaskedMatcher::new(vec![0, 0, 0, 3], vec![false, true, true, false]).unwrap();
        let subs = [SubMatcher::from(gap1), SubMatcher::from(gap2)];
        // A C G T A T T
        assert_eq!(
            mask_row(&subs, &[0, 1, 2, 3, 0, 3, 3]),
            vec![true, false, false, false, true, false, false]
        );
    }

    #[test]
    fn test_mask_rows_ragged() {
        let rows = vec![vec![0u8, 1, 0, 1], vec![0, 1], vec![], vec![1]];
        let masks = mask_rows(&[exact(&[0, 1])], &rows, &DEFAULT_PARAMS);
        assert_eq!(masks.lengths().collect::<Vec<_>>(), vec![4, 2, 0, 1]);
        assert_eq!(
            masks.to_rows(),
            vec![vec![true, false, true, false], vec![true, false], vec![], vec![false]]
        );
    }

    #[test]
    fn test_roll_shape_mismatch_propagates() {
        struct Broken;
        impl WindowFunction for Broken {
            fn window_size(&self) -> crate::window::WindowSize {
                crate::window::WindowSize::Fixed(2)
            }
            fn call(&self, window: &[u8]) -> Result<bool, MatchError> {
                Err(MatchError::ShapeMismatch {
                    expected: 3,
                    actual: window.len(),
                })
            }
        }
        let rows = vec![vec![0u8, 1, 2]];
        assert!(roll(&Broken, &rows, RollingMode::Same, &DEFAULT_PARAMS).is_err());
        // rows too short for any window never call the function
        let rows = vec![vec![0u8]];
        assert_eq!(
            roll(&Broken, &rows, RollingMode::Same, &DEFAULT_PARAMS)
                .unwrap()
                .to_rows(),
            vec![vec![false]]
        );
    }

    proptest! {
        #[test]
        fn prop_test_no_hits_past_row_end(
            rows in vec(vec(0u8..2, 0..12), 0..8),
            width in 1usize..6,
        ) {
            let all = MaskedMatcher::new(vec![0; width], vec![true; width]).unwrap();
            let masks = mask_rows(&[SubMatcher::from(all)], &rows, &DEFAULT_PARAMS);
            for (row, mask) in rows.iter().zip(masks.iter()) {
                prop_assert_eq!(row.len(), mask.len());
                for (i, &hit) in mask.iter().enumerate() {
                    prop_assert_eq!(hit, i + width <= row.len());
                }
            }
        }

        #[test]
        fn prop_test_parallel_equals_sequential(
            rows in vec(vec(0u8..4, 0..30), 0..40),
            pattern in vec(0u8..4, 1..4),
        ) {
            let subs = [exact(&pattern)];
            let sequential = MatcherParams { parallel: false, ..DEFAULT_PARAMS };
            let parallel = MatcherParams { par_min_rows: 1, ..DEFAULT_PARAMS };
            let a = mask_rows(&subs, &rows, &sequential);
            let b = mask_rows(&subs, &rows, &parallel);
            prop_assert!(a == b);
        }
    }
}
