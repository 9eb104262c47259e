//! Crate for finding constrained regular-expression patterns in encoded sequences.
//!
//! A pattern is made of alphabet symbols, `.` wildcards, single-level
//! character classes such as `[AG]`, and at most one bounded wildcard run
//! `.{m,n}`. It is compiled once into a set of fixed-width sub-matchers, which
//! are then slid along each row of a (possibly ragged) collection of encoded
//! sequences. The result is one boolean per input position, true where a match
//! starts.
//!
//! ```
//! use ragged::RaggedVec;
//! use seq_alphabet::DNA;
//! use seq_matcher::RegexMatcher;
//!
//! let m = RegexMatcher::new("[AG]C", &DNA).unwrap();
//! let masks = m.match_text_rows(["GCAC", "AC"], &DNA).unwrap();
//! assert_eq!(
//!     masks,
//!     RaggedVec::from_rows([vec![true, false, true, false], vec![true, false]])
//! );
//! ```

pub mod compile;
pub mod errors;
mod evaluate;
pub mod matchers;
pub mod params;
mod regex_matcher;
pub mod window;

pub use compile::{compile_fixed_len, compile_flexible_len, expansion_count};
pub use errors::{MatchError, PatternIssue};
pub use matchers::{ExactMatcher, MaskedMatcher, SubMatcher};
pub use params::MatcherParams;
pub use regex_matcher::{FixedLenRegexMatcher, RegexMatcher};
pub use window::{RollingMode, WindowFunction, WindowSize};
