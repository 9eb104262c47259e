//! Expansion of the pattern dialect into concrete fixed-width sub-matchers.
//!
//! Supported syntax:
//! - literal symbols of the alphabet,
//! - `.` matching any symbol,
//! - `[XYZ]` matching one of the listed literal symbols (no nesting),
//! - at most one bounded wildcard run `.{m,n}` (or `.{,n}`, meaning `m = 0`).

use crate::errors::{MatchError, PatternIssue};
use crate::matchers::{ExactMatcher, MaskedMatcher, SubMatcher};
use lazy_static::lazy_static;
use regex::Regex;
use seq_alphabet::Alphabet;

pub const WILDCARD: u8 = b'.';

lazy_static! {
    static ref REPETITION_BOUNDS: Regex = Regex::new(r"^([0-9]*),([0-9]+)$").unwrap();
}

/// Location and bounds of a `.{m,n}` run. `start..end` spans the whole run,
/// including the repeated `.`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RepetitionRun {
    start: usize,
    end: usize,
    min: usize,
    max: usize,
}

fn find_repetition_run(pattern: &str) -> Result<Option<RepetitionRun>, MatchError> {
    let bytes = pattern.as_bytes();
    let unsupported = |issue| MatchError::unsupported(bytes, issue);

    let opens: Vec<usize> = (0..bytes.len()).filter(|&i| bytes[i] == b'{').collect();
    let open = match opens.as_slice() {
        [] => {
            return match bytes.iter().position(|&c| c == b'}') {
                Some(position) => Err(unsupported(PatternIssue::UnexpectedBrace { position })),
                None => Ok(None),
            };
        }
        [open] => *open,
        _ => {
            return Err(unsupported(PatternIssue::MultipleRepetitions {
                count: opens.len(),
            }))
        }
    };

    let close = match bytes[open..].iter().position(|&c| c == b'}') {
        Some(offset) => open + offset,
        None => {
            return Err(unsupported(PatternIssue::MalformedBounds {
                bounds: pattern[open + 1..].to_string(),
            }))
        }
    };
    if let Some(position) = (0..bytes.len()).find(|&i| bytes[i] == b'}' && i != close) {
        return Err(unsupported(PatternIssue::UnexpectedBrace { position }));
    }

    if open == 0 || bytes[open - 1] != WILDCARD {
        let unit = match open.checked_sub(1).map(|i| bytes[i]) {
            None => String::new(),
            Some(b']') => {
                let class_start = pattern[..open].rfind('[').unwrap_or(0);
                pattern[class_start..open].to_string()
            }
            Some(c) => (c as char).to_string(),
        };
        return Err(unsupported(PatternIssue::NonWildcardRepetition { unit }));
    }

    let bounds = &pattern[open + 1..close];
    let malformed = || {
        unsupported(PatternIssue::MalformedBounds {
            bounds: bounds.to_string(),
        })
    };
    let caps = REPETITION_BOUNDS.captures(bounds).ok_or_else(malformed)?;
    let min = match &caps[1] {
        "" => 0,
        m => m.parse::<usize>().map_err(|_| malformed())?,
    };
    let max = caps[2].parse::<usize>().map_err(|_| malformed())?;
    if max < min {
        return Err(unsupported(PatternIssue::InvertedBounds { min, max }));
    }

    Ok(Some(RepetitionRun {
        start: open - 1,
        end: close + 1,
        min,
        max,
    }))
}

/// Given the position of a `[`, return the position just past the matching `]`.
fn close_class(pattern: &[u8], open: usize) -> Result<usize, MatchError> {
    let unsupported = |issue| MatchError::unsupported(pattern, issue);
    for (i, &c) in pattern.iter().enumerate().skip(open + 1) {
        match c {
            b']' if i == open + 1 => {
                return Err(unsupported(PatternIssue::EmptyClass { position: open }))
            }
            b']' => return Ok(i + 1),
            b'[' => return Err(unsupported(PatternIssue::NestedClass { position: open })),
            WILDCARD => {
                return Err(unsupported(PatternIssue::WildcardInClass { position: open }))
            }
            b'{' | b'}' => return Err(unsupported(PatternIssue::UnexpectedBrace { position: i })),
            _ => {}
        }
    }
    Err(unsupported(PatternIssue::UnterminatedClass { position: open }))
}

/// Check the class and brace syntax of `pattern` outside of `run`, returning
/// the number of members of each class, left to right.
fn class_sizes(pattern: &[u8], run: Option<&RepetitionRun>) -> Result<Vec<usize>, MatchError> {
    let mut sizes = Vec::new();
    let mut i = 0;
    while i < pattern.len() {
        if let Some(run) = run {
            if i == run.start {
                i = run.end;
                continue;
            }
        }
        match pattern[i] {
            b'[' => {
                let end = close_class(pattern, i)?;
                sizes.push(end - i - 2);
                i = end;
            }
            b']' => {
                return Err(MatchError::unsupported(
                    pattern,
                    PatternIssue::UnmatchedBracket { position: i },
                ))
            }
            b'{' | b'}' => {
                return Err(MatchError::unsupported(
                    pattern,
                    PatternIssue::UnexpectedBrace { position: i },
                ))
            }
            _ => i += 1,
        }
    }
    Ok(sizes)
}

/// Number of concrete readings `pattern` expands to: the product of all class
/// sizes, times the number of gap lengths of its repetition run.
pub fn expansion_count(pattern: &str) -> Result<u128, MatchError> {
    let run = find_repetition_run(pattern)?;
    let sizes = class_sizes(pattern.as_bytes(), run.as_ref())?;
    let gaps = run.map_or(1, |r| (r.max - r.min) as u128 + 1);
    Ok(sizes
        .into_iter()
        .fold(gaps, |acc, k| acc.saturating_mul(k as u128)))
}

/// Leftmost `[...]` group of an already validated pattern.
fn leftmost_class(pattern: &[u8]) -> Option<(usize, usize)> {
    let start = pattern.iter().position(|&c| c == b'[')?;
    let end = start + pattern[start..].iter().position(|&c| c == b']')? + 1;
    Some((start, end))
}

/// Build the matcher for a class-free pattern, masking its wildcard positions.
fn wildcard_matcher<A: Alphabet + ?Sized>(
    pattern: &[u8],
    alphabet: &A,
) -> Result<SubMatcher, MatchError> {
    if !pattern.contains(&WILDCARD) {
        return Ok(ExactMatcher::from_codes(alphabet.encode(pattern)?).into());
    }
    let placeholder = alphabet.placeholder_symbol()?;
    let mask: Vec<bool> = pattern.iter().map(|&c| c == WILDCARD).collect();
    let filled: Vec<u8> = pattern
        .iter()
        .map(|&c| if c == WILDCARD { placeholder } else { c })
        .collect();
    Ok(MaskedMatcher::new(alphabet.encode(&filled)?, mask)?.into())
}

/// Substitute each member of the leftmost class in turn and recurse, pushing
/// one sub-matcher per fully expanded reading onto `out`.
fn expand_classes<A: Alphabet + ?Sized>(
    pattern: &[u8],
    alphabet: &A,
    out: &mut Vec<SubMatcher>,
) -> Result<(), MatchError> {
    let Some((start, end)) = leftmost_class(pattern) else {
        out.push(wildcard_matcher(pattern, alphabet)?);
        return Ok(());
    };
    let (pre, post) = (&pattern[..start], &pattern[end..]);
    let mut substituted = Vec::with_capacity(pre.len() + 1 + post.len());
    for &symbol in &pattern[start + 1..end - 1] {
        substituted.clear();
        substituted.extend_from_slice(pre);
        substituted.push(symbol);
        substituted.extend_from_slice(post);
        expand_classes(&substituted, alphabet, out)?;
    }
    Ok(())
}

/// Compile a pattern without a repetition run into sub-matchers that all have
/// the same width, one per combination of class members.
pub fn compile_fixed_len<A: Alphabet + ?Sized>(
    pattern: &str,
    alphabet: &A,
) -> Result<Vec<SubMatcher>, MatchError> {
    let bytes = pattern.as_bytes();
    class_sizes(bytes, None)?;
    if bytes.is_empty() {
        return Err(MatchError::unsupported(bytes, PatternIssue::EmptyPattern));
    }
    let mut out = Vec::new();
    expand_classes(bytes, alphabet, &mut out)?;
    Ok(out)
}

/// Compile a pattern with at most one `.{m,n}` run. Each gap length in
/// `m..=n` yields its own set of sub-matchers, so widths may differ.
///
/// This enumerates every reading; see [`expansion_count`] to bound the work first.
pub fn compile_flexible_len<A: Alphabet + ?Sized>(
    pattern: &str,
    alphabet: &A,
) -> Result<Vec<SubMatcher>, MatchError> {
    let Some(run) = find_repetition_run(pattern)? else {
        return compile_fixed_len(pattern, alphabet);
    };
    let bytes = pattern.as_bytes();
    class_sizes(bytes, Some(&run))?;
    let (head, tail) = (&bytes[..run.start], &bytes[run.end..]);
    if head.is_empty() && tail.is_empty() && run.min == 0 {
        return Err(MatchError::unsupported(bytes, PatternIssue::EmptyPattern));
    }
    if head
        .len()
        .checked_add(run.max)
        .and_then(|w| w.checked_add(tail.len()))
        .is_none()
    {
        return Err(MatchError::unsupported(
            bytes,
            PatternIssue::WindowTooWide { max_gap: run.max },
        ));
    }

    let mut out = Vec::new();
    let mut concrete = Vec::new();
    for gap in run.min..=run.max {
        concrete.clear();
        concrete.extend_from_slice(head);
        concrete.resize(head.len() + gap, WILDCARD);
        concrete.extend_from_slice(tail);
        expand_classes(&concrete, alphabet, &mut out)?;
    }
    Ok(out)
}
