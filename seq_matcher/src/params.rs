//! Tunable limits for compiling and evaluating patterns.

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatcherParams {
    /// Upper bound on the number of concrete readings (class expansions times
    /// gap lengths) a single pattern may compile into.
    pub max_sub_matchers: usize,
    /// Evaluate rows on the rayon thread pool.
    pub parallel: bool,
    /// Collections with fewer rows than this are evaluated on the calling thread.
    pub par_min_rows: usize,
}

pub const DEFAULT_PARAMS: MatcherParams = MatcherParams {
    max_sub_matchers: 4096,
    parallel: true,
    par_min_rows: 64,
};

impl Default for MatcherParams {
    fn default() -> Self {
        DEFAULT_PARAMS
    }
}

impl MatcherParams {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Read parameters from a TOML file, falling back to the defaults if the
    /// file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(
                "could not find matcher parameters at {}, falling back to defaults",
                path.display()
            );
            return Ok(Self::default());
        }
        let s = std::fs::read_to_string(path).with_context(|| path.display().to_string())?;
        Self::from_toml_str(&s).with_context(|| path.display().to_string())
    }

    pub(crate) fn use_parallel(&self, num_rows: usize) -> bool {
        self.parallel && num_rows >= self.par_min_rows.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_toml() {
        let p = MatcherParams::from_toml_str("par_min_rows = 2\n").unwrap();
        assert_eq!(
            p,
            MatcherParams {
                par_min_rows: 2,
                ..DEFAULT_PARAMS
            }
        );
        assert_eq!(MatcherParams::from_toml_str("").unwrap(), DEFAULT_PARAMS);
    }

    #[test]
    fn test_bad_toml() {
        assert!(MatcherParams::from_toml_str("max_sub_matchers = -1").is_err());
        assert!(MatcherParams::from_toml_str("backend = 'gpu'").is_err());
    }

    #[test]
    fn test_load() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert_eq!(MatcherParams::load(&missing).unwrap(), DEFAULT_PARAMS);

        let path = dir.path().join("matcher.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "parallel = false\nmax_sub_matchers = 10").unwrap();
        drop(f);
        let p = MatcherParams::load(&path).unwrap();
        assert!(!p.parallel);
        assert_eq!(p.max_sub_matchers, 10);
        assert!(!p.use_parallel(1_000_000));

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "parallel = 3").unwrap();
        let err = MatcherParams::load(&bad).unwrap_err();
        assert!(format!("{err:#}").contains("bad.toml"));
    }

    #[test]
    fn test_use_parallel() {
        let p = MatcherParams {
            par_min_rows: 0,
            ..DEFAULT_PARAMS
        };
        assert!(!p.use_parallel(0));
        assert!(p.use_parallel(1));
        assert!(!DEFAULT_PARAMS.use_parallel(63));
        assert!(DEFAULT_PARAMS.use_parallel(64));
    }
}
