use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Go language version a file is written against, e.g. `go1.21`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LangVersion {
    pub major: u32,
    pub minor: u32,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid Go version {0:?}: expected a form like \"go1.21\"")]
pub struct LangVersionError(pub String);

impl LangVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Accepts `go1.21`, `v1.21` and `1.21`; a patch component such as
    /// `go1.21.3` is ignored.
    pub fn parse(s: &str) -> Result<Self, LangVersionError> {
        let err = || LangVersionError(s.to_owned());
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("go")
            .or_else(|| trimmed.strip_prefix('v'))
            .unwrap_or(trimmed);

        let mut parts = digits.split('.');
        let major = parts.next().ok_or_else(err)?.parse().map_err(|_| err())?;
        let minor = match parts.next() {
            Some(minor) => minor.parse().map_err(|_| err())?,
            None => 0,
        };
        if let Some(patch) = parts.next() {
            patch.parse::<u32>().map_err(|_| err())?;
        }
        if parts.next().is_some() {
            return Err(err());
        }
        Ok(Self { major, minor })
    }

    #[inline]
    pub fn at_least(self, major: u32, minor: u32) -> bool {
        self >= Self::new(major, minor)
    }
}

impl FromStr for LangVersion {
    type Err = LangVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for LangVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "go{}.{}", self.major, self.minor)
    }
}

/// Knobs of one formatting run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Target language version. Version-dependent rules stay off while unset.
    pub lang_version: Option<LangVersion>,
    /// Enables field merging in signatures and `err` check compaction.
    pub extra_rules: bool,
    /// Module path of the file; imports under it are never standard library.
    pub module_path: Option<String>,
    /// Applies the `gofmt -s` simplifications.
    pub simplify: bool,
    /// `gofmt -r` style rule, `pattern -> replacement`.
    pub rewrite: Option<String>,
}

impl Options {
    pub fn with_lang_version(mut self, version: LangVersion) -> Self {
        self.lang_version = Some(version);
        self
    }

    pub fn with_extra_rules(mut self, on: bool) -> Self {
        self.extra_rules = on;
        self
    }

    pub fn with_module_path(mut self, path: impl Into<String>) -> Self {
        self.module_path = Some(path.into());
        self
    }

    pub fn with_simplify(mut self, on: bool) -> Self {
        self.simplify = on;
        self
    }

    pub fn with_rewrite(mut self, rule: impl Into<String>) -> Self {
        self.rewrite = Some(rule.into());
        self
    }

    /// True when the target version is known and at least `major.minor`.
    #[inline]
    pub fn lang_at_least(&self, major: u32, minor: u32) -> bool {
        self.lang_version.is_some_and(|v| v.at_least(major, minor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_version_forms() {
        assert_eq!(LangVersion::parse("go1.21"), Ok(LangVersion::new(1, 21)));
        assert_eq!(LangVersion::parse("v1.13"), Ok(LangVersion::new(1, 13)));
        assert_eq!(LangVersion::parse("1.4"), Ok(LangVersion::new(1, 4)));
        assert_eq!(LangVersion::parse("go1.22.3"), Ok(LangVersion::new(1, 22)));
        assert_eq!("go1".parse::<LangVersion>(), Ok(LangVersion::new(1, 0)));
    }

    #[test]
    fn rejects_garbage() {
        assert!(LangVersion::parse("").is_err());
        assert!(LangVersion::parse("go").is_err());
        assert!(LangVersion::parse("go1.x").is_err());
        assert!(LangVersion::parse("1.2.3.4").is_err());
    }

    #[test]
    fn version_gate() {
        let opts = Options::default();
        assert!(!opts.lang_at_least(1, 0));
        let opts = opts.with_lang_version(LangVersion::new(1, 13));
        assert!(opts.lang_at_least(1, 13));
        assert!(!opts.lang_at_least(1, 14));
        assert_eq!(LangVersion::new(1, 9).to_string(), "go1.9");
    }
}
