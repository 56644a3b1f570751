//! Exclusion predicates and the vendor-directory remap.
//!
//! Filtering is a flat list of independent negative predicates combined with
//! logical OR: a path is included iff no rule matches. New trims are added by
//! pushing another [`ExcludeRule`] onto the list, never by threading more
//! conditions through existing ones. Evaluation order never changes the
//! outcome.

use std::borrow::Cow;
use std::fmt;

use crate::config::RuleConfig;

/// A single negative filter over normalized (`/`-separated) relative paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExcludeRule {
    /// Final path segment equals the given name exactly
    Basename(String),
    /// Path ends with the given suffix
    Extension(String),
    /// Path starts with the given directory followed by a separator
    Directory(String),
    /// Path starts with the given vendor package prefix
    Package(String),
}

impl ExcludeRule {
    /// Whether this rule excludes `path`.
    pub fn matches(&self, path: &str) -> bool {
        match self {
            ExcludeRule::Basename(name) => {
                path.rsplit('/').next() == Some(name.as_str())
            }
            ExcludeRule::Extension(suffix) => path.ends_with(suffix.as_str()),
            ExcludeRule::Directory(dir) => {
                path.len() > dir.len()
                    && path.starts_with(dir.as_str())
                    && path.as_bytes()[dir.len()] == b'/'
            }
            ExcludeRule::Package(prefix) => path.starts_with(prefix.as_str()),
        }
    }
}

impl fmt::Display for ExcludeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExcludeRule::Basename(name) => write!(f, "basename {name}"),
            ExcludeRule::Extension(suffix) => write!(f, "extension {suffix}"),
            ExcludeRule::Directory(dir) => write!(f, "directory {dir}/"),
            ExcludeRule::Package(prefix) => write!(f, "package {prefix}"),
        }
    }
}

/// Archive-entry-name rewrite from one vendor install location to another.
///
/// Applies to the entry name only; file contents are never touched. This
/// reconciles the browser/WASM dependency substitution back to the path
/// layout the runtime bundle expects at extraction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRemap {
    from: String,
    to: String,
}

impl PathRemap {
    /// Create a remap between two `/`-terminated prefixes.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Rewrite `path` if it falls under the source prefix.
    pub fn apply<'a>(&self, path: &'a str) -> Cow<'a, str> {
        match path.strip_prefix(self.from.as_str()) {
            Some(rest) => Cow::Owned(format!("{}{}", self.to, rest)),
            None => Cow::Borrowed(path),
        }
    }

    /// Source prefix.
    pub fn from(&self) -> &str {
        &self.from
    }

    /// Target prefix.
    pub fn to(&self) -> &str {
        &self.to
    }
}

/// The full rule set: exclusion list plus the entry-name remap.
#[derive(Debug, Clone)]
pub struct FilterRules {
    rules: Vec<ExcludeRule>,
    remap: PathRemap,
}

impl FilterRules {
    /// Build the rule list from configuration.
    pub fn from_config(config: &RuleConfig) -> Self {
        let mut rules = Vec::new();
        rules.extend(config.basenames.iter().cloned().map(ExcludeRule::Basename));
        rules.extend(config.extensions.iter().cloned().map(ExcludeRule::Extension));
        rules.extend(
            config
                .directories
                .iter()
                .map(|d| ExcludeRule::Directory(d.trim_end_matches('/').to_string())),
        );
        rules.extend(config.packages.iter().cloned().map(ExcludeRule::Package));

        Self {
            rules,
            remap: PathRemap::new(config.remap_from.clone(), config.remap_to.clone()),
        }
    }

    /// Pure inclusion predicate: true iff no rule matches.
    pub fn should_include(&self, path: &str) -> bool {
        !self.rules.iter().any(|rule| rule.matches(path))
    }

    /// The first rule excluding `path`, if any. Which rule wins is
    /// informational only; exclusion itself is order-independent.
    pub fn excluded_by(&self, path: &str) -> Option<&ExcludeRule> {
        self.rules.iter().find(|rule| rule.matches(path))
    }

    /// All rules, in configuration order.
    pub fn rules(&self) -> &[ExcludeRule] {
        &self.rules
    }

    /// The entry-name remap.
    pub fn remap(&self) -> &PathRemap {
        &self.remap
    }
}

impl Default for FilterRules {
    fn default() -> Self {
        Self::from_config(&RuleConfig::default())
    }
}
