//! Dataset Exclusion Policy

use crate::error::LoadError;
use glob::Pattern;

/// Logical-name patterns of datasets that must never be processed
#[derive(Debug, Clone, Default)]
pub struct ExclusionPolicy {
    patterns: Vec<Pattern>,
}

impl ExclusionPolicy {
    /// Policy that excludes nothing
    pub fn none() -> Self {
        Self::default()
    }

    /// Compile a policy from glob patterns (e.g. `*MNIST`)
    pub fn new<I, S>(patterns: I) -> Result<Self, LoadError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| Pattern::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Whether a dataset with this logical name is excluded
    pub fn is_excluded(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(name))
    }

    /// Whether the policy has no patterns
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
