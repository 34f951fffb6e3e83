//! Structurer configuration.

/// Name of the section that collects orphan field lines by default.
pub const DEFAULT_ORPHAN_SECTION: &str = "Unknown";

/// How to handle field lines that appear before any section header.
///
/// A well-formed report always opens with a header such as `General`, so
/// these lines only show up in truncated or hand-edited reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OrphanPolicy {
    /// Silently discard the line.
    #[default]
    Drop,
    /// File the line under a synthesized section with the given name.
    /// Subsequent orphan lines land in the same section, first key wins.
    Collect {
        /// Section name to create.
        section: String,
    },
}

impl OrphanPolicy {
    /// Collect orphan lines under [`DEFAULT_ORPHAN_SECTION`].
    pub fn collect() -> Self {
        Self::Collect {
            section: DEFAULT_ORPHAN_SECTION.to_string(),
        }
    }
}

/// Configuration for the [`Structurer`](crate::Structurer).
///
/// Use the builder pattern to create a configuration:
///
/// ```
/// use mediatab_report::config::{OrphanPolicy, StructurerConfig};
///
/// let config = StructurerConfig::builder()
///     .orphan_policy(OrphanPolicy::collect())
///     .build();
/// assert_eq!(config.delimiter, ',');
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StructurerConfig {
    /// Character separating a field name from its value.
    /// Only the first occurrence on a line is significant.
    /// Default: `,` (MediaInfo `Output=CSV`)
    pub delimiter: char,

    /// What to do with field lines seen before the first header.
    /// Default: Drop
    pub orphan_policy: OrphanPolicy,
}

impl Default for StructurerConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            orphan_policy: OrphanPolicy::default(),
        }
    }
}

impl StructurerConfig {
    /// Create a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration builder.
    pub fn builder() -> StructurerConfigBuilder {
        StructurerConfigBuilder::default()
    }
}

/// Builder for `StructurerConfig`.
#[derive(Debug, Clone, Default)]
pub struct StructurerConfigBuilder {
    delimiter: Option<char>,
    orphan_policy: Option<OrphanPolicy>,
}

impl StructurerConfigBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the field delimiter.
    ///
    /// Default: `,`
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Set how field lines without a preceding header are handled.
    ///
    /// - `Drop` (default): discard the line
    /// - `Collect { section }`: keep it under a synthesized section
    pub fn orphan_policy(mut self, policy: OrphanPolicy) -> Self {
        self.orphan_policy = Some(policy);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> StructurerConfig {
        StructurerConfig {
            delimiter: self.delimiter.unwrap_or(','),
            orphan_policy: self.orphan_policy.unwrap_or_default(),
        }
    }
}
