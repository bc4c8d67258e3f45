use thiserror::Error;

/// Reasons the changelog could not drive the commit.
///
/// None of these is fatal: each one sends the workflow down the explicit
/// message path instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChangelogFallback {
    /// No changelog file in the repository
    #[error("no changelog file found")]
    MissingFile,

    /// No second-level heading carries the unreleased marker
    #[error("no heading marked '{marker}'")]
    NoUnreleasedHeading { marker: String },

    /// The unreleased heading has no `X.Y.Z` version in it
    #[error("unreleased heading '{heading}' has no X.Y.Z version")]
    MissingVersion { heading: String },

    /// The version in the unreleased heading carries a suffix
    #[error("unreleased heading '{heading}' has unsupported version '{token}'")]
    UnsupportedVersion { heading: String, token: String },
}

impl ChangelogFallback {
    /// Whether the changelog looked intended for use but was malformed.
    pub fn is_authoring_mistake(&self) -> bool {
        matches!(
            self,
            ChangelogFallback::MissingVersion { .. } | ChangelogFallback::UnsupportedVersion { .. }
        )
    }
}
