#![forbid(unsafe_code)]

//! Error taxonomy for the tabset boundary.
//!
//! Layout math is total; errors only arise where host input enters the
//! model: configuration values, name/index/pattern lookups, and selection
//! of tabs whose state forbids it. Every variant carries enough context to
//! report the failure without reaching back into the tabset.

use std::fmt;

use crate::tab::{TabId, TabState};

/// Errors produced by [`Tabset`](crate::Tabset) mutations and lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabsetError {
    /// A tab with this name already exists.
    DuplicateName { name: String },
    /// A name, pattern, or id did not resolve to a tab.
    NoSuchTab { tab: String },
    /// A single-tab lookup matched more than one tab.
    AmbiguousName { pattern: String, matches: Vec<String> },
    /// A display index was out of range.
    InvalidIndex { index: usize, len: usize },
    /// The tab's state (or the plus-tab reservation) forbids selection.
    NotSelectable { name: String, state: TabState },
    /// An option value was rejected; the prior value is retained.
    InvalidOption { option: String, reason: String },
    /// The id space is exhausted.
    TabIdOverflow { current: TabId },
}

impl TabsetError {
    /// Reference-error for a stale id.
    pub(crate) fn no_such_id(id: TabId) -> Self {
        Self::NoSuchTab {
            tab: format!("#{id}"),
        }
    }
}

impl fmt::Display for TabsetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateName { name } => write!(f, "a tab named {name:?} already exists"),
            Self::NoSuchTab { tab } => write!(f, "no such tab {tab:?}"),
            Self::AmbiguousName { pattern, matches } => write!(
                f,
                "pattern {pattern:?} matches {} tabs: {}",
                matches.len(),
                matches.join(", ")
            ),
            Self::InvalidIndex { index, len } => {
                write!(f, "tab index {index} out of range for {len} tabs")
            }
            Self::NotSelectable { name, state } => {
                write!(f, "tab {name:?} cannot take the selection ({state})")
            }
            Self::InvalidOption { option, reason } => {
                write!(f, "invalid value for {option:?}: {reason}")
            }
            Self::TabIdOverflow { current } => write!(f, "tab id overflow after #{current}"),
        }
    }
}

impl std::error::Error for TabsetError {}

#[cfg(test)]
mod tests {
    use super::TabsetError;
    use crate::tab::TabState;

    #[test]
    fn messages_name_the_offender() {
        let err = TabsetError::DuplicateName {
            name: "build".into(),
        };
        assert_eq!(err.to_string(), "a tab named \"build\" already exists");

        let err = TabsetError::AmbiguousName {
            pattern: "t*".into(),
            matches: vec!["tab1".into(), "tab2".into()],
        };
        assert_eq!(err.to_string(), "pattern \"t*\" matches 2 tabs: tab1, tab2");

        let err = TabsetError::InvalidIndex { index: 9, len: 3 };
        assert_eq!(err.to_string(), "tab index 9 out of range for 3 tabs");

        let err = TabsetError::NotSelectable {
            name: "logs".into(),
            state: TabState::Disabled,
        };
        assert_eq!(
            err.to_string(),
            "tab \"logs\" cannot take the selection (disabled)"
        );
    }

    #[test]
    fn error_trait_is_implemented() {
        fn takes_error(_: &dyn std::error::Error) {}
        takes_error(&TabsetError::NoSuchTab { tab: "gone".into() });
    }
}
