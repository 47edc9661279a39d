//! Per-review theme assignment.

use serde::{Deserialize, Serialize};

/// Label written for reviews with no theme signal.
pub const GENERAL_LABEL: &str = "general";

/// Catch-all bucket for terms that match no category pattern.
pub const OTHER_THEME: &str = "OTHER";

/// Separator between theme names in the output label.
pub const THEME_SEPARATOR: char = ';';

/// Themes assigned to one review.
///
/// `General` is distinct from an empty list so that absence of signal is
/// explicit and queryable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewThemes {
    /// No theme scored above zero
    General,
    /// Theme names ordered by descending relevance, never empty
    Themes(Vec<String>),
}

impl ReviewThemes {
    /// Build from a ranked list, mapping an empty list to `General`.
    pub fn from_ranked(themes: Vec<String>) -> Self {
        if themes.is_empty() {
            ReviewThemes::General
        } else {
            ReviewThemes::Themes(themes)
        }
    }

    /// Number of assigned themes; 0 for `General`.
    pub fn count(&self) -> usize {
        match self {
            ReviewThemes::General => 0,
            ReviewThemes::Themes(themes) => themes.len(),
        }
    }

    /// Assigned theme names; empty for `General`.
    pub fn names(&self) -> &[String] {
        match self {
            ReviewThemes::General => &[],
            ReviewThemes::Themes(themes) => themes,
        }
    }

    pub fn is_general(&self) -> bool {
        matches!(self, ReviewThemes::General)
    }

    /// Output label: `;`-joined names or the literal "general".
    pub fn label(&self) -> String {
        match self {
            ReviewThemes::General => GENERAL_LABEL.to_string(),
            ReviewThemes::Themes(themes) => themes.join(&THEME_SEPARATOR.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_ranked_is_general() {
        let themes = ReviewThemes::from_ranked(Vec::new());
        assert!(themes.is_general());
        assert_eq!(themes.count(), 0);
        assert_eq!(themes.label(), "general");
        assert!(themes.names().is_empty());
    }

    #[test]
    fn test_label_joins_in_order() {
        let themes = ReviewThemes::from_ranked(vec![
            "RELIABILITY_PERFORMANCE".to_string(),
            "UI_UX_DESIGN".to_string(),
        ]);
        assert_eq!(themes.count(), 2);
        assert_eq!(themes.label(), "RELIABILITY_PERFORMANCE;UI_UX_DESIGN");
    }
}
