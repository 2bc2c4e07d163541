//! Multi-select filter over categorical labels.

use serde::{Deserialize, Serialize};

/// An ordered set of selected labels. An empty selection matches every label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    values: Vec<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selection = Self::new();
        for value in values {
            let value = value.into();
            if !selection.values.contains(&value) {
                selection.values.push(value);
            }
        }
        selection
    }

    /// Adds `option` if absent, removes it otherwise.
    pub fn toggle(&mut self, option: &str) {
        if let Some(pos) = self.values.iter().position(|v| v == option) {
            self.values.remove(pos);
        } else {
            self.values.push(option.to_string());
        }
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn matches(&self, label: &str) -> bool {
        self.values.is_empty() || self.values.iter().any(|v| v == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_matches_all() {
        let selection = Selection::new();
        assert!(selection.matches("Mobile"));
        assert!(selection.matches(""));
    }

    #[test]
    fn test_toggle() {
        let mut selection = Selection::new();
        selection.toggle("Mobile");
        selection.toggle("Tablet");
        assert!(selection.matches("Mobile"));
        assert!(!selection.matches("Desktop"));

        selection.toggle("Mobile");
        assert_eq!(selection.values(), &["Tablet".to_string()]);

        selection.clear();
        assert!(selection.is_empty());
    }

    #[test]
    fn test_from_values_dedupes() {
        let selection = Selection::from_values(["Dubai", "Dubai", "Cairo"]);
        assert_eq!(selection.values().len(), 2);
    }
}
