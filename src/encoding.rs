use anyhow::{anyhow, Result};
use serde::Serialize;

/// Maps string categories to dense integer codes in sorted class order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn fit<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut classes: Vec<String> = values.into_iter().map(str::to_string).collect();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn transform(&self, value: &str) -> Result<f64> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(value))
            .map(|i| i as f64)
            .map_err(|_| anyhow!("unseen label '{}' (known: {:?})", value, self.classes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_codes() {
        let enc = LabelEncoder::fit(["Standard", "Express", "Economy", "Express"]);
        assert_eq!(enc.classes(), &["Economy", "Express", "Standard"]);
        assert_eq!(enc.transform("Express").unwrap(), 1.0);
        assert_eq!(enc.transform("Standard").unwrap(), 2.0);
    }

    #[test]
    fn test_unknown_label() {
        let enc = LabelEncoder::fit(["a"]);
        assert!(enc.transform("b").is_err());
    }
}
