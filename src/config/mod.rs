//! Configuration for MRIO construction.

use std::fmt;

/// Configuration for building an [`Mrio`](crate::Mrio)
#[derive(Debug, Clone)]
pub struct MrioConfig {
    /// Label of the using-sector column that marks capital formation in the
    /// intra-region and import flow tables
    pub capital_label: String,
    /// Separator placed between region and sector when compound keys are
    /// joined into export labels
    pub label_separator: String,
    /// Allocate inter-regional cells on the rayon thread pool
    pub parallel: bool,
    /// Relative difference above which diagnostics log a warning
    pub balance_tolerance: f64,
}

impl Default for MrioConfig {
    fn default() -> Self {
        Self {
            capital_label: "cgds".to_string(),
            label_separator: "/ ".to_string(),
            parallel: true,
            balance_tolerance: 0.05,
        }
    }
}

impl fmt::Display for MrioConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "MRIO Configuration:")?;
        writeln!(f, "  Capital Label: {}", self.capital_label)?;
        writeln!(f, "  Label Separator: {:?}", self.label_separator)?;
        writeln!(f, "  Parallel Allocation: {}", self.parallel)?;
        writeln!(f, "  Balance Tolerance: {}", self.balance_tolerance)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MrioConfig::default();
        assert_eq!(config.capital_label, "cgds");
        assert_eq!(config.label_separator, "/ ");
        assert!(config.parallel);

        let rendered = config.to_string();
        assert!(rendered.contains("Capital Label: cgds"));
    }
}
