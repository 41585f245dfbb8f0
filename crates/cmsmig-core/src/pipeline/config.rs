//! Pipeline configuration.

fn default_conversion_workers() -> usize {
    std::thread::available_parallelism()
        .map(|count| count.get())
        .unwrap_or(4)
        .max(1)
}

/// Migration pipeline configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Number of threads converting data types in the second pass.
    pub conversion_workers: usize,

    /// Abort the run when an editor alias has no migrator and the registry
    /// has no fallback.
    pub fail_on_unmapped: bool,
}

impl PipelineConfig {
    /// Create a configuration with the defaults.
    pub fn new() -> Self {
        Self {
            conversion_workers: default_conversion_workers(),
            fail_on_unmapped: false,
        }
    }

    /// Set the number of conversion workers.
    pub fn with_conversion_workers(mut self, workers: usize) -> Self {
        self.conversion_workers = workers.max(1);
        self
    }

    /// Convert everything on the calling thread.
    pub fn single_threaded(self) -> Self {
        self.with_conversion_workers(1)
    }

    /// Treat unmapped editor aliases as fatal.
    pub fn with_fail_on_unmapped(mut self, fail: bool) -> Self {
        self.fail_on_unmapped = fail;
        self
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert!(config.conversion_workers >= 1);
        assert!(!config.fail_on_unmapped);
    }

    #[test]
    fn test_workers_never_zero() {
        let config = PipelineConfig::new().with_conversion_workers(0);
        assert_eq!(config.conversion_workers, 1);
        assert_eq!(PipelineConfig::new().single_threaded().conversion_workers, 1);
    }
}
