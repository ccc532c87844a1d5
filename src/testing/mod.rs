use num_traits::Float;
use std::collections::HashMap;

pub mod inference;

#[derive(Debug, Clone)]
pub struct TestResult<T> {
    /// The test statistic value (e.g. the observed number of connections)
    pub statistic: T,
    /// The p-value of the test
    pub p_value: T,
    /// Effect size measurement
    pub effect_size: Option<T>,
    /// Additional test-specific information
    pub metadata: HashMap<String, T>,
}

impl<T> TestResult<T>
where
    T: Float,
{
    /// Create a new test result with minimal information
    pub fn new(statistic: T, p_value: T) -> Self {
        TestResult {
            statistic,
            p_value,
            effect_size: None,
            metadata: HashMap::new(),
        }
    }

    /// Create a new test result with effect size
    pub fn with_effect_size(statistic: T, p_value: T, effect_size: T) -> Self {
        TestResult {
            statistic,
            p_value,
            effect_size: Some(effect_size),
            metadata: HashMap::new(),
        }
    }

    /// Add additional metadata
    pub fn with_metadata(mut self, key: &str, value: T) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }

    /// Check if the result is statistically significant at the given threshold.
    ///
    /// The threshold is inclusive: a p-value equal to `alpha` is significant.
    pub fn is_significant(&self, alpha: T) -> bool {
        self.p_value <= alpha
    }
}
