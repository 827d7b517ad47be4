//! Export configuration.

/// Configuration for exporting a model to the interchange format.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Whether to pretty-print JSON output.
    pub pretty: bool,
    /// Whether constant tensor data is written. When false, weights are
    /// dropped and the output only describes structure.
    pub include_weights: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            pretty: false,
            include_weights: true,
        }
    }
}

impl ExportConfig {
    /// Creates a new ExportConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to pretty-print JSON output.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Sets whether constant tensor data is written.
    pub fn include_weights(mut self, include_weights: bool) -> Self {
        self.include_weights = include_weights;
        self
    }
}
