use xl_core::config;
use xl_normalize::CastInsertionOptions;

#[derive(Debug, Clone, Default)]
pub struct DebugOptions {
    /// Include source context and codes when rendering diagnostics.
    pub verbose: bool,
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Normalize compilation units on the rayon thread pool.
    pub parallel: bool,
    pub cast_insertion: CastInsertionOptions,
    pub debug: DebugOptions,
}

impl PipelineOptions {
    /// Reads `XL_SERIAL`, `XL_VERBOSE`, `XL_LOSSY` and `XL_BOOTSTRAP`.
    pub fn from_env() -> Self {
        Self {
            parallel: !config::serial_mode(),
            cast_insertion: CastInsertionOptions::from_env(),
            debug: DebugOptions {
                verbose: config::verbose_diagnostics(),
            },
        }
    }

    pub fn serial(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            cast_insertion: CastInsertionOptions::default(),
            debug: DebugOptions::default(),
        }
    }
}
