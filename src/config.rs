use crate::error::{Result, ShamirError};

/// Default PBKDF2-HMAC-SHA256 iteration count for passphrase derivation
pub const DEFAULT_KDF_ITERATIONS: u32 = 600_000;

/// Processing mode for polynomial evaluation and interpolation
///
/// Both modes produce byte-identical output; `Parallel` spreads the work over
/// the rayon thread pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitMode {
    /// Process data sequentially
    #[default]
    Sequential,
    /// Process data in parallel
    Parallel,
}

/// Configuration options for splitting and reconstruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Processing mode
    pub mode: SplitMode,
    /// PBKDF2 rounds used by passphrase splitting
    pub kdf_iterations: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: SplitMode::default(),
            kdf_iterations: DEFAULT_KDF_ITERATIONS,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the processing mode
    pub fn with_mode(mut self, mode: SplitMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the passphrase KDF iteration count
    ///
    /// Shares derived from a passphrase only depend on this value at split
    /// time; recovery never needs it.
    pub fn with_kdf_iterations(mut self, iterations: u32) -> Result<Self> {
        if iterations == 0 {
            return Err(ShamirError::InvalidConfig(
                "KDF iterations cannot be zero".into(),
            ));
        }
        self.kdf_iterations = iterations;
        Ok(self)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.kdf_iterations == 0 {
            return Err(ShamirError::InvalidConfig(
                "KDF iterations cannot be zero".into(),
            ));
        }

        Ok(())
    }
}
