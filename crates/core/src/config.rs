use crate::types::DEFAULT_COLOR_COUNT;

/// Resolver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Size of the color pool, in `[3, 6]`
    pub color_count: u8,
    /// Seed for board generation and refills
    pub seed: u32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            color_count: DEFAULT_COLOR_COUNT,
            seed: 1,
        }
    }
}

impl ResolverConfig {
    /// Create from environment variables
    ///
    /// - `MATCH3_COLOR_COUNT`: color pool size (default 5)
    /// - `MATCH3_SEED`: RNG seed (default 1)
    ///
    /// Unparsable values fall back to the defaults; range checks happen when
    /// the board is built.
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();
        let color_count = env::var("MATCH3_COLOR_COUNT")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.color_count);
        let seed = env::var("MATCH3_SEED")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.seed);

        Self { color_count, seed }
    }

    pub fn with_seed(self, seed: u32) -> Self {
        Self { seed, ..self }
    }

    pub fn with_color_count(self, color_count: u8) -> Self {
        Self {
            color_count,
            ..self
        }
    }
}
