use anyhow::Context;
use rand::rngs::StdRng;
use rand::SeedableRng;

const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Fixes every random draw of a run when set.
    pub seed: Option<u64>,
    pub top_n: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let seed = lookup("CHURN_SEED")
            .filter(|value| !value.trim().is_empty())
            .map(|value| {
                value
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("CHURN_SEED must be an unsigned integer, got {value:?}"))
            })
            .transpose()?;

        let top_n = match lookup("CHURN_TOP_N").filter(|value| !value.trim().is_empty()) {
            Some(value) => {
                let parsed = value
                    .trim()
                    .parse::<usize>()
                    .with_context(|| format!("CHURN_TOP_N must be a positive integer, got {value:?}"))?;
                if parsed == 0 {
                    anyhow::bail!("CHURN_TOP_N must be greater than zero");
                }
                parsed
            }
            None => DEFAULT_TOP_N,
        };

        Ok(Self { seed, top_n })
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        if seed.is_some() {
            self.seed = seed;
        }
        self
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
