use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::styles::{PlatformPolicy, ShotMode, StyleCatalog};

const HISTORY_MAX_SIZE: usize = 10;

pub struct SelfieStrategy<R: Rng = StdRng> {
    catalog: StyleCatalog,
    policy: PlatformPolicy,
    history: VecDeque<String>,
    rng: R,
}

impl SelfieStrategy<StdRng> {
    pub fn new(catalog: StyleCatalog, policy: PlatformPolicy) -> Self {
        Self::with_rng(catalog, policy, StdRng::from_entropy())
    }
}

impl Default for SelfieStrategy<StdRng> {
    fn default() -> Self {
        Self::new(StyleCatalog::default(), PlatformPolicy::default())
    }
}

impl<R: Rng> SelfieStrategy<R> {
    pub fn with_rng(catalog: StyleCatalog, policy: PlatformPolicy, rng: R) -> Self {
        Self {
            catalog,
            policy,
            history: VecDeque::with_capacity(HISTORY_MAX_SIZE),
            rng,
        }
    }

    pub fn catalog(&self) -> &StyleCatalog {
        &self.catalog
    }

    pub fn select_style(
        &mut self,
        platform: &str,
        force_mode: Option<ShotMode>,
        exclude_recent: bool,
    ) -> String {
        let mode = match force_mode {
            Some(mode) => mode,
            None => {
                let ratio = self.policy.selfie_ratio(platform);
                if self.rng.gen::<f64>() < ratio {
                    ShotMode::Selfie
                } else {
                    ShotMode::Portrait
                }
            }
        };

        let pool = self.catalog.pool(mode);
        let mut candidates: Vec<&'static str> = if exclude_recent && !self.history.is_empty() {
            pool.iter()
                .copied()
                .filter(|style| !self.history.iter().any(|recent| recent == style))
                .collect()
        } else {
            pool.to_vec()
        };
        // Every pool entry seen recently: fall back to the full pool rather
        // than failing, and leave the history as it is.
        if candidates.is_empty() {
            candidates = pool.to_vec();
        }

        let selected = candidates[self.rng.gen_range(0..candidates.len())];

        self.history.push_back(selected.to_string());
        if self.history.len() > HISTORY_MAX_SIZE {
            self.history.pop_front();
        }

        selected.to_string()
    }

    pub fn enhancement_for<'a>(&'a self, style: &'a str, mode: ShotMode) -> &'a str {
        self.catalog.enhancement_for(style, mode)
    }

    #[allow(dead_code)]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}
