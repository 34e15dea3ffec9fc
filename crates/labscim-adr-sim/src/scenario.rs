use rand::RngExt as _;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Maximum NbTrans; one loss draw is pre-rolled per possible copy.
pub const MAX_COPIES: usize = 3;

/// Configuration for a deterministic uplink channel scenario.
#[derive(Debug, Clone)]
pub struct ChannelScenarioConfig {
    pub seed: u64,
    pub uplinks: u32,
    /// Channel SNR (dB) at TX power index 0, before any walk.
    pub start_snr_db: f32,
    pub min_snr_db: f32,
    pub max_snr_db: f32,
    /// Largest SNR change between consecutive uplinks.
    pub snr_step_db: f32,
    /// Independent loss probability (%) of each transmitted copy.
    pub loss_percent: f32,
}

impl Default for ChannelScenarioConfig {
    fn default() -> Self {
        ChannelScenarioConfig {
            seed: 1,
            uplinks: 200,
            start_snr_db: 0.0,
            min_snr_db: -15.0,
            max_snr_db: 10.0,
            snr_step_db: 1.0,
            loss_percent: 5.0,
        }
    }
}

/// Channel conditions seen by one uplink.
#[derive(Debug, Clone)]
pub struct ChannelFrame {
    /// SNR (dB) a copy sent at TX power index 0 would be received with.
    pub snr_db: f32,
    pub loss_percent: f32,
    /// Uniform draws in `[0, 1)`, one per copy; a copy is lost when its draw
    /// falls below `loss_percent / 100`.
    pub loss_draws: [f32; MAX_COPIES],
}

impl ChannelFrame {
    pub fn copy_lost(&self, copy: usize) -> bool {
        self.loss_draws[copy] < self.loss_percent / 100.0
    }
}

/// Deterministic random-walk channel generator.
///
/// Given a seed, produces reproducible sequences of [`ChannelFrame`]s whose
/// SNR evolves via random-walk steps clamped to the configured bounds.
#[derive(Debug)]
pub struct ChannelScenario {
    cfg: ChannelScenarioConfig,
    rng: StdRng,
    snr_db: f64,
}

impl ChannelScenario {
    pub fn new(cfg: ChannelScenarioConfig) -> Self {
        let rng = StdRng::seed_from_u64(cfg.seed);
        let snr_db = (cfg.start_snr_db as f64).clamp(cfg.min_snr_db as f64, cfg.max_snr_db as f64);
        Self { cfg, rng, snr_db }
    }

    pub fn frames(&mut self) -> Vec<ChannelFrame> {
        let mut frames = Vec::with_capacity(self.cfg.uplinks as usize);

        for _ in 0..self.cfg.uplinks {
            let delta = rand_signed(&mut self.rng, self.cfg.snr_step_db as f64);
            self.snr_db = (self.snr_db + delta)
                .clamp(self.cfg.min_snr_db as f64, self.cfg.max_snr_db as f64);

            let mut loss_draws = [0.0f32; MAX_COPIES];
            for draw in loss_draws.iter_mut() {
                *draw = self.rng.random::<f64>() as f32;
            }

            frames.push(ChannelFrame {
                snr_db: self.snr_db as f32,
                loss_percent: self.cfg.loss_percent,
                loss_draws,
            });
        }

        frames
    }
}

fn rand_signed(rng: &mut StdRng, max_step: f64) -> f64 {
    if max_step <= 0.0 {
        return 0.0;
    }
    let mag = rng.random::<f64>() * max_step;
    if rng.random::<bool>() { mag } else { -mag }
}
