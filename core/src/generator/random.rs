use ndarray::Array2;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use super::*;

/// Uniform hazard placement: every subset of `hazards` positions is equally likely.
///
/// The full position list is shuffled with a seeded RNG and the first `hazards` entries become hazards, so the
/// same seed always yields the same layout.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RandomLayoutGenerator {
    seed: u64,
}

impl RandomLayoutGenerator {
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Uses a fresh seed drawn from the thread RNG.
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

impl LayoutGenerator for RandomLayoutGenerator {
    fn generate(self, config: GameConfig) -> Result<HazardLayout> {
        config.validate()?;

        let mut positions: Vec<Coord2> = iter_positions(config.size).collect();
        let mut rng = SmallRng::seed_from_u64(self.seed);
        // only the prefix that becomes hazards needs to be shuffled
        let (hazards, _) = positions.partial_shuffle(&mut rng, config.hazards.into());

        let mut hazard_mask: Array2<bool> = Array2::default(grid_shape(config.size));
        for &coords in hazards.iter() {
            hazard_mask[coords.to_nd_index()] = true;
        }

        let layout = HazardLayout::from_hazard_mask(hazard_mask)?;

        // double check hazard count
        if layout.hazard_count() != config.hazards {
            log::warn!(
                "Generated layout count mismatch, actual: {}, requested: {}",
                layout.hazard_count(),
                config.hazards
            );
        }
        log::debug!(
            "Generated {}x{} layout with {} hazards from seed {:#018x}",
            config.size.0,
            config.size.1,
            layout.hazard_count(),
            self.seed
        );
        Ok(layout)
    }
}
