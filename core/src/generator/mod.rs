use crate::*;
pub use random::*;

mod random;

/// Strategy for placing hazards on a board described by a [`GameConfig`].
pub trait LayoutGenerator {
    fn generate(self, config: GameConfig) -> Result<HazardLayout>;
}

/// Replays a precomputed layout, e.g. a board restored from a snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedLayoutGenerator {
    layout: HazardLayout,
}

impl FixedLayoutGenerator {
    pub fn new(layout: HazardLayout) -> Self {
        Self { layout }
    }
}

impl LayoutGenerator for FixedLayoutGenerator {
    fn generate(self, config: GameConfig) -> Result<HazardLayout> {
        config.validate()?;
        if self.layout.game_config() != config {
            log::warn!(
                "Fixed layout {:?} does not match requested config {:?}",
                self.layout.game_config(),
                config
            );
            return Err(GameError::InvalidConfig {
                size: config.size,
                hazards: config.hazards,
            });
        }
        Ok(self.layout)
    }
}
