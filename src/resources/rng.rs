use bevy_ecs::prelude::*;

/// Random source for puzzle generation and cosmetic variation.
///
/// Seeded from the config when a seed is set, so a run can be replayed.
#[derive(Resource, Debug, Clone)]
pub struct GameRng(pub fastrand::Rng);

impl GameRng {
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self(fastrand::Rng::with_seed(seed)),
            None => Self(fastrand::Rng::new()),
        }
    }
}
