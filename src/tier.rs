/// Difficulty bracket derived from the cumulative run score
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum TierId {
    Ember,
    Inferno,
    Doom,
}

/// A tier with its entry threshold and the base tone front-ends pitch
/// their hit sound from (carried as data only, no audio is produced here).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tier {
    pub id: TierId,
    pub min_score: u32,
    pub tone_hz: u32,
}

pub const TIERS: [Tier; 3] = [
    Tier {
        id: TierId::Ember,
        min_score: 0,
        tone_hz: 380,
    },
    Tier {
        id: TierId::Inferno,
        min_score: 20,
        tone_hz: 520,
    },
    Tier {
        id: TierId::Doom,
        min_score: 45,
        tone_hz: 680,
    },
];

/// Highest tier whose threshold the score has reached; falls back to the
/// lowest tier (scores are unsigned, so that branch cannot be taken in
/// practice).
pub fn classify(score: u32) -> &'static Tier {
    TIERS
        .iter()
        .rev()
        .find(|tier| score >= tier.min_score)
        .unwrap_or(&TIERS[0])
}
