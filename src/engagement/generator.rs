use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{EngagementReading, HeadPosition};

const HEAD_POSITIONS: [HeadPosition; 4] = [
    HeadPosition::Center,
    HeadPosition::Left,
    HeadPosition::Right,
    HeadPosition::Down,
];

const ATTENTION_WEIGHT: f64 = 0.6;
const PARTICIPATION_WEIGHT: f64 = 0.4;

/// Placeholder engagement scorer: uniform draws plus a small posture
/// heuristic, standing in for real camera inference. The RNG is injected
/// so output is reproducible under a fixed seed.
///
/// Draw order is fixed (attention, participation, head position, eye
/// contact, movement bonus); reordering would change seeded sequences.
pub struct ScoreGenerator<R: Rng = StdRng> {
    rng: R,
}

impl ScoreGenerator<StdRng> {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> ScoreGenerator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    pub fn generate(&mut self) -> EngagementReading {
        let base_attention: i32 = self.rng.gen_range(60..90);
        let base_participation: i32 = self.rng.gen_range(50..90);

        let head_position = HEAD_POSITIONS[self.rng.gen_range(0..HEAD_POSITIONS.len())];
        let eye_contact = self.rng.gen::<f64>() > 0.3;

        let attention_score = adjust_attention(base_attention, head_position, eye_contact);

        let movement_bonus: i32 = self.rng.gen_range(0..15);
        let participation_score = clamp_score(base_participation + movement_bonus);

        let overall_score = combine_scores(attention_score, participation_score);

        EngagementReading {
            attention_score,
            participation_score,
            overall_score,
            head_position,
            eye_contact,
        }
    }
}

/// Posture heuristic: facing forward with eye contact reads as more
/// attentive, looking down as less. Result is clamped to [0,100].
pub fn adjust_attention(base: i32, head_position: HeadPosition, eye_contact: bool) -> u8 {
    let adjusted = if head_position == HeadPosition::Center && eye_contact {
        base + 20
    } else if head_position == HeadPosition::Down {
        base - 20
    } else {
        base
    };

    clamp_score(adjusted)
}

/// Weighted blend of the two component scores, rounded to the nearest
/// integer.
pub fn combine_scores(attention: u8, participation: u8) -> u8 {
    (f64::from(attention) * ATTENTION_WEIGHT + f64::from(participation) * PARTICIPATION_WEIGHT)
        .round() as u8
}

fn clamp_score(value: i32) -> u8 {
    value.clamp(0, 100) as u8
}
