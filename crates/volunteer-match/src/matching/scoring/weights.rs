/// Points awarded per signal. The four weights sum to the maximum score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub skills: f64,
    pub availability: f64,
    pub location: f64,
    pub preferences: f64,
}

pub const MATCH_WEIGHTS: ScoreWeights = ScoreWeights {
    skills: 60.0,
    availability: 25.0,
    location: 10.0,
    preferences: 5.0,
};

/// Upper bound of a compatibility score.
pub const MAX_SCORE: u8 = 100;

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.skills + self.availability + self.location + self.preferences
    }
}
