use rand::Rng;
use rand::rngs::ThreadRng;

/// Where die faces come from.
pub trait DiceSource {
    /// One face of a die with `sides` sides, in `1..=sides`. `sides` is always positive.
    fn roll_die(&mut self, sides: i64) -> i64;
}

impl<D: DiceSource + ?Sized> DiceSource for &mut D {
    fn roll_die(&mut self, sides: i64) -> i64 {
        (**self).roll_die(sides)
    }
}

// ==========================================
// Random dice
// ==========================================

/// Uniform faces drawn from a [`rand::Rng`].
#[derive(Debug, Clone)]
pub struct RandomDice<R: Rng = ThreadRng> {
    rng: R,
}

impl RandomDice<ThreadRng> {
    pub fn new() -> Self {
        Self { rng: rand::rng() }
    }
}

impl Default for RandomDice<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RandomDice<R> {
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> DiceSource for RandomDice<R> {
    fn roll_die(&mut self, sides: i64) -> i64 {
        self.rng.random_range(1..=sides)
    }
}

// ==========================================
// Scripted dice
// ==========================================

/// Replays fixed faces in order, cycling when they run out.
///
/// Faces are clamped into `1..=sides` so a script never produces an impossible
/// face. Every requested side count is recorded.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    faces: Vec<i64>,
    next: usize,
    requested: Vec<i64>,
}

impl ScriptedDice {
    pub fn new(faces: impl Into<Vec<i64>>) -> Self {
        Self {
            faces: faces.into(),
            next: 0,
            requested: Vec::new(),
        }
    }

    /// Side counts asked for so far, in order.
    pub fn requested(&self) -> &[i64] {
        &self.requested
    }
}

impl DiceSource for ScriptedDice {
    fn roll_die(&mut self, sides: i64) -> i64 {
        self.requested.push(sides);
        let face = match self.faces.get(self.next % self.faces.len().max(1)) {
            Some(face) => *face,
            None => 1, // empty script
        };
        self.next += 1;
        face.clamp(1, sides)
    }
}
