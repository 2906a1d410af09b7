use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(color: Rgb) -> Self {
        [color.r, color.g, color.b]
    }
}

const DEFAULT_COLORS: [Rgb; 10] = [
    Rgb::new(173, 68, 207),
    Rgb::new(101, 255, 51),
    Rgb::new(71, 168, 201),
    Rgb::new(207, 104, 68),
    Rgb::new(61, 70, 166),
    Rgb::new(222, 67, 149),
    Rgb::new(222, 217, 67),
    Rgb::new(40, 148, 44),
    Rgb::new(100, 237, 228),
    Rgb::new(255, 255, 255),
];

/// Ordered, non-empty set of colors contacts are painted with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette(Vec<Rgb>);

impl Palette {
    /// Returns `None` for an empty color list.
    pub fn new(colors: Vec<Rgb>) -> Option<Self> {
        if colors.is_empty() {
            None
        } else {
            Some(Self(colors))
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Rgb> {
        self.0.get(index).copied()
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.0
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self(DEFAULT_COLORS.to_vec())
    }
}

/// Seeds the color tie-breaker, drawing a seed from entropy when none is configured.
///
/// The seed is logged so a session's color sequence can be replayed.
pub fn session_rng(seed: Option<u64>) -> StdRng {
    let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!("Color seed {}", seed);
    StdRng::seed_from_u64(seed)
}

/// Load-balances palette entries across live contacts.
///
/// Keeps one usage counter per palette entry. [`ColorAllocator::pick_color`] only reads the
/// counters; the owner records an assignment with [`ColorAllocator::retain`] and gives it back
/// with [`ColorAllocator::release`].
#[derive(Debug)]
pub struct ColorAllocator {
    usage: Vec<usize>,
    rng: StdRng,
}

impl ColorAllocator {
    pub fn new(palette_size: usize, rng: StdRng) -> Self {
        assert!(palette_size > 0, "palette must contain at least one color");
        Self {
            usage: vec![0; palette_size],
            rng,
        }
    }

    /// Picks one of the least used colors, uniformly at random among ties.
    pub fn pick_color(&mut self) -> usize {
        let min_usage = self.usage.iter().copied().min().unwrap_or(0);
        let ties = self.usage.iter().filter(|&&u| u == min_usage).count();
        let chosen = self.rng.gen_range(0..ties);
        let index = self
            .usage
            .iter()
            .enumerate()
            .filter(|&(_, &u)| u == min_usage)
            .nth(chosen)
            .map(|(i, _)| i)
            .unwrap_or(0);
        debug!("Picked color {} (usage {}, {} candidates)", index, min_usage, ties);
        index
    }

    pub fn retain(&mut self, index: usize) {
        match self.usage.get_mut(index) {
            Some(count) => *count += 1,
            None => warn!("retain: color index {} is outside the palette", index),
        }
    }

    pub fn release(&mut self, index: usize) {
        match self.usage.get_mut(index) {
            Some(count) if *count > 0 => *count -= 1,
            Some(_) => warn!("release: color {} is not in use", index),
            None => warn!("release: color index {} is outside the palette", index),
        }
    }

    pub fn usage(&self) -> &[usize] {
        &self.usage
    }

    /// Number of assignments currently held, i.e. the sum of all counters.
    pub fn in_use(&self) -> usize {
        self.usage.iter().sum()
    }
}
