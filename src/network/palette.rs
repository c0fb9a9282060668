use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Serialize, Serializer};

/// An RGB display color, fixed for the lifetime of whatever it was given to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DisplayColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl DisplayColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    fn from_hsv(hue: f32, saturation: f32, value: f32) -> Self {
        let hue = hue.rem_euclid(1.0) * 6.0;
        let sector = hue.floor();
        let fraction = hue - sector;

        let p = value * (1.0 - saturation);
        let q = value * (1.0 - saturation * fraction);
        let t = value * (1.0 - saturation * (1.0 - fraction));

        let (r, g, b) = match sector as u8 {
            0 => (value, t, p),
            1 => (q, value, p),
            2 => (p, value, t),
            3 => (p, q, value),
            4 => (t, p, value),
            _ => (value, p, q),
        };

        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(channel(r), channel(g), channel(b))
    }
}

impl fmt::Display for DisplayColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for DisplayColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Hands out a fresh pseudo-random color per draw.
///
/// A palette can be cloned onto a worker thread and the advanced clone
/// swapped back in. Two palettes are equal when they share a seed and have
/// handed out the same number of colors.
#[derive(Clone, Debug)]
pub struct Palette {
    seed: u64,
    drawn: u64,
    rng: StdRng,
}

impl PartialEq for Palette {
    fn eq(&self, other: &Self) -> bool {
        self.seed == other.seed && self.drawn == other.drawn
    }
}

impl Eq for Palette {}

impl Palette {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed,
            drawn: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn next_color(&mut self) -> DisplayColor {
        self.drawn = self.drawn.wrapping_add(1);

        let hue = self.rng.gen_range(0.0..1.0);
        let saturation = self.rng.gen_range(0.45..0.8);
        DisplayColor::from_hsv(hue, saturation, 0.92)
    }

    pub fn drawn(&self) -> u64 {
        self.drawn
    }
}
