use std::collections::HashMap;
use std::str::FromStr;

use once_cell::sync::Lazy;
use palette::{LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Sector colours
// ---------------------------------------------------------------------------

/// Colour for sectors missing from the table.
pub const DEFAULT_SECTOR_COLOR: &str = "#95d2bd";

/// Sector name → hex colour, German and English names side by side.
static SECTOR_COLORS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        // German
        ("Industrie", "#f4823d"),
        ("Energie", "#e06666"),
        ("Gebäude", "#3c78d8"),
        ("Mobilität", "#f1c232"),
        ("Landwirtschaft", "#7bb662"),
        ("Abfall", "#8e7cc3"),
        ("Verkehr", "#f1c232"),
        ("F-Gase", "#00F5D4"),
        // English
        ("Industry", "#f4823d"),
        ("Energy", "#e06666"),
        ("Buildings", "#3c78d8"),
        ("Transport", "#f1c232"),
        ("Farming", "#7bb662"),
        ("Waste management", "#8e7cc3"),
        ("Traffic", "#f1c232"),
        ("F-Gases", "#00F5D4"),
    ])
});

/// Hex colour for a sector. Exact, case-sensitive match; unknown sectors get
/// [`DEFAULT_SECTOR_COLOR`].
pub fn sector_color(sector: &str) -> &'static str {
    SECTOR_COLORS
        .get(sector)
        .copied()
        .unwrap_or(DEFAULT_SECTOR_COLOR)
}

/// [`sector_color`] as an sRGB triple.
pub fn sector_rgb(sector: &str) -> Srgb<u8> {
    Srgb::from_str(sector_color(sector))
        .or_else(|_| Srgb::from_str(DEFAULT_SECTOR_COLOR))
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Sequential scale: value → blue shade
// ---------------------------------------------------------------------------

/// Nine-step sequential blues, light to dark.
const BLUES: [(u8, u8, u8); 9] = [
    (0xf7, 0xfb, 0xff),
    (0xde, 0xeb, 0xf7),
    (0xc6, 0xdb, 0xef),
    (0x9e, 0xca, 0xe1),
    (0x6b, 0xae, 0xd6),
    (0x42, 0x92, 0xc6),
    (0x21, 0x71, 0xb5),
    (0x08, 0x51, 0x9c),
    (0x08, 0x30, 0x6b),
];

/// Maps values in a numeric domain onto the blues ramp.
#[derive(Debug, Clone)]
pub struct ColorScale {
    domain: (f64, f64),
    stops: Vec<LinSrgb>,
}

impl ColorScale {
    /// Build a scale over `[lo, hi]`, usually `[0, max]` from
    /// [`crate::stats::color_domain`].
    pub fn new(domain: (f64, f64)) -> Self {
        let stops = BLUES
            .iter()
            .map(|&(r, g, b)| Srgb::new(r, g, b).into_format::<f32>().into_linear())
            .collect();
        ColorScale { domain, stops }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Position of `value` in the domain, clamped to `[0, 1]`. A collapsed
    /// domain maps everything to 0.
    fn position(&self, value: f64) -> f32 {
        let (lo, hi) = self.domain;
        let span = hi - lo;
        if span.is_nan() || span <= 0.0 || !value.is_finite() {
            return 0.0;
        }
        ((value - lo) / span).clamp(0.0, 1.0) as f32
    }

    /// Colour for `value`.
    pub fn rgb_at(&self, value: f64) -> Srgb<u8> {
        let t = self.position(value) * (self.stops.len() - 1) as f32;
        let i = (t.floor() as usize).min(self.stops.len() - 2);
        let mixed = self.stops[i].mix(self.stops[i + 1], t - i as f32);
        Srgb::<f32>::from_linear(mixed).into_format::<u8>()
    }

    /// Colour for `value` as `#rrggbb`.
    pub fn color_at(&self, value: f64) -> String {
        to_hex(self.rgb_at(value))
    }

    /// `n` evenly spaced (value, colour) pairs spanning the domain.
    pub fn legend_entries(&self, n: usize) -> Vec<(f64, String)> {
        let (lo, hi) = self.domain;
        match n {
            0 => Vec::new(),
            1 => vec![(lo, self.color_at(lo))],
            _ => (0..n)
                .map(|i| {
                    let v = lo + (hi - lo) * i as f64 / (n - 1) as f64;
                    (v, self.color_at(v))
                })
                .collect(),
        }
    }
}

pub fn to_hex(c: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", c.red, c.green, c.blue)
}
