//! The fixed block palette shared by the block colorer and the syntax highlighter.
//!
//! Nested blocks pick their color from [`PALETTE`] through a per-parent
//! [`ColorCycle`], so sibling blocks cycle through the palette while a block
//! never reuses its parent's color.
//!
//! # Example
//!
//! ```
//! use querybuilder::theme::palette::{ColorCycle, PALETTE};
//!
//! let mut cycle = ColorCycle::default();
//! assert_eq!(cycle.next_distinct_from(None), PALETTE[0]);
//! // The parent is painted with PALETTE[1], so that entry is skipped
//! assert_eq!(cycle.next_distinct_from(Some(PALETTE[1])), PALETTE[2]);
//! ```

use ratatui::style::Color;

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Returns a lighter tint of this color.
    ///
    /// `factor` is a percentage applied to the HSV value: `150` makes the color
    /// 50% brighter. Once the value saturates at 255 the excess is taken out of
    /// the saturation, so large factors fade towards white. Factors below 100
    /// darken the color instead.
    ///
    /// ```
    /// use querybuilder::theme::palette::Rgb;
    ///
    /// let blue = Rgb::new(0, 87, 174);
    /// let tint = blue.lighter(180);
    /// assert!(tint.r > blue.r && tint.g > blue.g && tint.b > blue.b);
    /// assert_eq!(blue.lighter(100), blue);
    /// ```
    pub fn lighter(self, factor: u32) -> Self {
        if factor == 0 {
            return self;
        }

        let (h, mut s, mut v) = self.to_hsv();
        v = v * factor as f32 / 100.0;

        if v > 255.0 {
            s = (s - (v - 255.0)).max(0.0);
            v = 255.0;
        }

        Self::from_hsv(h, s, v)
    }

    /// Hue in degrees, saturation and value in `0.0..=255.0`.
    fn to_hsv(self) -> (f32, f32, f32) {
        let r = self.r as f32;
        let g = self.g as f32;
        let b = self.b as f32;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let v = max;
        let s = if max == 0.0 { 0.0 } else { delta * 255.0 / max };
        let h = if delta == 0.0 {
            0.0
        } else if max == r {
            60.0 * (((g - b) / delta).rem_euclid(6.0))
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };

        (h, s, v)
    }

    fn from_hsv(h: f32, s: f32, v: f32) -> Self {
        let s = s / 255.0;
        let c = v * s;
        let x = c * (1.0 - ((h / 60.0).rem_euclid(2.0) - 1.0).abs());
        let m = v - c;

        let (r, g, b) = match (h / 60.0) as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        let channel = |value: f32| (value + m).round().clamp(0.0, 255.0) as u8;
        Self::new(channel(r), channel(g), channel(b))
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::Rgb(rgb.r, rgb.g, rgb.b)
    }
}

/// The eight block colors, in allocation order.
pub const PALETTE: [Rgb; 8] = [
    Rgb::new(0, 87, 174),
    Rgb::new(243, 195, 0),
    Rgb::new(0, 179, 119),
    Rgb::new(235, 115, 49),
    Rgb::new(139, 179, 0),
    Rgb::new(85, 87, 83),
    Rgb::new(0, 140, 0),
    Rgb::new(117, 81, 26),
];

/// Returns the palette entry for an arbitrary index, wrapping around.
pub fn palette_color(index: usize) -> Rgb {
    PALETTE[index & 7]
}

/// Running palette index owned by a parent block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorCycle {
    index: usize,
}

impl ColorCycle {
    /// Returns the index of the next palette entry to be handed out.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Hands out the next palette color that differs from `parent`.
    ///
    /// The index advances once per palette entry read, including the entries
    /// skipped because they match the parent.
    pub fn next_distinct_from(&mut self, parent: Option<Rgb>) -> Rgb {
        loop {
            let color = palette_color(self.index);
            self.index = (self.index + 1) & 7;

            if Some(color) != parent {
                return color;
            }
        }
    }
}
