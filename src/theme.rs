use rand::seq::IndexedRandom;
use rand::Rng;

/// Accent colours used for headings and borders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accent {
    Pink,
    Blue,
    Green,
    Orange,
    Teal,
    Purple,
}

const ACCENTS: [Accent; 6] = [
    Accent::Pink,
    Accent::Blue,
    Accent::Green,
    Accent::Orange,
    Accent::Teal,
    Accent::Purple,
];

impl Accent {
    fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Accent::Pink => (0xe2, 0x52, 0x38),
            Accent::Blue => (0x3f, 0x8e, 0xfc),
            Accent::Green => (0x5e, 0xc2, 0x6a),
            Accent::Orange => (0xf2, 0x9d, 0x38),
            Accent::Teal => (0x2b, 0xbb, 0xad),
            Accent::Purple => (0x9b, 0x6a, 0xd8),
        }
    }
}

/// Styling for one view. Chosen once when the view is built and passed to
/// whatever renders it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub accent: Accent,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Accent::Pink,
        }
    }
}

impl Theme {
    pub fn new(accent: Accent) -> Self {
        Self { accent }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        ACCENTS
            .choose(rng)
            .copied()
            .map(Self::new)
            .unwrap_or_default()
    }

    pub fn tui_color(&self) -> ratatui::style::Color {
        let (r, g, b) = self.accent.rgb();
        ratatui::style::Color::Rgb(r, g, b)
    }

    pub fn term_color(&self) -> crossterm::style::Color {
        let (r, g, b) = self.accent.rgb();
        crossterm::style::Color::Rgb { r, g, b }
    }
}
