//! Color themes for the canvas UI

use serde::{Deserialize, Serialize};

/// RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn as_css(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }

    pub fn as_css_alpha(&self, alpha: f64) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
    }
}

/// Tile backgrounds from 2 up to 2048
const CLASSIC_TILES: [Color; 11] = [
    Color::new(238, 228, 218),
    Color::new(237, 224, 200),
    Color::new(242, 177, 121),
    Color::new(245, 149, 99),
    Color::new(246, 124, 95),
    Color::new(246, 94, 59),
    Color::new(237, 207, 114),
    Color::new(237, 204, 97),
    Color::new(237, 200, 80),
    Color::new(237, 197, 63),
    Color::new(237, 194, 46),
];

/// Color theme for the game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    /// Page background
    pub background: Color,
    /// Board frame behind the tiles
    pub board: Color,
    /// Empty cell
    pub empty_cell: Color,
    pub tiles: [Color; 11],
    /// Tiles above 2048
    pub super_tile: Color,
    /// Text on 2 and 4
    pub dark_text: Color,
    /// Text on larger tiles
    pub light_text: Color,
    /// Outline around tiles a hint would merge
    pub hint_outline: Color,
    /// Title and score labels
    pub title_text: Color,
    /// Info panel text
    pub info_text: Color,
    /// Message text
    pub message_text: Color,
    pub win_color: Color,
    pub lose_color: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            background: Color::new(24, 24, 32),
            board: Color::new(60, 60, 80),
            empty_cell: Color::new(40, 40, 54),
            tiles: CLASSIC_TILES,
            super_tile: Color::new(60, 58, 50),
            dark_text: Color::new(119, 110, 101),
            light_text: Color::new(249, 246, 242),
            hint_outline: Color::new(100, 180, 255),
            title_text: Color::new(255, 220, 100),
            info_text: Color::new(160, 160, 180),
            message_text: Color::new(255, 220, 100),
            win_color: Color::new(100, 255, 150),
            lose_color: Color::new(255, 100, 100),
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            background: Color::new(250, 248, 239),
            board: Color::new(187, 173, 160),
            empty_cell: Color::new(205, 193, 180),
            tiles: CLASSIC_TILES,
            super_tile: Color::new(60, 58, 50),
            dark_text: Color::new(119, 110, 101),
            light_text: Color::new(249, 246, 242),
            hint_outline: Color::new(30, 100, 200),
            title_text: Color::new(119, 110, 101),
            info_text: Color::new(60, 60, 80),
            message_text: Color::new(180, 120, 0),
            win_color: Color::new(50, 180, 80),
            lose_color: Color::new(220, 50, 50),
        }
    }

    /// High contrast theme
    pub fn high_contrast() -> Self {
        Self {
            background: Color::new(0, 0, 0),
            board: Color::new(100, 100, 100),
            empty_cell: Color::new(20, 20, 20),
            tiles: [
                Color::new(255, 255, 255),
                Color::new(200, 200, 200),
                Color::new(255, 255, 0),
                Color::new(200, 160, 0),
                Color::new(255, 0, 0),
                Color::new(160, 0, 0),
                Color::new(0, 255, 255),
                Color::new(0, 160, 160),
                Color::new(0, 255, 0),
                Color::new(0, 140, 0),
                Color::new(255, 0, 255),
            ],
            super_tile: Color::new(0, 0, 255),
            dark_text: Color::new(0, 0, 0),
            light_text: Color::new(255, 255, 255),
            hint_outline: Color::new(0, 160, 255),
            title_text: Color::new(255, 255, 255),
            info_text: Color::new(200, 200, 200),
            message_text: Color::new(255, 255, 0),
            win_color: Color::new(0, 255, 0),
            lose_color: Color::new(255, 0, 0),
        }
    }

    /// Look up a theme by name, falling back to dark
    pub fn by_name(name: &str) -> Self {
        match name {
            "light" => Theme::light(),
            "high_contrast" => Theme::high_contrast(),
            _ => Theme::dark(),
        }
    }

    /// Background for a tile value (0 is an empty cell)
    pub fn tile_bg(&self, value: u32) -> Color {
        if value == 0 {
            return self.empty_cell;
        }
        match value.trailing_zeros() as usize {
            step @ 1..=11 => self.tiles[step - 1],
            _ => self.super_tile,
        }
    }

    pub fn tile_text(&self, value: u32) -> Color {
        if value <= 4 {
            self.dark_text
        } else {
            self.light_text
        }
    }
}
