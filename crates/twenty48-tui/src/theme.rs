use clap::ValueEnum;
use crossterm::style::Color;

/// Theme names accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeName {
    Dark,
    Light,
    HighContrast,
}

impl ThemeName {
    pub fn theme(self) -> Theme {
        match self {
            ThemeName::Dark => Theme::dark(),
            ThemeName::Light => Theme::light(),
            ThemeName::HighContrast => Theme::high_contrast(),
        }
    }

    /// Next theme in the rotation
    pub fn next(self) -> Self {
        match self {
            ThemeName::Dark => ThemeName::Light,
            ThemeName::Light => ThemeName::HighContrast,
            ThemeName::HighContrast => ThemeName::Dark,
        }
    }
}

/// Color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: ThemeName,
    /// Background color
    pub bg: Color,
    /// Default text color
    pub fg: Color,
    /// Board frame color
    pub border: Color,
    /// Empty cell color
    pub empty: Color,
    /// Tile backgrounds from 2 up to 2048
    pub tiles: [Color; 11],
    /// Tiles above 2048
    pub super_tile: Color,
    /// Text on low tiles (2 and 4)
    pub tile_dark_text: Color,
    /// Text on everything else
    pub tile_light_text: Color,
    /// Hinted merge highlight
    pub hint_bg: Color,
    pub error: Color,
    pub success: Color,
    /// Score/info text color
    pub info: Color,
    /// Key binding text color
    pub key: Color,
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
            name: ThemeName::Dark,
            bg: Color::Rgb { r: 20, g: 22, b: 30 },
            fg: Color::Rgb { r: 230, g: 230, b: 240 },
            border: Color::Rgb { r: 70, g: 75, b: 90 },
            empty: Color::Rgb { r: 40, g: 44, b: 56 },
            tiles: classic_tiles(),
            super_tile: Color::Rgb { r: 60, g: 58, b: 50 },
            tile_dark_text: Color::Rgb { r: 119, g: 110, b: 101 },
            tile_light_text: Color::Rgb { r: 249, g: 246, b: 242 },
            hint_bg: Color::Rgb { r: 70, g: 90, b: 140 },
            error: Color::Rgb { r: 255, g: 90, b: 90 },
            success: Color::Rgb { r: 90, g: 255, b: 130 },
            info: Color::Rgb { r: 160, g: 165, b: 185 },
            key: Color::Rgb { r: 255, g: 210, b: 100 },
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            name: ThemeName::Light,
            bg: Color::Rgb { r: 250, g: 248, b: 239 },
            fg: Color::Rgb { r: 119, g: 110, b: 101 },
            border: Color::Rgb { r: 187, g: 173, b: 160 },
            empty: Color::Rgb { r: 205, g: 193, b: 180 },
            tiles: classic_tiles(),
            super_tile: Color::Rgb { r: 60, g: 58, b: 50 },
            tile_dark_text: Color::Rgb { r: 119, g: 110, b: 101 },
            tile_light_text: Color::Rgb { r: 249, g: 246, b: 242 },
            hint_bg: Color::Rgb { r: 180, g: 200, b: 255 },
            error: Color::Rgb { r: 220, g: 50, b: 50 },
            success: Color::Rgb { r: 40, g: 160, b: 60 },
            info: Color::Rgb { r: 90, g: 90, b: 110 },
            key: Color::Rgb { r: 200, g: 120, b: 20 },
        }
    }

    /// High contrast theme
    pub fn high_contrast() -> Self {
        Self {
            name: ThemeName::HighContrast,
            bg: Color::Black,
            fg: Color::White,
            border: Color::Grey,
            empty: Color::Rgb { r: 30, g: 30, b: 30 },
            tiles: [
                Color::White,
                Color::Grey,
                Color::Yellow,
                Color::DarkYellow,
                Color::Red,
                Color::DarkRed,
                Color::Cyan,
                Color::DarkCyan,
                Color::Green,
                Color::DarkGreen,
                Color::Magenta,
            ],
            super_tile: Color::Blue,
            tile_dark_text: Color::Black,
            tile_light_text: Color::White,
            hint_bg: Color::Blue,
            error: Color::Red,
            success: Color::Green,
            info: Color::Grey,
            key: Color::Yellow,
        }
    }

    /// Background color for a tile value (0 is an empty cell)
    pub fn tile_bg(&self, value: u32) -> Color {
        if value == 0 {
            return self.empty;
        }
        let step = value.trailing_zeros() as usize;
        match step {
            1..=11 => self.tiles[step - 1],
            _ => self.super_tile,
        }
    }

    /// Text color for a tile value
    pub fn tile_fg(&self, value: u32) -> Color {
        if value <= 4 {
            self.tile_dark_text
        } else {
            self.tile_light_text
        }
    }
}

fn classic_tiles() -> [Color; 11] {
    [
        Color::Rgb { r: 238, g: 228, b: 218 },
        Color::Rgb { r: 237, g: 224, b: 200 },
        Color::Rgb { r: 242, g: 177, b: 121 },
        Color::Rgb { r: 245, g: 149, b: 99 },
        Color::Rgb { r: 246, g: 124, b: 95 },
        Color::Rgb { r: 246, g: 94, b: 59 },
        Color::Rgb { r: 237, g: 207, b: 114 },
        Color::Rgb { r: 237, g: 204, b: 97 },
        Color::Rgb { r: 237, g: 200, b: 80 },
        Color::Rgb { r: 237, g: 197, b: 63 },
        Color::Rgb { r: 237, g: 194, b: 46 },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_colors() {
        let theme = Theme::dark();
        assert_eq!(theme.tile_bg(0), theme.empty);
        assert_eq!(theme.tile_bg(2), theme.tiles[0]);
        assert_eq!(theme.tile_bg(2048), theme.tiles[10]);
        assert_eq!(theme.tile_bg(4096), theme.super_tile);
        assert_eq!(theme.tile_fg(4), theme.tile_dark_text);
        assert_eq!(theme.tile_fg(8), theme.tile_light_text);
    }

    #[test]
    fn test_theme_rotation() {
        let mut name = ThemeName::Dark;
        for _ in 0..3 {
            name = name.next();
        }
        assert_eq!(name, ThemeName::Dark);
        assert_eq!(ThemeName::Light.theme().name, ThemeName::Light);
    }
}
