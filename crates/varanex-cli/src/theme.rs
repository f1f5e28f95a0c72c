use crossterm::style::Color;
use varanex_core::ThemeName;

/// Terminal colors for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub name: ThemeName,
    pub fg: Color,
    pub accent: Color,
    pub muted: Color,
    pub error: Color,
    pub user_color: Color,
    pub assistant_color: Color,
    pub code: Color,
}

impl Palette {
    pub fn light() -> Self {
        Self {
            name: ThemeName::Light,
            fg: Color::Rgb { r: 30, g: 41, b: 59 },
            accent: Color::Rgb { r: 37, g: 99, b: 235 },
            muted: Color::Rgb { r: 100, g: 116, b: 139 },
            error: Color::Rgb { r: 220, g: 38, b: 38 },
            user_color: Color::Rgb { r: 37, g: 99, b: 235 },
            assistant_color: Color::Rgb { r: 21, g: 128, b: 61 },
            code: Color::Rgb { r: 190, g: 24, b: 93 },
        }
    }

    pub fn dark() -> Self {
        Self {
            name: ThemeName::Dark,
            fg: Color::Rgb { r: 226, g: 232, b: 240 },
            accent: Color::Rgb { r: 96, g: 165, b: 250 },
            muted: Color::Rgb { r: 148, g: 163, b: 184 },
            error: Color::Rgb { r: 248, g: 113, b: 113 },
            user_color: Color::Rgb { r: 34, g: 211, b: 238 },
            assistant_color: Color::Rgb { r: 134, g: 239, b: 172 },
            code: Color::Rgb { r: 251, g: 191, b: 36 },
        }
    }

    pub fn blue() -> Self {
        Self {
            name: ThemeName::Blue,
            accent: Color::Rgb { r: 59, g: 130, b: 246 },
            user_color: Color::Rgb { r: 147, g: 197, b: 253 },
            ..Self::dark()
        }
    }

    pub fn purple() -> Self {
        Self {
            name: ThemeName::Purple,
            accent: Color::Rgb { r: 168, g: 85, b: 247 },
            user_color: Color::Rgb { r: 216, g: 180, b: 254 },
            code: Color::Rgb { r: 244, g: 114, b: 182 },
            ..Self::dark()
        }
    }

    pub fn green() -> Self {
        Self {
            name: ThemeName::Green,
            accent: Color::Rgb { r: 34, g: 197, b: 94 },
            user_color: Color::Rgb { r: 134, g: 239, b: 172 },
            assistant_color: Color::Rgb { r: 187, g: 247, b: 208 },
            ..Self::dark()
        }
    }

    pub fn for_theme(theme: ThemeName) -> Self {
        match theme {
            ThemeName::Light => Self::light(),
            ThemeName::Dark => Self::dark(),
            ThemeName::Blue => Self::blue(),
            ThemeName::Purple => Self::purple(),
            ThemeName::Green => Self::green(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_theme_has_a_palette() {
        for theme in ThemeName::ALL {
            assert_eq!(Palette::for_theme(theme).name, theme);
        }
    }

    #[test]
    fn dark_variants_share_base_colors() {
        assert_eq!(Palette::blue().fg, Palette::dark().fg);
        assert_ne!(Palette::blue().accent, Palette::dark().accent);
    }
}
