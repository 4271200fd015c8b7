use macroquad::prelude::*;

// Colors for one display mode of a palette.
pub struct ModeColors {
    pub surface: Color,
    pub text: Color,
    pub muted: Color,
}

/// A named color theme. The active theme is tracked by name on the page
/// style; rendering resolves the name through `palette_or_default`.
pub struct ThemePalette {
    pub name: &'static str,
    pub accent: Color,
    pub accent_soft: Color,
    pub light: ModeColors,
    pub dark: ModeColors,
}

impl ThemePalette {
    pub fn mode(&self, dark: bool) -> &ModeColors {
        if dark {
            &self.dark
        } else {
            &self.light
        }
    }
}

const LIGHT_TEXT: Color = Color { r: 0.20, g: 0.17, b: 0.20, a: 1.0 };
const LIGHT_MUTED: Color = Color { r: 0.45, g: 0.42, b: 0.45, a: 1.0 };
const DARK_TEXT: Color = Color { r: 0.93, g: 0.92, b: 0.95, a: 1.0 };
const DARK_MUTED: Color = Color { r: 0.65, g: 0.64, b: 0.68, a: 1.0 };
const DARK_SURFACE: Color = Color { r: 0.09, g: 0.09, b: 0.12, a: 1.0 };

pub const THEMES: &[ThemePalette] = &[
    ThemePalette {
        name: "pink",
        accent: Color { r: 0.95, g: 0.45, b: 0.64, a: 1.0 },
        accent_soft: Color { r: 0.99, g: 0.86, b: 0.91, a: 1.0 },
        light: ModeColors {
            surface: Color { r: 1.0, g: 0.96, b: 0.97, a: 1.0 },
            text: LIGHT_TEXT,
            muted: LIGHT_MUTED,
        },
        dark: ModeColors {
            surface: DARK_SURFACE,
            text: DARK_TEXT,
            muted: DARK_MUTED,
        },
    },
    ThemePalette {
        name: "blue",
        accent: Color { r: 0.35, g: 0.56, b: 0.94, a: 1.0 },
        accent_soft: Color { r: 0.84, g: 0.90, b: 0.99, a: 1.0 },
        light: ModeColors {
            surface: Color { r: 0.96, g: 0.97, b: 1.0, a: 1.0 },
            text: LIGHT_TEXT,
            muted: LIGHT_MUTED,
        },
        dark: ModeColors {
            surface: DARK_SURFACE,
            text: DARK_TEXT,
            muted: DARK_MUTED,
        },
    },
    ThemePalette {
        name: "green",
        accent: Color { r: 0.27, g: 0.70, b: 0.47, a: 1.0 },
        accent_soft: Color { r: 0.84, g: 0.96, b: 0.88, a: 1.0 },
        light: ModeColors {
            surface: Color { r: 0.96, g: 1.0, b: 0.97, a: 1.0 },
            text: LIGHT_TEXT,
            muted: LIGHT_MUTED,
        },
        dark: ModeColors {
            surface: DARK_SURFACE,
            text: DARK_TEXT,
            muted: DARK_MUTED,
        },
    },
    ThemePalette {
        name: "purple",
        accent: Color { r: 0.62, g: 0.45, b: 0.90, a: 1.0 },
        accent_soft: Color { r: 0.91, g: 0.86, b: 0.99, a: 1.0 },
        light: ModeColors {
            surface: Color { r: 0.98, g: 0.96, b: 1.0, a: 1.0 },
            text: LIGHT_TEXT,
            muted: LIGHT_MUTED,
        },
        dark: ModeColors {
            surface: DARK_SURFACE,
            text: DARK_TEXT,
            muted: DARK_MUTED,
        },
    },
    ThemePalette {
        name: "sunset",
        accent: Color { r: 0.95, g: 0.56, b: 0.29, a: 1.0 },
        accent_soft: Color { r: 0.99, g: 0.90, b: 0.82, a: 1.0 },
        light: ModeColors {
            surface: Color { r: 1.0, g: 0.97, b: 0.94, a: 1.0 },
            text: LIGHT_TEXT,
            muted: LIGHT_MUTED,
        },
        dark: ModeColors {
            surface: DARK_SURFACE,
            text: DARK_TEXT,
            muted: DARK_MUTED,
        },
    },
];

/// Exact-name lookup. An unrecognized marker resolves to `None`, which is
/// the "applied but nothing highlights" state the settings panel shows.
pub fn palette(name: &str) -> Option<&'static ThemePalette> {
    THEMES.iter().find(|theme| theme.name == name)
}

/// Rendering fallback for unknown markers: the first (pink) palette.
pub fn palette_or_default(name: &str) -> &'static ThemePalette {
    palette(name).unwrap_or(&THEMES[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_exact() {
        assert!(palette("pink").is_some());
        assert!(palette("blue").is_some());
        assert!(palette("PINK").is_none());
        assert!(palette("mauve").is_none());
    }

    #[test]
    fn unknown_marker_renders_with_default_palette() {
        assert_eq!(palette_or_default("mauve").name, "pink");
    }

    #[test]
    fn mode_selects_the_right_color_set() {
        let pink = palette("pink").unwrap();
        assert!(pink.mode(false).surface.r > pink.mode(true).surface.r);
    }
}
