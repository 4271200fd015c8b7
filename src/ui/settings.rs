use macroquad::prelude::*;

use crate::audio::SoundEffects;
use crate::input::InputState;
use crate::prefs::Preferences;
use crate::theme::{palette_or_default, THEMES};
use crate::types::{ease_smooth, AnimationState, StatusKind, StatusMessage};
use crate::ui::{draw_button, hit, DrawContext};
use crate::wallpaper::{is_valid_url, now_ms, WallpaperService};
use crate::FONT_SIZE;

const PANEL_WIDTH: f32 = 340.0;
const PANEL_PADDING: f32 = 24.0;
const SLIDE_SECS: f32 = 0.25;

const SUCCESS_COLOR: Color = Color { r: 0.20, g: 0.65, b: 0.40, a: 1.0 };
const ERROR_COLOR: Color = Color { r: 0.85, g: 0.30, b: 0.30, a: 1.0 };
// Dark ink for text sitting on the pastel accent_soft buttons in either mode.
const INK: Color = Color { r: 0.20, g: 0.17, b: 0.20, a: 1.0 };

/// Checks the custom-wallpaper input before any network work: trimmed,
/// non-empty, syntactically an http(s) URL.
pub fn validate_input(raw: &str) -> Result<String, &'static str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("Enter an image link or API endpoint");
    }
    if !is_valid_url(trimmed) {
        return Err("Enter a valid http(s) URL");
    }
    Ok(trimmed.to_string())
}

/// Maps a horizontal position on the slider track to a percentage.
pub fn slider_value_from_x(x: f32, track: Rect) -> u8 {
    if track.w <= 0.0 {
        return 0;
    }
    ((x - track.x) / track.w * 100.0).round().clamp(0.0, 100.0) as u8
}

pub enum PanelRequest {
    ConfirmReset,
}

struct PanelLayout {
    panel: Rect,
    close: Rect,
    swatches: Vec<Rect>,
    light: Rect,
    dark: Rect,
    random: Rect,
    reset_wallpaper: Rect,
    input: Rect,
    apply: Rect,
    status_close: Rect,
    slider: Rect,
    reset_all: Rect,
}

pub struct SettingsPanel {
    pub open: bool,
    open_t: f32,
    pub input_buffer: String,
    input_focused: bool,
    pub status: Option<StatusMessage>,
    dragging_slider: bool,
}

impl SettingsPanel {
    /// The input field starts out mirroring the persisted custom wallpaper.
    pub fn new(prefs: &Preferences) -> Self {
        SettingsPanel {
            open: false,
            open_t: 0.0,
            input_buffer: prefs.custom_wallpaper_url().unwrap_or("").to_string(),
            input_focused: false,
            status: None,
            dragging_slider: false,
        }
    }

    fn layout(&self, ctx: &DrawContext, view: Vec2) -> PanelLayout {
        let width = ctx.px(PANEL_WIDTH);
        let pad = ctx.px(PANEL_PADDING);
        let x = view.x - width * ease_smooth(self.open_t);
        let panel = Rect::new(x, 0.0, width, view.y);
        let inner_w = width - pad * 2.0;

        let swatch = ctx.px(36.0);
        let swatches = (0..THEMES.len())
            .map(|index| {
                Rect::new(
                    x + pad + index as f32 * (swatch + ctx.px(10.0)),
                    ctx.px(96.0),
                    swatch,
                    swatch,
                )
            })
            .collect();

        let half = (inner_w - ctx.px(12.0)) / 2.0;
        let button_h = ctx.px(32.0);
        let apply_w = ctx.px(70.0);

        PanelLayout {
            panel,
            close: Rect::new(x + width - ctx.px(44.0), ctx.px(18.0), ctx.px(28.0), ctx.px(28.0)),
            swatches,
            light: Rect::new(x + pad, ctx.px(176.0), half, button_h),
            dark: Rect::new(x + pad + half + ctx.px(12.0), ctx.px(176.0), half, button_h),
            random: Rect::new(x + pad, ctx.px(256.0), half, button_h),
            reset_wallpaper: Rect::new(x + pad + half + ctx.px(12.0), ctx.px(256.0), half, button_h),
            input: Rect::new(x + pad, ctx.px(336.0), inner_w - apply_w - ctx.px(8.0), button_h),
            apply: Rect::new(x + pad + inner_w - apply_w, ctx.px(336.0), apply_w, button_h),
            status_close: Rect::new(x + pad + inner_w - ctx.px(18.0), ctx.px(382.0), ctx.px(18.0), ctx.px(18.0)),
            slider: Rect::new(x + pad, ctx.px(452.0), inner_w, ctx.px(6.0)),
            reset_all: Rect::new(x + pad, ctx.px(500.0), inner_w, ctx.px(36.0)),
        }
    }

    pub fn update(
        &mut self,
        ctx: &DrawContext,
        input: &InputState,
        prefs: &mut Preferences,
        sound_effects: &SoundEffects,
        wallpapers: &mut WallpaperService,
        dt: f32,
        view: Vec2,
    ) -> Option<PanelRequest> {
        let slide = dt / SLIDE_SECS;
        self.open_t = if self.open {
            (self.open_t + slide).min(1.0)
        } else {
            (self.open_t - slide).max(0.0)
        };

        if let Some(status) = &mut self.status {
            if status.tick(dt) {
                self.status = None;
            }
        }

        if !self.open {
            self.dragging_slider = false;
            return None;
        }

        let layout = self.layout(ctx, view);

        if input.escape {
            self.open = false;
            return None;
        }

        // Slider dragging tracks the mouse between press and release.
        let grab_zone = Rect::new(
            layout.slider.x - ctx.px(8.0),
            layout.slider.y - ctx.px(10.0),
            layout.slider.w + ctx.px(16.0),
            layout.slider.h + ctx.px(20.0),
        );
        if input.click && hit(grab_zone, input.mouse) {
            self.dragging_slider = true;
        }
        if self.dragging_slider {
            if input.mouse_down {
                let value = slider_value_from_x(input.mouse.x, layout.slider);
                if value != prefs.opacity_percent {
                    sound_effects.play_click();
                    prefs.apply_opacity(value);
                }
            }
            if input.release {
                self.dragging_slider = false;
            }
        }

        if self.input_focused {
            for typed in &input.chars {
                self.input_buffer.push(*typed);
            }
            if input.backspace {
                self.input_buffer.pop();
            }
            if input.enter {
                self.submit(sound_effects, wallpapers);
            }
        }

        if input.click && !self.dragging_slider {
            self.input_focused = hit(layout.input, input.mouse);

            if hit(layout.close, input.mouse) {
                sound_effects.play_click();
                self.open = false;
            } else if !hit(layout.panel, input.mouse) {
                // Click on the dim overlay outside the panel.
                sound_effects.play_click();
                self.open = false;
            } else if hit(layout.status_close, input.mouse) && self.status.is_some() {
                self.status = None;
            } else if hit(layout.light, input.mouse) {
                sound_effects.play_click();
                prefs.apply_mode("light");
            } else if hit(layout.dark, input.mouse) {
                sound_effects.play_click();
                prefs.apply_mode("dark");
            } else if hit(layout.random, input.mouse) {
                if !wallpapers.random_busy {
                    sound_effects.play_click();
                    wallpapers.fetch_random();
                }
            } else if hit(layout.reset_wallpaper, input.mouse) {
                sound_effects.play_click();
                prefs.reset_wallpaper(now_ms());
                self.input_buffer.clear();
            } else if hit(layout.apply, input.mouse) {
                self.submit(sound_effects, wallpapers);
            } else if hit(layout.reset_all, input.mouse) {
                sound_effects.play_click();
                return Some(PanelRequest::ConfirmReset);
            } else {
                for (index, rect) in layout.swatches.iter().enumerate() {
                    if hit(*rect, input.mouse) {
                        sound_effects.play_click();
                        prefs.apply_theme(THEMES[index].name);
                    }
                }
            }
        }

        None
    }

    fn submit(&mut self, sound_effects: &SoundEffects, wallpapers: &mut WallpaperService) {
        match validate_input(&self.input_buffer) {
            Err(message) => {
                sound_effects.play_reject();
                self.status = Some(StatusMessage::new(StatusKind::Error, message));
            }
            Ok(url) => {
                if wallpapers.custom_busy {
                    return;
                }
                sound_effects.play_click();
                self.status = Some(StatusMessage::new(
                    StatusKind::Loading,
                    "Validating and loading image...",
                ));
                wallpapers.check_custom(url);
            }
        }
    }

    pub fn draw(
        &self,
        ctx: &DrawContext,
        prefs: &Preferences,
        wallpapers: &WallpaperService,
        animation: &AnimationState,
        view: Vec2,
        mouse: Vec2,
    ) {
        if self.open_t <= 0.0 {
            return;
        }
        let palette = palette_or_default(&prefs.style.theme);
        let colors = palette.mode(prefs.style.dark);
        let layout = self.layout(ctx, view);
        let size = ctx.font_size(FONT_SIZE);
        let label_size = ctx.font_size(13);
        let pad = ctx.px(PANEL_PADDING);
        let text_x = layout.panel.x + pad;

        // Dim the page behind the panel.
        draw_rectangle(
            0.0,
            0.0,
            view.x,
            view.y,
            Color { r: 0.0, g: 0.0, b: 0.0, a: 0.45 * ease_smooth(self.open_t) },
        );

        draw_rectangle(layout.panel.x, 0.0, layout.panel.w, layout.panel.h, colors.surface);
        draw_rectangle(layout.panel.x, 0.0, ctx.px(3.0), layout.panel.h, palette.accent);

        ctx.text("SETTINGS", text_x, ctx.px(40.0), ctx.font_size(20), colors.text);
        draw_button(ctx, layout.close, "X", colors.surface, colors.muted, hit(layout.close, mouse));

        // --- Color theme ---
        ctx.text("COLOR THEME", text_x, ctx.px(82.0), label_size, colors.muted);
        for (index, rect) in layout.swatches.iter().enumerate() {
            let theme = &THEMES[index];
            draw_rectangle(rect.x, rect.y, rect.w, rect.h, theme.accent);
            if prefs.style.theme == theme.name {
                let pulse = animation.pulse_alpha();
                draw_rectangle_lines(
                    rect.x - ctx.px(3.0),
                    rect.y - ctx.px(3.0),
                    rect.w + ctx.px(6.0),
                    rect.h + ctx.px(6.0),
                    2.0 * ctx.scale,
                    Color { r: colors.text.r, g: colors.text.g, b: colors.text.b, a: pulse },
                );
            }
        }

        // --- Mode ---
        ctx.text("MODE", text_x, ctx.px(162.0), label_size, colors.muted);
        for (rect, label, marker) in [
            (layout.light, "LIGHT", "light"),
            (layout.dark, "DARK", "dark"),
        ] {
            let active = prefs.mode_marker == marker;
            let bg = if active { palette.accent } else { palette.accent_soft };
            let fg = if active { WHITE } else { INK };
            draw_button(ctx, rect, label, bg, fg, hit(rect, mouse));
        }

        // --- Wallpaper ---
        ctx.text("WALLPAPER", text_x, ctx.px(242.0), label_size, colors.muted);
        let random_label = if wallpapers.random_busy { "LOADING..." } else { "RANDOM" };
        draw_button(
            ctx,
            layout.random,
            random_label,
            palette.accent,
            WHITE,
            hit(layout.random, mouse) && !wallpapers.random_busy,
        );
        draw_button(
            ctx,
            layout.reset_wallpaper,
            "RESET",
            palette.accent_soft,
            INK,
            hit(layout.reset_wallpaper, mouse),
        );

        // --- Custom wallpaper ---
        ctx.text("CUSTOM WALLPAPER", text_x, ctx.px(322.0), label_size, colors.muted);
        let input_bg = if prefs.style.dark {
            Color { r: 0.16, g: 0.16, b: 0.20, a: 1.0 }
        } else {
            WHITE
        };
        draw_rectangle(layout.input.x, layout.input.y, layout.input.w, layout.input.h, input_bg);
        if self.input_focused {
            draw_rectangle_lines(
                layout.input.x,
                layout.input.y,
                layout.input.w,
                layout.input.h,
                2.0 * ctx.scale,
                palette.accent,
            );
        }
        let shown = tail_fit(ctx, &self.input_buffer, size, layout.input.w - ctx.px(16.0));
        let text_y = layout.input.y + layout.input.h / 2.0 + ctx.px(5.0);
        ctx.text(&shown, layout.input.x + ctx.px(8.0), text_y, size, colors.text);
        if self.input_focused && animation.caret_visible() {
            let caret_x = layout.input.x + ctx.px(8.0) + ctx.text_width(&shown, size) + ctx.px(2.0);
            draw_rectangle(caret_x, layout.input.y + ctx.px(7.0), ctx.px(2.0), layout.input.h - ctx.px(14.0), palette.accent);
        }
        let apply_label = if wallpapers.custom_busy { "..." } else { "APPLY" };
        draw_button(ctx, layout.apply, apply_label, palette.accent, WHITE, hit(layout.apply, mouse));

        // --- Status line ---
        if let Some(status) = &self.status {
            let color = match status.kind {
                StatusKind::Loading => colors.muted,
                StatusKind::Success => SUCCESS_COLOR,
                StatusKind::Error => ERROR_COLOR,
            };
            let status_y = ctx.px(396.0);
            ctx.text(status.icon(), text_x, status_y, label_size, color);
            ctx.text(
                &status.text,
                text_x + ctx.px(28.0),
                status_y,
                label_size,
                color,
            );
            draw_button(ctx, layout.status_close, "x", colors.surface, colors.muted, hit(layout.status_close, mouse));
        }

        // --- Opacity ---
        ctx.text("BACKGROUND OPACITY", text_x, ctx.px(438.0), label_size, colors.muted);
        let value_w = ctx.text_width(&prefs.opacity_label, label_size);
        ctx.text(
            &prefs.opacity_label,
            layout.panel.x + layout.panel.w - pad - value_w,
            ctx.px(438.0),
            label_size,
            colors.text,
        );
        draw_rectangle(layout.slider.x, layout.slider.y, layout.slider.w, layout.slider.h, palette.accent_soft);
        let fill = layout.slider.w * prefs.opacity_percent as f32 / 100.0;
        draw_rectangle(layout.slider.x, layout.slider.y, fill, layout.slider.h, palette.accent);
        draw_circle(
            layout.slider.x + fill,
            layout.slider.y + layout.slider.h / 2.0,
            ctx.px(9.0),
            palette.accent,
        );

        // --- Reset all ---
        draw_button(
            ctx,
            layout.reset_all,
            "RESET ALL SETTINGS",
            ERROR_COLOR,
            WHITE,
            hit(layout.reset_all, mouse),
        );
    }
}

/// Fits the tail of a long value (URLs overflow leftward) into `max_width`.
fn tail_fit(ctx: &DrawContext, text: &str, size: u16, max_width: f32) -> String {
    if ctx.text_width(text, size) <= max_width {
        return text.to_string();
    }
    let mut start = 0;
    let chars: Vec<char> = text.chars().collect();
    while start < chars.len() {
        let candidate: String = chars[start..].iter().collect();
        if ctx.text_width(&candidate, size) <= max_width {
            return candidate;
        }
        start += 1;
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_rejects_empty_and_schemeless_input() {
        assert!(validate_input("").is_err());
        assert!(validate_input("   ").is_err());
        assert!(validate_input("example.com/img.jpg").is_err());
        assert!(validate_input("ftp://x/y.png").is_err());
    }

    #[test]
    fn validation_trims_and_accepts_http_urls() {
        assert_eq!(
            validate_input("  https://example.com/a.png  ").unwrap(),
            "https://example.com/a.png"
        );
        assert!(validate_input("http://example.com/a.png").is_ok());
    }

    #[test]
    fn slider_maps_track_positions_to_percentages() {
        let track = Rect::new(100.0, 0.0, 200.0, 6.0);
        assert_eq!(slider_value_from_x(100.0, track), 0);
        assert_eq!(slider_value_from_x(300.0, track), 100);
        assert_eq!(slider_value_from_x(200.0, track), 50);
        // Positions beyond the track clamp.
        assert_eq!(slider_value_from_x(0.0, track), 0);
        assert_eq!(slider_value_from_x(999.0, track), 100);
    }
}
