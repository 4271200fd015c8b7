use macroquad::prelude::*;

use crate::audio::SoundEffects;
use crate::input::InputState;
use crate::theme::ThemePalette;
use crate::FONT_SIZE;

pub mod context_menu;
pub mod page;
pub mod settings;

// ===================================
// SHARED DRAWING
// ===================================

/// Font handle plus the window scale factor, threaded through every draw
/// function. `font: None` falls back to the built-in font.
pub struct DrawContext {
    pub font: Option<Font>,
    pub scale: f32,
}

impl DrawContext {
    pub fn px(&self, value: f32) -> f32 {
        value * self.scale
    }

    pub fn font_size(&self, base: u16) -> u16 {
        (base as f32 * self.scale) as u16
    }

    pub fn text(&self, text: &str, x: f32, y: f32, size: u16, color: Color) {
        draw_text_ex(
            text,
            x,
            y,
            TextParams {
                font: self.font.as_ref(),
                font_size: size,
                color,
                ..Default::default()
            },
        );
    }

    /// Drop-shadowed text for anything sitting directly on the wallpaper.
    pub fn text_shadow(&self, text: &str, x: f32, y: f32, size: u16, color: Color) {
        let shadow_offset = 1.0 * (size as f32 / FONT_SIZE as f32);
        self.text(
            text,
            x + shadow_offset,
            y + shadow_offset,
            size,
            Color {
                r: 0.0,
                g: 0.0,
                b: 0.0,
                a: 0.35,
            },
        );
        self.text(text, x, y, size, color);
    }

    pub fn text_width(&self, text: &str, size: u16) -> f32 {
        measure_text(text, self.font.as_ref(), size, 1.0).width
    }

    pub fn text_centered(&self, text: &str, center_x: f32, y: f32, size: u16, color: Color) {
        let width = self.text_width(text, size);
        self.text(text, center_x - width / 2.0, y, size, color);
    }
}

/// A filled rectangle button with a centered label. Hit-testing stays with
/// the caller; this only draws.
pub fn draw_button(ctx: &DrawContext, rect: Rect, label: &str, bg: Color, fg: Color, hovered: bool) {
    let bg = if hovered {
        Color {
            r: (bg.r + 0.06).min(1.0),
            g: (bg.g + 0.06).min(1.0),
            b: (bg.b + 0.06).min(1.0),
            a: bg.a,
        }
    } else {
        bg
    };
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, bg);
    let size = ctx.font_size(FONT_SIZE);
    let dims = measure_text(label, ctx.font.as_ref(), size, 1.0);
    ctx.text(
        label,
        rect.x + (rect.w - dims.width) / 2.0,
        rect.y + (rect.h + dims.height) / 2.0,
        size,
        fg,
    );
}

pub fn hit(rect: Rect, point: Vec2) -> bool {
    rect.contains(point)
}

// ===================================
// CONFIRM DIALOG
// ===================================

const DIALOG_BG: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 0.8,
};

/// Modal YES/NO confirmation guarding reset-all.
pub struct ConfirmDialog {
    pub selection: usize, // 0 = YES, 1 = NO; defaults to NO
}

impl ConfirmDialog {
    pub fn new() -> Self {
        ConfirmDialog { selection: 1 }
    }

    fn layout(ctx: &DrawContext, view: Vec2) -> (Rect, Rect, Rect) {
        let w = ctx.px(380.0);
        let h = ctx.px(150.0);
        let dialog = Rect::new((view.x - w) / 2.0, (view.y - h) / 2.0, w, h);
        let button_w = ctx.px(110.0);
        let button_h = ctx.px(36.0);
        let gap = ctx.px(40.0);
        let buttons_y = dialog.y + h - button_h - ctx.px(20.0);
        let yes = Rect::new(
            dialog.x + w / 2.0 - gap / 2.0 - button_w,
            buttons_y,
            button_w,
            button_h,
        );
        let no = Rect::new(dialog.x + w / 2.0 + gap / 2.0, buttons_y, button_w, button_h);
        (dialog, yes, no)
    }

    /// Returns `Some(true)` on confirm, `Some(false)` on cancel.
    pub fn update(
        &mut self,
        ctx: &DrawContext,
        input: &InputState,
        sound_effects: &SoundEffects,
        view: Vec2,
    ) -> Option<bool> {
        let (_, yes, no) = Self::layout(ctx, view);

        if hit(yes, input.mouse) {
            self.selection = 0;
        } else if hit(no, input.mouse) {
            self.selection = 1;
        }

        if input.escape {
            sound_effects.play_click();
            return Some(false);
        }
        if input.enter {
            sound_effects.play_click();
            return Some(self.selection == 0);
        }
        if input.click {
            if hit(yes, input.mouse) {
                sound_effects.play_click();
                return Some(true);
            }
            if hit(no, input.mouse) {
                sound_effects.play_click();
                return Some(false);
            }
        }
        None
    }

    pub fn draw(&self, ctx: &DrawContext, palette: &ThemePalette, view: Vec2) {
        let (dialog, yes, no) = Self::layout(ctx, view);

        draw_rectangle(0.0, 0.0, view.x, view.y, DIALOG_BG);
        draw_rectangle(dialog.x, dialog.y, dialog.w, dialog.h, palette.dark.surface);
        draw_rectangle_lines(
            dialog.x,
            dialog.y,
            dialog.w,
            dialog.h,
            2.0 * ctx.scale,
            palette.accent,
        );

        let size = ctx.font_size(FONT_SIZE);
        ctx.text_centered(
            "RESET ALL SETTINGS TO DEFAULTS?",
            dialog.x + dialog.w / 2.0,
            dialog.y + ctx.px(44.0),
            size,
            palette.dark.text,
        );
        ctx.text_centered(
            "THIS CANNOT BE UNDONE.",
            dialog.x + dialog.w / 2.0,
            dialog.y + ctx.px(70.0),
            size,
            palette.dark.muted,
        );

        for (index, (rect, label)) in [(yes, "YES"), (no, "NO")].iter().enumerate() {
            let active = self.selection == index;
            let bg = if active {
                palette.accent
            } else {
                Color {
                    r: 0.25,
                    g: 0.25,
                    b: 0.28,
                    a: 1.0,
                }
            };
            draw_button(ctx, *rect, label, bg, palette.dark.text, false);
        }
    }
}
