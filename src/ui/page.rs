use macroquad::prelude::*;

use crate::input::InputState;
use crate::prefs::PageStyle;
use crate::theme::palette_or_default;
use crate::types::ease_smooth;
use crate::ui::{hit, DrawContext};
use crate::FONT_SIZE;

pub const HEADER_HEIGHT: f32 = 56.0;
/// Anchor scrolls stop this far above their section to clear the header.
pub const HEADER_OFFSET: f32 = 60.0;

const HERO_HEIGHT: f32 = 420.0;
const SECTION_TITLE_BLOCK: f32 = 72.0;
const LINE_HEIGHT: f32 = 28.0;
const SECTION_PADDING: f32 = 48.0;
const FOOTER_HEIGHT: f32 = 120.0;
const CONTENT_MARGIN: f32 = 70.0;

const BACK_TO_TOP_AT: f32 = 300.0;
const WHEEL_STEP: f32 = 60.0;
const GLIDE_SPEED: f32 = 6.0;

const REVEAL_MARGIN: f32 = 50.0;
const REVEAL_FRACTION: f32 = 0.1;
const REVEAL_SECS: f32 = 0.6;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SectionId {
    About,
    Projects,
    Timeline,
}

pub struct Section {
    pub id: SectionId,
    pub title: &'static str,
    pub body: &'static [&'static str],
    pub revealed: bool,
    pub reveal_t: f32,
}

const ABOUT_BODY: &[&str] = &[
    "Hello! This little page is my corner of the internet.",
    "I like soft colors, small tools, and websites that feel personal.",
    "Right-click anywhere, or open the settings gear, to make it yours:",
    "pick a color theme, switch to dark mode, or hang new wallpaper.",
    "Everything you choose is remembered for your next visit.",
];

const PROJECTS_BODY: &[&str] = &[
    "PAPER GARDEN - a journal that grows one pressed flower per entry.",
    "TEACUP TIMER - a tiny pomodoro that steeps instead of ticking.",
    "PIXEL POSTCARDS - send friends a 64x64 hand-drawn hello.",
    "WALLPAPER ROULETTE - the random background button on this page.",
];

const TIMELINE_BODY: &[&str] = &[
    "2021 - first hand-rolled homepage, table layout and all.",
    "2022 - learned to stop worrying and love the cascade.",
    "2023 - rebuilt everything twice; kept the pink.",
    "2024 - added wallpapers, sounds, and a settings panel.",
    "2025 - you are here.",
];

fn sections() -> Vec<Section> {
    let specs: [(SectionId, &'static str, &'static [&'static str]); 3] = [
        (SectionId::About, "ABOUT ME", ABOUT_BODY),
        (SectionId::Projects, "PROJECTS", PROJECTS_BODY),
        (SectionId::Timeline, "TIMELINE", TIMELINE_BODY),
    ];
    specs
        .into_iter()
        .map(|(id, title, body)| Section {
            id,
            title,
            body,
            revealed: false,
            reveal_t: 0.0,
        })
        .collect()
}

/// Progress through the scrollable range, 0–100. Content that fits the
/// viewport reports zero.
pub fn scroll_progress(scroll: f32, content_height: f32, view_height: f32) -> f32 {
    let range = content_height - view_height;
    if range <= 0.0 {
        return 0.0;
    }
    (scroll / range * 100.0).clamp(0.0, 100.0)
}

/// Whether a section (given its top edge in screen coordinates) has at
/// least 10% of itself inside the viewport shortened by a 50 px bottom
/// margin. One-shot consumers latch the result.
pub fn reveal_triggered(section_top: f32, section_height: f32, view_height: f32) -> bool {
    let visible_top = section_top.max(0.0);
    let visible_bottom = (section_top + section_height).min(view_height - REVEAL_MARGIN);
    let visible = visible_bottom - visible_top;
    visible > 0.0 && visible >= REVEAL_FRACTION * section_height
}

pub struct PageView {
    pub scroll: f32,
    glide_target: Option<f32>,
    pub sections: Vec<Section>,
}

impl PageView {
    pub fn new() -> Self {
        PageView {
            scroll: 0.0,
            glide_target: None,
            sections: sections(),
        }
    }

    fn section_height(section: &Section, scale: f32) -> f32 {
        (SECTION_TITLE_BLOCK + section.body.len() as f32 * LINE_HEIGHT + SECTION_PADDING) * scale
    }

    pub fn section_offset(&self, id: SectionId, scale: f32) -> f32 {
        let mut offset = HERO_HEIGHT * scale;
        for section in &self.sections {
            if section.id == id {
                break;
            }
            offset += Self::section_height(section, scale);
        }
        offset
    }

    pub fn content_height(&self, scale: f32) -> f32 {
        let sections: f32 = self
            .sections
            .iter()
            .map(|s| Self::section_height(s, scale))
            .sum();
        (HERO_HEIGHT + FOOTER_HEIGHT) * scale + sections
    }

    fn max_scroll(&self, view_h: f32, scale: f32) -> f32 {
        (self.content_height(scale) - view_h).max(0.0)
    }

    pub fn update(&mut self, input: &InputState, dt: f32, view_h: f32, scale: f32, locked: bool) {
        if !locked && input.wheel != 0.0 {
            // Manual scrolling cancels any glide in progress.
            self.glide_target = None;
            self.scroll =
                (self.scroll - input.wheel * WHEEL_STEP).clamp(0.0, self.max_scroll(view_h, scale));
        }

        if let Some(target) = self.glide_target {
            let step = (target - self.scroll) * (dt * GLIDE_SPEED).min(1.0);
            self.scroll += step;
            if (target - self.scroll).abs() < 0.5 {
                self.scroll = target;
                self.glide_target = None;
            }
        }

        // Reveal latch: once a section has been seen it stays revealed.
        for index in 0..self.sections.len() {
            let top = self.section_offset(self.sections[index].id, scale) - self.scroll;
            let height = Self::section_height(&self.sections[index], scale);
            let section = &mut self.sections[index];
            if !section.revealed && reveal_triggered(top, height, view_h) {
                section.revealed = true;
            }
            if section.revealed && section.reveal_t < 1.0 {
                section.reveal_t = (section.reveal_t + dt / REVEAL_SECS).min(1.0);
            }
        }
    }

    pub fn scroll_to(&mut self, id: SectionId, view_h: f32, scale: f32) {
        let target = self.section_offset(id, scale) - HEADER_OFFSET * scale;
        self.glide_target = Some(target.clamp(0.0, self.max_scroll(view_h, scale)));
    }

    pub fn scroll_to_top(&mut self) {
        self.glide_target = Some(0.0);
    }

    pub fn back_to_top_visible(&self) -> bool {
        self.scroll > BACK_TO_TOP_AT
    }

    pub fn progress(&self, view_h: f32, scale: f32) -> f32 {
        scroll_progress(self.scroll, self.content_height(scale), view_h)
    }

    pub fn draw(&self, ctx: &DrawContext, style: &PageStyle, view: Vec2, mouse: Vec2) {
        let palette = palette_or_default(&style.theme);
        let colors = palette.mode(style.dark);
        let margin = ctx.px(CONTENT_MARGIN);

        // --- Hero ---
        let hero_center = (HERO_HEIGHT * ctx.scale) / 2.0 - self.scroll;
        ctx.text_shadow(
            "PETAL PAGE",
            margin,
            hero_center,
            ctx.font_size(44),
            palette.accent,
        );
        ctx.text_shadow(
            "a tiny corner of the internet, yours to repaint",
            margin,
            hero_center + ctx.px(40.0),
            ctx.font_size(FONT_SIZE),
            colors.text,
        );

        // --- Sections ---
        for section in &self.sections {
            let top = self.section_offset(section.id, ctx.scale) - self.scroll;
            let height = Self::section_height(section, ctx.scale);
            if top > view.y || top + height < 0.0 {
                continue;
            }

            let fade = ease_smooth(section.reveal_t);
            let rise = (1.0 - fade) * ctx.px(16.0);
            let alpha = |color: Color| Color {
                a: color.a * fade,
                ..color
            };

            let title_y = top + rise + ctx.px(SECTION_TITLE_BLOCK - 28.0);
            draw_rectangle(
                margin,
                title_y - ctx.px(18.0),
                ctx.px(4.0),
                ctx.px(24.0),
                alpha(palette.accent),
            );
            ctx.text_shadow(
                section.title,
                margin + ctx.px(14.0),
                title_y,
                ctx.font_size(24),
                alpha(colors.text),
            );

            for (line_index, line) in section.body.iter().enumerate() {
                let line_y = top
                    + rise
                    + ctx.px(SECTION_TITLE_BLOCK)
                    + (line_index as f32 + 0.5) * ctx.px(LINE_HEIGHT);
                ctx.text_shadow(
                    line,
                    margin + ctx.px(14.0),
                    line_y,
                    ctx.font_size(FONT_SIZE),
                    alpha(colors.muted),
                );
            }
        }

        // --- Footer ---
        let footer_y = self.content_height(ctx.scale) - ctx.px(FOOTER_HEIGHT / 2.0) - self.scroll;
        if footer_y < view.y {
            ctx.text_centered(
                "made with petals - settings are saved just for you",
                view.x / 2.0,
                footer_y,
                ctx.font_size(FONT_SIZE),
                colors.muted,
            );
        }

        // --- Fixed header ---
        let header_h = ctx.px(HEADER_HEIGHT);
        draw_rectangle(
            0.0,
            0.0,
            view.x,
            header_h,
            Color {
                a: 0.92,
                ..colors.surface
            },
        );
        ctx.text(
            "petalpage",
            margin,
            header_h / 2.0 + ctx.px(6.0),
            ctx.font_size(20),
            palette.accent,
        );
        for (rect, _, label) in header_items(ctx, view.x) {
            let hovered = hit(rect, mouse);
            let color = if hovered { palette.accent } else { colors.text };
            ctx.text(
                label,
                rect.x,
                rect.y + rect.h - ctx.px(8.0),
                ctx.font_size(FONT_SIZE),
                color,
            );
            if hovered {
                draw_rectangle(
                    rect.x,
                    rect.y + rect.h - ctx.px(4.0),
                    rect.w,
                    ctx.px(2.0),
                    palette.accent,
                );
            }
        }

        // --- Scroll progress ---
        let progress = self.progress(view.y, ctx.scale);
        draw_rectangle(
            0.0,
            0.0,
            view.x * progress / 100.0,
            ctx.px(4.0),
            palette.accent,
        );

        // --- Back to top ---
        if self.back_to_top_visible() {
            let rect = back_to_top_rect(ctx, view);
            let center = vec2(rect.x + rect.w / 2.0, rect.y + rect.h / 2.0);
            draw_circle(center.x, center.y, rect.w / 2.0, palette.accent);
            draw_triangle(
                vec2(center.x, center.y - ctx.px(7.0)),
                vec2(center.x - ctx.px(8.0), center.y + ctx.px(6.0)),
                vec2(center.x + ctx.px(8.0), center.y + ctx.px(6.0)),
                WHITE,
            );
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
pub enum HeaderItem {
    Anchor(SectionId),
    Settings,
}

/// Right-aligned header links plus the settings trigger, with their
/// clickable rects. Shared by update (hit-testing) and draw.
pub fn header_items(ctx: &DrawContext, view_w: f32) -> Vec<(Rect, HeaderItem, &'static str)> {
    let entries: [(HeaderItem, &'static str); 4] = [
        (HeaderItem::Anchor(SectionId::About), "ABOUT"),
        (HeaderItem::Anchor(SectionId::Projects), "PROJECTS"),
        (HeaderItem::Anchor(SectionId::Timeline), "TIMELINE"),
        (HeaderItem::Settings, "SETTINGS"),
    ];

    let size = ctx.font_size(FONT_SIZE);
    let gap = ctx.px(28.0);
    let mut x = view_w - ctx.px(40.0);
    let mut items = Vec::new();
    for (item, label) in entries.into_iter().rev() {
        let width = ctx.text_width(label, size);
        x -= width;
        items.push((
            Rect::new(x, ctx.px(14.0), width, ctx.px(28.0)),
            item,
            label,
        ));
        x -= gap;
    }
    items.reverse();
    items
}

pub fn back_to_top_rect(ctx: &DrawContext, view: Vec2) -> Rect {
    let side = ctx.px(44.0);
    Rect::new(
        view.x - side - ctx.px(26.0),
        view.y - side - ctx.px(26.0),
        side,
        side,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_covers_the_scrollable_range() {
        assert_eq!(scroll_progress(0.0, 2000.0, 600.0), 0.0);
        assert_eq!(scroll_progress(1400.0, 2000.0, 600.0), 100.0);
        assert_eq!(scroll_progress(700.0, 2000.0, 600.0), 50.0);
        // Content that fits has no scrollable range.
        assert_eq!(scroll_progress(0.0, 500.0, 600.0), 0.0);
        // Overscroll clamps rather than exceeding 100.
        assert_eq!(scroll_progress(9999.0, 2000.0, 600.0), 100.0);
    }

    #[test]
    fn reveal_needs_a_tenth_inside_the_trimmed_viewport() {
        // Entirely below the fold.
        assert!(!reveal_triggered(700.0, 200.0, 600.0));
        // Top edge has crossed in far enough: 550..750 vs margin at 550.
        assert!(!reveal_triggered(549.0, 200.0, 600.0));
        assert!(reveal_triggered(520.0, 200.0, 600.0));
        // Fully inside.
        assert!(reveal_triggered(100.0, 200.0, 600.0));
    }

    #[test]
    fn back_to_top_appears_past_three_hundred_pixels() {
        let mut page = PageView::new();
        page.scroll = 300.0;
        assert!(!page.back_to_top_visible());
        page.scroll = 301.0;
        assert!(page.back_to_top_visible());
    }

    #[test]
    fn sections_reveal_once_and_stay_revealed() {
        let mut page = PageView::new();
        let input = InputState::new();

        // About sits right below the hero; a tall viewport sees it.
        page.update(&input, 0.016, 900.0, 1.0, false);
        let about = &page.sections[0];
        assert!(about.revealed);

        // Scrolling away does not unreveal.
        page.scroll = 10_000.0;
        page.update(&input, 0.016, 900.0, 1.0, true);
        assert!(page.sections[0].revealed);
    }

    #[test]
    fn anchor_targets_clear_the_header() {
        let mut page = PageView::new();
        let offset = page.section_offset(SectionId::Projects, 1.0);
        page.scroll_to(SectionId::Projects, 600.0, 1.0);
        let input = InputState::new();
        for _ in 0..600 {
            page.update(&input, 0.016, 600.0, 1.0, false);
        }
        let expected = (offset - HEADER_OFFSET).clamp(0.0, page.content_height(1.0) - 600.0);
        assert!((page.scroll - expected).abs() < 1.0);
    }
}
