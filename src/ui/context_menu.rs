use macroquad::prelude::*;

use crate::input::InputState;
use crate::theme::ThemePalette;
use crate::types::{MenuAction, MENU_ITEMS};
use crate::ui::{hit, DrawContext};
use crate::FONT_SIZE;

/// The menu keeps at least this margin from every viewport edge.
pub const MENU_MARGIN: f32 = 10.0;

const ITEM_HEIGHT: f32 = 34.0;
const MENU_WIDTH: f32 = 180.0;

/// Where to place a menu of `size` opened at `cursor` inside `view`: flip
/// to the left/above the cursor when it would overflow right/bottom, then
/// clamp so no edge gets closer than `MENU_MARGIN`.
pub fn place_menu(cursor: Vec2, size: Vec2, view: Vec2) -> Vec2 {
    let mut x = cursor.x;
    if x + size.x > view.x - MENU_MARGIN {
        x = cursor.x - size.x;
    }
    x = x.clamp(MENU_MARGIN, (view.x - size.x - MENU_MARGIN).max(MENU_MARGIN));

    let mut y = cursor.y;
    if y + size.y > view.y - MENU_MARGIN {
        y = cursor.y - size.y;
    }
    y = y.clamp(MENU_MARGIN, (view.y - size.y - MENU_MARGIN).max(MENU_MARGIN));

    vec2(x, y)
}

pub struct ContextMenu {
    pub open: bool,
    pub pos: Vec2,
}

impl ContextMenu {
    pub fn new() -> Self {
        ContextMenu {
            open: false,
            pos: Vec2::ZERO,
        }
    }

    fn size(ctx: &DrawContext) -> Vec2 {
        vec2(
            ctx.px(MENU_WIDTH),
            MENU_ITEMS.len() as f32 * ctx.px(ITEM_HEIGHT) + ctx.px(12.0),
        )
    }

    fn bounds(&self, ctx: &DrawContext) -> Rect {
        let size = Self::size(ctx);
        Rect::new(self.pos.x, self.pos.y, size.x, size.y)
    }

    /// Whether a point lands on the open menu; clicks there must not fall
    /// through to the surfaces underneath.
    pub fn contains(&self, ctx: &DrawContext, point: Vec2) -> bool {
        self.open && hit(self.bounds(ctx), point)
    }

    fn item_rect(&self, ctx: &DrawContext, index: usize) -> Rect {
        Rect::new(
            self.pos.x,
            self.pos.y + ctx.px(6.0) + index as f32 * ctx.px(ITEM_HEIGHT),
            ctx.px(MENU_WIDTH),
            ctx.px(ITEM_HEIGHT),
        )
    }

    /// Right-click opens, outside-click and Escape close, an item click
    /// closes and hands its action back to the caller.
    pub fn update(&mut self, ctx: &DrawContext, input: &InputState, view: Vec2) -> Option<MenuAction> {
        if input.right_click {
            self.pos = place_menu(input.mouse, Self::size(ctx), view);
            self.open = true;
            return None;
        }
        if !self.open {
            return None;
        }

        if input.escape {
            self.open = false;
            return None;
        }

        if input.click {
            if hit(self.bounds(ctx), input.mouse) {
                for (index, (_, action)) in MENU_ITEMS.iter().enumerate() {
                    if hit(self.item_rect(ctx, index), input.mouse) {
                        self.open = false;
                        return Some(*action);
                    }
                }
            } else {
                self.open = false;
            }
        }
        None
    }

    pub fn draw(&self, ctx: &DrawContext, palette: &ThemePalette, dark: bool, mouse: Vec2) {
        if !self.open {
            return;
        }
        let colors = palette.mode(dark);
        let bounds = self.bounds(ctx);

        draw_rectangle(bounds.x, bounds.y, bounds.w, bounds.h, colors.surface);
        draw_rectangle_lines(
            bounds.x,
            bounds.y,
            bounds.w,
            bounds.h,
            2.0 * ctx.scale,
            palette.accent_soft,
        );

        for (index, (label, _)) in MENU_ITEMS.iter().enumerate() {
            let rect = self.item_rect(ctx, index);
            if hit(rect, mouse) {
                draw_rectangle(rect.x, rect.y, rect.w, rect.h, palette.accent_soft);
            }
            ctx.text(
                label,
                rect.x + ctx.px(16.0),
                rect.y + rect.h / 2.0 + ctx.px(5.0),
                ctx.font_size(FONT_SIZE),
                colors.text,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: Vec2 = Vec2::new(800.0, 600.0);
    const SIZE: Vec2 = Vec2::new(180.0, 148.0);

    #[test]
    fn interior_position_is_unchanged() {
        let pos = place_menu(vec2(300.0, 200.0), SIZE, VIEW);
        assert_eq!(pos, vec2(300.0, 200.0));
    }

    #[test]
    fn overflow_right_flips_left_of_the_cursor() {
        let pos = place_menu(vec2(750.0, 200.0), SIZE, VIEW);
        assert_eq!(pos.x, 750.0 - SIZE.x);
        assert_eq!(pos.y, 200.0);
    }

    #[test]
    fn overflow_bottom_flips_above_the_cursor() {
        let pos = place_menu(vec2(300.0, 580.0), SIZE, VIEW);
        assert_eq!(pos.y, 580.0 - SIZE.y);
    }

    #[test]
    fn margins_are_respected_in_the_corners() {
        let pos = place_menu(vec2(2.0, 3.0), SIZE, VIEW);
        assert_eq!(pos, vec2(MENU_MARGIN, MENU_MARGIN));

        // Bottom-right: flipped, still at least the margin from the edges.
        let pos = place_menu(vec2(799.0, 599.0), SIZE, VIEW);
        assert!(pos.x + SIZE.x <= VIEW.x - MENU_MARGIN);
        assert!(pos.y + SIZE.y <= VIEW.y - MENU_MARGIN);
        assert!(pos.x >= MENU_MARGIN && pos.y >= MENU_MARGIN);
    }

    #[test]
    fn tiny_viewport_pins_to_the_top_left_margin() {
        let pos = place_menu(vec2(50.0, 50.0), SIZE, vec2(100.0, 100.0));
        assert_eq!(pos, vec2(MENU_MARGIN, MENU_MARGIN));
    }
}
