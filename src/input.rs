use macroquad::prelude::*;

/// Per-frame input snapshot, refreshed at the top of the main loop so every
/// update function sees the same events.
#[derive(Clone)]
pub struct InputState {
    pub mouse: Vec2,
    pub click: bool,
    pub release: bool,
    pub mouse_down: bool,
    pub right_click: bool,
    pub wheel: f32,
    pub escape: bool,
    pub enter: bool,
    pub backspace: bool,
    pub chars: Vec<char>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            mouse: Vec2::ZERO,
            click: false,
            release: false,
            mouse_down: false,
            right_click: false,
            wheel: 0.0,
            escape: false,
            enter: false,
            backspace: false,
            chars: Vec::new(),
        }
    }

    pub fn update(&mut self) {
        let (mouse_x, mouse_y) = mouse_position();
        self.mouse = vec2(mouse_x, mouse_y);
        self.click = is_mouse_button_pressed(MouseButton::Left);
        self.release = is_mouse_button_released(MouseButton::Left);
        self.mouse_down = is_mouse_button_down(MouseButton::Left);
        self.right_click = is_mouse_button_pressed(MouseButton::Right);
        self.wheel = mouse_wheel().1;
        self.escape = is_key_pressed(KeyCode::Escape);
        self.enter = is_key_pressed(KeyCode::Enter);
        self.backspace = is_key_pressed(KeyCode::Backspace);

        self.chars.clear();
        while let Some(typed) = get_char_pressed() {
            if !typed.is_control() {
                self.chars.push(typed);
            }
        }
    }
}
