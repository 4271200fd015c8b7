// ===================================
// ENUMS
// ===================================

/// Context-menu actions as an explicit variant set; the menu maps clicks
/// through `MENU_ITEMS` instead of comparing action strings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MenuAction {
    About,
    Projects,
    Timeline,
    Settings,
}

pub const MENU_ITEMS: &[(&str, MenuAction)] = &[
    ("ABOUT ME", MenuAction::About),
    ("PROJECTS", MenuAction::Projects),
    ("TIMELINE", MenuAction::Timeline),
    ("SETTINGS", MenuAction::Settings),
];

// ===================================
// STATUS MESSAGES
// ===================================

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StatusKind {
    Loading,
    Success,
    Error,
}

/// Transient feedback line under the custom-wallpaper form. Success and
/// error messages hide themselves after five seconds; a loading message
/// stays until replaced or dismissed.
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
    age: f32,
}

impl StatusMessage {
    pub const AUTO_HIDE_SECS: f32 = 5.0;

    pub fn new(kind: StatusKind, text: &str) -> Self {
        StatusMessage {
            kind,
            text: text.to_string(),
            age: 0.0,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self.kind {
            StatusKind::Loading => "...",
            StatusKind::Success => "OK",
            StatusKind::Error => "!",
        }
    }

    /// Ages the message; returns true once it should be dismissed.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.age += dt;
        self.kind != StatusKind::Loading && self.age >= Self::AUTO_HIDE_SECS
    }
}

// ===================================
// LOADING SCREEN
// ===================================

#[derive(Clone, Debug, PartialEq)]
pub enum LoadingPhase {
    Covering,
    Fading,
    Gone,
}

/// The startup cover. It hides 500 ms after startup work completes, with a
/// hard five-second ceiling for when that signal never comes, then fades
/// for 600 ms before it stops being drawn. Hiding is idempotent.
pub struct LoadingScreen {
    pub phase: LoadingPhase,
    pub message: String,
    shown_at: f64,
    ready_at: Option<f64>,
    fade_started: f64,
}

impl LoadingScreen {
    pub const READY_DELAY: f64 = 0.5;
    pub const MAX_WAIT: f64 = 5.0;
    pub const FADE_SECS: f64 = 0.6;

    pub fn new(message: String, now: f64) -> Self {
        LoadingScreen {
            phase: LoadingPhase::Covering,
            message,
            shown_at: now,
            ready_at: None,
            fade_started: 0.0,
        }
    }

    /// Signals that startup work finished. Safe to call more than once.
    pub fn mark_ready(&mut self, now: f64) {
        if self.ready_at.is_none() {
            self.ready_at = Some(now);
        }
    }

    /// Starts the fade-out. Further calls are no-ops.
    pub fn hide(&mut self, now: f64) {
        if self.phase == LoadingPhase::Covering {
            self.phase = LoadingPhase::Fading;
            self.fade_started = now;
        }
    }

    pub fn update(&mut self, now: f64) {
        match self.phase {
            LoadingPhase::Covering => {
                let ready_elapsed = self
                    .ready_at
                    .map_or(false, |at| now - at >= Self::READY_DELAY);
                if ready_elapsed || now - self.shown_at >= Self::MAX_WAIT {
                    self.hide(now);
                }
            }
            LoadingPhase::Fading => {
                if now - self.fade_started >= Self::FADE_SECS {
                    self.phase = LoadingPhase::Gone;
                }
            }
            LoadingPhase::Gone => {}
        }
    }

    pub fn alpha(&self, now: f64) -> f32 {
        match self.phase {
            LoadingPhase::Covering => 1.0,
            LoadingPhase::Fading => {
                (1.0 - (now - self.fade_started) / Self::FADE_SECS).clamp(0.0, 1.0) as f32
            }
            LoadingPhase::Gone => 0.0,
        }
    }

    pub fn blocks_input(&self) -> bool {
        self.phase == LoadingPhase::Covering
    }
}

// ===================================
// ANIMATION
// ===================================

/// Shared animation clock for pulsing highlights and the input caret.
pub struct AnimationState {
    pub pulse_time: f32,
}

impl AnimationState {
    const PULSE_SPEED: f32 = 10.0;

    pub fn new() -> Self {
        AnimationState { pulse_time: 0.0 }
    }

    pub fn update(&mut self, dt: f32) {
        self.pulse_time = (self.pulse_time + dt * Self::PULSE_SPEED) % (2.0 * std::f32::consts::PI);
    }

    pub fn pulse_alpha(&self) -> f32 {
        (self.pulse_time.sin() * 0.5 + 0.5).max(0.3)
    }

    pub fn caret_visible(&self) -> bool {
        self.pulse_time.sin() > 0.0
    }
}

/// Smoothstep easing, used for panel slides and section reveals.
pub fn ease_smooth(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_hides_half_a_second_after_ready() {
        let mut screen = LoadingScreen::new("HI".to_string(), 0.0);
        screen.mark_ready(1.0);

        screen.update(1.2);
        assert_eq!(screen.phase, LoadingPhase::Covering);

        screen.update(1.5);
        assert_eq!(screen.phase, LoadingPhase::Fading);

        // Fade runs 600 ms, then the cover is gone entirely.
        screen.update(2.2);
        assert_eq!(screen.phase, LoadingPhase::Gone);
    }

    #[test]
    fn loading_has_a_hard_five_second_ceiling() {
        let mut screen = LoadingScreen::new("HI".to_string(), 10.0);
        // Never marked ready.
        screen.update(14.9);
        assert_eq!(screen.phase, LoadingPhase::Covering);
        screen.update(15.0);
        assert_eq!(screen.phase, LoadingPhase::Fading);
    }

    #[test]
    fn hide_is_idempotent() {
        let mut screen = LoadingScreen::new("HI".to_string(), 0.0);
        screen.hide(1.0);
        screen.hide(2.0);
        assert_eq!(screen.phase, LoadingPhase::Fading);
        // The fade clock stays anchored to the first hide.
        assert!(screen.alpha(1.3) < 0.6);
        screen.update(1.6);
        assert_eq!(screen.phase, LoadingPhase::Gone);
        assert_eq!(screen.alpha(1.7), 0.0);
    }

    #[test]
    fn status_auto_hide_spares_loading() {
        let mut loading = StatusMessage::new(StatusKind::Loading, "wait");
        assert!(!loading.tick(100.0));

        let mut success = StatusMessage::new(StatusKind::Success, "done");
        assert!(!success.tick(4.9));
        assert!(success.tick(0.2));

        let mut error = StatusMessage::new(StatusKind::Error, "no");
        assert!(error.tick(5.0));
    }

    #[test]
    fn ease_is_clamped_and_monotonic_at_ends() {
        assert_eq!(ease_smooth(-1.0), 0.0);
        assert_eq!(ease_smooth(0.0), 0.0);
        assert_eq!(ease_smooth(1.0), 1.0);
        assert_eq!(ease_smooth(2.0), 1.0);
        assert!(ease_smooth(0.5) > 0.4 && ease_smooth(0.5) < 0.6);
    }
}
