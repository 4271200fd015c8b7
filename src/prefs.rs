use crate::store::PrefStore;
use crate::wallpaper::with_cache_token;

pub const KEY_THEME: &str = "theme";
pub const KEY_MODE: &str = "mode";
pub const KEY_WALLPAPER: &str = "wallpaper";
pub const KEY_OPACITY: &str = "opacity";
pub const KEY_CUSTOM_WALLPAPER: &str = "customWallpaperUrl";

pub const DEFAULT_THEME: &str = "pink";
pub const DEFAULT_MODE: &str = "light";
pub const DEFAULT_OPACITY: u8 = 70;

/// What the page background is currently showing. `Remote` carries the
/// cache-busted URL actually applied, not the raw persisted one.
#[derive(Clone, Debug, PartialEq)]
pub enum WallpaperSource {
    BuiltIn,
    Remote { url: String },
}

/// The injected background-overlay opacity rule. At most one exists at a
/// time; applying a new percentage removes the old rule first.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayRule {
    pub opacity: f32,
}

/// The applied visual state of the page, the counterpart of the original's
/// document-level markers and inline styles.
pub struct PageStyle {
    pub theme: String,
    pub dark: bool,
    pub wallpaper: WallpaperSource,
    pub overlay_rule: Option<OverlayRule>,
}

impl PageStyle {
    fn new() -> Self {
        PageStyle {
            theme: DEFAULT_THEME.to_string(),
            dark: false,
            wallpaper: WallpaperSource::BuiltIn,
            overlay_rule: None,
        }
    }
}

/// Applies preferences to the page style and keeps the persistent store and
/// the settings widgets in agreement with what is on screen.
pub struct Preferences {
    store: PrefStore,
    pub style: PageStyle,
    /// Raw persisted mode string. Option highlighting matches this exactly,
    /// so an odd value like "DARK" renders light with nothing highlighted.
    pub mode_marker: String,
    pub opacity_percent: u8,
    pub opacity_label: String,
}

impl Preferences {
    pub fn new(store: PrefStore) -> Self {
        Preferences {
            store,
            style: PageStyle::new(),
            mode_marker: DEFAULT_MODE.to_string(),
            opacity_percent: DEFAULT_OPACITY,
            opacity_label: format!("{}%", DEFAULT_OPACITY),
        }
    }

    /// Marks `theme` active and persists it. The value is applied verbatim:
    /// an unrecognized name leaves the page on fallback colors with no
    /// swatch highlighted, which is not an error.
    pub fn apply_theme(&mut self, theme: &str) {
        self.style.theme = theme.to_string();
        self.store.set(KEY_THEME, theme);
    }

    /// Exact-match dark switch: anything other than `"dark"` is light.
    /// The string is persisted as given.
    pub fn apply_mode(&mut self, mode: &str) {
        self.style.dark = mode == "dark";
        self.mode_marker = mode.to_string();
        self.store.set(KEY_MODE, mode);
    }

    /// Points the background at `url` (cache-busted with `t=<now_ms>`), or
    /// back at the built-in background when `url` is empty or absent.
    /// `skip_persist` is used when redisplaying an already-persisted value.
    pub fn apply_wallpaper(&mut self, url: Option<&str>, skip_persist: bool, now_ms: i64) {
        match url {
            Some(raw) if !raw.is_empty() => {
                self.style.wallpaper = WallpaperSource::Remote {
                    url: with_cache_token(raw, now_ms),
                };
                if !skip_persist {
                    self.store.set(KEY_WALLPAPER, raw);
                }
            }
            _ => {
                self.style.wallpaper = WallpaperSource::BuiltIn;
                self.store.remove(KEY_WALLPAPER);
            }
        }
    }

    /// Replaces the overlay rule with one at `percent/100`, persists the
    /// percentage and refreshes the on-screen label.
    pub fn apply_opacity(&mut self, percent: u8) {
        self.style.overlay_rule = None;
        self.style.overlay_rule = Some(OverlayRule {
            opacity: percent as f32 / 100.0,
        });
        self.store.set(KEY_OPACITY, &percent.to_string());
        self.opacity_percent = percent;
        self.opacity_label = format!("{}%", percent);
    }

    /// Restores every persisted preference at startup. Wallpaper restoration
    /// skips persistence so redisplaying a value does not rewrite it with a
    /// fresh cache token. When both wallpaper keys exist the custom one is
    /// applied last and wins.
    pub fn initialize(&mut self, now_ms: i64) {
        let theme = self
            .store
            .get(KEY_THEME)
            .unwrap_or(DEFAULT_THEME)
            .to_string();
        self.apply_theme(&theme);

        let mode = self.store.get(KEY_MODE).unwrap_or(DEFAULT_MODE).to_string();
        self.apply_mode(&mode);

        if let Some(saved) = self.store.get(KEY_WALLPAPER).map(str::to_string) {
            self.apply_wallpaper(Some(&saved), true, now_ms);
        }

        match self.store.get(KEY_OPACITY).and_then(|v| v.parse::<u8>().ok()) {
            Some(saved) => self.apply_opacity(saved),
            None => self.apply_opacity(DEFAULT_OPACITY),
        }

        if let Some(custom) = self.store.get(KEY_CUSTOM_WALLPAPER).map(str::to_string) {
            self.apply_wallpaper(Some(&custom), true, now_ms);
        }
    }

    /// Commits a resolved remote wallpaper: applies it, persists it under
    /// both the plain and the custom key (the two keys are deliberately kept
    /// separate, matching the original flows).
    pub fn commit_remote_wallpaper(&mut self, url: &str, now_ms: i64) {
        self.apply_wallpaper(Some(url), false, now_ms);
        self.store.set(KEY_CUSTOM_WALLPAPER, url);
    }

    /// The reset-wallpaper button: back to the built-in background, and both
    /// wallpaper keys are dropped.
    pub fn reset_wallpaper(&mut self, now_ms: i64) {
        self.apply_wallpaper(None, false, now_ms);
        self.store.remove(KEY_CUSTOM_WALLPAPER);
    }

    /// Clears the whole store and re-applies the hard-coded defaults. The
    /// injected overlay rule is removed and the label reset; the caller then
    /// re-runs `initialize()`, this app's stand-in for a page reload.
    pub fn reset_all(&mut self, now_ms: i64) {
        self.store.clear();

        self.apply_theme(DEFAULT_THEME);
        self.apply_mode(DEFAULT_MODE);
        self.apply_wallpaper(None, false, now_ms);
        self.apply_opacity(DEFAULT_OPACITY);

        self.style.overlay_rule = None;
        self.opacity_percent = DEFAULT_OPACITY;
        self.opacity_label = format!("{}%", DEFAULT_OPACITY);
    }

    pub fn custom_wallpaper_url(&self) -> Option<&str> {
        self.store.get(KEY_CUSTOM_WALLPAPER)
    }

    pub fn stored(&self, key: &str) -> Option<&str> {
        self.store.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefs() -> Preferences {
        Preferences::new(PrefStore::open(None))
    }

    #[test]
    fn opacity_injects_exactly_one_rule_at_percent_over_100() {
        let mut p = prefs();
        for percent in [0u8, 1, 35, 70, 99, 100] {
            p.apply_opacity(percent);
            let rule = p.style.overlay_rule.as_ref().expect("rule injected");
            assert_eq!(rule.opacity, percent as f32 / 100.0);
            assert_eq!(p.opacity_label, format!("{}%", percent));
        }
        assert_eq!(p.stored(KEY_OPACITY), Some("100"));
    }

    #[test]
    fn theme_round_trips_through_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let mut p = Preferences::new(PrefStore::open(Some(path.clone())));
        p.apply_theme("blue");
        assert_eq!(p.style.theme, "blue");

        // Simulated restart: fresh manager over the same file.
        let mut restored = Preferences::new(PrefStore::open(Some(path)));
        restored.initialize(1);
        assert_eq!(restored.style.theme, "blue");
        assert_eq!(crate::theme::palette(&restored.style.theme).unwrap().name, "blue");
    }

    #[test]
    fn unknown_theme_is_applied_verbatim_without_a_palette_match() {
        let mut p = prefs();
        p.apply_theme("mauve");
        assert_eq!(p.style.theme, "mauve");
        assert!(crate::theme::palette(&p.style.theme).is_none());
        assert_eq!(p.stored(KEY_THEME), Some("mauve"));
    }

    #[test]
    fn mode_matching_is_exact() {
        let mut p = prefs();
        p.apply_mode("dark");
        assert!(p.style.dark);
        for not_dark in ["DARK", "", "light", "darkish"] {
            p.apply_mode(not_dark);
            assert!(!p.style.dark, "{:?} must not enable dark", not_dark);
            assert_eq!(p.mode_marker, not_dark);
        }
    }

    #[test]
    fn wallpaper_cache_token_respects_existing_query() {
        let mut p = prefs();
        p.apply_wallpaper(Some("https://x/y.png"), false, 123);
        assert_eq!(
            p.style.wallpaper,
            WallpaperSource::Remote {
                url: "https://x/y.png?t=123".to_string()
            }
        );
        assert_eq!(p.stored(KEY_WALLPAPER), Some("https://x/y.png"));

        p.apply_wallpaper(Some("https://x/y.png?a=1"), false, 456);
        assert_eq!(
            p.style.wallpaper,
            WallpaperSource::Remote {
                url: "https://x/y.png?a=1&t=456".to_string()
            }
        );
    }

    #[test]
    fn skip_persist_redisplays_without_rewriting() {
        let mut p = prefs();
        p.apply_wallpaper(Some("https://x/y.png"), true, 123);
        assert!(matches!(
            p.style.wallpaper,
            WallpaperSource::Remote { .. }
        ));
        assert_eq!(p.stored(KEY_WALLPAPER), None);
    }

    #[test]
    fn empty_wallpaper_reverts_to_built_in_and_drops_the_key() {
        let mut p = prefs();
        p.apply_wallpaper(Some("https://x/y.png"), false, 1);
        p.apply_wallpaper(Some(""), false, 2);
        assert_eq!(p.style.wallpaper, WallpaperSource::BuiltIn);
        assert_eq!(p.stored(KEY_WALLPAPER), None);
    }

    #[test]
    fn custom_wallpaper_wins_on_initialize() {
        let mut p = prefs();
        // A store holding both keys: a plain wallpaper and a custom one.
        p.store.set(KEY_WALLPAPER, "https://plain/a.jpg");
        p.store.set(KEY_CUSTOM_WALLPAPER, "https://custom/b.jpg");

        p.initialize(99);
        match &p.style.wallpaper {
            WallpaperSource::Remote { url } => {
                assert_eq!(url, "https://custom/b.jpg?t=99")
            }
            other => panic!("unexpected source {:?}", other),
        }
    }

    #[test]
    fn reset_all_restores_defaults_and_removes_the_rule() {
        let mut p = prefs();
        p.apply_theme("purple");
        p.apply_mode("dark");
        p.commit_remote_wallpaper("https://x/y.png", 1);
        p.apply_opacity(15);

        p.reset_all(2);

        assert!(p.style.overlay_rule.is_none());
        assert_eq!(p.opacity_label, "70%");
        assert_eq!(p.stored(KEY_THEME), Some(DEFAULT_THEME));
        assert_eq!(p.stored(KEY_MODE), Some(DEFAULT_MODE));
        assert_eq!(p.stored(KEY_OPACITY), Some("70"));
        assert_eq!(p.stored(KEY_WALLPAPER), None);
        assert_eq!(p.stored(KEY_CUSTOM_WALLPAPER), None);

        // The "reload" that follows re-applies the persisted defaults.
        p.initialize(3);
        assert_eq!(p.style.theme, DEFAULT_THEME);
        assert!(!p.style.dark);
        assert_eq!(p.style.wallpaper, WallpaperSource::BuiltIn);
        assert_eq!(
            p.style.overlay_rule,
            Some(OverlayRule { opacity: 0.70 })
        );
    }

    #[test]
    fn reset_wallpaper_clears_both_keys() {
        let mut p = prefs();
        p.commit_remote_wallpaper("https://x/y.png", 1);
        assert_eq!(p.stored(KEY_WALLPAPER), Some("https://x/y.png"));
        assert_eq!(p.custom_wallpaper_url(), Some("https://x/y.png"));

        p.reset_wallpaper(2);
        assert_eq!(p.style.wallpaper, WallpaperSource::BuiltIn);
        assert_eq!(p.stored(KEY_WALLPAPER), None);
        assert_eq!(p.custom_wallpaper_url(), None);
    }
}
