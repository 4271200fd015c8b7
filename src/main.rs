use macroquad::prelude::*;

// for selecting a random loading message on startup; the leading colons keep
// this from colliding with macroquad's own rand re-export
use ::rand::Rng;

mod audio;
mod config;
mod input;
mod prefs;
mod store;
mod theme;
mod types;
mod ui;
mod wallpaper;

use audio::SoundEffects;
use config::Config;
use input::InputState;
use prefs::{Preferences, WallpaperSource};
use store::PrefStore;
use types::{AnimationState, LoadingScreen, MenuAction, StatusKind, StatusMessage};
use ui::context_menu::ContextMenu;
use ui::page::{self, HeaderItem, PageView, SectionId};
use ui::settings::{PanelRequest, SettingsPanel};
use ui::{hit, ConfirmDialog, DrawContext};
use wallpaper::{now_ms, FetchedImage, WallpaperMessage, WallpaperService};

// ===================================
// CONSTANTS
// ===================================

pub const FONT_SIZE: u16 = 16;

const WINDOW_TITLE: &str = "PetalPage";
const BASE_SCREEN_HEIGHT: f32 = 600.0;

const LOADING_MESSAGES: &[&str] = &[
    "PICKING FRESH PETALS...",
    "WATERING THE WALLPAPER...",
    "DUSTING OFF THE GUESTBOOK...",
    "BREWING TEA FOR VISITORS...",
    "UNFOLDING THE TIMELINE...",
    "REMEMBERING YOUR COLORS...",
];

fn window_conf() -> Conf {
    let config = Config::load();
    Conf {
        window_title: WINDOW_TITLE.to_owned(),
        window_resizable: true,
        window_width: config.window_width,
        window_height: config.window_height,
        high_dpi: false,
        fullscreen: config.fullscreen,
        ..Default::default()
    }
}

// ===================================
// WALLPAPER TEXTURES
// ===================================

/// The built-in default background: a soft petal-pink gradient, generated
/// so the app needs no bundled image to start.
fn built_in_wallpaper() -> Texture2D {
    const SIZE: usize = 64;
    let mut bytes = Vec::with_capacity(SIZE * SIZE * 4);
    for y in 0..SIZE {
        let t = y as f32 / (SIZE - 1) as f32;
        for x in 0..SIZE {
            let s = x as f32 / (SIZE - 1) as f32;
            let r = 1.00 - 0.12 * t - 0.03 * s;
            let g = 0.90 - 0.12 * t;
            let b = 0.94 - 0.02 * t + 0.03 * s;
            bytes.push((r.clamp(0.0, 1.0) * 255.0) as u8);
            bytes.push((g.clamp(0.0, 1.0) * 255.0) as u8);
            bytes.push((b.clamp(0.0, 1.0) * 255.0) as u8);
            bytes.push(255);
        }
    }
    let texture = Texture2D::from_rgba8(SIZE as u16, SIZE as u16, &bytes);
    texture.set_filter(FilterMode::Linear);
    texture
}

fn upload_texture(image: &FetchedImage) -> Texture2D {
    let texture = Texture2D::from_rgba8(image.width as u16, image.height as u16, &image.pixels);
    texture.set_filter(FilterMode::Linear);
    texture
}

/// Cover-fit: fill the window while preserving the texture's aspect ratio.
fn draw_wallpaper(texture: &Texture2D, view: Vec2) {
    let texture_aspect = texture.width() / texture.height();
    let view_aspect = view.x / view.y;
    let (w, h) = if texture_aspect > view_aspect {
        (view.y * texture_aspect, view.y)
    } else {
        (view.x, view.x / texture_aspect)
    };
    draw_texture_ex(
        texture,
        (view.x - w) / 2.0,
        (view.y - h) / 2.0,
        WHITE,
        DrawTextureParams {
            dest_size: Some(vec2(w, h)),
            ..Default::default()
        },
    );
}

// ===================================
// LOADING SCREEN
// ===================================

fn draw_loading(ctx: &DrawContext, loading: &LoadingScreen, view: Vec2, now: f64) {
    let alpha = loading.alpha(now);
    if alpha <= 0.0 {
        return;
    }
    draw_rectangle(
        0.0,
        0.0,
        view.x,
        view.y,
        Color { r: 1.0, g: 0.95, b: 0.97, a: alpha },
    );

    let accent = theme::THEMES[0].accent;
    ctx.text_centered(
        "PETAL PAGE",
        view.x / 2.0,
        view.y / 2.0 - ctx.px(30.0),
        ctx.font_size(32),
        Color { a: alpha, ..accent },
    );
    ctx.text_centered(
        &loading.message,
        view.x / 2.0,
        view.y / 2.0 + ctx.px(10.0),
        ctx.font_size(FONT_SIZE),
        Color { r: 0.45, g: 0.42, b: 0.45, a: alpha },
    );
    let dots = ".".repeat((now * 2.0) as usize % 3 + 1);
    ctx.text_centered(
        &dots,
        view.x / 2.0,
        view.y / 2.0 + ctx.px(40.0),
        ctx.font_size(24),
        Color { a: alpha, ..accent },
    );
}

// ===================================
// MAIN
// ===================================

#[macroquad::main(window_conf)]
async fn main() {
    let config = Config::load();

    let font = load_ttf_font("assets/petalpage.ttf").await.ok();
    if font.is_none() {
        println!("[Info] Bundled font not found, using the built-in one.");
    }
    let mut ctx = DrawContext { font, scale: 1.0 };

    let sound_effects = SoundEffects::load(config.sfx_volume).await;

    let mut rng = ::rand::rng();
    let loading_message = LOADING_MESSAGES[rng.random_range(0..LOADING_MESSAGES.len())];
    let mut loading = LoadingScreen::new(loading_message.to_string(), get_time());

    let mut prefs = Preferences::new(PrefStore::open_default());
    prefs.initialize(now_ms());

    let mut wallpapers = WallpaperService::new(config.wallpaper_api.clone());
    if let WallpaperSource::Remote { url } = &prefs.style.wallpaper {
        wallpapers.restore(url.clone());
    }

    let default_wallpaper = built_in_wallpaper();
    let mut remote_wallpaper: Option<Texture2D> = None;

    let mut input = InputState::new();
    let mut animation = AnimationState::new();
    let mut page = PageView::new();
    let mut panel = SettingsPanel::new(&prefs);
    let mut menu = ContextMenu::new();
    let mut confirm: Option<ConfirmDialog> = None;

    // Startup work is done; the cover lifts half a second from now.
    loading.mark_ready(get_time());

    loop {
        let dt = get_frame_time();
        let now = get_time();
        let view = vec2(screen_width(), screen_height());
        ctx.scale = view.y / BASE_SCREEN_HEIGHT;

        input.update();
        animation.update(dt);
        loading.update(now);

        // --- Wallpaper task completions ---
        for message in wallpapers.poll() {
            match message {
                WallpaperMessage::Random { source_url, from_json, image, .. } => {
                    prefs.commit_remote_wallpaper(&source_url, now_ms());
                    panel.input_buffer = source_url.clone();
                    if from_json {
                        panel.status = Some(StatusMessage::new(
                            StatusKind::Success,
                            "Random wallpaper loaded and saved!",
                        ));
                    }
                    match image {
                        Ok(decoded) => remote_wallpaper = Some(upload_texture(&decoded)),
                        // The URL stays committed; the old texture lingers.
                        Err(e) => println!("[Warn] Random wallpaper image failed: {}", e),
                    }
                }
                WallpaperMessage::CustomApplied { url, image, .. } => {
                    prefs.commit_remote_wallpaper(&url, now_ms());
                    remote_wallpaper = Some(upload_texture(&image));
                    panel.status = Some(StatusMessage::new(
                        StatusKind::Success,
                        "Wallpaper applied and saved!",
                    ));
                }
                WallpaperMessage::CustomError { message, .. } => {
                    panel.status = Some(StatusMessage::new(StatusKind::Error, &message));
                }
                WallpaperMessage::Restored { image, .. } => match image {
                    Ok(decoded) => remote_wallpaper = Some(upload_texture(&decoded)),
                    Err(e) => println!("[Warn] Could not restore the saved wallpaper: {}", e),
                },
            }
        }

        let covered = loading.blocks_input();

        // --- Context menu (floats above everything, opens anywhere) ---
        // Checked before the update so a click on a menu item is consumed
        // even though handling it closes the menu.
        let menu_consumed_click = input.click && menu.contains(&ctx, input.mouse);
        let menu_action = if covered {
            None
        } else {
            menu.update(&ctx, &input, view)
        };
        if let Some(action) = menu_action {
            sound_effects.play_click();
            match action {
                MenuAction::About => page.scroll_to(SectionId::About, view.y, ctx.scale),
                MenuAction::Projects => page.scroll_to(SectionId::Projects, view.y, ctx.scale),
                MenuAction::Timeline => page.scroll_to(SectionId::Timeline, view.y, ctx.scale),
                MenuAction::Settings => panel.open = true,
            }
        }

        // A click landing on the open menu must not reach surfaces below.
        let mut surface_input = input.clone();
        if menu_consumed_click {
            surface_input.click = false;
        }

        // --- Confirm dialog (modal) and settings panel ---
        if !covered {
            if let Some(dialog) = &mut confirm {
                match dialog.update(&ctx, &surface_input, &sound_effects, view) {
                    Some(true) => {
                        prefs.reset_all(now_ms());
                        // The original reloads the document here; re-running
                        // initialize and rebuilding the widgets is the
                        // equivalent of coming back up from scratch.
                        prefs.initialize(now_ms());
                        remote_wallpaper = None;
                        page = PageView::new();
                        panel = SettingsPanel::new(&prefs);
                        confirm = None;
                        println!("[Info] All settings were reset to defaults.");
                    }
                    Some(false) => confirm = None,
                    None => {}
                }
            } else if let Some(PanelRequest::ConfirmReset) = panel.update(
                &ctx,
                &surface_input,
                &mut prefs,
                &sound_effects,
                &mut wallpapers,
                dt,
                view,
            ) {
                confirm = Some(ConfirmDialog::new());
            }
        }

        // --- Page interactions ---
        let page_locked = panel.open || confirm.is_some();
        if !covered && !page_locked && surface_input.click {
            for (rect, item, _) in page::header_items(&ctx, view.x) {
                if hit(rect, surface_input.mouse) {
                    match item {
                        HeaderItem::Anchor(id) => {
                            sound_effects.play_click();
                            page.scroll_to(id, view.y, ctx.scale);
                        }
                        HeaderItem::Settings => {
                            sound_effects.play_click();
                            panel.open = true;
                        }
                    }
                }
            }
            if page.back_to_top_visible() && hit(page::back_to_top_rect(&ctx, view), surface_input.mouse)
            {
                sound_effects.play_click();
                page.scroll_to_top();
            }
        }
        page.update(&input, dt, view.y, ctx.scale, page_locked || covered);

        // --- Draw ---
        clear_background(BLACK);
        let wallpaper_texture = match &prefs.style.wallpaper {
            WallpaperSource::BuiltIn => &default_wallpaper,
            WallpaperSource::Remote { .. } => remote_wallpaper.as_ref().unwrap_or(&default_wallpaper),
        };
        draw_wallpaper(wallpaper_texture, view);

        if let Some(rule) = &prefs.style.overlay_rule {
            let colors = theme::palette_or_default(&prefs.style.theme).mode(prefs.style.dark);
            draw_rectangle(
                0.0,
                0.0,
                view.x,
                view.y,
                Color { a: rule.opacity, ..colors.surface },
            );
        }

        page.draw(&ctx, &prefs.style, view, input.mouse);
        panel.draw(&ctx, &prefs, &wallpapers, &animation, view, input.mouse);
        menu.draw(
            &ctx,
            theme::palette_or_default(&prefs.style.theme),
            prefs.style.dark,
            input.mouse,
        );
        if let Some(dialog) = &confirm {
            dialog.draw(&ctx, theme::palette_or_default(&prefs.style.theme), view);
        }
        draw_loading(&ctx, &loading, view, now);

        next_frame().await
    }
}
