use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

use chrono::Utc;
use serde::Deserialize;

pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Appends the cache-busting timestamp, continuing an existing query string
/// with `&` and starting one with `?` otherwise.
pub fn with_cache_token(url: &str, now_ms: i64) -> String {
    if url.contains('?') {
        format!("{}&t={}", url, now_ms)
    } else {
        format!("{}?t={}", url, now_ms)
    }
}

/// Custom wallpaper input must be a syntactically valid http(s) URL.
pub fn is_valid_url(input: &str) -> bool {
    match url::Url::parse(input) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

#[derive(Deserialize)]
struct ApiResponse {
    url: Option<String>,
}

/// A completed GET of the random-wallpaper endpoint.
pub struct RandomFetch {
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// How the endpoint's answer resolved into a wallpaper URL.
#[derive(Debug, PartialEq)]
pub enum RandomResolution {
    /// The endpoint returned JSON with a `url` field.
    JsonUrl(String),
    /// Any other success: the request URL itself is the image source.
    RequestUrl(String),
    /// Network failure: a freshly stamped endpoint URL, unconditionally.
    Fallback(String),
}

impl RandomResolution {
    pub fn url(&self) -> &str {
        match self {
            RandomResolution::JsonUrl(url)
            | RandomResolution::RequestUrl(url)
            | RandomResolution::Fallback(url) => url,
        }
    }

    pub fn into_url(self) -> String {
        match self {
            RandomResolution::JsonUrl(url)
            | RandomResolution::RequestUrl(url)
            | RandomResolution::Fallback(url) => url,
        }
    }
}

/// Decides which URL becomes the wallpaper after hitting the endpoint:
/// a JSON `url` field wins, any other success means the request URL itself
/// was the image, and a network failure falls back to a freshly stamped
/// endpoint URL. Never an error.
pub fn resolve_random_source(
    outcome: &Result<RandomFetch, String>,
    request_url: &str,
    fallback_url: &str,
) -> RandomResolution {
    match outcome {
        Ok(fetch) => {
            let is_json = fetch
                .content_type
                .as_deref()
                .map_or(false, |ct| ct.contains("application/json"));
            if is_json {
                if let Ok(parsed) = serde_json::from_slice::<ApiResponse>(&fetch.body) {
                    if let Some(url) = parsed.url {
                        return RandomResolution::JsonUrl(url);
                    }
                }
            }
            RandomResolution::RequestUrl(request_url.to_string())
        }
        Err(_) => RandomResolution::Fallback(fallback_url.to_string()),
    }
}

/// HEAD-check verdict for a custom wallpaper URL. A network failure is
/// fail-open; a reachable URL without an `image/` content type is rejected.
pub fn head_allows(outcome: &Result<Option<String>, String>) -> bool {
    match outcome {
        Err(_) => true,
        Ok(content_type) => content_type
            .as_deref()
            .map_or(false, |ct| ct.contains("image/")),
    }
}

/// Decoded RGBA pixels ready to be uploaded as a texture on the main thread.
pub struct FetchedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

fn decode_image(bytes: &[u8]) -> Result<FetchedImage, String> {
    image::load_from_memory(bytes)
        .map(|decoded| {
            let rgba = decoded.to_rgba8();
            FetchedImage {
                width: rgba.width(),
                height: rgba.height(),
                pixels: rgba.into_raw(),
            }
        })
        .map_err(|e| format!("could not decode image: {}", e))
}

fn fetch_and_decode(url: &str) -> Result<FetchedImage, String> {
    let response = reqwest::blocking::get(url).map_err(|e| format!("download failed: {}", e))?;
    let bytes = response
        .bytes()
        .map_err(|e| format!("failed to read download: {}", e))?;
    decode_image(&bytes)
}

pub enum WallpaperMessage {
    /// Random-endpoint resolution. `source_url` is committed regardless;
    /// the image is best-effort and a failure keeps the previous texture.
    /// `from_json` marks the announced JSON `url` path.
    Random {
        generation: u64,
        source_url: String,
        from_json: bool,
        image: Result<FetchedImage, String>,
    },
    /// Custom URL passed validation and decoded; safe to commit.
    CustomApplied {
        generation: u64,
        url: String,
        image: FetchedImage,
    },
    /// Custom URL rejected or failed to load; nothing was committed.
    CustomError { generation: u64, message: String },
    /// Startup restoration of a persisted wallpaper.
    Restored {
        generation: u64,
        image: Result<FetchedImage, String>,
    },
}

impl WallpaperMessage {
    fn generation(&self) -> u64 {
        match self {
            WallpaperMessage::Random { generation, .. }
            | WallpaperMessage::CustomApplied { generation, .. }
            | WallpaperMessage::CustomError { generation, .. }
            | WallpaperMessage::Restored { generation, .. } => *generation,
        }
    }
}

/// Runs wallpaper network work on background threads. Every new task bumps
/// the generation counter and completions from superseded tasks are dropped,
/// so the most recently issued request wins no matter how replies interleave.
pub struct WallpaperService {
    endpoint: String,
    generation: u64,
    tx: Sender<WallpaperMessage>,
    rx: Receiver<WallpaperMessage>,
    pub random_busy: bool,
    pub custom_busy: bool,
}

impl WallpaperService {
    pub fn new(endpoint: String) -> Self {
        let (tx, rx) = channel();
        WallpaperService {
            endpoint,
            generation: 0,
            tx,
            rx,
            random_busy: false,
            custom_busy: false,
        }
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.random_busy = false;
        self.custom_busy = false;
        self.generation
    }

    /// Hits the random endpoint and resolves a wallpaper URL plus pixels.
    pub fn fetch_random(&mut self) {
        let generation = self.next_generation();
        self.random_busy = true;
        let endpoint = self.endpoint.clone();
        let tx = self.tx.clone();

        thread::spawn(move || {
            let request_url = format!("{}?t={}", endpoint, now_ms());
            let client = reqwest::blocking::Client::builder()
                .user_agent("PetalPage-Wallpaper")
                .build()
                .unwrap();

            let outcome = client
                .get(&request_url)
                .header(reqwest::header::CACHE_CONTROL, "no-cache")
                .header(reqwest::header::PRAGMA, "no-cache")
                .send()
                .map_err(|e| format!("wallpaper request failed: {}", e))
                .and_then(|response| {
                    let content_type = response
                        .headers()
                        .get(reqwest::header::CONTENT_TYPE)
                        .and_then(|v| v.to_str().ok())
                        .map(|s| s.to_string());
                    response
                        .bytes()
                        .map(|bytes| RandomFetch {
                            content_type,
                            body: bytes.to_vec(),
                        })
                        .map_err(|e| format!("failed to read wallpaper response: {}", e))
                });

            let fallback_url = format!("{}?t={}", endpoint, now_ms());
            let resolution = resolve_random_source(&outcome, &request_url, &fallback_url);

            // When the endpoint answered with the image itself, its bytes are
            // already in hand; a JSON body without a `url` still means the
            // request URL must be fetched again as an image.
            let body_is_json = matches!(
                &outcome,
                Ok(f) if f.content_type.as_deref().map_or(false, |ct| ct.contains("application/json"))
            );
            let image = match (&outcome, &resolution) {
                (Ok(fetch), RandomResolution::RequestUrl(_)) if !body_is_json => {
                    decode_image(&fetch.body)
                }
                _ => fetch_and_decode(&with_cache_token(resolution.url(), now_ms())),
            };

            let from_json = matches!(resolution, RandomResolution::JsonUrl(_));
            let _ = tx.send(WallpaperMessage::Random {
                generation,
                source_url: resolution.into_url(),
                from_json,
                image,
            });
        });
    }

    /// Validates a custom wallpaper URL (HEAD check, then preload/decode).
    /// The URL is only committed by the caller once `CustomApplied` arrives.
    pub fn check_custom(&mut self, url: String) {
        let generation = self.next_generation();
        self.custom_busy = true;
        let tx = self.tx.clone();

        thread::spawn(move || {
            let client = reqwest::blocking::Client::builder()
                .user_agent("PetalPage-Wallpaper")
                .build()
                .unwrap();

            let head = client
                .head(&url)
                .send()
                .map(|response| {
                    response
                        .headers()
                        .get(reqwest::header::CONTENT_TYPE)
                        .and_then(|v| v.to_str().ok())
                        .map(|s| s.to_string())
                })
                .map_err(|e| format!("head check failed: {}", e));

            if !head_allows(&head) {
                let _ = tx.send(WallpaperMessage::CustomError {
                    generation,
                    message: "That link does not look like an image address".to_string(),
                });
                return;
            }

            match fetch_and_decode(&with_cache_token(&url, now_ms())) {
                Ok(image) => {
                    let _ = tx.send(WallpaperMessage::CustomApplied {
                        generation,
                        url,
                        image,
                    });
                }
                Err(e) => {
                    println!("[Warn] Custom wallpaper preload failed: {}", e);
                    let _ = tx.send(WallpaperMessage::CustomError {
                        generation,
                        message: "Could not load that image, check the link".to_string(),
                    });
                }
            }
        });
    }

    /// Re-fetches an already-applied wallpaper URL after a restart.
    pub fn restore(&mut self, applied_url: String) {
        let generation = self.next_generation();
        let tx = self.tx.clone();

        thread::spawn(move || {
            let image = fetch_and_decode(&applied_url);
            let _ = tx.send(WallpaperMessage::Restored { generation, image });
        });
    }

    /// Drains completions, dropping any from superseded tasks.
    pub fn poll(&mut self) -> Vec<WallpaperMessage> {
        let mut fresh = Vec::new();
        while let Ok(message) = self.rx.try_recv() {
            if message.generation() != self.generation {
                println!("[Info] Ignoring stale wallpaper task result.");
                continue;
            }
            match &message {
                WallpaperMessage::Random { .. } => self.random_busy = false,
                WallpaperMessage::CustomApplied { .. } | WallpaperMessage::CustomError { .. } => {
                    self.custom_busy = false
                }
                WallpaperMessage::Restored { .. } => {}
            }
            fresh.push(message);
        }
        fresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::{Preferences, WallpaperSource, KEY_CUSTOM_WALLPAPER, KEY_WALLPAPER};
    use crate::store::PrefStore;

    #[test]
    fn cache_token_uses_question_mark_then_ampersand() {
        assert_eq!(
            with_cache_token("https://x/y.png", 42),
            "https://x/y.png?t=42"
        );
        assert_eq!(
            with_cache_token("https://x/y.png?w=1920", 42),
            "https://x/y.png?w=1920&t=42"
        );
    }

    #[test]
    fn url_validation_accepts_only_http_schemes() {
        assert!(is_valid_url("https://example.com/a.png"));
        assert!(is_valid_url("http://example.com"));
        assert!(!is_valid_url("ftp://x"));
        assert!(!is_valid_url("not a url"));
        assert!(!is_valid_url("example.com/img.jpg"));
    }

    #[test]
    fn json_url_field_wins() {
        let outcome = Ok(RandomFetch {
            content_type: Some("application/json; charset=utf-8".to_string()),
            body: br#"{"url":"https://x/y.jpg"}"#.to_vec(),
        });
        assert_eq!(
            resolve_random_source(&outcome, "https://api/e?t=1", "https://api/e?t=2"),
            RandomResolution::JsonUrl("https://x/y.jpg".to_string())
        );
    }

    #[test]
    fn json_without_url_falls_back_to_the_request() {
        let outcome = Ok(RandomFetch {
            content_type: Some("application/json".to_string()),
            body: br#"{"status":"ok"}"#.to_vec(),
        });
        assert_eq!(
            resolve_random_source(&outcome, "https://api/e?t=1", "https://api/e?t=2"),
            RandomResolution::RequestUrl("https://api/e?t=1".to_string())
        );
    }

    #[test]
    fn image_body_means_the_request_url_is_the_wallpaper() {
        let outcome = Ok(RandomFetch {
            content_type: Some("image/jpeg".to_string()),
            body: vec![0xff, 0xd8],
        });
        assert_eq!(
            resolve_random_source(&outcome, "https://api/e?t=1", "https://api/e?t=2"),
            RandomResolution::RequestUrl("https://api/e?t=1".to_string())
        );
    }

    #[test]
    fn network_error_falls_back_to_a_fresh_endpoint_url() {
        let outcome = Err("connection refused".to_string());
        assert_eq!(
            resolve_random_source(&outcome, "https://api/e?t=1", "https://api/e?t=2"),
            RandomResolution::Fallback("https://api/e?t=2".to_string())
        );
    }

    #[test]
    fn head_check_is_fail_open_on_network_errors_only() {
        assert!(head_allows(&Err("timeout".to_string())));
        assert!(head_allows(&Ok(Some("image/png".to_string()))));
        assert!(!head_allows(&Ok(Some("text/html".to_string()))));
        assert!(!head_allows(&Ok(None)));
    }

    #[test]
    fn decode_round_trip_and_rejection() {
        assert!(decode_image(b"definitely not an image").is_err());

        let mut png = Vec::new();
        let img = image::RgbaImage::from_pixel(2, 3, image::Rgba([10, 20, 30, 255]));
        image::DynamicImage::ImageRgba8(img)
            .write_to(
                &mut std::io::Cursor::new(&mut png),
                image::ImageFormat::Png,
            )
            .unwrap();

        let decoded = decode_image(&png).unwrap();
        assert_eq!((decoded.width, decoded.height), (2, 3));
        assert_eq!(decoded.pixels.len(), 2 * 3 * 4);
    }

    #[test]
    fn random_json_scenario_commits_both_keys() {
        let outcome = Ok(RandomFetch {
            content_type: Some("application/json".to_string()),
            body: br#"{"url":"https://x/y.jpg"}"#.to_vec(),
        });
        let resolution = resolve_random_source(&outcome, "https://api/e?t=1", "https://api/e?t=2");
        assert!(matches!(resolution, RandomResolution::JsonUrl(_)));
        let source = resolution.into_url();

        let mut prefs = Preferences::new(PrefStore::open(None));
        prefs.commit_remote_wallpaper(&source, 77);
        assert_eq!(
            prefs.style.wallpaper,
            WallpaperSource::Remote {
                url: "https://x/y.jpg?t=77".to_string()
            }
        );
        assert_eq!(prefs.stored(KEY_WALLPAPER), Some("https://x/y.jpg"));
        assert_eq!(prefs.stored(KEY_CUSTOM_WALLPAPER), Some("https://x/y.jpg"));
    }

    #[test]
    fn random_failure_scenario_commits_the_endpoint_itself() {
        let outcome = Err("dns error".to_string());
        let source =
            resolve_random_source(&outcome, "https://api/e?t=1", "https://api/e?t=2").into_url();
        assert_eq!(source, "https://api/e?t=2");

        let mut prefs = Preferences::new(PrefStore::open(None));
        prefs.commit_remote_wallpaper(&source, 77);
        assert_eq!(prefs.stored(KEY_CUSTOM_WALLPAPER), Some("https://api/e?t=2"));
        // The applied URL picks up a second token with `&`.
        assert_eq!(
            prefs.style.wallpaper,
            WallpaperSource::Remote {
                url: "https://api/e?t=2&t=77".to_string()
            }
        );
    }

    #[test]
    fn schemeless_input_is_rejected_before_any_network_work() {
        assert!(!is_valid_url("example.com/img.jpg"));
    }
}
