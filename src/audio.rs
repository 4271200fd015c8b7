use macroquad::audio::{load_sound, play_sound, PlaySoundParams, Sound};

/// Interaction sounds. Playing a sound restarts it from the beginning, so
/// rapid clicks behave like the original rewind-then-play. A sound that
/// failed to load downgrades every play to a logged no-op.
pub struct SoundEffects {
    click: Option<Sound>,
    reject: Option<Sound>,
    volume: f32,
}

impl SoundEffects {
    pub async fn load(volume: f32) -> Self {
        async fn load_one(path: &str) -> Option<Sound> {
            match load_sound(path).await {
                Ok(sound) => Some(sound),
                Err(_) => {
                    println!("[Warn] Could not load '{}', that sound will be silent.", path);
                    None
                }
            }
        }

        let (click, reject) = futures::join!(
            load_one("assets/click.wav"),
            load_one("assets/reject.wav")
        );

        SoundEffects {
            click,
            reject,
            volume,
        }
    }

    pub fn play_click(&self) {
        self.play(&self.click);
    }

    pub fn play_reject(&self) {
        self.play(&self.reject);
    }

    fn play(&self, sound: &Option<Sound>) {
        match sound {
            Some(sound) => play_sound(
                sound,
                PlaySoundParams {
                    looped: false,
                    volume: self.volume,
                },
            ),
            None => println!("[Info] Sound playback skipped: effect unavailable."),
        }
    }
}
