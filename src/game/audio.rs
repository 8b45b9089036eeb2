//! Audio cues.
//!
//! The frame loop only knows about [`AudioSink`]. The kira-backed
//! implementation is compiled with the `audio` feature; without it, or when no
//! output device can be opened, the game runs silently.

/// Receives the cues the game emits.
pub trait AudioSink {
    /// A move was rejected by a wall.
    fn play_collision(&mut self);
}

#[cfg(feature = "audio")]
pub use kira_sink::KiraAudioSink;

#[cfg(feature = "audio")]
mod kira_sink {
    use std::error::Error;
    use std::path::Path;

    use kira::sound::static_sound::StaticSoundData;
    use kira::{AudioManager, AudioManagerSettings, DefaultBackend};
    use tracing::warn;

    use super::AudioSink;

    /// Plays cues through the default output device.
    pub struct KiraAudioSink {
        audio_manager: AudioManager<DefaultBackend>,
        collision_data: StaticSoundData,
    }

    impl KiraAudioSink {
        /// Opens the default device and loads the collision sound.
        ///
        /// # Arguments
        ///
        /// * `collision_sound` - Path to a wav, ogg or mp3 file
        pub fn new(collision_sound: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
            let audio_manager =
                AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())?;
            let collision_data = StaticSoundData::from_file(collision_sound)?;

            Ok(KiraAudioSink {
                audio_manager,
                collision_data,
            })
        }
    }

    impl AudioSink for KiraAudioSink {
        fn play_collision(&mut self) {
            if let Err(e) = self.audio_manager.play(self.collision_data.clone()) {
                warn!("failed to play collision sound: {e}");
            }
        }
    }
}
