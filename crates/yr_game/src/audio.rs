//! Music stream and sound effects (rodio).
//!
//! Encoded audio is read into memory once at startup and decoded on demand:
//! the music track whenever it (re)starts, the jump sound on every jump.
//! rodio mixes on its own device thread; everything here is called from the
//! main loop only.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};

use crate::config::AudioConfig;

pub struct AudioManager {
    stream: OutputStream,
    music_sink: Sink,
    music: Option<Arc<[u8]>>,
    jump_sound: Option<Arc<[u8]>>,
    sound_volume: f32,
    music_playing: bool,
}

impl AudioManager {
    /// Open the default output device and read the configured clips. Returns
    /// `None` when there is no usable device; missing clips only disable
    /// themselves.
    pub fn new(config: &AudioConfig) -> Option<Self> {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => stream,
            Err(err) => {
                log::warn!("Audio output device is unavailable ({err}); running silent");
                return None;
            }
        };
        let music_sink = Sink::connect_new(stream.mixer());
        music_sink.set_volume(config.music_volume.clamp(0.0, 1.0));

        Some(Self {
            stream,
            music_sink,
            music: load_clip_or_warn(Path::new(&config.music_path)),
            jump_sound: load_clip_or_warn(Path::new(&config.jump_sound_path)),
            sound_volume: config.sound_volume.clamp(0.0, 1.0),
            music_playing: false,
        })
    }

    pub fn play_music(&mut self) {
        if self.music.is_none() {
            return;
        }
        self.music_playing = true;
        self.music_sink.play();
        self.queue_music();
    }

    pub fn stop_music(&mut self) {
        self.music_playing = false;
        self.music_sink.stop();
    }

    /// Keep the stream going: when the track has drained, queue it again
    /// from the start.
    pub fn update_music(&mut self) {
        if self.music_playing && self.music_sink.empty() {
            log::debug!("Music track ended, restarting");
            self.queue_music();
        }
    }

    /// Playback position of the current track, `None` while no music plays.
    pub fn music_time_played(&self) -> Option<f32> {
        if !self.music_playing || self.music_sink.empty() {
            return None;
        }
        Some(self.music_sink.get_pos().as_secs_f32())
    }

    pub fn seek_music(&mut self, secs: f32) {
        if let Err(err) = self.music_sink.try_seek(Duration::from_secs_f32(secs.max(0.0))) {
            // Some decoders cannot seek; restarting keeps the loop going.
            log::warn!("Music seek to {:.2}s failed ({err}); restarting track", secs);
            self.music_sink.clear();
            self.queue_music();
            self.music_sink.play();
        }
    }

    pub fn play_jump(&self) {
        let Some(bytes) = &self.jump_sound else {
            return;
        };
        match Decoder::new(Cursor::new(bytes.clone())) {
            Ok(source) => {
                let sink = Sink::connect_new(self.stream.mixer());
                sink.set_volume(self.sound_volume);
                sink.append(source);
                sink.detach();
            }
            Err(err) => log::warn!("Failed to decode jump sound: {err}"),
        }
    }

    fn queue_music(&mut self) {
        let Some(bytes) = &self.music else {
            return;
        };
        match Decoder::new(Cursor::new(bytes.clone())) {
            Ok(source) => self.music_sink.append(source),
            Err(err) => {
                log::warn!("Failed to decode music: {err}; disabling music");
                self.music = None;
                self.music_playing = false;
            }
        }
    }
}

pub fn load_clip(path: &Path) -> Result<Arc<[u8]>, String> {
    let bytes =
        std::fs::read(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    if bytes.is_empty() {
        return Err(format!("Audio file {} is empty", path.display()));
    }
    Ok(Arc::from(bytes))
}

fn load_clip_or_warn(path: &Path) -> Option<Arc<[u8]>> {
    match load_clip(path) {
        Ok(bytes) => Some(bytes),
        Err(err) => {
            log::warn!("{err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "yr_audio_test_{}_{}_{}.mp3",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn load_clip_reads_bytes() {
        let path = temp_file_path("bytes");
        fs::write(&path, [1u8, 2, 3]).expect("write temp file");
        let clip = load_clip(&path).expect("clip should load");
        assert_eq!(&clip[..], &[1, 2, 3]);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_clip_rejects_missing_file() {
        let path = temp_file_path("missing");
        let err = load_clip(&path).expect_err("missing file should fail");
        assert!(err.contains("Failed to read"));
    }

    #[test]
    fn load_clip_rejects_empty_file() {
        let path = temp_file_path("empty");
        fs::write(&path, []).expect("write temp file");
        let err = load_clip(&path).expect_err("empty file should fail");
        assert!(err.contains("empty"));
        let _ = fs::remove_file(path);
    }
}
