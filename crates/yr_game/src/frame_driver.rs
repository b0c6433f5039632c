//! Per-frame orchestration of everything that is not drawing.
//!
//! `FrameDriver::step` runs exactly once per rendered frame. It decides what
//! should happen (music seek, new sprite frame, jump sound) and advances the
//! player, but performs no I/O itself: the caller applies the returned
//! `FrameReport` to the audio device and the GPU texture.

use yr_core::animation::FrameAnimation;

use crate::collision::EnvItem;
use crate::controller::{CharacterController, ControllerInput};

/// Forced loop point for a music track: once playback reaches
/// `threshold_secs`, jump back to `restart_secs`. Used instead of the
/// track's natural end so a silent intro is skipped on every repeat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MusicLoop {
    pub threshold_secs: f32,
    pub restart_secs: f32,
}

impl MusicLoop {
    pub fn seek_target(&self, time_played_secs: f32) -> Option<f32> {
        (time_played_secs >= self.threshold_secs).then_some(self.restart_secs)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    /// Seconds since the previous frame.
    pub delta: f32,
    pub controls: ControllerInput,
    /// Current music position, `None` when no music is playing.
    pub music_time_played: Option<f32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameReport {
    pub music_seek: Option<f32>,
    /// New animation frame to upload to the sprite texture.
    pub animation_frame: Option<usize>,
    pub jump_cue: bool,
}

pub struct FrameDriver {
    pub animation: FrameAnimation,
    pub music_loop: MusicLoop,
}

impl FrameDriver {
    pub fn new(animation: FrameAnimation, music_loop: MusicLoop) -> Self {
        Self {
            animation,
            music_loop,
        }
    }

    pub fn step(
        &mut self,
        frame: FrameInput,
        player: &mut CharacterController,
        env_items: &[EnvItem],
    ) -> FrameReport {
        let music_seek = frame
            .music_time_played
            .and_then(|played| self.music_loop.seek_target(played));

        let animation_frame = self.animation.tick();

        let outcome = player.step(frame.controls, env_items, frame.delta);

        FrameReport {
            music_seek,
            animation_frame,
            jump_cue: outcome.jumped,
        }
    }

    pub fn current_frame(&self) -> usize {
        self.animation.current_frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::default_level;
    use crate::controller::PhysicsConfig;

    const DT: f32 = 1.0 / 60.0;

    fn driver() -> FrameDriver {
        FrameDriver::new(
            FrameAnimation::new(4, 8),
            MusicLoop {
                threshold_secs: 39.0,
                restart_secs: 0.69,
            },
        )
    }

    fn player_on_floor() -> CharacterController {
        CharacterController::new(
            CharacterController::spawn_point(640, 480),
            PhysicsConfig::default(),
        )
    }

    fn frame(jump_held: bool, music: Option<f32>) -> FrameInput {
        FrameInput {
            delta: DT,
            controls: ControllerInput {
                move_x: 0.0,
                jump_held,
            },
            music_time_played: music,
        }
    }

    #[test]
    fn music_loop_seeks_at_threshold() {
        let music_loop = MusicLoop {
            threshold_secs: 39.0,
            restart_secs: 0.69,
        };
        assert_eq!(music_loop.seek_target(38.99), None);
        assert_eq!(music_loop.seek_target(39.0), Some(0.69));
        assert_eq!(music_loop.seek_target(120.0), Some(0.69));
    }

    #[test]
    fn step_reports_seek_only_past_threshold() {
        let mut driver = driver();
        let mut player = player_on_floor();
        let level = default_level(480);

        let report = driver.step(frame(false, Some(10.0)), &mut player, &level);
        assert_eq!(report.music_seek, None);
        let report = driver.step(frame(false, Some(39.2)), &mut player, &level);
        assert_eq!(report.music_seek, Some(0.69));
        let report = driver.step(frame(false, None), &mut player, &level);
        assert_eq!(report.music_seek, None);
    }

    #[test]
    fn animation_frame_reported_every_delay() {
        let mut driver = driver();
        let mut player = player_on_floor();
        let level = default_level(480);

        let mut advanced = Vec::new();
        for i in 0..40 {
            let report = driver.step(frame(false, None), &mut player, &level);
            if let Some(index) = report.animation_frame {
                advanced.push((i, index));
            }
        }
        assert_eq!(advanced, vec![(7, 1), (15, 2), (23, 3), (31, 0), (39, 1)]);
        assert!(driver.current_frame() < 4);
    }

    #[test]
    fn jump_cue_follows_player_outcome() {
        let mut driver = driver();
        let mut player = player_on_floor();
        let level = default_level(480);

        // First frame lands on the floor; jump is not yet allowed.
        let report = driver.step(frame(true, None), &mut player, &level);
        assert!(!report.jump_cue);
        assert!(player.can_jump);

        let report = driver.step(frame(true, None), &mut player, &level);
        assert!(report.jump_cue);
        assert!(!player.can_jump);

        let report = driver.step(frame(true, None), &mut player, &level);
        assert!(!report.jump_cue);
    }
}
