use crate::controller::ControllerInput;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    #[serde(default = "default_dt")]
    pub fixed_dt: f32,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub move_x: f32,
    #[serde(default)]
    pub jump_held: bool,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ReplaySequence {
    pub fn expanded_inputs(&self) -> Vec<ControllerInput> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for _ in 0..frame.repeat.max(1) {
                out.push(ControllerInput {
                    move_x: frame.move_x.clamp(-1.0, 1.0),
                    jump_held: frame.jump_held,
                });
            }
        }
        out
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    parse_replay(&raw).map_err(|e| format!("Failed to load replay {}: {e}", path.display()))
}

pub fn parse_replay(raw: &str) -> Result<ReplaySequence, String> {
    let replay: ReplaySequence =
        serde_json::from_str(raw).map_err(|e| format!("invalid JSON: {e}"))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if replay.fixed_dt <= 0.0 {
        return Err("Replay validation failed: fixed_dt must be > 0".to_string());
    }
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(())
}

const fn default_dt() -> f32 {
    1.0 / 60.0
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::default_level;
    use crate::controller::{CharacterController, PhysicsConfig};
    use crate::frame_driver::{FrameDriver, FrameInput, MusicLoop};
    use yr_core::animation::FrameAnimation;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "yr_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    const HOP: &str = r#"{
      "fixed_dt": 0.016666667,
      "frames": [
        { "repeat": 30 },
        { "jump_held": true, "repeat": 1 },
        { "repeat": 180 }
      ]
    }"#;

    fn spawn_player() -> CharacterController {
        CharacterController::new(
            CharacterController::spawn_point(640, 480),
            PhysicsConfig::default(),
        )
    }

    #[test]
    fn replay_file_parses_and_expands() {
        let path = temp_file_path("parse");
        fs::write(
            &path,
            r#"{
              "frames": [
                { "move_x": 3.0, "repeat": 3 },
                { "jump_held": true, "repeat": 0 }
              ]
            }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        assert!((replay.fixed_dt - 1.0 / 60.0).abs() < 1e-7);
        let expanded = replay.expanded_inputs();
        assert_eq!(expanded.len(), 4);
        assert_eq!(expanded[0].move_x, 1.0);
        assert!(expanded[3].jump_held);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn empty_replay_is_rejected() {
        let err = parse_replay(r#"{ "frames": [] }"#).expect_err("empty replay should fail");
        assert!(err.contains("frames list is empty"));
    }

    #[test]
    fn replay_run_is_deterministic() {
        let replay = parse_replay(HOP).expect("replay should parse");
        let inputs = replay.expanded_inputs();
        let level = default_level(480);

        let mut run_a = spawn_player();
        let mut run_b = spawn_player();
        for input in &inputs {
            run_a.step(*input, &level, replay.fixed_dt);
        }
        for input in &inputs {
            run_b.step(*input, &level, replay.fixed_dt);
        }

        assert_eq!(run_a.position, run_b.position);
        assert_eq!(run_a.speed, run_b.speed);
        assert_eq!(run_a.can_jump, run_b.can_jump);
    }

    #[test]
    fn hop_from_floor_lands_back_on_floor() {
        let replay = parse_replay(HOP).expect("replay should parse");
        let level = default_level(480);
        let floor_y = level[0].rect.y;
        let mut player = spawn_player();

        let mut jumps = 0;
        let mut apex = f32::MAX;
        for input in replay.expanded_inputs() {
            if player.step(input, &level, replay.fixed_dt).jumped {
                jumps += 1;
            }
            apex = apex.min(player.position.y);
        }

        assert_eq!(jumps, 1);
        // v²/2g ≈ 136 px; explicit Euler overshoots by a few pixels.
        let height = floor_y - apex;
        assert!(height > 130.0 && height < 145.0, "apex height was {height}");
        assert_eq!(player.position.y, floor_y);
        assert!(player.can_jump);
    }

    #[test]
    fn driver_replay_reports_single_jump_cue() {
        let replay = parse_replay(HOP).expect("replay should parse");
        let level = default_level(480);
        let mut player = spawn_player();
        let mut driver = FrameDriver::new(
            FrameAnimation::new(4, 8),
            MusicLoop {
                threshold_secs: 39.0,
                restart_secs: 0.69,
            },
        );

        let cues = replay
            .expanded_inputs()
            .into_iter()
            .map(|controls| {
                driver.step(
                    FrameInput {
                        delta: replay.fixed_dt,
                        controls,
                        music_time_played: None,
                    },
                    &mut player,
                    &level,
                )
            })
            .filter(|report| report.jump_cue)
            .count();
        assert_eq!(cues, 1);
    }
}
