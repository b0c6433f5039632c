use glam::Vec2;
use serde::Deserialize;

use crate::collision::{find_landing, CollisionResolution, EnvItem};

#[derive(Debug, Clone, Copy, Default)]
pub struct ControllerInput {
    /// Horizontal intent in [-1, 1]. Ignored unless `horizontal_control` is on.
    pub move_x: f32,
    /// Jump key held this frame (level-triggered).
    pub jump_held: bool,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhysicsConfig {
    /// Upward speed applied on jump, px/s.
    pub jump_speed: f32,
    /// Downward acceleration, px/s².
    pub gravity: f32,
    pub horizontal_speed: f32,
    pub horizontal_control: bool,
    pub collision_resolution: CollisionResolution,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            jump_speed: 350.0,
            gravity: 450.0,
            horizontal_speed: 200.0,
            horizontal_control: false,
            collision_resolution: CollisionResolution::FirstMatch,
        }
    }
}

/// What happened during one `step`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// A jump was accepted; the jump sound should play once.
    pub jumped: bool,
    /// Index of the environment item the player is standing on.
    pub landed_on: Option<usize>,
}

#[derive(Debug, Clone, Copy)]
pub struct CharacterController {
    pub position: Vec2,
    /// Vertical speed, px/s. Negative is upward.
    pub speed: f32,
    pub can_jump: bool,
    pub config: PhysicsConfig,
}

impl CharacterController {
    /// New player, airborne until the first frame finds ground under it.
    pub fn new(position: Vec2, config: PhysicsConfig) -> Self {
        Self {
            position,
            speed: 0.0,
            can_jump: false,
            config,
        }
    }

    /// Spawn point on a `width × height` screen.
    pub fn spawn_point(screen_width: u32, screen_height: u32) -> Vec2 {
        Vec2::new((screen_width / 3) as f32, screen_height as f32 / 1.5)
    }

    pub fn step(&mut self, input: ControllerInput, env_items: &[EnvItem], dt: f32) -> StepOutcome {
        let mut outcome = StepOutcome::default();

        if self.config.horizontal_control {
            let move_x = input.move_x.clamp(-1.0, 1.0);
            self.position.x += move_x * self.config.horizontal_speed * dt;
        }

        if input.jump_held && self.can_jump {
            self.speed = -self.config.jump_speed;
            self.can_jump = false;
            outcome.jumped = true;
        }

        let landing = find_landing(
            env_items,
            self.position.x,
            self.position.y,
            self.speed * dt,
            self.config.collision_resolution,
        );

        match landing {
            Some(index) => {
                self.speed = 0.0;
                self.position.y = env_items[index].rect.y;
                self.can_jump = true;
                outcome.landed_on = Some(index);
            }
            None => {
                // Explicit Euler: position uses the speed from before this frame's gravity.
                self.position.y += self.speed * dt;
                self.speed += self.config.gravity * dt;
                self.can_jump = false;
            }
        }

        outcome
    }
}
