//! Fixed-resolution 2D camera.
//!
//! The game is authored against a virtual screen (640×480 by default) with
//! the origin in the top-left corner and y growing downward. Whatever the
//! window size, that virtual screen is scaled uniformly to fit and centered,
//! leaving bars on the longer axis.

use glam::{Mat4, Vec2};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

pub struct ScreenCamera {
    pub game_size: (u32, u32),
}

impl ScreenCamera {
    pub fn new(game_width: u32, game_height: u32) -> Self {
        Self {
            game_size: (game_width, game_height),
        }
    }

    pub fn build_uniform(&self) -> CameraUniform {
        let proj = Mat4::orthographic_rh(
            0.0,
            self.game_size.0 as f32,
            self.game_size.1 as f32,
            0.0,
            -1.0,
            1.0,
        );

        CameraUniform {
            view_proj: proj.to_cols_array_2d(),
        }
    }
}

/// Region of the window, in physical pixels, that shows the virtual screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub scale: f32,
}

impl Viewport {
    /// Map a point on the virtual screen to window pixels.
    pub fn to_window(&self, game_point: Vec2) -> Vec2 {
        Vec2::new(
            self.x + game_point.x * self.scale,
            self.y + game_point.y * self.scale,
        )
    }
}

pub fn letterbox_viewport(window_size: (u32, u32), game_size: (u32, u32)) -> Viewport {
    let (win_w, win_h) = (window_size.0 as f32, window_size.1 as f32);
    let (game_w, game_h) = (game_size.0.max(1) as f32, game_size.1.max(1) as f32);
    let scale = (win_w / game_w).min(win_h / game_h);
    let width = game_w * scale;
    let height = game_h * scale;
    Viewport {
        x: (win_w - width) * 0.5,
        y: (win_h - height) * 0.5,
        width,
        height,
        scale,
    }
}
