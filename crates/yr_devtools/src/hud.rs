//! In-game HUD and debug window rendered via egui on top of the game scene.
//!
//! The HUD text (FPS counter, captions) is placed in virtual-screen
//! coordinates and follows the letterbox viewport, so it scales with the game
//! exactly like the sprites do. The F3 debug window lives in window space.
//!
//! Integration pattern: egui requires a three-phase render split because
//! `egui_wgpu::Renderer::render()` needs a `RenderPass<'static>`, while
//! `begin_render_pass` borrows the encoder. The phases are:
//!
//!   1. `prepare()` -- run egui UI logic, produce tessellated primitives
//!   2. `upload()`  -- upload textures and update GPU buffers (borrows encoder mutably)
//!   3. `paint()`   -- render into a new render pass with `forget_lifetime()`
//!   4. `cleanup()` -- free textures egui no longer references

use glam::Vec2;
use winit::window::Window;
use yr_core::time::FrameClock;
use yr_render::Viewport;

/// Text drawn at a fixed spot on the virtual screen.
#[derive(Debug, Clone)]
pub struct HudCaption {
    pub text: String,
    pub position: Vec2,
    /// Font size in virtual-screen pixels.
    pub size: f32,
    pub color: [u8; 3],
}

#[derive(Debug, Clone, Default)]
pub struct OverlayStats {
    pub player_position: (f32, f32),
    pub player_speed: f32,
    pub can_jump: bool,
    pub animation_frame: usize,
    pub animation_frame_count: usize,
    /// `None` when audio is unavailable.
    pub music_time_played: Option<f32>,
}

const FPS_POSITION: Vec2 = Vec2::new(5.0, 5.0);
const FPS_FONT_SIZE: f32 = 20.0;

pub struct HudOverlay {
    pub egui_ctx: egui::Context,
    pub egui_winit_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
    pub show_fps: bool,
    pub debug_visible: bool,
}

impl HudOverlay {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        window: &Window,
    ) -> Self {
        let egui_ctx = egui::Context::default();
        let egui_winit_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self {
            egui_ctx,
            egui_winit_state,
            egui_renderer,
            show_fps: true,
            debug_visible: false,
        }
    }

    pub fn handle_window_event(
        &mut self,
        window: &Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        let response = self.egui_winit_state.on_window_event(window, event);
        response.consumed
    }

    pub fn toggle_debug(&mut self) {
        self.debug_visible = !self.debug_visible;
        log::info!(
            "Debug window: {}",
            if self.debug_visible { "ON" } else { "OFF" }
        );
    }

    pub fn prepare(
        &mut self,
        window: &Window,
        clock: &FrameClock,
        viewport: &Viewport,
        captions: &[HudCaption],
        stats: &OverlayStats,
    ) -> (Vec<egui::ClippedPrimitive>, egui::TexturesDelta) {
        let pixels_per_point = window.scale_factor() as f32;
        let raw_input = self.egui_winit_state.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            if self.show_fps {
                let fps = clock.smoothed_fps.round() as u32;
                let caption = HudCaption {
                    text: format!("{} FPS", fps),
                    position: FPS_POSITION,
                    size: FPS_FONT_SIZE,
                    color: fps_color(fps),
                };
                draw_caption(ctx, "hud_fps", &caption, viewport, pixels_per_point);
            }
            for (i, caption) in captions.iter().enumerate() {
                draw_caption(ctx, ("hud_caption", i), caption, viewport, pixels_per_point);
            }

            if self.debug_visible {
                egui::Window::new("Debug")
                    .default_pos([10.0, 40.0])
                    .show(ctx, |ui| {
                        ui.label(format!("FPS: {:.1}", clock.smoothed_fps));
                        ui.label(format!("Frame time: {:.2} ms", clock.smoothed_frame_time_ms));
                        ui.label(format!("Frame: {}", clock.frame_count));
                        ui.separator();
                        ui.label(format!(
                            "Player: ({:.1}, {:.1})",
                            stats.player_position.0, stats.player_position.1
                        ));
                        ui.label(format!("Speed: {:.2}", stats.player_speed));
                        ui.label(format!("Can jump: {}", stats.can_jump));
                        ui.separator();
                        ui.label(format!(
                            "Animation frame: {}/{}",
                            stats.animation_frame + 1,
                            stats.animation_frame_count
                        ));
                        match stats.music_time_played {
                            Some(secs) => ui.label(format!("Music: {:.2} s", secs)),
                            None => ui.label("Music: unavailable"),
                        };
                    });
            }
        });

        self.egui_winit_state
            .handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        (primitives, full_output.textures_delta)
    }

    /// Upload textures and update buffers. Call before creating the egui render pass.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        primitives: &[egui::ClippedPrimitive],
        textures_delta: &egui::TexturesDelta,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, primitives, screen_descriptor);
    }

    /// Render into an existing render pass. Call after `upload()`.
    pub fn paint(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        primitives: &[egui::ClippedPrimitive],
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.egui_renderer
            .render(render_pass, primitives, screen_descriptor);
    }

    /// Free textures that egui no longer needs. Call after rendering.
    pub fn cleanup(&mut self, textures_delta: &egui::TexturesDelta) {
        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

fn draw_caption(
    ctx: &egui::Context,
    id: impl std::hash::Hash,
    caption: &HudCaption,
    viewport: &Viewport,
    pixels_per_point: f32,
) {
    let (pos, size) = caption_layout(caption, viewport, pixels_per_point);
    let [r, g, b] = caption.color;
    egui::Area::new(egui::Id::new(id))
        .fixed_pos(egui::pos2(pos.x, pos.y))
        .order(egui::Order::Foreground)
        .interactable(false)
        .show(ctx, |ui| {
            ui.label(
                egui::RichText::new(&caption.text)
                    .size(size)
                    .color(egui::Color32::from_rgb(r, g, b)),
            );
        });
}

/// Window position (egui points) and font size for a virtual-screen caption.
pub fn caption_layout(
    caption: &HudCaption,
    viewport: &Viewport,
    pixels_per_point: f32,
) -> (Vec2, f32) {
    let ppp = if pixels_per_point > 0.0 { pixels_per_point } else { 1.0 };
    let window_px = viewport.to_window(caption.position);
    (window_px / ppp, caption.size * viewport.scale / ppp)
}

/// Green when smooth, orange below 30, red below 15.
pub fn fps_color(fps: u32) -> [u8; 3] {
    if fps < 15 {
        [230, 41, 55]
    } else if fps < 30 {
        [255, 161, 0]
    } else {
        [0, 158, 47]
    }
}
