//! Yobby Run -- main loop and application entry point.
//!
//! winit drives the event loop via `ApplicationHandler`. Each `RedrawRequested`
//! is one game frame with a variable timestep:
//!
//!   1. `FrameClock::begin_frame()` -- measure (and cap) the wall-clock delta
//!   2. Pump the music stream, then `FrameDriver::step()` with the delta
//!   3. Apply the frame report: music seek, sprite texture upload, jump sound
//!   4. Draw background, level and player into the letterboxed viewport, then
//!      composite the egui HUD
//!
//! The loop is paced to `target_fps` with `ControlFlow::WaitUntil`.

mod audio;
mod collision;
mod config;
mod controller;
mod frame_driver;
#[cfg(test)]
mod replay;
mod sprite;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use glam::Vec2;
use wgpu::util::DeviceExt;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use audio::AudioManager;
use collision::{default_level, EnvItem, Rect};
use config::{load_config_from_path, GameConfig, DEFAULT_CONFIG_PATH};
use controller::{CharacterController, ControllerInput};
use frame_driver::{FrameDriver, FrameInput, MusicLoop};
use yr_core::animation::{AnimationStrip, FrameAnimation};
use yr_core::input::{InputState, Key};
use yr_core::time::FrameClock;
use yr_devtools::{HudCaption, HudOverlay, OverlayStats};
use yr_platform::window::{load_window_icon, PlatformConfig};
use yr_render::{
    letterbox_viewport, rgba8_to_linear, GpuContext, Quad, ScreenCamera, SpritePipeline,
    SpriteVertex, Texture,
};

/// Off-white behind the level.
const BACKGROUND_COLOR: [u8; 4] = [245, 245, 245, 255];
const CAPTION_COLOR: [u8; 3] = [130, 130, 130];
const CAPTION_SIZE: f32 = 10.0;
const CAPTION_OFFSET: Vec2 = Vec2::new(220.0, 20.0);
const WHITE_PIXEL: [u8; 4] = [255, 255, 255, 255];

struct GpuSpriteTexture {
    texture: Texture,
    bind_group: wgpu::BindGroup,
}

impl GpuSpriteTexture {
    fn new(
        gpu: &GpuContext,
        pipeline: &SpritePipeline,
        rgba: &[u8],
        size: (u32, u32),
        label: &str,
    ) -> Self {
        let texture = Texture::from_rgba8(&gpu.device, &gpu.queue, rgba, size.0, size.1, label);
        let bind_group = pipeline.create_texture_bind_group(&gpu.device, &texture);
        Self {
            texture,
            bind_group,
        }
    }
}

/// All mutable game state. Constructed lazily in `ApplicationHandler::resumed`
/// once the window and GPU surface are available.
struct GameState {
    window: Arc<Window>,
    gpu: GpuContext,
    clock: FrameClock,
    input: InputState,
    camera: ScreenCamera,
    sprite_pipeline: SpritePipeline,
    hud: HudOverlay,
    captions: Vec<HudCaption>,

    env_items: Vec<EnvItem>,
    player: CharacterController,
    driver: FrameDriver,
    strip: AnimationStrip,
    audio: Option<AudioManager>,

    // Quads are laid out as background, level, player. Only the player quad
    // moves, but the whole mesh is rewritten each frame; it is a handful of
    // vertices.
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    camera_bind_group: wgpu::BindGroup,
    white_texture: GpuSpriteTexture,
    player_texture: GpuSpriteTexture,
}

impl GameState {
    fn new(window: Arc<Window>, config: &GameConfig) -> Self {
        let gpu = GpuContext::new(window.clone(), config.vsync);
        let input = InputState::new();
        let sprite_pipeline = SpritePipeline::new(&gpu.device, gpu.surface_format);
        let hud = HudOverlay::new(&gpu.device, gpu.surface_format, &window);

        let (game_w, game_h) = (config.screen.width, config.screen.height);
        let camera = ScreenCamera::new(game_w, game_h);
        let camera_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform Buffer"),
                contents: bytemuck::cast_slice(&[camera.build_uniform()]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group =
            sprite_pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);

        let env_items = default_level(game_h);
        let player = CharacterController::new(
            CharacterController::spawn_point(game_w, game_h),
            config.physics,
        );

        let strip = sprite::load_sprite_or_placeholder(Path::new(&config.animation.sprite_path));
        log::info!(
            "Player sprite: {}x{}, {} frame(s)",
            strip.width,
            strip.height,
            strip.frame_count
        );
        let driver = FrameDriver::new(
            FrameAnimation::new(strip.frame_count, config.animation.frame_delay),
            MusicLoop {
                threshold_secs: config.audio.loop_threshold_secs,
                restart_secs: config.audio.loop_restart_secs,
            },
        );

        let white_texture = GpuSpriteTexture::new(
            &gpu,
            &sprite_pipeline,
            &WHITE_PIXEL,
            (1, 1),
            "White Texture",
        );
        let player_texture = GpuSpriteTexture::new(
            &gpu,
            &sprite_pipeline,
            strip.frame_pixels(0),
            (strip.width, strip.height),
            "Player Texture",
        );

        let quad_count = env_items.len() + 2;
        let vertex_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scene Vertex Buffer"),
            size: (quad_count * 4 * std::mem::size_of::<SpriteVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let indices: Vec<u32> = (0..quad_count as u32)
            .flat_map(|i| Quad::indices(i * 4))
            .collect();
        let index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Scene Index Buffer"),
                contents: bytemuck::cast_slice(&indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        let mut audio = AudioManager::new(&config.audio);
        if let Some(audio) = audio.as_mut() {
            audio.play_music();
        }

        let captions = vec![HudCaption {
            text: config.caption.clone(),
            position: caption_position((game_w, game_h)),
            size: CAPTION_SIZE,
            color: CAPTION_COLOR,
        }];

        // Created last so the first frame does not measure startup time.
        let clock = FrameClock::new(config.target_fps, config.max_frame_dt);

        Self {
            window,
            gpu,
            clock,
            input,
            camera,
            sprite_pipeline,
            hud,
            captions,
            env_items,
            player,
            driver,
            strip,
            audio,
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            camera_bind_group,
            white_texture,
            player_texture,
        }
    }

    /// Advance the game by one frame and apply what the driver reported.
    fn update(&mut self) {
        self.clock.begin_frame();

        let music_time_played = match self.audio.as_mut() {
            Some(audio) => {
                audio.update_music();
                audio.music_time_played()
            }
            None => None,
        };

        let frame = FrameInput {
            delta: self.clock.frame_dt(),
            controls: ControllerInput {
                move_x: self.input.axis_x(),
                jump_held: self.input.is_held(Key::Space),
            },
            music_time_played,
        };
        let report = self
            .driver
            .step(frame, &mut self.player, &self.env_items);

        if let Some(index) = report.animation_frame {
            self.player_texture
                .texture
                .update_rgba8(&self.gpu.queue, self.strip.frame_pixels(index));
        }
        if let Some(audio) = self.audio.as_mut() {
            if let Some(restart) = report.music_seek {
                audio.seek_music(restart);
            }
            if report.jump_cue {
                audio.play_jump();
            }
        }
    }

    fn overlay_stats(&self) -> OverlayStats {
        OverlayStats {
            player_position: (self.player.position.x, self.player.position.y),
            player_speed: self.player.speed,
            can_jump: self.player.can_jump,
            animation_frame: self.driver.current_frame(),
            animation_frame_count: self.strip.frame_count,
            music_time_played: self
                .audio
                .as_ref()
                .and_then(AudioManager::music_time_played),
        }
    }

    fn render(&mut self) {
        let quads = scene_quads(
            self.camera.game_size,
            &self.env_items,
            self.player.position,
            (self.strip.width, self.strip.height),
        );
        let vertices: Vec<SpriteVertex> = quads.iter().flat_map(Quad::vertices).collect();
        self.gpu
            .queue
            .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));

        let Some((output, view)) = self.gpu.begin_frame() else {
            return;
        };

        let viewport = letterbox_viewport(self.gpu.size, self.camera.game_size);
        let stats = self.overlay_stats();
        let (egui_primitives, egui_textures_delta) =
            self.hud
                .prepare(&self.window, &self.clock, &viewport, &self.captions, &stats);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.gpu.size.0, self.gpu.size.1],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            // Cleared to black: only the letterbox bars stay this color.
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            render_pass.set_viewport(
                viewport.x,
                viewport.y,
                viewport.width,
                viewport.height,
                0.0,
                1.0,
            );
            render_pass.set_pipeline(&self.sprite_pipeline.render_pipeline);
            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

            // Everything but the last quad is a flat color.
            let player_start = self.index_count - 6;
            render_pass.set_bind_group(1, &self.white_texture.bind_group, &[]);
            render_pass.draw_indexed(0..player_start, 0, 0..1);
            render_pass.set_bind_group(1, &self.player_texture.bind_group, &[]);
            render_pass.draw_indexed(player_start..self.index_count, 0, 0..1);
        }

        self.hud.upload(
            &self.gpu.device,
            &self.gpu.queue,
            &mut encoder,
            &egui_primitives,
            &egui_textures_delta,
            &screen_descriptor,
        );

        {
            let mut egui_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();

            self.hud
                .paint(&mut egui_pass, &egui_primitives, &screen_descriptor);
        }

        self.hud.cleanup(&egui_textures_delta);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

/// Background, level rectangles and the player sprite, in draw order. The
/// sprite is centered on the player's position.
fn scene_quads(
    game_size: (u32, u32),
    env_items: &[EnvItem],
    player_position: Vec2,
    sprite_size: (u32, u32),
) -> Vec<Quad> {
    let mut quads = Vec::with_capacity(env_items.len() + 2);
    quads.push(rect_quad(
        &Rect {
            x: 0.0,
            y: 0.0,
            width: game_size.0 as f32,
            height: game_size.1 as f32,
        },
        BACKGROUND_COLOR,
    ));
    quads.extend(env_items.iter().map(|item| rect_quad(&item.rect, item.color)));

    let (w, h) = (sprite_size.0 as f32, sprite_size.1 as f32);
    quads.push(Quad {
        x: player_position.x - w / 2.0,
        y: player_position.y - h / 2.0,
        width: w,
        height: h,
        color: [1.0, 1.0, 1.0, 1.0],
    });
    quads
}

fn rect_quad(rect: &Rect, color: [u8; 4]) -> Quad {
    Quad {
        x: rect.x,
        y: rect.y,
        width: rect.width,
        height: rect.height,
        color: rgba8_to_linear(color),
    }
}

fn caption_position(game_size: (u32, u32)) -> Vec2 {
    Vec2::new(game_size.0 as f32, game_size.1 as f32) - CAPTION_OFFSET
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::Space => Some(Key::Space),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::F3 => Some(Key::F3),
        _ => None,
    }
}

struct App {
    config: GameConfig,
    state: Option<GameState>,
}

impl App {
    fn new(config: GameConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }

    fn platform_config(&self) -> PlatformConfig {
        let icon = match load_window_icon(Path::new(&self.config.icon_path)) {
            Ok(icon) => Some(icon),
            Err(err) => {
                log::warn!("{err}; using the default window icon");
                None
            }
        };
        PlatformConfig {
            title: self.config.title.clone(),
            width: self.config.screen.width,
            height: self.config.screen.height,
            min_width: self.config.screen.min_width,
            min_height: self.config.screen.min_height,
            resizable: true,
            icon,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let platform = self.platform_config();
        let window = yr_platform::window::create_window(event_loop, &platform);
        log::info!("Window created: {}x{}", platform.width, platform.height);
        self.state = Some(GameState::new(window, &self.config));
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(state) = &self.state else {
            return;
        };
        match state.clock.next_frame_deadline() {
            Some(deadline) if Instant::now() < deadline => {
                event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
            }
            _ => {
                event_loop.set_control_flow(ControlFlow::Poll);
                state.window.request_redraw();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        let egui_consumed = state.hud.handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    state.gpu.resize(w, h);
                    log::debug!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::Focused(false) => {
                // Key-up events are lost while unfocused.
                state.input.release_all();
            }

            WindowEvent::KeyboardInput { event, .. } if !egui_consumed => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(game_key) = map_key(key_code) {
                        match event.state {
                            ElementState::Pressed => state.input.key_down(game_key),
                            ElementState::Released => state.input.key_up(game_key),
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if state.gpu.size.0 == 0 || state.gpu.size.1 == 0 {
                    return;
                }
                if state.input.is_just_pressed(Key::Escape) {
                    event_loop.exit();
                    return;
                }
                if state.input.is_just_pressed(Key::F3) {
                    state.hud.toggle_debug();
                }

                state.update();
                state.render();
                state.input.end_frame();
            }

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = self.state.as_mut() {
            if let Some(audio) = state.audio.as_mut() {
                audio.stop_music();
            }
            log::info!(
                "Shutting down after {} frames ({:.1}s)",
                state.clock.frame_count,
                state.clock.total_time
            );
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = match load_config_from_path(&config_path) {
        Ok(config) => config,
        Err(err) => {
            log::error!("{err}");
            std::process::exit(1);
        }
    };

    log::info!("{} starting...", config.title);

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app).expect("Event loop error");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_quads_draw_background_level_then_player() {
        let level = default_level(480);
        let quads = scene_quads((640, 480), &level, Vec2::new(213.0, 320.0), (32, 48));

        assert_eq!(quads.len(), 3);
        assert_eq!((quads[0].width, quads[0].height), (640.0, 480.0));
        assert_eq!(quads[1].y, level[0].rect.y);
        assert_eq!(quads[1].width, 1000.0);
        assert_eq!(quads[2].color, [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn player_sprite_is_centered_on_position() {
        let quads = scene_quads((640, 480), &[], Vec2::new(100.0, 200.0), (32, 48));
        let sprite = quads.last().expect("player quad");
        assert_eq!((sprite.x, sprite.y), (84.0, 176.0));
        assert_eq!((sprite.width, sprite.height), (32.0, 48.0));
    }

    #[test]
    fn caption_sits_near_bottom_right() {
        assert_eq!(caption_position((640, 480)), Vec2::new(420.0, 460.0));
    }

    #[test]
    fn only_game_keys_are_mapped() {
        assert_eq!(map_key(KeyCode::Space), Some(Key::Space));
        assert_eq!(map_key(KeyCode::F3), Some(Key::F3));
        assert_eq!(map_key(KeyCode::KeyW), None);
    }
}
