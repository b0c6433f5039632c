pub mod camera;
pub mod gpu_context;
pub mod sprite_pipeline;
pub mod texture;
pub mod vertex;

pub use camera::{letterbox_viewport, CameraUniform, ScreenCamera, Viewport};
pub use gpu_context::GpuContext;
pub use sprite_pipeline::SpritePipeline;
pub use texture::Texture;
pub use vertex::{rgba8_to_linear, Quad, SpriteVertex};
