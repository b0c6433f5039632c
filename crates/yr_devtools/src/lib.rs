pub mod hud;

pub use hud::{caption_layout, fps_color, HudCaption, HudOverlay, OverlayStats};
