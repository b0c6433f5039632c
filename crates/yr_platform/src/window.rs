use std::path::Path;
use std::sync::Arc;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Icon, Window, WindowAttributes};

pub struct PlatformConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub min_width: u32,
    pub min_height: u32,
    pub resizable: bool,
    pub icon: Option<Icon>,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            title: "Yobby Run".to_string(),
            width: 640,
            height: 480,
            min_width: 320,
            min_height: 240,
            resizable: true,
            icon: None,
        }
    }
}

pub fn create_window(event_loop: &ActiveEventLoop, config: &PlatformConfig) -> Arc<Window> {
    let attrs = WindowAttributes::default()
        .with_title(&config.title)
        .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height))
        .with_min_inner_size(winit::dpi::LogicalSize::new(
            config.min_width,
            config.min_height,
        ))
        .with_resizable(config.resizable)
        .with_window_icon(config.icon.clone());

    let window = event_loop
        .create_window(attrs)
        .expect("Failed to create window");
    Arc::new(window)
}

/// Decode any image the `image` crate understands (ico, png) into a window icon.
pub fn load_window_icon(path: &Path) -> Result<Icon, String> {
    let image = image::open(path)
        .map_err(|e| format!("Failed to read icon {}: {e}", path.display()))?
        .into_rgba8();
    let (width, height) = image.dimensions();
    Icon::from_rgba(image.into_raw(), width, height)
        .map_err(|e| format!("Invalid icon {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_game_screen() {
        let config = PlatformConfig::default();
        assert_eq!((config.width, config.height), (640, 480));
        assert_eq!((config.min_width, config.min_height), (320, 240));
        assert!(config.resizable);
    }

    #[test]
    fn missing_icon_reports_path() {
        let err = load_window_icon(Path::new("definitely/not/here.ico"))
            .expect_err("missing file should fail");
        assert!(err.contains("definitely/not/here.ico"));
    }
}
