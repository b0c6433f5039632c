//! Loading the player's animated sprite into an `AnimationStrip`.
//!
//! GIF files are decoded frame by frame; the decoder composes each frame onto
//! the full canvas, so every frame has the same size and the strip can be
//! indexed by plain offset arithmetic. Any other image format loads as a
//! single-frame strip.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::codecs::gif::GifDecoder;
use image::AnimationDecoder;
use yr_core::animation::AnimationStrip;

const PLACEHOLDER_SIZE: u32 = 32;
const PLACEHOLDER_COLOR: [u8; 4] = [255, 64, 64, 255];

pub fn load_sprite_strip(path: &Path) -> Result<AnimationStrip, String> {
    let is_gif = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gif"));
    if is_gif {
        load_gif_strip(path)
    } else {
        let image = image::open(path)
            .map_err(|e| format!("Failed to read sprite {}: {e}", path.display()))?
            .into_rgba8();
        let (width, height) = image.dimensions();
        AnimationStrip::from_frames(width, height, vec![image.into_raw()])
            .map_err(|e| format!("Invalid sprite {}: {e}", path.display()))
    }
}

pub fn load_gif_strip(path: &Path) -> Result<AnimationStrip, String> {
    let file =
        File::open(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let decoder = GifDecoder::new(BufReader::new(file))
        .map_err(|e| format!("Failed to decode GIF {}: {e}", path.display()))?;
    let frames = decoder
        .into_frames()
        .collect_frames()
        .map_err(|e| format!("Failed to decode GIF frames {}: {e}", path.display()))?;

    let Some(first) = frames.first() else {
        return Err(format!("GIF {} contains no frames", path.display()));
    };
    let (width, height) = first.buffer().dimensions();
    let pixels = frames
        .into_iter()
        .map(|frame| frame.into_buffer().into_raw())
        .collect();
    AnimationStrip::from_frames(width, height, pixels)
        .map_err(|e| format!("Invalid GIF {}: {e}", path.display()))
}

/// Load the sprite, or fall back to a flat placeholder so the game still runs
/// without its art.
pub fn load_sprite_or_placeholder(path: &Path) -> AnimationStrip {
    match load_sprite_strip(path) {
        Ok(strip) => {
            log::info!(
                "Sprite '{}' loaded: {} frame(s) of {}x{}",
                path.display(),
                strip.frame_count,
                strip.width,
                strip.height
            );
            strip
        }
        Err(err) => {
            log::warn!("{err}. Falling back to placeholder sprite.");
            AnimationStrip::solid(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE, PLACEHOLDER_COLOR)
        }
    }
}
