//! Counter-driven sprite animation.
//!
//! Frames advance on rendered-frame counts rather than elapsed time: after
//! `frame_delay` calls to `tick` the strip moves to the next frame, wrapping
//! back to 0 after the last one. Playback speed therefore scales with the
//! render rate, which the frame clock pins to `target_fps`.
//!
//! The pixel data for every frame lives in one contiguous RGBA8 buffer
//! (`AnimationStrip`); selecting a frame is pure offset arithmetic.

/// Bytes per pixel in an `AnimationStrip` (RGBA8).
pub const CHANNELS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameAnimation {
    pub current_frame: usize,
    pub frame_delay: u32,
    pub frame_counter: u32,
    pub frame_count: usize,
}

impl FrameAnimation {
    /// `frame_count` of 0 is treated as a single static frame.
    pub fn new(frame_count: usize, frame_delay: u32) -> Self {
        Self {
            current_frame: 0,
            frame_delay,
            frame_counter: 0,
            frame_count: frame_count.max(1),
        }
    }

    /// Count one rendered frame. Returns the new frame index when the
    /// animation advanced this call.
    pub fn tick(&mut self) -> Option<usize> {
        self.frame_counter += 1;
        if self.frame_counter < self.frame_delay {
            return None;
        }

        self.current_frame += 1;
        if self.current_frame >= self.frame_count {
            self.current_frame = 0;
        }
        self.frame_counter = 0;
        Some(self.current_frame)
    }
}

/// Byte offset of frame `index` in a strip of `width × height` RGBA8 frames.
pub fn frame_byte_offset(width: u32, height: u32, index: usize) -> usize {
    width as usize * height as usize * CHANNELS * index
}

/// Every frame of an animated image, decoded once and stored back to back.
#[derive(Debug, Clone)]
pub struct AnimationStrip {
    pub width: u32,
    pub height: u32,
    pub frame_count: usize,
    pixels: Vec<u8>,
}

impl AnimationStrip {
    pub fn from_frames(width: u32, height: u32, frames: Vec<Vec<u8>>) -> Result<Self, String> {
        if width == 0 || height == 0 {
            return Err(format!(
                "Animation strip has degenerate size {}x{}",
                width, height
            ));
        }
        if frames.is_empty() {
            return Err("Animation strip has no frames".to_string());
        }
        let frame_len = frame_byte_offset(width, height, 1);
        let mut pixels = Vec::with_capacity(frame_len * frames.len());
        for (i, frame) in frames.iter().enumerate() {
            if frame.len() != frame_len {
                return Err(format!(
                    "Animation frame {} has {} bytes, expected {}",
                    i,
                    frame.len(),
                    frame_len
                ));
            }
            pixels.extend_from_slice(frame);
        }
        Ok(Self {
            width,
            height,
            frame_count: frames.len(),
            pixels,
        })
    }

    /// Single-frame strip filled with one color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixel_count = width as usize * height as usize;
        let pixels = rgba.repeat(pixel_count);
        Self {
            width,
            height,
            frame_count: 1,
            pixels,
        }
    }

    /// RGBA8 pixels of frame `index`. Out-of-range indices wrap.
    pub fn frame_pixels(&self, index: usize) -> &[u8] {
        let index = index % self.frame_count;
        let start = frame_byte_offset(self.width, self.height, index);
        let end = frame_byte_offset(self.width, self.height, index + 1);
        &self.pixels[start..end]
    }
}
