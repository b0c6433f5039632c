//! Variable-step frame clock.
//!
//! Every rendered frame gets exactly one simulation update, fed with the
//! wall-clock time since the previous frame. The clock also paces the loop to
//! `target_fps` by handing the event loop a deadline for the next frame.

use std::time::{Duration, Instant};

const FPS_SAMPLE_COUNT: usize = 60;

pub struct FrameClock {
    pub target_fps: u32,
    pub max_frame_dt: f32,
    pub frame_count: u64,
    pub total_time: f64,
    frame_dt: f32,
    last_instant: Instant,

    fps_samples: [f32; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f32,
    pub smoothed_frame_time_ms: f32,
}

impl FrameClock {
    pub fn new(target_fps: u32, max_frame_dt: f32) -> Self {
        let nominal_dt = nominal_dt(target_fps);
        Self {
            target_fps,
            max_frame_dt,
            frame_count: 0,
            total_time: 0.0,
            frame_dt: 0.0,
            last_instant: Instant::now(),
            fps_samples: [nominal_dt; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 1.0 / nominal_dt,
            smoothed_frame_time_ms: nominal_dt * 1000.0,
        }
    }

    /// Measure the time since the previous frame and make it the current delta.
    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        let real_dt = now.duration_since(self.last_instant).as_secs_f32();
        self.last_instant = now;
        self.record_frame(real_dt);
    }

    /// Feed an explicit frame delta. `begin_frame` routes through here.
    pub fn record_frame(&mut self, real_dt: f32) {
        let mut dt = real_dt;
        // A long stall (window drag, debugger) would otherwise teleport the
        // player through the floor in a single integration step.
        if dt > self.max_frame_dt {
            log::warn!(
                "Frame took {:.1}ms, capping delta to {:.0}ms",
                dt * 1000.0,
                self.max_frame_dt * 1000.0
            );
            dt = self.max_frame_dt;
        }

        self.frame_dt = dt;
        self.total_time += dt as f64;
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f32 = self.fps_samples.iter().sum::<f32>() / FPS_SAMPLE_COUNT as f32;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
    }

    /// Seconds elapsed between the last two frames (after capping).
    pub fn frame_dt(&self) -> f32 {
        self.frame_dt
    }

    /// Instant at which the next frame should start. `None` when uncapped.
    pub fn next_frame_deadline(&self) -> Option<Instant> {
        if self.target_fps == 0 {
            return None;
        }
        Some(self.last_instant + Duration::from_secs_f32(nominal_dt(self.target_fps)))
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(60, 0.25)
    }
}

fn nominal_dt(target_fps: u32) -> f32 {
    if target_fps == 0 {
        1.0 / 60.0
    } else {
        1.0 / target_fps as f32
    }
}
