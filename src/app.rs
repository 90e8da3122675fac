//! Host driver: owns the frame clock and calls a [`Scene`] through its
//! init/update/render lifecycle.

use std::collections::BTreeMap;

use anyhow::{anyhow, bail, Context, Result};
use log::info;

use crate::render::GraphicsContext;

/// Per-application behaviour plugged into [`App`].
pub trait Scene {
    /// Called exactly once before the first frame.
    fn init(&mut self, gfx: &mut dyn GraphicsContext) -> Result<()>;

    fn update(&mut self, time: f64, delta_time: f64, overlay: &mut dyn Overlay) -> Result<()>;

    fn render(&mut self, gfx: &mut dyn GraphicsContext, time: f64, delta_time: f64)
        -> Result<()>;
}

/// Text labels displayed over the rendered surface.
pub trait Overlay {
    fn set_label(&mut self, id: &str, text: &str) -> Result<()>;
}

/// Overlay that keeps labels in memory and logs every change.
#[derive(Debug, Default)]
pub struct LabelLog {
    labels: BTreeMap<String, String>,
    updates: usize,
}

impl LabelLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text of the label with the given id.
    pub fn label(&self, id: &str) -> Option<&str> {
        self.labels.get(id).map(String::as_str)
    }

    pub fn labels(&self) -> impl Iterator<Item = (&str, &str)> {
        self.labels
            .iter()
            .map(|(id, text)| (id.as_str(), text.as_str()))
    }

    /// Number of `set_label` calls received.
    pub fn updates(&self) -> usize {
        self.updates
    }
}

impl Overlay for LabelLog {
    fn set_label(&mut self, id: &str, text: &str) -> Result<()> {
        log::debug!("#{id} = {text}");
        self.labels.insert(id.to_string(), text.to_string());
        self.updates += 1;
        Ok(())
    }
}

/// Frame timing snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Seconds since the clock started.
    pub time: f64,
    /// Seconds since the previous tick (or since the start, on the first tick).
    pub delta_time: f64,
    pub frame_index: u64,
}

/// Turns host timestamps into [`FrameTime`] snapshots.
///
/// Timestamps are supplied by the caller (`Instant` on native,
/// `performance.now()` on the web, a fixed step when headless). Deltas are
/// neither smoothed nor clamped.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: f64,
    last: f64,
    frame_index: u64,
}

impl FrameClock {
    pub fn new(start_secs: f64) -> Self {
        Self {
            start: start_secs,
            last: start_secs,
            frame_index: 0,
        }
    }

    pub fn tick(&mut self, now_secs: f64) -> FrameTime {
        let frame = FrameTime {
            time: now_secs - self.start,
            delta_time: now_secs - self.last,
            frame_index: self.frame_index,
        };
        self.last = now_secs;
        self.frame_index = self.frame_index.wrapping_add(1);
        frame
    }
}

/// Drives a scene: init once, then tick, update, render and present per
/// frame.
#[derive(Debug)]
pub struct App<S> {
    scene: S,
    clock: Option<FrameClock>,
}

impl<S: Scene> App<S> {
    pub fn new(scene: S) -> Self {
        Self { scene, clock: None }
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn into_scene(self) -> S {
        self.scene
    }

    pub fn is_started(&self) -> bool {
        self.clock.is_some()
    }

    /// Initializes the scene and starts the clock at `now_secs`.
    pub fn start(&mut self, gfx: &mut dyn GraphicsContext, now_secs: f64) -> Result<()> {
        if self.is_started() {
            bail!("scene is already initialized");
        }
        self.scene.init(gfx).context("scene initialization failed")?;
        self.clock = Some(FrameClock::new(now_secs));
        Ok(())
    }

    /// Runs one frame at host timestamp `now_secs`.
    pub fn frame(
        &mut self,
        now_secs: f64,
        gfx: &mut dyn GraphicsContext,
        overlay: &mut dyn Overlay,
    ) -> Result<FrameTime> {
        let clock = self
            .clock
            .as_mut()
            .ok_or_else(|| anyhow!("frame requested before the scene was started"))?;
        let frame = clock.tick(now_secs);

        self.scene
            .update(frame.time, frame.delta_time, overlay)
            .with_context(|| format!("update failed on frame {}", frame.frame_index))?;
        self.scene
            .render(gfx, frame.time, frame.delta_time)
            .with_context(|| format!("render failed on frame {}", frame.frame_index))?;
        gfx.present()
            .with_context(|| format!("present failed on frame {}", frame.frame_index))?;
        Ok(frame)
    }
}

/// Starts `app` at t=0 and runs `frames` frames spaced `step` seconds apart.
pub fn run_headless<S: Scene>(
    app: &mut App<S>,
    gfx: &mut dyn GraphicsContext,
    overlay: &mut dyn Overlay,
    frames: u64,
    step: f64,
) -> Result<()> {
    app.start(gfx, 0.0)?;
    for index in 1..=frames {
        app.frame(index as f64 * step, gfx, overlay)?;
    }
    info!("ran {frames} headless frame(s) at {step}s per frame");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::HeadlessContext;

    #[derive(Default)]
    struct Recorder {
        inits: usize,
        calls: Vec<String>,
        fail_render_at: Option<f64>,
    }

    impl Scene for Recorder {
        fn init(&mut self, _gfx: &mut dyn GraphicsContext) -> Result<()> {
            self.inits += 1;
            Ok(())
        }

        fn update(&mut self, time: f64, delta_time: f64, overlay: &mut dyn Overlay) -> Result<()> {
            self.calls.push(format!("update {time:.2} {delta_time:.2}"));
            overlay.set_label("t", &format!("{time:.2}"))
        }

        fn render(
            &mut self,
            _gfx: &mut dyn GraphicsContext,
            time: f64,
            _delta_time: f64,
        ) -> Result<()> {
            if self.fail_render_at == Some(time) {
                bail!("boom");
            }
            self.calls.push(format!("render {time:.2}"));
            Ok(())
        }
    }

    #[test]
    fn clock_reports_time_since_start_and_raw_deltas() {
        let mut clock = FrameClock::new(10.0);
        let first = clock.tick(10.5);
        assert_eq!(first.time, 0.5);
        assert_eq!(first.delta_time, 0.5);
        assert_eq!(first.frame_index, 0);

        let second = clock.tick(10.5);
        assert_eq!(second.delta_time, 0.0);
        assert_eq!(second.frame_index, 1);

        let third = clock.tick(14.0);
        assert_eq!(third.time, 4.0);
        assert_eq!(third.delta_time, 3.5);
    }

    #[test]
    fn frame_runs_update_then_render_then_present() {
        let mut gfx = HeadlessContext::new();
        let mut overlay = LabelLog::new();
        let mut app = App::new(Recorder::default());
        app.start(&mut gfx, 1.0).unwrap();

        let frame = app.frame(1.5, &mut gfx, &mut overlay).unwrap();
        assert_eq!(frame.time, 0.5);
        assert_eq!(app.scene().calls, vec!["update 0.50 0.50", "render 0.50"]);
        assert_eq!(gfx.frames_presented(), 1);
        assert_eq!(overlay.label("t"), Some("0.50"));
    }

    #[test]
    fn start_runs_init_once() {
        let mut gfx = HeadlessContext::new();
        let mut app = App::new(Recorder::default());
        app.start(&mut gfx, 0.0).unwrap();
        assert!(app.start(&mut gfx, 0.0).is_err());
        assert_eq!(app.scene().inits, 1);
    }

    #[test]
    fn frame_before_start_is_an_error() {
        let mut gfx = HeadlessContext::new();
        let mut overlay = LabelLog::new();
        let mut app = App::new(Recorder::default());
        assert!(app.frame(0.0, &mut gfx, &mut overlay).is_err());
        assert!(app.scene().calls.is_empty());
    }

    #[test]
    fn render_failure_skips_present() {
        let mut gfx = HeadlessContext::new();
        let mut overlay = LabelLog::new();
        let mut app = App::new(Recorder {
            fail_render_at: Some(2.0),
            ..Recorder::default()
        });
        let err = run_headless(&mut app, &mut gfx, &mut overlay, 4, 1.0).unwrap_err();
        assert!(format!("{err:#}").contains("boom"));
        assert_eq!(gfx.frames_presented(), 1);
    }

    #[test]
    fn run_headless_uses_a_fixed_step() {
        let mut gfx = HeadlessContext::new();
        let mut overlay = LabelLog::new();
        let mut app = App::new(Recorder::default());
        run_headless(&mut app, &mut gfx, &mut overlay, 3, 0.25).unwrap();
        assert_eq!(gfx.frames_presented(), 3);
        assert_eq!(overlay.updates(), 3);
        assert_eq!(overlay.label("t"), Some("0.75"));
        assert_eq!(app.into_scene().inits, 1);
    }
}
