// The update loop and the handle it shares with the platform.
//
// Two threads, strictly partitioned:
//   update thread - owns the back buffer and the logical input table, and
//                   runs the application.
//   main thread   - runs the platform event loop, writes physical input and
//                   presents whatever the render slot hands it.
// Everything they share lives in `Shared`, built only from atomics.
//
// One tick on the update thread, always in this order:
//   sink housekeeping -> input reconcile -> app.update -> render publish

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use log::{debug, error, info, warn};

use crate::config::{Config, SchedulerConfig};
use crate::error::Error;
use crate::input::{InputState, PhysicalInput};
use crate::platform::{FrameSink, PlatformDriver};
use crate::render::RenderSlot;
use crate::surface::PixelSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RunState {
    Idle = 0,
    Running = 1,
    Stopped = 2,
}

impl RunState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => RunState::Idle,
            1 => RunState::Running,
            _ => RunState::Stopped,
        }
    }
}

/// State visible to both the update loop and the platform driver.
#[derive(Debug)]
pub struct Shared {
    state: AtomicU8,
    shutdown: AtomicBool,
    fps: AtomicU32,
    input: PhysicalInput,
    render: RenderSlot,
}

impl Shared {
    pub fn new(width: usize, height: usize, scale_x: f64, scale_y: f64) -> Self {
        Self {
            state: AtomicU8::new(RunState::Idle as u8),
            shutdown: AtomicBool::new(false),
            fps: AtomicU32::new(0),
            input: PhysicalInput::new(scale_x, scale_y),
            render: RenderSlot::new(width, height),
        }
    }

    pub fn state(&self) -> RunState {
        RunState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Idle -> Running. Only the first caller wins.
    fn begin(&self) -> bool {
        self.state
            .compare_exchange(
                RunState::Idle as u8,
                RunState::Running as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    fn finish(&self) {
        self.state.store(RunState::Stopped as u8, Ordering::Release);
    }

    /// Ask the update loop (and any driver loop) to wind down. Idempotent.
    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
    }

    pub fn shutdown_requested(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    /// Frames counted over the last full second.
    pub fn fps(&self) -> u32 {
        self.fps.load(Ordering::Relaxed)
    }

    pub fn input(&self) -> &PhysicalInput {
        &self.input
    }

    pub fn render(&self) -> &RenderSlot {
        &self.render
    }
}

/// Callbacks the scheduler drives. Runs on the update thread.
pub trait Application: Send {
    /// Called once before the first tick. An error stops the loop before it
    /// starts; `unload` is not called in that case.
    fn load(&mut self, _ctx: &mut Context<'_>) -> Result<(), Error> {
        Ok(())
    }

    /// Called once per tick with the frame delta in seconds.
    fn update(&mut self, ctx: &mut Context<'_>, delta: f64);

    /// Called once after the loop has stopped.
    fn unload(&mut self, _ctx: &mut Context<'_>) {}
}

/// What the application gets to touch during a callback.
pub struct Context<'a> {
    pub surface: &'a mut PixelSurface,
    pub input: &'a mut InputState,
    shared: &'a Shared,
}

impl Context<'_> {
    pub fn width(&self) -> usize {
        self.surface.width()
    }

    pub fn height(&self) -> usize {
        self.surface.height()
    }

    pub fn fps(&self) -> u32 {
        self.shared.fps()
    }

    /// Stop after the current tick.
    pub fn quit(&self) {
        self.shared.request_shutdown();
    }
}

pub struct FrameScheduler<S> {
    shared: Arc<Shared>,
    sink: S,
    surface: PixelSurface,
    input: InputState,
    fixed_step: Option<f64>,
    frame_timer: f64,
    frame_count: u32,
}

impl<S: FrameSink> FrameScheduler<S> {
    /// The back buffer takes its size from the render slot in `shared`.
    pub fn new(shared: Arc<Shared>, sink: S, config: &SchedulerConfig) -> Self {
        let (w, h) = (shared.render().width(), shared.render().height());
        Self {
            shared,
            sink,
            surface: PixelSurface::new(w, h),
            input: InputState::new(),
            fixed_step: config
                .fixed_update_fps
                .filter(|&fps| fps > 0)
                .map(|fps| 1.0 / f64::from(fps)),
            frame_timer: 0.0,
            frame_count: 0,
        }
    }

    pub fn shared(&self) -> &Arc<Shared> {
        &self.shared
    }

    pub fn surface(&self) -> &PixelSurface {
        &self.surface
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// One update/render step with `elapsed` seconds of wall time.
    pub fn tick<A: Application + ?Sized>(&mut self, app: &mut A, elapsed: f64) {
        self.sink.update(elapsed);
        self.input.reconcile(self.shared.input());

        let delta = self.fixed_step.unwrap_or(elapsed);
        let mut ctx = Context {
            surface: &mut self.surface,
            input: &mut self.input,
            shared: &self.shared,
        };
        app.update(&mut ctx, delta);

        // Presentation pacing always follows real time.
        self.sink.render(elapsed, &self.surface, self.shared.render());

        self.frame_count += 1;
        self.frame_timer += elapsed;
        if self.frame_timer >= 1.0 {
            self.frame_timer -= 1.0;
            self.shared.fps.store(self.frame_count, Ordering::Relaxed);
            debug!("fps: {}", self.frame_count);
            self.frame_count = 0;
        }
    }

    /// Drive `app` until shutdown is requested, on the calling thread.
    pub fn run<A: Application + ?Sized>(&mut self, app: &mut A) -> Result<(), Error> {
        if !self.shared.begin() {
            warn!("update loop already started");
            return Ok(());
        }
        info!("update loop running");

        let mut ctx = Context {
            surface: &mut self.surface,
            input: &mut self.input,
            shared: &self.shared,
        };
        if let Err(e) = app.load(&mut ctx) {
            error!("application failed to load: {e}");
            self.shared.request_shutdown();
            self.shared.finish();
            return Err(e);
        }

        let mut last = Instant::now();
        while !self.shared.shutdown_requested() {
            let now = Instant::now();
            let elapsed = now.duration_since(last).as_secs_f64();
            last = now;
            self.tick(app, elapsed);
        }

        let mut ctx = Context {
            surface: &mut self.surface,
            input: &mut self.input,
            shared: &self.shared,
        };
        app.unload(&mut ctx);
        self.shared.finish();
        info!("update loop stopped");
        Ok(())
    }
}

impl<S: FrameSink + 'static> FrameScheduler<S> {
    /// Move the scheduler and `app` onto a thread named "update".
    ///
    /// However the thread ends, even by panicking, shutdown is requested so
    /// the platform loop lets go.
    pub fn spawn<A: Application + 'static>(mut self, mut app: A) -> Result<UpdateHandle, Error> {
        let guard = StopOnExit(Arc::clone(&self.shared));
        let handle = thread::Builder::new()
            .name("update".into())
            .spawn(move || {
                let _guard = guard;
                self.run(&mut app)
            })
            .map_err(|e| Error::UpdateThread(e.to_string()))?;
        Ok(UpdateHandle { handle })
    }
}

// Dropped when the update thread finishes or unwinds.
struct StopOnExit(Arc<Shared>);

impl Drop for StopOnExit {
    fn drop(&mut self) {
        if thread::panicking() {
            error!("update loop panicked, shutting down");
        }
        self.0.request_shutdown();
        self.0.finish();
    }
}

/// Join handle for a spawned update loop.
pub struct UpdateHandle {
    handle: JoinHandle<Result<(), Error>>,
}

impl UpdateHandle {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the loop (including `unload`) to finish.
    pub fn join(self) -> Result<(), Error> {
        self.handle
            .join()
            .map_err(|_| Error::UpdateThread("update loop panicked".into()))?
    }
}

/// Open the window, run `app` on its own thread and the platform loop on
/// this one. Returns once both have finished.
///
/// A failing platform loop is logged and treated as a shutdown signal.
pub fn run<D, A>(driver: &mut D, config: &Config, app: A) -> Result<(), Error>
where
    D: PlatformDriver,
    A: Application + 'static,
{
    let w = &config.window;
    driver.create_window(w)?;
    driver.create_device()?;
    driver.set_window_title(&w.title);

    let shared = Arc::new(Shared::new(
        w.width,
        w.height,
        w.scale_x as f64,
        w.scale_y as f64,
    ));
    let scheduler = FrameScheduler::new(Arc::clone(&shared), driver.frame_sink(), &config.scheduler);
    let handle = scheduler.spawn(app)?;

    if let Err(e) = driver.run_event_loop(&shared) {
        error!("platform loop failed: {e}");
    }
    shared.request_shutdown();
    handle.join()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::input::Key;
    use crate::platform::PacedSink;

    // Records what the application saw on each tick.
    #[derive(Default)]
    struct Probe {
        loads: u32,
        unloads: u32,
        deltas: Vec<f64>,
        space: Vec<bool>,
        quit_after: Option<usize>,
    }

    impl Application for Probe {
        fn load(&mut self, _ctx: &mut Context<'_>) -> Result<(), Error> {
            self.loads += 1;
            Ok(())
        }

        fn update(&mut self, ctx: &mut Context<'_>, delta: f64) {
            self.deltas.push(delta);
            self.space.push(ctx.input.key_pressed(Key::Space));
            ctx.surface.clear(Color::GREEN);
            if self.quit_after == Some(self.deltas.len()) {
                ctx.quit();
            }
        }

        fn unload(&mut self, _ctx: &mut Context<'_>) {
            self.unloads += 1;
        }
    }

    fn scheduler(fixed: Option<u32>) -> FrameScheduler<PacedSink> {
        let shared = Arc::new(Shared::new(4, 4, 1.0, 1.0));
        let config = SchedulerConfig {
            fixed_update_fps: fixed,
        };
        FrameScheduler::new(shared, PacedSink::new(60), &config)
    }

    #[test]
    fn input_is_reconciled_before_update() {
        let mut s = scheduler(None);
        let mut app = Probe::default();
        s.shared().input().set_key(Key::Space, true);
        s.tick(&mut app, 0.01);
        s.shared().input().set_key(Key::Space, false);
        s.tick(&mut app, 0.01);
        assert_eq!(app.space, [true, false]);
    }

    #[test]
    fn fixed_step_overrides_measured_delta() {
        let mut s = scheduler(Some(50));
        let mut app = Probe::default();
        s.tick(&mut app, 0.3);
        s.tick(&mut app, 0.001);
        assert_eq!(app.deltas, [0.02, 0.02]);

        let mut s = scheduler(None);
        let mut app = Probe::default();
        s.tick(&mut app, 0.3);
        assert_eq!(app.deltas, [0.3]);
    }

    #[test]
    fn fps_is_sampled_once_per_second() {
        let mut s = scheduler(None);
        let mut app = Probe::default();
        for _ in 0..9 {
            s.tick(&mut app, 0.125);
        }
        // 8 ticks fill the first second.
        assert_eq!(s.shared().fps(), 8);
    }

    #[test]
    fn publish_follows_real_time_even_with_fixed_step() {
        let mut s = scheduler(Some(1000));
        let mut app = Probe::default();
        s.tick(&mut app, 0.5);
        assert!(s.shared().render().is_busy());
        assert_eq!(s.shared().render().snapshot(), vec![Color::GREEN.0; 16]);
    }

    #[test]
    fn run_calls_load_and_unload_once() {
        let mut s = scheduler(None);
        let mut app = Probe {
            quit_after: Some(3),
            ..Probe::default()
        };
        assert_eq!(s.shared().state(), RunState::Idle);
        s.run(&mut app).unwrap();
        assert_eq!((app.loads, app.unloads), (1, 1));
        assert_eq!(app.deltas.len(), 3);
        assert_eq!(s.shared().state(), RunState::Stopped);

        // Stopped is final.
        s.run(&mut app).unwrap();
        assert_eq!((app.loads, app.unloads), (1, 1));
    }

    #[test]
    fn shutdown_before_start_skips_the_loop() {
        let mut s = scheduler(None);
        let mut app = Probe::default();
        s.shared().request_shutdown();
        s.run(&mut app).unwrap();
        assert_eq!((app.loads, app.unloads), (1, 1));
        assert!(app.deltas.is_empty());
    }

    struct FailsToLoad;

    impl Application for FailsToLoad {
        fn load(&mut self, _ctx: &mut Context<'_>) -> Result<(), Error> {
            Err(Error::Config("missing asset".into()))
        }

        fn update(&mut self, _ctx: &mut Context<'_>, _delta: f64) {
            panic!("update after failed load");
        }
    }

    #[test]
    fn load_failure_stops_the_loop() {
        let mut s = scheduler(None);
        let err = s.run(&mut FailsToLoad).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(s.shared().state(), RunState::Stopped);
        assert!(s.shared().shutdown_requested());
    }
}
