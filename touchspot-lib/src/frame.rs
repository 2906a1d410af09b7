use std::rc::Rc;

use tracing::{debug, info, instrument};

use crate::event::InputEvent;
use crate::render::{MarkerAssets, Renderer, TextRenderer, Texture};
use crate::scene::SceneController;
use crate::sound::Mixer;

/// Monotonic millisecond clock.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

pub trait EventSource {
    /// Blocks until an event arrives or `timeout_ms` passes; `None` on timeout.
    fn wait_event(&mut self, timeout_ms: u64) -> Option<InputEvent>;
}

/// Limits redraws to one per frame period.
///
/// A redraw is due when the period has passed since the last frame boundary and the scene is
/// dirty, or when the initial forced draw has not happened yet. The boundary advances every
/// elapsed period whether or not anything was drawn.
#[derive(Debug)]
pub struct FrameScheduler {
    period_ms: u64,
    last_frame: u64,
    force: bool,
}

impl FrameScheduler {
    pub fn new(fps: u32) -> Self {
        Self {
            period_ms: Self::period_for(fps),
            last_frame: 0,
            force: true,
        }
    }

    /// Frame period in whole milliseconds, rounded to nearest.
    pub fn period_for(fps: u32) -> u64 {
        (1000.0 / fps.max(1) as f64).round() as u64
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    /// Decides whether to draw at `now`. Returns `true` at most once per period.
    pub fn tick(&mut self, now: u64, dirty: bool) -> bool {
        if !(self.force || now >= self.last_frame + self.period_ms) {
            return false;
        }
        let draw = self.force || dirty;
        self.force = false;
        self.last_frame = now;
        draw
    }

    /// How long the loop may block waiting for input before the next frame boundary.
    pub fn max_wait(&self, now: u64) -> u64 {
        self.period_ms
            .saturating_sub(now.saturating_sub(self.last_frame))
    }
}

/// Everything a session draws with, borrowed for the length of the run.
pub struct Output<'a, R, F, T> {
    pub renderer: &'a mut R,
    pub text: &'a mut F,
    pub assets: &'a MarkerAssets<T>,
}

/// Runs the event loop until the scene sees a quit event. Returns the number of frames drawn.
#[instrument(skip_all, fields(fps = fps))]
pub fn run<T, M, E, C, R, F>(
    scene: &mut SceneController<T, M>,
    events: &mut E,
    clock: &C,
    output: Output<'_, R, F, T>,
    fps: u32,
) -> u64
where
    T: Texture,
    M: Mixer,
    E: EventSource,
    C: Clock,
    R: Renderer<Texture = T>,
    F: TextRenderer<Texture = T>,
{
    let Output {
        renderer,
        text,
        assets,
    } = output;
    let mut scheduler = FrameScheduler::new(fps);
    let mut frames = 0;
    info!("Frame period {}ms", scheduler.period_ms());

    while !scene.quit_requested() {
        if scheduler.tick(clock.now_ms(), scene.needs_redraw()) {
            scene.redraw(renderer, text, assets);
            frames += 1;
        }

        let wait = scheduler.max_wait(clock.now_ms());
        if let Some(event) = events.wait_event(wait) {
            debug!("Event {:?}", event);
            scene.handle_event(&event);
        }
    }
    info!("Session ended after {} frames", frames);
    frames
}
