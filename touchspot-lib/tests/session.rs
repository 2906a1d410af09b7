use std::cell::Cell;
use std::collections::VecDeque;
use std::path::Path;

use touchspot::frame::{run, Output};
use touchspot::{
    session_rng, ChannelPool, Clock, ContactId, EventSource, InputEvent, MarkerAssets, Mixer,
    Point, Renderer, Rgb, SceneController, Size, TextRenderer, Texture, TouchspotConfig,
};

#[derive(Default)]
struct TestClock(Cell<u64>);

impl Clock for TestClock {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}

struct Timeline<'a> {
    clock: &'a TestClock,
    events: VecDeque<(u64, InputEvent)>,
}

impl EventSource for Timeline<'_> {
    fn wait_event(&mut self, timeout_ms: u64) -> Option<InputEvent> {
        let now = self.clock.now_ms();
        match self.events.front() {
            Some(&(at, event)) if at <= now + timeout_ms => {
                self.clock.0.set(at.max(now));
                self.events.pop_front();
                Some(event)
            }
            Some(_) => {
                self.clock.0.set(now + timeout_ms);
                None
            }
            None => Some(InputEvent::Quit),
        }
    }
}

struct Tex(Size);

impl Texture for Tex {
    fn size(&self) -> Size {
        self.0
    }
}

#[derive(Default)]
struct Screen {
    frames: Vec<Vec<Point>>,
}

impl Renderer for Screen {
    type Texture = Tex;

    fn output_size(&self) -> Size {
        Size::new(800, 600)
    }

    fn clear(&mut self, _color: Rgb) {
        self.frames.push(Vec::new());
    }

    fn copy(&mut self, _texture: &Tex, position: Point, tint: Option<Rgb>) {
        if tint.is_some() {
            if let Some(frame) = self.frames.last_mut() {
                frame.push(position);
            }
        }
    }

    fn present(&mut self) {}
}

struct Glyphs;

impl TextRenderer for Glyphs {
    type Texture = Tex;

    fn render_text(&mut self, text: &str, _color: Rgb) -> Tex {
        Tex(Size::new(10 * text.len() as i32, 12))
    }
}

fn finger(
    at: u64,
    event: fn(i64, f32, f32) -> InputEvent,
    id: i64,
    x: f32,
    y: f32,
) -> (u64, InputEvent) {
    (at, event(id, x, y))
}

fn down(finger_id: i64, x: f32, y: f32) -> InputEvent {
    InputEvent::FingerDown { finger_id, x, y }
}

fn motion(finger_id: i64, x: f32, y: f32) -> InputEvent {
    InputEvent::FingerMotion { finger_id, x, y }
}

fn up(finger_id: i64, x: f32, y: f32) -> InputEvent {
    InputEvent::FingerUp { finger_id, x, y }
}

#[test]
fn recorded_session_tracks_contacts_and_frames() {
    let clock = TestClock::default();
    let mixer = ChannelPool::new(&clock, 16, 150, 250);
    let mut scene = SceneController::new(
        touchspot::Palette::default(),
        session_rng(Some(2017)),
        mixer,
        Size::new(800, 600),
    );
    let mut timeline = Timeline {
        clock: &clock,
        events: VecDeque::from([
            finger(0, down, 1, 0.25, 0.5),
            finger(0, down, 2, 0.75, 0.5),
            finger(40, motion, 1, 0.3, 0.5),
            (
                60,
                InputEvent::MouseButtonDown {
                    which: 0,
                    x: 400,
                    y: 300,
                },
            ),
            finger(100, up, 1, 0.3, 0.5),
            finger(110, up, 9, 0.0, 0.0),
            (
                120,
                InputEvent::MouseMotion {
                    which: 3,
                    x: 1,
                    y: 1,
                },
            ),
            (200, InputEvent::Quit),
        ]),
    };
    let mut screen = Screen::default();
    let assets = MarkerAssets::new(Tex(Size::new(64, 64)));

    let drawn = run(
        &mut scene,
        &mut timeline,
        &clock,
        Output {
            renderer: &mut screen,
            text: &mut Glyphs,
            assets: &assets,
        },
        30,
    );

    assert_eq!(drawn as usize, screen.frames.len());
    assert!(screen.frames[0].is_empty());
    // marker top-left corners of the last frame: finger 2 and the mouse button
    let last = screen.frames.last().unwrap();
    assert_eq!(last.len(), 2);
    assert!(last.contains(&Point::new(600 - 32, 300 - 32)));
    assert!(last.contains(&Point::new(400 - 32, 300 - 32)));

    assert_eq!(scene.registry().len(), 2);
    assert!(scene.registry().find(ContactId::touch(2)).is_some());
    assert!(scene.registry().find(ContactId::pointer(0)).is_some());
    assert_eq!(scene.colors().in_use(), 2);
}

#[test]
fn saturated_channels_drop_cues_without_touching_contacts() {
    let clock = TestClock::default();
    let mixer = ChannelPool::new(&clock, 1, 1000, 1000);
    let mut scene: SceneController<Tex, _> = SceneController::new(
        touchspot::Palette::default(),
        session_rng(Some(1)),
        mixer,
        Size::new(800, 600),
    );

    scene.handle_event(&down(1, 0.1, 0.1));
    scene.handle_event(&down(2, 0.2, 0.2));
    scene.handle_event(&up(1, 0.1, 0.1));

    assert_eq!(scene.mixer().playing(), 1);
    assert_eq!(scene.registry().len(), 1);
    assert_eq!(scene.colors().in_use(), 1);
}

#[test]
fn demo_config_is_valid() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../demos/touchspot.toml");
    let config = TouchspotConfig::load(&path).unwrap();
    assert_eq!(config.seed, Some(2017));
    assert_eq!(config.surface(), Size::new(800, 600));
    assert!(!config.log.file);
}
