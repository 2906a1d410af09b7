use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use tracing::{debug, info, instrument};

use touchspot::{Clock, EventSource, InputEvent};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptEvent {
    pub at_ms: u64,
    pub event: InputEvent,
}

fn field<T: std::str::FromStr>(fields: &[&str], index: usize, name: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = fields
        .get(index)
        .ok_or_else(|| anyhow!("missing {}", name))?;
    raw.parse()
        .with_context(|| format!("bad {} {:?}", name, raw))
}

fn parse_line(line: &str) -> Result<Option<ScriptEvent>> {
    let line = line.split('#').next().unwrap_or("").trim();
    if line.is_empty() {
        return Ok(None);
    }
    let fields: Vec<&str> = line.split_whitespace().collect();
    let at_ms: u64 = field(&fields, 0, "timestamp")?;
    let kind = fields.get(1).copied().ok_or_else(|| anyhow!("missing event kind"))?;

    let event = match kind {
        "quit" => InputEvent::Quit,
        "touch-down" | "touch-move" | "touch-up" => {
            let finger_id = field(&fields, 2, "finger id")?;
            let x = field(&fields, 3, "x")?;
            let y = field(&fields, 4, "y")?;
            match kind {
                "touch-down" => InputEvent::FingerDown { finger_id, x, y },
                "touch-move" => InputEvent::FingerMotion { finger_id, x, y },
                _ => InputEvent::FingerUp { finger_id, x, y },
            }
        }
        "mouse-down" | "mouse-move" | "mouse-up" => {
            let which = field(&fields, 2, "device id")?;
            let (x, y) = if kind == "mouse-up" && fields.len() == 3 {
                (0, 0)
            } else {
                (field(&fields, 3, "x")?, field(&fields, 4, "y")?)
            };
            match kind {
                "mouse-down" => InputEvent::MouseButtonDown { which, x, y },
                "mouse-move" => InputEvent::MouseMotion { which, x, y },
                _ => InputEvent::MouseButtonUp { which, x, y },
            }
        }
        other => bail!("unknown event kind {:?}", other),
    };
    Ok(Some(ScriptEvent { at_ms, event }))
}

/// Parses a recorded session: one `<ms> <kind> [id x y]` event per line, `#` starts a comment.
pub fn parse(text: &str) -> Result<Vec<ScriptEvent>> {
    let mut events = Vec::new();
    for (number, line) in text.lines().enumerate() {
        if let Some(event) = parse_line(line).with_context(|| format!("line {}", number + 1))? {
            events.push(event);
        }
    }
    events.sort_by_key(|e| e.at_ms);
    Ok(events)
}

#[instrument]
pub fn load(path: &Path) -> Result<Vec<ScriptEvent>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    let events = parse(&text).with_context(|| format!("in script {}", path.display()))?;
    info!("Loaded {} scripted events", events.len());
    Ok(events)
}

/// Replays scripted events in real time. Yields `Quit` once the script runs out or the
/// `quit` flag is raised.
pub struct ScriptSource<C> {
    events: VecDeque<ScriptEvent>,
    clock: C,
    quit: Arc<AtomicBool>,
}

impl<C: Clock> ScriptSource<C> {
    pub fn new(events: Vec<ScriptEvent>, clock: C, quit: Arc<AtomicBool>) -> Self {
        Self {
            events: events.into(),
            clock,
            quit,
        }
    }
}

impl<C: Clock> EventSource for ScriptSource<C> {
    fn wait_event(&mut self, timeout_ms: u64) -> Option<InputEvent> {
        if self.quit.load(Ordering::Relaxed) {
            return Some(InputEvent::Quit);
        }
        let Some(next) = self.events.front().copied() else {
            debug!("Script finished");
            return Some(InputEvent::Quit);
        };

        let now = self.clock.now_ms();
        if next.at_ms > now {
            let wait = (next.at_ms - now).min(timeout_ms);
            std::thread::sleep(Duration::from_millis(wait));
            if self.quit.load(Ordering::Relaxed) {
                return Some(InputEvent::Quit);
            }
            if next.at_ms > self.clock.now_ms() {
                return None;
            }
        }
        self.events.pop_front();
        Some(next.event)
    }
}
