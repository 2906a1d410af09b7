use std::time::Instant;

use tracing::{debug, info};

use touchspot::{Clock, Point, Renderer, Rgb, Size, TextRenderer, Texture};

#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Headless texture: a name for the trace and the size layout works with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    name: String,
    size: Size,
}

impl Bitmap {
    pub fn new(name: impl Into<String>, size: Size) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

impl Texture for Bitmap {
    fn size(&self) -> Size {
        self.size
    }
}

/// Renderer that logs every frame instead of putting pixels on a screen.
pub struct TraceCanvas {
    size: Size,
    frame: u64,
    copies: usize,
}

impl TraceCanvas {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            frame: 0,
            copies: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frame
    }
}

impl Renderer for TraceCanvas {
    type Texture = Bitmap;

    fn output_size(&self) -> Size {
        self.size
    }

    fn clear(&mut self, color: Rgb) {
        self.copies = 0;
        debug!("Clear to {:?}", color);
    }

    fn copy(&mut self, texture: &Bitmap, position: Point, tint: Option<Rgb>) {
        self.copies += 1;
        match tint {
            Some(tint) => debug!(
                "Draw {} at ({}, {}) tinted {:?}",
                texture.name, position.x, position.y, tint
            ),
            None => debug!("Draw {} at ({}, {})", texture.name, position.x, position.y),
        }
    }

    fn present(&mut self) {
        self.frame += 1;
        info!("Frame {}: {} textures", self.frame, self.copies);
    }
}

/// Sizes labels with fixed glyph metrics derived from the font size.
pub struct GlyphText {
    advance: i32,
    line_height: i32,
}

impl GlyphText {
    pub fn new(font_size: u32) -> Self {
        let font_size = font_size as i32;
        Self {
            advance: (font_size + 1) / 2,
            line_height: font_size + font_size / 4,
        }
    }
}

impl TextRenderer for GlyphText {
    type Texture = Bitmap;

    fn render_text(&mut self, text: &str, _color: Rgb) -> Bitmap {
        let width = self.advance * text.chars().count() as i32;
        Bitmap::new(text, Size::new(width, self.line_height))
    }
}
