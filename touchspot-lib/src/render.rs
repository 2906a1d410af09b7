use std::ops::{Add, Sub};

use crate::color::Rgb;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

pub trait Texture {
    fn size(&self) -> Size;
}

/// Drawing surface the scene is composited onto.
pub trait Renderer {
    type Texture: Texture;

    fn output_size(&self) -> Size;

    fn clear(&mut self, color: Rgb);

    /// Copies `texture` with its top-left corner at `position`, color-modulated by `tint`.
    fn copy(&mut self, texture: &Self::Texture, position: Point, tint: Option<Rgb>);

    fn present(&mut self);
}

/// Rasterizes label strings into textures the renderer can composite.
pub trait TextRenderer {
    type Texture: Texture;

    fn render_text(&mut self, text: &str, color: Rgb) -> Self::Texture;
}

/// The marker texture shared by every contact visual of a session.
///
/// Loaded once before the first contact appears; the hotspot is the center of the texture.
pub struct MarkerAssets<T> {
    texture: T,
    size: Size,
    offset: Point,
}

impl<T: Texture> MarkerAssets<T> {
    pub fn new(texture: T) -> Self {
        let size = texture.size();
        Self {
            texture,
            size,
            offset: Point::new(-size.width / 2, -size.height / 2),
        }
    }

    pub fn texture(&self) -> &T {
        &self.texture
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn offset(&self) -> Point {
        self.offset
    }
}
