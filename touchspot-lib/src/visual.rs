use once_cell::unsync::OnceCell;

use crate::color::Rgb;
use crate::render::{MarkerAssets, Point, Renderer, Size, TextRenderer, Texture};

/// Where a marker and its label end up on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub marker: Point,
    pub label: Point,
}

/// Places the marker centered on `position` and the label below it, or above when it would
/// run past the bottom edge. The label is centered on the marker and kept inside the
/// horizontal bounds of the surface.
pub fn place(position: Point, marker: Size, label: Size, surface: Size) -> Placement {
    let marker_pos = position + Point::new(-marker.width / 2, -marker.height / 2);

    let label_y = if marker_pos.y + marker.height + label.height <= surface.height {
        marker_pos.y + marker.height
    } else {
        marker_pos.y - label.height
    };

    let mut label_x = marker_pos.x + (marker.width - label.width) / 2;
    if label_x < 0 {
        label_x = 0;
    } else if label_x + label.width >= surface.width {
        label_x = surface.width - label.width;
    }

    Placement {
        marker: marker_pos,
        label: Point::new(label_x, label_y),
    }
}

pub fn label_text(position: Point) -> String {
    format!("({},{})", position.x, position.y)
}

/// Render state of one contact: where it is, its color, and the label rendered for the
/// current position.
pub struct ContactVisual<T> {
    position: Point,
    color: Rgb,
    label: OnceCell<T>,
}

impl<T: Texture> ContactVisual<T> {
    pub fn new(position: Point, color: Rgb) -> Self {
        Self {
            position,
            color,
            label: OnceCell::new(),
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn has_cached_label(&self) -> bool {
        self.label.get().is_some()
    }

    /// Returns `false` when the contact already sits at `position`; the cached label is kept.
    pub fn move_to(&mut self, position: Point) -> bool {
        if self.position == position {
            return false;
        }
        self.position = position;
        self.label.take();
        true
    }

    pub fn draw<R, F>(&self, renderer: &mut R, text: &mut F, assets: &MarkerAssets<T>)
    where
        R: Renderer<Texture = T>,
        F: TextRenderer<Texture = T>,
    {
        let label = self
            .label
            .get_or_init(|| text.render_text(&label_text(self.position), self.color));

        let placement = place(
            self.position,
            assets.size(),
            label.size(),
            renderer.output_size(),
        );
        renderer.copy(assets.texture(), placement.marker, Some(self.color));
        renderer.copy(label, placement.label, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SURFACE: Size = Size::new(800, 600);
    const MARKER: Size = Size::new(100, 100);
    const LABEL: Size = Size::new(80, 20);

    #[derive(Debug, Clone, PartialEq)]
    struct Tex {
        name: String,
        size: Size,
    }

    impl Texture for Tex {
        fn size(&self) -> Size {
            self.size
        }
    }

    #[derive(Default)]
    struct Recorder {
        copies: Vec<(String, Point, Option<Rgb>)>,
    }

    impl Renderer for Recorder {
        type Texture = Tex;

        fn output_size(&self) -> Size {
            SURFACE
        }

        fn clear(&mut self, _color: Rgb) {}

        fn copy(&mut self, texture: &Tex, position: Point, tint: Option<Rgb>) {
            self.copies.push((texture.name.clone(), position, tint));
        }

        fn present(&mut self) {}
    }

    #[derive(Default)]
    struct Labels {
        rendered: Vec<String>,
    }

    impl TextRenderer for Labels {
        type Texture = Tex;

        fn render_text(&mut self, text: &str, _color: Rgb) -> Tex {
            self.rendered.push(text.to_string());
            Tex {
                name: text.to_string(),
                size: LABEL,
            }
        }
    }

    fn marker() -> MarkerAssets<Tex> {
        MarkerAssets::new(Tex {
            name: "marker".into(),
            size: MARKER,
        })
    }

    #[test]
    fn label_goes_below_when_it_fits() {
        let p = place(Point::new(400, 300), MARKER, LABEL, SURFACE);
        assert_eq!(p.marker, Point::new(350, 250));
        assert_eq!(p.label, Point::new(360, 350));
    }

    #[test]
    fn label_flips_above_near_bottom_edge() {
        let p = place(Point::new(400, 560), MARKER, LABEL, SURFACE);
        assert_eq!(p.marker, Point::new(350, 510));
        assert_eq!(p.label, Point::new(360, 490));
    }

    #[test]
    fn label_touching_bottom_edge_still_fits_below() {
        // 530 - 50 + 100 + 20 == 600
        let p = place(Point::new(400, 530), MARKER, LABEL, SURFACE);
        assert_eq!(p.label.y, 580);
    }

    #[test]
    fn label_is_clamped_to_left_edge() {
        let wide = Size::new(200, 20);
        let p = place(Point::new(10, 300), MARKER, wide, SURFACE);
        assert_eq!(p.label.x, 0);
    }

    #[test]
    fn label_is_clamped_to_right_edge() {
        let wide = Size::new(200, 20);
        let p = place(Point::new(790, 300), MARKER, wide, SURFACE);
        assert_eq!(p.label.x, 600);
    }

    #[test]
    fn label_text_shows_coordinates() {
        assert_eq!(label_text(Point::new(12, -3)), "(12,-3)");
    }

    #[test]
    fn label_is_rendered_once_and_reused() {
        let visual = ContactVisual::new(Point::new(400, 300), Rgb::new(1, 2, 3));
        let (mut renderer, mut labels, assets) = (Recorder::default(), Labels::default(), marker());

        visual.draw(&mut renderer, &mut labels, &assets);
        visual.draw(&mut renderer, &mut labels, &assets);

        assert_eq!(labels.rendered, vec!["(400,300)".to_string()]);
        assert!(visual.has_cached_label());
        assert_eq!(
            renderer.copies[0],
            ("marker".to_string(), Point::new(350, 250), Some(Rgb::new(1, 2, 3)))
        );
        assert_eq!(
            renderer.copies[1],
            ("(400,300)".to_string(), Point::new(360, 350), None)
        );
    }

    #[test]
    fn moving_drops_the_cached_label() {
        let mut visual = ContactVisual::new(Point::new(400, 300), Rgb::BLACK);
        let (mut renderer, mut labels, assets) = (Recorder::default(), Labels::default(), marker());
        visual.draw(&mut renderer, &mut labels, &assets);

        assert!(visual.move_to(Point::new(401, 300)));
        assert!(!visual.has_cached_label());

        visual.draw(&mut renderer, &mut labels, &assets);
        assert_eq!(labels.rendered, vec!["(400,300)", "(401,300)"]);
    }

    #[test]
    fn moving_in_place_keeps_the_label() {
        let mut visual = ContactVisual::new(Point::new(5, 5), Rgb::BLACK);
        let (mut renderer, mut labels, assets) = (Recorder::default(), Labels::default(), marker());
        visual.draw(&mut renderer, &mut labels, &assets);

        assert!(!visual.move_to(Point::new(5, 5)));
        assert!(visual.has_cached_label());
    }
}
