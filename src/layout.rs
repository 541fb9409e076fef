//! Placement of the image and the wrapped message lines on screen.

/// Axis-aligned rectangle in physical pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of the given size whose center is at `(cx, cy)`, snapped to
    /// whole pixels.
    pub fn centered_at(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self::new(
            cx - (width / 2.0).floor(),
            cy - (height / 2.0).floor(),
            width,
            height,
        )
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub image: Option<Rect>,
    pub lines: Vec<Rect>,
}

/// Widest a text line may be on a screen `screen_width` pixels wide.
pub fn max_text_width(screen_width: u32, margin: f32) -> f32 {
    (screen_width as f32 - margin).max(1.0)
}

/// Lays out the message screen.
///
/// The image (if any) is centered horizontally with its center one third of
/// the way down the screen. Text lines follow `image_gap` pixels below the
/// image, or start at the one-third mark without one. Line `i` is centered
/// on `top + i * line_height`.
pub fn compose(
    screen: (u32, u32),
    image_size: Option<(u32, u32)>,
    line_sizes: &[(f32, f32)],
    line_height: f32,
    image_gap: f32,
) -> Layout {
    let (width, height) = screen;
    let cx = (width / 2) as f32;
    let mut y = (height / 3) as f32;

    let image = image_size.map(|(w, h)| {
        let rect = Rect::centered_at(cx, y, w as f32, h as f32);
        y = rect.bottom() + image_gap;
        rect
    });

    let lines = line_sizes
        .iter()
        .enumerate()
        .map(|(i, &(w, h))| Rect::centered_at(cx, y + i as f32 * line_height, w, h))
        .collect();

    Layout { image, lines }
}
