// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Smallest zoom factor; adjustments that would reach zero or below land here.
pub const MIN_ZOOM: f32 = 0.01;

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// Natural pixel size of the loaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Size of the display surface. Never smaller than 1x1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowDimensions {
    pub width: u32,
    pub height: u32,
}

impl WindowDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn translate(&self, dx: f32, dy: f32) -> Rect {
        Rect {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

// ---------------------------------------------------------------------------
// View state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub zoom: f32,
    /// Degrees, clockwise on screen. Accumulates without wrapping.
    pub rotation: f32,
    /// Pan in device pixels. Positive offsets move the view right/down over
    /// the image, so the content shifts left/up.
    pub x_offset: i32,
    pub y_offset: i32,
    /// true = scale to fit the window, false = natural size.
    pub fit_to_window: bool,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            rotation: 0.0,
            x_offset: 0,
            y_offset: 0,
            fit_to_window: true,
            flip_horizontal: false,
            flip_vertical: false,
        }
    }
}

impl ViewState {
    pub fn scale_by(&mut self, delta: f32) {
        self.set_zoom(self.zoom + delta);
    }

    pub fn set_zoom(&mut self, value: f32) {
        self.zoom = if value > 0.0 { value } else { MIN_ZOOM };
    }

    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.x_offset = self.x_offset.saturating_add(dx);
        self.y_offset = self.y_offset.saturating_add(dy);
    }

    pub fn rotate_by(&mut self, degrees: f32) {
        self.rotation += degrees;
    }

    pub fn toggle_flip_horizontal(&mut self) {
        self.flip_horizontal = !self.flip_horizontal;
    }

    pub fn toggle_flip_vertical(&mut self) {
        self.flip_vertical = !self.flip_vertical;
    }

    pub fn toggle_fit_mode(&mut self) {
        self.fit_to_window = !self.fit_to_window;
    }

    /// Back to zoom 1, no rotation, no pan, no flips. Fit mode is a display
    /// setting and stays as it is.
    pub fn reset(&mut self) {
        *self = Self {
            fit_to_window: self.fit_to_window,
            ..Self::default()
        };
    }

    /// View to use when another image replaces the current one.
    pub fn for_new_image(&self) -> Self {
        let mut next = *self;
        next.reset();
        next
    }
}

// ---------------------------------------------------------------------------
// Frame computation
// ---------------------------------------------------------------------------

/// Everything the presenter needs for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Unrotated destination rect in window coordinates.
    pub dest: Rect,
    /// Axis-aligned bounds of `dest` after rotation.
    pub bounds: Rect,
    /// The input view with its offsets clamped.
    pub view: ViewState,
}

pub fn fit_scale(img_w: f32, img_h: f32, win_w: f32, win_h: f32) -> f32 {
    (win_w / img_w).min(win_h / img_h)
}

/// Axis-aligned box enclosing `rect` rotated by `degrees` about its center.
pub fn rotated_bounds(rect: Rect, degrees: f32) -> Rect {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let (cx, cy) = rect.center();
    let hw = rect.width / 2.0;
    let hh = rect.height / 2.0;

    let corners = [(-hw, -hh), (hw, -hh), (-hw, hh), (hw, hh)];
    let (mut min_x, mut min_y) = (f32::INFINITY, f32::INFINITY);
    let (mut max_x, mut max_y) = (f32::NEG_INFINITY, f32::NEG_INFINITY);
    for (x, y) in corners {
        let rx = x * cos - y * sin;
        let ry = x * sin + y * cos;
        min_x = min_x.min(rx);
        max_x = max_x.max(rx);
        min_y = min_y.min(ry);
        max_y = max_y.max(ry);
    }

    Rect {
        x: cx + min_x,
        y: cy + min_y,
        width: max_x - min_x,
        height: max_y - min_y,
    }
}

/// Offsets may pan across the overflow only; with no overflow there is
/// nothing to pan and the offset snaps back to zero.
fn clamp_offset(offset: i32, extent: f32, window: f32) -> i32 {
    if extent > window {
        let limit = ((extent - window) / 2.0).floor() as i32;
        offset.clamp(-limit, limit)
    } else {
        0
    }
}

pub fn compute_frame(image: ImageDimensions, window: WindowDimensions, view: ViewState) -> Frame {
    let (img_w, img_h) = (image.width as f32, image.height as f32);
    let (win_w, win_h) = (window.width as f32, window.height as f32);

    let scale = if view.fit_to_window && !image.is_empty() {
        fit_scale(img_w, img_h, win_w, win_h)
    } else {
        1.0
    };
    let draw_w = (img_w * scale * view.zoom).max(0.0);
    let draw_h = (img_h * scale * view.zoom).max(0.0);

    let centered = Rect::new((win_w - draw_w) / 2.0, (win_h - draw_h) / 2.0, draw_w, draw_h);
    let rotated = rotated_bounds(centered, view.rotation);

    let mut view = view;
    view.x_offset = clamp_offset(view.x_offset, rotated.width, win_w);
    view.y_offset = clamp_offset(view.y_offset, rotated.height, win_h);

    let (dx, dy) = (-view.x_offset as f32, -view.y_offset as f32);
    Frame {
        dest: centered.translate(dx, dy),
        bounds: rotated.translate(dx, dy),
        view,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn natural() -> ViewState {
        ViewState {
            fit_to_window: false,
            ..ViewState::default()
        }
    }

    #[test]
    fn fit_preserves_aspect_and_stays_inside_window() {
        let sizes = [(1, 1), (640, 480), (480, 640), (37, 1999), (4000, 3)];
        let windows = [(1, 1), (800, 600), (300, 1000), (1920, 1080)];
        for &(iw, ih) in &sizes {
            for &(ww, wh) in &windows {
                for zoom in [0.01, 0.5, 1.0, 3.0] {
                    let view = ViewState { zoom, ..ViewState::default() };
                    let frame = compute_frame(
                        ImageDimensions::new(iw, ih),
                        WindowDimensions::new(ww, wh),
                        view,
                    );
                    let d = frame.dest;
                    assert_relative_eq!(
                        d.width / iw as f32,
                        d.height / ih as f32,
                        max_relative = 1e-4
                    );
                    if zoom <= 1.0 {
                        assert!(d.width <= ww as f32 + 1e-3, "{iw}x{ih} in {ww}x{wh}");
                        assert!(d.height <= wh as f32 + 1e-3, "{iw}x{ih} in {ww}x{wh}");
                    }
                }
            }
        }
    }

    #[test]
    fn natural_size_uses_zoom_only() {
        let view = ViewState { zoom: 2.0, ..natural() };
        let frame = compute_frame(
            ImageDimensions::new(100, 50),
            WindowDimensions::new(1000, 1000),
            view,
        );
        assert_eq!(frame.dest, Rect::new(400.0, 450.0, 200.0, 100.0));
    }

    #[test]
    fn reset_restores_defaults_but_keeps_fit_mode() {
        let mut view = ViewState {
            zoom: 7.5,
            rotation: -275.0,
            x_offset: 42,
            y_offset: -9,
            fit_to_window: false,
            flip_horizontal: true,
            flip_vertical: true,
        };
        view.reset();
        assert_eq!(view, natural());

        let mut fitted = ViewState { zoom: 0.2, rotation: 10.0, ..ViewState::default() };
        fitted.reset();
        assert_eq!(fitted, ViewState::default());
    }

    #[test]
    fn new_image_resets_view() {
        let mut view = natural();
        view.pan(5, 5);
        view.rotate_by(90.0);
        view.toggle_flip_vertical();
        let next = view.for_new_image();
        assert_eq!(next, natural());
        // The old view is untouched.
        assert_eq!(view.x_offset, 5);
    }

    #[test]
    fn zoom_never_reaches_zero() {
        let mut view = ViewState::default();
        view.scale_by(-view.zoom);
        assert_eq!(view.zoom, MIN_ZOOM);

        view.set_zoom(3.0);
        view.scale_by(-5.0);
        assert_eq!(view.zoom, MIN_ZOOM);

        view.set_zoom(0.0);
        assert_eq!(view.zoom, MIN_ZOOM);
        view.set_zoom(f32::NAN);
        assert_eq!(view.zoom, MIN_ZOOM);

        view.scale_by(1.0);
        assert_relative_eq!(view.zoom, 1.01);
    }

    #[test]
    fn compute_frame_is_idempotent() {
        let image = ImageDimensions::new(3000, 2000);
        let window = WindowDimensions::new(800, 600);
        let view = ViewState {
            zoom: 2.5,
            rotation: 33.0,
            x_offset: 10_000,
            y_offset: -10_000,
            ..ViewState::default()
        };
        let first = compute_frame(image, window, view);
        let second = compute_frame(image, window, view);
        assert_eq!(first, second);
        // Feeding the clamped view back in changes nothing.
        let third = compute_frame(image, window, first.view);
        assert_eq!(first, third);
    }

    #[test]
    fn offsets_snap_to_zero_when_image_fits() {
        let view = ViewState {
            x_offset: 25,
            y_offset: -25,
            ..ViewState::default()
        };
        let frame = compute_frame(
            ImageDimensions::new(640, 480),
            WindowDimensions::new(800, 600),
            view,
        );
        assert_eq!(frame.view.x_offset, 0);
        assert_eq!(frame.view.y_offset, 0);
    }

    #[test]
    fn offsets_clamp_to_half_the_overflow() {
        let image = ImageDimensions::new(400, 200);
        let window = WindowDimensions::new(100, 100);
        let mut view = natural();
        view.pan(1000, -1000);

        let frame = compute_frame(image, window, view);
        assert_eq!(frame.view.x_offset, 150);
        assert_eq!(frame.view.y_offset, -50);

        view.pan(-1100, 1020);
        let frame = compute_frame(image, window, view);
        assert_eq!(frame.view.x_offset, -100);
        assert_eq!(frame.view.y_offset, 20);
    }

    #[test]
    fn offsets_are_subtracted_from_position() {
        let view = ViewState { x_offset: 10, y_offset: -4, ..natural() };
        let frame = compute_frame(
            ImageDimensions::new(400, 400),
            WindowDimensions::new(100, 100),
            view,
        );
        assert_eq!(frame.dest.x, -150.0 - 10.0);
        assert_eq!(frame.dest.y, -150.0 + 4.0);
        assert_eq!(frame.bounds, frame.dest);
    }

    #[test]
    fn clamping_uses_rotated_bounds() {
        // Wide image turned upright: x no longer overflows, y now does.
        let image = ImageDimensions::new(400, 100);
        let window = WindowDimensions::new(200, 300);
        let view = ViewState {
            rotation: 90.0,
            x_offset: 30,
            y_offset: 80,
            ..natural()
        };
        let frame = compute_frame(image, window, view);
        assert_eq!(frame.view.x_offset, 0);
        assert_eq!(frame.view.y_offset, 50);
        assert_relative_eq!(frame.bounds.width, 100.0, epsilon = 1e-3);
        assert_relative_eq!(frame.bounds.height, 400.0, epsilon = 1e-3);
    }

    #[test]
    fn zero_rotation_bounds_equal_rect() {
        let rect = Rect::new(12.0, -8.5, 300.0, 150.0);
        assert_eq!(rotated_bounds(rect, 0.0), rect);
    }

    #[test]
    fn diagonal_rotation_grows_bounds() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = rotated_bounds(rect, 45.0);
        let diag = 100.0 * std::f32::consts::SQRT_2;
        assert_relative_eq!(b.width, diag, max_relative = 1e-5);
        assert_relative_eq!(b.height, diag, max_relative = 1e-5);
        let (cx, cy) = b.center();
        assert_relative_eq!(cx, 50.0, epsilon = 1e-3);
        assert_relative_eq!(cy, 50.0, epsilon = 1e-3);
    }

    #[test]
    fn empty_image_yields_empty_rect() {
        let frame = compute_frame(
            ImageDimensions::new(0, 0),
            WindowDimensions::new(0, 0),
            ViewState::default(),
        );
        assert_eq!(frame.dest, Rect::new(0.5, 0.5, 0.0, 0.0));
        assert_eq!(frame.view.x_offset, 0);
    }
}
