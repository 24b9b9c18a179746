use std::path::{Path, PathBuf};

use crate::cli::TitleMode;
use crate::effects::apply_effect;
use crate::files::Siblings;
use crate::loader::ImageLoader;
use crate::pixel::{PixelBuffer, Rgba};
use crate::ui::input::Action;
use crate::ui::render::{present, rgb, Texture, DARK_BACKGROUND, LIGHT_BACKGROUND};
use crate::view::{compute_frame, Frame, ImageDimensions, ViewState, WindowDimensions};

// ---------------------------------------------------------------------------
// Viewer state
// ---------------------------------------------------------------------------

/// Start-up settings, usually taken from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewerOptions {
    pub fit_to_window: bool,
    pub light_background: bool,
    pub title_mode: TitleMode,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            fit_to_window: true,
            light_background: false,
            title_mode: TitleMode::Stem,
        }
    }
}

/// What the window glue has to do after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    None,
    Redraw,
    /// The title changed; redraw as well.
    Retitle,
    /// Flip the window between borderless fullscreen and windowed.
    ToggleFullscreen,
    Quit,
}

pub struct ViewerState {
    loader: Box<dyn ImageLoader>,
    siblings: Option<Siblings>,
    path: PathBuf,
    image: Option<PixelBuffer>,
    /// Rebuilt from `image` whenever the pixels change.
    texture: Option<Texture>,
    load_error: Option<String>,

    pub view: ViewState,
    window: WindowDimensions,
    title_mode: TitleMode,
    light_background: bool,

    pub dragging: bool,
    pub drag_start: (f64, f64),
    pub drag_offset_start: (i32, i32),
    pub mouse_pos: (f64, f64),
}

impl ViewerState {
    pub fn new(
        path: PathBuf,
        siblings: Option<Siblings>,
        loader: Box<dyn ImageLoader>,
        options: ViewerOptions,
    ) -> Self {
        let mut state = Self {
            loader,
            siblings,
            path: path.clone(),
            image: None,
            texture: None,
            load_error: None,
            view: ViewState {
                fit_to_window: options.fit_to_window,
                ..ViewState::default()
            },
            window: WindowDimensions::new(1, 1),
            title_mode: options.title_mode,
            light_background: options.light_background,
            dragging: false,
            drag_start: (0.0, 0.0),
            drag_offset_start: (0, 0),
            mouse_pos: (0.0, 0.0),
        };
        state.open(&path);
        state
    }

    pub fn background(&self) -> Rgba {
        if self.light_background {
            LIGHT_BACKGROUND
        } else {
            DARK_BACKGROUND
        }
    }

    /// Load `path` as the current image. On failure the previous image stays
    /// on screen and the error is kept for the title.
    fn open(&mut self, path: &Path) {
        self.path = path.to_path_buf();
        if let Some(ref s) = self.siblings {
            log::info!("[{}/{}] {}", s.index() + 1, s.count(), path.display());
        }
        match self.loader.load(path) {
            Ok(buffer) => {
                self.texture = Some(Texture::from_buffer(&buffer));
                self.image = Some(buffer);
                self.view = self.view.for_new_image();
                self.load_error = None;
                self.settle();
            }
            Err(e) => {
                log::warn!("Could not open {}: {}", path.display(), e);
                self.load_error = Some(e.to_string());
            }
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.window = WindowDimensions::new(width, height);
        self.settle();
    }

    /// The frame for the current image, window and view.
    pub fn frame(&self) -> Option<Frame> {
        let image = self.image.as_ref()?;
        Some(compute_frame(
            ImageDimensions::new(image.width(), image.height()),
            self.window,
            self.view,
        ))
    }

    /// Store the clamped offsets so later pans start from what is on screen.
    fn settle(&mut self) {
        if let Some(frame) = self.frame() {
            self.view = frame.view;
        }
    }

    pub fn dispatch(&mut self, action: Action) -> Command {
        log::debug!("[action] {:?}", action);
        let command = match action {
            Action::Quit => return Command::Quit,
            Action::ToggleFullscreen => return Command::ToggleFullscreen,
            Action::CycleTitle => {
                self.title_mode = self.title_mode.next();
                return Command::Retitle;
            }
            Action::ToggleBackground => {
                self.light_background = !self.light_background;
                Command::Redraw
            }
            Action::Navigate(dir) => {
                let Some(next) = self.siblings.as_mut().and_then(|s| s.step(dir)) else {
                    return Command::None;
                };
                let next = next.to_path_buf();
                self.open(&next);
                return Command::Retitle;
            }
            Action::ApplyEffect(kind) => {
                let Some(image) = self.image.as_mut() else {
                    return Command::None;
                };
                let count = apply_effect(image, kind);
                log::debug!("{:?} rewrote {} pixels", kind, count);
                self.texture = Some(Texture::from_buffer(image));
                Command::Redraw
            }
            Action::ScaleBy(delta) => {
                self.view.scale_by(delta);
                Command::Redraw
            }
            Action::SetZoom(value) => {
                self.view.set_zoom(value);
                Command::Redraw
            }
            Action::Pan(dx, dy) => {
                self.view.pan(dx, dy);
                Command::Redraw
            }
            Action::RotateBy(degrees) => {
                self.view.rotate_by(degrees);
                Command::Redraw
            }
            Action::ToggleFlipHorizontal => {
                self.view.toggle_flip_horizontal();
                Command::Redraw
            }
            Action::ToggleFlipVertical => {
                self.view.toggle_flip_vertical();
                Command::Redraw
            }
            Action::ToggleFitMode => {
                self.view.toggle_fit_mode();
                Command::Redraw
            }
            Action::ResetView => {
                self.view.reset();
                Command::Redraw
            }
        };
        self.settle();
        command
    }

    pub fn begin_drag(&mut self) {
        self.dragging = true;
        self.drag_start = self.mouse_pos;
        self.drag_offset_start = (self.view.x_offset, self.view.y_offset);
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// Track the cursor. While dragging, the content follows it. Returns true
    /// if the view changed.
    pub fn cursor_moved(&mut self, x: f64, y: f64) -> bool {
        self.mouse_pos = (x, y);
        if !self.dragging {
            return false;
        }
        let dx = (x - self.drag_start.0).round() as i32;
        let dy = (y - self.drag_start.1).round() as i32;
        self.view.x_offset = self.drag_offset_start.0 - dx;
        self.view.y_offset = self.drag_offset_start.1 - dy;
        self.settle();
        true
    }

    pub fn title(&self) -> String {
        let name = match self.title_mode {
            TitleMode::Stem => self.path.file_stem().map(|s| s.to_string_lossy().into_owned()),
            TitleMode::Name => self.path.file_name().map(|s| s.to_string_lossy().into_owned()),
            TitleMode::Full => std::path::absolute(&self.path)
                .ok()
                .map(|p| p.display().to_string()),
        }
        .unwrap_or_else(|| self.path.display().to_string());

        if self.load_error.is_some() {
            format!("{} (could not open)", name)
        } else {
            name
        }
    }

    /// Render into the softbuffer framebuffer (u32 per pixel, 0x00RRGGBB).
    pub fn render(&mut self, dst: &mut [u32], fb_w: u32, fb_h: u32) {
        if WindowDimensions::new(fb_w, fb_h) != self.window {
            self.resize(fb_w, fb_h);
        }
        match (self.frame(), self.texture.as_ref()) {
            (Some(frame), Some(texture)) => {
                present(dst, fb_w, fb_h, texture, &frame, self.background());
            }
            _ => {
                let bg = self.background();
                dst.fill(rgb(bg.r, bg.g, bg.b));
            }
        }
    }
}
