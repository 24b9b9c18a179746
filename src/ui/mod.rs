use std::num::NonZeroU32;
use std::sync::Arc;
use softbuffer::Surface;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::keyboard::PhysicalKey;
use winit::window::{Fullscreen, Window, WindowId};

use crate::ui::input::{map_key, map_wheel, Modifiers};
use crate::ui::state::{Command, ViewerState};

pub mod input;
pub mod render;
pub mod state;

/// Scroll pixels per wheel line on touchpads reporting pixel deltas.
const PIXELS_PER_LINE: f64 = 40.0;

/// Mode to switch to from the window's current state. The window manager can
/// leave fullscreen behind our back, so the window is asked every time.
fn toggled_fullscreen(is_fullscreen: bool) -> Option<Fullscreen> {
    (!is_fullscreen).then_some(Fullscreen::Borderless(None))
}

// ---------------------------------------------------------------------------
// Application handler (winit 0.30 style)
// ---------------------------------------------------------------------------

pub struct App {
    pub state: ViewerState,
    pub window: Option<Arc<Window>>,
    pub context: Option<softbuffer::Context<Arc<Window>>>,
    pub surface: Option<Surface<Arc<Window>, Arc<Window>>>,
    pub modifiers: Modifiers,
    pub initial_size: LogicalSize<u32>,
}

impl App {
    pub fn new(state: ViewerState, initial_size: LogicalSize<u32>) -> Self {
        Self {
            state,
            window: None,
            context: None,
            surface: None,
            modifiers: Modifiers::default(),
            initial_size,
        }
    }

    fn request_redraw(&self) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }

    fn run_command(&mut self, command: Command, event_loop: &ActiveEventLoop) {
        match command {
            Command::None => {}
            Command::Redraw => self.request_redraw(),
            Command::Retitle => {
                if let Some(ref window) = self.window {
                    window.set_title(&self.state.title());
                }
                self.request_redraw();
            }
            Command::ToggleFullscreen => {
                if let Some(ref window) = self.window {
                    let target = toggled_fullscreen(window.fullscreen().is_some());
                    window.set_cursor_visible(target.is_none());
                    window.set_fullscreen(target);
                }
                self.request_redraw();
            }
            Command::Quit => event_loop.exit(),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attrs = Window::default_attributes()
            .with_title(self.state.title())
            .with_inner_size(self.initial_size)
            .with_maximized(true);

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };
        let surface = softbuffer::Context::new(Arc::clone(&window)).and_then(|context| {
            let surface = Surface::new(&context, Arc::clone(&window))?;
            Ok((context, surface))
        });
        let (context, surface) = match surface {
            Ok(pair) => pair,
            Err(e) => {
                log::error!("Failed to create drawing surface: {}", e);
                event_loop.exit();
                return;
            }
        };

        window.request_redraw();
        self.window = Some(window);
        self.context = Some(context);
        self.surface = Some(surface);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.state.resize(width, height);
                self.request_redraw();
            }

            WindowEvent::ModifiersChanged(mods) => {
                self.modifiers = mods.state().into();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return;
                }
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                if let Some(action) = map_key(code, self.modifiers) {
                    let command = self.state.dispatch(action);
                    self.run_command(command, event_loop);
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    if state == ElementState::Pressed {
                        self.state.begin_drag();
                    } else {
                        self.state.end_drag();
                    }
                }
            }

            WindowEvent::CursorMoved {
                position: PhysicalPosition { x, y },
                ..
            } => {
                if self.state.cursor_moved(x, y) {
                    self.request_redraw();
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let (dx, dy) = match delta {
                    MouseScrollDelta::LineDelta(x, y) => (x, y),
                    MouseScrollDelta::PixelDelta(PhysicalPosition { x, y }) => {
                        ((x / PIXELS_PER_LINE) as f32, (y / PIXELS_PER_LINE) as f32)
                    }
                };
                if let Some(action) = map_wheel(dx, dy) {
                    let command = self.state.dispatch(action);
                    self.run_command(command, event_loop);
                }
            }

            WindowEvent::RedrawRequested => {
                let Some(window) = self.window.as_ref() else {
                    return;
                };
                if let Some(ref mut surface) = self.surface {
                    let size = window.inner_size();
                    let fb_w = NonZeroU32::new(size.width).unwrap_or(NonZeroU32::MIN);
                    let fb_h = NonZeroU32::new(size.height).unwrap_or(NonZeroU32::MIN);
                    if let Err(e) = surface.resize(fb_w, fb_h) {
                        log::warn!("Failed to resize surface: {}", e);
                        return;
                    }
                    let (fb_w, fb_h) = (fb_w.get(), fb_h.get());
                    match surface.buffer_mut() {
                        Ok(mut buffer) => {
                            self.state.render(&mut buffer, fb_w, fb_h);
                            if let Err(e) = buffer.present() {
                                log::warn!("Failed to present frame: {}", e);
                            }
                        }
                        Err(e) => log::warn!("Failed to map frame buffer: {}", e),
                    }
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);
    }
}
