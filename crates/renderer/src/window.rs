use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tracing::{error, info, warn};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowBuilder};

use crate::gpu::GpuState;
use crate::runtime::{time_source_for_policy, FrameClock};
use crate::types::RendererConfig;
use crate::view::ViewState;
use crate::viewport::Viewport;

/// Window-side application object: the GPU program plus the state keys mutate.
pub(crate) struct WindowState {
    window: Arc<Window>,
    gpu: GpuState,
    view: ViewState,
    clock: FrameClock,
}

/// What the event loop should do after a frame attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameOutcome {
    Continue,
    Exit,
}

impl WindowState {
    pub(crate) fn new(window: Arc<Window>, config: &RendererConfig) -> Result<Self> {
        let gpu = GpuState::new(window.clone(), config)?;
        Ok(Self {
            window,
            gpu,
            view: config.view,
            clock: FrameClock::new(time_source_for_policy(&config.policy)),
        })
    }

    pub(crate) fn window(&self) -> &Window {
        self.window.as_ref()
    }

    pub(crate) fn change_size(&mut self, size: PhysicalSize<u32>) {
        self.gpu.resize(Viewport::from(size));
    }

    /// Feeds a keyboard event into the view; returns whether anything changed.
    pub(crate) fn keyboard(&mut self, event: &KeyEvent, is_synthetic: bool) -> bool {
        match key_char_from_input(event.state, &event.logical_key, is_synthetic) {
            Some(key) => self.view.handle_key(key),
            None => false,
        }
    }

    /// Samples the clock (unless paused) and draws one frame.
    fn render_scene(&mut self) -> FrameOutcome {
        let elapsed = self.clock.sample(self.view.paused);
        match self.gpu.render(&self.view, elapsed) {
            Ok(()) => FrameOutcome::Continue,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.gpu.reconfigure();
                FrameOutcome::Continue
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("surface out of memory; closing window");
                FrameOutcome::Exit
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("surface timeout; retrying next frame");
                FrameOutcome::Continue
            }
            Err(other) => {
                warn!(error = ?other, "surface error; retrying next frame");
                FrameOutcome::Continue
            }
        }
    }

    fn shutdown(self) {
        let uniforms = *self.gpu.uniforms();
        info!(
            c_re = uniforms.c[0],
            c_im = uniforms.c[1],
            "closing Julia viewer"
        );
        self.gpu.shutdown();
    }
}

/// Opens the window, runs the event loop until it closes, then tears down.
pub(crate) fn run(config: RendererConfig) -> Result<()> {
    let event_loop = EventLoop::new().map_err(|err| anyhow!("failed to create event loop: {err}"))?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let (width, height) = config.surface_size;
    // Kept hidden until the GPU program is ready so a failed setup never flashes a window.
    let window = WindowBuilder::new()
        .with_title(config.title.as_str())
        .with_inner_size(PhysicalSize::new(width, height))
        .with_visible(false)
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create window: {err}"))?;
    let window = Arc::new(window);

    let mut state =
        WindowState::new(window.clone(), &config).context("failed to initialise Julia renderer")?;
    window.set_visible(true);
    // Setup time should not count towards the animation.
    state.clock.restart();
    window.request_redraw();
    info!(width, height, title = %config.title, "window ready");

    let run_result = event_loop.run(|event, elwt| match event {
        Event::WindowEvent { window_id, event } if window_id == state.window().id() => match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => elwt.exit(),
            WindowEvent::Resized(size) => {
                state.change_size(size);
                state.window().request_redraw();
            }
            WindowEvent::KeyboardInput {
                event,
                is_synthetic,
                ..
            } => {
                if state.keyboard(&event, is_synthetic) {
                    state.window().request_redraw();
                }
            }
            WindowEvent::RedrawRequested => {
                if state.render_scene() == FrameOutcome::Exit {
                    elwt.exit();
                    return;
                }
                // Continuous animation: every frame schedules the next one.
                if state.gpu.viewport().is_drawable() {
                    state.window().request_redraw();
                }
            }
            _ => {}
        },
        _ => {}
    });

    state.shutdown();
    run_result.map_err(|err| anyhow!("window event loop error: {err}"))
}

/// Character a key press maps to, if any.
///
/// Repeats count as presses. Synthetic presses, which winit emits for keys
/// already held when the window gains focus, are ignored.
fn key_char_from_input(state: ElementState, key: &Key, is_synthetic: bool) -> Option<char> {
    if state != ElementState::Pressed || is_synthetic {
        return None;
    }
    key_char(key)
}

fn key_char(key: &Key) -> Option<char> {
    match key {
        Key::Character(value) => {
            let mut chars = value.chars();
            let ch = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            Some(ch)
        }
        Key::Named(NamedKey::Space) => Some(' '),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_characters_map_through() {
        for ch in ['+', '-', '[', ']', 'w', 'a', 's', 'd', '7', '1'] {
            assert_eq!(key_char(&Key::Character(ch.to_string().into())), Some(ch));
        }
    }

    #[test]
    fn space_maps_from_named_and_character_forms() {
        assert_eq!(key_char(&Key::Named(NamedKey::Space)), Some(' '));
        assert_eq!(key_char(&Key::Character(" ".into())), Some(' '));
    }

    #[test]
    fn composed_and_named_keys_are_ignored() {
        assert_eq!(key_char(&Key::Character("ab".into())), None);
        assert_eq!(key_char(&Key::Character("".into())), None);
        assert_eq!(key_char(&Key::Named(NamedKey::Escape)), None);
        assert_eq!(key_char(&Key::Named(NamedKey::ArrowUp)), None);
    }

    #[test]
    fn only_real_presses_reach_the_view() {
        let key = Key::Character("w".into());
        assert_eq!(key_char_from_input(ElementState::Pressed, &key, false), Some('w'));
        assert_eq!(key_char_from_input(ElementState::Pressed, &key, true), None);
        assert_eq!(key_char_from_input(ElementState::Released, &key, false), None);
        let space = Key::Named(NamedKey::Space);
        assert_eq!(key_char_from_input(ElementState::Pressed, &space, true), None);
    }

    #[test]
    fn mapped_characters_drive_the_view() {
        let mut view = ViewState::default();
        let key = key_char(&Key::Character("]".into())).expect("mapped");
        assert!(view.handle_key(key));
        assert!((view.zoom - 1.1).abs() < 1e-6);
    }
}
