use std::sync::Arc;
use std::time::Instant;

use rand::rngs::ThreadRng;
use vello::kurbo::{Affine, Size};
use vello::Scene;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::keyboard::Key;
use winit::window::{Window, WindowId};

use crate::background::BackgroundAnimator;
use crate::config::SiteConfig;
use crate::gpu::GpuRenderer;
use crate::home::{HomeAction, HomeScreen};
use crate::schedule::Scheduler;
use crate::text::TextSystem;
use crate::theme::{FilePreferences, MemoryPreferences, PreferenceStore, ThemeStore, WindowRoot};
use crate::ui::{DrawContext, HitSink, Palette, Rect};
use crate::viewport::ResizeSignal;

/// Top-level application state; the root scope of the theme store.
pub struct App<'window> {
    gpu: GpuRenderer<'window>,
    text_system: TextSystem,
    site: SiteConfig,
    theme: ThemeStore,
    scheduler: Scheduler,
    viewport: ResizeSignal,
    background: Option<BackgroundAnimator<ThreadRng>>,
    home: HomeScreen,
    hits: HitSink,
    window: Option<Arc<Window>>,
    cursor_position: (f32, f32),
    started: Instant,
    last_frame: Instant,
}

impl App<'_> {
    pub fn new(site: SiteConfig) -> Self {
        let theme = ThemeStore::initialize(open_preferences());
        let home = HomeScreen::new(&site, theme.handle());
        let now = Instant::now();

        Self {
            gpu: GpuRenderer::new(),
            text_system: TextSystem::new(),
            site,
            theme,
            scheduler: Scheduler::new(),
            viewport: ResizeSignal::new(Size::ZERO),
            background: None,
            home,
            hits: HitSink::new(),
            window: None,
            cursor_position: (0.0, 0.0),
            started: now,
            last_frame: now,
        }
    }

    fn logical_size(window: &Window) -> Size {
        let logical = window.inner_size().to_logical::<f64>(window.scale_factor());
        Size::new(logical.width, logical.height)
    }

    fn handle_home_action(&mut self, action: HomeAction) {
        if let Err(error) = self.home.handle_action(action) {
            log::error!("Home action failed: {error}");
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn redraw(&mut self) {
        let Some(window) = self.window.clone() else {
            return;
        };
        if !self.gpu.is_active() {
            return;
        }

        let now = Instant::now();
        let dt = now.duration_since(self.last_frame);
        self.last_frame = now;

        if let Some(background) = self.background.as_mut() {
            background.update(now);
        }
        if let Err(error) = self.home.advance(dt) {
            log::error!("Home animation error: {error}");
        }

        let scale = window.scale_factor();
        let size = Self::logical_size(&window);
        let palette = Palette::for_mode(self.theme.current());
        let animate = !self.theme.transitions_suppressed();
        let mut logical_scene = Scene::new();
        self.hits.clear();

        {
            let mut ctx = DrawContext {
                scene: &mut logical_scene,
                text: &mut self.text_system,
                palette: &palette,
            };

            if let Some(background) = &self.background {
                if let Err(error) = background.paint(&mut ctx, now - self.started, animate) {
                    log::error!("Background paint error: {error}");
                }
            }

            let bounds = Rect::new(0.0, 0.0, size.width as f32, size.height as f32);
            if let Err(error) = self.home.render(&mut ctx, &mut self.hits, bounds) {
                log::error!("Home layout error: {error}");
            }
        }

        let mut scene = Scene::new();
        scene.append(&logical_scene, Some(Affine::scale(scale)));

        if let Err(error) = self.gpu.render(&scene, palette.background) {
            log::error!("Render error: {error}");
        }
        self.theme.end_frame();
    }
}

/// Falls back to session-only storage when there is no config directory or the file cannot be read.
fn open_preferences() -> Box<dyn PreferenceStore> {
    match FilePreferences::open_default() {
        Ok(prefs) => Box::new(prefs),
        Err(error) => {
            log::warn!("Theme preference will not persist: {error}");
            Box::new(MemoryPreferences::new())
        }
    }
}

impl ApplicationHandler for App<'_> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let window = match self.gpu.resume(event_loop, &self.site.window_title) {
            Ok(window) => window,
            Err(error) => {
                log::error!("Failed to create window: {error}");
                event_loop.exit();
                return;
            }
        };

        self.theme.attach_root(Box::new(WindowRoot::new(window.clone())));
        self.viewport.emit(Self::logical_size(&window));

        if self.background.is_none() {
            self.background = Some(BackgroundAnimator::mount(
                self.theme.handle(),
                &self.scheduler,
                &mut self.viewport,
                rand::rng(),
                Instant::now(),
            ));
        }

        window.request_redraw();
        self.window = Some(window);
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        self.background = None;
        self.theme.detach_root();
        self.gpu.suspend();
        self.window = None;
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = &self.window else {
            event_loop.set_control_flow(ControlFlow::Wait);
            return;
        };

        if self.home.is_animating() || self.theme.transitions_suppressed() {
            window.request_redraw();
        }

        match self.scheduler.next_deadline() {
            Some(deadline) if deadline <= Instant::now() => {
                window.request_redraw();
                event_loop.set_control_flow(ControlFlow::Wait);
            }
            Some(deadline) => event_loop.set_control_flow(ControlFlow::WaitUntil(deadline)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(physical) => {
                self.gpu.resize(physical.width, physical.height);
                if let Some(window) = self.window.clone() {
                    self.viewport.emit(Self::logical_size(&window));
                    window.request_redraw();
                }
            }

            WindowEvent::RedrawRequested => self.redraw(),

            WindowEvent::CursorMoved { position, .. } => {
                let scale = self
                    .window
                    .as_ref()
                    .map(|window| window.scale_factor())
                    .unwrap_or(1.0);
                let logical = position.to_logical::<f32>(scale);
                self.cursor_position = (logical.x, logical.y);
            }

            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                if let Some(hit_id) = self
                    .hits
                    .test(self.cursor_position.0, self.cursor_position.1)
                {
                    self.handle_home_action(HomeAction::from_hit(hit_id));
                }
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Character(ref ch),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } if ch.eq_ignore_ascii_case("t") => {
                self.handle_home_action(HomeAction::ToggleTheme);
            }

            _ => {}
        }
    }
}
