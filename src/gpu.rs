use std::sync::Arc;

use vello::peniko::Color;
use vello::util::{DeviceHandle, RenderContext, RenderSurface};
use vello::{AaConfig, AaSupport, RenderParams, Renderer, RendererOptions, Scene};
use winit::dpi::LogicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

use crate::error::FolioError;

const INITIAL_SIZE: LogicalSize<u32> = LogicalSize::new(1280, 800);
const MIN_SIZE: LogicalSize<u32> = LogicalSize::new(480, 360);

/// Whether the wgpu surface is currently attached to a window.
enum SurfaceState<'window> {
    Suspended,
    Active {
        window: Arc<Window>,
        surface: Box<RenderSurface<'window>>,
    },
}

/// Owns the wgpu device, the vello renderer, and the current surface.
///
/// The renderer outlives suspend/resume cycles; only the surface is rebuilt.
pub struct GpuRenderer<'window> {
    render_context: RenderContext,
    renderer: Option<Renderer>,
    state: SurfaceState<'window>,
}

impl Default for GpuRenderer<'_> {
    fn default() -> Self {
        Self::new()
    }
}

fn window_attributes(title: &str) -> WindowAttributes {
    Window::default_attributes()
        .with_title(title)
        .with_inner_size(INITIAL_SIZE)
        .with_min_inner_size(MIN_SIZE)
}

impl<'window> GpuRenderer<'window> {
    /// Starts suspended; call [`GpuRenderer::resume`] once the event loop is active.
    pub fn new() -> Self {
        Self {
            render_context: RenderContext::new(),
            renderer: None,
            state: SurfaceState::Suspended,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SurfaceState::Active { .. })
    }

    /// Opens the window and creates its surface.
    pub fn resume(
        &mut self,
        event_loop: &ActiveEventLoop,
        title: &str,
    ) -> Result<Arc<Window>, FolioError> {
        let window = event_loop
            .create_window(window_attributes(title))
            .map(Arc::new)
            .map_err(|error| FolioError::Surface(error.to_string()))?;

        let size = window.inner_size();
        let surface = pollster::block_on(self.render_context.create_surface(
            window.clone(),
            size.width.max(1),
            size.height.max(1),
            wgpu::PresentMode::AutoVsync,
        ))
        .map_err(|error| FolioError::Surface(error.to_string()))?;
        self.ensure_renderer(surface.dev_id)?;

        log::info!("Window created at {}x{}", size.width, size.height);
        self.state = SurfaceState::Active {
            window: window.clone(),
            surface: Box::new(surface),
        };
        Ok(window)
    }

    fn ensure_renderer(&mut self, dev_id: usize) -> Result<(), FolioError> {
        if self.renderer.is_some() {
            return Ok(());
        }
        let device = &self.render_context.devices[dev_id];
        let options = RendererOptions {
            antialiasing_support: AaSupport::area_only(),
            ..Default::default()
        };
        let renderer = Renderer::new(&device.device, options)
            .map_err(|error| FolioError::Renderer(error.to_string()))?;
        self.renderer = Some(renderer);
        Ok(())
    }

    /// Reconfigures the surface; zero-area sizes and a suspended surface are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if let SurfaceState::Active { surface, .. } = &mut self.state {
            self.render_context.resize_surface(surface, width, height);
        }
    }

    /// Renders `scene` over `background` and presents it.
    ///
    /// Does nothing while suspended. A lost or outdated surface is reconfigured
    /// and the frame skipped.
    pub fn render(&mut self, scene: &Scene, background: Color) -> Result<(), FolioError> {
        let (SurfaceState::Active { surface, .. }, Some(renderer)) =
            (&mut self.state, self.renderer.as_mut())
        else {
            return Ok(());
        };

        let frame = match surface.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (width, height) = (surface.config.width, surface.config.height);
                log::debug!("Surface out of date, reconfiguring at {width}x{height}");
                self.render_context.resize_surface(surface, width, height);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::debug!("Timed out waiting for a surface texture; skipping frame");
                return Ok(());
            }
            Err(error) => return Err(FolioError::Surface(error.to_string())),
        };

        let device = &self.render_context.devices[surface.dev_id];
        let params = RenderParams {
            base_color: background,
            width: surface.config.width,
            height: surface.config.height,
            antialiasing_method: AaConfig::Area,
        };
        renderer
            .render_to_texture(
                &device.device,
                &device.queue,
                scene,
                &surface.target_view,
                &params,
            )
            .map_err(|error| FolioError::Renderer(error.to_string()))?;

        present(device, surface, frame);
        Ok(())
    }

    /// Drops the surface when the window goes away.
    pub fn suspend(&mut self) {
        if let SurfaceState::Active { window, .. } = &self.state {
            log::debug!("Releasing surface for window {:?}", window.id());
        }
        self.state = SurfaceState::Suspended;
    }
}

/// Copies the offscreen target onto the swapchain texture and shows it.
fn present(device: &DeviceHandle, surface: &RenderSurface<'_>, frame: wgpu::SurfaceTexture) {
    let frame_view = frame
        .texture
        .create_view(&wgpu::TextureViewDescriptor::default());
    let mut encoder = device
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("present"),
        });
    surface
        .blitter
        .copy(&device.device, &mut encoder, &surface.target_view, &frame_view);
    device.queue.submit(Some(encoder.finish()));
    frame.present();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_attributes_carry_title_and_minimum_size() {
        let attributes = window_attributes("Holofolio");

        assert_eq!(attributes.title, "Holofolio");
        assert_eq!(attributes.inner_size, Some(INITIAL_SIZE.into()));
        assert_eq!(attributes.min_inner_size, Some(MIN_SIZE.into()));
    }

    #[test]
    fn suspended_renderer_ignores_frames_and_resizes() {
        let mut gpu = GpuRenderer::new();
        assert!(!gpu.is_active());

        gpu.resize(800, 600);
        gpu.resize(0, 0);
        assert!(gpu
            .render(&Scene::new(), Color::from_rgb8(0, 0, 0))
            .is_ok());

        gpu.suspend();
        assert!(!gpu.is_active());
    }
}
