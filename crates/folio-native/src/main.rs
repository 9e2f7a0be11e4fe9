use rand::rngs::StdRng;
use rand::SeedableRng;
use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{Key, NamedKey},
    window::WindowBuilder,
};

use folio_core::{
    render_snow, FieldConfig, FrameScheduler, ParticleBackground, Pixmap, Rgba, SnowConfig,
    SnowField, Viewport,
};

mod layers;
use layers::GpuState;

const BACKGROUND: Rgba = Rgba::new(10.0 / 255.0, 10.0 / 255.0, 10.0 / 255.0, 1.0);

/// Frame requests become winit redraw requests on the next `AboutToWait`.
#[derive(Default)]
struct RedrawRequest {
    pending: bool,
}

impl FrameScheduler for RedrawRequest {
    fn request_frame(&mut self) {
        self.pending = true;
    }

    fn cancel(&mut self) {
        self.pending = false;
    }
}

/// CPU side of the preview: the particle background and the snow overlay,
/// each painted into its own pixmap.
struct Preview {
    background: ParticleBackground<RedrawRequest>,
    particles: Pixmap,
    snow: Option<SnowField>,
    snow_layer: Pixmap,
    rng: StdRng,
    scale: f32,
    reduced_motion: bool,
}

fn pixmap(width: u32, height: u32, scale: f32) -> anyhow::Result<Pixmap> {
    Ok(Pixmap::new(width.max(1), height.max(1))?.with_scale(scale))
}

impl Preview {
    fn new(size: winit::dpi::PhysicalSize<u32>, scale: f32) -> anyhow::Result<Self> {
        let mut preview = Self {
            background: ParticleBackground::new(
                FieldConfig::default(),
                RedrawRequest::default(),
                StdRng::from_entropy(),
            ),
            particles: pixmap(size.width, size.height, scale)?,
            snow: None,
            snow_layer: pixmap(size.width, size.height, scale)?,
            rng: StdRng::from_entropy(),
            scale,
            reduced_motion: false,
        };
        let viewport = preview.viewport(size);
        preview
            .background
            .mount(viewport, false, &mut preview.particles);
        preview.rebuild_snow(viewport);
        Ok(preview)
    }

    fn viewport(&self, size: winit::dpi::PhysicalSize<u32>) -> Viewport {
        Viewport::new(
            size.width as f32 / self.scale,
            size.height as f32 / self.scale,
        )
    }

    fn rebuild_snow(&mut self, viewport: Viewport) {
        match self.snow.as_mut() {
            Some(snow) => snow.resize(viewport),
            None => match SnowField::new(SnowConfig::default(), viewport, &mut self.rng) {
                Ok(snow) => self.snow = Some(snow),
                Err(e) => log::info!("snow deferred: {e}"),
            },
        }
        if let Some(snow) = &self.snow {
            render_snow(&mut self.snow_layer, snow);
        }
    }

    fn resize(&mut self, size: winit::dpi::PhysicalSize<u32>, scale: f32) -> anyhow::Result<()> {
        self.scale = scale;
        self.particles = pixmap(size.width, size.height, scale)?;
        self.snow_layer = pixmap(size.width, size.height, scale)?;
        let viewport = self.viewport(size);
        self.background.resize(viewport, &mut self.particles);
        self.rebuild_snow(viewport);
        Ok(())
    }

    fn toggle_reduced_motion(&mut self) {
        self.reduced_motion = !self.reduced_motion;
        self.background
            .set_reduced_motion(self.reduced_motion, &mut self.particles);
    }

    /// Same teardown as the web unmount: cancel the frame driver, release the
    /// pool and stop the snow.
    fn shutdown(&mut self) {
        self.background.unmount();
        if self.snow.take().is_some() {
            log::info!("snow unmounted");
        }
    }

    /// True while either layer wants another frame.
    fn wants_frame(&self) -> bool {
        self.background.scheduler().pending || (!self.reduced_motion && self.snow.is_some())
    }

    /// Advances whatever is animating. Returns false when nothing changed.
    fn step(&mut self) -> bool {
        let mut changed = false;
        if self.background.scheduler().pending {
            self.background.scheduler_mut().pending = false;
            self.background.frame(&mut self.particles);
            changed = true;
        }
        // snow has no static frame; it simply holds still under reduced motion
        if !self.reduced_motion {
            if let Some(snow) = self.snow.as_mut() {
                snow.step(&mut self.rng);
                render_snow(&mut self.snow_layer, snow);
                changed = true;
            }
        }
        changed
    }
}

fn upload_layers(gpu: &mut GpuState<'_>, preview: &Preview) {
    gpu.upload(0, &preview.particles.to_image());
    gpu.upload(1, &preview.snow_layer.to_image());
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("folio background (native preview)")
        .build(&event_loop)?;

    let mut preview = Preview::new(window.inner_size(), window.scale_factor() as f32)?;
    let mut state = pollster::block_on(GpuState::new(&window, BACKGROUND.to_linear()))?;
    upload_layers(&mut state, &preview);
    log::info!("native preview running; press R to toggle reduced motion");

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => {
                preview.shutdown();
                elwt.exit();
            }
            WindowEvent::Resized(size) => {
                state.resize(size);
                if let Err(e) = preview.resize(size, state.window.scale_factor() as f32) {
                    log::warn!("resize skipped: {e}");
                }
                upload_layers(&mut state, &preview);
                state.window.request_redraw();
            }
            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f32>(state.window.scale_factor());
                preview.background.pointer_moved(logical.x, logical.y);
            }
            WindowEvent::CursorLeft { .. } => preview.background.pointer_left(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match logical_key.as_ref() {
                Key::Character(c) if c.eq_ignore_ascii_case("r") => {
                    preview.toggle_reduced_motion();
                    upload_layers(&mut state, &preview);
                    state.window.request_redraw();
                }
                Key::Named(NamedKey::Escape) => {
                    preview.shutdown();
                    elwt.exit();
                }
                _ => {}
            },
            WindowEvent::RedrawRequested => match state.render() {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    state.resize(state.window.inner_size())
                }
                Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                Err(e) => log::warn!("frame dropped: {e:?}"),
            },
            _ => {}
        },
        Event::AboutToWait => {
            if preview.wants_frame() && preview.step() {
                upload_layers(&mut state, &preview);
                state.window.request_redraw();
            }
        }
        _ => {}
    })?;
    Ok(())
}
