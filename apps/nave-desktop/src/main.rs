mod audio;
mod host;
mod hud;

use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use nave_assets::{BuiltinLoader, CHAPEL_ASSETS, GeometryLoader, JsonModelLoader};
use nave_common::WalkConfig;
use nave_input::{Action, InputEvent, InputRouter};
use nave_kernel::{MonotonicClock, Session};
use nave_render::{ContentArea, FrameSource, NullRenderer, RenderLoop};
use nave_render_wgpu::{SurfaceTarget, WgpuRenderer};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use host::WindowHost;

#[derive(Parser)]
#[command(name = "nave-desktop", about = "Walk through the ruined chapel")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Session config (JSON). Defaults apply for missing fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the JSON models; overrides the config
    #[arg(long)]
    models: Option<PathBuf>,

    /// Directory holding the looped sound tracks
    #[arg(long, default_value = "./Sounds")]
    sounds: PathBuf,

    /// Use procedural stand-in geometry instead of model files
    #[arg(long)]
    builtin: bool,
}

struct Gpu {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn init(window: Arc<Window>, egui_ctx: &EguiContext) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no compatible GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("nave_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(&device, surface_format, config.width, config.height);

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    /// Reconfigure the surface if the window size changed. Returns false
    /// while the window has no area.
    fn sync_size(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        if (width, height) != (self.config.width, self.config.height) {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
        true
    }
}

struct App {
    session: Session,
    frame_loop: RenderLoop,
    router: InputRouter,
    host: Option<WindowHost>,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl App {
    fn new(session: Session) -> Self {
        let frame_loop = RenderLoop::new(&session);
        Self {
            session,
            frame_loop,
            router: InputRouter::default(),
            host: None,
            gpu: None,
            egui_ctx: EguiContext::default(),
        }
    }

    fn handle(&mut self, event: InputEvent) {
        let action = self.router.route(event);
        match action {
            Action::CapturePointer => {
                if let Some(host) = &self.host {
                    host.grab_pointer();
                }
            }
            Action::ReleasePointer => {
                if let Some(host) = &self.host {
                    host.release_pointer();
                }
            }
            _ => {}
        }
        self.session.apply(action);
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Self {
            session,
            frame_loop,
            host,
            gpu,
            egui_ctx,
            ..
        } = self;
        let (Some(host), Some(gpu)) = (host.as_mut(), gpu.as_mut()) else {
            return;
        };

        let size = host.content_size();
        let surface = if gpu.sync_size(size.width, size.height) {
            match gpu.surface.get_current_texture() {
                Ok(t) => Some(t),
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    gpu.surface.configure(&gpu.device, &gpu.config);
                    None
                }
                Err(e) => {
                    tracing::error!("surface error: {e}");
                    None
                }
            }
        } else {
            None
        };

        // No surface this frame: the session still ticks, nothing is drawn.
        let Some(output) = surface else {
            if let Err(e) = frame_loop.tick(session, &mut NullRenderer, host) {
                tracing::error!("frame loop stopped: {e}");
                event_loop.exit();
            }
            return;
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut target = SurfaceTarget {
            renderer: &mut gpu.renderer,
            device: &gpu.device,
            queue: &gpu.queue,
            view: &view,
        };
        if let Err(e) = frame_loop.tick(session, &mut target, host) {
            tracing::error!("frame loop stopped: {e}");
            event_loop.exit();
            return;
        }

        let raw_input = gpu.egui_winit.take_egui_input(host.window());
        let full_output = egui_ctx.run(raw_input, |ctx| {
            hud::draw(ctx, session, frame_loop.timer());
        });
        gpu.egui_winit
            .handle_platform_output(host.window(), full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            gpu.egui_renderer
                .update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        gpu.egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            gpu.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            gpu.egui_renderer.free_texture(id);
        }

        output.present();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.host.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("Nave")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                tracing::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        match Gpu::init(window.clone(), &self.egui_ctx) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => {
                tracing::error!("failed to initialize GPU: {e:#}");
                event_loop.exit();
                return;
            }
        }
        let mut host = WindowHost::new(window);
        host.request_next_frame();
        self.host = Some(host);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(gpu), Some(host)) = (&mut self.gpu, &self.host) {
            let response = gpu.egui_winit.on_window_event(host.window(), &event);
            if response.consumed && !self.router.is_captured() {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!(summary = %self.session.summary(), "closing");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.sync_size(new_size.width, new_size.height);
                }
            }
            WindowEvent::Focused(false) => self.handle(InputEvent::CaptureLost),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => {
                let key = host::map_key(code);
                match state {
                    ElementState::Pressed if !repeat => self.handle(InputEvent::KeyDown(key)),
                    ElementState::Pressed => {}
                    ElementState::Released => self.handle(InputEvent::KeyUp(key)),
                }
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: ElementState::Pressed,
                ..
            } => self.handle(InputEvent::Click),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.handle(InputEvent::PointerMotion {
                dx: delta.0 as f32,
                dy: delta.1 as f32,
            });
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    tracing::info!("nave-desktop starting");

    let mut config = match &cli.config {
        Some(path) => WalkConfig::load(path)?,
        None => WalkConfig::default(),
    };
    if let Some(models) = cli.models {
        config.model_root = models;
    }

    let loader: Arc<dyn GeometryLoader> = if cli.builtin {
        Arc::new(BuiltinLoader::new())
    } else if config.model_root.is_dir() {
        Arc::new(JsonModelLoader::new(&config.model_root))
    } else {
        tracing::warn!(
            root = %config.model_root.display(),
            "model directory missing, using built-in geometry"
        );
        Arc::new(BuiltinLoader::new())
    };

    let audio = audio::open_or_silent(&cli.sounds);
    let mut session = Session::new(config, Box::new(MonotonicClock::start()), audio);
    session.start_loads(loader, &CHAPEL_ASSETS)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(session);
    event_loop.run_app(&mut app)?;

    Ok(())
}
