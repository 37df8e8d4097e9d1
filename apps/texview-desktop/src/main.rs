use anyhow::Result;
use clap::Parser;
use egui::Context as EguiContext;
use std::sync::Arc;
use std::time::Instant;
use texview_channels::{Background, ChannelKind, ChannelValue};
use texview_render::{ChannelPayload, PreviewEvent, PreviewSession};
use texview_render_wgpu::PreviewRenderer;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "texview-desktop", about = "PBR material texture previewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Texture file to load into the albedo channel at startup
    #[arg(long)]
    albedo: Option<String>,

    /// Image file to use as the preview background at startup
    #[arg(long)]
    background: Option<String>,
}

/// Per-channel UI scratch state: the path field contents and the last
/// constant shown, so widgets stay stable while the user types.
struct ChannelUi {
    path: String,
    value: ChannelValue,
}

/// Application state around the core session.
struct AppState {
    session: PreviewSession,
    channel_ui: Vec<ChannelUi>,
    background_path: String,
    background_color: [u8; 3],
    last_error: Option<String>,
    dragging: bool,
    last_frame: Instant,
}

impl AppState {
    fn new() -> Self {
        let background_color = match Background::DEFAULT_COLOR {
            ChannelValue::Rgb(rgb) => rgb,
            ChannelValue::Scalar(v) => [v; 3],
        };
        Self {
            session: PreviewSession::new(1280, 720),
            channel_ui: ChannelKind::ALL
                .iter()
                .map(|kind| ChannelUi {
                    path: String::new(),
                    value: kind.neutral(),
                })
                .collect(),
            background_path: String::new(),
            background_color,
            last_error: None,
            dragging: false,
            last_frame: Instant::now(),
        }
    }

    /// Push one event into the session, keeping the last load failure for
    /// the banner.
    fn push(&mut self, event: PreviewEvent) {
        if let Err(e) = self.session.handle(event) {
            tracing::warn!("{e}");
            self.last_error = Some(e.to_string());
        }
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        egui::SidePanel::left("channels")
            .default_width(300.0)
            .show(ctx, |ui| {
                ui.heading("Material Channels");
                ui.separator();

                if let Some(err) = &self.last_error {
                    ui.colored_label(egui::Color32::LIGHT_RED, err.clone());
                    if ui.button("Dismiss").clicked() {
                        self.last_error = None;
                    }
                    ui.separator();
                }

                let mut events = Vec::new();
                for kind in ChannelKind::ALL {
                    let slot = kind.slot();
                    let state = &mut self.channel_ui[slot];
                    ui.label(kind.label());

                    match &mut state.value {
                        ChannelValue::Rgb(rgb) => {
                            if ui.color_edit_button_srgb(rgb).changed() {
                                events.push(PreviewEvent::ChannelChanged {
                                    channel: kind,
                                    payload: ChannelPayload::Value(ChannelValue::Rgb(*rgb)),
                                });
                            }
                        }
                        ChannelValue::Scalar(v) => {
                            if ui
                                .add(egui::Slider::new(v, 0..=255))
                                .changed()
                            {
                                events.push(PreviewEvent::ChannelChanged {
                                    channel: kind,
                                    payload: ChannelPayload::Value(ChannelValue::Scalar(*v)),
                                });
                            }
                        }
                    }

                    ui.horizontal(|ui| {
                        ui.text_edit_singleline(&mut state.path);
                        if ui.button("Load").clicked() && !state.path.is_empty() {
                            events.push(PreviewEvent::ChannelChanged {
                                channel: kind,
                                payload: ChannelPayload::File(state.path.clone().into()),
                            });
                        }
                    });
                    if self.session.channels().fill_value(kind).is_none() {
                        ui.small("file-backed");
                    }
                    ui.add_space(4.0);
                }

                ui.separator();
                ui.label("Background");
                if ui.color_edit_button_srgb(&mut self.background_color).changed() {
                    events.push(PreviewEvent::BackgroundChanged {
                        payload: ChannelPayload::Value(ChannelValue::Rgb(self.background_color)),
                    });
                }
                ui.horizontal(|ui| {
                    ui.text_edit_singleline(&mut self.background_path);
                    if ui.button("Load").clicked() && !self.background_path.is_empty() {
                        events.push(PreviewEvent::BackgroundChanged {
                            payload: ChannelPayload::File(self.background_path.clone().into()),
                        });
                    }
                });
                if self.session.background().fill_value().is_none() {
                    ui.small("file-backed");
                }

                for event in events {
                    self.push(event);
                }

                ui.separator();
                ui.small("LMB drag: orbit | Wheel: zoom");
            });
    }
}

struct GpuApp {
    state: AppState,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    config: Option<wgpu::SurfaceConfiguration>,
    renderer: Option<PreviewRenderer>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
}

impl GpuApp {
    fn new(state: AppState) -> Self {
        Self {
            state,
            window: None,
            surface: None,
            device: None,
            queue: None,
            config: None,
            renderer: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("texview")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs).expect("create window"));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .expect("create surface");

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .expect("find adapter");

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("texview_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .expect("create device");

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        self.state.push(PreviewEvent::ViewportResized {
            width: config.width,
            height: config.height,
        });

        let renderer = PreviewRenderer::new(&device, &queue, surface_format, &self.state.session);

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.queue = Some(queue);
        self.config = Some(config);
        self.renderer = Some(renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(egui_winit) = &mut self.egui_winit {
            let response = egui_winit.on_window_event(self.window.as_ref().unwrap(), &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let (Some(surface), Some(device), Some(config)) =
                    (&self.surface, &self.device, &mut self.config)
                {
                    config.width = new_size.width.max(1);
                    config.height = new_size.height.max(1);
                    surface.configure(device, config);
                }
                self.state.push(PreviewEvent::ViewportResized {
                    width: new_size.width,
                    height: new_size.height,
                });
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: btn_state,
                ..
            } => {
                self.state.dragging = btn_state == ElementState::Pressed;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let notches = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 40.0,
                };
                self.state.push(PreviewEvent::Scroll { delta: notches });
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = (now - self.state.last_frame).as_secs_f32().min(0.1);
                self.state.last_frame = now;
                self.state.session.advance(dt);

                let (Some(surface), Some(device), Some(queue)) =
                    (&self.surface, &self.device, &self.queue)
                else {
                    return;
                };

                // Rendering is a no-op while the surface has no area.
                let size = self.window.as_ref().unwrap().inner_size();
                if size.width == 0 || size.height == 0 {
                    return;
                }

                let output = match surface.get_current_texture() {
                    Ok(t) => t,
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        if let Some(config) = &self.config {
                            surface.configure(device, config);
                        }
                        return;
                    }
                    Err(e) => {
                        tracing::error!("surface error: {e}");
                        return;
                    }
                };

                let view = output
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());

                if let Some(renderer) = &mut self.renderer {
                    renderer.tick(device, queue, &view, &self.state.session);
                }

                let raw_input = self
                    .egui_winit
                    .as_mut()
                    .unwrap()
                    .take_egui_input(self.window.as_ref().unwrap());
                let full_output = self.egui_ctx.run(raw_input, |ctx| {
                    self.state.draw_ui(ctx);
                });

                self.egui_winit.as_mut().unwrap().handle_platform_output(
                    self.window.as_ref().unwrap(),
                    full_output.platform_output,
                );

                let paint_jobs = self
                    .egui_ctx
                    .tessellate(full_output.shapes, full_output.pixels_per_point);

                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [
                        self.config.as_ref().unwrap().width,
                        self.config.as_ref().unwrap().height,
                    ],
                    pixels_per_point: full_output.pixels_per_point,
                };

                {
                    let egui_renderer = self.egui_renderer.as_mut().unwrap();
                    for (id, image_delta) in &full_output.textures_delta.set {
                        egui_renderer.update_texture(device, queue, *id, image_delta);
                    }
                    let mut encoder =
                        device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("egui_encoder"),
                        });
                    egui_renderer.update_buffers(
                        device,
                        queue,
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
                        egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
                    }
                    queue.submit(std::iter::once(encoder.finish()));
                    for id in &full_output.textures_delta.free {
                        egui_renderer.free_texture(id);
                    }
                }

                output.present();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
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
            if self.state.dragging {
                self.state.push(PreviewEvent::PointerDrag {
                    dx: delta.0 as f32,
                    dy: delta.1 as f32,
                });
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("texview-desktop starting");

    let mut state = AppState::new();
    if let Some(path) = cli.albedo {
        state.push(PreviewEvent::ChannelChanged {
            channel: ChannelKind::Albedo,
            payload: ChannelPayload::File(path.into()),
        });
    }
    if let Some(path) = cli.background {
        state.push(PreviewEvent::BackgroundChanged {
            payload: ChannelPayload::File(path.into()),
        });
    }

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(state);
    event_loop.run_app(&mut app)?;

    Ok(())
}
