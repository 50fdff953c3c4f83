use anyhow::Result;
use clap::Parser;
use cubefield_assets::{
    AssetError, EmbeddedShaders, FileTextures, PixelData, ProceduralTextures, TextureProvider,
};
use cubefield_common::{InputEvent, Key, MouseButton, SurfaceEvent};
use cubefield_input::{Action, InputRouter};
use cubefield_scene::SceneRenderer;
use cubefield_surface::{
    ContextFactory, DiagnosticMessage, DiagnosticSource, FramePump, GpuContext, Severity,
    SurfaceController, SurfaceError,
};
use glam::Vec2;
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "cubefield-desktop", about = "Textured cube field demo")]
struct Cli {
    /// Window title
    #[arg(long, default_value = "Cube Field")]
    title: String,

    /// Initial window width
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Initial window height
    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Forward GPU diagnostics to the log
    #[arg(long)]
    gpu_log: bool,

    /// Directory holding container.jpg and awesomeface.png; procedural
    /// textures are used when absent
    #[arg(long)]
    assets_dir: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug)]
enum UserEvent {
    CloseRequested,
}

/// Deferred frame requests ride on the winit redraw queue.
struct RedrawPump {
    window: Arc<Window>,
}

impl FramePump for RedrawPump {
    fn request_frame(&self) {
        self.window.request_redraw();
    }
}

/// Builds the wgpu context against the winit window on first render.
struct WindowContextFactory {
    window: Arc<Window>,
    gpu_errors: Arc<Mutex<Vec<DiagnosticMessage>>>,
}

impl ContextFactory for WindowContextFactory {
    fn create_context(&mut self) -> Result<GpuContext, SurfaceError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(self.window.clone())?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or(SurfaceError::NoAdapter)?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("cubefield_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        let size = self.window.inner_size();
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

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(GpuContext {
            surface,
            device,
            queue,
            config,
        })
    }

    fn start_diagnostics(
        &mut self,
        context: &GpuContext,
    ) -> Result<DiagnosticSource, SurfaceError> {
        let writer = Arc::clone(&self.gpu_errors);
        context.device.on_uncaptured_error(Box::new(move |error| {
            if let Ok(mut buffer) = writer.lock() {
                buffer.push(DiagnosticMessage {
                    severity: Severity::Error,
                    text: error.to_string(),
                });
            }
        }));
        let reader = Arc::clone(&self.gpu_errors);
        Ok(Box::new(move || {
            reader
                .lock()
                .map(|mut buffer| buffer.drain(..).collect())
                .unwrap_or_default()
        }))
    }
}

/// File-backed textures with a procedural stand-in when loading fails.
struct TexturesWithFallback {
    files: FileTextures,
    fallback: ProceduralTextures,
}

impl TextureProvider for TexturesWithFallback {
    fn pixels(&self, name: &str) -> Result<PixelData, AssetError> {
        match self.files.pixels(name) {
            Ok(pixels) => Ok(pixels),
            Err(error) => {
                tracing::warn!(%error, name, "texture unavailable; using procedural fallback");
                self.fallback.pixels(name)
            }
        }
    }
}

struct DesktopApp {
    cli: Cli,
    proxy: EventLoopProxy<UserEvent>,
    window: Option<Arc<Window>>,
    controller: Option<SurfaceController<SceneRenderer, RedrawPump, WindowContextFactory>>,
    router: InputRouter,
    cursor: Vec2,
}

impl DesktopApp {
    fn new(cli: Cli, proxy: EventLoopProxy<UserEvent>) -> Self {
        Self {
            cli,
            proxy,
            window: None,
            controller: None,
            router: InputRouter::new(Vec2::ZERO),
            cursor: Vec2::ZERO,
        }
    }

    fn handle_input(&mut self, event: InputEvent) {
        for action in self.router.route(event) {
            match action {
                Action::RequestClose => {
                    let _ = self.proxy.send_event(UserEvent::CloseRequested);
                }
                Action::RecenterPointer => {
                    if let Some(window) = &self.window {
                        let anchor = self.router.anchor();
                        let _ = window.set_cursor_position(PhysicalPosition::new(
                            anchor.x as f64,
                            anchor.y as f64,
                        ));
                    }
                }
                Action::SetCursorVisible(visible) => {
                    if let Some(window) = &self.window {
                        window.set_cursor_visible(visible);
                    }
                }
                scene_action => {
                    if let Some(controller) = self.controller.as_mut() {
                        controller.scene_mut().apply(scene_action);
                    }
                }
            }
        }
    }
}

impl ApplicationHandler<UserEvent> for DesktopApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(self.cli.title.clone())
            .with_inner_size(PhysicalSize::new(self.cli.width, self.cli.height));
        let window = Arc::new(event_loop.create_window(attrs).expect("create window"));

        let size = window.inner_size();
        self.router.set_anchor(Vec2::new(
            size.width as f32 / 2.0,
            size.height as f32 / 2.0,
        ));

        let textures: Box<dyn TextureProvider> = match &self.cli.assets_dir {
            Some(dir) => Box::new(TexturesWithFallback {
                files: FileTextures::new(dir),
                fallback: ProceduralTextures,
            }),
            None => Box::new(ProceduralTextures),
        };
        let scene = SceneRenderer::new(Box::new(EmbeddedShaders), textures);

        let pump = RedrawPump {
            window: Arc::clone(&window),
        };
        let factory = WindowContextFactory {
            window: Arc::clone(&window),
            gpu_errors: Arc::default(),
        };
        let mut controller = SurfaceController::new(
            scene,
            pump,
            factory,
            (size.width.max(1), size.height.max(1)),
            window.scale_factor(),
            self.cli.gpu_log,
        );
        if self.cli.gpu_log {
            controller.subscribe_diagnostics(Box::new(|message| {
                tracing::warn!(severity = ?message.severity, "gpu: {}", message.text);
            }));
        }

        self.window = Some(window);
        self.controller = Some(controller);

        // The surface is drawable as soon as the window exists; continuous
        // animation keeps one frame request in flight from here on.
        if let Some(controller) = self.controller.as_mut() {
            controller.handle_event(SurfaceEvent::Exposed);
            controller.set_animating(true);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                if let Some(controller) = self.controller.as_mut() {
                    controller.handle_event(SurfaceEvent::CloseRequested);
                }
                event_loop.exit();
            }
            WindowEvent::Occluded(occluded) => {
                if let Some(controller) = self.controller.as_mut() {
                    controller.handle_event(if occluded {
                        SurfaceEvent::Obscured
                    } else {
                        SurfaceEvent::Exposed
                    });
                }
            }
            WindowEvent::Resized(new_size) => {
                self.router.set_anchor(Vec2::new(
                    new_size.width as f32 / 2.0,
                    new_size.height as f32 / 2.0,
                ));
                let scale_factor = self
                    .window
                    .as_ref()
                    .map(|window| window.scale_factor())
                    .unwrap_or(1.0);
                if let Some(controller) = self.controller.as_mut() {
                    controller.handle_event(SurfaceEvent::Resized {
                        width: new_size.width,
                        height: new_size.height,
                        scale_factor,
                    });
                }
            }
            WindowEvent::RedrawRequested => {
                if let Some(controller) = self.controller.as_mut() {
                    controller.handle_event(SurfaceEvent::FrameDelivered);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => {
                let key = map_key(code);
                let input = if state == ElementState::Pressed {
                    InputEvent::KeyPressed(key)
                } else {
                    InputEvent::KeyReleased(key)
                };
                self.handle_input(input);
            }
            WindowEvent::MouseInput {
                button,
                state: ElementState::Pressed,
                ..
            } => {
                self.handle_input(InputEvent::MousePressed {
                    button: map_button(button),
                    position: self.cursor,
                });
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Vec2::new(position.x as f32, position.y as f32);
                self.handle_input(InputEvent::MouseMoved {
                    position: self.cursor,
                });
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let input = match delta {
                    MouseScrollDelta::LineDelta(_, lines) => InputEvent::Wheel {
                        angle_delta: lines * 120.0,
                        pixel_delta: 0.0,
                    },
                    MouseScrollDelta::PixelDelta(pos) => InputEvent::Wheel {
                        angle_delta: 0.0,
                        pixel_delta: pos.y as f32,
                    },
                };
                self.handle_input(input);
            }
            _ => {}
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: UserEvent) {
        match event {
            UserEvent::CloseRequested => {
                if let Some(controller) = self.controller.as_mut() {
                    controller.handle_event(SurfaceEvent::CloseRequested);
                }
                event_loop.exit();
            }
        }
    }
}

fn map_key(code: KeyCode) -> Key {
    match code {
        KeyCode::KeyW => Key::W,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyD => Key::D,
        KeyCode::ArrowUp => Key::Up,
        KeyCode::ArrowDown => Key::Down,
        KeyCode::ArrowLeft => Key::Left,
        KeyCode::ArrowRight => Key::Right,
        KeyCode::Escape => Key::Escape,
        KeyCode::BracketLeft => Key::BracketLeft,
        KeyCode::BracketRight => Key::BracketRight,
        _ => Key::Other,
    }
}

fn map_button(button: winit::event::MouseButton) -> MouseButton {
    match button {
        winit::event::MouseButton::Left => MouseButton::Primary,
        winit::event::MouseButton::Right => MouseButton::Secondary,
        _ => MouseButton::Other,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("cubefield-desktop starting");

    let event_loop = EventLoop::<UserEvent>::with_user_event().build()?;
    event_loop.set_control_flow(ControlFlow::Wait);
    let proxy = event_loop.create_proxy();

    let mut app = DesktopApp::new(cli, proxy);
    event_loop.run_app(&mut app)?;

    Ok(())
}
