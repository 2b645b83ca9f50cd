//! Core application state and lifecycle.

use kurbo::{Point, Size};
use peniko::Color;
use shapeboard_core::{Catalog, Editor, SubscriptionId, ViewportConfig};
use shapeboard_render::{RenderContext, Renderer, RendererError, VelloRenderer};
use std::sync::Arc;
use vello::util::RenderSurface;
use vello::wgpu::PresentMode;
use vello::{AaConfig, RenderParams, RendererOptions};
use winit::application::ApplicationHandler;
#[cfg(not(target_arch = "wasm32"))]
use winit::dpi::LogicalSize;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

use crate::error::AppError;
use crate::event_handler::{EventHandler, to_modifiers};
use crate::ui::{UiAction, render_ui};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Sidebar width in logical pixels.
    pub sidebar_width: f64,
    pub background_color: Color,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Shapeboard".to_string(),
            width: 1280,
            height: 800,
            sidebar_width: shapeboard_core::viewport::DEFAULT_SIDEBAR_WIDTH,
            background_color: Color::from_rgba8(250, 250, 250, 255),
        }
    }
}

impl AppConfig {
    /// Viewport layout for a window of the given logical size.
    pub fn viewport_config(&self, window_size: Size) -> ViewportConfig {
        ViewportConfig {
            sidebar_width: self.sidebar_width,
            window_size,
        }
    }
}

/// Surface created asynchronously on the web, waiting to be picked up.
#[cfg(target_arch = "wasm32")]
type PendingSurface = (vello::util::RenderContext, RenderSurface<'static>);

/// Runtime state for the application.
struct AppState {
    // Windowing
    window: Arc<Window>,
    surface: RenderSurface<'static>,

    // Rendering
    vello_renderer: vello::Renderer,
    shape_renderer: VelloRenderer,
    /// Texture blitter for RGBA->surface format conversion (needed for WebGPU/WASM)
    texture_blitter: vello::wgpu::util::TextureBlitter,

    // egui
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,

    // State
    editor: Editor,
    config: AppConfig,
    event_handler: EventHandler,
    /// Redraws the window whenever the viewport changes size.
    resize_subscription: SubscriptionId,
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    catalog: Catalog,
    state: Option<AppState>,
    render_cx: Option<vello::util::RenderContext>,
    /// Window waiting for async surface creation (WASM only)
    pending_window: Option<Arc<Window>>,
    #[cfg(target_arch = "wasm32")]
    pending_surface: std::rc::Rc<std::cell::RefCell<Option<PendingSurface>>>,
    /// Flag to indicate async init is in progress
    #[cfg(target_arch = "wasm32")]
    init_in_progress: std::rc::Rc<std::cell::Cell<bool>>,
}

impl App {
    /// Create a new application with default configuration and the bundled catalog.
    pub fn new() -> Result<Self, AppError> {
        Ok(Self::with_config(AppConfig::default(), Catalog::bundled()?))
    }

    /// Create a new application with custom configuration.
    pub fn with_config(config: AppConfig, catalog: Catalog) -> Self {
        Self {
            config,
            catalog,
            state: None,
            render_cx: None,
            pending_window: None,
            #[cfg(target_arch = "wasm32")]
            pending_surface: Default::default(),
            #[cfg(target_arch = "wasm32")]
            init_in_progress: Default::default(),
        }
    }

    /// Run the application.
    pub async fn run() -> Result<(), AppError> {
        let event_loop = EventLoop::new()?;
        let app = App::new()?;

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::EventLoopExtWebSys;
            event_loop.spawn_app(app);
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let mut app = app;
            event_loop.run_app(&mut app)?;
        }

        Ok(())
    }

    /// Finish initialization after surface is created.
    fn finish_init(
        &mut self,
        window: Arc<Window>,
        surface: RenderSurface<'static>,
    ) -> Result<(), RendererError> {
        let render_cx = self
            .render_cx
            .as_ref()
            .ok_or_else(|| RendererError::InitFailed("render context missing".into()))?;
        let device = &render_cx.devices[surface.dev_id].device;

        let vello_renderer = vello::Renderer::new(device, RendererOptions::default())
            .map_err(|e| RendererError::InitFailed(e.to_string()))?;

        // Vello renders to Rgba8Unorm; the surface is often Bgra8Unorm on WebGPU
        let texture_blitter = vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

        // Initialize egui
        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            surface.config.format,
            egui_wgpu::RendererOptions::default(),
        );

        let logical = logical_size(
            PhysicalSize::new(surface.config.width, surface.config.height),
            window.scale_factor(),
        );
        let mut editor = Editor::new(self.catalog.clone(), self.config.viewport_config(logical));

        let redraw_window = window.clone();
        let resize_subscription = editor.viewport_mut().subscribe(move |size| {
            log::debug!("Viewport resized to {}x{}", size.width, size.height);
            redraw_window.request_redraw();
        });

        log::info!(
            "Shapeboard initialized - {}x{} ({} shape templates)",
            surface.config.width,
            surface.config.height,
            self.catalog.len()
        );

        self.state = Some(AppState {
            window: window.clone(),
            surface,
            vello_renderer,
            shape_renderer: VelloRenderer::new(),
            texture_blitter,
            egui_ctx,
            egui_state,
            egui_renderer,
            editor,
            config: self.config.clone(),
            event_handler: EventHandler::new(),
            resize_subscription,
        });

        self.pending_window = None;

        // Request initial redraw
        window.request_redraw();
        Ok(())
    }

    /// Pick up a surface created by the async web initialization.
    #[cfg(target_arch = "wasm32")]
    fn poll_pending_init(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = self.pending_window.clone() else {
            return;
        };

        let pending = self.pending_surface.borrow_mut().take();
        if let Some((render_cx, surface)) = pending {
            self.render_cx = Some(render_cx);
            if let Err(e) = self.finish_init(window, surface) {
                log::error!("{e}");
                event_loop.exit();
            }
            return;
        }

        if self.init_in_progress.get() {
            return;
        }
        self.init_in_progress.set(true);

        let (width, height) = crate::web::viewport_physical_size(self.config.width, self.config.height);
        let slot = self.pending_surface.clone();
        let in_progress = self.init_in_progress.clone();

        wasm_bindgen_futures::spawn_local(async move {
            log::info!("Creating surface asynchronously...");
            let mut render_cx = vello::util::RenderContext::new();
            match render_cx
                .create_surface(window.clone(), width, height, PresentMode::AutoVsync)
                .await
            {
                Ok(surface) => {
                    log::info!("Surface created successfully");
                    *slot.borrow_mut() = Some((render_cx, surface));
                }
                Err(e) => {
                    log::error!("Failed to create surface: {e:?}");
                    in_progress.set(false);
                }
            }
            // Wake the event loop so the surface gets picked up
            window.request_redraw();
        });
    }
}

/// Physical window size to logical pixels.
fn logical_size(size: PhysicalSize<u32>, scale_factor: f64) -> Size {
    let logical = size.to_logical::<f64>(scale_factor);
    Size::new(logical.width, logical.height)
}

impl AppState {
    /// Run the UI, build the canvas scene and present one frame.
    fn redraw(&mut self, render_cx: &vello::util::RenderContext) -> Result<(), RendererError> {
        let egui_input = self.egui_state.take_egui_input(&self.window);
        let sidebar_width = self.editor.viewport().sidebar_width() as f32;
        let catalog = self.editor.catalog();
        let mut ui_action = None;
        let egui_output = self.egui_ctx.run(egui_input, |ctx| {
            ui_action = render_ui(ctx, catalog, sidebar_width);
        });

        if let Some(UiAction::AddShape(template_id)) = ui_action {
            if self.editor.add_from_template(template_id).is_none() {
                log::warn!("Unknown shape template {template_id}");
            }
        }

        self.egui_state
            .handle_platform_output(&self.window, egui_output.platform_output);
        let egui_primitives = self
            .egui_ctx
            .tessellate(egui_output.shapes, egui_output.pixels_per_point);

        let width = self.surface.config.width;
        let height = self.surface.config.height;

        let ctx = RenderContext::new(&self.editor, Size::new(width as f64, height as f64))
            .with_scale_factor(self.window.scale_factor())
            .with_background(self.config.background_color);
        self.shape_renderer.build_scene(&ctx);
        let base_color = self.shape_renderer.background_color(&ctx);
        let scene = self.shape_renderer.take_scene();

        let device_handle = &render_cx.devices[self.surface.dev_id];
        let device = &device_handle.device;
        let queue = &device_handle.queue;

        let surface_texture = self
            .surface
            .surface
            .get_current_texture()
            .map_err(|e| RendererError::Surface(e.to_string()))?;

        let params = RenderParams {
            base_color,
            width,
            height,
            antialiasing_method: AaConfig::Area,
        };

        // Vello needs StorageBinding, which WebGPU only offers for Rgba8Unorm
        let render_texture = device.create_texture(&vello::wgpu::TextureDescriptor {
            label: Some("vello render texture"),
            size: vello::wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: vello::wgpu::TextureDimension::D2,
            format: vello::wgpu::TextureFormat::Rgba8Unorm,
            usage: vello::wgpu::TextureUsages::STORAGE_BINDING
                | vello::wgpu::TextureUsages::COPY_SRC
                | vello::wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let render_texture_view =
            render_texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

        self.vello_renderer
            .render_to_texture(device, queue, &scene, &render_texture_view, &params)
            .map_err(|e| RendererError::RenderFailed(e.to_string()))?;

        let surface_view = surface_texture
            .texture
            .create_view(&vello::wgpu::TextureViewDescriptor::default());

        {
            let mut blit_encoder =
                device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                    label: Some("blit encoder"),
                });
            self.texture_blitter.copy(
                device,
                &mut blit_encoder,
                &render_texture_view,
                &surface_view,
            );
            queue.submit(std::iter::once(blit_encoder.finish()));
        }

        for (id, image_delta) in &egui_output.textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: egui_output.pixels_per_point,
        };

        {
            let mut egui_encoder =
                device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                    label: Some("egui encoder"),
                });
            self.egui_renderer.update_buffers(
                device,
                queue,
                &mut egui_encoder,
                &egui_primitives,
                &screen_descriptor,
            );

            let render_pass = egui_encoder.begin_render_pass(&vello::wgpu::RenderPassDescriptor {
                label: Some("egui render pass"),
                color_attachments: &[Some(vello::wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: vello::wgpu::Operations {
                        // Keep the canvas underneath
                        load: vello::wgpu::LoadOp::Load,
                        store: vello::wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // egui-wgpu wants a 'static render pass
            let mut render_pass = render_pass.forget_lifetime();
            self.egui_renderer
                .render(&mut render_pass, &egui_primitives, &screen_descriptor);
            drop(render_pass);

            queue.submit(std::iter::once(egui_encoder.finish()));
        }

        for id in &egui_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
        surface_texture.present();

        let wants_repaint = ui_action.is_some()
            || egui_output
                .viewport_output
                .get(&egui::ViewportId::ROOT)
                .is_some_and(|v| v.repaint_delay.is_zero());
        if wants_repaint {
            self.window.request_redraw();
        }
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() || self.pending_window.is_some() {
            return;
        }

        log::info!("Creating window...");

        #[cfg(not(target_arch = "wasm32"))]
        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        #[cfg(target_arch = "wasm32")]
        let window_attrs = {
            use winit::platform::web::WindowAttributesExtWebSys;

            let Some(canvas) = crate::web::attach_canvas(self.config.width, self.config.height)
            else {
                log::error!("Failed to attach canvas to the page");
                event_loop.exit();
                return;
            };
            Window::default_attributes()
                .with_title(&self.config.title)
                .with_canvas(Some(canvas))
        };

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        log::info!("Window created, initializing renderer...");

        // On native, block on async surface creation
        #[cfg(not(target_arch = "wasm32"))]
        {
            let size = window.inner_size();
            let (width, height) = if size.width == 0 || size.height == 0 {
                (self.config.width, self.config.height)
            } else {
                (size.width, size.height)
            };
            log::info!("Surface size: {}x{}", width, height);

            let render_cx = self
                .render_cx
                .get_or_insert_with(vello::util::RenderContext::new);
            let surface = match pollster::block_on(render_cx.create_surface(
                window.clone(),
                width,
                height,
                PresentMode::AutoVsync,
            )) {
                Ok(surface) => surface,
                Err(e) => {
                    log::error!("Failed to create surface: {e:?}");
                    event_loop.exit();
                    return;
                }
            };

            if let Err(e) = self.finish_init(window, surface) {
                log::error!("{e}");
                event_loop.exit();
            }
        }

        // On WASM, store window for later async initialization
        #[cfg(target_arch = "wasm32")]
        {
            self.pending_window = Some(window.clone());
            window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        #[cfg(target_arch = "wasm32")]
        if self.state.is_none() {
            self.poll_pending_init(event_loop);
            return;
        }

        let Some(state) = &mut self.state else {
            return;
        };

        // Let egui process the event first
        let egui_response = state.egui_state.on_window_event(&state.window, &event);
        if egui_response.repaint {
            state.window.request_redraw();
        }

        // A press that started on the canvas keeps the pointer until release
        let egui_wants_input = !state.event_handler.is_pressed()
            && (egui_response.consumed || state.egui_ctx.is_pointer_over_area());

        let changed = match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
                false
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }
                if let Some(render_cx) = self.render_cx.as_mut() {
                    render_cx.resize_surface(&mut state.surface, size.width, size.height);
                }
                state
                    .editor
                    .resize(logical_size(size, state.window.scale_factor()));
                true
            }

            WindowEvent::RedrawRequested => {
                let Some(render_cx) = self.render_cx.as_ref() else {
                    return;
                };
                if let Err(e) = state.redraw(render_cx) {
                    log::warn!("Skipping frame: {e}");
                }
                false
            }

            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f64>(state.window.scale_factor());
                state
                    .event_handler
                    .cursor_moved(&mut state.editor, Point::new(logical.x, logical.y))
            }

            WindowEvent::MouseInput {
                state: button_state,
                button: MouseButton::Left,
                ..
            } => match button_state {
                ElementState::Pressed if !egui_wants_input => {
                    state.event_handler.left_pressed(&mut state.editor)
                }
                ElementState::Pressed => false,
                ElementState::Released => state.event_handler.left_released(&mut state.editor),
            },

            // The release may never arrive
            WindowEvent::Focused(false) => state.event_handler.escape(&mut state.editor),

            WindowEvent::ModifiersChanged(modifiers) => {
                state.event_handler.set_modifiers(to_modifiers(modifiers.state()));
                false
            }

            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed && !egui_wants_input =>
            {
                match event.logical_key {
                    Key::Named(NamedKey::Escape) => state.event_handler.escape(&mut state.editor),
                    _ => false,
                }
            }

            _ => false,
        };

        if changed {
            state.window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &mut self.state {
            state
                .editor
                .viewport_mut()
                .unsubscribe(state.resize_subscription);
            log::info!("Shapeboard closing with {} shapes", state.editor.shapes().len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.title, "Shapeboard");
        assert_eq!((config.width, config.height), (1280, 800));
        assert_eq!(config.sidebar_width, 200.0);
    }

    #[test]
    fn test_viewport_config_uses_sidebar_width() {
        let config = AppConfig {
            sidebar_width: 240.0,
            ..Default::default()
        };
        let viewport = config.viewport_config(Size::new(1000.0, 600.0));
        assert_eq!(viewport.sidebar_width, 240.0);
        assert_eq!(viewport.window_size, Size::new(1000.0, 600.0));
    }

    #[test]
    fn test_logical_size_divides_scale_factor() {
        let size = logical_size(PhysicalSize::new(2560, 1600), 2.0);
        assert_eq!(size, Size::new(1280.0, 800.0));
    }

    #[test]
    fn test_app_loads_bundled_catalog() {
        let app = App::new().unwrap();
        assert_eq!(app.catalog.len(), 6);
        assert!(app.state.is_none());
    }
}
