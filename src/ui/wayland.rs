use std::time::Duration;
use anyhow::Result;
use calloop::LoopHandle;
use calloop::timer::{TimeoutAction, Timer};
use log::{debug, error};
use smithay_client_toolkit::{
    compositor::{CompositorHandler, CompositorState},
    delegate_compositor, delegate_keyboard, delegate_output, delegate_pointer, delegate_registry,
    delegate_seat, delegate_shm, delegate_layer,
    output::{OutputHandler, OutputState},
    registry::{ProvidesRegistryState, RegistryState},
    seat::{
        keyboard::{KeyEvent, KeyboardHandler, Modifiers},
        pointer::{PointerEvent, PointerEventKind, PointerHandler, BTN_LEFT},
        Capability, SeatHandler, SeatState,
    },
    shell::{
        wlr_layer::{
            LayerShell, LayerShellHandler, LayerSurface, LayerSurfaceConfigure,
        },
        WaylandSurface,
    },
    shm::{slot::SlotPool, Shm, ShmHandler},
};
use wayland_client::{
    globals::GlobalList,
    protocol::{wl_keyboard, wl_output, wl_pointer, wl_seat, wl_shm, wl_surface},
    Connection, QueueHandle,
};
use xkbcommon::xkb::{self, keysyms};
use crate::state::AppState;
use crate::ui::render::{ListLayout, Renderer};

pub struct WaylandApp {
    pub registry_state: RegistryState,
    pub seat_state: SeatState,
    pub output_state: OutputState,
    pub compositor_state: CompositorState,
    pub shm_state: Shm,
    pub layer_shell_state: LayerShell,

    pub layer_surface: Option<LayerSurface>,
    pub pool: Option<SlotPool>,
    pub width: u32,
    pub height: u32,
    pub first_configure: bool,
    pub should_exit: bool,

    pub state: AppState,
    pub renderer: Renderer,
    loop_handle: LoopHandle<'static, WaylandApp>,
    scroll_offset: usize,
    // (time, row) of the last left press, for double-click detection
}

impl WaylandApp {
    pub fn new(
        globals: &GlobalList,
        qh: &QueueHandle<Self>,
        loop_handle: LoopHandle<'static, WaylandApp>,
        state: AppState,
        renderer: Renderer,
    ) -> Result<Self> {
        let registry_state = RegistryState::new(globals);
        let seat_state = SeatState::new(globals, qh);
        let output_state = OutputState::new(globals, qh);
        let compositor_state = CompositorState::bind(globals, qh)?;
        let shm_state = Shm::bind(globals, qh)?;
        let layer_shell_state = LayerShell::bind(globals, qh)?;
        let (width, height) = (state.config.theme.width, state.config.theme.height);

        Ok(Self {
            registry_state,
            seat_state,
            output_state,
            compositor_state,
            shm_state,
            layer_shell_state,
            layer_surface: None,
            pool: None,
            width,
            height,
            first_configure: true,
            should_exit: false,
            state,
            renderer,
            loop_handle,
            scroll_offset: 0,
        })
    }

    fn list_layout(&self) -> ListLayout {
        ListLayout::new(&self.state.config.theme, self.height as f32)
    }

    pub fn draw(&mut self, _conn: &Connection, _qh: &QueueHandle<Self>) {
        let Some(layer_surface) = &self.layer_surface else { return; };
        let (width, height) = (self.width, self.height);
        if width == 0 || height == 0 { return; }

        let Some(pool) = self.pool.as_mut() else { return; };

        let (buffer, canvas) = match pool.create_buffer(
            width as i32,
            height as i32,
            (width * 4) as i32,
            wl_shm::Format::Argb8888,
        ) {
            Ok(created) => created,
            Err(err) => {
                error!("Failed to create shm buffer: {}", err);
                return;
            }
        };

        if let Some(mut pixmap) = tiny_skia::PixmapMut::from_bytes(canvas, width, height) {
            self.renderer.draw(&mut pixmap, &self.state, self.scroll_offset);

            // RGBA -> BGRA for Argb8888
            for chunk in canvas.chunks_exact_mut(4) {
                chunk.swap(0, 2);
            }

            layer_surface.wl_surface().attach(Some(buffer.wl_buffer()), 0, 0);
            layer_surface.wl_surface().damage(0, 0, width as i32, height as i32);
            layer_surface.wl_surface().commit();
        }
    }

    fn request_frame(&self, qh: &QueueHandle<Self>) {
        if let Some(layer_surface) = &self.layer_surface {
            layer_surface.wl_surface().frame(qh, layer_surface.wl_surface().clone());
            layer_surface.wl_surface().commit();
        }
    }

    /// Runs after every handled input: keep the cursor visible, arm the
    /// status timer, repaint.
    fn after_input(&mut self, qh: &QueueHandle<Self>) {
        let total = self.state.filtered_indices.len();
        self.scroll_offset =
            self.list_layout().follow(self.scroll_offset, total, self.state.cursor);
        self.schedule_status_expiry(qh);
        self.request_frame(qh);
    }

    pub fn schedule_status_expiry(&mut self, qh: &QueueHandle<Self>) {
        let Some(expiry) = self.state.status.take_expiry() else { return; };
        let delay = Duration::from_millis(self.state.config.general.status_timeout_ms);
        let qh = qh.clone();

        let timer = Timer::from_duration(delay);
        let inserted = self.loop_handle.insert_source(timer, move |_, _, app| {
            if app.state.status.expire(&expiry) {
                debug!("Status '{}' expired", expiry.message);
                app.request_frame(&qh);
            }
            TimeoutAction::Drop
        });
        if let Err(err) = inserted {
            error!("Failed to schedule status expiry: {}", err.error);
        }
    }

    fn handle_press(&mut self, y: f64, time: u32) {
        let layout = self.list_layout();
        let y = y as f32;
        if layout.hits_query_field(y) {
            self.state.focus_query();
            return;
        }
        let total = self.state.filtered_indices.len();
        self.state.press_row(layout.row_at(y, self.scroll_offset, total), time);
    }
}

impl LayerShellHandler for WaylandApp {
    fn closed(&mut self, _conn: &Connection, _qh: &QueueHandle<Self>, _layer: &LayerSurface) {
        self.should_exit = true;
    }

    fn configure(
        &mut self,
        conn: &Connection,
        qh: &QueueHandle<Self>,
        _layer: &LayerSurface,
        configure: LayerSurfaceConfigure,
        _serial: u32,
    ) {
        if configure.new_size.0 > 0 {
            self.width = configure.new_size.0;
        }
        if configure.new_size.1 > 0 {
            self.height = configure.new_size.1;
        }
        let needed = self.width as usize * self.height as usize * 4;

        if self.first_configure {
            self.first_configure = false;
            match SlotPool::new(needed, &self.shm_state) {
                Ok(pool) => self.pool = Some(pool),
                Err(err) => {
                    error!("Failed to create shm pool: {}", err);
                    self.should_exit = true;
                    return;
                }
            }
        }

        if let Some(pool) = &mut self.pool {
            if pool.len() < needed {
                if let Err(err) = pool.resize(needed) {
                    error!("Failed to resize shm pool: {}", err);
                }
            }
        }

        let total = self.state.filtered_indices.len();
        self.scroll_offset =
            self.list_layout().follow(self.scroll_offset, total, self.state.cursor);
        self.draw(conn, qh);
    }
}

impl CompositorHandler for WaylandApp {
    fn scale_factor_changed(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _new_factor: i32,
    ) {}

    fn frame(
        &mut self,
        conn: &Connection,
        qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _time: u32,
    ) {
        self.draw(conn, qh);
    }

    fn transform_changed(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _new_transform: wl_output::Transform,
    ) {}

    fn surface_enter(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _output: &wl_output::WlOutput,
    ) {}

    fn surface_leave(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _output: &wl_output::WlOutput,
    ) {}
}

impl OutputHandler for WaylandApp {
    fn output_state(&mut self) -> &mut OutputState {
        &mut self.output_state
    }
    fn new_output(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _output: wl_output::WlOutput,
    ) {
    }
    fn update_output(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _output: wl_output::WlOutput,
    ) {
    }
    fn output_destroyed(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _output: wl_output::WlOutput,
    ) {
    }
}

impl SeatHandler for WaylandApp {
    fn seat_state(&mut self) -> &mut SeatState {
        &mut self.seat_state
    }

    fn new_seat(&mut self, _: &Connection, _: &QueueHandle<Self>, _: wl_seat::WlSeat) {}

    fn new_capability(
        &mut self,
        _conn: &Connection,
        qh: &QueueHandle<Self>,
        seat: wl_seat::WlSeat,
        capability: Capability,
    ) {
        match capability {
            Capability::Keyboard => {
                if let Err(err) = self.seat_state.get_keyboard(qh, &seat, None) {
                    error!("Failed to bind keyboard: {}", err);
                }
            }
            Capability::Pointer => {
                if let Err(err) = self.seat_state.get_pointer(qh, &seat) {
                    error!("Failed to bind pointer: {}", err);
                }
            }
            _ => {}
        }
    }

    fn remove_capability(
        &mut self,
        _conn: &Connection,
        _: &QueueHandle<Self>,
        _: wl_seat::WlSeat,
        _capability: Capability,
    ) {}

    fn remove_seat(&mut self, _: &Connection, _: &QueueHandle<Self>, _: wl_seat::WlSeat) {}
}

impl KeyboardHandler for WaylandApp {
    fn enter(
        &mut self,
        _: &Connection,
        _: &QueueHandle<Self>,
        _: &wl_keyboard::WlKeyboard,
        _: &wl_surface::WlSurface,
        _: u32,
        _: &[u32],
        _: &[xkb::Keysym],
    ) {}

    fn leave(
        &mut self,
        _: &Connection,
        _: &QueueHandle<Self>,
        _: &wl_keyboard::WlKeyboard,
        _: &wl_surface::WlSurface,
        _: u32,
    ) {}

    fn press_key(
        &mut self,
        _conn: &Connection,
        qh: &QueueHandle<Self>,
        _keyboard: &wl_keyboard::WlKeyboard,
        _serial: u32,
        event: KeyEvent,
    ) {
        match u32::from(event.keysym) {
            keysyms::KEY_Escape => self.should_exit = true,
            keysyms::KEY_Return | keysyms::KEY_KP_Enter => self.state.launch_selected(),
            keysyms::KEY_Up => self.state.key_up(),
            keysyms::KEY_Down => self.state.key_down(),
            keysyms::KEY_BackSpace => self.state.pop_char(),
            _ => {
                if let Some(utf8) = event.utf8 {
                    if !utf8.is_empty() && !utf8.chars().any(|c| c.is_control()) {
                        self.state.push_text(&utf8);
                    }
                }
            }
        }

        self.after_input(qh);
    }

    fn release_key(
        &mut self,
        _: &Connection,
        _: &QueueHandle<Self>,
        _: &wl_keyboard::WlKeyboard,
        _: u32,
        _: KeyEvent,
    ) {}

    fn update_modifiers(
        &mut self,
        _: &Connection,
        _: &QueueHandle<Self>,
        _: &wl_keyboard::WlKeyboard,
        _serial: u32,
        _modifiers: Modifiers,
        _layout: u32,
    ) {}
}

impl PointerHandler for WaylandApp {
    fn pointer_frame(
        &mut self,
        _conn: &Connection,
        qh: &QueueHandle<Self>,
        _pointer: &wl_pointer::WlPointer,
        events: &[PointerEvent],
    ) {
        let mut handled = false;
        for event in events {
            if let PointerEventKind::Press { button: BTN_LEFT, time, .. } = event.kind {
                self.handle_press(event.position.1, time);
                handled = true;
            }
        }
        if handled {
            self.after_input(qh);
        }
    }
}

impl ShmHandler for WaylandApp {
    fn shm_state(&mut self) -> &mut Shm {
        &mut self.shm_state
    }
}

delegate_compositor!(WaylandApp);
delegate_output!(WaylandApp);
delegate_shm!(WaylandApp);
delegate_seat!(WaylandApp);
delegate_keyboard!(WaylandApp);
delegate_pointer!(WaylandApp);
delegate_layer!(WaylandApp);
delegate_registry!(WaylandApp);

impl ProvidesRegistryState for WaylandApp {
    fn registry(&mut self) -> &mut RegistryState {
        &mut self.registry_state
    }

    fn runtime_add_global(
        &mut self,
        _: &Connection,
        _: &QueueHandle<Self>,
        _: u32,
        _: &str,
        _: u32,
    ) {
    }
    fn runtime_remove_global(&mut self, _: &Connection, _: &QueueHandle<Self>, _: u32, _: &str) {
    }
}
