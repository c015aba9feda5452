mod config;
mod state;
mod status;
mod model;
mod sources;
mod matcher;
mod ui;
mod executor;

use anyhow::Result;
use calloop::EventLoop;
use calloop_wayland_source::WaylandSource;
use smithay_client_toolkit::{
    shell::wlr_layer::{Layer, KeyboardInteractivity, Anchor},
    shell::WaylandSurface,
};
use wayland_client::{Connection, globals::registry_queue_init};
use crate::config::load_config;
use crate::executor::{LaunchStrategy, Launcher};
use crate::state::AppState;
use crate::ui::wayland::WaylandApp;
use crate::ui::render::Renderer;
use crate::sources::{builtin::BuiltinSource, platform::PlatformSource};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Override how commands are started instead of picking by OS
    #[arg(long, value_enum)]
    launch_strategy: Option<LaunchStrategy>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    // 1. Catalog from the built-in table plus this OS's addendum
    let config = load_config()?;
    let os = std::env::consts::OS;
    let builtin = BuiltinSource::new(&config.apps);
    let platform = PlatformSource::new(os, config.platform_items(os));
    let catalog = sources::build_catalog(&[&builtin, &platform])?;

    let strategy = args.launch_strategy.unwrap_or_else(LaunchStrategy::detect);
    let launcher = Launcher::system(strategy);

    // 2. Setup Wayland Connection & Event Loop
    let mut event_loop: EventLoop<'static, WaylandApp> = EventLoop::try_new()?;
    let conn = Connection::connect_to_env()?;
    let (globals, event_queue) = registry_queue_init::<WaylandApp>(&conn)?;
    let qh = event_queue.handle();

    // 3. Init State & UI
    let (width, height) = (config.theme.width, config.theme.height);
    let app_state = AppState::new(config, catalog, launcher);
    let mut app = WaylandApp::new(&globals, &qh, event_loop.handle(), app_state, Renderer::new())?;

    // 4. Create Layer Surface
    let surface = app.compositor_state.create_surface(&qh);
    let layer_surface = app.layer_shell_state.create_layer_surface(
        &qh,
        surface,
        Layer::Overlay,
        Some("quick-launcher"),
        None,
    );

    layer_surface.set_anchor(Anchor::empty());
    layer_surface.set_size(width, height);
    layer_surface.set_keyboard_interactivity(KeyboardInteractivity::Exclusive);
    layer_surface.commit();
    app.layer_surface = Some(layer_surface);

    // The startup prompt reverts like any other message
    app.schedule_status_expiry(&qh);

    event_loop
        .handle()
        .insert_source(WaylandSource::new(conn.clone(), event_queue), |_, queue, app| {
            queue.dispatch_pending(app)
        })
        .map_err(|err| err.error)?;

    // 5. Run Loop
    while !app.should_exit {
        event_loop.dispatch(None, &mut app)?;
    }

    Ok(())
}
