mod app;
mod background;
mod config;
mod error;
mod gpu;
mod home;
mod particles;
mod schedule;
mod text;
mod theme;
mod ui;
mod viewport;

use app::App;
use winit::event_loop::{ControlFlow, EventLoop};

fn main() {
    env_logger::init();

    let site = match config::load_site_config() {
        Ok(site) => site,
        Err(error) => {
            log::warn!("Using default site config: {error}");
            config::SiteConfig::default()
        }
    };

    let event_loop = EventLoop::new().expect("failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(site);
    if let Err(error) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {error}");
    }
}
