use clap::Parser;
use winit::dpi::LogicalSize;
use winit::event_loop::EventLoop;

use imlite::cli::Cli;
use imlite::files::Siblings;
use imlite::loader::DiskLoader;
use imlite::ui::state::{ViewerOptions, ViewerState};
use imlite::ui::App;

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if !cli.path.exists() {
        log::error!("{} does not exist.", cli.path.display());
        std::process::exit(1);
    }
    if !cli.path.is_file() {
        log::error!("{} is not a file.", cli.path.display());
        std::process::exit(2);
    }

    let siblings = match Siblings::scan(&cli.path) {
        Ok(s) => Some(s),
        Err(e) => {
            log::warn!("Could not list sibling images: {}", e);
            None
        }
    };
    // Use the scanned spelling of the path so navigation and title agree.
    let path = siblings
        .as_ref()
        .and_then(|s| s.current())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| cli.path.clone());

    let options = ViewerOptions {
        fit_to_window: !cli.original_size,
        light_background: cli.light,
        title_mode: cli.title,
    };
    let state = ViewerState::new(path, siblings, Box::new(DiskLoader), options);

    let event_loop = match EventLoop::new() {
        Ok(el) => el,
        Err(e) => {
            log::error!("Failed to create event loop: {}", e);
            std::process::exit(1);
        }
    };

    let mut app = App::new(state, LogicalSize::new(cli.width, cli.height));
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop failed: {}", e);
        std::process::exit(1);
    }
}
