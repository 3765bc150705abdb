mod cmd;
mod settings;
mod ui;

use clap::Parser;
use eframe::NativeOptions;
use env_logger::Env;

use self::{
    cmd::Args,
    settings::Settings,
    ui::{app::PreviewApp, initial_window_size, ERROR_WINDOW_SIZE},
};

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("quickcomic=info")).init();

    let args = Args::parse();

    // The pane is sized after the first page before the window exists
    let prepared = quickcomic::prepare(&args.path);

    let initial_window_size = match &prepared {
        Ok(session) => initial_window_size(
            session.page_size(),
            args.thumbnail_size
                .unwrap_or(Settings::default().thumbnail_size)
                .clamp(Settings::MIN_THUMBNAIL_SIZE, Settings::MAX_THUMBNAIL_SIZE),
        ),
        Err(_) => ERROR_WINDOW_SIZE,
    };

    eframe::run_native(
        "quickcomic",
        NativeOptions {
            initial_window_size: Some(initial_window_size),
            ..Default::default()
        },
        Box::new(move |cc| Box::new(PreviewApp::new(cc, args, prepared))),
    )
}
