//! Pad window - a native touch surface for the two floating sticks
//!
//! Mouse drags act as a single finger; touchscreens get full multi-touch.

mod app;
pub mod drawing;
pub mod state;

use anyhow::Result;
use crossbeam::channel::Receiver;

pub use app::PadApp;

use crate::config::AppConfig;
use crate::host::{HostEvent, HostHandle};

/// Open the pad window. Blocks until it is closed.
pub fn run_pad(host: HostHandle, events: Receiver<HostEvent>, config: &AppConfig) -> Result<()> {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Floating Sticks")
            .with_inner_size([config.screen.width, config.screen.height])
            .with_min_inner_size([320.0, 200.0]),
        ..Default::default()
    };

    let app = PadApp::new(host, events, config);
    eframe::run_native(
        "Floating Sticks",
        native_options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("Pad window failed: {}", e))
}
