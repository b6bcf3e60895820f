use std::sync::mpsc::{Receiver, TryRecvError};

use eframe::egui;

use crate::data::loader;
use crate::data::model::MapData;
use crate::state::AppState;
use crate::ui::{map, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct BikeFlowApp {
    pub state: AppState,
    /// Delivers the one background fetch result; None once consumed.
    load_rx: Option<Receiver<anyhow::Result<MapData>>>,
}

impl Default for BikeFlowApp {
    fn default() -> Self {
        // Kick off the fetch immediately; the UI thread never blocks on it.
        let (tx, rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            let _ = tx.send(loader::fetch_all());
        });
        Self {
            state: AppState::default(),
            load_rx: Some(rx),
        }
    }
}

impl BikeFlowApp {
    /// Nonblocking poll of the loader thread.
    fn poll_load(&mut self) {
        let Some(rx) = &self.load_rx else {
            return;
        };
        match rx.try_recv() {
            Ok(Ok(data)) => {
                self.state.set_data(data);
                self.load_rx = None;
            }
            Ok(Err(e)) => {
                log::error!("load failed: {e:#}");
                self.state.set_load_error(format!("Load failed: {e:#}"));
                self.load_rx = None;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.state.set_load_error("Loader thread died".to_string());
                self.load_rx = None;
            }
        }
    }
}

impl eframe::App for BikeFlowApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_load();
        if self.state.loading {
            // Keep polling while the fetch is in flight.
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        // ---- Top panel: title, counts, legend, status ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state);
        });

        // ---- Bottom panel: time-of-day slider ----
        egui::TopBottomPanel::bottom("time_panel").show(ctx, |ui| {
            panels::time_panel(ui, &mut self.state);
        });

        // ---- Central panel: the map ----
        egui::CentralPanel::default().show(ctx, |ui| {
            map::map_view(ui, &self.state);
        });
    }
}
