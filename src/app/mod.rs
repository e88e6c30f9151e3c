mod state;
mod ui;

use bytes::Bytes;
use eframe::{egui, App};
use image_uploader::config::Config;
use image_uploader::error::UploadError;
use image_uploader::notify::Notification;
use image_uploader::upload::picker::{appended, without};
use image_uploader::upload::{
    BatchCoordinator, FileId, HttpUploader, ImagePicker, Picked, BATCH_IN_FLIGHT,
};
use state::UiState;
use std::path::PathBuf;
use std::sync::mpsc as std_mpsc;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing::info;

pub struct ImageUploader {
    coordinator: BatchCoordinator<HttpUploader>,
    picker: ImagePicker,
    runtime: Runtime,
    state: UiState,
}

impl ImageUploader {
    pub fn new(config: &Config, runtime: Runtime) -> Result<Self, UploadError> {
        let uploader = HttpUploader::new(config)?;
        info!("Initializing image uploader for {}", uploader.endpoint());

        let (sender, receiver) = std_mpsc::channel();
        Ok(Self {
            coordinator: BatchCoordinator::new(uploader, Arc::new(sender)),
            picker: ImagePicker::new(),
            runtime,
            state: UiState::new(receiver, config.toast_duration),
        })
    }

    pub fn add_paths(&mut self, paths: Vec<PathBuf>) {
        let picked = self.picker.from_paths(paths);
        self.add_picked(picked);
    }

    pub fn add_folder(&mut self, folder: PathBuf) {
        let picked = self.picker.from_folder(&folder);
        if picked.files.is_empty() && picked.rejected.is_empty() {
            self.state.toast(Notification::warning(format!(
                "No images found in {}",
                folder.display()
            )));
        }
        self.add_picked(picked);
    }

    pub fn add_dropped(&mut self, dropped: Vec<egui::DroppedFile>) {
        let mut picked = Picked::default();
        for file in dropped {
            let result = match (&file.path, &file.bytes) {
                (Some(path), _) => self.picker.pick_path(path),
                (None, Some(bytes)) => self
                    .picker
                    .pick_bytes(&file.name, Bytes::copy_from_slice(bytes)),
                (None, None) => continue,
            };
            match result {
                Ok(selected) => picked.files.push(selected),
                Err(e) => picked.rejected.push(e),
            }
        }
        self.add_picked(picked);
    }

    fn add_picked(&mut self, picked: Picked) {
        for rejected in picked.rejected {
            self.state.toast(Notification::warning(rejected.to_string()));
        }
        if picked.files.is_empty() {
            return;
        }

        let current = self.coordinator.snapshot().selection;
        self.coordinator
            .set_selection(appended(&current, picked.files));
    }

    pub fn remove_file(&mut self, id: FileId) {
        let current = self.coordinator.snapshot().selection;
        self.coordinator.set_selection(without(&current, id));
    }

    pub fn start_upload(&mut self) {
        let coordinator = self.coordinator.clone();
        let (report_sender, report_receiver) = std_mpsc::channel();
        self.state.report_receiver = Some(report_receiver);
        self.state.last_report = None;

        self.runtime.spawn(async move {
            if let Some(report) = coordinator.submit_batch().await {
                let _ = report_sender.send(report);
            }
        });
    }

    pub fn reset_upload_state(&mut self) {
        if self.coordinator.reset_batch() {
            self.state.clear();
        }
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if !dropped.is_empty() {
            if self.coordinator.snapshot().is_submitting {
                self.state.toast(Notification::warning(BATCH_IN_FLIGHT));
            } else {
                self.add_dropped(dropped);
            }
        }

        let had_updates = self.state.drain();
        if had_updates || self.coordinator.snapshot().is_submitting || !self.state.toasts.is_empty()
        {
            ctx.request_repaint();
        }
    }
}

impl App for ImageUploader {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.render(ctx);
    }
}
