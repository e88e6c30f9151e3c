use image_uploader::notify::{Notification, Toasts};
use image_uploader::upload::BatchReport;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

/// Shell-only state; the batch itself lives in the coordinator.
pub struct UiState {
    pub toasts: Toasts,
    pub notification_receiver: Receiver<Notification>,
    pub report_receiver: Option<Receiver<BatchReport>>,
    pub last_report: Option<BatchReport>,
}

impl UiState {
    pub fn new(notification_receiver: Receiver<Notification>, toast_duration: Duration) -> Self {
        Self {
            toasts: Toasts::new(toast_duration),
            notification_receiver,
            report_receiver: None,
            last_report: None,
        }
    }

    pub fn clear(&mut self) {
        self.report_receiver = None;
        self.last_report = None;
    }

    pub fn toast(&mut self, notification: Notification) {
        self.toasts.push(notification, Instant::now());
    }

    /// Pulls everything the background batch has sent since the last frame.
    pub fn drain(&mut self) -> bool {
        let now = Instant::now();
        let mut had_updates = false;

        while let Ok(notification) = self.notification_receiver.try_recv() {
            self.toasts.push(notification, now);
            had_updates = true;
        }

        if let Some(receiver) = &self.report_receiver {
            if let Ok(report) = receiver.try_recv() {
                self.last_report = Some(report);
                self.report_receiver = None;
                had_updates = true;
            }
        }

        self.toasts.prune(now);
        had_updates
    }

    pub fn get_status_text(&self) -> Option<String> {
        self.last_report.map(|report| {
            format!(
                "Final Status: {} files | ✅ Success: {} | ❌ Failed: {}",
                report.succeeded + report.failed,
                report.succeeded,
                report.failed
            )
        })
    }
}
