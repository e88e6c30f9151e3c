use super::ImageUploader;
use egui::{Align, Align2, Color32, RichText};
use image_uploader::notify::Level;
use image_uploader::upload::picker::IMAGE_EXTENSIONS;
use image_uploader::upload::{BatchState, FileId, SelectedFile, UploadStatus, UploadedFile};
use image_uploader::utils::file_size::FileSizeUtils;
use rfd::FileDialog;

const ACCENT: Color32 = Color32::from_rgb(161, 89, 225);
const SUCCESS: Color32 = Color32::from_rgb(0, 180, 0);
const FAILURE: Color32 = Color32::from_rgb(220, 50, 50);
const MUTED: Color32 = Color32::from_rgb(150, 150, 150);
const GALLERY_COLUMNS: usize = 3;

enum Action {
    PickFiles,
    PickFolder,
    Remove(FileId),
    Upload,
    Clear,
}

impl ImageUploader {
    pub fn render(&mut self, ctx: &egui::Context) {
        let batch = self.coordinator.snapshot();
        let mut actions = Vec::new();

        egui::CentralPanel::default().show(ctx, |ui| {
            let footer_height = 40.0;
            let content_height = ui.available_height() - footer_height;

            egui::ScrollArea::vertical()
                .max_height(content_height)
                .show(ui, |ui| {
                    ui.add_space(20.0);
                    ui.vertical_centered(|ui| {
                        ui.heading("Image Uploader");
                        ui.add_space(5.0);
                        ui.label(
                            RichText::new("Upload your images and collect their links")
                                .color(ui.visuals().text_color().gamma_multiply(0.7)),
                        );
                    });

                    ui.add_space(20.0);
                    render_drop_zone(ui, &batch, &mut actions);

                    ui.add_space(20.0);
                    ui.vertical_centered(|ui| {
                        ui.horizontal(|ui| {
                            ui.add_enabled_ui(batch.can_submit(), |ui| {
                                let label = if batch.is_submitting {
                                    "⏳ Uploading..."
                                } else {
                                    "📤 Confirm upload"
                                };
                                let button =
                                    egui::Button::new(label).min_size(egui::vec2(200.0, 40.0));
                                if ui.add(button).clicked() {
                                    actions.push(Action::Upload);
                                }
                            });

                            ui.add_space(10.0);
                            ui.add_enabled_ui(batch.can_reset(), |ui| {
                                let button = egui::Button::new(
                                    RichText::new("🗑 Clear all").color(FAILURE),
                                )
                                .min_size(egui::vec2(120.0, 40.0));
                                if ui.add(button).clicked() {
                                    actions.push(Action::Clear);
                                }
                            });
                        });
                    });

                    ui.add_space(10.0);
                    ui.label(batch.summary());

                    if !batch.selection.is_empty() {
                        ui.add_space(10.0);
                        render_selection(ui, &batch, &mut actions);
                    }

                    if let Some(status) = self.state.get_status_text() {
                        ui.add_space(10.0);
                        ui.label(status);
                    }

                    if !batch.results.is_empty() {
                        ui.add_space(20.0);
                        render_gallery(ui, &batch.results);
                    }

                    ui.add_space(20.0);
                });

            ui.with_layout(egui::Layout::bottom_up(Align::Center), |ui| {
                ui.add_space(10.0);
                ui.label(
                    RichText::new(format!("Supported: {}", IMAGE_EXTENSIONS.join(", ")))
                        .color(MUTED),
                );
            });
        });

        self.render_toasts(ctx);

        for action in actions {
            match action {
                Action::PickFiles => {
                    if let Some(paths) = FileDialog::new()
                        .add_filter("Images", &IMAGE_EXTENSIONS)
                        .pick_files()
                    {
                        self.add_paths(paths);
                    }
                }
                Action::PickFolder => {
                    if let Some(folder) = FileDialog::new().pick_folder() {
                        self.add_folder(folder);
                    }
                }
                Action::Remove(id) => self.remove_file(id),
                Action::Upload => self.start_upload(),
                Action::Clear => self.reset_upload_state(),
            }
        }
    }

    fn render_toasts(&self, ctx: &egui::Context) {
        if self.state.toasts.is_empty() {
            return;
        }

        egui::Area::new("toasts")
            .anchor(Align2::RIGHT_TOP, egui::vec2(-12.0, 12.0))
            .show(ctx, |ui| {
                for notification in self.state.toasts.iter() {
                    let (icon, color) = match notification.level {
                        Level::Success => ("✅", SUCCESS),
                        Level::Warning => ("⚠", Color32::from_rgb(230, 160, 0)),
                        Level::Error => ("❌", FAILURE),
                    };
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.label(icon);
                            ui.colored_label(color, notification.message.as_str());
                        });
                    });
                    ui.add_space(4.0);
                }
            });
    }
}

fn render_drop_zone(ui: &mut egui::Ui, batch: &BatchState, actions: &mut Vec<Action>) {
    let hovering = ui.ctx().input(|i| !i.raw.hovered_files.is_empty());
    let stroke_color = if hovering {
        ACCENT
    } else {
        ui.visuals().widgets.noninteractive.bg_stroke.color
    };

    ui.add_enabled_ui(!batch.is_submitting, |ui| {
        let response = egui::Frame::group(ui.style())
            .stroke(egui::Stroke::new(1.5, stroke_color))
            .inner_margin(20.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new("📥").size(32.0).color(ACCENT));
                    ui.add_space(5.0);
                    ui.label("Click to select or drag files here");
                    ui.label(RichText::new("Supports single or batch upload").color(MUTED));
                });
            })
            .response
            .interact(egui::Sense::click());

        if response.clicked() {
            actions.push(Action::PickFiles);
        }

        ui.add_space(5.0);
        if ui.button("📁 Add folder").clicked() {
            actions.push(Action::PickFolder);
        }
    });
}

fn render_selection(ui: &mut egui::Ui, batch: &BatchState, actions: &mut Vec<Action>) {
    egui::Frame::none()
        .fill(ui.style().visuals.extreme_bg_color)
        .inner_margin(8.0)
        .show(ui, |ui| {
            for file in &batch.selection {
                ui.horizontal(|ui| {
                    render_status(ui, file);

                    ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                        ui.add_enabled_ui(!batch.is_submitting, |ui| {
                            if ui.small_button("✖").on_hover_text("Remove").clicked() {
                                actions.push(Action::Remove(file.id));
                            }
                        });
                        ui.label(RichText::new(FileSizeUtils::format_size(file.size)).color(MUTED));
                    });
                });

                if file.status == UploadStatus::Uploading {
                    ui.add(
                        egui::ProgressBar::new(f32::from(file.percent) / 100.0)
                            .show_percentage()
                            .fill(ACCENT),
                    );
                }
                ui.add_space(4.0);
            }
        });
}

fn render_status(ui: &mut egui::Ui, file: &SelectedFile) {
    match file.status {
        UploadStatus::Pending => {
            ui.label("🖼");
            ui.label(file.name.as_str());
        }
        UploadStatus::Uploading => {
            ui.label("⏳");
            ui.colored_label(MUTED, format!("{} - {}%", file.name, file.percent));
        }
        UploadStatus::Done => {
            ui.label("✅");
            ui.colored_label(SUCCESS, file.name.as_str());
        }
        UploadStatus::Error => {
            ui.label("❌");
            ui.colored_label(FAILURE, format!("{} - upload failed", file.name));
        }
    }
}

fn render_gallery(ui: &mut egui::Ui, results: &[UploadedFile]) {
    ui.label(RichText::new("Uploaded").strong());
    ui.add_space(5.0);

    let card_width = (ui.available_width() / GALLERY_COLUMNS as f32 - 16.0).max(120.0);
    egui::Grid::new("gallery")
        .num_columns(GALLERY_COLUMNS)
        .spacing([16.0, 16.0])
        .show(ui, |ui| {
            for (index, item) in results.iter().enumerate() {
                egui::Frame::group(ui.style()).show(ui, |ui| {
                    ui.set_width(card_width);
                    ui.label(RichText::new(item.name.as_str()).strong());
                    if ui.link(item.url.as_str()).on_hover_text("Open in browser").clicked() {
                        let _ = open::that(&item.url);
                    }
                    if ui.small_button("📋 Copy link").clicked() {
                        ui.output_mut(|o| o.copied_text = item.url.clone());
                    }
                });

                if (index + 1) % GALLERY_COLUMNS == 0 {
                    ui.end_row();
                }
            }
        });
}
