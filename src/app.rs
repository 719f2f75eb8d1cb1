use std::fs;
use std::sync::Arc;
use std::time::Duration;

use eframe::App;
use egui::{self, Color32, Context, Frame, RichText, Ui, Vec2};

use crate::audio::{AudioClip, AudioPlayer};
use crate::catalog::Catalog;
use crate::dispatch::{Dispatcher, RequestOutcome};
use crate::form::FormState;
use crate::google::{GoogleTtsClient, API_KEY_VAR};
use crate::render::{submit_label, ResultView};
use crate::settings::Settings;
use crate::task::BackgroundTask;

const ERROR_COLOR: Color32 = Color32::from_rgb(200, 60, 60);

pub struct SpeechformApp {
    catalog: Catalog,
    form: FormState,
    dispatcher: Option<Dispatcher>,
    outcome_fallback: RequestOutcome,

    player: Option<AudioPlayer>,
    output_error: Option<String>,
    clip: Option<AudioClip>,
    clip_task: Option<BackgroundTask<AudioClip>>,
    // Playback and save problems. Never written into the request outcome.
    audio_error: Option<String>,
    config_error: Option<String>,
    status_text: Option<String>,
}

impl SpeechformApp {
    pub fn new(catalog: Catalog, settings: &Settings, client: Option<GoogleTtsClient>) -> Self {
        let form = FormState::from_defaults(
            &catalog,
            settings.default_language.as_deref(),
            settings.default_voice.as_deref(),
        );
        let (dispatcher, config_error) = match client {
            Some(client) => (Some(Dispatcher::new(Arc::new(client))), None),
            None => (None, Some(format!("{API_KEY_VAR} not configured"))),
        };
        let (player, output_error) = match AudioPlayer::new() {
            Ok(player) => (Some(player), None),
            Err(err) => (None, Some(err.to_string())),
        };

        Self {
            catalog,
            form,
            dispatcher,
            outcome_fallback: RequestOutcome::Idle,
            player,
            output_error,
            clip: None,
            clip_task: None,
            audio_error: None,
            config_error,
            status_text: None,
        }
    }

    fn outcome(&self) -> &RequestOutcome {
        self.dispatcher
            .as_ref()
            .map(Dispatcher::outcome)
            .unwrap_or(&self.outcome_fallback)
    }

    fn can_submit(&self) -> bool {
        submission_enabled(self.dispatcher.as_ref(), &self.form)
    }

    fn submit(&mut self) {
        let Some(dispatcher) = self.dispatcher.as_mut() else {
            return;
        };
        if let Some(player) = self.player.as_mut() {
            player.stop();
        }
        self.clip = None;
        self.clip_task = None;
        self.audio_error = None;
        self.status_text = None;
        let form = &self.form;
        if let Err(err) = dispatcher.submit(form.text(), form.language(), form.voice()) {
            log::debug!("Submit ignored: {err}");
        }
    }

    fn poll_synthesis(&mut self, ctx: &Context) {
        let Some(dispatcher) = self.dispatcher.as_mut() else {
            return;
        };
        if dispatcher.poll() {
            if let ResultView::Audio { source, .. } = ResultView::from(dispatcher.outcome()) {
                self.clip_task = Some(AudioClip::spawn_from_data_uri(source.to_string()));
            }
        } else if dispatcher.in_flight() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
    }

    fn poll_clip(&mut self, ctx: &Context) {
        let Some(task) = &mut self.clip_task else {
            return;
        };
        match task.try_take() {
            Some(Ok(clip)) => {
                self.clip_task = None;
                self.clip = Some(clip);
            }
            Some(Err(err)) => {
                self.clip_task = None;
                self.audio_error = Some(err.to_string());
            }
            None => ctx.request_repaint_after(Duration::from_millis(50)),
        }
    }

    fn show_form(&mut self, ui: &mut Ui) {
        let width = ui.available_width();
        ui.add_sized(
            Vec2::new(width, ui.spacing().interact_size.y * 4.0),
            egui::TextEdit::multiline(self.form.text_mut())
                .hint_text("Enter text to convert to speech..."),
        );

        ui.add_space(8.0);
        let catalog = self.catalog;
        ui.columns(2, |columns| {
            columns[0].label("Language");
            let selected_language = catalog
                .language(self.form.language())
                .map(|lang| lang.name)
                .unwrap_or_else(|| self.form.language());
            let mut picked_language = None;
            egui::ComboBox::from_id_source("language")
                .width(columns[0].available_width())
                .selected_text(selected_language)
                .show_ui(&mut columns[0], |ui| {
                    for lang in catalog.languages() {
                        let selected = lang.code == self.form.language();
                        if ui.selectable_label(selected, lang.name).clicked() {
                            picked_language = Some(lang.code);
                        }
                    }
                });
            if let Some(code) = picked_language {
                self.form.set_language(&catalog, code);
            }

            columns[1].label("Voice");
            let selected_voice = catalog
                .voice(self.form.voice())
                .map(|voice| voice.name)
                .unwrap_or_else(|| self.form.voice());
            let mut picked_voice = None;
            egui::ComboBox::from_id_source("voice")
                .width(columns[1].available_width())
                .selected_text(selected_voice)
                .show_ui(&mut columns[1], |ui| {
                    for voice in catalog.compatible_voices(self.form.language()) {
                        let selected = voice.code == self.form.voice();
                        if ui.selectable_label(selected, voice.name).clicked() {
                            picked_voice = Some(voice.code);
                        }
                    }
                });
            if let Some(code) = picked_voice {
                self.form.set_voice(code);
            }
        });

        ui.add_space(10.0);
        let enabled = self.can_submit();
        let label = submit_label(self.outcome());
        let button = egui::Button::new(RichText::new(label).size(16.0).strong());
        if ui
            .add_enabled_ui(enabled, |ui| ui.add_sized(Vec2::new(width, 38.0), button))
            .inner
            .clicked()
        {
            self.submit();
        }
    }

    fn show_result(&mut self, ui: &mut Ui, ctx: &Context) {
        let view = ResultView::from(self.outcome());
        let download_name = match view {
            ResultView::Empty => return,
            ResultView::Error(message) => {
                ui.colored_label(ERROR_COLOR, message);
                return;
            }
            ResultView::Audio { download_name, .. } => download_name,
        };

        ui.add_space(8.0);
        Frame::group(ui.style())
            .inner_margin(egui::Margin::same(10.0))
            .rounding(egui::Rounding::same(8.0))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.horizontal(|ui| {
                    let playing = self.player.as_ref().map_or(false, AudioPlayer::is_playing);
                    let play_label = if playing { "■ Stop" } else { "▶ Play" };
                    if ui
                        .add_enabled(self.clip.is_some(), egui::Button::new(play_label))
                        .clicked()
                    {
                        self.toggle_playback();
                    }
                    if self.clip_task.is_some() {
                        ui.spinner();
                    } else {
                        ui.label(RichText::new(self.playback_time()).monospace());
                    }
                    if playing {
                        ctx.request_repaint_after(Duration::from_millis(200));
                    }
                });
                ui.add_space(4.0);
                if ui.link("Download Audio").clicked() {
                    self.save_audio(download_name);
                }
            });
    }

    fn toggle_playback(&mut self) {
        let Some(player) = self.player.as_mut() else {
            self.audio_error = Some("Audio output unavailable".to_string());
            return;
        };
        if player.is_playing() {
            player.stop();
            return;
        }
        let Some(clip) = &self.clip else {
            return;
        };
        match player.play(clip) {
            Ok(()) => self.audio_error = None,
            Err(err) => self.audio_error = Some(err.to_string()),
        }
    }

    fn playback_time(&self) -> String {
        let total = self.clip.as_ref().and_then(AudioClip::duration);
        let elapsed = match &self.player {
            Some(player) if player.is_playing() => player.elapsed(),
            _ => Duration::ZERO,
        };
        match total {
            Some(total) => format!("{} / {}", time_display(elapsed), time_display(total)),
            None => time_display(elapsed),
        }
    }

    fn save_audio(&mut self, file_name: &str) {
        let Some(clip) = &self.clip else {
            return;
        };
        if let Some(path) = rfd::FileDialog::new()
            .set_title("Save Audio")
            .add_filter("MP3 audio", &["mp3"])
            .set_file_name(file_name)
            .save_file()
        {
            if let Err(err) = fs::write(&path, clip.bytes()) {
                self.audio_error = Some(format!("Failed to save file: {err}"));
            } else {
                log::info!("Saved audio to {}", path.display());
                self.status_text = Some(format!("Audio saved to {}", path.display()));
                self.audio_error = None;
            }
        }
    }
}

impl App for SpeechformApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.poll_synthesis(ctx);
        self.poll_clip(ctx);
        if let Some(player) = &mut self.player {
            player.refresh();
        }

        egui::TopBottomPanel::top("topbar").show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(RichText::new("Text-to-Speech Converter").heading().strong());
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(8.0);
            self.show_form(ui);
            ui.add_space(6.0);
            self.show_result(ui, ctx);

            ui.add_space(6.0);
            if let Some(msg) = &self.config_error {
                ui.colored_label(ERROR_COLOR, msg);
            }
            if let Some(msg) = &self.output_error {
                ui.colored_label(ERROR_COLOR, msg);
            }
            if let Some(msg) = &self.audio_error {
                ui.colored_label(ERROR_COLOR, msg);
            }
            if let Some(msg) = &self.status_text {
                ui.label(RichText::new(msg).small());
            }
        });
    }
}

/// Submission needs a configured client on top of the form's own rules.
fn submission_enabled(dispatcher: Option<&Dispatcher>, form: &FormState) -> bool {
    dispatcher.map_or(false, |dispatcher| form.can_submit(dispatcher.outcome()))
}

fn time_display(duration: Duration) -> String {
    let secs = duration.as_secs();
    let m = secs / 60;
    let s = secs % 60;
    format!("{m:02}:{s:02}")
}
