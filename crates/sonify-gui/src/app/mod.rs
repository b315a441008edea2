mod config;

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, TryRecvError};
use sonify_services::{
    AudioEngine, EngineState, HttpSentimentClient, PlaybackHandle, SonificationReport, Sonifier,
};

const DEFAULT_TEXT: &str = "I'm baby truffaut portland wayfarers fam, post-ironic deep v venmo messenger bag pug butcher flannel brunch plaid hashtag. Succulents readymade craft beer tote bag Brooklyn coloring book meggings hoodie literally selvage master cleanse austin marfa gastropub squid.";

/// Fallback rate until the output device reports its own
const INITIAL_SAMPLE_RATE: u32 = 44100;

type RunOutcome = Result<(SonificationReport, PlaybackHandle), String>;

pub struct SonifyApp {
    text: String,
    engine: AudioEngine,
    /// Set when the output device could not be opened; sonifying is disabled
    engine_error: Option<String>,
    sonifier: Arc<Sonifier<HttpSentimentClient, EngineState>>,
    pending: Option<Receiver<RunOutcome>>,
    playback: Option<PlaybackHandle>,
    report: Option<SonificationReport>,
    error: Option<String>,
}

impl SonifyApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let config = config::load_config();
        tracing::info!(path = %config::config_path().display(), "Loaded config");

        let mut engine = AudioEngine::new(INITIAL_SAMPLE_RATE, config.playback.gain_db);
        let engine_error = engine.start().err().map(|e| {
            tracing::error!("Failed to start audio engine: {}", e);
            e.to_string()
        });

        let sonifier = Sonifier::new(
            HttpSentimentClient::new(config.sentiment),
            engine.state(),
            &config.playback,
        );

        Self {
            text: DEFAULT_TEXT.to_string(),
            engine,
            engine_error,
            sonifier: Arc::new(sonifier),
            pending: None,
            playback: None,
            report: None,
            error: None,
        }
    }

    fn start_sonify(&mut self) {
        let sonifier = self.sonifier.clone();
        let text = self.text.clone();
        let (tx, rx) = bounded(1);

        thread::spawn(move || {
            let outcome = sonifier
                .sonify(&text)
                .map(|run| (run.report, run.playback))
                .map_err(|e| e.to_string());
            let _ = tx.send(outcome);
        });

        self.error = None;
        self.pending = Some(rx);
    }

    fn poll_pending(&mut self) {
        let Some(rx) = &self.pending else { return };
        match rx.try_recv() {
            Ok(Ok((report, playback))) => {
                self.report = Some(report);
                self.playback = Some(playback);
                self.pending = None;
            }
            Ok(Err(e)) => {
                self.error = Some(e);
                self.pending = None;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.error = Some("Sonification stopped unexpectedly".to_string());
                self.pending = None;
            }
        }

        if self.playback.as_ref().is_some_and(|p| p.is_finished()) {
            self.playback = None;
        }
    }

    fn stop_playback(&mut self) {
        if let Some(playback) = &self.playback {
            playback.cancel();
        }
    }
}

impl eframe::App for SonifyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_pending();

        let loading = self.pending.is_some();
        let busy = self.sonifier.is_busy() || loading;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Text Sonification");
            ui.add_space(8.0);
            ui.label("Enter Text Below:");
            ui.add(
                egui::TextEdit::multiline(&mut self.text)
                    .desired_width(f32::INFINITY)
                    .desired_rows(8),
            );

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("Clear").clicked() {
                    self.text.clear();
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let can_sonify = !busy && self.engine_error.is_none();
                    let label = if loading { "Analyzing..." } else { "Sonify" };
                    if ui.add_enabled(can_sonify, egui::Button::new(label)).clicked() {
                        self.start_sonify();
                    }
                    if self.playback.is_some() && ui.button("Stop").clicked() {
                        self.stop_playback();
                    }
                });
            });

            ui.add_space(12.0);
            let (kind, score, intensity) = match &self.report {
                Some(r) => (r.sentiment_type.as_str(), r.score, r.intensity.value()),
                None => ("", 0.0, 0.0),
            };
            ui.label(format!("Sentiment Type: {kind}"));
            ui.label(format!("Sentiment Score: {score}"));
            ui.label(format!("Distortion Multiplier: {intensity}"));

            if let Some(playback) = &self.playback {
                if let Some(word) = playback.state().word() {
                    ui.label(format!("Playing: {word}"));
                }
            }

            if let Some(e) = self.engine_error.as_ref().or(self.error.as_ref()) {
                ui.add_space(8.0);
                ui.colored_label(egui::Color32::RED, e);
            }
        });

        if busy || self.playback.is_some() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
    }
}

impl Drop for SonifyApp {
    fn drop(&mut self) {
        self.stop_playback();
        if self.engine.is_running() {
            let _ = self.engine.stop();
        }
    }
}
