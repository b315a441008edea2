//! Text sonification: sentiment -> distortion curve -> word tones

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use sonify_core::{
    distortion_curve, DistortionIntensity, PlaybackConfig, PlaybackQueue, PolarityMapping,
    Result, SentimentResult, SonifyError,
};
use tracing::{error, info, warn};

use crate::scheduler::{PlaybackHandle, PlaybackScheduler, ToneSource};
use crate::sentiment_client::SentimentAnalyzer;

/// Values published after each run for display
#[derive(Debug, Clone, PartialEq)]
pub struct SonificationReport {
    pub sentiment_type: String,
    pub score: f64,
    pub intensity: DistortionIntensity,
}

/// A started run: what was computed, and the playback still in progress
pub struct Sonification {
    pub report: SonificationReport,
    pub playback: PlaybackHandle,
}

/// Marks the sonifier busy until dropped
struct BusyGuard(Arc<AtomicBool>);

impl BusyGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self(flag.clone()))
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Coordinates one sonification at a time over a shared tone source
pub struct Sonifier<A: SentimentAnalyzer, S: ToneSource> {
    analyzer: A,
    source: Arc<S>,
    polarity: PolarityMapping,
    dwell: Duration,
    busy: Arc<AtomicBool>,
    last_report: Mutex<Option<SonificationReport>>,
}

impl<A: SentimentAnalyzer, S: ToneSource + 'static> Sonifier<A, S> {
    pub fn new(analyzer: A, source: Arc<S>, config: &PlaybackConfig) -> Self {
        Self {
            analyzer,
            source,
            polarity: config.polarity,
            dwell: config.dwell(),
            busy: Arc::new(AtomicBool::new(false)),
            last_report: Mutex::new(None),
        }
    }

    /// Analyse `text`, install the matching distortion curve and start playing
    /// its words. Returns as soon as playback has started.
    ///
    /// Fails with [`SonifyError::Busy`] while a previous run is still active.
    /// A sentiment failure leaves the curve untouched and plays nothing.
    pub fn sonify(&self, text: &str) -> Result<Sonification> {
        let guard = BusyGuard::acquire(&self.busy).ok_or(SonifyError::Busy)?;
        info!(chars = text.chars().count(), "Sonifying text");

        let sentiment = self
            .analyzer
            .analyze(text)
            .and_then(SentimentResult::normalized)
            .map(|(sentiment, clamped)| {
                if clamped {
                    warn!(score = sentiment.score, "Sentiment score outside [-1, 1], clamped");
                }
                sentiment
            })
            .map_err(|e| {
                error!("Sentiment analysis failed: {}", e);
                SonifyError::from(e)
            })?;

        let intensity = self.polarity.intensity(sentiment.score);
        self.source.install_curve(distortion_curve(Some(intensity.value())));

        let report = SonificationReport {
            sentiment_type: sentiment.kind,
            score: sentiment.score,
            intensity,
        };
        if let Ok(mut last) = self.last_report.lock() {
            *last = Some(report.clone());
        }
        info!(
            sentiment = %report.sentiment_type,
            score = report.score,
            intensity = intensity.value(),
            "Sentiment applied"
        );

        let queue = PlaybackQueue::from_text(text);
        let playback = PlaybackScheduler::new(self.source.clone(), self.dwell)
            .spawn_then(queue, move |_| drop(guard));

        Ok(Sonification { report, playback })
    }

    /// Whether a run is waiting on sentiment or still playing
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Report of the most recent successful run
    pub fn last_report(&self) -> Option<SonificationReport> {
        self.last_report.lock().ok().and_then(|r| r.clone())
    }

    pub fn polarity(&self) -> PolarityMapping {
        self.polarity
    }
}
