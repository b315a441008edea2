//! Sequential word playback
//!
//! The scheduler pops one word at a time from a [`PlaybackQueue`], starts its
//! tone, holds it for the dwell time and stops it before moving on, so at most
//! one tone is ever sounding. Runs on a dedicated thread and can be cancelled
//! between (or during) steps through a [`CancelToken`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use sonify_core::{
    PlaybackEvent, PlaybackQueue, PlaybackState, PlaybackSummary, ToneRequest, TransferCurve,
};
use tracing::{debug, error, info};

/// A sounding tone. Stopping consumes the handle, so each tone stops once.
pub trait ActiveTone: Send {
    fn stop(self);
}

/// Something that can sound tones through the shared signal chain
pub trait ToneSource: Send + Sync {
    type Tone: ActiveTone;

    /// Start a tone immediately; it sounds until the returned handle is stopped
    fn play_tone(&self, request: &ToneRequest) -> Self::Tone;

    /// Replace the distortion curve used by every tone
    fn install_curve(&self, curve: TransferCurve);
}

/// Shared cancellation flag checked at every step boundary
#[derive(Debug, Clone)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    wake_tx: Sender<()>,
    wake_rx: Receiver<()>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    pub fn new() -> Self {
        let (wake_tx, wake_rx) = bounded(1);
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            wake_tx,
            wake_rx,
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        let _ = self.wake_tx.try_send(());
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Sleep for `timeout` unless cancelled first. Returns true if cancelled.
    pub fn wait(&self, timeout: Duration) -> bool {
        if self.is_cancelled() {
            return true;
        }
        match self.wake_rx.recv_timeout(timeout) {
            Ok(()) => true,
            Err(_) => self.is_cancelled(),
        }
    }
}

pub struct PlaybackScheduler<S: ToneSource> {
    source: Arc<S>,
    dwell: Duration,
}

impl<S: ToneSource + 'static> PlaybackScheduler<S> {
    pub fn new(source: Arc<S>, dwell: Duration) -> Self {
        Self { source, dwell }
    }

    pub fn dwell(&self) -> Duration {
        self.dwell
    }

    /// Play the queue on the current thread until it is exhausted or cancelled
    pub fn run(
        &self,
        mut queue: PlaybackQueue,
        cancel: &CancelToken,
        state: &Mutex<PlaybackState>,
        events: &Sender<PlaybackEvent>,
    ) -> PlaybackSummary {
        let mut summary = PlaybackSummary::default();
        let mut index = 0;

        loop {
            if cancel.is_cancelled() {
                summary.cancelled = true;
                break;
            }
            let Some(word) = queue.pop_front() else {
                break;
            };
            let Some(request) = ToneRequest::new(&word) else {
                index += 1;
                continue;
            };

            let tone = self.source.play_tone(&request);
            if let Ok(mut state) = state.lock() {
                *state = PlaybackState::Playing { index, word: word.clone() };
            }
            debug!(index, word = %word, frequency_hz = request.frequency_hz, "Tone started");
            let _ = events.send(PlaybackEvent::ToneStarted {
                index,
                word: word.clone(),
                frequency_hz: request.frequency_hz,
            });

            let interrupted = cancel.wait(self.dwell);

            tone.stop();
            summary.tones_played += 1;
            let _ = events.send(PlaybackEvent::ToneStopped { index, word });
            index += 1;

            if interrupted {
                summary.cancelled = true;
                break;
            }
        }

        if let Ok(mut state) = state.lock() {
            *state = PlaybackState::Idle;
        }
        info!(tones = summary.tones_played, cancelled = summary.cancelled, "Playback finished");
        let _ = events.send(PlaybackEvent::Finished(summary));
        summary
    }

    /// Play the queue on a background thread
    pub fn spawn(self, queue: PlaybackQueue) -> PlaybackHandle {
        self.spawn_then(queue, |_| {})
    }

    /// Play the queue on a background thread and call `on_finish` when it ends.
    ///
    /// `on_finish` is dropped even if playback panics, so it can own guards.
    pub fn spawn_then<F>(self, queue: PlaybackQueue, on_finish: F) -> PlaybackHandle
    where
        F: FnOnce(PlaybackSummary) + Send + 'static,
    {
        let cancel = CancelToken::new();
        let state = Arc::new(Mutex::new(PlaybackState::Idle));
        let (events_tx, events_rx) = unbounded();

        let thread_cancel = cancel.clone();
        let thread_state = state.clone();
        let thread = thread::spawn(move || {
            let summary = self.run(queue, &thread_cancel, &thread_state, &events_tx);
            on_finish(summary);
            summary
        });

        PlaybackHandle {
            cancel,
            state,
            events: events_rx,
            thread: Some(thread),
        }
    }
}

/// Handle to a running playback. Dropping it leaves playback running.
pub struct PlaybackHandle {
    cancel: CancelToken,
    state: Arc<Mutex<PlaybackState>>,
    events: Receiver<PlaybackEvent>,
    thread: Option<JoinHandle<PlaybackSummary>>,
}

impl PlaybackHandle {
    /// Stop playback. The sounding tone is silenced without waiting out its
    /// dwell and no further words start.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn state(&self) -> PlaybackState {
        self.state.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn events(&self) -> &Receiver<PlaybackEvent> {
        &self.events
    }

    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().is_none_or(|t| t.is_finished())
    }

    /// Block until playback ends
    pub fn wait(mut self) -> PlaybackSummary {
        let Some(thread) = self.thread.take() else {
            return PlaybackSummary::default();
        };
        thread.join().unwrap_or_else(|_| {
            error!("Playback thread panicked");
            PlaybackSummary { tones_played: 0, cancelled: true }
        })
    }
}
