//! Audio output device access

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::StreamConfig;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum AudioOutputError {
    #[error("No audio output devices found")]
    NoDevices,
    #[error("Failed to get default output config: {0}")]
    ConfigError(String),
    #[error("Failed to build output stream: {0}")]
    StreamError(String),
}

/// Real-time audio output stream driven by a render callback
pub struct RealtimeOutputStream {
    stop_flag: Arc<AtomicBool>,
    _stream: cpal::Stream,
}

impl RealtimeOutputStream {
    /// Open the default output device and start pulling samples from `sample_callback`.
    ///
    /// The callback receives an interleaved buffer, the device sample rate and
    /// the channel count.
    pub fn start<F>(sample_callback: F) -> Result<Self, AudioOutputError>
    where
        F: FnMut(&mut [f32], u32, u16) + Send + 'static,
    {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioOutputError::NoDevices)?;

        let supported_config = device
            .default_output_config()
            .map_err(|e| AudioOutputError::ConfigError(e.to_string()))?;

        let sample_rate = supported_config.sample_rate().0;
        let channels = supported_config.channels();

        let stop_flag = Arc::new(AtomicBool::new(false));
        let stop_clone = stop_flag.clone();

        let config: StreamConfig = supported_config.into();
        let callback = Arc::new(Mutex::new(sample_callback));

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    if stop_clone.load(Ordering::SeqCst) {
                        data.fill(0.0);
                        return;
                    }
                    let Ok(mut cb) = callback.lock() else {
                        data.fill(0.0);
                        return;
                    };
                    cb(data, sample_rate, channels);
                },
                move |err| error!("Output stream error: {}", err),
                None,
            )
            .map_err(|e| AudioOutputError::StreamError(e.to_string()))?;

        stream.play().map_err(|e| AudioOutputError::StreamError(e.to_string()))?;

        info!(
            device = %device.name().unwrap_or_default(),
            sample_rate,
            channels,
            "Started realtime output stream"
        );

        Ok(Self { stop_flag, _stream: stream })
    }

    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::SeqCst);
    }
}

impl Drop for RealtimeOutputStream {
    fn drop(&mut self) {
        self.stop_flag.store(true, Ordering::SeqCst);
    }
}
