//! Microphone capture using cpal
//!
//! Samples are collected as mono i16 at the device rate, then resampled to
//! the preset rate and written as FLAC when the capture finishes.
//!
//! The cpal stream lives on its own thread because `cpal::Stream` is not
//! `Send`.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::thread::JoinHandle;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, StreamConfig};
use rubato::{FftFixedIn, Resampler};
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

use super::flac_encoder::encode_to_flac;
use crate::application::ports::{AudioCapture, CaptureError, CaptureOutcome};
use crate::domain::settings::EncodingPreset;

/// State of the capture in progress
struct ActiveCapture {
    path: PathBuf,
    preset: EncodingPreset,
    device_rate: u32,
    thread: JoinHandle<()>,
}

/// Records from an input device into `<dir>/recording-<epoch_ms>.flac`
pub struct CpalCapture {
    recordings_dir: PathBuf,
    device_name: Option<String>,
    /// Recorded samples (mono, i16, at device sample rate)
    audio_buffer: Arc<StdMutex<Vec<i16>>>,
    is_capturing: Arc<AtomicBool>,
    active: StdMutex<Option<ActiveCapture>>,
}

impl CpalCapture {
    /// Capture from the named input device, or the host default when `None`
    pub fn new(recordings_dir: impl Into<PathBuf>, device_name: Option<String>) -> Self {
        Self {
            recordings_dir: recordings_dir.into(),
            device_name,
            audio_buffer: Arc::new(StdMutex::new(Vec::new())),
            is_capturing: Arc::new(AtomicBool::new(false)),
            active: StdMutex::new(None),
        }
    }

    pub fn is_capturing(&self) -> bool {
        self.is_capturing.load(Ordering::SeqCst)
    }

    /// Path for a recording started at `epoch_ms`
    pub fn recording_path(dir: &Path, epoch_ms: i64) -> PathBuf {
        dir.join(format!("recording-{epoch_ms}.flac"))
    }

    /// Find the configured input device, falling back to the host default
    pub(crate) fn input_device(name: Option<&str>) -> Result<cpal::Device, CaptureError> {
        let host = cpal::default_host();

        if let Some(wanted) = name {
            let found = host.input_devices().ok().and_then(|mut devices| {
                devices.find(|d| d.name().map(|n| n == wanted).unwrap_or(false))
            });
            match found {
                Some(device) => return Ok(device),
                None => warn!(device = wanted, "input device not found, using default"),
            }
        }

        host.default_input_device().ok_or(CaptureError::NoAudioDevice)
    }

    /// Pick a stream config as close to `target_rate` as the device allows
    fn input_config(
        device: &cpal::Device,
        target_rate: u32,
    ) -> Result<(StreamConfig, SampleFormat), CaptureError> {
        let supported_configs = device
            .supported_input_configs()
            .map_err(|e| CaptureError::StartFailed(format!("Failed to get configs: {}", e)))?;

        let includes = |c: &cpal::SupportedStreamConfigRange| {
            c.min_sample_rate().0 <= target_rate && c.max_sample_rate().0 >= target_rate
        };

        let mut best_config: Option<cpal::SupportedStreamConfigRange> = None;
        for config in supported_configs {
            if config.sample_format() != SampleFormat::I16
                && config.sample_format() != SampleFormat::F32
            {
                continue;
            }

            let is_better = match &best_config {
                None => true,
                Some(current) => {
                    let fewer_channels = config.channels() < current.channels();
                    let better_rate = includes(&config) && !includes(current);
                    fewer_channels || better_rate
                }
            };
            if is_better {
                best_config = Some(config);
            }
        }

        let range = best_config
            .ok_or_else(|| CaptureError::StartFailed("No suitable config found".into()))?;

        let rate = target_rate.clamp(range.min_sample_rate().0, range.max_sample_rate().0);
        let config = StreamConfig {
            channels: range.channels(),
            sample_rate: SampleRate(rate),
            buffer_size: cpal::BufferSize::Default,
        };

        Ok((config, range.sample_format()))
    }

    /// Open and start the input stream. Returns the stream and its rate.
    fn open_stream(
        device_name: Option<&str>,
        target_rate: u32,
        audio_buffer: Arc<StdMutex<Vec<i16>>>,
        is_capturing: Arc<AtomicBool>,
    ) -> Result<(cpal::Stream, u32), CaptureError> {
        let device = Self::input_device(device_name)?;
        let (config, sample_format) = Self::input_config(&device, target_rate)?;
        let channels = config.channels;
        let on_error = |err: cpal::StreamError| error!(error = %err, "audio stream error");

        let stream = match sample_format {
            SampleFormat::I16 => device.build_input_stream(
                &config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    if is_capturing.load(Ordering::SeqCst) {
                        let mono = Self::stereo_to_mono(data, channels);
                        if let Ok(mut buffer) = audio_buffer.lock() {
                            buffer.extend_from_slice(&mono);
                        }
                    }
                },
                on_error,
                None,
            ),
            SampleFormat::F32 => device.build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if is_capturing.load(Ordering::SeqCst) {
                        let i16_data: Vec<i16> =
                            data.iter().map(|&s| (s * 32767.0) as i16).collect();
                        let mono = Self::stereo_to_mono(&i16_data, channels);
                        if let Ok(mut buffer) = audio_buffer.lock() {
                            buffer.extend_from_slice(&mono);
                        }
                    }
                },
                on_error,
                None,
            ),
            _ => {
                return Err(CaptureError::StartFailed(
                    "Unsupported sample format".into(),
                ))
            }
        }
        .map_err(|e| CaptureError::StartFailed(e.to_string()))?;

        stream
            .play()
            .map_err(|e| CaptureError::StartFailed(e.to_string()))?;

        Ok((stream, config.sample_rate.0))
    }

    /// Mix interleaved channels down to mono
    fn stereo_to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
        if channels == 1 {
            return samples.to_vec();
        }

        samples
            .chunks(channels as usize)
            .map(|chunk| {
                let sum: i32 = chunk.iter().map(|&s| s as i32).sum();
                (sum / chunk.len() as i32) as i16
            })
            .collect()
    }

    /// Resample mono audio between rates
    fn resample(samples: &[i16], source_rate: u32, target_rate: u32) -> Result<Vec<i16>, CaptureError> {
        if source_rate == target_rate || samples.is_empty() {
            return Ok(samples.to_vec());
        }

        let samples_f32: Vec<f32> = samples.iter().map(|&s| s as f32 / 32768.0).collect();

        let ratio = target_rate as f64 / source_rate as f64;
        let output_len = (samples_f32.len() as f64 * ratio).ceil() as usize;

        let mut resampler = FftFixedIn::<f32>::new(
            source_rate as usize,
            target_rate as usize,
            1024, // Chunk size
            2,    // Sub-chunks
            1,    // Mono
        )
        .map_err(|e| CaptureError::StopFailed(format!("Resampler init failed: {}", e)))?;

        let mut output = Vec::with_capacity(output_len);
        let mut input_pos = 0;

        while input_pos < samples_f32.len() {
            let frames_needed = resampler.input_frames_next();
            let end_pos = (input_pos + frames_needed).min(samples_f32.len());

            let mut chunk = samples_f32[input_pos..end_pos].to_vec();
            chunk.resize(frames_needed, 0.0);

            let resampled = resampler
                .process(&[chunk], None)
                .map_err(|e| CaptureError::StopFailed(format!("Resampling failed: {}", e)))?;

            output.extend(
                resampled[0]
                    .iter()
                    .map(|&s| (s.clamp(-1.0, 1.0) * 32767.0) as i16),
            );
            input_pos = end_pos;
        }

        output.truncate(output_len);
        Ok(output)
    }

    /// Resample, encode and write the captured samples
    fn write_recording(
        samples: &[i16],
        device_rate: u32,
        preset: EncodingPreset,
        path: &Path,
    ) -> Result<(), CaptureError> {
        let resampled = Self::resample(samples, device_rate, preset.sample_rate)?;
        let flac = encode_to_flac(&resampled, preset.sample_rate)
            .map_err(|e| CaptureError::StopFailed(e.to_string()))?;
        std::fs::write(path, flac)
            .map_err(|e| CaptureError::StopFailed(format!("Failed to write {}: {}", path.display(), e)))
    }

    fn lock_active(&self) -> std::sync::MutexGuard<'_, Option<ActiveCapture>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl AudioCapture for CpalCapture {
    async fn begin(&self, preset: EncodingPreset) -> Result<(), CaptureError> {
        if self.is_capturing.swap(true, Ordering::SeqCst) {
            return Err(CaptureError::StartFailed(
                "Recording already in progress".to_string(),
            ));
        }

        if let Err(e) = tokio::fs::create_dir_all(&self.recordings_dir).await {
            self.is_capturing.store(false, Ordering::SeqCst);
            return Err(CaptureError::StartFailed(format!(
                "Failed to create {}: {}",
                self.recordings_dir.display(),
                e
            )));
        }

        self.audio_buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();

        let path = Self::recording_path(
            &self.recordings_dir,
            chrono::Local::now().timestamp_millis(),
        );

        let (ready_tx, ready_rx) = oneshot::channel();
        let audio_buffer = Arc::clone(&self.audio_buffer);
        let is_capturing = Arc::clone(&self.is_capturing);
        let device_name = self.device_name.clone();
        let target_rate = preset.sample_rate;

        let thread = std::thread::spawn(move || {
            let stream = match Self::open_stream(
                device_name.as_deref(),
                target_rate,
                audio_buffer,
                Arc::clone(&is_capturing),
            ) {
                Ok((stream, rate)) => {
                    let _ = ready_tx.send(Ok(rate));
                    stream
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                    return;
                }
            };

            while is_capturing.load(Ordering::SeqCst) {
                std::thread::sleep(std::time::Duration::from_millis(50));
            }
            drop(stream);
        });

        let started = ready_rx
            .await
            .unwrap_or_else(|_| Err(CaptureError::StartFailed("Capture thread exited".into())));

        let device_rate = match started {
            Ok(rate) => rate,
            Err(e) => {
                self.is_capturing.store(false, Ordering::SeqCst);
                return Err(e);
            }
        };

        info!(path = %path.display(), device_rate, target_rate, "capture started");
        *self.lock_active() = Some(ActiveCapture {
            path,
            preset,
            device_rate,
            thread,
        });
        Ok(())
    }

    async fn finish(&self) -> Result<CaptureOutcome, CaptureError> {
        let active = self.lock_active().take().ok_or(CaptureError::NotCapturing)?;

        self.is_capturing.store(false, Ordering::SeqCst);
        let ActiveCapture {
            path,
            preset,
            device_rate,
            thread,
        } = active;

        tokio::task::spawn_blocking(move || thread.join())
            .await
            .map_err(|e| CaptureError::StopFailed(format!("Task join error: {}", e)))?
            .map_err(|_| CaptureError::StopFailed("Capture thread panicked".into()))?;

        let samples = std::mem::take(
            &mut *self
                .audio_buffer
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );

        if samples.is_empty() {
            return Err(CaptureError::StopFailed(
                "No audio data captured".to_string(),
            ));
        }

        let duration_ms = samples.len() as u64 * 1000 / u64::from(device_rate.max(1));
        debug!(samples = samples.len(), duration_ms, "encoding capture");

        let target = path.clone();
        tokio::task::spawn_blocking(move || {
            Self::write_recording(&samples, device_rate, preset, &target)
        })
        .await
        .map_err(|e| CaptureError::StopFailed(format!("Encode task error: {}", e)))??;

        info!(path = %path.display(), duration_ms, "capture finished");
        Ok(CaptureOutcome {
            uri: Some(path.to_string_lossy().into_owned()),
            duration_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::settings::Quality;

    #[test]
    fn stereo_to_mono_single_channel() {
        let mono = vec![100i16, 200, 300];
        assert_eq!(CpalCapture::stereo_to_mono(&mono, 1), mono);
    }

    #[test]
    fn stereo_to_mono_two_channels() {
        let stereo = vec![100i16, 200, 300, 400];
        assert_eq!(CpalCapture::stereo_to_mono(&stereo, 2), vec![150, 350]);
    }

    #[test]
    fn resample_same_rate_is_passthrough() {
        let samples = vec![1i16, 2, 3];
        assert_eq!(CpalCapture::resample(&samples, 16_000, 16_000).unwrap(), samples);
    }

    #[test]
    fn resample_scales_length() {
        let samples = vec![0i16; 48_000];
        let out = CpalCapture::resample(&samples, 48_000, 16_000).unwrap();
        assert_eq!(out.len(), 16_000);
    }

    #[test]
    fn recording_path_format() {
        let path = CpalCapture::recording_path(Path::new("/data/recordings"), 1_700_000_000_123);
        assert_eq!(
            path,
            PathBuf::from("/data/recordings/recording-1700000000123.flac")
        );
    }

    #[test]
    fn write_recording_produces_flac_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.flac");
        let samples = vec![0i16; 4_800];

        CpalCapture::write_recording(&samples, 48_000, Quality::Medium.preset(), &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[0..4], b"fLaC");
    }

    #[tokio::test]
    async fn finish_without_begin_fails() {
        let capture = CpalCapture::new(std::env::temp_dir(), None);
        assert!(!capture.is_capturing());
        assert!(matches!(
            capture.finish().await,
            Err(CaptureError::NotCapturing)
        ));
    }

    #[tokio::test]
    #[ignore = "requires a microphone"]
    async fn capture_one_second() {
        let dir = tempfile::tempdir().unwrap();
        let capture = CpalCapture::new(dir.path(), None);

        capture.begin(Quality::Low.preset()).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_secs(1)).await;
        let outcome = capture.finish().await.unwrap();

        assert!(outcome.duration_ms >= 900);
        assert!(std::path::Path::new(&outcome.uri.unwrap()).exists());
    }
}
