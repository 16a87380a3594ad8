//! Playable-audio primitive.
//!
//! [`AudioHost`] is what the keyboard needs from the platform: a way to ask whether an encoding
//! can be played, and a way to start loading a clip that later reports it can play through
//! without stalling. [`RodioHost`] is the desktop implementation.

use std::{
    fs,
    io::Cursor,
    path::{Path, PathBuf},
    sync::{Arc, OnceLock, mpsc},
    thread,
    time::{Duration, Instant},
};

use rodio::{OutputStream, OutputStreamHandle, Sink, Source, buffer::SamplesBuffer};
use thiserror::Error;

pub type ClipId = usize;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device available: {0}")]
    NoOutput(#[from] rodio::StreamError),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },
}

/// One-shot readiness notification for a single clip.
///
/// Firing consumes the signal, so a host cannot report the same clip ready twice through it.
#[derive(Debug)]
pub struct ReadySignal {
    id: ClipId,
    tx: mpsc::Sender<ClipId>,
}

impl ReadySignal {
    pub fn id(&self) -> ClipId {
        self.id
    }

    pub fn fire(self) {
        // A closed queue means the loader is gone; nobody is waiting any more.
        let _ = self.tx.send(self.id);
    }
}

/// Collects readiness signals from any thread for draining on the event loop.
#[derive(Debug)]
pub struct ReadyQueue {
    tx: mpsc::Sender<ClipId>,
    rx: mpsc::Receiver<ClipId>,
}

impl Default for ReadyQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadyQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    pub fn signal(&self, id: ClipId) -> ReadySignal {
        ReadySignal {
            id,
            tx: self.tx.clone(),
        }
    }

    /// Everything fired since the last drain, in arrival order. Never blocks.
    pub fn drain(&self) -> Vec<ClipId> {
        self.rx.try_iter().collect()
    }
}

pub trait AudioClip {
    /// Starts (or resumes) playback.
    fn play(&mut self);
    fn pause(&mut self);
    /// Stops any in-flight playback and rewinds to the beginning.
    fn seek_to_start(&mut self);
    /// True when nothing is audibly playing (never started, paused, stopped, or ended).
    fn is_paused(&self) -> bool;
    /// Current playback offset from the start of the clip.
    fn position(&self) -> Duration;
}

pub trait AudioHost {
    type Clip: AudioClip;

    /// Whether clips of `mime` (parameters such as `; codecs=` are ignored) can be played.
    fn can_play_type(&self, mime: &str) -> bool;

    /// Begins loading the clip at `path` without blocking. The host fires `ready` once the clip
    /// can play through; a clip that fails to load never fires.
    fn load(&mut self, path: &Path, ready: ReadySignal) -> Self::Clip;
}

fn essence(mime: &str) -> String {
    mime.split(';').next().unwrap_or_default().trim().to_ascii_lowercase()
}

#[derive(Debug)]
struct DecodedClip {
    channels: u16,
    sample_rate: u32,
    samples: Vec<i16>,
}

impl DecodedClip {
    fn duration(&self) -> Duration {
        let frames = self.samples.len() as u64 / self.channels.max(1) as u64;
        Duration::from_secs_f64(frames as f64 / self.sample_rate.max(1) as f64)
    }
}

fn decode_file(path: &Path) -> Result<DecodedClip, AudioError> {
    let bytes = fs::read(path).map_err(|source| AudioError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let decoder = rodio::Decoder::new(Cursor::new(bytes)).map_err(|source| AudioError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let channels = decoder.channels();
    let sample_rate = decoder.sample_rate();
    Ok(DecodedClip {
        channels,
        sample_rate,
        samples: decoder.collect(),
    })
}

/// Audio output through the default device.
pub struct RodioHost {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    volume: f32,
}

impl RodioHost {
    pub fn try_default() -> Result<Self, AudioError> {
        let (stream, handle) = OutputStream::try_default()?;
        Ok(Self {
            _stream: stream,
            handle,
            volume: 1.0,
        })
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume.clamp(0.0, 1.0);
        self
    }
}

impl AudioHost for RodioHost {
    type Clip = RodioClip;

    fn can_play_type(&self, mime: &str) -> bool {
        matches!(
            essence(mime).as_str(),
            "audio/mpeg"
                | "audio/mp3"
                | "audio/wav"
                | "audio/wave"
                | "audio/x-wav"
                | "audio/ogg"
                | "audio/vorbis"
                | "audio/flac"
        )
    }

    fn load(&mut self, path: &Path, ready: ReadySignal) -> RodioClip {
        let data = Arc::new(OnceLock::new());
        let slot = Arc::clone(&data);
        let path = path.to_path_buf();
        let spawned = thread::Builder::new()
            .name(format!("decode-{}", ready.id()))
            .spawn(move || match decode_file(&path) {
                Ok(clip) => {
                    log::debug!("decoded {} ({:?})", path.display(), clip.duration());
                    let _ = slot.set(clip);
                    ready.fire();
                }
                Err(err) => log::warn!("{err}"),
            });
        if let Err(err) = spawned {
            log::warn!("could not start decoder thread: {err}");
        }

        RodioClip {
            handle: self.handle.clone(),
            volume: self.volume,
            data,
            sink: None,
            started_at: None,
            paused_at: None,
        }
    }
}

/// A fully decoded clip; each strike plays through its own sink.
pub struct RodioClip {
    handle: OutputStreamHandle,
    volume: f32,
    data: Arc<OnceLock<DecodedClip>>,
    sink: Option<Sink>,
    started_at: Option<Instant>,
    paused_at: Option<Duration>,
}

impl AudioClip for RodioClip {
    fn play(&mut self) {
        if let (Some(sink), Some(offset)) = (self.sink.as_ref(), self.paused_at) {
            sink.play();
            self.started_at = Instant::now().checked_sub(offset);
            self.paused_at = None;
            return;
        }

        let Some(clip) = self.data.get() else {
            log::debug!("play requested before clip finished decoding");
            return;
        };
        let sink = match Sink::try_new(&self.handle) {
            Ok(sink) => sink,
            Err(err) => {
                log::warn!("could not open playback sink: {err}");
                return;
            }
        };
        sink.set_volume(self.volume);
        sink.append(SamplesBuffer::new(
            clip.channels,
            clip.sample_rate,
            clip.samples.clone(),
        ));
        self.sink = Some(sink);
        self.started_at = Some(Instant::now());
        self.paused_at = None;
    }

    fn pause(&mut self) {
        if let Some(sink) = self.sink.as_ref() {
            sink.pause();
            self.paused_at = Some(self.position());
        }
    }

    fn seek_to_start(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.started_at = None;
        self.paused_at = None;
    }

    fn is_paused(&self) -> bool {
        match self.sink.as_ref() {
            Some(sink) => sink.is_paused() || sink.empty(),
            None => true,
        }
    }

    fn position(&self) -> Duration {
        if let Some(at) = self.paused_at {
            return at;
        }
        let Some(started) = self.started_at else {
            return Duration::ZERO;
        };
        let elapsed = started.elapsed();
        match self.data.get() {
            Some(clip) => elapsed.min(clip.duration()),
            None => elapsed,
        }
    }
}
