//! Audio format probing and the all-notes-ready barrier.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use engine::audio::{AudioHost, ClipId, ReadyQueue};

use crate::notes::Note;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    pub mime: &'static str,
    pub extension: &'static str,
}

pub const MP3: AudioFormat = AudioFormat {
    mime: "audio/mpeg",
    extension: ".mp3",
};
pub const WAV: AudioFormat = AudioFormat {
    mime: "audio/wav",
    extension: ".wav",
};
pub const OGG: AudioFormat = AudioFormat {
    mime: "audio/ogg",
    extension: ".ogg",
};

/// Compressed first, then raw PCM, then the second alternative.
pub const FORMAT_PRIORITY: [AudioFormat; 3] = [MP3, WAV, OGG];

/// First format in [`FORMAT_PRIORITY`] the host can play, or `None` if it can play none of them.
pub fn probe_format<H: AudioHost>(host: &H) -> Option<AudioFormat> {
    FORMAT_PRIORITY
        .into_iter()
        .find(|format| host.can_play_type(format.mime))
}

/// `{base}/{voice}/{note}{extension}`
pub fn asset_path(base: &Path, voice: &str, note: Note, format: AudioFormat) -> PathBuf {
    base.join(voice)
        .join(format!("{}{}", note.name(), format.extension))
}

/// Outcome of a finished load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub ready: Vec<Note>,
    /// Notes that never reported ready before the deadline.
    pub stalled: Vec<Note>,
}

impl LoadReport {
    pub fn is_degraded(&self) -> bool {
        !self.stalled.is_empty()
    }
}

type Continuation = Box<dyn FnOnce(&LoadReport)>;

/// Counts N independent readiness signals down to one completion.
///
/// Each clip id is subscribed until its first signal; the subscription is dropped as it fires,
/// so repeated signals for the same clip are ignored. Continuations run exactly once.
pub struct LoadBarrier {
    awaiting: Vec<Option<Note>>,
    remaining: usize,
    report: LoadReport,
    continuations: Vec<Continuation>,
    complete: bool,
}

impl fmt::Debug for LoadBarrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadBarrier")
            .field("remaining", &self.remaining)
            .field("report", &self.report)
            .field("continuations", &self.continuations.len())
            .field("complete", &self.complete)
            .finish()
    }
}

impl LoadBarrier {
    /// Clip id `i` stands for `notes[i]`.
    pub fn new(notes: &[Note]) -> Self {
        Self {
            awaiting: notes.iter().copied().map(Some).collect(),
            remaining: notes.len(),
            report: LoadReport::default(),
            continuations: Vec::new(),
            complete: false,
        }
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Registers `f` to run on completion; runs it immediately if already complete.
    pub fn on_complete(&mut self, f: impl FnOnce(&LoadReport) + 'static) {
        if self.complete {
            f(&self.report);
        } else {
            self.continuations.push(Box::new(f));
        }
    }

    /// Records that `id` is ready. Returns the report on the signal that completes the barrier.
    pub fn signal(&mut self, id: ClipId) -> Option<LoadReport> {
        let note = self.awaiting.get_mut(id).and_then(Option::take)?;
        self.report.ready.push(note);
        self.remaining -= 1;
        self.finish_if_done()
    }

    /// Gives up on everything still outstanding, marking it stalled.
    pub fn expire_overdue(&mut self) -> Option<LoadReport> {
        if self.complete {
            return None;
        }
        for note in self.awaiting.iter_mut().filter_map(Option::take) {
            self.report.stalled.push(note);
        }
        self.remaining = 0;
        self.finish_if_done()
    }

    fn finish_if_done(&mut self) -> Option<LoadReport> {
        if self.remaining > 0 || self.complete {
            return None;
        }
        self.complete = true;
        for continuation in self.continuations.drain(..) {
            continuation(&self.report);
        }
        Some(self.report.clone())
    }
}

#[derive(Debug, Clone)]
pub struct LoadRequest<'a> {
    pub base_path: &'a Path,
    pub voice: &'a str,
    pub format: AudioFormat,
    /// Per-asset deadline measured from the start of loading; `None` waits forever.
    pub timeout: Option<Duration>,
}

/// Drives one load of every note in a scale.
#[derive(Debug)]
pub struct AssetLoader {
    queue: ReadyQueue,
    barrier: LoadBarrier,
    started: Instant,
    deadline: Option<Instant>,
}

impl AssetLoader {
    /// Issues every load up front without waiting on any of them. The returned clips are in
    /// `notes` order.
    pub fn start<H: AudioHost>(
        host: &mut H,
        notes: &[Note],
        request: &LoadRequest<'_>,
        now: Instant,
    ) -> (Self, Vec<H::Clip>) {
        let queue = ReadyQueue::new();
        let clips = notes
            .iter()
            .enumerate()
            .map(|(id, &note)| {
                let path = asset_path(request.base_path, request.voice, note, request.format);
                log::debug!("loading {note} from {}", path.display());
                host.load(&path, queue.signal(id))
            })
            .collect();

        let loader = Self {
            queue,
            barrier: LoadBarrier::new(notes),
            started: now,
            deadline: request.timeout.map(|t| now + t),
        };
        (loader, clips)
    }

    pub fn barrier_mut(&mut self) -> &mut LoadBarrier {
        &mut self.barrier
    }

    pub fn remaining(&self) -> usize {
        self.barrier.remaining()
    }

    /// Drains readiness signals and applies the deadline. Returns the report exactly once.
    pub fn poll(&mut self, now: Instant) -> Option<LoadReport> {
        if self.barrier.is_complete() {
            return None;
        }

        let mut report = None;
        for id in self.queue.drain() {
            if let Some(done) = self.barrier.signal(id) {
                report = Some(done);
            }
        }

        if report.is_none() && self.deadline.is_some_and(|d| now >= d) {
            report = self.barrier.expire_overdue();
        }

        if let Some(report) = report.as_ref() {
            let elapsed = now.saturating_duration_since(self.started);
            if report.is_degraded() {
                let stalled: Vec<_> = report.stalled.iter().map(|n| n.name()).collect();
                log::warn!(
                    "continuing without {} sample(s) after {elapsed:?}: {}",
                    stalled.len(),
                    stalled.join(", ")
                );
            } else {
                log::info!("all {} samples ready after {elapsed:?}", report.ready.len());
            }
        }
        report
    }
}
