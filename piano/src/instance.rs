//! One keyboard instance: capability check, asset load, subscription, and routing.

use std::time::Instant;

use engine::audio::{AudioClip, AudioHost};
use engine::events::{EventSource, HostEvent, Subscription, SubscriptionId};
use engine::graphics::Renderer2d;
use engine::surface::SurfaceSize;
use thiserror::Error;

use crate::config::{PianoConfig, Theme};
use crate::input::InputRouter;
use crate::key::{Keyboard, PianoKey};
use crate::layout::KeyboardLayout;
use crate::loader::{AssetLoader, AudioFormat, LoadReport, LoadRequest, probe_format};
use crate::notes::{Note, NoteRegistry};
use crate::render::{Scene, draw_piano};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityError {
    #[error("no drawable surface")]
    NoSurface,
    #[error("no audio playback available")]
    NoAudio,
    #[error("none of the sample encodings can be played")]
    UnsupportedEncoding,
}

/// What the environment offers a new instance. Either half may be missing.
pub struct HostCapabilities<'a, H> {
    pub audio: Option<&'a mut H>,
    pub surface: Option<SurfaceSize>,
}

pub fn check_capabilities<H: AudioHost>(
    caps: &HostCapabilities<'_, H>,
) -> Result<AudioFormat, CapabilityError> {
    if caps.surface.is_none_or(|s| s.is_empty()) {
        return Err(CapabilityError::NoSurface);
    }
    let host = caps.audio.as_deref().ok_or(CapabilityError::NoAudio)?;
    probe_format(host).ok_or(CapabilityError::UnsupportedEncoding)
}

pub struct Piano<C> {
    title: String,
    theme: Theme,
    layout: KeyboardLayout,
    registry: NoteRegistry,
    keyboard: Keyboard<C>,
    router: InputRouter,
    loader: Option<AssetLoader>,
    report: Option<LoadReport>,
    subscription: Option<Subscription>,
}

impl<C: AudioClip> Piano<C> {
    /// Builds an instance and starts loading its samples, or returns `None` (with the reason
    /// logged) when the environment cannot host one.
    pub fn create<H>(config: &PianoConfig, caps: HostCapabilities<'_, H>) -> Option<Self>
    where
        H: AudioHost<Clip = C>,
    {
        Self::create_at(config, caps, Instant::now())
    }

    pub fn create_at<H>(
        config: &PianoConfig,
        caps: HostCapabilities<'_, H>,
        now: Instant,
    ) -> Option<Self>
    where
        H: AudioHost<Clip = C>,
    {
        let format = match check_capabilities(&caps) {
            Ok(format) => format,
            Err(err) => {
                log::warn!("cannot create piano: {err}");
                return None;
            }
        };
        let (host, size) = (caps.audio?, caps.surface?);

        let registry = NoteRegistry::standard();
        let layout = KeyboardLayout::compute(size, &config.title, config.title_scale);
        let request = LoadRequest {
            base_path: &config.base_path,
            voice: &config.voice,
            format,
            timeout: config.load_timeout(),
        };
        log::info!(
            "loading voice '{}' from {} as {}",
            config.voice,
            config.base_path.display(),
            format.mime
        );
        let (loader, clips) = AssetLoader::start(host, registry.scale(), &request, now);

        Some(Self {
            title: config.title.clone(),
            theme: config.theme,
            keyboard: Keyboard::new(&layout, clips),
            layout,
            registry,
            router: InputRouter::new(),
            loader: Some(loader),
            report: None,
            subscription: None,
        })
    }

    /// Registers `f` to run once loading finishes (immediately if it already has).
    ///
    /// An instance torn down before its load finished never completes, so `f` is dropped
    /// without running.
    pub fn on_loaded(&mut self, f: impl FnOnce(&LoadReport) + 'static) {
        match (self.loader.as_mut(), self.report.as_ref()) {
            (Some(loader), _) => loader.barrier_mut().on_complete(f),
            (None, Some(report)) => f(report),
            (None, None) => {
                log::debug!("load continuation dropped: torn down before loading finished")
            }
        }
    }

    /// Advances loading. On completion marks the ready keys playable, subscribes to `events`,
    /// and draws the first frame into `gfx`. Returns the report on that call only.
    pub fn poll_assets(
        &mut self,
        now: Instant,
        events: &mut EventSource,
        gfx: &mut dyn Renderer2d,
    ) -> Option<LoadReport> {
        let report = self.loader.as_mut()?.poll(now)?;
        self.loader = None;

        for &note in &report.ready {
            if let Some(key) = self.keyboard.key_mut(note) {
                key.mark_loaded();
            }
        }
        self.subscription = Some(events.subscribe());
        self.report = Some(report.clone());
        self.render(gfx);
        Some(report)
    }

    pub fn is_ready(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loader.is_some()
    }

    pub fn load_report(&self) -> Option<&LoadReport> {
        self.report.as_ref()
    }

    pub fn subscription_id(&self) -> Option<SubscriptionId> {
        self.subscription.as_ref().map(Subscription::id)
    }

    /// Applies `event` to the model. Ignored until loading has finished.
    pub fn handle_event(&mut self, event: &HostEvent) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.router.route(event, &mut self.keyboard, &self.registry)
    }

    /// Applies `event` and redraws straight away if anything changed.
    pub fn dispatch(&mut self, event: &HostEvent, gfx: &mut dyn Renderer2d) -> bool {
        let changed = self.handle_event(event);
        if changed {
            self.render(gfx);
        }
        changed
    }

    pub fn render(&self, gfx: &mut dyn Renderer2d) {
        draw_piano(
            gfx,
            &Scene {
                keyboard: &self.keyboard,
                layout: &self.layout,
                theme: &self.theme,
                title: &self.title,
                powered: self.router.is_powered(),
            },
        );
    }

    /// Detaches from `events` and stops every sample. Safe to call more than once.
    pub fn teardown(&mut self, events: &mut EventSource) {
        if let Some(subscription) = self.subscription.take() {
            events.unsubscribe(subscription);
        }
        self.loader = None;
        self.keyboard.iter_mut().for_each(PianoKey::silence);
        self.router.reset();
        log::debug!("piano torn down");
    }

    pub fn missing_notes(&self) -> Vec<Note> {
        self.keyboard
            .iter()
            .filter(|k| !k.is_loaded())
            .map(PianoKey::note)
            .collect()
    }

    pub fn keyboard(&self) -> &Keyboard<C> {
        &self.keyboard
    }

    pub fn layout(&self) -> &KeyboardLayout {
        &self.layout
    }

    pub fn registry(&self) -> &NoteRegistry {
        &self.registry
    }

    pub fn is_powered(&self) -> bool {
        self.router.is_powered()
    }

    pub fn mouse_target(&self) -> Option<Note> {
        self.router.mouse_target()
    }
}
