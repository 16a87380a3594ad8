use std::error::Error;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use engine::app::{App, AppConfig, AppContext, run_app};
use engine::audio::{RodioClip, RodioHost};
use engine::events::HostEvent;
use engine::surface::SurfaceSize;
use piano::{ConfigStore, HostCapabilities, Piano, PianoConfig};

const LOAD_POLL_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Parser)]
#[command(name = "piano")]
#[command(about = "Sampled piano keyboard played from the mouse or the home row")]
struct Cli {
    /// Config file; defaults to PIANO_CONFIG_PATH or the user config directory.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    voice: Option<String>,
    #[arg(long)]
    base_path: Option<PathBuf>,
    #[arg(long)]
    width: Option<u32>,
    #[arg(long)]
    height: Option<u32>,
    #[arg(long)]
    title: Option<String>,
    /// Per-sample load deadline; 0 waits forever.
    #[arg(long)]
    load_timeout_ms: Option<u64>,
}

impl Cli {
    fn apply(self, mut config: PianoConfig) -> PianoConfig {
        if let Some(voice) = self.voice {
            config.voice = voice;
        }
        if let Some(base_path) = self.base_path {
            config.base_path = base_path;
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(title) = self.title {
            config.title = title;
        }
        if let Some(ms) = self.load_timeout_ms {
            config.load_timeout = Duration::from_millis(ms);
        }
        config.sanitized()
    }
}

struct PianoApp {
    config: PianoConfig,
    audio: Option<RodioHost>,
    piano: Option<Piano<RodioClip>>,
}

impl App for PianoApp {
    fn init(&mut self, ctx: &mut AppContext) -> Result<(), Box<dyn Error>> {
        let caps = HostCapabilities {
            audio: self.audio.as_mut(),
            surface: Some(ctx.surface_size()),
        };
        let mut piano = Piano::create(&self.config, caps)
            .ok_or("this environment cannot host a piano keyboard")?;
        piano.on_loaded(|report| {
            if report.is_degraded() {
                log::info!("ready with {} of 12 keys", report.ready.len());
            } else {
                log::info!("ready; hover the window and play Q A W S D R F U J K O L");
            }
        });
        self.piano = Some(piano);
        Ok(())
    }

    fn on_event(&mut self, event: HostEvent, ctx: &mut AppContext) -> bool {
        let Some(piano) = self.piano.as_mut() else {
            return false;
        };
        let AppContext {
            renderer, events, ..
        } = ctx;
        renderer.draw_frame(|gfx| {
            let mut redraw = false;
            events.dispatch(&event, |id, event| {
                if piano.subscription_id() == Some(id) {
                    redraw |= piano.dispatch(event, gfx);
                }
            });
            redraw
        })
    }

    fn update(&mut self, now: Instant, ctx: &mut AppContext) -> bool {
        let Some(piano) = self.piano.as_mut().filter(|p| p.is_loading()) else {
            return false;
        };
        let AppContext {
            renderer, events, ..
        } = ctx;
        renderer
            .draw_frame(|gfx| piano.poll_assets(now, events, gfx))
            .is_some()
    }

    fn poll_interval(&self) -> Option<Duration> {
        self.piano
            .as_ref()
            .filter(|p| p.is_loading())
            .map(|_| LOAD_POLL_INTERVAL)
    }

    fn on_exit(&mut self, ctx: &mut AppContext) {
        if let Some(piano) = self.piano.as_mut() {
            piano.teardown(&mut ctx.events);
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let store = cli
        .config
        .clone()
        .map(ConfigStore::at)
        .unwrap_or_else(ConfigStore::from_env);
    let config = store
        .load()
        .with_context(|| format!("loading config from {}", store.path().display()))?;
    let config = cli.apply(config);

    let audio = match RodioHost::try_default() {
        Ok(host) => Some(host.with_volume(config.volume)),
        Err(err) => {
            log::warn!("{err}");
            None
        }
    };

    let app_config = AppConfig {
        title: config.title.clone(),
        size: SurfaceSize::new(config.width, config.height),
        resizable: true,
    };
    let app = PianoApp {
        config,
        audio,
        piano: None,
    };
    run_app(app_config, app).map_err(|err| anyhow!("piano exited: {err}"))
}
