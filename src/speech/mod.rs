//! Speech output: a [`Speaker`] per backend, picked once at startup.
//!
//! Some engines can tell whether they are still talking. Those hand out a
//! [`Playback`] handle, and [`speak_and_wait`] polls it so the process does
//! not exit mid-sentence. Everything else is fire-and-forget.

mod espeak;
mod silent;
#[cfg(unix)]
mod ssip;

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use serde::Deserialize;
use tokio::time::Instant;

use crate::config::SpeechConfig;
use crate::error::SpeechError;

pub use espeak::Espeak;
pub use silent::Silent;
#[cfg(unix)]
pub use ssip::{escape_message, resolve_socket, SpeechDispatcher};

#[async_trait]
pub trait Speaker: Send {
    fn name(&self) -> &'static str;

    async fn speak(&mut self, text: &str) -> Result<(), SpeechError>;

    /// `None` when the engine cannot report whether it is still speaking.
    fn playback(&mut self) -> Option<&mut dyn Playback> {
        return None;
    }
}

#[async_trait]
pub trait Playback: Send {
    async fn is_speaking(&mut self) -> Result<bool, SpeechError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    /// Speech Dispatcher if it is running, else espeak.
    #[default]
    Auto,
    SpeechDispatcher,
    Espeak,
    /// Print only.
    Silent,
}

/// Opens the configured backend.
pub async fn open(config: &SpeechConfig) -> Result<Box<dyn Speaker>, SpeechError> {
    let speaker: Box<dyn Speaker> = match config.backend {
        Backend::Auto => auto(config).await?,
        Backend::SpeechDispatcher => Box::new(open_dispatcher(config).await?),
        Backend::Espeak => Box::new(Espeak::locate(config.rate).ok_or(SpeechError::NoBackend)?),
        Backend::Silent => Box::new(Silent),
    };
    debug!("speaking through {}", speaker.name());
    return Ok(speaker);
}

async fn auto(config: &SpeechConfig) -> Result<Box<dyn Speaker>, SpeechError> {
    #[cfg(unix)]
    {
        match open_dispatcher(config).await {
            Ok(dispatcher) => return Ok(Box::new(dispatcher)),
            Err(err) => debug!("speech-dispatcher unavailable: {}", err),
        }
    }

    return match Espeak::locate(config.rate) {
        Some(espeak) => Ok(Box::new(espeak)),
        None => Err(SpeechError::NoBackend),
    };
}

#[cfg(unix)]
async fn open_dispatcher(config: &SpeechConfig) -> Result<SpeechDispatcher, SpeechError> {
    let address = std::env::var("SPEECHD_ADDRESS").ok();
    let path = config.socket_path.clone()
        .or_else(|| resolve_socket(address.as_deref(), dirs::runtime_dir()))
        .ok_or(SpeechError::NoBackend)?;
    return SpeechDispatcher::connect(&path, config.dispatcher_rate).await;
}

#[cfg(not(unix))]
async fn open_dispatcher(_config: &SpeechConfig) -> Result<Silent, SpeechError> {
    return Err(SpeechError::NoBackend);
}

/// How long to keep polling a [`Playback`] handle.
#[derive(Debug, Clone, Copy)]
pub struct WaitOptions {
    pub poll_interval: Duration,
    /// `None` waits for as long as the engine keeps speaking.
    pub timeout: Option<Duration>,
}

impl From<&SpeechConfig> for WaitOptions {
    fn from(config: &SpeechConfig) -> Self {
        return WaitOptions {
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            timeout: config.wait_timeout_ms.map(Duration::from_millis),
        };
    }
}

/// Speaks `text`, then blocks until the engine is done if it can say so.
pub async fn speak_and_wait(speaker: &mut dyn Speaker, text: &str, options: WaitOptions) -> Result<(), SpeechError> {
    speaker.speak(text).await?;

    let Some(playback) = speaker.playback() else {
        return Ok(());
    };

    let started = Instant::now();
    while playback.is_speaking().await? {
        if let Some(limit) = options.timeout {
            if started.elapsed() >= limit {
                warn!("still speaking after {:?}, giving up", limit);
                break;
            }
        }
        tokio::time::sleep(options.poll_interval).await;
    }
    return Ok(());
}
