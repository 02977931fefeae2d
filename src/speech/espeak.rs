use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::{Child, Command};

use super::{Playback, Speaker};
use crate::error::SpeechError;

/// Runs the `espeak` executable once per utterance.
pub struct Espeak {
    program: PathBuf,
    /// Words per minute.
    rate: u32,
    child: Option<Child>,
}

impl Espeak {
    pub fn new(program: PathBuf, rate: u32) -> Self {
        return Self { program, rate, child: None };
    }

    /// Finds `espeak` on `PATH`.
    pub fn locate(rate: u32) -> Option<Self> {
        return which::which("espeak").ok().map(|program| Self::new(program, rate));
    }
}

#[async_trait]
impl Speaker for Espeak {
    fn name(&self) -> &'static str {
        return "espeak";
    }

    async fn speak(&mut self, text: &str) -> Result<(), SpeechError> {
        let child = Command::new(&self.program)
            .arg("-s")
            .arg(self.rate.to_string())
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| SpeechError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;
        self.child = Some(child);
        return Ok(());
    }

    fn playback(&mut self) -> Option<&mut dyn Playback> {
        return Some(self);
    }
}

#[async_trait]
impl Playback for Espeak {
    async fn is_speaking(&mut self) -> Result<bool, SpeechError> {
        let Some(child) = self.child.as_mut() else {
            return Ok(false);
        };
        if child.try_wait()?.is_some() {
            self.child = None;
            return Ok(false);
        }
        return Ok(true);
    }
}
