//! Minimal SSIP client for Speech Dispatcher.
//!
//! Only what one utterance needs: name the client, optionally set the rate,
//! queue the message, and hang up. The daemon keeps speaking after we leave.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::debug;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;

use super::Speaker;
use crate::error::SpeechError;

const CLIENT_NAME: &str = "user:recmon:main";

/// Socket from `SPEECHD_ADDRESS` (`unix_socket:<path>`), else the per-user default.
pub fn resolve_socket(address: Option<&str>, runtime_dir: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(address) = address {
        match address.strip_prefix("unix_socket:") {
            Some(path) if !path.is_empty() => return Some(PathBuf::from(path)),
            _ => debug!("ignoring unsupported SPEECHD_ADDRESS {:?}", address),
        }
    }
    return runtime_dir.map(|dir| dir.join("speech-dispatcher").join("speechd.sock"));
}

/// Message body as sent after `SPEAK`: CRLF line ends, leading dots doubled,
/// terminated by a lone dot.
pub fn escape_message(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 5);
    for line in text.lines() {
        if line.starts_with('.') {
            out.push('.');
        }
        out.push_str(line);
        out.push_str("\r\n");
    }
    out.push_str(".\r\n");
    return out;
}

pub struct SpeechDispatcher {
    stream: BufReader<UnixStream>,
}

impl SpeechDispatcher {
    pub async fn connect(path: &Path, rate: Option<i32>) -> Result<Self, SpeechError> {
        let stream = UnixStream::connect(path).await?;
        let mut dispatcher = Self { stream: BufReader::new(stream) };
        dispatcher.command(&format!("SET SELF CLIENT_NAME {}", CLIENT_NAME)).await?;
        if let Some(rate) = rate {
            dispatcher.command(&format!("SET SELF RATE {}", rate.clamp(-100, 100))).await?;
        }
        return Ok(dispatcher);
    }

    async fn command(&mut self, line: &str) -> Result<u16, SpeechError> {
        self.send(&format!("{}\r\n", line)).await?;
        return self.reply().await;
    }

    async fn send(&mut self, data: &str) -> Result<(), SpeechError> {
        let stream = self.stream.get_mut();
        stream.write_all(data.as_bytes()).await?;
        stream.flush().await?;
        return Ok(());
    }

    /// Reads a possibly multi-line reply (`NNN-...` continuations, `NNN ...` last).
    async fn reply(&mut self) -> Result<u16, SpeechError> {
        loop {
            let mut line = String::new();
            if self.stream.read_line(&mut line).await? == 0 {
                return Err(SpeechError::Io(std::io::ErrorKind::UnexpectedEof.into()));
            }
            let line = line.trim_end();
            let code = line.get(..3)
                .and_then(|code| code.parse::<u16>().ok())
                .ok_or_else(|| SpeechError::Protocol { code: 0, line: line.to_string() })?;
            if line.as_bytes().get(3) == Some(&b'-') {
                continue;
            }
            if !(200..300).contains(&code) {
                return Err(SpeechError::Protocol { code, line: line.to_string() });
            }
            return Ok(code);
        }
    }
}

#[async_trait]
impl Speaker for SpeechDispatcher {
    fn name(&self) -> &'static str {
        return "speech-dispatcher";
    }

    async fn speak(&mut self, text: &str) -> Result<(), SpeechError> {
        self.command("SPEAK").await?;
        self.send(&escape_message(text)).await?;
        self.reply().await?;
        self.command("QUIT").await?;
        return Ok(());
    }
}
