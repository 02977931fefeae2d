use std::future::Future;

use chrono::Utc;
use log::debug;

use crate::error::{Result, SpeechError};
use crate::metrics::MetricsSource;
use crate::report::Report;
use crate::speech::{speak_and_wait, Speaker, WaitOptions};

#[derive(Debug, Clone, Copy)]
pub struct DispatchOptions {
    pub print: bool,
    pub wait: WaitOptions,
}

/// Produces the report `selector` names, prints it, and speaks it once.
///
/// Selectors outside 1..=5 do nothing: no metrics are read and no speaker is
/// opened. An empty report (no qualifying disks) is neither printed nor
/// spoken. Returns the spoken text, if any.
pub async fn dispatch<F, Fut>(
    selector: i64,
    metrics: &mut dyn MetricsSource,
    open_speaker: F,
    options: DispatchOptions,
) -> Result<Option<String>>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = std::result::Result<Box<dyn Speaker>, SpeechError>>,
{
    let Some(report) = Report::from_selector(selector) else {
        debug!("no report for selector {}", selector);
        return Ok(None);
    };

    let text = report.build(metrics, Utc::now()).await?;
    if text.is_empty() {
        debug!("{:?} report is empty, nothing to say", report);
        return Ok(None);
    }
    if options.print {
        println!("{}", text);
    }

    let mut speaker = open_speaker().await?;
    speak_and_wait(speaker.as_mut(), &text, options.wait).await?;
    return Ok(Some(text));
}
