//! Dispatcher tests against a scripted metrics source and a recording speaker.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use recmon::dispatch::{dispatch, DispatchOptions};
use recmon::error::{Error, MetricsError, SpeechError};
use recmon::metrics::{
    CpuSnapshot, DiskSnapshot, MemorySnapshot, MetricsSource, NetworkSnapshot, UsageSnapshot,
};
use recmon::speech::{Speaker, WaitOptions};

const GIB: u64 = 1024 * 1024 * 1024;

#[derive(Default)]
struct FakeMetrics {
    calls: Vec<&'static str>,
    disks: Vec<DiskSnapshot>,
    frequency_mhz: Option<f64>,
}

#[async_trait]
impl MetricsSource for FakeMetrics {
    async fn cpu(&mut self) -> Result<CpuSnapshot, MetricsError> {
        self.calls.push("cpu");
        let frequency_mhz = self.frequency_mhz.ok_or(MetricsError::Unavailable("CPU frequency"))?;
        return Ok(CpuSnapshot { average_load: 50.0, frequency_mhz, per_core_load: vec![40.0, 60.0] });
    }

    async fn memory(&mut self) -> Result<MemorySnapshot, MetricsError> {
        self.calls.push("memory");
        return Ok(MemorySnapshot {
            physical: UsageSnapshot::new(GIB, 8 * GIB),
            swap: UsageSnapshot::new(512 * 1024 * 1024, GIB),
        });
    }

    async fn disks(&mut self) -> Result<Vec<DiskSnapshot>, MetricsError> {
        self.calls.push("disks");
        return Ok(self.disks.clone());
    }

    async fn network(&mut self) -> Result<NetworkSnapshot, MetricsError> {
        self.calls.push("network");
        return Ok(NetworkSnapshot { bytes_sent: 2048, bytes_received: 3 * GIB });
    }

    async fn boot_time(&mut self) -> Result<u64, MetricsError> {
        self.calls.push("boot_time");
        return Ok(1);
    }
}

/// Records every utterance into a shared log.
struct Recorder {
    spoken: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Speaker for Recorder {
    fn name(&self) -> &'static str {
        return "recorder";
    }

    async fn speak(&mut self, text: &str) -> Result<(), SpeechError> {
        self.spoken.lock().unwrap().push(text.to_string());
        return Ok(());
    }
}

fn options() -> DispatchOptions {
    return DispatchOptions {
        print: false,
        wait: WaitOptions { poll_interval: Duration::from_millis(5), timeout: None },
    };
}

async fn run(selector: i64, metrics: &mut FakeMetrics) -> (Result<Option<String>, Error>, Vec<String>, bool) {
    let spoken = Arc::new(Mutex::new(Vec::new()));
    let opened = Arc::new(Mutex::new(false));
    let result = {
        let spoken = spoken.clone();
        let opened = opened.clone();
        dispatch(selector, metrics, move || async move {
            *opened.lock().unwrap() = true;
            return Ok::<_, SpeechError>(Box::new(Recorder { spoken }) as Box<dyn Speaker>);
        }, options()).await
    };
    let spoken = spoken.lock().unwrap().clone();
    let opened = *opened.lock().unwrap();
    return (result, spoken, opened);
}

fn disk(mount_point: &str, file_system: &str, used: u64, total: u64) -> DiskSnapshot {
    return DiskSnapshot {
        mount_point: mount_point.to_string(),
        file_system: file_system.to_string(),
        usage: UsageSnapshot::new(used, total),
    };
}

#[tokio::test]
async fn test_disk_report_speaks_once_for_all_partitions() {
    let mut metrics = FakeMetrics {
        disks: vec![disk("/", "ext4", 20 * GIB, 80 * GIB), disk("/data", "xfs", GIB, 4 * GIB)],
        ..Default::default()
    };

    let (result, spoken, _) = run(3, &mut metrics).await;

    let expected = "/ (ext4 drive): 20.00 GB of 80.00 GB used 25%. \
                    /data (xfs drive): 1.00 GB of 4.00 GB used 25%.";
    assert_eq!(result.unwrap().as_deref(), Some(expected));
    assert_eq!(spoken, vec![expected.to_string()]);
    assert_eq!(metrics.calls, vec!["disks"]);
}

#[tokio::test]
async fn test_disk_report_without_qualifying_partitions_is_silent() {
    let mut metrics = FakeMetrics {
        disks: vec![disk("/snap/core/1", "squashfs", GIB, GIB), disk("/proc", "proc", 0, 0)],
        ..Default::default()
    };

    let (result, spoken, opened) = run(3, &mut metrics).await;

    assert!(result.unwrap().is_none());
    assert!(spoken.is_empty());
    assert!(!opened);
    assert_eq!(metrics.calls, vec!["disks"]);
}

#[tokio::test]
async fn test_out_of_range_selector_is_a_no_op() {
    let mut metrics = FakeMetrics::default();

    for selector in [0, 6, 99, -1] {
        let (result, spoken, opened) = run(selector, &mut metrics).await;
        assert!(result.unwrap().is_none());
        assert!(spoken.is_empty());
        assert!(!opened);
    }
    assert!(metrics.calls.is_empty());
}

#[tokio::test]
async fn test_cpu_report() {
    let mut metrics = FakeMetrics { frequency_mhz: Some(3072.0), ..Default::default() };

    let (result, spoken, _) = run(1, &mut metrics).await;

    assert_eq!(result.unwrap().as_deref(), Some("Average CPU load 50%, 3 GHZ. Core 1: 40%, Core 2: 60%."));
    assert_eq!(spoken.len(), 1);
}

#[tokio::test]
async fn test_unavailable_metric_propagates_without_speaking() {
    let mut metrics = FakeMetrics::default();

    let (result, spoken, opened) = run(1, &mut metrics).await;

    assert!(matches!(result, Err(Error::Metrics(MetricsError::Unavailable("CPU frequency")))));
    assert!(spoken.is_empty());
    assert!(!opened);
}

#[tokio::test]
async fn test_ram_report() {
    let mut metrics = FakeMetrics::default();

    let (result, _, _) = run(2, &mut metrics).await;

    assert_eq!(
        result.unwrap().as_deref(),
        Some("Physical: 1.00 GB of 8.00 GB used (12.5%). Virtual: 512.00 MB of 1.00 GB used (50%).")
    );
    assert_eq!(metrics.calls, vec!["memory"]);
}

#[tokio::test]
async fn test_uptime_report_shape() {
    let mut metrics = FakeMetrics::default();

    let (result, spoken, _) = run(4, &mut metrics).await;

    let text = result.unwrap().unwrap();
    let (days, clock) = text.split_once(" days, ").unwrap();
    assert!(days.parse::<i64>().unwrap() > 19_000);
    assert_eq!(clock.len(), 8);
    assert_eq!(spoken, vec![text.clone()]);
    assert_eq!(metrics.calls, vec!["boot_time"]);
}

#[tokio::test]
async fn test_network_report() {
    let mut metrics = FakeMetrics::default();

    let (result, _, _) = run(5, &mut metrics).await;

    assert_eq!(
        result.unwrap().as_deref(),
        Some("Sent since boot: 2.00 KB. Received since boot: 3.00 GB")
    );
}

#[tokio::test]
async fn test_speaker_failure_propagates() {
    let mut metrics = FakeMetrics::default();

    let result = dispatch(5, &mut metrics, || async { Err::<Box<dyn Speaker>, _>(SpeechError::NoBackend) }, options()).await;

    assert!(matches!(result, Err(Error::Speech(SpeechError::NoBackend))));
    assert_eq!(metrics.calls, vec!["network"]);
}
