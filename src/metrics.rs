use std::time::Duration;

use async_trait::async_trait;
use sysinfo::{CpuExt, CpuRefreshKind, DiskExt, NetworkExt, NetworksExt, System, SystemExt};

use crate::error::MetricsError;
use crate::number::{percent, round_to};

/// Load is measured as the difference between two refreshes this far apart.
pub const CPU_SAMPLE_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, PartialEq)]
pub struct CpuSnapshot {
    /// Percent, one decimal.
    pub average_load: f64,
    pub frequency_mhz: f64,
    pub per_core_load: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsageSnapshot {
    pub used: u64,
    pub total: u64,
    pub percent: f64,
}

impl UsageSnapshot {
    pub fn new(used: u64, total: u64) -> Self {
        return Self { used, total, percent: percent(used, total) };
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemorySnapshot {
    pub physical: UsageSnapshot,
    pub swap: UsageSnapshot,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiskSnapshot {
    pub mount_point: String,
    /// Empty when the filesystem type is unknown.
    pub file_system: String,
    pub usage: UsageSnapshot,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetworkSnapshot {
    pub bytes_sent: u64,
    pub bytes_received: u64,
}

/// Where reports get their numbers from.
#[async_trait]
pub trait MetricsSource: Send {
    async fn cpu(&mut self) -> Result<CpuSnapshot, MetricsError>;
    async fn memory(&mut self) -> Result<MemorySnapshot, MetricsError>;
    async fn disks(&mut self) -> Result<Vec<DiskSnapshot>, MetricsError>;
    async fn network(&mut self) -> Result<NetworkSnapshot, MetricsError>;
    /// Seconds since the Unix epoch.
    async fn boot_time(&mut self) -> Result<u64, MetricsError>;
}

pub struct SysinfoMetrics {
    sys: System,
}

impl SysinfoMetrics {
    pub fn new() -> Self {
        return Self { sys: System::new() };
    }
}

impl Default for SysinfoMetrics {
    fn default() -> Self {
        return Self::new();
    }
}

fn load(usage: f32) -> f64 {
    return round_to(f64::from(usage), 1);
}

#[async_trait]
impl MetricsSource for SysinfoMetrics {
    async fn cpu(&mut self) -> Result<CpuSnapshot, MetricsError> {
        // plain refresh_cpu() leaves frequency at 0
        self.sys.refresh_cpu_specifics(CpuRefreshKind::everything());
        tokio::time::sleep(CPU_SAMPLE_INTERVAL).await;
        self.sys.refresh_cpu_specifics(CpuRefreshKind::everything());

        let cpus = self.sys.cpus();
        if cpus.is_empty() {
            return Err(MetricsError::Unavailable("CPU load"));
        }

        let frequency_mhz = cpus.iter().map(|cpu| cpu.frequency() as f64).sum::<f64>()
            / cpus.len() as f64;
        if frequency_mhz <= 0.0 {
            return Err(MetricsError::Unavailable("CPU frequency"));
        }

        return Ok(CpuSnapshot {
            average_load: load(self.sys.global_cpu_info().cpu_usage()),
            frequency_mhz,
            per_core_load: cpus.iter().map(|cpu| load(cpu.cpu_usage())).collect(),
        });
    }

    async fn memory(&mut self) -> Result<MemorySnapshot, MetricsError> {
        self.sys.refresh_memory();
        let total = self.sys.total_memory();
        if total == 0 {
            return Err(MetricsError::Unavailable("physical memory"));
        }

        let mut physical = UsageSnapshot::new(self.sys.used_memory(), total);
        // percent counts everything that is not available, like `free` does
        physical.percent = percent(total.saturating_sub(self.sys.available_memory()), total);

        return Ok(MemorySnapshot {
            physical,
            swap: UsageSnapshot::new(self.sys.used_swap(), self.sys.total_swap()),
        });
    }

    async fn disks(&mut self) -> Result<Vec<DiskSnapshot>, MetricsError> {
        self.sys.refresh_disks_list();
        self.sys.refresh_disks();

        return Ok(self.sys.disks().iter()
            .map(|disk| {
                let total = disk.total_space();
                let used = total.saturating_sub(disk.available_space());
                DiskSnapshot {
                    mount_point: disk.mount_point().to_string_lossy().into_owned(),
                    file_system: String::from_utf8_lossy(disk.file_system()).into_owned(),
                    usage: UsageSnapshot::new(used, total),
                }
            })
            .collect());
    }

    async fn network(&mut self) -> Result<NetworkSnapshot, MetricsError> {
        self.sys.refresh_networks_list();
        self.sys.refresh_networks();

        let mut snapshot = NetworkSnapshot { bytes_sent: 0, bytes_received: 0 };
        for (_, data) in self.sys.networks().iter() {
            snapshot.bytes_sent += data.total_transmitted();
            snapshot.bytes_received += data.total_received();
        }
        return Ok(snapshot);
    }

    async fn boot_time(&mut self) -> Result<u64, MetricsError> {
        return match self.sys.boot_time() {
            0 => Err(MetricsError::Unavailable("boot time")),
            secs => Ok(secs),
        };
    }
}
