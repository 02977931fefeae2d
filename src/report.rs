use chrono::{DateTime, Duration, TimeZone, Utc};
use log::debug;

use crate::byte_count::ByteCount;
use crate::error::MetricsError;
use crate::metrics::{CpuSnapshot, DiskSnapshot, MemorySnapshot, MetricsSource, NetworkSnapshot};
use crate::number::{round_to, trim_trailing_zero};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Report {
    Cpu,
    Ram,
    Disk,
    Uptime,
    Network,
}

impl Report {
    /// `None` for anything outside 1..=5.
    pub fn from_selector(selector: i64) -> Option<Self> {
        return match selector {
            1 => Some(Report::Cpu),
            2 => Some(Report::Ram),
            3 => Some(Report::Disk),
            4 => Some(Report::Uptime),
            5 => Some(Report::Network),
            _ => None,
        };
    }

    /// Queries `metrics` for what this report needs and renders the sentence.
    pub async fn build(self, metrics: &mut dyn MetricsSource, now: DateTime<Utc>) -> Result<String, MetricsError> {
        return match self {
            Report::Cpu => Ok(cpu_report(&metrics.cpu().await?)),
            Report::Ram => Ok(ram_report(&metrics.memory().await?)),
            Report::Disk => Ok(disk_report(&metrics.disks().await?)),
            Report::Uptime => uptime_report(metrics.boot_time().await?, now),
            Report::Network => Ok(network_report(&metrics.network().await?)),
        };
    }
}

pub fn cpu_report(cpu: &CpuSnapshot) -> String {
    // MHz to GHz by 1024, as the announcement always has
    let frequency = round_to(cpu.frequency_mhz / 1024.0, 2);
    let cores = cpu.per_core_load.iter().enumerate()
        .map(|(i, load)| format!("Core {}: {}%", i + 1, trim_trailing_zero(*load)))
        .collect::<Vec<_>>()
        .join(", ");
    return format!("Average CPU load {}%, {} GHZ. {}.",
        trim_trailing_zero(cpu.average_load),
        trim_trailing_zero(frequency),
        cores);
}

pub fn ram_report(memory: &MemorySnapshot) -> String {
    let physical = &memory.physical;
    let swap = &memory.swap;
    return format!("Physical: {} of {} used ({}%). Virtual: {} of {} used ({}%).",
        ByteCount::from(physical.used),
        ByteCount::from(physical.total),
        trim_trailing_zero(physical.percent),
        ByteCount::from(swap.used),
        ByteCount::from(swap.total),
        trim_trailing_zero(swap.percent));
}

fn is_reportable(disk: &DiskSnapshot) -> bool {
    return !disk.file_system.is_empty()
        && disk.usage.total > 1
        && disk.file_system != "squashfs";
}

pub fn disk_report(disks: &[DiskSnapshot]) -> String {
    let mut info = Vec::new();
    for disk in disks {
        if !is_reportable(disk) {
            debug!("skipping {} ({:?}, {} bytes)", disk.mount_point, disk.file_system, disk.usage.total);
            continue;
        }
        info.push(format!("{} ({} drive): {} of {} used {}%.",
            disk.mount_point,
            disk.file_system,
            ByteCount::from(disk.usage.used),
            ByteCount::from(disk.usage.total),
            trim_trailing_zero(disk.usage.percent)));
    }
    return info.join(" ");
}

/// `"{days} days, HH:MM:SS"` between `boot_time` and `now`. A boot time of 0 means unknown.
pub fn uptime_report(boot_time: u64, now: DateTime<Utc>) -> Result<String, MetricsError> {
    if boot_time == 0 {
        return Err(MetricsError::Unavailable("boot time"));
    }
    let boot = i64::try_from(boot_time).ok()
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
        .ok_or(MetricsError::Unavailable("boot time"))?;

    let uptime = now.signed_duration_since(boot).max(Duration::zero());
    let days = uptime.num_days();
    let seconds = uptime.num_seconds() % 86_400;
    return Ok(format!("{} days, {:02}:{:02}:{:02}",
        days,
        seconds / 3600,
        seconds % 3600 / 60,
        seconds % 60));
}

pub fn network_report(network: &NetworkSnapshot) -> String {
    return format!("Sent since boot: {}. Received since boot: {}",
        ByteCount::from(network.bytes_sent),
        ByteCount::from(network.bytes_received));
}
