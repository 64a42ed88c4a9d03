use std::fs;
use std::path::Path;

/// Source of the device counters sampled around a profiled operation.
pub trait DeviceProbe: Send + Sync {
    fn device_model(&self) -> String;

    fn os_version(&self) -> String;

    /// Bytes currently in use by the process.
    fn memory_usage(&self) -> i64;

    /// Battery charge percentage, 0 when unknown.
    fn battery_level(&self) -> i32;
}

/// Best-effort probe for the machine the client runs on.
#[derive(Debug, Clone, Default)]
pub struct HostProbe;

const PAGE_SIZE: i64 = 4096;

impl DeviceProbe for HostProbe {
    fn device_model(&self) -> String {
        std::env::consts::ARCH.to_string()
    }

    fn os_version(&self) -> String {
        fs::read_to_string("/proc/sys/kernel/osrelease")
            .map(|release| format!("{} {}", std::env::consts::OS, release.trim()))
            .unwrap_or_else(|_| std::env::consts::OS.to_string())
    }

    fn memory_usage(&self) -> i64 {
        fs::read_to_string("/proc/self/statm")
            .ok()
            .and_then(|statm| parse_resident_pages(&statm))
            .map_or(0, |pages| pages * PAGE_SIZE)
    }

    fn battery_level(&self) -> i32 {
        let Ok(entries) = fs::read_dir("/sys/class/power_supply") else {
            return 0;
        };

        entries
            .flatten()
            .find_map(|entry| read_capacity(&entry.path().join("capacity")))
            .unwrap_or(0)
    }
}

/// Second field of `/proc/self/statm` is the resident set size in pages.
fn parse_resident_pages(statm: &str) -> Option<i64> {
    statm.split_whitespace().nth(1)?.parse().ok()
}

fn read_capacity(path: &Path) -> Option<i32> {
    fs::read_to_string(path).ok()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_resident_pages() {
        assert_eq!(parse_resident_pages("5123 1024 300 10 0 900 0\n"), Some(1024));
        assert_eq!(parse_resident_pages("5123"), None);
        assert_eq!(parse_resident_pages(""), None);
    }

    #[test]
    fn host_probe_never_reports_negative_counters() {
        let probe = HostProbe;
        assert!(probe.memory_usage() >= 0);
        assert!(probe.battery_level() >= 0);
        assert!(!probe.device_model().is_empty());
    }
}
