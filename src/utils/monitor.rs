//! Process resource usage between pipeline phases.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct PhaseStats {
    pub cpu_usage: f32,
    pub memory_mb: u64,
    pub peak_memory_mb: u64,
    pub elapsed: Duration,
}

#[cfg(feature = "cli")]
pub struct SystemMonitor {
    system: std::sync::Mutex<sysinfo::System>,
    pid: Option<sysinfo::Pid>,
    started: Instant,
    peak_memory_mb: std::sync::atomic::AtomicU64,
    enabled: bool,
}

#[cfg(feature = "cli")]
impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        let pid = if enabled {
            match sysinfo::get_current_pid() {
                Ok(pid) => Some(pid),
                Err(e) => {
                    tracing::warn!("System monitoring unavailable: {}", e);
                    None
                }
            }
        } else {
            None
        };

        Self {
            system: std::sync::Mutex::new(sysinfo::System::new()),
            pid,
            started: Instant::now(),
            peak_memory_mb: std::sync::atomic::AtomicU64::new(0),
            enabled: enabled && pid.is_some(),
        }
    }

    pub fn stats(&self) -> Option<PhaseStats> {
        use std::sync::atomic::Ordering;

        let pid = self.pid.filter(|_| self.enabled)?;
        let mut system = self.system.lock().ok()?;
        system.refresh_processes(sysinfo::ProcessesToUpdate::Some(&[pid]), true);

        let process = system.process(pid)?;
        let memory_mb = process.memory() / 1024 / 1024;
        let peak = self
            .peak_memory_mb
            .fetch_max(memory_mb, Ordering::Relaxed)
            .max(memory_mb);

        Some(PhaseStats {
            cpu_usage: process.cpu_usage(),
            memory_mb,
            peak_memory_mb: peak,
            elapsed: self.started.elapsed(),
        })
    }

    /// Logs usage after `phase` together with how many postings it handled.
    pub fn log_phase(&self, phase: &str, postings: usize) {
        if let Some(stats) = self.stats() {
            tracing::info!(
                phase,
                postings,
                cpu_usage = stats.cpu_usage,
                memory_mb = stats.memory_mb,
                peak_memory_mb = stats.peak_memory_mb,
                elapsed = ?stats.elapsed,
                "📊 phase finished"
            );
        }
    }

    pub fn log_final(&self) {
        if let Some(stats) = self.stats() {
            tracing::info!(
                "📊 Final stats - total time: {:?}, peak memory: {}MB",
                stats.elapsed,
                stats.peak_memory_mb
            );
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

// Without the cli feature there is no sysinfo; only elapsed time is reported.
#[cfg(not(feature = "cli"))]
pub struct SystemMonitor {
    started: Instant,
    enabled: bool,
}

#[cfg(not(feature = "cli"))]
impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        Self {
            started: Instant::now(),
            enabled,
        }
    }

    pub fn stats(&self) -> Option<PhaseStats> {
        None
    }

    pub fn log_phase(&self, phase: &str, postings: usize) {
        if self.enabled {
            tracing::info!(phase, postings, elapsed = ?self.started.elapsed(), "phase finished");
        }
    }

    pub fn log_final(&self) {
        if self.enabled {
            tracing::info!("Total time: {:?}", self.started.elapsed());
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_monitor_reports_nothing() {
        let monitor = SystemMonitor::default();
        assert!(!monitor.is_enabled());
        assert!(monitor.stats().is_none());
        monitor.log_phase("extract", 3);
        monitor.log_final();
    }
}
