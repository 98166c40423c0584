use std::time::Duration;
#[cfg(feature = "cli")]
use std::time::Instant;

/// One ETL phase as seen by the monitor.
#[derive(Debug, Clone)]
pub struct PhaseStat {
    pub phase: String,
    pub elapsed: Duration,
    pub memory_mb: Option<u64>,
}

#[cfg(feature = "cli")]
pub struct PhaseMonitor {
    system: Option<(sysinfo::System, sysinfo::Pid)>,
    started: Instant,
    last_mark: Instant,
    phases: Vec<PhaseStat>,
}

#[cfg(feature = "cli")]
impl PhaseMonitor {
    pub fn new(enabled: bool) -> Self {
        // 取不到 PID 時直接停用資源取樣
        let system = if enabled {
            sysinfo::get_current_pid()
                .ok()
                .map(|pid| (sysinfo::System::new(), pid))
        } else {
            None
        };

        let now = Instant::now();
        Self {
            system,
            started: now,
            last_mark: now,
            phases: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.system.is_some()
    }

    fn sample_memory_mb(&mut self) -> Option<u64> {
        let (system, pid) = self.system.as_mut()?;
        system.refresh_all();
        system.process(*pid).map(|p| p.memory() / 1024 / 1024)
    }

    /// 記錄一個階段結束
    pub fn mark(&mut self, phase: &str) {
        if !self.is_enabled() {
            return;
        }

        let now = Instant::now();
        let elapsed = now.duration_since(self.last_mark);
        self.last_mark = now;
        let memory_mb = self.sample_memory_mb();

        tracing::info!(
            "📊 {} - Time: {:?}, Memory: {}MB",
            phase,
            elapsed,
            memory_mb.map(|m| m.to_string()).unwrap_or_else(|| "?".to_string())
        );

        self.phases.push(PhaseStat {
            phase: phase.to_string(),
            elapsed,
            memory_mb,
        });
    }

    pub fn peak_memory_mb(&self) -> Option<u64> {
        self.phases.iter().filter_map(|p| p.memory_mb).max()
    }

    pub fn finish(self) -> Vec<PhaseStat> {
        if self.is_enabled() {
            tracing::info!(
                "📊 Final Stats - Total Time: {:?}, Peak Memory: {}MB",
                self.started.elapsed(),
                self.peak_memory_mb().unwrap_or(0)
            );
        }
        self.phases
    }
}

// 非 CLI 環境的空實現
#[cfg(not(feature = "cli"))]
pub struct PhaseMonitor;

#[cfg(not(feature = "cli"))]
impl PhaseMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn is_enabled(&self) -> bool {
        false
    }

    pub fn mark(&mut self, _phase: &str) {}

    pub fn peak_memory_mb(&self) -> Option<u64> {
        None
    }

    pub fn finish(self) -> Vec<PhaseStat> {
        Vec::new()
    }
}

impl Default for PhaseMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}
