use std::sync::atomic::{AtomicU64, Ordering};

// Advisory progress reporting (spec.md §5: "may be coalesced or dropped
// under contention"). Workers call `update` after finishing a tile; actual
// printing is throttled to roughly every percentage point and goes through
// the `log` crate rather than a hand-rolled terminal progress bar, so a
// host can redirect or silence it the same way it controls any other log
// output.
pub struct Progress {
    total_work: u64,
    current: AtomicU64,
    last_reported_percent: AtomicU64,
}

impl Progress {
    pub fn new(total_work: u64) -> Progress {
        Progress {
            total_work: total_work.max(1),
            current: AtomicU64::new(0),
            last_reported_percent: AtomicU64::new(0),
        }
    }

    pub fn update(&self, completed: u64) {
        let current = self.current.fetch_add(completed, Ordering::Relaxed) + completed;
        let percent = (current * 100) / self.total_work;
        let last = self.last_reported_percent.load(Ordering::Relaxed);
        if percent > last
            && self
                .last_reported_percent
                .compare_exchange(last, percent, Ordering::Relaxed, Ordering::Relaxed)
                .is_ok()
        {
            log::info!("render progress: {}%", percent.min(100));
        }
    }

    pub fn done(&self) {
        log::info!("render progress: 100%");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_does_not_panic_past_total_work() {
        let progress = Progress::new(10);
        for _ in 0..20 {
            progress.update(1);
        }
        progress.done();
    }

    #[test]
    fn zero_total_work_is_clamped_to_avoid_division_by_zero() {
        let progress = Progress::new(0);
        progress.update(1);
    }
}
