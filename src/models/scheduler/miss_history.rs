/// One flag per simulated step: did any job miss its deadline during it.
#[derive(Debug, Default, Clone)]
pub struct MissHistory {
    flags: Vec<bool>,
}

impl MissHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, missed: bool) {
        self.flags.push(missed);
    }

    /// Number of miss steps among the last `window` steps, or `None` while
    /// fewer than `window` steps have been recorded.
    pub fn recent_miss_count(&self, window: usize) -> Option<usize> {
        if self.flags.len() < window {
            return None;
        }
        Some(self.flags[self.flags.len() - window..].iter().filter(|&&m| m).count())
    }

    /// Steps recorded so far.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Steps in which at least one job missed.
    pub fn total_misses(&self) -> usize {
        self.flags.iter().filter(|&&m| m).count()
    }

    pub fn flags(&self) -> &[bool] {
        &self.flags
    }
}
