use std::collections::HashMap;

/// Where finished games are recorded. Durable storage lives outside this
/// crate; the lobby only needs these two calls.
pub trait Leaderboard: Send {
    fn record_win(&mut self, name: &str);

    /// Up to `n` `(name, wins)` pairs, most wins first.
    fn top(&self, n: usize) -> Vec<(String, u32)>;
}

#[derive(Debug, Default)]
pub struct MemoryLeaderboard {
    wins: HashMap<String, u32>,
}

impl MemoryLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Leaderboard for MemoryLeaderboard {
    fn record_win(&mut self, name: &str) {
        *self.wins.entry(name.to_string()).or_insert(0) += 1;
    }

    fn top(&self, n: usize) -> Vec<(String, u32)> {
        let mut entries: Vec<(String, u32)> = self
            .wins
            .iter()
            .map(|(name, wins)| (name.clone(), *wins))
            .collect();
        // ties broken by name so the listing is stable
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries.truncate(n);
        entries
    }
}
