/// Max concurrently open selection sessions per manager.
pub const MAX_SESSIONS: usize = 10_000;

/// Max listings priced on one selection change.
pub const MAX_VISIBLE_LISTINGS: usize = 5_000;
