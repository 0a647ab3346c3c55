//! The interleaved multi-schema scheduler.
//!
//! Drives `N` per-schema migrators forward in lockstep so a migration with the same effective
//! version in different schemata is applied in declaration order, a schema whose first version
//! is later than the current cursor stays dormant, and the global apply sequence is
//! deterministic and resumable. Grounded on `multimigrator.applyMigrations` in the original
//! implementation, refined with `done`/`lastSeenNext` bookkeeping on top of that routine to make
//! termination and tie-break correct when more than two schemata are interleaved.

use crate::error::MultimigratorResult;

/// What the scheduler needs from one schema's migrator: the ability to report the next known
/// version after a cursor, the currently-applied version, and to apply one step. Narrow enough
/// that tests can mock it without touching the filesystem or a database (see `mod tests` below).
pub trait MigratorPart {
    /// Smallest known effective version for this schema (cached once at assembly time).
    fn first_version(&self) -> u64;

    /// Smallest known effective version strictly greater than `after`, or `None` if this schema
    /// has no more migrations beyond it.
    fn next_version(&self, after: u64) -> Option<u64>;

    /// The version currently recorded as applied, or `0` if nothing has been applied yet
    /// (the `NilVersion` case).
    async fn applied_version(&mut self) -> MultimigratorResult<u64>;

    /// Applies the single migration at `version`.
    async fn step(&mut self, version: u64) -> MultimigratorResult<()>;
}

/// Drives `parts` forward until every schema has applied all of its migrations, in an order
/// satisfying per-schema linearity, cross-schema tie ordering, and gap-skipping. Returns the
/// number of steps applied.
pub async fn apply_migrations<M: MigratorPart>(parts: &mut [M]) -> MultimigratorResult<usize> {
    if parts.is_empty() {
        return Ok(0);
    }

    let n = parts.len();
    let first_version: Vec<u64> = parts.iter().map(|p| p.first_version()).collect();
    let mut done = vec![false; n];
    let mut last_seen_next = vec![0u64; n];

    let mut version_to_apply: u64 = 1;
    let mut iter = 0usize;
    let mut applied_count = 0usize;

    loop {
        if !done[iter] && last_seen_next[iter] <= version_to_apply && first_version[iter] <= version_to_apply {
            let applied_version = parts[iter].applied_version().await?;
            if applied_version < version_to_apply {
                let mut next_version: Option<u64> = None;

                if version_to_apply == first_version[iter] {
                    next_version = Some(first_version[iter]);
                } else if last_seen_next[iter] == version_to_apply {
                    next_version = Some(version_to_apply);
                } else {
                    match parts[iter].next_version(version_to_apply - 1) {
                        None => {
                            done[iter] = true;
                            iter = (iter + 1) % n;
                            if iter == 0 && done.iter().all(|d| *d) {
                                break;
                            }
                            continue;
                        }
                        Some(v) if v > version_to_apply => {
                            last_seen_next[iter] = v;
                        }
                        Some(v) => {
                            next_version = Some(v);
                        }
                    }
                }

                if next_version == Some(version_to_apply) {
                    parts[iter].step(version_to_apply).await?;
                    applied_count += 1;
                }
            }
        }

        iter = (iter + 1) % n;
        if iter == 0 {
            if done.iter().all(|d| *d) {
                break;
            }
            version_to_apply += 1;
        }
    }

    Ok(applied_count)
}
