/// Returns the number of logical CPU cores, at least 1.
pub fn count_cores() -> usize {
    num_cpus::get().max(1)
}

/// Resolves a requested worker count: 0 means one worker per core, and the
/// result never exceeds `max` or the number of jobs.
pub fn resolve_workers(requested: usize, max: usize, jobs: usize) -> usize {
    let wanted = if requested == 0 { count_cores() } else { requested };
    wanted.min(max).min(jobs).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_cores_at_least_one() {
        assert!(count_cores() >= 1);
    }

    #[test]
    fn resolve_workers_bounds() {
        assert_eq!(resolve_workers(4, 200, 2), 2);
        assert_eq!(resolve_workers(500, 200, 1000), 200);
        assert_eq!(resolve_workers(3, 200, 0), 1);
        assert!(resolve_workers(0, 200, 1000) >= 1);
    }
}
