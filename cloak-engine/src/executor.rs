//! Worker pool construction

#[cfg(feature = "parallel")]
use crate::{
    config::{EngineConfig, Parallelism},
    error::{EngineError, Result},
};

/// Build the chunk-extraction worker pool
///
/// Returns `None` when the configuration rules out parallel execution, so
/// no threads are spawned for requests that will never use them.
#[cfg(feature = "parallel")]
pub fn build_pool(config: &EngineConfig) -> Result<Option<rayon::ThreadPool>> {
    if matches!(config.parallelism, Parallelism::Never) {
        return Ok(None);
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.max_workers)
        .thread_name(|i| format!("cloak-worker-{i}"))
        .build()
        .map_err(|e| EngineError::Pool(e.to_string()))?;
    Ok(Some(pool))
}

#[cfg(all(test, feature = "parallel"))]
mod tests {
    use super::*;

    #[test]
    fn never_parallel_skips_pool_creation() {
        let config = EngineConfig {
            parallelism: Parallelism::Never,
            ..Default::default()
        };
        assert!(build_pool(&config).unwrap().is_none());
    }

    #[test]
    fn pool_honors_worker_count() {
        let config = EngineConfig {
            max_workers: 2,
            ..Default::default()
        };
        let pool = build_pool(&config).unwrap().unwrap();
        assert_eq!(pool.current_num_threads(), 2);
    }
}
