//! Rayon-based parallel executor.

use rayon::prelude::*;
use verso_traits::Executor;

/// A parallel executor using rayon's global work-stealing thread pool.
///
/// Indexed parallel iterators collect in input order, so results line up with
/// the chapters that produced them.
///
/// To bound the thread count, configure `rayon::ThreadPoolBuilder` before the
/// first executor is created.
#[derive(Debug, Clone)]
pub struct RayonExecutor {
    num_threads: usize,
}

impl RayonExecutor {
    pub fn new() -> Self {
        Self {
            num_threads: rayon::current_num_threads(),
        }
    }
}

impl Default for RayonExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor for RayonExecutor {
    fn execute_all<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + Clone + 'static,
    {
        items.into_par_iter().map(f).collect()
    }

    fn execute_all_fallible<T, R, E, F>(&self, items: Vec<T>, f: F) -> Vec<Result<R, E>>
    where
        T: Send + 'static,
        R: Send + 'static,
        E: Send + 'static,
        F: Fn(T) -> Result<R, E> + Send + Sync + Clone + 'static,
    {
        items.into_par_iter().map(f).collect()
    }

    fn parallelism(&self) -> usize {
        self.num_threads
    }

    fn name(&self) -> &'static str {
        "RayonExecutor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rayon_executor_preserves_input_order() {
        let executor = RayonExecutor::new();
        let items: Vec<usize> = (0..200).collect();
        let results = executor.execute_all(items, |x| x * 3);
        assert_eq!(results, (0..200).map(|x| x * 3).collect::<Vec<_>>());
    }

    #[test]
    fn test_rayon_executor_reports_failures_in_place() {
        let executor = RayonExecutor::new();
        let results: Vec<Result<u32, String>> =
            executor.execute_all_fallible(vec![4u32, 0, 2], |x| {
                if x == 0 { Err("no units".into()) } else { Ok(8 / x) }
            });
        assert_eq!(results[0].as_ref().ok(), Some(&2));
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().ok(), Some(&4));
    }

    #[test]
    fn test_rayon_executor_parallelism_is_positive() {
        assert!(RayonExecutor::new().parallelism() > 0);
    }
}
