//! End-of-run statistics logging.

use log::{debug, info};
use strum::IntoEnumIterator;

use crate::error_handling::{ErrorType, FetchStats};
use crate::pool::ConnectionPool;

/// Logs the failure counts collected by the client, one line per non-zero
/// category.
pub fn log_error_statistics(stats: &FetchStats) {
    let total_errors = stats.total_errors();
    if total_errors == 0 {
        return;
    }
    info!("Error Counts ({} total):", total_errors);
    for error_type in ErrorType::iter() {
        let count = stats.get_error_count(error_type);
        if count > 0 {
            info!("   {}: {}", error_type.as_str(), count);
        }
    }
}

/// Logs connection reuse and cache sizes.
pub fn log_pool_statistics(pool: &ConnectionPool) {
    let stats = pool.stats();
    debug!(
        "[pool] {} connection{} established, {} reused, {} evicted; {} idle, {} DNS entr{}, {} TLS session{}",
        stats.established,
        if stats.established == 1 { "" } else { "s" },
        stats.reused,
        stats.evicted,
        pool.len(),
        pool.dns().len(),
        if pool.dns().len() == 1 { "y" } else { "ies" },
        pool.sessions().len(),
        if pool.sessions().len() == 1 { "" } else { "s" },
    );
}
