//! User-Agent selection.

use rand::seq::IndexedRandom;

use crate::config::USER_AGENTS;

/// Picks one User-Agent from `pool` uniformly at random.
///
/// Blank entries are never chosen; an effectively empty pool falls back to
/// the first built-in browser string.
pub fn random_user_agent(pool: &[String]) -> &str {
    let candidates: Vec<&str> = pool
        .iter()
        .map(String::as_str)
        .filter(|ua| !ua.trim().is_empty())
        .collect();
    candidates
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_comes_from_pool() {
        let pool: Vec<String> = USER_AGENTS.iter().map(|s| s.to_string()).collect();
        for _ in 0..20 {
            let ua = random_user_agent(&pool);
            assert!(USER_AGENTS.contains(&ua));
        }
    }

    #[test]
    fn test_single_entry_pool() {
        let pool = vec!["custom-agent/1.0".to_string()];
        assert_eq!(random_user_agent(&pool), "custom-agent/1.0");
    }

    #[test]
    fn test_blank_pool_falls_back() {
        let pool = vec!["  ".to_string(), String::new()];
        assert_eq!(random_user_agent(&pool), USER_AGENTS[0]);
    }
}
