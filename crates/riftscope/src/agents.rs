//! Logical agent routing table.
//!
//! Maps the agent identifiers the frontend knows about to analysis
//! backend routes and per-agent timeout budgets. The table is fixed at
//! compile time; budgets are deliberately not configurable.

use std::time::Duration;

use once_cell::sync::Lazy;

/// Timeout budget for single-subject agents.
const GENERAL_TIMEOUT: Duration = Duration::from_secs(120);

/// Timeout budget for comparison agents and the annual summary, which
/// aggregate far more match data upstream.
const HEAVY_TIMEOUT: Duration = Duration::from_secs(180);

/// One entry in the routing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentRoute {
    /// Identifier the frontend requests.
    pub logical_id: &'static str,
    /// Path on the analysis backend.
    pub upstream_path: &'static str,
    /// Hard deadline for the upstream call.
    pub timeout: Duration,
}

/// The full routing table.
///
/// `player-comparison` and `team-comparison` intentionally share one
/// backend route: they are two frontend framings of the same
/// comparison capability.
static ROUTES: Lazy<Vec<AgentRoute>> = Lazy::new(|| {
    vec![
        AgentRoute {
            logical_id: "match-analysis",
            upstream_path: "/api/agent/match-analysis",
            timeout: GENERAL_TIMEOUT,
        },
        AgentRoute {
            logical_id: "player-analysis",
            upstream_path: "/api/agent/player-analysis",
            timeout: GENERAL_TIMEOUT,
        },
        AgentRoute {
            logical_id: "player-comparison",
            upstream_path: "/api/agent/comparison",
            timeout: HEAVY_TIMEOUT,
        },
        AgentRoute {
            logical_id: "team-comparison",
            upstream_path: "/api/agent/comparison",
            timeout: HEAVY_TIMEOUT,
        },
        AgentRoute {
            logical_id: "annual-summary",
            upstream_path: "/api/agent/annual-summary",
            timeout: HEAVY_TIMEOUT,
        },
    ]
});

/// Resolve a logical agent identifier to its route.
///
/// Unknown identifiers are a lookup failure for the caller to surface
/// as 404; no upstream call is made for them.
pub fn resolve(logical_id: &str) -> Option<&'static AgentRoute> {
    ROUTES.iter().find(|route| route.logical_id == logical_id)
}

/// All known routes, in declaration order.
pub fn list() -> &'static [AgentRoute] {
    ROUTES.as_slice()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_known_agent_resolves() {
        for route in list() {
            let resolved = resolve(route.logical_id).expect("known id must resolve");
            assert!(!resolved.upstream_path.is_empty());
            assert!(resolved.upstream_path.starts_with('/'));
            assert!(resolved.timeout > Duration::ZERO);
        }
    }

    #[test]
    fn unknown_agent_is_a_lookup_failure() {
        assert!(resolve("rune-tarot").is_none());
        assert!(resolve("").is_none());
        // Lookup is exact, not fuzzy.
        assert!(resolve("Match-Analysis").is_none());
    }

    #[test]
    fn comparison_agents_share_one_upstream_route() {
        let player = resolve("player-comparison").unwrap();
        let team = resolve("team-comparison").unwrap();
        assert_eq!(player.upstream_path, team.upstream_path);
        assert_ne!(player.logical_id, team.logical_id);
    }

    #[test]
    fn comparison_agents_get_the_longer_budget() {
        let general = resolve("match-analysis").unwrap();
        let comparison = resolve("player-comparison").unwrap();
        assert!(comparison.timeout > general.timeout);
    }

    #[test]
    fn annual_summary_budget_is_180_seconds() {
        let route = resolve("annual-summary").unwrap();
        assert_eq!(route.timeout, Duration::from_secs(180));
    }
}
