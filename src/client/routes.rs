//! Endpoint table for the orchestration server's REST surface.
//!
//! Adding an operation to the gateway is a data change here plus one thin
//! tool handler; no control flow lives in this module.

/// Top-level resource listing. Idempotent and side-effect-free; used as the
/// credential probe target.
pub const ROOT: &str = "/api";

/// Deployment executions.
pub const DEPLOYMENTS: &str = "/api/deployments";

/// Release snapshots.
pub const SNAPSHOTS: &str = "/api/snapshots";

/// Deployment targets (machines/environments inventory).
pub const TARGETS: &str = "/api/targets";

/// Scheduled deployments.
pub const SCHEDULES: &str = "/api/schedules";

/// Diff between two snapshots.
pub fn snapshot_compare(left: &str, right: &str) -> String {
    format!(
        "{SNAPSHOTS}/{}/compare/{}",
        urlencoding::encode(left),
        urlencoding::encode(right)
    )
}

/// Fire a server-side trigger.
pub fn trigger_runs(trigger_id: &str) -> String {
    format!("/api/triggers/{}/runs", urlencoding::encode(trigger_id))
}

/// Targets filtered to one environment.
pub fn targets_in(environment: &str) -> String {
    format!("{TARGETS}?environment={}", urlencoding::encode(environment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_route() {
        assert_eq!(
            snapshot_compare("rel-1.2.0", "rel-1.3.0"),
            "/api/snapshots/rel-1.2.0/compare/rel-1.3.0"
        );
    }

    #[test]
    fn test_route_segments_are_escaped() {
        assert_eq!(
            trigger_runs("nightly build"),
            "/api/triggers/nightly%20build/runs"
        );
    }

    #[test]
    fn test_targets_filter() {
        assert_eq!(targets_in("staging"), "/api/targets?environment=staging");
    }
}
