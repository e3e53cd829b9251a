use std::collections::HashMap;

use crate::models::HealthRatio;
use crate::syncthing_client::{ServiceStatus, SystemStatus};

/// Counts checks whose error field is absent or blank.
pub fn service_health(statuses: &HashMap<String, ServiceStatus>) -> HealthRatio {
    let ok = statuses.values().filter(|status| status.is_ok()).count();
    HealthRatio::new(ok, statuses.len())
}

/// Discovery health from the per-method map, or from the method count
/// minus reported errors when the daemon provides no map.
pub fn discovery_health(status: &SystemStatus) -> HealthRatio {
    let ratio = service_health(&status.discovery_status);
    if ratio.total > 0 {
        return ratio;
    }

    let Ok(methods) = usize::try_from(status.discovery_methods) else {
        return HealthRatio::default();
    };
    if methods == 0 {
        return HealthRatio::default();
    }

    let errors = status.discovery_errors.len().min(methods);
    HealthRatio::new(methods - errors, methods)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statuses(entries: &[(&str, Option<&str>)]) -> HashMap<String, ServiceStatus> {
        entries
            .iter()
            .map(|(name, error)| {
                (
                    name.to_string(),
                    ServiceStatus {
                        error: error.map(str::to_string),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_listener_ratio() {
        let map = statuses(&[
            ("tcp://0.0.0.0:22000", None),
            ("quic://0.0.0.0:22000", Some("bind failed")),
            ("relay://", Some("")),
        ]);
        assert_eq!(service_health(&map), HealthRatio::new(2, 3));
        assert_eq!(service_health(&HashMap::new()), HealthRatio::new(0, 0));
    }

    #[test]
    fn test_discovery_prefers_status_map() {
        let status = SystemStatus {
            discovery_status: statuses(&[("global", None), ("local", Some("disabled"))]),
            discovery_methods: 5,
            ..Default::default()
        };
        assert_eq!(discovery_health(&status), HealthRatio::new(1, 2));
    }

    #[test]
    fn test_discovery_falls_back_to_method_count() {
        let mut status = SystemStatus {
            discovery_methods: 3,
            ..Default::default()
        };
        status
            .discovery_errors
            .insert("global@https://a".to_string(), "timeout".to_string());
        assert_eq!(discovery_health(&status), HealthRatio::new(2, 3));
    }

    #[test]
    fn test_discovery_errors_are_capped() {
        let mut status = SystemStatus {
            discovery_methods: 1,
            ..Default::default()
        };
        for idx in 0..4 {
            status
                .discovery_errors
                .insert(format!("method-{idx}"), "down".to_string());
        }
        assert_eq!(discovery_health(&status), HealthRatio::new(0, 1));

        status.discovery_methods = 0;
        assert_eq!(discovery_health(&status), HealthRatio::new(0, 0));
    }
}
