//! Side-table merge policy.
//!
//! Lists are unioned (first operand's order first, duplicates dropped) and
//! scalars are overridden (the preferred operand wins unless absent).

use crate::container::Container;
use crate::quadlet::{GlobalArgs, InstallSection, ServiceSection, UnitSection};

/// Union two lists, keeping `primary` order and appending unseen `extra` entries.
pub fn merge_list(primary: &[String], extra: &[String]) -> Vec<String> {
    let mut merged = primary.to_vec();
    for item in extra {
        if !merged.contains(item) {
            merged.push(item.clone());
        }
    }
    merged
}

/// `preferred` unless absent, then `fallback`.
pub fn merge_scalar<T: Clone>(preferred: Option<&T>, fallback: Option<&T>) -> Option<T> {
    preferred.or(fallback).cloned()
}

/// systemd `Restart=` value for a Compose restart policy.
///
/// `unless-stopped` becomes `always`; `no`, `always` and `on-failure` pass
/// through; anything else has no systemd counterpart.
pub fn translate_restart(policy: &str) -> Option<&'static str> {
    match policy {
        "unless-stopped" => Some("always"),
        "always" => Some("always"),
        "on-failure" => Some("on-failure"),
        "no" => Some("no"),
        _ => None,
    }
}

/// Ordering edges derived from a container's `depends_on` list.
pub fn dependency_unit(container: &Container) -> UnitSection {
    let units: Vec<String> = container
        .depends_on
        .iter()
        .map(|dependency| format!("{}.service", dependency))
        .collect();
    UnitSection {
        after: units.clone(),
        wants: units,
        ..Default::default()
    }
}

/// Caller `[Unit]` overlay merged with derived edges; caller entries come first.
pub fn merge_unit(caller: Option<&UnitSection>, derived: &UnitSection) -> Option<UnitSection> {
    let base = caller.cloned().unwrap_or_default();
    let merged = UnitSection {
        description: merge_scalar(base.description.as_ref(), derived.description.as_ref()),
        after: merge_list(&base.after, &derived.after),
        wants: merge_list(&base.wants, &derived.wants),
        requires: merge_list(&base.requires, &derived.requires),
        before: merge_list(&base.before, &derived.before),
    };
    (!merged.is_empty()).then_some(merged)
}

/// Caller `[Service]` overlay with the translated restart policy filled in
/// when the caller left `Restart` unset.
pub fn merge_service(
    caller: Option<&ServiceSection>,
    derived_restart: Option<&str>,
) -> Option<ServiceSection> {
    let mut merged = caller.cloned().unwrap_or_default();
    if merged.restart.is_none() {
        merged.restart = derived_restart.map(str::to_string);
    }
    (!merged.is_empty()).then_some(merged)
}

/// Layer `top` over `base`: lists unioned, `top` scalars win.
pub fn overlay_unit(base: Option<&UnitSection>, top: Option<&UnitSection>) -> Option<UnitSection> {
    match (base, top) {
        (None, None) => None,
        (Some(only), None) | (None, Some(only)) => Some(only.clone()),
        (Some(base), Some(top)) => Some(UnitSection {
            description: merge_scalar(top.description.as_ref(), base.description.as_ref()),
            after: merge_list(&base.after, &top.after),
            wants: merge_list(&base.wants, &top.wants),
            requires: merge_list(&base.requires, &top.requires),
            before: merge_list(&base.before, &top.before),
        }),
    }
}

pub fn overlay_service(
    base: Option<&ServiceSection>,
    top: Option<&ServiceSection>,
) -> Option<ServiceSection> {
    match (base, top) {
        (None, None) => None,
        (Some(only), None) | (None, Some(only)) => Some(only.clone()),
        (Some(base), Some(top)) => Some(ServiceSection {
            restart: merge_scalar(top.restart.as_ref(), base.restart.as_ref()),
            restart_sec: merge_scalar(top.restart_sec.as_ref(), base.restart_sec.as_ref()),
            timeout_start_sec: merge_scalar(
                top.timeout_start_sec.as_ref(),
                base.timeout_start_sec.as_ref(),
            ),
        }),
    }
}

pub fn overlay_install(
    base: Option<&InstallSection>,
    top: Option<&InstallSection>,
) -> Option<InstallSection> {
    match (base, top) {
        (None, None) => None,
        (Some(only), None) | (None, Some(only)) => Some(only.clone()),
        (Some(base), Some(top)) => Some(InstallSection {
            wanted_by: merge_list(&base.wanted_by, &top.wanted_by),
            required_by: merge_list(&base.required_by, &top.required_by),
        }),
    }
}

pub fn overlay_globals(base: Option<&GlobalArgs>, top: Option<&GlobalArgs>) -> Option<GlobalArgs> {
    match (base, top) {
        (None, None) => None,
        (Some(only), None) | (None, Some(only)) => Some(only.clone()),
        (Some(base), Some(top)) => Some(GlobalArgs {
            podman_args: merge_scalar(top.podman_args.as_ref(), base.podman_args.as_ref()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_merge_list_unions_in_order() {
        assert_eq!(
            merge_list(&strings(&["a.service", "b.service"]), &strings(&["b.service", "c.service"])),
            strings(&["a.service", "b.service", "c.service"])
        );
        assert_eq!(merge_list(&[], &strings(&["x"])), strings(&["x"]));
    }

    #[test]
    fn test_merge_scalar_prefers_first() {
        let caller = "on-failure".to_string();
        let derived = "always".to_string();
        assert_eq!(merge_scalar(Some(&caller), Some(&derived)), Some(caller.clone()));
        assert_eq!(merge_scalar(None, Some(&derived)), Some(derived));
        assert_eq!(merge_scalar::<String>(None, None), None);
    }

    #[test]
    fn test_translate_restart() {
        assert_eq!(translate_restart("unless-stopped"), Some("always"));
        assert_eq!(translate_restart("no"), Some("no"));
        assert_eq!(translate_restart("on-failure"), Some("on-failure"));
        assert_eq!(translate_restart("on-failure:3"), None);
        assert_eq!(translate_restart("sometimes"), None);
    }

    #[test]
    fn test_dependency_unit() {
        let mut container = Container::new("nginx").unwrap();
        container.depends_on = strings(&["db", "cache"]);
        let unit = dependency_unit(&container);
        assert_eq!(unit.after, strings(&["db.service", "cache.service"]));
        assert_eq!(unit.wants, unit.after);
        assert!(unit.requires.is_empty());
    }

    #[test]
    fn test_merge_unit_with_caller_overlay() {
        let caller = UnitSection {
            description: Some("Web".to_string()),
            after: strings(&["network-online.target"]),
            ..Default::default()
        };
        let derived = UnitSection {
            after: strings(&["db.service"]),
            wants: strings(&["db.service"]),
            ..Default::default()
        };
        let merged = merge_unit(Some(&caller), &derived).unwrap();
        assert_eq!(merged.description.as_deref(), Some("Web"));
        assert_eq!(merged.after, strings(&["network-online.target", "db.service"]));
        assert_eq!(merged.wants, strings(&["db.service"]));

        assert_eq!(merge_unit(None, &UnitSection::default()), None);
    }

    #[test]
    fn test_merge_service_caller_restart_wins() {
        let caller = ServiceSection {
            restart: Some("on-failure".to_string()),
            ..Default::default()
        };
        let merged = merge_service(Some(&caller), Some("always")).unwrap();
        assert_eq!(merged.restart.as_deref(), Some("on-failure"));

        let merged = merge_service(None, Some("always")).unwrap();
        assert_eq!(merged.restart.as_deref(), Some("always"));

        assert_eq!(merge_service(None, None), None);
    }

    #[test]
    fn test_overlay_top_scalars_win() {
        let base = ServiceSection {
            restart: Some("always".to_string()),
            restart_sec: Some("5".to_string()),
            ..Default::default()
        };
        let top = ServiceSection {
            restart: Some("no".to_string()),
            ..Default::default()
        };
        let merged = overlay_service(Some(&base), Some(&top)).unwrap();
        assert_eq!(merged.restart.as_deref(), Some("no"));
        assert_eq!(merged.restart_sec.as_deref(), Some("5"));
    }
}
