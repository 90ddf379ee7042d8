//! Compose service to container mapping.

use crate::compose::normalize::{self, ShapeError, ShapeResult, VolumeEntry};
use crate::compose::{ComposeError, ComposeProject, Diagnostic, MappedService, Result};
use crate::container::{Container, ContainerError, PullPolicy};
use crate::quadlet::escape_value;
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Top-level keys that make the whole document unconvertible.
const FATAL_TOP_LEVEL: &[&str] = &["configs", "secrets"];

/// Top-level keys understood by the mapper.
const KNOWN_TOP_LEVEL: &[&str] = &["services", "volumes", "networks", "version", "name"];

/// Service keys that are accepted but have no effect.
const IGNORED_SERVICE_KEYS: &[&str] = &[
    "external_links",
    "links",
    "network_mode",
    "secrets",
    "configs",
    "deploy",
];

/// Service keys consumed by [`ServiceMapper::map`].
const KNOWN_SERVICE_KEYS: &[&str] = &[
    "image",
    "build",
    "container_name",
    "command",
    "entrypoint",
    "ports",
    "expose",
    "volumes",
    "environment",
    "env_file",
    "labels",
    "annotations",
    "networks",
    "hostname",
    "user",
    "working_dir",
    "restart",
    "security_opt",
    "cap_add",
    "cap_drop",
    "devices",
    "dns",
    "dns_search",
    "dns_opt",
    "extra_hosts",
    "read_only",
    "init",
    "tmpfs",
    "privileged",
    "tty",
    "stdin_open",
    "mem_limit",
    "cpus",
    "healthcheck",
    "depends_on",
    "sysctls",
    "ulimits",
    "pids_limit",
    "logging",
    "shm_size",
    "stop_signal",
    "group_add",
    "pull_policy",
];

/// Converts decoded Compose documents into containers.
pub struct ComposeMapper;

impl ComposeMapper {
    /// Decode YAML text and map it.
    pub fn parse_str(yaml: &str) -> Result<ComposeProject> {
        let document: Value = serde_yaml::from_str(yaml)?;
        Self::parse(&document)
    }

    /// Map every service of a decoded document, in document order.
    ///
    /// # Errors
    ///
    /// Fails on the first structural problem, unsupported top-level feature,
    /// or invalid service; no partial project is returned.
    pub fn parse(document: &Value) -> Result<ComposeProject> {
        let root = document.as_mapping().ok_or_else(|| {
            ComposeError::Structural("document must be a mapping".to_string())
        })?;

        for feature in FATAL_TOP_LEVEL {
            if root.contains_key(*feature) {
                return Err(ComposeError::UnsupportedFeature {
                    feature: feature.to_string(),
                });
            }
        }

        let services = match root.get("services") {
            Some(Value::Mapping(services)) => services,
            Some(_) => {
                return Err(ComposeError::Structural(
                    "'services' must be a mapping".to_string(),
                ));
            }
            None => {
                return Err(ComposeError::Structural(
                    "missing 'services' section".to_string(),
                ));
            }
        };
        if services.is_empty() {
            return Err(ComposeError::Structural(
                "at least one service is required".to_string(),
            ));
        }

        let mut project = ComposeProject::default();
        for key in root.keys().filter_map(Value::as_str) {
            if !KNOWN_TOP_LEVEL.contains(&key) && !key.starts_with("x-") {
                note(
                    &mut project.diagnostics,
                    None,
                    key,
                    format!("top-level '{}' is not supported and was ignored", key),
                );
            }
        }

        let names = ResourceNames::from_document(root);

        for (key, spec) in services {
            let name = normalize::scalar_to_string(key).ok_or_else(|| {
                ComposeError::Structural("service names must be strings".to_string())
            })?;
            debug!("Mapping compose service '{}'", name);

            let mapper = ServiceMapper {
                service: &name,
                names: &names,
            };
            let container = mapper.map(spec, &mut project.diagnostics)?;
            project.services.push(MappedService { name, container });
        }

        info!("Mapped {} compose service(s)", project.services.len());
        Ok(project)
    }
}

/// Declared names of top-level volumes and networks.
#[derive(Debug, Default)]
struct ResourceNames {
    volumes: HashMap<String, String>,
    networks: HashMap<String, String>,
}

impl ResourceNames {
    fn from_document(root: &Mapping) -> Self {
        Self {
            volumes: declared_names(root.get("volumes")),
            networks: declared_names(root.get("networks")),
        }
    }

    fn volume(&self, name: &str) -> String {
        self.volumes
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }

    fn network(&self, name: &str) -> String {
        self.networks
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }
}

fn declared_names(section: Option<&Value>) -> HashMap<String, String> {
    let Some(Value::Mapping(entries)) = section else {
        return HashMap::new();
    };
    entries
        .iter()
        .filter_map(|(key, config)| {
            let key = key.as_str()?;
            let declared = config.get("name")?.as_str()?;
            Some((key.to_string(), declared.to_string()))
        })
        .collect()
}

fn note(diagnostics: &mut Vec<Diagnostic>, service: Option<&str>, feature: &str, message: String) {
    match service {
        Some(service) => warn!("Service '{}': {}", service, message),
        None => warn!("{}", message),
    }
    diagnostics.push(Diagnostic {
        service: service.map(str::to_string),
        feature: feature.to_string(),
        message,
    });
}

/// Maps a single service definition.
struct ServiceMapper<'a> {
    service: &'a str,
    names: &'a ResourceNames,
}

impl ServiceMapper<'_> {
    fn shape<T>(&self, result: ShapeResult<T>) -> Result<T> {
        result.map_err(|ShapeError { field, reason }| ComposeError::InvalidShape {
            service: self.service.to_string(),
            field,
            reason,
        })
    }

    fn field<T>(&self, result: std::result::Result<T, ContainerError>) -> Result<T> {
        result.map_err(|source| ComposeError::InvalidField {
            service: self.service.to_string(),
            source,
        })
    }

    fn scalar(&self, spec: &Mapping, key: &str) -> Result<Option<String>> {
        self.shape(normalize::get_scalar(spec, key, key))
    }

    fn list(&self, spec: &Mapping, key: &str) -> Result<Vec<String>> {
        match spec.get(key) {
            Some(value) => self.shape(normalize::string_or_list(value, key)),
            None => Ok(Vec::new()),
        }
    }

    fn flag(&self, spec: &Mapping, key: &str) -> Result<bool> {
        match spec.get(key) {
            Some(Value::Null) | None => Ok(false),
            Some(value) => self.shape(normalize::boolean(value, key)),
        }
    }

    fn key_values(&self, spec: &Mapping, key: &str, separator: char) -> Result<Vec<String>> {
        match spec.get(key) {
            Some(value) => self.shape(normalize::key_value_list(value, separator, key)),
            None => Ok(Vec::new()),
        }
    }

    fn map(&self, spec: &Value, diagnostics: &mut Vec<Diagnostic>) -> Result<Container> {
        let empty = Mapping::new();
        let spec = match spec {
            Value::Mapping(spec) => spec,
            Value::Null => &empty,
            _ => {
                return Err(ComposeError::Structural(format!(
                    "service '{}' must be a mapping",
                    self.service
                )));
            }
        };

        self.report_ignored(spec, diagnostics);

        let mut c = self.field(Container::new(self.image(spec)?))?;

        let name = self
            .scalar(spec, "container_name")?
            .unwrap_or_else(|| self.service.to_string());
        self.field(c.set_container_name(name))?;

        if let Some(value) = spec.get("command") {
            c.exec = self.shape(normalize::command(value, "command"))?;
        }
        if let Some(value) = spec.get("entrypoint") {
            c.entrypoint = self.shape(normalize::command(value, "entrypoint"))?;
        }

        self.map_ports(spec, &mut c)?;
        self.map_volumes(spec, &mut c)?;

        for entry in self.key_values(spec, "environment", '=')? {
            self.field(c.add_environment(entry))?;
        }
        if let Some(value) = spec.get("env_file") {
            c.environment_files
                .extend(self.shape(normalize::env_files(value))?);
        }
        for entry in self.key_values(spec, "labels", '=')? {
            self.field(c.add_label(entry))?;
        }
        c.annotations.extend(self.key_values(spec, "annotations", '=')?);

        self.map_networks(spec, &mut c)?;
        c.hostname = self.scalar(spec, "hostname")?;
        c.working_dir = self.scalar(spec, "working_dir")?;

        if let Some(user) = self.scalar(spec, "user")? {
            match user.split_once(':') {
                Some((user, group)) => {
                    c.user = Some(user.to_string());
                    c.group = Some(group.to_string());
                }
                None => c.user = Some(user),
            }
        }
        c.group_add.extend(self.list(spec, "group_add")?);

        self.map_security(spec, &mut c)?;
        c.add_capabilities.extend(self.list(spec, "cap_add")?);
        c.drop_capabilities.extend(self.list(spec, "cap_drop")?);
        c.devices.extend(self.list(spec, "devices")?);
        c.dns.extend(self.list(spec, "dns")?);
        c.dns_search.extend(self.list(spec, "dns_search")?);
        c.dns_options.extend(self.list(spec, "dns_opt")?);
        c.add_hosts.extend(self.key_values(spec, "extra_hosts", ':')?);
        c.tmpfs.extend(self.list(spec, "tmpfs")?);

        c.read_only = self.flag(spec, "read_only")?;
        c.run_init = self.flag(spec, "init")?;

        for (key, arg) in [
            ("privileged", "--privileged"),
            ("tty", "--tty"),
            ("stdin_open", "--interactive"),
        ] {
            if self.flag(spec, key)? {
                c.add_podman_arg(arg);
            }
        }
        if let Some(memory) = self.scalar(spec, "mem_limit")? {
            c.add_podman_arg(format!("--memory {}", memory));
        }
        if let Some(cpus) = self.scalar(spec, "cpus")? {
            c.add_podman_arg(format!("--cpus {}", cpus));
        }

        self.map_resources(spec, &mut c, diagnostics)?;

        if let Some(healthcheck) = spec.get("healthcheck") {
            self.map_healthcheck(healthcheck, &mut c)?;
        }

        if let Some(value) = spec.get("depends_on") {
            c.depends_on = self.shape(normalize::names(value, "depends_on"))?;
        }
        c.restart = self.scalar(spec, "restart")?;

        Ok(c)
    }

    fn image(&self, spec: &Mapping) -> Result<String> {
        if let Some(image) = self.scalar(spec, "image")? {
            return Ok(image);
        }
        if spec.contains_key("build") {
            debug!(
                "Service '{}' declares a build context, using placeholder image",
                self.service
            );
            return Ok(format!("{}.build", self.service));
        }
        Err(ComposeError::MissingImage {
            service: self.service.to_string(),
        })
    }

    fn report_ignored(&self, spec: &Mapping, diagnostics: &mut Vec<Diagnostic>) {
        for key in spec.keys().filter_map(Value::as_str) {
            if IGNORED_SERVICE_KEYS.contains(&key) {
                note(
                    diagnostics,
                    Some(self.service),
                    key,
                    format!("'{}' is not supported by Quadlet and was ignored", key),
                );
            } else if !KNOWN_SERVICE_KEYS.contains(&key) && !key.starts_with("x-") {
                note(
                    diagnostics,
                    Some(self.service),
                    key,
                    format!("unknown key '{}' was ignored", key),
                );
            }
        }
    }

    fn map_ports(&self, spec: &Mapping, c: &mut Container) -> Result<()> {
        match spec.get("ports") {
            None | Some(Value::Null) => {}
            Some(Value::Sequence(ports)) => {
                for entry in ports {
                    let port = self.shape(normalize::port(entry))?;
                    self.field(c.add_publish_port(port))?;
                }
            }
            Some(_) => {
                return Err(self.invalid("ports", "must be a sequence"));
            }
        }
        c.expose_host_ports.extend(self.list(spec, "expose")?);
        Ok(())
    }

    fn map_volumes(&self, spec: &Mapping, c: &mut Container) -> Result<()> {
        let entries = match spec.get("volumes") {
            None | Some(Value::Null) => return Ok(()),
            Some(Value::Sequence(entries)) => entries,
            Some(_) => return Err(self.invalid("volumes", "must be a sequence")),
        };

        for entry in entries {
            match self.shape(normalize::volume(entry, |name| self.names.volume(name)))? {
                VolumeEntry::Volume(volume) => self.field(c.add_volume(volume))?,
                VolumeEntry::Tmpfs(tmpfs) => c.tmpfs.push(tmpfs),
            }
        }
        Ok(())
    }

    fn map_networks(&self, spec: &Mapping, c: &mut Container) -> Result<()> {
        match spec.get("networks") {
            None | Some(Value::Null) => {}
            Some(Value::Mapping(networks)) => {
                for (name, config) in networks {
                    let name = self.shape(normalize::scalar(name, "networks"))?;
                    let mut network = self.names.network(&name);
                    let config = match config {
                        Value::Mapping(config) => config,
                        Value::Null => {
                            c.networks.push(network);
                            continue;
                        }
                        _ => return Err(self.invalid("networks", "entries must be mappings")),
                    };

                    let mut options = Vec::new();
                    if let Some(ip) = self.scalar(config, "ipv4_address")? {
                        options.push(format!("ip={}", ip));
                    }
                    if let Some(ip6) = self.scalar(config, "ipv6_address")? {
                        options.push(format!("ip6={}", ip6));
                    }
                    if !options.is_empty() {
                        network.push(':');
                        network.push_str(&options.join(","));
                    }
                    c.networks.push(network);
                    c.network_aliases.extend(self.list(config, "aliases")?);
                }
            }
            Some(value) => {
                let names = self.shape(normalize::string_or_list(value, "networks"))?;
                c.networks
                    .extend(names.iter().map(|name| self.names.network(name)));
            }
        }
        Ok(())
    }

    fn map_security(&self, spec: &Mapping, c: &mut Container) -> Result<()> {
        for option in self.list(spec, "security_opt")? {
            match option.as_str() {
                "no-new-privileges:true" | "no-new-privileges=true" | "no-new-privileges" => {
                    c.no_new_privileges = true;
                }
                other if other.starts_with("label=disable") || other.starts_with("label:disable") => {
                    c.security_label_disable = true;
                }
                other => c.add_podman_arg(format!("--security-opt {}", escape_value(other))),
            }
        }
        Ok(())
    }

    fn map_resources(
        &self,
        spec: &Mapping,
        c: &mut Container,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<()> {
        c.sysctls.extend(self.key_values(spec, "sysctls", '=')?);
        if let Some(value) = spec.get("ulimits") {
            c.ulimits.extend(self.shape(normalize::ulimits(value))?);
        }
        if let Some(limit) = self.scalar(spec, "pids_limit")? {
            let limit = limit
                .parse()
                .map_err(|_| self.invalid("pids_limit", "must be an integer"))?;
            c.pids_limit = Some(limit);
        }
        c.shm_size = self.scalar(spec, "shm_size")?;
        c.stop_signal = self.scalar(spec, "stop_signal")?;

        match spec.get("logging") {
            None | Some(Value::Null) => {}
            Some(Value::Mapping(logging)) => {
                c.log_driver = self.scalar(logging, "driver")?;
                c.log_options.extend(self.key_values(logging, "options", '=')?);
            }
            Some(_) => return Err(self.invalid("logging", "must be a mapping")),
        }

        if let Some(policy) = self.scalar(spec, "pull_policy")? {
            match policy.parse::<PullPolicy>() {
                Ok(policy) => c.pull = Some(policy),
                Err(reason) => note(
                    diagnostics,
                    Some(self.service),
                    "pull_policy",
                    format!("{} was ignored", reason),
                ),
            }
        }
        Ok(())
    }

    fn map_healthcheck(&self, healthcheck: &Value, c: &mut Container) -> Result<()> {
        let healthcheck = match healthcheck {
            Value::Null => return Ok(()),
            Value::Mapping(healthcheck) => healthcheck,
            _ => return Err(self.invalid("healthcheck", "must be a mapping")),
        };

        if self.flag(healthcheck, "disable")? {
            c.health_cmd = Some("none".to_string());
            return Ok(());
        }

        if let Some(test) = healthcheck.get("test") {
            c.health_cmd = self.health_test(test)?;
        }
        c.health_interval = self.scalar(healthcheck, "interval")?;
        c.health_timeout = self.scalar(healthcheck, "timeout")?;
        if let Some(retries) = healthcheck.get("retries") {
            c.health_retries = Some(self.shape(normalize::unsigned(retries, "healthcheck.retries"))?);
        }
        c.health_start_period = self.scalar(healthcheck, "start_period")?;
        Ok(())
    }

    /// `test` as a command string; `CMD`/`CMD-SHELL` markers are dropped and
    /// `NONE` disables the check. A test with no command leaves it unset.
    fn health_test(&self, test: &Value) -> Result<Option<String>> {
        let Value::Sequence(_) = test else {
            return self.shape(normalize::command(test, "healthcheck.test"));
        };
        let tokens = self.shape(normalize::string_or_list(test, "healthcheck.test"))?;
        let tokens = match tokens.first().map(String::as_str) {
            Some("NONE") => return Ok(Some("none".to_string())),
            Some("CMD") | Some("CMD-SHELL") => &tokens[1..],
            _ => &tokens[..],
        };
        Ok(normalize::non_blank(tokens.join(" ")))
    }

    fn invalid(&self, field: &str, reason: &str) -> ComposeError {
        ComposeError::InvalidShape {
            service: self.service.to_string(),
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Result<ComposeProject> {
        ComposeMapper::parse_str(yaml)
    }

    #[test]
    fn test_structural_errors() {
        assert!(matches!(parse("- a\n- b\n"), Err(ComposeError::Structural(_))));
        assert!(matches!(parse("version: '3'\n"), Err(ComposeError::Structural(_))));
        assert!(matches!(parse("services: {}\n"), Err(ComposeError::Structural(_))));
        assert!(matches!(parse("services: [web]\n"), Err(ComposeError::Structural(_))));
    }

    #[test]
    fn test_top_level_configs_and_secrets_are_fatal() {
        let err = parse("services:\n  web:\n    image: nginx\nsecrets:\n  token:\n    file: ./t\n")
            .unwrap_err();
        assert!(matches!(err, ComposeError::UnsupportedFeature { ref feature } if feature == "secrets"));

        let err = parse("services:\n  web:\n    image: nginx\nconfigs: {}\n").unwrap_err();
        assert!(matches!(err, ComposeError::UnsupportedFeature { .. }));
    }

    #[test]
    fn test_missing_image_names_service() {
        let err = parse("services:\n  worker:\n    command: run\n").unwrap_err();
        assert!(matches!(err, ComposeError::MissingImage { ref service } if service == "worker"));
        assert!(err.to_string().contains("worker"));
    }

    #[test]
    fn test_build_placeholder_image() {
        let project = parse("services:\n  api:\n    build: .\n").unwrap();
        assert_eq!(project.get("api").unwrap().image(), "api.build");
    }

    #[test]
    fn test_container_name_resolution() {
        let project = parse(
            "services:\n  web:\n    image: nginx\n  db:\n    image: postgres\n    container_name: pg-main\n",
        )
        .unwrap();
        assert_eq!(project.get("web").unwrap().container_name(), Some("web"));
        assert_eq!(project.get("db").unwrap().container_name(), Some("pg-main"));
        assert_eq!(project.names(), vec!["web", "db"]);
    }

    #[test]
    fn test_unsupported_service_keys_warn() {
        let project = parse(
            "services:\n  web:\n    image: nginx\n    network_mode: host\n    deploy:\n      replicas: 2\n",
        )
        .unwrap();
        let notes = project.diagnostics_for("web");
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].feature, "network_mode");
        assert_eq!(notes[1].feature, "deploy");
        assert!(project.get("web").unwrap().networks.is_empty());
    }

    #[test]
    fn test_invalid_field_names_service() {
        let err = parse("services:\n  web:\n    image: nginx\n    ports: [\"0:80\"]\n").unwrap_err();
        match err {
            ComposeError::InvalidField { service, source } => {
                assert_eq!(service, "web");
                assert_eq!(source, ContainerError::InvalidPort("0:80".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_security_options() {
        let project = parse(
            "services:\n  web:\n    image: nginx\n    security_opt:\n      - no-new-privileges:true\n      - label=disable\n      - seccomp=unconfined\n      - apparmor=my profile\n",
        )
        .unwrap();
        let web = project.get("web").unwrap();
        assert!(web.no_new_privileges);
        assert!(web.security_label_disable);
        assert_eq!(
            web.podman_args,
            vec![
                "--security-opt seccomp=unconfined".to_string(),
                "--security-opt \"apparmor=my profile\"".to_string(),
            ]
        );
    }

    #[test]
    fn test_flag_passthroughs() {
        let project = parse(
            "services:\n  web:\n    image: nginx\n    privileged: true\n    tty: false\n    stdin_open: true\n    mem_limit: 512m\n    cpus: 0.5\n    read_only: true\n    init: true\n",
        )
        .unwrap();
        let web = project.get("web").unwrap();
        assert_eq!(
            web.podman_args,
            vec!["--privileged", "--interactive", "--memory 512m", "--cpus 0.5"]
        );
        assert!(web.read_only);
        assert!(web.run_init);
    }

    #[test]
    fn test_user_and_group_split() {
        let project = parse(
            "services:\n  a:\n    image: x\n    user: \"1000:1000\"\n  b:\n    image: x\n    user: app\n",
        )
        .unwrap();
        let a = project.get("a").unwrap();
        assert_eq!(a.user.as_deref(), Some("1000"));
        assert_eq!(a.group.as_deref(), Some("1000"));
        let b = project.get("b").unwrap();
        assert_eq!(b.user.as_deref(), Some("app"));
        assert_eq!(b.group, None);
    }

    #[test]
    fn test_healthcheck_mapping() {
        let project = parse(
            "services:\n  web:\n    image: nginx\n    healthcheck:\n      test: [\"CMD\", \"curl\", \"-f\", \"http://localhost\"]\n      interval: 30s\n      timeout: 5s\n      retries: 3\n      start_period: 10s\n",
        )
        .unwrap();
        let web = project.get("web").unwrap();
        assert_eq!(web.health_cmd.as_deref(), Some("curl -f http://localhost"));
        assert_eq!(web.health_interval.as_deref(), Some("30s"));
        assert_eq!(web.health_timeout.as_deref(), Some("5s"));
        assert_eq!(web.health_retries, Some(3));
        assert_eq!(web.health_start_period.as_deref(), Some("10s"));
    }

    #[test]
    fn test_healthcheck_disable_skips_everything_else() {
        let project = parse(
            "services:\n  web:\n    image: nginx\n    healthcheck:\n      disable: true\n      interval: 30s\n",
        )
        .unwrap();
        let web = project.get("web").unwrap();
        assert_eq!(web.health_cmd.as_deref(), Some("none"));
        assert_eq!(web.health_interval, None);
    }

    #[test]
    fn test_empty_commands_stay_unset() {
        let project = parse(
            "services:\n  web:\n    image: nginx\n    command: []\n    entrypoint: ''\n    healthcheck:\n      test: [\"CMD-SHELL\"]\n  db:\n    image: postgres\n    healthcheck:\n      test: []\n      interval: 5s\n",
        )
        .unwrap();
        let web = project.get("web").unwrap();
        assert_eq!(web.exec, None);
        assert_eq!(web.entrypoint, None);
        assert_eq!(web.health_cmd, None);

        let db = project.get("db").unwrap();
        assert_eq!(db.health_cmd, None);
        assert_eq!(db.health_interval.as_deref(), Some("5s"));
    }

    #[test]
    fn test_networks_with_ip_and_aliases() {
        let project = parse(
            "services:\n  web:\n    image: nginx\n    networks:\n      front:\n        ipv4_address: 10.0.0.5\n        aliases: [www, site]\n      back:\nnetworks:\n  front: {}\n  back:\n    name: shared_back\n",
        )
        .unwrap();
        let web = project.get("web").unwrap();
        assert_eq!(web.networks, vec!["front:ip=10.0.0.5", "shared_back"]);
        assert_eq!(web.network_aliases, vec!["www", "site"]);
    }

    #[test]
    fn test_depends_on_and_restart_are_captured() {
        let project = parse(
            "services:\n  web:\n    image: nginx\n    restart: unless-stopped\n    depends_on:\n      db:\n        condition: service_started\n  db:\n    image: postgres\n",
        )
        .unwrap();
        let web = project.get("web").unwrap();
        assert_eq!(web.depends_on, vec!["db"]);
        assert_eq!(web.restart.as_deref(), Some("unless-stopped"));
    }

    #[test]
    fn test_unknown_pull_policy_is_diagnosed() {
        let project = parse("services:\n  web:\n    image: nginx\n    pull_policy: build\n").unwrap();
        assert_eq!(project.get("web").unwrap().pull, None);
        assert_eq!(project.diagnostics[0].feature, "pull_policy");
    }
}
