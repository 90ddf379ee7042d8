//! The canonical Quadlet container model.
//!
//! A [`Container`] holds everything a `[Container]` section can express. Fields
//! with externally documented syntax (image, name, ports, environment, volumes,
//! labels) are private and only reachable through validating mutators; the
//! remaining settings are plain public fields. List fields use an empty `Vec`
//! for "unset", scalar fields use `Option`.

use crate::container::{AutoUpdate, ContainerError, Notify, PullPolicy, Result};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]*$").unwrap());

static PORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?P<ip>\[[0-9A-Fa-f:.]+\]|[0-9]{1,3}(?:\.[0-9]{1,3}){3}):(?P<ip_host>[0-9]*):|(?P<host>[0-9]+):)?(?P<container>[0-9]+)(?:/(?P<proto>tcp|udp|sctp))?$").unwrap()
});

/// A container unit in the making.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Container {
    image: String,
    container_name: Option<String>,
    publish_ports: Vec<String>,
    environment: Vec<String>,
    volumes: Vec<String>,
    labels: Vec<String>,

    // Identity
    pub entrypoint: Option<String>,
    pub exec: Option<String>,
    pub working_dir: Option<String>,
    pub hostname: Option<String>,

    // Networking
    pub expose_host_ports: Vec<String>,
    pub networks: Vec<String>,
    pub network_aliases: Vec<String>,
    pub dns: Vec<String>,
    pub dns_search: Vec<String>,
    pub dns_options: Vec<String>,
    pub ip: Option<String>,
    pub ip6: Option<String>,
    pub add_hosts: Vec<String>,

    // Storage
    pub mounts: Vec<String>,
    pub tmpfs: Vec<String>,
    pub environment_files: Vec<String>,
    pub environment_host: bool,
    pub annotations: Vec<String>,

    // Security
    pub add_capabilities: Vec<String>,
    pub drop_capabilities: Vec<String>,
    pub seccomp_profile: Option<String>,
    pub security_label_disable: bool,
    pub security_label_type: Option<String>,
    pub security_label_level: Option<String>,
    pub security_label_file_type: Option<String>,
    pub no_new_privileges: bool,
    pub user: Option<String>,
    pub group: Option<String>,
    pub group_add: Vec<String>,
    pub user_ns: Option<String>,
    pub uid_maps: Vec<String>,
    pub gid_maps: Vec<String>,
    pub sub_uid_map: Option<String>,
    pub sub_gid_map: Option<String>,
    pub mask: Vec<String>,
    pub unmask: Vec<String>,
    pub devices: Vec<String>,

    // Health
    pub health_cmd: Option<String>,
    pub health_interval: Option<String>,
    pub health_timeout: Option<String>,
    pub health_retries: Option<u32>,
    pub health_start_period: Option<String>,
    pub health_startup_cmd: Option<String>,
    pub health_startup_interval: Option<String>,
    pub health_startup_retries: Option<u32>,
    pub health_startup_success: Option<u32>,
    pub health_startup_timeout: Option<String>,
    pub health_on_failure: Option<String>,
    pub notify: Notify,

    // Logging
    pub log_driver: Option<String>,
    pub log_options: Vec<String>,

    // Resources
    pub pids_limit: Option<i64>,
    pub ulimits: Vec<String>,
    pub sysctls: Vec<String>,
    pub shm_size: Option<String>,

    // Lifecycle
    pub read_only: bool,
    /// `None` keeps Quadlet's default of a writable tmpfs on a read-only rootfs.
    pub read_only_tmpfs: Option<bool>,
    pub run_init: bool,
    pub auto_update: Option<AutoUpdate>,
    pub pull: Option<PullPolicy>,
    pub stop_signal: Option<String>,
    pub stop_timeout: Option<u32>,
    pub timezone: Option<String>,

    /// Raw arguments appended to `podman run`.
    pub podman_args: Vec<String>,

    /// Compose `depends_on` entries, translated into `[Unit]` ordering later.
    pub depends_on: Vec<String>,
    /// Compose `restart` policy, translated into `[Service]` later.
    pub restart: Option<String>,
}

impl Container {
    /// Create a container for the given image.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::InvalidImage`] for an empty or whitespace-bearing reference.
    pub fn new<S: Into<String>>(image: S) -> Result<Self> {
        let mut container = Self::default();
        container.set_image(image)?;
        Ok(container)
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn container_name(&self) -> Option<&str> {
        self.container_name.as_deref()
    }

    pub fn publish_ports(&self) -> &[String] {
        &self.publish_ports
    }

    pub fn environment(&self) -> &[String] {
        &self.environment
    }

    pub fn volumes(&self) -> &[String] {
        &self.volumes
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Set the image reference.
    pub fn set_image<S: Into<String>>(&mut self, image: S) -> Result<()> {
        let image = image.into();
        if image.trim().is_empty() || image.chars().any(char::is_whitespace) {
            return Err(ContainerError::InvalidImage(image));
        }
        self.image = image;
        Ok(())
    }

    /// Set the container name, which must match `^[A-Za-z0-9][A-Za-z0-9_.-]*$`.
    pub fn set_container_name<S: Into<String>>(&mut self, name: S) -> Result<()> {
        let name = name.into();
        if !NAME_RE.is_match(&name) {
            return Err(ContainerError::InvalidName(name));
        }
        self.container_name = Some(name);
        Ok(())
    }

    /// Add a published port in `[ip:[host]:|host:]container[/protocol]` form.
    ///
    /// After an IP the host segment is mandatory but may be empty
    /// (`127.0.0.1::80`).
    pub fn add_publish_port<S: Into<String>>(&mut self, port: S) -> Result<()> {
        let port = port.into();
        validate_port(&port)?;
        self.publish_ports.push(port);
        Ok(())
    }

    /// Add a `KEY=VALUE` environment entry.
    pub fn add_environment<S: Into<String>>(&mut self, entry: S) -> Result<()> {
        let entry = entry.into();
        if !is_key_value(&entry) {
            return Err(ContainerError::InvalidEnvironment(entry));
        }
        self.environment.push(entry);
        Ok(())
    }

    /// Add a volume: an absolute container path or `source:destination[:options]`.
    pub fn add_volume<S: Into<String>>(&mut self, volume: S) -> Result<()> {
        let volume = volume.into();
        validate_volume(&volume)?;
        self.volumes.push(volume);
        Ok(())
    }

    /// Add a `KEY=VALUE` label.
    pub fn add_label<S: Into<String>>(&mut self, label: S) -> Result<()> {
        let label = label.into();
        if !is_key_value(&label) {
            return Err(ContainerError::InvalidLabel(label));
        }
        self.labels.push(label);
        Ok(())
    }

    /// Append a raw `podman run` argument.
    pub fn add_podman_arg<S: Into<String>>(&mut self, arg: S) {
        self.podman_args.push(arg.into());
    }

    /// Re-check cross-field invariants before serialization.
    ///
    /// Besides port well-formedness this rejects any value, including the
    /// public fields, that would break out of its `Key=value` line.
    pub fn validate(&self) -> Result<()> {
        if self.image.is_empty() {
            return Err(ContainerError::InvalidImage(self.image.clone()));
        }
        for port in &self.publish_ports {
            validate_port(port)?;
        }
        if let Some((key, value)) = self.single_line_values().find(|(_, v)| has_line_break(v)) {
            return Err(ContainerError::LineBreak {
                key: key.to_string(),
                value: value.to_string(),
            });
        }
        debug!("Validated container for image {}", self.image);
        Ok(())
    }

    /// Name derived from the image: last path segment without tag or digest.
    ///
    /// `docker.io/library/nginx:1.25` gives `nginx`.
    pub fn default_name(&self) -> String {
        default_name_for_image(&self.image)
    }

    /// The explicit container name, or the image-derived default.
    pub fn effective_name(&self) -> String {
        self.container_name
            .clone()
            .unwrap_or_else(|| self.default_name())
    }
}

impl Container {
    /// Every free-form text value paired with its unit-file key.
    fn single_line_values(&self) -> impl Iterator<Item = (&'static str, &str)> {
        let scalars = [
            ("ContainerName", self.container_name.as_deref()),
            ("Entrypoint", self.entrypoint.as_deref()),
            ("Exec", self.exec.as_deref()),
            ("WorkingDir", self.working_dir.as_deref()),
            ("HostName", self.hostname.as_deref()),
            ("IP", self.ip.as_deref()),
            ("IP6", self.ip6.as_deref()),
            ("SeccompProfile", self.seccomp_profile.as_deref()),
            ("SecurityLabelType", self.security_label_type.as_deref()),
            ("SecurityLabelLevel", self.security_label_level.as_deref()),
            ("SecurityLabelFileType", self.security_label_file_type.as_deref()),
            ("User", self.user.as_deref()),
            ("Group", self.group.as_deref()),
            ("UserNS", self.user_ns.as_deref()),
            ("SubUIDMap", self.sub_uid_map.as_deref()),
            ("SubGIDMap", self.sub_gid_map.as_deref()),
            ("HealthCmd", self.health_cmd.as_deref()),
            ("HealthInterval", self.health_interval.as_deref()),
            ("HealthTimeout", self.health_timeout.as_deref()),
            ("HealthStartPeriod", self.health_start_period.as_deref()),
            ("HealthStartupCmd", self.health_startup_cmd.as_deref()),
            ("HealthStartupInterval", self.health_startup_interval.as_deref()),
            ("HealthStartupTimeout", self.health_startup_timeout.as_deref()),
            ("HealthOnFailure", self.health_on_failure.as_deref()),
            ("LogDriver", self.log_driver.as_deref()),
            ("ShmSize", self.shm_size.as_deref()),
            ("StopSignal", self.stop_signal.as_deref()),
            ("Timezone", self.timezone.as_deref()),
        ];
        let lists: [(&'static str, &[String]); 27] = [
            ("PublishPort", &self.publish_ports),
            ("Environment", &self.environment),
            ("Volume", &self.volumes),
            ("Label", &self.labels),
            ("ExposeHostPort", &self.expose_host_ports),
            ("Network", &self.networks),
            ("NetworkAlias", &self.network_aliases),
            ("DNS", &self.dns),
            ("DNSSearch", &self.dns_search),
            ("DNSOption", &self.dns_options),
            ("AddHost", &self.add_hosts),
            ("Mount", &self.mounts),
            ("Tmpfs", &self.tmpfs),
            ("EnvironmentFile", &self.environment_files),
            ("Annotation", &self.annotations),
            ("AddCapability", &self.add_capabilities),
            ("DropCapability", &self.drop_capabilities),
            ("GroupAdd", &self.group_add),
            ("UIDMap", &self.uid_maps),
            ("GIDMap", &self.gid_maps),
            ("AddDevice", &self.devices),
            ("LogOpt", &self.log_options),
            ("Ulimit", &self.ulimits),
            ("Sysctl", &self.sysctls),
            ("Mask", &self.mask),
            ("Unmask", &self.unmask),
            ("PodmanArgs", &self.podman_args),
        ];

        scalars
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key, v)))
            .chain(
                lists
                    .into_iter()
                    .flat_map(|(key, values)| values.iter().map(move |v| (key, v.as_str()))),
            )
    }
}

/// True when `value` contains a carriage return or a line feed.
pub fn has_line_break(value: &str) -> bool {
    value.contains(['\n', '\r'])
}

/// See [`Container::default_name`].
pub fn default_name_for_image(image: &str) -> String {
    let without_digest = image.split('@').next().unwrap_or(image);
    let last = without_digest
        .rsplit('/')
        .next()
        .unwrap_or(without_digest);
    last.split(':').next().unwrap_or(last).to_string()
}

fn is_key_value(entry: &str) -> bool {
    matches!(entry.find('='), Some(idx) if idx > 0) && !has_line_break(entry)
}

fn validate_port(port: &str) -> Result<()> {
    let invalid = || ContainerError::InvalidPort(port.to_string());
    let caps = PORT_RE.captures(port).ok_or_else(invalid)?;

    for name in ["ip_host", "host", "container"] {
        if let Some(m) = caps.name(name).filter(|m| !m.as_str().is_empty()) {
            let value: u32 = m.as_str().parse().map_err(|_| invalid())?;
            if !(1..=65535).contains(&value) {
                return Err(invalid());
            }
        }
    }
    Ok(())
}

fn validate_volume(volume: &str) -> Result<()> {
    let invalid = |reason: &str| ContainerError::InvalidVolume {
        volume: volume.to_string(),
        reason: reason.to_string(),
    };

    if has_line_break(volume) {
        return Err(invalid("contains a line break"));
    }

    let parts: Vec<&str> = volume.split(':').collect();
    match parts.as_slice() {
        [path] => {
            if !path.starts_with('/') {
                return Err(invalid("anonymous volume must be an absolute container path"));
            }
        }
        [source, destination] | [source, destination, _] => {
            if source.is_empty() {
                return Err(invalid("empty source"));
            }
            if !destination.starts_with('/') {
                return Err(invalid("destination must be an absolute path"));
            }
        }
        _ => return Err(invalid("expected source:destination[:options]")),
    }
    Ok(())
}
