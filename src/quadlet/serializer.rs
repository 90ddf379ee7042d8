//! Quadlet text rendering.
//!
//! Sections are emitted in the fixed order `[Unit]`, `[Container]`,
//! `[GlobalArgs]`, `[Service]`, `[Install]`, separated by one blank line.
//! Sections without data are omitted entirely.

use crate::container::{Container, has_line_break};
use crate::quadlet::sections::{GlobalArgs, InstallSection, Sections, ServiceSection, UnitSection};
use std::borrow::Cow;
use tracing::{debug, warn};

/// Quote a value containing a space, escaping backslashes and then quotes.
///
/// Values without spaces are returned untouched.
pub fn escape_value(value: &str) -> Cow<'_, str> {
    if value.contains(' ') {
        let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
        Cow::Owned(format!("\"{}\"", escaped))
    } else {
        Cow::Borrowed(value)
    }
}

/// Render a full unit file for `container`.
///
/// The container is expected to be validated already; rendering never
/// modifies it.
pub fn generate(container: &Container, sections: &Sections) -> String {
    let mut blocks = Vec::new();

    if let Some(unit) = sections.unit.as_ref().filter(|u| !u.is_empty()) {
        blocks.push(render_unit(unit));
    }
    blocks.push(render_container(container));
    if let Some(globals) = sections.globals.as_ref().filter(|g| !g.is_empty()) {
        blocks.push(render_globals(globals));
    }
    if let Some(service) = sections.service.as_ref().filter(|s| !s.is_empty()) {
        blocks.push(render_service(service));
    }
    if let Some(install) = sections.install.as_ref().filter(|i| !i.is_empty()) {
        blocks.push(render_install(install));
    }
    // A section whose every value was skipped is left out entirely
    blocks.retain(|block| block.lines().nth(1).is_some());

    debug!(
        "Rendered {} section(s) for image {}",
        blocks.len(),
        container.image()
    );
    blocks.join("\n")
}

/// Line accumulator for one `[Section]` block.
struct SectionWriter {
    text: String,
}

impl SectionWriter {
    fn new(name: &str) -> Self {
        Self {
            text: format!("[{}]\n", name),
        }
    }

    /// Append `key=value`. A value with a line break is dropped.
    fn line(&mut self, key: &str, value: &str) {
        if has_line_break(value) {
            warn!(key, "Skipping multi-line value");
            return;
        }
        self.text.push_str(key);
        self.text.push('=');
        self.text.push_str(value);
        self.text.push('\n');
    }

    fn scalar(&mut self, key: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.line(key, value);
        }
    }

    fn display<T: ToString>(&mut self, key: &str, value: Option<T>) {
        if let Some(value) = value {
            self.line(key, &value.to_string());
        }
    }

    fn flag(&mut self, key: &str, value: bool) {
        if value {
            self.line(key, "true");
        }
    }

    fn list(&mut self, key: &str, values: &[String]) {
        for value in values {
            self.line(key, value);
        }
    }

    fn escaped_list(&mut self, key: &str, values: &[String]) {
        for value in values {
            self.line(key, &escape_value(value));
        }
    }

    fn joined(&mut self, key: &str, values: &[String], separator: &str) {
        if !values.is_empty() {
            self.line(key, &values.join(separator));
        }
    }

    fn finish(self) -> String {
        self.text
    }
}

fn render_unit(unit: &UnitSection) -> String {
    let mut w = SectionWriter::new("Unit");
    w.scalar("Description", unit.description.as_deref());
    w.list("After", &unit.after);
    w.list("Wants", &unit.wants);
    w.list("Requires", &unit.requires);
    w.list("Before", &unit.before);
    w.finish()
}

fn render_container(c: &Container) -> String {
    let mut w = SectionWriter::new("Container");

    w.line("Image", c.image());
    w.scalar("ContainerName", c.container_name());
    w.scalar("Entrypoint", c.entrypoint.as_deref());
    w.scalar("Exec", c.exec.as_deref());
    w.scalar("WorkingDir", c.working_dir.as_deref());
    w.scalar("HostName", c.hostname.as_deref());

    w.list("PublishPort", c.publish_ports());
    w.list("ExposeHostPort", &c.expose_host_ports);

    w.list("Volume", c.volumes());
    w.list("Mount", &c.mounts);
    w.list("Tmpfs", &c.tmpfs);

    w.escaped_list("Environment", c.environment());
    w.list("EnvironmentFile", &c.environment_files);
    w.flag("EnvironmentHost", c.environment_host);
    w.escaped_list("Label", c.labels());
    w.escaped_list("Annotation", &c.annotations);

    w.list("Network", &c.networks);
    w.list("NetworkAlias", &c.network_aliases);
    w.scalar("IP", c.ip.as_deref());
    w.scalar("IP6", c.ip6.as_deref());
    w.list("DNS", &c.dns);
    w.list("DNSSearch", &c.dns_search);
    w.list("DNSOption", &c.dns_options);
    w.list("AddHost", &c.add_hosts);

    w.scalar("User", c.user.as_deref());
    w.scalar("Group", c.group.as_deref());
    w.list("GroupAdd", &c.group_add);
    w.scalar("UserNS", c.user_ns.as_deref());
    w.list("UIDMap", &c.uid_maps);
    w.list("GIDMap", &c.gid_maps);
    w.scalar("SubUIDMap", c.sub_uid_map.as_deref());
    w.scalar("SubGIDMap", c.sub_gid_map.as_deref());

    w.joined("AddCapability", &c.add_capabilities, " ");
    w.joined("DropCapability", &c.drop_capabilities, " ");
    w.list("AddDevice", &c.devices);
    w.scalar("SeccompProfile", c.seccomp_profile.as_deref());
    w.flag("SecurityLabelDisable", c.security_label_disable);
    w.scalar("SecurityLabelType", c.security_label_type.as_deref());
    w.scalar("SecurityLabelLevel", c.security_label_level.as_deref());
    w.scalar("SecurityLabelFileType", c.security_label_file_type.as_deref());
    w.flag("NoNewPrivileges", c.no_new_privileges);
    w.joined("Mask", &c.mask, ":");
    w.joined("Unmask", &c.unmask, ":");

    w.scalar("HealthCmd", c.health_cmd.as_deref());
    w.scalar("HealthInterval", c.health_interval.as_deref());
    w.scalar("HealthTimeout", c.health_timeout.as_deref());
    w.display("HealthRetries", c.health_retries);
    w.scalar("HealthStartPeriod", c.health_start_period.as_deref());
    w.scalar("HealthStartupCmd", c.health_startup_cmd.as_deref());
    w.scalar("HealthStartupInterval", c.health_startup_interval.as_deref());
    w.display("HealthStartupRetries", c.health_startup_retries);
    w.display("HealthStartupSuccess", c.health_startup_success);
    w.scalar("HealthStartupTimeout", c.health_startup_timeout.as_deref());
    w.scalar("HealthOnFailure", c.health_on_failure.as_deref());
    w.scalar("Notify", c.notify.quadlet_value());

    w.scalar("LogDriver", c.log_driver.as_deref());
    w.list("LogOpt", &c.log_options);

    w.display("PidsLimit", c.pids_limit);
    w.list("Ulimit", &c.ulimits);
    w.list("Sysctl", &c.sysctls);
    w.scalar("ShmSize", c.shm_size.as_deref());

    w.flag("ReadOnly", c.read_only);
    if c.read_only_tmpfs == Some(false) {
        w.line("ReadOnlyTmpfs", "false");
    }
    w.flag("RunInit", c.run_init);
    w.scalar("AutoUpdate", c.auto_update.map(|a| a.as_str()));
    w.scalar("Pull", c.pull.map(|p| p.as_str()));
    w.scalar("StopSignal", c.stop_signal.as_deref());
    w.display("StopTimeout", c.stop_timeout);
    w.scalar("Timezone", c.timezone.as_deref());

    w.list("PodmanArgs", &c.podman_args);

    w.finish()
}

fn render_globals(globals: &GlobalArgs) -> String {
    let mut w = SectionWriter::new("GlobalArgs");
    w.scalar("PodmanArgs", globals.podman_args.as_deref());
    w.finish()
}

fn render_service(service: &ServiceSection) -> String {
    let mut w = SectionWriter::new("Service");
    w.scalar("Restart", service.restart.as_deref());
    w.scalar("RestartSec", service.restart_sec.as_deref());
    w.scalar("TimeoutStartSec", service.timeout_start_sec.as_deref());
    w.finish()
}

fn render_install(install: &InstallSection) -> String {
    let mut w = SectionWriter::new("Install");
    w.list("WantedBy", &install.wanted_by);
    w.list("RequiredBy", &install.required_by);
    w.finish()
}
