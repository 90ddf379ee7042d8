//! Built-in `docker run` / `podman run` converter.

use crate::container::default_name_for_image;
use crate::run::{Result, RunConverter, RunError};
use serde_yaml::{Mapping, Value};
use tracing::{debug, warn};

/// Whether an option consumes a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arity {
    TakesValue,
    Switch,
}

/// Canonical long name and arity for a long option name.
fn long_option(name: &str) -> Option<(&'static str, Arity)> {
    const V: Arity = Arity::TakesValue;
    const F: Arity = Arity::Switch;
    let spec = match name {
        "publish" => ("publish", V),
        "expose" => ("expose", V),
        "volume" => ("volume", V),
        "mount" => ("mount", V),
        "tmpfs" => ("tmpfs", V),
        "env" => ("env", V),
        "env-file" => ("env-file", V),
        "label" => ("label", V),
        "annotation" => ("annotation", V),
        "name" => ("name", V),
        "network" | "net" => ("network", V),
        "network-alias" | "net-alias" => ("network-alias", V),
        "ip" => ("ip", V),
        "ip6" => ("ip6", V),
        "hostname" => ("hostname", V),
        "user" => ("user", V),
        "workdir" => ("workdir", V),
        "entrypoint" => ("entrypoint", V),
        "restart" => ("restart", V),
        "security-opt" => ("security-opt", V),
        "cap-add" => ("cap-add", V),
        "cap-drop" => ("cap-drop", V),
        "device" => ("device", V),
        "dns" => ("dns", V),
        "dns-search" => ("dns-search", V),
        "dns-option" | "dns-opt" => ("dns-option", V),
        "add-host" => ("add-host", V),
        "memory" => ("memory", V),
        "cpus" => ("cpus", V),
        "health-cmd" => ("health-cmd", V),
        "health-interval" => ("health-interval", V),
        "health-timeout" => ("health-timeout", V),
        "health-retries" => ("health-retries", V),
        "health-start-period" => ("health-start-period", V),
        "sysctl" => ("sysctl", V),
        "ulimit" => ("ulimit", V),
        "pids-limit" => ("pids-limit", V),
        "log-driver" => ("log-driver", V),
        "log-opt" => ("log-opt", V),
        "shm-size" => ("shm-size", V),
        "stop-signal" => ("stop-signal", V),
        "group-add" => ("group-add", V),
        "pull" => ("pull", V),
        "read-only" => ("read-only", F),
        "init" => ("init", F),
        "privileged" => ("privileged", F),
        "tty" => ("tty", F),
        "interactive" => ("interactive", F),
        "no-healthcheck" => ("no-healthcheck", F),
        "detach" => ("detach", F),
        "rm" => ("rm", F),
        _ => return None,
    };
    Some(spec)
}

fn short_option(flag: char) -> Option<(&'static str, Arity)> {
    let long = match flag {
        'p' => "publish",
        'v' => "volume",
        'e' => "env",
        'l' => "label",
        'h' => "hostname",
        'u' => "user",
        'w' => "workdir",
        'm' => "memory",
        't' => "tty",
        'i' => "interactive",
        'd' => "detach",
        _ => return None,
    };
    long_option(long)
}

/// Converts `docker run` (or `podman run`) arguments into a Compose document.
#[derive(Debug, Clone, Default)]
pub struct DockerRunConverter;

impl DockerRunConverter {
    pub fn new() -> Self {
        Self
    }
}

impl RunConverter for DockerRunConverter {
    fn convert(&self, args: &[String]) -> Result<Value> {
        let args = strip_invocation(args)?;
        let mut builder = ServiceBuilder::default();
        let mut index = 0;

        while index < args.len() {
            let arg = &args[index];
            index += 1;

            if arg == "--" {
                break;
            }
            if let Some(long) = arg.strip_prefix("--") {
                let (name, inline) = match long.split_once('=') {
                    Some((name, value)) => (name, Some(value.to_string())),
                    None => (long, None),
                };
                match long_option(name) {
                    Some((canonical, Arity::TakesValue)) => {
                        let value = match inline {
                            Some(value) => value,
                            None => take_value(args, &mut index, arg)?,
                        };
                        builder.apply(canonical, &value)?;
                    }
                    Some((canonical, Arity::Switch)) => {
                        if inline.as_deref() != Some("false") {
                            builder.apply(canonical, "true")?;
                        }
                    }
                    None => warn!("Ignoring unsupported run option '{}'", arg),
                }
                continue;
            }
            if let Some(short) = arg.strip_prefix('-').filter(|s| !s.is_empty()) {
                for (offset, flag) in short.char_indices() {
                    match short_option(flag) {
                        Some((canonical, Arity::Switch)) => builder.apply(canonical, "true")?,
                        Some((canonical, Arity::TakesValue)) => {
                            let rest = &short[offset + flag.len_utf8()..];
                            let value = if rest.is_empty() {
                                take_value(args, &mut index, arg)?
                            } else {
                                rest.to_string()
                            };
                            builder.apply(canonical, &value)?;
                            break;
                        }
                        None => {
                            warn!("Ignoring unsupported run option '-{}'", flag);
                        }
                    }
                }
                continue;
            }

            index -= 1;
            break;
        }

        let image = args.get(index).ok_or(RunError::MissingImage)?;
        let command = &args[index + 1..];
        builder.finish(image, command)
    }
}

/// Drop `sudo`, the program name and the `run` subcommand.
fn strip_invocation(args: &[String]) -> Result<&[String]> {
    let mut rest = args;
    if rest.first().map(String::as_str) == Some("sudo") {
        rest = &rest[1..];
    }
    match rest.first().map(String::as_str) {
        Some("docker") | Some("podman") => {
            rest = &rest[1..];
            if rest.first().map(String::as_str) == Some("container") {
                rest = &rest[1..];
            }
            match rest.first().map(String::as_str) {
                Some("run") => Ok(&rest[1..]),
                _ => Err(RunError::NotARunCommand(args.join(" "))),
            }
        }
        Some("run") => Ok(&rest[1..]),
        None => Err(RunError::MissingImage),
        _ => Ok(rest),
    }
}

fn take_value(args: &[String], index: &mut usize, flag: &str) -> Result<String> {
    let value = args.get(*index).ok_or_else(|| RunError::MissingValue {
        flag: flag.to_string(),
    })?;
    *index += 1;
    Ok(value.clone())
}

fn text(value: &str) -> Value {
    Value::String(value.to_string())
}

/// Accumulates one Compose service definition.
#[derive(Debug, Default)]
struct ServiceBuilder {
    service: Mapping,
    healthcheck: Mapping,
    logging_options: Mapping,
    log_driver: Option<String>,
    ulimits: Mapping,
    name: Option<String>,
    networks: Vec<String>,
    aliases: Vec<String>,
    ipv4: Option<String>,
    ipv6: Option<String>,
}

impl ServiceBuilder {
    fn set(&mut self, key: &str, value: Value) {
        self.service.insert(text(key), value);
    }

    fn append(&mut self, key: &str, value: Value) {
        let entry = self
            .service
            .entry(text(key))
            .or_insert_with(|| Value::Sequence(Vec::new()));
        if let Value::Sequence(items) = entry {
            items.push(value);
        }
    }

    fn apply(&mut self, option: &str, value: &str) -> Result<()> {
        debug!("Run option --{} {}", option, value);
        match option {
            "publish" => self.append("ports", text(value)),
            "expose" => self.append("expose", text(value)),
            "volume" => self.append("volumes", text(value)),
            "mount" => self.append("volumes", parse_mount(value)?),
            "tmpfs" => self.append("tmpfs", text(value)),
            "env" => self.append("environment", text(value)),
            "env-file" => self.append("env_file", text(value)),
            "label" => self.append("labels", text(value)),
            "annotation" => self.append("annotations", text(value)),
            "name" => self.name = Some(value.to_string()),
            "network" => match value {
                "host" | "none" | "bridge" | "private" => self.set("network_mode", text(value)),
                v if v.starts_with("container:") || v.starts_with("ns:") => {
                    self.set("network_mode", text(value))
                }
                _ => self.networks.push(value.to_string()),
            },
            "network-alias" => self.aliases.push(value.to_string()),
            "ip" => self.ipv4 = Some(value.to_string()),
            "ip6" => self.ipv6 = Some(value.to_string()),
            "hostname" => self.set("hostname", text(value)),
            "user" => self.set("user", text(value)),
            "workdir" => self.set("working_dir", text(value)),
            "entrypoint" => self.set("entrypoint", text(value)),
            "restart" => self.set("restart", text(value)),
            "security-opt" => self.append("security_opt", text(value)),
            "cap-add" => self.append("cap_add", text(value)),
            "cap-drop" => self.append("cap_drop", text(value)),
            "device" => self.append("devices", text(value)),
            "dns" => self.append("dns", text(value)),
            "dns-search" => self.append("dns_search", text(value)),
            "dns-option" => self.append("dns_opt", text(value)),
            "add-host" => self.append("extra_hosts", text(value)),
            "memory" => self.set("mem_limit", text(value)),
            "cpus" => self.set("cpus", text(value)),
            "health-cmd" => {
                self.healthcheck.insert(text("test"), text(value));
            }
            "health-interval" => {
                self.healthcheck.insert(text("interval"), text(value));
            }
            "health-timeout" => {
                self.healthcheck.insert(text("timeout"), text(value));
            }
            "health-retries" => {
                self.healthcheck.insert(text("retries"), text(value));
            }
            "health-start-period" => {
                self.healthcheck.insert(text("start_period"), text(value));
            }
            "no-healthcheck" => {
                self.healthcheck.insert(text("disable"), Value::Bool(true));
            }
            "sysctl" => self.append("sysctls", text(value)),
            "ulimit" => {
                let (name, limit) = value.split_once('=').ok_or_else(|| RunError::InvalidValue {
                    flag: "--ulimit".to_string(),
                    value: value.to_string(),
                    reason: "expected name=soft[:hard]".to_string(),
                })?;
                let limit = match limit.split_once(':') {
                    Some((soft, hard)) => {
                        let mut pair = Mapping::new();
                        pair.insert(text("soft"), text(soft));
                        pair.insert(text("hard"), text(hard));
                        Value::Mapping(pair)
                    }
                    None => text(limit),
                };
                self.ulimits.insert(text(name), limit);
            }
            "pids-limit" => self.set("pids_limit", text(value)),
            "log-driver" => self.log_driver = Some(value.to_string()),
            "log-opt" => {
                let (key, val) = value.split_once('=').unwrap_or((value, ""));
                self.logging_options.insert(text(key), text(val));
            }
            "shm-size" => self.set("shm_size", text(value)),
            "stop-signal" => self.set("stop_signal", text(value)),
            "group-add" => self.append("group_add", text(value)),
            "pull" => self.set("pull_policy", text(value)),
            "read-only" => self.set("read_only", Value::Bool(true)),
            "init" => self.set("init", Value::Bool(true)),
            "privileged" => self.set("privileged", Value::Bool(true)),
            "tty" => self.set("tty", Value::Bool(true)),
            "interactive" => self.set("stdin_open", Value::Bool(true)),
            "detach" | "rm" => {}
            other => warn!("Ignoring unsupported run option '--{}'", other),
        }
        Ok(())
    }

    fn finish(mut self, image: &str, command: &[String]) -> Result<Value> {
        let service_name = self
            .name
            .clone()
            .unwrap_or_else(|| default_name_for_image(image));

        self.set("image", text(image));
        if let Some(name) = self.name.take() {
            self.set("container_name", text(&name));
        }
        if !command.is_empty() {
            let quoted: Vec<String> = command
                .iter()
                .map(|arg| shell_escape::escape(arg.as_str().into()).into_owned())
                .collect();
            self.set("command", text(&quoted.join(" ")));
        }

        self.finish_networks();

        if !self.healthcheck.is_empty() {
            let healthcheck = std::mem::take(&mut self.healthcheck);
            self.set("healthcheck", Value::Mapping(healthcheck));
        }
        if !self.ulimits.is_empty() {
            let ulimits = std::mem::take(&mut self.ulimits);
            self.set("ulimits", Value::Mapping(ulimits));
        }
        if self.log_driver.is_some() || !self.logging_options.is_empty() {
            let mut logging = Mapping::new();
            if let Some(driver) = self.log_driver.take() {
                logging.insert(text("driver"), text(&driver));
            }
            if !self.logging_options.is_empty() {
                let options = std::mem::take(&mut self.logging_options);
                logging.insert(text("options"), Value::Mapping(options));
            }
            self.set("logging", Value::Mapping(logging));
        }

        let mut services = Mapping::new();
        services.insert(text(&service_name), Value::Mapping(self.service));
        let mut document = Mapping::new();
        document.insert(text("services"), Value::Mapping(services));
        Ok(Value::Mapping(document))
    }

    /// Aliases and static addresses attach to the first named network.
    fn finish_networks(&mut self) {
        let has_options = !self.aliases.is_empty() || self.ipv4.is_some() || self.ipv6.is_some();
        if self.networks.is_empty() {
            if has_options {
                warn!("--ip/--network-alias without a named --network were ignored");
            }
            return;
        }
        if !has_options {
            let networks = self.networks.iter().map(|n| text(n)).collect();
            self.set("networks", Value::Sequence(networks));
            return;
        }

        let mut networks = Mapping::new();
        for (i, network) in self.networks.iter().enumerate() {
            if i > 0 {
                networks.insert(text(network), Value::Null);
                continue;
            }
            let mut config = Mapping::new();
            if let Some(ip) = &self.ipv4 {
                config.insert(text("ipv4_address"), text(ip));
            }
            if let Some(ip6) = &self.ipv6 {
                config.insert(text("ipv6_address"), text(ip6));
            }
            if !self.aliases.is_empty() {
                let aliases = self.aliases.iter().map(|a| text(a)).collect();
                config.insert(text("aliases"), Value::Sequence(aliases));
            }
            networks.insert(text(network), Value::Mapping(config));
        }
        self.set("networks", Value::Mapping(networks));
    }
}

/// `--mount type=bind,source=/a,target=/b,readonly` to a long-syntax volume.
fn parse_mount(spec: &str) -> Result<Value> {
    let mut mount = Mapping::new();
    for part in spec.split(',') {
        let (key, value) = match part.split_once('=') {
            Some((key, value)) => (key, Some(value)),
            None => (part, None),
        };
        match key {
            "type" => {
                mount.insert(text("type"), text(value.unwrap_or("volume")));
            }
            "source" | "src" => {
                mount.insert(text("source"), text(value.unwrap_or_default()));
            }
            "target" | "destination" | "dst" | "dest" => {
                mount.insert(text("target"), text(value.unwrap_or_default()));
            }
            "readonly" | "ro" => {
                let read_only = !matches!(value, Some("false") | Some("0"));
                mount.insert(text("read_only"), Value::Bool(read_only));
            }
            "tmpfs-size" => {
                let mut tmpfs = Mapping::new();
                tmpfs.insert(text("size"), text(value.unwrap_or_default()));
                mount.insert(text("tmpfs"), Value::Mapping(tmpfs));
            }
            other => debug!("Ignoring mount option '{}'", other),
        }
    }
    if !mount.contains_key("target") {
        return Err(RunError::InvalidValue {
            flag: "--mount".to_string(),
            value: spec.to_string(),
            reason: "missing target".to_string(),
        });
    }
    Ok(Value::Mapping(mount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run::tokenize;

    fn convert(command: &str) -> Result<Value> {
        DockerRunConverter::new().convert(&tokenize(command).unwrap())
    }

    fn service<'a>(document: &'a Value, name: &str) -> &'a Value {
        &document["services"][name]
    }

    #[test]
    fn test_basic_run_command() {
        let doc = convert("docker run -d --name web -p 8080:80 -e A=1 nginx:1.25").unwrap();
        let web = service(&doc, "web");
        assert_eq!(web["image"], text("nginx:1.25"));
        assert_eq!(web["container_name"], text("web"));
        assert_eq!(web["ports"][0], text("8080:80"));
        assert_eq!(web["environment"][0], text("A=1"));
    }

    #[test]
    fn test_service_name_defaults_to_image() {
        let doc = convert("podman run docker.io/library/redis:7").unwrap();
        assert!(service(&doc, "redis").is_mapping());
        assert!(service(&doc, "redis").get("container_name").is_none());
    }

    #[test]
    fn test_inline_and_bundled_options() {
        let doc = convert("docker run -it -p80:80 --env=B=2 --read-only=false alpine sh").unwrap();
        let svc = service(&doc, "alpine");
        assert_eq!(svc["tty"], Value::Bool(true));
        assert_eq!(svc["stdin_open"], Value::Bool(true));
        assert_eq!(svc["ports"][0], text("80:80"));
        assert_eq!(svc["environment"][0], text("B=2"));
        assert!(svc.get("read_only").is_none());
        assert_eq!(svc["command"], text("sh"));
    }

    #[test]
    fn test_command_is_requoted() {
        let doc = convert(r#"docker run alpine sh -c "echo hello world""#).unwrap();
        assert_eq!(
            service(&doc, "alpine")["command"],
            text("sh -c 'echo hello world'")
        );
    }

    #[test]
    fn test_mount_and_healthcheck() {
        let doc = convert(
            "docker run --mount type=tmpfs,target=/cache,tmpfs-size=64m --health-cmd 'curl -f localhost' --health-retries 3 nginx",
        )
        .unwrap();
        let svc = service(&doc, "nginx");
        assert_eq!(svc["volumes"][0]["type"], text("tmpfs"));
        assert_eq!(svc["volumes"][0]["tmpfs"]["size"], text("64m"));
        assert_eq!(svc["healthcheck"]["test"], text("curl -f localhost"));
        assert_eq!(svc["healthcheck"]["retries"], text("3"));
    }

    #[test]
    fn test_network_with_alias_and_ip() {
        let doc = convert("docker run --network app --network-alias api --ip 10.1.0.9 nginx").unwrap();
        let net = &service(&doc, "nginx")["networks"]["app"];
        assert_eq!(net["ipv4_address"], text("10.1.0.9"));
        assert_eq!(net["aliases"][0], text("api"));
    }

    #[test]
    fn test_errors() {
        assert_eq!(convert("docker run -d"), Err(RunError::MissingImage));
        assert!(convert("docker run nginx --name").is_ok());
        assert!(matches!(
            convert("docker run -p"),
            Err(RunError::MissingValue { .. })
        ));
        assert!(matches!(
            convert("docker ps"),
            Err(RunError::NotARunCommand(_))
        ));
        assert!(matches!(
            convert("docker run --ulimit nofile nginx"),
            Err(RunError::InvalidValue { .. })
        ));
    }
}
