//! Shape normalization for polymorphic Compose fields.
//!
//! Compose accepts many spellings for the same setting (scalar or sequence,
//! sequence or mapping, short string or long object). Each function here
//! collapses one family of shapes into the canonical string form the
//! container model expects. Errors report the field and the expected shape;
//! the mapper attaches the service name.

use serde_yaml::{Mapping, Value};

/// A value had a shape the field does not accept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeError {
    pub field: String,
    pub reason: String,
}

impl ShapeError {
    pub fn new(field: &str, reason: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

pub type ShapeResult<T> = std::result::Result<T, ShapeError>;

/// Canonical destination of one Compose volume entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VolumeEntry {
    /// `source:target[:options]` or an anonymous container path
    Volume(String),
    /// `target[:size=<size>]`
    Tmpfs(String),
}

/// Render a YAML scalar as text. Non-scalars and null give `None`.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        _ => None,
    }
}

/// A required scalar value.
pub fn scalar(value: &Value, field: &str) -> ShapeResult<String> {
    scalar_to_string(value).ok_or_else(|| ShapeError::new(field, "must be a scalar value"))
}

/// Accept a bool or the strings `true`/`false`.
pub fn boolean(value: &Value, field: &str) -> ShapeResult<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) if s == "true" => Ok(true),
        Value::String(s) if s == "false" => Ok(false),
        _ => Err(ShapeError::new(field, "must be a boolean")),
    }
}

/// Accept a non-negative integer written as a number or a numeric string.
pub fn unsigned(value: &Value, field: &str) -> ShapeResult<u32> {
    let err = || ShapeError::new(field, "must be a non-negative integer");
    match value {
        Value::Number(n) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(err),
        Value::String(s) => s.trim().parse().map_err(|_| err()),
        _ => Err(err()),
    }
}

/// Scalar-or-sequence to a sequence of strings. Null yields an empty list.
///
/// Order and duplicates are preserved.
pub fn string_or_list(value: &Value, field: &str) -> ShapeResult<Vec<String>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Sequence(items) => items
            .iter()
            .map(|item| {
                scalar_to_string(item)
                    .ok_or_else(|| ShapeError::new(field, "sequence entries must be scalars"))
            })
            .collect(),
        other => scalar_to_string(other)
            .map(|s| vec![s])
            .ok_or_else(|| ShapeError::new(field, "must be a string or a sequence of strings")),
    }
}

/// Command-like field: a string, or a token sequence joined with single spaces.
///
/// An empty sequence or a blank string yields `None`.
pub fn command(value: &Value, field: &str) -> ShapeResult<Option<String>> {
    let joined = match value {
        Value::Null => return Ok(None),
        Value::Sequence(_) => string_or_list(value, field)?.join(" "),
        other => scalar(other, field)?,
    };
    Ok(non_blank(joined))
}

/// `None` for an empty or whitespace-only string.
pub fn non_blank(text: String) -> Option<String> {
    (!text.trim().is_empty()).then_some(text)
}

/// Sequence of `KEY<sep>VALUE` strings or a `key: value` mapping.
///
/// Mapping entries are flattened in iteration order; a null value renders
/// as an empty value (`KEY=`).
pub fn key_value_list(value: &Value, separator: char, field: &str) -> ShapeResult<Vec<String>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Sequence(_) => string_or_list(value, field),
        Value::Mapping(map) => map
            .iter()
            .map(|(k, v)| {
                let key = scalar(k, field)?;
                let value = match v {
                    Value::Null => String::new(),
                    other => scalar(other, field)?,
                };
                Ok(format!("{}{}{}", key, separator, value))
            })
            .collect(),
        _ => Err(ShapeError::new(field, "must be a sequence or a mapping")),
    }
}

/// Mapping keys, or the entries of a sequence (`depends_on` style).
pub fn names(value: &Value, field: &str) -> ShapeResult<Vec<String>> {
    match value {
        Value::Mapping(map) => map.keys().map(|k| scalar(k, field)).collect(),
        other => string_or_list(other, field),
    }
}

/// One `ports` entry, short or long syntax.
///
/// Long syntax becomes `[host_ip:[published]:|published:]target[/protocol]`, with the
/// protocol elided when it is `tcp`.
pub fn port(value: &Value) -> ShapeResult<String> {
    const FIELD: &str = "ports";
    let Value::Mapping(map) = value else {
        return scalar(value, FIELD);
    };

    let target = get(map, "target")
        .map(|t| scalar(t, FIELD))
        .transpose()?
        .ok_or_else(|| ShapeError::new(FIELD, "long syntax requires 'target'"))?;

    let host_ip = get_scalar(map, "host_ip", FIELD)?;
    let published = get_scalar(map, "published", FIELD)?;

    // With a host IP the host-port segment must be present, even if empty
    let mut spec = String::new();
    if let Some(ip) = &host_ip {
        spec.push_str(ip);
        spec.push(':');
    }
    if let Some(published) = &published {
        spec.push_str(published);
        spec.push(':');
    } else if host_ip.is_some() {
        spec.push(':');
    }
    spec.push_str(&target);
    if let Some(protocol) = get_scalar(map, "protocol", FIELD)? {
        if protocol != "tcp" {
            spec.push('/');
            spec.push_str(&protocol);
        }
    }
    Ok(spec)
}

/// One `volumes` entry, short or long syntax.
///
/// `resolve` maps a named volume to its declared name.
pub fn volume(value: &Value, resolve: impl Fn(&str) -> String) -> ShapeResult<VolumeEntry> {
    const FIELD: &str = "volumes";
    let map = match value {
        Value::Mapping(map) => map,
        other => {
            let short = scalar(other, FIELD)?;
            return Ok(VolumeEntry::Volume(resolve_short_volume(&short, resolve)));
        }
    };

    let kind = get_scalar(map, "type", FIELD)?.unwrap_or_else(|| "volume".to_string());
    let target = get_scalar(map, "target", FIELD)?
        .ok_or_else(|| ShapeError::new(FIELD, "long syntax requires 'target'"))?;

    if kind == "tmpfs" {
        let size = match get(map, "tmpfs") {
            Some(Value::Mapping(opts)) => get_scalar(opts, "size", FIELD)?,
            Some(Value::Null) | None => None,
            Some(_) => return Err(ShapeError::new(FIELD, "'tmpfs' options must be a mapping")),
        };
        return Ok(VolumeEntry::Tmpfs(match size {
            Some(size) => format!("{}:size={}", target, size),
            None => target,
        }));
    }

    let Some(source) = get_scalar(map, "source", FIELD)? else {
        return Ok(VolumeEntry::Volume(target));
    };
    let source = if kind == "volume" { resolve(&source) } else { source };

    let mut options = Vec::new();
    if let Some(read_only) = get(map, "read_only") {
        if boolean(read_only, FIELD)? {
            options.push("ro".to_string());
        }
    }
    if let Some(Value::Mapping(bind)) = get(map, "bind") {
        if let Some(selinux) = get_scalar(bind, "selinux", FIELD)? {
            options.push(selinux);
        }
    }

    let mut spec = format!("{}:{}", source, target);
    if !options.is_empty() {
        spec.push(':');
        spec.push_str(&options.join(","));
    }
    Ok(VolumeEntry::Volume(spec))
}

/// `env_file`: a path, a sequence of paths, or a sequence of `{path}` objects.
pub fn env_files(value: &Value) -> ShapeResult<Vec<String>> {
    const FIELD: &str = "env_file";
    match value {
        Value::Sequence(items) => items
            .iter()
            .map(|item| match item {
                Value::Mapping(map) => get_scalar(map, "path", FIELD)?
                    .ok_or_else(|| ShapeError::new(FIELD, "long syntax requires 'path'")),
                other => scalar(other, FIELD),
            })
            .collect(),
        other => string_or_list(other, FIELD),
    }
}

/// `ulimits`: `name: n` or `name: {soft, hard}` to `name=soft:hard`.
pub fn ulimits(value: &Value) -> ShapeResult<Vec<String>> {
    const FIELD: &str = "ulimits";
    let Value::Mapping(map) = value else {
        return Err(ShapeError::new(FIELD, "must be a mapping"));
    };
    map.iter()
        .map(|(name, limit)| {
            let name = scalar(name, FIELD)?;
            match limit {
                Value::Mapping(pair) => {
                    let soft = get_scalar(pair, "soft", FIELD)?;
                    let hard = get_scalar(pair, "hard", FIELD)?;
                    match (soft, hard) {
                        (Some(soft), Some(hard)) => Ok(format!("{}={}:{}", name, soft, hard)),
                        (Some(only), None) | (None, Some(only)) => Ok(format!("{}={}", name, only)),
                        (None, None) => Err(ShapeError::new(FIELD, "expected 'soft' and 'hard'")),
                    }
                }
                other => Ok(format!("{}={}", name, scalar(other, FIELD)?)),
            }
        })
        .collect()
}

/// Look up a string key in a mapping.
pub fn get<'a>(map: &'a Mapping, key: &str) -> Option<&'a Value> {
    map.get(key)
}

/// Look up an optional scalar; null counts as absent.
pub fn get_scalar(map: &Mapping, key: &str, field: &str) -> ShapeResult<Option<String>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => scalar(value, field).map(Some),
    }
}

fn resolve_short_volume(spec: &str, resolve: impl Fn(&str) -> String) -> String {
    match spec.split_once(':') {
        Some((source, rest)) if is_named_volume(source) => format!("{}:{}", resolve(source), rest),
        _ => spec.to_string(),
    }
}

fn is_named_volume(source: &str) -> bool {
    !source.is_empty() && !source.starts_with(['/', '.', '~', '$'])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    fn identity(name: &str) -> String {
        name.to_string()
    }

    #[test]
    fn test_string_or_list() {
        assert_eq!(string_or_list(&yaml("NET_ADMIN"), "cap_add").unwrap(), vec!["NET_ADMIN"]);
        assert_eq!(
            string_or_list(&yaml("[a, b, a]"), "dns").unwrap(),
            vec!["a", "b", "a"]
        );
        assert!(string_or_list(&yaml("{a: 1}"), "dns").is_err());
        assert!(string_or_list(&Value::Null, "dns").unwrap().is_empty());
    }

    #[test]
    fn test_command_joins_tokens() {
        assert_eq!(
            command(&yaml(r#"["npm", "run", "start"]"#), "command").unwrap(),
            Some("npm run start".to_string())
        );
        assert_eq!(
            command(&yaml("sleep 10"), "command").unwrap().as_deref(),
            Some("sleep 10")
        );
        assert_eq!(command(&yaml("[]"), "command").unwrap(), None);
        assert_eq!(command(&yaml("''"), "command").unwrap(), None);
    }

    #[test]
    fn test_key_value_list_shapes() {
        assert_eq!(
            key_value_list(&yaml("{B: 2, A: one, EMPTY: null, FLAG: true}"), '=', "environment")
                .unwrap(),
            vec!["B=2", "A=one", "EMPTY=", "FLAG=true"]
        );
        assert_eq!(
            key_value_list(&yaml(r#"["A=1", "B=2"]"#), '=', "environment").unwrap(),
            vec!["A=1", "B=2"]
        );
        assert_eq!(
            key_value_list(&yaml("{db.local: 10.0.0.5}"), ':', "extra_hosts").unwrap(),
            vec!["db.local:10.0.0.5"]
        );
        assert!(key_value_list(&yaml("oops"), '=', "environment").is_err());
    }

    #[test]
    fn test_port_long_form() {
        assert_eq!(
            port(&yaml("{target: 80, published: 8080, protocol: udp}")).unwrap(),
            "8080:80/udp"
        );
        assert_eq!(
            port(&yaml("{target: 80, published: 8080, protocol: tcp}")).unwrap(),
            "8080:80"
        );
        assert_eq!(
            port(&yaml(r#"{target: 443, published: "8443", host_ip: 127.0.0.1}"#)).unwrap(),
            "127.0.0.1:8443:443"
        );
        assert_eq!(
            port(&yaml("{target: 80, host_ip: 127.0.0.1}")).unwrap(),
            "127.0.0.1::80"
        );
        assert_eq!(port(&yaml("{target: 9000}")).unwrap(), "9000");
        assert_eq!(port(&yaml("8080")).unwrap(), "8080");
        assert!(port(&yaml("{published: 80}")).is_err());
    }

    #[test]
    fn test_volume_long_form() {
        assert_eq!(
            volume(&yaml("{type: tmpfs, target: /tmp, tmpfs: {size: 100m}}"), identity).unwrap(),
            VolumeEntry::Tmpfs("/tmp:size=100m".to_string())
        );
        assert_eq!(
            volume(&yaml("{type: tmpfs, target: /run}"), identity).unwrap(),
            VolumeEntry::Tmpfs("/run".to_string())
        );
        assert_eq!(
            volume(
                &yaml("{type: bind, source: ./conf, target: /etc/app, read_only: true}"),
                identity
            )
            .unwrap(),
            VolumeEntry::Volume("./conf:/etc/app:ro".to_string())
        );
        assert_eq!(
            volume(&yaml("{type: volume, target: /cache}"), identity).unwrap(),
            VolumeEntry::Volume("/cache".to_string())
        );
        assert_eq!(
            volume(
                &yaml("{type: bind, source: /srv, target: /srv, bind: {selinux: Z}}"),
                identity
            )
            .unwrap(),
            VolumeEntry::Volume("/srv:/srv:Z".to_string())
        );
    }

    #[test]
    fn test_named_volume_resolution() {
        let resolve = |name: &str| {
            if name == "data" {
                "app_data".to_string()
            } else {
                name.to_string()
            }
        };
        assert_eq!(
            volume(&yaml("data:/var/lib/data"), resolve).unwrap(),
            VolumeEntry::Volume("app_data:/var/lib/data".to_string())
        );
        assert_eq!(
            volume(&yaml("./data:/var/lib/data"), resolve).unwrap(),
            VolumeEntry::Volume("./data:/var/lib/data".to_string())
        );
        assert_eq!(
            volume(&yaml("{type: volume, source: data, target: /d}"), resolve).unwrap(),
            VolumeEntry::Volume("app_data:/d".to_string())
        );
    }

    #[test]
    fn test_env_files_and_ulimits() {
        assert_eq!(
            env_files(&yaml("[.env, {path: ./prod.env, required: false}]")).unwrap(),
            vec![".env", "./prod.env"]
        );
        assert_eq!(env_files(&yaml(".env")).unwrap(), vec![".env"]);
        assert_eq!(
            ulimits(&yaml("{nproc: 65535, nofile: {soft: 20000, hard: 40000}}")).unwrap(),
            vec!["nproc=65535", "nofile=20000:40000"]
        );
    }

    #[test]
    fn test_names_from_mapping_or_sequence() {
        assert_eq!(names(&yaml("[db, cache]"), "depends_on").unwrap(), vec!["db", "cache"]);
        assert_eq!(
            names(&yaml("{db: {condition: service_healthy}}"), "depends_on").unwrap(),
            vec!["db"]
        );
    }
}
