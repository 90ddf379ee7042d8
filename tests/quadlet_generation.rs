//! End-to-end generation tests
//!
//! These tests drive the public API from Compose text to unit text and check
//! the exact rendered output.

use quadlet_gen::container::Container;
use quadlet_gen::quadlet::{Sections, generate};
use quadlet_gen::{ConvertError, GenerateOptions, QuadletGenerator};

fn convert(yaml: &str) -> Vec<(String, String)> {
    QuadletGenerator::new()
        .from_compose_str(yaml, &GenerateOptions::default())
        .expect("compose conversion should succeed")
        .units
        .into_iter()
        .map(|unit| (unit.filename, unit.content))
        .collect()
}

/// Values of every `key=` line in the text.
fn values<'a>(text: &'a str, key: &str) -> Vec<&'a str> {
    let prefix = format!("{}=", key);
    text.lines()
        .filter_map(|line| line.strip_prefix(prefix.as_str()))
        .collect()
}

#[test]
fn test_single_service_end_to_end() {
    let units = convert(
        "services:\n  web:\n    image: nginx\n    ports: [\"80:80\"]\n    environment:\n      NODE_ENV: production\n",
    );

    assert_eq!(units.len(), 1);
    let (filename, content) = &units[0];
    assert_eq!(filename, "web.container");
    assert_eq!(
        content,
        "[Container]\nImage=nginx\nContainerName=web\nPublishPort=80:80\nEnvironment=NODE_ENV=production\n"
    );
}

#[test]
fn test_dependency_translation() {
    let units = convert(
        "services:\n  web:\n    image: nginx\n    depends_on: [db]\n  db:\n    image: postgres:16\n",
    );

    let web = &units[0].1;
    assert!(web.starts_with("[Unit]\n"));
    assert_eq!(values(web, "After"), vec!["db.service"]);
    assert_eq!(values(web, "Wants"), vec!["db.service"]);

    let db = &units[1].1;
    assert!(db.starts_with("[Container]\nImage=postgres:16\n"));
}

#[test]
fn test_label_escaping() {
    let units = convert(
        "services:\n  web:\n    image: nginx\n    labels:\n      note: hello world\n      quote: 'say \"hi\" now'\n      plain: value\n",
    );
    let content = &units[0].1;
    assert_eq!(
        values(content, "Label"),
        vec![
            "\"note=hello world\"",
            "\"quote=say \\\"hi\\\" now\"",
            "plain=value"
        ]
    );
}

#[test]
fn test_full_section_layout() {
    let options = GenerateOptions::from_toml_str(
        r#"
[unit]
description = "Web frontend"

[service]
restart_sec = "10"
timeout_start_sec = "900"

[install]
wanted_by = ["multi-user.target", "default.target"]

[globals]
podman_args = "--log-level=warn"
"#,
    )
    .unwrap();

    let generation = QuadletGenerator::new()
        .from_compose_str(
            "services:\n  web:\n    image: nginx\n    restart: always\n",
            &options,
        )
        .unwrap();

    assert_eq!(
        generation.units[0].content,
        "[Unit]\n\
         Description=Web frontend\n\
         \n\
         [Container]\n\
         Image=nginx\n\
         ContainerName=web\n\
         \n\
         [GlobalArgs]\n\
         PodmanArgs=--log-level=warn\n\
         \n\
         [Service]\n\
         Restart=always\n\
         RestartSec=10\n\
         TimeoutStartSec=900\n\
         \n\
         [Install]\n\
         WantedBy=multi-user.target\n\
         WantedBy=default.target\n"
    );
}

#[test]
fn test_rendered_lines_parse_back_to_model_values() {
    let mut container = Container::new("ghcr.io/acme/api:2").unwrap();
    container.add_publish_port("127.0.0.1:8080:80").unwrap();
    container.add_publish_port("53:53/udp").unwrap();
    container.add_environment("RUST_LOG=info").unwrap();
    container.add_environment("GREETING=hello there").unwrap();
    container.add_volume("data:/var/lib/api:Z").unwrap();
    container.add_volume("/scratch").unwrap();

    let text = generate(&container, &Sections::default());

    assert_eq!(values(&text, "PublishPort"), container.publish_ports());
    assert_eq!(values(&text, "Volume"), container.volumes());

    let environment: Vec<String> = values(&text, "Environment")
        .into_iter()
        .map(|v| {
            v.strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(v)
                .to_string()
        })
        .collect();
    assert_eq!(environment, container.environment());
}

#[test]
fn test_clone_serializes_identically_and_is_independent() {
    let mut original = Container::new("nginx").unwrap();
    original.set_container_name("web").unwrap();
    original.add_label("tier=frontend").unwrap();
    original.dns.push("1.1.1.1".to_string());

    let mut copy = original.clone();
    assert_eq!(
        generate(&copy, &Sections::default()),
        generate(&original, &Sections::default())
    );

    copy.add_label("extra=1").unwrap();
    copy.dns.push("8.8.8.8".to_string());
    let text = generate(&original, &Sections::default());
    assert!(!text.contains("extra=1"));
    assert_eq!(values(&text, "DNS"), vec!["1.1.1.1"]);
}

#[test]
fn test_tmpfs_long_form_goes_to_tmpfs_only() {
    let units = convert(
        "services:\n  app:\n    image: alpine\n    volumes:\n      - type: tmpfs\n        target: /tmp\n        tmpfs:\n          size: 100m\n      - ./data:/data\n",
    );
    let content = &units[0].1;
    assert_eq!(values(content, "Tmpfs"), vec!["/tmp:size=100m"]);
    assert_eq!(values(content, "Volume"), vec!["./data:/data"]);
}

#[test]
fn test_rich_service() {
    let units = convert(
        r#"
services:
  api:
    build: ./api
    container_name: acme-api
    command: ["serve", "--port", "8000"]
    user: "1000:1000"
    working_dir: /app
    hostname: api.internal
    cap_add: [NET_BIND_SERVICE]
    cap_drop: [ALL]
    security_opt: ["no-new-privileges:true"]
    read_only: true
    init: true
    healthcheck:
      test: curl -f http://localhost:8000/health
      interval: 15s
      retries: 5
    mem_limit: 256m
"#,
    );
    let (filename, content) = &units[0];
    assert_eq!(filename, "api.container");
    assert_eq!(
        content,
        "[Container]\n\
         Image=api.build\n\
         ContainerName=acme-api\n\
         Exec=serve --port 8000\n\
         WorkingDir=/app\n\
         HostName=api.internal\n\
         User=1000\n\
         Group=1000\n\
         AddCapability=NET_BIND_SERVICE\n\
         DropCapability=ALL\n\
         NoNewPrivileges=true\n\
         HealthCmd=curl -f http://localhost:8000/health\n\
         HealthInterval=15s\n\
         HealthRetries=5\n\
         ReadOnly=true\n\
         RunInit=true\n\
         PodmanArgs=--memory 256m\n"
    );
}

#[test]
fn test_empty_command_and_health_test_are_not_rendered() {
    let units = convert(
        "services:\n  web:\n    image: nginx\n    command: []\n    healthcheck:\n      test: [\"CMD-SHELL\"]\n      interval: 30s\n",
    );
    let content = &units[0].1;
    assert!(values(content, "Exec").is_empty());
    assert!(values(content, "HealthCmd").is_empty());
    assert_eq!(values(content, "HealthInterval"), vec!["30s"]);
}

#[test]
fn test_line_breaks_cannot_add_unit_lines() {
    let generator = QuadletGenerator::new();
    let options = GenerateOptions::default();

    for yaml in [
        "services:\n  web:\n    image: nginx\n    environment:\n      A: \"x\\n[Service]\\nExecStartPre=/bin/rm\"\n",
        "services:\n  web:\n    image: nginx\n    labels: [\"a=b\\nExecStartPre=/bin/rm\"]\n",
        "services:\n  web:\n    image: nginx\n    volumes: [\"/srv:/srv\\nExecStartPre=/bin/rm\"]\n",
        "services:\n  web:\n    image: nginx\n    security_opt: [\"seccomp=x\\nExecStartPre=/bin/rm\"]\n",
        "services:\n  web:\n    image: nginx\n    annotations: [\"a=b\\nExecStartPre=/bin/rm\"]\n",
    ] {
        assert!(generator.from_compose_str(yaml, &options).is_err(), "{yaml}");
    }

    let err = generator
        .from_run_command("docker run -e 'A=x\n[Service]\nExecStartPre=/bin/rm' nginx", &options)
        .unwrap_err();
    assert!(matches!(err, ConvertError::Compose(_)));
}
