//! Compose mapping tests against the public mapper API.

use quadlet_gen::compose::{ComposeError, ComposeMapper};
use quadlet_gen::container::ContainerError;

#[test]
fn test_long_form_ports_and_named_resources() {
    let project = ComposeMapper::parse_str(
        r#"
services:
  app:
    image: registry.example.com/team/app:3.1
    ports:
      - target: 80
        published: 8080
      - target: 53
        published: 5353
        protocol: udp
        host_ip: 127.0.0.1
      - target: 9090
        host_ip: 127.0.0.1
    volumes:
      - cache:/var/cache/app
      - type: bind
        source: /srv/config
        target: /etc/app
        read_only: true
    networks:
      backend:
        aliases: [api]
volumes:
  cache:
    name: app_cache
networks:
  backend:
    name: app_backend
"#,
    )
    .unwrap();

    let app = project.get("app").unwrap();
    assert_eq!(
        app.publish_ports(),
        [
            "8080:80".to_string(),
            "127.0.0.1:5353:53/udp".to_string(),
            "127.0.0.1::9090".to_string()
        ]
    );
    assert_eq!(
        app.volumes(),
        [
            "app_cache:/var/cache/app".to_string(),
            "/srv/config:/etc/app:ro".to_string()
        ]
    );
    assert_eq!(app.networks, vec!["app_backend"]);
    assert_eq!(app.network_aliases, vec!["api"]);
}

#[test]
fn test_ignored_features_are_reported_not_applied() {
    let project = ComposeMapper::parse_str(
        r#"
x-common: &common
  restart: always
services:
  web:
    image: nginx
    links: [db]
    deploy:
      replicas: 2
    frobnicate: yes
  db:
    image: postgres
include: [other.yml]
"#,
    )
    .unwrap();

    let features: Vec<&str> = project
        .diagnostics
        .iter()
        .map(|d| d.feature.as_str())
        .collect();
    assert_eq!(features, vec!["include", "links", "deploy", "frobnicate"]);
    assert_eq!(project.diagnostics_for("web").len(), 3);
    assert_eq!(project.diagnostics_for("db").len(), 0);
    assert_eq!(project.names(), vec!["web", "db"]);
}

#[test]
fn test_environment_forms_are_equivalent() {
    let from_map = ComposeMapper::parse_str(
        "services:\n  a:\n    image: alpine\n    environment:\n      A: 1\n      B: 'two words'\n      C:\n",
    )
    .unwrap();
    let from_list = ComposeMapper::parse_str(
        "services:\n  a:\n    image: alpine\n    environment: ['A=1', 'B=two words', 'C=']\n",
    )
    .unwrap();

    assert_eq!(
        from_map.get("a").unwrap().environment(),
        from_list.get("a").unwrap().environment()
    );
}

#[test]
fn test_invalid_values_name_the_service() {
    let err = ComposeMapper::parse_str(
        "services:\n  web:\n    image: nginx\n  bad:\n    image: nginx\n    ports: ['80:99999']\n",
    )
    .unwrap_err();
    match err {
        ComposeError::InvalidField { service, source } => {
            assert_eq!(service, "bad");
            assert!(matches!(source, ContainerError::InvalidPort(_)));
        }
        other => panic!("unexpected error: {other}"),
    }

    let err = ComposeMapper::parse_str(
        "services:\n  web:\n    image: nginx\n    volumes: ['data:relative/path']\n",
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ComposeError::InvalidField {
            source: ContainerError::InvalidVolume { .. },
            ..
        }
    ));

    let err = ComposeMapper::parse_str("services:\n  web:\n    image: nginx\n    ports: 80\n")
        .unwrap_err();
    assert!(matches!(err, ComposeError::InvalidShape { ref field, .. } if field == "ports"));

    let err = ComposeMapper::parse_str("services: [").unwrap_err();
    assert!(matches!(err, ComposeError::Yaml(_)));
}
