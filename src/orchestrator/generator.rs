//! Run-command and Compose entry points.

use crate::compose::{ComposeMapper, ComposeProject, Diagnostic, MappedService};
use crate::orchestrator::merge::{dependency_unit, merge_service, merge_unit, translate_restart};
use crate::orchestrator::{ConvertError, GenerateOptions, GeneratedUnit, Generation, Result};
use crate::quadlet::{Sections, generate, unit_filename};
use crate::run::{DockerRunConverter, RunConverter, tokenize};
use serde_yaml::Value;
use tracing::{debug, info, warn};

/// Converts run commands and Compose documents into Quadlet units.
///
/// The run→compose step is delegated to `C`; every input then takes the
/// same per-service mapping and serialization path.
#[derive(Debug, Clone, Default)]
pub struct QuadletGenerator<C = DockerRunConverter> {
    converter: C,
}

impl QuadletGenerator<DockerRunConverter> {
    pub fn new() -> Self {
        Self {
            converter: DockerRunConverter::new(),
        }
    }
}

impl<C: RunConverter> QuadletGenerator<C> {
    /// Use a custom run→compose converter.
    pub fn with_converter(converter: C) -> Self {
        Self { converter }
    }

    /// Convert a shell-style `docker run ...` string into one unit.
    pub fn from_run_command(&self, command: &str, options: &GenerateOptions) -> Result<GeneratedUnit> {
        let args = tokenize(command)?;
        self.from_run_args(&args, options)
    }

    /// Convert a pre-tokenized run invocation into one unit.
    pub fn from_run_args(&self, args: &[String], options: &GenerateOptions) -> Result<GeneratedUnit> {
        let mut generation = self.convert_run(args, options)?;
        generation
            .units
            .pop()
            .ok_or(ConvertError::UnexpectedServiceCount(0))
    }

    /// Like [`from_run_args`](Self::from_run_args), but keeps the diagnostics
    /// for flags that have no Quadlet counterpart. The generation holds
    /// exactly one unit.
    pub fn convert_run(&self, args: &[String], options: &GenerateOptions) -> Result<Generation> {
        let document = self.converter.convert(args)?;
        let project = ComposeMapper::parse(&document)?;
        if project.len() != 1 {
            return Err(ConvertError::UnexpectedServiceCount(project.len()));
        }
        self.render_project(project, options)
    }

    /// Decode Compose YAML and convert every service.
    pub fn from_compose_str(&self, yaml: &str, options: &GenerateOptions) -> Result<Generation> {
        let project = ComposeMapper::parse_str(yaml)?;
        self.render_project(project, options)
    }

    /// Convert every service of a decoded Compose document, in document order.
    pub fn from_compose(&self, document: &Value, options: &GenerateOptions) -> Result<Generation> {
        let project = ComposeMapper::parse(document)?;
        self.render_project(project, options)
    }

    fn render_project(&self, project: ComposeProject, options: &GenerateOptions) -> Result<Generation> {
        let ComposeProject {
            services,
            mut diagnostics,
        } = project;

        let rename = match (&options.name, services.len()) {
            (Some(name), 1) => Some(name.as_str()),
            (Some(name), _) => {
                warn!("Name override '{}' ignored for multi-service input", name);
                diagnostics.push(Diagnostic {
                    service: None,
                    feature: "name".to_string(),
                    message: format!(
                        "name override '{}' only applies to single-service input and was ignored",
                        name
                    ),
                });
                None
            }
            (None, _) => None,
        };

        let mut units = Vec::with_capacity(services.len());
        for service in services {
            units.push(render_service(service, rename, options)?);
        }

        info!("Generated {} unit(s)", units.len());
        Ok(Generation { units, diagnostics })
    }
}

/// Apply cross-cutting translations to one service and serialize it.
fn render_service(
    service: MappedService,
    rename: Option<&str>,
    options: &GenerateOptions,
) -> Result<GeneratedUnit> {
    let MappedService {
        name,
        mut container,
    } = service;

    let unit_name = match rename {
        Some(rename) => {
            container
                .set_container_name(rename)
                .map_err(|source| ConvertError::Container {
                    name: name.clone(),
                    source,
                })?;
            rename.to_string()
        }
        None => name.clone(),
    };

    container
        .validate()
        .map_err(|source| ConvertError::Container {
            name: name.clone(),
            source,
        })?;

    let derived_restart = match container.restart.as_deref() {
        Some(policy) => {
            let translated = translate_restart(policy);
            if translated.is_none() {
                debug!("Dropping restart policy '{}' for '{}'", policy, name);
            }
            translated
        }
        None => None,
    };

    let sections = Sections {
        unit: merge_unit(options.unit.as_ref(), &dependency_unit(&container)),
        service: merge_service(options.service.as_ref(), derived_restart),
        install: options.install.clone(),
        globals: options.globals.clone(),
    };
    if let Some(key) = sections.multiline_key() {
        return Err(ConvertError::InvalidOption {
            key: key.to_string(),
        });
    }

    let content = generate(&container, &sections);
    let filename = unit_filename(&unit_name);
    debug!("Rendered {}", filename);
    Ok(GeneratedUnit { filename, content })
}
