use anyhow::{Context, Result};
use quadlet_gen::cli::{
    Args, ComposeConfig, ConfigDiscovery, ExecutionMode, OutputConfig, RunConfig, output,
};
use quadlet_gen::compose::Diagnostic;
use quadlet_gen::run::tokenize;
use quadlet_gen::{GeneratedUnit, GenerateOptions, QuadletGenerator, env};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Args::parse();

    // Initialize logging on stderr so stdout only carries unit text
    let default_filter = if args.verbose {
        env::VERBOSE_LOG_FILTER
    } else {
        env::DEFAULT_LOG_FILTER
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mode = match args.mode() {
        Ok(mode) => mode,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    if let Err(e) = run(mode) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(mode: ExecutionMode) -> Result<()> {
    match mode {
        ExecutionMode::Compose(config) => run_compose(config),
        ExecutionMode::Run(config) => run_command(config),
        ExecutionMode::ShowConfig => {
            ConfigDiscovery::print_lookup_report();
            Ok(())
        }
        ExecutionMode::InitConfig { path, options } => {
            ConfigDiscovery::write_config(&path, &options)
        }
    }
}

fn resolve_options(output: &OutputConfig) -> Result<GenerateOptions> {
    let base = ConfigDiscovery::load(output.config_override.as_deref())?;
    let options = base.overlay(&output.options);
    debug!("Effective generation options: {:?}", options);
    Ok(options)
}

fn run_compose(config: ComposeConfig) -> Result<()> {
    info!("Converting compose file {:?}", config.file);
    let options = resolve_options(&config.output)?;
    let yaml = output::read_compose_file(&config.file)?;

    let generation = QuadletGenerator::new()
        .from_compose_str(&yaml, &options)
        .with_context(|| format!("Failed to convert {}", config.file.display()))?;

    report(&generation.diagnostics);
    emit(&generation.units, &config.output)
}

fn run_command(config: RunConfig) -> Result<()> {
    let options = resolve_options(&config.output)?;

    let args = match config.command.as_slice() {
        [command] => tokenize(command).context("Failed to split run command")?,
        args => args.to_vec(),
    };
    let generation = QuadletGenerator::new()
        .convert_run(&args, &options)
        .context("Failed to convert run command")?;

    report(&generation.diagnostics);
    emit(&generation.units, &config.output)
}

fn report(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("warning: {}", diagnostic);
    }
}

fn emit(units: &[GeneratedUnit], config: &OutputConfig) -> Result<()> {
    match &config.output_dir {
        Some(dir) => {
            for path in output::write_units(units, dir)? {
                println!("{}", path.display());
            }
        }
        None => print!("{}", output::render(units, config.format)?),
    }
    Ok(())
}
