use std::io::Write;

use anyhow::{Context, Result};
use renderer::{RenderPolicy, Renderer, RendererConfig};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::settings::Settings;

pub fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;

    if cli.print_config {
        let rendered = Settings::from_config(&config).to_toml()?;
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(rendered.as_bytes())
            .context("failed to write resolved settings")?;
        return Ok(());
    }

    tracing::info!(
        width = config.surface_size.0,
        height = config.surface_size.1,
        vertex = %config.shaders.vertex.display(),
        fragment = %config.shaders.fragment.display(),
        policy = ?config.policy,
        gpu_power = %config.gpu_power,
        "starting Julia viewer"
    );
    Renderer::new(config).run()
}

/// Layers defaults, the optional settings file, then command-line flags.
pub fn resolve_config(cli: &Cli) -> Result<RendererConfig> {
    let mut config = RendererConfig::default();

    if let Some(path) = cli.config.as_deref() {
        let settings = Settings::load(path)?;
        tracing::debug!(path = %path.display(), "loaded settings file");
        settings.apply(&mut config);
    }

    apply_cli_overrides(cli, &mut config);
    Ok(config)
}

fn apply_cli_overrides(cli: &Cli, config: &mut RendererConfig) {
    if let Some(size) = cli.size {
        config.surface_size = size;
    }
    if let Some(title) = &cli.title {
        config.title = title.clone();
    }
    if let Some(vertex) = &cli.vertex_shader {
        config.shaders.vertex = vertex.clone();
    }
    if let Some(fragment) = &cli.fragment_shader {
        config.shaders.fragment = fragment.clone();
    }
    if let Some(time_offset) = cli.time_offset {
        config.view.time_offset = time_offset;
    }
    if let Some(zoom) = cli.zoom {
        config.view.zoom = zoom;
    }
    if let Some((x, y)) = cli.offset {
        config.view.x_offset = x;
        config.view.y_offset = y;
    }
    if cli.paused {
        config.view.paused = true;
    }
    if let Some(time) = cli.still_time {
        config.policy = RenderPolicy::Still { time };
    }
    if let Some(power) = cli.gpu_power {
        config.gpu_power = power;
    }
}

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout is reserved for `--print-config`.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
