use std::path::PathBuf;

use clap::Parser;
use renderer::GpuPowerPreference;

#[derive(Parser, Debug)]
#[command(
    name = "juliaview",
    author,
    version,
    about = "Animated Julia set viewer",
    long_about = "Animated Julia set viewer.\n\n\
        Keys: space pauses, + - 9 3 8 2 7 1 scrub time, ] [ zoom, w a s d pan."
)]
pub struct Cli {
    /// TOML settings file; command-line flags override its values.
    #[arg(long, value_name = "FILE", env = "JULIAVIEW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Window size in physical pixels (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_size)]
    pub size: Option<(u32, u32)>,

    /// Window title.
    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,

    /// GLSL vertex stage to compile instead of the bundled one.
    #[arg(long, value_name = "PATH")]
    pub vertex_shader: Option<PathBuf>,

    /// GLSL fragment stage to compile instead of the bundled one.
    #[arg(long, value_name = "PATH")]
    pub fragment_shader: Option<PathBuf>,

    /// Seconds added to the clock before deriving the Julia constant.
    #[arg(
        long,
        value_name = "SECONDS",
        value_parser = parse_finite,
        allow_negative_numbers = true
    )]
    pub time_offset: Option<f32>,

    /// Initial zoom factor.
    #[arg(long, value_name = "FACTOR", value_parser = parse_finite)]
    pub zoom: Option<f32>,

    /// Initial pan offset of the complex plane (e.g. `-0.5,0.25`).
    #[arg(
        long,
        value_name = "X,Y",
        value_parser = parse_offset,
        allow_hyphen_values = true
    )]
    pub offset: Option<(f32, f32)>,

    /// Start with the animation paused.
    #[arg(long)]
    pub paused: bool,

    /// Freeze the clock at this many elapsed seconds.
    #[arg(
        long,
        value_name = "SECONDS",
        value_parser = parse_finite,
        allow_negative_numbers = true
    )]
    pub still_time: Option<f32>,

    /// Adapter power preference: `low` or `high`.
    #[arg(long, value_name = "low|high", value_parser = parse_gpu_power)]
    pub gpu_power: Option<GpuPowerPreference>,

    /// Print the resolved settings as TOML and exit.
    #[arg(long)]
    pub print_config: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let trimmed = value.trim();
    let (width, height) = trimmed
        .split_once(['x', 'X', '×'])
        .ok_or_else(|| "expected WIDTHxHEIGHT, e.g. 800x600".to_string())?;

    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| format!("invalid width '{}'", width.trim()))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| format!("invalid height '{}'", height.trim()))?;

    if width == 0 || height == 0 {
        return Err("window dimensions must be greater than zero".to_string());
    }

    Ok((width, height))
}

pub fn parse_finite(value: &str) -> Result<f32, String> {
    let trimmed = value.trim();
    let parsed: f32 = trimmed
        .parse()
        .map_err(|_| format!("invalid number '{trimmed}'"))?;
    if !parsed.is_finite() {
        return Err(format!("'{trimmed}' is not a finite number"));
    }
    Ok(parsed)
}

pub fn parse_offset(value: &str) -> Result<(f32, f32), String> {
    let (x, y) = value
        .trim()
        .split_once(',')
        .ok_or_else(|| "expected X,Y, e.g. -0.5,0.25".to_string())?;

    let x: f32 = x
        .trim()
        .parse()
        .map_err(|_| format!("invalid x offset '{}'", x.trim()))?;
    let y: f32 = y
        .trim()
        .parse()
        .map_err(|_| format!("invalid y offset '{}'", y.trim()))?;

    if !x.is_finite() || !y.is_finite() {
        return Err("offset components must be finite".to_string());
    }
    Ok((x, y))
}

pub fn parse_gpu_power(value: &str) -> Result<GpuPowerPreference, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("gpu power preference must not be empty".to_string());
    }

    match trimmed.to_ascii_lowercase().as_str() {
        "low" | "low-power" | "integrated" => Ok(GpuPowerPreference::Low),
        "high" | "high-performance" | "discrete" => Ok(GpuPowerPreference::High),
        _ => Err(format!(
            "unknown gpu power preference '{trimmed}' (expected low or high)"
        )),
    }
}
