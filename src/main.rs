use pixel_grid::image::io::{load_rgba_image, save_heatmap_png, save_rgb_png, write_json_file};
use pixel_grid::image::RgbaView;
use pixel_grid::sampler::overlay_grid;
use pixel_grid::{run_pipeline, PipelineParams, PipelineResult, SampleMode};
use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let program = env::args().next().unwrap_or_else(|| "pixel-grid".to_string());
    let config = parse_args(&program)?;

    let decoded = load_rgba_image(&config.input_path)?;
    let image = RgbaView::new(decoded.width, decoded.height, &decoded.data)
        .map_err(|e| e.to_string())?;

    let result = run_pipeline(image, &config.params).map_err(|e| e.to_string())?;

    if config.format.includes_text() {
        print_text_summary(&result);
    }

    if let Some(path) = &config.heatmap_out {
        save_heatmap_png(&result.energy_u8, path)?;
        println!("Heatmap written to {}", path.display());
    }

    if let Some(mut art) = result.pixel_art.clone() {
        if config.show_grid {
            overlay_grid(&mut art, config.grid_color);
        }
        let out_path = config
            .out
            .clone()
            .unwrap_or_else(|| default_output_path(&config.input_path));
        save_rgb_png(art.width, art.height, &art.rgb, &out_path)?;
        println!("Pixel art written to {}", out_path.display());
    }

    if config.format.includes_json() {
        if let Some(path) = &config.json_out {
            write_json_file(path, &result)?;
            println!("JSON report written to {}", path.display());
        } else {
            let json = serde_json::to_string_pretty(&result)
                .map_err(|e| format!("Failed to serialize JSON: {e}"))?;
            println!("{json}");
        }
    }

    Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
    Both,
}

impl OutputFormat {
    fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "both" => Ok(Self::Both),
            other => Err(format!("Unknown format '{other}'. Use text|json|both.")),
        }
    }

    fn includes_text(&self) -> bool {
        matches!(self, Self::Text | Self::Both)
    }

    fn includes_json(&self) -> bool {
        matches!(self, Self::Json | Self::Both)
    }
}

struct CliConfig {
    input_path: PathBuf,
    params: PipelineParams,
    out: Option<PathBuf>,
    heatmap_out: Option<PathBuf>,
    json_out: Option<PathBuf>,
    format: OutputFormat,
    show_grid: bool,
    grid_color: [u8; 3],
}

fn parse_args(program: &str) -> Result<CliConfig, String> {
    let mut args = env::args().skip(1);
    let mut input_path: Option<PathBuf> = None;
    let mut params = PipelineParams::default();
    let mut out = None;
    let mut heatmap_out = None;
    let mut json_out = None;
    let mut format = OutputFormat::Text;
    let mut show_grid = false;
    let mut grid_color = [128u8, 128, 128];

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => {
                println!("{}", usage(program));
                std::process::exit(0);
            }
            "--config" => {
                let path = PathBuf::from(expect_value(&mut args, "--config", program)?);
                let contents = fs::read_to_string(&path)
                    .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
                params = serde_json::from_str(&contents)
                    .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
            }
            "--sigma" => params.sigma = parse_value(&mut args, "--sigma", program)?,
            "--pixel-size" => params.pixel_size = parse_value(&mut args, "--pixel-size", program)?,
            "--min-size" => params.min_size = parse_value(&mut args, "--min-size", program)?,
            "--max-size" => params.max_size = parse_value(&mut args, "--max-size", program)?,
            "--gap-tolerance" => {
                params.gap_tolerance = parse_value(&mut args, "--gap-tolerance", program)?
            }
            "--min-energy" => params.min_energy = parse_value(&mut args, "--min-energy", program)?,
            "--smooth" => params.smooth = parse_value(&mut args, "--smooth", program)?,
            "--window-size" => {
                params.window_size = parse_value(&mut args, "--window-size", program)?
            }
            "--mode" => {
                let value = expect_value(&mut args, "--mode", program)?;
                params.sample_mode = value.parse::<SampleMode>()?;
            }
            "--weight-ratio" => {
                params.sample_weight_ratio = parse_value(&mut args, "--weight-ratio", program)?
            }
            "--upscale" => params.upscale = parse_value(&mut args, "--upscale", program)?,
            "--native-res" => params.native_res = true,
            "--no-sample" => params.sample = false,
            "--enhance" => params.enhance_energy = true,
            "--enhance-horizontal" => {
                params.enhance_energy = true;
                params.enhance_directional = true;
                params.enhance_horizontal =
                    parse_value(&mut args, "--enhance-horizontal", program)?;
            }
            "--enhance-vertical" => {
                params.enhance_energy = true;
                params.enhance_directional = true;
                params.enhance_vertical = parse_value(&mut args, "--enhance-vertical", program)?;
            }
            "--out" => out = Some(PathBuf::from(expect_value(&mut args, "--out", program)?)),
            "--heatmap-out" => {
                heatmap_out = Some(PathBuf::from(expect_value(
                    &mut args,
                    "--heatmap-out",
                    program,
                )?))
            }
            "--json-out" => {
                json_out = Some(PathBuf::from(expect_value(&mut args, "--json-out", program)?))
            }
            "--format" => {
                let value = expect_value(&mut args, "--format", program)?;
                format = OutputFormat::from_str(&value)?;
            }
            "--show-grid" => show_grid = true,
            "--grid-color" => {
                let value = expect_value(&mut args, "--grid-color", program)?;
                grid_color = parse_color(&value)?;
            }
            _ if arg.starts_with('-') => {
                return Err(format!("Unknown option '{arg}'\n{}", usage(program)));
            }
            _ => {
                if input_path.is_some() {
                    return Err(format!(
                        "Unexpected positional argument '{arg}'\n{}",
                        usage(program)
                    ));
                }
                input_path = Some(PathBuf::from(arg));
            }
        }
    }

    let input_path = input_path.ok_or_else(|| usage(program))?;
    Ok(CliConfig {
        input_path,
        params,
        out,
        heatmap_out,
        json_out,
        format,
        show_grid,
        grid_color,
    })
}

fn expect_value(args: &mut impl Iterator<Item = String>, flag: &str, program: &str) -> Result<String, String> {
    args.next()
        .ok_or_else(|| format!("{flag} expects a value\n{}", usage(program)))
}

fn parse_value<T: std::str::FromStr>(
    args: &mut impl Iterator<Item = String>,
    flag: &str,
    program: &str,
) -> Result<T, String> {
    let value = expect_value(args, flag, program)?;
    value
        .parse()
        .map_err(|_| format!("Invalid value '{value}' for {flag}"))
}

fn parse_color(name: &str) -> Result<[u8; 3], String> {
    match name.to_lowercase().as_str() {
        "red" => Ok([255, 0, 0]),
        "green" => Ok([0, 255, 0]),
        "blue" => Ok([0, 0, 255]),
        "yellow" => Ok([255, 255, 0]),
        "cyan" => Ok([0, 255, 255]),
        "magenta" => Ok([255, 0, 255]),
        "gray" => Ok([128, 128, 128]),
        "white" => Ok([255, 255, 255]),
        "black" => Ok([0, 0, 0]),
        other => Err(format!("Unknown grid color '{other}'")),
    }
}

fn default_output_path(input: &PathBuf) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    PathBuf::from("out").join(format!("{stem}_sampled.png"))
}

fn usage(program: &str) -> String {
    format!(
        "Usage: {program} <image.png> [options]\n\n\
Recovers the pixel grid of a rasterized image and resamples it to clean pixel art.\n\n\
Options:\n\
  --config path.json        Load the full parameter record from JSON\n\
  --sigma s                 Gaussian sigma before gradients (default 1.0)\n\
  --pixel-size n            Known cell size; 0 auto-detects (default 0)\n\
  --min-size n / --max-size n  Cell size search range (default 4..32)\n\
  --mode m                  direct|center|average|weighted (default center)\n\
  --weight-ratio r          Weighted-mode ratio, >= 1 (default 2.0)\n\
  --upscale k               Output tiling factor; 0 = cell size (default 1)\n\
  --native-res              Force 1x output\n\
  --no-sample               Detection only, skip the sampler\n\
  --enhance                 Enhance energy before detection\n\
  --enhance-horizontal f / --enhance-vertical f  Directional factors\n\
  --min-energy r            Peak threshold ratio in [0, 1] (default 0.15)\n\
  --smooth w                Profile box width, odd (default 3)\n\
  --window-size w           Peak local-max window, odd (default 5)\n\
  --gap-tolerance t         Line spacing tolerance (default 2)\n\
  --out path.png            Pixel-art output path\n\
  --heatmap-out path.png    Write the energy heatmap\n\
  --show-grid               Overlay cell boundaries on upscaled output\n\
  --grid-color name         Overlay color (default gray)\n\
  --format text|json|both   Report format (default text)\n\
  --json-out path.json      Write the JSON report to a file\n\n\
Examples:\n  {program} sprite.png --upscale 8 --out sprite_clean.png\n  {program} art.png --mode direct --pixel-size 10 --format both\n"
    )
}

fn print_text_summary(result: &PipelineResult) {
    println!("Pipeline summary");
    println!("  input: {}x{}", result.width, result.height);
    println!("  pixel size: {}", result.detected_pixel_size);
    println!(
        "  detected lines: {} on x, {} on y",
        result.x_lines.len(),
        result.y_lines.len()
    );
    println!(
        "  completed grid: {} x {} cells",
        result.all_x_lines.len().saturating_sub(1),
        result.all_y_lines.len().saturating_sub(1)
    );
    match &result.pixel_art {
        Some(art) => println!(
            "  pixel art: {}x{} at {}x upscale",
            art.width, art.height, art.upscale_factor
        ),
        None => println!("  pixel art: not requested"),
    }

    println!("\nTiming ({:.3} ms total)", result.timing.total_ms);
    for stage in &result.timing.stages {
        println!("  {:<12} {:>8.3} ms", stage.label, stage.elapsed_ms);
    }
}
