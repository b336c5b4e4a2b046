use argh::FromArgs;
use std::path::PathBuf;
use std::time::Instant;

use nnwarp_core::{
    decode::load_image, encode::save_image, rotate_expanded, rotate_legacy, rotate_without_crop,
    RoundingMode,
};

mod config;

use config::{parse_rounding, CliConfig, Mode};

#[derive(FromArgs, Debug)]
/// Rotate an image with nearest-neighbor resampling.
struct Args {
    /// input image path
    #[argh(positional)]
    input: PathBuf,

    /// output image path (.png, .jpg or .jpeg)
    #[argh(positional)]
    output: PathBuf,

    /// rotation angle in degrees
    #[argh(positional)]
    angle: f64,

    /// framing: crop-free (default), expand, legacy
    #[argh(option, short = 'm')]
    mode: Option<Mode>,

    /// JPEG quality 1-100 (default: 90)
    #[argh(option, short = 'q')]
    quality: Option<u8>,

    /// rounding rule: nearest (default), half-up, truncate
    #[argh(option, from_str_fn(parse_rounding))]
    rounding: Option<RoundingMode>,

    /// worker threads; 1 runs serially (default: global pool)
    #[argh(option, short = 'j')]
    threads: Option<usize>,

    /// JSON configuration file; flags override its values
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,
}

impl Args {
    fn resolve_config(&self) -> Result<CliConfig, config::ConfigError> {
        let base = match &self.config {
            Some(path) => CliConfig::from_file(path)?,
            None => CliConfig::default(),
        };
        Ok(base.with_overrides(self.mode, self.quality, self.rounding, self.threads))
    }
}

/// Options that consume the following argument as their value.
const VALUE_OPTIONS: &[&str] = &[
    "-m", "--mode", "-q", "--quality", "--rounding", "-j", "--threads", "-c", "--config",
];

/// Move bare negative numbers behind `--` so a negative angle parses as the
/// trailing positional instead of an unknown flag.
fn angle_behind_separator<'a>(args: &[&'a str]) -> Vec<&'a str> {
    if args.contains(&"--") {
        return args.to_vec();
    }

    let mut flags_and_positionals = Vec::with_capacity(args.len() + 1);
    let mut negatives = Vec::new();
    let mut takes_value = false;
    for &arg in args {
        if takes_value {
            takes_value = false;
            flags_and_positionals.push(arg);
        } else if arg.starts_with('-') && arg.parse::<f64>().is_ok() {
            negatives.push(arg);
        } else {
            takes_value = VALUE_OPTIONS.contains(&arg);
            flags_and_positionals.push(arg);
        }
    }

    if !negatives.is_empty() {
        flags_and_positionals.push("--");
        flags_and_positionals.extend(negatives);
    }
    flags_and_positionals
}

fn parse_args(command: &str, args: &[&str]) -> Result<Args, argh::EarlyExit> {
    Args::from_args(&[command], &angle_behind_separator(args))
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.resolve_config()?;
    log::debug!("configuration: {config:?}");

    let start = Instant::now();

    let source = load_image(&args.input)?;
    log::info!(
        "loaded {} ({}x{})",
        args.input.display(),
        source.width,
        source.height
    );

    let rotated = match config.mode {
        Mode::CropFree => rotate_without_crop(&source, args.angle, &config.resample)?,
        Mode::Expand => rotate_expanded(&source, args.angle, &config.resample)?,
        Mode::Legacy => rotate_legacy(&source, args.angle, &config.resample)?,
    };

    save_image(&rotated, &args.output, config.quality)?;
    log::info!(
        "wrote {} ({}x{}) in {:.3} ms",
        args.output.display(),
        rotated.width,
        rotated.height,
        start.elapsed().as_secs_f64() * 1000.0
    );

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let argv: Vec<String> = std::env::args().skip(1).collect();
    let argv: Vec<&str> = argv.iter().map(String::as_str).collect();
    let args = match parse_args("nnwarp", &argv) {
        Ok(args) => args,
        Err(exit) => match exit.status {
            Ok(()) => {
                println!("{}", exit.output);
                std::process::exit(0);
            }
            Err(()) => {
                eprintln!("{}\nRun nnwarp --help for more information.", exit.output);
                std::process::exit(1);
            }
        },
    };
    run(&args)
}
