use clap::{ArgGroup, Parser};
use flexi_logger::Logger;
use std::error::Error;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use cell_counter::config::CountConfig;
use cell_counter::estimate::RunResult;
use cell_counter::overlay::draw_overlay;
use cell_counter::pipeline::{CellCount, CountError, count_cells, load_image, save_image};
use cell_counter::plot_histogram::render_histogram_rgb;
use cell_counter::report::format_report;

const USAGE: &str =
    "USAGE: cell_count -i <input_file> [-o <output_file>] [-m <mask_file>] [-v]";
const PLOT_SIZE: (u32, u32) = (640, 360);

#[derive(Parser, Debug)]
#[command(
    name = "cell_count",
    about = "Count stained cells in microscopy images",
    version,
    group(
        ArgGroup::new("source")
            .required(true)
            .args(["input", "dir"])
    )
)]
struct Cli {
    /// Image to count
    #[arg(short = 'i', long = "input")]
    input: Option<PathBuf>,

    /// Count every image in a directory and print a combined table
    #[arg(short = 'd', long = "dir")]
    dir: Option<PathBuf>,

    /// Save the input with region outlines drawn on it (a directory with --dir)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Save the cleaned mask (a directory with --dir)
    #[arg(short = 'm', long = "mask")]
    mask: Option<PathBuf>,

    /// Save the color mask before cleaning (a directory with --dir)
    #[arg(long = "raw-mask")]
    raw_mask: Option<PathBuf>,

    /// Save a bar chart of cluster sizes (a directory with --dir)
    #[arg(long = "plot")]
    plot: Option<PathBuf>,

    /// JSON calibration file; keys it omits keep their defaults
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Override the lower bound of the first color channel
    #[arg(long = "sensitivity")]
    sensitivity: Option<u8>,

    /// Print each region as it is counted and enable debug logging
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

/// Prints `msg` framed by rules as wide as the message.
fn banner(msg: &str) {
    let rule = "=".repeat(msg.chars().count());
    println!();
    println!("{rule}");
    println!("{msg}");
    println!("{rule}");
    println!();
}

fn is_image_file(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(OsStr::to_str) else {
        return false;
    };
    matches!(
        ext.to_ascii_lowercase().as_str(),
        "png" | "jpg" | "jpeg" | "bmp" | "gif" | "tif" | "tiff" | "webp"
    )
}

/// In single-image mode `arg` is the file itself; in directory mode it names
/// the directory that receives `<stem>_<suffix>.png`.
fn output_path(arg: &Path, image_path: &Path, suffix: &str, batch: bool) -> PathBuf {
    if !batch {
        return arg.to_path_buf();
    }
    let stem = image_path
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or("image");
    arg.join(format!("{stem}_{suffix}.png"))
}

fn ensure_parent(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn report_save(result: Result<(), CountError>) {
    if let Err(e) = result {
        banner(&format!("{e} (check the file extension, eg: out.png)"));
    }
}

fn save_plot(result: &RunResult, config: &CountConfig, path: &Path) -> Result<(), Box<dyn Error>> {
    let (w, h) = PLOT_SIZE;
    let pixels = render_histogram_rgb(result, config, w, h)?;
    let img = image::RgbImage::from_raw(w, h, pixels)
        .ok_or_else(|| format!("Failed to build RGB image for plot ({w}x{h})"))?;
    ensure_parent(path)?;
    save_image(&img, path)?;
    Ok(())
}

fn write_outputs(
    cli: &Cli,
    config: &CountConfig,
    image_path: &Path,
    image: &image::RgbImage,
    count: &CellCount,
    batch: bool,
) {
    let save = |arg: &Option<PathBuf>, suffix: &str, write: &dyn Fn(&Path) -> Result<(), CountError>| {
        let Some(arg) = arg else {
            return;
        };
        let path = output_path(arg, image_path, suffix, batch);
        if let Err(e) = ensure_parent(&path) {
            banner(&format!("Could not create {}: {e}", path.display()));
            return;
        }
        report_save(write(&path));
    };

    save(&cli.output, "overlay", &|p| {
        save_image(&draw_overlay(image, &count.regions, config), p)
    });
    save(&cli.mask, "mask", &|p| save_image(&count.mask, p));
    save(&cli.raw_mask, "raw_mask", &|p| save_image(&count.raw_mask, p));

    if let Some(arg) = &cli.plot {
        let path = output_path(arg, image_path, "plot", batch);
        if let Err(e) = save_plot(&count.result, config, &path) {
            banner(&format!("Could not save plot {}: {e}", path.display()));
        }
    }
}

fn print_progress(count: &CellCount) {
    for classified in &count.regions {
        if classified.is_cluster {
            print!("{} ", classified.estimated_count);
        } else {
            print!(". ");
        }
    }
}

fn load_config(cli: &Cli) -> Result<CountConfig, Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => CountConfig::load(path)?,
        None => CountConfig::default(),
    };
    if let Some(sensitivity) = cli.sensitivity {
        config.lower_bound[0] = sensitivity;
    }
    config.validate()?;
    Ok(config)
}

fn collect_images(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    if !dir.is_dir() {
        return Err(format!("Not a directory: {}", dir.display()).into());
    }
    let mut images: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file() && is_image_file(p))
        .collect();
    images.sort();
    Ok(images)
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let _logger = Logger::try_with_env_or_str(level)?.log_to_stderr().start()?;

    let config = match load_config(&cli) {
        Ok(v) => v,
        Err(e) => {
            banner(&e.to_string());
            std::process::exit(1);
        }
    };

    let (images, batch) = if let Some(input) = &cli.input {
        (vec![input.clone()], false)
    } else if let Some(dir) = &cli.dir {
        (collect_images(dir)?, true)
    } else {
        return Err("either --input or --dir is required".into());
    };

    if images.is_empty() {
        eprintln!("No images found");
        return Ok(());
    }

    let mut combined = RunResult::default();
    for image_path in &images {
        let image = match load_image(image_path) {
            Ok(v) => v,
            Err(e) => {
                banner(&e.to_string());
                if !batch {
                    banner(USAGE);
                    std::process::exit(1);
                }
                continue;
            }
        };

        let count = count_cells(&image, &config)?;

        if batch {
            println!();
            println!("{}", image_path.display());
        }
        if cli.verbose {
            print_progress(&count);
        }
        println!();
        println!();
        print!("{}", format_report(&count.result));

        write_outputs(&cli, &config, image_path, &image, &count, batch);
        combined.merge(&count.result);
    }

    if batch {
        println!();
        println!("combined ({} images)", images.len());
        print!("{}", format_report(&combined));
    }

    Ok(())
}
