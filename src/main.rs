use clap::{Parser, Subcommand};
use photo_filter::config::{self, AppConfig};
use photo_filter::imaging::FilterParameters;
use photo_filter::output;
use photo_filter::preview::{PickedPhoto, PreviewState};
use photo_filter::storage;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Slider values. Each flag overrides the matching `[filter]` config key.
#[derive(clap::Args, Clone)]
struct FilterArgs {
    /// Additive brightness offset, typically -1.0 to 1.0
    #[arg(long, allow_negative_numbers = true)]
    brightness: Option<f32>,
    /// Contrast gain around mid-gray, typically 0.0 to 4.0
    #[arg(long, allow_negative_numbers = true)]
    contrast: Option<f32>,
    /// 0.0 = grayscale, 1.0 = unchanged, above 1.0 = oversaturated
    #[arg(long, allow_negative_numbers = true)]
    saturation: Option<f32>,
    /// Gaussian blur sigma in pixels, 0 to 1000 (0 = no blur)
    #[arg(long, allow_negative_numbers = true)]
    blur_radius: Option<f32>,
}

impl FilterArgs {
    fn resolve(&self, base: FilterParameters) -> FilterParameters {
        FilterParameters {
            brightness: self.brightness.unwrap_or(base.brightness),
            contrast: self.contrast.unwrap_or(base.contrast),
            saturation: self.saturation.unwrap_or(base.saturation),
            blur_radius: self.blur_radius.unwrap_or(base.blur_radius),
        }
    }
}

/// The picked photo: an original and an optional edited variant.
#[derive(clap::Args, Clone)]
struct PhotoArgs {
    /// Photo to filter
    input: PathBuf,
    /// Edited variant of the photo (e.g. a crop); used instead of INPUT when it loads
    #[arg(long)]
    edited: Option<PathBuf>,
}

impl PhotoArgs {
    fn pick(&self) -> Option<PickedPhoto> {
        PickedPhoto::open(&self.input, self.edited.as_deref())
    }
}

#[derive(Parser)]
#[command(name = "photo-filter")]
#[command(about = "Filter a photo with live-preview color controls and blur")]
#[command(long_about = "\
Filter a photo with live-preview color controls and blur

The preview is rendered at the configured viewport size times the display
pixel density, then run through the filter chain:

  1. Color controls  brightness (offset), contrast (gain around mid-gray),
                     saturation (blend toward luminance), applied as one matrix
  2. Gaussian blur   edge-extended so borders don't fade, cropped back to size

Saving re-runs the same chain on the full-resolution photo and writes it to
the photo library directory.

Run 'photo-filter gen-config' to generate a documented photo-filter.toml.")]
#[command(version)]
struct Cli {
    /// Config file (default: ./photo-filter.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the filtered preview at display resolution
    Preview {
        #[command(flatten)]
        photo: PhotoArgs,
        /// Where to write the preview image
        #[arg(long, short)]
        out: PathBuf,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Filter at full resolution and save to the photo library
    Save {
        #[command(flatten)]
        photo: PhotoArgs,
        /// Library directory (overrides [library] directory)
        #[arg(long)]
        library: Option<PathBuf>,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Print a stock photo-filter.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Preview { photo, out, filter } => {
            let app_config = load_app_config(cli.config.as_deref())?;
            init_thread_pool(&app_config.processing);

            let mut state = PreviewState::new(app_config.preview.target_size());
            state.set_parameters(filter.resolve(app_config.filter));
            state.set_photo(photo.pick());

            let written = match state.preview() {
                Some(bitmap) => {
                    bitmap.save(&out)?;
                    Some(out.as_path())
                }
                None => None,
            };
            output::print_lines(&output::format_preview(
                &photo.input,
                state.original(),
                state.preview(),
                &state.parameters(),
                written,
            ));
        }
        Command::Save {
            photo,
            library,
            filter,
        } => {
            let mut app_config = load_app_config(cli.config.as_deref())?;
            if let Some(dir) = library {
                app_config.library.directory = dir;
            }
            init_thread_pool(&app_config.processing);
            let store = Arc::new(app_config.library.store()?);

            let mut state = PreviewState::new(app_config.preview.target_size());
            state.set_parameters(filter.resolve(app_config.filter));
            state.set_photo(photo.pick());

            let Some(processed) = state.export() else {
                log::warn!("nothing to save: {} did not load", photo.input.display());
                return Ok(());
            };
            let event = storage::wait_for_save(storage::save_photo(store, processed));
            output::print_lines(&output::format_save_event(&event));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Explicit `--config` must exist; otherwise `./photo-filter.toml` is optional.
fn load_app_config(path: Option<&Path>) -> Result<AppConfig, config::ConfigError> {
    match path {
        Some(p) => config::load_config_file(p, true),
        None => config::load_config(Path::new(".")),
    }
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores — user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
