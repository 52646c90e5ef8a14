// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use qr_scanner::app::AppModel;
use qr_scanner::backends::camera::CameraBackendType;
use qr_scanner::i18n;
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "qr-scanner")]
#[command(about = "QR code scanner for the COSMIC desktop")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// Camera backend for the headless commands
    #[arg(long, global = true, value_enum, default_value = "pipewire")]
    backend: BackendArg,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum BackendArg {
    Pipewire,
    V4l2,
}

impl From<BackendArg> for CameraBackendType {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Pipewire => CameraBackendType::PipeWire,
            BackendArg::V4l2 => CameraBackendType::V4l2,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List available cameras
    List,

    /// Decode QR codes in image files
    Decode {
        /// Image files to scan
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Scan from a camera until a code is found
    Scan {
        /// Camera index to use (from 'qr-scanner list')
        #[arg(short, long, default_value = "0")]
        camera: usize,

        /// Give up after this many seconds (0 waits forever)
        #[arg(short, long, default_value = "0")]
        timeout: u64,

        /// Open links in the browser and addresses in the mail client
        #[arg(short, long)]
        open: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=qr_scanner=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let backend = CameraBackendType::from(cli.backend);

    match cli.command {
        Some(Commands::List) => cli::list_cameras(backend),
        Some(Commands::Decode { files, json }) => cli::decode_files(&files, json),
        Some(Commands::Scan {
            camera,
            timeout,
            open,
        }) => cli::scan(backend, camera, timeout, open),
        None => run_gui(),
    }
}

fn run_gui() -> Result<(), Box<dyn std::error::Error>> {
    // Get the system's preferred languages.
    let requested_languages = i18n_embed::DesktopLanguageRequester::requested_languages();

    // Enable localizations to be applied.
    i18n::init(&requested_languages);

    // Settings for configuring the application window and iced runtime.
    let settings = cosmic::app::Settings::default().size_limits(
        cosmic::iced::Limits::NONE
            .min_width(qr_scanner::constants::ui::MIN_WINDOW_WIDTH)
            .min_height(qr_scanner::constants::ui::MIN_WINDOW_HEIGHT),
    );

    // Starts the application's event loop with `()` as the application's flags.
    cosmic::app::run::<AppModel>(settings, ())?;

    Ok(())
}
