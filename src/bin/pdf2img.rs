//! CLI binary for pdf2img.
//!
//! A thin shim over the library crate: `serve` maps flags to `ServerConfig`
//! and runs the HTTP endpoint; `convert` runs the same pipeline locally with
//! no server and no authentication.

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::{Parser, Subcommand};
use pdf2img::{convert_input, server, ConvertConfig, ConvertResponse, PageImageFormat, ServerConfig};
use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Run the HTTP endpoint with auth
  API_KEY=secret pdf2img serve --bind 0.0.0.0:8080

  # Call it
  curl -X POST http://localhost:8080/api/convert \
    -H 'x-api-key: secret' -H 'content-type: application/pdf' \
    --data-binary @document.pdf

  # Local conversion, no server involved
  pdf2img convert document.pdf -o pages/

  # Convert from a URL, JPEG output, JSON to stdout
  pdf2img convert https://example.com/doc.pdf --format jpeg --json

ENVIRONMENT VARIABLES:
  API_KEY           Shared secret for the x-api-key header (serve)
  PDFIUM_LIB_PATH   Directory containing libpdfium — skips the system lookup
"#;

/// Render PDF pages to raster images.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2img",
    version,
    about = "Render PDF pages to raster images — HTTP endpoint and local CLI",
    arg_required_else_help = true,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP conversion endpoint.
    Serve(ServeArgs),
    /// Convert a local file or URL without a server.
    Convert(ConvertArgs),
}

#[derive(clap::Args, Debug)]
struct ServeArgs {
    /// Address to bind.
    #[arg(long, env = "PDF2IMG_BIND", default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Shared secret for the x-api-key header; omit to disable auth.
    #[arg(long, env = "API_KEY")]
    api_key: Option<String>,

    /// Maximum request body size in bytes.
    #[arg(long, env = "PDF2IMG_MAX_BODY_BYTES", default_value_t = 10 * 1024 * 1024)]
    max_body_bytes: usize,

    /// Forward internal error text in the `details` field of error bodies.
    #[arg(long, env = "PDF2IMG_EXPOSE_DETAILS")]
    expose_details: bool,

    #[command(flatten)]
    render: RenderArgs,
}

#[derive(clap::Args, Debug)]
struct ConvertArgs {
    /// Local PDF file path or HTTP/HTTPS URL.
    input: String,

    /// Write page images into this directory.
    #[arg(short, long, default_value = ".", conflicts_with = "json")]
    output: PathBuf,

    /// Emit the response JSON (data URIs) to stdout instead of files.
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    render: RenderArgs,
}

/// Render knobs shared by both subcommands.
#[derive(clap::Args, Debug)]
struct RenderArgs {
    /// Scale factor applied to each page's native size (0.25–8.0).
    #[arg(long, env = "PDF2IMG_SCALE", default_value_t = 2.0)]
    scale: f32,

    /// Output image format.
    #[arg(long, env = "PDF2IMG_FORMAT", value_enum, default_value = "png")]
    format: FormatArg,

    /// JPEG quality (1–100); ignored for PNG.
    #[arg(long, env = "PDF2IMG_JPEG_QUALITY", default_value_t = 80,
          value_parser = clap::value_parser!(u8).range(1..=100))]
    jpeg_quality: u8,

    /// Timeout for URL-sourced input, in seconds.
    #[arg(long, env = "PDF2IMG_FETCH_TIMEOUT", default_value_t = 30)]
    fetch_timeout: u64,

    /// Directory containing the pdfium shared library.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Png,
    Jpeg,
}

impl From<FormatArg> for PageImageFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Png => PageImageFormat::Png,
            FormatArg::Jpeg => PageImageFormat::Jpeg,
        }
    }
}

impl RenderArgs {
    fn to_config(&self) -> Result<ConvertConfig> {
        let mut builder = ConvertConfig::builder()
            .scale(self.scale)
            .format(self.format.into())
            .jpeg_quality(self.jpeg_quality)
            .fetch_timeout_secs(self.fetch_timeout);
        if let Some(ref dir) = self.pdfium_lib {
            builder = builder.pdfium_lib_path(dir);
        }
        builder.build().context("invalid render configuration")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Serve(args) => run_serve(args).await,
        Command::Convert(args) => run_convert(args, cli.quiet).await,
    }
}

async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = ServerConfig {
        bind_addr: args.bind,
        api_key: args.api_key,
        max_body_bytes: args.max_body_bytes,
        expose_error_details: args.expose_details,
        convert: args.render.to_config()?,
    };

    server::serve(config).await.context("server failed")
}

async fn run_convert(args: ConvertArgs, quiet: bool) -> Result<()> {
    let config = args.render.to_config()?;

    let output = convert_input(&args.input, &config)
        .await
        .with_context(|| format!("failed to convert '{}'", args.input))?;
    let stats = output.stats.clone();

    if args.json {
        let response = ConvertResponse::from(output);
        let json = serde_json::to_string_pretty(&response).context("failed to serialise output")?;
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(json.as_bytes())?;
        handle.write_all(b"\n")?;
    } else {
        tokio::fs::create_dir_all(&args.output)
            .await
            .with_context(|| format!("failed to create {}", args.output.display()))?;

        let ext = config.format.extension();
        for page in &output.pages {
            let bytes = decode_data_uri(&page.data)?;
            let path = args.output.join(format!("page_{:04}.{ext}", page.page));
            tokio::fs::write(&path, &bytes)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
    }

    if !quiet {
        eprintln!(
            "✔ {} pages  render {}ms  encode {}ms  total {}ms",
            stats.page_count,
            stats.render_duration_ms,
            stats.encode_duration_ms,
            stats.total_duration_ms,
        );
    }

    Ok(())
}

/// Strip the `data:<mime>;base64,` header and decode the payload.
fn decode_data_uri(data: &str) -> Result<Vec<u8>> {
    let (_, payload) = data
        .split_once(";base64,")
        .context("malformed data URI in conversion output")?;
    STANDARD.decode(payload).context("invalid base64 in data URI")
}
