//! inkcard CLI - render an HTML card to an image
//!
//! Reads one HTML document with inline `<style>` blocks, lays it out at a
//! fixed width and writes a single JPEG or PNG.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use owo_colors::OwoColorize;

use inkcard_css::{BoxContent, BoxKind, LayoutBox};
use inkcard_render::{OutputFormat, RenderConfig, Renderer};

#[derive(Parser, Debug)]
#[command(name = "inkcard")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Render card.html to card.jpg
    inkcard card.html

    # PNG output at a fixed width
    inkcard card.html --format png --width 750 -o out.png

    # Fonts live in ./assets/fonts, unstyled text uses NotoSans.ttf
    inkcard card.html --font-dir assets/fonts --font NotoSans.ttf

    # Print the layout tree instead of rendering
    inkcard card.html --layout

    # Render inline HTML
    inkcard --html '<body style="width:100px;height:40px;background-color:teal"></body>' -o teal.png
"#)]
struct Cli {
    /// HTML file to render
    #[arg(value_name = "FILE", conflicts_with = "html", required_unless_present = "html")]
    path: Option<PathBuf>,

    /// Render an HTML string instead of a file
    #[arg(long, value_name = "HTML")]
    html: Option<String>,

    /// Output file (default: input path with the format's extension)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// JSON configuration file; flags override its values
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Root width in pixels, overriding the body's `width`
    #[arg(long)]
    width: Option<u32>,

    /// Directory holding font files
    #[arg(long, value_name = "DIR")]
    font_dir: Option<PathBuf>,

    /// Font file used for text without a `font-family`
    #[arg(long, value_name = "FAMILY")]
    font: Option<String>,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<Format>,

    /// JPEG quality (1-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: Option<u8>,

    /// Print the layout tree with box rectangles instead of rendering
    #[arg(long)]
    layout: bool,

    /// Print the layout tree as JSON instead of rendering
    #[arg(long, conflicts_with = "layout")]
    json: bool,

    /// Log pipeline stages (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Jpeg,
    Png,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Jpeg => Self::Jpeg,
            Format::Png => Self::Png,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .init();

    let config = build_config(&cli)?;
    let html = match (&cli.html, &cli.path) {
        (Some(html), _) => html.clone(),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("failed to read '{}'", path.display()))?,
        (None, None) => bail!("no input: pass a FILE or --html"),
    };
    let mut renderer = Renderer::new(config);

    if cli.layout || cli.json {
        let root = renderer.layout_html(&html)?;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&root)?);
        } else {
            print_layout(&root, 0);
        }
        return Ok(());
    }

    let output = output_path(&cli, renderer.config().format)?;
    let rendered = renderer.render_html(&html)?;
    fs::write(&output, &rendered.bytes)
        .with_context(|| format!("failed to write '{}'", output.display()))?;

    println!(
        "{} {} ({}x{}, {} bytes)",
        "Rendered".green().bold(),
        output.display(),
        rendered.width,
        rendered.height,
        rendered.bytes.len()
    );
    Ok(())
}

/// Defaults, then the config file, then flags.
fn build_config(cli: &Cli) -> anyhow::Result<RenderConfig> {
    let mut config = match &cli.config {
        Some(path) => RenderConfig::from_json_file(path)?,
        None => RenderConfig::default(),
    };
    if let Some(width) = cli.width {
        config.root_width = Some(width);
    }
    if let Some(dir) = &cli.font_dir {
        config.font_dir.clone_from(dir);
    }
    if let Some(font) = &cli.font {
        config.default_font_family = Some(font.clone());
    }
    if let Some(format) = cli.format {
        config.format = format.into();
    }
    if let Some(quality) = cli.quality {
        config.jpeg_quality = quality;
    }
    // Relative image sources in a file resolve next to the file.
    if config.base_url.is_none()
        && let Some(dir) = cli.path.as_deref().and_then(Path::parent)
        && !dir.as_os_str().is_empty()
    {
        config.base_url = Some(format!("{}/", dir.display()));
    }
    Ok(config)
}

fn output_path(cli: &Cli, format: OutputFormat) -> anyhow::Result<PathBuf> {
    if let Some(output) = &cli.output {
        return Ok(output.clone());
    }
    match &cli.path {
        Some(path) => Ok(path.with_extension(format.extension())),
        None => bail!("--html needs an output file (-o)"),
    }
}

/// Print the box tree with each box's container rectangle.
fn print_layout(layout_box: &LayoutBox, depth: usize) {
    let indent = "  ".repeat(depth);
    let rect = layout_box.dimensions.container;
    let geometry = format!("({}, {}) {}x{}", rect.x1, rect.y1, rect.width(), rect.height());

    match (&layout_box.kind, &layout_box.content) {
        (_, BoxContent::Text(text)) => {
            println!("{indent}{} {}", format!("{text:?}").yellow(), geometry.dimmed());
        }
        (BoxKind::Element(tag), BoxContent::Image(image)) => {
            println!(
                "{indent}{} {} [{}x{} image]",
                format!("<{tag}>").cyan(),
                geometry.dimmed(),
                image.width(),
                image.height()
            );
        }
        (BoxKind::Element(tag), _) => {
            println!("{indent}{} {}", format!("<{tag}>").cyan(), geometry.dimmed());
        }
        (BoxKind::Text, _) => println!("{indent}#text {}", geometry.dimmed()),
    }

    for child in &layout_box.children {
        print_layout(child, depth + 1);
    }
}
