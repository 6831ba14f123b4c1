//! CLI tool for generating and inspecting customer decks.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use deckgen_core::{GenerationRequest, ImageFormat, Presentation, Shape, Upload};
use deckgen_pptx::{PptxParser, PptxWriter};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

/// Generate one-slide customer decks, or inspect existing ones.
#[derive(Parser, Debug)]
#[command(name = "deckgen")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a deck with the customer's name and an optional image
    Generate {
        /// Customer name to place on the slide
        #[arg(short, long)]
        name: String,

        /// Image to place below the name
        #[arg(short, long)]
        image: Option<PathBuf>,

        /// Template presentation (read for diagnostics only)
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Output file
        #[arg(short, long, default_value = "generated.pptx")]
        output: PathBuf,
    },

    /// Print the shapes on every slide of one or more .pptx files
    Inspect {
        /// Input PowerPoint file(s) (.pptx)
        #[arg(required = true)]
        input: Vec<PathBuf>,

        /// Print JSON instead of a text summary
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    match args.command {
        Command::Generate {
            name,
            image,
            template,
            output,
        } => {
            let request = build_request(name, template.as_deref(), image.as_deref())?;
            generate(request, &output)?;
            if args.verbose {
                eprintln!("Written to: {}", output.display());
            }
        }
        Command::Inspect { input, json } => {
            for input_path in &input {
                match inspect_file(input_path) {
                    Ok(presentation) if json => {
                        println!("{}", serde_json::to_string_pretty(&presentation)?);
                    }
                    Ok(presentation) => print!("{}", summarize(&presentation)),
                    Err(e) => eprintln!("Error processing {}: {:#}", input_path.display(), e),
                }
            }
        }
    }

    Ok(())
}

/// Assemble a generation request from files on disk.
fn build_request(name: String, template: Option<&Path>, image: Option<&Path>) -> Result<GenerationRequest> {
    let template = match template {
        Some(path) => read_upload(path)?,
        None => Upload::default(),
    };

    let mut request = GenerationRequest::new(template, name);

    if let Some(path) = image {
        let upload = read_upload(path)?;
        let format = ImageFormat::from_magic(&upload.data)
            .or_else(|| {
                path.extension()
                    .and_then(|e| e.to_str())
                    .and_then(ImageFormat::from_extension)
            })
            .ok_or_else(|| anyhow::anyhow!("Could not detect image format of {}", path.display()))?;
        request = request.with_image(upload.with_content_type(format.mime_type()));
    }

    Ok(request)
}

fn read_upload(path: &Path) -> Result<Upload> {
    let data = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let mut upload = Upload::new(data);
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        upload = upload.with_filename(name);
    }
    Ok(upload)
}

/// Lay out the deck and write it to `output`.
fn generate(request: GenerationRequest, output: &Path) -> Result<()> {
    match request.template_format() {
        Some(format) => log::debug!("Template detected as {:?} ({} bytes)", format, request.template.len()),
        None if request.template.is_empty() => log::debug!("No template supplied"),
        None => log::warn!("Template format not recognized ({} bytes)", request.template.len()),
    }

    let presentation = request
        .build_presentation()
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    let bytes = PptxWriter::new()
        .to_bytes(&presentation)
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let mut file =
        File::create(output).with_context(|| format!("Failed to create {}", output.display()))?;
    file.write_all(&bytes)
        .with_context(|| format!("Failed to write to {}", output.display()))?;

    Ok(())
}

/// Parse a .pptx file from disk.
fn inspect_file(input_path: &Path) -> Result<Presentation> {
    let file = File::open(input_path)
        .with_context(|| format!("Failed to open {}", input_path.display()))?;
    let reader = BufReader::new(file);

    let filename = input_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");

    PptxParser::new()
        .parse(reader, filename)
        .map_err(|e| anyhow::anyhow!("{}", e))
}

/// Human-readable listing of slides and shapes.
fn summarize(presentation: &Presentation) -> String {
    let mut out = format!(
        "{} ({} slide(s), {:.2}in x {:.2}in)\n",
        presentation.title,
        presentation.slides.len(),
        presentation.size.width.as_inches(),
        presentation.size.height.as_inches()
    );

    for slide in &presentation.slides {
        out.push_str(&format!("  Slide {}\n", slide.number));
        for shape in &slide.shapes {
            let frame = shape.frame();
            let detail = match shape {
                Shape::TextBox(t) => format!("{:?}", t.text),
                Shape::Picture(p) => format!("{} bytes of {:?}", p.media.len(), p.media.format),
            };
            out.push_str(&format!(
                "    {} at ({:.2}in, {:.2}in) {:.2}in x {:.2}in: {}\n",
                shape.kind(),
                frame.x.as_inches(),
                frame.y.as_inches(),
                frame.width.as_inches(),
                frame.height.as_inches(),
                detail
            ));
        }
    }

    out
}
