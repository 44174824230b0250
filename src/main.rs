use clap::{Args, Parser, Subcommand};
use labelpress::{
    BatchExportRequest, ExportOutcome, ExportRequest, ExporterBuilder, FontEmbedding, OutputFormat, PipelineError,
    VariableValues, compose,
};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Flattens label layouts and exports them as PDF or Illustrator files.
#[derive(Parser, Debug)]
#[command(name = "labelpress", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a label (or a `{"pages": [...]}` batch) to a vector file.
    Export(ExportArgs),
    /// Print the composed, paint-ordered component list as JSON.
    Flatten {
        input: PathBuf,
        #[arg(long)]
        variables: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct ExportArgs {
    input: PathBuf,
    /// Output file. Without it a uniquely named file is created in the output directory.
    #[arg(short, long)]
    output: Option<PathBuf>,
    #[arg(long, default_value_t = OutputFormat::Ai)]
    format: OutputFormat,
    /// Convert text to glyph outlines.
    #[arg(long)]
    outlined: bool,
    /// Draw hidden paths, a separator mark, then visible paths (AI only).
    #[arg(long)]
    separate_invisible: bool,
    #[arg(long, env = "LABELPRESS_FONT_CATALOG")]
    font_catalog: Option<PathBuf>,
    #[arg(long)]
    font_dir: Vec<PathBuf>,
    /// Let outlined text fall back to installed system fonts.
    #[arg(long)]
    system_fonts: bool,
    /// Always embed font subsets, never complete font files.
    #[arg(long)]
    subset_fonts: bool,
    /// JSON object of variable values, keyed by component id.
    #[arg(long)]
    variables: Option<PathBuf>,
    #[arg(long, env = "LABELPRESS_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,
}

fn load_variables(path: &Path) -> Result<VariableValues, PipelineError> {
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}

fn export(args: ExportArgs) -> Result<ExportOutcome, PipelineError> {
    let mut builder = ExporterBuilder::new().with_format(args.format).with_system_fonts(args.system_fonts);
    if let Some(catalog) = &args.font_catalog {
        builder = builder.with_font_catalog_file(catalog)?;
    }
    for dir in &args.font_dir {
        builder = builder.with_font_dir(dir);
    }
    if let Some(dir) = &args.output_dir {
        builder = builder.with_output_dir(dir);
    }
    if args.subset_fonts {
        builder = builder.with_embedding(FontEmbedding::Subset);
    }
    let exporter = builder.build()?;
    let variables = args.variables.as_deref().map(load_variables).transpose()?;

    let source: Value = serde_json::from_str(&fs::read_to_string(&args.input)?)?;
    if source.get("pages").is_some() {
        let mut batch: BatchExportRequest = serde_json::from_value(source)?;
        batch.outlined |= args.outlined;
        batch.separate_invisible |= args.separate_invisible;
        if let Some(variables) = variables {
            for page in &mut batch.pages {
                page.variables = variables.clone();
            }
        }
        return match &args.output {
            Some(path) => exporter.export_pages_to_path(&batch, path),
            None => exporter.export_pages(&batch),
        };
    }

    let mut request: ExportRequest = serde_json::from_value(source)?;
    request.document.outlined |= args.outlined;
    request.document.separate_invisible |= args.separate_invisible;
    if let Some(variables) = variables {
        request.variables = variables;
    }
    match &args.output {
        Some(path) => exporter.export_to_path(&request, path),
        None => exporter.export(&request),
    }
}

fn flatten(input: &Path, variables: Option<&Path>) -> Result<String, PipelineError> {
    let mut request = ExportRequest::from_path(input)?;
    if let Some(path) = variables {
        request.variables = load_variables(path)?;
    }
    let composed = compose(&request.document, &request.variables);
    for warning in &composed.warnings {
        eprintln!("warning: {}", warning);
    }
    Ok(serde_json::to_string_pretty(&composed)?)
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Export(args) => export(args).map(|outcome| {
            for warning in &outcome.warnings {
                eprintln!("warning: {}", warning);
            }
            println!("{}", outcome.path.display());
        }),
        Command::Flatten { input, variables } => flatten(&input, variables.as_deref()).map(|json| println!("{}", json)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
