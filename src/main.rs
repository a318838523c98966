use anyhow::{bail, Context, Result};
use clap::Parser;
use polymer_rename::{
    rename_html, rename_js, Diagnostics, OutputOptions, RenameError, RenameMap,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "polymer-rename",
    about = "Applies a property rename map to Polymer HTML and JavaScript",
    version
)]
struct Cli {
    /// Rename map: Closure `original:renamed` lines, or a `.json` object.
    #[arg(long = "property-map")]
    property_map: PathBuf,

    /// The `.html` or `.js` file to rename.
    #[arg(long)]
    input: PathBuf,

    #[arg(long = "js-pretty-print")]
    js_pretty_print: bool,

    #[arg(long = "prefer-single-quotes")]
    prefer_single_quotes: bool,

    /// Write here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,

    /// JavaScript input only.
    #[arg(long = "output-source-map")]
    output_source_map: Option<PathBuf>,
}

enum InputKind {
    Html,
    Js,
}

fn input_kind(path: &Path) -> Result<InputKind, RenameError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("html") | Some("htm") => Ok(InputKind::Html),
        Some("js") => Ok(InputKind::Js),
        _ => Err(RenameError::UnsupportedInput {
            path: path.display().to_string(),
        }),
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let renames = RenameMap::load(&cli.property_map).with_context(|| {
        format!(
            "Unable to read property map file: {}",
            cli.property_map.display()
        )
    })?;
    let kind = input_kind(&cli.input)?;
    let source = fs::read_to_string(&cli.input)
        .with_context(|| format!("Unable to read input file: {}", cli.input.display()))?;

    let mut diagnostics = Diagnostics::new();
    let parse_failure = || format!("Error encountered parsing {}.", cli.input.display());

    let (renamed, source_map) = match kind {
        InputKind::Html => {
            if cli.output_source_map.is_some() {
                bail!("--output-source-map only applies to JavaScript input");
            }
            let html = rename_html(&renames, &source, &mut diagnostics).with_context(parse_failure)?;
            (html, None)
        }
        InputKind::Js => {
            let options = OutputOptions {
                pretty_print: cli.js_pretty_print,
                prefer_single_quotes: cli.prefer_single_quotes,
                source_map_path: cli.output_source_map.as_ref().map(|_| cli.input.clone()),
            };
            let printed =
                rename_js(&renames, &source, &options, &mut diagnostics).with_context(parse_failure)?;
            (printed.code, printed.source_map)
        }
    };

    for diagnostic in diagnostics.iter() {
        eprintln!("[polymer-rename] warning: {}", diagnostic);
    }

    match &cli.output {
        Some(path) => fs::write(path, &renamed)
            .with_context(|| format!("Unable to write output file: {}", path.display()))?,
        None => print!("{}", renamed),
    }

    if let (Some(path), Some(map)) = (&cli.output_source_map, source_map) {
        fs::write(path, map)
            .with_context(|| format!("Unable to write source map: {}", path.display()))?;
    }

    Ok(())
}
