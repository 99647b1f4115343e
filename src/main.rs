use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use xml_indent::bulk;
use xml_indent::{FormatParams, FormatterBuilder};

/// Re-indent XML documents.
///
/// With no input path, every `.xml` and `.xsd` file under the current
/// directory is reformatted in place.
#[derive(Debug, Parser)]
#[command(name = "xml-indent", version)]
struct Cli {
    /// File or directory to process.
    input: Option<PathBuf>,

    /// Where to write the result; the input is rewritten in place when
    /// omitted. Only valid when the input is a single file.
    output: Option<PathBuf>,

    /// Indent with tabs (default).
    #[arg(short = 't', conflicts_with = "spaces")]
    tabs: bool,

    /// Indent with N spaces per level instead of tabs.
    #[arg(short = 's', value_name = "N")]
    spaces: Option<usize>,

    /// Keep existing line breaks, fix indentation only (default).
    #[arg(short = 'i', conflicts_with = "full")]
    indent_only: bool,

    /// Full pretty-print: reshape all whitespace between tags.
    #[arg(short = 'f')]
    full: bool,

    /// Collapse empty element pairs like `<a></a>` into `<a/>`.
    #[arg(short = 'a', conflicts_with = "no_auto_close")]
    auto_close: bool,

    /// Keep empty element pairs as written (default).
    #[arg(short = 'n')]
    no_auto_close: bool,
}

impl Cli {
    fn params(&self) -> FormatParams {
        let indent = match self.spaces {
            Some(n) if !self.tabs => " ".repeat(n),
            _ => "\t".to_string(),
        };
        let builder = FormatterBuilder::new()
            .indent_chars(indent)
            .indent_only(self.indent_only || !self.full)
            .auto_close_tags(self.auto_close && !self.no_auto_close);
        builder.params().clone()
    }
}

fn run(cli: &Cli) -> xml_indent::Result<()> {
    let params = cli.params();
    match (&cli.input, &cli.output) {
        (Some(input), Some(output)) if input.is_file() => {
            bulk::format_file_to(input, output, &params)?;
        }
        (Some(input), Some(_)) => {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{}: output path requires a file input", input.display()),
            )
            .into());
        }
        (Some(input), None) => {
            let changed = bulk::format_path(input, &params)?;
            info!(changed, "done");
        }
        (None, _) => {
            let changed = bulk::format_path(".", &params)?;
            info!(changed, "done");
        }
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("xml-indent: {}", err);
        process::exit(1);
    }
}
