use clap::Parser;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use verso::{PipelineBuilder, PipelineError};

// Mimalloc as the global allocator.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Paginates scripture chapters into two body columns over a three-column footnote grid.
#[derive(Parser, Debug)]
#[command(name = "verso", version, about)]
struct Cli {
    /// Layout configuration (JSON, camelCase keys).
    #[arg(long)]
    config: PathBuf,

    /// Chapters to paginate: one chapter object or an array of them.
    #[arg(long)]
    input: PathBuf,

    /// Where to write the book layout as JSON. Defaults to stdout.
    #[arg(long)]
    output: Option<PathBuf>,

    /// TrueType/OpenType file used to measure text. Without it advances are fixed.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Hyphenation dictionary, one `hy-phen-at-ed` entry per line.
    #[arg(long)]
    hyphenation: Option<PathBuf>,

    /// Paginate chapters one after another instead of on the thread pool.
    #[arg(long)]
    sequential: bool,

    /// Flow chapters on from one another; only the first opens a page.
    #[arg(long)]
    continuous: bool,

    /// Print one line per page instead of the JSON layout.
    #[arg(long)]
    summary: bool,
}

fn main() -> Result<(), PipelineError> {
    env_logger::init();
    let cli = Cli::parse();

    let mut builder = PipelineBuilder::new()
        .with_config_file(&cli.config)?
        .with_parallelism(!cli.sequential)
        .with_continuous_flow(cli.continuous);
    if let Some(font) = &cli.font {
        builder = builder.with_font_file(font)?;
    }
    if let Some(dictionary) = &cli.hyphenation {
        builder = builder.with_hyphenation_file(dictionary)?;
    }
    let pipeline = builder.build()?;

    let book = pipeline.paginate_file(&cli.input)?;

    for (chapter, warning) in book.warnings() {
        eprintln!("warning: {}: {}", chapter, warning);
    }

    if cli.summary {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        for page in book.pages() {
            writeln!(out, "{}", page)?;
        }
        writeln!(
            out,
            "{} chapters, {} pages",
            book.chapters.len(),
            book.page_count()
        )?;
        return Ok(());
    }

    let json = serde_json::to_string_pretty(&book)?;
    match &cli.output {
        Some(path) => {
            fs::write(path, json)?;
            log::info!("Wrote {} pages to {}", book.page_count(), path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
