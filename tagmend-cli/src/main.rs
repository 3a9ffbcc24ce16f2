use anyhow::{Context, bail};
use camino::Utf8PathBuf;
use clap::Parser;
use std::process::ExitCode;
use tagmend_core::{
    bludgeon_dir, bludgeon_tag, render_batch_summary, render_clean, render_file_report,
};
use tagmend_types::{ALL_FIXES, EVERYTHING_NAME, FixSet, NONE_NAME};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "tagmend",
    version,
    about = "Detect and repair defective tag files."
)]
struct Cli {
    /// Tag to bludgeon, as a path relative to the tags directory.
    #[arg(conflicts_with = "all")]
    tag: Option<String>,

    /// Tags directory.
    #[arg(short = 't', long, default_value = "tags")]
    tags: Utf8PathBuf,

    /// Interpret TAG as a filesystem path instead of a tags-relative path.
    #[arg(short = 'P', long, requires = "tag")]
    fs_path: bool,

    /// Bludgeon every tag under the tags directory.
    #[arg(short = 'a', long)]
    all: bool,

    /// Fix to apply. Repeatable; also accepts "none" and "everything".
    /// With no -T, issues are reported but nothing is written.
    #[arg(short = 'T', long = "fix", value_name = "FIX")]
    fixes: Vec<String>,

    /// List the available fixes and exit.
    #[arg(long)]
    list_fixes: bool,

    /// Output format for --list-fixes (text, json).
    #[arg(long, value_enum, default_value = "text", requires = "list_fixes")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.list_fixes {
        return list_fixes(cli.format);
    }

    // Resolve the fix set before touching any file so a typo in one name
    // cannot leave a batch half-applied.
    let fixes = FixSet::from_names(cli.fixes.iter().map(String::as_str))?;

    if cli.all {
        run_batch(&cli.tags, fixes)
    } else if let Some(tag) = cli.tag.as_deref() {
        let path = if cli.fs_path {
            Utf8PathBuf::from(tag)
        } else {
            cli.tags.join(tag)
        };
        run_single(&path, fixes)
    } else {
        bail!("specify a tag to bludgeon, or --all for the whole tags directory");
    }
}

fn run_single(path: &Utf8PathBuf, fixes: FixSet) -> anyhow::Result<()> {
    debug!(%path, selected = fixes.len(), "bludgeoning tag");
    let outcome = bludgeon_tag(path, fixes).context("bludgeon tag")?;
    if outcome.bludgeoned {
        for line in render_file_report(path, &outcome) {
            println!("{line}");
        }
    } else {
        println!("{}", render_clean(path));
    }
    Ok(())
}

fn run_batch(tags: &Utf8PathBuf, fixes: FixSet) -> anyhow::Result<()> {
    // Per-file failures are reported and counted, never fatal.
    let batch = bludgeon_dir(tags, fixes, &mut |path, result| match result {
        Ok(outcome) => {
            for line in render_file_report(path, &outcome) {
                println!("{line}");
            }
        }
        Err(err) => eprintln!("error: {:#}", anyhow::Error::new(err)),
    })
    .with_context(|| format!("walk tags directory {tags}"))?;

    println!("{}", render_batch_summary(&batch));
    Ok(())
}

fn list_fixes(format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            println!("Available fixes:\n");
            for fix in ALL_FIXES {
                let info = fix.info();
                println!("  {:<28} {}", info.name, info.description);
            }
            println!();
            println!(
                "\"{NONE_NAME}\" clears the set; \"{EVERYTHING_NAME}\" selects every fix."
            );
        }
        OutputFormat::Json => {
            let infos: Vec<_> = ALL_FIXES.iter().map(|fix| fix.info()).collect();
            println!("{}", serde_json::to_string_pretty(&infos)?);
        }
    }
    Ok(())
}
