use std::path::PathBuf;

use anyhow::Context as _;
use catshare_cards::{
    CardConfig, CardRenderer, CardSurface, CardTarget, FontBook, FsAssetStore,
    FsImageSource, JsonCatalogue, JsonFileSettings, ShareHandle, ShareOutcome, ShareResolver,
    ShareSheet,
};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "catshare", version)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Pipeline config JSON (roots, settings file, fonts).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the export root cards are written under.
    #[arg(long, global = true)]
    export_root: Option<PathBuf>,

    /// Override the data root stored product images are read from.
    #[arg(long, global = true)]
    data_root: Option<PathBuf>,

    /// Override the settings JSON file.
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Override the regular font file.
    #[arg(long, global = true)]
    font: Option<PathBuf>,

    /// Override the italic font file.
    #[arg(long, global = true)]
    italic_font: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render missing cards for the given product ids.
    Render(BatchArgs),
    /// Render missing cards and hand their handles to the share sheet (stdout).
    Share(ShareArgs),
    /// Delete every card of a product.
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// Catalogue JSON (array of product records).
    #[arg(long)]
    catalogue: PathBuf,

    /// Folder label; `Wholesale` prints wholesale prices, anything else resell prices.
    #[arg(long, default_value = "Wholesale")]
    label: String,

    /// Product ids, processed in order.
    #[arg(required = true)]
    ids: Vec<String>,
}

#[derive(Args, Debug)]
struct ShareArgs {
    #[command(flatten)]
    batch: BatchArgs,

    /// Only share cards that already exist.
    #[arg(long, default_value_t = false)]
    no_render: bool,

    /// Simulate the user dismissing the share sheet.
    #[arg(long, default_value_t = false)]
    cancel: bool,
}

#[derive(Args, Debug)]
struct DeleteArgs {
    /// Product id whose cards are removed.
    #[arg(long)]
    id: String,

    /// Folder labels to clean up.
    #[arg(long = "label", default_values_t = ["Wholesale".to_string(), "Resell".to_string(), "Retail".to_string()])]
    labels: Vec<String>,
}

/// Share sheet that lists handles on stderr.
struct StderrShareSheet {
    cancel: bool,
}

impl ShareSheet for StderrShareSheet {
    fn share(
        &mut self,
        handles: &[ShareHandle],
        title: &str,
    ) -> catshare_cards::CardResult<ShareOutcome> {
        eprintln!("{title}: {} card(s)", handles.len());
        for h in handles {
            eprintln!("  {h}");
        }
        Ok(if self.cancel {
            ShareOutcome::Cancelled
        } else {
            ShareOutcome::Shared
        })
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = load_config(&cli.common)?;
    match cli.cmd {
        Command::Render(args) => cmd_render(&cfg, args),
        Command::Share(args) => cmd_share(&cfg, args),
        Command::Delete(args) => cmd_delete(&cfg, args),
    }
}

fn load_config(args: &CommonArgs) -> anyhow::Result<CardConfig> {
    let mut cfg = match &args.config {
        Some(p) => CardConfig::from_path(p)?,
        None => CardConfig::default(),
    };
    if let Some(p) = &args.export_root {
        cfg.export_root = p.clone();
    }
    if let Some(p) = &args.data_root {
        cfg.data_root = p.clone();
    }
    if let Some(p) = &args.settings {
        cfg.settings_path = p.clone();
    }
    if let Some(p) = &args.font {
        cfg.fonts.regular = Some(p.clone());
    }
    if let Some(p) = &args.italic_font {
        cfg.fonts.italic = Some(p.clone());
    }
    Ok(cfg)
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{s}");
    Ok(())
}

fn cmd_render(cfg: &CardConfig, args: BatchArgs) -> anyhow::Result<()> {
    let store = FsAssetStore::new(&cfg.export_root);
    let catalogue = JsonCatalogue::from_path(&args.catalogue)?;
    let images = FsImageSource::new(&cfg.data_root);
    let settings = JsonFileSettings::new(&cfg.settings_path);
    let fonts = FontBook::from_paths(&cfg.fonts)?;

    let mut renderer = CardRenderer::new(&store, &catalogue, &images, &settings, fonts);
    let mut surface = CardSurface::acquire()?;
    let target = CardTarget::for_label(args.label);
    let mut progress = |done: usize, total: usize| eprintln!("rendered {done}/{total}");
    let batch = renderer.render_batch(&mut surface, &args.ids, &target, &mut progress)?;

    for s in batch.successes.iter().filter(|s| s.rendered) {
        eprintln!("wrote {}", cfg.export_root.join(&s.path).display());
    }
    print_json(&batch)
}

fn cmd_share(cfg: &CardConfig, args: ShareArgs) -> anyhow::Result<()> {
    let store = FsAssetStore::new(&cfg.export_root);
    let mut sheet = StderrShareSheet { cancel: args.cancel };
    let target = CardTarget::for_label(args.batch.label);

    let summary = if args.no_render {
        catshare_cards::share_existing_ids(
            &ShareResolver::new(&store),
            &args.batch.ids,
            &target.folder_label,
            &mut sheet,
        )?
    } else {
        let catalogue = JsonCatalogue::from_path(&args.batch.catalogue)?;
        let images = FsImageSource::new(&cfg.data_root);
        let settings = JsonFileSettings::new(&cfg.settings_path);
        let fonts = FontBook::from_paths(&cfg.fonts)?;
        let mut renderer = CardRenderer::new(&store, &catalogue, &images, &settings, fonts);
        let mut surface = CardSurface::acquire()?;
        catshare_cards::share_products(
            &mut renderer,
            &mut surface,
            &args.batch.ids,
            &target,
            &mut sheet,
            &mut catshare_cards::NoProgress,
        )?
    };
    print_json(&summary)
}

fn cmd_delete(cfg: &CardConfig, args: DeleteArgs) -> anyhow::Result<()> {
    let store = FsAssetStore::new(&cfg.export_root);
    let labels: Vec<&str> = args.labels.iter().map(String::as_str).collect();
    let n = catshare_cards::remove_product_assets(&store, &args.id, &labels)?;
    eprintln!("removed cards of '{}' in {n} folder(s)", args.id);
    Ok(())
}
