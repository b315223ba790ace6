use std::{
    fs::File,
    io::{BufReader, Read as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use colorlens::{
    Action, ColorMatrix, DocumentSession, FilterCatalog, FilterKind, JsonFileStore,
    MemoryDocument, ProfileService, SettingsDraft, SettingsRecord, StoredSettings, compose,
    load_settings, save_settings, upgrade_settings,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "colorlens", version)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the custom-mapping color matrix for three target colors.
    Matrix(MatrixArgs),
    /// List catalog filters.
    Catalog,
    /// Compose settings into a CSS filter and the primitives it references.
    Compose(SettingsArg),
    /// Apply settings to an in-memory document and print the result.
    Apply(SettingsArg),
    /// Manage saved profiles.
    Profile(ProfileArgs),
    /// Show or save the persisted settings.
    Settings(SettingsArgs),
}

#[derive(Parser, Debug)]
struct MatrixArgs {
    /// Target for the source red channel.
    #[arg(long, default_value = "#ff0000")]
    background: String,

    /// Target for the source green channel.
    #[arg(long, default_value = "#00ff00")]
    text: String,

    /// Target for the source blue channel.
    #[arg(long, default_value = "#0000ff")]
    highlight: String,

    /// Print the 20 coefficients as a JSON array instead of rows.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct SettingsArg {
    /// Settings JSON file in any known layout, or `-` for stdin.
    #[arg(long)]
    settings: PathBuf,
}

#[derive(Args, Debug)]
struct StoreArg {
    /// JSON key-value file holding settings and profiles.
    #[arg(long, default_value = "colorlens.json")]
    store: PathBuf,
}

#[derive(Parser, Debug)]
struct ProfileArgs {
    #[command(flatten)]
    store: StoreArg,

    #[command(subcommand)]
    cmd: ProfileCommand,
}

#[derive(Subcommand, Debug)]
enum ProfileCommand {
    /// List profiles in insertion order.
    List,
    /// Save a profile, overwriting one with the same name.
    Save {
        /// Profile name.
        #[arg(long)]
        name: String,
        /// Settings to save; defaults to the persisted current settings.
        #[arg(long)]
        settings: Option<PathBuf>,
    },
    /// Rename a profile.
    Rename {
        /// Current name.
        #[arg(long)]
        from: String,
        /// New name.
        #[arg(long)]
        to: String,
    },
    /// Delete a profile.
    Delete {
        /// Profile name.
        #[arg(long)]
        name: String,
    },
    /// Print one profile as JSON.
    Show {
        /// Profile name.
        #[arg(long)]
        name: String,
    },
    /// Make a profile's settings the current settings.
    Activate {
        /// Profile name.
        #[arg(long)]
        name: String,
    },
}

#[derive(Parser, Debug)]
struct SettingsArgs {
    #[command(flatten)]
    store: StoreArg,

    #[command(subcommand)]
    cmd: SettingsCommand,
}

#[derive(Subcommand, Debug)]
enum SettingsCommand {
    /// Print the persisted settings (upgraded to the current layout).
    Show,
    /// Normalize and persist settings.
    Save(SettingsArg),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Matrix(args) => cmd_matrix(args),
        Command::Catalog => cmd_catalog(),
        Command::Compose(args) => cmd_compose(args),
        Command::Apply(args) => cmd_apply(args),
        Command::Profile(args) => cmd_profile(args),
        Command::Settings(args) => cmd_settings(args),
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // Logs go to stderr; stdout carries command output only.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn read_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("read settings from stdin")?;
        return serde_json::from_str(&text).context("parse settings JSON from stdin");
    }
    let f = File::open(path).with_context(|| format!("open settings '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse settings JSON '{}'", path.display()))
}

fn read_settings(path: &Path) -> anyhow::Result<SettingsRecord> {
    let value = read_json(path)?;
    let (record, report) = upgrade_settings(&value)?;
    if !report.discarded_fields.is_empty() {
        eprintln!("ignored fields: {}", report.discarded_fields.join(", "));
    }
    Ok(record)
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_matrix(args: MatrixArgs) -> anyhow::Result<()> {
    let m = ColorMatrix::build(&args.background, &args.text, &args.highlight)?;
    if args.json {
        print_json(&m.to_array().to_vec())
    } else {
        print!("{m}");
        Ok(())
    }
}

fn cmd_catalog() -> anyhow::Result<()> {
    for e in FilterCatalog::global().entries() {
        let kind = match e.kind {
            FilterKind::Matrix(_) => "matrix".to_owned(),
            FilterKind::CssValue("") => "identity".to_owned(),
            FilterKind::CssValue(css) => css.to_owned(),
        };
        println!("{:<14} {:<16} {kind}", e.id, e.display_name);
    }
    Ok(())
}

fn cmd_compose(args: SettingsArg) -> anyhow::Result<()> {
    let record = read_settings(&args.settings)?;
    let composed = compose(&record);
    let primitives: Vec<_> = composed
        .primitives()
        .into_iter()
        .map(|p| {
            serde_json::json!({
                "id": p.id,
                "custom": p.custom,
                "values": p.matrix.to_values_attr(),
            })
        })
        .collect();
    print_json(&serde_json::json!({
        "cssFilter": composed.css_filter,
        "stages": composed.pipeline,
        "primitives": primitives,
    }))
}

fn cmd_apply(args: SettingsArg) -> anyhow::Result<()> {
    let record = read_settings(&args.settings)?;
    let mut session = DocumentSession::new(MemoryDocument::new());
    let outcome = session.handle_message(Action::ApplySettings {
        settings: SettingsDraft::from(&record),
    });
    if let Some(err) = &outcome.error {
        anyhow::bail!("apply failed: {err}");
    }
    let markup = session.document().container_markup()?;
    print_json(&serde_json::json!({
        "outcome": outcome,
        "rootFilter": session.document().root_filter(),
        "markup": markup,
    }))
}

fn cmd_profile(args: ProfileArgs) -> anyhow::Result<()> {
    let path = args.store.store;
    let mut svc = ProfileService::open(JsonFileStore::new(&path))
        .with_context(|| format!("open profile store '{}'", path.display()))?;

    match args.cmd {
        ProfileCommand::List => {
            for p in svc.list() {
                println!("{}\t{}\t{}", p.name, p.filter_id, p.saved_at.to_rfc3339());
            }
        }
        ProfileCommand::Save { name, settings } => {
            let record = match settings {
                Some(p) => read_settings(&p)?,
                None => load_settings(svc.kv())?.0,
            };
            if svc.get(&name).is_some() {
                eprintln!("overwriting profile '{}'", name.trim());
            }
            svc.save(&name, record)?;
            eprintln!("saved profile '{}'", name.trim());
        }
        ProfileCommand::Rename { from, to } => {
            svc.rename(&from, &to)?;
            eprintln!("renamed '{from}' to '{to}'");
        }
        ProfileCommand::Delete { name } => {
            svc.delete(&name)?;
            eprintln!("deleted '{name}'");
        }
        ProfileCommand::Show { name } => {
            let profile = svc
                .get(&name)
                .with_context(|| format!("profile '{name}' not found"))?;
            print_json(profile)?;
        }
        ProfileCommand::Activate { name } => {
            let record = svc.activate(&name)?;
            let mut kv = svc.into_inner();
            save_settings(&mut kv, &record)?;
            print_json(&StoredSettings::current(record))?;
        }
    }
    Ok(())
}

fn cmd_settings(args: SettingsArgs) -> anyhow::Result<()> {
    let path = args.store.store;
    let mut kv = JsonFileStore::new(&path);
    match args.cmd {
        SettingsCommand::Show => {
            let (record, report) = load_settings(&kv)
                .with_context(|| format!("load settings from '{}'", path.display()))?;
            if !report.is_current() {
                eprintln!(
                    "upgraded from schema v{}; discarded: [{}]",
                    report.from_version,
                    report.discarded_fields.join(", ")
                );
            }
            print_json(&StoredSettings::current(record))
        }
        SettingsCommand::Save(a) => {
            let record = read_settings(&a.settings)?;
            save_settings(&mut kv, &record)
                .with_context(|| format!("save settings to '{}'", path.display()))?;
            print_json(&StoredSettings::current(record))
        }
    }
}
