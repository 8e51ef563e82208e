use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use mobomojo::build::{write_build_atomic, BuildStore, Configuration, SavedBuild};
use mobomojo::catalog::{
    available_filters, default_catalog, load_catalog, query, Catalog, CatalogQuery, Category,
    SortKey, SortOrder,
};
use mobomojo::compat::{default_rules, load_rules, CompatibilityEngine};

#[derive(Parser)]
#[command(name = "mobomojo", version, about = "PC build compatibility checker")]
struct Cli {
    /// Catalog JSON file (defaults to the built-in catalog)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Compatibility rules TOML file (defaults to the built-in rules)
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    /// Saved builds database (defaults to the user data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List catalog components of one category
    Query {
        #[arg(long)]
        category: Category,
        #[arg(long, default_value = "")]
        search: String,
        /// attribute=value, repeatable
        #[arg(long = "filter")]
        filters: Vec<String>,
        #[arg(long, value_enum, default_value_t = SortArg::Price)]
        sort: SortArg,
        #[arg(long)]
        desc: bool,
        /// Mark each result against this build file
        #[arg(long)]
        build: Option<PathBuf>,
    },
    /// Show the filter values available for a category
    Facets {
        #[arg(long)]
        category: Category,
    },
    /// Summarize a build file: total price and violations
    Check { build: PathBuf },
    /// Save a build file to the local store
    Save {
        build: PathBuf,
        #[arg(long)]
        name: String,
        /// Also write the saved record to this JSON file
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// List saved builds, newest first
    List,
    /// Delete a saved build
    Delete { id: i64 },
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum SortArg {
    Price,
    Name,
}

/// A query hit with its compatibility against the given build.
#[derive(Serialize)]
struct MarkedComponent<'a> {
    #[serde(flatten)]
    component: &'a mobomojo::Component,
    issues: Vec<String>,
}

fn main() -> Result<()> {
    mobomojo::init_tracing();
    let cli = Cli::parse();

    let catalog = match &cli.catalog {
        Some(path) => load_catalog(path)?,
        None => default_catalog(),
    };
    let rules = match &cli.rules {
        Some(path) => load_rules(path)?,
        None => default_rules(),
    };
    let engine = CompatibilityEngine::new(rules);

    match cli.command {
        Command::Query {
            category,
            search,
            filters,
            sort,
            desc,
            build,
        } => {
            let mut request = CatalogQuery::new(category).search(search).sort_by(
                match sort {
                    SortArg::Price => SortKey::Price,
                    SortArg::Name => SortKey::Name,
                },
                if desc { SortOrder::Desc } else { SortOrder::Asc },
            );
            for filter in &filters {
                let (attribute, value) = filter
                    .split_once('=')
                    .ok_or_else(|| anyhow!("Filter must look like attribute=value: {}", filter))?;
                request = request.filter(attribute, value);
            }

            let current = match &build {
                Some(path) => read_build_file(path, &catalog)?,
                None => Configuration::new(),
            };
            let marked: Vec<MarkedComponent> = query(&catalog, &request)
                .into_iter()
                .map(|component| MarkedComponent {
                    component,
                    issues: engine.evaluate(component, &current),
                })
                .collect();
            print_json(&marked)?;
        }
        Command::Facets { category } => {
            print_json(&available_filters(&catalog, category))?;
        }
        Command::Check { build } => {
            let current = read_build_file(&build, &catalog)?;
            print_json(&engine.summarize(&current))?;
        }
        Command::Save {
            build,
            name,
            export,
        } => {
            let current = read_build_file(&build, &catalog)?;
            let mut saved = SavedBuild::from_configuration(&name, &current)?;
            let store = open_store(cli.db.as_deref())?;
            saved.id = Some(store.save_build(&saved).map_err(|e| anyhow!(e))?);
            if let Some(path) = export {
                write_build_atomic(&saved, &path)?;
            }
            print_json(&saved)?;
        }
        Command::List => {
            let store = open_store(cli.db.as_deref())?;
            print_json(&store.list_builds().map_err(|e| anyhow!(e))?)?;
        }
        Command::Delete { id } => {
            let store = open_store(cli.db.as_deref())?;
            if !store.delete_build(id).map_err(|e| anyhow!(e))? {
                bail!("No saved build with id {}", id);
            }
            info!("Deleted build {}", id);
        }
    }

    Ok(())
}

/// A build file maps category names to component ids:
/// `{"CPU": "cpu-7600", "GPU": "gpu-4070s"}`.
fn read_build_file(path: &Path, catalog: &Catalog) -> Result<Configuration> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read build file {:?}", path))?;
    let ids: BTreeMap<Category, String> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid build file {:?}", path))?;
    Ok(Configuration::from_ids(&ids, catalog)?)
}

fn open_store(db: Option<&Path>) -> Result<BuildStore> {
    let path = match db {
        Some(path) => path.to_path_buf(),
        None => mobomojo::default_store_path()
            .ok_or_else(|| anyhow!("No data directory available; pass --db"))?,
    };
    BuildStore::new(&path).map_err(|e| anyhow!(e))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
