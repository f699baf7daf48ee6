//! Command handlers. Reports and listings go to `out`; diagnostics go
//! through `tracing`.

use std::io::Write;

use anyhow::{Context, Result, bail};
use estimate_core::calculations::common::format_fixed2;
use estimate_core::calculations::{
    PLUMBING_CATALOG, PaintCostFunction, PaintInput, PlumbingCostFunction, PlumbingSheet,
    TileCostFunction, TileInput,
};
use estimate_core::db::{
    MemoryRepositoryFactory, PersistenceAdapter, RepositoryRegistry, StorageConfig,
};
use estimate_core::{
    Clock, Domain, EstimationStore, ExportSink, LineItem, ReportTemplate,
    render_item, render_list,
};
use estimate_db_sqlite::SqliteRepositoryFactory;
use tracing::{debug, info};

use crate::cli::{Command, ListAction, PaintAction, PlumbingAction, TileAction};

/// Every storage backend this binary knows about.
pub fn build_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));
    registry.register(Box::new(MemoryRepositoryFactory));
    registry
}

/// Opens the persisted list for `key` on the configured backend.
pub async fn open_store(
    registry: &RepositoryRegistry,
    storage: &StorageConfig,
    key: &str,
) -> Result<EstimationStore> {
    debug!(backend = %storage.backend, key, "opening estimation list");
    let repository = registry
        .create(storage)
        .await
        .with_context(|| format!("cannot open '{}' storage", storage.backend))?;
    EstimationStore::open(PersistenceAdapter::new(repository), key)
        .await
        .with_context(|| format!("cannot read estimation list '{key}'"))
}

/// Fails the command when the mutation it just made did not reach storage.
/// The write is retried once first.
async fn ensure_saved(store: &EstimationStore) -> Result<()> {
    if store.is_saved() {
        return Ok(());
    }
    store.persist().await.with_context(|| {
        format!(
            "cannot save estimation list '{}'",
            store.key().unwrap_or_default()
        )
    })
}

/// Where a command's side effects land.
pub struct Env<'a> {
    pub sink: &'a dyn ExportSink,
    pub clock: &'a dyn Clock,
    pub out: &'a mut dyn Write,
}

/// Snapshot key of the list a command works on.
pub fn store_key(command: &Command) -> &'static str {
    match command {
        Command::Tile { .. } => TileCostFunction::STORE_KEY,
        Command::Paint { .. } => PaintCostFunction::STORE_KEY,
        Command::Plumbing { .. } => PlumbingCostFunction::STORE_KEY,
    }
}

pub async fn run_command(
    command: Command,
    store: &mut EstimationStore,
    env: &mut Env<'_>,
) -> Result<()> {
    match command {
        Command::Tile { action } => match action {
            TileAction::Add(args) => {
                add(&TileCostFunction, &TileInput::from(args), store, env).await
            }
            TileAction::List(action) => {
                run_list_action(action, store, TileCostFunction.template(), env).await
            }
        },
        Command::Paint { action } => match action {
            PaintAction::Add(args) => {
                add(&PaintCostFunction, &PaintInput::from(args), store, env).await
            }
            PaintAction::List(action) => {
                run_list_action(action, store, PaintCostFunction.template(), env).await
            }
        },
        Command::Plumbing { action } => match action {
            PlumbingAction::Add(args) => {
                let sheet =
                    PlumbingSheet::compute(&args.rows).context("invalid plumbing sheet")?;
                add_plumbing_sheet(&sheet, store, env).await
            }
            PlumbingAction::Catalog => print_catalog(&mut *env.out),
            PlumbingAction::List(action) => {
                run_list_action(action, store, PlumbingCostFunction.template(), env).await
            }
        },
    }
}

async fn add<D: Domain>(
    domain: &D,
    input: &D::Input,
    store: &mut EstimationStore,
    env: &mut Env<'_>,
) -> Result<()> {
    let candidate = domain
        .compute(input)
        .with_context(|| format!("invalid {} input", domain.template().item_title))?;
    let id = store.add(candidate).await;
    ensure_saved(store).await?;
    info!(%id, key = D::STORE_KEY, "estimation added");

    if let Some(item) = store.items().last() {
        writeln!(env.out, "{}", render_item(item, domain.template(), env.clock))?;
    }
    Ok(())
}

async fn add_plumbing_sheet(
    sheet: &PlumbingSheet,
    store: &mut EstimationStore,
    env: &mut Env<'_>,
) -> Result<()> {
    let ids = store.add_all(sheet.selected()).await;
    ensure_saved(store).await?;
    info!(added = ids.len(), "plumbing rows added");

    let currency = PlumbingCostFunction.template().currency;
    for row in sheet.rows() {
        let item = &row.item;
        let name = item
            .field("name")
            .map(ToString::to_string)
            .unwrap_or_default();
        writeln!(
            env.out,
            "{}{name}: {currency} {}",
            if row.is_selected() { "* " } else { "  " },
            format_fixed2(item.amount())
        )?;
    }
    writeln!(
        env.out,
        "Sheet total: {currency} {}",
        format_fixed2(sheet.total())
    )?;
    writeln!(env.out, "Added {} row(s) to the list.", ids.len())?;
    Ok(())
}

/// Converts a 1-based position from `list` output into a store index.
fn index_of(position: usize) -> Result<usize> {
    match position.checked_sub(1) {
        Some(index) => Ok(index),
        None => bail!("positions start at 1"),
    }
}

fn item_at(
    store: &EstimationStore,
    position: usize,
) -> Result<&LineItem> {
    let index = index_of(position)?;
    store
        .get(index)
        .with_context(|| format!("no entry at position {position} (list has {})", store.len()))
}

pub async fn run_list_action(
    action: ListAction,
    store: &mut EstimationStore,
    template: &ReportTemplate,
    env: &mut Env<'_>,
) -> Result<()> {
    match action {
        ListAction::List => {
            writeln!(env.out, "{}", render_list(store.items(), template, env.clock))?;
        }
        ListAction::Remove { position } => {
            let removed = store.remove_at(index_of(position)?).await?;
            ensure_saved(store).await?;
            writeln!(
                env.out,
                "Removed {}: {} {}",
                (template.headline)(&removed),
                template.currency,
                format_fixed2(removed.amount())
            )?;
        }
        ListAction::Clear => {
            store.clear().await;
            ensure_saved(store).await?;
            writeln!(env.out, "List cleared.")?;
        }
        ListAction::Export { item: Some(position) } => {
            let item = item_at(store, position)?;
            let report = render_item(item, template, env.clock);
            let path = env.sink.export(&(template.item_filename)(item), &report)?;
            writeln!(env.out, "Exported {}", path.display())?;
        }
        ListAction::Export { item: None } => {
            let report = render_list(store.items(), template, env.clock);
            let path = env.sink.export(template.list_filename, &report)?;
            writeln!(env.out, "Exported {}", path.display())?;
        }
        ListAction::Total => {
            writeln!(
                env.out,
                "{}: {} {}",
                template.total_label,
                template.currency,
                format_fixed2(store.total())
            )?;
        }
    }
    Ok(())
}

fn print_catalog(out: &mut dyn Write) -> Result<()> {
    for entry in PLUMBING_CATALOG {
        let tiers: Vec<String> = entry.tiers.iter().map(u32::to_string).collect();
        writeln!(out, "{}: {}", entry.name, tiers.join(" / "))?;
    }
    Ok(())
}
