use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rootcause::prelude::*;
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use deadlock_assets::assets::{Assets, ItemSlotType, ItemType, RequestContext};
use deadlock_assets::game_types::{HeroId, ItemId, Language};

/// Query Deadlock's heroes, abilities, weapons and upgrades as JSON
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory containing raw_heroes.json, raw_items.json and localization/
    #[clap(short, long, env = "DEADLOCK_RES_DIR", default_value = "res")]
    res_dir: PathBuf,

    /// Prepended to every image path, e.g. "https://assets.example.com/"
    #[clap(short, long, env = "IMAGE_BASE_URL")]
    base_url: Option<String>,

    /// Language used for display names. Falls back to English per entity.
    #[clap(short, long, default_value_t = Language::English)]
    language: Language,

    /// Pretty-print the JSON output
    #[clap(long)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// All heroes, sorted by id
    Heroes,
    /// One hero by id
    Hero { id: u32 },
    /// One hero by class name, short name or display name
    HeroByName { name: String },
    /// All abilities, weapons and upgrades
    Items,
    /// One item by id
    Item { id: u32 },
    /// One item by display name or class name
    ItemByName { name: String },
    /// Items of one type: ability, weapon or upgrade
    ItemsByType {
        #[arg(value_parser = parse_item_type)]
        item_type: ItemType,
    },
    /// Upgrades of one shop slot: weapon_mod, armor or tech
    ItemsBySlotType {
        #[arg(value_parser = parse_slot_type)]
        slot_type: ItemSlotType,
    },
    /// Records that were dropped while building, and why
    Diagnostics,
}

fn parse_item_type(name: &str) -> Result<ItemType, String> {
    ItemType::from_name(name).ok_or_else(|| format!("unknown item type: {name}"))
}

fn parse_slot_type(name: &str) -> Result<ItemSlotType, String> {
    ItemSlotType::from_name(name).ok_or_else(|| format!("unknown item slot type: {name}"))
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), Report> {
    let mut out = io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

fn main() -> Result<(), Report> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let assets = Assets::shared(&args.res_dir)
        .context_with(|| format!("Failed to build assets from {}", args.res_dir.display()))?;
    let context = RequestContext::builder()
        .language(args.language)
        .maybe_base_url(args.base_url)
        .build();
    let query = assets.query(context);

    match args.command {
        Command::Heroes => print_json(&query.heroes(), args.pretty),
        Command::Hero { id } => print_json(&query.hero(HeroId::from(id))?, args.pretty),
        Command::HeroByName { name } => print_json(&query.hero_by_name(&name)?, args.pretty),
        Command::Items => print_json(&query.items(), args.pretty),
        Command::Item { id } => print_json(&query.item(ItemId::from(id))?, args.pretty),
        Command::ItemByName { name } => print_json(&query.item_by_name(&name)?, args.pretty),
        Command::ItemsByType { item_type } => {
            print_json(&query.items_by_type(item_type), args.pretty)
        }
        Command::ItemsBySlotType { slot_type } => {
            print_json(&query.items_by_slot_type(slot_type), args.pretty)
        }
        Command::Diagnostics => {
            let dropped = assets
                .diagnostics()
                .iter()
                .map(|err| json!({"class_name": err.class_name(), "error": err.to_string()}))
                .collect::<Vec<_>>();
            print_json(&dropped, args.pretty)
        }
    }
}
