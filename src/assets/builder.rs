//! Turns decoded raw records into the canonical entity set.
//!
//! Record-level problems are reported as diagnostics and the record is left
//! out; the rest of the batch is still built. Cross-references are resolved by
//! class name against the decoded set and stored as ids.

use std::collections::{BTreeMap, HashMap};

use bon::Builder;
use itertools::Itertools;
use tracing::{debug, warn};

use crate::error::{IResult, RecordError};
use crate::game_types::{HeroId, ItemId, Language};
use crate::recognized::Recognized;

use super::classify::{Kind, classify_item};
use super::keys;
use super::loader::RawRecord;
use super::raw::{RawHero, RawItem, decode_hero, decode_item};
use super::translations::Localization;
use super::types::{Ability, Hero, Item, Upgrade, Weapon};

#[derive(Builder, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Abort on the first record error instead of collecting diagnostics.
    #[builder(default)]
    pub fail_fast: bool,
}

#[derive(Debug, Default)]
pub struct BuildOutput {
    /// Sorted by id.
    pub heroes: Vec<Hero>,
    /// Sorted by class name.
    pub items: Vec<Item>,
    pub diagnostics: Vec<RecordError>,
}

struct Diagnostics {
    fail_fast: bool,
    errors: Vec<RecordError>,
}

impl Diagnostics {
    fn new(options: BuildOptions) -> Self {
        Self {
            fail_fast: options.fail_fast,
            errors: Vec::new(),
        }
    }

    fn report(&mut self, err: RecordError) -> IResult<()> {
        warn!(class_name = err.class_name(), "dropping record: {err}");
        if self.fail_fast {
            return Err(err.into());
        }
        self.errors.push(err);
        Ok(())
    }
}

fn decode_heroes(records: &[RawRecord], diagnostics: &mut Diagnostics) -> IResult<Vec<RawHero>> {
    let mut heroes: Vec<RawHero> = Vec::with_capacity(records.len());
    let mut seen: HashMap<HeroId, String> = HashMap::new();

    for record in records {
        let hero = match decode_hero(record) {
            Ok(hero) => hero,
            Err(err) => {
                diagnostics.report(err)?;
                continue;
            }
        };
        if let Some(existing) = seen.get(&hero.id) {
            diagnostics.report(RecordError::DuplicateId {
                kind: Kind::Hero,
                id: hero.id.raw() as u64,
                class_name: hero.class_name.clone(),
                existing: existing.clone(),
            })?;
            continue;
        }
        seen.insert(hero.id, hero.class_name.clone());
        heroes.push(hero);
    }

    heroes.sort_by_key(|hero| hero.id);
    Ok(heroes)
}

fn decode_items(
    records: &[RawRecord],
    diagnostics: &mut Diagnostics,
) -> IResult<Vec<(ItemId, RawItem)>> {
    let mut items = Vec::with_capacity(records.len());
    let mut seen: HashMap<ItemId, String> = HashMap::new();

    for record in records {
        let class = match classify_item(&record.class_name) {
            Recognized::Known(class) => class,
            Recognized::Unknown(class_name) => {
                diagnostics.report(RecordError::ClassificationMiss { class_name })?;
                continue;
            }
        };
        let item = match decode_item(record, &class) {
            Ok(item) => item,
            Err(err) => {
                diagnostics.report(err)?;
                continue;
            }
        };
        let id = ItemId::from_class_name(item.class_name())?;
        if let Some(existing) = seen.get(&id) {
            diagnostics.report(RecordError::DuplicateId {
                kind: item.kind(),
                id: id.raw() as u64,
                class_name: item.class_name().to_string(),
                existing: existing.clone(),
            })?;
            continue;
        }
        seen.insert(id, item.class_name().to_string());
        items.push((id, item));
    }

    Ok(items)
}

/// Reference targets available while resolving one record.
struct Resolver<'a> {
    heroes_by_class_name: HashMap<String, HeroId>,
    /// Item class name -> hero binding it. The lowest hero id wins.
    bound_by: HashMap<&'a str, HeroId>,
    live_items: HashMap<&'a str, ItemId>,
}

/// References of one item, resolved to ids.
struct Resolved {
    hero: Option<HeroId>,
    component_items: Option<Vec<ItemId>>,
}

impl<'a> Resolver<'a> {
    fn new(heroes: &'a [RawHero], items: &'a [(ItemId, RawItem)]) -> Self {
        let heroes_by_class_name = heroes
            .iter()
            .map(|hero| (hero.class_name.to_lowercase(), hero.id))
            .collect();

        let mut bound_by = HashMap::new();
        for hero in heroes {
            for class_name in hero.bound_abilities.iter().flat_map(|bound| bound.values()) {
                bound_by.entry(class_name.as_str()).or_insert(hero.id);
            }
        }

        let live_items = items
            .iter()
            .map(|(id, item)| (item.class_name(), *id))
            .collect();

        Self {
            heroes_by_class_name,
            bound_by,
            live_items,
        }
    }

    fn resolve(&self, item: &RawItem) -> Result<Resolved, RecordError> {
        let class_name = item.class_name();
        let bound_hero = self.bound_by.get(class_name).copied();

        match item {
            RawItem::Ability(ability) => {
                let hero = match &ability.owner_short_name {
                    Some(short_name) => {
                        let hero_class_name = format!("{}{short_name}", keys::HERO_PREFIX);
                        let hero = self
                            .heroes_by_class_name
                            .get(&hero_class_name)
                            .copied()
                            .ok_or_else(|| RecordError::DanglingReference {
                                class_name: class_name.to_string(),
                                field: "class_name".to_string(),
                                reference: hero_class_name,
                            })?;
                        Some(hero)
                    }
                    None => bound_hero,
                };
                Ok(Resolved {
                    hero,
                    component_items: None,
                })
            }
            RawItem::Weapon(_) => Ok(Resolved {
                hero: bound_hero,
                component_items: None,
            }),
            RawItem::Upgrade(upgrade) => {
                let component_items = upgrade
                    .component_items
                    .as_ref()
                    .map(|components| {
                        components
                            .iter()
                            .map(|component| {
                                self.live_items.get(component.as_str()).copied().ok_or_else(|| {
                                    RecordError::DanglingReference {
                                        class_name: class_name.to_string(),
                                        field: keys::COMPONENT_ITEMS.to_string(),
                                        reference: component.clone(),
                                    }
                                })
                            })
                            .collect::<Result<Vec<_>, _>>()
                    })
                    .transpose()?;
                Ok(Resolved {
                    hero: None,
                    component_items,
                })
            }
        }
    }

    /// Drops items with dangling references until the remaining set only
    /// refers to itself.
    fn settle(
        &mut self,
        items: &'a [(ItemId, RawItem)],
        diagnostics: &mut Diagnostics,
    ) -> IResult<()> {
        loop {
            let dangling = items
                .iter()
                .filter(|(_, item)| self.live_items.contains_key(item.class_name()))
                .filter_map(|(_, item)| self.resolve(item).err())
                .collect_vec();
            if dangling.is_empty() {
                return Ok(());
            }
            for err in dangling {
                self.live_items.remove(err.class_name());
                diagnostics.report(err)?;
            }
        }
    }
}

fn build_item(id: ItemId, item: RawItem, resolved: Resolved, localization: &Localization) -> Item {
    let name = localization.item_name(item.class_name(), Language::English);
    match item {
        RawItem::Ability(ability) => Item::Ability(
            Ability::builder()
                .id(id)
                .class_name(ability.common.class_name)
                .name(name)
                .maybe_image(ability.common.image)
                .maybe_hero(resolved.hero)
                .disabled(ability.common.disabled)
                .maybe_ability_type(ability.ability_type)
                .maybe_properties(ability.common.properties)
                .maybe_upgrades(ability.upgrades)
                .build(),
        ),
        RawItem::Weapon(weapon) => Item::Weapon(
            Weapon::builder()
                .id(id)
                .class_name(weapon.common.class_name)
                .name(name)
                .maybe_image(weapon.common.image)
                .maybe_hero(resolved.hero)
                .disabled(weapon.common.disabled)
                .maybe_properties(weapon.common.properties)
                .weapon_info(weapon.weapon_info)
                .build(),
        ),
        RawItem::Upgrade(upgrade) => Item::Upgrade(
            Upgrade::builder()
                .id(id)
                .class_name(upgrade.common.class_name)
                .name(name)
                .maybe_image(upgrade.common.image)
                .disabled(upgrade.common.disabled)
                .maybe_properties(upgrade.common.properties)
                .item_slot_type(upgrade.item_slot_type)
                .item_tier(upgrade.item_tier)
                .is_active_item(upgrade.is_active_item)
                .maybe_component_items(resolved.component_items)
                .build(),
        ),
    }
}

fn build_hero(
    hero: RawHero,
    live_items: &HashMap<&str, ItemId>,
    localization: &Localization,
) -> Hero {
    let name = localization.hero_name(&hero.class_name, Language::English);

    let items = hero.bound_abilities.as_ref().map(|bound| {
        bound
            .iter()
            .filter_map(|(slot, class_name)| match live_items.get(class_name.as_str()) {
                Some(id) => Some((slot.clone(), *id)),
                None => {
                    debug!("{} binds {class_name} in {slot}, which was not built", hero.class_name);
                    None
                }
            })
            .collect::<BTreeMap<_, _>>()
    });

    Hero::builder()
        .id(hero.id)
        .class_name(hero.class_name)
        .name(name)
        .images(hero.images)
        .player_selectable(hero.player_selectable)
        .disabled(hero.disabled)
        .in_development(hero.in_development)
        .needs_testing(hero.needs_testing)
        .assigned_players_only(hero.assigned_players_only)
        .bot_selectable(hero.bot_selectable)
        .limited_testing(hero.limited_testing)
        .complexity(hero.complexity)
        .readability(hero.readability)
        .starting_stats(hero.starting_stats)
        .collision_radius(hero.collision_radius)
        .collision_height(hero.collision_height)
        .step_height(hero.step_height)
        .item_slot_info(hero.item_slot_info)
        .purchase_bonuses(hero.purchase_bonuses)
        .level_info(hero.level_info)
        .stealth_speed_meters_per_second(hero.stealth_speed_meters_per_second)
        .footstep_sound_travel_distance_meters(hero.footstep_sound_travel_distance_meters)
        .step_sound_time(hero.step_sound_time)
        .color_ui(hero.color_ui)
        .color_glow_friendly(hero.color_glow_friendly)
        .color_glow_enemy(hero.color_glow_enemy)
        .color_glow_team1(hero.color_glow_team1)
        .color_glow_team2(hero.color_glow_team2)
        .standard_level_up_upgrades(hero.standard_level_up_upgrades)
        .maybe_items(items.filter(|items| !items.is_empty()))
        .build()
}

/// Builds heroes and items from filtered raw records. Names are resolved in
/// English; image fields hold relative paths.
pub fn build_entities(
    raw_heroes: &[RawRecord],
    raw_items: &[RawRecord],
    localization: &Localization,
    options: BuildOptions,
) -> IResult<BuildOutput> {
    let mut diagnostics = Diagnostics::new(options);

    let heroes = decode_heroes(raw_heroes, &mut diagnostics)?;
    let items = decode_items(raw_items, &mut diagnostics)?;

    let mut resolver = Resolver::new(&heroes, &items);
    resolver.settle(&items, &mut diagnostics)?;

    let mut built_items = Vec::with_capacity(resolver.live_items.len());
    for (id, item) in &items {
        if !resolver.live_items.contains_key(item.class_name()) {
            continue;
        }
        match resolver.resolve(item) {
            Ok(resolved) => built_items.push(build_item(*id, item.clone(), resolved, localization)),
            Err(err) => diagnostics.report(err)?,
        }
    }
    built_items.sort_by(|a, b| a.class_name().cmp(b.class_name()));

    let live_items = resolver.live_items;
    let built_heroes = heroes
        .iter()
        .cloned()
        .map(|hero| build_hero(hero, &live_items, localization))
        .collect_vec();

    debug!(
        "built {} heroes and {} items, dropped {} records",
        built_heroes.len(),
        built_items.len(),
        diagnostics.errors.len()
    );

    Ok(BuildOutput {
        heroes: built_heroes,
        items: built_items,
        diagnostics: diagnostics.errors,
    })
}
