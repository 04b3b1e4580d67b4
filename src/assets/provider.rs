use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError, RwLock};

use bon::Builder;
use tracing::debug;

use crate::data::{DataFileLoader, DirectoryLoader};
use crate::error::{IResult, LookupMiss, RecordError};
use crate::game_types::{HeroId, ItemId, Language};

use super::builder::{BuildOptions, BuildOutput, build_entities};
use super::classify::Kind;
use super::images::WithBaseUrl;
use super::keys;
use super::loader::{load_raw_heroes, load_raw_items};
use super::translations::Localization;
use super::types::{Entity, Hero, Item, ItemSlotType, ItemType};

/// Read access to a canonical entity set.
pub trait AssetProvider {
    fn hero_by_id(&self, id: HeroId) -> Option<Arc<Hero>>;
    /// Case-insensitive.
    fn hero_by_class_name(&self, class_name: &str) -> Option<Arc<Hero>>;
    fn item_by_id(&self, id: ItemId) -> Option<Arc<Item>>;
    /// Case-insensitive.
    fn item_by_class_name(&self, class_name: &str) -> Option<Arc<Item>>;
    fn heroes(&self) -> &[Arc<Hero>];
    fn items(&self) -> &[Arc<Item>];
}

struct AssetLookups {
    hero_by_id: HashMap<HeroId, Arc<Hero>>,
    hero_by_class_name: HashMap<String, Arc<Hero>>,
    item_by_id: HashMap<ItemId, Arc<Item>>,
    item_by_class_name: HashMap<String, Arc<Item>>,
}

fn build_lookups(heroes: &[Arc<Hero>], items: &[Arc<Item>]) -> AssetLookups {
    let mut hero_by_id = HashMap::with_capacity(heroes.len());
    let mut hero_by_class_name = HashMap::with_capacity(heroes.len());
    for hero in heroes {
        hero_by_id.insert(hero.id(), hero.clone());
        hero_by_class_name.insert(hero.class_name().to_lowercase(), hero.clone());
    }

    let mut item_by_id = HashMap::with_capacity(items.len());
    let mut item_by_class_name = HashMap::with_capacity(items.len());
    for item in items {
        item_by_id.insert(item.id(), item.clone());
        item_by_class_name.insert(item.class_name().to_lowercase(), item.clone());
    }

    AssetLookups {
        hero_by_id,
        hero_by_class_name,
        item_by_id,
        item_by_class_name,
    }
}

/// The canonical, immutable result of one pipeline run.
pub struct Assets {
    heroes: Vec<Arc<Hero>>,
    items: Vec<Arc<Item>>,
    lookups: AssetLookups,
    localization: Localization,
    diagnostics: Vec<RecordError>,
}

/// One cache entry. `building` serializes the first build of this key only.
#[derive(Default)]
struct SharedSlot {
    assets: OnceLock<Arc<Assets>>,
    building: Mutex<()>,
}

/// Built sets keyed by source directory. The map lock is only held to find or
/// insert a slot, never while a set is being built.
#[derive(Default)]
struct SharedCache {
    slots: RwLock<HashMap<PathBuf, Arc<SharedSlot>>>,
}

impl SharedCache {
    fn slot(&self, key: &Path) -> Arc<SharedSlot> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(slot) = slots.get(key) {
            return slot.clone();
        }
        drop(slots);

        self.slots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key.to_path_buf())
            .or_default()
            .clone()
    }

    /// A failed build leaves the slot empty so the next caller retries.
    fn get_or_build(
        &self,
        key: PathBuf,
        build: impl FnOnce(&Path) -> IResult<Assets>,
    ) -> IResult<Arc<Assets>> {
        let slot = self.slot(&key);
        if let Some(assets) = slot.assets.get() {
            return Ok(assets.clone());
        }

        let _building = slot.building.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(assets) = slot.assets.get() {
            return Ok(assets.clone());
        }

        debug!("building assets from {}", key.display());
        let assets = Arc::new(build(&key)?);
        Ok(slot.assets.get_or_init(|| assets).clone())
    }
}

static SHARED: OnceLock<SharedCache> = OnceLock::new();

impl Assets {
    /// Runs the whole pipeline against `loader`.
    pub fn load(loader: &dyn DataFileLoader, options: BuildOptions) -> IResult<Assets> {
        let raw_heroes = load_raw_heroes(loader)?;
        let raw_items = load_raw_items(loader)?;
        let localization = Localization::load(loader)?;

        let output = build_entities(&raw_heroes, &raw_items, &localization, options)?;
        Ok(Assets::from_output(output, localization))
    }

    pub fn from_dir(root: impl AsRef<Path>, options: BuildOptions) -> IResult<Assets> {
        Assets::load(&DirectoryLoader::new(root.as_ref()), options)
    }

    /// Builds the set for `root` once per process and hands out shared
    /// references afterwards. Concurrent first callers of the same directory
    /// wait for one build; other directories are not held up by it.
    ///
    /// `root` is canonicalized, so `res` and `./res` share one set.
    pub fn shared(root: impl AsRef<Path>) -> IResult<Arc<Assets>> {
        let root = root.as_ref();
        let key = std::fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
        SHARED
            .get_or_init(SharedCache::default)
            .get_or_build(key, |root| Assets::from_dir(root, BuildOptions::default()))
    }

    pub fn from_output(output: BuildOutput, localization: Localization) -> Assets {
        let heroes = output.heroes.into_iter().map(Arc::new).collect::<Vec<_>>();
        let items = output.items.into_iter().map(Arc::new).collect::<Vec<_>>();
        let lookups = build_lookups(&heroes, &items);

        Assets {
            heroes,
            items,
            lookups,
            localization,
            diagnostics: output.diagnostics,
        }
    }

    pub fn localization(&self) -> &Localization {
        &self.localization
    }

    /// Records that were left out of the set, and why.
    pub fn diagnostics(&self) -> &[RecordError] {
        &self.diagnostics
    }

    /// Every entity, heroes first.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.heroes
            .iter()
            .cloned()
            .map(Entity::Hero)
            .chain(self.items.iter().cloned().map(Entity::Item))
    }

    pub fn count(&self, kind: Kind) -> usize {
        self.entities().filter(|entity| entity.kind() == kind).count()
    }

    /// A request-scoped view over the canonical set.
    pub fn query(&self, context: RequestContext) -> Query<'_> {
        Query {
            assets: self,
            context,
        }
    }
}

impl AssetProvider for Assets {
    fn hero_by_id(&self, id: HeroId) -> Option<Arc<Hero>> {
        self.lookups.hero_by_id.get(&id).cloned()
    }

    fn hero_by_class_name(&self, class_name: &str) -> Option<Arc<Hero>> {
        self.lookups
            .hero_by_class_name
            .get(&class_name.to_lowercase())
            .cloned()
    }

    fn item_by_id(&self, id: ItemId) -> Option<Arc<Item>> {
        self.lookups.item_by_id.get(&id).cloned()
    }

    fn item_by_class_name(&self, class_name: &str) -> Option<Arc<Item>> {
        self.lookups
            .item_by_class_name
            .get(&class_name.to_lowercase())
            .cloned()
    }

    fn heroes(&self) -> &[Arc<Hero>] {
        self.heroes.as_slice()
    }

    fn items(&self) -> &[Arc<Item>] {
        self.items.as_slice()
    }
}

/// Per-request parameters.
#[derive(Builder, Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    #[builder(default)]
    pub language: Language,
    /// Prepended to every image path when set.
    #[builder(into)]
    pub base_url: Option<String>,
}

/// Entities as a single request sees them: names in the requested language
/// and image paths under the requested base URL. Every result is a copy.
pub struct Query<'a> {
    assets: &'a Assets,
    context: RequestContext,
}

impl Query<'_> {
    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    fn present_hero(&self, hero: &Hero) -> Hero {
        let name = self
            .assets
            .localization
            .hero_name(hero.class_name(), self.context.language);
        let hero = hero.with_name(name);
        match &self.context.base_url {
            Some(base_url) => hero.with_base_url(base_url),
            None => hero,
        }
    }

    fn present_item(&self, item: &Item) -> Item {
        let name = self
            .assets
            .localization
            .item_name(item.class_name(), self.context.language);
        let item = item.with_name(name);
        match &self.context.base_url {
            Some(base_url) => item.with_base_url(base_url),
            None => item,
        }
    }

    /// Sorted by id.
    pub fn heroes(&self) -> Vec<Hero> {
        self.assets
            .heroes
            .iter()
            .map(|hero| self.present_hero(hero))
            .collect()
    }

    pub fn hero(&self, id: HeroId) -> Result<Hero, LookupMiss> {
        self.assets
            .hero_by_id(id)
            .map(|hero| self.present_hero(&hero))
            .ok_or_else(|| LookupMiss::hero(id))
    }

    /// Matches the class name (`hero_astro`), the short name (`astro`) or the
    /// localized name, ignoring case.
    pub fn hero_by_name(&self, name: &str) -> Result<Hero, LookupMiss> {
        let wanted = name.trim().to_lowercase();
        self.assets
            .hero_by_class_name(&wanted)
            .or_else(|| {
                self.assets
                    .hero_by_class_name(&format!("{}{wanted}", keys::HERO_PREFIX))
            })
            .map(|hero| self.present_hero(&hero))
            .or_else(|| {
                self.heroes()
                    .into_iter()
                    .find(|hero| hero.name().to_lowercase() == wanted)
            })
            .ok_or_else(|| LookupMiss::hero(name))
    }

    pub fn items(&self) -> Vec<Item> {
        self.assets
            .items
            .iter()
            .map(|item| self.present_item(item))
            .collect()
    }

    pub fn item(&self, id: ItemId) -> Result<Item, LookupMiss> {
        self.assets
            .item_by_id(id)
            .map(|item| self.present_item(&item))
            .ok_or_else(|| LookupMiss::item(id))
    }

    /// Matches the localized name or the class name, ignoring case.
    pub fn item_by_name(&self, name: &str) -> Result<Item, LookupMiss> {
        let wanted = name.trim().to_lowercase();
        self.items()
            .into_iter()
            .find(|item| item.name().to_lowercase() == wanted)
            .or_else(|| {
                self.assets
                    .item_by_class_name(&wanted)
                    .map(|item| self.present_item(&item))
            })
            .ok_or_else(|| LookupMiss::item(name))
    }

    pub fn items_by_type(&self, item_type: ItemType) -> Vec<Item> {
        self.assets
            .items
            .iter()
            .filter(|item| item.item_type() == item_type)
            .map(|item| self.present_item(item))
            .collect()
    }

    pub fn items_by_slot_type(&self, slot_type: ItemSlotType) -> Vec<Item> {
        self.assets
            .items
            .iter()
            .filter(|item| {
                item.item_slot_type()
                    .and_then(|slot| slot.known())
                    .is_some_and(|slot| *slot == slot_type)
            })
            .map(|item| self.present_item(item))
            .collect()
    }
}
