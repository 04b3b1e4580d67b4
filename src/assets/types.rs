use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use bon::Builder;
use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};
use variantly::Variantly;

use crate::game_types::{Color, HeroId, ItemId};
use crate::recognized::{ExternalName, Recognized};

use super::classify::Kind;
use super::de;
use super::keys;
use super::provider::AssetProvider;

// =============================================================================
// Enumerations
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BonusCurrency {
    AbilityUnlocks,
    AbilityPoints,
}

impl ExternalName for BonusCurrency {
    fn from_external(name: &str) -> Option<Self> {
        match name {
            keys::CURRENCY_ABILITY_UNLOCKS => Some(Self::AbilityUnlocks),
            keys::CURRENCY_ABILITY_POINTS => Some(Self::AbilityPoints),
            _ => None,
        }
    }

    fn external_name(&self) -> &'static str {
        match self {
            Self::AbilityUnlocks => keys::CURRENCY_ABILITY_UNLOCKS,
            Self::AbilityPoints => keys::CURRENCY_ABILITY_POINTS,
        }
    }
}

/// Shop category of an upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ItemSlotType {
    WeaponMod,
    Armor,
    Tech,
}

impl ItemSlotType {
    pub const ALL: &[ItemSlotType] = &[Self::WeaponMod, Self::Armor, Self::Tech];

    pub fn name(&self) -> &'static str {
        match self {
            Self::WeaponMod => "WeaponMod",
            Self::Armor => "Armor",
            Self::Tech => "Tech",
        }
    }

    /// Accepts "weapon_mod", "WeaponMod", "weapon-mod", ...
    pub fn from_name(name: &str) -> Option<Self> {
        let pascal = name.trim().to_case(Case::Pascal);
        Self::ALL.iter().copied().find(|slot| slot.name() == pascal)
    }
}

impl ExternalName for ItemSlotType {
    fn from_external(name: &str) -> Option<Self> {
        match name {
            keys::SLOT_WEAPON_MOD => Some(Self::WeaponMod),
            keys::SLOT_ARMOR => Some(Self::Armor),
            keys::SLOT_TECH => Some(Self::Tech),
            _ => None,
        }
    }

    fn external_name(&self) -> &'static str {
        match self {
            Self::WeaponMod => keys::SLOT_WEAPON_MOD,
            Self::Armor => keys::SLOT_ARMOR,
            Self::Tech => keys::SLOT_TECH,
        }
    }
}

impl fmt::Display for ItemSlotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Ability,
    Weapon,
    Upgrade,
}

impl ItemType {
    pub const ALL: &[ItemType] = &[Self::Ability, Self::Weapon, Self::Upgrade];

    pub fn kind(&self) -> Kind {
        match self {
            Self::Ability => Kind::Ability,
            Self::Weapon => Kind::Weapon,
            Self::Upgrade => Kind::Upgrade,
        }
    }

    /// Accepts any casing of "ability", "weapon" or "upgrade".
    pub fn from_name(name: &str) -> Option<Self> {
        let flat = name.trim().to_case(Case::Flat);
        Self::ALL
            .iter()
            .copied()
            .find(|ty| ty.kind().name() == flat)
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind().fmt(f)
    }
}

// =============================================================================
// Hero tables
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroStartingStats {
    #[serde(rename(deserialize = "EMaxMoveSpeed"))]
    pub max_move_speed: f64,
    #[serde(rename(deserialize = "ESprintSpeed"))]
    pub sprint_speed: f64,
    #[serde(rename(deserialize = "ECrouchSpeed"))]
    pub crouch_speed: f64,
    #[serde(rename(deserialize = "EMoveAcceleration"))]
    pub move_acceleration: f64,
    #[serde(rename(deserialize = "ELightMeleeDamage"), deserialize_with = "de::lax_i64")]
    pub light_melee_damage: i64,
    #[serde(rename(deserialize = "EHeavyMeleeDamage"), deserialize_with = "de::lax_i64")]
    pub heavy_melee_damage: i64,
    #[serde(rename(deserialize = "EMaxHealth"), deserialize_with = "de::lax_i64")]
    pub max_health: i64,
    #[serde(rename(deserialize = "EWeaponPower"), deserialize_with = "de::lax_i64")]
    pub weapon_power: i64,
    #[serde(rename(deserialize = "EReloadSpeed"), deserialize_with = "de::lax_i64")]
    pub reload_speed: i64,
    #[serde(rename(deserialize = "EWeaponPowerScale"), deserialize_with = "de::lax_i64")]
    pub weapon_power_scale: i64,
    #[serde(rename(deserialize = "EProcBuildUpRateScale"), deserialize_with = "de::lax_i64")]
    pub proc_build_up_rate_scale: i64,
    #[serde(rename(deserialize = "EStamina"), deserialize_with = "de::lax_i64")]
    pub stamina: i64,
    #[serde(rename(deserialize = "EBaseHealthRegen"))]
    pub base_health_regen: f64,
    #[serde(rename(deserialize = "EStaminaRegenPerSecond"))]
    pub stamina_regen_per_second: f64,
    #[serde(rename(deserialize = "EAbilityResourceMax"), deserialize_with = "de::lax_i64")]
    pub ability_resource_max: i64,
    #[serde(
        rename(deserialize = "EAbilityResourceRegenPerSecond"),
        deserialize_with = "de::lax_i64"
    )]
    pub ability_resource_regen_per_second: i64,
    #[serde(rename(deserialize = "ECritDamageReceivedScale"))]
    pub crit_damage_received_scale: f64,
    #[serde(rename(deserialize = "ETechDuration"), deserialize_with = "de::lax_i64")]
    pub tech_duration: i64,
    #[serde(rename(deserialize = "ETechRange"), deserialize_with = "de::lax_i64")]
    pub tech_range: i64,
    #[serde(
        rename(deserialize = "EBulletArmorDamageReduction"),
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub bullet_armor_damage_reduction: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroItemSlotInfoForTier {
    #[serde(
        rename(deserialize = "m_arMaxPurchasesForTier"),
        deserialize_with = "de::lax_i64_vec"
    )]
    pub max_purchase_for_tier: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroItemSlotInfo {
    #[serde(rename(deserialize = "EItemSlotType_WeaponMod"))]
    pub weapon_mod: HeroItemSlotInfoForTier,
    #[serde(rename(deserialize = "EItemSlotType_Armor"))]
    pub armor: HeroItemSlotInfoForTier,
    #[serde(rename(deserialize = "EItemSlotType_Tech"))]
    pub tech: HeroItemSlotInfoForTier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroPurchaseBonus {
    #[serde(rename(deserialize = "m_nTier"), deserialize_with = "de::lax_i64")]
    pub tier: i64,
    #[serde(rename(deserialize = "m_strValue"))]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroPurchaseBonuses {
    #[serde(rename(deserialize = "EItemSlotType_WeaponMod"))]
    pub weapon_mod: Vec<HeroPurchaseBonus>,
    #[serde(rename(deserialize = "EItemSlotType_Armor"))]
    pub armor: Vec<HeroPurchaseBonus>,
    #[serde(rename(deserialize = "EItemSlotType_Tech"))]
    pub tech: Vec<HeroPurchaseBonus>,
}

/// One row of the per-level progression table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroLevelInfo {
    #[serde(
        rename(deserialize = "m_unRequiredGold"),
        default,
        deserialize_with = "de::lax_opt_i64",
        skip_serializing_if = "Option::is_none"
    )]
    pub required_gold: Option<i64>,
    /// Never `Some(vec![])`: an empty currency table decodes to `None`.
    #[serde(
        rename(deserialize = "m_mapBonusCurrencies"),
        default,
        deserialize_with = "de::bonus_currencies",
        skip_serializing_if = "Option::is_none"
    )]
    pub bonus_currencies: Option<Vec<Recognized<BonusCurrency>>>,
    #[serde(
        rename(deserialize = "m_bUseStandardUpgrade"),
        default,
        deserialize_with = "de::lax_flag"
    )]
    pub use_standard_upgrade: bool,
}

/// Relative image paths until a base URL is applied per request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeroImages {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portrait: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gun: Option<String>,
}

impl HeroImages {
    pub(crate) fn paths_mut(&mut self) -> [&mut Option<String>; 6] {
        [
            &mut self.portrait,
            &mut self.card,
            &mut self.vertical,
            &mut self.mm,
            &mut self.sm,
            &mut self.gun,
        ]
    }
}

// =============================================================================
// Item tables
// =============================================================================

/// Property values are numbers in some records and strings (often with units
/// or formulas) in others; they are kept as they arrive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Int(i64),
    Float(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemProperty {
    #[serde(
        rename(deserialize = "m_strValue"),
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<PropertyValue>,
    #[serde(
        rename(deserialize = "m_strCSSClass"),
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub css_class: Option<String>,
    #[serde(
        rename(deserialize = "m_eProvidedPropertyType"),
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub provided_property_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyUpgrade {
    #[serde(rename(deserialize = "m_strPropertyName"))]
    pub name: String,
    #[serde(rename(deserialize = "m_strBonus"))]
    pub bonus: PropertyValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityUpgrade {
    #[serde(rename(deserialize = "m_vecPropertyUpgrades"), default)]
    pub property_upgrades: Vec<PropertyUpgrade>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeaponInfo {
    #[serde(
        rename(deserialize = "m_flCycleTime"),
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub cycle_time: Option<f64>,
    #[serde(
        rename(deserialize = "m_flReloadDuration"),
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub reload_duration: Option<f64>,
    #[serde(
        rename(deserialize = "m_iClipSize"),
        default,
        deserialize_with = "de::lax_opt_i64",
        skip_serializing_if = "Option::is_none"
    )]
    pub clip_size: Option<i64>,
    #[serde(
        rename(deserialize = "m_iBullets"),
        default,
        deserialize_with = "de::lax_opt_i64",
        skip_serializing_if = "Option::is_none"
    )]
    pub bullets: Option<i64>,
    #[serde(
        rename(deserialize = "m_flBulletSpeed"),
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub bullet_speed: Option<f64>,
    #[serde(
        rename(deserialize = "m_flBulletDamage"),
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub bullet_damage: Option<f64>,
    #[serde(
        rename(deserialize = "m_flBulletGravityScale"),
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub bullet_gravity_scale: Option<f64>,
}

// =============================================================================
// Entities
// =============================================================================

#[derive(Builder, Debug, Clone, PartialEq, Serialize)]
pub struct Hero {
    id: HeroId,
    class_name: String,
    name: String,
    images: HeroImages,
    player_selectable: bool,
    disabled: bool,
    in_development: bool,
    needs_testing: bool,
    assigned_players_only: bool,
    bot_selectable: bool,
    limited_testing: bool,
    complexity: i64,
    readability: i64,
    starting_stats: HeroStartingStats,
    collision_radius: f64,
    collision_height: f64,
    step_height: f64,
    item_slot_info: HeroItemSlotInfo,
    purchase_bonuses: HeroPurchaseBonuses,
    level_info: BTreeMap<u32, HeroLevelInfo>,
    stealth_speed_meters_per_second: f64,
    footstep_sound_travel_distance_meters: f64,
    step_sound_time: f64,
    color_ui: Color,
    color_glow_friendly: Color,
    color_glow_enemy: Color,
    color_glow_team1: Color,
    color_glow_team2: Color,
    standard_level_up_upgrades: BTreeMap<String, f64>,
    /// Ability slot -> id of the item bound to it.
    #[serde(skip_serializing_if = "Option::is_none")]
    items: Option<BTreeMap<String, ItemId>>,
}

impl Hero {
    pub fn id(&self) -> HeroId {
        self.id
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn images(&self) -> &HeroImages {
        &self.images
    }

    pub fn player_selectable(&self) -> bool {
        self.player_selectable
    }

    pub fn disabled(&self) -> bool {
        self.disabled
    }

    pub fn in_development(&self) -> bool {
        self.in_development
    }

    pub fn complexity(&self) -> i64 {
        self.complexity
    }

    pub fn starting_stats(&self) -> &HeroStartingStats {
        &self.starting_stats
    }

    pub fn item_slot_info(&self) -> &HeroItemSlotInfo {
        &self.item_slot_info
    }

    pub fn purchase_bonuses(&self) -> &HeroPurchaseBonuses {
        &self.purchase_bonuses
    }

    pub fn level_info(&self) -> &BTreeMap<u32, HeroLevelInfo> {
        &self.level_info
    }

    pub fn collision_radius(&self) -> f64 {
        self.collision_radius
    }

    pub fn color_ui(&self) -> Color {
        self.color_ui
    }

    pub fn standard_level_up_upgrades(&self) -> &BTreeMap<String, f64> {
        &self.standard_level_up_upgrades
    }

    pub fn item_ids(&self) -> Option<&BTreeMap<String, ItemId>> {
        self.items.as_ref()
    }

    /// Looks the bound items up in the canonical set.
    pub fn items(&self, provider: &dyn AssetProvider) -> Vec<Arc<Item>> {
        self.items
            .iter()
            .flat_map(|items| items.values())
            .filter_map(|id| provider.item_by_id(*id))
            .collect()
    }

    /// A copy carrying a different display name.
    pub fn with_name(&self, name: String) -> Hero {
        Hero {
            name,
            ..self.clone()
        }
    }

    pub(crate) fn images_mut(&mut self) -> &mut HeroImages {
        &mut self.images
    }
}

#[derive(Builder, Debug, Clone, PartialEq, Serialize)]
pub struct Ability {
    id: ItemId,
    class_name: String,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hero: Option<HeroId>,
    #[builder(default)]
    disabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    ability_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    properties: Option<BTreeMap<String, ItemProperty>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    upgrades: Option<Vec<AbilityUpgrade>>,
}

impl Ability {
    pub fn ability_type(&self) -> Option<&str> {
        self.ability_type.as_deref()
    }

    pub fn upgrades(&self) -> Option<&[AbilityUpgrade]> {
        self.upgrades.as_deref()
    }
}

#[derive(Builder, Debug, Clone, PartialEq, Serialize)]
pub struct Weapon {
    id: ItemId,
    class_name: String,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hero: Option<HeroId>,
    #[builder(default)]
    disabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    properties: Option<BTreeMap<String, ItemProperty>>,
    weapon_info: WeaponInfo,
}

impl Weapon {
    pub fn weapon_info(&self) -> &WeaponInfo {
        &self.weapon_info
    }
}

#[derive(Builder, Debug, Clone, PartialEq, Serialize)]
pub struct Upgrade {
    id: ItemId,
    class_name: String,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    #[builder(default)]
    disabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    properties: Option<BTreeMap<String, ItemProperty>>,
    item_slot_type: Recognized<ItemSlotType>,
    item_tier: u32,
    #[builder(default)]
    is_active_item: bool,
    /// Items that must be owned before this one can be bought.
    #[serde(skip_serializing_if = "Option::is_none")]
    component_items: Option<Vec<ItemId>>,
}

impl Upgrade {
    pub fn item_slot_type(&self) -> &Recognized<ItemSlotType> {
        &self.item_slot_type
    }

    pub fn item_tier(&self) -> u32 {
        self.item_tier
    }

    pub fn is_active_item(&self) -> bool {
        self.is_active_item
    }

    pub fn component_item_ids(&self) -> Option<&[ItemId]> {
        self.component_items.as_deref()
    }
}

/// Every non-hero entity. Serialized with a `"type"` discriminator.
#[derive(Debug, Clone, PartialEq, Serialize, Variantly)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Item {
    Ability(Ability),
    Weapon(Weapon),
    Upgrade(Upgrade),
}

macro_rules! item_common {
    ($item:expr, $field:ident) => {
        match $item {
            Item::Ability(inner) => &inner.$field,
            Item::Weapon(inner) => &inner.$field,
            Item::Upgrade(inner) => &inner.$field,
        }
    };
}

impl Item {
    pub fn id(&self) -> ItemId {
        *item_common!(self, id)
    }

    pub fn class_name(&self) -> &str {
        item_common!(self, class_name)
    }

    pub fn name(&self) -> &str {
        item_common!(self, name)
    }

    pub fn image(&self) -> Option<&str> {
        item_common!(self, image).as_deref()
    }

    pub fn disabled(&self) -> bool {
        *item_common!(self, disabled)
    }

    pub fn properties(&self) -> Option<&BTreeMap<String, ItemProperty>> {
        item_common!(self, properties).as_ref()
    }

    pub fn item_type(&self) -> ItemType {
        match self {
            Item::Ability(_) => ItemType::Ability,
            Item::Weapon(_) => ItemType::Weapon,
            Item::Upgrade(_) => ItemType::Upgrade,
        }
    }

    pub fn kind(&self) -> Kind {
        self.item_type().kind()
    }

    /// Only upgrades live in a shop slot.
    pub fn item_slot_type(&self) -> Option<&Recognized<ItemSlotType>> {
        match self {
            Item::Upgrade(upgrade) => Some(&upgrade.item_slot_type),
            Item::Ability(_) | Item::Weapon(_) => None,
        }
    }

    pub fn hero_id(&self) -> Option<HeroId> {
        match self {
            Item::Ability(ability) => ability.hero,
            Item::Weapon(weapon) => weapon.hero,
            Item::Upgrade(_) => None,
        }
    }

    /// Resolves the owning hero against the canonical set.
    pub fn hero(&self, provider: &dyn AssetProvider) -> Option<Arc<Hero>> {
        self.hero_id().and_then(|id| provider.hero_by_id(id))
    }

    /// Resolves upgrade prerequisites against the canonical set.
    pub fn component_items(&self, provider: &dyn AssetProvider) -> Vec<Arc<Item>> {
        match self {
            Item::Upgrade(upgrade) => upgrade
                .component_items
                .iter()
                .flatten()
                .filter_map(|id| provider.item_by_id(*id))
                .collect(),
            Item::Ability(_) | Item::Weapon(_) => Vec::new(),
        }
    }

    /// A copy carrying a different display name.
    pub fn with_name(&self, name: String) -> Item {
        let mut item = self.clone();
        match &mut item {
            Item::Ability(inner) => inner.name = name,
            Item::Weapon(inner) => inner.name = name,
            Item::Upgrade(inner) => inner.name = name,
        }
        item
    }

    pub(crate) fn image_mut(&mut self) -> &mut Option<String> {
        match self {
            Item::Ability(inner) => &mut inner.image,
            Item::Weapon(inner) => &mut inner.image,
            Item::Upgrade(inner) => &mut inner.image,
        }
    }
}

/// Any built entity, for code that works across kinds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entity {
    Hero(Arc<Hero>),
    Item(Arc<Item>),
}

impl Entity {
    pub fn kind(&self) -> Kind {
        match self {
            Entity::Hero(_) => Kind::Hero,
            Entity::Item(item) => item.kind(),
        }
    }

    pub fn class_name(&self) -> &str {
        match self {
            Entity::Hero(hero) => hero.class_name(),
            Entity::Item(item) => item.class_name(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Entity::Hero(hero) => hero.name(),
            Entity::Item(item) => item.name(),
        }
    }

    /// The numeric id; unique only within the entity's kind.
    pub fn raw_id(&self) -> u64 {
        match self {
            Entity::Hero(hero) => hero.id().raw() as u64,
            Entity::Item(item) => item.id().raw() as u64,
        }
    }
}
