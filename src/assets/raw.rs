//! Typed decodings of single raw records.
//!
//! A failure here is always scoped to one record: it names the external field
//! and the value that was received, and the caller drops the record.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use serde_path_to_error::{Path, Segment};

use crate::error::RecordError;
use crate::game_types::{Color, HeroId};
use crate::recognized::Recognized;

use super::classify::{ItemClass, Kind};
use super::de::{lax_bool, lax_integer};
use super::images::image_path;
use super::keys;
use super::loader::RawRecord;
use super::types::{
    AbilityUpgrade, HeroImages, HeroItemSlotInfo, HeroLevelInfo, HeroPurchaseBonuses,
    HeroStartingStats, ItemProperty, ItemSlotType, WeaponInfo,
};

const PREVIEW_LEN: usize = 80;

fn preview(value: &Value) -> String {
    let text = value.to_string();
    if text.chars().count() <= PREVIEW_LEN {
        return text;
    }
    let mut short: String = text.chars().take(PREVIEW_LEN).collect();
    short.push_str("...");
    short
}

/// The value a deserializer error path points at inside `value`.
fn value_at<'v>(value: &'v Value, path: &Path) -> Option<&'v Value> {
    path.iter().try_fold(value, |value, segment| match segment {
        Segment::Map { key } => value.get(key.as_str()),
        Segment::Seq { index } => value.get(*index),
        _ => None,
    })
}

/// Field access over one record, producing [`RecordError::Decode`] on failure.
pub(crate) struct RawFields<'a> {
    class_name: &'a str,
    fields: &'a Map<String, Value>,
}

impl<'a> RawFields<'a> {
    pub(crate) fn new(record: &'a RawRecord) -> Self {
        Self {
            class_name: &record.class_name,
            fields: &record.fields,
        }
    }

    fn missing(&self, field: &str) -> RecordError {
        RecordError::decode(self.class_name, field, "missing required field")
    }

    fn invalid(
        &self,
        field: &str,
        expected: impl std::fmt::Display,
        value: &Value,
    ) -> RecordError {
        RecordError::decode(
            self.class_name,
            field,
            format!("expected {expected}, received {}", preview(value)),
        )
    }

    /// `null` counts as absent.
    fn get(&self, field: &str) -> Option<&'a Value> {
        self.fields.get(field).filter(|value| !value.is_null())
    }

    fn require(&self, field: &str) -> Result<&'a Value, RecordError> {
        self.get(field).ok_or_else(|| self.missing(field))
    }

    /// Errors inside nested tables name the full path, e.g.
    /// `m_mapStartingStats.EMaxHealth`, and preview the value found there.
    fn deserialize<T: DeserializeOwned>(
        &self,
        field: &str,
        value: &Value,
    ) -> Result<T, RecordError> {
        serde_path_to_error::deserialize(value).map_err(|err| {
            let path = err.path();
            let received = value_at(value, path).unwrap_or(value);
            let field = match path.iter().next() {
                Some(_) => format!("{field}.{path}"),
                None => field.to_string(),
            };
            RecordError::decode(
                self.class_name,
                &field,
                format!("{}, received {}", err.inner(), preview(received)),
            )
        })
    }

    pub(crate) fn required<T: DeserializeOwned>(&self, field: &str) -> Result<T, RecordError> {
        let value = self.require(field)?;
        self.deserialize(field, value)
    }

    pub(crate) fn optional<T: DeserializeOwned>(
        &self,
        field: &str,
    ) -> Result<Option<T>, RecordError> {
        self.get(field)
            .map(|value| self.deserialize(field, value))
            .transpose()
    }

    pub(crate) fn flag(&self, field: &str) -> Result<bool, RecordError> {
        let value = self.require(field)?;
        lax_bool(value).ok_or_else(|| self.invalid(field, "a boolean or 0/1", value))
    }

    pub(crate) fn optional_flag(&self, field: &str) -> Result<bool, RecordError> {
        match self.get(field) {
            Some(value) => {
                lax_bool(value).ok_or_else(|| self.invalid(field, "a boolean or 0/1", value))
            }
            None => Ok(false),
        }
    }

    pub(crate) fn integer(&self, field: &str) -> Result<i64, RecordError> {
        let value = self.require(field)?;
        lax_integer(value).ok_or_else(|| self.invalid(field, "an integer", value))
    }

    pub(crate) fn float(&self, field: &str) -> Result<f64, RecordError> {
        let value = self.require(field)?;
        value
            .as_f64()
            .ok_or_else(|| self.invalid(field, "a number", value))
    }

    /// Exactly three integer channels, each in `0..=255`.
    pub(crate) fn color(&self, field: &str) -> Result<Color, RecordError> {
        let value = self.require(field)?;
        let expected = "three integers in 0..=255";
        let channels = value
            .as_array()
            .filter(|channels| channels.len() == 3)
            .ok_or_else(|| self.invalid(field, expected, value))?;

        let mut color = [0u8; 3];
        for (slot, channel) in color.iter_mut().zip(channels) {
            *slot = lax_integer(channel)
                .and_then(|channel| u8::try_from(channel).ok())
                .ok_or_else(|| self.invalid(field, expected, value))?;
        }
        Ok(Color(color))
    }

    /// Converts panorama references to relative `images/` paths.
    pub(crate) fn image(&self, field: &str) -> Result<Option<String>, RecordError> {
        Ok(self.optional::<String>(field)?.map(|raw| image_path(&raw)))
    }

    /// Tiers are spelled `EModTier_3` or given as a plain integer.
    pub(crate) fn tier(&self, field: &str) -> Result<u32, RecordError> {
        let value = self.require(field)?;
        let tier = match value {
            Value::String(name) => name
                .strip_prefix(keys::MOD_TIER_PREFIX)
                .and_then(|tier| tier.parse::<u32>().ok()),
            other => lax_integer(other).and_then(|tier| u32::try_from(tier).ok()),
        };
        tier.ok_or_else(|| self.invalid(field, "EModTier_<n> or a non-negative integer", value))
    }
}

// =============================================================================
// Heroes
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct RawHero {
    pub class_name: String,
    pub id: HeroId,
    pub player_selectable: bool,
    pub disabled: bool,
    pub in_development: bool,
    pub needs_testing: bool,
    pub assigned_players_only: bool,
    pub bot_selectable: bool,
    pub limited_testing: bool,
    pub complexity: i64,
    pub readability: i64,
    pub starting_stats: HeroStartingStats,
    pub collision_radius: f64,
    pub collision_height: f64,
    pub step_height: f64,
    pub item_slot_info: HeroItemSlotInfo,
    pub purchase_bonuses: HeroPurchaseBonuses,
    pub level_info: BTreeMap<u32, HeroLevelInfo>,
    pub stealth_speed_meters_per_second: f64,
    pub footstep_sound_travel_distance_meters: f64,
    pub step_sound_time: f64,
    pub color_ui: Color,
    pub color_glow_friendly: Color,
    pub color_glow_enemy: Color,
    pub color_glow_team1: Color,
    pub color_glow_team2: Color,
    pub standard_level_up_upgrades: BTreeMap<String, f64>,
    /// Ability slot -> class name of the bound item.
    pub bound_abilities: Option<BTreeMap<String, String>>,
    pub images: HeroImages,
}

pub fn decode_hero(record: &RawRecord) -> Result<RawHero, RecordError> {
    let fields = RawFields::new(record);

    let id = fields.integer(keys::HERO_ID)?;
    let id = u32::try_from(id).map(HeroId::from).map_err(|_| {
        RecordError::decode(
            &record.class_name,
            keys::HERO_ID,
            format!("id out of range: {id}"),
        )
    })?;

    Ok(RawHero {
        class_name: record.class_name.clone(),
        id,
        player_selectable: fields.flag(keys::PLAYER_SELECTABLE)?,
        disabled: fields.flag(keys::DISABLED)?,
        in_development: fields.flag(keys::IN_DEVELOPMENT)?,
        needs_testing: fields.flag(keys::NEEDS_TESTING)?,
        assigned_players_only: fields.flag(keys::ASSIGNED_PLAYERS_ONLY)?,
        bot_selectable: fields.flag(keys::BOT_SELECTABLE)?,
        limited_testing: fields.flag(keys::LIMITED_TESTING)?,
        complexity: fields.integer(keys::COMPLEXITY)?,
        readability: fields.integer(keys::READABILITY)?,
        starting_stats: fields.required(keys::STARTING_STATS)?,
        collision_radius: fields.float(keys::COLLISION_RADIUS)?,
        collision_height: fields.float(keys::COLLISION_HEIGHT)?,
        step_height: fields.float(keys::STEP_HEIGHT)?,
        item_slot_info: fields.required(keys::ITEM_SLOT_INFO)?,
        purchase_bonuses: fields.required(keys::PURCHASE_BONUSES)?,
        level_info: fields.required(keys::LEVEL_INFO)?,
        stealth_speed_meters_per_second: fields.float(keys::STEALTH_SPEED)?,
        footstep_sound_travel_distance_meters: fields
            .float(keys::FOOTSTEP_SOUND_TRAVEL_DISTANCE)?,
        step_sound_time: fields.float(keys::STEP_SOUND_TIME)?,
        color_ui: fields.color(keys::COLOR_UI)?,
        color_glow_friendly: fields.color(keys::COLOR_GLOW_FRIENDLY)?,
        color_glow_enemy: fields.color(keys::COLOR_GLOW_ENEMY)?,
        color_glow_team1: fields.color(keys::COLOR_GLOW_TEAM1)?,
        color_glow_team2: fields.color(keys::COLOR_GLOW_TEAM2)?,
        standard_level_up_upgrades: fields.required(keys::STANDARD_LEVEL_UP_UPGRADES)?,
        bound_abilities: fields.optional(keys::BOUND_ABILITIES)?,
        images: HeroImages {
            portrait: fields.image(keys::IMAGE_PORTRAIT)?,
            card: fields.image(keys::IMAGE_CARD)?,
            vertical: fields.image(keys::IMAGE_VERTICAL)?,
            mm: fields.image(keys::IMAGE_MINIMAP)?,
            sm: fields.image(keys::IMAGE_SMALL)?,
            gun: fields.image(keys::IMAGE_GUN)?,
        },
    })
}

// =============================================================================
// Items
// =============================================================================

/// Fields every item kind carries.
#[derive(Debug, Clone, PartialEq)]
pub struct RawItemCommon {
    pub class_name: String,
    pub image: Option<String>,
    pub disabled: bool,
    pub properties: Option<BTreeMap<String, ItemProperty>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawAbility {
    pub common: RawItemCommon,
    /// Short name of the hero embedded in the class name, e.g. `astro`.
    pub owner_short_name: Option<String>,
    pub ability_type: Option<String>,
    pub upgrades: Option<Vec<AbilityUpgrade>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawWeapon {
    pub common: RawItemCommon,
    pub weapon_info: WeaponInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawUpgrade {
    pub common: RawItemCommon,
    pub item_slot_type: Recognized<ItemSlotType>,
    pub item_tier: u32,
    pub is_active_item: bool,
    /// Class names of prerequisite items.
    pub component_items: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RawItem {
    Ability(RawAbility),
    Weapon(RawWeapon),
    Upgrade(RawUpgrade),
}

impl RawItem {
    pub fn common(&self) -> &RawItemCommon {
        match self {
            RawItem::Ability(ability) => &ability.common,
            RawItem::Weapon(weapon) => &weapon.common,
            RawItem::Upgrade(upgrade) => &upgrade.common,
        }
    }

    pub fn class_name(&self) -> &str {
        &self.common().class_name
    }

    pub fn kind(&self) -> Kind {
        match self {
            RawItem::Ability(_) => Kind::Ability,
            RawItem::Weapon(_) => Kind::Weapon,
            RawItem::Upgrade(_) => Kind::Upgrade,
        }
    }
}

fn decode_common(
    record: &RawRecord,
    fields: &RawFields<'_>,
) -> Result<RawItemCommon, RecordError> {
    Ok(RawItemCommon {
        class_name: record.class_name.clone(),
        image: fields.image(keys::ITEM_IMAGE)?,
        disabled: fields.optional_flag(keys::DISABLED)?,
        properties: fields.optional(keys::ITEM_PROPERTIES)?,
    })
}

/// Decodes an item record into the variant its classification selected.
pub fn decode_item(record: &RawRecord, class: &ItemClass) -> Result<RawItem, RecordError> {
    let fields = RawFields::new(record);
    let common = decode_common(record, &fields)?;

    let item = match class {
        ItemClass::Ability | ItemClass::HeroAbility(_) => RawItem::Ability(RawAbility {
            common,
            owner_short_name: class.hero_short_name().map(str::to_string),
            ability_type: fields.optional(keys::ABILITY_TYPE)?,
            upgrades: fields.optional(keys::ABILITY_UPGRADES)?,
        }),
        ItemClass::Weapon => RawItem::Weapon(RawWeapon {
            common,
            weapon_info: fields.required(keys::WEAPON_INFO)?,
        }),
        ItemClass::Upgrade => RawItem::Upgrade(RawUpgrade {
            common,
            item_slot_type: fields.required(keys::ITEM_SLOT_TYPE)?,
            item_tier: fields.tier(keys::ITEM_TIER)?,
            is_active_item: fields.optional_flag(keys::IS_ACTIVE_ITEM)?,
            component_items: fields
                .optional::<Vec<String>>(keys::COMPONENT_ITEMS)?
                .filter(|components| !components.is_empty()),
        }),
    };
    Ok(item)
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;
    use crate::assets::fixtures;

    fn record(class_name: &str, fields: Value) -> RawRecord {
        RawRecord {
            class_name: class_name.to_string(),
            fields: match fields {
                Value::Object(map) => map,
                _ => panic!("fixture must be an object"),
            },
        }
    }

    fn decode_error_field(err: RecordError) -> String {
        match err {
            RecordError::Decode { field, .. } => field,
            other => panic!("expected a decode error, got {other:?}"),
        }
    }

    #[test]
    fn decodes_a_complete_hero() {
        let hero = decode_hero(&record("hero_astro", fixtures::hero_fields("astro", 1))).unwrap();

        assert_eq!(hero.id, HeroId::from(1));
        assert_eq!(hero.color_ui, Color([255, 128, 0]));
        assert_eq!(hero.starting_stats.max_move_speed, 7.2);
        assert_eq!(hero.starting_stats.bullet_armor_damage_reduction, None);
        assert_eq!(hero.level_info.keys().copied().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(
            hero.images.card.as_deref(),
            Some("images/heroes/astro_card.png")
        );
        assert_eq!(
            hero.bound_abilities
                .as_ref()
                .and_then(|bound| bound.get("ESlot_Weapon_Primary"))
                .map(String::as_str),
            Some("weapon_astro")
        );
    }

    #[test]
    fn flags_and_integers_are_lax() {
        let mut fields = fixtures::hero_fields("atlas", 2);
        fields[keys::DISABLED] = json!(1);
        fields[keys::COMPLEXITY] = json!(3.0);
        let hero = decode_hero(&record("hero_atlas", fields)).unwrap();

        assert!(hero.disabled);
        assert_eq!(hero.complexity, 3);
    }

    #[test]
    fn nested_tables_are_lax_too() {
        let mut fields = fixtures::hero_fields("astro", 1);
        fields[keys::STARTING_STATS]["EMaxHealth"] = json!(550.0);
        fields[keys::LEVEL_INFO]["3"]["m_bUseStandardUpgrade"] = json!(1);
        fields[keys::LEVEL_INFO]["3"]["m_unRequiredGold"] = json!(1000.0);
        fields[keys::PURCHASE_BONUSES]["EItemSlotType_Tech"][0]["m_nTier"] = json!(2.0);
        fields[keys::ITEM_SLOT_INFO]["EItemSlotType_Armor"]["m_arMaxPurchasesForTier"] =
            json!([3.0, 2, 1.0, 0]);
        let hero = decode_hero(&record("hero_astro", fields)).unwrap();

        assert_eq!(hero.starting_stats.max_health, 550);
        assert!(hero.level_info[&3].use_standard_upgrade);
        assert_eq!(hero.level_info[&3].required_gold, Some(1000));
        assert_eq!(hero.purchase_bonuses.tech[0].tier, 2);
        assert_eq!(hero.item_slot_info.armor.max_purchase_for_tier, vec![3, 2, 1, 0]);

        let weapon = decode_item(
            &record("weapon_astro", json!({"m_WeaponInfo": {"m_iBullets": 6.0}})),
            &ItemClass::Weapon,
        )
        .unwrap();
        let RawItem::Weapon(weapon) = weapon else {
            panic!("expected a weapon");
        };
        assert_eq!(weapon.weapon_info.bullets, Some(6));
    }

    #[test]
    fn nested_decode_errors_name_the_inner_field() {
        let mut fields = fixtures::hero_fields("astro", 1);
        fields[keys::STARTING_STATS]["EMaxHealth"] = json!("lots");
        let err = decode_hero(&record("hero_astro", fields)).unwrap_err();

        assert!(err.to_string().contains("received \"lots\""), "{err}");
        assert_eq!(decode_error_field(err), "m_mapStartingStats.EMaxHealth");

        let mut fields = fixtures::hero_fields("astro", 1);
        fields[keys::LEVEL_INFO]["3"]["m_bUseStandardUpgrade"] = json!(2);
        let err = decode_hero(&record("hero_astro", fields)).unwrap_err();

        assert!(err.to_string().contains("received 2"), "{err}");
        assert_eq!(decode_error_field(err), "m_mapLevelInfo.3.m_bUseStandardUpgrade");
    }

    #[test]
    fn colors_must_be_three_bytes() {
        for bad in [json!([255, 0]), json!([256, 0, 0]), json!([1, 2, 3, 4]), json!("red")] {
            let mut fields = fixtures::hero_fields("astro", 1);
            fields[keys::COLOR_GLOW_ENEMY] = bad.clone();
            let err = decode_hero(&record("hero_astro", fields)).unwrap_err();

            assert_eq!(decode_error_field(err.clone()), keys::COLOR_GLOW_ENEMY);
            assert!(err.to_string().contains(&bad.to_string()), "{err}");
        }
    }

    #[test]
    fn missing_required_fields_name_the_field() {
        let mut fields = fixtures::hero_fields("astro", 1);
        fields.as_object_mut().unwrap().shift_remove(keys::STARTING_STATS);
        let err = decode_hero(&record("hero_astro", fields)).unwrap_err();

        assert_eq!(err.class_name(), "hero_astro");
        assert_eq!(decode_error_field(err), keys::STARTING_STATS);
    }

    #[test]
    fn upgrades_parse_tiers_and_slots() {
        let upgrade = decode_item(
            &record("upgrade_overdrive", json!({
                "m_eItemSlotType": "EItemSlotType_Tech",
                "m_iItemTier": "EModTier_3",
                "m_vecComponentItems": [],
                "m_strAbilityImage": "panorama:\"file://{images}/upgrades/overdrive.psd\"",
            })),
            &ItemClass::Upgrade,
        )
        .unwrap();

        let RawItem::Upgrade(upgrade) = upgrade else {
            panic!("expected an upgrade");
        };
        assert_eq!(upgrade.item_slot_type, Recognized::Known(ItemSlotType::Tech));
        assert_eq!(upgrade.item_tier, 3);
        assert!(!upgrade.is_active_item);
        assert_eq!(upgrade.component_items, None);
        assert_eq!(
            upgrade.common.image.as_deref(),
            Some("images/upgrades/overdrive.png")
        );

        let numeric = decode_item(
            &record(
                "upgrade_plain",
                json!({"m_eItemSlotType": "EItemSlotType_Flex", "m_iItemTier": 2}),
            ),
            &ItemClass::Upgrade,
        )
        .unwrap();
        let RawItem::Upgrade(numeric) = numeric else {
            panic!("expected an upgrade");
        };
        assert_eq!(numeric.item_tier, 2);
        assert_eq!(
            numeric.item_slot_type.unknown().map(String::as_str),
            Some("EItemSlotType_Flex")
        );
    }

    #[test]
    fn bad_tier_is_a_decode_error() {
        let err = decode_item(
            &record(
                "upgrade_bad",
                json!({"m_eItemSlotType": "EItemSlotType_Armor", "m_iItemTier": "Tier3"}),
            ),
            &ItemClass::Upgrade,
        )
        .unwrap_err();
        assert_eq!(decode_error_field(err), keys::ITEM_TIER);
    }

    #[test]
    fn weapons_require_weapon_info() {
        let err = decode_item(&record("weapon_astro", json!({})), &ItemClass::Weapon).unwrap_err();
        assert_eq!(decode_error_field(err), keys::WEAPON_INFO);

        let weapon = decode_item(
            &record(
                "weapon_astro",
                json!({"m_WeaponInfo": {"m_iClipSize": 12, "m_flCycleTime": 0.25}}),
            ),
            &ItemClass::Weapon,
        )
        .unwrap();
        let RawItem::Weapon(weapon) = weapon else {
            panic!("expected a weapon");
        };
        assert_eq!(weapon.weapon_info.clip_size, Some(12));
        assert_eq!(weapon.weapon_info.cycle_time, Some(0.25));
        assert_eq!(weapon.weapon_info.bullets, None);
    }

    #[test]
    fn hero_abilities_remember_their_owner() {
        let ability = decode_item(
            &record("astro_shotgun", json!({"m_eAbilityType": "EAbilityType_Signature"})),
            &ItemClass::HeroAbility("astro".to_string()),
        )
        .unwrap();

        let RawItem::Ability(ability) = ability else {
            panic!("expected an ability");
        };
        assert_eq!(ability.owner_short_name.as_deref(), Some("astro"));
        assert_eq!(ability.ability_type.as_deref(), Some("EAbilityType_Signature"));
    }
}
