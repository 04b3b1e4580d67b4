//! Minimal raw records and in-memory sources shared by the unit tests.

use std::borrow::Cow;
use std::collections::HashMap;

use serde_json::{Value, json};

use crate::data::DataFileWithCallback;
use crate::error::ErrorKind;

use super::keys;

/// A hero record with every required field set. The hero binds
/// `weapon_<short>` as its primary weapon and `<short>_signature` as its
/// first signature ability.
pub(crate) fn hero_fields(short_name: &str, id: u32) -> Value {
    let mut fields = json!({
        "m_HeroID": id,
        "m_bPlayerSelectable": true,
        "m_bDisabled": false,
        "m_bInDevelopment": false,
        "m_bNeedsTesting": false,
        "m_bAssignedPlayersOnly": false,
        "m_bBotSelectable": true,
        "m_bLimitedTesting": 0,
        "m_nComplexity": 1,
        "m_nReadability": 2,
        "m_mapStartingStats": {
            "EMaxMoveSpeed": 7.2,
            "ESprintSpeed": 0.0,
            "ECrouchSpeed": 4,
            "EMoveAcceleration": 4.0,
            "ELightMeleeDamage": 50,
            "EHeavyMeleeDamage": 116,
            "EMaxHealth": 550,
            "EWeaponPower": 0,
            "EReloadSpeed": 1,
            "EWeaponPowerScale": 1,
            "EProcBuildUpRateScale": 1,
            "EStamina": 3,
            "EBaseHealthRegen": 2.0,
            "EStaminaRegenPerSecond": 0.2,
            "EAbilityResourceMax": 0,
            "EAbilityResourceRegenPerSecond": 0,
            "ECritDamageReceivedScale": 1.0,
            "ETechDuration": 1,
            "ETechRange": 1,
        },
        "m_flCollisionRadius": 20.0,
        "m_flCollisionHeight": 80.5,
        "m_flStepHeight": 12,
        "m_mapItemSlotInfo": {
            "EItemSlotType_WeaponMod": {"m_arMaxPurchasesForTier": [3, 3, 3, 3]},
            "EItemSlotType_Armor": {"m_arMaxPurchasesForTier": [3, 3, 3, 3]},
            "EItemSlotType_Tech": {"m_arMaxPurchasesForTier": [3, 3, 3, 3]},
        },
        "m_mapPurchaseBonuses": {
            "EItemSlotType_WeaponMod": [{"m_nTier": 1, "m_strValue": "7"}],
            "EItemSlotType_Armor": [],
            "EItemSlotType_Tech": [{"m_nTier": 2, "m_strValue": "4"}],
        },
        "m_mapLevelInfo": {
            "1": {"m_unRequiredGold": 0, "m_mapBonusCurrencies": {"EAbilityUnlocks": 1}},
            "3": {
                "m_unRequiredGold": 1000,
                "m_mapBonusCurrencies": [],
                "m_bUseStandardUpgrade": true,
            },
        },
        "m_flStealthSpeedMetersPerSecond": 4.5,
        "m_flFootstepSoundTravelDistanceMeters": 30.0,
        "m_flStepSoundTime": 0.35,
        "m_colorUI": [255, 128, 0],
        "m_colorGlowFriendly": [0, 255, 0],
        "m_colorGlowEnemy": [255, 0, 0],
        "m_colorGlowTeam1": [10, 20, 30],
        "m_colorGlowTeam2": [40, 50, 60],
        "m_mapStandardLevelUpUpgrades": {
            "MODIFIER_VALUE_BASE_BULLET_DAMAGE_FROM_LEVEL": 0.26,
            "MODIFIER_VALUE_BASE_MELEE_DAMAGE_FROM_LEVEL": 1,
        },
    });

    fields[keys::BOUND_ABILITIES] = json!({
        "ESlot_Weapon_Primary": format!("weapon_{short_name}"),
        "ESlot_Signature_1": format!("{short_name}_signature"),
    });
    fields[keys::IMAGE_CARD] = json!(format!(
        "panorama:\"file://{{images}}/heroes/{short_name}_card.psd\""
    ));
    fields
}

pub(crate) fn weapon_fields() -> Value {
    json!({
        "m_WeaponInfo": {"m_flCycleTime": 0.25, "m_iClipSize": 12, "m_flBulletDamage": 9.5},
        "m_strAbilityImage": "panorama:\"file://{images}/hud/weapon.psd\"",
    })
}

pub(crate) fn upgrade_fields(slot: &str, tier: u32, components: &[&str]) -> Value {
    json!({
        "m_eItemSlotType": slot,
        "m_iItemTier": format!("EModTier_{tier}"),
        "m_vecComponentItems": components,
        "m_mapAbilityProperties": {"BonusHealth": {"m_strValue": 75}},
    })
}

pub(crate) fn token_file(tokens: Value) -> Value {
    json!({"lang": {"Language": "english", "Tokens": tokens}})
}

/// Serves `files` (relative path -> JSON document) and reports everything
/// else as missing.
pub(crate) fn loader(
    files: Vec<(&str, Value)>,
) -> DataFileWithCallback<impl Fn(&str) -> Result<Cow<'static, [u8]>, ErrorKind>> {
    let files: HashMap<String, Vec<u8>> = files
        .into_iter()
        .map(|(path, document)| (path.to_string(), serde_json::to_vec(&document).unwrap()))
        .collect();

    DataFileWithCallback::new(move |path: &str| {
        files
            .get(path)
            .map(|data| Cow::Owned(data.clone()))
            .ok_or_else(|| ErrorKind::DatafileNotFound { path: path.to_string() })
    })
}

/// Two heroes, their weapons and signatures, a plain ability and a small shop.
pub(crate) fn sample_files() -> Vec<(&'static str, Value)> {
    let heroes = json!({
        "hero_astro": hero_fields("astro", 1),
        "hero_atlas": hero_fields("atlas", 2),
        "hero_base": {"m_HeroID": 99},
        "generic_data_type": "CitadelHeroData",
    });
    let items = json!({
        "weapon_astro": weapon_fields(),
        "weapon_atlas": weapon_fields(),
        "astro_signature": {"m_eAbilityType": "EAbilityType_Signature"},
        "atlas_signature": {"m_eAbilityType": "EAbilityType_Signature"},
        "ability_climb_rope": {"m_eAbilityType": "EAbilityType_Innate"},
        "upgrade_sprint_booster": upgrade_fields("EItemSlotType_WeaponMod", 1, &[]),
        "upgrade_extra_health": upgrade_fields("EItemSlotType_Armor", 1, &[]),
        "upgrade_fortitude": upgrade_fields("EItemSlotType_Armor", 3, &["upgrade_extra_health"]),
        "upgrade_mystic_burst": upgrade_fields("EItemSlotType_Tech", 2, &[]),
        "ability_base": {},
    });

    vec![
        (keys::RAW_HEROES_FILE, heroes),
        (keys::RAW_ITEMS_FILE, items),
        (
            "localization/citadel_gc_english.json",
            token_file(json!({"hero_astro": "Astro", "hero_atlas": "Abrams"})),
        ),
        (
            "localization/citadel_main_english.json",
            token_file(json!({
                "upgrade_sprint_booster": "Sprint Boots",
                "upgrade_extra_health": "Extra Health",
                "upgrade_fortitude": "Fortitude",
            })),
        ),
        (
            "localization/citadel_main_german.json",
            token_file(json!({"hero_atlas": "Abrams DE", "upgrade_extra_health": "Extra Leben"})),
        ),
    ]
}
