//! Field names used by the exported hero and item records.
//!
//! The export keeps the game's Hungarian-notation member names; these constants
//! are the translation table between them and the crate's field names.

// Source files
pub const RAW_HEROES_FILE: &str = "raw_heroes.json";
pub const RAW_ITEMS_FILE: &str = "raw_items.json";
pub const LOCALIZATION_DIR: &str = "localization";

// Class name conventions
pub const CITADEL_PREFIX: &str = "citadel_";
pub const HERO_PREFIX: &str = "hero_";
pub const CLASS_SEPARATOR: char = '_';

// Hero identity and flags
pub const HERO_ID: &str = "m_HeroID";
pub const PLAYER_SELECTABLE: &str = "m_bPlayerSelectable";
pub const DISABLED: &str = "m_bDisabled";
pub const IN_DEVELOPMENT: &str = "m_bInDevelopment";
pub const NEEDS_TESTING: &str = "m_bNeedsTesting";
pub const ASSIGNED_PLAYERS_ONLY: &str = "m_bAssignedPlayersOnly";
pub const BOT_SELECTABLE: &str = "m_bBotSelectable";
pub const LIMITED_TESTING: &str = "m_bLimitedTesting";
pub const COMPLEXITY: &str = "m_nComplexity";
pub const READABILITY: &str = "m_nReadability";

// Hero tables
pub const STARTING_STATS: &str = "m_mapStartingStats";
pub const ITEM_SLOT_INFO: &str = "m_mapItemSlotInfo";
pub const PURCHASE_BONUSES: &str = "m_mapPurchaseBonuses";
pub const LEVEL_INFO: &str = "m_mapLevelInfo";
pub const STANDARD_LEVEL_UP_UPGRADES: &str = "m_mapStandardLevelUpUpgrades";
pub const BOUND_ABILITIES: &str = "m_mapBoundAbilities";

// Hero physical and audio stats
pub const COLLISION_RADIUS: &str = "m_flCollisionRadius";
pub const COLLISION_HEIGHT: &str = "m_flCollisionHeight";
pub const STEP_HEIGHT: &str = "m_flStepHeight";
pub const STEALTH_SPEED: &str = "m_flStealthSpeedMetersPerSecond";
pub const FOOTSTEP_SOUND_TRAVEL_DISTANCE: &str = "m_flFootstepSoundTravelDistanceMeters";
pub const STEP_SOUND_TIME: &str = "m_flStepSoundTime";

// Hero colors
pub const COLOR_UI: &str = "m_colorUI";
pub const COLOR_GLOW_FRIENDLY: &str = "m_colorGlowFriendly";
pub const COLOR_GLOW_ENEMY: &str = "m_colorGlowEnemy";
pub const COLOR_GLOW_TEAM1: &str = "m_colorGlowTeam1";
pub const COLOR_GLOW_TEAM2: &str = "m_colorGlowTeam2";

// Hero images
pub const IMAGE_PORTRAIT: &str = "m_strSelectionImage";
pub const IMAGE_CARD: &str = "m_strIconHeroCard";
pub const IMAGE_VERTICAL: &str = "m_strTopBarVertical";
pub const IMAGE_MINIMAP: &str = "m_strMinimapImage";
pub const IMAGE_SMALL: &str = "m_strIconImageSmall";
pub const IMAGE_GUN: &str = "m_strWeaponImage";

// Item fields shared by every kind
pub const ITEM_IMAGE: &str = "m_strAbilityImage";
pub const ITEM_PROPERTIES: &str = "m_mapAbilityProperties";

// Abilities
pub const ABILITY_TYPE: &str = "m_eAbilityType";
pub const ABILITY_UPGRADES: &str = "m_vecAbilityUpgrades";

// Weapons
pub const WEAPON_INFO: &str = "m_WeaponInfo";

// Upgrades
pub const ITEM_SLOT_TYPE: &str = "m_eItemSlotType";
pub const ITEM_TIER: &str = "m_iItemTier";
pub const IS_ACTIVE_ITEM: &str = "m_bIsActiveItem";
pub const COMPONENT_ITEMS: &str = "m_vecComponentItems";

// Enum spellings
pub const MOD_TIER_PREFIX: &str = "EModTier_";
pub const SLOT_WEAPON_MOD: &str = "EItemSlotType_WeaponMod";
pub const SLOT_ARMOR: &str = "EItemSlotType_Armor";
pub const SLOT_TECH: &str = "EItemSlotType_Tech";
pub const CURRENCY_ABILITY_UNLOCKS: &str = "EAbilityUnlocks";
pub const CURRENCY_ABILITY_POINTS: &str = "EAbilityPoints";

// Image references
pub const PANORAMA_IMAGE_PREFIX: &str = "panorama:\"file://{images}/";
pub const IMAGES_DIR: &str = "images/";
