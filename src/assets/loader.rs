//! Reads the exported hero and item mappings and filters out placeholder records.

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::data::DataFileLoader;
use crate::error::{ErrorKind, IResult};

use super::keys;

/// One undecoded record: its class name and the raw field mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub class_name: String,
    pub fields: Map<String, Value>,
}

/// Hero keys must look like `hero_<name>` and must not be one of the shared
/// base/placeholder definitions.
pub fn is_hero_key(key: &str) -> bool {
    key.starts_with(keys::HERO_PREFIX)
        && !key.contains("base")
        && !key.contains("generic")
        && !key.contains("dummy")
}

/// Item keys drop base and dummy definitions. `generic` records are only kept
/// when they also carry the `citadel` product prefix; the export curates
/// those by hand, so the rule is kept exactly as observed.
pub fn is_item_key(key: &str) -> bool {
    !key.contains("base")
        && !key.contains("dummy")
        && (!key.contains("generic") || key.contains("citadel"))
}

pub(crate) fn read_json_object(
    loader: &dyn DataFileLoader,
    path: &str,
) -> IResult<Map<String, Value>> {
    let data = loader.get(path)?;
    match serde_json::from_slice::<Value>(&data)? {
        Value::Object(map) => Ok(map),
        _ => Err(ErrorKind::InvalidSourceData {
            path: path.to_string(),
            location: "root".to_string(),
        }),
    }
}

fn records_from(map: Map<String, Value>, keep_key: fn(&str) -> bool) -> Vec<RawRecord> {
    map.into_iter()
        .filter_map(|(class_name, value)| {
            if !keep_key(&class_name) {
                trace!("skipping placeholder record {class_name}");
                return None;
            }
            match value {
                Value::Object(fields) => Some(RawRecord { class_name, fields }),
                _ => {
                    trace!("skipping non-object record {class_name}");
                    None
                }
            }
        })
        .collect()
}

/// Loads `raw_heroes.json`. Fails only if the file is missing or is not a JSON object.
pub fn load_raw_heroes(loader: &dyn DataFileLoader) -> IResult<Vec<RawRecord>> {
    debug!("loading raw heroes");
    let map = read_json_object(loader, keys::RAW_HEROES_FILE)?;
    Ok(records_from(map, is_hero_key))
}

/// Loads `raw_items.json`. Fails only if the file is missing or is not a JSON object.
pub fn load_raw_items(loader: &dyn DataFileLoader) -> IResult<Vec<RawRecord>> {
    debug!("loading raw items");
    let map = read_json_object(loader, keys::RAW_ITEMS_FILE)?;
    Ok(records_from(map, is_item_key))
}
