//! Image references: converting the game's panorama paths to files under
//! `images/`, and prefixing them with a deployment's base URL per request.

use super::keys;
use super::types::{Hero, HeroImages, Item};

const SOURCE_IMAGE_EXTENSIONS: &[&str] = &[".psd", ".vtex", ".tga", ".vtf"];

/// `panorama:"file://{images}/heroes/astro_card.psd"` -> `images/heroes/astro_card.png`.
///
/// Anything that is not a panorama reference is returned unchanged.
pub fn image_path(raw: &str) -> String {
    let Some(rest) = raw.strip_prefix(keys::PANORAMA_IMAGE_PREFIX) else {
        return raw.to_string();
    };
    let rest = rest.trim_end_matches('"');
    let stem = SOURCE_IMAGE_EXTENSIONS
        .iter()
        .find_map(|ext| rest.strip_suffix(ext))
        .unwrap_or(rest);
    format!("{}{stem}.png", keys::IMAGES_DIR)
}

/// Prefixes `path` with `base_url`. Applying it to an already absolute URL
/// prefixes it again; callers must only rewrite canonical relative paths.
pub fn rewrite(base_url: &str, path: &str) -> String {
    format!("{base_url}{path}")
}

/// Entities carrying image paths that can be turned into absolute URLs.
///
/// Returns a copy; the receiver keeps its relative paths.
pub trait WithBaseUrl: Sized {
    fn with_base_url(&self, base_url: &str) -> Self;
}

impl WithBaseUrl for HeroImages {
    fn with_base_url(&self, base_url: &str) -> Self {
        let mut images = self.clone();
        for path in images.paths_mut().into_iter().flatten() {
            *path = rewrite(base_url, path);
        }
        images
    }
}

impl WithBaseUrl for Hero {
    fn with_base_url(&self, base_url: &str) -> Self {
        let mut hero = self.clone();
        *hero.images_mut() = self.images().with_base_url(base_url);
        hero
    }
}

impl WithBaseUrl for Item {
    fn with_base_url(&self, base_url: &str) -> Self {
        let mut item = self.clone();
        if let Some(path) = item.image_mut() {
            *path = rewrite(base_url, path);
        }
        item
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn panorama_references_become_png_paths() {
        assert_eq!(
            image_path("panorama:\"file://{images}/heroes/astro_card.psd\""),
            "images/heroes/astro_card.png"
        );
        assert_eq!(
            image_path("panorama:\"file://{images}/upgrades/mods_tech.vtex\""),
            "images/upgrades/mods_tech.png"
        );
        assert_eq!(image_path("images/already.png"), "images/already.png");
    }

    #[test]
    fn rewriting_prefixes_every_present_path() {
        let images = HeroImages {
            portrait: Some("images/heroes/a.png".to_string()),
            gun: Some("images/guns/a.png".to_string()),
            ..Default::default()
        };
        let rewritten = images.with_base_url("https://cdn.example/");

        assert_eq!(
            rewritten.portrait.as_deref(),
            Some("https://cdn.example/images/heroes/a.png")
        );
        assert_eq!(rewritten.gun.as_deref(), Some("https://cdn.example/images/guns/a.png"));
        assert_eq!(rewritten.card, None);
        assert_eq!(images.portrait.as_deref(), Some("images/heroes/a.png"));
    }
}
