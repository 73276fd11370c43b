//! Versioned asset manifest.
//!
//! Resolves the configured asset paths against the worker scope once, so the
//! rest of the worker deals only in absolute URLs.

use crate::error::{OfflineError, Result};
use bridge_traits::http::FetchRequest;
use core_runtime::config::OfflineConfig;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheManifest {
    store_name: String,
    scope: Url,
    assets: Vec<Url>,
}

impl CacheManifest {
    /// Builds the manifest for `config`, resolving each asset against `scope`.
    pub fn new(config: &OfflineConfig, scope: &str) -> Result<Self> {
        let scope = Url::parse(scope).map_err(|err| OfflineError::InvalidScope {
            url: scope.to_string(),
            reason: err.to_string(),
        })?;
        if scope.cannot_be_a_base() {
            return Err(OfflineError::InvalidScope {
                url: scope.to_string(),
                reason: "scope cannot be used as a base URL".to_string(),
            });
        }

        let mut assets = Vec::with_capacity(config.assets.len());
        for path in &config.assets {
            let mut resolved = scope.join(path).map_err(|err| OfflineError::InvalidAsset {
                path: path.clone(),
                reason: err.to_string(),
            })?;
            resolved.set_fragment(None);
            if !assets.contains(&resolved) {
                assets.push(resolved);
            }
        }

        Ok(Self {
            store_name: config.store_name(),
            scope,
            assets,
        })
    }

    /// Name of the store that is current for this version.
    pub fn store_name(&self) -> &str {
        &self.store_name
    }

    pub fn scope(&self) -> &Url {
        &self.scope
    }

    pub fn assets(&self) -> &[Url] {
        &self.assets
    }

    /// One GET request per asset, in manifest order.
    pub fn requests(&self) -> Vec<FetchRequest> {
        self.assets
            .iter()
            .map(|url| FetchRequest::get(url.as_str()))
            .collect()
    }

    /// Whether `url` is one of the listed assets (fragment ignored).
    pub fn lists(&self, url: &str) -> bool {
        match Url::parse(url) {
            Ok(mut parsed) => {
                parsed.set_fragment(None);
                self.assets.contains(&parsed)
            }
            Err(_) => false,
        }
    }

    /// Whether `url` shares the scope's origin.
    pub fn is_same_origin(&self, url: &str) -> bool {
        Url::parse(url)
            .map(|parsed| parsed.origin() == self.scope.origin())
            .unwrap_or(false)
    }

    /// Whether a store named `name` belongs to another version.
    pub fn is_stale(&self, name: &str) -> bool {
        name != self.store_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCOPE: &str = "https://music.example/app/";

    #[test]
    fn assets_resolve_against_scope() {
        let manifest = CacheManifest::new(&OfflineConfig::default(), SCOPE).unwrap();
        let urls: Vec<&str> = manifest.assets().iter().map(Url::as_str).collect();

        assert_eq!(urls[0], "https://music.example/app/");
        assert_eq!(urls[1], "https://music.example/app/index.html");
        assert!(urls.contains(&"https://music.example/app/icons/icon-512.svg"));
        assert_eq!(manifest.store_name(), "soundscape-v3");
    }

    #[test]
    fn duplicate_paths_collapse() {
        let config = OfflineConfig {
            assets: vec!["./app.js".into(), "app.js".into(), "./app.js#main".into()],
            ..OfflineConfig::default()
        };
        let manifest = CacheManifest::new(&config, SCOPE).unwrap();
        assert_eq!(manifest.assets().len(), 1);
    }

    #[test]
    fn invalid_scope_is_rejected() {
        let err = CacheManifest::new(&OfflineConfig::default(), "not a url").unwrap_err();
        assert!(matches!(err, OfflineError::InvalidScope { .. }));

        let err = CacheManifest::new(&OfflineConfig::default(), "data:text/plain,hi").unwrap_err();
        assert!(matches!(err, OfflineError::InvalidScope { .. }));
    }

    #[test]
    fn origin_and_listing_checks() {
        let manifest = CacheManifest::new(&OfflineConfig::default(), SCOPE).unwrap();

        assert!(manifest.is_same_origin("https://music.example/other/page"));
        assert!(!manifest.is_same_origin("https://cdn.example/app.js"));
        assert!(!manifest.is_same_origin("http://music.example/app/"));
        assert!(manifest.lists("https://music.example/app/style.css#x"));
        assert!(!manifest.lists("https://music.example/app/extra.css"));
    }

    #[test]
    fn staleness_is_by_exact_name() {
        let config = OfflineConfig {
            version: "v4".into(),
            ..OfflineConfig::default()
        };
        let manifest = CacheManifest::new(&config, SCOPE).unwrap();

        assert!(!manifest.is_stale("soundscape-v4"));
        assert!(manifest.is_stale("soundscape-v3"));
        assert!(manifest.is_stale("other-app"));
    }
}
