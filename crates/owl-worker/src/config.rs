//! Worker configuration
//!
//! Immutable configuration built once at worker startup and shared by all
//! handlers. Replaces the module-scope constants of a script worker.

use owl_cache::CacheGeneration;
use url::Url;

/// Defaults applied to push notifications when the payload omits a field.
#[derive(Debug, Clone)]
pub struct NotificationDefaults {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub vibrate: Vec<u32>,
    /// Path opened when a notification is clicked and no client is focusable.
    pub click_target: String,
}

impl Default for NotificationDefaults {
    fn default() -> Self {
        Self {
            title: "Notification".to_string(),
            body: "You have an update".to_string(),
            icon: "/icons/icon-192x192.png".to_string(),
            badge: "/icons/badge-72x72.png".to_string(),
            vibrate: vec![100, 50, 100],
            click_target: "/".to_string(),
        }
    }
}

/// Immutable gateway configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Cache name prefix.
    pub app_name: String,
    /// Version tag; changing it invalidates every other generation.
    pub version: String,
    /// App origin; only same-origin responses are persisted.
    pub origin: Url,
    /// Root-relative paths fetched and stored at install time.
    pub precache_manifest: Vec<String>,
    /// URL substrings routed network-first.
    pub api_markers: Vec<String>,
    /// Host substrings never intercepted (analytics etc.).
    pub bypass_hosts: Vec<String>,
    /// Root-relative document served for failed navigations.
    pub navigation_fallback: String,
    pub notification: NotificationDefaults,
}

impl WorkerConfig {
    pub fn builder(app_name: &str, version: &str, origin: Url) -> WorkerConfigBuilder {
        WorkerConfigBuilder {
            config: WorkerConfig {
                app_name: app_name.to_string(),
                version: version.to_string(),
                origin,
                precache_manifest: Vec::new(),
                api_markers: vec!["/api/".to_string()],
                bypass_hosts: vec!["google-analytics".to_string(), "gtag".to_string()],
                navigation_fallback: "/".to_string(),
                notification: NotificationDefaults::default(),
            },
        }
    }

    /// The cache generation this configuration names.
    pub fn generation(&self) -> CacheGeneration {
        CacheGeneration::new(&self.app_name, &self.version)
    }

    /// Absolutize a root-relative path against the app origin.
    pub fn absolute(&self, path: &str) -> Result<Url, url::ParseError> {
        self.origin.join(path)
    }
}

/// Builder for `WorkerConfig`.
#[derive(Debug)]
pub struct WorkerConfigBuilder {
    config: WorkerConfig,
}

impl WorkerConfigBuilder {
    pub fn precache(mut self, paths: &[&str]) -> Self {
        self.config.precache_manifest = paths.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn api_marker(mut self, marker: &str) -> Self {
        self.config.api_markers.push(marker.to_string());
        self
    }

    pub fn bypass_host(mut self, host: &str) -> Self {
        self.config.bypass_hosts.push(host.to_string());
        self
    }

    pub fn navigation_fallback(mut self, path: &str) -> Self {
        self.config.navigation_fallback = path.to_string();
        self
    }

    pub fn notification(mut self, defaults: NotificationDefaults) -> Self {
        self.config.notification = defaults;
        self
    }

    pub fn build(self) -> WorkerConfig {
        self.config
    }
}
