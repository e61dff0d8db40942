//! Route variant registry: (route template, version) -> handler variant
//!
//! The registry is populated once at startup through [`RegistryBuilder`] and
//! frozen into an immutable [`VariantRegistry`]. Request-handling tasks read
//! it behind an `Arc` without synchronization. Attribute-style version
//! annotations from other ecosystems become plain registration calls here;
//! dispatch is a data lookup, not language-level polymorphism.

use crate::handler::{into_boxed_handler, BoxedHandler, Handler};
use crate::version::ApiVersion;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Error raised while building the registry. Startup-fatal: it aborts the
/// build phase and never surfaces to a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The same (route template, version) key was registered twice.
    #[error("duplicate registration for route {route:?} version {version}")]
    DuplicateRegistration {
        /// The route template being registered.
        route: String,
        /// The already-registered version.
        version: ApiVersion,
    },
}

/// One registered handler variant.
pub struct VariantEntry {
    pub(crate) handler: BoxedHandler,
    pub(crate) deprecated: bool,
}

impl VariantEntry {
    /// Whether this variant is flagged for client-visible sunset warning.
    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }
}

/// Supported and deprecated versions registered for one route template.
///
/// This is the metadata an API-description layer consumes; document
/// generation itself lives outside this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteVersions {
    /// The route template.
    pub route: String,
    /// All registered versions, sorted ascending.
    pub supported: Vec<ApiVersion>,
    /// The subset flagged deprecated, sorted ascending.
    pub deprecated: Vec<ApiVersion>,
}

/// Builder for the registry. Consuming, `?`-chained:
///
/// ```rust,ignore
/// let registry = RegistryBuilder::new()
///     .variant("/api/customers", ApiVersion::new(1, 0), customers_v1)?
///     .variant("/api/customers", ApiVersion::new(2, 0), customers_v2)?
///     .build();
/// ```
pub struct RegistryBuilder {
    routes: HashMap<String, BTreeMap<ApiVersion, VariantEntry>>,
}

impl RegistryBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    /// Register a handler variant for `(route, version)`.
    pub fn variant<H, T>(
        self,
        route: &str,
        version: ApiVersion,
        handler: H,
    ) -> Result<Self, RegistryError>
    where
        H: Handler<T>,
        T: 'static,
    {
        self.insert(route, version, into_boxed_handler(handler), false)
    }

    /// Register a still-servable variant flagged for sunset.
    pub fn deprecated_variant<H, T>(
        self,
        route: &str,
        version: ApiVersion,
        handler: H,
    ) -> Result<Self, RegistryError>
    where
        H: Handler<T>,
        T: 'static,
    {
        self.insert(route, version, into_boxed_handler(handler), true)
    }

    fn insert(
        mut self,
        route: &str,
        version: ApiVersion,
        handler: BoxedHandler,
        deprecated: bool,
    ) -> Result<Self, RegistryError> {
        let variants = self.routes.entry(route.to_string()).or_default();
        if variants.contains_key(&version) {
            return Err(RegistryError::DuplicateRegistration {
                route: route.to_string(),
                version,
            });
        }
        variants.insert(version, VariantEntry { handler, deprecated });
        Ok(self)
    }

    /// Freeze the builder into an immutable registry.
    pub fn build(self) -> VariantRegistry {
        VariantRegistry {
            routes: self.routes,
        }
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable mapping from (route template, version) to a handler variant.
pub struct VariantRegistry {
    routes: HashMap<String, BTreeMap<ApiVersion, VariantEntry>>,
}

impl VariantRegistry {
    /// Look up the variant registered for `(route, version)`.
    pub fn lookup(&self, route: &str, version: ApiVersion) -> Option<&VariantEntry> {
        self.routes.get(route)?.get(&version)
    }

    /// All versions registered for a route, sorted ascending.
    /// Empty for an unknown route.
    pub fn supported_versions(&self, route: &str) -> BTreeSet<ApiVersion> {
        self.routes
            .get(route)
            .map(|variants| variants.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Whether `(route, version)` is registered and flagged deprecated.
    pub fn is_deprecated(&self, route: &str, version: ApiVersion) -> bool {
        self.lookup(route, version)
            .map(|entry| entry.deprecated)
            .unwrap_or(false)
    }

    /// The registered route templates, in unspecified order.
    pub fn route_templates(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    /// Version metadata for every route, sorted by route template.
    pub fn version_descriptions(&self) -> Vec<RouteVersions> {
        let mut descriptions: Vec<RouteVersions> = self
            .routes
            .iter()
            .map(|(route, variants)| RouteVersions {
                route: route.clone(),
                supported: variants.keys().copied().collect(),
                deprecated: variants
                    .iter()
                    .filter(|(_, entry)| entry.deprecated)
                    .map(|(version, _)| *version)
                    .collect(),
            })
            .collect();
        descriptions.sort_by(|a, b| a.route.cmp(&b.route));
        descriptions
    }
}
