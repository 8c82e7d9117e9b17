/// Application name used for cache and config directories.
pub const APP_NAME: &str = "boostup";

/// Name of the folder shipped inside every prebuilt archive.
pub const BOOST_DIR_NAME: &str = "boost";

/// Package name literal leading every cache key.
pub const CACHE_KEY_PREFIX: &str = "boost";

/// Manifest published alongside the legacy (actions/boost-versions) builds.
pub const LEGACY_MANIFEST_URL: &str =
  "https://raw.githubusercontent.com/actions/boost-versions/main/versions-manifest.json";

/// Manifest published alongside the prebuilt-boost builds.
pub const DEFAULT_MANIFEST_URL: &str =
  "https://raw.githubusercontent.com/MarkusJx/prebuilt-boost/main/versions-manifest.json";

/// User agent sent with every HTTP request.
pub const USER_AGENT: &str = concat!("boostup/", env!("CARGO_PKG_VERSION"));
