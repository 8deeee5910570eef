//! Path-typed config keys where an empty value means "use the default".
//!
//! The GUI shows a placeholder for defaulted paths, so the round trip is:
//! stored `""` resolves to the computed default, and a user entry equal to
//! the default is stored back as `""` ([`PathResolver::store_value`]).

use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

use crate::config::{keys, ConfigDocument};

/// The path-typed configuration keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathKey {
    /// Template NAMELIST directory, default `<root>/public/ww3`.
    PublicWw3,
    /// Forcing data, default `<root>/public/forcing`.
    Forcing,
    /// Gridgen scripts, default `<root>/gridgen`.
    Gridgen,
    /// Gridgen reference data, default `<root>/gridgen/reference_data`.
    ReferenceData,
    /// Parent of new working directories, default `<root>/workSpace`.
    DefaultWorkdir,
    /// WW3 executables; no default.
    Ww3Bin,
    /// The selected working directory; no default.
    CurrentWorkdir,
}

impl PathKey {
    pub fn all() -> &'static [PathKey] {
        &[
            PathKey::PublicWw3,
            PathKey::Forcing,
            PathKey::Gridgen,
            PathKey::ReferenceData,
            PathKey::DefaultWorkdir,
            PathKey::Ww3Bin,
            PathKey::CurrentWorkdir,
        ]
    }

    /// Config key holding this path.
    pub fn config_key(&self) -> &'static str {
        match self {
            PathKey::PublicWw3 => keys::PUBLIC_WW3_PATH,
            PathKey::Forcing => keys::FORCING_PATH,
            PathKey::Gridgen => keys::GRIDGEN_PATH,
            PathKey::ReferenceData => keys::REFERENCE_DATA_PATH,
            PathKey::DefaultWorkdir => keys::DEFAULT_WORKDIR,
            PathKey::Ww3Bin => keys::WW3BIN_PATH,
            PathKey::CurrentWorkdir => keys::CURRENT_WORKDIR,
        }
    }

    pub fn from_config_key(key: &str) -> Option<Self> {
        Self::all().iter().copied().find(|k| k.config_key() == key)
    }

    fn default_components(&self) -> Option<&'static [&'static str]> {
        match self {
            PathKey::PublicWw3 => Some(&["public", "ww3"]),
            PathKey::Forcing => Some(&["public", "forcing"]),
            PathKey::Gridgen => Some(&["gridgen"]),
            PathKey::ReferenceData => Some(&["gridgen", "reference_data"]),
            PathKey::DefaultWorkdir => Some(&["workSpace"]),
            PathKey::Ww3Bin | PathKey::CurrentWorkdir => None,
        }
    }
}

/// Resolves path keys against the application root.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    /// `root` is the application directory holding `public/` and `gridgen/`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let root = if root.is_absolute() {
            root.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(root))
                .unwrap_or_else(|_| root.to_path_buf())
        };
        Self {
            root: normalize_lexically(&root),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The documented default for `key`, if it has one.
    pub fn default_for(&self, key: PathKey) -> Option<PathBuf> {
        key.default_components()
            .map(|parts| parts.iter().fold(self.root.clone(), |acc, p| acc.join(p)))
    }

    /// Normalize user text: native separators, relative to root, `.`/`..`
    /// collapsed.
    pub fn normalize(&self, raw: &str) -> PathBuf {
        let native: String = raw
            .trim()
            .chars()
            .map(|c| if c == '/' || c == '\\' { MAIN_SEPARATOR } else { c })
            .collect();
        let path = Path::new(&native);
        if path.is_absolute() {
            normalize_lexically(path)
        } else {
            normalize_lexically(&self.root.join(path))
        }
    }

    /// Absolute path for `key`: the stored value, or the default if empty.
    ///
    /// `None` only for keys without a default that are unset.
    pub fn resolve(&self, doc: &ConfigDocument, key: PathKey) -> Option<PathBuf> {
        let stored = doc.get_str(key.config_key()).trim();
        if stored.is_empty() {
            self.default_for(key)
        } else {
            Some(self.normalize(stored))
        }
    }

    /// Text for the GUI field: empty when the stored value is (or equals)
    /// the default, so the placeholder shows.
    pub fn display_for(&self, doc: &ConfigDocument, key: PathKey) -> String {
        let stored = doc.get_str(key.config_key()).trim();
        if stored.is_empty() {
            return String::new();
        }
        let normalized = self.normalize(stored);
        if self.default_for(key).as_ref() == Some(&normalized) {
            String::new()
        } else {
            normalized.to_string_lossy().into_owned()
        }
    }

    /// Value to persist for user input: `""` for empty input or the default.
    pub fn store_value(&self, key: PathKey, input: &str) -> String {
        if input.trim().is_empty() {
            return String::new();
        }
        let normalized = self.normalize(input);
        if self.default_for(key).as_ref() == Some(&normalized) {
            String::new()
        } else {
            normalized.to_string_lossy().into_owned()
        }
    }
}

/// Collapse `.` and `..` without touching the filesystem.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(out.components().next_back(), Some(Component::Normal(_)))
                    && out.pop();
                if !popped && !out.has_root() {
                    out.push("..");
                }
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> PathResolver {
        PathResolver::new("/opt/ww3tool")
    }

    #[test]
    fn empty_values_resolve_to_defaults() {
        let doc = ConfigDocument::defaults();
        let r = resolver();

        assert_eq!(
            r.resolve(&doc, PathKey::PublicWw3),
            Some(PathBuf::from("/opt/ww3tool/public/ww3"))
        );
        assert_eq!(
            r.resolve(&doc, PathKey::Forcing),
            Some(PathBuf::from("/opt/ww3tool/public/forcing"))
        );
        assert_eq!(
            r.resolve(&doc, PathKey::Gridgen),
            Some(PathBuf::from("/opt/ww3tool/gridgen"))
        );
        assert_eq!(
            r.resolve(&doc, PathKey::ReferenceData),
            Some(PathBuf::from("/opt/ww3tool/gridgen/reference_data"))
        );
        assert_eq!(
            r.resolve(&doc, PathKey::DefaultWorkdir),
            Some(PathBuf::from("/opt/ww3tool/workSpace"))
        );
        assert_eq!(r.resolve(&doc, PathKey::Ww3Bin), None);
    }

    #[test]
    fn stored_values_are_normalized() {
        let mut doc = ConfigDocument::defaults();
        doc.set(keys::FORCING_PATH, "/data/./forcing/../wind\\era5");
        doc.set(keys::WW3BIN_PATH, "bin/ww3");

        let r = resolver();
        assert_eq!(
            r.resolve(&doc, PathKey::Forcing),
            Some(PathBuf::from("/data/wind/era5"))
        );
        assert_eq!(
            r.resolve(&doc, PathKey::Ww3Bin),
            Some(PathBuf::from("/opt/ww3tool/bin/ww3"))
        );
    }

    #[test]
    fn display_hides_defaults() {
        let mut doc = ConfigDocument::defaults();
        let r = resolver();

        assert_eq!(r.display_for(&doc, PathKey::PublicWw3), "");

        doc.set(keys::PUBLIC_WW3_PATH, "/opt/ww3tool/public/./ww3/");
        assert_eq!(r.display_for(&doc, PathKey::PublicWw3), "");

        doc.set(keys::PUBLIC_WW3_PATH, "/srv/templates");
        assert_eq!(r.display_for(&doc, PathKey::PublicWw3), "/srv/templates");
    }

    #[test]
    fn store_value_inverts_display() {
        let r = resolver();
        assert_eq!(r.store_value(PathKey::Gridgen, "  "), "");
        assert_eq!(r.store_value(PathKey::Gridgen, "/opt/ww3tool/gridgen"), "");
        assert_eq!(r.store_value(PathKey::Gridgen, "/srv/gridgen"), "/srv/gridgen");
        assert_eq!(r.store_value(PathKey::Ww3Bin, "/opt/ww3/bin"), "/opt/ww3/bin");
    }

    #[test]
    fn lexical_normalization() {
        assert_eq!(normalize_lexically(Path::new("/a/b/../c/./d")), PathBuf::from("/a/c/d"));
        assert_eq!(normalize_lexically(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(normalize_lexically(Path::new("../a")), PathBuf::from("../a"));
    }

    #[test]
    fn keys_map_both_ways() {
        for key in PathKey::all() {
            assert_eq!(PathKey::from_config_key(key.config_key()), Some(*key));
        }
        assert_eq!(PathKey::from_config_key("DX"), None);
    }
}
