//! Per-framework path conventions
//!
//! Frameworks lay their component files out differently. Each file is
//! resolved once, at load time, into the uniform
//! `framework/category/component_type/variant` key; queries never branch on
//! the framework name.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QueryError;

/// Category used for files placed directly under a framework directory
pub const FLAT_CATEGORY: &str = "all";

/// Component type used when the layout has no component-type directory
pub const FLAT_COMPONENT_TYPE: &str = "components";

/// How files below a framework directory map onto catalog keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathScheme {
    /// `<category>/<type>/<n>[-suffix].<ext>` (HyperUI)
    Numbered,
    /// `<name>.<ext>`, `<category>/<name>.<ext>` or `<category>/<type>/<name>.<ext>`
    #[serde(alias = "named")]
    NamedVariant,
    /// `<category>/<plugin>/<file>.<ext>` (FlyonUI plugins)
    #[serde(alias = "plugins")]
    PluginFileSet,
}

/// Where a file lands in the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub category: String,
    pub component_type: String,
    pub variant: String,
}

impl PathScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            PathScheme::Numbered => "numbered",
            PathScheme::NamedVariant => "named_variant",
            PathScheme::PluginFileSet => "plugin_file_set",
        }
    }

    /// Resolve the path components below the framework directory
    ///
    /// `rest` ends with the file name. The error is a human-readable reason
    /// suitable for a load warning.
    pub fn resolve(self, rest: &[&str]) -> Result<Location, String> {
        let (file_name, dirs) = rest
            .split_last()
            .ok_or_else(|| "no file name".to_string())?;
        let variant = file_stem(file_name);

        for dir in dirs {
            validate_segment(dir).map_err(|e| format!("directory {:?}: {}", dir, e))?;
        }
        validate_segment(variant).map_err(|e| format!("variant {:?}: {}", variant, e))?;

        let location = match (self, dirs) {
            (PathScheme::Numbered, [category, component_type]) => {
                if !is_numbered_variant(variant) {
                    return Err(format!(
                        "variant {:?} is not numbered (expected e.g. 1 or 1-dark)",
                        variant
                    ));
                }
                Location::new(category, component_type, variant)
            }
            (PathScheme::PluginFileSet, [category, plugin]) => {
                Location::new(category, plugin, variant)
            }
            (PathScheme::NamedVariant, []) => {
                Location::new(FLAT_CATEGORY, FLAT_COMPONENT_TYPE, variant)
            }
            (PathScheme::NamedVariant, [category]) => {
                Location::new(category, FLAT_COMPONENT_TYPE, variant)
            }
            (PathScheme::NamedVariant, [category, component_type]) => {
                Location::new(category, component_type, variant)
            }
            (scheme, dirs) => {
                return Err(format!(
                    "{} layout does not allow {} directory level(s) below the framework",
                    scheme.as_str(),
                    dirs.len()
                ))
            }
        };

        Ok(location)
    }
}

impl std::fmt::Display for PathScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PathScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "numbered" => Ok(PathScheme::Numbered),
            "named_variant" | "named" => Ok(PathScheme::NamedVariant),
            "plugin_file_set" | "plugins" => Ok(PathScheme::PluginFileSet),
            other => Err(format!("unknown path scheme: {}", other)),
        }
    }
}

impl Location {
    fn new(category: &str, component_type: &str, variant: &str) -> Self {
        Self {
            category: category.to_string(),
            component_type: component_type.to_string(),
            variant: variant.to_string(),
        }
    }
}

/// Scheme override for one framework
///
/// In TOML:
/// ```toml
/// [schemes.flyonui]
/// default = "named_variant"
/// plugins = "plugin_file_set"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkRule {
    #[serde(default)]
    pub default: Option<PathScheme>,
    /// Category name → scheme
    #[serde(flatten)]
    pub categories: BTreeMap<String, PathScheme>,
}

/// Scheme lookup table: built-in conventions plus configured overrides
#[derive(Debug, Clone, Default)]
pub struct SchemeRules {
    frameworks: BTreeMap<String, FrameworkRule>,
}

impl SchemeRules {
    /// Conventions of the frameworks shipped with the component corpus
    pub fn builtin() -> Self {
        let mut frameworks = BTreeMap::new();
        frameworks.insert(
            "hyperui".to_string(),
            FrameworkRule {
                default: Some(PathScheme::Numbered),
                categories: BTreeMap::new(),
            },
        );
        frameworks.insert(
            "flyonui".to_string(),
            FrameworkRule {
                default: Some(PathScheme::NamedVariant),
                categories: BTreeMap::from([("plugins".to_string(), PathScheme::PluginFileSet)]),
            },
        );
        for name in ["daisyui", "headlessui-react", "headlessui-vue"] {
            frameworks.insert(
                name.to_string(),
                FrameworkRule {
                    default: Some(PathScheme::NamedVariant),
                    categories: BTreeMap::new(),
                },
            );
        }
        Self { frameworks }
    }

    /// Layer configured overrides on top of these rules
    ///
    /// A configured `default` replaces the framework default; category
    /// entries are merged.
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, FrameworkRule>) -> Self {
        for (framework, rule) in overrides {
            let entry = self.frameworks.entry(framework.clone()).or_default();
            if rule.default.is_some() {
                entry.default = rule.default;
            }
            entry
                .categories
                .extend(rule.categories.iter().map(|(k, v)| (k.clone(), *v)));
        }
        self
    }

    /// Default scheme of a framework
    pub fn framework_scheme(&self, framework: &str) -> PathScheme {
        self.frameworks
            .get(framework)
            .and_then(|r| r.default)
            .unwrap_or(PathScheme::NamedVariant)
    }

    /// Scheme for a file, given the first directory below the framework
    pub fn scheme_for(&self, framework: &str, category: Option<&str>) -> PathScheme {
        category
            .and_then(|c| self.frameworks.get(framework)?.categories.get(c).copied())
            .unwrap_or_else(|| self.framework_scheme(framework))
    }
}

/// Check that a string is usable as one segment of a catalog key
pub fn validate_segment(segment: &str) -> Result<(), String> {
    if segment.is_empty() {
        return Err("empty segment".to_string());
    }
    if segment.starts_with('.') {
        return Err("segment starts with '.'".to_string());
    }
    if let Some(c) = segment
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(format!("invalid character {:?}", c));
    }
    Ok(())
}

/// Split a `framework/category/component_type/variant` key into its segments
pub fn parse_component_path(path: &str) -> Result<[&str; 4], QueryError> {
    let malformed = |reason: String| QueryError::MalformedPath {
        path: path.to_string(),
        reason,
    };

    let segments: Vec<&str> = path.split('/').collect();
    let segments: [&str; 4] = segments.try_into().map_err(|s: Vec<&str>| {
        malformed(format!(
            "expected framework/category/component_type/variant, got {} segment(s)",
            s.len()
        ))
    })?;

    for segment in segments {
        validate_segment(segment).map_err(&malformed)?;
    }
    Ok(segments)
}

fn file_stem(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file_name,
    }
}

fn is_numbered_variant(variant: &str) -> bool {
    let (number, suffix) = match variant.split_once('-') {
        Some((number, suffix)) => (number, Some(suffix)),
        None => (variant, None),
    };
    !number.is_empty()
        && number.chars().all(|c| c.is_ascii_digit())
        && suffix.map_or(true, |s| !s.is_empty())
}
