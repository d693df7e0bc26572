//! Round configuration.

/// A reserved naming pattern for compiler-generated container classes.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SyntheticClassPattern {
    /// The class's simple name equals this string.
    SimpleName(String),
    /// The class's binary or qualified name ends with this string.
    Suffix(String),
}

impl SyntheticClassPattern {
    pub fn matches(&self, simple_name: &str, full_name: &str) -> bool {
        match self {
            SyntheticClassPattern::SimpleName(name) => simple_name == name,
            SyntheticClassPattern::Suffix(suffix) => full_name.ends_with(suffix.as_str()),
        }
    }
}

/// Settings for one processing round.
#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RoundConfig {
    /// Module name used for internal-name mangling when a unit declares
    /// none.
    pub default_module_name: String,
    /// Name suffix of the synthetic methods that carry property
    /// annotations.
    pub annotation_holder_suffix: String,
    /// Classes matching any pattern are synthetic containers: they and
    /// their members get a synthetic origin.
    pub synthetic_class_patterns: Vec<SyntheticClassPattern>,
    /// Pair getter/setter methods into inferred properties on classes that
    /// carry no metadata.
    pub infer_bean_properties: bool,
}

impl Default for RoundConfig {
    fn default() -> Self {
        RoundConfig {
            default_module_name: "main".to_owned(),
            annotation_holder_suffix: "$annotations".to_owned(),
            synthetic_class_patterns: vec![
                SyntheticClassPattern::SimpleName("DefaultImpls".to_owned()),
                SyntheticClassPattern::SimpleName("WhenMappings".to_owned()),
                SyntheticClassPattern::Suffix("$DefaultImpls".to_owned()),
                SyntheticClassPattern::Suffix("$WhenMappings".to_owned()),
            ],
            infer_bean_properties: false,
        }
    }
}
