//! Accessor naming conventions and internal-name mangling.
//!
//! Properties compile to a backing field plus getter/setter methods whose
//! names follow fixed conventions. Internal members additionally carry a
//! module-derived suffix on their binary name.

const GET_PREFIX: &str = "get";
const IS_PREFIX: &str = "is";
const SET_PREFIX: &str = "set";
const SYNTHETIC_ACCESSOR_PREFIX: &str = "access$";

/// `name` starts with `prefix` and the next char is not lowercase.
fn has_accessor_prefix(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix)
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| !c.is_lowercase())
}

/// Whether a property name takes the `is` getter form.
pub fn is_boolean_style(property: &str) -> bool {
    has_accessor_prefix(property, IS_PREFIX)
}

/// Candidate getter: `get`/`is` prefix form, non-void, no parameters.
pub fn is_candidate_getter(name: &str, returns_void: bool, params: usize) -> bool {
    !returns_void
        && params == 0
        && (has_accessor_prefix(name, GET_PREFIX) || has_accessor_prefix(name, IS_PREFIX))
}

/// Candidate setter: `set` prefix form, void, exactly one parameter.
pub fn is_candidate_setter(name: &str, returns_void: bool, params: usize) -> bool {
    returns_void && params == 1 && has_accessor_prefix(name, SET_PREFIX)
}

/// Synthetic accessors (`access$...`) bridge private members to nested
/// classes and never correspond to a declaration.
pub fn is_synthetic_accessor(name: &str) -> bool {
    name.starts_with(SYNTHETIC_ACCESSOR_PREFIX)
}

/// Annotation holder: `<base><suffix>`, void, no parameters.
pub fn is_annotation_holder(name: &str, returns_void: bool, params: usize, suffix: &str) -> bool {
    returns_void && params == 0 && name.len() > suffix.len() && name.ends_with(suffix)
}

/// ASCII-only capitalization of the first char.
fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(name.len());
            out.push(first.to_ascii_uppercase());
            out.push_str(chars.as_str());
            out
        }
        None => String::new(),
    }
}

/// ASCII-only decapitalization of the first char.
fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(name.len());
            out.push(first.to_ascii_lowercase());
            out.push_str(chars.as_str());
            out
        }
        None => String::new(),
    }
}

/// Expected getter name of a property.
pub fn getter_name(property: &str) -> String {
    if is_boolean_style(property) {
        property.to_owned()
    } else {
        format!("{GET_PREFIX}{}", capitalize(property))
    }
}

/// Expected setter name of a property.
pub fn setter_name(property: &str) -> String {
    match property.strip_prefix(IS_PREFIX) {
        Some(rest) if is_boolean_style(property) => format!("{SET_PREFIX}{rest}"),
        _ => format!("{SET_PREFIX}{}", capitalize(property)),
    }
}

/// Property name a host getter implies, for bean inference.
///
/// `getFoo` implies `foo`; `isFoo` keeps its name.
pub fn bean_property_from_getter(getter: &str) -> Option<String> {
    if has_accessor_prefix(getter, IS_PREFIX) {
        Some(getter.to_owned())
    } else {
        getter
            .strip_prefix(GET_PREFIX)
            .filter(|_| has_accessor_prefix(getter, GET_PREFIX))
            .map(decapitalize)
    }
}

/// Mangling suffix for internal members of `module`.
///
/// Characters other than letters and digits become `_`.
pub fn mangling_suffix(module: &str) -> String {
    let mut suffix = String::with_capacity(module.len() + 1);
    suffix.push('$');
    suffix.extend(
        module
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' }),
    );
    suffix
}

/// Strip a mangling suffix if present.
pub fn strip_mangling<'a>(name: &'a str, suffix: &str) -> &'a str {
    name.strip_suffix(suffix).unwrap_or(name)
}
