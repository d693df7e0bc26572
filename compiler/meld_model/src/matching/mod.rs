//! Matching layer.
//!
//! Pairs the host members of one class with the declarations of its
//! descriptor. The result is a [`MemberPlan`]: which host constructs
//! together make up each property, which host method realizes each
//! function, and what is left over. Matching never fails on ambiguity; an
//! unpaired construct degrades to a plain function or property.
//!
//! Only name-table corruption is an error, since member names cannot be
//! compared without resolving them.

pub mod names;

use meld_descriptor::{DecodedUnit, NameTableError};
use meld_host::{HostId, HostKind, HostReflection, HostType};
use rustc_hash::FxHashMap;

use crate::RoundConfig;

use names::{
    bean_property_from_getter, getter_name, is_annotation_holder, is_candidate_getter,
    is_candidate_setter, is_synthetic_accessor, mangling_suffix, setter_name, strip_mangling,
};

const DELEGATE_SUFFIX: &str = "$delegate";

/// Host constructs and descriptor declaration making up one property.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct PropertyMatch {
    /// Index into the unit descriptor's properties.
    pub descriptor: Option<usize>,
    pub field: Option<HostId>,
    pub getter: Option<HostId>,
    pub setter: Option<HostId>,
    /// Synthetic method carrying the property's annotations.
    pub holder: Option<HostId>,
    /// Host enum constant paired with a descriptor enum entry.
    pub enum_entry: bool,
}

impl PropertyMatch {
    /// Host construct that identifies the property node.
    pub fn primary(&self) -> Option<HostId> {
        self.field.or(self.getter).or(self.setter)
    }

    /// Every host construct merged into the property.
    pub fn host_parts(&self) -> impl Iterator<Item = HostId> {
        [self.field, self.getter, self.setter, self.holder]
            .into_iter()
            .flatten()
    }
}

/// A host executable paired with its descriptor declaration, if any.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct FunctionMatch {
    pub host: Option<HostId>,
    /// Index into the descriptor's functions or constructors.
    pub descriptor: Option<usize>,
}

/// A getter/setter pair recognized on a class without metadata.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct InferredProperty {
    pub name: String,
    pub getter: HostId,
    pub setter: HostId,
}

/// Outcome of matching one class's members.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct MemberPlan {
    pub nested: Vec<HostId>,
    pub constructors: Vec<FunctionMatch>,
    pub functions: Vec<FunctionMatch>,
    pub properties: Vec<PropertyMatch>,
    pub inferred: Vec<InferredProperty>,
    /// Annotation holders whose property was not found.
    pub dropped: Vec<HostId>,
}

/// Host-side facts about a method that matching consults.
struct MethodShape<'h> {
    name: &'h str,
    returns_void: bool,
    params: usize,
}

impl<'h> MethodShape<'h> {
    fn of(host: &'h dyn HostReflection, id: HostId) -> Self {
        MethodShape {
            name: host.simple_name(id),
            returns_void: host.return_type(id).map_or(true, HostType::is_void),
            params: host.parameters(id).len(),
        }
    }
}

/// Resolved descriptor names a class's members are compared against.
struct DescriptorNames {
    properties: Vec<String>,
    getters: Vec<String>,
    setters: Vec<Option<String>>,
    functions: Vec<String>,
    enum_entries: Vec<String>,
}

impl DescriptorNames {
    fn resolve(unit: &DecodedUnit) -> Result<Self, NameTableError> {
        let descriptor = &unit.descriptor;
        let properties = descriptor
            .properties()
            .iter()
            .map(|p| unit.name(p.name).map(str::to_owned))
            .collect::<Result<Vec<_>, _>>()?;
        let getters = properties.iter().map(|p| getter_name(p)).collect();
        let setters = descriptor
            .properties()
            .iter()
            .zip(&properties)
            .map(|(p, name)| p.setter_flags.map(|_| setter_name(name)))
            .collect();
        let functions = descriptor
            .functions()
            .iter()
            .map(|f| unit.name(f.name).map(str::to_owned))
            .collect::<Result<Vec<_>, _>>()?;
        let enum_entries = descriptor
            .as_class()
            .map(|class| {
                class
                    .enum_entries
                    .iter()
                    .map(|&entry| unit.name(entry).map(str::to_owned))
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?
            .unwrap_or_default();
        Ok(DescriptorNames {
            properties,
            getters,
            setters,
            functions,
            enum_entries,
        })
    }
}

/// Match the members of `class` against `unit`'s declarations.
///
/// Without a unit every member is host-only.
#[tracing::instrument(level = "trace", skip_all, fields(class = %class))]
pub fn plan_members(
    host: &dyn HostReflection,
    class: HostId,
    unit: Option<&DecodedUnit>,
    config: &RoundConfig,
) -> Result<MemberPlan, NameTableError> {
    match unit {
        Some(unit) => plan_with_descriptor(host, class, unit, config),
        None => Ok(plan_host_only(host, class, config)),
    }
}

fn plan_with_descriptor(
    host: &dyn HostReflection,
    class: HostId,
    unit: &DecodedUnit,
    config: &RoundConfig,
) -> Result<MemberPlan, NameTableError> {
    let names = DescriptorNames::resolve(unit)?;
    let module = unit
        .module_name()?
        .unwrap_or(config.default_module_name.as_str());
    let suffix = mangling_suffix(module);
    let holder_suffix = config.annotation_holder_suffix.as_str();

    let mut plan = MemberPlan {
        properties: (0..names.properties.len())
            .map(|i| PropertyMatch {
                descriptor: Some(i),
                ..PropertyMatch::default()
            })
            .collect(),
        ..MemberPlan::default()
    };
    let mut functions_claimed = vec![false; names.functions.len()];
    let mut constructors_claimed = vec![false; unit.descriptor.constructors().len()];
    let mut holders = Vec::new();
    let mut extra_properties = Vec::new();

    for &member in host.enclosed(class) {
        let kind = host.kind(member);
        match kind {
            k if k.is_class_like() => plan.nested.push(member),
            HostKind::Method => {
                let shape = MethodShape::of(host, member);
                if is_annotation_holder(shape.name, shape.returns_void, shape.params, holder_suffix)
                {
                    holders.push(member);
                    continue;
                }
                if is_synthetic_accessor(shape.name) {
                    plan.functions.push(FunctionMatch {
                        host: Some(member),
                        descriptor: None,
                    });
                    continue;
                }
                let base = strip_mangling(shape.name, &suffix);
                if is_candidate_getter(shape.name, shape.returns_void, shape.params) {
                    if let Some(i) = (0..names.getters.len())
                        .find(|&i| names.getters[i] == base && plan.properties[i].getter.is_none())
                    {
                        plan.properties[i].getter = Some(member);
                        continue;
                    }
                }
                if is_candidate_setter(shape.name, shape.returns_void, shape.params) {
                    if let Some(i) = (0..names.setters.len()).find(|&i| {
                        names.setters[i].as_deref() == Some(base)
                            && plan.properties[i].setter.is_none()
                    }) {
                        plan.properties[i].setter = Some(member);
                        continue;
                    }
                }
                let descriptor = claim_function(
                    unit,
                    &names.functions,
                    &mut functions_claimed,
                    base,
                    shape.params,
                );
                if descriptor.is_none() {
                    tracing::trace!(method = shape.name, "no declaration pairs with method");
                }
                plan.functions.push(FunctionMatch {
                    host: Some(member),
                    descriptor,
                });
            }
            HostKind::Constructor => {
                let arity = host.parameters(member).len();
                let ctors = unit.descriptor.constructors();
                let descriptor = (0..ctors.len()).find(|&j| {
                    !constructors_claimed[j] && ctors[j].value_parameters.len() == arity
                });
                if let Some(j) = descriptor {
                    constructors_claimed[j] = true;
                }
                plan.constructors.push(FunctionMatch {
                    host: Some(member),
                    descriptor,
                });
            }
            HostKind::Field | HostKind::EnumConstant => {
                let name = host.simple_name(member);
                if kind == HostKind::EnumConstant && names.enum_entries.iter().any(|e| e == name) {
                    extra_properties.push(PropertyMatch {
                        field: Some(member),
                        enum_entry: true,
                        ..PropertyMatch::default()
                    });
                    continue;
                }
                let stored = name.strip_suffix(DELEGATE_SUFFIX).unwrap_or(name);
                match (0..names.properties.len())
                    .find(|&i| names.properties[i] == stored && plan.properties[i].field.is_none())
                {
                    Some(i) => plan.properties[i].field = Some(member),
                    None => extra_properties.push(PropertyMatch {
                        field: Some(member),
                        ..PropertyMatch::default()
                    }),
                }
            }
            HostKind::Module
            | HostKind::Package
            | HostKind::StaticInit
            | HostKind::Parameter
            | HostKind::TypeParameter
            | HostKind::Class
            | HostKind::Interface
            | HostKind::Enum
            | HostKind::AnnotationType
            | HostKind::Record => {}
        }
    }

    for holder in holders {
        let base = host
            .simple_name(holder)
            .strip_suffix(holder_suffix)
            .unwrap_or_default();
        let base = strip_mangling(base, &suffix);
        let found = (0..names.properties.len()).find(|&i| {
            plan.properties[i].holder.is_none()
                && (names.getters[i] == base || names.properties[i] == base)
        });
        match found {
            Some(i) => plan.properties[i].holder = Some(holder),
            None => {
                tracing::trace!(holder = host.simple_name(holder), "dropping unmatched annotation holder");
                plan.dropped.push(holder);
            }
        }
    }

    plan.properties.extend(extra_properties);
    plan.functions.extend(
        functions_claimed
            .iter()
            .enumerate()
            .filter(|&(_, &claimed)| !claimed)
            .map(|(j, _)| FunctionMatch {
                host: None,
                descriptor: Some(j),
            }),
    );
    Ok(plan)
}

/// Pair a method with the first unclaimed declaration of the same name and
/// host arity, falling back to the first unclaimed same-named one.
fn claim_function(
    unit: &DecodedUnit,
    function_names: &[String],
    claimed: &mut [bool],
    name: &str,
    params: usize,
) -> Option<usize> {
    let functions = unit.descriptor.functions();
    let candidates = || (0..function_names.len()).filter(|&j| !claimed[j] && function_names[j] == name);
    let found = candidates()
        .find(|&j| functions[j].host_arity() == params)
        .or_else(|| candidates().next())?;
    claimed[found] = true;
    Some(found)
}

fn plan_host_only(host: &dyn HostReflection, class: HostId, config: &RoundConfig) -> MemberPlan {
    let mut plan = MemberPlan::default();
    let mut methods = Vec::new();

    for &member in host.enclosed(class) {
        match host.kind(member) {
            k if k.is_class_like() => plan.nested.push(member),
            HostKind::Method => methods.push(member),
            HostKind::Constructor => plan.constructors.push(FunctionMatch {
                host: Some(member),
                descriptor: None,
            }),
            HostKind::Field | HostKind::EnumConstant => plan.properties.push(PropertyMatch {
                field: Some(member),
                ..PropertyMatch::default()
            }),
            _ => {}
        }
    }

    let mut paired = vec![false; methods.len()];
    if config.infer_bean_properties {
        infer_bean_properties(host, &methods, &mut paired, &mut plan.inferred);
    }
    plan.functions.extend(
        methods
            .iter()
            .zip(&paired)
            .filter(|&(_, &used)| !used)
            .map(|(&method, _)| FunctionMatch {
                host: Some(method),
                descriptor: None,
            }),
    );
    plan
}

fn infer_bean_properties(
    host: &dyn HostReflection,
    methods: &[HostId],
    paired: &mut [bool],
    inferred: &mut Vec<InferredProperty>,
) {
    let mut setters: FxHashMap<String, usize> = FxHashMap::default();
    for (i, &method) in methods.iter().enumerate() {
        let shape = MethodShape::of(host, method);
        if is_candidate_setter(shape.name, shape.returns_void, shape.params) {
            setters.entry(shape.name.to_owned()).or_insert(i);
        }
    }

    for (i, &method) in methods.iter().enumerate() {
        let shape = MethodShape::of(host, method);
        if paired[i] || !is_candidate_getter(shape.name, shape.returns_void, shape.params) {
            continue;
        }
        let Some(name) = bean_property_from_getter(shape.name) else {
            continue;
        };
        let Some(&j) = setters.get(&setter_name(&name)) else {
            continue;
        };
        let setter = methods[j];
        let setter_type = host
            .parameters(setter)
            .first()
            .and_then(|&param| host.declared_type(param));
        if paired[j] || setter_type.is_none() || setter_type != host.return_type(method) {
            continue;
        }
        paired[i] = true;
        paired[j] = true;
        inferred.push(InferredProperty {
            name,
            getter: method,
            setter,
        });
    }
}
