//! Node construction.

use std::rc::Rc;

use meld_descriptor::{
    classify, decode_unit, ClassKind, ClassName, ClassifyError, ConstructorDescriptor, DeclFlags,
    DecodedUnit, FunctionDescriptor, Modality, NameIdx, NameTableError, Table, TypeParamFlags,
    TypeParameterDescriptor, UnitKind, ValueParameterDescriptor, Variance,
};
use meld_host::{HostId, HostKind, HostOrigin, HostType, Modifiers};

use super::Round;
use crate::element::{
    Accessor, ClassElement, DescriptorSlot, Element, ElementKey, ElementKind, FunctionElement,
    FunctionFlags, ModuleElement, Nesting, PackageElement, Parameter, PropertyElement,
    PropertyFlags, TypeParameterElement, TypeParameterScope,
};
use crate::matching::{FunctionMatch, InferredProperty, PropertyMatch};
use crate::origin::{self, SourceView};
use crate::{ModelError, Origin};

/// The class whose members are being built, and what is known about its
/// unit.
pub(super) struct MemberContext<'u> {
    pub(super) class: HostId,
    pub(super) unit: Option<&'u DecodedUnit>,
    pub(super) view: SourceView,
}

impl MemberContext<'_> {
    /// Resolve a name of the class's unit. A class without metadata has an
    /// empty string table.
    fn name(&self, idx: NameIdx) -> Result<&str, ModelError> {
        let resolved = match self.unit {
            Some(unit) => unit.name(idx),
            None => Err(NameTableError::MissingTableEntry {
                table: Table::Strings,
                index: idx.raw(),
                len: 0,
            }),
        };
        resolved.map_err(|source| ModelError::NameTable {
            unit: self.class,
            source,
        })
    }
}

/// Descriptor signature shared by functions and constructors.
#[derive(Copy, Clone)]
struct Signature<'d> {
    name: Option<NameIdx>,
    flags: DeclFlags,
    type_parameters: &'d [TypeParameterDescriptor],
    has_receiver: bool,
    value_parameters: &'d [ValueParameterDescriptor],
}

impl<'d> Signature<'d> {
    fn function(function: &'d FunctionDescriptor) -> Self {
        Signature {
            name: Some(function.name),
            flags: function.flags,
            type_parameters: &function.type_parameters,
            has_receiver: function.receiver.is_some(),
            value_parameters: &function.value_parameters,
        }
    }

    fn constructor(constructor: &'d ConstructorDescriptor) -> Self {
        Signature {
            name: None,
            flags: constructor.flags,
            type_parameters: &[],
            has_receiver: false,
            value_parameters: &constructor.value_parameters,
        }
    }

    fn function_flags(self) -> FunctionFlags {
        const MAPPING: [(DeclFlags, FunctionFlags); 7] = [
            (DeclFlags::IS_SUSPEND, FunctionFlags::SUSPEND),
            (DeclFlags::IS_INLINE, FunctionFlags::INLINE),
            (DeclFlags::IS_OPERATOR, FunctionFlags::OPERATOR),
            (DeclFlags::IS_INFIX, FunctionFlags::INFIX),
            (DeclFlags::IS_TAILREC, FunctionFlags::TAILREC),
            (DeclFlags::IS_EXTERNAL, FunctionFlags::EXTERNAL),
            (DeclFlags::IS_SECONDARY, FunctionFlags::SECONDARY),
        ];
        let mut flags = FunctionFlags::empty();
        for (decl, function) in MAPPING {
            flags.set(function, self.flags.contains(decl));
        }
        flags.set(FunctionFlags::EXTENSION, self.has_receiver);
        flags
    }
}

fn slot_index(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}

fn host_class_kind(kind: HostKind) -> ClassKind {
    match kind {
        HostKind::Interface => ClassKind::Interface,
        HostKind::Enum => ClassKind::Enum,
        HostKind::AnnotationType => ClassKind::Annotation,
        _ => ClassKind::Class,
    }
}

impl Round<'_> {
    pub(super) fn module_node(&self, id: HostId) -> Rc<Element> {
        let name = self.host.simple_name(id).to_owned();
        self.intern(Element::new(
            ElementKey::Host(id),
            name.clone(),
            Origin::Host(self.host.origin(id)),
            ElementKind::Module(ModuleElement { name }),
        ))
    }

    pub(super) fn package_node(&self, id: HostId) -> Rc<Element> {
        let qualified_name = self
            .host
            .qualified_name(id)
            .unwrap_or_else(|| self.host.simple_name(id))
            .to_owned();
        self.intern(Element::new(
            ElementKey::Host(id),
            self.host.simple_name(id).to_owned(),
            Origin::Host(self.host.origin(id)),
            ElementKind::Package(PackageElement { qualified_name }),
        ))
    }

    #[tracing::instrument(level = "debug", skip_all, fields(class = %id))]
    pub(super) fn class_node(&self, id: HostId) -> Result<Rc<Element>, ModelError> {
        let host = self.host;
        let unit = host
            .metadata(id)
            .map(|blob| decode_unit(self.decoder, blob))
            .transpose()
            .map_err(|source| ModelError::UndecodableMetadata { unit: id, source })?
            .map(Rc::new);
        let decoded = unit.as_deref();
        let names_err = |source| ModelError::NameTable { unit: id, source };
        let flags_err = |source: ClassifyError| ModelError::InconsistentFlags {
            construct: id,
            source,
        };

        let descriptor = decoded.and_then(|unit| unit.descriptor.as_class());
        let descriptor_name: Option<ClassName> = descriptor
            .zip(decoded)
            .map(|(class, unit)| unit.class_name(class.name))
            .transpose()
            .map_err(names_err)?;

        let simple_name = host.simple_name(id);
        let qualified_name = match &descriptor_name {
            Some(name) => name.qualified(),
            None => host.qualified_name(id).unwrap_or(simple_name).to_owned(),
        };
        let full_name = descriptor_name
            .as_ref()
            .map_or_else(|| qualified_name.clone(), ClassName::binary);
        let synthetic = decoded.is_some_and(|unit| unit.header.kind == UnitKind::SyntheticClass)
            || origin::is_synthetic_class(
                &self.config.synthetic_class_patterns,
                simple_name,
                &full_name,
            );

        let modifiers = host.modifiers(id);
        let (visibility, modality, class_kind, inner) = match descriptor {
            Some(class) => (
                classify::visibility(class.flags).map_err(flags_err)?,
                classify::modality(class.flags).map_err(flags_err)?,
                classify::class_kind(class.flags),
                Some(class.flags.contains(DeclFlags::IS_INNER)),
            ),
            None => (
                classify::visibility_from_modifiers(modifiers),
                classify::modality_from_modifiers(modifiers),
                host_class_kind(host.kind(id)),
                None,
            ),
        };

        let member_class = host
            .enclosing(id)
            .is_some_and(|parent| host.kind(parent).is_class_like());
        let nesting = match inner {
            _ if !member_class => Nesting::TopLevel,
            Some(true) => Nesting::Inner,
            Some(false) => Nesting::Nested,
            // Member interfaces, enums and records are implicitly static.
            None if modifiers.contains(Modifiers::STATIC) || host.kind(id) != HostKind::Class => {
                Nesting::Nested
            }
            None => Nesting::Inner,
        };

        let module_name = decoded
            .map(DecodedUnit::module_name)
            .transpose()
            .map_err(names_err)?
            .flatten()
            .map(str::to_owned);
        let companion = descriptor
            .and_then(|class| class.companion_object)
            .zip(decoded)
            .map(|(idx, unit)| unit.name(idx).map(str::to_owned))
            .transpose()
            .map_err(names_err)?;

        let cx = MemberContext {
            class: id,
            unit: decoded,
            view: match decoded {
                Some(_) => SourceView::Descriptor {
                    synthetic_owner: synthetic,
                },
                None => SourceView::Host,
            },
        };
        let type_parameters = self.type_parameters(
            &cx,
            id,
            TypeParameterScope::Owner,
            host.type_parameters(id),
            decoded.map_or(&[][..], |unit| unit.descriptor.type_parameters()),
        )?;

        let class = ClassElement {
            qualified_name,
            class_kind,
            visibility,
            modality,
            nesting,
            is_data: descriptor.is_some_and(|class| class.flags.contains(DeclFlags::IS_DATA)),
            is_value: descriptor.is_some_and(|class| class.flags.contains(DeclFlags::IS_VALUE)),
            synthetic,
            module_name,
            companion,
            superclass: host.superclass(id).cloned(),
            interfaces: host.interfaces(id).to_vec(),
            declared_type: host.declared_type(id).cloned(),
            type_parameters,
            annotations: host.annotations(id).to_vec(),
            unit: unit.clone(),
        };
        let origin = origin::classify(cx.view, host.origin(id), true);
        tracing::debug!(
            name = %class.qualified_name,
            kind = ?class.class_kind,
            unit = ?class.unit_kind(),
            "built class node"
        );
        Ok(self.intern(Element::new(
            ElementKey::Host(id),
            simple_name.to_owned(),
            origin,
            ElementKind::Class(class),
        )))
    }

    /// Type parameter nodes of `owner`, pairing host and descriptor
    /// parameters by position when the counts agree and by name otherwise.
    ///
    /// `scope` keys descriptor-only parameters of a declaration that has no
    /// host construct of its own.
    pub(super) fn type_parameters(
        &self,
        cx: &MemberContext<'_>,
        owner: HostId,
        scope: TypeParameterScope,
        host_parameters: &[HostId],
        descriptors: &[TypeParameterDescriptor],
    ) -> Result<Vec<Rc<Element>>, ModelError> {
        let host = self.host;
        let mut nodes = Vec::with_capacity(host_parameters.len().max(descriptors.len()));
        let mut paired = vec![false; host_parameters.len()];

        if cx.unit.is_some() {
            for (index, descriptor) in descriptors.iter().enumerate() {
                let name = cx.name(descriptor.name)?;
                let counterpart = if host_parameters.len() == descriptors.len() {
                    Some(index)
                } else {
                    (0..host_parameters.len())
                        .find(|&i| !paired[i] && host.simple_name(host_parameters[i]) == name)
                };
                if let Some(i) = counterpart {
                    paired[i] = true;
                }
                let host_parameter = counterpart.map(|i| host_parameters[i]);
                let key = host_parameter.map_or(
                    ElementKey::Descriptor {
                        owner,
                        slot: DescriptorSlot::TypeParameter {
                            scope,
                            id: descriptor.id,
                        },
                    },
                    ElementKey::Host,
                );
                let origin = origin::classify(
                    cx.view,
                    host_parameter.map_or(HostOrigin::Explicit, |tp| host.origin(tp)),
                    true,
                );
                let element = TypeParameterElement {
                    variance: classify::variance(descriptor.flags),
                    reified: descriptor.flags.contains(TypeParamFlags::IS_REIFIED),
                    bounds: host_parameter
                        .map(|tp| host.bounds(tp).to_vec())
                        .unwrap_or_default(),
                    owner,
                    index,
                    variable: HostType::TypeVariable(name.to_owned()),
                };
                nodes.push(self.intern(Element::new(
                    key,
                    name.to_owned(),
                    origin,
                    ElementKind::TypeParameter(element),
                )));
            }
        }

        for (&tp, _) in host_parameters
            .iter()
            .zip(&paired)
            .filter(|&(_, &used)| !used)
        {
            let name = host.simple_name(tp);
            let element = TypeParameterElement {
                variance: Variance::Invariant,
                reified: false,
                bounds: host.bounds(tp).to_vec(),
                owner,
                index: nodes.len(),
                variable: host
                    .declared_type(tp)
                    .cloned()
                    .unwrap_or_else(|| HostType::TypeVariable(name.to_owned())),
            };
            nodes.push(self.intern(Element::new(
                ElementKey::Host(tp),
                name.to_owned(),
                origin::classify(cx.view, host.origin(tp), false),
                ElementKind::TypeParameter(element),
            )));
        }
        Ok(nodes)
    }

    pub(super) fn function_node(
        &self,
        cx: &MemberContext<'_>,
        matched: &FunctionMatch,
        constructor: bool,
    ) -> Result<Rc<Element>, ModelError> {
        let host = self.host;
        let signature = match (matched.descriptor, cx.unit) {
            (Some(i), Some(unit)) if constructor => unit
                .descriptor
                .constructors()
                .get(i)
                .map(Signature::constructor),
            (Some(i), Some(unit)) => unit.descriptor.functions().get(i).map(Signature::function),
            _ => None,
        };
        let construct = matched.host.unwrap_or(cx.class);
        let slot = slot_index(matched.descriptor.unwrap_or_default());
        let flags_err = |source| ModelError::InconsistentFlags { construct, source };

        let name = match signature.and_then(|s| s.name) {
            Some(idx) => cx.name(idx)?.to_owned(),
            None => matched
                .host
                .map(|h| host.simple_name(h).to_owned())
                .unwrap_or_default(),
        };
        let modifiers = matched.host.map(|h| host.modifiers(h)).unwrap_or_default();
        let visibility = match signature {
            Some(s) => classify::visibility(s.flags).map_err(flags_err)?,
            None => classify::visibility_from_modifiers(modifiers),
        };
        let modality = match signature {
            _ if constructor => Modality::Final,
            Some(s) => classify::modality(s.flags).map_err(flags_err)?,
            None => classify::modality_from_modifiers(modifiers),
        };
        let mut flags = signature.map(Signature::function_flags).unwrap_or_default();
        flags.set(FunctionFlags::CONSTRUCTOR, constructor);

        let host_parameters = matched.host.map_or(&[][..], |h| host.parameters(h));
        let receiver_offset = usize::from(signature.is_some_and(|s| s.has_receiver));
        let receiver = host_parameters
            .first()
            .filter(|_| receiver_offset == 1)
            .and_then(|&p| host.declared_type(p))
            .cloned();
        let parameters = match signature {
            Some(s) => s
                .value_parameters
                .iter()
                .enumerate()
                .map(|(i, parameter)| {
                    let host_parameter = host_parameters.get(receiver_offset + i).copied();
                    Ok(Parameter {
                        name: cx.name(parameter.name)?.to_owned(),
                        ty: host_parameter.and_then(|p| host.declared_type(p)).cloned(),
                        has_default: parameter.flags.contains(DeclFlags::DECLARES_DEFAULT_VALUE),
                        is_vararg: parameter.vararg_element.is_some(),
                        host: host_parameter,
                    })
                })
                .collect::<Result<Vec<_>, ModelError>>()?,
            None => host_parameters
                .iter()
                .map(|&p| Parameter {
                    name: host.simple_name(p).to_owned(),
                    ty: host.declared_type(p).cloned(),
                    has_default: false,
                    is_vararg: false,
                    host: Some(p),
                })
                .collect(),
        };

        let type_parameters = self.type_parameters(
            cx,
            construct,
            match matched.host {
                Some(_) => TypeParameterScope::Owner,
                None => TypeParameterScope::Function(slot),
            },
            matched.host.map_or(&[][..], |h| host.type_parameters(h)),
            signature.map_or(&[][..], |s| s.type_parameters),
        )?;
        let key = match matched.host {
            Some(h) => ElementKey::Host(h),
            None => ElementKey::Descriptor {
                owner: cx.class,
                slot: DescriptorSlot::Function(slot),
            },
        };
        let origin = origin::classify(
            cx.view,
            matched.host.map_or(HostOrigin::Explicit, |h| host.origin(h)),
            signature.is_some(),
        );
        let function = FunctionElement {
            visibility,
            modality,
            flags,
            type_parameters,
            receiver,
            parameters,
            return_type: matched.host.and_then(|h| host.return_type(h)).cloned(),
            annotations: matched
                .host
                .map(|h| host.annotations(h).to_vec())
                .unwrap_or_default(),
        };
        Ok(self.intern(Element::new(
            key,
            name,
            origin,
            ElementKind::Function(function),
        )))
    }

    pub(super) fn property_node(
        &self,
        cx: &MemberContext<'_>,
        matched: &PropertyMatch,
    ) -> Result<Rc<Element>, ModelError> {
        let host = self.host;
        let descriptor = matched
            .descriptor
            .zip(cx.unit)
            .and_then(|(i, unit)| unit.descriptor.properties().get(i));
        let primary = matched.primary();
        let construct = primary.unwrap_or(cx.class);
        let slot = slot_index(matched.descriptor.unwrap_or_default());
        let flags_err = |source| ModelError::InconsistentFlags { construct, source };

        let name = match descriptor {
            Some(d) => cx.name(d.name)?.to_owned(),
            None => primary
                .map(|h| host.simple_name(h).to_owned())
                .unwrap_or_default(),
        };
        let modifiers = primary.map(|h| host.modifiers(h)).unwrap_or_default();
        let (visibility, modality) = match descriptor {
            Some(d) => (
                classify::visibility(d.flags).map_err(flags_err)?,
                classify::modality(d.flags).map_err(flags_err)?,
            ),
            None => (
                classify::visibility_from_modifiers(modifiers),
                classify::modality_from_modifiers(modifiers),
            ),
        };

        let getter = matched
            .getter
            .map(|h| {
                let visibility = match descriptor {
                    Some(d) => classify::visibility(d.getter_flags).map_err(flags_err)?,
                    None => classify::visibility_from_modifiers(host.modifiers(h)),
                };
                Ok::<_, ModelError>(Accessor { host: h, visibility })
            })
            .transpose()?;
        let setter = matched
            .setter
            .map(|h| {
                let visibility = match descriptor.and_then(|d| d.setter_flags) {
                    Some(flags) => classify::visibility(flags).map_err(flags_err)?,
                    None => visibility,
                };
                Ok::<_, ModelError>(Accessor { host: h, visibility })
            })
            .transpose()?;

        let mut flags = PropertyFlags::empty();
        match descriptor {
            Some(d) => {
                flags.set(PropertyFlags::VAR, d.is_var());
                flags.set(PropertyFlags::CONST, d.flags.contains(DeclFlags::IS_CONST));
                flags.set(PropertyFlags::LATEINIT, d.flags.contains(DeclFlags::IS_LATEINIT));
                flags.set(PropertyFlags::DELEGATED, d.flags.contains(DeclFlags::IS_DELEGATED));
            }
            None => flags.set(
                PropertyFlags::VAR,
                !matched.enum_entry && !modifiers.contains(Modifiers::FINAL),
            ),
        }
        flags.set(PropertyFlags::ENUM_ENTRY, matched.enum_entry);

        let ty = matched
            .getter
            .and_then(|h| host.return_type(h))
            .or_else(|| matched.field.and_then(|h| host.declared_type(h)))
            .or_else(|| {
                matched
                    .setter
                    .and_then(|h| host.parameters(h).first().copied())
                    .and_then(|p| host.declared_type(p))
            })
            .cloned();

        // Without a descriptor there is no holder; the field's own
        // annotations are the property's.
        let annotation_source = match descriptor {
            Some(_) => matched.holder,
            None => matched.field,
        };
        let annotations = annotation_source
            .map(|h| host.annotations(h).to_vec())
            .unwrap_or_default();

        let type_parameters = self.type_parameters(
            cx,
            construct,
            match primary {
                Some(_) => TypeParameterScope::Owner,
                None => TypeParameterScope::Property(slot),
            },
            matched.getter.map_or(&[][..], |h| host.type_parameters(h)),
            descriptor.map_or(&[][..], |d| &d.type_parameters),
        )?;

        let key = match primary {
            Some(h) => ElementKey::Host(h),
            None => ElementKey::Descriptor {
                owner: cx.class,
                slot: DescriptorSlot::Property(slot),
            },
        };
        let origin = origin::classify(
            cx.view,
            primary.map_or(HostOrigin::Explicit, |h| host.origin(h)),
            descriptor.is_some() || matched.enum_entry,
        );
        let property = PropertyElement {
            visibility,
            modality,
            flags,
            ty,
            field: matched.field,
            getter,
            setter,
            type_parameters,
            annotations,
        };
        Ok(self.intern(Element::new(
            key,
            name,
            origin,
            ElementKind::Property(property),
        )))
    }

    pub(super) fn inferred_property_node(&self, inferred: &InferredProperty) -> Rc<Element> {
        let host = self.host;
        let getter_modifiers = host.modifiers(inferred.getter);
        let property = PropertyElement {
            visibility: classify::visibility_from_modifiers(getter_modifiers),
            modality: classify::modality_from_modifiers(getter_modifiers),
            flags: PropertyFlags::VAR,
            ty: host.return_type(inferred.getter).cloned(),
            field: None,
            getter: Some(Accessor {
                host: inferred.getter,
                visibility: classify::visibility_from_modifiers(getter_modifiers),
            }),
            setter: Some(Accessor {
                host: inferred.setter,
                visibility: classify::visibility_from_modifiers(host.modifiers(inferred.setter)),
            }),
            type_parameters: Vec::new(),
            annotations: host.annotations(inferred.getter).to_vec(),
        };
        self.intern(Element::new(
            ElementKey::Host(inferred.getter),
            inferred.name.clone(),
            Origin::Inferred,
            ElementKind::Property(property),
        ))
    }
}
