//! Node identity across lookup paths.

use std::rc::Rc;

use meld_descriptor::{
    ClassDescriptor, DeclFlags, FunctionDescriptor, NameTable, TypeParameterDescriptor, TypeRef,
    UnitDescriptor, UnitKind,
};
use meld_host::{ConstructSpec, HostKind, HostTree, Modifiers};
use meld_model::capability::{HasSimpleName, HasTypeParameters};
use meld_model::{DescriptorSlot, ElementKey, ElementTag, Round, RoundConfig, TypeParameterScope};
use pretty_assertions::assert_eq;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::common::{child, sample, walk, FixtureDecoder, PUBLIC_FINAL};

#[test]
fn same_construct_same_node() {
    let s = sample();
    let round = s.round();
    let package = round.element(s.package).unwrap();
    let counter = round.element(s.counter).unwrap();

    let via_element = round.element(s.increment).unwrap();
    let via_class = round.lookup(&counter, s.increment).unwrap();
    let via_package = round.lookup(&package, s.increment).unwrap();
    assert!(Rc::ptr_eq(&via_element, &via_class));
    assert!(Rc::ptr_eq(&via_element, &via_package));

    let enumerated = child(&round, &counter, "increment");
    assert!(Rc::ptr_eq(&via_element, &enumerated));
}

#[test]
fn merged_parts_resolve_to_their_property() {
    let s = sample();
    let round = s.round();
    let counter = round.element(s.counter).unwrap();
    let property = child(&round, &counter, "count");
    assert_eq!(property.tag(), ElementTag::Property);
    assert_eq!(property.key(), ElementKey::Host(s.count_field));

    for part in [s.count_field, s.get_count, s.set_count, s.count_holder] {
        assert!(Rc::ptr_eq(&round.element(part).unwrap(), &property));
        assert!(Rc::ptr_eq(&round.lookup(&counter, part).unwrap(), &property));
    }
}

#[test]
fn accessor_reached_first_still_yields_the_property() {
    let s = sample();
    let round = s.round();
    // No enumeration before this call: the getter is the first thing asked.
    let property = round.element(s.get_label).unwrap();
    assert_eq!(property.simple_name(), "label");
    assert!(Rc::ptr_eq(
        &round.element(s.label_field).unwrap(),
        &property
    ));
}

#[test]
fn enclosing_element_walks_back_up() {
    let s = sample();
    let round = s.round();
    let property = round.element(s.set_count).unwrap();
    let counter = round.enclosing_element(&property).unwrap().unwrap();
    assert!(Rc::ptr_eq(&counter, &round.element(s.counter).unwrap()));

    let package = round.enclosing_element(&counter).unwrap().unwrap();
    assert_eq!(package.tag(), ElementTag::Package);
    let module = round.enclosing_element(&package).unwrap().unwrap();
    assert_eq!(module.key(), ElementKey::Host(s.module));
    assert!(round.enclosing_element(&module).unwrap().is_none());

    // Descriptor-only members are enclosed by their class.
    let inline_only = child(&round, &counter, "inlineOnly");
    let owner = round.enclosing_element(&inline_only).unwrap().unwrap();
    assert!(Rc::ptr_eq(&owner, &counter));
}

#[test]
fn full_enumeration_builds_each_node_once() {
    let s = sample();
    let round = s.round();
    let roots = round.build(&[s.module]);
    assert_eq!(roots.len(), 1);

    let nodes = walk(&round, &roots[0]);
    let mut by_key: FxHashMap<ElementKey, Rc<_>> = FxHashMap::default();
    for node in &nodes {
        let first = by_key.entry(node.key()).or_insert_with(|| Rc::clone(node));
        assert!(Rc::ptr_eq(first, node), "{:?} reached twice", node.key());
    }
    // Every enclosed set lists a node at most once, so the walk never
    // revisits one.
    assert_eq!(by_key.len(), nodes.len());
    assert_eq!(round.node_count(), nodes.len());

    let walked_again = walk(&round, &roots[0]);
    assert_eq!(walked_again.len(), nodes.len());
    assert_eq!(round.node_count(), nodes.len());
}

#[test]
fn class_enclosed_set_has_declaration_order() {
    let s = sample();
    let round = s.round();
    let counter = round.element(s.counter).unwrap();
    let names: Vec<_> = round
        .enclosed_elements(&counter)
        .unwrap()
        .iter()
        .map(|node| (node.tag(), node.simple_name().to_owned()))
        .collect();
    assert_eq!(
        names,
        vec![
            (ElementTag::TypeParameter, "T".to_owned()),
            (ElementTag::Class, "Step".to_owned()),
            (ElementTag::Function, "<init>".to_owned()),
            (ElementTag::Function, "increment".to_owned()),
            (ElementTag::Function, "access$reset".to_owned()),
            (ElementTag::Function, "inlineOnly".to_owned()),
            (ElementTag::Property, "count".to_owned()),
            (ElementTag::Property, "label".to_owned()),
        ]
    );
}

#[test]
fn descriptor_only_type_parameters_stay_with_their_declaration() {
    // Class `Pair<T>` and inline functions `first<R>` and `second<S>`, none
    // of them visible to the host and all numbering from id 0.
    let mut names = NameTable::builder();
    let class_name = names.class_name("com/example/Pair");
    let unit_name = names.class_name("kotlin/Unit");
    let mut class = ClassDescriptor::new(PUBLIC_FINAL, class_name);
    class
        .type_parameters
        .push(TypeParameterDescriptor::new(0, names.string("T")));
    for (function, tp) in [("first", "R"), ("second", "S")] {
        let mut declared = FunctionDescriptor::new(
            names.string(function),
            PUBLIC_FINAL | DeclFlags::IS_INLINE,
            TypeRef::class(unit_name),
        );
        declared
            .type_parameters
            .push(TypeParameterDescriptor::new(0, names.string(tp)));
        class.functions.push(declared);
    }

    let mut decoder = FixtureDecoder::default();
    let blob = decoder.register(
        "pair",
        UnitKind::Class,
        UnitDescriptor::Class(class),
        names.build(),
    );
    let mut tree = HostTree::new();
    let package = tree.package(None, "com.example");
    let pair = tree.insert(
        Some(package),
        ConstructSpec::new(HostKind::Class, "Pair")
            .modifiers(Modifiers::PUBLIC | Modifiers::FINAL)
            .metadata(blob),
    );
    let round = Round::new(&tree, &decoder, RoundConfig::default());
    let node = round.element(pair).unwrap();

    let class_tps = node.as_class().unwrap().type_parameters();
    assert_eq!(class_tps.len(), 1);
    assert_eq!(class_tps[0].simple_name(), "T");
    assert_eq!(
        class_tps[0].key(),
        ElementKey::Descriptor {
            owner: pair,
            slot: DescriptorSlot::TypeParameter {
                scope: TypeParameterScope::Owner,
                id: 0,
            },
        }
    );

    for (function, index, tp) in [("first", 0, "R"), ("second", 1, "S")] {
        let declared = child(&round, &node, function);
        let tps = declared.as_function().unwrap().type_parameters();
        assert_eq!(tps.len(), 1);
        assert_eq!(tps[0].simple_name(), tp);
        assert_eq!(
            tps[0].key(),
            ElementKey::Descriptor {
                owner: pair,
                slot: DescriptorSlot::TypeParameter {
                    scope: TypeParameterScope::Function(index),
                    id: 0,
                },
            }
        );
    }

    // T, first, second and their two type parameters.
    let keys: FxHashSet<_> = round
        .enclosed_elements(&node)
        .unwrap()
        .iter()
        .flat_map(|member| {
            let own = member
                .as_function()
                .map(|function| function.type_parameters().to_vec())
                .unwrap_or_default();
            std::iter::once(Rc::clone(member)).chain(own)
        })
        .map(|member| member.key())
        .collect();
    assert_eq!(keys.len(), 5);
}
