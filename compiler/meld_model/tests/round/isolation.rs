//! Failure isolation and round independence.

use std::rc::Rc;

use meld_descriptor::{
    ClassDescriptor, ClassifyError, DeclFlags, DecodeError, NameIdx, NameTable, NameTableError,
    PropertyDescriptor, TypeRef, UnitDescriptor, UnitKind,
};
use meld_host::{ConstructSpec, HostId, HostKind, HostTree, MetadataBlob, Modifiers};
use meld_model::capability::HasSimpleName;
use meld_model::{ElementKey, ErrorCategory, ModelError, Round, RoundConfig};
use pretty_assertions::assert_eq;

use crate::common::{child, sample, walk, FixtureDecoder, PUBLIC_FINAL};

#[test]
fn failing_unit_does_not_stop_the_others() {
    let s = sample();
    let round = s.round();
    let roots = round.build(&s.units());
    let names: Vec<_> = roots.iter().map(|root| root.simple_name()).collect();
    assert_eq!(names, vec!["Counter", "Legacy", "Shape", "CountersKt"]);

    let failures = round.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].unit, s.broken);
    assert_eq!(
        failures[0].error,
        ModelError::UndecodableMetadata {
            unit: s.broken,
            source: DecodeError::UnknownKind(9),
        }
    );
    assert_eq!(failures[0].error.category(), ErrorCategory::CorruptInput);
}

#[test]
fn package_enumeration_skips_and_records_failed_units_once() {
    let s = sample();
    let round = s.round();
    let package = round.element(s.package).unwrap();
    let classes: Vec<_> = round
        .enclosed_elements(&package)
        .unwrap()
        .iter()
        .map(|class| class.simple_name().to_owned())
        .collect();
    assert_eq!(classes, vec!["Counter", "Legacy", "Shape", "CountersKt"]);

    // Asking again, directly or through build, does not log it twice.
    assert!(round.element(s.broken).is_err());
    round.build(&[s.broken]);
    assert_eq!(round.failures().len(), 1);
}

#[test]
fn misuse_errors_propagate_without_being_recorded() {
    let s = sample();
    let round = s.round();
    let legacy = round.element(s.legacy).unwrap();
    assert_eq!(
        round.lookup(&legacy, s.count_field),
        Err(ModelError::UnknownEnclosedConstruct {
            parent: ElementKey::Host(s.legacy),
            construct: s.count_field,
        })
    );
    assert!(round.failures().is_empty());
}

#[test]
fn rounds_share_no_nodes() {
    let s = sample();
    let first = s.round();
    let second = s.round();
    let a = first.build(&[s.module]);
    let b = second.build(&[s.module]);

    let shape = |round: &Round<'_>, root: &Rc<meld_model::Element>| {
        let mut nodes: Vec<_> = walk(round, root)
            .iter()
            .map(|node| (node.key(), node.tag(), node.simple_name().to_owned()))
            .collect();
        nodes.sort_by_key(|(key, _, name)| (format!("{key:?}"), name.clone()));
        nodes
    };
    assert_eq!(shape(&first, &a[0]), shape(&second, &b[0]));

    let counter_a = first.element(s.counter).unwrap();
    let counter_b = second.element(s.counter).unwrap();
    assert_eq!(counter_a, counter_b);
    assert!(!Rc::ptr_eq(&counter_a, &counter_b));
    assert!(!Rc::ptr_eq(
        &child(&first, &counter_a, "count"),
        &child(&second, &counter_b, "count")
    ));
    assert_eq!(first.failures(), second.failures());
}

struct SingleClass {
    tree: HostTree,
    decoder: FixtureDecoder,
    package: HostId,
    class: HostId,
}

/// A package holding one class whose metadata decodes to `class`.
fn single_class(key: &str, class: ClassDescriptor, names: NameTable) -> SingleClass {
    let mut decoder = FixtureDecoder::default();
    let blob = decoder.register(key, UnitKind::Class, UnitDescriptor::Class(class), names);
    let mut tree = HostTree::new();
    let package = tree.package(None, "com.example");
    let class = tree.insert(
        Some(package),
        ConstructSpec::new(HostKind::Class, key)
            .modifiers(Modifiers::PUBLIC)
            .metadata(blob),
    );
    tree.insert(
        Some(class),
        ConstructSpec::new(HostKind::Field, "value").modifiers(Modifiers::PRIVATE),
    );
    SingleClass {
        tree,
        decoder,
        package,
        class,
    }
}

#[test]
fn missing_visibility_bits_are_a_consistency_error() {
    let mut names = NameTable::builder();
    let name = names.class_name("com/example/Odd");
    let f = single_class(
        "Odd",
        ClassDescriptor::new(DeclFlags::IS_FINAL, name),
        names.build(),
    );
    let round = Round::new(&f.tree, &f.decoder, RoundConfig::default());
    let package = round.build(&[f.package]);
    let odd = f.class;

    let err = round.element(odd).unwrap_err();
    assert_eq!(
        err,
        ModelError::InconsistentFlags {
            construct: odd,
            source: ClassifyError::MissingVisibilityFlag {
                flags: DeclFlags::IS_FINAL.bits(),
            },
        }
    );
    assert_eq!(err.category(), ErrorCategory::InternalConsistency);

    assert!(round.enclosed_elements(&package[0]).unwrap().is_empty());
    assert_eq!(round.failures().len(), 1);
}

#[test]
fn dangling_member_name_fails_enumeration_not_the_class() {
    let mut names = NameTable::builder();
    let name = names.class_name("com/example/Torn");
    let int_name = names.class_name("kotlin/Int");
    let mut class = ClassDescriptor::new(PUBLIC_FINAL, name);
    class.properties.push(PropertyDescriptor::new(
        NameIdx::from_raw(99),
        PUBLIC_FINAL,
        TypeRef::class(int_name),
    ));
    let f = single_class("Torn", class, names.build());
    let round = Round::new(&f.tree, &f.decoder, RoundConfig::default());
    let torn = f.class;

    let node = round.element(torn).unwrap();
    assert_eq!(node.simple_name(), "Torn");
    let err = round.enclosed_elements(&node).unwrap_err();
    assert!(matches!(
        err,
        ModelError::NameTable {
            unit,
            source: NameTableError::MissingTableEntry { index: 99, .. },
        } if unit == torn
    ));
    assert_eq!(err.category(), ErrorCategory::CorruptInput);
    // The failed computation leaves no half-built state behind.
    assert_eq!(round.enclosed_elements(&node), Err(err));
}

#[test]
fn nested_class_failure_is_isolated() {
    let mut tree = HostTree::new();
    let package = tree.package(None, "com.example");
    let outer = tree.insert(
        Some(package),
        ConstructSpec::new(HostKind::Class, "Outer").modifiers(Modifiers::PUBLIC),
    );
    let stale = tree.insert(
        Some(outer),
        ConstructSpec::new(HostKind::Class, "Stale")
            .modifiers(Modifiers::PUBLIC | Modifiers::STATIC)
            .metadata(MetadataBlob::new(UnitKind::Class.code(), &[1, 0, 0])),
    );
    tree.insert(
        Some(outer),
        ConstructSpec::new(HostKind::Method, "run").modifiers(Modifiers::PUBLIC),
    );
    let decoder = FixtureDecoder::default();
    let round = Round::new(&tree, &decoder, RoundConfig::default());

    let outer_node = round.element(outer).unwrap();
    let members: Vec<_> = round
        .enclosed_elements(&outer_node)
        .unwrap()
        .iter()
        .map(|node| node.simple_name().to_owned())
        .collect();
    assert_eq!(members, vec!["run"]);

    let failures = round.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].unit, stale);
    assert!(matches!(
        failures[0].error,
        ModelError::UndecodableMetadata {
            source: DecodeError::IncompatibleVersion { .. },
            ..
        }
    ));
}
