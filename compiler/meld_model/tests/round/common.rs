//! Shared fixture: a small host tree with metadata-bearing and plain units.

use std::rc::Rc;

use meld_descriptor::{
    ClassDescriptor, ConstructorDescriptor, DeclFlags, DecodeError, FunctionDescriptor,
    MetadataDecoder, MetadataHeader, NameTable, PackageDescriptor, PropertyDescriptor,
    TypeParamFlags, TypeParameterDescriptor, TypeRef, UnitDescriptor, UnitKind,
    ValueParameterDescriptor,
};
use meld_host::{
    Annotation, ConstructSpec, HostId, HostKind, HostOrigin, HostTree, HostType, MetadataBlob,
    Modifiers, PrimitiveKind,
};
use meld_model::capability::HasSimpleName;
use meld_model::{init_tracing, Element, Round, RoundConfig};
use rustc_hash::FxHashMap;

pub const PUBLIC_FINAL: DeclFlags = DeclFlags::IS_PUBLIC.union(DeclFlags::IS_FINAL);

/// Body decoder serving registered descriptors, keyed by the blob's first
/// `data1` string.
#[derive(Default)]
pub struct FixtureDecoder {
    bodies: FxHashMap<String, (UnitDescriptor, NameTable)>,
}

impl FixtureDecoder {
    /// Register a body and return the blob that decodes to it.
    pub fn register(
        &mut self,
        key: &str,
        kind: UnitKind,
        descriptor: UnitDescriptor,
        names: NameTable,
    ) -> MetadataBlob {
        self.bodies.insert(key.to_owned(), (descriptor, names));
        MetadataBlob::new(kind.code(), &[2, 1, 0]).with_data(vec![key.to_owned()], Vec::new())
    }
}

impl MetadataDecoder for FixtureDecoder {
    fn decode_body(
        &self,
        _header: &MetadataHeader,
        blob: &MetadataBlob,
    ) -> Result<(UnitDescriptor, NameTable), DecodeError> {
        let key = blob
            .data1
            .first()
            .ok_or_else(|| DecodeError::Body("blob carries no fixture key".to_owned()))?;
        self.bodies
            .get(key)
            .cloned()
            .ok_or_else(|| DecodeError::Body(format!("no fixture body for {key}")))
    }
}

pub fn int() -> HostType {
    HostType::Primitive(PrimitiveKind::Int)
}

pub fn string() -> HostType {
    HostType::declared("java.lang.String")
}

pub struct Sample {
    pub tree: HostTree,
    pub decoder: FixtureDecoder,
    pub module: HostId,
    pub package: HostId,
    // Kotlin class with properties, functions and a nested inner class.
    pub counter: HostId,
    pub counter_t: HostId,
    pub count_field: HostId,
    pub label_field: HostId,
    pub get_count: HostId,
    pub set_count: HostId,
    pub count_holder: HostId,
    pub get_label: HostId,
    pub increment: HostId,
    pub bridge: HostId,
    pub step: HostId,
    // Plain host class.
    pub legacy: HostId,
    pub legacy_name: HostId,
    pub legacy_secret: HostId,
    pub get_title: HostId,
    pub set_title: HostId,
    // Interface with a default-implementations container.
    pub shape: HostId,
    pub default_impls: HostId,
    pub impls_describe: HostId,
    // File facade.
    pub facade: HostId,
    pub counter_of: HostId,
    // Unit whose metadata kind is unknown.
    pub broken: HostId,
}

impl Sample {
    /// Top-level units.
    pub fn units(&self) -> Vec<HostId> {
        vec![
            self.counter,
            self.legacy,
            self.shape,
            self.facade,
            self.broken,
        ]
    }

    pub fn round(&self) -> Round<'_> {
        self.round_with(RoundConfig::default())
    }

    pub fn round_with(&self, config: RoundConfig) -> Round<'_> {
        Round::new(&self.tree, &self.decoder, config)
    }
}

fn method(
    tree: &mut HostTree,
    parent: HostId,
    spec: ConstructSpec,
    params: &[(&str, HostType)],
) -> HostId {
    let id = tree.insert(Some(parent), spec);
    for (name, ty) in params {
        tree.insert(
            Some(id),
            ConstructSpec::new(HostKind::Parameter, *name).typed(ty.clone()),
        );
    }
    id
}

fn counter_body(decoder: &mut FixtureDecoder) -> MetadataBlob {
    let mut names = NameTable::builder();
    let class_name = names.class_name("com/example/Counter");
    let int_name = names.class_name("kotlin/Int");
    let string_name = names.class_name("kotlin/String");
    let unit_name = names.class_name("kotlin/Unit");
    let t = names.string("T");
    let count = names.string("count");
    let label = names.string("label");
    let increment = names.string("increment");
    let by = names.string("by");
    let inline_only = names.string("inlineOnly");
    let step = names.string("Step");
    let module = names.string("app-core");

    let mut class = ClassDescriptor::new(PUBLIC_FINAL, class_name);
    let mut tp = TypeParameterDescriptor::new(0, t);
    tp.flags = TypeParamFlags::OUT_VARIANCE;
    class.type_parameters.push(tp);
    class.module_name = Some(module);
    class.nested_classes.push(step);
    class
        .properties
        .push(PropertyDescriptor::new(count, PUBLIC_FINAL, TypeRef::class(int_name)).mutable());
    class.properties.push(PropertyDescriptor::new(
        label,
        DeclFlags::IS_INTERNAL | DeclFlags::IS_FINAL,
        TypeRef::class(string_name),
    ));
    let mut bump = FunctionDescriptor::new(increment, PUBLIC_FINAL, TypeRef::class(unit_name));
    let mut amount = ValueParameterDescriptor::new(by, TypeRef::class(int_name));
    amount.flags = DeclFlags::DECLARES_DEFAULT_VALUE;
    bump.value_parameters.push(amount);
    class.functions.push(bump);
    class.functions.push(FunctionDescriptor::new(
        inline_only,
        PUBLIC_FINAL | DeclFlags::IS_INLINE,
        TypeRef::class(unit_name),
    ));
    class.constructors.push(ConstructorDescriptor {
        flags: PUBLIC_FINAL,
        value_parameters: Vec::new(),
    });

    decoder.register(
        "counter",
        UnitKind::Class,
        UnitDescriptor::Class(class),
        names.build(),
    )
}

fn step_body(decoder: &mut FixtureDecoder) -> MetadataBlob {
    let mut names = NameTable::builder();
    let class_name = names.class_name("com/example/Counter.Step");
    let class = ClassDescriptor::new(PUBLIC_FINAL | DeclFlags::IS_INNER, class_name);
    decoder.register("step", UnitKind::Class, UnitDescriptor::Class(class), names.build())
}

fn shape_body(decoder: &mut FixtureDecoder) -> MetadataBlob {
    let mut names = NameTable::builder();
    let class_name = names.class_name("com/example/Shape");
    let double_name = names.class_name("kotlin/Double");
    let area = names.string("area");
    let mut class = ClassDescriptor::new(
        DeclFlags::IS_PUBLIC | DeclFlags::IS_ABSTRACT | DeclFlags::IS_INTERFACE,
        class_name,
    );
    class.functions.push(FunctionDescriptor::new(
        area,
        DeclFlags::IS_PUBLIC | DeclFlags::IS_ABSTRACT,
        TypeRef::class(double_name),
    ));
    decoder.register("shape", UnitKind::Class, UnitDescriptor::Class(class), names.build())
}

fn facade_body(decoder: &mut FixtureDecoder) -> MetadataBlob {
    let mut names = NameTable::builder();
    let counter_name = names.class_name("com/example/Counter");
    let counter_of = names.string("counterOf");
    let package = PackageDescriptor {
        functions: vec![FunctionDescriptor::new(
            counter_of,
            PUBLIC_FINAL,
            TypeRef::class(counter_name),
        )],
        ..PackageDescriptor::default()
    };
    decoder.register(
        "facade",
        UnitKind::FileFacade,
        UnitDescriptor::Package(package),
        names.build(),
    )
}

pub fn sample() -> Sample {
    init_tracing();
    let mut tree = HostTree::new();
    let mut decoder = FixtureDecoder::default();
    let public_final = Modifiers::PUBLIC | Modifiers::FINAL;

    let module = tree.module("app-core");
    let package = tree.package(Some(module), "com.example");

    let counter = tree.insert(
        Some(package),
        ConstructSpec::new(HostKind::Class, "Counter")
            .modifiers(public_final)
            .metadata(counter_body(&mut decoder)),
    );
    let counter_t = tree.insert(Some(counter), ConstructSpec::new(HostKind::TypeParameter, "T"));
    let count_field = tree.insert(
        Some(counter),
        ConstructSpec::new(HostKind::Field, "count")
            .modifiers(Modifiers::PRIVATE)
            .typed(int()),
    );
    let label_field = tree.insert(
        Some(counter),
        ConstructSpec::new(HostKind::Field, "label")
            .modifiers(Modifiers::PRIVATE | Modifiers::FINAL)
            .typed(string()),
    );
    tree.insert(
        Some(counter),
        ConstructSpec::new(HostKind::Constructor, "<init>").modifiers(Modifiers::PUBLIC),
    );
    let get_count = method(
        &mut tree,
        counter,
        ConstructSpec::new(HostKind::Method, "getCount")
            .modifiers(public_final)
            .returns(int()),
        &[],
    );
    let set_count = method(
        &mut tree,
        counter,
        ConstructSpec::new(HostKind::Method, "setCount")
            .modifiers(public_final)
            .returns(HostType::Void),
        &[("value", int())],
    );
    let count_holder = method(
        &mut tree,
        counter,
        ConstructSpec::new(HostKind::Method, "getCount$annotations")
            .modifiers(Modifiers::PUBLIC | Modifiers::STATIC)
            .origin(HostOrigin::Synthetic)
            .returns(HostType::Void)
            .annotated(Annotation::new("kotlin.Deprecated").with_value("message", "\"use total\"")),
        &[],
    );
    let get_label = method(
        &mut tree,
        counter,
        ConstructSpec::new(HostKind::Method, "getLabel$app_core")
            .modifiers(public_final)
            .returns(string()),
        &[],
    );
    let increment = method(
        &mut tree,
        counter,
        ConstructSpec::new(HostKind::Method, "increment")
            .modifiers(public_final)
            .returns(HostType::Void),
        &[("by", int())],
    );
    let bridge = method(
        &mut tree,
        counter,
        ConstructSpec::new(HostKind::Method, "access$reset")
            .modifiers(Modifiers::STATIC)
            .origin(HostOrigin::Synthetic)
            .returns(HostType::Void),
        &[("$this", HostType::declared("com.example.Counter"))],
    );
    let step = tree.insert(
        Some(counter),
        ConstructSpec::new(HostKind::Class, "Step")
            .modifiers(public_final)
            .metadata(step_body(&mut decoder)),
    );

    let legacy = tree.insert(
        Some(package),
        ConstructSpec::new(HostKind::Class, "Legacy").modifiers(Modifiers::PUBLIC),
    );
    let legacy_name = tree.insert(
        Some(legacy),
        ConstructSpec::new(HostKind::Field, "name")
            .modifiers(Modifiers::PUBLIC)
            .typed(string()),
    );
    let legacy_secret = tree.insert(
        Some(legacy),
        ConstructSpec::new(HostKind::Field, "secret").typed(int()),
    );
    tree.insert(
        Some(legacy),
        ConstructSpec::new(HostKind::Constructor, "<init>").modifiers(Modifiers::PUBLIC),
    );
    let get_title = method(
        &mut tree,
        legacy,
        ConstructSpec::new(HostKind::Method, "getTitle")
            .modifiers(Modifiers::PUBLIC)
            .returns(string()),
        &[],
    );
    let set_title = method(
        &mut tree,
        legacy,
        ConstructSpec::new(HostKind::Method, "setTitle")
            .modifiers(Modifiers::PUBLIC)
            .returns(HostType::Void),
        &[("title", string())],
    );
    method(
        &mut tree,
        legacy,
        ConstructSpec::new(HostKind::Method, "describe")
            .modifiers(Modifiers::PUBLIC)
            .returns(string()),
        &[],
    );

    let shape = tree.insert(
        Some(package),
        ConstructSpec::new(HostKind::Interface, "Shape")
            .modifiers(Modifiers::PUBLIC | Modifiers::ABSTRACT)
            .metadata(shape_body(&mut decoder)),
    );
    method(
        &mut tree,
        shape,
        ConstructSpec::new(HostKind::Method, "area")
            .modifiers(Modifiers::PUBLIC | Modifiers::ABSTRACT)
            .returns(HostType::Primitive(PrimitiveKind::Double)),
        &[],
    );
    let impls_blob = decoder.register(
        "impls",
        UnitKind::SyntheticClass,
        UnitDescriptor::SyntheticClass(None),
        NameTable::default(),
    );
    let default_impls = tree.insert(
        Some(shape),
        ConstructSpec::new(HostKind::Class, "DefaultImpls")
            .modifiers(public_final | Modifiers::STATIC)
            .metadata(impls_blob),
    );
    let impls_describe = method(
        &mut tree,
        default_impls,
        ConstructSpec::new(HostKind::Method, "describe")
            .modifiers(Modifiers::PUBLIC | Modifiers::STATIC)
            .returns(string()),
        &[("$this", HostType::declared("com.example.Shape"))],
    );

    let facade = tree.insert(
        Some(package),
        ConstructSpec::new(HostKind::Class, "CountersKt")
            .modifiers(public_final)
            .metadata(facade_body(&mut decoder)),
    );
    let counter_of = method(
        &mut tree,
        facade,
        ConstructSpec::new(HostKind::Method, "counterOf")
            .modifiers(public_final | Modifiers::STATIC)
            .returns(HostType::declared("com.example.Counter")),
        &[],
    );

    let broken = tree.insert(
        Some(package),
        ConstructSpec::new(HostKind::Class, "Broken")
            .modifiers(Modifiers::PUBLIC)
            .metadata(MetadataBlob::new(9, &[2, 1, 0])),
    );

    Sample {
        tree,
        decoder,
        module,
        package,
        counter,
        counter_t,
        count_field,
        label_field,
        get_count,
        set_count,
        count_holder,
        get_label,
        increment,
        bridge,
        step,
        legacy,
        legacy_name,
        legacy_secret,
        get_title,
        set_title,
        shape,
        default_impls,
        impls_describe,
        facade,
        counter_of,
        broken,
    }
}

/// Every node reachable from `root` through enclosed sets, depth first.
pub fn walk(round: &Round<'_>, root: &Rc<Element>) -> Vec<Rc<Element>> {
    let mut seen = vec![Rc::clone(root)];
    let mut stack = vec![Rc::clone(root)];
    while let Some(node) = stack.pop() {
        for child in round.enclosed_elements(&node).unwrap() {
            if child.is_composite() {
                stack.push(Rc::clone(&child));
            }
            seen.push(child);
        }
    }
    seen
}

/// The enclosed node of `parent` with the given simple name.
pub fn child(round: &Round<'_>, parent: &Element, name: &str) -> Rc<Element> {
    round
        .enclosed_elements(parent)
        .unwrap()
        .into_iter()
        .find(|node| node.simple_name() == name)
        .unwrap_or_else(|| panic!("no enclosed element named {name}"))
}
