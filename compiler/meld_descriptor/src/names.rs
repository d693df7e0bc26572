//! Name table and qualified-name resolution.
//!
//! Descriptors never store strings. Simple names are [`NameIdx`] indices
//! into the string table; class names are [`ClassNameIdx`] indices into the
//! qualified-name table, whose records chain to their parent.
//!
//! Class names render in two forms:
//! - internal: `a/b/Outer.Inner` (package with `/`, classes with `.`)
//! - binary: `a/b/Outer$Inner`

use std::fmt;

use rustc_hash::FxHashMap;
use thiserror::Error;

/// Index into the string table.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[repr(transparent)]
pub struct NameIdx(u32);

impl NameIdx {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        NameIdx(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Index into the qualified-name table.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[repr(transparent)]
pub struct ClassNameIdx(u32);

impl ClassNameIdx {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        ClassNameIdx(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// What a qualified-name segment names.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum QualifiedNameKind {
    Class,
    Package,
    Local,
}

/// One record of the qualified-name table.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct QualifiedNameRecord {
    pub parent: Option<ClassNameIdx>,
    pub short_name: NameIdx,
    pub kind: QualifiedNameKind,
}

/// Which table a failed lookup went to.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Table {
    Strings,
    QualifiedNames,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Table::Strings => f.write_str("string"),
            Table::QualifiedNames => f.write_str("qualified-name"),
        }
    }
}

/// Name resolution failure. The blob is well-formed by construction, so
/// either variant means corrupt input for the unit being decoded.
#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub enum NameTableError {
    #[error("missing {table} table entry {index} (table has {len} entries)")]
    MissingTableEntry { table: Table, index: u32, len: usize },
    #[error("qualified name {index} has a cyclic parent chain")]
    CyclicQualifiedName { index: u32 },
}

/// A resolved class name.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ClassName {
    /// Package path with `/` separators, empty for the root package.
    pub package: String,
    /// Class path within the package with `.` separators.
    pub relative: String,
    /// Whether any segment is a local declaration.
    pub local: bool,
}

impl ClassName {
    /// Parse the internal form `a/b/Outer.Inner`.
    pub fn parse(internal: &str) -> Self {
        let (package, relative) = match internal.rsplit_once('/') {
            Some((package, relative)) => (package.to_owned(), relative.to_owned()),
            None => (String::new(), internal.to_owned()),
        };
        ClassName {
            package,
            relative,
            local: false,
        }
    }

    /// Dotted qualified name: `a.b.Outer.Inner`.
    pub fn qualified(&self) -> String {
        if self.package.is_empty() {
            self.relative.clone()
        } else {
            format!("{}.{}", self.package.replace('/', "."), self.relative)
        }
    }

    /// Binary name: `a/b/Outer$Inner`.
    pub fn binary(&self) -> String {
        let relative = self.relative.replace('.', "$");
        if self.package.is_empty() {
            relative
        } else {
            format!("{}/{relative}", self.package)
        }
    }

    /// Last class segment.
    pub fn simple(&self) -> &str {
        self.relative.rsplit('.').next().unwrap_or(&self.relative)
    }

    /// Dotted package name.
    pub fn package_dotted(&self) -> String {
        self.package.replace('/', ".")
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.package.is_empty() {
            f.write_str(&self.relative)
        } else {
            write!(f, "{}/{}", self.package, self.relative)
        }
    }
}

/// The string and qualified-name tables of one decoded unit.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct NameTable {
    strings: Vec<String>,
    qualified: Vec<QualifiedNameRecord>,
}

impl NameTable {
    pub fn new(strings: Vec<String>, qualified: Vec<QualifiedNameRecord>) -> Self {
        NameTable { strings, qualified }
    }

    pub fn builder() -> NameTableBuilder {
        NameTableBuilder::default()
    }

    /// Resolve a string-table index.
    pub fn string(&self, idx: NameIdx) -> Result<&str, NameTableError> {
        self.strings
            .get(idx.0 as usize)
            .map(String::as_str)
            .ok_or(NameTableError::MissingTableEntry {
                table: Table::Strings,
                index: idx.0,
                len: self.strings.len(),
            })
    }

    pub fn record(&self, idx: ClassNameIdx) -> Result<&QualifiedNameRecord, NameTableError> {
        self.qualified
            .get(idx.0 as usize)
            .ok_or(NameTableError::MissingTableEntry {
                table: Table::QualifiedNames,
                index: idx.0,
                len: self.qualified.len(),
            })
    }

    /// Resolve a qualified-name index by walking its parent chain.
    pub fn class_name(&self, idx: ClassNameIdx) -> Result<ClassName, NameTableError> {
        let mut segments: Vec<(&str, QualifiedNameKind)> = Vec::new();
        let mut cursor = Some(idx);
        while let Some(current) = cursor {
            // A well-formed chain visits each record at most once.
            if segments.len() >= self.qualified.len() {
                return Err(NameTableError::CyclicQualifiedName { index: idx.0 });
            }
            let record = self.record(current)?;
            segments.push((self.string(record.short_name)?, record.kind));
            cursor = record.parent;
        }

        let mut package: Vec<&str> = Vec::new();
        let mut relative: Vec<&str> = Vec::new();
        let mut local = false;
        for (segment, kind) in segments.into_iter().rev() {
            match kind {
                QualifiedNameKind::Package => package.push(segment),
                QualifiedNameKind::Class => relative.push(segment),
                QualifiedNameKind::Local => {
                    local = true;
                    relative.push(segment);
                }
            }
        }

        Ok(ClassName {
            package: package.join("/"),
            relative: relative.join("."),
            local,
        })
    }

    pub fn strings_len(&self) -> usize {
        self.strings.len()
    }

    pub fn qualified_len(&self) -> usize {
        self.qualified.len()
    }
}

/// Deduplicating builder for [`NameTable`].
///
/// Used by body decoders to assemble tables, and by tests to author
/// descriptor trees by name.
#[derive(Debug, Default)]
pub struct NameTableBuilder {
    strings: Vec<String>,
    string_index: FxHashMap<String, NameIdx>,
    qualified: Vec<QualifiedNameRecord>,
    qualified_index: FxHashMap<(Option<ClassNameIdx>, NameIdx, QualifiedNameKind), ClassNameIdx>,
}

impl NameTableBuilder {
    /// Intern a simple name.
    pub fn string(&mut self, s: &str) -> NameIdx {
        if let Some(&idx) = self.string_index.get(s) {
            return idx;
        }
        let idx = NameIdx(next_index(self.strings.len()));
        self.strings.push(s.to_owned());
        self.string_index.insert(s.to_owned(), idx);
        idx
    }

    /// Intern a class name in internal form (`a/b/Outer.Inner`).
    pub fn class_name(&mut self, internal: &str) -> ClassNameIdx {
        let name = ClassName::parse(internal);
        let mut parent = None;
        for segment in name.package.split('/').filter(|s| !s.is_empty()) {
            parent = Some(self.record(parent, segment, QualifiedNameKind::Package));
        }
        for segment in name.relative.split('.') {
            parent = Some(self.record(parent, segment, QualifiedNameKind::Class));
        }
        // `relative` always has at least one segment, so the loop ran.
        parent.unwrap_or(ClassNameIdx(0))
    }

    fn record(
        &mut self,
        parent: Option<ClassNameIdx>,
        segment: &str,
        kind: QualifiedNameKind,
    ) -> ClassNameIdx {
        let short_name = self.string(segment);
        if let Some(&idx) = self.qualified_index.get(&(parent, short_name, kind)) {
            return idx;
        }
        let idx = ClassNameIdx(next_index(self.qualified.len()));
        self.qualified.push(QualifiedNameRecord {
            parent,
            short_name,
            kind,
        });
        self.qualified_index.insert((parent, short_name, kind), idx);
        idx
    }

    pub fn build(self) -> NameTable {
        NameTable {
            strings: self.strings,
            qualified: self.qualified,
        }
    }
}

fn next_index(len: usize) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("name table exceeded {} entries", u32::MAX))
}
