//! Raw type references and annotations.

use std::fmt;

/// Primitive host types.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Char => "char",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
        }
    }
}

/// A raw type reference in the host's type representation.
///
/// This is also the "type mirror" the element model converts declarations
/// into.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum HostType {
    Void,
    Primitive(PrimitiveKind),
    /// A class or interface type, with its type arguments.
    Declared {
        name: String,
        arguments: Vec<HostType>,
    },
    Array(Box<HostType>),
    TypeVariable(String),
    Wildcard {
        extends: Option<Box<HostType>>,
        super_bound: Option<Box<HostType>>,
    },
}

impl HostType {
    /// A declared type with no type arguments.
    pub fn declared(name: impl Into<String>) -> Self {
        HostType::Declared {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    /// A declared type with the given type arguments.
    pub fn generic(name: impl Into<String>, arguments: Vec<HostType>) -> Self {
        HostType::Declared {
            name: name.into(),
            arguments,
        }
    }

    #[inline]
    pub fn is_void(&self) -> bool {
        matches!(self, HostType::Void)
    }
}

impl fmt::Display for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostType::Void => f.write_str("void"),
            HostType::Primitive(kind) => f.write_str(kind.name()),
            HostType::Declared { name, arguments } => {
                f.write_str(name)?;
                if !arguments.is_empty() {
                    f.write_str("<")?;
                    for (i, arg) in arguments.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            HostType::Array(elem) => write!(f, "{elem}[]"),
            HostType::TypeVariable(name) => f.write_str(name),
            HostType::Wildcard {
                extends,
                super_bound,
            } => {
                f.write_str("?")?;
                if let Some(bound) = extends {
                    write!(f, " extends {bound}")?;
                }
                if let Some(bound) = super_bound {
                    write!(f, " super {bound}")?;
                }
                Ok(())
            }
        }
    }
}

/// An annotation attached to a host construct.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Annotation {
    /// Qualified name of the annotation type.
    pub type_name: String,
    /// Element values, rendered as source text.
    pub values: Vec<(String, String)>,
}

impl Annotation {
    pub fn new(type_name: impl Into<String>) -> Self {
        Annotation {
            type_name: type_name.into(),
            values: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.push((name.into(), value.into()));
        self
    }
}
