//! Raw compact-metadata annotation payload.

/// The metadata annotation a compiler attaches to each compiled unit.
///
/// Fields mirror the annotation's elements. Only the header fields (`kind`,
/// `version`, `extra_int`, `package_name`) are interpreted outside the body
/// decoder; `data1`/`data2` are opaque to everything but the decoder.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct MetadataBlob {
    /// Unit kind code.
    pub kind: u32,
    /// Metadata format version, most significant component first.
    pub version: Vec<u32>,
    /// Encoded descriptor payload.
    pub data1: Vec<String>,
    /// String table backing `data1`.
    pub data2: Vec<String>,
    pub extra_string: Option<String>,
    pub package_name: Option<String>,
    /// Header flag bits.
    pub extra_int: u32,
}

impl MetadataBlob {
    /// A blob with the given kind and version and an empty payload.
    pub fn new(kind: u32, version: &[u32]) -> Self {
        MetadataBlob {
            kind,
            version: version.to_vec(),
            ..MetadataBlob::default()
        }
    }

    #[must_use]
    pub fn with_data(mut self, data1: Vec<String>, data2: Vec<String>) -> Self {
        self.data1 = data1;
        self.data2 = data2;
        self
    }
}
