//! Records produced by the annotation pipeline

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Fields requested from the annotation service, in request order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationField {
    Sequence,
    PdbCrossReference,
    BetaStrand,
    Helix,
    Turn,
}

impl AnnotationField {
    /// The fixed field list fetched for every entry
    pub const ALL: [AnnotationField; 5] = [
        AnnotationField::Sequence,
        AnnotationField::PdbCrossReference,
        AnnotationField::BetaStrand,
        AnnotationField::Helix,
        AnnotationField::Turn,
    ];

    /// Fields holding secondary-structure feature strings
    pub const SECONDARY_STRUCTURE: [AnnotationField; 3] = [
        AnnotationField::BetaStrand,
        AnnotationField::Helix,
        AnnotationField::Turn,
    ];

    /// Column name understood by the UniProtKB REST `fields` parameter
    pub fn query_name(self) -> &'static str {
        match self {
            AnnotationField::Sequence => "sequence",
            AnnotationField::PdbCrossReference => "xref_pdb",
            AnnotationField::BetaStrand => "ft_strand",
            AnnotationField::Helix => "ft_helix",
            AnnotationField::Turn => "ft_turn",
        }
    }

    /// Key under which the value is stored in the result record
    pub fn record_key(self) -> &'static str {
        match self {
            AnnotationField::Sequence => "sequence",
            AnnotationField::PdbCrossReference => "Cross-reference (PDB)",
            AnnotationField::BetaStrand => "Beta strand",
            AnnotationField::Helix => "Helix",
            AnnotationField::Turn => "Turn",
        }
    }
}

/// Key of the accession column echoed back by the service
pub const ENTRY_KEY: &str = "Entry";

/// Key holding the requested identifier
pub const ID_KEY: &str = "id";

/// The JSON object returned by `/result/<id>`
///
/// Starts as `{id}`, receives the fetched fields by shallow overwrite, then
/// has the cross-reference and secondary-structure fields replaced by their
/// structured forms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultRecord(Map<String, Value>);

impl ResultRecord {
    pub fn new(id: &str) -> Self {
        let mut map = Map::new();
        map.insert(ID_KEY.to_string(), Value::String(id.to_string()));
        Self(map)
    }

    /// Shallow overwrite with fetched fields
    pub fn merge(&mut self, fields: BTreeMap<String, String>) {
        for (key, value) in fields {
            self.0.insert(key, Value::String(value));
        }
    }

    pub fn insert(&mut self, key: &str, value: Value) {
        self.0.insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String value under `key`; absent or non-string values read as ""
    pub fn text(&self, key: &str) -> &str {
        self.0.get(key).and_then(Value::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One cross-referenced structure and its chain sequences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureRecord {
    pub id: String,
    pub chains: BTreeMap<String, String>,
}

/// Marker left in place of a structure that could not be resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureFailure {
    pub id: String,
    pub error: FailureDetail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureDetail {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StructureOutcome {
    Resolved(StructureRecord),
    Failed(StructureFailure),
}

/// One residue range of a secondary-structure element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryStructureRange {
    pub start: u32,
    pub end: u32,
    pub pdb: String,
}
