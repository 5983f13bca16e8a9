//! UniProtKB annotation service client
//!
//! Queries the UniProtKB search endpoint in TSV format. The response has one
//! header row and one row per matching entry; columns come back in request
//! order, starting with the accession.
//!
//! Feature columns (`ft_strand`, `ft_helix`, `ft_turn`) arrive as
//! `STRAND 3..5; /evidence="ECO:0007829|PDB:1A00"; STRAND 8..12; ...` and are
//! rewritten into `.; `-delimited clauses (`STRAND 3 5 /evidence=...`) before
//! they reach the record.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument};

use super::models::{AnnotationField, ENTRY_KEY};
use super::secondary_structure::CLAUSE_DELIMITER;
use super::{AnnotationError, HttpFetcher, Result};

/// Values of one entry, keyed by record key
pub type EntryFields = BTreeMap<String, String>;

/// A remote sequence-annotation service
#[async_trait]
pub trait AnnotationService: Send + Sync {
    /// Fetch `fields` for every entry in `entries`
    ///
    /// Entries the service does not know are absent from the returned map.
    async fn query(
        &self,
        entries: &[&str],
        fields: &[AnnotationField],
    ) -> Result<HashMap<String, EntryFields>>;
}

/// Fetch the fixed field list for a single entry
///
/// Fails with `Lookup` when the service has no record for `entry`. A
/// secondary accession comes back keyed by its primary accession; a single
/// returned row is taken as the answer.
#[instrument(skip(service))]
pub async fn fetch_entry(service: &dyn AnnotationService, entry: &str) -> Result<EntryFields> {
    let mut values = service.query(&[entry], &AnnotationField::ALL).await?;

    if let Some(fields) = values.remove(entry) {
        return Ok(fields);
    }

    // Accessions are case-insensitive upstream.
    if let Some(key) = values.keys().find(|k| k.eq_ignore_ascii_case(entry)).cloned() {
        return values.remove(&key).ok_or_else(|| AnnotationError::lookup(entry));
    }

    if values.len() == 1 {
        if let Some((primary, fields)) = values.into_iter().next() {
            debug!(entry, primary = %primary, "Entry resolved through its primary accession");
            return Ok(fields);
        }
    }

    Err(AnnotationError::lookup(entry))
}

/// HTTP implementation against the UniProtKB REST API
pub struct UniProtClient {
    http: HttpFetcher,
    search_url: String,
}

impl UniProtClient {
    pub fn new(http: HttpFetcher, search_url: impl Into<String>) -> Self {
        Self {
            http,
            search_url: search_url.into(),
        }
    }
}

#[async_trait]
impl AnnotationService for UniProtClient {
    async fn query(
        &self,
        entries: &[&str],
        fields: &[AnnotationField],
    ) -> Result<HashMap<String, EntryFields>> {
        let target = entries.join(",");
        let query = entries
            .iter()
            .map(|entry| format!("accession:{}", entry))
            .collect::<Vec<_>>()
            .join(" OR ");
        let columns = std::iter::once("accession")
            .chain(fields.iter().map(|f| f.query_name()))
            .collect::<Vec<_>>()
            .join(",");

        let body = self
            .http
            .get_text(
                &self.search_url,
                &[
                    ("query", query.as_str()),
                    ("format", "tsv"),
                    ("fields", columns.as_str()),
                ],
                &target,
            )
            .await?;

        match body {
            Some(body) => parse_tsv(&body, fields, &target),
            None => {
                debug!(entries = %target, "UniProt rejected the query");
                Ok(HashMap::new())
            },
        }
    }
}

/// Parse a TSV response positionally
///
/// Column 0 is the accession (stored under `Entry`), column `i` holds
/// `fields[i - 1]`. Columns beyond the requested ones keep their header
/// text as key. Missing trailing cells read as empty strings.
pub fn parse_tsv(
    body: &str,
    fields: &[AnnotationField],
    target: &str,
) -> Result<HashMap<String, EntryFields>> {
    let mut lines = body.lines().filter(|line| !line.trim().is_empty());

    let header: Vec<&str> = match lines.next() {
        Some(line) => line.split('\t').collect(),
        None => return Ok(HashMap::new()),
    };

    if header.len() < fields.len() + 1 {
        return Err(AnnotationError::format(
            target,
            format!(
                "expected at least {} TSV columns, header has {}",
                fields.len() + 1,
                header.len()
            ),
        ));
    }

    let mut values = HashMap::new();
    for line in lines {
        let cells: Vec<&str> = line.split('\t').collect();
        let entry = cells[0].trim().to_string();
        if entry.is_empty() {
            continue;
        }

        let mut record = EntryFields::new();
        record.insert(ENTRY_KEY.to_string(), entry.clone());
        for (idx, field) in fields.iter().enumerate() {
            let cell = cells.get(idx + 1).copied().unwrap_or("").trim();
            let value = if AnnotationField::SECONDARY_STRUCTURE.contains(field) {
                feature_clauses(cell)
            } else {
                cell.to_string()
            };
            record.insert(field.record_key().to_string(), value);
        }
        for (idx, name) in header.iter().enumerate().skip(fields.len() + 1) {
            let cell = cells.get(idx).copied().unwrap_or("");
            record.insert(name.trim().to_string(), cell.trim().to_string());
        }

        values.insert(entry, record);
    }

    Ok(values)
}

/// Rewrite a REST feature column into `.; `-delimited clauses
///
/// Each feature item (`STRAND 3..5`) starts a clause with its location as
/// two integers; the `/qualifier` parts that follow are appended to it.
/// Text without `..` locations is already in clause form and is returned
/// unchanged.
pub fn feature_clauses(value: &str) -> String {
    let value = value.trim();
    if !value.contains("..") {
        return value.to_string();
    }

    let mut clauses: Vec<String> = Vec::new();
    for part in value.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        match clauses.last_mut() {
            Some(clause) if part.starts_with('/') => {
                clause.push(' ');
                clause.push_str(part);
            },
            _ => clauses.push(feature_location(part)),
        }
    }

    clauses.join(CLAUSE_DELIMITER)
}

/// `STRAND 3..5` -> `STRAND 3 5`; fuzzy bounds (`<1`, `>40`) lose their marker
fn feature_location(item: &str) -> String {
    item.split_whitespace()
        .map(|token| match token.split_once("..") {
            Some((start, end)) => format!(
                "{} {}",
                start.trim_start_matches(['<', '>']),
                end.trim_start_matches(['<', '>'])
            ),
            None => token.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::secondary_structure::parse_annotation;

    const HEADER: &str = "Entry\tSequence\tPDB\tBeta strand\tHelix\tTurn";

    #[test]
    fn test_parse_single_row() {
        let body = format!(
            "{}\nP12345\tMKVL\t1ABC;1DEF;\tSTRAND 1 3 {{ECO:0000244|PDB:1ABC}}\t\t\n",
            HEADER
        );
        let values = parse_tsv(&body, &AnnotationField::ALL, "P12345").unwrap();
        let row = &values["P12345"];

        assert_eq!(row["Entry"], "P12345");
        assert_eq!(row["sequence"], "MKVL");
        assert_eq!(row["Cross-reference (PDB)"], "1ABC;1DEF;");
        assert_eq!(row["Beta strand"], "STRAND 1 3 {ECO:0000244|PDB:1ABC}");
        assert_eq!(row["Helix"], "");
        assert_eq!(row["Turn"], "");
    }

    #[test]
    fn test_rest_feature_columns_become_clauses() {
        let body = format!(
            "{}\nP69905\tMVLS\t1A00;\t\
             STRAND 3..5; /evidence=\"ECO:0007829|PDB:1A00\"; \
             STRAND 8..12; /evidence=\"ECO:0007829|PDB:1A00, ECO:0007829|PDB:1B00\"\t\
             HELIX 21..35; /evidence=\"ECO:0007829|PDB:1A00\"\t\n",
            HEADER
        );
        let values = parse_tsv(&body, &AnnotationField::ALL, "P69905").unwrap();
        let row = &values["P69905"];

        assert_eq!(
            row["Beta strand"],
            "STRAND 3 5 /evidence=\"ECO:0007829|PDB:1A00\".; \
             STRAND 8 12 /evidence=\"ECO:0007829|PDB:1A00, ECO:0007829|PDB:1B00\""
        );

        let strands = parse_annotation(&row["Beta strand"]).unwrap();
        assert_eq!(strands.len(), 2);
        assert_eq!((strands[0].start, strands[0].end), (3, 5));
        assert_eq!(strands[0].pdb, "1A00");
        assert_eq!((strands[1].start, strands[1].end), (8, 12));
        assert_eq!(strands[1].pdb, "1B00");

        let helices = parse_annotation(&row["Helix"]).unwrap();
        assert_eq!((helices[0].start, helices[0].end, helices[0].pdb.as_str()), (21, 35, "1A00"));
        assert_eq!(row["Turn"], "");
    }

    #[test]
    fn test_feature_clauses() {
        assert_eq!(feature_clauses(""), "");
        assert_eq!(
            feature_clauses("TURN <1..4; /evidence=\"ECO:0007829|PDB:2XYZ\""),
            "TURN 1 4 /evidence=\"ECO:0007829|PDB:2XYZ\""
        );
        // Already in clause form
        assert_eq!(
            feature_clauses(" 1 5 x PDB:1AAA.; 6 9 y PDB:1BBB"),
            "1 5 x PDB:1AAA.; 6 9 y PDB:1BBB"
        );
    }

    #[test]
    fn test_missing_trailing_cells_are_empty() {
        let body = format!("{}\nP12345\tMKVL\n", HEADER);
        let values = parse_tsv(&body, &AnnotationField::ALL, "P12345").unwrap();
        assert_eq!(values["P12345"]["Turn"], "");
        assert_eq!(values["P12345"]["Cross-reference (PDB)"], "");
    }

    #[test]
    fn test_extra_columns_keep_header_name() {
        let body = format!("{}\tLength\nP12345\tMK\t\t\t\t\t2\n", HEADER);
        let values = parse_tsv(&body, &AnnotationField::ALL, "P12345").unwrap();
        assert_eq!(values["P12345"]["Length"], "2");
    }

    #[test]
    fn test_header_only_has_no_entries() {
        let values = parse_tsv(HEADER, &AnnotationField::ALL, "P12345").unwrap();
        assert!(values.is_empty());
        assert!(parse_tsv("", &AnnotationField::ALL, "P12345").unwrap().is_empty());
    }

    #[test]
    fn test_short_header_is_format_error() {
        let err = parse_tsv("Entry\tSequence\n", &AnnotationField::ALL, "P12345").unwrap_err();
        assert!(matches!(err, AnnotationError::Format { .. }));
    }

    struct Fixed(HashMap<String, EntryFields>);

    #[async_trait]
    impl AnnotationService for Fixed {
        async fn query(
            &self,
            _entries: &[&str],
            _fields: &[AnnotationField],
        ) -> Result<HashMap<String, EntryFields>> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_fetch_entry_not_found() {
        let service = Fixed(HashMap::new());
        let err = fetch_entry(&service, "P12345").await.unwrap_err();
        assert!(matches!(err, AnnotationError::Lookup { ref target } if target == "P12345"));
    }

    #[tokio::test]
    async fn test_fetch_entry_secondary_accession() {
        let mut row = EntryFields::new();
        row.insert("Entry".to_string(), "P69905".to_string());
        let service = Fixed(HashMap::from([("P69905".to_string(), row)]));

        let fields = fetch_entry(&service, "P01922").await.unwrap();
        assert_eq!(fields["Entry"], "P69905");
    }

    #[tokio::test]
    async fn test_fetch_entry_ambiguous_rows_are_not_guessed() {
        let service = Fixed(HashMap::from([
            ("P69905".to_string(), EntryFields::new()),
            ("P68871".to_string(), EntryFields::new()),
        ]));

        let err = fetch_entry(&service, "P01922").await.unwrap_err();
        assert!(matches!(err, AnnotationError::Lookup { .. }));
    }

    #[tokio::test]
    async fn test_fetch_entry_ignores_case() {
        let mut row = EntryFields::new();
        row.insert("sequence".to_string(), "MK".to_string());
        let service = Fixed(HashMap::from([("P12345".to_string(), row)]));

        let fields = fetch_entry(&service, "p12345").await.unwrap();
        assert_eq!(fields["sequence"], "MK");
    }
}
