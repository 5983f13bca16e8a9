//! Secondary-structure annotation parser
//!
//! UniProt reports beta strands, helices and turns as one string per feature
//! type, with one clause per residue range separated by `.; `:
//!
//! ```text
//! STRAND 3 5 {ECO:0000244|PDB:1ABC}.; STRAND 8 12 {ECO:0000244|PDB:2DEF}
//! ```
//!
//! Each clause is read with this grammar (tokens are whitespace-delimited):
//!
//! ```text
//! clause := prefix* INTEGER INTEGER text* "PDB:" IDENT tail
//! ```
//!
//! The first adjacent pair of integer tokens gives the range, the last
//! `PDB:` marker after them gives the structure id. IDENT is a run of ASCII
//! alphanumerics or `_`.

use thiserror::Error;

use super::models::SecondaryStructureRange;

/// Separator between clauses
pub const CLAUSE_DELIMITER: &str = ".; ";

/// Marker preceding the structure id inside a clause
pub const PDB_MARKER: &str = "PDB:";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClauseErrorKind {
    #[error("no 'start end' integer pair found")]
    MissingRange,

    #[error("integer '{0}' is out of range")]
    IntegerOverflow(String),

    #[error("range start {start} is after end {end}")]
    InvertedRange { start: u32, end: u32 },

    #[error("no '{}' marker after the range", PDB_MARKER)]
    MissingPdbMarker,

    #[error("no structure id after '{}'", PDB_MARKER)]
    EmptyPdbId,
}

/// A clause that does not follow the grammar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid secondary structure clause '{clause}': {kind}")]
pub struct ClauseError {
    pub clause: String,
    pub kind: ClauseErrorKind,
}

impl ClauseError {
    fn new(clause: &str, kind: ClauseErrorKind) -> Self {
        Self {
            clause: clause.to_string(),
            kind,
        }
    }
}

/// Parse a whole annotation string into ranges, in input order
///
/// An empty (or blank) string has no ranges.
pub fn parse_annotation(annotation: &str) -> Result<Vec<SecondaryStructureRange>, ClauseError> {
    if annotation.trim().is_empty() {
        return Ok(Vec::new());
    }

    annotation.split(CLAUSE_DELIMITER).map(parse_clause).collect()
}

/// Parse one `.; `-delimited clause
pub fn parse_clause(clause: &str) -> Result<SecondaryStructureRange, ClauseError> {
    let (start, end, rest) = find_range(clause)?;

    if start > end {
        return Err(ClauseError::new(
            clause,
            ClauseErrorKind::InvertedRange { start, end },
        ));
    }

    let marker = rest
        .rfind(PDB_MARKER)
        .ok_or_else(|| ClauseError::new(clause, ClauseErrorKind::MissingPdbMarker))?;

    let id_start = &rest[marker + PDB_MARKER.len()..];
    let id_len = id_start
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(id_start.len());

    if id_len == 0 {
        return Err(ClauseError::new(clause, ClauseErrorKind::EmptyPdbId));
    }

    Ok(SecondaryStructureRange {
        start,
        end,
        pdb: id_start[..id_len].to_string(),
    })
}

/// Locate the first two adjacent integer tokens
///
/// Returns the parsed pair and the clause text following the second integer.
fn find_range(clause: &str) -> Result<(u32, u32, &str), ClauseError> {
    let tokens = tokens_with_offsets(clause);

    for pair in tokens.windows(2) {
        let (_, first) = pair[0];
        let (offset, second) = pair[1];

        if !is_integer(first) || !is_integer(second) {
            continue;
        }

        let start = parse_integer(clause, first)?;
        let end = parse_integer(clause, second)?;
        return Ok((start, end, &clause[offset + second.len()..]));
    }

    Err(ClauseError::new(clause, ClauseErrorKind::MissingRange))
}

fn tokens_with_offsets(text: &str) -> Vec<(usize, &str)> {
    let mut tokens = Vec::new();
    let mut start = None;

    for (idx, c) in text.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(s)) => {
                tokens.push((s, &text[s..idx]));
                start = None;
            },
            (false, None) => start = Some(idx),
            _ => {},
        }
    }
    if let Some(s) = start {
        tokens.push((s, &text[s..]));
    }

    tokens
}

fn is_integer(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

fn parse_integer(clause: &str, token: &str) -> Result<u32, ClauseError> {
    token
        .parse()
        .map_err(|_| ClauseError::new(clause, ClauseErrorKind::IntegerOverflow(token.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn range(start: u32, end: u32, pdb: &str) -> SecondaryStructureRange {
        SecondaryStructureRange {
            start,
            end,
            pdb: pdb.to_string(),
        }
    }

    #[test]
    fn test_single_clause() {
        assert_eq!(parse_clause(" 10 25 region PDB:1ABC").unwrap(), range(10, 25, "1ABC"));
    }

    #[test]
    fn test_two_clauses_in_order() {
        let ranges = parse_annotation(" 1 5 x PDB:1AAA.; 6 9 y PDB:1BBB").unwrap();
        assert_eq!(ranges, vec![range(1, 5, "1AAA"), range(6, 9, "1BBB")]);
    }

    #[test]
    fn test_empty_annotation() {
        assert!(parse_annotation("").unwrap().is_empty());
        assert!(parse_annotation("   ").unwrap().is_empty());
    }

    #[test]
    fn test_uniprot_style_clause() {
        let parsed = parse_clause("BETA STRAND 3 5 {ECO:0000244|PDB:1ABC}").unwrap();
        assert_eq!(parsed, range(3, 5, "1ABC"));
    }

    #[test]
    fn test_last_marker_wins() {
        let parsed = parse_clause("HELIX 14 20 {ECO:0000244|PDB:1AAA, ECO:0000244|PDB:2BBB}").unwrap();
        assert_eq!(parsed.pdb, "2BBB");
    }

    #[test]
    fn test_missing_marker_is_parse_error() {
        let err = parse_clause(" 10 25 region 1ABC").unwrap_err();
        assert_eq!(err.kind, ClauseErrorKind::MissingPdbMarker);
        assert_eq!(err.clause, " 10 25 region 1ABC");
    }

    #[test]
    fn test_missing_range() {
        let err = parse_clause("TURN PDB:1ABC").unwrap_err();
        assert_eq!(err.kind, ClauseErrorKind::MissingRange);

        let err = parse_clause("TURN 12 PDB:1ABC").unwrap_err();
        assert_eq!(err.kind, ClauseErrorKind::MissingRange);
    }

    #[test]
    fn test_integer_glued_to_text_is_not_a_range() {
        let err = parse_clause("STRAND 3 5PDB:1ABC").unwrap_err();
        assert_eq!(err.kind, ClauseErrorKind::MissingRange);
    }

    #[test]
    fn test_empty_pdb_id() {
        let err = parse_clause(" 1 2 x PDB: ").unwrap_err();
        assert_eq!(err.kind, ClauseErrorKind::EmptyPdbId);
    }

    #[test]
    fn test_inverted_range() {
        let err = parse_clause(" 9 2 x PDB:1ABC").unwrap_err();
        assert_eq!(err.kind, ClauseErrorKind::InvertedRange { start: 9, end: 2 });
    }

    #[test]
    fn test_integer_overflow() {
        let err = parse_clause(" 1 99999999999 x PDB:1ABC").unwrap_err();
        assert_eq!(err.kind, ClauseErrorKind::IntegerOverflow("99999999999".to_string()));
    }

    #[test]
    fn test_bad_clause_in_middle_fails_whole_annotation() {
        let err = parse_annotation(" 1 5 x PDB:1AAA.; broken.; 6 9 y PDB:1BBB").unwrap_err();
        assert_eq!(err.clause, "broken");
    }

    #[test]
    fn test_error_message_names_clause() {
        let err = parse_clause("nonsense").unwrap_err();
        assert!(err.to_string().contains("'nonsense'"));
    }

    proptest! {
        #[test]
        fn n_clauses_give_n_ranges(
            clauses in proptest::collection::vec(
                (0u32..5000, 0u32..500, "[a-z]{1,8}", "[0-9][A-Z0-9]{3}"),
                1..12,
            )
        ) {
            let text = clauses
                .iter()
                .map(|(start, len, note, pdb)| format!(" {} {} {} PDB:{}", start, start + len, note, pdb))
                .collect::<Vec<_>>()
                .join(CLAUSE_DELIMITER);

            let ranges = parse_annotation(&text).unwrap();
            prop_assert_eq!(ranges.len(), clauses.len());
            for (parsed, (start, len, _, pdb)) in ranges.iter().zip(&clauses) {
                prop_assert_eq!(parsed.start, *start);
                prop_assert_eq!(parsed.end, start + len);
                prop_assert_eq!(&parsed.pdb, pdb);
            }
        }
    }
}
