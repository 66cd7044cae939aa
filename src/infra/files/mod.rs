pub mod csv;
pub mod xlsx;

/// A tabular file reduced to strings: ordered headers plus rows aligned to
/// them. Cell types from the source format are already coerced away.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}
