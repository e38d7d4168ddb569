use std::fmt;

/// Execution phase a statement belongs to.
///
/// Schema setup runs `Drop` then `Create`; the ETL run runs `Copy` then `Insert`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Drop,
    Create,
    Copy,
    Insert,
}

impl Phase {
    pub const ALL: [Phase; 4] = [Phase::Drop, Phase::Create, Phase::Copy, Phase::Insert];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Drop => "drop",
            Phase::Create => "create",
            Phase::Copy => "copy",
            Phase::Insert => "insert",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tagged SQL statement, executed and committed on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// Stable name, e.g. `songplay_table_insert`.
    pub tag: &'static str,
    pub phase: Phase,
    pub sql: String,
}

impl Statement {
    pub fn new(tag: &'static str, phase: Phase, sql: impl Into<String>) -> Self {
        Self {
            tag,
            phase,
            sql: sql.into(),
        }
    }
}
