use std::io::{self, Write};

/// Print a statement's tag and SQL the way `--verbose` shows it:
/// the tag, a `-----` rule, then the SQL followed by a blank line.
pub fn echo_statement<O: Write>(out: &mut O, tag: &str, sql: &str) -> io::Result<()> {
    writeln!(out, "{}", tag)?;
    writeln!(out, "-----")?;
    writeln!(out, "{} \n", sql)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_layout() {
        let mut out = Vec::new();
        echo_statement(&mut out, "time_table_drop", "DROP TABLE IF EXISTS time").unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "time_table_drop\n-----\nDROP TABLE IF EXISTS time \n\n"
        );
    }
}
