//! Bulk-load (`COPY`) statements for the two staging tables.
//!
//! `COPY` takes no bind parameters, so configured locations and the role
//! ARN are embedded as quoted string literals.

use dwh_core::{IamRoleConfig, S3Config};

use crate::error::CatalogError;

/// Render `value` as a single-quoted SQL string literal.
///
/// Embedded quotes are doubled. NUL and backslash are refused because
/// Redshift treats backslash as an escape inside `COPY` option strings.
pub fn quote_literal(key: &'static str, value: &str) -> Result<String, CatalogError> {
    if value.contains('\0') {
        return Err(CatalogError::UnsafeLiteral {
            key,
            reason: "contains a NUL byte",
        });
    }
    if value.contains('\\') {
        return Err(CatalogError::UnsafeLiteral {
            key,
            reason: "contains a backslash",
        });
    }
    Ok(format!("'{}'", value.replace('\'', "''")))
}

struct CopySource<'a> {
    table: &'static str,
    from: (&'static str, &'a str),
    json: JsonFormat<'a>,
}

enum JsonFormat<'a> {
    Auto,
    Paths(&'static str, &'a str),
}

fn render(source: CopySource<'_>, iam: &IamRoleConfig, s3: &S3Config) -> Result<String, CatalogError> {
    let (from_key, from) = source.from;
    let mut sql = format!(
        "
    COPY {}
    FROM {}
    CREDENTIALS {}",
        source.table,
        quote_literal(from_key, from)?,
        quote_literal("IAM_ROLE.ARN", &format!("aws_iam_role={}", iam.arn))?,
    );
    if let Some(region) = &s3.region {
        sql.push_str(&format!("\n    REGION {}", quote_literal("S3.REGION", region)?));
    }
    let json = match source.json {
        JsonFormat::Auto => "'auto'".to_string(),
        JsonFormat::Paths(key, path) => quote_literal(key, path)?,
    };
    sql.push_str(&format!("\n    JSON {}\n", json));
    Ok(sql)
}

/// `COPY staging_events` from the event logs, mapped through the JSONPaths file.
pub fn staging_events_copy(iam: &IamRoleConfig, s3: &S3Config) -> Result<String, CatalogError> {
    render(
        CopySource {
            table: "staging_events",
            from: ("S3.LOG_DATA", &s3.log_data),
            json: JsonFormat::Paths("S3.LOG_JSONPATH", &s3.log_jsonpath),
        },
        iam,
        s3,
    )
}

/// `COPY staging_songs` from the song catalog, field names matched automatically.
pub fn staging_songs_copy(iam: &IamRoleConfig, s3: &S3Config) -> Result<String, CatalogError> {
    render(
        CopySource {
            table: "staging_songs",
            from: ("S3.SONG_DATA", &s3.song_data),
            json: JsonFormat::Auto,
        },
        iam,
        s3,
    )
}
