use dwh_core::DwhConfig;
use tracing::info;

use crate::copy;
use crate::error::CatalogError;
use crate::schema::TABLES;
use crate::statement::{Phase, Statement};
use crate::transform;

/// Every statement the loader runs, grouped by phase in execution order.
///
/// Insert order encodes the transform dependencies: the fact insert reads
/// both staging tables, the three dimension inserts are independent, and
/// the time insert reads `songplays` so it comes last.
#[derive(Debug, Clone)]
pub struct Catalog {
    drop: Vec<Statement>,
    create: Vec<Statement>,
    copy: Vec<Statement>,
    insert: Vec<Statement>,
}

impl Catalog {
    /// Render all statements, substituting S3 locations and the IAM role
    /// into the copy phase.
    pub fn build(config: &DwhConfig) -> Result<Self, CatalogError> {
        let drop = TABLES
            .iter()
            .map(|t| Statement::new(t.drop_tag, Phase::Drop, t.drop_sql()))
            .collect();
        let create = TABLES
            .iter()
            .map(|t| Statement::new(t.create_tag, Phase::Create, t.ddl))
            .collect();

        let copy = vec![
            Statement::new(
                "staging_events_copy",
                Phase::Copy,
                copy::staging_events_copy(&config.iam_role, &config.s3)?,
            ),
            Statement::new(
                "staging_songs_copy",
                Phase::Copy,
                copy::staging_songs_copy(&config.iam_role, &config.s3)?,
            ),
        ];

        let insert = vec![
            Statement::new("songplay_table_insert", Phase::Insert, transform::SONGPLAY_INSERT),
            Statement::new("user_table_insert", Phase::Insert, transform::USER_INSERT),
            Statement::new("song_table_insert", Phase::Insert, transform::SONG_INSERT),
            Statement::new("artist_table_insert", Phase::Insert, transform::ARTIST_INSERT),
            Statement::new(
                "time_table_insert",
                Phase::Insert,
                transform::time_insert(config.etl.week_extraction),
            ),
        ];

        let catalog = Self {
            drop,
            create,
            copy,
            insert,
        };
        info!(
            "Catalog built: {} drop, {} create, {} copy, {} insert statements (week={})",
            catalog.drop.len(),
            catalog.create.len(),
            catalog.copy.len(),
            catalog.insert.len(),
            config.etl.week_extraction
        );
        Ok(catalog)
    }

    pub fn phase(&self, phase: Phase) -> &[Statement] {
        match phase {
            Phase::Drop => &self.drop,
            Phase::Create => &self.create,
            Phase::Copy => &self.copy,
            Phase::Insert => &self.insert,
        }
    }

    /// Drop statements followed by create statements.
    pub fn schema_setup(&self) -> impl Iterator<Item = &Statement> {
        self.drop.iter().chain(self.create.iter())
    }

    /// Copy statements followed by insert statements.
    pub fn etl(&self) -> impl Iterator<Item = &Statement> {
        self.copy.iter().chain(self.insert.iter())
    }

    /// Look up a statement by tag in any phase.
    pub fn get(&self, tag: &str) -> Option<&Statement> {
        Phase::ALL
            .iter()
            .flat_map(|p| self.phase(*p))
            .find(|s| s.tag == tag)
    }

    /// Managed tables in create order.
    pub fn table_names(&self) -> Vec<&'static str> {
        TABLES.iter().map(|t| t.name).collect()
    }
}
