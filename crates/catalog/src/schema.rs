//! Table definitions for the staging, dimension and fact tables.
//!
//! Drop and create statements are both derived from [`TABLES`], so the
//! drop phase always names exactly the tables the create phase creates,
//! in the same order.

/// One managed table.
#[derive(Debug, Clone, Copy)]
pub struct TableDef {
    pub name: &'static str,
    pub drop_tag: &'static str,
    pub create_tag: &'static str,
    pub ddl: &'static str,
}

impl TableDef {
    pub fn drop_sql(&self) -> String {
        format!("DROP TABLE IF EXISTS {}", self.name)
    }
}

// ── Staging ───────────────────────────────────────────────────

const STAGING_EVENTS_CREATE: &str = "
    CREATE TABLE IF NOT EXISTS staging_events (
        songplay_id     INT             IDENTITY(0,1),
        artist          VARCHAR,
        auth            VARCHAR,
        user_first_name VARCHAR,
        gender          VARCHAR,
        item_in_session INT,
        user_last_name  VARCHAR,
        length          NUMERIC,
        level           VARCHAR,
        location        VARCHAR,
        method          VARCHAR,
        page            VARCHAR,
        registration    NUMERIC,
        session_id      INT,
        song            VARCHAR,
        status          INT,
        ts              NUMERIC,
        user_agent      VARCHAR,
        user_id         INT,
        PRIMARY KEY (songplay_id))
    DISTKEY(songplay_id)
    SORTKEY(songplay_id)
";

const STAGING_SONGS_CREATE: &str = "
    CREATE TABLE IF NOT EXISTS staging_songs (
        artist_id           VARCHAR,
        artist_latitude     NUMERIC,
        artist_location     VARCHAR,
        artist_longitude    NUMERIC,
        artist_name         VARCHAR,
        duration            NUMERIC,
        num_songs           INT,
        song_id             VARCHAR,
        title               VARCHAR,
        year                INT,
        PRIMARY KEY (song_id))
    DISTKEY(num_songs)
    SORTKEY(num_songs)
";

// ── Fact ──────────────────────────────────────────────────────

const SONGPLAYS_CREATE: &str = "
    CREATE TABLE IF NOT EXISTS songplays (
        songplay_id     INT         NOT NULL,
        start_time      TIMESTAMP   NOT NULL,
        user_id         INT         NOT NULL,
        level           VARCHAR,
        song_id         VARCHAR     NOT NULL,
        artist_id       VARCHAR     NOT NULL,
        session_id      INT         NOT NULL,
        location        VARCHAR,
        user_agent      VARCHAR,
        PRIMARY KEY (songplay_id))
    DISTKEY(songplay_id)
    SORTKEY(songplay_id)
";

// ── Dimensions ────────────────────────────────────────────────

const USERS_CREATE: &str = "
    CREATE TABLE IF NOT EXISTS users (
        user_id          INT         NOT NULL,
        user_first_name  VARCHAR     NOT NULL,
        user_last_name   VARCHAR     NOT NULL,
        gender           VARCHAR,
        level            VARCHAR     NOT NULL,
        PRIMARY KEY (user_id))
    DISTKEY(user_id)
    SORTKEY(user_id)
";

const SONGS_CREATE: &str = "
    CREATE TABLE IF NOT EXISTS songs (
        song_id     VARCHAR     NOT NULL,
        title       VARCHAR     NOT NULL,
        artist_id   VARCHAR     NOT NULL,
        year        INT,
        duration    NUMERIC,
        PRIMARY KEY (song_id))
    DISTKEY(song_id)
    SORTKEY(song_id)
";

const ARTISTS_CREATE: &str = "
    CREATE TABLE IF NOT EXISTS artists (
        artist_id   VARCHAR     NOT NULL,
        name        VARCHAR     NOT NULL,
        location    VARCHAR,
        latitude    VARCHAR,
        longitude   VARCHAR,
        PRIMARY KEY (artist_id))
    DISTKEY(artist_id)
    SORTKEY(artist_id)
";

const TIME_CREATE: &str = "
    CREATE TABLE IF NOT EXISTS time (
        start_time  TIMESTAMP   NOT NULL,
        hour        INT         NOT NULL,
        day         INT         NOT NULL,
        week        INT         NOT NULL,
        month       INT         NOT NULL,
        year        INT         NOT NULL,
        weekday     INT         NOT NULL,
        PRIMARY KEY (start_time))
    DISTKEY(start_time)
    SORTKEY(start_time)
";

/// Managed tables in create order.
pub const TABLES: &[TableDef] = &[
    TableDef {
        name: "staging_events",
        drop_tag: "staging_events_table_drop",
        create_tag: "staging_events_table_create",
        ddl: STAGING_EVENTS_CREATE,
    },
    TableDef {
        name: "staging_songs",
        drop_tag: "staging_songs_table_drop",
        create_tag: "staging_songs_table_create",
        ddl: STAGING_SONGS_CREATE,
    },
    TableDef {
        name: "songplays",
        drop_tag: "songplay_table_drop",
        create_tag: "songplay_table_create",
        ddl: SONGPLAYS_CREATE,
    },
    TableDef {
        name: "users",
        drop_tag: "user_table_drop",
        create_tag: "user_table_create",
        ddl: USERS_CREATE,
    },
    TableDef {
        name: "songs",
        drop_tag: "song_table_drop",
        create_tag: "song_table_create",
        ddl: SONGS_CREATE,
    },
    TableDef {
        name: "artists",
        drop_tag: "artist_table_drop",
        create_tag: "artist_table_create",
        ddl: ARTISTS_CREATE,
    },
    TableDef {
        name: "time",
        drop_tag: "time_table_drop",
        create_tag: "time_table_create",
        ddl: TIME_CREATE,
    },
];
