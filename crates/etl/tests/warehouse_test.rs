//! End-to-end checks against a live Redshift cluster.
//!
//! These tests drop and recreate the managed tables, so point them at a
//! scratch database. They are `#[ignore]`d and need a config file:
//!
//! `DWH_TEST_CONFIG=dwh.test.toml cargo test -p dwh-etl --test warehouse_test -- --ignored`
//!
//! Staging rows are inserted directly instead of via `COPY`, so no S3 data
//! is read.

use sqlx::postgres::PgConnection;
use sqlx::Connection;
use tokio::sync::Mutex;

use dwh_catalog::Catalog;
use dwh_core::DwhConfig;
use dwh_etl::{PgWarehouse, Runner, Warehouse};

// All tests share the same tables.
static LIVE_LOCK: Mutex<()> = Mutex::const_new(());

const NEXT_SONG_EVENT: &str = "
    INSERT INTO staging_events (artist, auth, user_first_name, gender, item_in_session,
                                user_last_name, length, level, location, method, page,
                                registration, session_id, song, status, ts, user_agent, user_id)
    VALUES ('Muse', 'Logged In', 'Jacob', 'M', 3,
            'Klein', 227.0, 'paid', 'Tampa-St. Petersburg-Clearwater, FL', 'PUT', 'NextSong',
            1540558108796, 954, 'Hysteria', 200, 1541903636796, 'Mozilla/5.0', 73)
";

const HOME_PAGE_EVENT: &str = "
    INSERT INTO staging_events (artist, auth, user_first_name, gender, item_in_session,
                                user_last_name, length, level, location, method, page,
                                registration, session_id, song, status, ts, user_agent, user_id)
    VALUES (NULL, 'Logged In', 'Jacob', 'M', 4,
            'Klein', NULL, 'paid', 'Tampa-St. Petersburg-Clearwater, FL', 'GET', 'Home',
            1540558108796, 954, 'Hysteria', 200, 1541903700000, 'Mozilla/5.0', 73)
";

const UNMATCHED_EVENT: &str = "
    INSERT INTO staging_events (artist, auth, user_first_name, gender, item_in_session,
                                user_last_name, length, level, location, method, page,
                                registration, session_id, song, status, ts, user_agent, user_id)
    VALUES ('Muse', 'Logged In', 'Jacob', 'M', 5,
            'Klein', 227.0, 'paid', 'Tampa-St. Petersburg-Clearwater, FL', 'PUT', 'NextSong',
            1540558108796, 954, 'Hysteria (Live)', 200, 1541903900000, 'Mozilla/5.0', 73)
";

const SONG: &str = "
    INSERT INTO staging_songs (artist_id, artist_latitude, artist_location, artist_longitude,
                               artist_name, duration, num_songs, song_id, title, year)
    VALUES ('ARJNIUY12298900C91', NULL, 'Teignmouth', NULL,
            'Muse', 227.0, 1, 'SOMZWCG12A8C13C480', 'Hysteria', 2003)
";

fn load_config() -> DwhConfig {
    let path = std::env::var("DWH_TEST_CONFIG").expect("DWH_TEST_CONFIG must point at a config file");
    DwhConfig::load(path).expect("valid test config")
}

/// Reset the schema and seed staging with `rows`.
async fn prepare(config: &DwhConfig, catalog: &Catalog, rows: &[&str]) -> Runner<PgWarehouse> {
    let warehouse = PgWarehouse::connect(&config.cluster).await.unwrap();
    let mut runner = Runner::new(warehouse, false);
    runner.reset_schema(catalog).await.unwrap();

    let (mut warehouse, _) = runner.into_parts();
    for sql in rows {
        warehouse.execute_committed(sql).await.unwrap();
    }
    Runner::new(warehouse, false)
}

async fn count(config: &DwhConfig, table: &str) -> i64 {
    let options = PgWarehouse::connect_options(&config.cluster).unwrap();
    let mut conn = PgConnection::connect_with(&options).await.unwrap();
    let n: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(&mut conn)
        .await
        .unwrap();
    conn.close().await.unwrap();
    n
}

#[tokio::test]
#[ignore]
async fn reset_schema_twice_succeeds() {
    let _lock = LIVE_LOCK.lock().await;
    let config = load_config();
    let catalog = Catalog::build(&config).unwrap();

    for _ in 0..2 {
        let warehouse = PgWarehouse::connect(&config.cluster).await.unwrap();
        Runner::new(warehouse, false)
            .run_schema_setup(&catalog)
            .await
            .unwrap();
    }

    for table in catalog.table_names() {
        assert_eq!(count(&config, table).await, 0, "{table} should be empty");
    }
}

#[tokio::test]
#[ignore]
async fn single_next_song_event_populates_every_table() {
    let _lock = LIVE_LOCK.lock().await;
    let config = load_config();
    let catalog = Catalog::build(&config).unwrap();

    let mut runner = prepare(&config, &catalog, &[NEXT_SONG_EVENT, SONG]).await;
    runner.transform(&catalog).await.unwrap();
    runner.finish(Ok(())).await.unwrap();

    for table in ["songplays", "users", "songs", "artists", "time"] {
        assert_eq!(count(&config, table).await, 1, "{table} should hold one row");
    }

    // ts 1541903636796 is 2018-11-11 02:33:56.796 UTC.
    let options = PgWarehouse::connect_options(&config.cluster).unwrap();
    let mut conn = PgConnection::connect_with(&options).await.unwrap();
    let (start_time, hour): (chrono::NaiveDateTime, i32) =
        sqlx::query_as("SELECT start_time, hour FROM time")
            .fetch_one(&mut conn)
            .await
            .unwrap();
    assert_eq!(start_time.format("%Y-%m-%d %H:%M:%S").to_string(), "2018-11-11 02:33:56");
    assert_eq!(hour, 2);
    conn.close().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn non_next_song_event_never_becomes_a_songplay() {
    let _lock = LIVE_LOCK.lock().await;
    let config = load_config();
    let catalog = Catalog::build(&config).unwrap();

    let mut runner = prepare(&config, &catalog, &[HOME_PAGE_EVENT, SONG]).await;
    runner.transform(&catalog).await.unwrap();
    runner.finish(Ok(())).await.unwrap();

    assert_eq!(count(&config, "songplays").await, 0);
    assert_eq!(count(&config, "time").await, 0);
}

#[tokio::test]
#[ignore]
async fn unmatched_title_produces_no_songplay() {
    let _lock = LIVE_LOCK.lock().await;
    let config = load_config();
    let catalog = Catalog::build(&config).unwrap();

    let mut runner = prepare(&config, &catalog, &[UNMATCHED_EVENT, SONG]).await;
    runner.transform(&catalog).await.unwrap();
    runner.finish(Ok(())).await.unwrap();

    assert_eq!(count(&config, "songplays").await, 0);
    assert_eq!(count(&config, "songs").await, 1);
}

/// Inserts append. If deduplication is ever added this test should start failing.
#[tokio::test]
#[ignore]
async fn transform_twice_duplicates_songplays() {
    let _lock = LIVE_LOCK.lock().await;
    let config = load_config();
    let catalog = Catalog::build(&config).unwrap();

    let mut runner = prepare(&config, &catalog, &[NEXT_SONG_EVENT, SONG]).await;
    runner.transform(&catalog).await.unwrap();
    runner.transform(&catalog).await.unwrap();
    runner.finish(Ok(())).await.unwrap();

    assert_eq!(count(&config, "songplays").await, 2);
}
