//! `INSERT ... SELECT` statements that populate the star schema from staging.

use dwh_core::WeekExtraction;

/// Fact rows: `NextSong` events joined to songs by exact title match.
pub const SONGPLAY_INSERT: &str = "
    INSERT INTO songplays (songplay_id, start_time,
                           song_id, artist_id,
                           user_id, session_id, level, location, user_agent)
         SELECT songplay_id, start_time,
                song_id, artist_id,
                user_id, session_id, level, location, user_agent
           FROM (SELECT songplay_id,
                        TIMESTAMP 'epoch' + ts/1000.0 * INTERVAL '1 seconds' AS start_time,
                        song,
                        user_id, session_id, level, location, user_agent
                   FROM staging_events
                  WHERE page = 'NextSong') AS u
           JOIN (SELECT song_id, artist_id,
                        title AS song
                   FROM staging_songs) AS s
             ON u.song = s.song
";

pub const USER_INSERT: &str = "
    INSERT INTO users (user_id,
                       user_first_name, user_last_name,
                       gender, level)
         SELECT c.user_id,
                c.user_first_name, c.user_last_name,
                c.gender, c.level
           FROM (SELECT DISTINCT user_id
                   FROM staging_events) AS id
           JOIN (SELECT user_id,
                        user_first_name, user_last_name,
                        gender, level
                   FROM staging_events) AS c
             ON id.user_id = c.user_id
";

pub const SONG_INSERT: &str = "
    INSERT INTO songs (song_id,
                       title, year, duration,
                       artist_id)
         SELECT c.song_id,
                c.title, c.year, c.duration,
                c.artist_id
           FROM (SELECT DISTINCT song_id
                   FROM staging_songs) AS id
           JOIN (SELECT song_id,
                        title, year, duration,
                        artist_id
                   FROM staging_songs) AS c
             ON id.song_id = c.song_id
";

pub const ARTIST_INSERT: &str = "
    INSERT INTO artists (artist_id,
                         name, location, latitude, longitude)
         SELECT c.artist_id,
                c.artist_name, c.artist_location, c.artist_latitude, c.artist_longitude
           FROM (SELECT DISTINCT artist_id
                   FROM staging_songs) AS id
           JOIN (SELECT artist_id,
                        artist_name, artist_location, artist_latitude, artist_longitude
                   FROM staging_songs) AS c
             ON id.artist_id = c.artist_id
";

/// Time rows are derived from `songplays`, so this must run after the fact insert.
pub fn time_insert(week: WeekExtraction) -> String {
    let week_part = match week {
        WeekExtraction::Week => "WEEK",
        WeekExtraction::LegacyHour => "HOUR",
    };
    format!(
        "
    INSERT INTO time (start_time, hour, day, week, month, year, weekday)
         SELECT c.start_time,
                c.hour, c.day, c.week, c.month, c.year, c.weekday
           FROM (SELECT DISTINCT start_time
                   FROM songplays) AS t
           JOIN (SELECT start_time,
                        EXTRACT(HOUR FROM start_time) AS hour,
                        EXTRACT(DAY FROM start_time) AS day,
                        EXTRACT({week_part} FROM start_time) AS week,
                        EXTRACT(MONTH FROM start_time) AS month,
                        EXTRACT(YEAR FROM start_time) AS year,
                        EXTRACT(WEEKDAY FROM start_time) AS weekday
                   FROM songplays) AS c
             ON t.start_time = c.start_time
"
    )
}
