//! Time-windowed event listing for a location.

use chrono::NaiveDate;
use rusqlite::Connection;

use crate::gazetteer::error::Result;
use crate::gazetteer::store::event_from_row;
use crate::gazetteer::types::HistoricalEvent;

/// Historical events for a location, ascending by event date (ties by id).
///
/// Both date bounds are inclusive; an absent bound leaves that side
/// unbounded. A location with no events — or an unknown location id — yields
/// an empty timeline.
pub fn find_historical_timeline(
    conn: &Connection,
    location_id: i64,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<Vec<HistoricalEvent>> {
    let mut sql = String::from(
        "SELECT id, location_id, event_date, event_type, description, properties, created_at, updated_at \
         FROM historical_events WHERE location_id = ?1",
    );
    let mut params: Vec<Box<dyn rusqlite::types::ToSql>> = vec![Box::new(location_id)];

    if let Some(start) = start_date {
        params.push(Box::new(start.to_string()));
        sql.push_str(&format!(" AND event_date >= ?{}", params.len()));
    }
    if let Some(end) = end_date {
        params.push(Box::new(end.to_string()));
        sql.push_str(&format!(" AND event_date <= ?{}", params.len()));
    }
    sql.push_str(" ORDER BY event_date, id");

    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn rusqlite::types::ToSql> =
        params.iter().map(|p| p.as_ref()).collect();
    let events = stmt
        .query_map(param_refs.as_slice(), event_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::gazetteer::store;
    use crate::gazetteer::types::{NewEvent, NewLocation};

    fn test_db() -> Connection {
        db::open_memory_database().unwrap()
    }

    fn insert_location(conn: &Connection, name: &str) -> i64 {
        store::create_location(
            conn,
            &NewLocation {
                name,
                description: None,
                location_type: "test",
                lon: 0.0,
                lat: 0.0,
                properties: None,
            },
        )
        .unwrap()
        .id
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn insert_event(conn: &mut Connection, location_id: i64, day: &str, kind: &str) -> i64 {
        let description = format!("{kind} on {day}");
        store::create_event(
            conn,
            &NewEvent {
                location_id,
                event_date: date(day),
                event_type: kind,
                description: &description,
                embedding: None,
                properties: None,
            },
        )
        .unwrap()
        .id
    }

    #[test]
    fn events_ordered_by_date_ascending() {
        let mut conn = test_db();
        let loc = insert_location(&conn, "L");
        insert_event(&mut conn, loc, "1345-01-01", "completion");
        insert_event(&mut conn, loc, "1163-01-01", "construction");
        insert_event(&mut conn, loc, "2019-04-15", "fire");

        let events = find_historical_timeline(&conn, loc, None, None).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].event_type, "construction");
        assert_eq!(events[1].event_type, "completion");
        assert_eq!(events[2].event_type, "fire");
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let mut conn = test_db();
        let loc = insert_location(&conn, "L");
        insert_event(&mut conn, loc, "1163-01-01", "start");
        insert_event(&mut conn, loc, "1345-01-01", "end");
        insert_event(&mut conn, loc, "2019-04-15", "fire");

        let events = find_historical_timeline(
            &conn,
            loc,
            Some(date("1163-01-01")),
            Some(date("1345-01-01")),
        )
        .unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, "start");
        assert_eq!(events[1].event_type, "end");
    }

    #[test]
    fn half_open_bounds() {
        let mut conn = test_db();
        let loc = insert_location(&conn, "L");
        insert_event(&mut conn, loc, "1163-01-01", "early");
        insert_event(&mut conn, loc, "2019-04-15", "late");

        let from_1200 =
            find_historical_timeline(&conn, loc, Some(date("1200-01-01")), None).unwrap();
        assert_eq!(from_1200.len(), 1);
        assert_eq!(from_1200[0].event_type, "late");

        let until_1200 =
            find_historical_timeline(&conn, loc, None, Some(date("1200-01-01"))).unwrap();
        assert_eq!(until_1200.len(), 1);
        assert_eq!(until_1200[0].event_type, "early");
    }

    #[test]
    fn events_scoped_to_location() {
        let mut conn = test_db();
        let a = insert_location(&conn, "A");
        let b = insert_location(&conn, "B");
        insert_event(&mut conn, a, "1900-01-01", "a-event");
        insert_event(&mut conn, b, "1900-01-01", "b-event");

        let events = find_historical_timeline(&conn, a, None, None).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, "a-event");
    }

    #[test]
    fn unknown_location_yields_empty() {
        let conn = test_db();
        let events = find_historical_timeline(&conn, 999, None, None).unwrap();
        assert!(events.is_empty());
    }
}
