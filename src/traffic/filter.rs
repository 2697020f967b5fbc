use std::borrow::Cow;

use rayon::prelude::*;

use crate::{
    shared::time::{Minute, TimeFilter},
    traffic::Trip,
};

/// Minutes on either side of the filter minute a trip may start or end.
pub const WINDOW_MINUTES: u16 = 60;

impl Trip {
    /// True when the trip starts or ends within [`WINDOW_MINUTES`] of `minute`.
    /// The window stops at midnight, 23:50 is not near 00:10.
    pub fn is_near(&self, minute: Minute) -> bool {
        self.started_minute().abs_diff(minute) <= WINDOW_MINUTES
            || self.ended_minute().abs_diff(minute) <= WINDOW_MINUTES
    }
}

/// Trips that count under `filter`, in input order.
/// Without an active filter the input is handed back as is.
pub fn filter_trips(trips: &[Trip], filter: TimeFilter) -> Cow<'_, [Trip]> {
    match filter {
        TimeFilter::Any => Cow::Borrowed(trips),
        TimeFilter::At(minute) => Cow::Owned(
            trips
                .par_iter()
                .filter(|trip| trip.is_near(minute))
                .cloned()
                .collect(),
        ),
    }
}

#[cfg(test)]
fn trip_at(start: &str, end: &str) -> Trip {
    use crate::shared::time::parse_timestamp;
    Trip::new(
        "A",
        "B",
        parse_timestamp(&format!("2024-03-01 {start}:00")).unwrap(),
        parse_timestamp(&format!("2024-03-01 {end}:00")).unwrap(),
    )
}

#[test]
fn any_time_borrows_input() {
    let trips = vec![trip_at("00:10", "00:40"), trip_at("12:00", "12:30")];
    let filtered = filter_trips(&trips, TimeFilter::Any);
    assert!(matches!(filtered, Cow::Borrowed(_)));
    assert_eq!(filtered.as_ptr(), trips.as_ptr());
}

#[test]
fn window_edges_are_inclusive() {
    let minute = Minute::new(600).unwrap();
    assert!(trip_at("09:00", "09:00").is_near(minute));
    assert!(trip_at("11:00", "11:30").is_near(minute));
    assert!(!trip_at("08:59", "08:59").is_near(minute));
    assert!(!trip_at("11:01", "11:20").is_near(minute));
}

#[test]
fn end_alone_is_enough() {
    let minute = Minute::new(600).unwrap();
    assert!(trip_at("07:00", "09:30").is_near(minute));
}

#[test]
fn window_does_not_wrap_midnight() {
    let minute = Minute::new(10).unwrap();
    assert!(!trip_at("23:50", "23:55").is_near(minute));
}

#[test]
fn filter_keeps_order() {
    let trips = vec![
        trip_at("10:30", "10:45"),
        trip_at("02:00", "02:10"),
        trip_at("09:15", "09:20"),
        trip_at("10:30", "10:45"),
    ];
    let filtered = filter_trips(&trips, TimeFilter::At(Minute::new(600).unwrap()));
    assert_eq!(
        filtered.as_ref(),
        &[trips[0].clone(), trips[2].clone(), trips[3].clone()]
    );
}
