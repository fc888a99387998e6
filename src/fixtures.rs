//! Shared builders for unit tests

use chrono::NaiveDate;

use crate::models::session::SessionBuilder;
use crate::models::{
    Activity, CustomerSession, CustomerStatus, Participant, Session, SessionStatus,
    SessionWithDetails, Spot,
};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn session_on(id: &str, year: i32, month: u32, day: u32) -> Session {
    SessionBuilder::new(id, date(year, month, day), "a1", "p1").build()
}

pub fn archived_on(id: &str, year: i32, month: u32, day: u32) -> Session {
    SessionBuilder::new(id, date(year, month, day), "a1", "p1")
        .status(SessionStatus::Archived)
        .build()
}

pub fn activity(id: &str, name: &str) -> Activity {
    Activity {
        id: id.into(),
        name: name.into(),
        description: format!("{} outing", name),
        pricing: vec![],
        min_participants: 1,
        max_participants: 10,
        min_age: 6,
        duration: "3h".into(),
        required_equipment: String::new(),
    }
}

pub fn spot(id: &str, name: &str) -> Spot {
    Spot {
        id: id.into(),
        name: name.into(),
        description: String::new(),
        gps_coordinates: None,
        meeting_point: None,
    }
}

pub fn booking(
    id: &str,
    session_id: &str,
    people: usize,
    total: f64,
    status: CustomerStatus,
) -> CustomerSession {
    CustomerSession {
        id: id.into(),
        session_id: session_id.into(),
        first_names: "Jean".into(),
        last_name: format!("Client-{}", id),
        email: format!("{}@example.com", id),
        phone: "0600000000".into(),
        people_list: (0..people)
            .map(|i| Participant {
                first_name: format!("P{}", i),
                last_name: "Guest".into(),
                age: Some(30),
            })
            .collect(),
        status,
        price_applicable: if people > 0 { total / people as f64 } else { total },
        price_total: total,
    }
}

pub fn details(session: Session, bookings: Vec<CustomerSession>) -> SessionWithDetails {
    SessionWithDetails {
        session,
        activity: Some(activity("a1", "Kayak")),
        spot: Some(spot("p1", "Calanques")),
        customer_sessions: bookings,
    }
}
