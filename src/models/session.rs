//! Session data types
//!
//! A session is one scheduled occurrence of an activity at a spot.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionStatus {
    #[serde(rename = "Actif")]
    Active,
    Pending,
    Archived,
}

impl SessionStatus {
    /// Stored/wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Active => "Actif",
            SessionStatus::Pending => "Pending",
            SessionStatus::Archived => "Archived",
        }
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Actif" | "Active" => Ok(SessionStatus::Active),
            "Pending" => Ok(SessionStatus::Pending),
            "Archived" => Ok(SessionStatus::Archived),
            other => Err(format!("unknown session status: {}", other)),
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Booking plan of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formula {
    HalfDay,
    FullDay,
}

impl Formula {
    pub fn as_str(&self) -> &'static str {
        match self {
            Formula::HalfDay => "half_day",
            Formula::FullDay => "full_day",
        }
    }
}

impl FromStr for Formula {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "half_day" => Ok(Formula::HalfDay),
            "full_day" => Ok(Formula::FullDay),
            other => Err(format!("unknown formula: {}", other)),
        }
    }
}

/// Session record as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(rename = "_id")]
    pub id: String,
    pub date: NaiveDate,
    /// "HH:MM"
    pub start_time: String,
    /// "HH:MM"
    pub end_time: String,
    pub places_max: u32,
    pub places_reserved: u32,
    #[serde(rename = "type_formule")]
    pub formula: Formula,
    pub status: SessionStatus,
    /// Activity id
    pub activity: String,
    /// Spot id
    pub spot: String,
}

impl Session {
    /// Places still bookable
    pub fn remaining_places(&self) -> u32 {
        self.places_max.saturating_sub(self.places_reserved)
    }

    pub fn is_archived(&self) -> bool {
        self.status == SessionStatus::Archived
    }
}

/// Builder for creating session records
pub struct SessionBuilder {
    id: String,
    date: NaiveDate,
    start_time: String,
    end_time: String,
    places_max: u32,
    formula: Formula,
    status: SessionStatus,
    activity: String,
    spot: String,
}

impl SessionBuilder {
    /// Create a new session builder
    pub fn new(
        id: impl Into<String>,
        date: NaiveDate,
        activity: impl Into<String>,
        spot: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            start_time: "09:00".to_string(),
            end_time: "12:00".to_string(),
            places_max: 8,
            formula: Formula::HalfDay,
            status: SessionStatus::Active,
            activity: activity.into(),
            spot: spot.into(),
        }
    }

    /// Set start and end time
    pub fn hours(mut self, start: &str, end: &str) -> Self {
        self.start_time = start.to_string();
        self.end_time = end.to_string();
        self
    }

    /// Set capacity
    pub fn places_max(mut self, places_max: u32) -> Self {
        self.places_max = places_max;
        self
    }

    pub fn formula(mut self, formula: Formula) -> Self {
        self.formula = formula;
        self
    }

    pub fn status(mut self, status: SessionStatus) -> Self {
        self.status = status;
        self
    }

    /// Build the session
    pub fn build(self) -> Session {
        Session {
            id: self.id,
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            places_max: self.places_max,
            places_reserved: 0,
            formula: self.formula,
            status: self.status,
            activity: self.activity,
            spot: self.spot,
        }
    }
}
