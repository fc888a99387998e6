//! Customer booking types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Status of one customer's booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomerStatus {
    Waiting,
    Validated,
    Canceled,
}

impl CustomerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerStatus::Waiting => "Waiting",
            CustomerStatus::Validated => "Validated",
            CustomerStatus::Canceled => "Canceled",
        }
    }
}

impl FromStr for CustomerStatus {
    type Err = String;

    /// Stored statuses are not always capitalized
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "waiting" => Ok(CustomerStatus::Waiting),
            "validated" => Ok(CustomerStatus::Validated),
            "canceled" | "cancelled" => Ok(CustomerStatus::Canceled),
            _ => Err(format!("unknown customer status: {}", s)),
        }
    }
}

impl fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A person taking part in a booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub age: Option<u32>,
}

/// One customer's booking against a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSession {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub first_names: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub people_list: Vec<Participant>,
    pub status: CustomerStatus,
    pub price_applicable: f64,
    pub price_total: f64,
}

impl CustomerSession {
    pub fn is_canceled(&self) -> bool {
        self.status == CustomerStatus::Canceled
    }

    pub fn is_waiting(&self) -> bool {
        self.status == CustomerStatus::Waiting
    }

    /// Number of places this booking occupies
    pub fn headcount(&self) -> u32 {
        self.people_list.len() as u32
    }
}
