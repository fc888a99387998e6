//! Free-text search
//!
//! Matching runs over an explicit list of searchable fields rather than
//! every string reachable in a record. Bump `SEARCH_FIELDS_VERSION`
//! whenever `searchable_fields` changes.

use crate::models::SessionWithDetails;

pub const SEARCH_FIELDS_VERSION: u32 = 2;

/// Every text a session can be found by
pub fn searchable_fields(item: &SessionWithDetails) -> Vec<String> {
    let session = &item.session;
    let mut fields = vec![
        session.status.as_str().to_string(),
        session.date.format("%Y-%m-%d").to_string(),
        session.start_time.clone(),
        session.end_time.clone(),
        session.formula.as_str().to_string(),
    ];

    if let Some(activity) = &item.activity {
        fields.push(activity.name.clone());
        fields.push(activity.description.clone());
        fields.push(activity.duration.clone());
        fields.push(activity.required_equipment.clone());
        fields.extend(activity.pricing.iter().map(|row| row.category.clone()));
    }

    if let Some(spot) = &item.spot {
        fields.push(spot.name.clone());
        fields.push(spot.description.clone());
        fields.extend(spot.gps_coordinates.clone());
        fields.extend(spot.meeting_point.clone());
    }

    for booking in &item.customer_sessions {
        fields.push(booking.first_names.clone());
        fields.push(booking.last_name.clone());
        fields.push(booking.email.clone());
        fields.push(booking.phone.clone());
        fields.push(booking.status.as_str().to_string());
        for person in &booking.people_list {
            fields.push(person.first_name.clone());
            fields.push(person.last_name.clone());
        }
    }

    fields
}

/// Case-insensitive substring match; an empty term matches everything
pub fn matches(item: &SessionWithDetails, term: &str) -> bool {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return true;
    }
    searchable_fields(item)
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}
