//! Session-local stores: availability slots, interview notes and bookings.
//!
//! Nothing here is written to the backend. All three live as long as the
//! dashboard session that owns them.

use std::collections::HashMap;

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dashboard::DashboardError;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 10;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AvailabilitySlot {
    pub id: String,
    pub day: String,
    pub start: String, // "HH:MM"
    pub end: String,   // "HH:MM"
}

impl AvailabilitySlot {
    pub fn label(&self) -> String {
        format!("{} {}–{}", self.day, self.start, self.end)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AvailabilityStore {
    slots: Vec<AvailabilitySlot>,
}

impl AvailabilityStore {
    pub fn new(slots: Vec<AvailabilitySlot>) -> Self {
        Self { slots }
    }

    pub fn slots(&self) -> &[AvailabilitySlot] {
        &self.slots
    }

    pub fn get(&self, slot_id: &str) -> Option<&AvailabilitySlot> {
        self.slots.iter().find(|s| s.id == slot_id)
    }

    /// Adds a slot after validating its times. Times are zero-padded `HH:MM`
    /// within one day, so string order is time order.
    pub fn add(&mut self, day: &str, start: &str, end: &str) -> Result<AvailabilitySlot, DashboardError> {
        let (start, end) = (start.trim(), end.trim());
        if start.is_empty() || end.is_empty() {
            return Err(DashboardError::MissingSlotTimes);
        }
        for time in [start, end] {
            if !is_clock_time(time) {
                return Err(DashboardError::InvalidSlotTime(time.to_string()));
            }
        }
        if end <= start {
            return Err(DashboardError::SlotEndNotAfterStart);
        }
        let day = day.trim();
        if day.is_empty() {
            return Err(DashboardError::MissingSlotDay);
        }

        let slot = AvailabilitySlot {
            id: new_slot_id(),
            day: day.to_string(),
            start: start.to_string(),
            end: end.to_string(),
        };
        self.slots.push(slot.clone());
        Ok(slot)
    }

    /// Removes a slot. A slot that any booking still points at cannot be removed.
    pub fn remove(
        &mut self,
        slot_id: &str,
        bookings: &BookingLedger,
    ) -> Result<AvailabilitySlot, DashboardError> {
        let index = self
            .slots
            .iter()
            .position(|s| s.id == slot_id)
            .ok_or_else(|| DashboardError::SlotNotFound(slot_id.to_string()))?;

        let booked = bookings.for_slot(slot_id).count();
        if booked > 0 {
            return Err(DashboardError::SlotHasBookings {
                slot_id: slot_id.to_string(),
                count: booked,
            });
        }

        Ok(self.slots.remove(index))
    }
}

fn is_clock_time(value: &str) -> bool {
    value.len() == 5 && NaiveTime::parse_from_str(value, "%H:%M").is_ok()
}

/// Locally unique only; collisions are possible but negligible at session scale.
fn new_slot_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("slot_{}", &hex[..12])
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Note {
    pub rating: u8,
    pub notes: String,
    pub saved_at: DateTime<Utc>,
}

/// One note per candidate; saving overwrites.
#[derive(Debug, Clone, Default)]
pub struct NoteBook {
    notes: HashMap<String, Note>,
}

impl NoteBook {
    pub fn get(&self, candidate_id: &str) -> Option<&Note> {
        self.notes.get(candidate_id)
    }

    pub fn save(
        &mut self,
        candidate_id: &str,
        rating: Option<i64>,
        notes: &str,
        now: DateTime<Utc>,
    ) -> Result<Note, DashboardError> {
        let notes = notes.trim();
        let rating = match rating {
            Some(r) if !notes.is_empty() => r,
            _ => return Err(DashboardError::IncompleteNote),
        };
        let rating = u8::try_from(rating)
            .ok()
            .filter(|r| (MIN_RATING..=MAX_RATING).contains(r))
            .ok_or(DashboardError::RatingOutOfRange(rating))?;

        let note = Note {
            rating,
            notes: notes.to_string(),
            saved_at: now,
        };
        self.notes.insert(candidate_id.to_string(), note.clone());
        Ok(note)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub candidate_id: String,
    pub job_id: String,
    pub slot_id: String,
    pub booked_at: DateTime<Utc>,
}

/// Another booking already holding the same slot. Advisory only: a slot is
/// not treated as exclusive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SlotConflict {
    pub slot_id: String,
    pub other_candidate_id: String,
    pub other_job_id: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingReceipt {
    pub booking: Booking,
    pub conflicts: Vec<SlotConflict>,
}

/// Append-only booking log.
#[derive(Debug, Clone, Default)]
pub struct BookingLedger {
    bookings: Vec<Booking>,
}

impl BookingLedger {
    #[cfg(test)]
    pub fn all(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn for_slot<'a>(&'a self, slot_id: &'a str) -> impl Iterator<Item = &'a Booking> + 'a {
        self.bookings.iter().filter(move |b| b.slot_id == slot_id)
    }

    pub fn find(&self, candidate_id: &str, job_id: &str) -> Option<&Booking> {
        self.bookings
            .iter()
            .find(|b| b.candidate_id == candidate_id && b.job_id == job_id)
    }

    /// Books `slot` for the (candidate, job) pair. The pair may be booked once;
    /// sharing a slot with other bookings is reported, not rejected.
    pub fn book(
        &mut self,
        candidate_id: &str,
        job_id: &str,
        slot: &AvailabilitySlot,
        now: DateTime<Utc>,
    ) -> Result<BookingReceipt, DashboardError> {
        if self.find(candidate_id, job_id).is_some() {
            return Err(DashboardError::AlreadyBooked {
                candidate_id: candidate_id.to_string(),
                job_id: job_id.to_string(),
            });
        }

        let conflicts = self
            .for_slot(&slot.id)
            .map(|other| SlotConflict {
                slot_id: slot.id.clone(),
                other_candidate_id: other.candidate_id.clone(),
                other_job_id: other.job_id.clone(),
                description: format!(
                    "{} is already booked with {} for {}.",
                    slot.label(),
                    other.candidate_id,
                    other.job_id
                ),
            })
            .collect();

        let booking = Booking {
            candidate_id: candidate_id.to_string(),
            job_id: job_id.to_string(),
            slot_id: slot.id.clone(),
            booked_at: now,
        };
        self.bookings.push(booking.clone());

        Ok(BookingReceipt { booking, conflicts })
    }
}
