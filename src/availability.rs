// src/availability.rs

use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};
use rand::seq::SliceRandom;
use rand::thread_rng;

use crate::models::{AvailabilitySlot, Provider};

// Bookable hours, inclusive (10:00 through 16:00)
const FIRST_SLOT_HOUR: u32 = 10;
const LAST_SLOT_HOUR: u32 = 16;

// Daily slot budget derived from experience
const BASE_SLOTS_PER_DAY: u32 = 5;
const MAX_EXPERIENCE_REDUCTION: u32 = 4;
const SATURDAY_REDUCTION: u32 = 2;

/// Synthesizes open availability slots for a provider over the coming days
/// and overwrites the provider's `available_slots` count with the total.
///
/// More experienced providers get fewer daily slots (they are busier), with
/// a floor of one. Sundays are skipped entirely and Saturdays run a reduced
/// schedule. Hour selection within a day is intentionally randomized so the
/// generated calendar looks organic rather than reproducible; the returned
/// list is still sorted by date and time.
pub fn generate_for_provider(provider: &mut Provider, days_ahead: i64) -> Vec<AvailabilitySlot> {
    let slots_per_day = slots_per_day(provider.experience);
    let today = Local::now().date_naive();

    let mut slots = Vec::new();
    for offset in 0..days_ahead {
        let date = today + Duration::days(offset);
        match date.weekday() {
            Weekday::Sun => continue,
            Weekday::Sat => {
                emit_day(&mut slots, date, slots_per_day.saturating_sub(SATURDAY_REDUCTION).max(1))
            }
            _ => emit_day(&mut slots, date, slots_per_day),
        }
    }

    slots.sort_by(|a, b| (a.date, a.time.as_str()).cmp(&(b.date, b.time.as_str())));
    provider.available_slots = slots.len() as u32;
    slots
}

fn slots_per_day(experience: u32) -> u32 {
    let reduction = (experience / 3).min(MAX_EXPERIENCE_REDUCTION);
    (BASE_SLOTS_PER_DAY - reduction).max(1)
}

fn emit_day(slots: &mut Vec<AvailabilitySlot>, date: NaiveDate, count: u32) {
    let mut hours: Vec<u32> = (FIRST_SLOT_HOUR..=LAST_SLOT_HOUR).collect();
    hours.shuffle(&mut thread_rng());

    for hour in hours.into_iter().take(count as usize) {
        slots.push(AvailabilitySlot {
            date,
            time: format!("{hour:02}:00"),
            available: true,
        });
    }
}
