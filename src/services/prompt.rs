use chrono::{Datelike, Timelike};
use rand::{seq::SliceRandom, Rng};
use std::fmt::{self, Display};

use crate::models::{EventContext, Perfume, WeatherSnapshot};

/// Notes listed per candidate; the rest are dropped to keep the prompt short
const MAX_LISTED_NOTES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Summer,
    Autumn,
    Winter,
    Spring,
}

impl Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Winter => "winter",
            Season::Spring => "spring",
        };
        f.write_str(label)
    }
}

/// Southern hemisphere seasons, indexed by month - 1
const SEASON_BY_MONTH: [Season; 12] = [
    Season::Summer,
    Season::Summer,
    Season::Autumn,
    Season::Autumn,
    Season::Autumn,
    Season::Winter,
    Season::Winter,
    Season::Winter,
    Season::Spring,
    Season::Spring,
    Season::Spring,
    Season::Summer,
];

/// Season for a calendar month (1-12). Out-of-range months wrap.
pub fn season_for_month(month: u32) -> Season {
    SEASON_BY_MONTH[(month.saturating_sub(1) % 12) as usize]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
}

impl Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Evening => "evening",
        };
        f.write_str(label)
    }
}

pub fn time_of_day(hour: u32) -> TimeOfDay {
    match hour {
        0..=11 => TimeOfDay::Morning,
        12..=18 => TimeOfDay::Afternoon,
        _ => TimeOfDay::Evening,
    }
}

/// One listing line: name and brand, then whichever optional details exist
pub fn format_candidate(perfume: &Perfume) -> String {
    let mut line = format!("- {} ({})", perfume.name, perfume.brand);

    if let Some(perfumer) = perfume.perfumer.as_deref().filter(|p| !p.trim().is_empty()) {
        line.push_str(&format!(", perfumer: {}", perfumer));
    }
    if !perfume.accords.is_empty() {
        line.push_str(&format!(", accords: {}", perfume.accords.join(", ")));
    }
    if !perfume.notes.is_empty() {
        let notes: Vec<&str> = perfume
            .notes
            .iter()
            .take(MAX_LISTED_NOTES)
            .map(String::as_str)
            .collect();
        line.push_str(&format!(", notes: {}", notes.join(", ")));
    }

    line
}

/// Builds the model prompt with candidates listed in random order.
///
/// Shuffling keeps the model from favouring whatever happens to be listed
/// first, so two calls with the same inputs usually differ in the listing.
pub fn build_prompt(
    candidates: &[Perfume],
    event: &EventContext,
    weather: &WeatherSnapshot,
) -> String {
    build_prompt_with_rng(candidates, event, weather, &mut rand::rng())
}

pub fn build_prompt_with_rng<R: Rng + ?Sized>(
    candidates: &[Perfume],
    event: &EventContext,
    weather: &WeatherSnapshot,
    rng: &mut R,
) -> String {
    let mut listing: Vec<String> = candidates.iter().map(format_candidate).collect();
    listing.shuffle(rng);

    let season = season_for_month(event.event_date.month());
    let time_of_day = time_of_day(event.event_time.hour());
    let venue_description = or_unspecified(&event.venue_description);

    format!(
        "You are an expert perfumer helping someone choose what to wear for an upcoming event.\n\
         \n\
         ## EVENT CONTEXT\n\
         - Date: {date} ({season})\n\
         - Time: {time} ({time_of_day})\n\
         - Venue: {venue} ({venue_kind}): {venue_description}\n\
         - Occasion: {occasion}\n\
         - Desired impression: {expectation}\n\
         - Attire: {attire}\n\
         - Weather: {weather_description}, {temperature:.1}°C, {humidity:.0}% humidity\n\
         \n\
         ## AVAILABLE PERFUMES\n\
         {listing}\n\
         \n\
         ## INSTRUCTIONS\n\
         Choose exactly ONE perfume from the list above that best suits this event. \
         Consider the season, the time of day, the weather, whether the venue is indoors \
         or outdoors, the occasion and the attire.\n\
         \n\
         RESPONSE FORMAT:\n\
         - The first line must contain ONLY the exact name of the chosen perfume, \
         written exactly as it appears in the list, with no other text or formatting.\n\
         - Then explain your choice in 3 to 4 lines.\n",
        date = event.event_date.format("%Y-%m-%d"),
        season = season,
        time = event.event_time.format("%H:%M"),
        time_of_day = time_of_day,
        venue = event.venue_name,
        venue_kind = event.venue_kind,
        venue_description = venue_description,
        occasion = event.occasion,
        expectation = or_unspecified(&event.expectation),
        attire = or_unspecified(&event.attire),
        weather_description = weather.description,
        temperature = weather.temperature_c,
        humidity = weather.humidity_pct,
        listing = listing.join("\n"),
    )
}

fn or_unspecified(value: &str) -> &str {
    if value.trim().is_empty() {
        "not specified"
    } else {
        value
    }
}
