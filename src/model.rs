use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::ScheduleError;

/// Number of days in the circular week.
pub const DAYS_PER_WEEK: u8 = 7;

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Weekday index, Sunday = 0 … Saturday = 6. Saturday adjoins Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Day(u8);

impl Day {
    pub const SUNDAY: Day = Day(0);
    pub const MONDAY: Day = Day(1);
    pub const TUESDAY: Day = Day(2);
    pub const WEDNESDAY: Day = Day(3);
    pub const THURSDAY: Day = Day(4);
    pub const FRIDAY: Day = Day(5);
    pub const SATURDAY: Day = Day(6);

    pub fn new(index: u8) -> Result<Self, ScheduleError> {
        if index < DAYS_PER_WEEK {
            Ok(Day(index))
        } else {
            Err(ScheduleError::InvalidDay(index))
        }
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// Circular successor: Saturday → Sunday.
    pub fn succ(self) -> Day {
        Day((self.0 + 1) % DAYS_PER_WEEK)
    }

    /// Circular predecessor: Sunday → Saturday.
    pub fn pred(self) -> Day {
        Day((self.0 + DAYS_PER_WEEK - 1) % DAYS_PER_WEEK)
    }

    /// Walk `steps` days forward, wrapping around the week.
    pub fn forward(self, steps: u8) -> Day {
        Day(((self.0 as u16 + steps as u16) % DAYS_PER_WEEK as u16) as u8)
    }

    /// Forward circular distance from `self` to `other` (0..=6).
    pub fn distance_to(self, other: Day) -> u8 {
        (other.0 + DAYS_PER_WEEK - self.0) % DAYS_PER_WEEK
    }

    pub fn name(self) -> &'static str {
        DAY_NAMES[self.0 as usize]
    }

    pub fn short_name(self) -> &'static str {
        &DAY_NAMES[self.0 as usize][..3]
    }

    pub fn all() -> impl Iterator<Item = Day> {
        (0..DAYS_PER_WEEK).map(Day)
    }
}

impl TryFrom<u8> for Day {
    type Error = ScheduleError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Day::new(index)
    }
}

impl From<Day> for u8 {
    fn from(day: Day) -> u8 {
        day.0
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of unique weekdays, stored as a 7-bit mask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Selection {
    mask: u8,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a caller-supplied day list. Duplicates collapse.
    pub fn from_days<I: IntoIterator<Item = Day>>(days: I) -> Self {
        let mut sel = Self::new();
        for day in days {
            sel.insert(day);
        }
        sel
    }

    /// Build from raw indices (e.g. URL parameters), rejecting anything outside 0..=6.
    pub fn from_indices(indices: &[u8]) -> Result<Self, ScheduleError> {
        let days = indices
            .iter()
            .map(|&i| Day::new(i))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_days(days))
    }

    pub fn full_week() -> Self {
        Self { mask: 0b0111_1111 }
    }

    pub fn contains(&self, day: Day) -> bool {
        self.mask & (1 << day.0) != 0
    }

    pub fn len(&self) -> usize {
        self.mask.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.mask == 0
    }

    pub fn insert(&mut self, day: Day) -> bool {
        let was = self.contains(day);
        self.mask |= 1 << day.0;
        !was
    }

    pub fn remove(&mut self, day: Day) -> bool {
        let was = self.contains(day);
        self.mask &= !(1 << day.0);
        was
    }

    /// Click semantics: flip membership of one day, leaving the rest untouched.
    /// Returns true if the day is now selected.
    pub fn toggle(&mut self, day: Day) -> bool {
        self.mask ^= 1 << day.0;
        self.contains(day)
    }

    /// Drag semantics: discard the current contents and select the forward arc
    /// from `anchor` to `hovered` inclusive, wrapping past Saturday.
    pub fn replace_with_arc(&mut self, anchor: Day, hovered: Day) {
        let len = anchor.distance_to(hovered) + 1;
        self.mask = 0;
        for step in 0..len {
            self.insert(anchor.forward(step));
        }
    }

    pub fn clear(&mut self) {
        self.mask = 0;
    }

    /// Days not in the selection.
    pub fn complement(&self) -> Selection {
        Selection {
            mask: !self.mask & Self::full_week().mask,
        }
    }

    /// Ascending by index.
    pub fn iter(&self) -> impl Iterator<Item = Day> + '_ {
        Day::all().filter(|d| self.contains(*d))
    }

    /// `max(len - 1, 0)`.
    pub fn night_count(&self) -> usize {
        self.len().saturating_sub(1)
    }

    /// Snapshot of the selected days. A single arc is listed from its check-in
    /// day forward (`{5,6,0,1}` → `[5,6,0,1]`); anything else is ascending.
    pub fn days(&self) -> Vec<Day> {
        match self.check_in() {
            Some(start) => (0..self.len() as u8).map(|s| start.forward(s)).collect(),
            None => self.iter().collect(),
        }
    }

    /// First day of the arc. `None` for an empty or non-contiguous selection.
    /// A full week starts on Sunday.
    pub fn check_in(&self) -> Option<Day> {
        if self.is_empty() || !crate::engine::is_contiguous(self) {
            return None;
        }
        if self.len() == DAYS_PER_WEEK as usize {
            return Some(Day::SUNDAY);
        }
        self.iter().find(|d| !self.contains(d.pred()))
    }

    /// Last selected day of the arc.
    pub fn check_out(&self) -> Option<Day> {
        self.check_in()
            .map(|start| start.forward(self.len() as u8 - 1))
    }

    /// Short human label, e.g. `"Fri - Mon (3 nights)"`.
    pub fn summary(&self) -> String {
        match (self.check_in(), self.check_out()) {
            _ if self.is_empty() => "Any schedule".to_string(),
            (Some(a), Some(b)) if a == b => format!("{} (0 nights)", a.short_name()),
            (Some(a), Some(b)) => format!(
                "{} - {} ({} {})",
                a.short_name(),
                b.short_name(),
                self.night_count(),
                plural(self.night_count(), "night")
            ),
            _ => {
                let names: Vec<&str> = self.iter().map(|d| d.short_name()).collect();
                names.join(", ")
            }
        }
    }
}

pub(crate) fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

// ── Validation ───────────────────────────────────────────────────

/// Why a selection was rejected. All kinds are user-correctable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    TooFewNights,
    TooManyNights,
    NotContiguous,
}

impl ErrorKind {
    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::TooFewNights => "too_few_nights",
            ErrorKind::TooManyNights => "too_many_nights",
            ErrorKind::NotContiguous => "not_contiguous",
        }
    }
}

/// Outcome of validating a selection. Invalid is a normal value, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationResult {
    Valid,
    Invalid { kind: ErrorKind, message: String },
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid { kind, .. } => Some(*kind),
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid { message, .. } => Some(message),
        }
    }
}

// ── Pricing ──────────────────────────────────────────────────────

/// Stored per-night rates for one listing. Tier rates are already per-night.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NightPriceTable {
    pub price2: Option<f64>,
    pub price3: Option<f64>,
    pub price4: Option<f64>,
    pub price5: Option<f64>,
    pub price6: Option<f64>,
    pub price7: Option<f64>,
    pub weekly: Option<f64>,
    pub standardized_minimum_nightly_price: Option<f64>,
}

impl NightPriceTable {
    /// Explicit tier rate for a night count, if one is stored.
    pub fn tier(&self, nights: usize) -> Option<f64> {
        match nights {
            2 => self.price2,
            3 => self.price3,
            4 => self.price4,
            5 => self.price5,
            6 => self.price6,
            7 => self.price7,
            _ => None,
        }
    }

    pub fn tiers(&self) -> BTreeMap<usize, f64> {
        (2..=7)
            .filter_map(|n| self.tier(n).map(|rate| (n, rate)))
            .collect()
    }
}

/// A visible listing as handed over by the listing-retrieval layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub rates: NightPriceTable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingPrice {
    pub listing: String,
    pub nightly: f64,
}

// ── Controller output ────────────────────────────────────────────

/// Everything a controller pushes outward, in emission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ControllerEvent {
    SelectionChange { days: Vec<Day> },
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(indices: &[u8]) -> Selection {
        Selection::from_indices(indices).unwrap()
    }

    #[test]
    fn day_bounds() {
        assert!(Day::new(6).is_ok());
        assert!(matches!(Day::new(7), Err(ScheduleError::InvalidDay(7))));
    }

    #[test]
    fn day_wraps() {
        assert_eq!(Day::SATURDAY.succ(), Day::SUNDAY);
        assert_eq!(Day::SUNDAY.pred(), Day::SATURDAY);
        assert_eq!(Day::FRIDAY.forward(3), Day::MONDAY);
        assert_eq!(Day::FRIDAY.distance_to(Day::MONDAY), 3);
        assert_eq!(Day::MONDAY.distance_to(Day::FRIDAY), 4);
        assert_eq!(Day::WEDNESDAY.distance_to(Day::WEDNESDAY), 0);
    }

    #[test]
    fn day_names() {
        assert_eq!(Day::THURSDAY.name(), "Thursday");
        assert_eq!(Day::THURSDAY.short_name(), "Thu");
    }

    #[test]
    fn day_deserialize_rejects_out_of_range() {
        let ok: Vec<Day> = serde_json::from_str("[5,6,0]").unwrap();
        assert_eq!(ok, vec![Day::FRIDAY, Day::SATURDAY, Day::SUNDAY]);
        assert!(serde_json::from_str::<Vec<Day>>("[1,9]").is_err());
    }

    #[test]
    fn from_days_collapses_duplicates() {
        let s = Selection::from_days([Day::MONDAY, Day::MONDAY, Day::TUESDAY]);
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn from_indices_rejects_bad_index() {
        assert!(Selection::from_indices(&[1, 2, 8]).is_err());
    }

    #[test]
    fn toggle_flips_only_one_member() {
        let mut s = sel(&[1, 2]);
        assert!(s.toggle(Day::WEDNESDAY));
        assert_eq!(s, sel(&[1, 2, 3]));
        assert!(!s.toggle(Day::MONDAY));
        assert_eq!(s, sel(&[2, 3]));
    }

    #[test]
    fn replace_with_arc_wraps_forward() {
        let mut s = sel(&[3]);
        s.replace_with_arc(Day::FRIDAY, Day::MONDAY);
        assert_eq!(s, sel(&[5, 6, 0, 1]));
    }

    #[test]
    fn replace_with_arc_discards_previous() {
        let mut s = sel(&[0, 1, 2, 3, 4]);
        s.replace_with_arc(Day::TUESDAY, Day::WEDNESDAY);
        assert_eq!(s, sel(&[2, 3]));
    }

    #[test]
    fn replace_with_arc_same_day_is_single() {
        let mut s = Selection::new();
        s.replace_with_arc(Day::TUESDAY, Day::TUESDAY);
        assert_eq!(s, sel(&[2]));
    }

    #[test]
    fn night_count_saturates() {
        assert_eq!(Selection::new().night_count(), 0);
        assert_eq!(sel(&[4]).night_count(), 0);
        assert_eq!(sel(&[1, 2, 3]).night_count(), 2);
    }

    #[test]
    fn days_follow_the_arc() {
        let d: Vec<u8> = sel(&[0, 1, 5, 6]).days().into_iter().map(u8::from).collect();
        assert_eq!(d, vec![5, 6, 0, 1]);
        let d: Vec<u8> = sel(&[0, 3]).days().into_iter().map(u8::from).collect();
        assert_eq!(d, vec![0, 3]);
    }

    #[test]
    fn endpoints() {
        let s = sel(&[6, 0, 1]);
        assert_eq!(s.check_in(), Some(Day::SATURDAY));
        assert_eq!(s.check_out(), Some(Day::MONDAY));

        assert_eq!(sel(&[1, 4]).check_in(), None);
        assert_eq!(Selection::new().check_out(), None);
        assert_eq!(Selection::full_week().check_in(), Some(Day::SUNDAY));
        assert_eq!(Selection::full_week().check_out(), Some(Day::SATURDAY));
    }

    #[test]
    fn summaries() {
        assert_eq!(Selection::new().summary(), "Any schedule");
        assert_eq!(sel(&[5, 6, 0, 1]).summary(), "Fri - Mon (3 nights)");
        assert_eq!(sel(&[1, 2]).summary(), "Mon - Tue (1 night)");
        assert_eq!(sel(&[1, 3]).summary(), "Mon, Wed");
    }

    #[test]
    fn price_table_from_listing_json() {
        let json = r#"{"id":"a1","price3":120.0,"price7":95.5,"weekly":630.0}"#;
        let listing: Listing = serde_json::from_str(json).unwrap();
        assert_eq!(listing.rates.tier(3), Some(120.0));
        assert_eq!(listing.rates.tier(2), None);
        assert_eq!(listing.rates.tier(8), None);
        assert_eq!(listing.rates.tiers().len(), 2);
        assert_eq!(listing.rates.standardized_minimum_nightly_price, None);
    }

    #[test]
    fn controller_event_json_shape() {
        let ev = ControllerEvent::SelectionChange {
            days: vec![Day::FRIDAY, Day::SATURDAY],
        };
        assert_eq!(
            serde_json::to_string(&ev).unwrap(),
            r#"{"event":"selection_change","days":[5,6]}"#
        );
    }
}
