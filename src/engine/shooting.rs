use crate::domain::{ShotCategory, StatEntry};
use serde::Serialize;

/// Whole-number make percentage, halves rounded up. Zero attempts gives 0.
pub fn calculate_percentage(makes: u32, attempts: u32) -> u32 {
    if attempts == 0 {
        return 0;
    }
    let makes = u64::from(makes);
    let attempts = u64::from(attempts);
    // round(100 * m / a) == floor((200 * m + a) / (2 * a))
    ((200 * makes + attempts) / (2 * attempts)) as u32
}

/// Pooled makes/attempts for one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShotTotals {
    pub makes: u32,
    pub attempts: u32,
    pub percentage: u32,
}

impl ShotTotals {
    pub fn new(makes: u32, attempts: u32) -> Self {
        Self {
            makes,
            attempts,
            percentage: calculate_percentage(makes, attempts),
        }
    }
}

pub fn shot_totals<'a, I>(entries: I, category: ShotCategory) -> ShotTotals
where
    I: IntoIterator<Item = &'a StatEntry>,
{
    let (makes, attempts) = entries.into_iter().fold((0u32, 0u32), |(m, a), entry| {
        let line = entry.shots(category);
        (m.saturating_add(line.makes), a.saturating_add(line.attempts))
    });
    ShotTotals::new(makes, attempts)
}
