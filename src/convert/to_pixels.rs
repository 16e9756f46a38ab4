use crate::convert::model::{
    DaylioDayEntry, MOOD_MAX, MOOD_MIN, PIXELS_MOOD_TYPE, PixelsDay, PixelsEntry, invert_polarity,
};
use crate::error::ConvertError;
use chrono::NaiveDate;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct PixelsConversion {
    pub days: Vec<PixelsDay>,
    pub source_entries: usize,
    pub merged_days: Vec<MergedDay>,
    pub clamped_days: Vec<String>,
}

/// A calendar day that folded more than one Daylio entry into one pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedDay {
    pub date: String,
    pub entries: usize,
}

#[derive(Debug)]
struct DayAccumulator<'a> {
    date: NaiveDate,
    // Wide enough that any number of i64 moods cannot overflow.
    mood_sum: i128,
    notes: Vec<&'a str>,
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Calendar date of a Daylio entry; `month` is zero-based.
pub fn entry_date(index: usize, entry: &DaylioDayEntry) -> Result<NaiveDate, ConvertError> {
    entry
        .month
        .checked_add(1)
        .and_then(|month| NaiveDate::from_ymd_opt(entry.year, month, entry.day))
        .ok_or_else(|| {
            ConvertError::Validation(format!(
                "day entry #{index}: year={} month={} day={} is not a calendar date",
                entry.year, entry.month, entry.day
            ))
        })
}

/// Mean mood of a day, rounded half away from zero and clamped to the mood range.
/// Returns the clamped value and whether clamping changed it.
pub fn average_mood(mood_sum: i128, count: usize) -> (i64, bool) {
    let mean = mood_sum as f64 / count.max(1) as f64;
    let rounded = mean.round();
    let clamped = rounded.clamp(MOOD_MIN as f64, MOOD_MAX as f64);
    (clamped as i64, clamped != rounded)
}

/// Fold Daylio entries into one pixel per calendar day, in first-occurrence
/// order. Fails before producing anything if an entry has an impossible date.
pub fn daylio_to_pixels(entries: &[DaylioDayEntry]) -> Result<PixelsConversion, ConvertError> {
    let mut slots: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    let mut groups: Vec<DayAccumulator<'_>> = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        let date = entry_date(index, entry)?;
        let idx = *slots.entry(date).or_insert_with(|| {
            groups.push(DayAccumulator {
                date,
                mood_sum: 0,
                notes: Vec::new(),
            });
            groups.len() - 1
        });
        let group = &mut groups[idx];
        group.mood_sum += i128::from(entry.mood);
        group.notes.push(entry.note.as_str());
    }

    let mut out = PixelsConversion {
        source_entries: entries.len(),
        ..PixelsConversion::default()
    };

    for group in groups {
        let date = format_date(group.date);
        let count = group.notes.len();
        let (avg_mood, clamped) = average_mood(group.mood_sum, count);
        if count > 1 {
            out.merged_days.push(MergedDay {
                date: date.clone(),
                entries: count,
            });
        }
        if clamped {
            out.clamped_days.push(date.clone());
        }

        out.days.push(PixelsDay {
            date,
            entries: vec![PixelsEntry {
                kind: PIXELS_MOOD_TYPE.to_string(),
                value: invert_polarity(avg_mood),
                notes: group.notes.join("\n"),
                is_highlighted: false,
                tags: Vec::new(),
            }],
        });
    }

    Ok(out)
}
