use crate::convert::config::DatetimeUnit;
use crate::convert::model::{DaylioDayEntry, MOOD_MAX, MOOD_MIN, PixelsDay, invert_polarity};
use crate::error::ConvertError;
use chrono::{Datelike, NaiveDate, TimeZone};
use chrono_tz::Tz;

/// Pixels carries no time of day; every converted entry lands at 20:00.
pub const DEFAULT_HOUR: u32 = 20;
pub const DEFAULT_MINUTE: u32 = 0;
pub const UNKNOWN_TIME_ZONE_OFFSET: i64 = -1;

const PIXELS_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy)]
pub struct DaylioEntryOptions {
    pub timezone: Tz,
    pub datetime_unit: DatetimeUnit,
}

impl Default for DaylioEntryOptions {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::UTC,
            datetime_unit: DatetimeUnit::Millis,
        }
    }
}

fn midnight_epoch_millis(date: NaiveDate, tz: Tz) -> i64 {
    let naive = date.and_time(chrono::NaiveTime::MIN);
    match tz.from_local_datetime(&naive).earliest() {
        Some(local) => local.timestamp_millis(),
        None => naive.and_utc().timestamp_millis(),
    }
}

pub fn pixel_to_entry(
    index: usize,
    pixel: &PixelsDay,
    opts: &DaylioEntryOptions,
) -> Result<DaylioDayEntry, ConvertError> {
    let date = NaiveDate::parse_from_str(pixel.date.trim(), PIXELS_DATE_FORMAT).map_err(|e| {
        ConvertError::Validation(format!(
            "entry #{index}: date `{}` is not YYYY-MM-DD: {e}",
            pixel.date
        ))
    })?;
    let first = pixel.entries.first().ok_or_else(|| {
        ConvertError::Validation(format!("entry #{index} ({}): `entries` is empty", pixel.date))
    })?;
    if !(MOOD_MIN..=MOOD_MAX).contains(&first.value) {
        return Err(ConvertError::Validation(format!(
            "entry #{index} ({}): value {} is outside {MOOD_MIN}..={MOOD_MAX}",
            pixel.date, first.value
        )));
    }

    Ok(DaylioDayEntry {
        year: date.year(),
        month: date.month0(),
        day: date.day(),
        hour: DEFAULT_HOUR,
        minute: DEFAULT_MINUTE,
        datetime: opts
            .datetime_unit
            .scale_millis(midnight_epoch_millis(date, opts.timezone)),
        time_zone_offset: UNKNOWN_TIME_ZONE_OFFSET,
        note_title: String::new(),
        note: first.notes.clone(),
        mood: invert_polarity(first.value),
        assets: Vec::new(),
        tags: Vec::new(),
    })
}

/// Expand every pixel into one Daylio entry, preserving input order.
/// Fails on the first pixel that cannot be converted.
pub fn pixels_to_daylio(
    pixels: &[PixelsDay],
    opts: &DaylioEntryOptions,
) -> Result<Vec<DaylioDayEntry>, ConvertError> {
    pixels
        .iter()
        .enumerate()
        .map(|(index, pixel)| pixel_to_entry(index, pixel, opts))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::model::PixelsEntry;
    use crate::convert::to_pixels::daylio_to_pixels;
    use crate::error::ErrorKind;

    fn pixel(date: &str, value: i64, notes: &str) -> PixelsDay {
        PixelsDay {
            date: date.to_string(),
            entries: vec![PixelsEntry {
                kind: "Mood".to_string(),
                value,
                notes: notes.to_string(),
                is_highlighted: true,
                tags: Vec::new(),
            }],
        }
    }

    #[test]
    fn fields_are_derived_from_the_date() {
        let entry =
            pixel_to_entry(0, &pixel("2023-01-05", 4, "walk"), &DaylioEntryOptions::default())
                .expect("convert");
        assert_eq!((entry.year, entry.month, entry.day), (2023, 0, 5));
        assert_eq!((entry.hour, entry.minute), (20, 0));
        assert_eq!(entry.time_zone_offset, -1);
        assert_eq!(entry.datetime, 1_672_876_800_000);
        assert_eq!(entry.note, "walk");
        assert_eq!(entry.note_title, "");
        assert_eq!(entry.mood, 2);
    }

    #[test]
    fn day_is_day_of_month_not_weekday() {
        // 2024-02-29 is a Thursday.
        let entry =
            pixel_to_entry(0, &pixel("2024-02-29", 3, ""), &DaylioEntryOptions::default())
                .expect("convert");
        assert_eq!((entry.month, entry.day), (1, 29));
    }

    #[test]
    fn datetime_follows_configured_zone_and_unit() {
        let opts = DaylioEntryOptions {
            timezone: chrono_tz::America::New_York,
            datetime_unit: DatetimeUnit::Seconds,
        };
        let entry = pixel_to_entry(0, &pixel("2023-01-05", 3, ""), &opts).expect("convert");
        // Local midnight in New York is 05:00 UTC in January.
        assert_eq!(entry.datetime, 1_672_876_800 + 5 * 3600);
    }

    #[test]
    fn midnight_skipped_by_dst_falls_back_to_utc_midnight() {
        // Sao Paulo jumped from 00:00 to 01:00 on 2018-11-04.
        let opts = DaylioEntryOptions {
            timezone: chrono_tz::America::Sao_Paulo,
            datetime_unit: DatetimeUnit::Millis,
        };
        let entry = pixel_to_entry(0, &pixel("2018-11-04", 3, ""), &opts).expect("convert");
        assert_eq!(entry.datetime, 1_541_289_600_000);
        assert_eq!((entry.year, entry.month, entry.day), (2018, 10, 4));

        // The day before has a real local midnight at 03:00 UTC.
        let entry = pixel_to_entry(0, &pixel("2018-11-03", 3, ""), &opts).expect("convert");
        assert_eq!(entry.datetime, 1_541_289_600_000 - 86_400_000 + 3 * 3_600_000);
    }

    #[test]
    fn unparseable_date_is_a_validation_error() {
        let err = pixel_to_entry(3, &pixel("05/01/2023", 3, ""), &DaylioEntryOptions::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("entry #3"));
    }

    #[test]
    fn empty_entries_is_a_validation_error() {
        let empty = PixelsDay {
            date: "2023-01-05".to_string(),
            entries: Vec::new(),
        };
        let err = pixel_to_entry(0, &empty, &DaylioEntryOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn out_of_range_value_is_rejected() {
        let err = pixel_to_entry(0, &pixel("2023-01-05", 0, ""), &DaylioEntryOptions::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn output_order_matches_input_order() {
        let out = pixels_to_daylio(
            &[pixel("2023-03-01", 5, ""), pixel("2023-01-01", 1, "")],
            &DaylioEntryOptions::default(),
        )
        .expect("convert");
        assert_eq!(out[0].month, 2);
        assert_eq!(out[1].month, 0);
        assert_eq!((out[0].mood, out[1].mood), (1, 5));
    }

    #[test]
    fn single_entry_days_survive_a_round_trip() {
        let pixels: Vec<PixelsDay> = (1..=5)
            .map(|value| pixel(&format!("2023-01-0{value}"), value, "n"))
            .collect();
        let entries = pixels_to_daylio(&pixels, &DaylioEntryOptions::default()).expect("convert");
        let back = daylio_to_pixels(&entries).expect("convert back");
        for (original, converted) in pixels.iter().zip(back.days.iter()) {
            assert_eq!(original.date, converted.date);
            assert_eq!(original.entries[0].value, converted.entries[0].value);
            assert_eq!(original.entries[0].notes, converted.entries[0].notes);
        }
    }
}
