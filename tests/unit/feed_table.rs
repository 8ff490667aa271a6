//! Unit tests for the feed ratio tables.

use els_sync::error::{Error, FeedError};
use els_sync::feed::{FeedMode, FeedRatioTable, FeedSelection};

const REFERENCE_STEPS_PER_INCH: u32 = 25_600;

/// Test that inch rows divide the leadscrew resolution by the TPI.
#[test]
fn test_inch_rows_follow_tpi() {
    let table = FeedRatioTable::new(REFERENCE_STEPS_PER_INCH).unwrap();

    for entry in table.rows(FeedMode::Inch) {
        let Some(pitch) = entry.pitch else { continue };
        // Fractional TPI labels carry a vulgar fraction
        let Ok(tpi) = pitch.parse::<u32>() else { continue };
        let expected = (REFERENCE_STEPS_PER_INCH as f64 / tpi as f64).round() as u32;
        assert_eq!(entry.steps_per_revolution, expected, "{} TPI", tpi);
    }
}

/// Test that coarser pitches never take fewer steps.
#[test]
fn test_metric_rows_ascend() {
    let table = FeedRatioTable::new(REFERENCE_STEPS_PER_INCH).unwrap();
    let steps: Vec<u32> = table
        .rows(FeedMode::Metric)
        .map(|e| e.steps_per_revolution)
        .collect();

    assert!(steps.windows(2).all(|w| w[0] <= w[1]));
}

/// Test that the table scales with the leadscrew.
#[test]
fn test_resolution_scales_rows() {
    let fine = FeedRatioTable::new(REFERENCE_STEPS_PER_INCH * 2).unwrap();
    let entry = fine.select(FeedSelection::new(FeedMode::Inch, 51)).unwrap();

    assert_eq!(fine.steps_per_inch(), 51_200);
    assert_eq!(entry.pitch, Some("20"));
    assert_eq!(entry.steps_per_revolution, 2_560);
}

/// Test every mode has a rate label on every row.
#[test]
fn test_every_row_labelled() {
    let table = FeedRatioTable::new(REFERENCE_STEPS_PER_INCH).unwrap();

    for mode in FeedMode::ALL {
        assert_eq!(table.rows(mode).count(), table.len(mode));
        assert!(table.rows(mode).all(|e| !e.rate.is_empty() && e.steps_per_revolution > 0));
    }
    assert_eq!(FeedMode::Diametral.rate_unit(), "in");
    assert_eq!(FeedMode::Module.rate_unit(), "mm");
}

/// Test that a coarse leadscrew is rejected at construction.
#[test]
fn test_coarse_leadscrew() {
    assert!(matches!(
        FeedRatioTable::new(100),
        Err(Error::Feed(FeedError::ZeroSteps { .. }))
    ));
}

/// Test lookups past the end of each mode.
#[test]
fn test_out_of_range_lookup() {
    let table = FeedRatioTable::new(REFERENCE_STEPS_PER_INCH).unwrap();

    for mode in FeedMode::ALL {
        let rows = table.len(mode);
        assert!(table.get(mode, rows - 1).is_ok());
        assert_eq!(
            table.get(mode, rows),
            Err(Error::Feed(FeedError::RowOutOfRange { mode, index: rows, rows }))
        );
    }
}
