//! Category Cleaner Module
//! Label normalization and low-frequency bucketing for categorical columns.

/// Minimum occurrences a category needs to stand on its own.
pub const MIN_CATEGORY_COUNT: f64 = 5.0;

/// Label for the merged low-frequency bucket.
pub const OTHERS_LABEL: &str = "Others";

/// Sentinel free-text value excluded from top-location counts.
pub const NONE_SENTINEL: &str = "none";

/// Trim and lowercase a free-text label before counting.
pub fn normalize_label(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Merge categories with fewer than `threshold` occurrences into a single
/// "Others" bucket. The bucket itself must also reach the threshold or it is
/// dropped. Input order of the surviving categories is preserved, with the
/// bucket appended last.
pub fn bucket_low_frequency(
    entries: Vec<(String, f64)>,
    threshold: f64,
) -> Vec<(String, f64)> {
    let mut kept = Vec::with_capacity(entries.len());
    let mut merged = 0.0;

    for (label, count) in entries {
        if count < threshold {
            merged += count;
        } else {
            kept.push((label, count));
        }
    }

    if merged >= threshold {
        kept.push((OTHERS_LABEL.to_string(), merged));
    }
    kept
}
