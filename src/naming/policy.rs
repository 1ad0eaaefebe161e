//! Header and file naming policy.
//!
//! Pure string transforms turning raw DGM labels and AOI names into the
//! canonical column names and file names of the compiled tables.

use crate::utils::config::{
    AOI_PLACEHOLDER, COMBINED_FILE_NAME, OUTPUT_FILE_PREFIX, OUTPUT_FILE_SUFFIX,
};

/// Replace every whitespace character with an underscore
pub fn normalize(label: &str) -> String {
    label
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

/// Strip `.` characters, then [`normalize`]
///
/// `"St.Dev. of fixation durations (s)"` becomes `"StDev_of_fixation_durations_(s)"`.
pub fn normalize_metric_label(label: &str) -> String {
    normalize(&label.replace('.', ""))
}

/// File-safe form of an AOI name, case preserved
pub fn file_token(aoi_name: &str) -> String {
    normalize(aoi_name.trim())
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect()
}

/// Header token of an AOI name: file-safe and lower-cased
pub fn aoi_token(aoi_name: &str) -> String {
    file_token(aoi_name).to_lowercase()
}

/// Replace the first `_`-delimited `aoi` segment of a header with `token`
///
/// Headers without such a segment come back unchanged.
pub fn substitute_aoi_token(header: &str, token: &str) -> String {
    let mut substituted = false;
    header
        .split('_')
        .map(|segment| {
            if !substituted && segment == AOI_PLACEHOLDER {
                substituted = true;
                token
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("_")
}

/// Generic column name for a DGM metric label
pub fn metric_header(label: &str) -> String {
    format!("{}_{}", AOI_PLACEHOLDER, normalize_metric_label(label))
}

/// The four generic column names of the transitions towards `to_aoi`
pub fn transition_headers(to_aoi: &str) -> [String; 4] {
    let base = normalize(&format!("{}_to_{}", AOI_PLACEHOLDER, aoi_token(to_aoi)));
    [
        base.clone(),
        format!("{base}_transitions_count"),
        format!("{base}_proportion_including_self_transitions"),
        format!("{base}_proportion_excluding_self_transitions"),
    ]
}

/// Output file name of the table for one AOI
pub fn per_aoi_file_name(aoi_name: &str) -> String {
    format!(
        "{}{}{}",
        OUTPUT_FILE_PREFIX,
        file_token(aoi_name),
        OUTPUT_FILE_SUFFIX
    )
}

/// Output file name of the combined table
pub fn combined_file_name() -> &'static str {
    COMBINED_FILE_NAME
}
