//! Column and file naming.

pub mod policy;

pub use policy::{
    aoi_token, combined_file_name, file_token, metric_header, normalize, normalize_metric_label,
    per_aoi_file_name, substitute_aoi_token, transition_headers,
};
