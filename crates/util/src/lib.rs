mod path_processing;
mod text_processing;

pub use path_processing::expand_tilde;
pub use text_processing::{normalize_integration_name, parse_name_list, redact_sensitive};
