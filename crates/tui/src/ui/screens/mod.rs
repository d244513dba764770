pub mod expenses;
pub mod recurring;

use engine::SortDirection;

/// Column header with the sort arrow when it is the active column.
pub(crate) fn header_label(label: &str, direction: Option<SortDirection>) -> String {
    match direction {
        Some(direction) => format!("{label} {}", direction.arrow()),
        None => label.to_string(),
    }
}
