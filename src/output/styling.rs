use console::{style, StyledObject};

/// Message shown while a fetch is in flight.
pub fn pending(what: &str) -> StyledObject<String> {
    style(format!("Fetching {what}")).bright().yellow()
}

/// Outcome of a fetch: red when nothing came back.
pub fn fetched(count: usize, noun: &str) -> StyledObject<String> {
    if count == 0 {
        style(format!("No {noun} found")).bright().red()
    } else {
        style(format!("Fetched {count} {noun} ✓")).bright().green()
    }
}

pub fn dim(text: impl std::fmt::Display) -> StyledObject<String> {
    style(text.to_string()).dim()
}

pub fn title(text: impl std::fmt::Display) -> StyledObject<String> {
    style(text.to_string()).magenta().bold()
}
