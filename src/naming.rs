use chrono::{Datelike, NaiveDate};

/// Turn user input into a lower case token that is safe inside a file name.
/// Runs of whitespace and path separators become a single `-`.
pub fn sanitize(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_separator = false;
    for c in value.chars() {
        if c.is_whitespace() || c == '/' || c == '\\' {
            if !in_separator {
                out.push('-');
                in_separator = true;
            }
        } else {
            out.extend(c.to_lowercase());
            in_separator = false;
        }
    }
    out
}

/// `{id}-{full name}-{day}-{month}-{year}.pdf`, day and month without padding.
pub fn signed_file_name(id: &str, full_name: &str, date: NaiveDate) -> String {
    format!(
        "{}-{}-{}-{}-{}.pdf",
        sanitize(id),
        sanitize(full_name),
        date.day(),
        date.month(),
        date.year()
    )
}

/// A source document name must point directly into the document directory.
pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(|c| c == '/' || c == '\\' || c == '\0')
}
