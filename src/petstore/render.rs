//! HTML fragment rendering
//!
//! Names are emitted verbatim, one `<name><br />` line each, joined with `\n`.

use super::{usable_names, PetRecord, PetStatus};

/// Line-break tag appended to every rendered name
const LINE_BREAK: &str = "<br />";

/// Render names as `<name><br />` lines, optionally preceded by a heading line
pub fn render<'a, I>(names: I, heading: Option<&str>) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut lines: Vec<String> = heading.map(str::to_string).into_iter().collect();
    lines.extend(names.into_iter().map(|name| format!("{name}{LINE_BREAK}")));
    lines.join("\n")
}

/// Render the named records under the heading for `status`
pub fn render_pets(records: &[PetRecord], status: PetStatus) -> String {
    render(usable_names(records), Some(status.heading()))
}
