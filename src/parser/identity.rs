use std::sync::LazyLock;

use regex::Regex;

use super::text::{title_case, LETTERS};
use crate::model::StudentIdentity;

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^(?P<id>[0-9]{{11}})(?P<name>[{LETTERS} ]+)$")).unwrap()
});

/// Find the identity header (`<11 digits><NAME>`) among the lines of the
/// first page. The first line that matches wins.
pub fn parse<'a, I>(lines: I) -> Option<StudentIdentity>
where
    I: IntoIterator<Item = &'a str>,
{
    lines.into_iter().find_map(parse_line)
}

fn parse_line(line: &str) -> Option<StudentIdentity> {
    let caps = HEADER_RE.captures(line.trim())?;
    let name = caps["name"].trim();
    if name.is_empty() {
        return None;
    }
    Some(StudentIdentity {
        identifier: caps["id"].to_string(),
        name: title_case(name),
    })
}
