use std::sync::LazyLock;

use regex::Regex;

use crate::model::RosterEntry;

static ROSTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)Aluno:\s*(?P<aluno>.*?)\s*Matr[ií]cula:\s*(?P<matricula>\S+)\s*M[eé]dia:\s*(?P<media>\S+)",
    )
    .unwrap()
});

/// Roster summaries: one `Aluno: … Matrícula: … Média: …` entry per line.
pub fn extract<'a, I>(lines: I) -> Vec<RosterEntry>
where
    I: IntoIterator<Item = &'a str>,
{
    lines
        .into_iter()
        .filter_map(|line| {
            let caps = ROSTER_RE.captures(line)?;
            Some(RosterEntry {
                student: caps["aluno"].trim().to_string(),
                identifier: caps["matricula"].trim().to_string(),
                average: caps["media"].trim().to_string(),
            })
        })
        .collect()
}
