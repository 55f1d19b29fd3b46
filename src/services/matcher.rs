/// Maps a free-text model reply back to one of the candidates it was offered.
///
/// Replies are not guaranteed to follow the requested format, so matching
/// runs an ordered list of increasingly lenient rules and keeps the first hit.
/// Within a rule, candidates are tried in the order given.
use std::fmt::{self, Display};

use crate::models::Perfume;

/// Characters stripped from the first line before comparing
const STRIPPED_MARKS: [char; 4] = ['*', '#', '-', ':'];

/// Anything that can be matched by name
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for Perfume {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for &str {
    fn name(&self) -> &str {
        self
    }
}

impl Named for String {
    fn name(&self) -> &str {
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    /// Name appears in the cleaned first line, ignoring case
    FirstLine,
    /// Same, with spaces and hyphens removed from both sides
    FirstLineCompact,
    /// Name appears anywhere in the reply, ignoring case
    FullReply,
}

impl MatchRule {
    /// Rules in the order they are tried
    pub const RANKED: [MatchRule; 3] = [
        MatchRule::FirstLine,
        MatchRule::FirstLineCompact,
        MatchRule::FullReply,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchRule::FirstLine => "first_line",
            MatchRule::FirstLineCompact => "first_line_compact",
            MatchRule::FullReply => "full_reply",
        }
    }

    /// First candidate this rule accepts
    pub fn apply<'a, C: Named>(&self, reply: &str, candidates: &'a [C]) -> Option<&'a C> {
        let haystack = match self {
            MatchRule::FirstLine => clean_first_line(reply)?.to_lowercase(),
            MatchRule::FirstLineCompact => compact(&clean_first_line(reply)?),
            MatchRule::FullReply => reply.to_lowercase(),
        };

        candidates.iter().find(|candidate| {
            let needle = match self {
                MatchRule::FirstLineCompact => compact(candidate.name()),
                _ => candidate.name().trim().to_lowercase(),
            };
            !needle.is_empty() && haystack.contains(&needle)
        })
    }
}

impl Display for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, PartialEq)]
pub struct Match<'a, C> {
    pub candidate: &'a C,
    pub rule: MatchRule,
}

/// Finds the candidate a reply refers to, or `None` if no rule matches
pub fn match_reply<'a, C: Named>(reply: &str, candidates: &'a [C]) -> Option<Match<'a, C>> {
    MatchRule::RANKED.iter().find_map(|rule| {
        rule.apply(reply, candidates)
            .map(|candidate| Match { candidate, rule: *rule })
    })
}

/// First non-blank line with markdown-ish marks removed
fn clean_first_line(reply: &str) -> Option<String> {
    let line = reply.lines().find(|line| !line.trim().is_empty())?;
    let cleaned: String = line.chars().filter(|c| !STRIPPED_MARKS.contains(c)).collect();
    Some(cleaned.trim().to_string())
}

/// Lowercased with spaces and hyphens removed
fn compact(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c != ' ' && *c != '-')
        .collect::<String>()
        .to_lowercase()
}
