//! Damage line classification
//!
//! Three message shapes are recognized:
//! - melee:  `<source> <verb> <target> for <n> points of damage.`
//! - direct: `<source> <verb> <target> for <n> points of non-melee damage.`
//! - dot:    `<target> has taken <n> damage from your <effect>.`
//!
//! Melee and direct lines carry no delimiter between attacker and defender, so
//! the actor phrase is split on the first attack verb (in list order) found
//! past the start of the phrase. Names that themselves contain one of the
//! verbs can be split in the wrong place.

use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use tracing::trace;

use crate::combat_log::LogLine;

/// Attack verbs, padded with spaces, in match priority order.
pub const ATTACK_VERBS: &[&str] = &[
    " mauls ",
    " maul ",
    " bites ",
    " bite ",
    " claws ",
    " claw ",
    " gores ",
    " gore ",
    " stings ",
    " slices ",
    " slice ",
    " sting ",
    " smashes ",
    " smash ",
    " rend ",
    " rends ",
    " slash ",
    " slashes ",
    " punch ",
    " punches ",
    " hit ",
    " hits ",
    " You ",
    " yourself ",
    " YOU ",
    " himself ",
    " herself ",
    " itself ",
    " crush ",
    " crushes ",
    " pierce ",
    " pierces ",
    " kick ",
    " kicks ",
    " strike ",
    " strikes ",
    " backstab ",
    " backstabs ",
    " bash ",
    " bashes ",
];

static MELEE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+) for (\S+) points of damage\.").expect("melee pattern is valid")
});
static DIRECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+) for (\S+) points of non-melee damage\.").expect("direct pattern is valid")
});
static DOT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+) has taken (\S+) damage from your (.+)$").expect("dot pattern is valid")
});

/// How the damage was dealt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    Melee,
    Direct,
    Dot,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Melee => "melee",
            Self::Direct => "direct",
            Self::Dot => "dot",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DamageEvent {
    pub source: String,
    pub target: String,
    /// Attack verb for melee/direct, effect name for dots.
    pub damage_type: String,
    pub amount: u64,
    pub timestamp: NaiveDateTime,
    pub origin: Origin,
}

/// Classify a line as a damage event, attributing "you" to `player`.
pub fn classify_damage(line: &LogLine, player: &str) -> Option<DamageEvent> {
    let message = line.message().trim_end();

    if let Some(caps) = MELEE.captures(message) {
        let phrase = caps.get(1)?.as_str();
        if phrase.contains(" was hit ") {
            return None;
        }
        return actor_event(phrase, caps.get(2)?.as_str(), line.timestamp, player, Origin::Melee);
    }

    if let Some(caps) = DIRECT.captures(message) {
        let phrase = caps.get(1)?.as_str();
        return actor_event(phrase, caps.get(2)?.as_str(), line.timestamp, player, Origin::Direct);
    }

    if let Some(caps) = DOT.captures(message) {
        let amount = parse_amount(caps.get(2)?.as_str())?;
        let effect = caps.get(3)?.as_str().trim_end_matches('.').trim();
        return Some(DamageEvent {
            source: player.to_string(),
            target: caps.get(1)?.as_str().to_string(),
            damage_type: effect.to_string(),
            amount,
            timestamp: line.timestamp,
            origin: Origin::Dot,
        });
    }

    None
}

/// Split an actor phrase into `(source, verb, target)` on the first listed
/// verb that occurs after the start of the phrase.
///
/// ```
/// use eqlog_core::damage::split_actor_phrase;
/// assert_eq!(
///     split_actor_phrase("A orc warrior hits you"),
///     Some(("A orc warrior", "hits", "you"))
/// );
/// assert_eq!(split_actor_phrase("nothing to see"), None);
/// ```
pub fn split_actor_phrase(phrase: &str) -> Option<(&str, &str, &str)> {
    ATTACK_VERBS.iter().find_map(|verb| {
        let pos = phrase.find(verb).filter(|&pos| pos > 0)?;
        Some((&phrase[..pos], verb.trim(), &phrase[pos + verb.len()..]))
    })
}

fn actor_event(
    phrase: &str,
    amount: &str,
    timestamp: NaiveDateTime,
    player: &str,
    origin: Origin,
) -> Option<DamageEvent> {
    let amount = parse_amount(amount)?;
    let (source, verb, target) = split_actor_phrase(phrase)?;

    Some(DamageEvent {
        source: resolve_actor(source, player),
        target: resolve_actor(target, player),
        damage_type: verb.to_string(),
        amount,
        timestamp,
        origin,
    })
}

fn resolve_actor(name: &str, player: &str) -> String {
    let name = name.trim();
    if name.eq_ignore_ascii_case("you") || name.eq_ignore_ascii_case("yourself") {
        player.to_string()
    } else {
        name.to_string()
    }
}

fn parse_amount(raw: &str) -> Option<u64> {
    match raw.parse::<u64>() {
        Ok(amount) => Some(amount),
        Err(e) => {
            trace!(raw, error = %e, "ignoring damage line with bad amount");
            None
        }
    }
}
