//! Keyboard shortcuts and button commands

use std::str::FromStr;

use crate::models::{DriverExperience, RouteRequest};

use super::map::MapSurface;
use super::session::MapSession;

/// Searches bound to Ctrl/Cmd+1, +2 and +3
pub const DEMO_SEARCHES: [(&str, &str); 3] = [
    ("Minneapolis, MN", "Duluth, MN"),
    ("Buffalo, NY", "Rochester, NY"),
    ("Detroit, MI", "Grand Rapids, MI"),
];

/// A user action against the current search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Run demo search `n` (0-based) from [`DEMO_SEARCHES`]
    Demo(usize),
    ShowAll,
    HideAll,
    Toggle(usize),
    Focus(usize),
    Compare,
}

/// Map a key press to a command. Only Ctrl (or Cmd) chords are bound.
#[must_use]
pub fn shortcut(key: &str, ctrl_or_meta: bool) -> Option<Command> {
    if !ctrl_or_meta {
        return None;
    }
    match key {
        "1" => Some(Command::Demo(0)),
        "2" => Some(Command::Demo(1)),
        "3" => Some(Command::Demo(2)),
        "a" | "A" => Some(Command::ShowAll),
        "h" | "H" => Some(Command::HideAll),
        _ => None,
    }
}

impl Command {
    /// Search request of a demo command. Demos always run as an intermediate
    /// driver avoiding icy roads, whatever the form was set to.
    #[must_use]
    pub fn demo_request(&self) -> Option<RouteRequest> {
        match self {
            Command::Demo(n) => DEMO_SEARCHES.get(*n).map(|(origin, destination)| RouteRequest {
                driver_experience: DriverExperience::Intermediate,
                avoid_icy: true,
                ..RouteRequest::new(*origin, *destination)
            }),
            _ => None,
        }
    }

    /// Apply a view command to the session. Demo searches and comparison are
    /// handled by the caller; returns false for those.
    pub fn apply<M: MapSurface>(&self, session: &mut MapSession<M>) -> bool {
        match *self {
            Command::ShowAll => session.show_all(),
            Command::HideAll => session.hide_all(),
            Command::Toggle(index) => {
                session.toggle(index);
            }
            Command::Focus(index) => session.focus(index),
            Command::Demo(_) | Command::Compare => return false,
        }
        true
    }
}

/// Parses the text form used by the interactive prompt: `show`, `hide`,
/// `compare`, `demo N`, `toggle N`, `focus N` with 1-based numbers.
impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let verb = parts.next().ok_or("Empty command")?.to_ascii_lowercase();
        let number = parts
            .next()
            .map(|n| match n.parse::<usize>() {
                Ok(n) if n >= 1 => Ok(n - 1),
                _ => Err(format!("Invalid route number '{n}'")),
            })
            .transpose()?;

        let needs_number = |command: fn(usize) -> Command| {
            number
                .map(command)
                .ok_or_else(|| format!("'{verb}' needs a route number"))
        };

        match verb.as_str() {
            "show" | "all" => Ok(Command::ShowAll),
            "hide" | "none" => Ok(Command::HideAll),
            "compare" => Ok(Command::Compare),
            "demo" => needs_number(Command::Demo),
            "toggle" => needs_number(Command::Toggle),
            "focus" => needs_number(Command::Focus),
            other => Err(format!("Unknown command '{other}'")),
        }
    }
}
