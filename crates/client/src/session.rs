//! Interactive session commands.
//!
//! Each input line is parsed into a [`SessionCommand`] and applied to the
//! stores. The session never touches storage directly; auto-persistence
//! picks up whatever the stores commit.

use std::fmt::Write as _;
use std::str::FromStr;

use bubblepop_store::{
    AudioSettingsPatch, GraphicsQuality, GraphicsSettingsPatch, Language, StatisticsIncrement,
    StatisticsUpdate, Stores, ValidationError,
};
use thiserror::Error;

pub const HELP: &str = "\
Commands:
  name <text>        set username
  level <n> <xp>     set level and experience
  ap <n> | tap <n>   set AP / TAP
  score <n>          record one finished game
  pop <n>            add popped bubbles
  volume <0-255>     set master volume
  mute | unmute      toggle audio
  lang <ja|en>       set language
  quality <q>        auto, low, medium, high, ultra
  show               print profile and settings
  reset              restore defaults
  help               show this list
  quit               leave the session";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("unknown command `{0}` (try `help`)")]
    UnknownCommand(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("`{value}` is not a valid {expected}")]
    InvalidArgument {
        value: String,
        expected: &'static str,
    },

    #[error(transparent)]
    Rejected(#[from] ValidationError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Name(String),
    Level { level: i64, experience: i64 },
    Ap(i64),
    Tap(i64),
    Score(i64),
    Pop(i64),
    Volume(u8),
    Mute(bool),
    Language(Language),
    Quality(GraphicsQuality),
    Show,
    Reset,
    Help,
    Quit,
}

/// What the shell should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Message(String),
    Quit,
}

impl FromStr for SessionCommand {
    type Err = SessionError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let mut args = rest.split_whitespace();

        let command = match command.to_lowercase().as_str() {
            "name" if !rest.is_empty() => Self::Name(rest.to_string()),
            "name" => return Err(SessionError::Usage("name <text>")),
            "level" => match (args.next(), args.next()) {
                (Some(level), Some(experience)) => Self::Level {
                    level: parse(level, "integer")?,
                    experience: parse(experience, "integer")?,
                },
                _ => return Err(SessionError::Usage("level <n> <xp>")),
            },
            "ap" => Self::Ap(single(args.next(), "ap <n>", "integer")?),
            "tap" => Self::Tap(single(args.next(), "tap <n>", "integer")?),
            "score" => Self::Score(single(args.next(), "score <n>", "integer")?),
            "pop" => Self::Pop(single(args.next(), "pop <n>", "integer")?),
            "volume" => Self::Volume(single(args.next(), "volume <0-255>", "volume")?),
            "mute" => Self::Mute(true),
            "unmute" => Self::Mute(false),
            "lang" => Self::Language(single(args.next(), "lang <ja|en>", "language")?),
            "quality" => Self::Quality(single(
                args.next(),
                "quality <auto|low|medium|high|ultra>",
                "quality",
            )?),
            "show" => Self::Show,
            "reset" => Self::Reset,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(SessionError::UnknownCommand(other.to_string())),
        };

        Ok(command)
    }
}

fn parse<T: FromStr>(value: &str, expected: &'static str) -> Result<T, SessionError> {
    value.parse().map_err(|_| SessionError::InvalidArgument {
        value: value.to_string(),
        expected,
    })
}

fn single<T: FromStr>(
    value: Option<&str>,
    usage: &'static str,
    expected: &'static str,
) -> Result<T, SessionError> {
    parse(value.ok_or(SessionError::Usage(usage))?, expected)
}

impl SessionCommand {
    /// Apply the command to `stores`.
    pub fn apply(self, stores: &Stores) -> Result<Reply, SessionError> {
        let message = match self {
            Self::Name(name) => {
                stores.player.update_username(&name)?;
                format!("Username set to {}", stores.player.snapshot().username)
            }
            Self::Level { level, experience } => {
                stores.player.update_level(level, experience)?;
                let profile = stores.player.snapshot();
                format!(
                    "Level {} ({} / {} XP)",
                    profile.level, profile.experience, profile.experience_to_next_level
                )
            }
            Self::Ap(value) => {
                stores.player.update_ap(value)?;
                format!("AP set to {value}")
            }
            Self::Tap(value) => {
                stores.player.update_tap(value)?;
                format!("TAP set to {value}")
            }
            Self::Score(score) => {
                // Validate through the increment first so a negative score
                // leaves the high score untouched.
                stores.player.add_to_statistics(
                    StatisticsIncrement::default()
                        .with_total_score(score)
                        .with_games_played(1),
                )?;
                stores
                    .player
                    .update_statistics(StatisticsUpdate::default().with_high_score(score))?;
                let profile = stores.player.snapshot();
                format!(
                    "Game recorded: score {score}, high score {}, {} games played",
                    profile.high_score, profile.games_played
                )
            }
            Self::Pop(count) => {
                stores.player.add_to_statistics(
                    StatisticsIncrement::default().with_total_bubbles_popped(count),
                )?;
                format!(
                    "{} bubbles popped in total",
                    stores.player.snapshot().total_bubbles_popped
                )
            }
            Self::Volume(volume) => {
                stores.settings.update_audio_settings(AudioSettingsPatch {
                    master_volume: Some(volume),
                    ..Default::default()
                });
                format!("Master volume set to {volume}")
            }
            Self::Mute(muted) => {
                stores.settings.update_audio_settings(AudioSettingsPatch {
                    is_muted: Some(muted),
                    ..Default::default()
                });
                (if muted { "Muted" } else { "Unmuted" }).to_string()
            }
            Self::Language(language) => {
                stores.settings.update_language(language);
                format!("Language set to {language}")
            }
            Self::Quality(quality) => {
                stores
                    .settings
                    .update_graphics_settings(GraphicsSettingsPatch {
                        quality: Some(quality),
                        ..Default::default()
                    });
                format!("Graphics quality set to {quality}")
            }
            Self::Show => summary(stores),
            Self::Reset => {
                stores.player.reset_player_data();
                stores.settings.reset_settings();
                "Profile and settings restored to defaults".to_string()
            }
            Self::Help => HELP.to_string(),
            Self::Quit => return Ok(Reply::Quit),
        };

        Ok(Reply::Message(message))
    }
}

/// Human-readable view of the persisted aggregates.
pub fn summary(stores: &Stores) -> String {
    let profile = stores.player.snapshot();
    let settings = stores.settings.snapshot();
    let username = if profile.username.is_empty() {
        "(unnamed)"
    } else {
        profile.username.as_str()
    };

    let mut out = String::new();
    let _ = writeln!(out, "Player   {username} [{}]", profile.user_id);
    let _ = writeln!(
        out,
        "Level    {} ({} / {} XP)",
        profile.level, profile.experience, profile.experience_to_next_level
    );
    let _ = writeln!(out, "AP/TAP   {} / {}", profile.ap, profile.tap);
    let _ = writeln!(
        out,
        "Score    total {}, high {}, {} games, {} bubbles",
        profile.total_score, profile.high_score, profile.games_played, profile.total_bubbles_popped
    );
    let _ = writeln!(
        out,
        "Audio    master {}{}",
        settings.audio.master_volume,
        if settings.audio.is_muted { " (muted)" } else { "" }
    );
    let _ = write!(
        out,
        "Display  {} quality, language {}",
        settings.graphics.quality, settings.language
    );
    out
}
