use std::{fs, path::Path, str::FromStr};

use alien_defence_core::{
    AlienTemplate, Bounds, Heading, Level, PathCommand, Pose, Position, TowerTemplate,
};
use anyhow::Context as _;
use thiserror::Error;

/// Errors raised while parsing a level file.
#[derive(Debug, Error)]
pub(crate) enum LevelFileError {
    /// The file ended before the expected line.
    #[error("line {line}: expected {expected}, found end of file")]
    MissingLine {
        /// One-based line number.
        line: usize,
        /// Description of the missing content.
        expected: &'static str,
    },
    /// A line held fewer fields than required.
    #[error("line {line}: missing {expected}")]
    MissingField {
        /// One-based line number.
        line: usize,
        /// Description of the missing field.
        expected: &'static str,
    },
    /// A field did not parse as the expected number.
    #[error("line {line}: '{token}' is not a valid {expected}")]
    InvalidNumber {
        /// One-based line number.
        line: usize,
        /// Offending token.
        token: String,
        /// Description of the expected value.
        expected: &'static str,
    },
    /// A path command letter other than `F` or `T`.
    #[error("line {line}: unknown path command '{token}'")]
    UnknownCommand {
        /// One-based line number.
        line: usize,
        /// Offending token.
        token: String,
    },
    /// A path command without its step count.
    #[error("line {line}: path command '{token}' has no step count")]
    DanglingCommand {
        /// One-based line number.
        line: usize,
        /// Command letter left without an argument.
        token: String,
    },
    /// The TOML document could not be deserialized.
    #[error("invalid TOML level: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Reads the level at `path`, choosing the format from its extension.
pub(crate) fn load(path: &Path) -> anyhow::Result<Level> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read level file {}", path.display()))?;

    let is_toml = path
        .extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("toml"));
    let level = if is_toml {
        parse_toml(&contents)
    } else {
        parse_legacy(&contents)
    };
    level.with_context(|| format!("failed to parse level file {}", path.display()))
}

/// Deserializes a TOML level document.
pub(crate) fn parse_toml(contents: &str) -> Result<Level, LevelFileError> {
    Ok(toml::from_str(contents)?)
}

/// Parses the line-oriented level format.
///
/// The start heading is always east. Spawn ticks follow the alien count one
/// per line, and any content after the gold line is ignored.
pub(crate) fn parse_legacy(contents: &str) -> Result<Level, LevelFileError> {
    let mut lines = Lines::new(contents);

    let mut fields = lines.next("grid size")?;
    let width = fields.parse::<i32>("grid width")?;
    let height = fields.parse::<i32>("grid height")?;

    let mut fields = lines.next("start position")?;
    let x = fields.parse::<i32>("start x")?;
    let y = fields.parse::<i32>("start y")?;

    let fields = lines.next("path commands")?;
    let commands = fields.path_commands()?;

    let mut fields = lines.next("alien health and speed")?;
    let health = fields.parse::<f64>("alien health")?;
    let speed = fields.parse::<f64>("alien speed")?;

    let count = lines.next("alien count")?.parse::<usize>("alien count")?;
    let mut spawn_ticks = Vec::new();
    for _ in 0..count {
        spawn_ticks.push(lines.next("spawn tick")?.parse::<u64>("spawn tick")?);
    }

    let mut fields = lines.next("tower damage, range and cost")?;
    let damage = fields.parse::<f64>("tower damage")?;
    let range = fields.parse::<f64>("tower range")?;
    let cost = fields.parse::<i64>("tower cost")?;

    let gold = lines.next("gold")?.parse::<i64>("gold")?;

    Ok(Level {
        bounds: Bounds::new(width, height),
        start: Pose::new(Position::new(x, y), Heading::East),
        commands,
        alien: AlienTemplate { health, speed },
        spawn_ticks,
        tower: TowerTemplate {
            damage,
            range,
            cost,
        },
        gold,
    })
}

struct Lines<'a> {
    inner: std::str::Lines<'a>,
    number: usize,
}

impl<'a> Lines<'a> {
    fn new(contents: &'a str) -> Self {
        Self {
            inner: contents.lines(),
            number: 0,
        }
    }

    fn next(&mut self, expected: &'static str) -> Result<Fields<'a>, LevelFileError> {
        self.number += 1;
        let text = self.inner.next().ok_or(LevelFileError::MissingLine {
            line: self.number,
            expected,
        })?;
        Ok(Fields {
            tokens: text.split_whitespace(),
            line: self.number,
        })
    }
}

struct Fields<'a> {
    tokens: std::str::SplitWhitespace<'a>,
    line: usize,
}

impl Fields<'_> {
    fn parse<T: FromStr>(&mut self, expected: &'static str) -> Result<T, LevelFileError> {
        let token = self.tokens.next().ok_or(LevelFileError::MissingField {
            line: self.line,
            expected,
        })?;
        parse_token(token, self.line, expected)
    }

    fn path_commands(self) -> Result<Vec<PathCommand>, LevelFileError> {
        let line = self.line;
        let tokens: Vec<&str> = self.tokens.collect();

        let mut commands = Vec::with_capacity(tokens.len() / 2);
        for pair in tokens.chunks(2) {
            let [letter, steps] = pair else {
                return Err(LevelFileError::DanglingCommand {
                    line,
                    token: pair[0].to_owned(),
                });
            };
            let command = match *letter {
                "F" => PathCommand::Advance(parse_token(steps, line, "advance distance")?),
                "T" => PathCommand::Turn(parse_token(steps, line, "quarter-turn count")?),
                other => {
                    return Err(LevelFileError::UnknownCommand {
                        line,
                        token: other.to_owned(),
                    })
                }
            };
            commands.push(command);
        }
        Ok(commands)
    }
}

fn parse_token<T: FromStr>(
    token: &str,
    line: usize,
    expected: &'static str,
) -> Result<T, LevelFileError> {
    token.parse().map_err(|_| LevelFileError::InvalidNumber {
        line,
        token: token.to_owned(),
        expected,
    })
}
