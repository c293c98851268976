use anyhow::{bail, Context, Result};
use std::{collections::VecDeque, fs, path::Path, str::FromStr};
use terra2d_core::{BlockKind, SimTick};
use terra2d_physics::MoveIntent;

/// One scripted action. Tile offsets are relative to the tile under the actor's centre.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptCommand {
    Idle,
    Left,
    Right,
    Jump,
    Break { dx: i32, dy: i32 },
    Place { dx: i32, dy: i32, kind: BlockKind },
    Select(BlockKind),
}

impl ScriptCommand {
    /// Movement this command contributes to the tick it runs on.
    pub fn intent(&self) -> MoveIntent {
        match self {
            ScriptCommand::Left => MoveIntent::left(),
            ScriptCommand::Right => MoveIntent::right(),
            ScriptCommand::Jump => MoveIntent::jump(),
            _ => MoveIntent::IDLE,
        }
    }
}

fn parse_offset(token: Option<&str>, what: &str) -> Result<i32> {
    let token = token.with_context(|| format!("missing {what}"))?;
    token
        .parse()
        .with_context(|| format!("invalid {what} `{token}`"))
}

fn parse_kind(token: Option<&str>) -> Result<BlockKind> {
    let token = token.context("missing block kind")?;
    BlockKind::from_name(&token.to_ascii_lowercase())
        .with_context(|| format!("unknown block kind `{token}`"))
}

impl FromStr for ScriptCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let verb = parts.next().context("empty command")?;
        let command = match verb.to_ascii_lowercase().as_str() {
            "idle" => ScriptCommand::Idle,
            "left" => ScriptCommand::Left,
            "right" => ScriptCommand::Right,
            "jump" => ScriptCommand::Jump,
            "break" => ScriptCommand::Break {
                dx: parse_offset(parts.next(), "dx")?,
                dy: parse_offset(parts.next(), "dy")?,
            },
            "place" => ScriptCommand::Place {
                dx: parse_offset(parts.next(), "dx")?,
                dy: parse_offset(parts.next(), "dy")?,
                kind: parse_kind(parts.next())?,
            },
            "select" => ScriptCommand::Select(parse_kind(parts.next())?),
            other => bail!("unknown command `{other}`"),
        };
        if let Some(extra) = parts.next() {
            bail!("unexpected trailing `{extra}`");
        }
        Ok(command)
    }
}

/// `count` consecutive ticks of one command, starting at `start`.
#[derive(Debug, Clone, Copy)]
struct Run {
    start: u64,
    count: u64,
    command: ScriptCommand,
}

impl Run {
    fn end(&self) -> u64 {
        self.start + self.count
    }
}

/// Deterministic per-tick script runner.
///
/// Scripts are plain text, one command per tick. Blank lines and `#` comments
/// take no tick; `N*command` repeats a command for `N` ticks.
#[derive(Debug)]
pub struct ScriptPlayer {
    pending: VecDeque<Run>,
    length: u64,
}

impl ScriptPlayer {
    /// Load a script from a file on disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        Self::parse(&contents)
    }

    /// Parse a script from an in-memory string.
    pub fn parse(contents: &str) -> Result<Self> {
        let mut pending = VecDeque::new();
        let mut tick = 0u64;

        for (index, raw) in contents.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (count, body) = match line.split_once('*') {
                Some((count, rest)) => {
                    let count: u64 = count
                        .trim()
                        .parse()
                        .with_context(|| format!("line {}: invalid repeat count", index + 1))?;
                    (count, rest.trim())
                }
                None => (1, line),
            };
            let command: ScriptCommand = body
                .parse()
                .with_context(|| format!("line {}: `{}`", index + 1, line))?;
            if count == 0 {
                continue;
            }
            let end = tick
                .checked_add(count)
                .with_context(|| format!("line {}: script is too long", index + 1))?;
            pending.push_back(Run {
                start: tick,
                count,
                command,
            });
            tick = end;
        }

        if pending.is_empty() {
            bail!("script contains no commands");
        }
        Ok(Self {
            pending,
            length: tick,
        })
    }

    /// Ticks covered by the whole script.
    pub fn len_ticks(&self) -> u64 {
        self.length
    }

    /// Command scheduled for `tick`, if any. Runs that end before `tick` are dropped.
    pub fn command_for(&mut self, tick: SimTick) -> Option<ScriptCommand> {
        while let Some(run) = self.pending.front().copied() {
            if run.start > tick.0 {
                return None;
            }
            if tick.0 < run.end() {
                if tick.0 + 1 == run.end() {
                    self.pending.pop_front();
                }
                return Some(run.command);
            }
            self.pending.pop_front();
        }
        None
    }

    pub fn is_finished(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_parses_every_command() {
        let script = "\
# walk, then dig and build
2*right
jump
idle
break 0 2
select stone
place 1 0 SAND
left
";
        let mut player = ScriptPlayer::parse(script).expect("script should parse");
        assert_eq!(player.len_ticks(), 8);

        let commands: Vec<_> = (0..8)
            .map(|t| player.command_for(SimTick(t)).unwrap())
            .collect();
        assert_eq!(
            commands,
            vec![
                ScriptCommand::Right,
                ScriptCommand::Right,
                ScriptCommand::Jump,
                ScriptCommand::Idle,
                ScriptCommand::Break { dx: 0, dy: 2 },
                ScriptCommand::Select(BlockKind::Stone),
                ScriptCommand::Place {
                    dx: 1,
                    dy: 0,
                    kind: BlockKind::Sand
                },
                ScriptCommand::Left,
            ]
        );
        assert!(player.is_finished());
        assert_eq!(player.command_for(SimTick(8)), None);
    }

    #[test]
    fn script_rejects_bad_lines() {
        let err = ScriptPlayer::parse("right\nfly\n").unwrap_err();
        assert!(format!("{err:#}").contains("line 2"), "unexpected error: {err:#}");
        assert!(ScriptPlayer::parse("break 1\n").is_err());
        assert!(ScriptPlayer::parse("select bedrock\n").is_err());
        assert!(ScriptPlayer::parse("jump now\n").is_err());
        assert!(ScriptPlayer::parse("# nothing\n\n").is_err());
    }

    #[test]
    fn skipped_ticks_are_dropped() {
        let mut player = ScriptPlayer::parse("left\nright\njump\n").unwrap();
        assert_eq!(player.command_for(SimTick(1)), Some(ScriptCommand::Right));
        assert_eq!(player.command_for(SimTick(2)), Some(ScriptCommand::Jump));
        assert!(player.is_finished());
    }

    #[test]
    fn long_repeats_are_stored_as_runs() {
        let mut player = ScriptPlayer::parse("4000000000*idle\njump\n").unwrap();
        assert_eq!(player.len_ticks(), 4_000_000_001);
        assert_eq!(player.pending.len(), 2);
        assert_eq!(player.command_for(SimTick(0)), Some(ScriptCommand::Idle));
        assert_eq!(
            player.command_for(SimTick(3_999_999_999)),
            Some(ScriptCommand::Idle)
        );
        assert_eq!(
            player.command_for(SimTick(4_000_000_000)),
            Some(ScriptCommand::Jump)
        );
        assert!(player.is_finished());
    }

    #[test]
    fn zero_repeats_take_no_tick() {
        let mut player = ScriptPlayer::parse("0*left\nright\n").unwrap();
        assert_eq!(player.len_ticks(), 1);
        assert_eq!(player.command_for(SimTick(0)), Some(ScriptCommand::Right));
        assert!(ScriptPlayer::parse("0*left\n").is_err());
        assert!(ScriptPlayer::parse("18446744073709551615*idle\nidle\n").is_err());
    }

    #[test]
    fn intents_follow_commands() {
        assert_eq!(ScriptCommand::Left.intent(), MoveIntent::left());
        assert_eq!(ScriptCommand::Jump.intent(), MoveIntent::jump());
        assert_eq!(
            ScriptCommand::Break { dx: 0, dy: 1 }.intent(),
            MoveIntent::IDLE
        );
    }
}
