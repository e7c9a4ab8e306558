//! Go Text Protocol (GTP) front end.
//!
//! Maps GTP version 2 commands onto [`Game`] calls so the engine can sit
//! behind GoGui, Sabaki or any other GTP controller.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`
//! - `list_commands`, `known_command <cmd>`
//! - `quit`
//! - `boardsize <size>` - start a new game on a `size`x`size` board
//! - `clear_board` - start a new game on the current size
//! - `play <color> <vertex|pass>`
//! - `genmove <color>` - search, play and print a move
//! - `showboard`
//! - `final_score` - `B+n`, `W+n` or `0`
//! - `resign <color>`
//! - `game_state` - the current [`GameView`](crate::snapshot::GameView) as JSON
//!
//! Vertices use GTP letters (no `I`) for x and row numbers counted from the
//! bottom edge for y, so `A1` is `(0, size - 1)`.
//!
//! ## Example
//!
//! ```
//! use tengen::gtp::GtpEngine;
//!
//! let mut engine = GtpEngine::with_seed(9, 7);
//! let mut out = Vec::new();
//! engine.run("1 play black E5\n2 showboard\n".as_bytes(), &mut out).unwrap();
//! assert!(String::from_utf8(out).unwrap().starts_with("=1 \n"));
//! ```

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::constants::{DEFAULT_SIZE, MAX_SIZE, MIN_SIZE};
use crate::eval::HeuristicEvaluator;
use crate::game::{Game, Move};
use crate::point::{Color, Coord};
use crate::search::{SearchConfig, Searcher};

/// The list of known GTP commands.
const KNOWN_COMMANDS: &[&str] = &[
    "boardsize",
    "clear_board",
    "final_score",
    "game_state",
    "genmove",
    "known_command",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "resign",
    "showboard",
    "version",
];

const COLUMNS: &str = "ABCDEFGHJKLMNOPQRSTUVWXYZ";

/// Parse a GTP vertex such as `D4`. Returns `Ok(None)` for `pass`.
pub fn parse_vertex(vertex: &str, size: usize) -> Option<Option<Coord>> {
    let vertex = vertex.trim().to_ascii_uppercase();
    if vertex == "PASS" {
        return Some(None);
    }
    let mut chars = vertex.chars();
    let letter = chars.next()?;
    let x = COLUMNS.find(letter)?;
    let row: usize = chars.as_str().parse().ok()?;
    if x >= size || row == 0 || row > size {
        return None;
    }
    Some(Some((x, size - row)))
}

/// Format a coordinate as a GTP vertex.
pub fn format_vertex((x, y): Coord, size: usize) -> String {
    let letter = COLUMNS.as_bytes().get(x).map_or('?', |&b| b as char);
    format!("{letter}{}", size - y)
}

fn format_move(mv: Move, size: usize) -> String {
    match mv {
        Move::Play(at) => format_vertex(at, size),
        Move::Pass => "pass".to_string(),
    }
}

/// GTP engine state.
pub struct GtpEngine {
    game: Game,
    searcher: Searcher<HeuristicEvaluator>,
}

impl Default for GtpEngine {
    fn default() -> Self {
        Self::new(
            DEFAULT_SIZE,
            HeuristicEvaluator::default(),
            SearchConfig::default(),
            fastrand::Rng::new(),
        )
    }
}

impl GtpEngine {
    pub fn new(
        size: usize,
        evaluator: HeuristicEvaluator,
        config: SearchConfig,
        rng: fastrand::Rng,
    ) -> Self {
        Self {
            game: Game::new(size),
            searcher: Searcher::new(evaluator, config, rng),
        }
    }

    /// Default evaluator and search settings with a pinned random seed.
    pub fn with_seed(size: usize, seed: u64) -> Self {
        Self::new(
            size,
            HeuristicEvaluator::default(),
            SearchConfig::default(),
            fastrand::Rng::with_seed(seed),
        )
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Run the command loop until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        for line in input.lines() {
            let line = line.context("reading GTP command")?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }

            let command = parts[0].to_lowercase();
            let args = &parts[1..];
            debug!(%command, ?args, "gtp command");

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            write!(output, "{prefix}{id_str} {message}\n\n").context("writing GTP response")?;
            output.flush().context("flushing GTP response")?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map_or(trimmed.len(), |(i, _)| i);
        if end > 0 {
            if let Ok(id) = trimmed[..end].parse::<u32>() {
                return (Some(id), trimmed[end..].trim());
            }
        }
        (None, trimmed)
    }

    fn parse_color(arg: Option<&&str>) -> Result<Color, (bool, String)> {
        let arg = arg.ok_or((false, "missing argument".to_string()))?;
        Color::parse(arg).ok_or((false, format!("invalid color: {arg}")))
    }

    /// Execute a GTP command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "2".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let Some(cmd) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                (true, known.to_string())
            }

            "quit" => (true, String::new()),

            "boardsize" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                match arg.parse::<usize>() {
                    Ok(size) if (MIN_SIZE..=MAX_SIZE).contains(&size) => {
                        self.game = Game::new(size);
                        (true, String::new())
                    }
                    Ok(_) => (false, "unacceptable size".to_string()),
                    Err(_) => (false, "invalid size".to_string()),
                }
            }

            "clear_board" => {
                self.game = Game::new(self.game.size());
                (true, String::new())
            }

            "play" => {
                let color = match Self::parse_color(args.first()) {
                    Ok(c) => c,
                    Err(reply) => return reply,
                };
                let Some(vertex) = args.get(1) else {
                    return (false, "missing arguments".to_string());
                };
                let Some(at) = parse_vertex(vertex, self.game.size()) else {
                    return (false, format!("invalid vertex: {vertex}"));
                };
                match at {
                    None if self.game.turn() == Some(color) => {
                        self.game.pass();
                        (true, String::new())
                    }
                    None => (false, "illegal move: out of turn".to_string()),
                    Some(at) => match self.game.try_play(at, color) {
                        Ok(_) => (true, String::new()),
                        Err(err) => {
                            warn!(%color, vertex, %err, "rejected move");
                            (false, format!("illegal move: {err}"))
                        }
                    },
                }
            }

            "genmove" => {
                let color = match Self::parse_color(args.first()) {
                    Ok(c) => c,
                    Err(reply) => return reply,
                };
                if self.game.is_ended() {
                    return (false, "game is over".to_string());
                }
                if self.game.turn() != Some(color) {
                    return (false, "out of turn".to_string());
                }
                let mv = self.searcher.choose_move(&self.game);
                if !self.game.apply(mv) {
                    warn!(%mv, "searcher proposed an illegal move");
                    self.game.pass();
                    return (true, "pass".to_string());
                }
                (true, format_move(mv, self.game.size()))
            }

            "showboard" => (true, format!("\n{}", self.game.board())),

            "final_score" => {
                let score = self.game.score();
                let reply = match score.leader() {
                    Some(Color::Black) => format!("B+{}", score.black - score.white),
                    Some(Color::White) => format!("W+{}", score.white - score.black),
                    None => "0".to_string(),
                };
                (true, reply)
            }

            "resign" => {
                let color = match Self::parse_color(args.first()) {
                    Ok(c) => c,
                    Err(reply) => return reply,
                };
                if self.game.is_ended() {
                    return (false, "game is over".to_string());
                }
                self.game.resign(color);
                (true, String::new())
            }

            "game_state" => match serde_json::to_string(&self.game.view()) {
                Ok(json) => (true, json),
                Err(err) => (false, format!("cannot encode state: {err}")),
            },

            _ => (false, format!("unknown command: {command}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> GtpEngine {
        GtpEngine::with_seed(9, 1)
    }

    #[test]
    fn test_parse_id_with_id() {
        let (id, cmd) = GtpEngine::parse_id("123 name");
        assert_eq!(id, Some(123));
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_parse_id_without_id() {
        let (id, cmd) = GtpEngine::parse_id("name");
        assert_eq!(id, None);
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_name_command() {
        let (success, response) = engine().execute("name", &[]);
        assert!(success);
        assert_eq!(response, "tengen");
    }

    #[test]
    fn test_known_command() {
        let mut engine = engine();
        assert_eq!(engine.execute("known_command", &["genmove"]), (true, "true".to_string()));
        assert_eq!(
            engine.execute("known_command", &["komi"]),
            (true, "false".to_string())
        );
    }

    #[test]
    fn test_vertices() {
        assert_eq!(parse_vertex("A1", 9), Some(Some((0, 8))));
        assert_eq!(parse_vertex("j9", 9), Some(Some((8, 0))));
        assert_eq!(parse_vertex("pass", 9), Some(None));
        assert_eq!(parse_vertex("I5", 9), None);
        assert_eq!(parse_vertex("A10", 9), None);
        assert_eq!(parse_vertex("A0", 9), None);
        assert_eq!(format_vertex((8, 0), 9), "J9");
        assert_eq!(format_vertex((2, 6), 9), "C3");
    }

    #[test]
    fn test_boardsize() {
        let mut engine = engine();
        let (success, _) = engine.execute("boardsize", &["13"]);
        assert!(success);
        assert_eq!(engine.game().size(), 13);

        let (success, _) = engine.execute("boardsize", &["1"]);
        assert!(!success);
        let (success, _) = engine.execute("boardsize", &["26"]);
        assert!(!success);
        assert_eq!(engine.game().size(), 13);
    }

    #[test]
    fn test_play_and_clear() {
        let mut engine = engine();
        let (success, _) = engine.execute("play", &["black", "D4"]);
        assert!(success);
        assert_eq!(engine.game().board().point((3, 5)).color, Some(Color::Black));

        let (success, response) = engine.execute("play", &["white", "D4"]);
        assert!(!success);
        assert_eq!(response, "illegal move: point not empty");

        let (success, _) = engine.execute("clear_board", &[]);
        assert!(success);
        assert_eq!(engine.game().move_number(), 0);
        assert_eq!(engine.game().board().stone_count(), 0);
    }

    #[test]
    fn test_genmove_plays_for_color() {
        let mut engine = engine();
        let (success, response) = engine.execute("genmove", &["b"]);
        assert!(success);
        assert_ne!(response, "pass");
        assert_eq!(engine.game().turn(), Some(Color::White));
        assert_eq!(engine.game().board().stone_count(), 1);

        let (success, _) = engine.execute("genmove", &["b"]);
        assert!(!success);
    }

    #[test]
    fn test_final_score_and_resign() {
        let mut engine = engine();
        engine.execute("boardsize", &["3"]);
        engine.execute("play", &["b", "B2"]);
        assert_eq!(engine.execute("final_score", &[]), (true, "B+9".to_string()));
        assert!(engine.execute("resign", &["white"]).0);
        assert!(engine.game().is_ended());
        assert_eq!(engine.game().winner(), Some(Color::Black));
        assert!(!engine.execute("play", &["white", "A1"]).0);
    }

    #[test]
    fn test_run_writes_responses() {
        let mut engine = engine();
        let mut out = Vec::new();
        engine
            .run("# comment\n1 name\nfoo\n2 quit\n3 name\n".as_bytes(), &mut out)
            .unwrap();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(out, "=1 tengen\n\n? unknown command: foo\n\n=2 \n\n");
    }
}
