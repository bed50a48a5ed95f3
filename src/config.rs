// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Engine configuration.
//!
//! An `EngineConfig` is an immutable bundle of the rule policies and scoring
//! constants a `Board` plays by. Every field has a default matching the
//! standard game, and configurations can be loaded from JSON files in which
//! any field may be omitted.
use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::search::Strategy;
use crate::types::PieceKind;

/// Material weight of each piece kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PieceWeights {
    pub king: i32,
    pub queen: i32,
    pub rook: i32,
    pub bishop: i32,
    pub knight: i32,
    pub pawn: i32,
}

impl PieceWeights {
    pub fn weight(&self, kind: PieceKind) -> i32 {
        match kind {
            PieceKind::King => self.king,
            PieceKind::Queen => self.queen,
            PieceKind::Rook => self.rook,
            PieceKind::Bishop => self.bishop,
            PieceKind::Knight => self.knight,
            PieceKind::Pawn => self.pawn,
        }
    }

    /// Total weight of one side's starting army.
    pub fn starting_total(&self) -> i32 {
        self.king + self.queen + 2 * (self.rook + self.bishop + self.knight) + 8 * self.pawn
    }
}

impl Default for PieceWeights {
    fn default() -> PieceWeights {
        PieceWeights {
            king: PieceKind::King.weight(),
            queen: PieceKind::Queen.weight(),
            rook: PieceKind::Rook.weight(),
            bishop: PieceKind::Bishop.weight(),
            knight: PieceKind::Knight.weight(),
            pawn: PieceKind::Pawn.weight(),
        }
    }
}

/// Which way pawns advance.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PawnDirection {
    /// Pawns of the perspective color advance toward rank 0, the others
    /// toward rank 7.
    ByColor,

    /// Pawns advance toward rank 0 whenever the bottom player is the one to
    /// move and toward rank 7 otherwise, regardless of their own color.
    ByTurnOrientation,
}

impl Default for PawnDirection {
    fn default() -> PawnDirection {
        PawnDirection::ByColor
    }
}

/// How dead positions are recognized after every move.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawPolicy {
    /// The heuristic the desktop game has always shipped with. Bishops, rooks
    /// and pawns all count as "minor" pieces, so it declares some winnable
    /// endings (king and rook against king, for one) drawn.
    Legacy,

    /// King against king, king and a single bishop or knight against king,
    /// and bishops all on one square color.
    Standard,
}

impl Default for DrawPolicy {
    fn default() -> DrawPolicy {
        DrawPolicy::Legacy
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub weights: PieceWeights,
    pub pawn_direction: PawnDirection,
    pub draw_policy: DrawPolicy,
    pub search_depth: u32,
    pub strategy: Strategy,
}

impl Default for EngineConfig {
    fn default() -> EngineConfig {
        EngineConfig {
            weights: PieceWeights::default(),
            pawn_direction: PawnDirection::default(),
            draw_policy: DrawPolicy::default(),
            search_depth: 3,
            strategy: Strategy::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_reader<R: Read>(reader: R) -> Result<EngineConfig, ConfigError> {
        serde_json::from_reader(reader).map_err(ConfigError::Parse)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<EngineConfig, ConfigError> {
        let file = File::open(path).map_err(ConfigError::Io)?;
        EngineConfig::from_reader(file)
    }
}

/// Possible errors that can arise when loading an `EngineConfig`.
#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "failed to read config: {}", err),
            ConfigError::Parse(err) => write!(f, "invalid config: {}", err),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_standard() {
        let config = EngineConfig::default();
        assert_eq!(1290, config.weights.starting_total());
        assert_eq!(PawnDirection::ByColor, config.pawn_direction);
        assert_eq!(DrawPolicy::Legacy, config.draw_policy);
        assert_eq!(3, config.search_depth);
        assert_eq!(Strategy::Minimax, config.strategy);
    }

    #[test]
    fn empty_object_is_default() {
        let config = EngineConfig::from_reader("{}".as_bytes()).unwrap();
        assert_eq!(EngineConfig::default(), config);
    }

    #[test]
    fn partial_override() {
        let json = r#"{
            "weights": { "queen": 95 },
            "draw_policy": "standard",
            "pawn_direction": "by_turn_orientation",
            "strategy": "random"
        }"#;
        let config = EngineConfig::from_reader(json.as_bytes()).unwrap();
        assert_eq!(95, config.weights.queen);
        assert_eq!(50, config.weights.rook);
        assert_eq!(DrawPolicy::Standard, config.draw_policy);
        assert_eq!(PawnDirection::ByTurnOrientation, config.pawn_direction);
        assert_eq!(Strategy::Random, config.strategy);
        assert_eq!(3, config.search_depth);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        match EngineConfig::from_reader("{ \"search_depth\": ".as_bytes()) {
            Err(ConfigError::Parse(_)) => {}
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        match EngineConfig::from_path("/definitely/not/here.json") {
            Err(ConfigError::Io(_)) => {}
            other => panic!("expected io error, got {:?}", other),
        }
    }
}
