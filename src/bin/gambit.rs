// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[macro_use]
extern crate clap;
#[macro_use]
extern crate log;

use std::fs::File;
use std::process;
use std::time::Instant;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};

use gambit::eval::MaterialEvaluator;
use gambit::search::{CsvDataRecorder, Searcher};
use gambit::{perft, Board, Color, EngineConfig, Strategy};

fn main() {
    env_logger::init();
    let fen_arg = Arg::with_name("FEN")
        .help("FEN string for a board position")
        .required(true)
        .index(1);
    let depth_arg = Arg::with_name("depth")
        .help("Depth of move tree to search")
        .value_name("DEPTH")
        .short("d")
        .long("depth")
        .takes_value(true);
    let perspective_arg = Arg::with_name("perspective")
        .help("Color at the bottom of the board")
        .long("perspective")
        .possible_values(&["white", "black"])
        .default_value("white");

    let matches = App::new(crate_name!())
        .version(crate_version!())
        .author(crate_authors!())
        .about(crate_description!())
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("config")
                .help("JSON engine configuration file")
                .value_name("FILE")
                .long("config")
                .global(true)
                .takes_value(true),
        )
        .subcommand(
            SubCommand::with_name("perft")
                .about("PERFT analysis of board positions")
                .arg(fen_arg.clone())
                .arg(depth_arg.clone())
                .arg(perspective_arg.clone()),
        )
        .subcommand(
            SubCommand::with_name("evaluate")
                .about("Search a board position for the side to move")
                .arg(fen_arg)
                .arg(depth_arg.clone())
                .arg(perspective_arg)
                .arg(
                    Arg::with_name("record")
                        .help("CSV file to write search statistics to")
                        .value_name("FILE")
                        .long("record")
                        .takes_value(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("play")
                .about("Play a game between two computer players")
                .arg(depth_arg)
                .arg(
                    Arg::with_name("plies")
                        .help("Maximum number of plies to play")
                        .value_name("PLIES")
                        .long("plies")
                        .default_value("200"),
                )
                .arg(
                    Arg::with_name("white")
                        .help("Strategy for white")
                        .long("white")
                        .possible_values(&["minimax", "random"])
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("black")
                        .help("Strategy for black")
                        .long("black")
                        .possible_values(&["minimax", "random"])
                        .takes_value(true),
                ),
        )
        .get_matches();

    let config = load_config(&matches);
    match matches.subcommand() {
        ("perft", Some(matches)) => run_perft(matches, config),
        ("evaluate", Some(matches)) => run_evaluate(matches, config),
        ("play", Some(matches)) => run_play(matches, config),
        _ => unreachable!(),
    }
}

fn load_config(matches: &ArgMatches) -> EngineConfig {
    let path = match matches.value_of("config") {
        Some(path) => path,
        None => return EngineConfig::default(),
    };

    match EngineConfig::from_path(path) {
        Ok(config) => {
            info!("loaded configuration from {}", path);
            config
        }
        Err(err) => {
            println!("failed to load {}: {}", path, err);
            process::exit(1);
        }
    }
}

fn depth_or_default(matches: &ArgMatches, config: &EngineConfig) -> u32 {
    if matches.is_present("depth") {
        value_t_or_exit!(matches, "depth", u32)
    } else {
        config.search_depth
    }
}

fn load_board(matches: &ArgMatches, config: EngineConfig) -> Board {
    let fen = matches.value_of("FEN").unwrap();
    let perspective = value_t_or_exit!(matches, "perspective", Color);
    match Board::from_fen_with_config(fen, perspective, config) {
        Ok(board) => board,
        Err(err) => {
            println!("invalid fen: {}", err);
            process::exit(1);
        }
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    let duration = start.elapsed();
    duration.as_secs() * 1000 + u64::from(duration.subsec_millis())
}

fn run_perft(matches: &ArgMatches, config: EngineConfig) -> ! {
    let depth = depth_or_default(matches, &config);
    let board = load_board(matches, config);

    println!("fen:   {}", board.as_fen());
    println!("depth: {}", depth);
    println!();
    println!("{}", board);
    for i in 1..=depth {
        let start = Instant::now();
        let results = perft(&board, i);
        println!("perft({}) = {} ({} ms)", i, results, elapsed_ms(start));
    }

    process::exit(0);
}

fn run_evaluate(matches: &ArgMatches, config: EngineConfig) -> ! {
    let depth = depth_or_default(matches, &config);
    let board = load_board(matches, config);

    println!("fen:   {}", board.as_fen());
    println!("depth: {}", depth);
    println!();
    println!("{}", board);

    let mut searcher: Searcher<MaterialEvaluator> = Searcher::new();
    let result = match matches.value_of("record") {
        Some(path) => {
            let file = match File::create(path) {
                Ok(file) => file,
                Err(err) => {
                    println!("failed to create {}: {}", path, err);
                    process::exit(1);
                }
            };

            let recorder = CsvDataRecorder::new(file);
            searcher.search_with_recorder(&board, depth, board.turn(), &recorder)
        }
        None => searcher.search(&board, depth, board.turn()),
    };

    match result.best_move {
        Some(mov) => println!("best move: {}", mov.algebraic(board.perspective())),
        None => println!("best move: none"),
    }
    println!("    score: {}", result.score);
    println!("    nodes: {}", result.nodes_searched);
    println!("  cutoffs: {}", result.cutoffs);
    process::exit(0);
}

fn run_play(matches: &ArgMatches, config: EngineConfig) -> ! {
    let depth = depth_or_default(matches, &config);
    let plies = value_t_or_exit!(matches, "plies", u32);
    let strategy = |name: &str| -> Strategy {
        match matches.value_of(name) {
            Some(_) => value_t_or_exit!(matches, name, Strategy),
            None => config.strategy,
        }
    };
    let strategies = [strategy("white"), strategy("black")];

    let mut board = Board::with_config(Color::White, config);
    board.initialize_standard_position();
    for ply in 0..plies {
        let turn = board.turn();
        let strategy = match turn {
            Color::White => strategies[0],
            Color::Black => strategies[1],
        };

        let mov = match strategy.select(&board, depth, turn) {
            Some(mov) => mov,
            None => break,
        };

        println!("{:>3}. {} {}", ply / 2 + 1, turn, mov.algebraic(Color::White));
        if let Err(err) = board.play_move(mov) {
            println!("engine produced a bad move: {}", err);
            process::exit(1);
        }

        println!("{}", board);

        if board.is_game_over() {
            break;
        }
    }

    match board.game_over_status() {
        Some(status) => println!("result: {}", status),
        None => println!("result: unfinished after {} plies", board.history_len()),
    }
    process::exit(0);
}
