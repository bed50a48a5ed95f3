// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::io::Write;
use std::sync::Mutex;

use csv::Writer;

use crate::board::Board;

/// One row of search statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub fen: String,
    pub depth: u32,
    pub nodes: u64,
    pub cutoffs: u64,
    pub best_move: Option<String>,
    pub score: i32,
    pub elapsed_ms: u64,
}

pub trait DataRecorder {
    fn record(&self, board: &Board, rec: &Record) -> csv::Result<()>;
}

pub struct NullDataRecorder;

impl DataRecorder for NullDataRecorder {
    fn record(&self, _board: &Board, _rec: &Record) -> csv::Result<()> {
        Ok(())
    }
}

/// Writes each record as a CSV row, with the searched position's FEN filled
/// in.
pub struct CsvDataRecorder<W: Write> {
    writer: Mutex<Writer<W>>,
}

impl<W: Write> CsvDataRecorder<W> {
    pub fn new(writer: W) -> CsvDataRecorder<W> {
        CsvDataRecorder {
            writer: Mutex::new(Writer::from_writer(writer)),
        }
    }

    pub fn into_inner(self) -> Option<W> {
        self.writer.into_inner().ok()?.into_inner().ok()
    }
}

impl<W: Write> DataRecorder for CsvDataRecorder<W> {
    fn record(&self, board: &Board, rec: &Record) -> csv::Result<()> {
        let mut copy = rec.clone();
        copy.fen = board.as_fen();
        let mut writer = self.writer.lock().expect("recorder lock poisoned");
        writer.serialize(&copy)?;
        writer.flush()?;
        Ok(())
    }
}
