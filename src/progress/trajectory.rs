use crate::progress::Snapshot;
use std::fs::File;
use std::io::{Error, Write};
use std::path::Path;

pub enum TrajectoryFormat {
    Csv,
    Tsv,
    Json,
}

pub struct Trajectory {
    entries: Vec<Snapshot>,
}

impl Trajectory {
    pub fn push(&mut self, snapshot: Snapshot) {
        self.entries.push(snapshot)
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn latest(&self) -> Option<Snapshot> {
        self.entries.last().cloned()
    }
    pub fn entries(&self) -> &[Snapshot] {
        &self.entries
    }
    pub fn clear(&mut self) {
        self.entries.clear()
    }

    pub fn export<P: AsRef<Path>>(&self, path: P, fmt: TrajectoryFormat) -> Result<(), Error> {
        match fmt {
            TrajectoryFormat::Csv => self.export_with_delimiter(path, ','),
            TrajectoryFormat::Tsv => self.export_with_delimiter(path, '\t'),
            TrajectoryFormat::Json => self.export_json(path),
        }
    }

    fn export_with_delimiter<P: AsRef<Path>>(&self, path: P, delimiter: char) -> Result<(), Error> {
        let mut w = File::create(path)?;
        writeln!(w, "iterations{d}samples{d}area{d}epsilon", d = delimiter)?;
        for s in &self.entries {
            writeln!(
                w,
                "{}{d}{}{d}{:.12}{d}{:.12}",
                s.iterations,
                s.samples,
                s.area,
                s.epsilon,
                d = delimiter
            )?;
        }
        Ok(())
    }

    fn export_json<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let mut w = File::create(path)?;
        writeln!(w, "[")?;
        for (i, s) in self.entries.iter().enumerate() {
            // NaN has no JSON literal; table-mode snapshots carry their
            // epsilon only once the sweep finishes.
            let epsilon = if s.epsilon.is_finite() {
                s.epsilon.to_string()
            } else {
                "null".to_string()
            };
            writeln!(
                w,
                "  {{\"iterations\":{},\"samples\":{},\"area\":{},\"epsilon\":{}}}{}",
                s.iterations,
                s.samples,
                s.area,
                epsilon,
                if i + 1 == self.entries.len() { "" } else { "," }
            )?;
        }
        writeln!(w, "]")?;
        Ok(())
    }
}

impl Default for Trajectory {
    fn default() -> Self {
        Self { entries: vec![] }
    }
}
