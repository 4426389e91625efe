//! Wall-clock measurement of named protocol tasks.
//!
//! A [`Measurement`] is registered with a protocol name, its configuration
//! argument values, an iteration count and a set of task names. Each
//! `(task, iteration)` cell records the elapsed milliseconds between the
//! matching [`start_sub_task`](Measurement::start_sub_task) and
//! [`end_sub_task`](Measurement::end_sub_task) calls. On
//! [`finish`](Measurement::finish) (or drop, as a fallback) a JSON report
//! is written to the current working directory, named from the protocol
//! name and the argument values joined with `*`.
//!
//! Report failures never affect the protocol outcome: on drop they are
//! printed to stderr and swallowed.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{json, Value};

use crate::Result;

/// Per-task, per-iteration wall-clock timing table with a JSON report.
pub struct Measurement {
    protocol_name: String,
    args: Vec<String>,
    iterations: usize,
    names: Vec<String>,
    start_times: Vec<Vec<f64>>,
    elapsed: Vec<Vec<f64>>,
    finished: bool,
}

impl Measurement {
    /// Creates a measurement for `iterations` rounds of a protocol.
    ///
    /// `args` are the configuration argument values, in configuration
    /// order; they become part of the report filename.
    pub fn new(
        protocol_name: impl Into<String>,
        iterations: usize,
        args: Vec<String>,
    ) -> Self {
        Self {
            protocol_name: protocol_name.into(),
            args,
            iterations,
            names: Vec::new(),
            start_times: Vec::new(),
            elapsed: Vec::new(),
            finished: false,
        }
    }

    /// Creates a measurement and registers its task names in one step.
    pub fn with_task_names(
        protocol_name: impl Into<String>,
        iterations: usize,
        args: Vec<String>,
        names: Vec<String>,
    ) -> Self {
        let mut measurement = Self::new(protocol_name, iterations, args);
        measurement.set_task_names(names);
        measurement
    }

    /// Registers the task list, discarding any previously recorded
    /// timings.
    pub fn set_task_names(&mut self, names: Vec<String>) {
        self.start_times = vec![vec![0.0; self.iterations]; names.len()];
        self.elapsed = vec![vec![0.0; self.iterations]; names.len()];
        self.names = names;
    }

    /// Appends further tasks to the registered list.
    ///
    /// Like [`set_task_names`](Measurement::set_task_names) this re-creates
    /// the timing table, so previously recorded timings are discarded.
    pub fn add_task_names(&mut self, mut names: Vec<String>) {
        names.append(&mut self.names);
        self.set_task_names(names);
    }

    /// Records the wall-clock start of `(task_name, iteration)`.
    ///
    /// Unknown names and out-of-range iterations are ignored.
    pub fn start_sub_task(&mut self, task_name: &str, iteration: usize) {
        let now = epoch_millis();
        if let Some((start, _)) = self.cell_mut(task_name, iteration) {
            *start = now;
        }
    }

    /// Records the elapsed milliseconds since the matching start.
    ///
    /// Without a matching start the cell's base is zero, so the recorded
    /// value is the raw epoch timestamp; consumers of the report can spot
    /// such cells by their magnitude.
    pub fn end_sub_task(&mut self, task_name: &str, iteration: usize) {
        let now = epoch_millis();
        if let Some((start, elapsed)) = self.cell_mut(task_name, iteration) {
            *elapsed = now - *start;
        }
    }

    /// Writes the JSON report and marks the measurement as finished, so the
    /// drop fallback does nothing.
    pub fn finish(&mut self) -> Result<()> {
        self.finished = true;
        self.write_report()
    }

    /// The report path: `<cwd>/<protocol>*<arg1>*<arg2>*...*.json`.
    pub fn report_path(&self) -> PathBuf {
        let mut stem = self.protocol_name.clone();
        for arg in &self.args {
            stem.push('*');
            stem.push_str(arg);
        }
        stem.push_str(".json");
        PathBuf::from(stem)
    }

    fn cell_mut(&mut self, task_name: &str, iteration: usize) -> Option<(&mut f64, &mut f64)> {
        if iteration >= self.iterations {
            return None;
        }
        let idx = self.names.iter().position(|name| name == task_name)?;
        Some((
            &mut self.start_times[idx][iteration],
            &mut self.elapsed[idx][iteration],
        ))
    }

    fn report_json(&self) -> Value {
        let mut tasks: Vec<Value> = Vec::with_capacity(self.names.len());
        for (idx, name) in self.names.iter().enumerate() {
            let mut task = serde_json::Map::new();
            task.insert("name".to_string(), json!(name));
            for iteration in 0..self.iterations {
                task.insert(
                    format!("iteration_{iteration}"),
                    json!(format!("{:.3}", self.elapsed[idx][iteration])),
                );
            }
            // Tasks appear in reverse registration order.
            tasks.insert(0, Value::Object(task));
        }
        Value::Array(tasks)
    }

    fn write_report(&self) -> Result<()> {
        let path = self.report_path();
        let mut file = File::create(&path)?;
        file.write_all(self.report_json().to_string().as_bytes())?;
        Ok(())
    }
}

impl Drop for Measurement {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Err(e) = self.write_report() {
            eprintln!("measurement report failed: {e}");
        }
    }
}

fn epoch_millis() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
