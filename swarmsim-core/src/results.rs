//! Results file output: parameter header plus one line per run

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::config;
use crate::error::SimResult;
use crate::params::Params;
use crate::stats::Statistics;

/// Writer for the batch-mode results file
pub struct ResultsWriter {
    file: File,
}

impl ResultsWriter {
    /// Create the results file and write the `# key = value` parameter header
    pub fn create(path: &Path, params: &Params) -> SimResult<Self> {
        let mut file = File::create(path)?;
        write_header(&mut file, params)?;
        Ok(Self { file })
    }

    /// Append one run's statistics
    pub fn record_run(&mut self, run: u32, stats: &Statistics) -> SimResult<()> {
        writeln!(
            self.file,
            "{} {} {} {} {} {}",
            run,
            stats.time_step,
            stats.reached_goal,
            stats.reach_ratio,
            stats.collisions,
            stats.collision_ratio
        )?;
        Ok(())
    }
}

/// One `# key = value` line per configuration entry, so the recorded runs
/// stay traceable to the exact parameter set that produced them. The field
/// list is the configuration renderer's, not a second copy.
fn write_header(out: &mut impl Write, params: &Params) -> SimResult<()> {
    for line in config::render_params(params).lines() {
        let mut tokens = line.split_whitespace();
        if let (Some(key), Some(value)) = (tokens.next(), tokens.next()) {
            writeln!(out, "# {key} = {value}")?;
        }
    }
    writeln!(out)?;
    Ok(())
}
