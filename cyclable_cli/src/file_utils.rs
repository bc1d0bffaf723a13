use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use cyclable_core::{pipeline::PipelineResult, point::Point};

pub fn read_points(path: &Path) -> Result<Vec<Point>, anyhow::Error> {
    let file = File::open(path).with_context(|| format!("Could not open {}", path.display()))?;

    let points = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("{} is not a list of points", path.display()))?;

    Ok(points)
}

/// Writes to stdout when no path is given.
pub fn write_result(path: Option<&Path>, result: &PipelineResult) -> Result<(), anyhow::Error> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let mut writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer(&mut writer, result)?;
            writer.flush()?;
        }
        None => {
            let mut writer = BufWriter::new(std::io::stdout().lock());
            serde_json::to_writer(&mut writer, result)?;
            writeln!(writer)?;
        }
    }

    Ok(())
}
