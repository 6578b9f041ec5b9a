//! Serializes aggregated statistics to the delimited output file.

use std::fs::File;
use std::io::{BufWriter, Write};

use crate::error::PipelineError;
use crate::models::UserStatistic;

/// Write the report as `user_id,total_messages,avg_score` plus one row
/// per statistic, preserving the order received.
pub fn write_report(path: &str, rows: &[UserStatistic]) -> Result<(), PipelineError> {
    let unwritable = |source| PipelineError::OutputUnwritable {
        path: path.to_string(),
        source,
    };

    let file = File::create(path).map_err(unwritable)?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "user_id,total_messages,avg_score").map_err(unwritable)?;
    for row in rows {
        writeln!(writer, "{},{},{}", row.user_id, row.total_messages, row.avg_score)
            .map_err(unwritable)?;
    }
    writer.flush().map_err(unwritable)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn writes_header_and_rows_in_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output.csv");
        let rows = vec![
            UserStatistic {
                user_id: 28391029,
                total_messages: 2,
                avg_score: 0.45,
            },
            UserStatistic {
                user_id: 42432992,
                total_messages: 1,
                avg_score: 0.9,
            },
        ];

        write_report(path.to_str().unwrap(), &rows).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "user_id,total_messages,avg_score");
        assert_eq!(lines[1], "28391029,2,0.45");
        assert_eq!(lines[2], "42432992,1,0.9");
    }

    #[test]
    fn empty_aggregate_still_writes_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output.csv");
        write_report(path.to_str().unwrap(), &[]).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "user_id,total_messages,avg_score\n");
    }

    #[test]
    fn unwritable_path_is_reported() {
        let err = write_report("/no/such/dir/output.csv", &[]).unwrap_err();
        assert!(matches!(err, PipelineError::OutputUnwritable { .. }));
    }
}
