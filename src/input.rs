//! Reads (user_id, message) rows from the delimited input file.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};

use crate::error::PipelineError;
use crate::models::MessageRecord;

/// Lazy, single-pass reader over the input file.
///
/// The header must include `user_id` and `message` columns (extra columns
/// are ignored). Re-reading requires opening the file again.
#[derive(Debug)]
pub struct InputReader {
    path: String,
    lines: Lines<BufReader<File>>,
    user_id_idx: usize,
    message_idx: usize,
    line_no: usize,
}

impl InputReader {
    pub fn open(path: &str) -> Result<InputReader, PipelineError> {
        let file = File::open(path).map_err(|source| PipelineError::InputUnavailable {
            path: path.to_string(),
            source,
        })?;
        let mut lines = BufReader::new(file).lines();

        let header = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(source)) => {
                return Err(PipelineError::InputUnavailable {
                    path: path.to_string(),
                    source,
                })
            }
            None => {
                return Err(PipelineError::InputMalformed {
                    line: 1,
                    detail: "input file is empty".into(),
                })
            }
        };

        let columns = split_fields(&header);
        let find = |name: &str| {
            columns
                .iter()
                .position(|c| c.trim() == name)
                .ok_or_else(|| PipelineError::InputMalformed {
                    line: 1,
                    detail: format!("header is missing the {name} column"),
                })
        };

        Ok(InputReader {
            path: path.to_string(),
            user_id_idx: find("user_id")?,
            message_idx: find("message")?,
            lines,
            line_no: 1,
        })
    }

    fn parse_row(&self, line: &str) -> Result<MessageRecord, PipelineError> {
        let fields = split_fields(line);
        let field = |idx: usize, name: &str| {
            fields
                .get(idx)
                .ok_or_else(|| PipelineError::InputMalformed {
                    line: self.line_no,
                    detail: format!("row is missing the {name} field"),
                })
        };

        let user_id = field(self.user_id_idx, "user_id")?;
        let message = field(self.message_idx, "message")?;
        let user_id = user_id
            .trim()
            .parse::<i64>()
            .map_err(|_| PipelineError::InputMalformed {
                line: self.line_no,
                detail: format!("user_id {user_id:?} is not an integer"),
            })?;

        Ok(MessageRecord {
            user_id,
            raw_message: message.clone(),
        })
    }
}

impl Iterator for InputReader {
    type Item = Result<MessageRecord, PipelineError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.line_no += 1;
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(source) => {
                    return Some(Err(PipelineError::InputUnavailable {
                        path: self.path.clone(),
                        source,
                    }))
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            return Some(self.parse_row(&line));
        }
    }
}

/// Split one delimited line into fields, honouring double-quoted fields
/// and doubled quotes inside them.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}
