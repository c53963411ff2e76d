use crate::error::{Error, Result};
use crate::types::Preferences;
use csv::{ReaderBuilder, StringRecord};
use log::info;
use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Columns before the first score column. The second and third of these
/// identify the person.
const LEADING_COLUMNS: usize = 3;

impl Preferences {
    /// Load preferences from a CSV file, e.g. a form export.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read(path).map_err(|source| Error::InputNotFound {
            path: path.to_path_buf(),
            source,
        })?;
        let preferences = Self::from_reader(contents.as_slice())?;
        info!(
            "Loaded {} people and {} candidate groups from {}",
            preferences.people.len(),
            preferences.groups.len(),
            path.display()
        );
        Ok(preferences)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut records = reader.records();

        let header = match records.next() {
            Some(record) => record?,
            None => return Ok(Preferences::default()),
        };
        let groups = parse_header(&header)?;

        let mut people = Vec::new();
        let mut scores = BTreeMap::new();
        for record in records {
            let record = record?;
            let row = line_of(&record);
            let (person, row_scores) = parse_row(&record, row, &groups)?;

            if scores.contains_key(&person) {
                return Err(Error::DuplicatePerson { row, person });
            }
            people.push(person.clone());
            scores.insert(person, row_scores);
        }

        Ok(Preferences {
            people,
            groups,
            scores,
        })
    }
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|pos| pos.line()).unwrap_or_default()
}

/// Extract the group labels from the score columns of the header.
fn parse_header(header: &StringRecord) -> Result<Vec<String>> {
    let mut groups: Vec<String> = Vec::new();
    for (index, cell) in header.iter().enumerate().skip(LEADING_COLUMNS) {
        let column = index + 1;
        let label = group_label(cell).ok_or_else(|| Error::Parse {
            column,
            cell: cell.to_owned(),
        })?;
        if groups.iter().any(|group| group == label) {
            return Err(Error::DuplicateGroup {
                column,
                label: label.to_owned(),
            });
        }
        groups.push(label.to_owned());
    }
    Ok(groups)
}

/// `"Which slot suits you? [Tuesday]"` yields `"Tuesday"`.
fn group_label(cell: &str) -> Option<&str> {
    let inner = cell.trim_end().strip_suffix(']')?;
    let start = inner.rfind('[')?;
    Some(inner[start + 1..].trim())
}

fn parse_row(
    record: &StringRecord,
    row: u64,
    groups: &[String],
) -> Result<(String, BTreeMap<String, u32>)> {
    let expected = LEADING_COLUMNS + groups.len();
    if record.len() < expected {
        return Err(Error::RowLength {
            row,
            expected,
            found: record.len(),
        });
    }

    let person = format!("{},{}", &record[1], &record[2]);
    let scores = groups
        .iter()
        .zip(record.iter().skip(LEADING_COLUMNS))
        .enumerate()
        .map(|(offset, (group, value))| {
            let score = value
                .trim()
                .parse::<u32>()
                .map_err(|_| Error::ValueConversion {
                    row,
                    column: LEADING_COLUMNS + offset + 1,
                    value: value.to_owned(),
                })?;
            Ok::<_, Error>((group.clone(), score))
        })
        .collect::<Result<_>>()?;

    Ok((person, scores))
}
