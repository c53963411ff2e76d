use crate::error::{Error, Result};
use crate::types::Assignment;
use log::info;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

impl Assignment {
    /// Write the plain-text report to `path`, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let output_error = |source| Error::Output {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(output_error)?;
        let mut writer = BufWriter::new(file);
        write_report(&mut writer, self).map_err(output_error)?;
        writer.flush().map_err(output_error)?;

        info!(
            "Wrote {} groups to {}",
            self.occupied().count(),
            path.display()
        );
        Ok(())
    }
}

/// Render one block per occupied group: the label, one line per member and a
/// blank separator line.
pub fn write_report<W: Write>(mut writer: W, assignment: &Assignment) -> io::Result<()> {
    for group in assignment.occupied() {
        writeln!(writer, "{}", group.label)?;
        for member in &group.members {
            writeln!(writer, "{member}")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Read a report back into `(label, members)` blocks.
pub fn read_report(text: &str) -> Vec<(String, Vec<String>)> {
    let mut blocks = Vec::new();
    let mut lines = text.lines().peekable();
    while lines.peek().is_some() {
        let mut block = lines.by_ref().take_while(|line| !line.is_empty());
        if let Some(label) = block.next() {
            let members = block.map(str::to_owned).collect();
            blocks.push((label.to_owned(), members));
        }
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GroupAssignment;

    fn group(label: &str, chosen: bool, members: &[&str]) -> GroupAssignment {
        GroupAssignment {
            label: label.to_owned(),
            chosen,
            members: members.iter().map(|member| member.to_string()).collect(),
        }
    }

    fn render(assignment: &Assignment) -> String {
        let mut buf = Vec::new();
        write_report(&mut buf, assignment).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn renders_blocks_in_group_order_and_skips_empty_groups() {
        let assignment = Assignment {
            groups: vec![
                group("Red", true, &["Ada,Lovelace", "Alan,Turing"]),
                group("Green", false, &[]),
                group("Blue", true, &["Grace,Hopper"]),
            ],
            cost: 3,
        };

        assert_eq!(
            render(&assignment),
            "Red\nAda,Lovelace\nAlan,Turing\n\nBlue\nGrace,Hopper\n\n"
        );
    }

    #[test]
    fn empty_assignment_renders_nothing() {
        let assignment = Assignment {
            groups: vec![group("Red", true, &[])],
            cost: 0,
        };
        assert_eq!(render(&assignment), "");
    }

    #[test]
    fn report_reads_back_into_blocks() {
        let assignment = Assignment {
            groups: vec![
                group("Red", true, &["a,b", "c,d"]),
                group("Blue", true, &["e,f"]),
            ],
            cost: 0,
        };

        let blocks = read_report(&render(&assignment));
        assert_eq!(
            blocks,
            vec![
                ("Red".to_owned(), vec!["a,b".to_owned(), "c,d".to_owned()]),
                ("Blue".to_owned(), vec!["e,f".to_owned()]),
            ]
        );
    }

    #[test]
    fn save_writes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("groups.txt");
        let assignment = Assignment {
            groups: vec![group("Red", true, &["a,b"])],
            cost: 0,
        };

        assignment.save(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Red\na,b\n\n");
    }

    #[test]
    fn save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("groups.txt");
        let assignment = Assignment {
            groups: Vec::new(),
            cost: 0,
        };
        assert!(matches!(
            assignment.save(&path),
            Err(Error::Output { .. })
        ));
    }
}
