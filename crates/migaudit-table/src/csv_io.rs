//! CSV read/write for datasets, joins and reports.
//!
//! Writers never leave a partial file behind: rows go to a sibling temp file
//! that is renamed over the destination only after a successful flush.

use crate::error::TableError;
use migaudit_kernel::{AuditReport, Cell, Dataset, merged_columns, outer_join};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Read};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

/// How raw CSV fields become cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Read an empty field as the missing sentinel rather than `""`.
    pub empty_as_missing: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            empty_as_missing: true,
        }
    }
}

/// Load a CSV file with a header row.
pub fn read_dataset(path: impl AsRef<Path>, options: LoadOptions) -> Result<Dataset, TableError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| TableError::io(path.display(), e))?;
    let dataset = read_dataset_from_reader(file, &path.display().to_string(), options)?;
    info!(
        path = %path.display(),
        rows = dataset.len(),
        columns = dataset.headers().len(),
        "loaded dataset"
    );
    Ok(dataset)
}

/// Load CSV from any reader. `origin` names the input in errors.
pub fn read_dataset_from_reader(
    reader: impl Read,
    origin: &str,
    options: LoadOptions,
) -> Result<Dataset, TableError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);
    let headers = csv_reader
        .headers()
        .map_err(|e| TableError::csv(origin, e))?
        .clone();
    let mut dataset =
        Dataset::new(headers.iter()).map_err(|source| TableError::Dataset {
            path: origin.to_string(),
            source,
        })?;
    for record in csv_reader.records() {
        let record = record.map_err(|e| TableError::csv(origin, e))?;
        if record.len() < headers.len() {
            debug!(
                origin,
                line = record.position().map_or(0, |p| p.line()),
                fields = record.len(),
                "short row padded with missing cells"
            );
        }
        let cells = record
            .iter()
            .map(|field| {
                if field.is_empty() && options.empty_as_missing {
                    Cell::Missing
                } else {
                    Cell::text(field)
                }
            })
            .collect();
        dataset.push_row(cells);
    }
    Ok(dataset)
}

/// Write an audit report: identity columns, then one verdict per field.
pub fn write_report_csv(path: impl AsRef<Path>, report: &AuditReport) -> Result<(), TableError> {
    let path = path.as_ref();
    write_atomic(path, |writer| {
        writer
            .write_record(report.header())
            .map_err(|e| TableError::csv(path.display(), e))?;
        for row in &report.rows {
            writer
                .write_record(row.cells())
                .map_err(|e| TableError::csv(path.display(), e))?;
        }
        Ok(())
    })?;
    info!(path = %path.display(), rows = report.rows.len(), "wrote audit report");
    Ok(())
}

/// Write a dataset back out; missing cells render empty.
pub fn write_dataset_csv(path: impl AsRef<Path>, dataset: &Dataset) -> Result<(), TableError> {
    let path = path.as_ref();
    write_atomic(path, |writer| {
        writer
            .write_record(dataset.headers())
            .map_err(|e| TableError::csv(path.display(), e))?;
        for row in dataset.rows() {
            writer
                .write_record(row.cells().iter().map(Cell::render))
                .map_err(|e| TableError::csv(path.display(), e))?;
        }
        Ok(())
    })
}

/// Write the outer join of two datasets for manual review. Colliding column
/// names carry side suffixes.
pub fn write_aligned_csv(
    path: impl AsRef<Path>,
    source: &Dataset,
    source_key: &[&str],
    target: &Dataset,
    target_key: &[&str],
) -> Result<usize, TableError> {
    let path = path.as_ref();
    let columns = merged_columns(source, source_key, target, target_key);
    let join = outer_join(source, source_key, target, target_key);
    let mut written = 0;
    write_atomic(path, |writer| {
        writer
            .write_record(columns.iter().map(|c| c.name.as_str()))
            .map_err(|e| TableError::csv(path.display(), e))?;
        for row in join.rows() {
            writer
                .write_record(columns.iter().map(|c| row.merged_cell(c).render()))
                .map_err(|e| TableError::csv(path.display(), e))?;
            written += 1;
        }
        Ok(())
    })?;
    info!(path = %path.display(), rows = written, "wrote aligned dataset");
    Ok(written)
}

pub(crate) fn write_atomic<F>(path: &Path, fill: F) -> Result<(), TableError>
where
    F: FnOnce(&mut csv::Writer<BufWriter<File>>) -> Result<(), TableError>,
{
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| TableError::io(parent.display(), e))?;
    }

    let tmp_path = tmp_write_path(path);
    let write_result = (|| -> Result<(), TableError> {
        let file = File::create(&tmp_path).map_err(|e| TableError::io(tmp_path.display(), e))?;
        let mut writer = csv::Writer::from_writer(BufWriter::new(file));
        fill(&mut writer)?;
        writer
            .flush()
            .map_err(|e| TableError::io(tmp_path.display(), e))?;
        let file = writer
            .into_inner()
            .map_err(|e| TableError::io(tmp_path.display(), e))?
            .into_inner()
            .map_err(|e| TableError::io(tmp_path.display(), e))?;
        file.sync_all()
            .map_err(|e| TableError::io(tmp_path.display(), e))?;
        Ok(())
    })();

    if let Err(error) = write_result {
        let _ = fs::remove_file(&tmp_path);
        return Err(error);
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        TableError::io(
            format!("{} -> {}", tmp_path.display(), path.display()),
            e,
        )
    })?;
    debug!(path = %path.display(), "renamed temp file into place");
    Ok(())
}

fn tmp_write_path(path: &Path) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let mut tmp: OsString = path.as_os_str().to_os_string();
    tmp.push(format!(".tmp.{}.{}", std::process::id(), unique));
    PathBuf::from(tmp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use migaudit_kernel::{RecordType, Vocabularies, audit};

    fn temp_path(name: &str) -> PathBuf {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        std::env::temp_dir()
            .join(format!("migaudit-table-{name}-{}-{unique}", std::process::id()))
    }

    #[test]
    fn empty_fields_follow_load_option() {
        let text = "id,title\n1,\n2,T\n3\n";
        let strict = read_dataset_from_reader(text.as_bytes(), "inline", LoadOptions::default())
            .expect("load");
        assert!(strict.row(0).expect("row").get("title").is_missing());
        assert!(strict.row(2).expect("row").get("title").is_missing());

        let literal = read_dataset_from_reader(
            text.as_bytes(),
            "inline",
            LoadOptions {
                empty_as_missing: false,
            },
        )
        .expect("load");
        assert_eq!(literal.row(0).expect("row").get("title"), &Cell::text(""));
        assert!(literal.row(2).expect("row").get("title").is_missing());
    }

    #[test]
    fn duplicate_header_names_the_input() {
        let err = read_dataset_from_reader("a,a\n1,2\n".as_bytes(), "dup.csv", LoadOptions::default())
            .expect_err("duplicate header");
        assert!(err.to_string().starts_with("dup.csv:"));
    }

    #[test]
    fn report_write_creates_parent_and_leaves_no_temp_files() {
        let dir = temp_path("report");
        let path = dir.join("nested/report.csv");
        let source = read_dataset_from_reader(
            "id,title,description,abstract\n1,T,,\n".as_bytes(),
            "source",
            LoadOptions::default(),
        )
        .expect("source");
        let target = read_dataset_from_reader(
            "uuid,name,metadata.dc.description,metadata.dc.description.abstract,metadata.dc.title\nu,T,[],[],['T']\n"
                .as_bytes(),
            "target",
            LoadOptions::default(),
        )
        .expect("target");
        let report = audit(
            &RecordType::Community.config(),
            &source,
            &target,
            &Vocabularies::standard(),
        )
        .expect("audit");
        write_report_csv(&path, &report).expect("write");

        let written = fs::read_to_string(&path).expect("read back");
        insta::assert_snapshot!(written, @r"
        index,label,source.last_modified,target.last_modified,source.id,target.id,name,description,abstract,dc.title
        T,T,,,1,u,PASS,PASS,PASS,PASS
        ");
        let leftovers = fs::read_dir(path.parent().expect("parent"))
            .expect("list")
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().contains(".tmp."))
            .count();
        assert_eq!(leftovers, 0);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn aligned_output_suffixes_collisions() {
        let path = temp_path("aligned.csv");
        let source =
            read_dataset_from_reader("id,title\n1,A\n".as_bytes(), "s", LoadOptions::default())
                .expect("source");
        let target =
            read_dataset_from_reader("jid,title\n2,B\n".as_bytes(), "t", LoadOptions::default())
                .expect("target");
        let rows = write_aligned_csv(&path, &source, &["id"], &target, &["jid"]).expect("write");
        assert_eq!(rows, 2);
        let written = fs::read_to_string(&path).expect("read back");
        let _ = fs::remove_file(&path);
        insta::assert_snapshot!(written, @r"
        id,title_source,jid,title_target
        1,A,,
        ,,2,B
        ");
    }
}
