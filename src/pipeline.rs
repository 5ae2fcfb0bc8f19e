//! End-to-end merge runs.
//!
//! A run loads the table, builds the synonym index, resolves clusters and
//! writes one line per singleton row or cluster in ascending row order:
//!
//! ```no_run
//! use synmerge::config::MergeConfig;
//! use synmerge::pipeline::run_merge;
//! use synmerge::progress::NoProgress;
//!
//! let config = MergeConfig::new("hmdb.csv");
//! let summary = run_merge(&config, &mut NoProgress).unwrap();
//! println!("{} records written", summary.records_written);
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_MATCH_THRESHOLD, MergeConfig};
use crate::error::{Result, SynmergeError};
use crate::linkage::index::SynonymIndexBuilder;
use crate::linkage::merger::{OutputRecord, RecordMerger};
use crate::linkage::resolver::{ClusterMap, ClusterResolver};
use crate::progress::ProgressReporter;
use crate::table::loader::TableLoader;
use crate::table::{RowIndex, Table};

const LOAD_LABEL: &str = "1/4 Loading HMDB dataset";
const INDEX_LABEL: &str = "2/4 Creating chemical synonyms dict";
const RESOLVE_LABEL: &str = "3/4 Determining which HMDB rows to join";
const MERGE_LABEL: &str = "4/4 Joining HMDB rows";

/// Statistics of a completed merge run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeSummary {
    pub rows_read: usize,
    pub columns: usize,
    pub synonyms_indexed: usize,
    pub shared_synonyms: usize,
    pub clusters: usize,
    pub rows_clustered: usize,
    pub singleton_rows: usize,
    pub records_written: usize,
    /// Clusters skipped because no member value passed the filters.
    pub dropped_clusters: usize,
    pub output_path: String,
    pub duration_ms: u64,
}

/// One cluster listed in an [`InspectReport`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSample {
    pub root: RowIndex,
    pub members: Vec<RowIndex>,
}

/// Cluster statistics of an input file, computed without writing output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectReport {
    pub rows_read: usize,
    pub columns: usize,
    pub synonyms_indexed: usize,
    pub shared_synonyms: usize,
    pub clusters: usize,
    pub rows_clustered: usize,
    pub singleton_rows: usize,
    pub largest_cluster: usize,
    pub sample_clusters: Vec<ClusterSample>,
}

/// Append-mode line sink for output records.
pub struct RecordSink {
    path: PathBuf,
    writer: BufWriter<File>,
    delimiter: char,
    lines: usize,
}

impl RecordSink {
    /// Open `path` for appending, or truncate it first when `overwrite` is set.
    pub fn open<P: AsRef<Path>>(path: P, delimiter: char, overwrite: bool) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| {
                SynmergeError::output(format!("Cannot create {}: {e}", parent.display()))
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(!overwrite)
            .write(true)
            .truncate(overwrite)
            .open(&path)
            .map_err(|e| SynmergeError::output(format!("Cannot open {}: {e}", path.display())))?;

        Ok(RecordSink {
            path,
            writer: BufWriter::new(file),
            delimiter,
            lines: 0,
        })
    }

    /// Write one record followed by a newline.
    pub fn write_record(&mut self, record: &OutputRecord) -> Result<()> {
        writeln!(self.writer, "{}", record.to_line(self.delimiter)).map_err(|e| {
            SynmergeError::output(format!("Write to {} failed: {e}", self.path.display()))
        })?;
        self.lines += 1;
        Ok(())
    }

    /// Flush buffered lines and return how many were written.
    pub fn finish(mut self) -> Result<usize> {
        self.writer.flush().map_err(|e| {
            SynmergeError::output(format!("Flush of {} failed: {e}", self.path.display()))
        })?;
        Ok(self.lines)
    }
}

/// Tables and clusters shared by merge and inspect runs.
struct Linked {
    table: Table,
    clusters: ClusterMap,
    synonyms_indexed: usize,
    shared_synonyms: usize,
}

fn load_and_link(config: &MergeConfig, progress: &mut dyn ProgressReporter) -> Result<Linked> {
    config.validate()?;
    if config.match_threshold != DEFAULT_MATCH_THRESHOLD {
        debug!(
            "match_threshold={} accepted but not applied by the merge",
            config.match_threshold
        );
    }

    progress.start(LOAD_LABEL, 1);
    let table = TableLoader::new()
        .with_delimiter(config.delimiter)?
        .with_missing_tokens(config.missing_tokens.iter().cloned())
        .load(&config.hmdb_file_path)?;
    progress.advance(1);
    progress.finish();

    if table.is_empty() {
        warn!("Input {} has no rows", config.hmdb_file_path.display());
    }

    progress.start(INDEX_LABEL, table.len());
    let index = SynonymIndexBuilder::new(config.min_syn_length).build(&table, progress);
    progress.finish();

    progress.start(RESOLVE_LABEL, index.len());
    let clusters = ClusterResolver::new().resolve(&index, progress);
    progress.finish();

    Ok(Linked {
        synonyms_indexed: index.len(),
        shared_synonyms: index.shared_count(),
        table,
        clusters,
    })
}

/// Run the full merge and write the output file.
pub fn run_merge(config: &MergeConfig, progress: &mut dyn ProgressReporter) -> Result<MergeSummary> {
    let start_time = Instant::now();
    let linked = load_and_link(config, progress)?;
    let Linked {
        table, clusters, ..
    } = &linked;

    let output_path = config.output_path();
    let mut sink = RecordSink::open(&output_path, config.delimiter, config.overwrite)?;
    let merger = RecordMerger::new(config.min_syn_length)
        .with_missing_tokens(config.missing_tokens.iter().cloned());

    progress.start(MERGE_LABEL, table.len());
    let mut merged_written = 0;
    for row in 0..table.len() {
        if let Some(record) = merger.record_for(table, clusters, row) {
            if record.is_merged() {
                merged_written += 1;
            }
            sink.write_record(&record)?;
        }
        progress.advance(1);
    }
    let records_written = sink.finish()?;
    progress.finish();

    let summary = MergeSummary {
        rows_read: table.len(),
        columns: table.width(),
        synonyms_indexed: linked.synonyms_indexed,
        shared_synonyms: linked.shared_synonyms,
        clusters: clusters.cluster_count(),
        rows_clustered: clusters.clustered_rows(),
        singleton_rows: table.len() - clusters.clustered_rows(),
        records_written,
        dropped_clusters: clusters.cluster_count() - merged_written,
        output_path: output_path.to_string_lossy().to_string(),
        duration_ms: start_time.elapsed().as_millis() as u64,
    };

    info!(
        "Merged {} rows into {} records ({} clusters) at {}",
        summary.rows_read, summary.records_written, summary.clusters, summary.output_path
    );
    Ok(summary)
}

/// Compute cluster statistics without writing output.
///
/// `show_clusters` limits how many clusters are listed, largest first.
pub fn run_inspect(
    config: &MergeConfig,
    show_clusters: usize,
    progress: &mut dyn ProgressReporter,
) -> Result<InspectReport> {
    let Linked {
        table,
        clusters,
        synonyms_indexed,
        shared_synonyms,
    } = load_and_link(config, progress)?;

    let mut sample_clusters: Vec<ClusterSample> = clusters
        .roots()
        .filter_map(|root| {
            clusters.members(root).map(|members| ClusterSample {
                root,
                members: members.iter().copied().collect(),
            })
        })
        .collect();
    sample_clusters.sort_by(|a, b| b.members.len().cmp(&a.members.len()).then(a.root.cmp(&b.root)));
    sample_clusters.truncate(show_clusters);

    Ok(InspectReport {
        rows_read: table.len(),
        columns: table.width(),
        synonyms_indexed,
        shared_synonyms,
        clusters: clusters.cluster_count(),
        rows_clustered: clusters.clustered_rows(),
        singleton_rows: table.len() - clusters.clustered_rows(),
        largest_cluster: clusters.largest_cluster(),
        sample_clusters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoProgress;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    #[test]
    fn test_sink_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let record = OutputRecord::Passthrough {
            row: 0,
            cells: vec!["a".to_string(), "b".to_string()],
        };

        for _ in 0..2 {
            let mut sink = RecordSink::open(&path, '#', false).unwrap();
            sink.write_record(&record).unwrap();
            assert_eq!(sink.finish().unwrap(), 1);
        }
        assert_eq!(fs::read_to_string(&path).unwrap(), "a#b\na#b\n");

        let mut sink = RecordSink::open(&path, '#', true).unwrap();
        sink.write_record(&record).unwrap();
        sink.finish().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a#b\n");
    }

    #[test]
    fn test_sink_creates_output_dir() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("out.csv");
        let record = OutputRecord::Merged {
            root: 0,
            members: vec![0, 1],
            values: BTreeSet::from(["x".to_string(), "y".to_string()]),
        };
        let mut sink = RecordSink::open(&path, '|', false).unwrap();
        sink.write_record(&record).unwrap();
        sink.finish().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "x|y\n");
    }

    #[test]
    fn test_inspect_does_not_write() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("hmdb.csv");
        fs::write(&input, "X#A\nX#B\nB#C\nD#E\n").unwrap();

        let mut config = MergeConfig::new(&input);
        config.min_syn_length = 1;
        config.output_dir = dir.path().to_path_buf();

        let report = run_inspect(&config, 5, &mut NoProgress).unwrap();
        assert_eq!(report.rows_read, 4);
        assert_eq!(report.clusters, 1);
        assert_eq!(report.largest_cluster, 3);
        assert_eq!(report.singleton_rows, 1);
        assert_eq!(
            report.sample_clusters,
            vec![ClusterSample {
                root: 0,
                members: vec![0, 1, 2]
            }]
        );
        assert!(!config.output_path().exists());
    }
}
