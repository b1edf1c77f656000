//! Export directory API.

use crate::csv::write_history_csv;
use crate::types::ExportManifest;
use crate::{ResultsError, ResultsResult};
use cc_sim::HistorySample;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Directory of history exports, one subdirectory per export:
/// `manifest.json`, `history.jsonl` and `history.csv`.
#[derive(Clone)]
pub struct HistoryStore {
    root_dir: PathBuf,
}

impl HistoryStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    /// Exports live next to the session file in `.cruise/exports`.
    pub fn for_session(session_path: &Path) -> ResultsResult<Self> {
        let session_dir = session_path
            .parent()
            .ok_or_else(|| ResultsError::InvalidPath {
                message: "session path has no parent directory".to_string(),
            })?;
        Self::new(session_dir.join(".cruise").join("exports"))
    }

    pub fn export_dir(&self, export_id: &str) -> PathBuf {
        self.root_dir.join(export_id)
    }

    pub fn has_export(&self, export_id: &str) -> bool {
        self.export_dir(export_id).join("manifest.json").exists()
    }

    pub fn save(&self, manifest: &ExportManifest, samples: &[HistorySample]) -> ResultsResult<PathBuf> {
        let dir = self.export_dir(&manifest.export_id);
        fs::create_dir_all(&dir)?;

        let manifest_json = serde_json::to_string_pretty(manifest)?;
        fs::write(dir.join("manifest.json"), manifest_json)?;

        let mut jsonl = String::new();
        for sample in samples {
            jsonl.push_str(&serde_json::to_string(sample)?);
            jsonl.push('\n');
        }
        fs::write(dir.join("history.jsonl"), jsonl)?;

        let mut csv = BufWriter::new(File::create(dir.join("history.csv"))?);
        write_history_csv(&mut csv, samples)?;
        csv.flush()?;

        Ok(dir)
    }

    pub fn load_manifest(&self, export_id: &str) -> ResultsResult<ExportManifest> {
        let path = self.export_dir(export_id).join("manifest.json");
        if !path.exists() {
            return Err(ResultsError::ExportNotFound {
                export_id: export_id.to_string(),
            });
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn load_history(&self, export_id: &str) -> ResultsResult<Vec<HistorySample>> {
        let path = self.export_dir(export_id).join("history.jsonl");
        if !path.exists() {
            return Err(ResultsError::ExportNotFound {
                export_id: export_id.to_string(),
            });
        }
        let content = fs::read_to_string(path)?;
        let mut samples = Vec::new();
        for line in content.lines() {
            if !line.trim().is_empty() {
                samples.push(serde_json::from_str(line)?);
            }
        }
        Ok(samples)
    }

    /// Manifests of every export, oldest first.
    pub fn list_exports(&self) -> ResultsResult<Vec<ExportManifest>> {
        let mut exports = Vec::new();
        for entry in fs::read_dir(&self.root_dir)? {
            let entry = entry?;
            if entry.path().is_dir() {
                let export_id = entry.file_name().to_string_lossy().to_string();
                if let Ok(manifest) = self.load_manifest(&export_id) {
                    exports.push(manifest);
                }
            }
        }
        exports.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(exports)
    }
}
