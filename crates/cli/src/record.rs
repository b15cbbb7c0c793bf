//! Run records written next to CLI summaries.
//!
//! A record ties a summary file to the kernel build and tolerances that
//! produced it and to the point set it was computed from, so two summaries
//! can be told apart by more than their file names.

use anyhow::{Context, Result};
use brep::api::{BBox3, KernelCfg};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::summary::Summary;

/// Kernel build and tolerances in effect for this process.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KernelInfo {
    pub version: String,
    pub code_rev: String,
    pub eps_point_status: f64,
    pub eps_colinear: f64,
    pub eps_correct: f64,
    pub min_edge_length: f64,
}

impl KernelInfo {
    pub fn current() -> Self {
        let cfg = KernelCfg::default();
        Self {
            version: brep::VERSION.to_string(),
            code_rev: code_rev(),
            eps_point_status: cfg.eps_point_status,
            eps_colinear: cfg.eps_colinear,
            eps_correct: cfg.eps_correct,
            min_edge_length: cfg.min_edge_length,
        }
    }
}

/// Size and extent of the input point set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputInfo {
    pub points: usize,
    pub bounds: Option<[[f64; 3]; 2]>,
}

impl InputInfo {
    pub fn of(points: &[Vector3<f64>]) -> Self {
        let b = BBox3::from_points(points.iter().copied());
        Self {
            points: points.len(),
            bounds: (!b.is_empty()).then(|| [b.min.into(), b.max.into()]),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub kernel: KernelInfo,
    pub command: Value,
    pub input: Option<InputInfo>,
    /// Counts and invariant status copied from the summary.
    pub result: RunResult,
    pub summary: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub kind: String,
    pub vertices: usize,
    pub edges: usize,
    pub faces: usize,
    pub valid: bool,
}

impl RunRecord {
    pub fn new(command: Value, summary: &Summary, summary_path: &Path) -> Self {
        Self {
            kernel: KernelInfo::current(),
            command,
            input: None,
            result: RunResult {
                kind: summary.kind.clone(),
                vertices: summary.vertices,
                edges: summary.edges,
                faces: summary.faces,
                valid: summary.error.is_none(),
            },
            summary: summary_path.to_path_buf(),
        }
    }

    pub fn with_input(mut self, points: &[Vector3<f64>]) -> Self {
        self.input = Some(InputInfo::of(points));
        self
    }

    /// Writes the record to `<summary stem>.run.json` and returns that path.
    pub fn write(&self) -> Result<PathBuf> {
        let path = record_path(&self.summary);
        fs::write(&path, serde_json::to_vec_pretty(self)?)
            .with_context(|| format!("writing run record {}", path.display()))?;
        Ok(path)
    }
}

fn record_path(summary: &Path) -> PathBuf {
    let stem = summary
        .file_stem()
        .map_or_else(|| "summary".into(), |s| s.to_string_lossy());
    summary.with_file_name(format!("{stem}.run.json"))
}

/// Commit of the running build: `GIT_COMMIT` at run or build time, else
/// `git describe` of the working directory.
pub fn code_rev() -> String {
    std::env::var("GIT_COMMIT")
        .ok()
        .or_else(|| option_env!("GIT_COMMIT").map(str::to_owned))
        .filter(|rev| !rev.is_empty())
        .or_else(git_describe)
        .unwrap_or_else(|| "unknown".to_owned())
}

fn git_describe() -> Option<String> {
    let out = Command::new("git")
        .args(["describe", "--always", "--dirty"])
        .output()
        .ok()?;
    out.status
        .success()
        .then(|| String::from_utf8_lossy(&out.stdout).trim().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use brep::api::Polyhedron;
    use nalgebra::vector;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn record_path_sits_beside_the_summary() {
        assert_eq!(
            record_path(Path::new("/tmp/out/hull.json")),
            Path::new("/tmp/out/hull.run.json")
        );
        assert_eq!(record_path(Path::new("cube")), Path::new("cube.run.json"));
    }

    #[test]
    fn input_info_measures_the_point_set() {
        let info = InputInfo::of(&[vector![1.0, -2.0, 0.0], vector![3.0, 4.0, -1.0]]);
        assert_eq!(info.points, 2);
        assert_eq!(info.bounds, Some([[1.0, -2.0, -1.0], [3.0, 4.0, 0.0]]));
        assert!(InputInfo::of(&[]).bounds.is_none());
    }

    #[test]
    fn kernel_info_carries_default_tolerances() {
        let info = KernelInfo::current();
        assert_eq!(info.version, brep::VERSION);
        assert_eq!(info.min_edge_length, KernelCfg::default().min_edge_length);
        assert!(!info.code_rev.is_empty());
    }

    #[test]
    fn written_record_mirrors_the_summary() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hull.json");
        let points = [
            vector![0.0, 0.0, 0.0],
            vector![1.0, 0.0, 0.0],
            vector![0.0, 1.0, 0.0],
            vector![0.0, 0.0, 1.0],
        ];
        let summary = Summary::of(&Polyhedron::from_points(&points));
        let record = RunRecord::new(json!({"command": "hull", "seed": 3}), &summary, &path)
            .with_input(&points);

        let written = record.write().unwrap();
        assert_eq!(written, dir.path().join("hull.run.json"));
        let back: RunRecord = serde_json::from_slice(&fs::read(written).unwrap()).unwrap();
        assert_eq!(back, record);
        assert_eq!(back.command["seed"], 3);
        assert_eq!(back.input.map(|i| i.points), Some(4));
        assert_eq!(
            (back.result.vertices, back.result.edges, back.result.faces),
            (4, 6, 4)
        );
        assert!(back.result.valid);
    }
}
