//! JSON summary of a polyhedron and the point-file reader feeding it.

use anyhow::{Context, Result};
use brep::api::Polyhedron;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Counts, stage and invariant status of a polyhedron.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub kind: String,
    pub vertices: usize,
    pub edges: usize,
    pub faces: usize,
    pub euler: i64,
    pub closed: bool,
    /// First failing invariant, if any.
    pub error: Option<String>,
    /// `[min, max]`; absent for an empty polyhedron.
    pub bounds: Option<[[f64; 3]; 2]>,
    pub shortest_edge: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub healed: Option<bool>,
}

impl Summary {
    pub fn of(p: &Polyhedron) -> Self {
        let kind = if p.is_empty() {
            "empty"
        } else if p.is_point() {
            "point"
        } else if p.is_edge() {
            "segment"
        } else if p.is_polygon() {
            "polygon"
        } else {
            "polyhedron"
        };
        let bounds = (!p.is_empty()).then(|| {
            let b = p.bounds();
            [[b.min.x, b.min.y, b.min.z], [b.max.x, b.max.y, b.max.z]]
        });
        let shortest_edge = p
            .edges()
            .map(|e| p.edge_vector(e).norm())
            .min_by(f64::total_cmp);
        Self {
            kind: kind.to_string(),
            vertices: p.vertex_count(),
            edges: p.edge_count(),
            faces: p.face_count(),
            euler: p.euler_characteristic(),
            closed: p.is_closed(),
            error: p.validate().err().map(|e| e.to_string()),
            bounds,
            shortest_edge,
            healed: None,
        }
    }

    pub fn with_healed(mut self, healed: bool) -> Self {
        self.healed = Some(healed);
        self
    }

    /// Write the summary to `path`, creating missing directories.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating output dir {}", parent.display()))?;
            }
        }
        fs::write(path, serde_json::to_vec_pretty(self)?)
            .with_context(|| format!("writing {}", path.display()))
    }
}

/// Read a JSON array of `[x, y, z]` triples.
pub fn read_points(path: &Path) -> Result<Vec<Vector3<f64>>> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let raw: Vec<[f64; 3]> = serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing points from {}", path.display()))?;
    Ok(raw.into_iter().map(Vector3::from).collect())
}

/// Parse `x,y,z` into a vector (clap value parser).
pub fn parse_vec3(s: &str) -> Result<Vector3<f64>, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected x,y,z but got {s:?}"));
    }
    let mut v = Vector3::zeros();
    for (i, part) in parts.iter().enumerate() {
        v[i] = part
            .parse::<f64>()
            .map_err(|e| format!("coordinate {part:?}: {e}"))?;
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;
    use tempfile::tempdir;

    #[test]
    fn parse_vec3_accepts_spaces_and_rejects_wrong_arity() {
        assert_eq!(parse_vec3("1, -2.5,3").unwrap(), vector![1.0, -2.5, 3.0]);
        assert!(parse_vec3("1,2").is_err());
        assert!(parse_vec3("1,a,3").is_err());
    }

    #[test]
    fn summary_of_box_and_empty() {
        let p = Polyhedron::from_min_max(vector![0.0, 0.0, 0.0], vector![1.0, 2.0, 3.0]);
        let s = Summary::of(&p);
        assert_eq!(s.kind, "polyhedron");
        assert_eq!((s.vertices, s.edges, s.faces), (8, 12, 6));
        assert_eq!(s.euler, 2);
        assert!(s.closed);
        assert!(s.error.is_none());
        assert_eq!(s.bounds, Some([[0.0, 0.0, 0.0], [1.0, 2.0, 3.0]]));
        assert_eq!(s.shortest_edge, Some(1.0));

        let empty = Summary::of(&Polyhedron::new());
        assert_eq!(empty.kind, "empty");
        assert!(empty.bounds.is_none());
        assert!(empty.shortest_edge.is_none());
    }

    #[test]
    fn read_points_then_hull() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pts.json");
        fs::write(
            &path,
            "[[0,0,0],[1,0,0],[0,1,0],[0,0,1],[0.1,0.1,0.1]]",
        )
        .unwrap();
        let points = read_points(&path).unwrap();
        assert_eq!(points.len(), 5);
        let s = Summary::of(&Polyhedron::from_points(&points));
        assert_eq!((s.vertices, s.edges, s.faces), (4, 6, 4));
    }

    #[test]
    fn read_points_reports_bad_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "[[0,0]]").unwrap();
        let err = read_points(&path).unwrap_err();
        assert!(format!("{err:#}").contains("parsing points"));
    }

    #[test]
    fn write_creates_missing_directories() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("nested").join("box.json");
        let p = Polyhedron::from_min_max(vector![0.0, 0.0, 0.0], vector![1.0, 1.0, 1.0]);
        let s = Summary::of(&p).with_healed(true);
        s.write(&out).unwrap();
        let back: Summary = serde_json::from_slice(&fs::read(&out).unwrap()).unwrap();
        assert_eq!(back, s);
    }
}
