use crate::error::RtError;
use crate::material::MaterialHandle;
use crate::point::Point3;
use crate::shape::{Shape, Triangle, TriangleMesh};

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

const SENTINEL: &str = "999 999 999 999 999 999 999 999 999";

// Parses the `.tri` plain-text mesh format: one triangle per line as nine
// whitespace-separated floats (the x,y,z of each of its three vertices),
// terminated by a sentinel line of all-999s.
//
// Part of this crate's external-interface surface (loading a mesh from an
// arbitrary path); none of the built-in demo scenes reads one off disk, so
// nothing in non-test code calls this yet.
#[allow(dead_code)]
pub fn load_tri_file<P: AsRef<Path>>(path: P, material: MaterialHandle) -> Result<Vec<Shape>, RtError> {
    let file = fs::File::open(&path)?;
    let reader = BufReader::new(file);

    let mut vertices = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line == SENTINEL {
            break;
        }

        let values: Vec<f32> = line
            .split_whitespace()
            .map(|tok| {
                tok.parse::<f32>()
                    .map_err(|e| RtError::MeshParse(format!("bad float {:?}: {}", tok, e)))
            })
            .collect::<Result<_, RtError>>()?;

        if values.len() != 9 {
            return Err(RtError::MeshParse(format!(
                "expected 9 floats per triangle line, got {}",
                values.len()
            )));
        }

        vertices.push(Point3::new(values[0], values[1], values[2]));
        vertices.push(Point3::new(values[3], values[4], values[5]));
        vertices.push(Point3::new(values[6], values[7], values[8]));
    }

    let triangle_count = vertices.len() / 3;
    let mesh = Arc::new(TriangleMesh { vertices, material });

    Ok((0..triangle_count)
        .map(|i| Shape::Triangle(Triangle::new(mesh.clone(), i * 3, i * 3 + 1, i * 3 + 2)))
        .collect())
}
