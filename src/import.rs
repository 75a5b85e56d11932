//! Geometry handed back by the external importer.

use crate::error::{Result, ViewError};
use crate::frame::BoundingVolume;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImportedMesh {
    /// Flat `[x, y, z, ...]` positions.
    pub positions: Vec<f64>,
    /// Triangle list into `positions`.
    pub indices: Vec<usize>,
    pub color: Option<[f32; 3]>,
}

impl ImportedMesh {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn validate(&self, mesh_idx: usize) -> Result<()> {
        if self.positions.len() % 3 != 0 {
            return Err(ViewError::ImportFailure(format!(
                "mesh {mesh_idx} has {} position values, not a multiple of 3",
                self.positions.len()
            )));
        }
        if self.indices.len() % 3 != 0 {
            return Err(ViewError::ImportFailure(format!(
                "mesh {mesh_idx} has {} indices, not a multiple of 3",
                self.indices.len()
            )));
        }
        let n_vertices = self.vertex_count();
        if let Some(idx) = self.indices.iter().find(|&&idx| idx >= n_vertices) {
            return Err(ViewError::ImportFailure(format!(
                "mesh {mesh_idx} references vertex {idx} of {n_vertices}"
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImportedModel {
    pub meshes: Vec<ImportedMesh>,
}

impl ImportedModel {
    pub fn new(meshes: Vec<ImportedMesh>) -> Self {
        Self { meshes }
    }

    /// Checks the whole model before anything is added to the scene.
    pub fn validate(self) -> Result<Self> {
        if self.meshes.is_empty() {
            return Err(ViewError::ImportFailure("the file contains no meshes".into()));
        }
        for (i, mesh) in self.meshes.iter().enumerate() {
            mesh.validate(i)?;
        }
        if self.triangle_count() == 0 {
            return Err(ViewError::ImportFailure("the file contains no triangles".into()));
        }
        Ok(self)
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(ImportedMesh::triangle_count).sum()
    }

    pub fn bounding_volume(&self) -> BoundingVolume {
        let mut bbox = BoundingVolume::default();
        for mesh in &self.meshes {
            bbox.merge_box(&BoundingVolume::from_points(&mesh.positions));
        }
        bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Point3;

    fn triangle(offset: f64) -> ImportedMesh {
        ImportedMesh {
            positions: vec![
                offset, 0.0, 0.0, //
                offset + 1.0, 0.0, 0.0, //
                offset, 1.0, 0.0,
            ],
            indices: vec![0, 1, 2],
            color: None,
        }
    }

    #[test]
    fn test_valid_model() {
        let model = ImportedModel::new(vec![triangle(0.0), triangle(2.0)])
            .validate()
            .unwrap();
        assert_eq!(model.triangle_count(), 2);
        let bbox = model.bounding_volume();
        assert_eq!(bbox.center(), Point3::new(1.5, 0.5, 0.0));
    }

    #[test]
    fn test_empty_model_fails() {
        assert!(matches!(
            ImportedModel::default().validate(),
            Err(ViewError::ImportFailure(_))
        ));
        let no_triangles = ImportedMesh {
            positions: vec![0.0; 9],
            ..Default::default()
        };
        assert!(ImportedModel::new(vec![no_triangles]).validate().is_err());
    }

    #[test]
    fn test_bad_indices_fail() {
        let mut mesh = triangle(0.0);
        mesh.indices = vec![0, 1, 3];
        let err = ImportedModel::new(vec![mesh]).validate().unwrap_err();
        assert_eq!(
            err,
            ViewError::ImportFailure("mesh 0 references vertex 3 of 3".into())
        );

        let mut mesh = triangle(0.0);
        mesh.positions.pop();
        assert!(ImportedModel::new(vec![mesh]).validate().is_err());
    }
}
