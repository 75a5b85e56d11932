//! Stand-in for SLDPRT to STEP conversion.
//!
//! Real conversion needs a server-side converter. This module only produces the
//! dummy download and the placeholder geometry shown once "conversion" is done.

use crate::file_kind::file_stem;
use crate::import::ImportedMesh;

pub const PLACEHOLDER_STEP_CONTENT: &str = "This is a placeholder for the converted STP file.";

pub const CONVERSION_NOTICE: &str = "SLDPRT to STP conversion is a complex process requiring a server-side converter.\n\nThis is a demonstration of the UI flow. A placeholder model is shown, and you can download a dummy STP file.";

#[derive(Clone, Debug, PartialEq)]
pub struct ConvertedFile {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl ConvertedFile {
    pub fn placeholder_for(source_name: &str) -> Self {
        Self {
            file_name: format!("{}.stp", file_stem(source_name)),
            mime: "text/plain",
            bytes: PLACEHOLDER_STEP_CONTENT.as_bytes().to_vec(),
        }
    }

    pub fn label(&self) -> String {
        format!("Download {}", self.file_name)
    }
}

/// Axis-aligned cube of edge `size` centered at the origin.
pub fn placeholder_cube(size: f64, color: [f32; 3]) -> ImportedMesh {
    let h = size / 2.0;
    #[rustfmt::skip]
    let positions = vec![
        -h, -h, -h,
         h, -h, -h,
         h,  h, -h,
        -h,  h, -h,
        -h, -h,  h,
         h, -h,  h,
         h,  h,  h,
        -h,  h,  h,
    ];
    #[rustfmt::skip]
    let indices = vec![
        4, 5, 6, 4, 6, 7, // +z
        1, 0, 3, 1, 3, 2, // -z
        5, 1, 2, 5, 2, 6, // +x
        0, 4, 7, 0, 7, 3, // -x
        7, 6, 2, 7, 2, 3, // +y
        0, 1, 5, 0, 5, 4, // -y
    ];
    ImportedMesh {
        positions,
        indices,
        color: Some(color),
    }
}
