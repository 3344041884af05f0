//! Binary STL parsing.
//!
//! Reads what `nosecone_tessellation::stl::BinaryMeshWriter` produces:
//! - 80-byte header
//! - u32 triangle count (little-endian)
//! - For each triangle: 3×f32 normal + 3×(3×f32 vertex) + u16 attribute = 50 bytes

use nosecone_tessellation::TriangleSoup;
use nosecone_tessellation::stl::{COUNT_LEN, HEADER_LEN, TRIANGLE_RECORD_LEN, WriterOptions};

use crate::helpers::HarnessError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StlTriangle {
    pub normal: [f32; 3],
    pub vertices: [[f32; 3]; 3],
    pub attribute: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StlMesh {
    pub header: [u8; HEADER_LEN],
    pub triangles: Vec<StlTriangle>,
}

impl StlMesh {
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn header_text(&self) -> String {
        String::from_utf8_lossy(&self.header).into_owned()
    }

    /// What the writer would emit for `soup` under `options`, without
    /// going through bytes.
    pub fn from_soup(soup: &TriangleSoup, options: &WriterOptions) -> Self {
        let to_f32 = |v: [f64; 3]| {
            let v = options.orientation.apply(v);
            [v[0] as f32, v[1] as f32, v[2] as f32]
        };
        let triangles = soup
            .triangles
            .iter()
            .map(|t| StlTriangle {
                normal: to_f32(t.normal.to_array()),
                vertices: t.vertices.map(|p| to_f32(p.scaled(options.scale).to_array())),
                attribute: 0,
            })
            .collect();
        Self {
            header: [b' '; HEADER_LEN],
            triangles,
        }
    }
}

fn read_f32(bytes: &[u8], at: usize) -> f32 {
    f32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

fn read_vec(bytes: &[u8], at: usize) -> [f32; 3] {
    [
        read_f32(bytes, at),
        read_f32(bytes, at + 4),
        read_f32(bytes, at + 8),
    ]
}

/// Parse a binary STL. The byte length must agree with the stored count.
pub fn parse_binary_stl(bytes: &[u8]) -> Result<StlMesh, HarnessError> {
    let prefix = HEADER_LEN + COUNT_LEN;
    if bytes.len() < prefix {
        return Err(HarnessError::StlError {
            reason: format!("{} bytes is shorter than the {}-byte prefix", bytes.len(), prefix),
        });
    }

    let mut header = [0u8; HEADER_LEN];
    header.copy_from_slice(&bytes[..HEADER_LEN]);
    let count = u32::from_le_bytes([
        bytes[HEADER_LEN],
        bytes[HEADER_LEN + 1],
        bytes[HEADER_LEN + 2],
        bytes[HEADER_LEN + 3],
    ]) as usize;

    let expected = prefix + count * TRIANGLE_RECORD_LEN;
    if bytes.len() != expected {
        return Err(HarnessError::StlError {
            reason: format!(
                "count {} implies {} bytes, file has {}",
                count,
                expected,
                bytes.len()
            ),
        });
    }

    let triangles = bytes[prefix..]
        .chunks_exact(TRIANGLE_RECORD_LEN)
        .map(|r| StlTriangle {
            normal: read_vec(r, 0),
            vertices: [read_vec(r, 12), read_vec(r, 24), read_vec(r, 36)],
            attribute: u16::from_le_bytes([r[48], r[49]]),
        })
        .collect();

    Ok(StlMesh { header, triangles })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_input_is_rejected() {
        assert!(matches!(
            parse_binary_stl(&[b' '; 83]),
            Err(HarnessError::StlError { .. })
        ));
    }

    #[test]
    fn count_must_match_length() {
        let mut bytes = vec![b' '; 84];
        bytes[80..84].copy_from_slice(&1u32.to_le_bytes());
        assert!(parse_binary_stl(&bytes).is_err());
        bytes.extend_from_slice(&[0u8; 50]);
        let mesh = parse_binary_stl(&bytes).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.triangles[0].attribute, 0);
        assert!(mesh.header_text().trim().is_empty());
    }
}
