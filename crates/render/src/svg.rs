//! Shaded SVG preview of a triangle soup.

use nosecone_kernel::Point3d;
use nosecone_tessellation::TriangleSoup;

/// Simple isometric projection: 3D -> 2D
fn project(p: &Point3d) -> (f64, f64) {
    let angle_x: f64 = 0.6;
    let angle_z: f64 = 0.8;
    let rx = p.x * angle_z.cos() - p.y * angle_z.sin();
    let ry = p.x * angle_z.sin() + p.y * angle_z.cos();
    let pz = ry * angle_x.sin() + p.z * angle_x.cos();
    (rx, -pz)
}

struct TriInfo {
    points: [(f64, f64); 3],
    depth: f64,
    brightness: f64,
    is_backface: bool,
}

pub fn soup_to_svg(soup: &TriangleSoup, width: f64, height: f64, title: &str) -> String {
    if soup.triangles.is_empty() {
        return format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\">\
             <text x=\"10\" y=\"20\" font-family=\"monospace\" font-size=\"14\" fill=\"#ccc\">{title}</text>\
             </svg>"
        );
    }

    let light = nosecone_kernel::Vec3::new(0.3, -0.5, 0.8);
    let light_len = light.length();

    let mut tris: Vec<TriInfo> = soup
        .triangles
        .iter()
        .map(|t| {
            let points = t.vertices.map(|p| project(&p));
            let depth = t.vertices.iter().map(|p| p.z).sum::<f64>() / 3.0;
            let n = t.area_vector();
            let dot = n.dot(&light) / (n.length().max(1e-12) * light_len);
            // Negative projected area means we are looking at the inside
            // surface; these are coloured red so winding problems stand out.
            let [(x0, y0), (x1, y1), (x2, y2)] = points;
            let signed_area = (x1 - x0) * (y2 - y0) - (x2 - x0) * (y1 - y0);
            TriInfo {
                points,
                depth,
                brightness: 0.3 + 0.7 * dot.abs().min(1.0),
                is_backface: signed_area < 0.0,
            }
        })
        .collect();
    tris.sort_by(|a, b| a.depth.total_cmp(&b.depth));

    let (mut min_x, mut max_x, mut min_y, mut max_y) = (f64::MAX, f64::MIN, f64::MAX, f64::MIN);
    for &(px, py) in tris.iter().flat_map(|t| t.points.iter()) {
        min_x = min_x.min(px);
        max_x = max_x.max(px);
        min_y = min_y.min(py);
        max_y = max_y.max(py);
    }

    let padding = 40.0;
    let avail_w = width - 2.0 * padding;
    let avail_h = height - 2.0 * padding - 25.0;
    let data_w = (max_x - min_x).max(1e-9);
    let data_h = (max_y - min_y).max(1e-9);
    let scale = (avail_w / data_w).min(avail_h / data_h);
    let offset_x = padding + (avail_w - data_w * scale) / 2.0;
    let offset_y = padding + 25.0 + (avail_h - data_h * scale) / 2.0;
    let tx = |px: f64| (px - min_x) * scale + offset_x;
    let ty = |py: f64| (py - min_y) * scale + offset_y;

    // For high-poly meshes, reduce stroke to avoid visual noise
    let num_tris = tris.len();
    let stroke_width = if num_tris > 200 { 0.2 } else { 0.5 };
    let stroke_color = if num_tris > 200 { "#222240" } else { "#2a2a4a" };

    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" style=\"background:#1a1a2e\">\n\
         <text x=\"{}\" y=\"20\" font-family=\"monospace\" font-size=\"13\" fill=\"#8892b0\" text-anchor=\"middle\">{title}</text>\n",
        width / 2.0
    );

    for tri in &tris {
        let [(x0, y0), (x1, y1), (x2, y2)] = tri.points.map(|(x, y)| (tx(x), ty(y)));
        let b = tri.brightness;
        let (r, g, bl) = if tri.is_backface {
            ((220.0 * b) as u8, (80.0 * b) as u8, (60.0 * b) as u8)
        } else {
            ((100.0 * b) as u8, (160.0 * b) as u8, (220.0 * b) as u8)
        };
        svg.push_str(&format!(
            "  <polygon points=\"{x0:.1},{y0:.1} {x1:.1},{y1:.1} {x2:.1},{y2:.1}\" \
             fill=\"rgb({r},{g},{bl})\" stroke=\"{stroke_color}\" stroke-width=\"{stroke_width}\"/>\n"
        ));
    }

    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"{}\" font-family=\"monospace\" font-size=\"10\" fill=\"#5a6080\" \
         text-anchor=\"middle\">{} triangles</text>\n",
        width / 2.0,
        height - 8.0,
        num_tris,
    ));
    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use nosecone_kernel::Vec3;
    use nosecone_tessellation::TriangleSink;

    #[test]
    fn empty_soup_renders_a_title() {
        let svg = soup_to_svg(&TriangleSoup::new(), 200.0, 100.0, "empty");
        assert!(svg.contains("empty"));
        assert!(!svg.contains("polygon"));
    }

    #[test]
    fn one_polygon_per_triangle() {
        let mut soup = TriangleSoup::new();
        soup.square(
            Vec3::ZERO,
            Point3d::ORIGIN,
            Point3d::new(1.0, 0.0, 0.0),
            Point3d::new(1.0, 1.0, 0.0),
            Point3d::new(0.0, 1.0, 0.0),
        )
        .unwrap();
        let svg = soup_to_svg(&soup, 400.0, 300.0, "square");
        assert_eq!(svg.matches("<polygon").count(), 2);
        assert!(svg.contains("2 triangles"));
    }
}
