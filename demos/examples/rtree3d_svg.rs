// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Export an R-tree as SVG.
//!
//! Builds a tree by incremental insertion and draws its XY projection: every
//! node's box as a dashed rectangle, every triangle as a white polygon.
//!
//! Run:
//! - `cargo run -p understory_rtree3d_demos --example rtree3d_svg -- out.svg 40`
//!
//! Arguments are the output path (default `rtree3d.svg`) and the scale in
//! pixels per unit (default 40).

use std::fmt::Write;

use tracing_subscriber::EnvFilter;
use understory_rtree3d::{Aabb3D, NodeRef, Point3D, RTree3D, TreeConfig, Triangle3D};

const DEFAULT_SCALE: f32 = 40.0;
const OFFSET: f32 = 500.0;
const SIZE: f32 = 1000.0;

/// Stroke colors by depth, cycling.
const PALETTE: [&str; 5] = ["#d62728", "#1f77b4", "#2ca02c", "#9467bd", "#ff7f0e"];

fn tri(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> Triangle3D {
    Triangle3D::new(a.into(), b.into(), c.into())
}

fn scene() -> Vec<Triangle3D> {
    vec![
        tri([-5.6, 6.8, 0.0], [-4.0, 8.0, 0.0], [-5.6, 8.0, 0.0]),
        tri([0.0, 6.0, 0.0], [2.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        tri([3.0, 2.0, 0.0], [4.0, 3.0, 0.0], [4.0, 2.0, 0.0]),
        tri([-4.0, 6.0, 0.0], [-3.2, 6.8, 0.0], [-3.6, 5.2, 0.0]),
        tri([5.0, 2.0, 0.0], [5.0, 3.0, 0.0], [6.0, 2.0, 0.0]),
        tri([-4.0, 4.0, 0.0], [-6.0, 4.0, 0.0], [-6.0, 6.0, 0.0]),
        tri([6.0, -1.0, 0.0], [6.0, -2.0, 0.0], [5.0, -2.0, 0.0]),
        tri([4.6, -2.0, 0.0], [4.0, -2.5, 0.0], [4.8, -3.0, 0.0]),
        tri([3.0, 3.0, 0.0], [4.5, 3.0, 0.0], [3.0, 5.0, 0.0]),
        tri([7.0, 1.0, 0.0], [7.0, -3.0, 0.0], [6.0, -3.0, 0.0]),
        tri([-6.0, -4.0, 0.0], [-6.0, -2.0, 0.0], [-4.0, -4.0, 0.0]),
        tri([-0.8, 0.4, 0.0], [-0.8, -2.0, 0.0], [-4.0, -2.0, 0.0]),
        tri([6.0, 7.0, 0.0], [6.4, 4.4, 0.0], [7.0, 6.0, 0.0]),
    ]
}

struct Canvas {
    scale: f32,
    rects: String,
    polys: String,
}

impl Canvas {
    /// Map a point to canvas coordinates, flipping Y so it grows upward.
    fn project(&self, p: &Point3D) -> (f32, f32) {
        (p.x * self.scale + OFFSET, -p.y * self.scale + OFFSET)
    }

    fn rect(&mut self, b: &Aabb3D, depth: usize) {
        if b.is_empty() {
            return;
        }
        let (x, y) = self.project(&Point3D::new(b.min.x, b.max.y, 0.0));
        let w = (b.max.x - b.min.x) * self.scale;
        let h = (b.max.y - b.min.y) * self.scale;
        let color = PALETTE[depth % PALETTE.len()];
        let _ = writeln!(
            self.rects,
            r#"  <rect x="{x}" y="{y}" width="{w}" height="{h}" fill="none" stroke="{color}" stroke-width="2" stroke-dasharray="13,9"/>"#
        );
    }

    fn triangle(&mut self, t: &Triangle3D) {
        let points: Vec<String> = t
            .vertices()
            .iter()
            .map(|p| {
                let (x, y) = self.project(p);
                format!("{x},{y}")
            })
            .collect();
        let _ = writeln!(
            self.polys,
            r#"  <polygon points="{}" fill="white" stroke="black" stroke-width="3"/>"#,
            points.join(" ")
        );
    }

    fn node(&mut self, node: NodeRef<'_>, depth: usize) {
        self.rect(&node.bbox(), depth);
        for t in node.triangles() {
            self.triangle(t);
        }
        for child in node.children() {
            self.node(child, depth + 1);
        }
    }

    /// Triangles first so the dashed boxes stay visible on top.
    fn finish(self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{SIZE}\" height=\"{SIZE}\" viewBox=\"0 0 {SIZE} {SIZE}\">\n\
             {}{}</svg>\n",
            self.polys, self.rects
        )
    }
}

fn to_svg(tree: &RTree3D, scale: f32) -> String {
    let mut canvas = Canvas {
        scale,
        rects: String::new(),
        polys: String::new(),
    };
    canvas.node(tree.root(), 0);
    canvas.finish()
}

fn main() -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "rtree3d.svg".to_string());
    let scale = args
        .next()
        .and_then(|s| s.parse::<f32>().ok())
        .unwrap_or(DEFAULT_SCALE);

    let mut tree = RTree3D::new(TreeConfig::default());
    for t in scene() {
        tree.insert(t);
    }
    tracing::info!(len = tree.len(), height = tree.height(), "tree built");

    std::fs::write(&path, to_svg(&tree, scale))?;
    tracing::info!(%path, scale, "wrote svg");
    Ok(())
}
