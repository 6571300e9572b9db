// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! R-tree 3D basics.
//!
//! Bulk load a small scene, print the tree, insert and remove a triangle, and
//! run a box query.
//!
//! Run:
//! - `cargo run -p understory_rtree3d_demos --example rtree3d_basics`
//! - `RUST_LOG=understory_rtree3d=trace cargo run -p understory_rtree3d_demos --example rtree3d_basics`

use std::fmt::Write;

use tracing_subscriber::EnvFilter;
use understory_rtree3d::{Aabb3D, NodeRef, Point3D, RTree3D, TreeConfig, Triangle3D};

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

fn fmt_point(p: &Point3D) -> String {
    format!("({}, {}, {})", p.x, p.y, p.z)
}

fn fmt_box(b: &Aabb3D) -> String {
    if b.is_empty() {
        "[empty]".to_string()
    } else {
        format!("[{} - {}]", fmt_point(&b.min), fmt_point(&b.max))
    }
}

/// Render `node` and its subtree with box-drawing connectors.
fn dump(node: NodeRef<'_>, prefix: &str, last: bool, out: &mut String) {
    let branch = if last { "└── " } else { "├── " };
    let kind = if node.is_leaf() { "Leaf" } else { "Node" };
    let _ = writeln!(out, "{prefix}{branch}{kind} {}", fmt_box(&node.bbox()));

    let inner = format!("{prefix}{}", if last { "    " } else { "│   " });
    for (i, t) in node.triangles().iter().enumerate() {
        let _ = writeln!(out, "{inner}Triangle {i}:");
        for (label, p) in ["A", "B", "C"].iter().zip(t.vertices()) {
            let _ = writeln!(out, "{inner}  {label}: {}", fmt_point(&p));
        }
    }
    let count = node.children().len();
    for (i, child) in node.children().enumerate() {
        dump(child, &inner, i + 1 == count, out);
    }
}

fn print_tree(title: &str, tree: &RTree3D) {
    let mut out = String::new();
    dump(tree.root(), "", true, &mut out);
    println!("== {title} ({} triangles, height {}) ==", tree.len(), tree.height());
    print!("{out}");
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut tree = RTree3D::bulk_load(TreeConfig::default(), &scene());
    print_tree("bulk loaded", &tree);

    let extra = tri([-3.0, 1.0, 0.0], [-4.0, 1.0, 0.0], [-3.0, 0.0, 0.0]);
    tree.insert(extra);
    print_tree("after insert", &tree);

    let removed = tree.remove(&extra);
    tracing::info!(removed, "removed the inserted triangle");
    print_tree("after remove", &tree);

    let query = Aabb3D::new(Point3D::new(0.0, 0.0, 0.0), Point3D::new(3.0, 3.0, 3.0));
    let hits = tree.find(&query);
    println!("== query {} ==", fmt_box(&query));
    for (i, t) in hits.iter().enumerate() {
        let [a, b, c] = t.vertices();
        println!(
            "hit {i}: {} {} {}",
            fmt_point(&a),
            fmt_point(&b),
            fmt_point(&c)
        );
    }

    if let Err(e) = tree.validate_bulk() {
        tracing::error!(%e, "tree failed validation");
    }
}
