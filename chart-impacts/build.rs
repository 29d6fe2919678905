//! Build script for chart-impacts.
//!
//! Copies the boundary, threshold and impact fixtures to OUT_DIR so they can be
//! embedded via `include_str!`. Tracks are fetched at runtime.

use std::env;
use std::fs;
use std::path::Path;

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();

    let files = [
        ("../fixtures/countries.geojson", "countries.geojson"),
        ("../fixtures/thresholds.csv", "thresholds.csv"),
        ("../fixtures/impacts.csv", "impacts.csv"),
    ];

    for (src_path, dest_name) in &files {
        let src = Path::new(src_path);
        let dest = Path::new(&out_dir).join(dest_name);
        if !src.exists() {
            panic!("Required fixture {} not found", src_path);
        }
        fs::copy(src, &dest).unwrap_or_else(|e| {
            panic!("Failed to copy {} to {}: {}", src_path, dest.display(), e);
        });
        println!("cargo:rerun-if-changed={}", src_path);
    }

    println!("cargo:rerun-if-changed=build.rs");
}
