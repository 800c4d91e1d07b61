//! Installs `include/kint.h` when `CARGO_C_KINT_INSTALL_PREFIX` is set.

use std::env;
use std::fs;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=include/kint.h");
    println!("cargo:rerun-if-env-changed=CARGO_C_KINT_INSTALL_PREFIX");

    let Ok(prefix) = env::var("CARGO_C_KINT_INSTALL_PREFIX") else {
        return;
    };
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is set by cargo");
    let header = Path::new(&manifest_dir).join("include").join("kint.h");

    let include_dir = Path::new(&prefix).join("include").join("kint_capi");
    fs::create_dir_all(&include_dir)
        .unwrap_or_else(|e| panic!("cannot create {}: {e}", include_dir.display()));
    fs::copy(&header, include_dir.join("kint.h"))
        .unwrap_or_else(|e| panic!("cannot install {}: {e}", header.display()));
}
