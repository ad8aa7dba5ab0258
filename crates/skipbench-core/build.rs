//! Build script for linking the native skip list engine.
//!
//! Only active with the `native-engine` feature. The engine is built
//! separately; point the linker at it with:
//!
//! - `SKIPBENCH_ENGINE_DIR`: directory containing the shared or static library
//! - `SKIPBENCH_ENGINE_LIB`: library name without prefix/suffix (default `skiplist`)
//!
//! A shared engine must also be on the runtime loader path (e.g. `LD_LIBRARY_PATH`).

use std::env;

fn main() {
    println!("cargo:rerun-if-env-changed=SKIPBENCH_ENGINE_DIR");
    println!("cargo:rerun-if-env-changed=SKIPBENCH_ENGINE_LIB");

    if env::var_os("CARGO_FEATURE_NATIVE_ENGINE").is_none() {
        return;
    }

    if let Some(dir) = env::var_os("SKIPBENCH_ENGINE_DIR") {
        let dir = dir.to_string_lossy();
        println!("cargo:rustc-link-search=native={dir}");
    } else {
        println!(
            "cargo:warning=native-engine enabled without SKIPBENCH_ENGINE_DIR; relying on the default linker search path"
        );
    }

    let lib = env::var("SKIPBENCH_ENGINE_LIB").unwrap_or_else(|_| "skiplist".to_string());
    println!("cargo:rustc-link-lib={lib}");
}
