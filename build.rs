//! Builds the shared library fixture used by the loader tests.
//!
//! The fixture path is exported as `RESLOAD_FIXTURE_LIB`. When no C compiler
//! is usable the variable is left unset and the loading tests skip themselves.

use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=fixtures/answer.c");

    if env::var_os("CARGO_CFG_UNIX").is_none() {
        return;
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    let output = out_dir.join("libresload_fixture.so");

    let compiler = match cc::Build::new().try_get_compiler() {
        Ok(c) => c,
        Err(e) => {
            println!("cargo:warning=no C compiler for test fixture: {}", e);
            return;
        }
    };

    let status = compiler
        .to_command()
        .args(["-shared", "-fPIC", "-o"])
        .arg(&output)
        .arg("fixtures/answer.c")
        .status();

    match status {
        Ok(s) if s.success() => {
            println!("cargo:rustc-env=RESLOAD_FIXTURE_LIB={}", output.display());
        }
        Ok(s) => println!("cargo:warning=test fixture build failed: {}", s),
        Err(e) => println!("cargo:warning=test fixture build failed: {}", e),
    }
}
