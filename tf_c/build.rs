fn main() {
    let crate_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();

    let config = cbindgen::Config::from_root_or_default(&crate_dir);
    // Header generation is best-effort: a parse error here must not break
    // the library build itself.
    match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_config(config)
        .generate()
    {
        Ok(bindings) => {
            bindings.write_to_file("include/tf_c.h");
        }
        Err(err) => {
            println!("cargo:warning=failed to generate include/tf_c.h: {}", err);
        }
    }

    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-changed=cbindgen.toml");
}
