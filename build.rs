fn main() {
    #[cfg(feature = "libipset")]
    libipset::generate();
}

#[cfg(feature = "libipset")]
mod libipset {
    use std::env;

    pub fn generate() {
        println!("cargo:rustc-link-lib=ipset");
        println!("cargo:rerun-if-changed=wrapper.c");
        println!("cargo:rerun-if-changed=wrapper.h");

        cc::Build::new().file("wrapper.c").compile("ipset_session_shim");

        let bindings = bindgen::Builder::default()
            .header("wrapper.h")
            .use_core()
            .ctypes_prefix("libc")
            .allowlist_function("ipset_.*")
            .allowlist_type("ipset_.*")
            .allowlist_var("IPSET_.*")
            .generate()
            .expect("Unable to generate bindings");
        let mut out_file = env::var("OUT_DIR").unwrap();
        out_file.push_str("/binding.rs");
        bindings
            .write_to_file(out_file)
            .expect("Unable to write binding.rs");
    }
}
