use ephemshim_core::LinkMechanism;
use ephemshim_core::link::render_version_script;

fn main() {
    let interpose = std::env::var_os("CARGO_FEATURE_INTERPOSE").is_some();
    let wrap = std::env::var_os("CARGO_FEATURE_LINKER_WRAP").is_some();
    println!("cargo:rerun-if-changed=build.rs");

    // Neither feature: nothing is exported, so there is nothing to script.
    // Both features: lib.rs refuses to compile with a clearer message.
    let mechanism = match (interpose, wrap) {
        (true, false) => LinkMechanism::Interpose,
        (false, true) => LinkMechanism::Wrap,
        _ => return,
    };

    // Version scripts are a GNU ld/lld ELF feature.
    let target_os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if !matches!(target_os.as_str(), "linux" | "android") {
        return;
    }

    let out_dir = std::env::var("OUT_DIR").expect("cargo sets OUT_DIR for build scripts");
    let script_path = std::path::Path::new(&out_dir).join("ephemshim.map");
    std::fs::write(&script_path, render_version_script(mechanism))
        .expect("failed to write version script");
    println!(
        "cargo:rustc-cdylib-link-arg=-Wl,--version-script={}",
        script_path.display()
    );
}
