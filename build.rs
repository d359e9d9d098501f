use cargo_lock::Lockfile;
use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::process::Command;

fn main() {
    // 1. Get Git Hash
    let output = Command::new("git").args(["rev-parse", "HEAD"]).output();
    let git_hash = match output {
        Ok(o) if o.status.success() => String::from_utf8_lossy(&o.stdout).trim().to_string(),
        _ => "unknown".to_string(),
    };
    println!("cargo:rustc-env=APP_GIT_HASH={}", git_hash);
    println!("cargo:rerun-if-changed=.git/HEAD");

    // 2. Render the locked dependency set as a plain-text listing that the
    // binary embeds for --show-build-info
    println!("cargo:rerun-if-changed=Cargo.lock");
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    let lock_path = Path::new(&manifest_dir).join("Cargo.lock");

    let mut listing = String::new();
    match Lockfile::load(&lock_path) {
        Ok(lockfile) => {
            let _ = writeln!(listing, "Found {} locked dependencies.", lockfile.packages.len());
            for pkg in &lockfile.packages {
                let _ = writeln!(listing, "- {} v{}", pkg.name.as_str(), pkg.version);
                if let Some(checksum) = &pkg.checksum {
                    let _ = writeln!(listing, "    Checksum: {}", checksum);
                }
                if let Some(source) = &pkg.source {
                    let _ = writeln!(listing, "    Source:   {}", source);
                }
            }
        }
        Err(err) => {
            let _ = writeln!(listing, "Cargo.lock unavailable at build time: {}", err);
        }
    }

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR not set");
    let dest_path = Path::new(&out_dir).join("deps_info.txt");
    fs::write(&dest_path, listing).expect("Failed to write dependency listing");
    println!("cargo:rustc-env=DEPS_INFO_PATH={}", dest_path.display());
}
