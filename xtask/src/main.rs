//! Build automation for rw-kube
//!
//! Usage: cargo xtask <command>
//!
//! Available commands:
//! - test: Run tests
//! - ci: Run format, clippy and test checks
//! - demo: Render the shipped templates with deploy.example.env
//! - dist: Package the binary together with the templates

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use xshell::{cmd, Shell};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation for rw-kube")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run tests
    Test {
        /// Run only integration tests
        #[arg(long)]
        integration: bool,
    },
    /// Run CI checks (format, clippy, test)
    Ci,
    /// Render k8s/ into k8s.<suffix> with the example config
    Demo {
        #[arg(long, default_value = "demo")]
        suffix: String,
    },
    /// Create a tarball with the release binary, k8s/ and the example config
    Dist,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let sh = Shell::new()?;

    sh.change_dir(project_root()?);

    match cli.command {
        Commands::Test { integration } => test(&sh, integration),
        Commands::Ci => ci(&sh),
        Commands::Demo { suffix } => demo(&sh, &suffix),
        Commands::Dist => dist(&sh),
    }
}

fn test(sh: &Shell, integration: bool) -> Result<()> {
    println!("🧪 Running tests...");

    if integration {
        cmd!(sh, "cargo test --test render_test --test cli_test").run()?;
    } else {
        cmd!(sh, "cargo test --all").run()?;
    }

    println!("✅ All tests passed");
    Ok(())
}

fn ci(sh: &Shell) -> Result<()> {
    println!("🔍 Running CI checks...");

    cmd!(sh, "cargo fmt --all -- --check").run()?;
    cmd!(sh, "cargo clippy --all-targets --all-features -- -D warnings").run()?;
    test(sh, false)?;

    println!("\n✅ All CI checks passed!");
    Ok(())
}

fn demo(sh: &Shell, suffix: &str) -> Result<()> {
    cmd!(
        sh,
        "cargo run --quiet -- deploy.example.env {suffix} --strict --validate-yaml --no-inherit-env"
    )
    .run()?;

    println!("✅ Rendered into k8s.{}", suffix);
    Ok(())
}

fn dist(sh: &Shell) -> Result<()> {
    println!("📦 Creating distribution package...");

    cmd!(sh, "cargo build --release").run()?;

    let root = project_root()?;
    let dist_dir = root.join("dist/rw-kube");
    sh.remove_path(&dist_dir)?;
    sh.create_dir(dist_dir.join("k8s"))?;

    sh.copy_file(root.join("target/release/rw-kube"), &dist_dir)?;
    sh.copy_file(root.join("deploy.example.env"), &dist_dir)?;
    for manifest in sh.read_dir(root.join("k8s"))? {
        sh.copy_file(&manifest, dist_dir.join("k8s"))?;
    }

    let version = env!("CARGO_PKG_VERSION");
    let archive_name = format!("rw-kube-{}.tar.gz", version);
    cmd!(sh, "tar -czf {archive_name} -C dist rw-kube")
        .run()
        .context("Failed to create tarball")?;

    println!("✅ Distribution package created: {}", archive_name);
    Ok(())
}

fn project_root() -> Result<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(1)
        .map(Path::to_path_buf)
        .context("xtask is expected to live one level below the workspace root")
}
