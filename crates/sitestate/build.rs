use std::fs;
use std::path::Path;

use clap::{Command, CommandFactory};
use clap_complete::{Shell, generate_to};

// cli.rs only needs clap + clap_complete, both build-dependencies.
#[allow(dead_code)]
#[path = "src/cli.rs"]
mod cli;

const BIN: &str = "sitestate";

fn main() {
    println!("cargo::rerun-if-changed=src/cli.rs");

    let Some(out_dir) = std::env::var_os("OUT_DIR") else {
        panic!("OUT_DIR is not set; build.rs must run under cargo");
    };
    let out_dir = Path::new(&out_dir);

    let mut cmd = cli::Cli::command();

    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir)
        .unwrap_or_else(|e| panic!("creating {}: {e}", man_dir.display()));
    write_man_pages(&cmd, BIN, &man_dir);

    let completions_dir = out_dir.join("completions");
    fs::create_dir_all(&completions_dir)
        .unwrap_or_else(|e| panic!("creating {}: {e}", completions_dir.display()));
    for shell in [Shell::Bash, Shell::Zsh, Shell::Fish] {
        generate_to(shell, &mut cmd, BIN, &completions_dir)
            .unwrap_or_else(|e| panic!("writing {shell} completions: {e}"));
    }
}

/// One page per visible command: `sitestate.1`, `sitestate-replay.1`, ...
fn write_man_pages(cmd: &Command, page: &str, dir: &Path) {
    let mut buf = Vec::new();
    clap_mangen::Man::new(cmd.clone().name(page.to_owned()))
        .render(&mut buf)
        .unwrap_or_else(|e| panic!("rendering man page {page}: {e}"));

    let path = dir.join(format!("{page}.1"));
    fs::write(&path, buf).unwrap_or_else(|e| panic!("writing {}: {e}", path.display()));

    for sub in cmd.get_subcommands().filter(|sub| !sub.is_hide_set()) {
        write_man_pages(sub, &format!("{page}-{}", sub.get_name()), dir);
    }
}
