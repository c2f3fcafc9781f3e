//! Man page generator
//!
//! Writes `tapcp.1` and one page per subcommand (`tapcp-get.1`,
//! `tapcp-devices-show.1`, ...) into the directory given as the first
//! argument, `man` by default.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::{Command, CommandFactory};

#[path = "../cli.rs"]
#[allow(dead_code)]
mod cli;

/// Render `cmd` as `<page>.1`, then recurse into its visible subcommands
fn render_tree(
    cmd: &Command,
    page: &str,
    dir: &Path,
    written: &mut Vec<PathBuf>,
) -> io::Result<()> {
    let mut roff = Vec::new();
    clap_mangen::Man::new(cmd.clone().display_name(page))
        .title(page)
        .render(&mut roff)?;

    let path = dir.join(format!("{}.1", page));
    fs::write(&path, roff)?;
    written.push(path);

    for sub in cmd.get_subcommands().filter(|sub| !sub.is_hide_set()) {
        let sub_page = format!("{}-{}", page, sub.get_name());
        render_tree(sub, &sub_page, dir, written)?;
    }
    Ok(())
}

fn main() -> io::Result<()> {
    let dir = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from("man"), PathBuf::from);
    fs::create_dir_all(&dir)?;

    let mut written = Vec::new();
    render_tree(&cli::Cli::command(), "tapcp", &dir, &mut written)?;

    for path in &written {
        println!("{}", path.display());
    }
    eprintln!("{} man pages in {}", written.len(), dir.display());
    Ok(())
}
