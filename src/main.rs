//! CLI entrypoint for `hashjoin`.
//!
//! Resolves the wordlist and the credential file (asking on the terminal
//! when they are not given or cannot be found), runs the cracker, prints the
//! username/password table, and optionally writes CSV/TXT exports when an
//! output directory is provided.
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use hashjoin::{
    engine::{Engine, EngineConfig},
    export::{save_results_csv, save_user_pass_txt},
    extract::DEFAULT_HASHES_FILE,
    hashcat::{CrackStatus, CrackerError, DEFAULT_MODE, DEFAULT_OUTFILE, DEFAULT_PROGRAM, Hashcat},
    io::DEFAULT_MMAP_THRESHOLD_BYTES,
    prompt::{Prompter, ask_until_loaded, list_dir, resolve_wordlist},
    report::{render_summary, render_table},
};
use log::{LevelFilter, error, info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "hashjoin",
    version,
    about = "Crack username:hash dumps with hashcat and show passwords per user"
)]
struct Args {
    /// Path to the username:hash file (asked for when missing)
    #[arg(short = 'f', long = "file")]
    file: Option<PathBuf>,

    /// Wordlist or wordlist+rules file [default: ./cracked.txt, else asked for]
    #[arg(short = 'w', long = "wordlist")]
    wordlist: Option<PathBuf>,

    /// Cracker program to run
    #[arg(long = "hashcat", default_value = DEFAULT_PROGRAM)]
    hashcat: PathBuf,

    /// Hash mode passed to the cracker with -m
    #[arg(short = 'm', long = "mode", default_value_t = DEFAULT_MODE)]
    mode: u32,

    /// File the extracted hashes are written to
    #[arg(long = "hashes-out", default_value = DEFAULT_HASHES_FILE)]
    hashes_out: PathBuf,

    /// File the cracker writes hash:plaintext results to
    #[arg(long = "outfile", default_value = DEFAULT_OUTFILE)]
    outfile: PathBuf,

    /// Path to the export directory
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Override mmap threshold in bytes. If zero, disable mmap.
    #[arg(long = "mmap-threshold", default_value_t = DEFAULT_MMAP_THRESHOLD_BYTES)]
    mmap_threshold: u64,

    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,

    /// Control color output (auto, always, never)
    #[arg(long = "color", value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    /// Suppress the results table (still writes exports if -o is provided)
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,

    /// Do not list the working directory before asking for the credential file
    #[arg(long = "no-list")]
    no_list: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

fn init_logger(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let _ = env_logger::Builder::from_default_env()
        .filter_level(level)
        .try_init();
}

/// Load the credential file from `-f` if it loads, otherwise list the
/// working directory and keep asking until a readable file is named.
fn load_credentials<R: io::BufRead, W: Write>(
    args: &Args,
    engine: &mut Engine,
    prompter: &mut Prompter<R, W>,
) -> Result<()> {
    if let Some(path) = &args.file {
        match engine.load_credentials_from_path(path) {
            Ok(()) => return Ok(()),
            Err(e) => error!("{:#}", anyhow::Error::from(e)),
        }
    }
    if !args.no_list {
        let cwd = std::env::current_dir()?;
        for name in list_dir(&cwd)? {
            writeln!(prompter.output(), "{}", name)?;
        }
    }
    let (path, ()) = ask_until_loaded(
        prompter,
        "\nWhat is the name of the file you want to crack? ",
        |p| engine.load_credentials_from_path(p),
    )?;
    info!("using credential file {}", path.display());
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logger(args.verbose);
    // Configure color policy
    match args.color {
        ColorChoice::Always => {
            colored::control::set_override(true);
        }
        ColorChoice::Never => {
            colored::control::set_override(false);
        }
        ColorChoice::Auto => {}
    }
    let color = colored::control::SHOULD_COLORIZE.should_colorize();

    let threshold = if args.mmap_threshold == 0 {
        u64::MAX
    } else {
        args.mmap_threshold
    };
    let mut engine = Engine::new(EngineConfig {
        hashcat: Hashcat::new(&args.hashcat).with_mode(args.mode),
        hashes_file: args.hashes_out.clone(),
        outfile: args.outfile.clone(),
        mmap_threshold_bytes: threshold,
    });

    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());

    let cwd = match std::env::current_dir() {
        Ok(d) => d,
        Err(e) => {
            error!("cannot determine working directory: {}", e);
            std::process::exit(2);
        }
    };
    let wordlist = match resolve_wordlist(args.wordlist.clone(), &cwd, &mut prompter) {
        Ok(w) => w,
        Err(e) => {
            error!("{}", e);
            std::process::exit(2);
        }
    };
    if let Err(e) = load_credentials(&args, &mut engine, &mut prompter) {
        error!("{:#}", e);
        std::process::exit(2);
    }

    info!("Here's what was found...");
    match engine.crack(&wordlist) {
        Ok(CrackStatus::Cracked) => {}
        Ok(CrackStatus::Exhausted) => warn!("wordlist exhausted before every hash was cracked"),
        Err(e) => {
            error!("{:#}", e);
            // a failed outfile truncation is outfile I/O, not a cracker failure
            match e.downcast_ref::<CrackerError>() {
                Some(CrackerError::Truncate { .. }) | None => std::process::exit(4),
                Some(_) => std::process::exit(3),
            }
        }
    }

    let rows = engine.join();
    if !args.quiet {
        println!();
        print!("{}", render_table(&rows, color));
        let summary = render_summary(&rows);
        if color {
            println!("{}", summary.bold());
        } else {
            println!("{}", summary);
        }
    }

    if let Some(outdir) = args.output {
        if let Err(e) = fs::create_dir_all(&outdir) {
            error!(
                "failed to create output directory {}: {}",
                outdir.display(),
                e
            );
            std::process::exit(5);
        }
        let ts = chrono::Local::now().format("%Y.%m.%d_%H.%M.%S");
        let csv = outdir.join(format!("hashjoin_results_{}.csv", ts));
        let txt = outdir.join(format!("hashjoin_user_pass_{}.txt", ts));
        if let Err(e) = save_results_csv(&rows, &csv) {
            error!("failed to write {}: {}", csv.display(), e);
            std::process::exit(5);
        }
        if let Err(e) = save_user_pass_txt(&rows, &txt) {
            error!("failed to write {}: {}", txt.display(), e);
            std::process::exit(5);
        }
    }
}
