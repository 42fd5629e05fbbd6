//! ashl - ActionScript/ECMAScript syntax highlighter for the terminal

use std::env;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use crossterm::tty::IsTty;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use actionscript_mode::render::{span_report, Renderer};
use actionscript_mode::{Config, HighlightError, ModeRegistry, Result};

/// Parsed command line
#[derive(Debug, Default, PartialEq, Eq)]
struct Options {
    mode: Option<String>,
    spans: bool,
    no_color: bool,
    list_modes: bool,
    help: bool,
    version: bool,
    files: Vec<PathBuf>,
}

impl Options {
    fn parse(args: &[String]) -> Result<Self> {
        let mut options = Options::default();
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--help" | "-h" => options.help = true,
                "--version" | "-V" => options.version = true,
                "--spans" | "-s" => options.spans = true,
                "--no-color" => options.no_color = true,
                "--list-modes" => options.list_modes = true,
                "--mode" | "-m" => {
                    let name = iter
                        .next()
                        .ok_or_else(|| HighlightError::Usage(format!("{arg} needs a mode name")))?;
                    options.mode = Some(name.clone());
                }
                "-" => options.files.push(PathBuf::from("-")),
                s if s.starts_with('-') => {
                    return Err(HighlightError::Usage(format!("unknown option: {s}")));
                }
                path => options.files.push(PathBuf::from(path)),
            }
        }

        Ok(options)
    }
}

fn main() {
    init_logging();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("ASHL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let options = Options::parse(&args)?;

    if options.help {
        print_usage();
        return Ok(());
    }
    if options.version {
        println!("ashl {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config = Config::load()?;
    let mut registry = ModeRegistry::with_builtin_modes()?;
    registry.apply_config(&config)?;

    if options.list_modes {
        for line in mode_listing(&registry) {
            println!("{line}");
        }
        return Ok(());
    }

    let files = if options.files.is_empty() {
        vec![PathBuf::from("-")]
    } else {
        options.files.clone()
    };

    let stdout = io::stdout();
    let color = config.color && !options.no_color && stdout.is_tty();
    let mut renderer = Renderer::new(stdout.lock(), config.theme(), color);

    for (buffer_idx, path) in files.iter().enumerate() {
        let text = read_input(path)?;
        select_mode(&mut registry, buffer_idx, path, options.mode.as_deref())?;

        let lines: Vec<&str> = text.lines().collect();
        let highlighted = registry.highlight_lines(buffer_idx, &lines);
        debug!(path = %path.display(), lines = lines.len(), "highlighted file");

        for (line_idx, (line, spans)) in lines.iter().zip(&highlighted).enumerate() {
            if options.spans {
                for entry in span_report(line_idx, line, spans) {
                    renderer.write_line(&entry, &[])?;
                }
            } else {
                renderer.write_line(line, spans)?;
            }
        }
        registry.remove_cache(buffer_idx);
    }

    renderer.flush()
}

/// One line per mode: name, label, extensions and electric keys
fn mode_listing(registry: &ModeRegistry) -> Vec<String> {
    registry
        .list_modes()
        .into_iter()
        .filter_map(|name| registry.get(name))
        .map(|mode| {
            let keys: String = mode.keymap.all_bindings().into_iter().map(|(key, _)| key).collect();
            let extensions = format!(".{}", mode.extensions.join(" ."));
            format!("{:<14} {:<14} {:<16} {}", mode.name, mode.label, extensions, keys)
                .trim_end()
                .to_string()
        })
        .collect()
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

fn select_mode(
    registry: &mut ModeRegistry,
    buffer_idx: usize,
    path: &Path,
    explicit: Option<&str>,
) -> Result<()> {
    if let Some(name) = explicit {
        return registry.set_buffer_mode_by_name(buffer_idx, name);
    }
    match registry.set_buffer_mode(buffer_idx, Some(path)) {
        Some(_) => Ok(()),
        None => Err(HighlightError::Usage(format!(
            "no mode for {}; use --mode",
            path.display()
        ))),
    }
}

fn print_usage() {
    println!("ashl {} - ActionScript syntax highlighter", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: ashl [OPTIONS] [FILE]...");
    println!();
    println!("Reads standard input when no FILE (or '-') is given.");
    println!();
    println!("Options:");
    println!("  -m, --mode NAME  Highlight with mode NAME instead of detecting it");
    println!("  -s, --spans      List highlighted spans instead of printing text");
    println!("      --no-color   Never emit color");
    println!("      --list-modes List modes with their extensions and electric keys");
    println!("  -h, --help       Show this help message");
    println!("  -V, --version    Show version information");
    println!();
    println!("Environment:");
    println!("  ASHL_CONFIG      Config file (default ~/.ashl.toml)");
    println!("  ASHL_LOG         Log filter, e.g. 'debug'");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_options() {
        let options = Options::parse(&args(&["-m", "actionscript", "--spans", "Main.as", "-"])).unwrap();
        assert_eq!(options.mode.as_deref(), Some("actionscript"));
        assert!(options.spans);
        assert!(!options.no_color);
        assert_eq!(options.files, vec![PathBuf::from("Main.as"), PathBuf::from("-")]);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(Options::parse(&args(&["--mode"])), Err(HighlightError::Usage(_))));
        assert!(matches!(Options::parse(&args(&["--bogus"])), Err(HighlightError::Usage(_))));
    }

    #[test]
    fn test_select_mode() {
        let mut registry = ModeRegistry::with_builtin_modes().unwrap();
        assert!(select_mode(&mut registry, 0, Path::new("Main.as"), None).is_ok());
        assert!(select_mode(&mut registry, 0, Path::new("notes.txt"), None).is_err());
        assert!(select_mode(&mut registry, 0, Path::new("-"), Some("ecmascript")).is_ok());
    }

    #[test]
    fn test_mode_listing() {
        let registry = ModeRegistry::with_builtin_modes().unwrap();
        let listing = mode_listing(&registry);

        assert_eq!(listing.len(), 2);
        assert!(listing[0].starts_with("actionscript   ActionScript   .as"));
        assert!(listing[0].ends_with(".as"));
        assert!(listing[1].starts_with("ecmascript"));
        assert!(listing[1].ends_with("(),:;{}"));
    }
}
