use clap::Parser;
use std::path::PathBuf;
use std::sync::mpsc;
use stillframe::config::GalleryConfig;
use stillframe::imaging::RustBackend;
use stillframe::{album, generate, output, scan};

#[derive(Parser)]
#[command(name = "stillframe")]
#[command(version)]
#[command(about = "Incremental static gallery generator for photo collections")]
#[command(long_about = "\
Incremental static gallery generator for photo collections

Walks a directory of JPEGs and produces a browsable static gallery:
full-size copies, thumbnails, and plain HTML/CSS pages. Each album keeps a
fingerprint index in its output directory, so unchanged photos are never
reprocessed and photos removed from the source have their derived files
cleaned up on the next run.

With enable_albums = true in config.toml, every subdirectory of the photos
directory becomes its own album and a root index page links them all.")]
struct Cli {
    /// Directory of source photos
    photos_dir: PathBuf,

    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Output directory for the generated gallery
    #[arg(short, long, default_value = "gallery")]
    output: PathBuf,

    /// Override the configured number of parallel workers
    #[arg(long)]
    workers: Option<usize>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if !cli.photos_dir.is_dir() {
        return Err(format!("directory {} does not exist", cli.photos_dir.display()).into());
    }

    let mut config = GalleryConfig::load(&cli.config)?;
    if let Some(workers) = cli.workers {
        config.max_workers = workers;
    }
    config.validate()?;

    let backend = RustBackend::new();

    // Workers report per-photo events through a channel; one printer thread
    // keeps the lines whole.
    let (tx, rx) = mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            output::print_event(&event);
        }
    });

    let mut failures = 0u32;
    if config.enable_albums {
        let mut albums = Vec::new();
        for dir in scan::list_album_dirs(&cli.photos_dir)? {
            if scan::list_photo_files(&dir)?.is_empty() {
                continue;
            }
            let name = dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let album_out = cli.output.join(&name);

            // One bad album doesn't block the rest.
            match album::build_album(&backend, &dir, &album_out, &name, &config, Some(&tx)) {
                Ok((album, stats)) => {
                    println!("{name}: {stats}");
                    generate::write_album(&album_out, &album, &config)?;
                    albums.push(album);
                }
                Err(err) => {
                    eprintln!("error while generating album {}: {err}", dir.display());
                    failures += 1;
                }
            }
        }
        generate::write_index(&cli.output, &albums, &config)?;
    } else {
        match album::build_album(
            &backend,
            &cli.photos_dir,
            &cli.output,
            &config.title,
            &config,
            Some(&tx),
        ) {
            Ok((album, stats)) => {
                println!("{stats}");
                generate::write_album(&cli.output, &album, &config)?;
            }
            Err(err) => {
                eprintln!("error while generating album {}: {err}", cli.photos_dir.display());
                failures += 1;
            }
        }
    }

    drop(tx);
    let _ = printer.join();

    if failures > 0 {
        return Err(format!("{failures} album(s) failed").into());
    }
    println!("gallery generated at {}", cli.output.display());
    Ok(())
}
