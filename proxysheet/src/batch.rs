use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use lazy_static::lazy_static;
use log::{error, info};
use regex::Regex;

use crate::cardlist::parse_card_list;
use crate::resolver::ResolvedImages;
use crate::scryfall_client::ScryfallClient;
use crate::sheet::{SheetSide, layout_sheets};

/// Batch name whose sheets go into a date-stamped directory.
const DEFAULT_BATCH: &str = "input";
const DEFAULT_SHEET_STEM: &str = "card_sheet";

fn sheet_file_name(stem: &str, sheet_num: u32, side: SheetSide) -> String {
    match side {
        SheetSide::Front => format!("{}_{}.png", stem, sheet_num),
        SheetSide::Back => format!("{}_{}_back.png", stem, sheet_num),
    }
}

fn sheet_stem(batch: &str) -> &str {
    if batch == DEFAULT_BATCH {
        DEFAULT_SHEET_STEM
    } else {
        batch
    }
}

fn prepare_output_dir(output_root: &Path, batch: &str) -> Result<PathBuf> {
    let dir = if batch == DEFAULT_BATCH {
        output_root.join(chrono::Local::now().format("%m-%d-%Y").to_string())
    } else {
        output_root.join("Misc")
    };
    fs::create_dir_all(&dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;
    Ok(dir)
}

/// Read a card list file, resolve every reference in input order and lay the
/// results out on sheets under `output_root`. A missing list file aborts the
/// run; a reference that cannot be resolved leaves its cell blank.
pub fn sheets_from_list(
    list_name: &str,
    output_root: &Path,
    client: &ScryfallClient,
) -> Result<Vec<PathBuf>> {
    let batch = list_name.strip_suffix(".csv").unwrap_or(list_name);
    let input = PathBuf::from(format!("{}.csv", batch));
    let text = fs::read_to_string(&input)
        .with_context(|| format!("input file {} not found", input.display()))?;
    let references = parse_card_list(&text);
    info!("{} card references in {}", references.len(), input.display());

    let resolved: Vec<ResolvedImages> = references
        .iter()
        .map(|reference| {
            info!("processing {:?}", reference);
            let images = reference.resolve(client);
            if images.is_empty() {
                error!("failed to resolve {:?}", reference);
            }
            images
        })
        .collect();

    let dir = prepare_output_dir(output_root, batch)?;
    let stem = sheet_stem(batch);
    layout_sheets(resolved, |sheet_num, side| {
        dir.join(sheet_file_name(stem, sheet_num, side))
    })
}

/// Compose sheets from pre-rendered card images in `assets_root/<batch>`,
/// ordered by natural file name order. A missing or empty directory aborts
/// the run; an unreadable file leaves its cell blank.
pub fn sheets_from_directory(
    batch: &str,
    assets_root: &Path,
    output_root: &Path,
) -> Result<Vec<PathBuf>> {
    let dir = assets_root.join(batch);
    if !dir.is_dir() {
        bail!("custom directory {} not found", dir.display());
    }
    let mut files: Vec<PathBuf> = fs::read_dir(&dir)
        .with_context(|| format!("reading custom directory {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "png"))
        .collect();
    if files.is_empty() {
        bail!("no .png files found in {}", dir.display());
    }
    files.sort_by_cached_key(|path| {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        natural_sort_key(&name)
    });
    info!("{} card images in {}", files.len(), dir.display());

    let fronts: Vec<ResolvedImages> = files
        .iter()
        .map(|path| match image::open(path) {
            Ok(front) => ResolvedImages {
                front: Some(front),
                back: None,
            },
            Err(e) => {
                error!("could not read {}: {}", path.display(), e);
                ResolvedImages::empty()
            }
        })
        .collect();

    let out_dir = prepare_output_dir(output_root, batch)?;
    let stem = sheet_stem(batch);
    layout_sheets(fronts, |sheet_num, side| {
        out_dir.join(sheet_file_name(stem, sheet_num, side))
    })
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum NaturalPiece {
    Number(u64),
    Text(String),
}

/// Numeric-aware sort key so that `card2.png` sorts before `card10.png`.
fn natural_sort_key(name: &str) -> Vec<NaturalPiece> {
    lazy_static! {
        static ref PIECES: Regex = Regex::new(r"\d+|\D+").unwrap();
    }
    PIECES
        .find_iter(name)
        .map(|piece| {
            let s = piece.as_str();
            match s.parse::<u64>() {
                Ok(n) => NaturalPiece::Number(n),
                Err(_) => NaturalPiece::Text(s.to_lowercase()),
            }
        })
        .collect()
}
