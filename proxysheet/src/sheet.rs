use std::path::PathBuf;

use anyhow::{Context, Result};
use image::imageops::{FilterType, overlay};
use image::{DynamicImage, Rgb, RgbImage};
use itertools::Itertools;
use log::{debug, info};

use crate::resolver::ResolvedImages;
use crate::{
    CARD_HEIGHT, CARD_WIDTH, CARDS_PER_ROW, CARDS_PER_SHEET, SHEET_HEIGHT, SHEET_WIDTH, X_MARGIN,
    Y_MARGIN,
};

/// Which side of a duplex print a saved sheet belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetSide {
    Front,
    Back,
}

fn blank_sheet() -> RgbImage {
    RgbImage::from_pixel(SHEET_WIDTH, SHEET_HEIGHT, Rgb::<u8>([255, 255, 255]))
}

/// Force-scale a card to the exact cell size and paste it at the given grid
/// position. Aspect ratio is not preserved.
fn paste_card(sheet: &mut RgbImage, card: &DynamicImage, column: u32, row: u32) {
    let scaled = card
        .resize_exact(CARD_WIDTH, CARD_HEIGHT, FilterType::Lanczos3)
        .to_rgb8();
    overlay(
        sheet,
        &scaled,
        (X_MARGIN + column * CARD_WIDTH) as i64,
        (Y_MARGIN + row * CARD_HEIGHT) as i64,
    );
}

/// Compose the fronts of one group of up to 9 cards in reading order. Cards
/// without a front image leave their cell white.
pub fn compose_front_sheet(cards: &[ResolvedImages]) -> RgbImage {
    let mut sheet = blank_sheet();
    for (index, card) in cards.iter().take(CARDS_PER_SHEET).enumerate() {
        match &card.front {
            Some(front) => {
                let index = index as u32;
                paste_card(&mut sheet, front, index % CARDS_PER_ROW, index / CARDS_PER_ROW);
            }
            None => debug!("no front image in slot {}, leaving it blank", index),
        }
    }
    sheet
}

/// Compose the companion back sheet of a group, if any of its cards has a
/// back image. Columns are mirrored within each row so the backs line up
/// with their fronts when the pair is printed duplex and flipped on the long
/// edge.
pub fn compose_back_sheet(cards: &[ResolvedImages]) -> Option<RgbImage> {
    let backs: Vec<(usize, &DynamicImage)> = cards
        .iter()
        .take(CARDS_PER_SHEET)
        .enumerate()
        .filter_map(|(index, card)| card.back.as_ref().map(|back| (index, back)))
        .collect();
    if backs.is_empty() {
        return None;
    }
    let mut sheet = blank_sheet();
    for (index, back) in backs {
        let index = index as u32;
        let mirrored_column = CARDS_PER_ROW - 1 - index % CARDS_PER_ROW;
        paste_card(&mut sheet, back, mirrored_column, index / CARDS_PER_ROW);
    }
    Some(sheet)
}

/// Lay out resolved cards on consecutive sheets of up to 9 and save each one
/// under the path the namer produces. The sheet counter is shared between
/// front and back sheets, so file names within one run never collide.
pub fn layout_sheets<I, F>(cards: I, mut sheet_path: F) -> Result<Vec<PathBuf>>
where
    I: IntoIterator<Item = ResolvedImages>,
    F: FnMut(u32, SheetSide) -> PathBuf,
{
    let mut saved = Vec::new();
    let mut sheet_num: u32 = 1;
    for chunk in &cards.into_iter().chunks(CARDS_PER_SHEET) {
        let group: Vec<ResolvedImages> = chunk.collect();

        let front = compose_front_sheet(&group);
        let path = sheet_path(sheet_num, SheetSide::Front);
        front
            .save(&path)
            .with_context(|| format!("saving card sheet {}", path.display()))?;
        info!("saved card sheet to {}", path.display());
        saved.push(path);
        sheet_num += 1;

        if let Some(back) = compose_back_sheet(&group) {
            let path = sheet_path(sheet_num, SheetSide::Back);
            back.save(&path)
                .with_context(|| format!("saving back sheet {}", path.display()))?;
            info!("saved back sheet to {}", path.display());
            saved.push(path);
            sheet_num += 1;
        }
    }
    Ok(saved)
}
