use log::LevelFilter;

mod batch;
pub use crate::batch::{sheets_from_directory, sheets_from_list};

mod cardlist;
pub use crate::cardlist::{CardReference, parse_card_list};

mod resolver;
pub use crate::resolver::{ResolvedImages, resolve, resolve_by_url};

mod scryfall;
pub use crate::scryfall::{CardRecord, Layout, ScryfallSearchAnswer};

mod scryfall_client;
pub use crate::scryfall_client::ScryfallClient;

mod sheet;
pub use crate::sheet::{SheetSide, compose_back_sheet, compose_front_sheet, layout_sheets};

/// Card cell size, 2.5 x 3.5 inches at 300 dpi.
pub const CARD_WIDTH: u32 = 750;
pub const CARD_HEIGHT: u32 = 1050;

pub const CARDS_PER_ROW: u32 = 3;
pub const ROWS_PER_SHEET: u32 = 3;
pub const CARDS_PER_SHEET: usize = (CARDS_PER_ROW * ROWS_PER_SHEET) as usize;

/// Sheet canvas, 8.5 x 11 inches at 300 dpi.
pub const SHEET_WIDTH: u32 = 2550;
pub const SHEET_HEIGHT: u32 = 3300;

pub const X_MARGIN: u32 = (SHEET_WIDTH - CARDS_PER_ROW * CARD_WIDTH) / 2;
pub const Y_MARGIN: u32 = (SHEET_HEIGHT - ROWS_PER_SHEET * CARD_HEIGHT) / 2;

pub fn setup_logger(level: LevelFilter) -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Utc::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stdout())
        .chain(fern::log_file("proxysheet.log")?)
        .apply()?;
    Ok(())
}
