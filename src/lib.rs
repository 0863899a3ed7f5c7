pub mod cutsheet;
pub mod error;
pub mod guillotine;
pub mod holes;
pub mod panels;
pub mod render;
pub mod solver;
pub mod types;
pub mod utilization;

pub use cutsheet::{CutSheetRequest, CutSheetResult, generate_cut_sheet};
pub use error::{CutSheetError, Result};
