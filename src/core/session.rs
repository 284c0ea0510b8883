use crate::domain::model::{Depositor, LocationNode, LocationType, Sample};
use crate::domain::plate::{row_letter, CellCode, PlateCoordinate, PlateGeometry};
use crate::utils::error::{IceError, Result};
use crate::utils::validation::validate_non_empty_string;

/// The cell whose barcode popover is expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenCell {
    pub code: CellCode,
    pub barcode: Option<String>,
}

/// Per-view state for adding a sample on a plate grid: the sample being built
/// and the single open cell, if any.
#[derive(Debug, Clone)]
pub struct PlateSession {
    geometry: PlateGeometry,
    new_sample: Sample,
    open: Option<OpenCell>,
}

impl PlateSession {
    pub fn new(geometry: PlateGeometry, depositor: Depositor) -> Self {
        Self {
            geometry,
            new_sample: Sample::for_depositor(depositor),
            open: None,
        }
    }

    pub fn geometry(&self) -> PlateGeometry {
        self.geometry
    }

    pub fn new_sample(&self) -> &Sample {
        &self.new_sample
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.new_sample.label = label.into();
    }

    pub fn open_cell(&self) -> Option<&OpenCell> {
        self.open.as_ref()
    }

    fn coordinate(&self, row: usize, col: usize) -> Result<PlateCoordinate> {
        self.geometry.coordinate(row, col)
    }

    pub fn coordinate_code(&self, row: usize, col: usize) -> Result<CellCode> {
        Ok(self.coordinate(row, col)?.code())
    }

    /// Opens the popover for a cell. Whatever was open before is dropped along
    /// with its pending barcode.
    pub fn open_popover_for(&mut self, row: usize, col: usize) -> Result<()> {
        let code = self.coordinate_code(row, col)?;
        if let Some(previous) = self.open.replace(OpenCell { code, barcode: None }) {
            if previous.code != code {
                tracing::debug!("Closing popover for cell {}", previous.code);
            }
        }
        tracing::debug!("Opened popover for cell {}", code);
        Ok(())
    }

    pub fn is_open(&self, row: usize, col: usize) -> Result<bool> {
        let code = self.coordinate_code(row, col)?;
        Ok(self.open.as_ref().is_some_and(|open| open.code == code))
    }

    pub fn set_pending_barcode(&mut self, barcode: impl Into<String>) -> Result<()> {
        let open = self.open.as_mut().ok_or(IceError::NoOpenCell)?;
        let barcode = barcode.into();
        open.barcode = if barcode.trim().is_empty() {
            None
        } else {
            Some(barcode.trim().to_string())
        };
        Ok(())
    }

    pub fn close_popover(&mut self) {
        if let Some(open) = self.open.take() {
            tracing::debug!("Abandoned pending edit for cell {}", open.code);
        }
    }

    /// Records a well at (row, col) as the sample's location, with a tube under
    /// it when the open popover on that cell carries a barcode.
    pub fn record_well(&mut self, row: usize, col: usize) -> Result<()> {
        let code = self.coordinate_code(row, col)?;
        let mut well = LocationNode::well(code);

        let barcode = self
            .open
            .as_ref()
            .filter(|open| open.code == code)
            .and_then(|open| open.barcode.clone());
        if let Some(barcode) = barcode {
            tracing::debug!("Recording tube {} in well {}", barcode, code);
            well = well.with_child(LocationNode::tube(barcode));
        } else {
            tracing::debug!("Recording well {}", code);
        }

        self.new_sample.code = Some(code);
        self.new_sample.location = Some(well);
        Ok(())
    }

    /// Records whatever cell is currently open.
    pub fn submit_open(&mut self) -> Result<CellCode> {
        let code = self.open.as_ref().ok_or(IceError::NoOpenCell)?.code;
        let coordinate = code.coordinate();
        self.record_well(coordinate.row(), coordinate.col())?;
        Ok(code)
    }

    /// Marks the sample as held by AddGene instead of a physical location.
    pub fn record_addgene(&mut self, catalog_id: &str) -> Result<()> {
        validate_non_empty_string("addgene id", catalog_id)?;
        self.new_sample.code = None;
        self.new_sample.location = Some(LocationNode::addgene(catalog_id.trim()));
        Ok(())
    }

    fn is_recorded_at(&self, code: CellCode) -> bool {
        self.new_sample.code == Some(code)
    }

    pub fn has_type(&self, kind: &LocationType, row: usize, col: usize) -> Result<bool> {
        let code = self.coordinate_code(row, col)?;
        Ok(self.is_recorded_at(code) && self.new_sample.find_location(kind).is_some())
    }

    pub fn has_well(&self, row: usize, col: usize) -> Result<bool> {
        self.has_type(&LocationType::Well, row, col)
    }

    pub fn has_tube(&self, row: usize, col: usize) -> Result<bool> {
        self.has_type(&LocationType::Tube, row, col)
    }

    /// True when any node of the chain is labelled with this cell's code.
    pub fn has_content(&self, row: usize, col: usize) -> Result<bool> {
        let label = self.coordinate_code(row, col)?.to_string();
        Ok(self.new_sample.chain().any(|node| node.display == label))
    }

    /// Hands out the finished sample and starts a fresh one for the same depositor.
    pub fn take_new_sample(&mut self) -> Sample {
        let fresh = Sample::for_depositor(self.new_sample.depositor.clone());
        self.open = None;
        std::mem::replace(&mut self.new_sample, fresh)
    }

    /// Text plate map: `T` tube, `W` well, `*` other content, `>` open cell.
    pub fn render_grid(&self) -> String {
        let mut out = String::from("   ");
        for col in 0..self.geometry.cols {
            out.push_str(&format!("{:>3}", col + 1));
        }
        out.push('\n');

        for row in 0..self.geometry.rows {
            out.push_str(&format!("{:>3}", row_letter(row)));
            for col in 0..self.geometry.cols {
                out.push_str(&format!("{:>3}", self.cell_symbol(row, col)));
            }
            out.push('\n');
        }
        out
    }

    fn cell_symbol(&self, row: usize, col: usize) -> char {
        let check = |result: Result<bool>| result.unwrap_or(false);
        if check(self.has_tube(row, col)) {
            'T'
        } else if check(self.has_well(row, col)) {
            'W'
        } else if check(self.has_content(row, col)) {
            '*'
        } else if check(self.is_open(row, col)) {
            '>'
        } else {
            '.'
        }
    }
}
