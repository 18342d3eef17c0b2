use crate::card::options::{CardOptions, DEFAULT_CARD_HEIGHT};

/// Geometry of the stats card for a given number of visible columns.
#[derive(Debug, Clone, PartialEq)]
pub struct CardLayout {
    pub width: f64,
    pub height: f64,
    pub columns: usize,
    pub column_width: f64,
    /// Vertical shift applied when the card is taller or shorter than the default.
    pub height_offset: f64,
    /// Horizontal centers of the visible columns, in render order.
    pub column_offsets: Vec<f64>,
    /// Separators between adjacent columns.
    pub bar_offsets: Vec<f64>,
}

impl CardLayout {
    pub fn new(options: &CardOptions, columns: usize, rtl: bool) -> Self {
        let width = options.width_for(columns);
        let height = options.height();
        let column_width = if columns > 0 { width / columns as f64 } else { 0.0 };

        let mut column_offsets: Vec<f64> = (0..columns)
            .map(|index| column_width / 2.0 + column_width * index as f64)
            .collect();
        if rtl {
            column_offsets.reverse();
        }

        let bar_offsets = (0..columns.saturating_sub(1))
            .map(|index| column_width * (index + 1) as f64)
            .collect();

        Self {
            width,
            height,
            columns,
            column_width,
            height_offset: (height - DEFAULT_CARD_HEIGHT) / 2.0,
            column_offsets,
            bar_offsets,
        }
    }

    /// Top and bottom of the column separators.
    pub fn bar_span(&self) -> (f64, f64) {
        (28.0 + self.height_offset / 2.0, 170.0 + self.height_offset)
    }

    /// Number, label and range rows of the side columns.
    pub fn side_rows(&self) -> [f64; 3] {
        [48.0, 84.0, 114.0].map(|y| y + self.height_offset)
    }

    /// Number, label, range, ring center and fire rows of the current streak.
    pub fn current_rows(&self) -> [f64; 5] {
        [48.0, 108.0, 145.0, 71.0, 19.5].map(|y| y + self.height_offset)
    }

    /// Characters per line for column labels.
    pub fn label_chars(&self) -> usize {
        self.chars_per_line(7.5)
    }

    /// Characters per line for date ranges.
    pub fn range_chars(&self) -> usize {
        self.chars_per_line(6.0)
    }

    fn chars_per_line(&self, glyph_width: f64) -> usize {
        if self.columns == 0 {
            return 0;
        }
        (self.column_width / glyph_width).floor().max(0.0) as usize
    }
}
