//! In-memory FITS container builder.
//!
//! Produces byte-exact FITS files (2880-byte blocks, 80-byte header cards,
//! big-endian data) so reader tests need no checked-in binaries.

/// FITS logical record length.
pub const BLOCK_SIZE: usize = 2880;

/// Header card length.
pub const CARD_SIZE: usize = 80;

/// Builds a FITS container HDU by HDU.
///
/// The first HDU added becomes the primary HDU; later ones are extensions.
#[derive(Debug, Default)]
pub struct FitsBuilder {
    bytes: Vec<u8>,
    hdus: usize,
}

impl FitsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Primary HDU with no data (`NAXIS = 0`), common in multi-extension files.
    pub fn empty_primary(mut self) -> Self {
        let cards = vec![
            logical_card("SIMPLE", true),
            int_card("BITPIX", 8),
            int_card("NAXIS", 0),
            logical_card("EXTEND", true),
        ];
        self.push_hdu(cards, Vec::new());
        self
    }

    /// 32-bit float image.
    pub fn image_f32(self, width: usize, height: usize, samples: &[f32]) -> Self {
        let data = samples.iter().flat_map(|v| v.to_be_bytes()).collect();
        self.image(-32, &[width, height], data, Vec::new())
    }

    /// 64-bit float image.
    pub fn image_f64(self, width: usize, height: usize, samples: &[f64]) -> Self {
        let data = samples.iter().flat_map(|v| v.to_be_bytes()).collect();
        self.image(-64, &[width, height], data, Vec::new())
    }

    /// 16-bit integer image with `BSCALE`/`BZERO` calibration.
    pub fn image_i16(
        self,
        width: usize,
        height: usize,
        samples: &[i16],
        bscale: f64,
        bzero: f64,
    ) -> Self {
        let data = samples.iter().flat_map(|v| v.to_be_bytes()).collect();
        let extra = vec![float_card("BSCALE", bscale), float_card("BZERO", bzero)];
        self.image(16, &[width, height], data, extra)
    }

    /// Unsigned byte image.
    pub fn image_u8(self, width: usize, height: usize, samples: &[u8]) -> Self {
        self.image(8, &[width, height], samples.to_vec(), Vec::new())
    }

    /// 32-bit float image with arbitrary axes (for cubes and 1-D spectra).
    pub fn image_f32_axes(self, axes: &[usize], samples: &[f32]) -> Self {
        let data = samples.iter().flat_map(|v| v.to_be_bytes()).collect();
        self.image(-32, axes, data, Vec::new())
    }

    /// Binary table extension with `rows` rows of `row_bytes` zero bytes.
    pub fn binary_table(mut self, row_bytes: usize, rows: usize) -> Self {
        let cards = vec![
            string_card("XTENSION", "BINTABLE"),
            int_card("BITPIX", 8),
            int_card("NAXIS", 2),
            int_card("NAXIS1", row_bytes as i64),
            int_card("NAXIS2", rows as i64),
            int_card("PCOUNT", 0),
            int_card("GCOUNT", 1),
            int_card("TFIELDS", 0),
        ];
        self.push_hdu(cards, vec![0u8; row_bytes * rows]);
        self
    }

    /// Finished container bytes.
    pub fn build(self) -> Vec<u8> {
        self.bytes
    }

    fn image(mut self, bitpix: i64, axes: &[usize], data: Vec<u8>, extra: Vec<String>) -> Self {
        let mut cards = Vec::new();
        if self.hdus == 0 {
            cards.push(logical_card("SIMPLE", true));
        } else {
            cards.push(string_card("XTENSION", "IMAGE"));
        }
        cards.push(int_card("BITPIX", bitpix));
        cards.push(int_card("NAXIS", axes.len() as i64));
        for (i, n) in axes.iter().enumerate() {
            cards.push(int_card(&format!("NAXIS{}", i + 1), *n as i64));
        }
        if self.hdus > 0 {
            cards.push(int_card("PCOUNT", 0));
            cards.push(int_card("GCOUNT", 1));
        }
        cards.extend(extra);
        self.push_hdu(cards, data);
        self
    }

    fn push_hdu(&mut self, cards: Vec<String>, data: Vec<u8>) {
        for card in cards {
            self.bytes.extend_from_slice(card.as_bytes());
        }
        self.bytes.extend_from_slice(format!("{:<80}", "END").as_bytes());
        pad_to_block(&mut self.bytes, b' ');

        if !data.is_empty() {
            self.bytes.extend_from_slice(&data);
            pad_to_block(&mut self.bytes, 0);
        }
        self.hdus += 1;
    }
}

fn pad_to_block(bytes: &mut Vec<u8>, fill: u8) {
    let rem = bytes.len() % BLOCK_SIZE;
    if rem != 0 {
        bytes.resize(bytes.len() + BLOCK_SIZE - rem, fill);
    }
}

/// Fixed-format card with the value right-justified to column 30.
fn value_card(key: &str, value: &str) -> String {
    format!("{:<8}= {:>20}{:<50}", key, value, "")
}

pub fn int_card(key: &str, value: i64) -> String {
    value_card(key, &value.to_string())
}

pub fn float_card(key: &str, value: f64) -> String {
    value_card(key, &format!("{:.10E}", value))
}

pub fn logical_card(key: &str, value: bool) -> String {
    value_card(key, if value { "T" } else { "F" })
}

pub fn string_card(key: &str, value: &str) -> String {
    format!("{:<8}= {:<70}", key, format!("'{:<8}'", value))
}
