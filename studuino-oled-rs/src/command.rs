//! SSD1307 command opcodes and the power-up sequence.
//!
//! Every constant in this module is a wire-protocol value. Several opcodes
//! take their argument in the low bits (`SET_DISP | 1`, `SET_PAGE_SADDR | page`);
//! the rest are followed by one or more argument bytes sent as further
//! command writes.

// ---------------------------------------------------------------------------
// Fundamental commands
// ---------------------------------------------------------------------------

/// Contrast control; followed by one value byte (0x00–0xFF).
pub const SET_CONTRAST: u8 = 0x81;

/// Entire display on. `| 0` follows RAM content, `| 1` forces all pixels on.
pub const SET_ENTIRE_ON: u8 = 0xA4;

/// Normal / inverse display. `| 0` normal, `| 1` inverted.
pub const SET_NORM_INV: u8 = 0xA6;

/// Display power. `| 0` off (sleep), `| 1` on.
pub const SET_DISP: u8 = 0xAE;

// ---------------------------------------------------------------------------
// Addressing
// ---------------------------------------------------------------------------

/// Memory addressing mode; followed by the mode byte.
pub const SET_MEM_ADDR: u8 = 0x20;

/// Column range for horizontal / vertical addressing (not used in page mode).
#[allow(dead_code)]
pub const SET_COL_ADDR: u8 = 0x21;

/// Page range for horizontal / vertical addressing (not used in page mode).
#[allow(dead_code)]
pub const SET_PAGE_ADDR: u8 = 0x22;

/// Page start address for page addressing mode. Per-page: `SET_PAGE_SADDR | page`.
pub const SET_PAGE_SADDR: u8 = 0xB0;

/// Lower nibble of the column start address (page addressing mode).
pub const SET_PAGE_LOW_COL_ADDR: u8 = 0x00;

/// Upper nibble of the column start address (page addressing mode).
pub const SET_PAGE_HIGH_COL_ADDR: u8 = 0x10;

// ---------------------------------------------------------------------------
// Hardware configuration
// ---------------------------------------------------------------------------

/// Display start line. `| line` (0–63).
pub const SET_DISP_START_LINE: u8 = 0x40;

/// Segment remap. `| 0` column 0 → SEG0, `| 1` column 127 → SEG0.
pub const SET_SEG_REMAP: u8 = 0xA0;

/// Multiplex ratio; followed by `height - 1`.
pub const SET_MUX_RATIO: u8 = 0xA8;

/// COM output scan direction. `| 0x08` scans in reverse.
pub const SET_COM_OUT_DIR: u8 = 0xC0;

/// Vertical display offset; followed by the shift in rows.
pub const SET_DISP_OFFSET: u8 = 0xD3;

/// COM pins hardware configuration; followed by the configuration byte.
pub const SET_COM_PIN_CFG: u8 = 0xDA;

// ---------------------------------------------------------------------------
// Timing and driving scheme
// ---------------------------------------------------------------------------

/// Display clock divide ratio / oscillator frequency; followed by one byte.
pub const SET_DISP_CLK_DIV: u8 = 0xD5;

/// Pre-charge period; followed by one byte (phase 2 high nibble, phase 1 low).
pub const SET_PRECHARGE: u8 = 0xD9;

/// VCOMH deselect level; followed by one byte.
pub const SET_VCOM_DESEL: u8 = 0xDB;

// ---------------------------------------------------------------------------
// Power-up sequence
// ---------------------------------------------------------------------------

/// One entry of a controller initialisation sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InitStep {
    /// Send a fixed command or argument byte.
    Cmd(u8),
    /// Send the multiplex ratio argument, `height - 1`.
    MuxRatio,
}

/// Power-up sequence sent once during construction, before the first
/// synchronisation and the display-on command.
pub const POWER_UP_SEQUENCE: &[InitStep] = &[
    InitStep::Cmd(SET_DISP),
    InitStep::Cmd(SET_MEM_ADDR),
    InitStep::Cmd(0x10), // page addressing mode
    InitStep::Cmd(SET_DISP_CLK_DIV),
    InitStep::Cmd(0xA1), // Fosc 1010b, divide ratio 2
    InitStep::Cmd(SET_MUX_RATIO),
    InitStep::MuxRatio,
    InitStep::Cmd(SET_DISP_OFFSET),
    InitStep::Cmd(0x23), // vertical shift 35
    InitStep::Cmd(SET_DISP_START_LINE),
    InitStep::Cmd(SET_SEG_REMAP | 0x01), // column 127 → SEG0
    InitStep::Cmd(SET_COM_OUT_DIR),
    InitStep::Cmd(SET_COM_PIN_CFG),
    InitStep::Cmd(0x12), // alternative pin config, no left/right remap
    InitStep::Cmd(SET_CONTRAST),
    InitStep::Cmd(0x80), // half contrast
    InitStep::Cmd(SET_PRECHARGE),
    InitStep::Cmd(0x51), // phase 1: 1 clock, phase 2: 5 clocks
    InitStep::Cmd(SET_VCOM_DESEL),
    InitStep::Cmd(0x20), // 0.77 × Vcc
    InitStep::Cmd(SET_ENTIRE_ON),
    InitStep::Cmd(SET_NORM_INV),
];

impl InitStep {
    /// Resolve the byte this step puts on the wire for a panel of `height` rows.
    pub fn byte(self, height: u32) -> u8 {
        match self {
            InitStep::Cmd(byte) => byte,
            // Geometry validation caps height at 64, so this fits.
            InitStep::MuxRatio => height.saturating_sub(1) as u8,
        }
    }
}
