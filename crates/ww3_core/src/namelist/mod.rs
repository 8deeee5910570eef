//! Comment-preserving NAMELIST reader and rewriter.
//!
//! Files are handled as a sequence of tagged lines rather than parsed into
//! a tree, so comments, blank lines, indentation and line endings survive
//! every rewrite. Only the lines an edit targets are regenerated.
//!
//! Line grammar (group and key matching is case-insensitive):
//!
//! ```text
//! comment     := ws? "!" ...
//! block-start := ws? "&" IDENT ...
//! block-end   := ws? "/" ws?
//! assignment  := ws? KEY ws? "=" ws? VALUE
//! KEY         := IDENT ("%" IDENT)+
//! ```

mod file;
mod line;
mod value;

pub use file::{rewrite, EditSummary, NamelistFile, RewriteOutcome};
pub use line::{LineEnding, LineKind, NamelistLine};
pub use value::{unquote, Decimal, NamelistEdit, NamelistValue};

/// NAMELIST file names and the groups the tool edits in them.
pub mod names {
    pub const WW3_GRID: &str = "ww3_grid.nml";
    pub const WW3_SHEL: &str = "ww3_shel.nml";
    pub const WW3_OUNF: &str = "ww3_ounf.nml";
    pub const WW3_OUNP: &str = "ww3_ounp.nml";
    pub const WW3_TRNC: &str = "ww3_trnc.nml";

    pub const SPECTRUM_NML: &str = "SPECTRUM_NML";
    pub const TIMESTEPS_NML: &str = "TIMESTEPS_NML";
    pub const GRID_NML: &str = "GRID_NML";
    pub const FIELD_NML: &str = "FIELD_NML";
    pub const TYPE_NML: &str = "TYPE_NML";
    pub const POINT_NML: &str = "POINT_NML";
    pub const TRACK_NML: &str = "TRACK_NML";
}
