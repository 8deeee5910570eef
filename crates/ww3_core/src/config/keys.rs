//! Configuration key names.

pub const LANGUAGE: &str = "LANGUAGE";
pub const THEME: &str = "THEME";
pub const RUN_MODE: &str = "RUN_MODE";
pub const LOG_LEVEL: &str = "LOG_LEVEL";

// Grid
pub const DX: &str = "DX";
pub const DY: &str = "DY";
pub const NESTED_OUTER_DX: &str = "NESTED_OUTER_DX";
pub const NESTED_OUTER_DY: &str = "NESTED_OUTER_DY";
pub const NESTED_CONTRACTION_COEFFICIENT: &str = "NESTED_CONTRACTION_COEFFICIENT";
pub const USE_NESTED_GRID: &str = "USE_NESTED_GRID";
pub const BATHYMETRY: &str = "BATHYMETRY";
pub const COASTLINE_PRECISION: &str = "COASTLINE_PRECISION";

pub const FILE_SPLIT: &str = "FILE_SPLIT";
pub const CONFIRM_ON_EXIT: &str = "CONFIRM_ON_EXIT";

// Spectrum
pub const FREQ_INC: &str = "FREQ_INC";
pub const FREQ_START: &str = "FREQ_START";
pub const FREQ_NUM: &str = "FREQ_NUM";
pub const DIR_NUM: &str = "DIR_NUM";

// Timesteps
pub const DTMAX: &str = "DTMAX";
pub const DTXY: &str = "DTXY";
pub const DTKTH: &str = "DTKTH";
pub const DTMIN: &str = "DTMIN";

// Nearshore
pub const GRID_ZLIM: &str = "GRID_ZLIM";
pub const GRID_DMIN: &str = "GRID_DMIN";

pub const CPU_GROUP: &str = "CPU_GROUP";
pub const ST_VERSIONS: &str = "ST_VERSIONS";
pub const OUTPUT_VARS_SCHEMES: &str = "OUTPUT_VARS_SCHEMES";

// Paths; empty means "use the default"
pub const PUBLIC_WW3_PATH: &str = "PUBLIC_WW3_PATH";
pub const FORCING_PATH: &str = "FORCING_PATH";
pub const GRIDGEN_PATH: &str = "GRIDGEN_PATH";
pub const REFERENCE_DATA_PATH: &str = "REFERENCE_DATA_PATH";
pub const DEFAULT_WORKDIR: &str = "DEFAULT_WORKDIR";
pub const WW3BIN_PATH: &str = "WW3BIN_PATH";
pub const CURRENT_WORKDIR: &str = "CURRENT_WORKDIR";
