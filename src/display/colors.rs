//! Color palette for the graph

pub const DARK_GREEN: &str = "#00363a";
pub const MEDIUM_GREEN: &str = "#006064";
pub const LIGHT_GREEN: &str = "#428e92";
pub const MEDIUM_RED: &str = "#ff1744";
