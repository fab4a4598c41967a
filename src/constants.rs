// Curio Constants
// Values shared between the analytics engine, chart derivation, and CLI.

// Paths
pub const CURIO_FOLDER: &str = ".curio";
pub const DB_FILENAME: &str = "curio.db";

// Settings keys
pub const SETTING_DEFAULT_OWNER: &str = "default_owner";

// Dashboard
pub const TOP_ITEMS_LIMIT: usize = 5;
pub const RECENT_ACTIVITY_LIMIT: usize = 5;

// Category chart palette, assigned cyclically by descending-cost position
pub const CATEGORY_PALETTE: [&str; 6] = [
    "#3f51b5", "#ff4081", "#4caf50", "#ff9800", "#9c27b0", "#00bcd4",
];

// Fallback slice shown when a distribution is empty
pub const NO_DATA_COLOR: &str = "#e0e0e0";
pub const NO_DATA_LABEL: &str = "No data";

// Trend chart (synthetic 12-month curve)
pub const TREND_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun",
    "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
pub const TREND_JITTER: f64 = 0.025;
pub const TREND_VIEWPORT_WIDTH: f64 = 300.0;
pub const TREND_VIEWPORT_HEIGHT: f64 = 100.0;
pub const TREND_HEADROOM: f64 = 1.2; // 20% margin above the curve
