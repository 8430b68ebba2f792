/// Default fuel level for one solve call (50 billion instructions)
pub const DEFAULT_FUEL_LEVEL: u64 = 50_000_000_000;
/// Minimum allowed fuel level (1 million instructions)
pub const MIN_FUEL_LEVEL: u64 = 1_000_000;
/// Maximum allowed fuel level (1 trillion instructions) - runaway guard
pub const MAX_FUEL_LEVEL: u64 = 1_000_000_000_000;
/// Maximum accepted engine module size (32MB)
pub const DEFAULT_MAX_MODULE_BYTES: usize = 32 * 1024 * 1024;
