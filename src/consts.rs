/// Default minimum number of nights between the start and end date
pub const DEFAULT_MINIMUM_NIGHTS: u32 = 1;

/// Default number of simultaneously visible months
pub const DEFAULT_NUMBER_OF_MONTHS: u32 = 1;

/// Days per calendar week, used when padding month grids to full weeks
pub const WEEK_LENGTH: i64 = 7;

/// Date component separator (ISO 8601 format)
pub const DATE_SEPARATOR: char = '-';

/// Number of components in a full ISO date (year, month, day)
pub(crate) const ISO_DATE_PARTS: usize = 3;
