/// Temperature readings and thresholds, in degrees Celsius.
pub type Celsius = f64;

/// Heated floor area.
pub type SquareMeters = f64;

/// Energy figures produced by heating rules.
pub type KilowattHours = f64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
