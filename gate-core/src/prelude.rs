//! Prelude — imports comuns
//!
//! ```ignore
//! use gate_core::prelude::*;
//! ```

pub use crate::error::{CoreError, CoreResult};
pub use crate::time::{deadline_reached, elapsed_ms, MonotonicClock};
pub use crate::traits::{ActuatorDriver, Clock, DriverError, IndicatorSink, RawSensorSource};
pub use crate::types::{Direction, GateCommand, GateId, GateSelection, MAX_CHANNELS, Timestamp};
