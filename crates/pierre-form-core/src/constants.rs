// ABOUTME: Constants for the form engine organized by domain
// ABOUTME: Scoring weights, schema defaults, expression safety denylist, and environment keys
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Grouped by domain so call sites read as `scoring::ANGLE_PENALTY_CAP`.

/// Form score weights and caps
pub mod scoring {
    /// Score before any penalty is applied
    pub const MAX_SCORE: u32 = 100;

    /// Maximum points lost to angle deviation
    pub const ANGLE_PENALTY_CAP: u32 = 40;

    /// Maximum points lost to tempo deviation
    pub const TEMPO_PENALTY_CAP: u32 = 30;

    /// Maximum points lost to active feedback messages
    pub const FEEDBACK_PENALTY_CAP: u32 = 30;

    /// Degrees of deviation per penalty step
    pub const ANGLE_DEVIATION_STEP_DEG: f64 = 10.0;

    /// Points per angle deviation step
    pub const ANGLE_POINTS_PER_STEP: f64 = 5.0;

    /// Seconds too fast per penalty step
    pub const FAST_TEMPO_STEP_SECS: f64 = 0.5;

    /// Points per fast-tempo step
    pub const FAST_TEMPO_POINTS_PER_STEP: f64 = 15.0;

    /// Points per second slower than the tempo maximum
    pub const SLOW_TEMPO_POINTS_PER_SEC: f64 = 10.0;

    /// Points per active feedback message
    pub const FEEDBACK_POINTS_PER_MESSAGE: u32 = 10;

    /// Lower bounds of the letter grades
    pub mod grades {
        /// A grade threshold
        pub const A_MIN: u32 = 90;
        /// B grade threshold
        pub const B_MIN: u32 = 80;
        /// C grade threshold
        pub const C_MIN: u32 = 70;
        /// D grade threshold
        pub const D_MIN: u32 = 60;
    }
}

/// Defaults applied when a definition omits an optional field
pub mod defaults {
    /// Minimum seconds between two counted repetitions
    pub const MIN_REP_DURATION_SECS: f64 = 0.5;

    /// Repetitions sampled before calibration completes
    pub const CALIBRATION_REPS: usize = 3;

    /// Moving average window for angle smoothing
    pub const SMOOTHING_WINDOW: usize = 5;

    /// Fastest acceptable repetition in seconds
    pub const TEMPO_MIN_SECS: f64 = 1.0;

    /// Slowest acceptable repetition in seconds
    pub const TEMPO_MAX_SECS: f64 = 3.0;

    /// Hold target for duration exercises in seconds
    pub const TARGET_DURATION_SECS: f64 = 30.0;

    /// Phase name that represents holding for duration exercises
    pub const HOLD_STATE: &str = "hold";

    /// Phase the repetition timer starts from
    pub const REP_START_FROM: &str = "start";

    /// Phase the repetition timer starts on
    pub const REP_START_TO: &str = "descent";

    /// Sides tracked by bilateral exercises
    pub const SIDES: [&str; 2] = ["left", "right"];

    /// Phases whose angle feeds the calibration minimum list
    pub const BOTTOM_STATES: [&str; 2] = ["down", "bottom"];

    /// Phases whose angle feeds the calibration maximum list
    pub const TOP_STATES: [&str; 3] = ["up", "top", "start"];

    /// Feedback message when a rule omits one
    pub const FEEDBACK_MESSAGE: &str = "Check your form";

    /// Presentation defaults for exercise info
    pub mod info {
        /// Default equipment label
        pub const EQUIPMENT: &str = "Bodyweight";
        /// Default repetitions per set
        pub const REPS: u32 = 10;
        /// Default number of sets
        pub const SETS: u32 = 3;
        /// Default rest between sets
        pub const REST_TIME: &str = "60 seconds";
        /// Default difficulty label
        pub const DIFFICULTY: &str = "beginner";
    }
}

/// Geometry constants
pub mod geometry {
    /// Added to the magnitude product so coincident joints never divide by zero
    pub const MAGNITUDE_EPSILON: f64 = 1e-6;

    /// Name of the angle aliased as plain `angle` in evaluation contexts
    pub const PRIMARY_ANGLE: &str = "primary";

    /// Context key alias for the primary angle
    pub const ANGLE_ALIAS: &str = "angle";

    /// Suffix appended to angle names in evaluation contexts
    pub const ANGLE_SUFFIX: &str = "_angle";
}

/// Condition expression safety rules
pub mod expression {
    /// Substrings that make an expression unsafe regardless of context
    pub const DENYLIST: [&str; 8] = ["import", "exec", "eval", "__", "open", "file", "os", "sys"];

    /// Built-in functions callable from conditions
    pub const BUILTINS: [&str; 3] = ["abs", "min", "max"];

    /// Context key carrying the global repetition counter
    pub const COUNTER_KEY: &str = "counter";

    /// Context key carrying the current hold duration
    pub const HOLD_DURATION_KEY: &str = "hold_duration";
}

/// Definition document conventions
pub mod documents {
    /// Preferred definition file extension
    pub const EXTENSION: &str = "yaml";

    /// Accepted alternate extension
    pub const ALT_EXTENSION: &str = "yml";

    /// Default definitions directory relative to the working directory
    pub const DEFAULT_DIR: &str = "definitions";
}

/// Environment variable names
pub mod env_config {
    /// Directory containing exercise definition documents
    pub const DEFINITIONS_DIR: &str = "PIERRE_FORM_DEFINITIONS_DIR";

    /// Deployment environment (development, production, testing)
    pub const ENVIRONMENT: &str = "PIERRE_FORM_ENVIRONMENT";

    /// Override for the default debounce when a definition omits it
    pub const DEFAULT_MIN_REP_DURATION: &str = "PIERRE_FORM_MIN_REP_DURATION";

    /// Log output format (json, pretty, compact)
    pub const LOG_FORMAT: &str = "LOG_FORMAT";

    /// Include file and line numbers in logs
    pub const LOG_INCLUDE_LOCATION: &str = "LOG_INCLUDE_LOCATION";

    /// Service name in structured logs
    pub const SERVICE_NAME: &str = "SERVICE_NAME";
}

/// Service identifiers used in logging
pub mod service_names {
    /// Engine service name
    pub const PIERRE_FORM_ENGINE: &str = "pierre-form-engine";
}
