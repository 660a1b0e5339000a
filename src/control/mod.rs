//! Control policy — the decision logic between sensing and actuation.

pub mod hysteresis;
