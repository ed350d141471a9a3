//! Side-effecting helpers: filesystem access, response sinks, delivery, rules.

pub mod content_type;
pub mod deliver;
pub mod fs;
pub mod rules;
pub mod sink;
