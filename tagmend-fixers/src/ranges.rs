use crate::Fixer;
use tagmend_tag::TagGraph;
use tagmend_types::Fix;

/// Clamps bounded values back into their declared range. Non-finite values
/// are reset to the lower bound. A field whose bounds are themselves broken
/// (inverted, NaN, or infinite) has no valid state to clamp to and is left
/// alone.
pub struct OutOfRangeFixer;

fn broken(value: f32, min: f32, max: f32) -> bool {
    if !min.is_finite() || !max.is_finite() || min > max {
        return false;
    }
    !value.is_finite() || value < min || value > max
}

impl Fixer for OutOfRangeFixer {
    fn fix(&self) -> Fix {
        Fix::OutOfRange
    }

    fn run(&self, graph: &mut TagGraph, apply: bool) -> bool {
        let mut found = false;
        for field in &mut graph.ranges {
            if broken(field.value, field.min, field.max) {
                found = true;
                if apply {
                    field.value = if field.value.is_finite() {
                        field.value.clamp(field.min, field.max)
                    } else {
                        field.min
                    };
                }
            }
        }
        found
    }
}
