use crate::error::{Severity, Violation};
use crate::schema::types::{Padding, SweepPlan};
use crate::sweep::enumerate_combinations;

/// Dump files carry the combination index as four digits.
pub const MAX_COMBINATIONS: usize = 10_000;

/// Above this many serialized values the header gets unwieldy to compile.
pub const LARGE_SWEEP_ELEMENTS: usize = 50_000_000;

/// Validate a sweep plan before anything is computed.
///
/// Returns a list of violations. If any violation has
/// [`Severity::Error`], the plan cannot be generated.
pub fn validate_plan(plan: &SweepPlan) -> Vec<Violation> {
    let mut violations = Vec::new();

    validate_lists(plan, &mut violations);
    validate_shapes(plan, &mut violations);
    validate_windows(plan, &mut violations);
    validate_channels(plan, &mut violations);

    if !violations.iter().any(|v| v.severity == Severity::Error) {
        validate_combinations(plan, &mut violations);
    }
    validate_seed(plan, &mut violations);

    violations
}

fn error(rule: &str, message: String, location: String) -> Violation {
    Violation {
        severity: Severity::Error,
        rule: rule.to_string(),
        message,
        location: Some(location),
    }
}

fn validate_lists(plan: &SweepPlan, violations: &mut Vec<Violation>) {
    let lists = [
        ("input_shapes", plan.input_shapes.len()),
        ("kernel_shapes", plan.kernel_shapes.len()),
        ("strides", plan.strides.len()),
        ("paddings", plan.paddings.len()),
        ("dilations", plan.dilations.len()),
    ];
    for (name, len) in lists {
        if len == 0 {
            violations.push(error(
                "PLAN-001",
                format!("{name} must not be empty"),
                name.to_string(),
            ));
        }
    }

    let count = plan.combination_count();
    if count > MAX_COMBINATIONS {
        violations.push(error(
            "PLAN-009",
            format!(
                "{count} combinations exceed the {MAX_COMBINATIONS} that \
                 four-digit dump indices can name"
            ),
            "plan".to_string(),
        ));
    }
}

fn validate_shapes(plan: &SweepPlan, violations: &mut Vec<Violation>) {
    let all = plan
        .input_shapes
        .iter()
        .enumerate()
        .map(|(i, s)| (format!("input_shapes[{i}]"), s))
        .chain(
            plan.kernel_shapes
                .iter()
                .enumerate()
                .map(|(i, s)| (format!("kernel_shapes[{i}]"), s)),
        );
    for (location, shape) in all {
        if shape.len() != 4 {
            violations.push(error(
                "PLAN-002",
                format!("{location} must be rank 4, got {shape:?}"),
                location.clone(),
            ));
        }
        if shape.contains(&0) {
            violations.push(error(
                "PLAN-003",
                format!("{location} has a zero dimension: {shape:?}"),
                location,
            ));
        }
    }
}

fn validate_windows(plan: &SweepPlan, violations: &mut Vec<Violation>) {
    for (i, stride) in plan.strides.iter().enumerate() {
        if stride.contains(&0) {
            violations.push(error(
                "PLAN-004",
                format!("strides[{i}] must be positive, got {stride:?}"),
                format!("strides[{i}]"),
            ));
        }
    }
    for (i, dilation) in plan.dilations.iter().enumerate() {
        if dilation.contains(&0) {
            violations.push(error(
                "PLAN-005",
                format!("dilations[{i}] must be positive, got {dilation:?}"),
                format!("dilations[{i}]"),
            ));
        }
    }
    for (i, padding) in plan.paddings.iter().enumerate() {
        if let Padding::Explicit(p) = padding
            && (p[0] != [0, 0] || p[3] != [0, 0])
        {
            violations.push(error(
                "PLAN-006",
                format!("paddings[{i}] pads the batch or channel axis: {padding}"),
                format!("paddings[{i}]"),
            ));
        }
    }
}

fn validate_channels(plan: &SweepPlan, violations: &mut Vec<Violation>) {
    for (i, input) in plan.input_shapes.iter().enumerate() {
        for (k, kernel) in plan.kernel_shapes.iter().enumerate() {
            if input.len() == 4 && kernel.len() == 4 && input[3] != kernel[2] {
                violations.push(error(
                    "PLAN-007",
                    format!(
                        "input_shapes[{i}] has {} channels but kernel_shapes[{k}] expects {}",
                        input[3], kernel[2]
                    ),
                    format!("kernel_shapes[{k}]"),
                ));
            }
        }
    }
}

fn validate_combinations(plan: &SweepPlan, violations: &mut Vec<Violation>) {
    let mut elements = 0usize;
    for combination in enumerate_combinations(plan) {
        match combination.shapes() {
            Ok(shapes) => elements = elements.saturating_add(shapes.serialized_elements()),
            Err(e) => violations.push(error(
                "PLAN-008",
                format!("combination {combination}: {e}"),
                format!("combination[{}]", combination.index),
            )),
        }
    }
    if elements > LARGE_SWEEP_ELEMENTS {
        violations.push(Violation {
            severity: Severity::Warning,
            rule: "PLAN-010".to_string(),
            message: format!(
                "plan serializes {elements} values; the header may be slow to compile"
            ),
            location: Some("plan".to_string()),
        });
    }
}

fn validate_seed(plan: &SweepPlan, violations: &mut Vec<Violation>) {
    if plan.seed.is_none() {
        violations.push(Violation {
            severity: Severity::Info,
            rule: "PLAN-011".to_string(),
            message: "no seed set; each run draws a fresh base seed".to_string(),
            location: Some("seed".to_string()),
        });
    }
}
